/*!
Loading time zones by IANA name from the system zoneinfo database.

This is the conventional directory of TZif files found on Unix systems,
usually at `/usr/share/zoneinfo`. Lookups are plain file reads: there is no
cache here. Callers that look up the same zone repeatedly should keep the
returned `TimeZone` around (cloning it is cheap), or memoize at whatever
layer knows the application's usage pattern.
*/

use std::{
    path::{Path, PathBuf},
    string::ToString,
    vec::Vec,
};

use crate::{
    error::{err, Error, ErrorContext},
    tz::TimeZone,
};

const ZONEINFO_DIRECTORIES: &[&str] =
    &["/usr/share/zoneinfo", "/etc/zoneinfo"];

/// Loads the time zone with the given IANA name.
///
/// The `$TZDIR` directory is searched first when set, then the conventional
/// locations.
pub(crate) fn get(name: &str) -> Result<TimeZone, Error> {
    validate_name(name)?;
    let mut directories = Vec::new();
    if let Some(tzdir) = std::env::var_os("TZDIR") {
        directories.push(PathBuf::from(tzdir));
    }
    directories.extend(ZONEINFO_DIRECTORIES.iter().map(PathBuf::from));

    for dir in directories.iter() {
        let path = dir.join(name);
        match std::fs::read(&path) {
            Ok(data) => {
                trace!("found {name} at {}", path.display());
                return TimeZone::tzif(name, &data).with_context(|| {
                    err!("{} contains invalid data", path.display())
                });
            }
            Err(_err) => {
                debug!(
                    "failed to read time zone file {}: {_err}",
                    path.display(),
                );
            }
        }
    }
    Err(err!(
        "failed to find time zone {name:?} in any of the zoneinfo \
         directories: {dirs}",
        dirs = directories
            .iter()
            .map(|d| d.display().to_string())
            .collect::<Vec<_>>()
            .join(", "),
    ))
}

/// Rejects names that would escape the zoneinfo directory or that cannot be
/// IANA zone names.
fn validate_name(name: &str) -> Result<(), Error> {
    if name.is_empty() {
        return Err(err!("time zone name must be non-empty"));
    }
    let path = Path::new(name);
    if path.is_absolute() {
        return Err(err!("time zone name {name:?} must be relative"));
    }
    let ok = name.bytes().all(|b| {
        b.is_ascii_alphanumeric() || matches!(b, b'/' | b'_' | b'-' | b'+' | b'.')
    });
    if !ok || name.split('/').any(|part| part == ".." || part == "." || part.is_empty()) {
        return Err(err!("invalid time zone name {name:?}"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_names() {
        assert!(get("").is_err());
        assert!(get("/etc/passwd").is_err());
        assert!(get("../../../etc/passwd").is_err());
        assert!(get("America/../../etc/passwd").is_err());
        assert!(get("America//New_York").is_err());
        assert!(get("Not A Zone").is_err());
    }

    #[test]
    fn unknown_zone_is_a_load_error() {
        let err = TimeZone::get("Definitely/Not_A_Zone").unwrap_err();
        assert!(err.is_load());
    }

    // This test only does real work on systems that actually have a
    // zoneinfo database. It parses every TZif file it can find, checking
    // that nothing panics or errors.
    #[test]
    fn system_zoneinfo_sweep() {
        const TZDIR: &str = "/usr/share/zoneinfo";

        for result in walkdir::WalkDir::new(TZDIR) {
            // Skip anything unreadable; the directory may simply not exist.
            let Ok(entry) = result else { continue };
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(data) = std::fs::read(entry.path()) else { continue };
            if !data.starts_with(b"TZif") {
                continue;
            }
            let name = entry
                .path()
                .strip_prefix(TZDIR)
                .expect("all paths in TZDIR have the TZDIR prefix")
                .to_str()
                .expect("zoneinfo paths are valid UTF-8");
            if let Err(err) = TimeZone::tzif(name, &data) {
                panic!("failed to parse TZif file {:?}: {err}", entry.path());
            }
        }
    }

    #[test]
    fn load_by_name_when_database_exists() {
        if !Path::new("/usr/share/zoneinfo/America/New_York").exists() {
            return;
        }
        let tz = TimeZone::get("America/New_York").unwrap();
        assert_eq!(tz.name(), "America/New_York");
        // 2015-07-04 was EDT.
        let lookup =
            tz.lookup(crate::instant::Instant::from_second(1_436_011_200));
        assert_eq!(lookup.offset.seconds(), -4 * 3_600);
    }
}

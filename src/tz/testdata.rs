/*!
In-memory TZif images for tests.

Tests must not depend on the host's tzdata, so the zones used by the worked
examples (a New York lookalike with its 2014-2016 transitions and a Tehran
lookalike covering its late-1970s offset changes) are serialized here from
first principles. The images are well-formed version 2 TZif: a minimal
legacy block, a 64-bit data block and a footer.
*/

use alloc::{string::String, vec::Vec};

use crate::tz::TimeZone;

struct ZoneSpec {
    /// `(utoff_seconds, is_dst, designation)`
    types: &'static [(i32, bool, &'static str)],
    /// `(at_second, type_index)`, strictly increasing by `at_second`
    transitions: &'static [(i64, u8)],
    /// TZ string for the footer; empty means "no rule".
    footer: &'static str,
}

const NEW_YORK: ZoneSpec = ZoneSpec {
    types: &[(-18_000, false, "EST"), (-14_400, true, "EDT")],
    transitions: &[
        (1_394_348_400, 1), // 2014-03-09T07:00:00Z, EDT begins
        (1_414_908_000, 0), // 2014-11-02T06:00:00Z, EST begins
        (1_425_798_000, 1), // 2015-03-08T07:00:00Z
        (1_446_357_600, 0), // 2015-11-01T06:00:00Z
        (1_457_852_400, 1), // 2016-03-13T07:00:00Z
        (1_478_412_000, 0), // 2016-11-06T06:00:00Z
    ],
    footer: "EST5EDT,M3.2.0,M11.1.0",
};

const TEHRAN: ZoneSpec = ZoneSpec {
    types: &[(12_600, false, "+0330"), (14_400, false, "+04")],
    transitions: &[
        (247_190_400, 1), // 1977-11-01T00:00:00Z, +04 begins
        (283_996_800, 0), // 1979-01-01T00:00:00Z, back to +0330
    ],
    footer: "<+0330>-3:30",
};

pub(crate) fn new_york_bytes() -> Vec<u8> {
    serialize(&NEW_YORK)
}

pub(crate) fn tehran_bytes() -> Vec<u8> {
    serialize(&TEHRAN)
}

pub(crate) fn new_york() -> TimeZone {
    TimeZone::tzif("America/New_York", &new_york_bytes()).unwrap()
}

pub(crate) fn tehran() -> TimeZone {
    TimeZone::tzif("Asia/Tehran", &tehran_bytes()).unwrap()
}

/// Like `new_york_bytes`, but with the first two transitions swapped, which
/// violates the strictly-increasing invariant.
pub(crate) fn new_york_bytes_with_swapped_transitions() -> Vec<u8> {
    let mut transitions = NEW_YORK.transitions.to_vec();
    transitions.swap(0, 1);
    serialize(&ZoneSpec {
        transitions: transitions.leak(),
        ..NEW_YORK
    })
}

/// Like `new_york_bytes`, but with an empty footer.
pub(crate) fn new_york_bytes_without_footer() -> Vec<u8> {
    serialize(&ZoneSpec { footer: "", ..NEW_YORK })
}

fn serialize(spec: &ZoneSpec) -> Vec<u8> {
    let mut out = Vec::new();

    // The legacy 32-bit section. Parsers of version 2+ data only use it to
    // find the 64-bit section, so a minimal single-type block suffices.
    push_header(&mut out, 0, 0, 0, 0, 1, 4);
    out.extend_from_slice(&0u32.to_be_bytes()); // utoff
    out.push(0); // is_dst
    out.push(0); // desigidx
    out.extend_from_slice(b"UTC\0");

    // Designations: each abbreviation NUL-terminated, indices in type order.
    let mut designations = String::new();
    let mut desigidx = Vec::new();
    for &(_, _, abbrev) in spec.types {
        desigidx.push(designations.len() as u8);
        designations.push_str(abbrev);
        designations.push('\0');
    }

    push_header(
        &mut out,
        0,
        0,
        0,
        spec.transitions.len(),
        spec.types.len(),
        designations.len(),
    );
    for &(at, _) in spec.transitions {
        out.extend_from_slice(&at.to_be_bytes());
    }
    for &(_, type_index) in spec.transitions {
        out.push(type_index);
    }
    for (i, &(utoff, is_dst, _)) in spec.types.iter().enumerate() {
        out.extend_from_slice(&utoff.to_be_bytes());
        out.push(u8::from(is_dst));
        out.push(desigidx[i]);
    }
    out.extend_from_slice(designations.as_bytes());

    out.push(b'\n');
    out.extend_from_slice(spec.footer.as_bytes());
    out.push(b'\n');
    out
}

fn push_header(
    out: &mut Vec<u8>,
    isutcnt: usize,
    isstdcnt: usize,
    leapcnt: usize,
    timecnt: usize,
    typecnt: usize,
    charcnt: usize,
) {
    out.extend_from_slice(b"TZif");
    out.push(b'2');
    out.extend_from_slice(&[0; 15]);
    for count in [isutcnt, isstdcnt, leapcnt, timecnt, typecnt, charcnt] {
        out.extend_from_slice(&(count as u32).to_be_bytes());
    }
}

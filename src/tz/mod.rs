/*!
Time zones: converting between absolute instants and civil times.

A [`TimeZone`] is an immutable value pairing a name with a per-region
history of UTC offset transitions. It answers two questions:

* Given an [`Instant`], what did the local clock read? This direction is
  total and exact: [`TimeZone::lookup`] always returns exactly one answer.
* Given a local clock reading (a [`CivilSecond`]), which instant was it?
  This direction can be ambiguous around DST transitions, so
  [`TimeZone::lookup_civil`] returns a [`CivilLookup`] that classifies the
  input as [`Unique`](CivilKind::Unique), [`Skipped`](CivilKind::Skipped)
  (the clock jumped over it) or [`Repeated`](CivilKind::Repeated) (the
  clock showed it twice), together with all candidate instants. Ambiguity is
  data, never an error.

Time zones are cheap to clone (the transition table is shared) and safe to
use from any number of threads at once.

```
use civtz::{civil::CivilSecond, tz::CivilKind, TimeZone};

let tz = TimeZone::posix("EST5EDT,M3.2.0,M11.1.0")?;
// 02:30 did not exist on 2015-03-08: the clock jumped from 02:00 to 03:00.
let lookup = tz.lookup_civil(CivilSecond::new(2015, 3, 8, 2, 30, 0));
assert_eq!(lookup.kind, CivilKind::Skipped);
# Ok::<(), civtz::Error>(())
```
*/

use alloc::{boxed::Box, string::ToString, sync::Arc};

use crate::{
    civil::CivilSecond,
    error::{err, Error},
    instant::Instant,
};

use self::{posix::PosixTimeZone, tzif::Tzif};

pub use self::offset::{Dst, Offset};

mod offset;
mod posix;
#[cfg(test)]
pub(crate) mod testdata;
mod tzif;
#[cfg(feature = "tzdb-zoneinfo")]
mod zoneinfo;

/// A time zone: a mapping between absolute instants and civil times for one
/// named region.
///
/// The cheapest way to get one is [`TimeZone::UTC`]. Zones with real
/// transition histories come from [`TimeZone::get`] (by IANA name, e.g.
/// `America/New_York`), from [`TimeZone::tzif`] (raw TZif bytes obtained
/// elsewhere), or from [`TimeZone::posix`] (a POSIX rule string like
/// `EST5EDT,M3.2.0,M11.1.0`). [`TimeZone::system`] returns the host's
/// configured zone, falling back to UTC when detection fails.
///
/// A `TimeZone` is immutable. Cloning it only bumps a reference count, and
/// every operation takes `&self`, so values can be freely shared across
/// threads. Loading is the only operation that can fail or block; if the
/// same zone is needed repeatedly, load it once and clone the value (this
/// crate deliberately does not maintain a global cache).
#[derive(Clone)]
pub struct TimeZone {
    /// `None` is UTC. This is what allows `TimeZone::UTC` to be `const`:
    /// everything else carries its transition data behind an `Arc`. UTC
    /// behaves exactly like a single-entry zero-offset table; lookups go
    /// through the same dispatch as every other kind.
    kind: Option<Arc<TimeZoneKind>>,
}

impl TimeZone {
    /// The UTC time zone: offset zero for every instant, never DST, with
    /// the abbreviation `"UTC"`.
    pub const UTC: TimeZone = TimeZone { kind: None };

    /// Creates a time zone with a fixed offset and no transitions.
    ///
    /// The zone is named after the offset, e.g. `+05:30`. A zero offset
    /// returns [`TimeZone::UTC`].
    pub fn fixed(offset: Offset) -> TimeZone {
        if offset == Offset::UTC {
            return TimeZone::UTC;
        }
        let fixed = TimeZoneFixed::new(offset);
        let kind = TimeZoneKind::Fixed(fixed);
        TimeZone { kind: Some(Arc::new(kind)) }
    }

    /// Creates a time zone from a POSIX TZ rule string, e.g.
    /// `EST5EDT,M3.2.0,M11.1.0`.
    ///
    /// Such a zone has no explicit transition history: its (possibly DST
    /// adjusted) offset is computed from the rule for any year, arbitrarily
    /// far into the past or future.
    pub fn posix(posix_tz_string: &str) -> Result<TimeZone, Error> {
        let posix = TimeZonePosix::new(posix_tz_string)
            .map_err(|e| {
                e.context(err!(
                    "failed to build time zone from POSIX TZ string \
                     {posix_tz_string:?}",
                ))
                .load()
            })?;
        let kind = TimeZoneKind::Posix(posix);
        Ok(TimeZone { kind: Some(Arc::new(kind)) })
    }

    /// Creates a time zone from TZif formatted bytes, as found in
    /// `/usr/share/zoneinfo` files or produced by `zic`.
    ///
    /// The name given is used only for reporting; the data is not required
    /// to match it. Construction fails on malformed data and never produces
    /// a partially built zone.
    pub fn tzif(name: &str, data: &[u8]) -> Result<TimeZone, Error> {
        let tzif = TimeZoneTzif::new(name, data).map_err(|e| {
            e.context(err!("failed to build time zone {name:?} from TZif data"))
                .load()
        })?;
        let kind = TimeZoneKind::Tzif(tzif);
        Ok(TimeZone { kind: Some(Arc::new(kind)) })
    }

    /// Loads a time zone by IANA name from the system zoneinfo database.
    ///
    /// The directories searched are `$TZDIR`, `/usr/share/zoneinfo` and
    /// `/etc/zoneinfo`, in that order. Loading reads and parses the zone's
    /// file on every call; memoize the returned value if that matters.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use civtz::TimeZone;
    ///
    /// let tz = TimeZone::get("America/New_York")?;
    /// assert_eq!(tz.name(), "America/New_York");
    /// # Ok::<(), civtz::Error>(())
    /// ```
    #[cfg(feature = "tzdb-zoneinfo")]
    pub fn get(name: &str) -> Result<TimeZone, Error> {
        zoneinfo::get(name).map_err(|e| e.load())
    }

    /// Returns the system's configured time zone, or UTC when it cannot be
    /// determined.
    ///
    /// Detection consults the `TZ` environment variable (a zone name, an
    /// absolute path to a TZif file, or a POSIX rule string) and then
    /// `/etc/localtime`. This never fails; failures are logged (when the
    /// `logging` feature is enabled) and UTC is returned instead.
    #[cfg(feature = "std")]
    pub fn system() -> TimeZone {
        match system::detect() {
            Ok(tz) => tz,
            Err(_err) => {
                warn!(
                    "failed to detect system time zone, falling back \
                     to UTC: {_err}",
                );
                TimeZone::UTC
            }
        }
    }

    /// Returns the name of this time zone.
    ///
    /// For zones loaded by name this is the IANA identifier; for fixed
    /// zones it is the rendered offset; for POSIX rule zones it is the rule
    /// string itself.
    pub fn name(&self) -> &str {
        let Some(ref kind) = self.kind else { return "UTC" };
        match **kind {
            TimeZoneKind::Fixed(ref tz) => tz.name(),
            TimeZoneKind::Posix(ref tz) => tz.name(),
            TimeZoneKind::Tzif(ref tz) => tz.name(),
        }
    }

    /// Decomposes the given instant into the civil time, offset, DST status
    /// and abbreviation in effect in this zone.
    ///
    /// This is a total function: every instant has exactly one
    /// decomposition in every zone. There is no ambiguity in this
    /// direction.
    ///
    /// # Example
    ///
    /// ```
    /// use civtz::{civil::CivilSecond, Instant, TimeZone};
    ///
    /// let tz = TimeZone::posix("EST5EDT,M3.2.0,M11.1.0")?;
    /// let lookup = tz.lookup(Instant::from_second(1_425_798_000));
    /// assert_eq!(lookup.cs, CivilSecond::new(2015, 3, 8, 3, 0, 0));
    /// assert_eq!(lookup.offset.seconds(), -4 * 3_600);
    /// assert!(lookup.dst.is_dst());
    /// assert_eq!(lookup.abbreviation, "EDT");
    /// # Ok::<(), civtz::Error>(())
    /// ```
    pub fn lookup(&self, t: Instant) -> InstantLookup<'_> {
        let (offset, dst, abbreviation) = self.to_offset_info(t);
        InstantLookup { cs: offset.to_civil(t), offset, dst, abbreviation }
    }

    /// Resolves the given civil time to the instant (or instants) it could
    /// denote in this zone.
    ///
    /// See [`CivilLookup`] for how to interpret the result, and
    /// [`TimeZone::to_instant`] for the common single-answer conversion.
    pub fn lookup_civil(&self, cs: CivilSecond) -> CivilLookup {
        let ambiguous = match self.kind {
            None => AmbiguousOffset::Unambiguous { offset: Offset::UTC },
            Some(ref kind) => match **kind {
                TimeZoneKind::Fixed(ref tz) => {
                    AmbiguousOffset::Unambiguous { offset: tz.offset() }
                }
                TimeZoneKind::Posix(ref tz) => tz.to_ambiguous(cs),
                TimeZoneKind::Tzif(ref tz) => tz.to_ambiguous(cs),
            },
        };
        CivilLookup::new(cs, ambiguous)
    }

    /// Shorthand for the civil time field of [`TimeZone::lookup`].
    pub fn to_civil(&self, t: Instant) -> CivilSecond {
        let (offset, _, _) = self.to_offset_info(t);
        offset.to_civil(t)
    }

    /// Converts a civil time to an instant, resolving ambiguity with the
    /// order-preserving default: a skipped civil time maps to the
    /// transition instant itself, and a repeated one maps to its earlier
    /// occurrence.
    ///
    /// This guarantees that `a <= b` implies
    /// `tz.to_instant(a) <= tz.to_instant(b)` for any two civil times and
    /// any zone.
    pub fn to_instant(&self, cs: CivilSecond) -> Instant {
        self.lookup_civil(cs).instant()
    }

    fn to_offset_info(&self, t: Instant) -> (Offset, Dst, &str) {
        let Some(ref kind) = self.kind else {
            return (Offset::UTC, Dst::No, "UTC");
        };
        match **kind {
            TimeZoneKind::Fixed(ref tz) => (tz.offset(), Dst::No, tz.name()),
            TimeZoneKind::Posix(ref tz) => tz.to_offset_info(t),
            TimeZoneKind::Tzif(ref tz) => tz.to_offset_info(t),
        }
    }

    fn fixed_offset(&self) -> Option<Offset> {
        let Some(ref kind) = self.kind else { return Some(Offset::UTC) };
        match **kind {
            TimeZoneKind::Fixed(ref tz) => Some(tz.offset()),
            _ => None,
        }
    }
}

impl core::fmt::Debug for TimeZone {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let field: &dyn core::fmt::Debug = match self.kind {
            None => &"UTC",
            Some(ref kind) => match &**kind {
                TimeZoneKind::Fixed(ref tz) => tz,
                TimeZoneKind::Posix(ref tz) => tz,
                TimeZoneKind::Tzif(ref tz) => tz,
            },
        };
        f.debug_tuple("TimeZone").field(field).finish()
    }
}

impl Eq for TimeZone {}

/// Two time zones compare equal when they are guaranteed to produce the
/// same offsets for all instants: either both are the same fixed offset, or
/// they share the same underlying transition table.
///
/// The converse does not hold; two independently loaded copies of the same
/// zone compare unequal even though they behave identically.
impl PartialEq for TimeZone {
    fn eq(&self, rhs: &TimeZone) -> bool {
        match (self.fixed_offset(), rhs.fixed_offset()) {
            (Some(off1), Some(off2)) => return off1 == off2,
            (None, Some(_)) | (Some(_), None) => return false,
            (None, None) => {}
        }
        // Neither is fixed, so both kinds are necessarily `Some`.
        Arc::ptr_eq(self.kind.as_ref().unwrap(), rhs.kind.as_ref().unwrap())
    }
}

#[derive(Debug)]
enum TimeZoneKind {
    Fixed(TimeZoneFixed),
    Posix(TimeZonePosix),
    Tzif(TimeZoneTzif),
}

#[derive(Clone)]
struct TimeZoneFixed {
    offset: Offset,
    name: Box<str>,
}

impl TimeZoneFixed {
    fn new(offset: Offset) -> TimeZoneFixed {
        let name = offset.to_string().into();
        TimeZoneFixed { offset, name }
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn offset(&self) -> Offset {
        self.offset
    }
}

impl core::fmt::Debug for TimeZoneFixed {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.debug_tuple("Fixed").field(&self.offset()).finish()
    }
}

struct TimeZonePosix {
    name: Box<str>,
    posix: PosixTimeZone,
}

impl TimeZonePosix {
    fn new(s: &str) -> Result<TimeZonePosix, Error> {
        let posix = PosixTimeZone::parse(s.as_bytes())?;
        Ok(TimeZonePosix { name: s.to_string().into(), posix })
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn to_offset_info(&self, t: Instant) -> (Offset, Dst, &str) {
        self.posix.to_offset_info(t)
    }

    fn to_ambiguous(&self, cs: CivilSecond) -> AmbiguousOffset {
        self.posix.to_ambiguous(cs)
    }
}

// Implemented by hand because dumping the parsed rule internals is too much
// noise; the rule string itself says everything.
impl core::fmt::Debug for TimeZonePosix {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.debug_tuple("Posix").field(&self.posix).finish()
    }
}

struct TimeZoneTzif {
    tzif: Tzif,
}

impl TimeZoneTzif {
    fn new(name: &str, bytes: &[u8]) -> Result<TimeZoneTzif, Error> {
        let tzif = Tzif::parse(Some(name.to_string()), bytes)?;
        Ok(TimeZoneTzif { tzif })
    }

    fn name(&self) -> &str {
        self.tzif.name().unwrap_or("Local")
    }

    fn to_offset_info(&self, t: Instant) -> (Offset, Dst, &str) {
        self.tzif.to_offset_info(t)
    }

    fn to_ambiguous(&self, cs: CivilSecond) -> AmbiguousOffset {
        self.tzif.to_ambiguous(cs)
    }
}

// Implemented by hand because dumping all TZif data is too much noise.
impl core::fmt::Debug for TimeZoneTzif {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.debug_tuple("Tzif").field(&self.name()).finish()
    }
}

/// The exact decomposition of one instant in one time zone.
///
/// Returned by [`TimeZone::lookup`]. The abbreviation borrows from the time
/// zone it came from.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct InstantLookup<'t> {
    /// The civil time the local clock read at the instant.
    pub cs: CivilSecond,
    /// The offset from UTC in effect.
    pub offset: Offset,
    /// Whether daylight saving time was in effect.
    pub dst: Dst,
    /// The abbreviation in effect, e.g. `EST` or `EDT`.
    pub abbreviation: &'t str,
}

/// How a civil time relates to the offset transitions around it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CivilKind {
    /// Exactly one offset applies; the civil time denotes exactly one
    /// instant.
    Unique,
    /// The civil time fell in a gap (e.g. "spring forward") and was never
    /// shown by any clock in the zone.
    Skipped,
    /// The civil time fell in a fold (e.g. "fall back") and was shown
    /// twice.
    Repeated,
}

/// The result of resolving a civil time in a time zone.
///
/// Returned by [`TimeZone::lookup_civil`]. All three candidate instants are
/// always populated:
///
/// * For [`Unique`](CivilKind::Unique), `pre == trans == post`.
/// * For [`Skipped`](CivilKind::Skipped), `pre` reads the civil time under
///   the offset in effect before the transition, `post` under the offset
///   after it, and `trans` is the instant of the transition itself (the
///   first valid instant at or after the gap).
/// * For [`Repeated`](CivilKind::Repeated), `pre` is the earlier of the two
///   instants the clock showed the civil time, `post` the later, and
///   `trans` the instant of the transition between them.
///
/// [`CivilLookup::instant`] picks the order-preserving default.
///
/// # Example
///
/// ```
/// use civtz::{civil::CivilSecond, tz::CivilKind, TimeZone};
///
/// let tz = TimeZone::posix("EST5EDT,M3.2.0,M11.1.0")?;
/// // 01:30 happened twice on 2015-11-01.
/// let lookup = tz.lookup_civil(CivilSecond::new(2015, 11, 1, 1, 30, 0));
/// assert_eq!(lookup.kind, CivilKind::Repeated);
/// assert_eq!(lookup.trans.second() - lookup.pre.second(), 30 * 60);
/// assert_eq!(lookup.post.second() - lookup.pre.second(), 3_600);
/// # Ok::<(), civtz::Error>(())
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct CivilLookup {
    /// The classification of the civil time.
    pub kind: CivilKind,
    /// The civil time read under the pre-transition offset.
    pub pre: Instant,
    /// The instant of the bracketing transition itself.
    pub trans: Instant,
    /// The civil time read under the post-transition offset.
    pub post: Instant,
}

impl CivilLookup {
    fn new(cs: CivilSecond, ambiguous: AmbiguousOffset) -> CivilLookup {
        match ambiguous {
            AmbiguousOffset::Unambiguous { offset } => {
                let t = offset.to_instant(cs);
                CivilLookup { kind: CivilKind::Unique, pre: t, trans: t, post: t }
            }
            AmbiguousOffset::Gap { before, after, at } => CivilLookup {
                kind: CivilKind::Skipped,
                pre: before.to_instant(cs),
                trans: Instant::from_second(at),
                post: after.to_instant(cs),
            },
            AmbiguousOffset::Fold { before, after, at } => CivilLookup {
                kind: CivilKind::Repeated,
                pre: before.to_instant(cs),
                trans: Instant::from_second(at),
                post: after.to_instant(cs),
            },
        }
    }

    /// Returns the default instant for this lookup: `trans` for a skipped
    /// civil time and `pre` otherwise.
    ///
    /// This choice preserves ordering: converting any two civil times
    /// `a <= b` through it yields instants that are not out of order.
    pub fn instant(&self) -> Instant {
        match self.kind {
            CivilKind::Unique | CivilKind::Repeated => self.pre,
            CivilKind::Skipped => self.trans,
        }
    }
}

/// The offset(s) that could apply to a particular civil time, as determined
/// by the transition table or rule that covers it.
///
/// `at` is the instant of the bracketing transition, used to populate
/// [`CivilLookup::trans`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum AmbiguousOffset {
    Unambiguous { offset: Offset },
    Gap { before: Offset, after: Offset, at: i64 },
    Fold { before: Offset, after: Offset, at: i64 },
}

#[cfg(feature = "std")]
mod system {
    use alloc::{borrow::ToOwned, string::String};

    use crate::error::{err, Error, ErrorContext};

    use super::TimeZone;

    /// Detects the system time zone from `$TZ` and `/etc/localtime`.
    pub(super) fn detect() -> Result<TimeZone, Error> {
        if let Some(tz) = std::env::var_os("TZ") {
            let Some(tz) = tz.to_str().map(ToOwned::to_owned) else {
                return Err(err!("TZ environment variable is not valid UTF-8"));
            };
            return from_tz_env(&tz)
                .with_context(|| err!("failed to interpret TZ={tz:?}"));
        }
        etc_localtime()
    }

    fn from_tz_env(value: &str) -> Result<TimeZone, Error> {
        // A leading ':' means "definitely not a POSIX rule string."
        let (require_name, value) = match value.strip_prefix(':') {
            Some(rest) => (true, rest),
            None => (false, value),
        };
        if value == "UTC" {
            return Ok(TimeZone::UTC);
        }
        if value.starts_with('/') {
            let data = std::fs::read(value)
                .map_err(|e| err!("failed to read {value}: {e}"))?;
            return TimeZone::tzif(value, &data);
        }
        if !require_name {
            if let Ok(tz) = TimeZone::posix(value) {
                return Ok(tz);
            }
        }
        get_by_name(value)
    }

    fn etc_localtime() -> Result<TimeZone, Error> {
        const PATH: &str = "/etc/localtime";

        // When /etc/localtime is the conventional symlink into a zoneinfo
        // directory, recover the IANA name from its target so that the
        // returned zone is properly named.
        if let Ok(target) = std::fs::read_link(PATH) {
            if let Some(name) = iana_name_from_path(&target) {
                debug!("resolved {PATH} symlink to time zone {name}");
                return get_by_name(&name);
            }
        }
        let data = std::fs::read(PATH)
            .map_err(|e| err!("failed to read {PATH}: {e}"))?;
        TimeZone::tzif("Local", &data)
    }

    fn iana_name_from_path(path: &std::path::Path) -> Option<String> {
        let path = path.to_str()?;
        let (_, name) = path.rsplit_once("zoneinfo/")?;
        Some(name.to_owned())
    }

    #[cfg(feature = "tzdb-zoneinfo")]
    fn get_by_name(name: &str) -> Result<TimeZone, Error> {
        super::zoneinfo::get(name)
    }

    #[cfg(not(feature = "tzdb-zoneinfo"))]
    fn get_by_name(name: &str) -> Result<TimeZone, Error> {
        Err(err!(
            "cannot look up time zone {name:?}: crate was built without \
             the tzdb-zoneinfo feature",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utc_identity() {
        for &second in
            &[0i64, 1_425_798_000, -5_000_000_000, 253_402_300_799]
        {
            let lookup = TimeZone::UTC.lookup(Instant::from_second(second));
            assert_eq!(lookup.offset, Offset::UTC);
            assert_eq!(lookup.dst, Dst::No);
            assert_eq!(lookup.abbreviation, "UTC");
        }
        assert_eq!(TimeZone::UTC.name(), "UTC");
    }

    #[test]
    fn fixed_zone() {
        let tz = TimeZone::fixed(Offset::from_seconds(12_600).unwrap());
        assert_eq!(tz.name(), "+03:30");
        let lookup = tz.lookup(Instant::from_second(0));
        assert_eq!(lookup.cs, CivilSecond::new(1970, 1, 1, 3, 30, 0));
        assert_eq!(lookup.abbreviation, "+03:30");
        // Fixed zones are never ambiguous.
        let lookup = tz.lookup_civil(CivilSecond::new(2015, 3, 8, 2, 30, 0));
        assert_eq!(lookup.kind, CivilKind::Unique);
        // A zero offset is UTC itself.
        assert_eq!(TimeZone::fixed(Offset::UTC), TimeZone::UTC);
    }

    #[test]
    fn skipped_civil_time() {
        let tz = testdata::new_york();
        let cs = CivilSecond::new(2015, 3, 8, 2, 30, 0);
        let lookup = tz.lookup_civil(cs);
        assert_eq!(lookup.kind, CivilKind::Skipped);
        // trans: 2015-03-08T03:00:00-04:00
        assert_eq!(lookup.trans, Instant::from_second(1_425_798_000));
        // pre: the input read under -05, i.e. 03:30:00-04:00
        assert_eq!(lookup.pre, Instant::from_second(1_425_799_800));
        // post: the input read under -04, i.e. 01:30:00-05:00
        assert_eq!(lookup.post, Instant::from_second(1_425_796_200));
        // The convenience conversion picks the transition instant.
        assert_eq!(tz.to_instant(cs), lookup.trans);

        // Decoding the candidates produces the civil times around the gap.
        assert_eq!(
            tz.to_civil(lookup.trans),
            CivilSecond::new(2015, 3, 8, 3, 0, 0),
        );
        assert_eq!(
            tz.to_civil(lookup.pre),
            CivilSecond::new(2015, 3, 8, 3, 30, 0),
        );
        assert_eq!(
            tz.to_civil(lookup.post),
            CivilSecond::new(2015, 3, 8, 1, 30, 0),
        );
    }

    #[test]
    fn repeated_civil_time() {
        let tz = testdata::new_york();
        let cs = CivilSecond::new(2015, 11, 1, 1, 30, 0);
        let lookup = tz.lookup_civil(cs);
        assert_eq!(lookup.kind, CivilKind::Repeated);
        // pre: 01:30:00-04:00, the earlier occurrence
        assert_eq!(lookup.pre, Instant::from_second(1_446_355_800));
        // trans: 01:00:00-05:00, the instant the clocks fell back
        assert_eq!(lookup.trans, Instant::from_second(1_446_357_600));
        // post: 01:30:00-05:00, the later occurrence
        assert_eq!(lookup.post, Instant::from_second(1_446_359_400));
        // The convenience conversion picks the earlier occurrence.
        assert_eq!(tz.to_instant(cs), lookup.pre);

        // Both occurrences decode back to the input.
        assert_eq!(tz.to_civil(lookup.pre), cs);
        assert_eq!(tz.to_civil(lookup.post), cs);
    }

    #[test]
    fn unique_roundtrip() {
        let tz = testdata::new_york();
        let cs = CivilSecond::new(2015, 6, 1, 12, 34, 56);
        let lookup = tz.lookup_civil(cs);
        assert_eq!(lookup.kind, CivilKind::Unique);
        assert_eq!(lookup.pre, lookup.trans);
        assert_eq!(lookup.trans, lookup.post);
        assert_eq!(tz.to_civil(lookup.pre), cs);
    }

    #[test]
    fn lookup_is_exact_at_transition_edges() {
        let tz = testdata::new_york();
        // The last instant of EST before the 2015 spring transition.
        let lookup = tz.lookup(Instant::from_second(1_425_797_999));
        assert_eq!(lookup.cs, CivilSecond::new(2015, 3, 8, 1, 59, 59));
        assert_eq!(lookup.abbreviation, "EST");
        // The first instant of EDT.
        let lookup = tz.lookup(Instant::from_second(1_425_798_000));
        assert_eq!(lookup.cs, CivilSecond::new(2015, 3, 8, 3, 0, 0));
        assert_eq!(lookup.abbreviation, "EDT");
    }

    #[test]
    fn convenience_conversion_is_monotonic() {
        let tz = testdata::new_york();
        // A sweep across the gap: civil times in order must convert to
        // instants in order (with ties allowed inside the gap).
        let mut prev = None;
        for minute in 0..180 {
            let cs = CivilSecond::new(2015, 3, 8, 1, 0, 0) + minute * 60;
            let t = tz.to_instant(cs);
            if let Some(prev) = prev {
                assert!(prev <= t, "not monotonic at {cs}");
            }
            prev = Some(t);
        }
        // And across the fold.
        let mut prev = None;
        for minute in 0..180 {
            let cs = CivilSecond::new(2015, 11, 1, 0, 0, 0) + minute * 60;
            let t = tz.to_instant(cs);
            if let Some(prev) = prev {
                assert!(prev <= t, "not monotonic at {cs}");
            }
            prev = Some(t);
        }
    }

    #[test]
    fn posix_zone_matches_tzif_zone() {
        // The test New York table and its footer rule agree wherever the
        // explicit transitions exist, and past their end the footer takes
        // over seamlessly.
        let tzif = testdata::new_york();
        let posix = TimeZone::posix("EST5EDT,M3.2.0,M11.1.0").unwrap();
        for &second in &[
            1_394_348_399,
            1_394_348_400,
            1_446_357_599,
            1_446_357_600,
            2_000_000_000, // 2033: past the explicit transitions
        ] {
            let t = Instant::from_second(second);
            let a = tzif.lookup(t);
            let b = posix.lookup(t);
            assert_eq!(a.cs, b.cs, "at second {second}");
            assert_eq!(a.offset, b.offset, "at second {second}");
            assert_eq!(a.dst, b.dst, "at second {second}");
        }
    }

    #[test]
    fn time_zone_equality() {
        let ny = testdata::new_york();
        assert_eq!(ny, ny.clone());
        assert_ne!(ny, testdata::tehran());
        // Two separately loaded copies are distinct values.
        assert_ne!(ny, testdata::new_york());
        assert_eq!(
            TimeZone::fixed(Offset::constant(3)),
            TimeZone::fixed(Offset::constant(3)),
        );
        assert_ne!(TimeZone::fixed(Offset::constant(3)), TimeZone::UTC);
    }

    quickcheck::quickcheck! {
        fn prop_monotonic(a: i64, b: i64) -> bool {
            // Bias the samples toward a window around the test zone's
            // transitions so the gap and fold actually get exercised.
            let a = 1_390_000_000 + a.rem_euclid(100_000_000);
            let b = 1_390_000_000 + b.rem_euclid(100_000_000);
            let tz = testdata::new_york();
            let (ca, cb) = (
                CivilSecond::from_epoch_second(a),
                CivilSecond::from_epoch_second(b),
            );
            let (lo, hi) = if ca <= cb { (ca, cb) } else { (cb, ca) };
            tz.to_instant(lo) <= tz.to_instant(hi)
        }

        fn prop_absolute_lookup_roundtrips(second: i64) -> bool {
            let second = second.rem_euclid(4_000_000_000);
            let tz = testdata::new_york();
            let t = Instant::from_second(second);
            let lookup = tz.lookup(t);
            // Re-encoding the civil time under the reported offset gets
            // back the original instant.
            lookup.offset.to_instant(lookup.cs) == t
        }
    }
}

/*!
Support for TZif binary files from the [Time Zone Database].

These binary files are the ones commonly found in Unix distributions in the
`/usr/share/zoneinfo` directory. The format is described by RFC 8536. This
module only deals with parsing the contents of TZif formatted data in memory
and turning it into a transition table that lookups can binary search; where
the bytes come from is the caller's concern.

[Time Zone Database]: https://www.iana.org/time-zones
*/

use alloc::{string::String, vec::Vec};
use core::ops::Range;

use crate::{
    civil::CivilSecond,
    error::{err, Error, ErrorContext},
    instant::Instant,
    tz::{posix::PosixTimeZone, AmbiguousOffset, Dst, Offset},
};

/// A time zone's transition table, parsed from TZif data.
///
/// The table is immutable once built. It always contains at least one
/// transition: a sentinel at the minimum representable instant carrying the
/// pre-first-transition local time type, which makes "before the first
/// explicit entry" lookups take the same path as every other lookup.
///
/// For instants past the last explicit transition, behavior is fixed at
/// construction time: when the TZif footer carries a TZ rule string, that
/// rule is evaluated; otherwise the last explicit entry's offset repeats
/// indefinitely.
#[derive(Debug)]
pub(crate) struct Tzif {
    name: Option<String>,
    /// An ASCII byte corresponding to the version number. So, 0x32 is '2'.
    version: u8,
    designations: String,
    posix_tz: Option<PosixTimeZone>,
    types: Vec<LocalTimeType>,
    transitions: Vec<Transition>,
}

impl Tzif {
    /// Parses the given data as a TZif formatted file.
    ///
    /// The name given is attached to the `Tzif` value returned, but is
    /// otherwise not significant.
    ///
    /// It is safe to pass arbitrary or untrusted data to this function:
    /// failures are reported as errors, never as panics, and resource usage
    /// is bounded by a small constant factor of the size of the data.
    pub(crate) fn parse(
        name: Option<String>,
        bytes: &[u8],
    ) -> Result<Tzif, Error> {
        let (header, rest) = Header::parse(bytes)
            .with_context(|| err!("failed to parse TZif header"))?;
        if header.version == 0 {
            let block = DataBlock::split(&header, rest, 4)?;
            Tzif::from_data(name, &header, block, None)
        } else {
            // Version 2+ data repeats everything with 64-bit transition
            // times after the legacy 32-bit section. The legacy section is
            // only needed to find where the real data starts.
            let legacy_len = header.data_len(4)?;
            if rest.len() < legacy_len {
                return Err(err!(
                    "expected {legacy_len} bytes of legacy v1 data, \
                     but only {} remain",
                    rest.len(),
                ));
            }
            let rest = &rest[legacy_len..];
            let (header64, rest) = Header::parse(rest)
                .with_context(|| err!("failed to parse second TZif header"))?;
            let block = DataBlock::split(&header64, rest, 8)?;
            let footer = parse_footer(block.rest)?;
            Tzif::from_data(name, &header64, block, footer)
        }
    }

    fn from_data(
        name: Option<String>,
        header: &Header,
        block: DataBlock<'_>,
        posix_tz: Option<PosixTimeZone>,
    ) -> Result<Tzif, Error> {
        let times = block.transition_times()?;
        let type_indices = block.transition_types(header)?;
        let raw_types = block.local_time_types()?;
        let designations = block.designations()?;

        let mut types = Vec::with_capacity(raw_types.len());
        for &(utoff, is_dst, desigidx) in raw_types.iter() {
            let offset = Offset::from_seconds(utoff)
                .context(err!("invalid UTC offset in local time type"))?;
            let start = usize::from(desigidx);
            let end = match designations[start.min(designations.len())..]
                .find('\0')
            {
                Some(i) if start < designations.len() => start + i,
                _ => {
                    return Err(err!(
                        "designation index {desigidx} has no \
                         NUL-terminated string following it",
                    ))
                }
            };
            types.push(LocalTimeType {
                offset,
                is_dst: Dst::from(is_dst),
                designation: start..end,
            });
        }

        // The type in effect before the first transition: the first
        // standard-time type, falling back to the first type. This also
        // backs the sentinel entry, so the table is never empty.
        let first_type = types
            .iter()
            .position(|typ| !typ.is_dst.is_dst())
            .unwrap_or(0);

        let mut transitions = Vec::with_capacity(times.len() + 1);
        transitions.push(Transition::sentinel(
            first_type as u8,
            types[first_type].offset,
        ));
        for (i, &at) in times.iter().enumerate() {
            let prev = &transitions[i];
            if at <= prev.at {
                return Err(err!(
                    "transition times are not strictly increasing at \
                     entry {i} ({at} follows {})",
                    prev.at,
                ));
            }
            let type_index = type_indices[i];
            let prev_offset = types[usize::from(prev.type_index)].offset;
            let this_offset = types[usize::from(type_index)].offset;
            transitions.push(Transition::new(
                at,
                type_index,
                prev_offset,
                this_offset,
            ));
        }

        let tzif = Tzif {
            name,
            version: header.version,
            designations,
            posix_tz,
            types,
            transitions,
        };
        tzif.verify_posix_time_zone_consistency()?;
        Ok(tzif)
    }

    /// Validates that the footer rule (if one exists) is consistent with the
    /// last explicit transition, as RFC 8536 requires: "the string MUST be
    /// consistent with the last version 2+ transition."
    fn verify_posix_time_zone_consistency(&self) -> Result<(), Error> {
        // With only the sentinel present, there is nothing to be consistent
        // with: the rule alone describes the zone.
        if self.transitions.len() <= 1 {
            return Ok(());
        }
        let Some(ref tz) = self.posix_tz else { return Ok(()) };
        let last = self.transitions.last().expect("last transition");
        let typ = self.local_time_type(last);
        let (offset, dst, abbrev) =
            tz.to_offset_info(Instant::from_second(last.at));
        if offset != typ.offset {
            return Err(err!(
                "expected last transition to have offset {expected}, \
                 but the TZ string {tz} gives {offset}",
                expected = typ.offset,
            ));
        }
        if dst != typ.is_dst {
            return Err(err!(
                "expected last transition to have is_dst={expected:?}, \
                 but the TZ string {tz} gives is_dst={dst:?}",
                expected = typ.is_dst,
            ));
        }
        if abbrev != self.designation(typ) {
            return Err(err!(
                "expected last transition to have designation {expected}, \
                 but the TZ string {tz} gives {abbrev}",
                expected = self.designation(typ),
            ));
        }
        Ok(())
    }

    pub(crate) fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the offset, DST status and abbreviation in effect at the
    /// given instant. This is total: every instant resolves to exactly one
    /// answer.
    pub(crate) fn to_offset_info(&self, t: Instant) -> (Offset, Dst, &str) {
        match self.to_local_time_type(t) {
            Ok(typ) => (typ.offset, typ.is_dst, self.designation(typ)),
            Err(tz) => tz.to_offset_info(t),
        }
    }

    /// Returns the local time type for the instant given.
    ///
    /// If the instant lands at or after the last explicit transition and a
    /// footer rule exists, the error variant asks the caller to evaluate
    /// that rule instead.
    fn to_local_time_type(
        &self,
        t: Instant,
    ) -> Result<&LocalTimeType, &PosixTimeZone> {
        // Comparing by whole seconds is correct here even though instants
        // carry nanoseconds: transition times are integral, so an instant
        // with a fractional component compares equal to a transition exactly
        // when it falls inside that transition's first second.
        let search = self
            .transitions
            .binary_search_by_key(&t.second(), |tr| tr.at);
        let index = match search {
            Ok(i) => i,
            // The sentinel sits at the minimum instant, so nothing sorts
            // before index 0; saturating is just belt and suspenders.
            Err(i) => i.saturating_sub(1),
        };
        if index == self.transitions.len() - 1 {
            // RFC 8536: local time at or after the last transition comes
            // from the footer TZ string when one is present. Without one,
            // repeating the last entry is the only deterministic choice.
            if let Some(ref tz) = self.posix_tz {
                return Err(tz);
            }
        }
        Ok(self.local_time_type(&self.transitions[index]))
    }

    /// Classifies the given wall clock time against this table: either it
    /// resolves to exactly one offset, or it falls into the gap or fold
    /// around some transition.
    ///
    /// The search runs on precomputed wall clock boundaries, so no civil
    /// arithmetic happens per lookup.
    pub(crate) fn to_ambiguous(&self, cs: CivilSecond) -> AmbiguousOffset {
        let search = self
            .transitions
            .binary_search_by_key(&cs, |tr| tr.wall.start());
        let index = match search {
            Ok(i) => i,
            Err(i) => i.saturating_sub(1),
        };
        let this = &self.transitions[index];
        let this_offset = self.local_time_type(this).offset;
        // An ambiguous wall time must be checked before deferring to the
        // footer rule: the last explicit transition's own gap or fold is
        // still described by the table, not by the rule.
        match this.wall {
            TransitionWall::Gap { end, .. } if cs < end => {
                // A gap or fold can only exist when there is a previous
                // transition; the sentinel is always unambiguous.
                let prev = &self.transitions[index - 1];
                return AmbiguousOffset::Gap {
                    before: self.local_time_type(prev).offset,
                    after: this_offset,
                    at: this.at,
                };
            }
            TransitionWall::Fold { end, .. } if cs < end => {
                let prev = &self.transitions[index - 1];
                return AmbiguousOffset::Fold {
                    before: self.local_time_type(prev).offset,
                    after: this_offset,
                    at: this.at,
                };
            }
            _ => {}
        }
        if index == self.transitions.len() - 1 {
            if let Some(ref tz) = self.posix_tz {
                return tz.to_ambiguous(cs);
            }
        }
        AmbiguousOffset::Unambiguous { offset: this_offset }
    }

    fn designation(&self, typ: &LocalTimeType) -> &str {
        // OK because every designation range is validated at construction.
        &self.designations[typ.designation.clone()]
    }

    fn local_time_type(&self, transition: &Transition) -> &LocalTimeType {
        // OK because every type index is validated at construction.
        &self.types[usize::from(transition.type_index)]
    }
}

/// A single local time type: an offset from UTC, whether it counts as DST
/// and a range pointing at its abbreviation in the designations string.
#[derive(Debug)]
struct LocalTimeType {
    offset: Offset,
    is_dst: Dst,
    designation: Range<usize>,
}

/// A transition to a different local time type.
#[derive(Debug)]
struct Transition {
    /// The instant (in seconds) at which this transition begins. It remains
    /// in effect up to and not including the next transition.
    at: i64,
    /// The wall clock span at which this transition begins, precomputed so
    /// that civil-direction lookups need no arithmetic. See
    /// [`TransitionWall`].
    wall: TransitionWall,
    /// Index into the local time types.
    type_index: u8,
}

impl Transition {
    /// The table's synthetic first entry, at the minimum instant.
    fn sentinel(type_index: u8, offset: Offset) -> Transition {
        Transition {
            at: i64::MIN,
            wall: TransitionWall::Unambiguous {
                start: wall_civil(i64::MIN, offset),
            },
            type_index,
        }
    }

    fn new(
        at: i64,
        type_index: u8,
        prev_offset: Offset,
        this_offset: Offset,
    ) -> Transition {
        let wall = TransitionWall::new(at, prev_offset, this_offset);
        Transition { at, wall, type_index }
    }
}

/// The wall clock time at which a transition begins.
///
/// The `start` is always the earliest wall clock time that can be associated
/// with the transition: for a gap that means applying the previous offset,
/// for a fold the new one. Binary searching on `start` therefore lands on
/// the right transition for any wall clock input, and ambiguity is then just
/// a comparison against `end`.
///
/// For example, DST in `America/New_York` began at `2015-03-08T07:00:00Z`.
/// The offset changes from `-05` to `-04`, so wall clock times from
/// `02:00:00` (inclusive, under `-05`) to `03:00:00` (exclusive, under
/// `-04`) never appear on a clock: that is the `Gap` span. The fall
/// transition at `2015-11-01T06:00:00Z` changes `-04` to `-05`, and wall
/// clock times from `01:00:00` (under `-05`) to `02:00:00` (under `-04`)
/// appear twice: the `Fold` span.
#[derive(Debug)]
enum TransitionWall {
    /// The offset does not change across this transition, so no wall clock
    /// time near it is ambiguous.
    Unambiguous {
        /// The wall clock time at which this transition begins, inclusive.
        start: CivilSecond,
    },
    /// The offset increases, skipping the span of wall clock time between
    /// `start` (inclusive) and `end` (exclusive).
    Gap { start: CivilSecond, end: CivilSecond },
    /// The offset decreases, repeating the span of wall clock time between
    /// `start` (inclusive) and `end` (exclusive).
    Fold { start: CivilSecond, end: CivilSecond },
}

impl TransitionWall {
    fn new(
        at: i64,
        prev_offset: Offset,
        this_offset: Offset,
    ) -> TransitionWall {
        if prev_offset == this_offset {
            TransitionWall::Unambiguous { start: wall_civil(at, prev_offset) }
        } else if prev_offset < this_offset {
            // The offset jumps forward, so some wall clock time is skipped.
            // The earlier boundary comes from the smaller offset.
            TransitionWall::Gap {
                start: wall_civil(at, prev_offset),
                end: wall_civil(at, this_offset),
            }
        } else {
            // The offset jumps backward, so some wall clock time repeats.
            TransitionWall::Fold {
                start: wall_civil(at, this_offset),
                end: wall_civil(at, prev_offset),
            }
        }
    }

    fn start(&self) -> CivilSecond {
        match *self {
            TransitionWall::Unambiguous { start } => start,
            TransitionWall::Gap { start, .. } => start,
            TransitionWall::Fold { start, .. } => start,
        }
    }
}

/// Applies an offset to an instant-in-seconds and decomposes the result.
///
/// Saturating addition keeps the sentinel's minimum instant from wrapping
/// when the offset is negative.
fn wall_civil(at: i64, offset: Offset) -> CivilSecond {
    CivilSecond::from_epoch_second(
        at.saturating_add(i64::from(offset.seconds())),
    )
}

/// The fixed-size portion of a TZif header, plus the six record counts.
#[derive(Debug)]
struct Header {
    /// `0` for version 1, otherwise the ASCII digit of the version.
    version: u8,
    isutcnt: usize,
    isstdcnt: usize,
    leapcnt: usize,
    timecnt: usize,
    typecnt: usize,
    charcnt: usize,
}

impl Header {
    const LEN: usize = 44;

    fn parse(bytes: &[u8]) -> Result<(Header, &[u8]), Error> {
        if bytes.len() < Header::LEN {
            return Err(err!(
                "expected at least {} header bytes, found {}",
                Header::LEN,
                bytes.len(),
            ));
        }
        if &bytes[..4] != b"TZif" {
            return Err(err!("data does not begin with the TZif magic bytes"));
        }
        let version = bytes[4];
        if !matches!(version, 0 | b'2' | b'3' | b'4') {
            return Err(err!("unsupported TZif version {version:?}"));
        }
        let count =
            |i: usize| -> usize { be32(&bytes[20 + 4 * i..]) as usize };
        let header = Header {
            version,
            isutcnt: count(0),
            isstdcnt: count(1),
            leapcnt: count(2),
            timecnt: count(3),
            typecnt: count(4),
            charcnt: count(5),
        };
        if header.typecnt == 0 {
            return Err(err!("TZif data must have at least one local time type"));
        }
        if header.charcnt == 0 {
            return Err(err!("TZif designations must be non-empty"));
        }
        if header.isutcnt != 0 && header.isutcnt != header.typecnt {
            return Err(err!(
                "isutcnt ({}) must be zero or equal to typecnt ({})",
                header.isutcnt,
                header.typecnt,
            ));
        }
        if header.isstdcnt != 0 && header.isstdcnt != header.typecnt {
            return Err(err!(
                "isstdcnt ({}) must be zero or equal to typecnt ({})",
                header.isstdcnt,
                header.typecnt,
            ));
        }
        Ok((header, &bytes[Header::LEN..]))
    }

    /// The length in bytes of the data block following this header, for the
    /// given transition time width.
    fn data_len(&self, time_size: usize) -> Result<usize, Error> {
        let len = (self.timecnt as u64) * (time_size as u64) // transitions
            + (self.timecnt as u64) // transition types
            + (self.typecnt as u64) * 6 // local time types
            + (self.charcnt as u64) // designations
            + (self.leapcnt as u64) * (time_size as u64 + 4) // leap records
            + (self.isstdcnt as u64) // standard/wall indicators
            + (self.isutcnt as u64); // UT/local indicators
        usize::try_from(len)
            .map_err(|_| err!("TZif data block length overflows usize"))
    }
}

/// The raw sections of one data block, split but not yet decoded.
struct DataBlock<'b> {
    time_size: usize,
    transition_times: &'b [u8],
    transition_types: &'b [u8],
    local_time_types: &'b [u8],
    designations: &'b [u8],
    /// Whatever follows the data block: the footer for v2+, nothing for v1.
    rest: &'b [u8],
}

impl<'b> DataBlock<'b> {
    fn split(
        header: &Header,
        bytes: &'b [u8],
        time_size: usize,
    ) -> Result<DataBlock<'b>, Error> {
        let len = header.data_len(time_size)?;
        if bytes.len() < len {
            return Err(err!(
                "expected {len} bytes of TZif data, found only {}",
                bytes.len(),
            ));
        }
        let mut bytes = bytes;
        let mut take = |n: usize| -> &'b [u8] {
            let (taken, rest) = bytes.split_at(n);
            bytes = rest;
            taken
        };
        let transition_times = take(header.timecnt * time_size);
        let transition_types = take(header.timecnt);
        let local_time_types = take(header.typecnt * 6);
        let designations = take(header.charcnt);
        // Leap second records and the standard/UT indicators are parsed
        // over (so that truncation is still detected) but retain no
        // meaning here: this crate's timeline has no leap seconds, and the
        // indicators only matter to consumers of the raw `zic` rule input.
        let _leap_seconds = take(header.leapcnt * (time_size + 4));
        let _indicators = take(header.isstdcnt + header.isutcnt);
        Ok(DataBlock {
            time_size,
            transition_times,
            transition_types,
            local_time_types,
            designations,
            rest: bytes,
        })
    }

    fn transition_times(&self) -> Result<Vec<i64>, Error> {
        let mut times = Vec::with_capacity(
            self.transition_times.len() / self.time_size,
        );
        for chunk in self.transition_times.chunks_exact(self.time_size) {
            let at = if self.time_size == 4 {
                i64::from(be32(chunk) as i32)
            } else {
                be64(chunk) as i64
            };
            times.push(at);
        }
        Ok(times)
    }

    fn transition_types(&self, header: &Header) -> Result<Vec<u8>, Error> {
        let mut indices = Vec::with_capacity(self.transition_types.len());
        for &index in self.transition_types {
            if usize::from(index) >= header.typecnt {
                return Err(err!(
                    "transition type index {index} exceeds typecnt {}",
                    header.typecnt,
                ));
            }
            indices.push(index);
        }
        Ok(indices)
    }

    /// Decodes the local time type records as `(utoff, is_dst, desigidx)`.
    fn local_time_types(&self) -> Result<Vec<(i32, bool, u8)>, Error> {
        let mut types = Vec::with_capacity(self.local_time_types.len() / 6);
        for chunk in self.local_time_types.chunks_exact(6) {
            let utoff = be32(chunk) as i32;
            let is_dst = match chunk[4] {
                0 => false,
                1 => true,
                byte => {
                    return Err(err!(
                        "invalid is_dst byte {byte} in local time type",
                    ))
                }
            };
            types.push((utoff, is_dst, chunk[5]));
        }
        Ok(types)
    }

    fn designations(&self) -> Result<String, Error> {
        if self.designations.last() != Some(&0) {
            return Err(err!(
                "TZif designations must end with a NUL byte",
            ));
        }
        let s = core::str::from_utf8(self.designations)
            .map_err(|_| err!("TZif designations are not valid UTF-8"))?;
        // ASCII keeps every designation index a valid string boundary.
        if !s.is_ascii() {
            return Err(err!("TZif designations must be ASCII"));
        }
        Ok(String::from(s))
    }
}

fn parse_footer(bytes: &[u8]) -> Result<Option<PosixTimeZone>, Error> {
    let Some((&b'\n', rest)) = bytes.split_first() else {
        return Err(err!("expected newline at start of TZif footer"));
    };
    let Some(end) = rest.iter().position(|&b| b == b'\n') else {
        return Err(err!("expected newline at end of TZif footer"));
    };
    let tzstring = &rest[..end];
    if tzstring.is_empty() {
        return Ok(None);
    }
    PosixTimeZone::parse(tzstring)
        .with_context(|| err!("failed to parse TZ string in TZif footer"))
        .map(Some)
}

fn be32(bytes: &[u8]) -> u32 {
    u32::from_be_bytes(bytes[..4].try_into().expect("4 bytes"))
}

fn be64(bytes: &[u8]) -> u64 {
    u64::from_be_bytes(bytes[..8].try_into().expect("8 bytes"))
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use crate::tz::testdata;

    use super::*;

    fn new_york() -> Tzif {
        let bytes = testdata::new_york_bytes();
        Tzif::parse(Some(String::from("America/New_York")), &bytes).unwrap()
    }

    #[test]
    fn parse_test_zones() {
        let tzif = new_york();
        assert_eq!(tzif.name(), Some("America/New_York"));
        assert_eq!(tzif.version, b'2');
        assert_eq!(tzif.types.len(), 2);
        // Six explicit transitions plus the sentinel.
        assert_eq!(tzif.transitions.len(), 7);
        assert!(tzif.posix_tz.is_some());

        let tzif = Tzif::parse(None, &testdata::tehran_bytes()).unwrap();
        assert_eq!(tzif.name(), None);
        assert_eq!(tzif.transitions.len(), 3);
    }

    #[test]
    fn instant_lookup_at_boundaries() {
        let tzif = new_york();
        // One second before the 2015 spring transition.
        let (off, dst, abbrev) =
            tzif.to_offset_info(Instant::from_second(1_425_797_999));
        assert_eq!(off, Offset::constant(-5));
        assert_eq!(dst, Dst::No);
        assert_eq!(abbrev, "EST");
        // Exactly at it.
        let (off, dst, abbrev) =
            tzif.to_offset_info(Instant::from_second(1_425_798_000));
        assert_eq!(off, Offset::constant(-4));
        assert_eq!(dst, Dst::Yes);
        assert_eq!(abbrev, "EDT");
        // Long before the first explicit transition: the sentinel's
        // standard time applies.
        let (off, dst, abbrev) =
            tzif.to_offset_info(Instant::from_second(283_885_260));
        assert_eq!(off, Offset::constant(-5));
        assert_eq!(dst, Dst::No);
        assert_eq!(abbrev, "EST");
    }

    #[test]
    fn instant_lookup_past_last_transition() {
        let tzif = new_york();
        // 2035-07-01T00:00:00Z: DST according to the footer rule.
        let july_2035 = (crate::civil::core::to_epoch_day(2035, 7, 1)) * 86_400;
        let (off, dst, abbrev) =
            tzif.to_offset_info(Instant::from_second(july_2035));
        assert_eq!(off, Offset::constant(-4));
        assert_eq!(dst, Dst::Yes);
        assert_eq!(abbrev, "EDT");
        // 2035-01-01T00:00:00Z: standard time.
        let jan_2035 = (crate::civil::core::to_epoch_day(2035, 1, 1)) * 86_400;
        let (off, dst, abbrev) =
            tzif.to_offset_info(Instant::from_second(jan_2035));
        assert_eq!(off, Offset::constant(-5));
        assert_eq!(dst, Dst::No);
        assert_eq!(abbrev, "EST");
    }

    #[test]
    fn civil_lookup_gap_and_fold() {
        let tzif = new_york();
        let got = tzif.to_ambiguous(CivilSecond::new(2015, 3, 8, 2, 30, 0));
        assert_eq!(
            got,
            AmbiguousOffset::Gap {
                before: Offset::constant(-5),
                after: Offset::constant(-4),
                at: 1_425_798_000,
            },
        );
        let got = tzif.to_ambiguous(CivilSecond::new(2015, 11, 1, 1, 30, 0));
        assert_eq!(
            got,
            AmbiguousOffset::Fold {
                before: Offset::constant(-4),
                after: Offset::constant(-5),
                at: 1_446_357_600,
            },
        );
        // Unambiguous summer and winter times.
        assert!(matches!(
            tzif.to_ambiguous(CivilSecond::new(2015, 7, 4, 12, 0, 0)),
            AmbiguousOffset::Unambiguous { .. },
        ));
        // Ambiguity past the last explicit transition comes from the
        // footer rule: 2035-03-11 is the second Sunday of March.
        assert!(matches!(
            tzif.to_ambiguous(CivilSecond::new(2035, 3, 11, 2, 30, 0)),
            AmbiguousOffset::Gap { .. },
        ));
    }

    #[test]
    fn rejects_malformed_data() {
        // Bad magic.
        assert!(Tzif::parse(None, b"TZIF123456").is_err());
        // Truncated header.
        assert!(Tzif::parse(None, b"TZif2").is_err());
        // Valid magic, truncated everything else.
        let bytes = testdata::new_york_bytes();
        assert!(Tzif::parse(None, &bytes[..60]).is_err());
        // Flipping the version byte to something unknown.
        let mut bytes = testdata::new_york_bytes();
        bytes[4] = b'9';
        assert!(Tzif::parse(None, &bytes).is_err());
    }

    #[test]
    fn rejects_unsorted_transitions() {
        let bytes = testdata::new_york_bytes_with_swapped_transitions();
        let err = Tzif::parse(None, &bytes).unwrap_err();
        assert!(
            err.to_string().contains("strictly increasing"),
            "unexpected error: {err}",
        );
    }

    #[test]
    fn empty_footer_means_repeat_last() {
        let tzif =
            Tzif::parse(None, &testdata::new_york_bytes_without_footer())
                .unwrap();
        assert!(tzif.posix_tz.is_none());
        // Past the last transition (which entered EST), the last entry
        // repeats, even in the middle of summer.
        let july_2035 = crate::civil::core::to_epoch_day(2035, 7, 1) * 86_400;
        let (off, dst, _) =
            tzif.to_offset_info(Instant::from_second(july_2035));
        assert_eq!(off, Offset::constant(-5));
        assert_eq!(dst, Dst::No);
    }
}

/*!
Support for POSIX `TZ` rule strings, e.g. `EST5EDT,M3.2.0,M11.1.0`.

A rule string describes a time zone's behavior for *every* year: a standard
offset and, optionally, a daylight saving offset together with the pair of
year-relative transitions between them. Two things consume these rules: the
footer of a TZif file (where the rule extends the explicit transition table
indefinitely into the future) and the `TZ` environment variable.

The syntax accepted here is the IANA v3+ extension of POSIX, which widens
transition times to `-167..=167` hours so that rules like
`<-02>2<-01>,M3.5.0/-1,M10.5.0/0` can be expressed.

A rule with a DST component must carry an explicit transition rule. POSIX
technically permits omitting it (with an unspecified "implementation defined"
default); rule strings like that are rejected here, which matches what TZif
footers contain in practice.
*/

use alloc::string::String;

use crate::{
    civil::{CivilDay, CivilSecond, Weekday},
    error::{err, Error},
    instant::Instant,
    tz::{AmbiguousOffset, Dst, Offset},
};

/// A POSIX time zone rule.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct PosixTimeZone {
    std_abbrev: String,
    std_offset: Offset,
    dst: Option<PosixDst>,
}

/// The DST half of a POSIX rule: its abbreviation, offset and the
/// year-relative window during which it applies.
#[derive(Clone, Debug, Eq, PartialEq)]
struct PosixDst {
    abbrev: String,
    offset: Offset,
    start: PosixDayTime,
    end: PosixDayTime,
}

/// A day-of-year rule plus a transition time in seconds.
///
/// The time is a signed duration from the midnight of the rule day, not a
/// clock time: with the v3 extension it can reach out more than a day in
/// either direction.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct PosixDayTime {
    date: PosixDay,
    /// Seconds from midnight of the rule day. Defaults to `7_200` (02:00).
    time: i32,
}

#[derive(Clone, Copy, Eq, PartialEq)]
enum PosixDay {
    /// `Jn`: the 1-based day of the year, never counting February 29.
    JulianOne(i16),
    /// `n`: the 0-based day of the year, counting February 29.
    JulianZero(i16),
    /// `Mm.w.d`: the `w`'th weekday `d` of month `m`, where `w = 5` means
    /// "the last."
    WeekdayOfMonth { month: i8, week: i8, weekday: Weekday },
}

impl PosixTimeZone {
    /// Parses a complete POSIX TZ rule string.
    ///
    /// The entire input must be consumed for the parse to succeed.
    pub(crate) fn parse(bytes: &[u8]) -> Result<PosixTimeZone, Error> {
        let mut p = Parser { tz: bytes, pos: 0 };
        let tz = p.parse_posix_time_zone()?;
        if p.pos < p.tz.len() {
            return Err(err!(
                "expected entire TZ string to be a valid POSIX time zone, \
                 but found unparsed data at byte offset {}",
                p.pos,
            ));
        }
        Ok(tz)
    }

    /// Returns the offset, DST status and abbreviation in effect at the
    /// given instant.
    pub(crate) fn to_offset_info(&self, t: Instant) -> (Offset, Dst, &str) {
        let Some(dst_info) = self.dst_info_utc(utc_year(t)) else {
            return (self.std_offset, Dst::No, &self.std_abbrev);
        };
        if dst_info.in_dst(Offset::UTC.to_civil(t)) {
            (dst_info.offset(), Dst::Yes, &dst_info.dst.abbrev)
        } else {
            (self.std_offset, Dst::No, &self.std_abbrev)
        }
    }

    /// Classifies the given wall clock time as unambiguous or as falling
    /// into this rule's yearly gap or fold.
    pub(crate) fn to_ambiguous(&self, cs: CivilSecond) -> AmbiguousOffset {
        let std = self.std_offset;
        let Some(dst_info) = self.dst_info_wall(cs.year()) else {
            return AmbiguousOffset::Unambiguous { offset: std };
        };
        let dst = dst_info.offset();
        let diff = i64::from(dst.seconds()) - i64::from(std.seconds());
        // When DST is ahead of standard time (the overwhelmingly common
        // case), the transition into DST produces the gap and the
        // transition out of it produces the fold. When DST is *behind*
        // standard time (e.g. Ireland, where the legal standard time is the
        // summer one), the two swap roles.
        if diff == 0 {
            AmbiguousOffset::Unambiguous { offset: std }
        } else if diff < 0 {
            if dst_info.in_dst(cs) {
                AmbiguousOffset::Unambiguous { offset: dst }
            } else {
                let fold_start = dst_info.start + diff;
                let gap_end = dst_info.end - diff;
                if fold_start <= cs && cs < dst_info.start {
                    AmbiguousOffset::Fold {
                        before: std,
                        after: dst,
                        at: dst_info.start.to_epoch_second()
                            - i64::from(std.seconds()),
                    }
                } else if dst_info.end <= cs && cs < gap_end {
                    AmbiguousOffset::Gap {
                        before: dst,
                        after: std,
                        at: dst_info.end.to_epoch_second()
                            - i64::from(dst.seconds()),
                    }
                } else {
                    AmbiguousOffset::Unambiguous { offset: std }
                }
            }
        } else if !dst_info.in_dst(cs) {
            AmbiguousOffset::Unambiguous { offset: std }
        } else {
            let gap_end = dst_info.start + diff;
            let fold_start = dst_info.end - diff;
            if dst_info.start <= cs && cs < gap_end {
                AmbiguousOffset::Gap {
                    before: std,
                    after: dst,
                    at: dst_info.start.to_epoch_second()
                        - i64::from(std.seconds()),
                }
            } else if fold_start <= cs && cs < dst_info.end {
                AmbiguousOffset::Fold {
                    before: dst,
                    after: std,
                    at: dst_info.end.to_epoch_second()
                        - i64::from(dst.seconds()),
                }
            } else {
                AmbiguousOffset::Unambiguous { offset: dst }
            }
        }
    }

    /// Returns the DST window for the given year with both endpoints
    /// expressed as civil times in UTC, or `None` when this rule has no DST.
    fn dst_info_utc(&self, year: i64) -> Option<DstInfo<'_>> {
        let dst = self.dst.as_ref()?;
        // DST starts with respect to standard time and ends with respect to
        // DST time, so each endpoint shifts by its own side's offset.
        Some(DstInfo {
            dst,
            start: dst.start.to_civil(year, self.std_offset),
            end: dst.end.to_civil(year, dst.offset),
        })
    }

    /// Like `dst_info_utc`, but with the endpoints in wall clock time.
    fn dst_info_wall(&self, year: i64) -> Option<DstInfo<'_>> {
        let dst = self.dst.as_ref()?;
        Some(DstInfo {
            dst,
            start: dst.start.to_civil(year, Offset::UTC),
            end: dst.end.to_civil(year, Offset::UTC),
        })
    }
}

impl core::fmt::Display for PosixTimeZone {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "{}", self.std_abbrev)?;
        write!(f, "{}", PosixOffsetDisplay(self.std_offset))?;
        if let Some(ref dst) = self.dst {
            write!(f, "{}", dst.abbrev)?;
            if dst.offset.seconds() != self.std_offset.seconds() + 3_600 {
                write!(f, "{}", PosixOffsetDisplay(dst.offset))?;
            }
            write!(f, ",{},{}", dst.start, dst.end)?;
        }
        Ok(())
    }
}

impl core::fmt::Display for PosixDayTime {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "{:?}", self.date)?;
        if self.time != 2 * 3_600 {
            let sign = if self.time < 0 { "-" } else { "" };
            let time = self.time.unsigned_abs();
            write!(f, "/{sign}{}", time / 3_600)?;
            if time % 3_600 != 0 {
                write!(f, ":{:02}", (time / 60) % 60)?;
                if time % 60 != 0 {
                    write!(f, ":{:02}", time % 60)?;
                }
            }
        }
        Ok(())
    }
}

/// Renders an offset with the inverted sign convention POSIX uses.
struct PosixOffsetDisplay(Offset);

impl core::fmt::Display for PosixOffsetDisplay {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let second = self.0.seconds();
        let sign = if second > 0 { "-" } else { "" };
        let second = second.unsigned_abs();
        write!(f, "{sign}{}", second / 3_600)?;
        if second % 3_600 != 0 {
            write!(f, ":{:02}", (second / 60) % 60)?;
        }
        Ok(())
    }
}

/// The DST window of one particular year.
///
/// `start` may be greater than `end`; that tends to happen in the southern
/// hemisphere, where DST straddles the turn of the year.
#[derive(Debug)]
struct DstInfo<'a> {
    dst: &'a PosixDst,
    /// Inclusive start of the window.
    start: CivilSecond,
    /// Exclusive end of the window.
    end: CivilSecond,
}

impl<'a> DstInfo<'a> {
    fn in_dst(&self, cs: CivilSecond) -> bool {
        if self.start <= self.end {
            self.start <= cs && cs < self.end
        } else {
            !(self.end <= cs && cs < self.start)
        }
    }

    fn offset(&self) -> Offset {
        self.dst.offset
    }
}

fn utc_year(t: Instant) -> i64 {
    Offset::UTC.to_civil(t).year()
}

impl PosixDayTime {
    /// Evaluates this rule in the given year, as a civil time shifted by
    /// `-offset`. Passing `Offset::UTC` yields wall clock time; passing the
    /// offset in effect on the relevant side of the transition yields the
    /// transition's civil time in UTC.
    ///
    /// The result is clamped to the given year, so a rule whose time spec
    /// reaches across the year boundary (possible with v3 extended times)
    /// stays put at the year's edge. This matches how the window is used: as
    /// a per-year interval.
    fn to_civil(&self, year: i64, offset: Offset) -> CivilSecond {
        let mkmin = || CivilSecond::new(year, 1, 1, 0, 0, 0);
        let mkmax = || CivilSecond::new(year, 12, 31, 23, 59, 59);

        let Some(date) = self.date.to_civil_date(year) else {
            return mkmax();
        };
        let shift = i64::from(self.time) - i64::from(offset.seconds());
        let cs = CivilSecond::from(date) + shift;
        if cs.year() < year {
            mkmin()
        } else if cs.year() > year {
            mkmax()
        } else {
            cs
        }
    }
}

impl PosixDay {
    /// Resolves this rule to a calendar day in the given year.
    ///
    /// `None` is returned only for the 0-based Julian day 365 in a year
    /// that has no 366th day, which POSIX leaves unspecified; callers clamp
    /// it to the end of the year.
    fn to_civil_date(&self, year: i64) -> Option<CivilDay> {
        match *self {
            PosixDay::JulianOne(day) => {
                let mut d = CivilDay::new(year, 1, 1) + i64::from(day - 1);
                // Jn never counts the leap day: March 1 is always day 60.
                if crate::civil::core::is_leap_year(year) && day >= 60 {
                    d += 1;
                }
                Some(d)
            }
            PosixDay::JulianZero(day) => {
                let d = CivilDay::new(year, 1, 1) + i64::from(day);
                if d.year() != year {
                    return None;
                }
                Some(d)
            }
            PosixDay::WeekdayOfMonth { month, week, weekday } => {
                let week = if week == 5 { -1 } else { week };
                Some(
                    CivilDay::new(year, i64::from(month), 1)
                        .nth_weekday_of_month(week, weekday),
                )
            }
        }
    }
}

impl core::fmt::Debug for PosixDay {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        match *self {
            PosixDay::JulianOne(n) => write!(f, "J{n}"),
            PosixDay::JulianZero(n) => write!(f, "{n}"),
            PosixDay::WeekdayOfMonth { month, week, weekday } => write!(
                f,
                "M{month}.{week}.{}",
                weekday.to_sunday_zero_offset(),
            ),
        }
    }
}

struct Parser<'s> {
    tz: &'s [u8],
    pos: usize,
}

impl<'s> Parser<'s> {
    fn parse_posix_time_zone(&mut self) -> Result<PosixTimeZone, Error> {
        let std_abbrev = self.parse_abbreviation()?;
        let std_offset = self.parse_posix_offset()?;
        let mut dst = None;
        if let Some(byte) = self.byte() {
            if byte.is_ascii_alphabetic() || byte == b'<' {
                dst = Some(self.parse_posix_dst(std_offset)?);
            }
        }
        Ok(PosixTimeZone { std_abbrev, std_offset, dst })
    }

    fn parse_posix_dst(&mut self, std_offset: Offset) -> Result<PosixDst, Error> {
        let abbrev = self.parse_abbreviation()?;
        // The DST offset defaults to one hour ahead of standard time.
        let mut offset =
            Offset::from_seconds(std_offset.seconds() + 3_600)
                .map_err(|e| e.context(err!("invalid default DST offset")))?;
        match self.byte() {
            None => {
                return Err(err!(
                    "DST abbreviation {abbrev} must be followed by a \
                     transition rule",
                ))
            }
            Some(b',') => {}
            Some(_) => {
                offset = self.parse_posix_offset()?;
                if self.byte() != Some(b',') {
                    return Err(err!(
                        "DST offset for {abbrev} must be followed by a \
                         transition rule",
                    ));
                }
            }
        }
        self.pos += 1; // the comma
        let start = self.parse_posix_day_time()?;
        if self.byte() != Some(b',') {
            return Err(err!("expected ',' between DST transition rules"));
        }
        self.pos += 1;
        let end = self.parse_posix_day_time()?;
        Ok(PosixDst { abbrev, offset, start, end })
    }

    fn parse_abbreviation(&mut self) -> Result<String, Error> {
        if self.byte() == Some(b'<') {
            self.pos += 1;
            let start = self.pos;
            while let Some(byte) = self.byte() {
                if byte == b'>' {
                    let abbrev = &self.tz[start..self.pos];
                    self.pos += 1;
                    if abbrev.is_empty() {
                        return Err(err!("quoted abbreviation is empty"));
                    }
                    return Ok(String::from_utf8_lossy(abbrev).into_owned());
                }
                if !byte.is_ascii_alphanumeric()
                    && byte != b'+'
                    && byte != b'-'
                {
                    return Err(err!(
                        "invalid byte {byte:?} in quoted abbreviation",
                    ));
                }
                self.pos += 1;
            }
            Err(err!("unclosed '<' in time zone abbreviation"))
        } else {
            let start = self.pos;
            while let Some(byte) = self.byte() {
                if !byte.is_ascii_alphabetic() {
                    break;
                }
                self.pos += 1;
            }
            let abbrev = &self.tz[start..self.pos];
            if abbrev.len() < 3 {
                return Err(err!(
                    "time zone abbreviation must be at least 3 characters, \
                     found {} at byte offset {start}",
                    abbrev.len(),
                ));
            }
            Ok(String::from_utf8_lossy(abbrev).into_owned())
        }
    }

    /// Parses an offset in POSIX's inverted convention: `EST5` means five
    /// hours *west* of the prime meridian, so the parsed value is negated.
    fn parse_posix_offset(&mut self) -> Result<Offset, Error> {
        let (sign, hour, minute, second) = self.parse_hms(24)?;
        let seconds = hour * 3_600 + minute * 60 + second;
        Offset::from_seconds((-sign * seconds) as i32)
            .map_err(|e| e.context(err!("invalid POSIX offset")))
    }

    fn parse_posix_day_time(&mut self) -> Result<PosixDayTime, Error> {
        let date = self.parse_posix_day()?;
        let mut time = 2 * 3_600;
        if self.byte() == Some(b'/') {
            self.pos += 1;
            // IANA v3+ widens the transition time to +/-167 hours.
            let (sign, hour, minute, second) = self.parse_hms(167)?;
            time = sign * (hour * 3_600 + minute * 60 + second);
        }
        Ok(PosixDayTime { date, time: time as i32 })
    }

    fn parse_posix_day(&mut self) -> Result<PosixDay, Error> {
        match self.byte() {
            Some(b'J') => {
                self.pos += 1;
                let day = self.parse_number(3)?;
                if !(1..=365).contains(&day) {
                    return Err(err!("Julian day J{day} not in range 1..=365"));
                }
                Ok(PosixDay::JulianOne(day as i16))
            }
            Some(b'M') => {
                self.pos += 1;
                let month = self.parse_number(2)?;
                if !(1..=12).contains(&month) {
                    return Err(err!("rule month {month} not in range 1..=12"));
                }
                self.expect(b'.')?;
                let week = self.parse_number(1)?;
                if !(1..=5).contains(&week) {
                    return Err(err!("rule week {week} not in range 1..=5"));
                }
                self.expect(b'.')?;
                let weekday = self.parse_number(1)?;
                if !(0..=6).contains(&weekday) {
                    return Err(err!(
                        "rule weekday {weekday} not in range 0..=6",
                    ));
                }
                Ok(PosixDay::WeekdayOfMonth {
                    month: month as i8,
                    week: week as i8,
                    weekday: Weekday::from_sunday_zero_offset(weekday as i8),
                })
            }
            Some(byte) if byte.is_ascii_digit() => {
                let day = self.parse_number(3)?;
                if !(0..=365).contains(&day) {
                    return Err(err!("Julian day {day} not in range 0..=365"));
                }
                Ok(PosixDay::JulianZero(day as i16))
            }
            _ => Err(err!("expected 'J', 'M' or a digit to start a rule day")),
        }
    }

    /// Parses `[+-]?h+[:mm[:ss]]`, with the hour bounded by `max_hour`.
    fn parse_hms(&mut self, max_hour: i64) -> Result<(i64, i64, i64, i64), Error> {
        let sign = match self.byte() {
            Some(b'-') => {
                self.pos += 1;
                -1
            }
            Some(b'+') => {
                self.pos += 1;
                1
            }
            _ => 1,
        };
        let hour = self.parse_number(3)?;
        if hour > max_hour {
            return Err(err!("hour {hour} exceeds maximum of {max_hour}"));
        }
        let mut minute = 0;
        let mut second = 0;
        if self.byte() == Some(b':') {
            self.pos += 1;
            minute = self.parse_number(2)?;
            if minute > 59 {
                return Err(err!("minute {minute} not in range 0..=59"));
            }
            if self.byte() == Some(b':') {
                self.pos += 1;
                second = self.parse_number(2)?;
                if second > 59 {
                    return Err(err!("second {second} not in range 0..=59"));
                }
            }
        }
        Ok((sign, hour, minute, second))
    }

    /// Parses up to `max_digits` decimal digits. At least one is required.
    fn parse_number(&mut self, max_digits: usize) -> Result<i64, Error> {
        let mut n: i64 = 0;
        let mut digits = 0;
        while digits < max_digits {
            let Some(byte) = self.byte() else { break };
            if !byte.is_ascii_digit() {
                break;
            }
            n = n * 10 + i64::from(byte - b'0');
            self.pos += 1;
            digits += 1;
        }
        if digits == 0 {
            return Err(err!(
                "expected a number at byte offset {}",
                self.pos,
            ));
        }
        Ok(n)
    }

    fn expect(&mut self, want: u8) -> Result<(), Error> {
        if self.byte() != Some(want) {
            return Err(err!(
                "expected {:?} at byte offset {}",
                char::from(want),
                self.pos,
            ));
        }
        self.pos += 1;
        Ok(())
    }

    fn byte(&self) -> Option<u8> {
        self.tz.get(self.pos).copied()
    }
}

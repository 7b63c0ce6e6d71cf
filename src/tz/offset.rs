use crate::{
    civil::CivilSecond,
    error::{err, Error},
    instant::Instant,
};

/// Whether daylight saving time is in effect.
///
/// This is a label attached to lookups as a way to contrast with "standard
/// time." It has no effect on arithmetic; the [`Offset`] accompanying it is
/// always the full offset from UTC.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum Dst {
    /// DST is not in effect, i.e. standard time.
    No,
    /// DST is in effect.
    Yes,
}

impl Dst {
    /// Returns true when this value is equal to `Dst::Yes`.
    pub fn is_dst(self) -> bool {
        matches!(self, Dst::Yes)
    }
}

impl From<bool> for Dst {
    fn from(is_dst: bool) -> Dst {
        if is_dst {
            Dst::Yes
        } else {
            Dst::No
        }
    }
}

/// A signed offset from UTC, in seconds.
///
/// Negative offsets are west of the prime meridian and positive offsets are
/// east of it. In all cases, `civil time - offset = UTC`.
///
/// # Display format
///
/// The `Display` implementation writes `{sign}{hours}[:{minutes}[:{seconds}]]`
/// with the minutes and seconds only present when non-zero:
///
/// ```
/// use civtz::tz::Offset;
///
/// assert_eq!(Offset::constant(-5).to_string(), "-05");
/// assert_eq!(Offset::from_seconds(-18_060).unwrap().to_string(), "-05:01");
/// assert_eq!(Offset::UTC.to_string(), "+00");
/// ```
#[derive(Clone, Copy, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct Offset {
    second: i32,
}

impl Offset {
    /// The offset corresponding to UTC. That is, no offset at all.
    pub const UTC: Offset = Offset { second: 0 };

    /// The minimum supported offset, `-25:59:59`.
    pub const MIN: Offset = Offset { second: -93_599 };

    /// The maximum supported offset, `+25:59:59`.
    pub const MAX: Offset = Offset { second: 93_599 };

    /// Creates an offset from a whole number of hours.
    ///
    /// # Panics
    ///
    /// When `hours` is outside `-25..=25`. Use [`Offset::from_seconds`] for
    /// fallible construction.
    pub const fn constant(hours: i8) -> Offset {
        assert!(-25 <= hours && hours <= 25, "offset hours out of range");
        Offset { second: hours as i32 * 3_600 }
    }

    /// Creates an offset from a number of seconds, reporting an error when
    /// the value is outside the supported `-93_599..=93_599` range.
    pub fn from_seconds(second: i32) -> Result<Offset, Error> {
        if !(Offset::MIN.second..=Offset::MAX.second).contains(&second) {
            return Err(err!(
                "offset of {second} seconds is outside \
                 supported range of -93599..=93599",
            ));
        }
        Ok(Offset { second })
    }

    /// Returns this offset as a number of seconds.
    pub const fn seconds(self) -> i32 {
        self.second
    }

    /// Decomposes the given instant into the civil time this offset implies.
    ///
    /// Saturating arithmetic keeps this total at the extreme ends of the
    /// instant range.
    pub(crate) fn to_civil(self, t: Instant) -> CivilSecond {
        CivilSecond::from_epoch_second(
            t.second().saturating_add(i64::from(self.second)),
        )
    }

    /// The inverse of [`Offset::to_civil`]: reads the given civil time as
    /// being in this offset and returns the corresponding instant.
    pub(crate) fn to_instant(self, cs: CivilSecond) -> Instant {
        Instant::from_second(
            cs.to_epoch_second().saturating_sub(i64::from(self.second)),
        )
    }
}

impl core::fmt::Display for Offset {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let sign = if self.second < 0 { '-' } else { '+' };
        let second = self.second.unsigned_abs();
        let (hours, minutes, seconds) =
            (second / 3_600, (second / 60) % 60, second % 60);
        write!(f, "{sign}{hours:02}")?;
        if minutes != 0 || seconds != 0 {
            write!(f, ":{minutes:02}")?;
            if seconds != 0 {
                write!(f, ":{seconds:02}")?;
            }
        }
        Ok(())
    }
}

impl core::fmt::Debug for Offset {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        core::fmt::Display::fmt(self, f)
    }
}

use core::time::Duration;

use crate::civil::core::Fields;

/// An instant in time, zone independent.
///
/// An `Instant` is a count of seconds (plus a sub-second nanosecond
/// component) since the Unix epoch, `1970-01-01T00:00:00Z`. The timeline it
/// measures is continuous: leap seconds are disregarded entirely, so every
/// day is exactly `86_400` seconds long.
///
/// An instant by itself has no calendar fields. To get a year or an hour out
/// of one, pair it with a [`TimeZone`](crate::TimeZone):
///
/// ```
/// use civtz::{civil::CivilSecond, Instant, TimeZone};
///
/// let t = Instant::from_second(1_425_798_000);
/// assert_eq!(
///     TimeZone::UTC.to_civil(t),
///     CivilSecond::new(2015, 3, 8, 7, 0, 0),
/// );
/// ```
///
/// # Arithmetic
///
/// `Instant` supports addition and subtraction of [`core::time::Duration`].
/// The operator implementations panic on overflow; use
/// [`Instant::checked_add`] and [`Instant::checked_sub`] when the input is
/// not trusted.
#[derive(Clone, Copy, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct Instant {
    second: i64,
    /// Invariant: in `0..=999_999_999`. A "negative" instant like 1969-12-31
    /// 23:59:59.75 is represented as `second = -1, nanosecond = 750_000_000`,
    /// which keeps ordering derivable field-wise.
    nanosecond: i32,
}

impl Instant {
    /// The Unix epoch, `1970-01-01T00:00:00Z`.
    pub const UNIX_EPOCH: Instant = Instant { second: 0, nanosecond: 0 };

    /// Creates an instant from a second and nanosecond component.
    ///
    /// The nanosecond component may be any value; it is normalized into
    /// `0..=999_999_999` with carry into the second component.
    pub const fn new(second: i64, nanosecond: i64) -> Instant {
        let second = second + nanosecond.div_euclid(1_000_000_000);
        let nanosecond = nanosecond.rem_euclid(1_000_000_000) as i32;
        Instant { second, nanosecond }
    }

    /// Creates an instant from a count of seconds since the Unix epoch.
    pub const fn from_second(second: i64) -> Instant {
        Instant { second, nanosecond: 0 }
    }

    /// Returns the number of whole seconds since the Unix epoch.
    ///
    /// This rounds toward negative infinity, consistent with
    /// [`Instant::subsec_nanosecond`] being non-negative.
    pub const fn second(self) -> i64 {
        self.second
    }

    /// Returns the sub-second component, in `0..=999_999_999`.
    pub const fn subsec_nanosecond(self) -> i32 {
        self.nanosecond
    }

    /// Adds a duration, returning `None` on overflow.
    pub const fn checked_add(self, duration: Duration) -> Option<Instant> {
        if duration.as_secs() > i64::MAX as u64 {
            return None;
        }
        let nanosecond =
            self.nanosecond as i64 + duration.subsec_nanos() as i64;
        let Some(second) = self.second.checked_add(duration.as_secs() as i64)
        else {
            return None;
        };
        let Some(second) = second.checked_add(nanosecond.div_euclid(1_000_000_000))
        else {
            return None;
        };
        Some(Instant {
            second,
            nanosecond: nanosecond.rem_euclid(1_000_000_000) as i32,
        })
    }

    /// Subtracts a duration, returning `None` on overflow.
    pub const fn checked_sub(self, duration: Duration) -> Option<Instant> {
        if duration.as_secs() > i64::MAX as u64 {
            return None;
        }
        let nanosecond =
            self.nanosecond as i64 - duration.subsec_nanos() as i64;
        let Some(second) = self.second.checked_sub(duration.as_secs() as i64)
        else {
            return None;
        };
        let Some(second) = second.checked_add(nanosecond.div_euclid(1_000_000_000))
        else {
            return None;
        };
        Some(Instant {
            second,
            nanosecond: nanosecond.rem_euclid(1_000_000_000) as i32,
        })
    }
}

impl core::ops::Add<Duration> for Instant {
    type Output = Instant;

    fn add(self, rhs: Duration) -> Instant {
        self.checked_add(rhs).expect("adding duration to instant overflowed")
    }
}

impl core::ops::Sub<Duration> for Instant {
    type Output = Instant;

    fn sub(self, rhs: Duration) -> Instant {
        self.checked_sub(rhs)
            .expect("subtracting duration from instant overflowed")
    }
}

impl core::fmt::Display for Instant {
    /// Writes this instant as a UTC datetime in the format
    /// `YYYY-MM-DDTHH:MM:SS[.fff...]Z`.
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let Fields { year, month, day, hour, minute, second } =
            Fields::from_epoch_second(self.second);
        if year < 0 {
            write!(f, "-{:04}", year.unsigned_abs())?;
        } else {
            write!(f, "{year:04}")?;
        }
        write!(f, "-{month:02}-{day:02}T{hour:02}:{minute:02}:{second:02}")?;
        if self.nanosecond != 0 {
            let mut frac = self.nanosecond;
            let mut digits = 9;
            while frac % 10 == 0 {
                frac /= 10;
                digits -= 1;
            }
            write!(f, ".{frac:0>width$}", width = digits)?;
        }
        write!(f, "Z")
    }
}

impl core::fmt::Debug for Instant {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        core::fmt::Display::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn normalization() {
        let t = Instant::new(10, -1);
        assert_eq!(t.second(), 9);
        assert_eq!(t.subsec_nanosecond(), 999_999_999);
        let t = Instant::new(10, 1_500_000_000);
        assert_eq!(t.second(), 11);
        assert_eq!(t.subsec_nanosecond(), 500_000_000);
    }

    #[test]
    fn duration_arithmetic() {
        let dep = Instant::from_second(283_885_260);
        let arr = dep + Duration::from_secs(14 * 3_600 + 44 * 60);
        assert_eq!(arr.second(), 283_938_300);
        assert_eq!(arr - Duration::from_secs(53_040), dep);

        let t = Instant::new(5, 800_000_000);
        assert_eq!(
            t + Duration::new(1, 300_000_000),
            Instant::new(7, 100_000_000),
        );
        assert_eq!(
            t - Duration::new(0, 900_000_000),
            Instant::new(4, 900_000_000),
        );
    }

    #[test]
    fn checked_overflow() {
        assert_eq!(
            Instant::from_second(i64::MAX).checked_add(Duration::from_secs(1)),
            None,
        );
        assert_eq!(
            Instant::from_second(i64::MIN).checked_sub(Duration::from_secs(1)),
            None,
        );
    }

    #[test]
    fn ordering_with_negative_seconds() {
        let a = Instant::new(-1, 750_000_000);
        let b = Instant::from_second(0);
        let c = Instant::new(-1, 250_000_000);
        assert!(c < a);
        assert!(a < b);
    }

    #[test]
    fn display() {
        assert_eq!(
            Instant::from_second(1_425_798_000).to_string(),
            "2015-03-08T07:00:00Z",
        );
        assert_eq!(
            Instant::new(0, 250_000_000).to_string(),
            "1970-01-01T00:00:00.25Z",
        );
        assert_eq!(
            Instant::from_second(-1).to_string(),
            "1969-12-31T23:59:59Z",
        );
    }
}

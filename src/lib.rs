/*!
civtz is a time computation engine: exact civil time arithmetic under the
proleptic Gregorian calendar, and conversions between civil times and
absolute instants through real time zone transition histories, with full
support for DST gaps and folds.

There are three kinds of values:

* An [`Instant`] is an absolute point in time, zone independent, counted in
  seconds (and nanoseconds) since the Unix epoch on a continuous timeline
  with no leap seconds.
* A civil time ([`civil::CivilSecond`] and its five coarser-aligned
  siblings) is "what the wall clock reads": calendar and clock fields with
  no zone attached, with exact, closed-form arithmetic.
* A [`TimeZone`] maps between the two, in both directions.

The absolute-to-civil direction is always exact and unambiguous. The
civil-to-absolute direction is where time zones bite: around a DST
transition, a civil time may have been skipped entirely or may have occurred
twice. [`TimeZone::lookup_civil`] exposes that three-way classification as
plain data, and [`TimeZone::to_instant`] applies a deterministic,
order-preserving default for callers who just want an answer.

# Examples

Resolving an ambiguous civil time:

```
use civtz::{civil::CivilSecond, tz::CivilKind, Instant, TimeZone};

let tz = TimeZone::posix("EST5EDT,M3.2.0,M11.1.0")?;

// On 2015-03-08, clocks jumped from 02:00 directly to 03:00.
let lookup = tz.lookup_civil(CivilSecond::new(2015, 3, 8, 2, 30, 0));
assert_eq!(lookup.kind, CivilKind::Skipped);
// The default resolution is the first valid instant after the gap.
assert_eq!(tz.to_civil(lookup.instant()), CivilSecond::new(2015, 3, 8, 3, 0, 0));
# Ok::<(), civtz::Error>(())
```

Civil time arithmetic is exact and normalizing:

```
use civtz::civil::{CivilDay, CivilMonth, Weekday};

let d = CivilDay::new(2020, 2, 28);
assert_eq!(d + 2, CivilDay::new(2020, 3, 1));
assert_eq!((d + 2) - d, 2);
assert_eq!(CivilMonth::new(2020, 12) + 2, CivilMonth::new(2021, 2));
assert_eq!(d.weekday(), Weekday::Friday);
```

Formatting an instant in a zone:

```
use civtz::{fmt::strtime, Instant, TimeZone};

let t = Instant::from_second(1_425_798_000);
assert_eq!(
    strtime::format_default(t, &TimeZone::UTC),
    "2015-03-08T07:00:00+00:00",
);
```

# Crate features

* **std** (enabled by default) - Enables [`TimeZone::system`] and the
  `std::error::Error` impl. Disabling it leaves a core+alloc crate; dynamic
  memory is required throughout.
* **tzdb-zoneinfo** (enabled by default) - Enables [`TimeZone::get`], which
  reads the system zoneinfo database (usually `/usr/share/zoneinfo`).
* **logging** - Routes diagnostics on the time zone loading and detection
  paths through the [`log`] crate.

[`log`]: https://docs.rs/log
*/

#![no_std]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(missing_debug_implementations)]
#![warn(missing_docs)]

#[cfg(any(test, feature = "std"))]
extern crate std;

extern crate alloc;

pub use crate::{error::Error, instant::Instant, tz::TimeZone};

#[macro_use]
mod logging;

pub mod civil;
mod error;
pub mod fmt;
mod instant;
pub mod tz;

#[cfg(test)]
mod tests {
    // The claims made about sharing in the docs only hold if these stay
    // true.
    #[test]
    fn time_zone_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<crate::TimeZone>();
        assert_send_sync::<crate::Instant>();
        assert_send_sync::<crate::civil::CivilSecond>();
        assert_send_sync::<crate::Error>();
    }
}

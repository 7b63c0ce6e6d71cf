/*!
Civil time: calendar dates and clock times with no time zone attached.

The centerpiece of this module is [`Civil`], a single value type carrying a
normalized `(year, month, day, hour, minute, second)` tuple under the
proleptic Gregorian calendar, parameterized by an [`Alignment`] tag. The six
aliases [`CivilSecond`] through [`CivilYear`] give each alignment its own
static type, which is what makes "you cannot difference a month-aligned value
with a day-aligned value" a compile error rather than a runtime one.

All arithmetic here is exact and closed-form: normalization and unit
conversion go through a day-count round trip rather than any kind of
iterative correction. See the crate docs for how civil times combine with
[`TimeZone`](crate::TimeZone) to produce absolute instants.
*/

pub use self::{
    aligned::{
        Alignment, Civil, CivilDay, CivilHour, CivilMinute, CivilMonth,
        CivilSecond, CivilYear, Day, Hour, Minute, Month, Second, Year,
    },
    weekday::Weekday,
};

mod aligned;
pub(crate) mod core;
mod weekday;

/*!
Support for "printf" style formatting and parsing of instants.

The routines here resemble the POSIX [`strftime`] and [`strptime`] functions:
a format string is a sequence of conversion specifiers, literal bytes and
whitespace. Formatting pairs an [`Instant`] with a [`TimeZone`] to produce
civil fields, an offset and an abbreviation, and renders them. Parsing is the
strict inverse: the input must match the format string completely, and the
civil fields it yields are resolved back to an instant, either through an
explicitly parsed offset or through the time zone's order-preserving default
resolution.

# Conversion specifiers

| Specifier | Example | Description |
| --------- | ------- | ----------- |
| `%%` | `%%` | A literal `%`. |
| `%A`, `%a` | `Sunday`, `Sun` | The full and abbreviated weekday name. |
| `%B`, `%b`, `%h` | `June`, `Jun`, `Jun` | The full and abbreviated month name. |
| `%C` | `20` | The century, zero padded to 2 digits. |
| `%D` | `3/8/15` | Equivalent to `%m/%d/%y`. |
| `%d`, `%e` | `08`, ` 8` | The day of the month, zero and space padded. |
| `%F` | `2015-03-08` | Equivalent to `%Y-%m-%d`. |
| `%H` | `02` | The hour in a 24 hour clock, zero padded. |
| `%I` | `11` | The hour in a 12 hour clock, zero padded. |
| `%j` | `067` | The day of the year, zero padded to 3 digits. |
| `%M` | `04` | The minute, zero padded. |
| `%m` | `01` | The month, zero padded. |
| `%n`, `%t` | | A newline and a tab, respectively. |
| `%P`, `%p` | `am`, `AM` | Whether the time is in the AM or PM. |
| `%R` | `02:30` | Equivalent to `%H:%M`. |
| `%S` | `59` | The second, zero padded. |
| `%T` | `02:30:59` | Equivalent to `%H:%M:%S`. |
| `%Y` | `2015` | The full year, zero padded to at least 4 digits. |
| `%y` | `15` | The two-digit year. |
| `%Z` | `EDT` | The time zone abbreviation. Formatting only. |
| `%z` | `-0430` | The offset in the format `[+-]HHMM`. |

And the extensions:

| Specifier | Example | Description |
| --------- | ------- | ----------- |
| `%Ez` | `-04:30` | The offset in the format `[+-]HH:MM`. |
| `%E#S` | `02.125` | Seconds with exactly `#` fractional digits, `#` in `0..=9`. |
| `%E*S` | `02.125` | Seconds with full fractional precision, trailing zeros trimmed. |
| `%E4Y` | `-0005` | The year, sign included, always at least 4 digits. |

When formatting, a conversion the formatter does not recognize is copied to
the output verbatim, so formatting is total. When parsing, an unrecognized
conversion is an error, as is any input that deviates from the format string
in any way, including trailing data. A whitespace byte in the format string
matches any run (including an empty one) of whitespace in the input.

Parsing `%Z` is not supported because time zone abbreviations are ambiguous;
the parser accepts and ignores an abbreviation-shaped token.

[`strftime`]: https://pubs.opengroup.org/onlinepubs/009695399/functions/strftime.html
[`strptime`]: https://pubs.opengroup.org/onlinepubs/009695399/functions/strptime.html
*/

use alloc::string::String;
use core::time::Duration;

use crate::{
    civil::{CivilDay, CivilSecond, Weekday},
    error::{err, Error},
    instant::Instant,
    tz::{Offset, TimeZone},
};

/// The default format string: RFC 3339 with full precision and an
/// unambiguous offset, e.g. `2015-03-08T03:00:00-04:00`.
pub const DEFAULT_FORMAT: &str = "%Y-%m-%dT%H:%M:%E*S%Ez";

static WEEKDAY_NAMES: [&str; 7] =
    ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday"];

static MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August",
    "September", "October", "November", "December",
];

/// Formats the given instant in the given time zone, per the format string.
///
/// This is a total function: unknown conversion specifiers are copied to the
/// output verbatim rather than reported as errors.
///
/// # Example
///
/// ```
/// use civtz::{fmt::strtime, Instant, TimeZone};
///
/// let t = Instant::from_second(1_425_798_000);
/// let tz = TimeZone::posix("EST5EDT,M3.2.0,M11.1.0")?;
/// assert_eq!(
///     strtime::format("%a, %d %b %Y %T %z", t, &tz),
///     "Sun, 08 Mar 2015 03:00:00 -0400",
/// );
/// # Ok::<(), civtz::Error>(())
/// ```
pub fn format(
    format: impl AsRef<[u8]>,
    t: Instant,
    tz: &TimeZone,
) -> String {
    let lookup = tz.lookup(t);
    let mut formatter = Formatter {
        fmt: format.as_ref(),
        cs: lookup.cs,
        subsec: t.subsec_nanosecond(),
        offset: lookup.offset,
        abbreviation: lookup.abbreviation,
        out: String::new(),
    };
    formatter.format();
    formatter.out
}

/// Formats the given instant with the [`DEFAULT_FORMAT`] string.
///
/// # Example
///
/// ```
/// use civtz::{fmt::strtime, Instant, TimeZone};
///
/// let t = Instant::from_second(1_425_798_000);
/// assert_eq!(
///     strtime::format_default(t, &TimeZone::UTC),
///     "2015-03-08T07:00:00+00:00",
/// );
/// ```
pub fn format_default(t: Instant, tz: &TimeZone) -> String {
    format(DEFAULT_FORMAT, t, tz)
}

/// Parses the given input per the given format string, resolving the civil
/// fields through the given time zone.
///
/// Fields absent from the format string default to their minimums (the
/// fully-defaulted result is the Unix epoch). When the input carries an
/// explicit offset (`%z` or `%Ez`), that offset alone determines the
/// instant; otherwise the civil fields are resolved through the zone with
/// the same order-preserving default as [`TimeZone::to_instant`].
///
/// # Errors
///
/// Any input that does not match the format string completely is an error:
/// a stray byte, an out-of-range field value, a weekday that contradicts the
/// date, or unconsumed trailing input.
///
/// # Example
///
/// ```
/// use civtz::{fmt::strtime, Instant, TimeZone};
///
/// let t = strtime::parse(
///     "%Y-%m-%dT%H:%M:%E*S%Ez",
///     "2015-03-08T03:00:00-04:00",
///     &TimeZone::UTC,
/// )?;
/// assert_eq!(t, Instant::from_second(1_425_798_000));
/// # Ok::<(), civtz::Error>(())
/// ```
pub fn parse(
    format: impl AsRef<[u8]>,
    input: impl AsRef<[u8]>,
    tz: &TimeZone,
) -> Result<Instant, Error> {
    let mut parser = Parser {
        fmt: format.as_ref(),
        inp: input.as_ref(),
        fields: Fields::default(),
    };
    parser.parse().map_err(|e| e.parse())?;
    parser.fields.resolve(tz).map_err(|e| e.parse())
}

struct Formatter<'f, 't> {
    fmt: &'f [u8],
    cs: CivilSecond,
    subsec: i32,
    offset: Offset,
    abbreviation: &'t str,
    out: String,
}

impl<'f, 't> Formatter<'f, 't> {
    fn format(&mut self) {
        while !self.fmt.is_empty() {
            // Copy the run of literal bytes up to the next conversion in
            // one go; this also keeps multi-byte UTF-8 sequences intact.
            let literal =
                self.fmt.iter().position(|&b| b == b'%').unwrap_or(self.fmt.len());
            if literal > 0 {
                let (run, rest) = self.fmt.split_at(literal);
                self.out.push_str(&String::from_utf8_lossy(run));
                self.fmt = rest;
                continue;
            }
            self.fmt = &self.fmt[1..];
            self.format_one();
        }
    }

    fn format_one(&mut self) {
        let Some((&directive, rest)) = self.fmt.split_first() else {
            // A trailing '%' has nothing to convert; emit it as is.
            self.out.push('%');
            return;
        };
        self.fmt = rest;
        let cs = self.cs;
        match directive {
            b'%' => self.out.push('%'),
            b'A' => self.out.push_str(weekday_name(cs)),
            b'a' => self.out.push_str(&weekday_name(cs)[..3]),
            b'B' => self.out.push_str(month_name(cs)),
            b'b' | b'h' => self.out.push_str(&month_name(cs)[..3]),
            b'C' => self.push_int(cs.year().div_euclid(100), 2),
            b'D' => {
                self.push_int(i64::from(cs.month()), 2);
                self.out.push('/');
                self.push_int(i64::from(cs.day()), 2);
                self.out.push('/');
                self.push_int(cs.year().rem_euclid(100), 2);
            }
            b'd' => self.push_int(i64::from(cs.day()), 2),
            b'e' => {
                if cs.day() < 10 {
                    self.out.push(' ');
                }
                self.push_int(i64::from(cs.day()), 1);
            }
            b'F' => {
                self.push_year(cs.year());
                self.out.push('-');
                self.push_int(i64::from(cs.month()), 2);
                self.out.push('-');
                self.push_int(i64::from(cs.day()), 2);
            }
            b'H' => self.push_int(i64::from(cs.hour()), 2),
            b'I' => self.push_int((i64::from(cs.hour()) + 11) % 12 + 1, 2),
            b'j' => self.push_int(i64::from(CivilDay::from(cs).yearday()), 3),
            b'M' => self.push_int(i64::from(cs.minute()), 2),
            b'm' => self.push_int(i64::from(cs.month()), 2),
            b'n' => self.out.push('\n'),
            b'P' => self.out.push_str(if cs.hour() < 12 { "am" } else { "pm" }),
            b'p' => self.out.push_str(if cs.hour() < 12 { "AM" } else { "PM" }),
            b'R' => {
                self.push_int(i64::from(cs.hour()), 2);
                self.out.push(':');
                self.push_int(i64::from(cs.minute()), 2);
            }
            b'S' => self.push_int(i64::from(cs.second()), 2),
            b'T' => {
                self.push_int(i64::from(cs.hour()), 2);
                self.out.push(':');
                self.push_int(i64::from(cs.minute()), 2);
                self.out.push(':');
                self.push_int(i64::from(cs.second()), 2);
            }
            b't' => self.out.push('\t'),
            b'Y' => self.push_year(cs.year()),
            b'y' => self.push_int(cs.year().rem_euclid(100), 2),
            b'Z' => self.out.push_str(self.abbreviation),
            b'z' => self.push_offset(false),
            b'E' => self.format_extension(),
            unknown => {
                // Formatting is total: pass unrecognized conversions
                // through untouched.
                self.out.push('%');
                self.out.push(char::from(unknown));
            }
        }
    }

    fn format_extension(&mut self) {
        match *self.fmt {
            [b'z', ref rest @ ..] => {
                self.fmt = rest;
                self.push_offset(true);
            }
            [b'*', b'S', ref rest @ ..] => {
                self.fmt = rest;
                self.push_int(i64::from(self.cs.second()), 2);
                if self.subsec != 0 {
                    let mut frac = self.subsec;
                    let mut digits = 9;
                    while frac % 10 == 0 {
                        frac /= 10;
                        digits -= 1;
                    }
                    self.out.push('.');
                    self.push_int(i64::from(frac), digits);
                }
            }
            [digit @ b'0'..=b'9', b'S', ref rest @ ..] => {
                self.fmt = rest;
                self.push_int(i64::from(self.cs.second()), 2);
                let digits = usize::from(digit - b'0');
                if digits > 0 {
                    self.out.push('.');
                    let frac = i64::from(self.subsec)
                        / 10i64.pow(9 - digits as u32);
                    self.push_int(frac, digits);
                }
            }
            [b'4', b'Y', ref rest @ ..] => {
                self.fmt = rest;
                self.push_year(self.cs.year());
            }
            _ => {
                // Unrecognized extension; emit "%E" and let the main loop
                // deal with whatever follows.
                self.out.push_str("%E");
            }
        }
    }

    fn push_offset(&mut self, colon: bool) {
        let second = self.offset.seconds();
        self.out.push(if second < 0 { '-' } else { '+' });
        let second = second.unsigned_abs();
        self.push_int(i64::from(second / 3_600), 2);
        if colon {
            self.out.push(':');
        }
        self.push_int(i64::from((second / 60) % 60), 2);
    }

    /// Writes the year, sign first, zero padded to at least 4 digits.
    fn push_year(&mut self, year: i64) {
        if year < 0 {
            self.out.push('-');
        }
        self.push_int(year.unsigned_abs() as i64, 4);
    }

    fn push_int(&mut self, n: i64, width: usize) {
        use core::fmt::Write;

        // Writing into a `String` never fails.
        let _ = write!(self.out, "{n:0width$}");
    }
}

fn weekday_name(cs: CivilSecond) -> &'static str {
    let index = CivilDay::from(cs).weekday().to_monday_zero_offset();
    WEEKDAY_NAMES[usize::try_from(index).expect("weekday offset is 0..=6")]
}

fn month_name(cs: CivilSecond) -> &'static str {
    MONTH_NAMES[usize::try_from(cs.month() - 1).expect("month is 1..=12")]
}

/// The staging area parsing writes to.
///
/// Every field is optional so that resolution can tell "parsed as zero"
/// apart from "absent"; a weekday, for example, only participates as a
/// consistency check, and an explicit offset changes how the civil fields
/// are interpreted entirely.
#[derive(Default)]
struct Fields {
    year: Option<i64>,
    month: Option<i64>,
    day: Option<i64>,
    hour: Option<i64>,
    minute: Option<i64>,
    second: Option<i64>,
    subsec: Option<i32>,
    offset: Option<Offset>,
    weekday: Option<Weekday>,
    meridiem: Option<Meridiem>,
}

#[derive(Clone, Copy, Eq, PartialEq)]
enum Meridiem {
    Am,
    Pm,
}

impl Fields {
    fn resolve(&self, tz: &TimeZone) -> Result<Instant, Error> {
        let mut hour = self.hour.unwrap_or(0);
        if let Some(meridiem) = self.meridiem {
            hour = hour % 12
                + if meridiem == Meridiem::Pm { 12 } else { 0 };
        }
        let cs = CivilSecond::new(
            self.year.unwrap_or(1970),
            self.month.unwrap_or(1),
            self.day.unwrap_or(1),
            hour,
            self.minute.unwrap_or(0),
            self.second.unwrap_or(0),
        );
        if let Some(weekday) = self.weekday {
            let got = CivilDay::from(cs).weekday();
            if got != weekday {
                return Err(err!(
                    "parsed weekday {weekday:?} does not match date {date}, \
                     which falls on a {got:?}",
                    date = CivilDay::from(cs),
                ));
            }
        }
        let t = match self.offset {
            // An explicit offset pins the instant down with no ambiguity.
            Some(offset) => offset.to_instant(cs),
            None => tz.to_instant(cs),
        };
        Ok(match self.subsec {
            None | Some(0) => t,
            Some(subsec) => t + Duration::from_nanos(subsec as u64),
        })
    }
}

struct Parser<'f, 'i> {
    fmt: &'f [u8],
    inp: &'i [u8],
    fields: Fields,
}

impl<'f, 'i> Parser<'f, 'i> {
    fn parse(&mut self) -> Result<(), Error> {
        while let Some((&byte, rest)) = self.fmt.split_first() {
            if byte == b'%' {
                self.fmt = rest;
                self.parse_one()?;
            } else if byte.is_ascii_whitespace() {
                // Any whitespace in the format matches any run of
                // whitespace in the input, including none at all.
                self.fmt = rest;
                while let [b, ref inp_rest @ ..] = *self.inp {
                    if !b.is_ascii_whitespace() {
                        break;
                    }
                    self.inp = inp_rest;
                }
            } else {
                let Some((&got, inp_rest)) = self.inp.split_first() else {
                    return Err(err!(
                        "expected literal {:?} but input ended",
                        char::from(byte),
                    ));
                };
                if got != byte {
                    return Err(err!(
                        "expected literal {:?} but found {:?}",
                        char::from(byte),
                        char::from(got),
                    ));
                }
                self.fmt = rest;
                self.inp = inp_rest;
            }
        }
        if !self.inp.is_empty() {
            return Err(err!(
                "format string exhausted with {} bytes of input remaining",
                self.inp.len(),
            ));
        }
        Ok(())
    }

    fn parse_one(&mut self) -> Result<(), Error> {
        let Some((&directive, rest)) = self.fmt.split_first() else {
            return Err(err!("format string ends with an unclosed '%'"));
        };
        self.fmt = rest;
        match directive {
            b'%' => self.expect_literal(b'%'),
            b'A' | b'a' => self.parse_weekday(),
            b'B' | b'b' | b'h' => self.parse_month_name(),
            b'D' => {
                self.fields.month = Some(self.parse_int(2, "month")?);
                self.expect_literal(b'/')?;
                self.fields.day = Some(self.parse_int(2, "day")?);
                self.expect_literal(b'/')?;
                let yy = self.parse_int(2, "year")?;
                self.fields.year = Some(century_of(yy));
                Ok(())
            }
            b'd' | b'e' => {
                if directive == b'e' {
                    self.skip_one_space();
                }
                self.fields.day = Some(self.parse_int(2, "day")?);
                Ok(())
            }
            b'F' => {
                self.fields.year = Some(self.parse_signed_int(10, "year")?);
                self.expect_literal(b'-')?;
                self.fields.month = Some(self.parse_int(2, "month")?);
                self.expect_literal(b'-')?;
                self.fields.day = Some(self.parse_int(2, "day")?);
                Ok(())
            }
            b'H' => {
                self.fields.hour = Some(self.parse_int(2, "hour")?);
                Ok(())
            }
            b'I' => {
                let hour = self.parse_int(2, "hour")?;
                if !(1..=12).contains(&hour) {
                    return Err(err!("12-hour value {hour} not in 1..=12"));
                }
                self.fields.hour = Some(hour);
                Ok(())
            }
            b'j' => {
                let doy = self.parse_int(3, "day of year")?;
                if !(1..=366).contains(&doy) {
                    return Err(err!("day of year {doy} not in 1..=366"));
                }
                // Stored as January N; normalization folds it onto the
                // right month, and an explicit %m/%d later overrides it.
                self.fields.month = Some(1);
                self.fields.day = Some(doy);
                Ok(())
            }
            b'M' => {
                self.fields.minute = Some(self.parse_int(2, "minute")?);
                Ok(())
            }
            b'm' => {
                self.fields.month = Some(self.parse_int(2, "month")?);
                Ok(())
            }
            b'n' | b't' => {
                while let [b, ref rest @ ..] = *self.inp {
                    if !b.is_ascii_whitespace() {
                        break;
                    }
                    self.inp = rest;
                }
                Ok(())
            }
            b'P' | b'p' => {
                if self.eat_ci("am") {
                    self.fields.meridiem = Some(Meridiem::Am);
                } else if self.eat_ci("pm") {
                    self.fields.meridiem = Some(Meridiem::Pm);
                } else {
                    return Err(err!("expected AM or PM"));
                }
                Ok(())
            }
            b'R' => {
                self.fields.hour = Some(self.parse_int(2, "hour")?);
                self.expect_literal(b':')?;
                self.fields.minute = Some(self.parse_int(2, "minute")?);
                Ok(())
            }
            b'S' => {
                self.fields.second = Some(self.parse_int(2, "second")?);
                Ok(())
            }
            b'T' => {
                self.fields.hour = Some(self.parse_int(2, "hour")?);
                self.expect_literal(b':')?;
                self.fields.minute = Some(self.parse_int(2, "minute")?);
                self.expect_literal(b':')?;
                self.fields.second = Some(self.parse_int(2, "second")?);
                Ok(())
            }
            b'Y' => {
                self.fields.year = Some(self.parse_signed_int(10, "year")?);
                Ok(())
            }
            b'y' => {
                let yy = self.parse_int(2, "year")?;
                self.fields.year = Some(century_of(yy));
                Ok(())
            }
            b'Z' => {
                // Abbreviations are ambiguous, so the token is consumed
                // and otherwise ignored.
                let len = self
                    .inp
                    .iter()
                    .take_while(|&&b| {
                        b.is_ascii_alphanumeric() || b == b'+' || b == b'-'
                    })
                    .count();
                if len == 0 {
                    return Err(err!("expected a time zone abbreviation"));
                }
                self.inp = &self.inp[len..];
                Ok(())
            }
            b'z' => self.parse_offset(false),
            b'E' => self.parse_extension(),
            unknown => Err(err!(
                "unrecognized conversion specifier %{}",
                char::from(unknown),
            )),
        }
    }

    fn parse_extension(&mut self) -> Result<(), Error> {
        match *self.fmt {
            [b'z', ref rest @ ..] => {
                self.fmt = rest;
                self.parse_offset(true)
            }
            [b'*', b'S', ref rest @ ..] => {
                self.fmt = rest;
                self.fields.second = Some(self.parse_int(2, "second")?);
                if let [b'.', b'0'..=b'9', ..] = *self.inp {
                    self.inp = &self.inp[1..];
                    self.fields.subsec = Some(self.parse_subsec(9, false)?);
                }
                Ok(())
            }
            [digit @ b'0'..=b'9', b'S', ref rest @ ..] => {
                self.fmt = rest;
                self.fields.second = Some(self.parse_int(2, "second")?);
                let digits = usize::from(digit - b'0');
                if digits > 0 {
                    self.expect_literal(b'.')?;
                    self.fields.subsec =
                        Some(self.parse_subsec(digits, true)?);
                }
                Ok(())
            }
            [b'4', b'Y', ref rest @ ..] => {
                self.fmt = rest;
                self.fields.year = Some(self.parse_signed_int(10, "year")?);
                Ok(())
            }
            _ => Err(err!("unrecognized conversion specifier after %E")),
        }
    }

    /// Parses `[+-]HHMM` (or `[+-]HH:MM` when `colon` is set) into an
    /// offset.
    fn parse_offset(&mut self, colon: bool) -> Result<(), Error> {
        let sign = match self.inp.split_first() {
            Some((&b'+', rest)) => {
                self.inp = rest;
                1
            }
            Some((&b'-', rest)) => {
                self.inp = rest;
                -1
            }
            _ => return Err(err!("expected offset to begin with '+' or '-'")),
        };
        let hours = self.parse_exact_int(2, "offset hours")?;
        if colon {
            self.expect_literal(b':')?;
        }
        let minutes = self.parse_exact_int(2, "offset minutes")?;
        if minutes > 59 {
            return Err(err!("offset minutes {minutes} not in 0..=59"));
        }
        let seconds = sign * (hours * 3_600 + minutes * 60);
        let offset = Offset::from_seconds(seconds as i32)?;
        self.fields.offset = Some(offset);
        Ok(())
    }

    /// Parses fractional second digits as nanoseconds: exactly `digits` of
    /// them when `exact` is set, otherwise one up to `digits`.
    fn parse_subsec(
        &mut self,
        digits: usize,
        exact: bool,
    ) -> Result<i32, Error> {
        let mut nanosecond: i32 = 0;
        let mut scale = 100_000_000;
        let mut seen = 0;
        while seen < digits {
            match self.inp.split_first() {
                Some((&b, rest)) if b.is_ascii_digit() => {
                    nanosecond += i32::from(b - b'0') * scale;
                    scale /= 10;
                    seen += 1;
                    self.inp = rest;
                }
                _ if seen > 0 && !exact => break,
                _ => {
                    return Err(err!(
                        "expected {digits} fractional second digits, \
                         found {seen}",
                    ))
                }
            }
        }
        Ok(nanosecond)
    }

    fn parse_weekday(&mut self) -> Result<(), Error> {
        for (i, name) in WEEKDAY_NAMES.iter().enumerate() {
            if self.eat_ci(name) || self.eat_ci(&name[..3]) {
                self.fields.weekday =
                    Some(Weekday::from_monday_zero_offset(i as i8));
                return Ok(());
            }
        }
        Err(err!("expected a weekday name"))
    }

    fn parse_month_name(&mut self) -> Result<(), Error> {
        for (i, name) in MONTH_NAMES.iter().enumerate() {
            if self.eat_ci(name) || self.eat_ci(&name[..3]) {
                self.fields.month = Some(i as i64 + 1);
                return Ok(());
            }
        }
        Err(err!("expected a month name"))
    }

    /// Parses 1 to `max_digits` decimal digits, validating against the
    /// field's natural range where one exists.
    fn parse_int(&mut self, max_digits: usize, what: &str) -> Result<i64, Error> {
        let n = self.parse_digits(max_digits, what)?;
        let ok = match what {
            "month" => (1..=12).contains(&n),
            "day" => (1..=31).contains(&n),
            "hour" => (0..=23).contains(&n),
            "minute" | "second" => (0..=59).contains(&n),
            _ => true,
        };
        if !ok {
            return Err(err!("{what} value {n} is out of range"));
        }
        Ok(n)
    }

    fn parse_signed_int(
        &mut self,
        max_digits: usize,
        what: &str,
    ) -> Result<i64, Error> {
        let negative = match self.inp.first() {
            Some(&b'-') => {
                self.inp = &self.inp[1..];
                true
            }
            Some(&b'+') => {
                self.inp = &self.inp[1..];
                false
            }
            _ => false,
        };
        let n = self.parse_digits(max_digits, what)?;
        Ok(if negative { -n } else { n })
    }

    fn parse_exact_int(
        &mut self,
        digits: usize,
        what: &str,
    ) -> Result<i64, Error> {
        let start_len = self.inp.len();
        let n = self.parse_digits(digits, what)?;
        if start_len - self.inp.len() != digits {
            return Err(err!("expected exactly {digits} digits for {what}"));
        }
        Ok(n)
    }

    fn parse_digits(
        &mut self,
        max_digits: usize,
        what: &str,
    ) -> Result<i64, Error> {
        let mut n: i64 = 0;
        let mut seen = 0;
        while seen < max_digits {
            match self.inp.split_first() {
                Some((&b, rest)) if b.is_ascii_digit() => {
                    n = n * 10 + i64::from(b - b'0');
                    seen += 1;
                    self.inp = rest;
                }
                _ => break,
            }
        }
        if seen == 0 {
            return Err(err!("expected at least one digit for {what}"));
        }
        Ok(n)
    }

    fn expect_literal(&mut self, want: u8) -> Result<(), Error> {
        match self.inp.split_first() {
            Some((&got, rest)) if got == want => {
                self.inp = rest;
                Ok(())
            }
            Some((&got, _)) => Err(err!(
                "expected {:?} but found {:?}",
                char::from(want),
                char::from(got),
            )),
            None => {
                Err(err!("expected {:?} but input ended", char::from(want)))
            }
        }
    }

    fn skip_one_space(&mut self) {
        if let Some((&b' ', rest)) = self.inp.split_first() {
            self.inp = rest;
        }
    }

    /// Consumes `word` from the input case-insensitively, returning whether
    /// it matched.
    fn eat_ci(&mut self, word: &str) -> bool {
        let word = word.as_bytes();
        if self.inp.len() < word.len() {
            return false;
        }
        let (head, rest) = self.inp.split_at(word.len());
        if head.eq_ignore_ascii_case(word) {
            self.inp = rest;
            true
        } else {
            false
        }
    }
}

/// Maps a two-digit year onto 1969-2068, the usual POSIX pivot.
fn century_of(yy: i64) -> i64 {
    if yy < 69 {
        yy + 2000
    } else {
        yy + 1900
    }
}

#[cfg(test)]
mod tests {
    use crate::tz::testdata;

    use super::*;

    #[test]
    fn format_default_examples() {
        let ny = testdata::new_york();
        assert_eq!(
            format_default(Instant::from_second(1_425_798_000), &ny),
            "2015-03-08T03:00:00-04:00",
        );
        assert_eq!(
            format_default(Instant::from_second(1_425_799_800), &ny),
            "2015-03-08T03:30:00-04:00",
        );
        assert_eq!(
            format_default(Instant::from_second(1_425_796_200), &ny),
            "2015-03-08T01:30:00-05:00",
        );
        assert_eq!(
            format_default(Instant::from_second(1_446_357_600), &ny),
            "2015-11-01T01:00:00-05:00",
        );
    }

    #[test]
    fn flight_connection() {
        // A flight departing New York at 12:01 on 1978-12-30, spending
        // 14 hours and 44 minutes in the air, lands in Tehran at 11:45
        // local time on 1978-12-31.
        let ny = testdata::new_york();
        let tehran = testdata::tehran();
        let dep = ny.to_instant(CivilSecond::new(1978, 12, 30, 12, 1, 0));
        let arr = dep + Duration::from_secs(14 * 3_600 + 44 * 60);
        assert_eq!(
            format_default(arr, &tehran),
            "1978-12-31T11:45:00+04:00",
        );
    }

    #[test]
    fn format_specifiers() {
        let ny = testdata::new_york();
        let t = Instant::from_second(1_425_798_000);
        assert_eq!(format("%Y-%m-%d", t, &ny), "2015-03-08");
        assert_eq!(format("%F", t, &ny), "2015-03-08");
        assert_eq!(format("%D", t, &ny), "03/08/15");
        assert_eq!(format("%A %a", t, &ny), "Sunday Sun");
        assert_eq!(format("%B %b %h", t, &ny), "March Mar Mar");
        assert_eq!(format("%C%y", t, &ny), "2015");
        assert_eq!(format("%e", t, &ny), " 8");
        assert_eq!(format("%j", t, &ny), "067");
        assert_eq!(format("%I %p %P", t, &ny), "03 AM am");
        assert_eq!(format("%T", t, &ny), "03:00:00");
        assert_eq!(format("%R", t, &ny), "03:00");
        assert_eq!(format("%Z %z %Ez", t, &ny), "EDT -0400 -04:00");
        assert_eq!(format("100%% organic", t, &ny), "100% organic");
        // An afternoon time for the 12-hour clock.
        let t = Instant::from_second(1_425_798_000 + 12 * 3_600);
        assert_eq!(format("%I %p", t, &ny), "03 PM");
    }

    #[test]
    fn format_fractional_seconds() {
        let utc = TimeZone::UTC;
        let t = Instant::new(1_425_798_000, 123_456_789);
        assert_eq!(format("%E*S", t, &utc), "00.123456789");
        assert_eq!(format("%E3S", t, &utc), "00.123");
        assert_eq!(format("%E0S", t, &utc), "00");
        assert_eq!(format("%E9S", t, &utc), "00.123456789");
        let t = Instant::new(1_425_798_000, 250_000_000);
        assert_eq!(format("%E*S", t, &utc), "00.25");
        assert_eq!(format("%E6S", t, &utc), "00.250000");
        let t = Instant::from_second(1_425_798_000);
        assert_eq!(format("%E*S", t, &utc), "00");
        assert_eq!(format("%E2S", t, &utc), "00.00");
    }

    #[test]
    fn format_years() {
        let utc = TimeZone::UTC;
        // 0005-03-01T00:00:00Z.
        let t = Instant::from_second(-62_004_268_800);
        assert_eq!(format("%Y", t, &utc), "0005");
        assert_eq!(format("%E4Y", t, &utc), "0005");
        // A negative year.
        let t = Instant::from_second(-62_450_000_000);
        assert!(format("%E4Y", t, &utc).starts_with("-00"));
    }

    #[test]
    fn format_is_total() {
        let utc = TimeZone::UTC;
        let t = Instant::from_second(0);
        // Unknown specifiers are passed through, not errors.
        assert_eq!(format("%Q", t, &utc), "%Q");
        assert_eq!(format("%E!", t, &utc), "%E!");
        assert_eq!(format("trailing %", t, &utc), "trailing %");
    }

    #[test]
    fn parse_with_explicit_offset() {
        let utc = TimeZone::UTC;
        let t = parse(
            DEFAULT_FORMAT,
            "2015-03-08T03:00:00-04:00",
            &utc,
        )
        .unwrap();
        assert_eq!(t, Instant::from_second(1_425_798_000));
        // The zone is irrelevant when an offset is present.
        let ny = testdata::new_york();
        let t = parse(DEFAULT_FORMAT, "2015-03-08T03:00:00-04:00", &ny)
            .unwrap();
        assert_eq!(t, Instant::from_second(1_425_798_000));
        // Fractional input.
        let t = parse(DEFAULT_FORMAT, "2015-03-08T03:00:00.25-04:00", &utc)
            .unwrap();
        assert_eq!(t, Instant::new(1_425_798_000, 250_000_000));
    }

    #[test]
    fn parse_resolves_through_zone() {
        let ny = testdata::new_york();
        // An unambiguous civil time.
        let t = parse("%Y-%m-%d %H:%M:%S", "2015-06-01 12:00:00", &ny)
            .unwrap();
        assert_eq!(ny.to_civil(t), CivilSecond::new(2015, 6, 1, 12, 0, 0));
        // A skipped civil time resolves to the transition instant.
        let t = parse("%Y-%m-%d %H:%M:%S", "2015-03-08 02:30:00", &ny)
            .unwrap();
        assert_eq!(t, Instant::from_second(1_425_798_000));
        // A repeated civil time resolves to its earlier occurrence.
        let t = parse("%Y-%m-%d %H:%M:%S", "2015-11-01 01:30:00", &ny)
            .unwrap();
        assert_eq!(t, Instant::from_second(1_446_355_800));
    }

    #[test]
    fn parse_defaults_missing_fields() {
        let utc = TimeZone::UTC;
        assert_eq!(
            parse("%Y", "1970", &utc).unwrap(),
            Instant::UNIX_EPOCH,
        );
        assert_eq!(
            parse("%Y-%m", "2015-03", &utc).unwrap(),
            utc.to_instant(CivilSecond::new(2015, 3, 1, 0, 0, 0)),
        );
        assert_eq!(parse("", "", &utc).unwrap(), Instant::UNIX_EPOCH);
    }

    #[test]
    fn parse_names_and_meridiem() {
        let utc = TimeZone::UTC;
        let t = parse(
            "%a, %d %b %Y %I:%M %p",
            "Sun, 08 Mar 2015 07:30 PM",
            &utc,
        )
        .unwrap();
        assert_eq!(
            utc.to_civil(t),
            CivilSecond::new(2015, 3, 8, 19, 30, 0),
        );
        // Case-insensitive names, and full names where the format says
        // abbreviated.
        let t = parse("%a %B", "sunday march", &utc).unwrap();
        assert_eq!(utc.to_civil(t).month(), 3);
        // 12 AM is midnight.
        let t = parse("%I %p", "12 AM", &utc).unwrap();
        assert_eq!(utc.to_civil(t).hour(), 0);
        let t = parse("%I %p", "12 PM", &utc).unwrap();
        assert_eq!(utc.to_civil(t).hour(), 12);
    }

    #[test]
    fn parse_validates() {
        let utc = TimeZone::UTC;
        // Trailing input.
        assert!(parse("%Y", "2015x", &utc).is_err());
        // Out of range fields.
        assert!(parse("%m", "13", &utc).is_err());
        assert!(parse("%H:%M", "25:00", &utc).is_err());
        assert!(parse("%H:%M", "23:61", &utc).is_err());
        // A weekday that contradicts the date: 2015-03-08 was a Sunday.
        assert!(
            parse("%a %F", "Mon 2015-03-08", &utc).is_err(),
        );
        assert!(parse("%a %F", "Sun 2015-03-08", &utc).is_ok());
        // Mismatched literals and truncated input.
        assert!(parse("%Y-%m", "2015/03", &utc).is_err());
        assert!(parse("%Y-%m", "2015-", &utc).is_err());
        // Bad offsets.
        assert!(parse("%Ez", "-04:0", &utc).is_err());
        assert!(parse("%z", "-04:00", &utc).is_err());
        assert!(parse("%Ez", "0400", &utc).is_err());
        // Errors carry the parse class.
        let err = parse("%Y", "not a year", &utc).unwrap_err();
        assert!(err.is_parse());
        assert!(!err.is_load());
    }

    #[test]
    fn parse_whitespace_is_flexible() {
        let utc = TimeZone::UTC;
        assert!(parse("%Y %m", "2015    03", &utc).is_ok());
        // Zero whitespace also matches; %m is not greedy past two digits.
        assert!(parse("%m %d", "0308", &utc).is_ok());
        assert!(parse("%Y\t%m", "2015 03", &utc).is_ok());
    }

    #[test]
    fn roundtrip_through_default_format() {
        let ny = testdata::new_york();
        for &second in &[
            0i64,
            1_425_798_000,
            1_446_357_599,
            -1_000_000_000,
            2_000_000_000,
        ] {
            let t = Instant::from_second(second);
            let rendered = format_default(t, &ny);
            let parsed = parse(DEFAULT_FORMAT, &rendered, &ny).unwrap();
            assert_eq!(parsed, t, "roundtrip of {rendered}");
        }
    }
}

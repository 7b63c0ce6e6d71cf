/// A representation of a day of the week.
///
/// The default representation in this crate is Monday-based, but conversion
/// routines are provided for Sunday-based offsets (as used, e.g., by POSIX
/// time zone rules and the `%a`/`%A` conversion specifiers).
///
/// # Example
///
/// ```
/// use civtz::civil::Weekday;
///
/// assert_eq!(Weekday::Sunday.to_monday_zero_offset(), 6);
/// assert_eq!(Weekday::Sunday.to_sunday_zero_offset(), 0);
/// assert_eq!(Weekday::Saturday.next(), Weekday::Sunday);
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Weekday {
    /// Monday.
    Monday,
    /// Tuesday.
    Tuesday,
    /// Wednesday.
    Wednesday,
    /// Thursday.
    Thursday,
    /// Friday.
    Friday,
    /// Saturday.
    Saturday,
    /// Sunday.
    Sunday,
}

impl Weekday {
    /// Converts an offset in `0..=6`, with `0` corresponding to Monday.
    ///
    /// # Panics
    ///
    /// When the offset is out of range.
    pub const fn from_monday_zero_offset(offset: i8) -> Weekday {
        match offset {
            0 => Weekday::Monday,
            1 => Weekday::Tuesday,
            2 => Weekday::Wednesday,
            3 => Weekday::Thursday,
            4 => Weekday::Friday,
            5 => Weekday::Saturday,
            6 => Weekday::Sunday,
            _ => panic!("invalid Monday-based weekday offset"),
        }
    }

    /// Converts an offset in `0..=6`, with `0` corresponding to Sunday.
    ///
    /// # Panics
    ///
    /// When the offset is out of range.
    pub const fn from_sunday_zero_offset(offset: i8) -> Weekday {
        Weekday::from_monday_zero_offset((offset + 6) % 7)
    }

    /// Returns this weekday as an offset in `0..=6` with Monday as `0`.
    pub const fn to_monday_zero_offset(self) -> i8 {
        self as i8
    }

    /// Returns this weekday as an offset in `0..=6` with Sunday as `0`.
    pub const fn to_sunday_zero_offset(self) -> i8 {
        (self.to_monday_zero_offset() + 1) % 7
    }

    /// Returns the weekday after this one, wrapping around at the end of
    /// the week.
    pub const fn next(self) -> Weekday {
        Weekday::from_monday_zero_offset(
            (self.to_monday_zero_offset() + 1) % 7,
        )
    }

    /// Returns the weekday before this one, wrapping around at the start of
    /// the week.
    pub const fn previous(self) -> Weekday {
        Weekday::from_monday_zero_offset(
            (self.to_monday_zero_offset() + 6) % 7,
        )
    }
}

//! Julian days and minute offsets.
//!
//! Blocks carry their date as a day of the year and their times as minutes after midnight, with
//! no year at all. The year comes from whoever hands us the message, and we nudge it back by one
//! when the transmission obviously belongs to the end of last year.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

/// The first Julian day that can belong to the tail of the previous year.
pub const YEAR_END_DAY: i64 = 365;

/// An error returned when a Julian day can't be turned into a date.
#[derive(Debug, Fail, PartialEq)]
pub enum Error {
    /// The date falls outside of the range that we can represent.
    #[fail(display = "julian day {} of {} is out of range", day, year)]
    OutOfRange {
        /// The Julian day.
        day: i64,

        /// The nominal year.
        year: i32,
    },
}

/// Converts a Julian day into a calendar date.
///
/// Days past the end of the year roll over into the next one.
///
/// # Examples
///
/// ```
/// # extern crate chrono;
/// # extern crate pseudobinary;
/// # fn main() {
/// use chrono::NaiveDate;
/// use pseudobinary::time;
/// assert_eq!(NaiveDate::from_ymd_opt(2023, 12, 31), time::julian_to_date(365, 2023).ok());
/// assert_eq!(NaiveDate::from_ymd_opt(2024, 1, 1), time::julian_to_date(366, 2023).ok());
/// # }
/// ```
pub fn julian_to_date(day: i64, year: i32) -> Result<NaiveDate, Error> {
    let out_of_range = Error::OutOfRange {
        day: day,
        year: year,
    };
    NaiveDate::from_ymd_opt(year, 1, 1)
        .and_then(|date| date.checked_add_signed(Duration::days(day - 1)))
        .ok_or(out_of_range)
}

/// Converts a Julian day into a date, pulling it back into last year if it is in the future.
///
/// A block from the last day or two of December that is decoded in January would otherwise land
/// in next December. If the date is after `now` and the day is at least 365, the date's year is
/// replaced with `year - 1`. Only the year changes. A day that has already rolled past the end of
/// `year` is left alone.
///
/// # Examples
///
/// ```
/// # extern crate chrono;
/// # extern crate pseudobinary;
/// # fn main() {
/// use chrono::{NaiveDate, TimeZone, Utc};
/// use pseudobinary::time;
/// let now = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
/// assert_eq!(
///     NaiveDate::from_ymd_opt(2023, 12, 30),
///     time::resolve_date(365, 2024, &now).ok()
/// );
/// # }
/// ```
pub fn resolve_date(day: i64, year: i32, now: &DateTime<Utc>) -> Result<NaiveDate, Error> {
    let date = julian_to_date(day, year)?;
    let midnight = date.and_hms_opt(0, 0, 0).ok_or(Error::OutOfRange {
        day: day,
        year: year,
    })?;
    if midnight > now.naive_utc() && day >= YEAR_END_DAY && date.year() == year {
        date.with_year(year - 1).ok_or(Error::OutOfRange {
            day: day,
            year: year,
        })
    } else {
        Ok(date)
    }
}

/// Renders a signed minute offset as `[-]HH:MM:SS`.
///
/// Hours are not wrapped, so a day and a bit renders as `25:00:00`.
///
/// # Examples
///
/// ```
/// use pseudobinary::time;
/// assert_eq!("11:59:00", time::minutes_to_time(719));
/// assert_eq!("-00:05:00", time::minutes_to_time(-5));
/// assert_eq!("25:00:00", time::minutes_to_time(1500));
/// ```
pub fn minutes_to_time(minutes: i64) -> String {
    let sign = if minutes < 0 { "-" } else { "" };
    let minutes = minutes.abs();
    format!("{}{:02}:{:02}:{:02}", sign, minutes / 60, minutes % 60, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn julian() {
        assert_eq!(ymd(2023, 1, 1), julian_to_date(1, 2023).unwrap());
        assert_eq!(ymd(2023, 12, 31), julian_to_date(365, 2023).unwrap());
        assert_eq!(ymd(2024, 12, 30), julian_to_date(365, 2024).unwrap());
        assert_eq!(ymd(2024, 4, 9), julian_to_date(100, 2024).unwrap());
        assert_eq!(ymd(2022, 12, 31), julian_to_date(0, 2023).unwrap());
        assert!(julian_to_date(1, 400_000).is_err());
    }

    #[test]
    fn future_year_end_goes_back_a_year() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        assert_eq!(ymd(2023, 12, 30), resolve_date(365, 2024, &now).unwrap());
        assert_eq!(ymd(2023, 12, 31), resolve_date(366, 2024, &now).unwrap());
    }

    #[test]
    fn past_year_end_stays() {
        let now = Utc.with_ymd_and_hms(2025, 1, 2, 0, 0, 0).unwrap();
        assert_eq!(ymd(2024, 12, 30), resolve_date(365, 2024, &now).unwrap());
    }

    #[test]
    fn future_before_year_end_stays() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
        assert_eq!(ymd(2024, 12, 29), resolve_date(364, 2024, &now).unwrap());
    }

    #[test]
    fn rolled_over_day_keeps_its_year() {
        let now = Utc.with_ymd_and_hms(2023, 6, 1, 0, 0, 0).unwrap();
        assert_eq!(ymd(2024, 1, 1), resolve_date(366, 2023, &now).unwrap());
    }

    #[test]
    fn same_day_is_not_the_future() {
        let now = Utc.with_ymd_and_hms(2023, 12, 31, 0, 0, 0).unwrap();
        assert_eq!(ymd(2023, 12, 31), resolve_date(365, 2023, &now).unwrap());
    }

    #[test]
    fn minutes() {
        assert_eq!("00:00:00", minutes_to_time(0));
        assert_eq!("-00:05:00", minutes_to_time(-5));
        assert_eq!("-01:01:00", minutes_to_time(-61));
        assert_eq!("24:00:00", minutes_to_time(1440));
        assert_eq!("25:00:00", minutes_to_time(1500));
        assert_eq!("100:00:00", minutes_to_time(6000));
    }
}

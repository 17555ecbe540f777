//! Output records, ready to be written to a table.
//!
//! Samples carry their time as minutes after midnight, which can run past the end of the day (a
//! block that starts at 24:00) or before its start (a block that starts at midnight and has its
//! start time corrected back a minute). Records fold those minutes into the date, so every
//! timestamp is a real time of day:
//!
//! ```
//! # extern crate chrono;
//! # extern crate pseudobinary;
//! # fn main() {
//! use chrono::NaiveDate;
//! use pseudobinary::decoder::Sample;
//! use pseudobinary::sensor::Sensor;
//! use pseudobinary::Record;
//!
//! let sample = Sample {
//!     sensor: Sensor::Prs,
//!     date: NaiveDate::from_ymd_opt(2024, 4, 9).unwrap(),
//!     minutes: -1,
//!     value: Some(1.234),
//! };
//! let record = Record::new(&sample).unwrap();
//! assert_eq!("2024-04-08 23:59:00+00:00", record.timestamp);
//! assert_eq!("PRS", record.sensor);
//! assert_eq!("1.234", record.data);
//! # }
//! ```

use chrono::{Duration, NaiveDate, NaiveDateTime};
use decoder::Sample;

/// The format of record timestamps.
///
/// The transmissions don't carry a time zone; they are UTC.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S+00:00";

/// The number of characters kept from each sensor tag.
pub const SENSOR_TAG_LENGTH: usize = 3;

/// A formatted measurement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    /// The measurement time, e.g. `2024-04-09 11:59:00+00:00`.
    pub timestamp: String,

    /// The three character sensor tag.
    pub sensor: String,

    /// The value, with the sensor's precision.
    ///
    /// Empty if the measurement was missing.
    pub data: String,
}

/// An error returned when a sample can't be turned into a record.
#[derive(Debug, Fail, PartialEq)]
pub enum Error {
    /// The sample's date and time can't be represented.
    #[fail(display = "{} minutes after {} is out of range", minutes, date)]
    Timestamp {
        /// The sample date.
        date: NaiveDate,

        /// The minute offset.
        minutes: i64,
    },
}

impl Record {
    /// Creates a record from a sample.
    pub fn new(sample: &Sample) -> Result<Record, Error> {
        let datetime = timestamp(sample.date, sample.minutes).ok_or(Error::Timestamp {
            date: sample.date,
            minutes: sample.minutes,
        })?;
        let precision = sample.sensor.precision();
        Ok(Record {
            timestamp: datetime.format(TIMESTAMP_FORMAT).to_string(),
            sensor: sample.tag().chars().take(SENSOR_TAG_LENGTH).collect(),
            data: sample
                .value
                .map(|value| format!("{:.*}", precision, value))
                .unwrap_or_default(),
        })
    }
}

/// Formats samples into records, newest first.
///
/// Records with the same timestamp keep their sample order.
///
/// # Examples
///
/// ```
/// # extern crate chrono;
/// # extern crate pseudobinary;
/// # fn main() {
/// use chrono::{TimeZone, Utc};
/// use pseudobinary::{record, Decoder};
///
/// let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
/// let samples = Decoder::with_now(2024, now)
///     .decode_payload("+AAdKP@O@SR@SS+HAdKP@O@A}@A|.")
///     .unwrap();
/// let records = record::format(&samples).unwrap();
/// let times: Vec<_> = records.iter().map(|r| r.timestamp.as_str()).collect();
/// assert_eq!(
///     vec![
///         "2024-04-09 11:59:00+00:00",
///         "2024-04-09 11:59:00+00:00",
///         "2024-04-09 11:44:00+00:00",
///         "2024-04-09 11:44:00+00:00",
///     ],
///     times
/// );
/// # }
/// ```
pub fn format(samples: &[Sample]) -> Result<Vec<Record>, Error> {
    let mut records = samples
        .iter()
        .map(Record::new)
        .collect::<Result<Vec<_>, _>>()?;
    records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    Ok(records)
}

/// Folds a minute offset into its date.
///
/// Offsets of a day or more roll forward into the following days; negative offsets count back
/// from midnight into the previous days.
fn timestamp(date: NaiveDate, minutes: i64) -> Option<NaiveDateTime> {
    date.and_hms_opt(0, 0, 0)
        .and_then(|midnight| midnight.checked_add_signed(Duration::minutes(minutes)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sensor::Sensor;

    fn sample(sensor: Sensor, minutes: i64, value: Option<f64>) -> Sample {
        Sample {
            sensor: sensor,
            date: NaiveDate::from_ymd_opt(2024, 4, 9).unwrap(),
            minutes: minutes,
            value: value,
        }
    }

    fn record(sensor: Sensor, minutes: i64, value: Option<f64>) -> Record {
        Record::new(&sample(sensor, minutes, value)).unwrap()
    }

    #[test]
    fn hour_twenty_four_is_midnight_tomorrow() {
        assert_eq!(
            "2024-04-10 00:00:00+00:00",
            record(Sensor::Prs, 1440, Some(1.)).timestamp
        );
        assert_eq!(
            "2024-04-10 00:59:00+00:00",
            record(Sensor::Prs, 1499, Some(1.)).timestamp
        );
    }

    #[test]
    fn negative_minutes_are_yesterday() {
        assert_eq!(
            "2024-04-08 23:59:00+00:00",
            record(Sensor::Prs, -1, Some(1.)).timestamp
        );
        assert_eq!(
            "2024-04-08 23:05:00+00:00",
            record(Sensor::Prs, -55, Some(1.)).timestamp
        );
    }

    #[test]
    fn hours_past_twenty_four() {
        assert_eq!(
            "2024-04-10 01:00:00+00:00",
            record(Sensor::Prs, 1500, Some(1.)).timestamp
        );
        assert_eq!(
            "2024-04-08 22:59:00+00:00",
            record(Sensor::Prs, -61, Some(1.)).timestamp
        );
    }

    #[test]
    fn month_and_year_boundaries() {
        let mut s = sample(Sensor::Prs, 1440, Some(1.));
        s.date = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
        assert_eq!(
            "2024-01-01 00:00:00+00:00",
            Record::new(&s).unwrap().timestamp
        );
        s.date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        s.minutes = -1;
        assert_eq!(
            "2024-02-29 23:59:00+00:00",
            Record::new(&s).unwrap().timestamp
        );
    }

    #[test]
    fn precision() {
        assert_eq!("42", record(Sensor::Sw1, 0, Some(42.)).data);
        assert_eq!("7", record(Sensor::Sw2, 0, Some(7.)).data);
        assert_eq!("12.5", record(Sensor::Bat, 0, Some(12.5)).data);
        assert_eq!("1013.2", record(Sensor::Atm, 0, Some(1013.2)).data);
        assert_eq!("21.5", record(Sensor::Sst, 0, Some(21.5)).data);
        assert_eq!("3.0", record(Sensor::Rsd, 0, Some(3.)).data);
        assert_eq!("1.234", record(Sensor::Prs, 0, Some(1.234)).data);
        assert_eq!("-0.005", record(Sensor::Rad, 0, Some(-0.005)).data);
        assert_eq!("42.000", record(Sensor::Wav, 0, Some(42.)).data);
    }

    #[test]
    fn missing_value_is_empty() {
        let record = record(Sensor::Prs, 0, None);
        assert_eq!("", record.data);
        assert_eq!("PRS", record.sensor);
    }

    #[test]
    fn tags_are_three_characters() {
        for sensor in Sensor::all() {
            assert_eq!(3, record(sensor, 0, Some(1.)).sensor.chars().count());
        }
        assert_eq!("Ava", record(Sensor::Available(24), 0, Some(1.)).sensor);
        assert_eq!("SW1", record(Sensor::Sw1Samples, 0, Some(1.)).sensor);
    }

    #[test]
    fn sorted_newest_first() {
        let samples = vec![
            sample(Sensor::Prs, 719, Some(1.)),
            sample(Sensor::Prs, 704, Some(2.)),
            sample(Sensor::Bat, 1440, Some(3.)),
            sample(Sensor::Bat, -1, Some(4.)),
            sample(Sensor::Atm, 719, Some(5.)),
        ];
        let records = format(&samples).unwrap();
        for pair in records.windows(2) {
            assert!(pair[0].timestamp >= pair[1].timestamp);
        }
        let data: Vec<_> = records.iter().map(|r| r.data.as_str()).collect();
        assert_eq!(vec!["3.0", "1.000", "5.0", "2.000", "4.0"], data);
    }

    #[test]
    fn out_of_range() {
        let mut s = sample(Sensor::Prs, 1440, Some(1.));
        s.date = NaiveDate::MAX;
        assert!(Record::new(&s).is_err());
    }
}

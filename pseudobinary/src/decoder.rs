//! Turn a message's blocks into timestamped samples.

use block::Blocks;
use chrono::{DateTime, NaiveDate, Utc};
use sensor::Sensor;
use time;
use Message;

/// One decoded measurement, before it is formatted for output.
#[derive(Clone, Debug, PartialEq)]
pub struct Sample {
    /// The sensor that took the measurement.
    pub sensor: Sensor,

    /// The date of the block the measurement came from.
    pub date: NaiveDate,

    /// The measurement's time, as minutes after midnight of `date`.
    ///
    /// Can be negative or run past the end of the day.
    pub minutes: i64,

    /// The scaled value, or none if the measurement was missing.
    pub value: Option<f64>,
}

/// Decodes pseudobinary-C payloads.
///
/// The transmissions don't carry a year, so the decoder needs one. It also needs to know when "now"
/// is, so it can tell if a date near the end of the year is actually from last year.
///
/// # Examples
///
/// ```
/// # extern crate chrono;
/// # extern crate pseudobinary;
/// # fn main() {
/// use chrono::{TimeZone, Utc};
/// use pseudobinary::{Decoder, Message};
///
/// let message = Message::new("0C1+AAdKP@O@SR@SS. STATIONX.").unwrap();
/// let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
/// let samples = Decoder::with_now(2024, now).decode(&message).unwrap();
/// assert_eq!(2, samples.len());
/// assert_eq!("11:59:00", samples[0].time());
/// assert_eq!(Some(1.235), samples[1].value);
/// # }
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Decoder {
    year: i32,
    now: DateTime<Utc>,
}

impl Sample {
    /// Returns this sample's sensor tag.
    pub fn tag(&self) -> &'static str {
        self.sensor.tag()
    }

    /// Returns this sample's time as `[-]HH:MM:SS`, without wrapping into neighboring days.
    pub fn time(&self) -> String {
        time::minutes_to_time(self.minutes)
    }
}

impl Decoder {
    /// Creates a decoder for the given year, using the current time as "now".
    ///
    /// # Examples
    ///
    /// ```
    /// use pseudobinary::Decoder;
    /// let decoder = Decoder::new(2024);
    /// ```
    pub fn new(year: i32) -> Decoder {
        Decoder::with_now(year, Utc::now())
    }

    /// Creates a decoder for the given year with a fixed "now".
    pub fn with_now(year: i32, now: DateTime<Utc>) -> Decoder {
        Decoder {
            year: year,
            now: now,
        }
    }

    /// Returns this decoder's nominal year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Decodes a message into samples.
    ///
    /// Samples come out in block order, newest first within each block. Sample count channels are
    /// decoded but left out. Any bad block fails the whole message.
    pub fn decode(&self, message: &Message) -> Result<Vec<Sample>, ::failure::Error> {
        self.decode_payload(message.payload())
    }

    /// Decodes a payload, i.e. a message with its identifier already stripped.
    ///
    /// # Examples
    ///
    /// ```
    /// use pseudobinary::Decoder;
    /// let samples = Decoder::new(2024).decode_payload("+AAdKP@O@SR").unwrap();
    /// assert_eq!(1, samples.len());
    /// ```
    pub fn decode_payload(&self, payload: &str) -> Result<Vec<Sample>, ::failure::Error> {
        let mut samples = Vec::new();
        for block in Blocks::new(payload) {
            let block = block?;
            let date = time::resolve_date(block.day, self.year, &self.now)?;
            let values = block.values()?;
            if block.sensor.is_sample_count() {
                debug!("skipping {} values from {}", values.len(), block.sensor);
                continue;
            }
            samples.extend(values.into_iter().enumerate().map(|(i, value)| Sample {
                sensor: block.sensor,
                date: date,
                minutes: block.minutes(i),
                value: value,
            }));
        }
        Ok(samples)
    }
}

//! Decode pseudobinary-C buoy transmissions.
//!
//! # Background
//!
//! Pseudobinary is a family of compact ASCII encodings used by Sutron-style data loggers on
//! oceanographic and meteorological buoys. Variant C multiplexes any number of sensors into one
//! line: after a three character message identifier come blocks, one per sensor, each with a
//! julian day, a start time, a sampling interval and a run of measurements. Every number is
//! packed six bits to a character. Anything after the first space is free text, starting with the
//! station name.
//!
//! Decoding happens in three steps. A `Message` splits the line, a `Decoder` turns the blocks into
//! `decoder::Sample`s, and `record::format` turns samples into `Record`s, newest first, that can
//! be written out with `csv::write`:
//!
//! ```
//! # extern crate chrono;
//! # extern crate pseudobinary;
//! # fn main() {
//! use chrono::{TimeZone, Utc};
//! use pseudobinary::{record, Decoder, Message};
//!
//! let message = Message::new("0C1+AAdKP@O@SR@SS+HAdKP@O@A}@A|. STATIONX.").unwrap();
//! assert_eq!(Some("STATIONX"), message.station());
//!
//! let now = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();
//! let samples = Decoder::with_now(2024, now).decode(&message).unwrap();
//! let records = record::format(&samples).unwrap();
//! assert_eq!(4, records.len());
//! assert_eq!("2024-04-09 11:59:00+00:00", records[0].timestamp);
//! assert_eq!("PRS", records[0].sensor);
//! assert_eq!("1.234", records[0].data);
//! assert_eq!("BAT", records[1].sensor);
//! assert_eq!("12.5", records[1].data);
//! # }
//! ```

#![deny(missing_docs, missing_debug_implementations, unsafe_code)]

extern crate chrono;
extern crate csv as csv_crate;
#[macro_use]
extern crate failure;
#[macro_use]
extern crate log;
#[cfg(test)]
extern crate tempfile;

pub mod block;
pub mod csv;
pub mod decoder;
pub mod message;
pub mod record;
pub mod sensor;
pub mod sixbit;
pub mod time;

pub use decoder::Decoder;
pub use message::Message;
pub use record::Record;

use std::path::Path;

/// Errors from the end-to-end decoding pipeline.
#[derive(Debug, Fail, PartialEq)]
pub enum Error {
    /// The message decoded cleanly but held no measurements to write.
    #[fail(display = "no data decoded from message")]
    NoSamples,
}

/// The result of decoding one file into a CSV file.
#[derive(Clone, Debug, PartialEq)]
pub struct Report {
    /// The station name from the message, if there was one.
    pub station: Option<String>,

    /// The number of records written.
    pub records: usize,

    /// Why the message could not be decoded or written, if it couldn't.
    pub failure: Option<String>,
}

impl Report {
    /// Returns true if the records were written.
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }
}

/// Decodes the message in `input` and writes its records to the CSV file `output`.
///
/// The current time is used to settle year-end dates. A file that can't be read or holds no
/// message is an error. Once the message is read, decode and write failures are reported in the
/// `Report`, next to the station name, so callers can still route the file by station. For
/// finer-grained control use `Message`, `Decoder`, `record::format` and `csv::write` directly.
///
/// # Examples
///
/// ```no_run
/// let report = pseudobinary::process("fixtures/station.txt", "STATIONX_2024.csv", 2024, true)
///     .unwrap();
/// assert!(report.is_success());
/// assert_eq!(Some("STATIONX".to_string()), report.station);
/// ```
pub fn process<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    year: i32,
    append: bool,
) -> Result<Report, failure::Error> {
    let message = Message::from_path(input)?;
    let station = message.station().map(|s| s.to_string());
    let written = decode(&message, &Decoder::new(year)).and_then(|records| {
        csv::write(&records, output, append)?;
        Ok(records.len())
    });
    match written {
        Ok(records) => Ok(Report {
            station: station,
            records: records,
            failure: None,
        }),
        Err(err) => {
            warn!("could not process message {}: {}", message.identifier(), err);
            Ok(Report {
                station: station,
                records: 0,
                failure: Some(err.to_string()),
            })
        }
    }
}

/// Decodes a message straight into sorted records.
///
/// Returns `Error::NoSamples` if there was nothing to decode.
pub fn decode(message: &Message, decoder: &Decoder) -> Result<Vec<Record>, failure::Error> {
    let samples = decoder.decode(message)?;
    if samples.is_empty() {
        warn!("no data decoded from message {}", message.identifier());
        return Err(Error::NoSamples.into());
    }
    record::format(&samples).map_err(failure::Error::from)
}

//! Transmissions as they arrive, one line per message.
//!
//! A line is the encoded message, optionally followed by a space and some free text that starts
//! with the station name:
//!
//! ```
//! use pseudobinary::Message;
//! let message = Message::new("0C1+AAdKP@O@SR. STATIONX.").unwrap();
//! assert_eq!("0C1", message.identifier());
//! assert_eq!("+AAdKP@O@SR.", message.payload());
//! assert_eq!(Some("STATIONX"), message.station());
//! ```
//!
//! The first byte of the identifier sometimes goes missing in transit. When the line starts right
//! at a channel marker, the `0` is put back before the identifier is stripped:
//!
//! ```
//! use pseudobinary::Message;
//! let message = Message::new("C1+AAdKP@O@SR").unwrap();
//! assert_eq!("0C1", message.identifier());
//! assert_eq!("+AAdKP@O@SR", message.payload());
//! assert_eq!(None, message.station());
//! ```

use std::fs;
use std::path::Path;

/// The number of characters in the message identifier.
pub const IDENTIFIER_LENGTH: usize = 3;

const CHANNEL_MARKERS: [&str; 4] = ["C1+", "C2+", "C3+", "C4+"];
const DROPPED_IDENTIFIER_BYTE: char = '0';

/// A pseudobinary-C message.
#[derive(Clone, Debug, PartialEq)]
pub struct Message {
    identifier: String,
    payload: String,
    station: Option<String>,
}

/// Errors associated with creating messages.
#[derive(Debug, Fail, PartialEq)]
pub enum Error {
    /// There's nothing in the line but whitespace.
    #[fail(display = "no data in message")]
    Empty,

    /// The encoded part of the line has characters outside of ASCII.
    #[fail(display = "non-ascii characters in payload: {}", _0)]
    NonAscii(String),
}

impl Message {
    /// Reads a message from a file.
    ///
    /// The file holds a single transmission. Surrounding whitespace, including the newline, is
    /// ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use pseudobinary::Message;
    /// let message = Message::from_path("fixtures/station.txt").unwrap();
    /// assert_eq!(Some("STATIONX"), message.station());
    /// ```
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Message, ::failure::Error> {
        let contents = fs::read_to_string(path)?;
        Message::new(&contents).map_err(::failure::Error::from)
    }

    /// Creates a new message from a line of text.
    ///
    /// # Examples
    ///
    /// ```
    /// use pseudobinary::{message::Error, Message};
    /// assert!(Message::new("0C1+AAdKP@O@SR").is_ok());
    /// assert_eq!(Error::Empty, Message::new(" \n").unwrap_err());
    /// ```
    pub fn new(line: &str) -> Result<Message, Error> {
        let line = line.trim();
        if line.is_empty() {
            return Err(Error::Empty);
        }
        let (encoded, station) = split_station(line);
        if !encoded.is_ascii() {
            return Err(Error::NonAscii(encoded.to_string()));
        }
        let encoded = if CHANNEL_MARKERS
            .iter()
            .any(|marker| encoded.starts_with(marker))
        {
            format!("{}{}", DROPPED_IDENTIFIER_BYTE, encoded)
        } else {
            encoded.to_string()
        };
        let split = encoded.len().min(IDENTIFIER_LENGTH);
        let (identifier, payload) = encoded.split_at(split);
        Ok(Message {
            identifier: identifier.to_string(),
            payload: payload.to_string(),
            station: station.map(|s| s.to_string()),
        })
    }

    /// Returns the message identifier, e.g. `0C1`.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Returns the encoded blocks that follow the identifier.
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Returns the station name, if the line had one.
    pub fn station(&self) -> Option<&str> {
        self.station.as_ref().map(|s| s.as_str())
    }
}

/// Splits a line into its encoded part and its station name.
///
/// The station name is the first word after the first space, without any trailing periods.
///
/// # Examples
///
/// ```
/// use pseudobinary::message::split_station;
/// assert_eq!(("0C1+A", Some("BUOY42")), split_station("0C1+A BUOY42. extra"));
/// assert_eq!(("0C1+A", None), split_station("0C1+A"));
/// assert_eq!(("0C1+A", None), split_station("0C1+A ..."));
/// ```
pub fn split_station(line: &str) -> (&str, Option<&str>) {
    let mut parts = line.splitn(2, ' ');
    let encoded = parts.next().unwrap_or("");
    let station = parts
        .next()
        .and_then(|rest| rest.split_whitespace().next())
        .map(|word| word.trim_end_matches('.'))
        .filter(|word| !word.is_empty());
    (encoded, station)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixtures() {
        let message = Message::from_path("fixtures/station.txt").unwrap();
        assert_eq!("0C1", message.identifier());
        assert_eq!(Some("STATIONX"), message.station());

        let message = Message::from_path("fixtures/no-station.txt").unwrap();
        assert_eq!("0C1", message.identifier());
        assert_eq!(None, message.station());

        let error = Message::from_path("fixtures/empty.txt").unwrap_err();
        assert_eq!(Error::Empty, error.downcast().unwrap());
    }

    #[test]
    fn missing_file() {
        assert!(Message::from_path("fixtures/not-a-file.txt").is_err());
    }

    #[test]
    fn dropped_identifier_byte() {
        for marker in &["C1+", "C2+", "C3+", "C4+"] {
            let message = Message::new(&format!("{}AAdKP@O@SR", marker)).unwrap();
            assert_eq!(format!("0{}", &marker[..2]), message.identifier());
            assert_eq!("+AAdKP@O@SR", message.payload());
        }
        let message = Message::new("C5+AAdKP@O@SR").unwrap();
        assert_eq!("C5+", message.identifier());
        assert_eq!("AAdKP@O@SR", message.payload());
    }

    #[test]
    fn short() {
        let message = Message::new("0C").unwrap();
        assert_eq!("0C", message.identifier());
        assert_eq!("", message.payload());
    }

    #[test]
    fn whitespace() {
        let message = Message::new("  0C1+AAdKP@O@SR   STATIONX...  more text\r\n").unwrap();
        assert_eq!("+AAdKP@O@SR", message.payload());
        assert_eq!(Some("STATIONX"), message.station());
    }

    #[test]
    fn non_ascii() {
        assert_eq!(
            Error::NonAscii("0C1+Aé".to_string()),
            Message::new("0C1+Aé STATION").unwrap_err()
        );
        let message = Message::new("0C1+AAdKP@O@SR Stación").unwrap();
        assert_eq!(Some("Stación"), message.station());
    }
}

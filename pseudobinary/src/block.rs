//! Carve a payload into sensor blocks.
//!
//! A block is an eight character header followed by a run of three character measurements:
//!
//! ```text
//! +  A  Ad  KP  @O  @SR@SS
//! |  |  |   |   |   measurements, newest first
//! |  |  |   |   sampling interval, minutes
//! |  |  |   start time, minutes after midnight
//! |  |  julian day
//! |  sensor, `A` is index zero
//! block marker
//! ```
//!
//! Nothing in the measurement run says how long it is. The run ends at the next block marker
//! `+`, or failing that at the end of message marker `.`, or failing that at the end of the
//! payload. `Blocks` walks a payload and yields one `Block` at a time:
//!
//! ```
//! use pseudobinary::block::{Blocks, Delimiter};
//! use pseudobinary::sensor::Sensor;
//! let blocks = Blocks::new("+AAdKP@O@SR@SS+HAdKP@O@A}.")
//!     .collect::<Result<Vec<_>, _>>()
//!     .unwrap();
//! assert_eq!(2, blocks.len());
//! assert_eq!(Sensor::Prs, blocks[0].sensor);
//! assert_eq!(Delimiter::BlockStart, blocks[0].delimiter);
//! assert_eq!(Sensor::Bat, blocks[1].sensor);
//! assert_eq!(Delimiter::EndOfMessage, blocks[1].delimiter);
//! ```

use sensor::{Sensor, SENSOR_COUNT};
use sixbit;

/// Marks the start of a block.
pub const BLOCK_START: char = '+';

/// Marks the end of a message.
pub const END_OF_MESSAGE: char = '.';

/// The number of characters in a block header.
pub const HEADER_LENGTH: usize = 8;

/// The number of characters in one measurement.
pub const MEASUREMENT_WIDTH: usize = 3;

const FIRST_SENSOR_CODE: char = 'A';

/// The start times on the wire have their seconds truncated, so we back off by a minute.
const START_TIME_CORRECTION: i64 = 1;

/// An error returned when parsing a block.
#[derive(Debug, Fail, PartialEq)]
pub enum Error {
    /// A header field held the missing value marker.
    #[fail(display = "the {} field of the block header is missing", _0)]
    MissingField(&'static str),

    /// The sensor code does not map onto the sensor table.
    #[fail(display = "invalid sensor code: {:?}", _0)]
    SensorIndex(char),

    /// The payload has characters outside of ASCII.
    #[fail(display = "non-ascii characters in payload: {:?}", _0)]
    NonAscii(String),

    /// There aren't enough characters left for a block header.
    #[fail(display = "truncated block header: {:?}", _0)]
    TruncatedHeader(String),

    /// A six-bit field could not be decoded.
    #[fail(display = "could not decode {:?}: {}", field, error)]
    SixBit {
        /// The characters that failed to decode.
        field: String,

        /// The underlying error.
        error: sixbit::Error,
    },
}

/// How the end of a block was found.
///
/// Each strategy is tried in turn, in the order they are listed here.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delimiter {
    /// The block runs up to the start of the next one.
    BlockStart,

    /// The block runs up to the end of message marker.
    EndOfMessage,

    /// The block runs to the end of the payload.
    EndOfBuffer,
}

/// One sensor's run of measurements.
#[derive(Clone, Debug, PartialEq)]
pub struct Block<'a> {
    /// The sensor.
    pub sensor: Sensor,

    /// The julian day of the newest measurement.
    pub day: i64,

    /// The time of the newest measurement, in minutes after midnight.
    ///
    /// Already corrected for seconds truncation, so this is one less than what was transmitted.
    pub start: i64,

    /// The number of minutes between measurements.
    pub interval: i64,

    /// The raw measurement characters.
    pub measurements: &'a str,

    /// How the end of this block was found.
    pub delimiter: Delimiter,
}

/// An iterator over the blocks in a payload.
///
/// Iteration stops after the first error.
#[derive(Debug)]
pub struct Blocks<'a> {
    data: &'a str,
    state: State,
}

#[derive(Debug)]
enum State {
    AtBlockStart,
    InBlock(Header),
    Done,
}

#[derive(Clone, Copy, Debug)]
struct Header {
    sensor: Sensor,
    day: i64,
    start: i64,
    interval: i64,
}

impl Delimiter {
    /// All strategies, in the order they are tried.
    pub const STRATEGIES: [Delimiter; 3] = [
        Delimiter::BlockStart,
        Delimiter::EndOfMessage,
        Delimiter::EndOfBuffer,
    ];

    /// Finds where a block that starts at the beginning of `data` ends.
    ///
    /// Returns the byte offset of the delimiter and the strategy that found it.
    ///
    /// # Examples
    ///
    /// ```
    /// use pseudobinary::block::Delimiter;
    /// assert_eq!((11, Delimiter::BlockStart), Delimiter::find("+AAdKP@O@SR+HAdKP@O"));
    /// assert_eq!((11, Delimiter::EndOfMessage), Delimiter::find("+AAdKP@O@SR."));
    /// assert_eq!((11, Delimiter::EndOfBuffer), Delimiter::find("+AAdKP@O@SR"));
    /// ```
    pub fn find(data: &str) -> (usize, Delimiter) {
        Delimiter::STRATEGIES
            .iter()
            .filter_map(|&delimiter| delimiter.locate(data).map(|index| (index, delimiter)))
            .next()
            .unwrap_or((data.len(), Delimiter::EndOfBuffer))
    }

    /// Tries just this strategy, looking past the block header.
    ///
    /// # Examples
    ///
    /// ```
    /// use pseudobinary::block::Delimiter;
    /// let data = "+AAdKP@O@SR.+HAdKP@O";
    /// assert_eq!(Some(12), Delimiter::BlockStart.locate(data));
    /// assert_eq!(Some(11), Delimiter::EndOfMessage.locate(data));
    /// assert_eq!(Some(20), Delimiter::EndOfBuffer.locate(data));
    /// ```
    pub fn locate(&self, data: &str) -> Option<usize> {
        let marker = match *self {
            Delimiter::BlockStart => BLOCK_START,
            Delimiter::EndOfMessage => END_OF_MESSAGE,
            Delimiter::EndOfBuffer => return Some(data.len().max(HEADER_LENGTH)),
        };
        data.get(HEADER_LENGTH..)
            .and_then(|rest| rest.find(marker))
            .map(|index| index + HEADER_LENGTH)
    }
}

impl<'a> Block<'a> {
    /// Decodes and scales this block's measurements, newest first.
    ///
    /// Missing measurements are `None`. A trailing partial measurement is ignored.
    ///
    /// # Examples
    ///
    /// ```
    /// use pseudobinary::block::Blocks;
    /// let block = Blocks::new("+AAdKP@O@SR///@SS@").next().unwrap().unwrap();
    /// assert_eq!(vec![Some(1.234), None, Some(1.235)], block.values().unwrap());
    /// ```
    pub fn values(&self) -> Result<Vec<Option<f64>>, Error> {
        let count = self.measurements.len() / MEASUREMENT_WIDTH;
        if self.measurements.len() % MEASUREMENT_WIDTH != 0 {
            debug!(
                "ignoring partial measurement in {} block: {:?}",
                self.sensor,
                &self.measurements[count * MEASUREMENT_WIDTH..]
            );
        }
        let scaling = self.sensor.scaling();
        (0..count)
            .map(|i| {
                let field = &self.measurements[i * MEASUREMENT_WIDTH..(i + 1) * MEASUREMENT_WIDTH];
                decode(field).map(|value| value.map(|raw| scaling.apply(raw)))
            })
            .collect()
    }

    /// Returns the time of the `i`th measurement, in minutes after midnight of the block's day.
    ///
    /// Measurements run backwards in time from the start, so this can go negative.
    pub fn minutes(&self, i: usize) -> i64 {
        self.start - i as i64 * self.interval
    }
}

impl<'a> Blocks<'a> {
    /// Creates an iterator over the blocks of a payload, with the message identifier already
    /// stripped off.
    pub fn new(payload: &'a str) -> Blocks<'a> {
        Blocks {
            data: payload,
            state: State::AtBlockStart,
        }
    }

    fn read_header(&self) -> Result<Header, Error> {
        if !self.data.is_ascii() {
            return Err(Error::NonAscii(self.data.to_string()));
        }
        if self.data.len() < HEADER_LENGTH {
            return Err(Error::TruncatedHeader(self.data.to_string()));
        }
        let header = &self.data[..HEADER_LENGTH];
        let code = header.as_bytes()[1] as char;
        let index = code as i64 - FIRST_SENSOR_CODE as i64;
        if index < 0 || index >= i64::from(SENSOR_COUNT) {
            return Err(Error::SensorIndex(code));
        }
        let sensor = Sensor::from_index(index as u8).ok_or(Error::SensorIndex(code))?;
        let day = required(&header[2..4], "day")?;
        let start = required(&header[4..6], "start time")? - START_TIME_CORRECTION;
        let interval = required(&header[6..8], "interval")?;
        Ok(Header {
            sensor: sensor,
            day: day,
            start: start,
            interval: interval,
        })
    }
}

impl<'a> Iterator for Blocks<'a> {
    type Item = Result<Block<'a>, Error>;

    fn next(&mut self) -> Option<Result<Block<'a>, Error>> {
        loop {
            match self.state {
                State::Done => return None,
                State::AtBlockStart => {
                    if self.data.is_empty() || self.data.starts_with(END_OF_MESSAGE) {
                        self.state = State::Done;
                        continue;
                    }
                    match self.read_header() {
                        Ok(header) => self.state = State::InBlock(header),
                        Err(err) => {
                            self.state = State::Done;
                            return Some(Err(err));
                        }
                    }
                }
                State::InBlock(header) => {
                    let (end, delimiter) = Delimiter::find(self.data);
                    let block = Block {
                        sensor: header.sensor,
                        day: header.day,
                        start: header.start,
                        interval: header.interval,
                        measurements: &self.data[HEADER_LENGTH..end],
                        delimiter: delimiter,
                    };
                    debug!(
                        "{} block ending at {:?}: day {}, start {}, interval {}, {} characters",
                        block.sensor,
                        delimiter,
                        block.day,
                        block.start,
                        block.interval,
                        block.measurements.len()
                    );
                    self.data = &self.data[end..];
                    self.state = State::AtBlockStart;
                    return Some(Ok(block));
                }
            }
        }
    }
}

fn decode(field: &str) -> Result<Option<i64>, Error> {
    sixbit::decode(field).map_err(|error| Error::SixBit {
        field: field.to_string(),
        error: error,
    })
}

fn required(field: &str, name: &'static str) -> Result<i64, Error> {
    decode(field)?.ok_or(Error::MissingField(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocks(payload: &str) -> Vec<Block> {
        Blocks::new(payload)
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    }

    #[test]
    fn header() {
        let found = blocks("+AAdKP@O@SR");
        let block = &found[0];
        assert_eq!(Sensor::Prs, block.sensor);
        assert_eq!(100, block.day);
        assert_eq!(719, block.start);
        assert_eq!(15, block.interval);
        assert_eq!("@SR", block.measurements);
    }

    #[test]
    fn sample_times_run_backwards() {
        let found = blocks("+AAdKP@O@SR@SS@ST");
        let block = &found[0];
        assert_eq!(719, block.minutes(0));
        assert_eq!(704, block.minutes(1));
        assert_eq!(689, block.minutes(2));
    }

    #[test]
    fn delimiters() {
        let found = blocks("+AAdKP@O@SR+HAdKP@O@A}.+AAdKP@O@SR");
        assert_eq!(2, found.len());
        assert_eq!(Delimiter::BlockStart, found[0].delimiter);
        assert_eq!(Delimiter::EndOfMessage, found[1].delimiter);

        let found = blocks("+AAdKP@O@SR+HAdKP@O@A}");
        assert_eq!(Delimiter::EndOfBuffer, found[1].delimiter);
        assert_eq!("@A}", found[1].measurements);
    }

    #[test]
    fn block_start_wins_over_end_of_message() {
        let found = blocks("+AAdKP@O@S.R+HAdKP@O@A}");
        assert_eq!(2, found.len());
        assert_eq!("@S.R", found[0].measurements);
    }

    #[test]
    fn delimiter_inside_header_is_not_a_delimiter() {
        assert_eq!(None, Delimiter::BlockStart.locate("+AAd+P@O"));
        assert_eq!(None, Delimiter::EndOfMessage.locate("+AAd.P@O"));
        assert_eq!(Some(8), Delimiter::EndOfBuffer.locate("+AAd"));
    }

    #[test]
    fn empty() {
        assert!(blocks("").is_empty());
        assert!(blocks(".").is_empty());
        assert!(blocks(". trailing text").is_empty());
    }

    #[test]
    fn empty_measurement_run() {
        let found = blocks("+AAdKP@O+HAdKP@O@A}");
        assert_eq!(2, found.len());
        assert_eq!("", found[0].measurements);
        assert!(found[0].values().unwrap().is_empty());
    }

    #[test]
    fn partial_measurement() {
        let found = blocks("+AAdKP@O@SR@S");
        let block = &found[0];
        assert_eq!(vec![Some(1.234)], block.values().unwrap());
    }

    #[test]
    fn negative_and_missing_values() {
        let found = blocks("+HAdKP@O??{///");
        let block = &found[0];
        assert_eq!(vec![Some(-0.5), None], block.values().unwrap());
    }

    #[test]
    fn sensor_index() {
        assert_eq!(
            Error::SensorIndex('a'),
            Blocks::new("+aAdKP@O@SR").next().unwrap().unwrap_err()
        );
        assert_eq!(
            Error::SensorIndex('0'),
            Blocks::new("+0AdKP@O@SR").next().unwrap().unwrap_err()
        );
        assert_eq!(
            Sensor::PrsSamples,
            Blocks::new("+`AdKP@O@SR").next().unwrap().unwrap().sensor
        );
    }

    #[test]
    fn errors_stop_iteration() {
        let mut iter = Blocks::new("+AAdKP@O@SR+aAdKP@O@SR+AAdKP@O@SR");
        assert!(iter.next().unwrap().is_ok());
        assert!(iter.next().unwrap().is_err());
        assert!(iter.next().is_none());
    }

    #[test]
    fn truncated_header() {
        assert_eq!(
            Error::TruncatedHeader("+AAdK".to_string()),
            Blocks::new("+AAdK").next().unwrap().unwrap_err()
        );
    }

    #[test]
    fn missing_header_field() {
        assert_eq!(
            Error::MissingField("interval"),
            Blocks::new("+AAdKP//@SR").next().unwrap().unwrap_err()
        );
    }

    #[test]
    fn start_time_correction() {
        let found = blocks("+AAd@@@O");
        let block = &found[0];
        assert_eq!(-1, block.start);
    }
}

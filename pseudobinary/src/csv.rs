//! Write records to CSV files.
//!
//! Files are appended to by default, so one file can collect a station's whole year. Appending is
//! a check for the header followed by a write, so two writers must not share a file.

use csv_crate::{ByteRecord, ReaderBuilder, Terminator, WriterBuilder};
use record::Record;
use std::fs::{File, OpenOptions};
use std::path::Path;

/// The CSV header.
pub const HEADER: [&str; 3] = ["time", "sensor", "data"];

const UNNAMED_STATION: &str = "decoded_data";

/// Returns the conventional file name for a station's records in a year.
///
/// # Examples
///
/// ```
/// use pseudobinary::csv;
/// assert_eq!("STATIONX_2024.csv", csv::file_name(Some("STATIONX"), 2024));
/// assert_eq!("decoded_data_2024.csv", csv::file_name(None, 2024));
/// ```
pub fn file_name(station: Option<&str>, year: i32) -> String {
    format!("{}_{}.csv", station.unwrap_or(UNNAMED_STATION), year)
}

/// An error returned when writing records.
#[derive(Debug, Fail, PartialEq)]
pub enum Error {
    /// There were no records to write.
    #[fail(display = "no records to write")]
    NoRecords,
}

/// Writes records to a CSV file.
///
/// If `append` is true and the file already starts with a header, the records are appended.
/// Otherwise the file is created (or truncated) and a header is written first.
///
/// Writing zero records is an error and leaves the file untouched.
///
/// # Examples
///
/// ```no_run
/// use pseudobinary::{csv, Decoder, Message};
/// let message = Message::from_path("fixtures/station.txt").unwrap();
/// let samples = Decoder::new(2024).decode(&message).unwrap();
/// let records = pseudobinary::record::format(&samples).unwrap();
/// csv::write(&records, "STATIONX_2024.csv", true).unwrap();
/// ```
pub fn write<P: AsRef<Path>>(
    records: &[Record],
    path: P,
    append: bool,
) -> Result<(), ::failure::Error> {
    if records.is_empty() {
        return Err(Error::NoRecords.into());
    }
    let path = path.as_ref();
    let exists = path.exists();
    let has_header = exists && append && has_header(path);
    let file = if append && exists {
        OpenOptions::new().append(true).open(path)?
    } else {
        File::create(path)?
    };
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::CRLF)
        .has_headers(false)
        .from_writer(file);
    if !has_header {
        writer.write_record(&HEADER)?;
    }
    for record in records {
        writer.write_record(&[&record.timestamp, &record.sensor, &record.data])?;
    }
    writer.flush()?;
    info!("wrote {} records to {}", records.len(), path.display());
    Ok(())
}

/// Returns true if the first line of the file holds a record.
fn has_header(path: &Path) -> bool {
    let mut reader = match ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
    {
        Ok(reader) => reader,
        Err(_) => return false,
    };
    let mut record = ByteRecord::new();
    match reader.read_byte_record(&mut record) {
        Ok(true) => record
            .position()
            .map(|position| position.line() == 1)
            .unwrap_or(false),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn records() -> Vec<Record> {
        vec![
            Record {
                timestamp: "2024-04-09 11:59:00+00:00".to_string(),
                sensor: "PRS".to_string(),
                data: "1.234".to_string(),
            },
            Record {
                timestamp: "2024-04-09 11:44:00+00:00".to_string(),
                sensor: "PRS".to_string(),
                data: String::new(),
            },
        ]
    }

    const CONTENTS: &str = "time,sensor,data\r\n\
                            2024-04-09 11:59:00+00:00,PRS,1.234\r\n\
                            2024-04-09 11:44:00+00:00,PRS,\r\n";

    #[test]
    fn create() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        write(&records(), &path, true).unwrap();
        assert_eq!(CONTENTS, fs::read_to_string(&path).unwrap());
    }

    #[test]
    fn append_writes_header_once() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        write(&records(), &path, true).unwrap();
        write(&records(), &path, true).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(1, contents.matches("time,sensor,data").count());
        assert_eq!(5, contents.lines().count());
    }

    #[test]
    fn overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        write(&records(), &path, true).unwrap();
        write(&records(), &path, false).unwrap();
        assert_eq!(CONTENTS, fs::read_to_string(&path).unwrap());
    }

    #[test]
    fn append_to_empty_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        fs::write(&path, "").unwrap();
        write(&records(), &path, true).unwrap();
        assert_eq!(CONTENTS, fs::read_to_string(&path).unwrap());
    }

    #[test]
    fn blank_first_line_gets_a_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        fs::write(&path, "\r\n").unwrap();
        write(&records(), &path, true).unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(1, contents.matches("time,sensor,data").count());
        assert!(contents.starts_with("\r\ntime,sensor,data\r\n"));
    }

    #[test]
    fn fields_are_quoted() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        let record = Record {
            timestamp: "2024-04-09 11:59:00+00:00".to_string(),
            sensor: "P,S".to_string(),
            data: "say \"hi\"".to_string(),
        };
        write(&[record], &path, true).unwrap();
        assert_eq!(
            "time,sensor,data\r\n2024-04-09 11:59:00+00:00,\"P,S\",\"say \"\"hi\"\"\"\r\n",
            fs::read_to_string(&path).unwrap()
        );
    }

    #[test]
    fn no_records() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.csv");
        let error = write(&[], &path, true).unwrap_err();
        assert_eq!(Error::NoRecords, error.downcast().unwrap());
        assert!(!path.exists());
    }

    #[test]
    fn unwritable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("out.csv");
        assert!(write(&records(), &path, true).is_err());
    }
}

//! Decode saved messages and file them away.

use chrono::{DateTime, Utc};
use failure;
use pseudobinary::{self, csv, message, Decoder, Message};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use Config;

/// The directory, under the data directory, where the listener saves new messages.
pub const INBOX_DIR: &str = "inbox";

/// The directory, under the data directory, that holds decoded messages by day.
pub const ARCHIVE_DIR: &str = "archive";

/// The directory, under the data directory, that holds messages that could not be decoded.
pub const ERROR_DIR: &str = "error";

/// The directory, under the data directory, that holds empty messages.
pub const EMPTY_DIR: &str = "empty";

const ARCHIVE_DAY_FORMAT: &str = "%Y%m%d";
const RAW_EXTENSION: &str = "raw";
const UNKNOWN_STATION: &str = "unknown";
const CURRENT_DIR: &str = ".";

/// An error that keeps a message from being routed at all.
///
/// Messages that simply fail to decode are not errors, they end up as `Outcome::Failed`.
#[derive(Debug, Fail, PartialEq)]
pub enum Error {
    /// The message file does not exist.
    #[fail(display = "message file not found: {:?}", _0)]
    NotFound(PathBuf),

    /// Processing an inbox needs a configured data directory.
    #[fail(display = "no data directory configured")]
    NoInbox,
}

/// Where a message ended up.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    /// The message file was empty and was moved to the empty directory.
    Empty {
        /// The new path of the message file.
        path: PathBuf,
    },

    /// The message was decoded, its records written, and the file archived.
    Archived {
        /// The new path of the message file.
        path: PathBuf,

        /// The CSV file the records were written to.
        csv: PathBuf,

        /// The station name, if the message had one.
        station: Option<String>,

        /// The number of records written.
        records: usize,
    },

    /// The message could not be decoded and was moved to the error directory.
    Failed {
        /// The new path of the message file.
        path: PathBuf,

        /// Why the message failed.
        reason: String,
    },
}

/// Decodes messages, writes their records and moves them out of the inbox.
///
/// # Examples
///
/// ```no_run
/// use postproc::{Config, Outcome, Postprocessor};
/// let config = Config::from_path("fixtures/config.toml").unwrap();
/// let postprocessor = Postprocessor::new(config);
/// match postprocessor.process("data/inbox/msg_0001.txt").unwrap() {
///     Outcome::Archived { csv, .. } => println!("wrote {}", csv.display()),
///     outcome => println!("{:?}", outcome),
/// }
/// ```
#[derive(Clone, Debug)]
pub struct Postprocessor {
    config: Config,
    now: DateTime<Utc>,
}

impl Outcome {
    /// Returns the message file's new path.
    pub fn path(&self) -> &Path {
        match *self {
            Outcome::Empty { ref path }
            | Outcome::Archived { ref path, .. }
            | Outcome::Failed { ref path, .. } => path,
        }
    }

    /// Returns true if the message failed to decode.
    pub fn is_failed(&self) -> bool {
        match *self {
            Outcome::Failed { .. } => true,
            _ => false,
        }
    }
}

impl Postprocessor {
    /// Creates a new post-processor.
    ///
    /// The current time is used to name archive directories and to settle year-end dates.
    pub fn new(config: Config) -> Postprocessor {
        Postprocessor::with_now(config, Utc::now())
    }

    /// Creates a post-processor with a fixed "now".
    pub fn with_now(config: Config, now: DateTime<Utc>) -> Postprocessor {
        Postprocessor {
            config: config,
            now: now,
        }
    }

    /// Returns this post-processor's configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Processes one message file.
    ///
    /// Returns an error only if the file can't be routed, e.g. if it does not exist or can't be
    /// moved.
    pub fn process<P: AsRef<Path>>(&self, path: P) -> Result<Outcome, failure::Error> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::NotFound(path.to_path_buf()).into());
        }
        let data_dir = self.data_dir(path);
        info!("processing message: {}", path.display());

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) => return self.fail(path, &data_dir, err.into()),
        };
        let message = match Message::new(&contents) {
            Ok(message) => message,
            Err(message::Error::Empty) => {
                warn!("empty message file: {}", path.display());
                let destination = move_into(path, &data_dir.join(EMPTY_DIR))?;
                return Ok(Outcome::Empty { path: destination });
            }
            Err(err) => return self.fail(path, &data_dir, err.into()),
        };
        let (csv, records) = match self.write_records(&message) {
            Ok(written) => written,
            Err(err) => return self.fail(path, &data_dir, err),
        };

        let destination = self.archive_path(path, &data_dir, &contents, message.station());
        move_file(path, &destination)?;
        info!(
            "processed and archived: {} -> {}",
            path.display(),
            destination.display()
        );
        Ok(Outcome::Archived {
            path: destination,
            csv: csv,
            station: message.station().map(|s| s.to_string()),
            records: records,
        })
    }

    /// Processes every file in the configured inbox, in file name order.
    pub fn process_inbox(&self) -> Result<Vec<Outcome>, failure::Error> {
        use walkdir::WalkDir;

        let inbox = self.config.data_dir().ok_or(Error::NoInbox)?.join(INBOX_DIR);
        let mut outcomes = Vec::new();
        for entry in WalkDir::new(&inbox)
            .min_depth(1)
            .max_depth(1)
            .sort_by(|a, b| a.file_name().cmp(b.file_name()))
        {
            let entry = entry?;
            if entry.file_type().is_file() {
                outcomes.push(self.process(entry.path())?);
            }
        }
        info!("processed {} messages from {}", outcomes.len(), inbox.display());
        Ok(outcomes)
    }

    /// Returns the configured data directory, or else the directory two levels above the message.
    ///
    /// Relative paths stay relative, so a message in the working directory or in `inbox/` has the
    /// working directory as its data directory.
    fn data_dir(&self, path: &Path) -> PathBuf {
        if let Some(data_dir) = self.config.data_dir() {
            return data_dir.to_path_buf();
        }
        let data_dir = dirname(dirname(path));
        if data_dir.as_os_str().is_empty() {
            PathBuf::from(CURRENT_DIR)
        } else {
            data_dir.to_path_buf()
        }
    }

    fn write_records(&self, message: &Message) -> Result<(PathBuf, usize), failure::Error> {
        let year = self.config.year();
        let records = pseudobinary::decode(message, &Decoder::with_now(year, self.now))?;
        let output_dir = self.config.output_dir();
        fs::create_dir_all(output_dir)?;
        let path = output_dir.join(csv::file_name(message.station(), year));
        csv::write(&records, &path, self.config.append())?;
        Ok((path, records.len()))
    }

    fn archive_path(
        &self,
        path: &Path,
        data_dir: &Path,
        contents: &str,
        station: Option<&str>,
    ) -> PathBuf {
        let stem = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let message_type = contents
            .trim()
            .chars()
            .next()
            .map(|c| c.to_string())
            .unwrap_or_default();
        let file_name = format!(
            "{}_{}_{}.{}",
            stem,
            message_type,
            station.unwrap_or(UNKNOWN_STATION),
            RAW_EXTENSION
        );
        data_dir
            .join(ARCHIVE_DIR)
            .join(self.now.format(ARCHIVE_DAY_FORMAT).to_string())
            .join(file_name)
    }

    fn fail(
        &self,
        path: &Path,
        data_dir: &Path,
        err: failure::Error,
    ) -> Result<Outcome, failure::Error> {
        error!("error processing {}: {}", path.display(), err);
        let destination = move_into(path, &data_dir.join(ERROR_DIR))?;
        Ok(Outcome::Failed {
            path: destination,
            reason: err.to_string(),
        })
    }
}

/// Moves a file, creating the destination's directory if needed.
///
/// Falls back to copying and removing when the file can't be renamed, e.g. across file systems.
pub fn move_file<P: AsRef<Path>, Q: AsRef<Path>>(from: P, to: Q) -> io::Result<()> {
    let (from, to) = (from.as_ref(), to.as_ref());
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::rename(from, to).or_else(|err| {
        debug!(
            "could not rename {} ({}), copying instead",
            from.display(),
            err
        );
        fs::copy(from, to)?;
        fs::remove_file(from)
    })
}

fn dirname(path: &Path) -> &Path {
    path.parent().unwrap_or(path)
}

fn move_into(path: &Path, directory: &Path) -> Result<PathBuf, failure::Error> {
    let file_name = path
        .file_name()
        .ok_or_else(|| Error::NotFound(path.to_path_buf()))?;
    let destination = directory.join(file_name);
    move_file(path, &destination)?;
    Ok(destination)
}

//! Configuration for the post-processor.
//!
//! Configs are usually specified in TOML files, and every field is optional:
//!
//! ```toml
//! data_dir = "/var/lib/buoy/data"
//! output_dir = "/var/lib/buoy/csv"
//! year = 2024
//! append = false
//! ```
//!
//! ```
//! use postproc::Config;
//! let config = Config::from_path("fixtures/config.toml").unwrap();
//! assert_eq!(2024, config.year());
//! ```

use chrono::{Datelike, Utc};
use failure::Error;
use std::path::{Path, PathBuf};

const DEFAULT_OUTPUT_DIR: &str = ".";

/// Configure the post-processor.
///
/// # Examples
///
/// The defaults write CSV files to the working directory and find the data directory from each
/// message's path:
///
/// ```
/// use postproc::Config;
/// let config = Config::default();
/// assert_eq!(None, config.data_dir());
/// assert!(config.append());
/// ```
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    data_dir: Option<PathBuf>,
    output_dir: PathBuf,
    year: Option<i32>,
    append: bool,
}

impl Config {
    /// Reads configuration from a toml file.
    ///
    /// # Examples
    ///
    /// ```
    /// let config = postproc::Config::from_path("fixtures/config.toml").unwrap();
    /// ```
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Config, Error> {
        use std::fs::File;
        use std::io::Read;
        use toml;

        let mut file = File::open(path)?;
        let mut string = String::new();
        file.read_to_string(&mut string)?;
        toml::from_str(&string).map_err(Error::from)
    }

    /// Returns the configured data directory, if there is one.
    ///
    /// The data directory holds the `inbox`, `archive`, `error` and `empty` directories.
    pub fn data_dir(&self) -> Option<&Path> {
        self.data_dir.as_ref().map(|path| path.as_path())
    }

    /// Sets the data directory.
    ///
    /// # Examples
    ///
    /// ```
    /// use postproc::Config;
    /// use std::path::Path;
    /// let config = Config::default().with_data_dir("data");
    /// assert_eq!(Some(Path::new("data")), config.data_dir());
    /// ```
    pub fn with_data_dir<P: AsRef<Path>>(mut self, data_dir: P) -> Config {
        self.data_dir = Some(data_dir.as_ref().to_path_buf());
        self
    }

    /// Returns the directory that CSV files are written to.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Sets the output directory.
    pub fn with_output_dir<P: AsRef<Path>>(mut self, output_dir: P) -> Config {
        self.output_dir = output_dir.as_ref().to_path_buf();
        self
    }

    /// Returns the nominal year of the messages.
    ///
    /// Defaults to the current UTC year.
    pub fn year(&self) -> i32 {
        self.year.unwrap_or_else(|| Utc::now().year())
    }

    /// Sets the nominal year.
    pub fn with_year(mut self, year: i32) -> Config {
        self.year = Some(year);
        self
    }

    /// Returns true if records should be appended to existing CSV files.
    pub fn append(&self) -> bool {
        self.append
    }
}

impl Default for Config {
    fn default() -> Config {
        Config {
            data_dir: None,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            year: None,
            append: true,
        }
    }
}

//! Decode, archive and route buoy messages saved by the listener.
//!
//! The listener writes each transmission it receives to its own file in `<data>/inbox/` and then
//! runs the post-processor on it. The post-processor decodes the message, appends its records to
//! the station's CSV file for the year, and moves the raw file into a dated archive directory:
//!
//! ```text
//! data/
//!     inbox/              new messages
//!     archive/20240601/   msg_0001_0_STATIONX.raw
//!     error/              messages that failed to decode
//!     empty/              messages with nothing in them
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use postproc::{Config, Postprocessor};
//! let config = Config::from_path("fixtures/config.toml").unwrap();
//! let outcome = Postprocessor::new(config)
//!     .process("/var/lib/buoy/data/inbox/msg_0001.txt")
//!     .unwrap();
//! println!("{:?}", outcome);
//! ```

#![deny(missing_docs, missing_debug_implementations, unsafe_code)]

extern crate chrono;
#[macro_use]
extern crate failure;
#[macro_use]
extern crate log;
extern crate pseudobinary;
extern crate serde;
#[macro_use]
extern crate serde_derive;
#[cfg(test)]
extern crate tempfile;
extern crate toml;
extern crate walkdir;

pub mod config;
pub mod postprocessor;

pub use config::Config;
pub use postprocessor::{move_file, Error, Outcome, Postprocessor};

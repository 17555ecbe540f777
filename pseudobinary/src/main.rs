extern crate chrono;
#[macro_use]
extern crate clap;
extern crate env_logger;
extern crate failure;
#[macro_use]
extern crate log;
extern crate pseudobinary;

use chrono::{Datelike, Utc};
use clap::{App, ArgMatches};
use log::LevelFilter;
use pseudobinary::{csv, Decoder, Message};
use std::process;

fn main() {
    let yaml = load_yaml!("cli.yml");
    let matches = App::from_yaml(yaml).get_matches();
    let level = matches
        .value_of("loglevel")
        .and_then(|level| level.parse().ok())
        .unwrap_or(LevelFilter::Info);
    env_logger::Builder::new().filter(None, level).init();

    if let Err(err) = run(&matches) {
        error!("{}", err);
        process::exit(1);
    }
}

fn run(matches: &ArgMatches) -> Result<(), failure::Error> {
    let year = match matches.value_of("year") {
        Some(year) => year.parse()?,
        None => Utc::now().year(),
    };
    let message = Message::from_path(matches.value_of("INPUT").unwrap())?;
    let records = pseudobinary::decode(&message, &Decoder::new(year))?;
    let output = matches
        .value_of("output")
        .map(|output| output.to_string())
        .unwrap_or_else(|| csv::file_name(message.station(), year));
    csv::write(&records, &output, !matches.is_present("no-append"))?;
    println!(
        "{}: {} records written to {}",
        message.station().unwrap_or("unknown station"),
        records.len(),
        output
    );
    Ok(())
}

extern crate chrono;
extern crate clap;
extern crate env_logger;
extern crate failure;
#[macro_use]
extern crate log;
extern crate postproc;
#[macro_use]
extern crate prettytable;
extern crate pseudobinary;

use chrono::{Datelike, Utc};
use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use failure::Error;
use log::LevelFilter;
use postproc::{Config, Outcome, Postprocessor};
use prettytable::{format, Table};
use pseudobinary::sensor::Sensor;
use pseudobinary::{Decoder, Message};
use std::process;

fn main() {
    let matches = App::new("buoy")
        .about("decodes and archives pseudobinary-C buoy telemetry")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("loglevel")
                .long("loglevel")
                .takes_value(true)
                .possible_values(&["debug", "info", "warn", "error"])
                .default_value("info")
                .global(true)
                .help("the logging level"),
        )
        .subcommand(SubCommand::with_name("sensors").about("prints the sensor table"))
        .subcommand(
            SubCommand::with_name("decode")
                .about("prints the records decoded from a message file")
                .arg(
                    Arg::with_name("INPUT")
                        .help("the file holding the transmission")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::with_name("year")
                        .short("y")
                        .long("year")
                        .takes_value(true)
                        .help("the year of the transmission, defaults to the current year"),
                ),
        )
        .subcommand(
            SubCommand::with_name("process")
                .about("decodes and archives saved messages")
                .arg(
                    Arg::with_name("MESSAGE")
                        .help("the message file to process")
                        .required_unless("inbox")
                        .index(1),
                )
                .arg(
                    Arg::with_name("inbox")
                        .long("inbox")
                        .conflicts_with("MESSAGE")
                        .help("process every message in the configured inbox"),
                )
                .arg(
                    Arg::with_name("config")
                        .short("c")
                        .long("config")
                        .takes_value(true)
                        .help("the configuration toml file"),
                ),
        )
        .get_matches();

    let level = matches
        .value_of("loglevel")
        .and_then(|level| level.parse().ok())
        .unwrap_or(LevelFilter::Info);
    env_logger::Builder::new().filter(None, level).init();

    let result = if matches.subcommand_matches("sensors").is_some() {
        sensors();
        Ok(())
    } else if let Some(matches) = matches.subcommand_matches("decode") {
        decode(matches)
    } else if let Some(matches) = matches.subcommand_matches("process") {
        postprocess(matches)
    } else {
        Ok(())
    };
    if let Err(err) = result {
        error!("{}", err);
        process::exit(1);
    }
}

fn sensors() {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);
    table.set_titles(row!["Index", "Code", "Tag", "Scaling", "Precision"]);
    for sensor in Sensor::all() {
        let code = (b'A' + sensor.index()) as char;
        let tag = if sensor.is_sample_count() {
            format!("{} (samples)", sensor.tag())
        } else {
            sensor.tag().to_string()
        };
        table.add_row(row![
            sensor.index(),
            code,
            tag,
            sensor.scaling(),
            sensor.precision()
        ]);
    }
    table.printstd();
}

fn decode(matches: &ArgMatches) -> Result<(), Error> {
    let year = match matches.value_of("year") {
        Some(year) => year.parse()?,
        None => Utc::now().year(),
    };
    let message = Message::from_path(matches.value_of("INPUT").unwrap())?;
    let records = pseudobinary::decode(&message, &Decoder::new(year))?;

    println!(
        "{} ({}), {} records",
        message.station().unwrap_or("unknown station"),
        message.identifier(),
        records.len()
    );
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);
    table.set_titles(row!["Time", "Sensor", "Data"]);
    for record in records {
        let data = if record.data.is_empty() {
            "n/a".to_string()
        } else {
            record.data
        };
        table.add_row(row![record.timestamp, record.sensor, data]);
    }
    table.printstd();
    Ok(())
}

fn postprocess(matches: &ArgMatches) -> Result<(), Error> {
    let config = match matches.value_of("config") {
        Some(path) => Config::from_path(path)?,
        None => Config::default(),
    };
    let postprocessor = Postprocessor::new(config);
    let outcomes = if matches.is_present("inbox") {
        postprocessor.process_inbox()?
    } else {
        vec![postprocessor.process(matches.value_of("MESSAGE").unwrap())?]
    };

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);
    table.set_titles(row!["File", "Outcome", "Detail"]);
    for outcome in &outcomes {
        let (name, detail) = match *outcome {
            Outcome::Empty { .. } => ("empty", String::new()),
            Outcome::Archived {
                ref csv, records, ..
            } => ("archived", format!("{} records to {}", records, csv.display())),
            Outcome::Failed { ref reason, .. } => ("failed", reason.clone()),
        };
        table.add_row(row![outcome.path().display(), name, detail]);
    }
    table.printstd();

    if outcomes.iter().any(Outcome::is_failed) {
        process::exit(1);
    }
    Ok(())
}

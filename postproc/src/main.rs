#[macro_use]
extern crate clap;
extern crate env_logger;
extern crate failure;
#[macro_use]
extern crate log;
extern crate postproc;

use clap::{App, ArgMatches};
use log::LevelFilter;
use postproc::{Config, Outcome, Postprocessor};
use std::process;

fn main() {
    let yaml = load_yaml!("cli.yml");
    let matches = App::from_yaml(yaml).get_matches();
    let level = matches
        .value_of("loglevel")
        .and_then(|level| level.parse().ok())
        .unwrap_or(LevelFilter::Info);
    env_logger::Builder::new().filter(None, level).init();

    match run(&matches) {
        Ok(Outcome::Failed { .. }) => process::exit(1),
        Ok(_) => info!("processing completed successfully"),
        Err(err) => {
            error!("{}", err);
            process::exit(1);
        }
    }
}

fn run(matches: &ArgMatches) -> Result<Outcome, failure::Error> {
    let config = match matches.value_of("config") {
        Some(path) => Config::from_path(path)?,
        None => Config::default(),
    };
    Postprocessor::new(config).process(matches.value_of("MESSAGE").unwrap())
}

#![forbid(unsafe_code)]

mod cli;
mod output;

use anyhow::{Context, Result};
use log::{error, info};
use std::process;

use lpa_conformance::battery::{RunOptions, Suite};
use lpa_conformance::config::SuiteSettings;
use lpa_conformance::constants::{EXIT_FAILURES, EXIT_FATAL};
use lpa_conformance::fixture::Fixture;
use lpa_conformance::hal::open_backend;
use lpa_conformance::{interrupt, logging};

fn main() {
    let code = match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            EXIT_FATAL
        }
    };
    process::exit(code);
}

fn run() -> Result<i32> {
    let config = cli::parse_args()?;
    logging::init(config.log_level)?;

    let suite = Suite::l1();

    if config.list_only {
        output::list_cases(&suite, &config.case_filters)?;
        return Ok(0);
    }

    let mut settings = SuiteSettings::resolve(config.settings_path.as_deref())
        .context("Failed to load settings")?;
    if let Some(path) = &config.iccid_config {
        settings.suite.iccid_config = path.clone();
    }

    // Nothing runs without a readable ICCID config
    let mut fixture = match Fixture::load(settings) {
        Ok(fixture) => fixture,
        Err(err) => {
            error!("{}", err);
            eprintln!(
                "Error: {}\nPlace an `lpa_config` file in the working directory or pass --iccid-config <PATH>.",
                err
            );
            return Ok(EXIT_FATAL);
        }
    };
    info!(
        "Loaded {} ICCIDs from {}",
        fixture.iccids().len(),
        fixture.iccid_config().display()
    );

    let mut hal = open_backend(config.hal, &fixture)?;

    // A second SIGINT/SIGTERM ends the process even inside a blocked HAL call
    let interrupted = interrupt::install(interrupt::TERM_SIGNALS);

    let options = RunOptions {
        filters: config.case_filters.clone(),
        interrupted: Some(interrupted),
    };
    let report = suite.run(hal.as_mut(), &fixture, &options);

    let released = fixture.release();
    info!("Released {} ICCIDs", released);

    if config.json_output {
        output::format_json(&report)?;
    } else {
        output::format_human(&report)?;
    }

    Ok(if report.all_passed() { 0 } else { EXIT_FAILURES })
}

//! CLI argument parsing and validation module
//!
//! Handles command-line interface using clap, including:
//! - ICCID config and settings file locations
//! - HAL backend selection
//! - Case filters and listing
//! - Output format selection (human/JSON)
//! - Log level and quiet mode

use anyhow::{anyhow, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use log::LevelFilter;
use std::path::PathBuf;

use lpa_conformance::filter::validate_case_filters;
use lpa_conformance::logging::parse_level;
use lpa_conformance::models::HalBackend;

const VERSION: &str = concat!(env!("LPA_CONFORMANCE_VERSION"), " (", env!("GIT_HASH"), ")");

/// Configuration for a battery run, built from the command line
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Overrides `[suite] iccid_config` from settings
    pub iccid_config: Option<PathBuf>,
    pub settings_path: Option<PathBuf>,
    pub hal: HalBackend,
    pub case_filters: Vec<String>,
    pub list_only: bool,
    pub json_output: bool,
    pub log_level: LevelFilter,
}

fn build_command() -> Command {
    Command::new("lpa-conformance")
        .version(VERSION)
        .about("Conformance battery for eSIM/LPA HAL implementations")
        .long_about(
            "Runs the L1 conformance battery against an eSIM/LPA hardware abstraction layer. \
             Profile identifiers are read from a JSON config file before any case runs.",
        )
        .arg(
            Arg::new("iccid-config")
                .short('c')
                .long("iccid-config")
                .value_name("PATH")
                .help("ICCID config file (default: ./lpa_config)"),
        )
        .arg(
            Arg::new("settings")
                .short('s')
                .long("settings")
                .value_name("PATH")
                .help("Settings TOML file (default: per-user config dir)"),
        )
        .arg(
            Arg::new("hal")
                .long("hal")
                .value_name("BACKEND")
                .value_parser(["simulated", "vendor"])
                .default_value("simulated")
                .help("HAL backend to test"),
        )
        .arg(
            Arg::new("case")
                .long("case")
                .value_name("PATTERN")
                .help("Run only matching cases (exact name, operation name, or glob)")
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("list")
                .short('l')
                .long("list")
                .help("List registered cases and exit")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("json")
                .short('j')
                .long("json")
                .help("Output the run report as JSON")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Only log warnings and errors")
                .action(ArgAction::SetTrue)
                .conflicts_with("log-level"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("LEVEL")
                .value_parser(["off", "error", "warn", "info", "debug", "trace"])
                .help("Log verbosity on stderr (default: info)"),
        )
}

/// Parse command line arguments and return configuration
pub fn parse_args() -> Result<RunConfig> {
    config_from_matches(&build_command().get_matches())
}

fn config_from_matches(matches: &ArgMatches) -> Result<RunConfig> {
    let hal_name = matches
        .get_one::<String>("hal")
        .map(String::as_str)
        .unwrap_or("simulated");
    let hal = HalBackend::parse(hal_name).ok_or_else(|| anyhow!("Unknown HAL backend: {}", hal_name))?;

    let case_filters: Vec<String> = matches
        .get_many::<String>("case")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    validate_case_filters(&case_filters)?;

    let log_level = match matches.get_one::<String>("log-level") {
        Some(level) => parse_level(level)?,
        None if matches.get_flag("quiet") => LevelFilter::Warn,
        None => LevelFilter::Info,
    };

    Ok(RunConfig {
        iccid_config: matches.get_one::<String>("iccid-config").map(PathBuf::from),
        settings_path: matches.get_one::<String>("settings").map(PathBuf::from),
        hal,
        case_filters,
        list_only: matches.get_flag("list"),
        json_output: matches.get_flag("json"),
        log_level,
    })
}

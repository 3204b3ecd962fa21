//! Configuration inputs for a battery run
//!
//! - `iccid`: the JSON file listing the lab's valid ICCIDs
//! - `settings`: optional TOML file with server addresses and suite knobs

pub mod iccid;
pub mod settings;

pub use iccid::{load_iccids, LoadError};
pub use settings::{SettingsError, SuiteSettings};

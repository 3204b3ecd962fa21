//! Suite settings
//!
//! Handles TOML settings parsing and validation. Every field has a default,
//! so a settings file only needs to carry what a lab changes.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::{
    DEFAULT_ICCID_CONFIG, DEFAULT_ICCID_SIZE, DEFAULT_PROFILE_NAMES, DEFAULT_SMDP_ADDRESS,
    DEFAULT_SMDS_ADDRESS, MAX_ICCID_SIZE, SETTINGS_DIR_NAME, SETTINGS_FILE_NAME,
};

/// Errors raised while loading or validating settings
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Failed to read settings file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse settings file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid settings: {0}")]
    Invalid(String),
}

/// Top-level settings structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SuiteSettings {
    pub suite: SuiteSection,
    pub servers: ServerSection,
    pub profiles: ProfileSection,
}

/// Fixture and argument settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuiteSection {
    /// Path of the ICCID JSON config
    pub iccid_config: PathBuf,
    /// Size argument passed with every ICCID (1-64)
    pub iccid_size: i32,
    /// Fail setup when the ICCID config lists no identifiers
    pub require_iccids: bool,
}

/// Remote subscription-management servers used by the download cases
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    /// SM-DS address for the positive discovery download
    pub smds: String,
    /// Default SM-DP+ address, bare or with the `deviceDefaultSMDPAddress=` prefix
    pub default_smdp: String,
}

/// Enumeration expectations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileSection {
    /// Profile names the enumeration check accepts
    pub allowed_names: Vec<String>,
}

impl Default for SuiteSection {
    fn default() -> Self {
        Self {
            iccid_config: PathBuf::from(DEFAULT_ICCID_CONFIG),
            iccid_size: DEFAULT_ICCID_SIZE,
            require_iccids: false,
        }
    }
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            smds: DEFAULT_SMDS_ADDRESS.to_string(),
            default_smdp: DEFAULT_SMDP_ADDRESS.to_string(),
        }
    }
}

impl Default for ProfileSection {
    fn default() -> Self {
        Self {
            allowed_names: DEFAULT_PROFILE_NAMES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl SuiteSettings {
    /// Parse and validate settings from TOML text
    pub fn from_toml_str(content: &str, origin: &Path) -> Result<Self, SettingsError> {
        let settings: SuiteSettings =
            toml::from_str(content).map_err(|source| SettingsError::Parse {
                path: origin.to_path_buf(),
                source,
            })?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let content = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content, path)
    }

    /// Per-user settings location, e.g. `~/.config/lpa-conformance/settings.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(SETTINGS_DIR_NAME).join(SETTINGS_FILE_NAME))
    }

    /// Resolve settings: explicit path, then the per-user file if present,
    /// then built-in defaults
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, SettingsError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        match Self::default_path() {
            Some(path) if path.is_file() => {
                log::info!("Using settings from {}", path.display());
                Self::load(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Validate bounds and required values
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(1..=MAX_ICCID_SIZE).contains(&self.suite.iccid_size) {
            return Err(SettingsError::Invalid(format!(
                "iccid_size {} must be between 1 and {}",
                self.suite.iccid_size, MAX_ICCID_SIZE
            )));
        }
        if self.suite.iccid_config.as_os_str().is_empty() {
            return Err(SettingsError::Invalid("iccid_config must not be empty".to_string()));
        }
        if self.servers.smds.trim().is_empty() {
            return Err(SettingsError::Invalid("servers.smds must not be empty".to_string()));
        }
        if self.servers.default_smdp.trim().is_empty() {
            return Err(SettingsError::Invalid(
                "servers.default_smdp must not be empty".to_string(),
            ));
        }
        if self.profiles.allowed_names.is_empty() {
            return Err(SettingsError::Invalid(
                "profiles.allowed_names must list at least one name".to_string(),
            ));
        }
        if self.profiles.allowed_names.iter().any(|n| n.is_empty()) {
            return Err(SettingsError::Invalid(
                "profiles.allowed_names must not contain empty names".to_string(),
            ));
        }
        Ok(())
    }

    /// Whether enumeration may report a profile with this name
    pub fn is_allowed_name(&self, name: &str) -> bool {
        self.profiles.allowed_names.iter().any(|allowed| allowed == name)
    }
}

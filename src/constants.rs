//! Global constants for lpa-conformance
//!
//! Centralized location for the fixed locations, default test data and
//! contract values shared by the loader, the battery and the CLI

/// Log target for structured harness events
pub const APP_SUBSYSTEM: &str = "com.rdk.lpa-conformance";

/// Environment variable holding a log filter that overrides `--log-level`
pub const LOG_ENV_VAR: &str = "LPA_CONFORMANCE_LOG";

/// Directory name under the user config dir holding `settings.toml`
pub const SETTINGS_DIR_NAME: &str = "lpa-conformance";

/// Settings file name
pub const SETTINGS_FILE_NAME: &str = "settings.toml";

/// ICCID file expected next to the binary unless overridden
pub const DEFAULT_ICCID_CONFIG: &str = "./lpa_config";

/// Field of the ICCID document holding the identifier array
pub const ICCID_FIELD: &str = "iccid";

/// Size argument passed to the identifier-taking HAL operations
pub const DEFAULT_ICCID_SIZE: i32 = 20;

/// Upper bound accepted for the configured size argument
pub const MAX_ICCID_SIZE: i32 = 64;

/// Shortest and longest digit strings that look like an ICCID
pub const ICCID_MIN_DIGITS: usize = 18;
pub const ICCID_MAX_DIGITS: usize = 22;

/// Discovery server used by the positive SM-DS download case
pub const DEFAULT_SMDS_ADDRESS: &str = "oem-smds-json.demo.gemalto.com";

/// Default SM-DP+ address used by the positive download case
pub const DEFAULT_SMDP_ADDRESS: &str = "smdp-plus.test.gsma.com";

/// Profile names the enumeration check accepts unless overridden
pub const DEFAULT_PROFILE_NAMES: &[&str] = &["Xfinity Mobile", "Comcast", "CRTC"];

/// Suite name used for registration and reports
pub const SUITE_NAME: &str = "[L1 lpa_hal]";

/// Exit status when any case or hook failed
pub const EXIT_FAILURES: i32 = 1;

/// Exit status when the battery could not start at all
pub const EXIT_FATAL: i32 = 2;

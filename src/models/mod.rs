//! Data models module
//!
//! Defines core data structures:
//! - HalStatus: Binary status returned by every HAL entry point
//! - ProfileRecord: One eSIM profile as reported by enumeration
//! - Operation: The HAL entry points exercised by the battery
//! - CaseResult / SuiteReport: Outcome of a battery run
//!
//! Reports serialize to the JSON emitted by `--json`

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;


/// Status returned by a HAL entry point (0 = RETURN_OK, anything else is an error)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "code", rename_all = "snake_case")]
pub enum HalStatus {
    Ok,
    Error(i32),
}

/// The two status classes a case can expect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    Ok,
    Error,
}

impl HalStatus {
    /// Conventional error code used when the harness itself refuses a call
    pub const GENERIC_ERROR: i32 = -1;

    pub fn from_code(code: i32) -> Self {
        if code == 0 {
            HalStatus::Ok
        } else {
            HalStatus::Error(code)
        }
    }

    pub fn error() -> Self {
        HalStatus::Error(Self::GENERIC_ERROR)
    }

    pub fn code(&self) -> i32 {
        match self {
            HalStatus::Ok => 0,
            HalStatus::Error(code) => *code,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, HalStatus::Ok)
    }

    pub fn kind(&self) -> StatusKind {
        match self {
            HalStatus::Ok => StatusKind::Ok,
            HalStatus::Error(_) => StatusKind::Error,
        }
    }
}

impl fmt::Display for HalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HalStatus::Ok => write!(f, "RETURN_OK"),
            HalStatus::Error(code) => write!(f, "RETURN_ERR({})", code),
        }
    }
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusKind::Ok => write!(f, "RETURN_OK"),
            StatusKind::Error => write!(f, "RETURN_ERR"),
        }
    }
}

/// Profile state as reported by enumeration.
///
/// Only `Disabled` (0) and `Enabled` (1) are defined by the HAL contract; any
/// other raw value is preserved so the battery can flag it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum ProfileState {
    Disabled,
    Enabled,
    Unknown(i32),
}

impl ProfileState {
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            0 => ProfileState::Disabled,
            1 => ProfileState::Enabled,
            other => ProfileState::Unknown(other),
        }
    }

    pub fn raw(&self) -> i32 {
        match self {
            ProfileState::Disabled => 0,
            ProfileState::Enabled => 1,
            ProfileState::Unknown(raw) => *raw,
        }
    }

    pub fn is_defined(&self) -> bool {
        !matches!(self, ProfileState::Unknown(_))
    }
}

impl From<i32> for ProfileState {
    fn from(raw: i32) -> Self {
        ProfileState::from_raw(raw)
    }
}

impl From<ProfileState> for i32 {
    fn from(state: ProfileState) -> Self {
        state.raw()
    }
}

/// A single eSIM profile returned by `get_profile_info`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    /// Profile ICCID
    pub iccid: String,
    /// Human-readable profile name
    pub name: String,
    /// Reported profile state
    pub state: ProfileState,
}

/// HAL entry points exercised by the battery, in registration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    DownloadProfileFromSmds,
    DownloadProfileFromDefaultSmdp,
    GetProfileInfo,
    EnableProfile,
    DisableProfile,
    DeleteProfile,
    LpaInit,
    LpaExit,
    GetEid,
    GetEuicc,
}

impl Operation {
    pub const ALL: [Operation; 10] = [
        Operation::DownloadProfileFromSmds,
        Operation::DownloadProfileFromDefaultSmdp,
        Operation::GetProfileInfo,
        Operation::EnableProfile,
        Operation::DisableProfile,
        Operation::DeleteProfile,
        Operation::LpaInit,
        Operation::LpaExit,
        Operation::GetEid,
        Operation::GetEuicc,
    ];

    /// Short name used in case names and filters
    pub fn name(&self) -> &'static str {
        match self {
            Operation::DownloadProfileFromSmds => "download_profile_from_smds",
            Operation::DownloadProfileFromDefaultSmdp => "download_profile_from_defaultsmdp",
            Operation::GetProfileInfo => "get_profile_info",
            Operation::EnableProfile => "enable_profile",
            Operation::DisableProfile => "disable_profile",
            Operation::DeleteProfile => "delete_profile",
            Operation::LpaInit => "lpa_init",
            Operation::LpaExit => "lpa_exit",
            Operation::GetEid => "get_eid",
            Operation::GetEuicc => "get_euicc",
        }
    }

    /// C symbol of the vendor entry point
    pub fn symbol(&self) -> &'static str {
        match self {
            Operation::DownloadProfileFromSmds => "cellular_esim_download_profile_from_smds",
            Operation::DownloadProfileFromDefaultSmdp => {
                "cellular_esim_download_profile_from_defaultsmdp"
            }
            Operation::GetProfileInfo => "cellular_esim_get_profile_info",
            Operation::EnableProfile => "cellular_esim_enable_profile",
            Operation::DisableProfile => "cellular_esim_disable_profile",
            Operation::DeleteProfile => "cellular_esim_delete_profile",
            Operation::LpaInit => "cellular_esim_lpa_init",
            Operation::LpaExit => "cellular_esim_lpa_exit",
            Operation::GetEid => "cellular_esim_get_eid",
            Operation::GetEuicc => "cellular_esim_get_euicc",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// HAL implementation selected on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HalBackend {
    /// In-process reference eUICC
    Simulated,
    /// Vendor library linked through FFI
    Vendor,
}

impl HalBackend {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "simulated" | "sim" => Some(HalBackend::Simulated),
            "vendor" => Some(HalBackend::Vendor),
            _ => None,
        }
    }
}

/// One recorded assertion inside a case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionRecord {
    /// What was checked
    pub description: String,
    /// Value the HAL produced
    pub observed: String,
    /// Value the contract requires
    pub expected: String,
    /// Whether the check held
    pub passed: bool,
    /// Whether a failure of this check aborted the case
    #[serde(skip_serializing_if = "std::ops::Not::not", default)]
    pub fatal: bool,
}

/// Outcome of a single case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseOutcome {
    Passed,
    Failed,
    NotRun,
}

/// Result of one registered case
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseResult {
    /// Registered case name, e.g. `enable_profile.negative2`
    pub name: String,
    /// Operation under test
    pub operation: Operation,
    /// Input equivalence class label
    pub input: String,
    /// Expected status class
    pub expected: StatusKind,
    /// Final outcome
    pub outcome: CaseOutcome,
    /// Assertions recorded while the case ran
    pub assertions: Vec<AssertionRecord>,
    /// Duration of the case in milliseconds
    pub duration_ms: u64,
    /// Whether a fatal assertion cut the case short
    #[serde(skip_serializing_if = "std::ops::Not::not", default)]
    pub aborted: bool,
}

impl CaseResult {
    pub fn failed_assertions(&self) -> impl Iterator<Item = &AssertionRecord> {
        self.assertions.iter().filter(|a| !a.passed)
    }
}

/// Outcome of the suite setup or teardown hook
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum HookOutcome {
    Passed,
    Failed(String),
    NotRun,
}

impl HookOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, HookOutcome::Failed(_))
    }
}

/// Summary statistics for a battery run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SuiteSummary {
    /// Cases registered in the suite
    pub registered: usize,
    /// Cases matching the case filters
    pub selected: usize,
    /// Cases that actually executed
    pub run: usize,
    /// Cases with every assertion passing
    pub passed: usize,
    /// Cases with at least one failing assertion
    pub failed: usize,
    /// Selected cases that did not execute
    pub not_run: usize,
    /// Total assertions that held
    pub assertions_passed: usize,
    /// Total assertions that did not hold
    pub assertions_failed: usize,
    /// Duration of the run in milliseconds
    pub duration_ms: u64,
    /// Whether the run was interrupted by user signal
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interrupted: Option<bool>,
}

/// Complete report for JSON serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteReport {
    /// Registered suite name
    pub suite: String,
    /// Unique identifier of this run
    pub run_id: Uuid,
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// HAL backend the battery ran against
    pub hal: String,
    /// Number of ICCIDs the fixture provided
    pub iccid_count: usize,
    /// Setup hook outcome
    pub setup: HookOutcome,
    /// Teardown hook outcome
    pub teardown: HookOutcome,
    /// Per-case results in execution order
    pub cases: Vec<CaseResult>,
    /// Summary statistics
    pub summary: SuiteSummary,
}

impl SuiteReport {
    /// True when setup and teardown held, no case failed and nothing was skipped
    pub fn all_passed(&self) -> bool {
        !self.setup.is_failed()
            && !self.teardown.is_failed()
            && self.summary.failed == 0
            && self.summary.not_run == 0
            && self.summary.interrupted.is_none()
    }
}

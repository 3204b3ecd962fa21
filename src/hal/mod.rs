//! HAL boundary
//!
//! The battery only ever talks to [`LpaHal`]. Implementations:
//! - `simulated`: in-process reference eUICC, the default backend
//! - `vendor`: the vendor's `liblpa_hal` through FFI (feature `vendor-hal`)
//!
//! Nullable C arguments are modelled as `Option`, so the battery can still
//! exercise the null input class.

use crate::fixture::Fixture;
use crate::models::{HalBackend, HalStatus, ProfileRecord};

pub mod simulated;
#[cfg(feature = "vendor-hal")]
pub mod vendor;

/// The eSIM/LPA HAL contract
pub trait LpaHal {
    /// Backend name used in logs and reports
    fn name(&self) -> &str;

    /// Download a profile discovered through the given SM-DS
    fn download_profile_from_smds(&mut self, smds: Option<&str>) -> HalStatus;

    /// Download a profile from the given default SM-DP+
    fn download_profile_from_default_smdp(&mut self, smdp: Option<&str>) -> HalStatus;

    /// Enumerate installed profiles.
    ///
    /// `profiles` receives the records (previous contents are replaced) and
    /// `count` their number. Either slot being `None` is an error.
    fn get_profile_info(
        &mut self,
        profiles: Option<&mut Vec<ProfileRecord>>,
        count: Option<&mut i32>,
    ) -> HalStatus;

    fn enable_profile(&mut self, iccid: Option<&str>, iccid_size: i32) -> HalStatus;

    fn disable_profile(&mut self, iccid: Option<&str>, iccid_size: i32) -> HalStatus;

    fn delete_profile(&mut self, iccid: Option<&str>, iccid_size: i32) -> HalStatus;

    fn lpa_init(&mut self) -> HalStatus;

    fn lpa_exit(&mut self) -> HalStatus;

    fn get_eid(&mut self) -> HalStatus;

    fn get_euicc(&mut self) -> HalStatus;
}

/// Errors raised when the requested backend cannot be provided
#[derive(Debug, thiserror::Error)]
pub enum HalSelectionError {
    #[error("the vendor HAL is not available in this build (rebuild with --features vendor-hal)")]
    VendorUnavailable,
}

/// Construct the backend selected on the command line
pub fn open_backend(
    backend: HalBackend,
    fixture: &Fixture,
) -> Result<Box<dyn LpaHal>, HalSelectionError> {
    match backend {
        HalBackend::Simulated => Ok(Box::new(simulated::SimulatedEuicc::from_fixture(fixture))),
        #[cfg(feature = "vendor-hal")]
        HalBackend::Vendor => Ok(Box::new(vendor::VendorHal::new())),
        #[cfg(not(feature = "vendor-hal"))]
        HalBackend::Vendor => Err(HalSelectionError::VendorUnavailable),
    }
}

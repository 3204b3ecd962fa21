//! Vendor HAL binding
//!
//! Links against the vendor-supplied `liblpa_hal` and forwards every
//! [`LpaHal`] call to the matching `cellular_esim_*` entry point. Set
//! `LPA_HAL_LIB_DIR` at build time when the library is not on the default
//! linker path.

use std::ffi::CString;
use std::os::raw::{c_char, c_int};
use std::ptr;

use log::{debug, warn};

use super::LpaHal;
use crate::models::{HalStatus, ProfileRecord, ProfileState};

/// Buffer sizes of `eSIMProfileStruct` in the vendor header
const ICCID_BUF_LEN: usize = 21;
const PROFILE_NAME_BUF_LEN: usize = 64;

#[repr(C)]
struct ESimProfileStruct {
    iccid: [c_char; ICCID_BUF_LEN],
    profile_name: [c_char; PROFILE_NAME_BUF_LEN],
    profile_state: c_int,
}

#[link(name = "lpa_hal")]
extern "C" {
    fn cellular_esim_download_profile_from_smds(smds: *mut c_char) -> c_int;
    fn cellular_esim_download_profile_from_defaultsmdp(smdp: *mut c_char) -> c_int;
    fn cellular_esim_get_profile_info(
        profile_list: *mut *mut ESimProfileStruct,
        nb_profiles: *mut c_int,
    ) -> c_int;
    fn cellular_esim_enable_profile(iccid: *mut c_char, iccid_size: c_int) -> c_int;
    fn cellular_esim_disable_profile(iccid: *mut c_char, iccid_size: c_int) -> c_int;
    fn cellular_esim_delete_profile(iccid: *mut c_char, iccid_size: c_int) -> c_int;
    fn cellular_esim_lpa_init() -> c_int;
    fn cellular_esim_lpa_exit() -> c_int;
    fn cellular_esim_get_eid() -> c_int;
    fn cellular_esim_get_euicc() -> c_int;
}

/// Mutable, NUL-terminated copy of an optional argument
struct CArg(Option<Vec<u8>>);

impl CArg {
    /// `None` when the argument contains an interior NUL and cannot be passed
    fn new(value: Option<&str>) -> Option<Self> {
        match value {
            None => Some(CArg(None)),
            Some(value) => match CString::new(value) {
                Ok(c) => Some(CArg(Some(c.into_bytes_with_nul()))),
                Err(_) => {
                    warn!("Argument {:?} contains a NUL byte; not forwarded", value);
                    None
                }
            },
        }
    }

    fn as_mut_ptr(&mut self) -> *mut c_char {
        match self.0.as_mut() {
            Some(bytes) => bytes.as_mut_ptr() as *mut c_char,
            None => ptr::null_mut(),
        }
    }
}

/// Convert a fixed-size C string field, stopping at the first NUL
fn field_to_string(field: &[c_char]) -> String {
    let bytes: Vec<u8> = field
        .iter()
        .take_while(|&&c| c != 0)
        .map(|&c| c as u8)
        .collect();
    String::from_utf8_lossy(&bytes).into_owned()
}

/// The vendor library behind the [`LpaHal`] contract
#[derive(Debug, Default)]
pub struct VendorHal;

impl VendorHal {
    pub fn new() -> Self {
        VendorHal
    }

    fn with_string(value: Option<&str>, call: impl FnOnce(*mut c_char) -> c_int) -> HalStatus {
        match CArg::new(value) {
            Some(mut arg) => HalStatus::from_code(call(arg.as_mut_ptr())),
            None => HalStatus::error(),
        }
    }
}

impl LpaHal for VendorHal {
    fn name(&self) -> &str {
        "vendor"
    }

    fn download_profile_from_smds(&mut self, smds: Option<&str>) -> HalStatus {
        // SAFETY: the pointer is null or a NUL-terminated buffer that outlives the call
        Self::with_string(smds, |p| unsafe { cellular_esim_download_profile_from_smds(p) })
    }

    fn download_profile_from_default_smdp(&mut self, smdp: Option<&str>) -> HalStatus {
        // SAFETY: as above
        Self::with_string(smdp, |p| unsafe {
            cellular_esim_download_profile_from_defaultsmdp(p)
        })
    }

    fn get_profile_info(
        &mut self,
        profiles: Option<&mut Vec<ProfileRecord>>,
        count: Option<&mut i32>,
    ) -> HalStatus {
        let mut list: *mut ESimProfileStruct = ptr::null_mut();
        let mut nb_profiles: c_int = 0;

        let list_ptr: *mut *mut ESimProfileStruct = if profiles.is_some() {
            &mut list
        } else {
            ptr::null_mut()
        };
        let count_ptr: *mut c_int = if count.is_some() {
            &mut nb_profiles
        } else {
            ptr::null_mut()
        };

        // SAFETY: both out-pointers are null or point to live locals
        let status = HalStatus::from_code(unsafe { cellular_esim_get_profile_info(list_ptr, count_ptr) });

        let mut records = Vec::new();
        if !list.is_null() {
            let len = usize::try_from(nb_profiles).unwrap_or(0);
            // SAFETY: the HAL returned `nb_profiles` contiguous records at `list`
            let block = unsafe { std::slice::from_raw_parts(list, len) };
            records.extend(block.iter().map(|raw| ProfileRecord {
                iccid: field_to_string(&raw.iccid),
                name: field_to_string(&raw.profile_name),
                state: ProfileState::from_raw(raw.profile_state),
            }));
            // SAFETY: ownership of the malloc'd block transfers to the caller
            unsafe { libc::free(list as *mut libc::c_void) };
            debug!("Released vendor profile block of {} record(s)", len);
        }

        if let Some(profiles) = profiles {
            *profiles = records;
        }
        if let Some(count) = count {
            *count = nb_profiles;
        }
        status
    }

    fn enable_profile(&mut self, iccid: Option<&str>, iccid_size: i32) -> HalStatus {
        // SAFETY: the pointer is null or a NUL-terminated buffer that outlives the call
        Self::with_string(iccid, |p| unsafe { cellular_esim_enable_profile(p, iccid_size) })
    }

    fn disable_profile(&mut self, iccid: Option<&str>, iccid_size: i32) -> HalStatus {
        // SAFETY: as above
        Self::with_string(iccid, |p| unsafe { cellular_esim_disable_profile(p, iccid_size) })
    }

    fn delete_profile(&mut self, iccid: Option<&str>, iccid_size: i32) -> HalStatus {
        // SAFETY: as above
        Self::with_string(iccid, |p| unsafe { cellular_esim_delete_profile(p, iccid_size) })
    }

    fn lpa_init(&mut self) -> HalStatus {
        // SAFETY: no arguments
        HalStatus::from_code(unsafe { cellular_esim_lpa_init() })
    }

    fn lpa_exit(&mut self) -> HalStatus {
        // SAFETY: no arguments
        HalStatus::from_code(unsafe { cellular_esim_lpa_exit() })
    }

    fn get_eid(&mut self) -> HalStatus {
        // SAFETY: no arguments
        HalStatus::from_code(unsafe { cellular_esim_get_eid() })
    }

    fn get_euicc(&mut self) -> HalStatus {
        // SAFETY: no arguments
        HalStatus::from_code(unsafe { cellular_esim_get_euicc() })
    }
}

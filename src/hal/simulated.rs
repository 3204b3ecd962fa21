//! Simulated eUICC
//!
//! An in-process reference model of the HAL contract. It seeds its profile
//! store from the fixture ICCIDs so a fresh run passes the whole battery, and
//! supports fault injection so the runner's failure handling can be tested.

use log::{debug, info};
use std::collections::HashSet;

use super::LpaHal;
use crate::fixture::Fixture;
use crate::identifiers::{is_default_smdp_address, is_server_address, looks_like_iccid};
use crate::models::{HalStatus, Operation, ProfileRecord, ProfileState};

/// EID reported by the simulated card
const SIMULATED_EID: &str = "89049032000001000000000000000123";

/// In-process eUICC with a single LPA session
#[derive(Debug, Clone)]
pub struct SimulatedEuicc {
    eid: String,
    session_open: bool,
    profiles: Vec<ProfileRecord>,
    faults: HashSet<Operation>,
    extra_records: Vec<ProfileRecord>,
}

impl Default for SimulatedEuicc {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulatedEuicc {
    /// An empty card with no profiles and no open session
    pub fn new() -> Self {
        Self {
            eid: SIMULATED_EID.to_string(),
            session_open: false,
            profiles: Vec::new(),
            faults: HashSet::new(),
            extra_records: Vec::new(),
        }
    }

    /// A card holding one disabled profile per fixture ICCID, named after the
    /// allowed names in rotation
    pub fn from_fixture(fixture: &Fixture) -> Self {
        let names = &fixture.settings().profiles.allowed_names;
        let inventory = fixture.iccids().iter().enumerate().map(|(index, iccid)| {
            let name = names
                .get(index % names.len().max(1))
                .cloned()
                .unwrap_or_default();
            (iccid.to_string(), name)
        });
        Self::new().with_inventory(inventory)
    }

    /// Install disabled profiles
    pub fn with_inventory<I>(mut self, inventory: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.profiles.extend(inventory.into_iter().map(|(iccid, name)| ProfileRecord {
            iccid,
            name,
            state: ProfileState::Disabled,
        }));
        self
    }

    /// Make `operation` return an error unconditionally
    pub fn with_fault(mut self, operation: Operation) -> Self {
        self.faults.insert(operation);
        self
    }

    /// Report an extra record from enumeration that is not in the store
    pub fn with_extra_record(mut self, record: ProfileRecord) -> Self {
        self.extra_records.push(record);
        self
    }

    pub fn is_session_open(&self) -> bool {
        self.session_open
    }

    pub fn profiles(&self) -> &[ProfileRecord] {
        &self.profiles
    }

    fn faulted(&self, operation: Operation) -> bool {
        if self.faults.contains(&operation) {
            debug!("Injected fault for {}", operation.symbol());
            true
        } else {
            false
        }
    }

    /// Common argument and session checks for ICCID operations
    fn locate(&self, operation: Operation, iccid: Option<&str>, iccid_size: i32) -> Option<usize> {
        if self.faulted(operation) || !self.session_open || iccid_size <= 0 {
            return None;
        }
        let iccid = iccid.filter(|value| looks_like_iccid(value))?;
        self.profiles.iter().position(|profile| profile.iccid == iccid)
    }

    fn download(&mut self, operation: Operation, address: Option<&str>, valid: fn(&str) -> bool) -> HalStatus {
        if self.faulted(operation) || !self.session_open {
            return HalStatus::error();
        }
        match address {
            Some(address) if valid(address) => {
                info!("Simulated download session against {}", address);
                HalStatus::Ok
            }
            _ => HalStatus::error(),
        }
    }
}

impl LpaHal for SimulatedEuicc {
    fn name(&self) -> &str {
        "simulated"
    }

    fn download_profile_from_smds(&mut self, smds: Option<&str>) -> HalStatus {
        self.download(Operation::DownloadProfileFromSmds, smds, is_server_address)
    }

    fn download_profile_from_default_smdp(&mut self, smdp: Option<&str>) -> HalStatus {
        self.download(
            Operation::DownloadProfileFromDefaultSmdp,
            smdp,
            is_default_smdp_address,
        )
    }

    fn get_profile_info(
        &mut self,
        profiles: Option<&mut Vec<ProfileRecord>>,
        count: Option<&mut i32>,
    ) -> HalStatus {
        if self.faulted(Operation::GetProfileInfo) || !self.session_open {
            return HalStatus::error();
        }
        let (Some(profiles), Some(count)) = (profiles, count) else {
            return HalStatus::error();
        };

        profiles.clear();
        profiles.extend(self.profiles.iter().cloned());
        profiles.extend(self.extra_records.iter().cloned());
        *count = i32::try_from(profiles.len()).unwrap_or(i32::MAX);
        HalStatus::Ok
    }

    fn enable_profile(&mut self, iccid: Option<&str>, iccid_size: i32) -> HalStatus {
        match self.locate(Operation::EnableProfile, iccid, iccid_size) {
            Some(index) => {
                self.profiles[index].state = ProfileState::Enabled;
                HalStatus::Ok
            }
            None => HalStatus::error(),
        }
    }

    fn disable_profile(&mut self, iccid: Option<&str>, iccid_size: i32) -> HalStatus {
        match self.locate(Operation::DisableProfile, iccid, iccid_size) {
            Some(index) => {
                self.profiles[index].state = ProfileState::Disabled;
                HalStatus::Ok
            }
            None => HalStatus::error(),
        }
    }

    fn delete_profile(&mut self, iccid: Option<&str>, iccid_size: i32) -> HalStatus {
        match self.locate(Operation::DeleteProfile, iccid, iccid_size) {
            Some(index) => {
                let removed = self.profiles.remove(index);
                debug!("Deleted simulated profile {}", removed.iccid);
                HalStatus::Ok
            }
            None => HalStatus::error(),
        }
    }

    fn lpa_init(&mut self) -> HalStatus {
        if self.faulted(Operation::LpaInit) {
            return HalStatus::error();
        }
        self.session_open = true;
        HalStatus::Ok
    }

    fn lpa_exit(&mut self) -> HalStatus {
        if self.faulted(Operation::LpaExit) {
            return HalStatus::error();
        }
        self.session_open = false;
        HalStatus::Ok
    }

    fn get_eid(&mut self) -> HalStatus {
        if self.faulted(Operation::GetEid) || !self.session_open {
            return HalStatus::error();
        }
        info!("EID: {}", self.eid);
        HalStatus::Ok
    }

    fn get_euicc(&mut self) -> HalStatus {
        if self.faulted(Operation::GetEuicc) || !self.session_open {
            return HalStatus::error();
        }
        info!(
            "eUICC {} holds {} profile(s)",
            self.eid,
            self.profiles.len()
        );
        HalStatus::Ok
    }
}

//! Test fixture shared by every case in the battery
//!
//! - `IccidCollection`: read-only ICCID list with idempotent release
//! - `Fixture`: the collection plus resolved settings, passed by reference
//! - `LpaSession`: LPA exit-then-init on setup, exit on teardown

use log::{error, info, warn};
use std::path::Path;
use std::time::Instant;

use crate::config::{load_iccids, LoadError, SuiteSettings};
use crate::hal::LpaHal;
use crate::models::HalStatus;

/// ICCIDs known to be valid for the current lab inventory.
///
/// Immutable once built. `release` drops every entry; afterwards the
/// collection reads as empty, and releasing again does nothing.
#[derive(Debug, Default)]
pub struct IccidCollection {
    entries: Option<Vec<String>>,
}

impl IccidCollection {
    pub fn from_entries(entries: Vec<String>) -> Self {
        Self {
            entries: Some(entries),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries
            .as_ref()
            .and_then(|entries| entries.get(index))
            .map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().flatten().map(String::as_str)
    }

    /// Exact-match membership
    pub fn contains(&self, iccid: &str) -> bool {
        self.iter().any(|entry| entry == iccid)
    }

    pub fn is_released(&self) -> bool {
        self.entries.is_none()
    }

    /// Release every entry. Returns how many were released (0 when already released).
    pub fn release(&mut self) -> usize {
        match self.entries.take() {
            Some(entries) => {
                let count = entries.len();
                info!("Released {} iccid entries", count);
                count
            }
            None => 0,
        }
    }
}

/// Everything a case may read: the ICCIDs and the resolved settings
#[derive(Debug)]
pub struct Fixture {
    iccids: IccidCollection,
    settings: SuiteSettings,
}

impl Fixture {
    pub fn new(iccids: IccidCollection, settings: SuiteSettings) -> Self {
        Self { iccids, settings }
    }

    /// Load the ICCIDs named by `settings.suite.iccid_config`
    pub fn load(settings: SuiteSettings) -> Result<Self, LoadError> {
        let iccids = load_iccids(&settings.suite.iccid_config)?;
        if iccids.is_empty() {
            warn!(
                "{} lists no ICCIDs; per-ICCID cases will have nothing to exercise",
                settings.suite.iccid_config.display()
            );
        }
        Ok(Self::new(iccids, settings))
    }

    pub fn iccids(&self) -> &IccidCollection {
        &self.iccids
    }

    pub fn settings(&self) -> &SuiteSettings {
        &self.settings
    }

    pub fn iccid_config(&self) -> &Path {
        &self.settings.suite.iccid_config
    }

    pub fn release(&mut self) -> usize {
        self.iccids.release()
    }
}

/// Errors that abandon the whole battery before any case runs
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("LPA initialization failed with {0}")]
    InitFailed(HalStatus),

    #[error("no ICCIDs loaded from {0} and the settings require at least one")]
    NoIccids(String),
}

/// An open LPA session. Obtain one with [`LpaSession::open`] and hand it back
/// to [`LpaSession::close`] once the battery is done.
#[derive(Debug)]
#[must_use = "an open LPA session must be closed"]
pub struct LpaSession {
    opened_at: Instant,
}

impl LpaSession {
    /// Suite setup: clear any prior session with an exit, then initialize.
    ///
    /// A failing exit is only logged; a failing init is fatal.
    pub fn open(hal: &mut dyn LpaHal, fixture: &Fixture) -> Result<Self, SessionError> {
        if fixture.settings.suite.require_iccids && fixture.iccids.is_empty() {
            return Err(SessionError::NoIccids(
                fixture.iccid_config().display().to_string(),
            ));
        }

        let exit = hal.lpa_exit();
        if !exit.is_ok() {
            warn!("cellular_esim_lpa_exit before setup returned {}", exit);
        }

        let init = hal.lpa_init();
        if init.is_ok() {
            info!("cellular_esim init returned success");
            Ok(Self {
                opened_at: Instant::now(),
            })
        } else {
            error!("cellular_esim init returned failure: {}", init);
            Err(SessionError::InitFailed(init))
        }
    }

    /// Suite teardown: exit the LPA
    pub fn close(self, hal: &mut dyn LpaHal) -> HalStatus {
        let status = hal.lpa_exit();
        let held_ms = self.opened_at.elapsed().as_millis();
        if status.is_ok() {
            info!("cellular_esim exit returned success after {}ms", held_ms);
        } else {
            error!("cellular_esim exit returned failure: {}", status);
        }
        status
    }
}

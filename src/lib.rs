//! lpa-conformance - eSIM/LPA HAL conformance battery
//!
//! This library exposes the fixture, the HAL boundary and the L1 battery so
//! the CLI and integration tests can drive a run against any [`hal::LpaHal`].

pub mod battery;
pub mod config;
pub mod constants;
pub mod filter;
pub mod fixture;
pub mod hal;
pub mod identifiers;
pub mod interrupt;
pub mod logging;
pub mod models;

//! The L1 battery table and the execution of a single row

use crate::fixture::Fixture;
use crate::hal::LpaHal;
use crate::models::{HalStatus, Operation, StatusKind};

use super::{CaseContext, CaseSpec, FatalAssertion, InputClass};

use InputClass::*;
use Operation::*;

const OK: StatusKind = StatusKind::Ok;
const ERR: StatusKind = StatusKind::Error;

/// Every case of the L1 suite, in registration order
pub const L1_TABLE: &[CaseSpec] = &[
    CaseSpec::new(DownloadProfileFromSmds, Valid, OK),
    CaseSpec::new(DownloadProfileFromSmds, Null, ERR),
    CaseSpec::new(DownloadProfileFromSmds, Empty, ERR),
    CaseSpec::new(DownloadProfileFromSmds, Malformed("o6m-smds-j#on.e@mo.g@malto.com"), ERR),
    CaseSpec::new(DownloadProfileFromDefaultSmdp, Valid, OK),
    CaseSpec::new(DownloadProfileFromDefaultSmdp, Null, ERR),
    CaseSpec::new(DownloadProfileFromDefaultSmdp, Empty, ERR),
    CaseSpec::new(
        DownloadProfileFromDefaultSmdp,
        Malformed("d#vice8efaultSMD@Address=smdp-plus.test.g9ma.com"),
        ERR,
    ),
    CaseSpec::new(GetProfileInfo, Valid, OK),
    CaseSpec::new(GetProfileInfo, NullProfileList, ERR),
    CaseSpec::new(GetProfileInfo, NullCount, ERR),
    CaseSpec::new(EnableProfile, Valid, OK),
    CaseSpec::new(EnableProfile, Null, ERR),
    CaseSpec::new(EnableProfile, Malformed("98414102915071@#0054"), ERR),
    CaseSpec::new(EnableProfile, Empty, ERR),
    CaseSpec::new(EnableProfile, WrongShape("random"), ERR),
    CaseSpec::new(DisableProfile, Valid, OK),
    CaseSpec::new(DisableProfile, Null, ERR),
    CaseSpec::new(DisableProfile, Malformed("98410A00@04860024951"), ERR),
    CaseSpec::new(DisableProfile, WrongShape("984141"), ERR),
    CaseSpec::new(DisableProfile, Empty, ERR),
    CaseSpec::new(DeleteProfile, Valid, OK),
    CaseSpec::new(DeleteProfile, Null, ERR),
    CaseSpec::new(DeleteProfile, Malformed("98109909002@43658739"), ERR),
    CaseSpec::new(DeleteProfile, Empty, ERR),
    CaseSpec::new(DeleteProfile, WrongShape("random"), ERR),
    CaseSpec::new(LpaInit, Valid, OK),
    CaseSpec::new(LpaExit, Valid, OK),
    CaseSpec::new(GetEid, Valid, OK),
    CaseSpec::new(GetEuicc, Valid, OK),
];

/// Run one row against the HAL
pub fn execute(
    spec: &CaseSpec,
    ctx: &mut CaseContext<'_>,
    hal: &mut dyn LpaHal,
    fixture: &Fixture,
) -> Result<(), FatalAssertion> {
    let settings = fixture.settings();
    let symbol = spec.operation.symbol();

    match spec.operation {
        DownloadProfileFromSmds => {
            let smds = spec.input.string_argument(&settings.servers.smds);
            ctx.log(format_args!("Invoking {} with {} smds {:?}", symbol, spec.input.label(), smds));
            let status = hal.download_profile_from_smds(smds);
            ctx.assert_status(symbol, status, spec.expected);
        }
        DownloadProfileFromDefaultSmdp => {
            let smdp = spec.input.string_argument(&settings.servers.default_smdp);
            ctx.log(format_args!("Invoking {} with {} smdp {:?}", symbol, spec.input.label(), smdp));
            let status = hal.download_profile_from_default_smdp(smdp);
            ctx.assert_status(symbol, status, spec.expected);
        }
        GetProfileInfo => profile_info(spec, ctx, hal, fixture)?,
        EnableProfile | DisableProfile | DeleteProfile => identifier_case(spec, ctx, hal, fixture),
        LpaInit => {
            ctx.log(format_args!("Invoking cellular_esim_lpa_exit before {}", symbol));
            let exit = hal.lpa_exit();
            ctx.check("LPA uninitialization before re-init", exit, OK, exit.is_ok());
            let status = hal.lpa_init();
            ctx.assert_status(symbol, status, spec.expected);
        }
        LpaExit => {
            ctx.log(format_args!("Invoking {}", symbol));
            let status = hal.lpa_exit();
            let reinit = hal.lpa_init();
            ctx.check("LPA re-initialization after exit", reinit, OK, reinit.is_ok());
            ctx.assert_status(symbol, status, spec.expected);
        }
        GetEid => {
            ctx.log(format_args!("Invoking {}", symbol));
            let status = hal.get_eid();
            ctx.assert_status(symbol, status, spec.expected);
        }
        GetEuicc => {
            ctx.log(format_args!("Invoking {}", symbol));
            let status = hal.get_euicc();
            ctx.assert_status(symbol, status, spec.expected);
        }
    }
    Ok(())
}

fn call_identifier(hal: &mut dyn LpaHal, operation: Operation, iccid: Option<&str>, size: i32) -> HalStatus {
    match operation {
        EnableProfile => hal.enable_profile(iccid, size),
        DisableProfile => hal.disable_profile(iccid, size),
        DeleteProfile => hal.delete_profile(iccid, size),
        other => unreachable!("{} does not take an ICCID", other),
    }
}

/// Enable/disable/delete: the valid class runs once per fixture ICCID
fn identifier_case(spec: &CaseSpec, ctx: &mut CaseContext<'_>, hal: &mut dyn LpaHal, fixture: &Fixture) {
    let symbol = spec.operation.symbol();
    let size = fixture.settings().suite.iccid_size;

    if spec.input.is_positive() {
        if fixture.iccids().is_empty() {
            ctx.log("No iccid loaded; nothing to exercise");
            return;
        }
        for iccid in fixture.iccids().iter() {
            ctx.log(format_args!("Invoking {} with valid iccid : {} and iccid_size : {}", symbol, iccid, size));
            let status = call_identifier(hal, spec.operation, Some(iccid), size);
            ctx.assert_status(&format!("{}({})", symbol, iccid), status, spec.expected);
        }
        return;
    }

    // The valid value is never consulted for negative classes
    let iccid = spec.input.string_argument("");
    ctx.log(format_args!("Invoking {} with {} iccid {:?}", symbol, spec.input.label(), iccid));
    let status = call_identifier(hal, spec.operation, iccid, size);
    ctx.assert_status(symbol, status, spec.expected);
}

/// Enumeration: status check plus per-record validation
fn profile_info(
    spec: &CaseSpec,
    ctx: &mut CaseContext<'_>,
    hal: &mut dyn LpaHal,
    fixture: &Fixture,
) -> Result<(), FatalAssertion> {
    let symbol = spec.operation.symbol();
    let mut profiles = Vec::new();
    let mut count: i32 = 0;

    match spec.input {
        NullProfileList => {
            ctx.log(format_args!("Invoking {} with NULL profile list", symbol));
            let status = hal.get_profile_info(None, Some(&mut count));
            ctx.assert_status(symbol, status, spec.expected);
            return Ok(());
        }
        NullCount => {
            ctx.log(format_args!("Invoking {} with NULL nb_profiles", symbol));
            let status = hal.get_profile_info(Some(&mut profiles), None);
            ctx.assert_status(symbol, status, spec.expected);
            return Ok(());
        }
        _ => {}
    }

    ctx.log(format_args!("Invoking {} with valid parameters", symbol));
    let status = hal.get_profile_info(Some(&mut profiles), Some(&mut count));
    if !ctx.assert_status(symbol, status, spec.expected) {
        return Err(ctx.fail_fatal("profile list unavailable; records not validated"));
    }
    if !status.is_ok() {
        return Ok(());
    }

    ctx.check(
        "nb_profiles matches the number of returned records",
        count,
        profiles.len(),
        usize::try_from(count).is_ok_and(|n| n == profiles.len()),
    );

    if profiles.is_empty() {
        ctx.log("No profiles available");
        return Ok(());
    }

    let settings = fixture.settings();
    for (index, profile) in profiles.iter().enumerate() {
        let n = index + 1;
        ctx.log(format_args!(
            "profile : {} iccid :{} profileName :{} profileState :{}",
            n,
            profile.iccid,
            profile.name,
            profile.state.raw()
        ));
        ctx.check(
            format!("profile {} iccid is a loaded iccid", n),
            &profile.iccid,
            "member of the iccid config",
            fixture.iccids().contains(&profile.iccid),
        );
        ctx.check(
            format!("profile {} profileName is an allowed name", n),
            &profile.name,
            settings.profiles.allowed_names.join(" | "),
            settings.is_allowed_name(&profile.name),
        );
        ctx.check(
            format!("profile {} profileState is defined", n),
            profile.state.raw(),
            "0 (disabled) or 1 (enabled)",
            profile.state.is_defined(),
        );
    }
    Ok(())
}

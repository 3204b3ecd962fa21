//! Shape checks for identifiers and server addresses
//!
//! Used by the loader to warn about suspicious ICCIDs and by the simulated
//! eUICC to reject malformed arguments the way a conforming HAL must.

use regex::Regex;
use std::sync::OnceLock;

use crate::constants::{ICCID_MAX_DIGITS, ICCID_MIN_DIGITS};

/// Prefix some SM-DP+ configurations carry in front of the address
pub const DEFAULT_SMDP_PREFIX: &str = "deviceDefaultSMDPAddress=";

fn iccid_shape() -> &'static Regex {
    static SHAPE: OnceLock<Regex> = OnceLock::new();
    SHAPE.get_or_init(|| {
        let pattern = format!(r"^[0-9]{{{},{}}}$", ICCID_MIN_DIGITS, ICCID_MAX_DIGITS);
        Regex::new(&pattern).expect("ICCID pattern is a valid regex")
    })
}

fn host_shape() -> &'static Regex {
    static SHAPE: OnceLock<Regex> = OnceLock::new();
    SHAPE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$")
            .expect("host pattern is a valid regex")
    })
}

/// Whether `value` is a plausible ICCID (ASCII digits only, 18-22 long)
pub fn looks_like_iccid(value: &str) -> bool {
    iccid_shape().is_match(value)
}

/// Whether `value` is a dotted host name usable as an SM-DS/SM-DP+ address
pub fn is_server_address(value: &str) -> bool {
    value.len() <= 253 && host_shape().is_match(value)
}

/// Accepts a bare host or one carrying the default SM-DP+ prefix
pub fn is_default_smdp_address(value: &str) -> bool {
    is_server_address(value.strip_prefix(DEFAULT_SMDP_PREFIX).unwrap_or(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iccid_shape() {
        assert!(looks_like_iccid("98410800004860024951"));
        assert!(looks_like_iccid("8901260882310000000"));
        assert!(!looks_like_iccid(""));
        assert!(!looks_like_iccid("random"));
        assert!(!looks_like_iccid("984141"));
        assert!(!looks_like_iccid("98414102915071@#0054"));
        assert!(!looks_like_iccid("98410A00@04860024951"));
        assert!(!looks_like_iccid("98410800004860024951\n"));
    }

    #[test]
    fn test_server_address_shape() {
        assert!(is_server_address("oem-smds-json.demo.gemalto.com"));
        assert!(is_server_address("smdp-plus.test.gsma.com"));
        assert!(!is_server_address(""));
        assert!(!is_server_address("localhost"));
        assert!(!is_server_address("o6m-smds-j#on.e@mo.g@malto.com"));
        assert!(!is_server_address("-leading.example.com"));
    }

    #[test]
    fn test_default_smdp_prefix() {
        assert!(is_default_smdp_address("smdp-plus.test.gsma.com"));
        assert!(is_default_smdp_address(
            "deviceDefaultSMDPAddress=smdp-plus.test.gsma.com"
        ));
        assert!(!is_default_smdp_address(
            "d#vice8efaultSMD@Address=smdp-plus.test.g9ma.com"
        ));
        assert!(!is_default_smdp_address("deviceDefaultSMDPAddress="));
    }
}

//! Case selection
//!
//! `--case` filters select which registered cases run. A filter containing
//! glob characters is matched as a glob pattern; anything else must equal the
//! case name or name a whole operation (`enable_profile` selects every
//! `enable_profile.*` case).

use anyhow::{anyhow, Result};
use glob::Pattern;

/// Check if a filter string contains glob pattern characters
pub fn is_glob_pattern(filter: &str) -> bool {
    filter.contains('*') || filter.contains('?') || filter.contains('[')
}

/// Match one case name against one filter
pub fn matches_case_filter(case_name: &str, filter: &str) -> bool {
    if is_glob_pattern(filter) {
        match Pattern::new(filter) {
            Ok(pattern) => pattern.matches(case_name),
            Err(_) => case_name == filter,
        }
    } else {
        case_name == filter
            || case_name
                .split_once('.')
                .is_some_and(|(operation, _)| operation == filter)
    }
}

/// A case is selected when no filters are given or any filter matches
pub fn case_matches_filters(case_name: &str, filters: &[String]) -> bool {
    filters.is_empty() || filters.iter().any(|filter| matches_case_filter(case_name, filter))
}

/// Validate that all glob filters are syntactically correct
pub fn validate_case_filters(filters: &[String]) -> Result<()> {
    for filter in filters {
        if filter.trim().is_empty() {
            return Err(anyhow!("Empty case filter"));
        }
        if is_glob_pattern(filter) {
            Pattern::new(filter).map_err(|e| anyhow!("Invalid glob pattern '{}': {}", filter, e))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_glob_pattern() {
        assert!(!is_glob_pattern("enable_profile.negative1"));
        assert!(is_glob_pattern("enable_profile.*"));
        assert!(is_glob_pattern("*.positive?"));
        assert!(is_glob_pattern("lpa_[ie]*"));
    }

    #[test]
    fn test_exact_and_operation_matching() {
        assert!(matches_case_filter("enable_profile.negative1", "enable_profile.negative1"));
        assert!(matches_case_filter("enable_profile.negative1", "enable_profile"));
        assert!(!matches_case_filter("enable_profile.negative1", "enable"));
        assert!(!matches_case_filter("disable_profile.positive1", "enable_profile"));
    }

    #[test]
    fn test_glob_matching() {
        assert!(matches_case_filter("enable_profile.positive1", "enable_profile.*"));
        assert!(matches_case_filter("delete_profile.positive1", "*.positive1"));
        assert!(matches_case_filter("lpa_exit.positive1", "lpa_[ie]*"));
        assert!(!matches_case_filter("get_eid.positive1", "lpa_*"));
    }

    #[test]
    fn test_no_filters_selects_everything() {
        assert!(case_matches_filters("get_euicc.positive1", &[]));
        let filters = vec!["get_eid".to_string(), "lpa_*".to_string()];
        assert!(case_matches_filters("lpa_init.positive1", &filters));
        assert!(case_matches_filters("get_eid.positive1", &filters));
        assert!(!case_matches_filters("get_euicc.positive1", &filters));
    }

    #[test]
    fn test_validate_case_filters() {
        assert!(validate_case_filters(&["enable_profile.*".to_string()]).is_ok());
        assert!(validate_case_filters(&["[unclosed".to_string()]).is_err());
        assert!(validate_case_filters(&["  ".to_string()]).is_err());
    }
}

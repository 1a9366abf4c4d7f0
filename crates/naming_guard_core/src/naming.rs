use regex::Regex;

use crate::contract::ContractError;

/// `YYYYMMDD_PROJECTCODE_DELIVERABLE_LoDNNN.ext`
pub const DEFAULT_NAMING_PATTERN: &str = r"^\d{8}_[A-Z0-9]+_[A-Za-z0-9]+_LoD\d{3}\.[a-z0-9]+$";

/// Compiled compliance predicate applied to the full object key.
#[derive(Debug, Clone)]
pub struct NamingRule {
    regex: Regex,
}

impl NamingRule {
    pub fn new(pattern: &str) -> Result<Self, ContractError> {
        if pattern.trim().is_empty() {
            return Err(ContractError::new("naming pattern cannot be empty"));
        }
        let regex = Regex::new(pattern)
            .map_err(|error| ContractError::new(format!("Invalid naming pattern: {error}")))?;
        Ok(Self { regex })
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// Whole-key, case-sensitive match. Anchoring comes from the pattern.
    pub fn is_compliant(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }
}

impl Default for NamingRule {
    fn default() -> Self {
        Self {
            regex: Regex::new(DEFAULT_NAMING_PATTERN).expect("default naming pattern compiles"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_sop_compliant_names() {
        let rule = NamingRule::default();
        assert!(rule.is_compliant("20240115_PRJ1_Scan_LoD200.las"));
        assert!(rule.is_compliant("20231231_A1B2_pointCloud7_LoD001.e57"));
    }

    #[test]
    fn rejects_lowercase_project_code() {
        let rule = NamingRule::default();
        assert!(!rule.is_compliant("20240115_prj1_scan_LoD200.las"));
    }

    #[test]
    fn rejects_structural_deviations() {
        let rule = NamingRule::default();
        for name in [
            "scan_final.las",
            "2024011_PRJ1_Scan_LoD200.las",
            "20240115_PRJ1_Scan_LOD200.las",
            "20240115_PRJ1_Scan_LoD20.las",
            "20240115_PRJ1_Scan_LoD2000.las",
            "20240115_PRJ1_Scan_LoD200.LAS",
            "20240115_PRJ1_Scan_LoD200",
            "20240115_PRJ1_Scan-v2_LoD200.las",
            "20240115_PRJ1_Scan_LoD200.las.bak",
        ] {
            assert!(!rule.is_compliant(name), "{name} should not be compliant");
        }
    }

    #[test]
    fn match_covers_the_whole_key_including_path() {
        let rule = NamingRule::default();
        assert!(!rule.is_compliant("site-a/20240115_PRJ1_Scan_LoD200.las"));
        assert!(!rule.is_compliant("x20240115_PRJ1_Scan_LoD200.las"));
    }

    #[test]
    fn custom_pattern_replaces_default() {
        let rule = NamingRule::new(r"^[a-z]+\.txt$").expect("pattern should compile");
        assert_eq!(rule.pattern(), r"^[a-z]+\.txt$");
        assert!(rule.is_compliant("notes.txt"));
        assert!(!rule.is_compliant("20240115_PRJ1_Scan_LoD200.las"));
    }

    #[test]
    fn invalid_pattern_is_a_contract_error() {
        let error = NamingRule::new("^[unclosed").expect_err("pattern should not compile");
        assert!(error.message().starts_with("Invalid naming pattern"));

        let blank = NamingRule::new("  ").expect_err("blank pattern should fail");
        assert_eq!(blank.message(), "naming pattern cannot be empty");
    }
}

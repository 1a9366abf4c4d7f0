use serde::{Deserialize, Serialize};

/// Why an upload is left alone before the naming rule is consulted.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionReason {
    AlreadyQuarantined,
    HiddenFile,
}

impl ExclusionReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AlreadyQuarantined => "already_quarantined",
            Self::HiddenFile => "hidden_file",
        }
    }
}

/// The quarantine prefix matches anywhere in the key, not only at the start.
pub fn exclusion_reason(name: &str, quarantine_prefix: &str) -> Option<ExclusionReason> {
    if !quarantine_prefix.is_empty() && name.contains(quarantine_prefix) {
        return Some(ExclusionReason::AlreadyQuarantined);
    }
    if final_segment(name).starts_with('.') {
        return Some(ExclusionReason::HiddenFile);
    }
    None
}

fn final_segment(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PREFIX: &str = "quarantine/";

    #[test]
    fn skips_quarantined_keys_anywhere_in_path() {
        assert_eq!(
            exclusion_reason("quarantine/20240115_PRJ1_Scan_LoD200.las", PREFIX),
            Some(ExclusionReason::AlreadyQuarantined)
        );
        assert_eq!(
            exclusion_reason("archive/quarantine/scan.las", PREFIX),
            Some(ExclusionReason::AlreadyQuarantined)
        );
    }

    #[test]
    fn skips_hidden_final_segment() {
        assert_eq!(
            exclusion_reason(".DS_Store", PREFIX),
            Some(ExclusionReason::HiddenFile)
        );
        assert_eq!(
            exclusion_reason("site-a/.keep", PREFIX),
            Some(ExclusionReason::HiddenFile)
        );
    }

    #[test]
    fn dotted_directories_do_not_hide_the_file() {
        assert_eq!(exclusion_reason(".cache/scan_final.las", PREFIX), None);
    }

    #[test]
    fn ordinary_keys_are_not_excluded() {
        assert_eq!(exclusion_reason("scan_final.las", PREFIX), None);
        assert_eq!(exclusion_reason("quarantine.las", PREFIX), None);
    }

    #[test]
    fn honours_custom_prefix() {
        assert_eq!(
            exclusion_reason("rejected/scan.las", "rejected/"),
            Some(ExclusionReason::AlreadyQuarantined)
        );
        assert_eq!(exclusion_reason("quarantine/scan.las", "rejected/"), None);
    }
}

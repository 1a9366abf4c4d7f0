use crate::runtime::naming::{NamingRule, DEFAULT_NAMING_PATTERN};
use crate::runtime::storage_keys::{normalize_quarantine_prefix, DEFAULT_QUARANTINE_PREFIX};

pub const NAMING_PATTERN_ENV: &str = "NAMING_PATTERN";
pub const QUARANTINE_PREFIX_ENV: &str = "QUARANTINE_PREFIX";

#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    pub rule: NamingRule,
    pub quarantine_prefix: String,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            rule: NamingRule::default(),
            quarantine_prefix: DEFAULT_QUARANTINE_PREFIX.to_string(),
        }
    }
}

impl ValidatorConfig {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Unset variables fall back to defaults; set-but-invalid values are errors.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let rule = match lookup(NAMING_PATTERN_ENV) {
            Some(pattern) => NamingRule::new(&pattern)
                .map_err(|error| format!("{NAMING_PATTERN_ENV}: {error}"))?,
            None => NamingRule::default(),
        };

        let quarantine_prefix = normalize_quarantine_prefix(
            lookup(QUARANTINE_PREFIX_ENV)
                .as_deref()
                .unwrap_or(DEFAULT_QUARANTINE_PREFIX),
        )
        .map_err(|error| format!("{QUARANTINE_PREFIX_ENV}: {error}"))?;

        Ok(Self {
            rule,
            quarantine_prefix,
        })
    }
}

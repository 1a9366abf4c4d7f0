use crate::contract::ContractError;

pub const DEFAULT_QUARANTINE_PREFIX: &str = "quarantine/";

/// Canonical form of a quarantine prefix: no leading slash, exactly one
/// trailing slash.
pub fn normalize_quarantine_prefix(prefix: &str) -> Result<String, ContractError> {
    let trimmed = prefix.trim().trim_matches('/');
    if trimmed.is_empty() {
        return Err(ContractError::new("quarantine prefix cannot be empty"));
    }
    Ok(format!("{trimmed}/"))
}

pub fn quarantine_object_key(quarantine_prefix: &str, name: &str) -> String {
    format!("{quarantine_prefix}{name}")
}

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::adapters::object_store::ObjectStore;
use crate::config::ValidatorConfig;
use crate::runtime::contract::{normalize_event, UploadEvent};
use crate::runtime::decision::{evaluate, Verdict};
use crate::runtime::exclusion::ExclusionReason;

/// What an invocation did. The platform does not branch on it; it is
/// returned for observability and tests.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ValidationOutcome {
    Skipped { reason: ExclusionReason },
    Compliant,
    Quarantined { target_key: String },
    SourceMissing { quarantine_copy_present: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorError {
    pub message: String,
    /// Set when the quarantine copy was written but the original could not
    /// be removed; the object then exists under both keys.
    pub stranded_copy: Option<String>,
}

impl ValidatorError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            stranded_copy: None,
        }
    }
}

impl std::fmt::Display for ValidatorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidatorError {}

pub fn handle_validation_payload(
    payload: Value,
    config: &ValidatorConfig,
    store: &impl ObjectStore,
) -> Result<ValidationOutcome, ValidatorError> {
    let event = normalize_event(payload).map_err(|error| {
        log_validator("error", "invalid_event", json!({ "error": error.message() }));
        ValidatorError::new(format!("invalid upload event: {error}"))
    })?;
    handle_upload_event(&event, config, store)
}

pub fn handle_upload_event(
    event: &UploadEvent,
    config: &ValidatorConfig,
    store: &impl ObjectStore,
) -> Result<ValidationOutcome, ValidatorError> {
    match evaluate(event, &config.rule, &config.quarantine_prefix) {
        Verdict::Excluded { reason } => {
            log_validator(
                "info",
                "upload_skipped",
                json!({
                    "bucket": event.bucket.clone(),
                    "name": event.name.clone(),
                    "reason": reason.as_str(),
                }),
            );
            Ok(ValidationOutcome::Skipped { reason })
        }
        Verdict::Compliant => {
            log_validator(
                "info",
                "naming_compliant",
                json!({
                    "bucket": event.bucket.clone(),
                    "name": event.name.clone(),
                }),
            );
            Ok(ValidationOutcome::Compliant)
        }
        Verdict::Quarantine { target_key } => quarantine(event, &target_key, store),
    }
}

/// Copy, confirm the copy, then delete. The pair is not atomic: a failed
/// delete leaves the object under both keys and fails the invocation.
fn quarantine(
    event: &UploadEvent,
    target_key: &str,
    store: &impl ObjectStore,
) -> Result<ValidationOutcome, ValidatorError> {
    let bucket = event.bucket.as_str();
    let source_key = event.name.as_str();

    let source_present = store
        .object_exists(bucket, source_key)
        .map_err(|error| storage_failure("source_lookup_failed", event, target_key, error))?;
    if !source_present {
        let quarantine_copy_present = store
            .object_exists(bucket, target_key)
            .map_err(|error| storage_failure("target_lookup_failed", event, target_key, error))?;
        log_validator(
            "warn",
            "source_missing",
            json!({
                "bucket": bucket,
                "name": source_key,
                "target_key": target_key,
                "quarantine_copy_present": quarantine_copy_present,
            }),
        );
        return Ok(ValidationOutcome::SourceMissing {
            quarantine_copy_present,
        });
    }

    log_validator(
        "warn",
        "naming_violation",
        json!({
            "bucket": bucket,
            "name": source_key,
            "target_key": target_key,
        }),
    );

    store
        .copy_object(bucket, source_key, target_key)
        .map_err(|error| storage_failure("quarantine_copy_failed", event, target_key, error))?;

    let copy_present = store
        .object_exists(bucket, target_key)
        .map_err(|error| storage_failure("target_lookup_failed", event, target_key, error))?;
    if !copy_present {
        return Err(storage_failure(
            "quarantine_copy_missing",
            event,
            target_key,
            "copy reported success but the quarantine object is not visible".to_string(),
        ));
    }

    if let Err(error) = store.delete_object(bucket, source_key) {
        log_validator(
            "error",
            "quarantine_inconsistent",
            json!({
                "bucket": bucket,
                "name": source_key,
                "target_key": target_key,
                "error": error.clone(),
            }),
        );
        return Err(ValidatorError {
            message: format!(
                "copied '{source_key}' to '{target_key}' but failed to delete the original: {error}"
            ),
            stranded_copy: Some(target_key.to_string()),
        });
    }

    log_validator(
        "info",
        "upload_quarantined",
        json!({
            "bucket": bucket,
            "name": source_key,
            "target_key": target_key,
        }),
    );
    Ok(ValidationOutcome::Quarantined {
        target_key: target_key.to_string(),
    })
}

fn storage_failure(
    event_name: &str,
    event: &UploadEvent,
    target_key: &str,
    error: String,
) -> ValidatorError {
    log_validator(
        "error",
        event_name,
        json!({
            "bucket": event.bucket.clone(),
            "name": event.name.clone(),
            "target_key": target_key,
            "error": error.clone(),
        }),
    );
    ValidatorError::new(format!("failed to quarantine '{}': {error}", event.name))
}

fn log_validator(level: &str, event: &str, details: Value) {
    eprintln!(
        "{}",
        json!({
            "component": "naming_validator",
            "level": level,
            "event": event,
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "details": details,
        })
    );
}

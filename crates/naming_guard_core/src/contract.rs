use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Object-creation event reduced to the two fields the validator reads.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadEvent {
    pub bucket: String,
    pub name: String,
}

impl UploadEvent {
    pub fn new(bucket: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct S3NotificationEvent {
    #[serde(rename = "Records")]
    records: Vec<S3NotificationRecord>,
}

#[derive(Debug, Clone, Deserialize)]
struct S3NotificationRecord {
    s3: S3Entity,
}

#[derive(Debug, Clone, Deserialize)]
struct S3Entity {
    bucket: S3Bucket,
    object: S3Object,
}

#[derive(Debug, Clone, Deserialize)]
struct S3Bucket {
    name: String,
}

#[derive(Debug, Clone, Deserialize)]
struct S3Object {
    key: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractError {
    message: String,
}

impl ContractError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ContractError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ContractError {}

/// Reduces an incoming invocation payload to a single [`UploadEvent`].
///
/// Accepted shapes:
/// - storage notification data: `{"bucket": ..., "name": ...}`
/// - cloud-event envelope carrying that data under `"data"`
/// - S3 notification with exactly one entry in `"Records"`
pub fn normalize_event(event: Value) -> Result<UploadEvent, ContractError> {
    let Some(object) = event.as_object() else {
        return Err(ContractError::new("Event payload must be a JSON object"));
    };

    let upload = if object.contains_key("Records") {
        decode_s3_notification(event)?
    } else if let Some(data) = object.get("data") {
        if !data.is_object() {
            return Err(ContractError::new("Event data must be a JSON object"));
        }
        serde_json::from_value::<UploadEvent>(data.clone())
            .map_err(|error| ContractError::new(format!("Malformed event data: {error}")))?
    } else {
        serde_json::from_value::<UploadEvent>(event)
            .map_err(|error| ContractError::new(format!("Malformed event: {error}")))?
    };

    validate_event(upload)
}

fn decode_s3_notification(event: Value) -> Result<UploadEvent, ContractError> {
    let notification: S3NotificationEvent = serde_json::from_value(event)
        .map_err(|error| ContractError::new(format!("Malformed S3 notification: {error}")))?;

    let mut records = notification.records.into_iter();
    let (Some(record), None) = (records.next(), records.next()) else {
        return Err(ContractError::new(
            "S3 notification must carry exactly one record",
        ));
    };

    Ok(UploadEvent {
        bucket: record.s3.bucket.name,
        name: decode_s3_object_key(&record.s3.object.key)?,
    })
}

/// S3 notifications carry form-encoded keys: `+` for space, `%XX` otherwise.
pub fn decode_s3_object_key(raw_key: &str) -> Result<String, ContractError> {
    let spaced = raw_key.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|decoded| decoded.into_owned())
        .map_err(|error| ContractError::new(format!("Object key is not valid UTF-8: {error}")))
}

fn validate_event(event: UploadEvent) -> Result<UploadEvent, ContractError> {
    if event.bucket.trim().is_empty() {
        return Err(ContractError::new("bucket cannot be empty"));
    }
    if event.name.is_empty() {
        return Err(ContractError::new("name cannot be empty"));
    }
    Ok(event)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn accepts_flat_storage_notification() {
        let event = normalize_event(json!({
            "bucket": "scans",
            "name": "20240115_PRJ1_Scan_LoD200.las",
            "contentType": "application/octet-stream"
        }))
        .expect("flat event should parse");

        assert_eq!(
            event,
            UploadEvent::new("scans", "20240115_PRJ1_Scan_LoD200.las")
        );
    }

    #[test]
    fn unwraps_cloud_event_envelope() {
        let event = normalize_event(json!({
            "specversion": "1.0",
            "type": "google.cloud.storage.object.v1.finalized",
            "data": {"bucket": "scans", "name": "site/scan_final.las"}
        }))
        .expect("envelope should parse");

        assert_eq!(event.bucket, "scans");
        assert_eq!(event.name, "site/scan_final.las");
    }

    #[test]
    fn decodes_s3_notification_key() {
        let event = normalize_event(json!({
            "Records": [{
                "eventSource": "aws:s3",
                "s3": {
                    "bucket": {"name": "scans"},
                    "object": {"key": "incoming/scan+final%2Bv2.las", "size": 12}
                }
            }]
        }))
        .expect("s3 notification should parse");

        assert_eq!(event.bucket, "scans");
        assert_eq!(event.name, "incoming/scan final+v2.las");
    }

    #[test]
    fn rejects_multi_record_notification() {
        let record = json!({
            "s3": {"bucket": {"name": "scans"}, "object": {"key": "a.las"}}
        });
        let error = normalize_event(json!({"Records": [record.clone(), record]}))
            .expect_err("two records should be rejected");

        assert!(error.message().contains("exactly one record"));
    }

    #[test]
    fn rejects_empty_record_list() {
        let error =
            normalize_event(json!({"Records": []})).expect_err("no records should be rejected");
        assert!(error.message().contains("exactly one record"));
    }

    #[test]
    fn rejects_missing_name() {
        let error = normalize_event(json!({"bucket": "scans"})).expect_err("missing name");
        assert!(error.message().starts_with("Malformed event"));
    }

    #[test]
    fn rejects_blank_bucket_and_name() {
        let blank_bucket = normalize_event(json!({"bucket": " ", "name": "a.las"}))
            .expect_err("blank bucket should fail");
        assert_eq!(blank_bucket.message(), "bucket cannot be empty");

        let blank_name = normalize_event(json!({"data": {"bucket": "scans", "name": ""}}))
            .expect_err("blank name should fail");
        assert_eq!(blank_name.message(), "name cannot be empty");
    }

    #[test]
    fn rejects_non_object_payload() {
        let error = normalize_event(json!("scan.las")).expect_err("string payload should fail");
        assert_eq!(error.message(), "Event payload must be a JSON object");
    }
}

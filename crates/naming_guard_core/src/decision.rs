use serde::{Deserialize, Serialize};

use crate::contract::UploadEvent;
use crate::exclusion::{exclusion_reason, ExclusionReason};
use crate::naming::NamingRule;
use crate::storage_keys::quarantine_object_key;

/// Pure classification of an upload; no storage is touched here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    Excluded { reason: ExclusionReason },
    Compliant,
    Quarantine { target_key: String },
}

pub fn evaluate(event: &UploadEvent, rule: &NamingRule, quarantine_prefix: &str) -> Verdict {
    if let Some(reason) = exclusion_reason(&event.name, quarantine_prefix) {
        return Verdict::Excluded { reason };
    }

    if rule.is_compliant(&event.name) {
        Verdict::Compliant
    } else {
        Verdict::Quarantine {
            target_key: quarantine_object_key(quarantine_prefix, &event.name),
        }
    }
}

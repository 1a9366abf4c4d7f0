//! Upload naming-convention domain primitives.
//!
//! This crate owns the event contract, the compliance rule, the exclusion
//! filter and quarantine key layout. It intentionally excludes AWS SDK and
//! Lambda runtime concerns; those live in `naming_guard_lambda`.

pub mod contract;
pub mod decision;
pub mod exclusion;
pub mod naming;
pub mod storage_keys;

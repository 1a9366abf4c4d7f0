//! Domain primitives re-exported for handlers and binaries.

pub use naming_guard_core::{contract, decision, exclusion, naming, storage_keys};

//! AWS-oriented adapters and handlers for upload naming enforcement.
//!
//! This crate owns runtime integration details (Lambda handler, environment
//! configuration, and storage adapters) and exposes a single runtime module
//! boundary for contract, naming, and storage key primitives.

pub mod adapters;
pub mod config;
pub mod handlers;
pub mod runtime;

//! Shared test utilities used across quartic crates.

pub mod ci;
pub mod tracing;

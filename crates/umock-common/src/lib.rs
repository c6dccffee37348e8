//! Common types and utilities for the umock mock generator.
//!
//! This crate provides foundational types used across all umock crates:
//! - Diagnostics and the fatal generation-error taxonomy
//! - Centralized limits and thresholds
//! - Tracing configuration

pub mod diagnostics;
pub use diagnostics::{Diagnostic, DiagnosticCategory, GenError, GenResult};

// Centralized limits and thresholds
pub mod limits;

// Tracing setup
pub mod logging;

//! Centralized limits and thresholds for the mock generator.
//!
//! This module provides shared constants for recursion depths and iteration
//! bounds used throughout the codebase. Centralizing these values prevents
//! duplicate definitions with inconsistent values and documents the rationale
//! for each limit.

/// Maximum number of rewrite passes the alias resolver performs on one
/// type expression.
///
/// Each pass resolves every alias reference visible in the expression; a
/// chain of aliases (`A = B`, `B = C`, ...) needs one pass per link. Eight
/// passes cover any realistic chain while guaranteeing termination on
/// self-referential or mutually recursive alias definitions, which otherwise
/// rewrite forever:
///
/// ```text
/// typealias Loop = Loop?        // would never reach a fix-point
/// typealias A = B; typealias B = A
/// ```
///
/// When the bound is hit the best-effort partially resolved expression is
/// returned; unresolved names pass through untouched.
pub const MAX_ALIAS_PASSES: usize = 8;

/// Maximum depth for inheritance flattening.
///
/// Flattening already carries a visited set, so cycles terminate without this
/// bound; it exists to cap pathological (machine-generated) deep linear
/// hierarchies before they exhaust the stack.
pub const MAX_INHERITANCE_DEPTH: usize = 256;

//! Template matching module for buff indicator recognition
//!
//! This module provides:
//! - Immutable templates with precomputed intensity statistics
//! - Zero-mean normalized cross-correlation, invariant to brightness offset
//! - Global-maximum search with deterministic tie-breaking

pub mod matcher;
pub mod types;

pub use matcher::TemplateMatcher;
pub use types::{MatchError, MatchResult, Template};

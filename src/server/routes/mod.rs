//! Route handlers for the workflow endpoints
//!
//! Grouped by domain: idea generation, validation, research, and
//! financials. Every handler follows the same shape: validate the request
//! fields, aggregate market context where the workflow calls for it, run
//! the generation calls, persist best-effort, respond with a
//! `{"status": "success", ...}` body.

mod financial_routes;
mod idea_routes;
mod research_routes;
mod validation_routes;

pub use financial_routes::financials;
pub use idea_routes::{generate, generate_prototype, regenerate};
pub use research_routes::{ingest, rag_query};
pub use validation_routes::{deepvalidate, unicorn_predict, validate};

use crate::error::ApiError;

/// Extract a required, non-empty request field
///
/// An empty or whitespace-only value counts as missing; the check runs
/// before any search or generation call is attempted.
pub fn require_field<'a>(
    value: Option<&'a str>,
    name: &'static str,
) -> Result<&'a str, ApiError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ApiError::MissingField(name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_field_present() {
        assert_eq!(require_field(Some("topic"), "topic").unwrap(), "topic");
    }

    #[test]
    fn test_require_field_missing_or_blank() {
        assert!(require_field(None, "topic").is_err());
        assert!(require_field(Some(""), "topic").is_err());
        assert!(require_field(Some("   "), "topic").is_err());
    }
}

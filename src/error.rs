//! Errors raised while turning a raw request report into log lines

use thiserror::Error;

/// Why a report could not be logged
///
/// Every variant is contained by [`crate::emit::log_report`]; none of them
/// ever reach the request-handling path.
#[derive(Debug, Error)]
pub enum ReportError {
    /// A required report field was absent
    #[error("report is missing required field `{0}`")]
    MissingField(&'static str),

    /// A field was present but held an unusable value
    #[error("report field `{field}` is invalid: {reason}")]
    InvalidField {
        /// Name of the offending field
        field: &'static str,
        /// What was wrong with it
        reason: String,
    },

    /// The report could not be decoded at all
    #[error("malformed report: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The line sink refused a write
    #[error("failed to write log line: {0}")]
    Sink(#[from] std::io::Error),

    /// Rendering or writing panicked; the payload message is kept for diagnosis
    #[error("unexpected failure while logging report: {0}")]
    Panicked(String),
}

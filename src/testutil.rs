//! Shared test utilities
//!
//! Common helpers used across test modules. Only compiled in test builds.

use crate::report::{Location, Report};

/// Create a `Report` for testing with sensible defaults.
///
/// Uses a matched `path`, `response_time = 5`, an empty target and no exit
/// headers.
#[must_use]
pub fn make_test_report(method: &str, path: &str, status_code: u16) -> Report {
    Report::new(method, Location::Path(path.to_string()), status_code, 5)
}

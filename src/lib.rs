//! apilog - colorized request logs
//!
//! Renders each completed HTTP request/response report as one aligned,
//! colorized terminal line, plus an optional block describing the "exit"
//! (outcome) that produced the response.

// Allow multiple crate versions from dependencies (can't easily control)
#![allow(clippy::multiple_crate_versions)]

pub mod config;
pub mod emit;
pub mod error;
pub mod lifecycle;
pub mod render;
pub mod report;

#[cfg(test)]
mod testutil;

// Re-export commonly used types
pub use config::{ColorMode, FormatterConfig};
pub use emit::{
    log_json, log_report, log_value, ErrorReporter, LineSink, TracingReporter, WriterSink,
};
pub use error::ReportError;
pub use lifecycle::{redact_params, ConsoleHook, Dispatcher, RequestTracker, ResponseHook};
pub use render::{color_for, render, Line, Span, StatusBucket, Style, Tone};
pub use report::{ExitHeaders, Location, RawReport, Report, Target};

//! Request log rendering
//!
//! Turns a [`crate::report::Report`] into styled lines. Nothing in here does
//! I/O; see [`crate::emit`] for writing lines out.

pub mod formatter;
pub mod span;
pub mod verb;

pub use formatter::{humanize_exit_name, indentation, is_prominent, render, StatusBucket, MARGIN};
pub use span::{Line, Span, Style, Tone};
pub use verb::color_for;

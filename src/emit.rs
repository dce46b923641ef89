//! Writing rendered reports out
//!
//! [`log_report`] is the boundary between request handling and logging:
//! whatever goes wrong while decoding, rendering or writing a report is
//! reported once through an [`ErrorReporter`] and swallowed. A report that
//! fails to decode or render produces no output at all.

use std::any::Any;
use std::io::{self, Write};
use std::panic::{self, AssertUnwindSafe};

use serde_json::Value;

use crate::error::ReportError;
use crate::render::{render, Line};
use crate::report::Report;

/// Line-oriented destination for rendered output
pub trait LineSink {
    /// Write one line; the sink adds the line terminator
    fn write_line(&mut self, line: &Line) -> io::Result<()>;
}

/// Collects lines in memory
impl LineSink for Vec<Line> {
    fn write_line(&mut self, line: &Line) -> io::Result<()> {
        self.push(line.clone());
        Ok(())
    }
}

/// Writes ANSI-styled lines to any `io::Write`
pub struct WriterSink<W: Write> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    /// Wrap a writer
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Give back the wrapped writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl WriterSink<io::Stdout> {
    /// Sink writing to standard output
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> LineSink for WriterSink<W> {
    fn write_line(&mut self, line: &Line) -> io::Result<()> {
        writeln!(self.writer, "{}", line.to_ansi())?;
        self.writer.flush()
    }
}

/// Side channel for logging failures, separate from the line sink
pub trait ErrorReporter {
    /// Report one failure
    fn report(&mut self, error: &ReportError);
}

/// Reports failures as `tracing` error events
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn report(&mut self, error: &ReportError) {
        tracing::error!(
            error = %error,
            "Could not log an incoming request; the response was not affected"
        );
    }
}

/// Collects failures in memory
impl ErrorReporter for Vec<String> {
    fn report(&mut self, error: &ReportError) {
        self.push(error.to_string());
    }
}

/// Render `report` and write its lines to `sink`.
///
/// Returns the number of lines written; 0 means the failure went to
/// `errors` instead.
pub fn log_report<S, E>(report: &Report, sink: &mut S, errors: &mut E) -> usize
where
    S: LineSink + ?Sized,
    E: ErrorReporter + ?Sized,
{
    log_lines(|| render(report), sink, errors)
}

/// Build lines with `build`, then write them all in one go.
///
/// A panic while building or writing is reported as
/// [`ReportError::Panicked`]; a panic while building writes nothing.
pub(crate) fn log_lines<F, S, E>(build: F, sink: &mut S, errors: &mut E) -> usize
where
    F: FnOnce() -> Vec<Line>,
    S: LineSink + ?Sized,
    E: ErrorReporter + ?Sized,
{
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        let lines = build();
        write_all(&lines, sink, errors)
    }));

    outcome.unwrap_or_else(|payload| {
        errors.report(&ReportError::Panicked(panic_message(payload.as_ref())));
        0
    })
}

/// Decode a raw JSON report, then [`log_report`] it
pub fn log_value<S, E>(value: Value, sink: &mut S, errors: &mut E) -> usize
where
    S: LineSink + ?Sized,
    E: ErrorReporter + ?Sized,
{
    match Report::from_value(value) {
        Ok(report) => log_report(&report, sink, errors),
        Err(err) => {
            errors.report(&err);
            0
        }
    }
}

/// Decode a JSON text report, then [`log_report`] it
pub fn log_json<S, E>(json: &str, sink: &mut S, errors: &mut E) -> usize
where
    S: LineSink + ?Sized,
    E: ErrorReporter + ?Sized,
{
    match Report::from_json(json) {
        Ok(report) => log_report(&report, sink, errors),
        Err(err) => {
            errors.report(&err);
            0
        }
    }
}

/// Write every line, stopping at the first sink failure
fn write_all<S, E>(lines: &[Line], sink: &mut S, errors: &mut E) -> usize
where
    S: LineSink + ?Sized,
    E: ErrorReporter + ?Sized,
{
    for (written, line) in lines.iter().enumerate() {
        if let Err(err) = sink.write_line(line) {
            errors.report(&ReportError::Sink(err));
            return written;
        }
    }
    lines.len()
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

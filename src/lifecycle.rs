//! Request lifecycle glue
//!
//! Hooks a host framework calls around each request. [`Dispatcher`] redacts
//! params before any hook sees a report. The formatter itself is stateless;
//! the only state lives here, in [`RequestTracker`], owned by the hook.

use chrono::{DateTime, TimeDelta, Utc};
use serde_json::Value;

use crate::config::FormatterConfig;
use crate::emit::{log_lines, ErrorReporter, LineSink};
use crate::render::{render, Line, Span, Style, Tone};
use crate::report::Report;

/// Replacement text for redacted parameter values
pub const REDACTED: &str = "*REDACTED*";

/// Remembers when the previous request arrived so idle gaps can be marked
/// with a timestamp landmark
#[derive(Debug, Clone)]
pub struct RequestTracker {
    landmark_after: Option<TimeDelta>,
    last_request_at: Option<DateTime<Utc>>,
}

impl RequestTracker {
    /// Create a tracker; `landmark_after_secs = 0` disables landmarks
    #[must_use]
    pub fn new(landmark_after_secs: u64) -> Self {
        let landmark_after = (landmark_after_secs > 0)
            .then(|| i64::try_from(landmark_after_secs).unwrap_or(i64::MAX))
            .and_then(TimeDelta::try_seconds);
        Self {
            landmark_after,
            last_request_at: None,
        }
    }

    /// When the previous request was observed
    #[must_use]
    pub const fn last_request_at(&self) -> Option<DateTime<Utc>> {
        self.last_request_at
    }

    /// Record a request arriving at `now`.
    ///
    /// Returns a landmark line for the first request and for any request
    /// that follows a gap longer than the configured idle time.
    pub fn observe(&mut self, now: DateTime<Utc>) -> Option<Line> {
        let previous = self.last_request_at.replace(now);
        let threshold = self.landmark_after?;

        let idle = match previous {
            None => true,
            Some(last) => now.signed_duration_since(last) > threshold,
        };
        idle.then(|| landmark_line(now))
    }
}

fn landmark_line(now: DateTime<Utc>) -> Line {
    Line::new().with(Span::new(
        format!(" ~ {} ~", now.format("%Y-%m-%d %H:%M:%S UTC")),
        Style::tone(Tone::Gray).dimmed(),
    ))
}

/// Replace the values of sensitive parameters, at any depth, with
/// [`REDACTED`]
pub fn redact_params(params: &mut Value, config: &FormatterConfig) {
    match params {
        Value::Object(map) => {
            for (name, value) in map.iter_mut() {
                if config.is_sensitive(name) {
                    *value = Value::String(REDACTED.to_string());
                } else {
                    redact_params(value, config);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                redact_params(item, config);
            }
        }
        _ => {}
    }
}

/// Callbacks a host framework invokes for each logged request.
///
/// Hooks only ever see reports that [`Dispatcher`] has already redacted.
pub trait ResponseHook {
    /// Called when a request arrives; does nothing by default
    fn on_request(&mut self, _report: &Report) {}

    /// Called once the response has finished
    fn on_response(&mut self, report: Report);
}

/// Default response notifier: marks idle gaps, then prints the formatted
/// request log
pub struct ConsoleHook<S: LineSink, E: ErrorReporter> {
    tracker: RequestTracker,
    sink: S,
    errors: E,
}

impl<S: LineSink, E: ErrorReporter> ConsoleHook<S, E> {
    /// Create a hook writing to `sink` and reporting failures to `errors`
    pub fn new(config: &FormatterConfig, sink: S, errors: E) -> Self {
        Self {
            tracker: RequestTracker::new(config.landmark_after_secs),
            sink,
            errors,
        }
    }

    /// Handle a response observed at `now`.
    ///
    /// The landmark and the report block go out in one write, so a broken
    /// sink costs one error per request.
    pub fn on_response_at(&mut self, report: &Report, now: DateTime<Utc>) -> usize {
        let landmark = self.tracker.observe(now);
        log_lines(
            || landmark.into_iter().chain(render(report)).collect(),
            &mut self.sink,
            &mut self.errors,
        )
    }

    /// The sink, for inspection
    pub const fn sink(&self) -> &S {
        &self.sink
    }

    /// The error reporter, for inspection
    pub const fn errors(&self) -> &E {
        &self.errors
    }
}

impl<S: LineSink, E: ErrorReporter> ResponseHook for ConsoleHook<S, E> {
    fn on_response(&mut self, report: Report) {
        self.on_response_at(&report, Utc::now());
    }
}

/// Hands reports to a [`ResponseHook`] after redacting their params
pub struct Dispatcher<H: ResponseHook, E: ErrorReporter> {
    config: FormatterConfig,
    hook: H,
    errors: E,
}

impl<H: ResponseHook, E: ErrorReporter> Dispatcher<H, E> {
    /// Create a dispatcher; reports that fail to decode go to `errors`
    pub const fn new(config: FormatterConfig, hook: H, errors: E) -> Self {
        Self {
            config,
            hook,
            errors,
        }
    }

    /// Redact `report` in place, then notify the hook of the request
    pub fn on_request(&mut self, report: &mut Report) {
        self.redact(report);
        self.hook.on_request(report);
    }

    /// Redact `report`, then hand it to the hook
    pub fn on_response(&mut self, mut report: Report) {
        self.redact(&mut report);
        self.hook.on_response(report);
    }

    /// Decode a JSON report and dispatch it as a finished response
    pub fn on_response_json(&mut self, json: &str) {
        match Report::from_json(json) {
            Ok(report) => self.on_response(report),
            Err(err) => self.errors.report(&err),
        }
    }

    fn redact(&self, report: &mut Report) {
        if let Some(params) = report.params.as_mut() {
            redact_params(params, &self.config);
        }
    }

    /// The hook, for inspection
    pub const fn hook(&self) -> &H {
        &self.hook
    }

    /// The error reporter, for inspection
    pub const fn errors(&self) -> &E {
        &self.errors
    }
}

//! Request log formatter
//!
//! Renders one report as a primary line:
//!
//! ```text
//! <- POST /signup                              (120ms 201)
//! ```
//!
//! followed, when the response carried an `x-exit` header, by an indented
//! block of exit metadata. Requests that look like static asset fetches
//! (a `GET` that no action, controller, view or model handled) are dimmed so
//! the interesting lines stand out.

use super::span::{Line, Span, Style, Tone};
use super::verb::color_for;
use crate::report::{ExitHeaders, Report};

/// Column the status/timing group is aligned to
pub const MARGIN: usize = 40;

const ARROW: &str = "<-";
const EXIT_PREFIX: &str = " |  ";
const EXIT_TERMINATOR: &str = " ° ";

/// Status code classes, each with a fixed color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusBucket {
    /// 2xx
    Success,
    /// 3xx
    Neutral,
    /// 4xx
    ClientIssue,
    /// 5xx and anything outside 200..600
    ServerIssue,
}

impl StatusBucket {
    /// Classify a status code
    #[must_use]
    pub const fn of(status_code: u16) -> Self {
        match status_code {
            200..=299 => Self::Success,
            300..=399 => Self::Neutral,
            400..=499 => Self::ClientIssue,
            _ => Self::ServerIssue,
        }
    }

    const fn tone(self) -> Tone {
        match self {
            Self::Success => Tone::Green,
            Self::Neutral => Tone::White,
            Self::ClientIssue => Tone::Yellow,
            Self::ServerIssue => Tone::Red,
        }
    }

    /// Style for the status code.
    ///
    /// A successful status on a non-prominent request is desaturated to gray
    /// instead of merely dimmed.
    #[must_use]
    pub const fn style(self, prominent: bool) -> Style {
        match (prominent, self) {
            (true, bucket) => Style::tone(bucket.tone()),
            (false, Self::Success) => Style::tone(Tone::Gray).dimmed(),
            (false, bucket) => Style::tone(bucket.tone()).dimmed(),
        }
    }
}

/// Spaces that align the status group at [`MARGIN`]; empty past the margin
#[must_use]
pub fn indentation(method: &str, location: &str) -> String {
    let key_len = method.chars().count() + location.chars().count();
    " ".repeat(MARGIN.saturating_sub(key_len))
}

/// Whether a request is shown at full brightness.
///
/// Anything other than a `GET`, or any request routed to an action,
/// controller, view or model, is prominent.
#[must_use]
pub fn is_prominent(report: &Report) -> bool {
    report.method != "GET" || !report.target.is_empty()
}

/// Render a report into the lines to log, in order
#[must_use]
pub fn render(report: &Report) -> Vec<Line> {
    let mut lines = vec![primary_line(report)];
    if report.exit.exit.is_some() {
        lines.extend(exit_block(&report.exit));
    }
    lines
}

fn primary_line(report: &Report) -> Line {
    let dim = !is_prominent(report);
    let location = report.location.as_str();
    let gray = Style::tone(Tone::Gray);

    Line::new()
        .with(Span::new(ARROW, gray.bold().dimmed_if(dim)))
        .with(Span::plain(" "))
        .with(Span::new(
            report.method.as_str(),
            Style::tone(color_for(&report.method)).dimmed_if(dim),
        ))
        .with(Span::plain(" "))
        .with(Span::new(location, Style::plain().dimmed_if(dim)))
        .with(Span::plain(" "))
        .with(Span::plain(indentation(&report.method, location)))
        .with(Span::plain(" "))
        .with(Span::new("(", gray))
        .with(Span::new(
            format!("{}ms", report.response_time),
            gray.dimmed_if(dim),
        ))
        .with(Span::plain(" "))
        .with(Span::new(
            report.status_code.to_string(),
            StatusBucket::of(report.status_code).style(!dim),
        ))
        .with(Span::new(")", gray))
}

fn prefixed(span: Span) -> Line {
    Line::new()
        .with(Span::new(EXIT_PREFIX, Style::tone(Tone::Gray)))
        .with(span)
}

fn bare_prefix() -> Line {
    Line::new().with(Span::new(EXIT_PREFIX, Style::tone(Tone::Gray)))
}

fn exit_block(exit: &ExitHeaders) -> Vec<Line> {
    let name = exit
        .friendly_name
        .clone()
        .unwrap_or_else(|| humanize_exit_name(exit.exit.as_deref().unwrap_or_default()));

    let mut lines = vec![prefixed(Span::new(name, Style::plain().bold()))];

    if let Some(description) = &exit.description {
        lines.push(prefixed(Span::plain(description.as_str())));
    }

    if let Some(extended) = &exit.extended_description {
        lines.push(bare_prefix());
        lines.push(prefixed(Span::plain(extended.as_str())));
        lines.push(bare_prefix());
    }

    if let Some(url) = &exit.more_info_url {
        lines.push(prefixed(Span::plain(url.as_str())));
    }

    if let Some(view) = &exit.view_template_path {
        lines.push(
            prefixed(Span::new("view: ", Style::plain().bold()))
                .with(Span::new(view.as_str(), Style::tone(Tone::Blue).dimmed())),
        );
    }

    lines.push(Line::new().with(Span::new(EXIT_TERMINATOR, Style::tone(Tone::Gray))));
    lines
}

/// Turn an exit identifier into a readable phrase.
///
/// `somethingWentWrong` becomes `something went wrong`: the identifier is
/// split into words and every word after the first has its first character
/// lower-cased.
#[must_use]
pub fn humanize_exit_name(exit: &str) -> String {
    split_words(exit)
        .into_iter()
        .enumerate()
        .map(|(i, word)| {
            if i == 0 {
                return word;
            }
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_lowercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split an identifier into words at separators, case changes and
/// letter/digit boundaries (`fooBar`, `HTTPServer`, `error404`, `snake_case`)
fn split_words(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if let Some(&prev) = i.checked_sub(1).and_then(|p| chars.get(p)) {
            let next = chars.get(i + 1).copied();
            let starts_word = prev.is_alphanumeric()
                && ((prev.is_lowercase() && c.is_uppercase())
                    || (prev.is_numeric() != c.is_numeric())
                    || (prev.is_uppercase()
                        && c.is_uppercase()
                        && next.is_some_and(char::is_lowercase)));
            if starts_word && !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
        }

        current.push(c);
    }

    if !current.is_empty() {
        words.push(current);
    }
    words
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{Location, Target};
    use crate::testutil::make_test_report;

    #[test]
    fn test_status_buckets_at_boundaries() {
        assert_eq!(StatusBucket::of(199), StatusBucket::ServerIssue);
        assert_eq!(StatusBucket::of(200), StatusBucket::Success);
        assert_eq!(StatusBucket::of(299), StatusBucket::Success);
        assert_eq!(StatusBucket::of(300), StatusBucket::Neutral);
        assert_eq!(StatusBucket::of(399), StatusBucket::Neutral);
        assert_eq!(StatusBucket::of(400), StatusBucket::ClientIssue);
        assert_eq!(StatusBucket::of(499), StatusBucket::ClientIssue);
        assert_eq!(StatusBucket::of(500), StatusBucket::ServerIssue);
        assert_eq!(StatusBucket::of(599), StatusBucket::ServerIssue);
        assert_eq!(StatusBucket::of(100), StatusBucket::ServerIssue);
    }

    #[test]
    fn test_bucket_colors_are_distinct() {
        let tones = [
            StatusBucket::Success.style(true).tone,
            StatusBucket::Neutral.style(true).tone,
            StatusBucket::ClientIssue.style(true).tone,
            StatusBucket::ServerIssue.style(true).tone,
        ];
        for (i, a) in tones.iter().enumerate() {
            for b in &tones[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_desaturated_success_differs_from_dimmed() {
        let desaturated = StatusBucket::Success.style(false);
        let dimmed = StatusBucket::Success.style(true).dimmed();
        assert_ne!(desaturated, dimmed);
        assert_eq!(desaturated, Style::tone(Tone::Gray).dimmed());
    }

    #[test]
    fn test_non_success_status_is_only_dimmed_when_not_prominent() {
        assert_eq!(
            StatusBucket::ClientIssue.style(false),
            Style::tone(Tone::Yellow).dimmed()
        );
        assert_eq!(
            StatusBucket::ServerIssue.style(false),
            Style::tone(Tone::Red).dimmed()
        );
    }

    #[test]
    fn test_indentation_lengths() {
        assert_eq!(indentation("GET", "/").len(), 37);
        assert_eq!(indentation("GET", &"a".repeat(37)).len(), 0);
        assert_eq!(indentation("GET", &"a".repeat(36)).len(), 1);
        assert_eq!(indentation("POST", &"x".repeat(80)).len(), 0);
    }

    #[test]
    fn test_indentation_counts_characters_not_bytes() {
        assert_eq!(indentation("GET", "/café"), " ".repeat(32));
    }

    #[test]
    fn test_prominence() {
        let asset = make_test_report("GET", "/styles.css", 200);
        assert!(!is_prominent(&asset));

        let post = make_test_report("POST", "/styles.css", 200);
        assert!(is_prominent(&post));

        for target in [
            Target { action: Some("a".into()), ..Target::default() },
            Target { controller: Some("c".into()), ..Target::default() },
            Target { view: Some("v".into()), ..Target::default() },
            Target { model: Some("m".into()), ..Target::default() },
        ] {
            let mut routed = make_test_report("GET", "/", 200);
            routed.target = target;
            assert!(is_prominent(&routed));
        }
    }

    #[test]
    fn test_primary_line_layout() {
        let mut report = make_test_report("GET", "/", 200);
        report.response_time = 3;
        let lines = render(&report);

        assert_eq!(lines.len(), 1);
        assert_eq!(
            lines[0].to_plain(),
            format!("<- GET / {} (3ms 200)", " ".repeat(37))
        );
    }

    #[test]
    fn test_long_path_gets_no_padding() {
        let path = format!("/{}", "p".repeat(60));
        let report = make_test_report("DELETE", &path, 204);
        let line = render(&report)[0].to_plain();
        assert_eq!(line, format!("<- DELETE {path}  (5ms 204)"));
    }

    #[test]
    fn test_unmatched_request_uses_url() {
        let mut report = make_test_report("GET", "/", 404);
        report.location = Location::Unmatched {
            url: "/missing?page=2".to_string(),
        };
        let line = &render(&report)[0];
        assert!(line.find("/missing?page=2").is_some());
        let padding = " ".repeat(MARGIN - "GET".len() - "/missing?page=2".len());
        assert!(line.to_plain().contains(&format!("/missing?page=2 {padding} (")));
    }

    #[test]
    fn test_dimmed_line_styles() {
        let report = make_test_report("GET", "/styles.css", 200);
        let line = &render(&report)[0];

        assert!(line.find("<-").unwrap().style.dimmed);
        assert!(line.find("GET").unwrap().style.dimmed);
        assert!(line.find("/styles.css").unwrap().style.dimmed);
        assert!(line.find("5ms").unwrap().style.dimmed);
        assert_eq!(
            line.find("200").unwrap().style,
            Style::tone(Tone::Gray).dimmed()
        );
    }

    #[test]
    fn test_prominent_line_styles() {
        let report = make_test_report("PUT", "/user/1", 500);
        let line = &render(&report)[0];

        assert_eq!(line.find("<-").unwrap().style, Style::tone(Tone::Gray).bold());
        assert_eq!(line.find("PUT").unwrap().style, Style::tone(Tone::Cyan));
        assert!(!line.find("/user/1").unwrap().style.dimmed);
        assert_eq!(line.find("500").unwrap().style, Style::tone(Tone::Red));
    }

    #[test]
    fn test_humanize_camel_case() {
        assert_eq!(humanize_exit_name("somethingWentWrong"), "something went wrong");
        assert_eq!(humanize_exit_name("success"), "success");
        assert_eq!(humanize_exit_name("NotFound"), "Not found");
    }

    #[test]
    fn test_humanize_separators_and_acronyms() {
        assert_eq!(humanize_exit_name("bad_request"), "bad request");
        assert_eq!(humanize_exit_name("user-not-found"), "user not found");
        assert_eq!(humanize_exit_name("HTTPServerError"), "HTTP server error");
        assert_eq!(humanize_exit_name("error404Page"), "error 404 page");
    }

    #[test]
    fn test_humanize_empty() {
        assert_eq!(humanize_exit_name(""), "");
        assert_eq!(humanize_exit_name("--"), "");
    }

    #[test]
    fn test_no_exit_block_without_exit_header() {
        let mut report = make_test_report("POST", "/login", 200);
        report.exit.description = Some("ignored without x-exit".to_string());
        assert_eq!(render(&report).len(), 1);
    }

    #[test]
    fn test_minimal_exit_block() {
        let mut report = make_test_report("POST", "/login", 401);
        report.exit.exit = Some("badCombo".to_string());
        let lines = render(&report);

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1].to_plain(), " |  bad combo");
        assert!(lines[1].find("bad combo").unwrap().style.bold);
        assert_eq!(lines[1].find(" |  ").unwrap().style, Style::tone(Tone::Gray));
        assert_eq!(lines[2].to_plain(), " ° ");
    }

    #[test]
    fn test_friendly_name_header_wins() {
        let mut report = make_test_report("POST", "/login", 401);
        report.exit.exit = Some("badCombo".to_string());
        report.exit.friendly_name = Some("Wrong password".to_string());
        assert_eq!(render(&report)[1].to_plain(), " |  Wrong password");
    }

    #[test]
    fn test_full_exit_block_order() {
        let mut report = make_test_report("GET", "/", 200);
        report.target.view = Some("homepage".to_string());
        report.exit = ExitHeaders {
            exit: Some("success".to_string()),
            friendly_name: None,
            description: Some("Rendered the homepage.".to_string()),
            extended_description: Some("Longer words here.".to_string()),
            more_info_url: Some("https://example.com/docs".to_string()),
            view_template_path: Some("views/pages/homepage".to_string()),
        };

        let plain: Vec<String> = render(&report).iter().map(Line::to_plain).collect();
        assert_eq!(
            &plain[1..],
            &[
                " |  success",
                " |  Rendered the homepage.",
                " |  ",
                " |  Longer words here.",
                " |  ",
                " |  https://example.com/docs",
                " |  view: views/pages/homepage",
                " ° ",
            ]
        );

        let view_line = &render(&report)[7];
        assert!(view_line.find("view: ").unwrap().style.bold);
        assert_eq!(
            view_line.find("views/pages/homepage").unwrap().style,
            Style::tone(Tone::Blue).dimmed()
        );
    }

    #[test]
    fn test_render_is_deterministic() {
        let mut report = make_test_report("PATCH", "/thing", 302);
        report.exit.exit = Some("redirect".to_string());
        assert_eq!(render(&report), render(&report));
    }
}

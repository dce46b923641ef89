//! HTTP verb colors

use super::span::Tone;

/// Color for an HTTP verb. Unknown verbs get a neutral white.
#[must_use]
pub fn color_for(method: &str) -> Tone {
    match method {
        "GET" => Tone::Blue,
        "POST" => Tone::Green,
        "PUT" | "PATCH" => Tone::Cyan,
        "DELETE" => Tone::Red,
        _ => Tone::White,
    }
}

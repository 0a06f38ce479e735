//! Rewrites non-standard JSON number tokens.
//!
//! The census exports are written by pandas, which emits bare `NaN` and
//! `Infinity` for missing floats. Those tokens are not JSON, so they are
//! replaced with `null` wherever they appear in value position.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

/// A whole string literal, or a non-finite token in value position.
static NON_FINITE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""(?:[^"\\]|\\.)*"|(?P<lead>[:\[,]\s*)-?(?:NaN|Infinity)\b"#)
        .expect("Invalid non-finite token regex")
});

/// Replace `NaN`, `Infinity`, and `-Infinity` value tokens with `null`.
///
/// Only tokens directly after `:`, `[`, or `,` are rewritten. String
/// literals are matched whole and kept as they are, so `"a, NaN b"` survives.
pub fn sanitize_json(text: &str) -> Cow<'_, str> {
    if !text.contains("NaN") && !text.contains("Infinity") {
        return Cow::Borrowed(text);
    }
    NON_FINITE_TOKEN.replace_all(text, |caps: &Captures<'_>| match caps.name("lead") {
        Some(lead) => format!("{}null", lead.as_str()),
        None => caps[0].to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_value_tokens() {
        let raw = r#"{"Weather": NaN, "X": -Infinity, "c": [Infinity, 1]}"#;
        assert_eq!(
            sanitize_json(raw),
            r#"{"Weather": null, "X": null, "c": [null, 1]}"#
        );
    }

    #[test]
    fn leaves_clean_input_borrowed() {
        let raw = r#"{"note": "no gaps", "Weather": 55.0}"#;
        assert!(matches!(sanitize_json(raw), Cow::Borrowed(_)));
    }

    #[test]
    fn string_values_keep_their_tokens() {
        let raw = r#"{"note": "NaN is not a number", "b": "a, NaN b", "c": ["x", "[Infinity"], "Weather": NaN}"#;
        assert_eq!(
            sanitize_json(raw),
            r#"{"note": "NaN is not a number", "b": "a, NaN b", "c": ["x", "[Infinity"], "Weather": null}"#
        );
    }

    #[test]
    fn escaped_quotes_do_not_end_a_string() {
        let raw = r#"{"q": "say \", NaN", "v": -Infinity}"#;
        assert_eq!(sanitize_json(raw), r#"{"q": "say \", NaN", "v": null}"#);
    }
}

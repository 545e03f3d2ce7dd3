//! Line tokenizer for the description wire format.

use std::borrow::Cow;
use std::fmt;

/// Section markers recognised at the start of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Marker {
    PropertyDetails,
    ArrivalInstructions,
    MealPlans,
    License,
}

impl Marker {
    pub const ALL: [Marker; 4] = [
        Marker::PropertyDetails,
        Marker::ArrivalInstructions,
        Marker::MealPlans,
        Marker::License,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Marker::PropertyDetails => "**Property Details:**",
            Marker::ArrivalInstructions => "**Arrival Instructions:**",
            Marker::MealPlans => "**Meal Plans:**",
            Marker::License => "**License:**",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Marker::PropertyDetails => "Property Details",
            Marker::ArrivalInstructions => "Arrival Instructions",
            Marker::MealPlans => "Meal Plans",
            Marker::License => "License",
        }
    }

    /// Single-line sections carry their payload on the marker line itself.
    pub fn is_inline(self) -> bool {
        matches!(self, Marker::MealPlans | Marker::License)
    }

    fn starts(text: &str) -> Option<Marker> {
        Marker::ALL
            .into_iter()
            .find(|marker| text.starts_with(marker.label()))
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Token<'a> {
    Marker {
        marker: Marker,
        inline: &'a str,
        raw: &'a str,
        line: usize,
    },
    Text {
        text: &'a str,
        line: usize,
    },
}

/// Classifies every line of `input`. Line numbers are 1-based.
pub(crate) fn tokenize(input: &str) -> Vec<Token<'_>> {
    input
        .lines()
        .enumerate()
        .map(|(index, raw)| classify(raw, index + 1))
        .collect()
}

fn classify(raw: &str, line: usize) -> Token<'_> {
    let body = raw.trim_start();
    match Marker::starts(body) {
        Some(marker) => Token::Marker {
            marker,
            inline: body[marker.label().len()..].trim(),
            raw,
            line,
        },
        None => Token::Text { text: raw, line },
    }
}

fn split_indent(line: &str) -> (&str, &str) {
    let body = line.trim_start();
    (&line[..line.len() - body.len()], body)
}

/// Prefixes a backslash to lines that would otherwise read as a marker.
/// Lines already escaped gain one more, so [`unescape_line`] stays exact.
pub(crate) fn escape_line(line: &str) -> Cow<'_, str> {
    let (indent, body) = split_indent(line);
    if Marker::starts(body.trim_start_matches('\\')).is_some() {
        Cow::Owned(format!("{indent}\\{body}"))
    } else {
        Cow::Borrowed(line)
    }
}

pub(crate) fn unescape_line(line: &str) -> Cow<'_, str> {
    let (indent, body) = split_indent(line);
    match body.strip_prefix('\\') {
        Some(rest) if Marker::starts(rest.trim_start_matches('\\')).is_some() => {
            Cow::Owned(format!("{indent}{rest}"))
        }
        _ => Cow::Borrowed(line),
    }
}

pub(crate) fn escape_text(text: &str) -> String {
    text.lines()
        .map(escape_line)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markers_are_found_after_indentation() {
        let tokens = tokenize("Lovely villa\n  **License:** GOA-123\n**Meal Plans:**");
        assert_eq!(
            tokens[0],
            Token::Text {
                text: "Lovely villa",
                line: 1
            }
        );
        assert!(matches!(
            tokens[1],
            Token::Marker {
                marker: Marker::License,
                inline: "GOA-123",
                line: 2,
                ..
            }
        ));
        assert!(matches!(
            tokens[2],
            Token::Marker {
                marker: Marker::MealPlans,
                inline: "",
                ..
            }
        ));
    }

    #[test]
    fn bold_text_that_is_not_a_marker_stays_text() {
        let tokens = tokenize("**Pool:** heated\n**License** missing colon");
        assert!(tokens.iter().all(|token| matches!(token, Token::Text { .. })));
    }

    #[test]
    fn escaping_is_reversible() {
        for line in [
            "**License:** fake",
            "  **Meal Plans:** none",
            "\\**License:** already escaped",
            "plain line",
            "\\not a marker",
        ] {
            let escaped = escape_line(line);
            assert_eq!(unescape_line(&escaped), line);
            assert!(matches!(classify(&escaped, 1), Token::Text { .. }));
        }
    }
}

//! core/guess.rs
//!
//! Filename patterns for guessing tags.
//!
//! Syntax:
//! - `[token]` is a placeholder for one semantic field (`[artist]`, `[trackNumber]`, ...).
//!   Tokens are the names listed in `TagField::token`.
//! - `[[` is a literal `[`. Everything else is literal text, matched verbatim.
//! - Each token may appear once, and a pattern needs at least one.
//!
//! Matching:
//! - The whole name must match, or nothing is captured.
//! - Text placeholders take the shortest non-empty capture that lets the rest
//!   of the pattern match (so `[artist] - [title]` splits on the first " - ").
//! - Numeric placeholders capture a run of ASCII digits, longest first, and the
//!   value is normalized through an integer parse ("07" -> "7").
//! - `[compilation]` accepts boolean-ish text and yields "1" or "0".

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use super::error::{Result, TagError};
use super::fields::{TagField, ValueKind};
use super::tags::parse_boolish;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field(TagField),
}

/// A compiled guess pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    source: String,
    segments: Vec<Segment>,
}

impl Pattern {
    pub fn parse(pattern: &str) -> Result<Pattern> {
        let invalid = |msg: String| TagError::InvalidPattern(format!("{pattern:?}: {msg}"));

        let mut segments: Vec<Segment> = Vec::new();
        let mut literal = String::new();
        let mut chars = pattern.chars().peekable();

        while let Some(c) = chars.next() {
            if c != '[' {
                literal.push(c);
                continue;
            }
            if chars.peek() == Some(&'[') {
                chars.next();
                literal.push('[');
                continue;
            }

            let mut token = String::new();
            let mut closed = false;
            for c in chars.by_ref() {
                if c == ']' {
                    closed = true;
                    break;
                }
                token.push(c);
            }
            if !closed {
                return Err(invalid("unterminated placeholder".to_string()));
            }

            let field = TagField::from_token(&token)
                .ok_or_else(|| invalid(format!("unknown placeholder [{token}]")))?;
            if segments.contains(&Segment::Field(field)) {
                return Err(invalid(format!("placeholder [{token}] used twice")));
            }

            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }
            segments.push(Segment::Field(field));
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        if !segments.iter().any(|s| matches!(s, Segment::Field(_))) {
            return Err(invalid("no placeholders".to_string()));
        }

        Ok(Pattern {
            source: pattern.to_string(),
            segments,
        })
    }

    /// Fields this pattern assigns, in pattern order.
    pub fn fields(&self) -> Vec<TagField> {
        self.segments
            .iter()
            .filter_map(|s| match s {
                Segment::Field(f) => Some(*f),
                Segment::Literal(_) => None,
            })
            .collect()
    }

    /// Match `name` end to end. Returns one (field, value) per placeholder.
    pub fn match_name(&self, name: &str) -> Result<Vec<(TagField, String)>> {
        let mut captures: Vec<(TagField, String)> = Vec::new();
        let mut matcher = Matcher {
            segments: &self.segments,
            input: name,
            dead: HashSet::new(),
        };
        if matcher.match_at(0, 0, &mut captures) {
            Ok(captures)
        } else {
            Err(TagError::GuessMismatch(format!(
                "{name:?} does not match {:?}",
                self.source
            )))
        }
    }
}

impl FromStr for Pattern {
    type Err = TagError;

    fn from_str(s: &str) -> Result<Self> {
        Pattern::parse(s)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Backtracking matcher over (segment index, byte offset) states.
///
/// Whether the rest of the pattern matches from a state doesn't depend on how
/// the state was reached, so a state that failed once is never retried. That
/// bounds the work by segments x offsets x candidate ends.
struct Matcher<'a> {
    segments: &'a [Segment],
    input: &'a str,
    dead: HashSet<(usize, usize)>,
}

impl Matcher<'_> {
    /// On failure `out` is left as it was on entry.
    fn match_at(&mut self, seg: usize, pos: usize, out: &mut Vec<(TagField, String)>) -> bool {
        let Some(segment) = self.segments.get(seg) else {
            return pos == self.input.len();
        };
        if self.dead.contains(&(seg, pos)) {
            return false;
        }

        let rest = &self.input[pos..];
        let matched = match segment {
            Segment::Literal(lit) => {
                rest.starts_with(lit.as_str()) && self.match_at(seg + 1, pos + lit.len(), out)
            }
            Segment::Field(field) => {
                let next = self.segments.get(seg + 1);
                let mut found = false;
                for end in candidate_ends(*field, rest, next) {
                    let Some(value) = normalize(*field, &rest[..end]) else {
                        continue;
                    };
                    out.push((*field, value));
                    if self.match_at(seg + 1, pos + end, out) {
                        found = true;
                        break;
                    }
                    out.pop();
                }
                found
            }
        };

        if !matched {
            self.dead.insert((seg, pos));
        }
        matched
    }
}

/// Capture lengths to try, in preference order.
///
/// A text capture followed by a literal can only end where that literal
/// starts; one at the end of the pattern must take everything left.
fn candidate_ends(field: TagField, input: &str, next: Option<&Segment>) -> Vec<usize> {
    match field.kind() {
        ValueKind::Number => {
            let digits = input.bytes().take_while(u8::is_ascii_digit).count();
            (1..=digits).rev().collect()
        }
        ValueKind::Text | ValueKind::Flag => match next {
            None if input.is_empty() => Vec::new(),
            None => vec![input.len()],
            Some(Segment::Literal(lit)) => input
                .char_indices()
                .map(|(i, _)| i)
                .filter(|&i| i > 0 && input[i..].starts_with(lit.as_str()))
                .collect(),
            Some(Segment::Field(_)) => input
                .char_indices()
                .map(|(i, c)| i + c.len_utf8())
                .collect(),
        },
    }
}

fn normalize(field: TagField, captured: &str) -> Option<String> {
    match field.kind() {
        ValueKind::Number => captured.parse::<u32>().ok().map(|n| n.to_string()),
        ValueKind::Flag => parse_boolish(captured).map(|b| (if b { "1" } else { "0" }).to_string()),
        ValueKind::Text => Some(captured.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guess(pattern: &str, name: &str) -> Result<Vec<(TagField, String)>> {
        Pattern::parse(pattern)?.match_name(name)
    }

    #[test]
    fn artist_dash_title() {
        let got = guess("[artist] - [title]", "Air - Playground Love").unwrap();
        assert_eq!(
            got,
            vec![
                (TagField::Artist, "Air".to_string()),
                (TagField::Title, "Playground Love".to_string()),
            ]
        );
    }

    #[test]
    fn missing_separator_is_a_mismatch() {
        let err = guess("[artist] - [title]", "Air Playground Love").unwrap_err();
        assert!(matches!(err, TagError::GuessMismatch(_)));
    }

    #[test]
    fn numeric_placeholder() {
        let got = guess("[trackNumber] [title]", "7 Intro").unwrap();
        assert_eq!(
            got,
            vec![
                (TagField::TrackNumber, "7".to_string()),
                (TagField::Title, "Intro".to_string()),
            ]
        );

        let err = guess("[trackNumber] [title]", "Seven Intro").unwrap_err();
        assert!(matches!(err, TagError::GuessMismatch(_)));
    }

    #[test]
    fn numbers_are_normalized_and_can_touch_text() {
        let got = guess("[trackNumber][title]", "07Intro").unwrap();
        assert_eq!(got[0], (TagField::TrackNumber, "7".to_string()));
        assert_eq!(got[1], (TagField::Title, "Intro".to_string()));
    }

    #[test]
    fn text_capture_backtracks_past_early_separators() {
        let got = guess("[artist] - [album] - [title]", "A - B - C - D").unwrap();
        assert_eq!(got[0].1, "A");
        assert_eq!(got[1].1, "B");
        assert_eq!(got[2].1, "C - D");

        // Shortest artist "A" would leave no numeric track; backtracking finds one.
        let got = guess("[artist] - [trackNumber]", "A - B - 3").unwrap();
        assert_eq!(got[0].1, "A - B");
        assert_eq!(got[1].1, "3");
    }

    #[test]
    fn literal_brackets_and_trailing_text() {
        let got = guess("[[[year]] [album]", "[1998] Moon Safari").unwrap();
        assert_eq!(got[0], (TagField::Year, "1998".to_string()));
        assert_eq!(got[1], (TagField::Album, "Moon Safari".to_string()));
    }

    #[test]
    fn compilation_flag() {
        let got = guess("[compilation]_[title]", "yes_Song").unwrap();
        assert_eq!(got[0], (TagField::Compilation, "1".to_string()));
        assert!(guess("[compilation]_[title]", "maybe_Song").is_err());
    }

    #[test]
    fn unicode_names() {
        let got = guess("[artist] – [title]", "Sigur Rós – Hoppípolla").unwrap();
        assert_eq!(got[0].1, "Sigur Rós");
        assert_eq!(got[1].1, "Hoppípolla");
    }

    #[test]
    fn long_names_fail_fast() {
        let pattern =
            Pattern::parse("[artist] [album] [title] [genre] [composer] [comment] [encoder]x")
                .unwrap();
        let name = "a ".repeat(60);

        let started = std::time::Instant::now();
        let err = pattern.match_name(&name).unwrap_err();
        assert!(matches!(err, TagError::GuessMismatch(_)));
        assert!(started.elapsed() < std::time::Duration::from_secs(2));

        // Same shape, but matching: the last field swallows the tail.
        let got = Pattern::parse("[artist] [album] [title]")
            .unwrap()
            .match_name(name.trim_end())
            .unwrap();
        assert_eq!(got[0].1, "a");
        assert_eq!(got[1].1, "a");
        assert_eq!(got[2].1, "a ".repeat(57) + "a");
    }

    #[test]
    fn invalid_patterns() {
        for p in ["[artist", "[nope] - x", "[title] [title]", "no tokens", ""] {
            let err = Pattern::parse(p).unwrap_err();
            assert!(matches!(err, TagError::InvalidPattern(_)), "{p}");
        }
    }

    #[test]
    fn fields_in_order() {
        let p: Pattern = "[discNumber]-[trackNumber] [title]".parse().unwrap();
        assert_eq!(
            p.fields(),
            vec![TagField::DiscNumber, TagField::TrackNumber, TagField::Title]
        );
        assert_eq!(p.to_string(), "[discNumber]-[trackNumber] [title]");
    }
}

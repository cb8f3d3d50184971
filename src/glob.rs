//! Anchored glob matching for repo-root-relative paths.
//!
//! Patterns are matched segment-by-segment against the whole path: `*` and
//! `?` match within a single segment, `**` matches zero or more whole
//! segments. There is no implicit prefix or suffix matching.

use thiserror::Error;

/// Error raised when a glob pattern cannot be compiled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    /// The pattern ends in the middle of a backslash escape.
    #[error("unterminated escape in pattern `{0}`")]
    UnterminatedEscape(String),
    /// `**` appeared glued to other characters inside one segment.
    #[error("`**` must stand alone as a path segment in pattern `{0}`")]
    EmbeddedDoubleStar(String),
}

/// A compiled glob pattern, anchored to the repo root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    raw: String,
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    /// `**`: zero or more whole path segments.
    AnySegments,
    /// A single path segment matched token-by-token.
    One(Vec<Token>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(char),
    /// `?`: exactly one character.
    AnyChar,
    /// `*`: any run of characters within the segment.
    AnyRun,
}

impl Pattern {
    /// Compiles a pattern string.
    ///
    /// Leading, trailing, and repeated separators are ignored, so
    /// `docs/**` and `/docs/**/` compile identically.
    ///
    /// # Errors
    ///
    /// Returns a [`PatternError`] when the pattern ends mid-escape or a
    /// segment mixes `**` with other characters.
    pub fn parse(raw: &str) -> Result<Self, PatternError> {
        let mut segments = Vec::new();
        for part in raw.split('/').filter(|p| !p.is_empty()) {
            if part == "**" {
                segments.push(Segment::AnySegments);
            } else {
                segments.push(Segment::One(parse_segment(raw, part)?));
            }
        }
        Ok(Self { raw: raw.to_string(), segments })
    }

    /// The original pattern text.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Returns `true` if the full path is consumed by the full pattern.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        let parts: Vec<&str> = path.split('/').filter(|p| !p.is_empty()).collect();
        match_segments(&self.segments, &parts)
    }
}

/// Compiles each pattern in order, reporting the first failure.
///
/// # Errors
///
/// Returns the [`PatternError`] of the first pattern that fails to compile.
pub fn compile_all(patterns: &[String]) -> Result<Vec<Pattern>, PatternError> {
    patterns.iter().map(|p| Pattern::parse(p)).collect()
}

/// Returns `true` if any compiled pattern matches the path.
#[must_use]
pub fn matches_any(path: &str, patterns: &[Pattern]) -> bool {
    patterns.iter().any(|p| p.matches(path))
}

fn parse_segment(raw: &str, part: &str) -> Result<Vec<Token>, PatternError> {
    let mut tokens = Vec::new();
    let mut chars = part.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some(escaped) => tokens.push(Token::Literal(escaped)),
                None => return Err(PatternError::UnterminatedEscape(raw.to_string())),
            },
            '*' => {
                if tokens.last() == Some(&Token::AnyRun) {
                    return Err(PatternError::EmbeddedDoubleStar(raw.to_string()));
                }
                tokens.push(Token::AnyRun);
            }
            '?' => tokens.push(Token::AnyChar),
            other => tokens.push(Token::Literal(other)),
        }
    }
    Ok(tokens)
}

/// Recursive segment-level match; `**` tries the empty expansion first,
/// then consumes one path segment and retries (greedy with backtracking).
fn match_segments(pattern: &[Segment], parts: &[&str]) -> bool {
    match pattern.split_first() {
        None => parts.is_empty(),
        Some((Segment::AnySegments, rest)) => {
            if match_segments(rest, parts) {
                return true;
            }
            !parts.is_empty() && match_segments(pattern, &parts[1..])
        }
        Some((Segment::One(tokens), rest)) => {
            let Some((head, tail)) = parts.split_first() else {
                return false;
            };
            segment_matches(tokens, head) && match_segments(rest, tail)
        }
    }
}

fn segment_matches(tokens: &[Token], text: &str) -> bool {
    let chars: Vec<char> = text.chars().collect();
    match_chars(tokens, &chars)
}

fn match_chars(tokens: &[Token], chars: &[char]) -> bool {
    match tokens.split_first() {
        None => chars.is_empty(),
        Some((Token::Literal(c), rest)) => {
            chars.first() == Some(c) && match_chars(rest, &chars[1..])
        }
        Some((Token::AnyChar, rest)) => !chars.is_empty() && match_chars(rest, &chars[1..]),
        Some((Token::AnyRun, rest)) => {
            if match_chars(rest, chars) {
                return true;
            }
            !chars.is_empty() && match_chars(tokens, &chars[1..])
        }
    }
}

//! Path segment classification and canonical pattern form.
//!
//! # Responsibilities
//! - Classify pattern segments as static, variable (`:name`) or catch-all (`*name`)
//! - Split runtime paths into non-empty segments
//! - Produce the canonical form used as the store key
//! - Validate patterns at registration time
//!
//! # Design Decisions
//! - Canonical patterns carry no leading or trailing `/`; the root page is `""`
//! - Exact-match probing joins request segments with `/`, so keys line up
//! - The store never rejects a pattern; [`RoutePattern::parse`] does

use std::fmt;
use thiserror::Error;

/// Prefix marking a single-segment variable.
pub const VARIABLE_SIGIL: char = ':';

/// Prefix marking a trailing catch-all.
pub const CATCH_ALL_SIGIL: char = '*';

/// One `/`-separated piece of a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Literal text that must match exactly.
    Static(&'a str),
    /// Matches one request segment and binds it by name.
    Variable(&'a str),
    /// Matches the remaining request segments and binds them by name.
    CatchAll(&'a str),
}

impl<'a> Segment<'a> {
    /// Classify a raw pattern segment by its sigil.
    pub fn classify(raw: &'a str) -> Self {
        if let Some(name) = raw.strip_prefix(CATCH_ALL_SIGIL) {
            Segment::CatchAll(name)
        } else if let Some(name) = raw.strip_prefix(VARIABLE_SIGIL) {
            Segment::Variable(name)
        } else {
            Segment::Static(raw)
        }
    }

    pub fn is_catch_all(&self) -> bool {
        matches!(self, Segment::CatchAll(_))
    }

    pub fn is_dynamic(&self) -> bool {
        !matches!(self, Segment::Static(_))
    }
}

/// Iterate the non-empty `/`-separated pieces of a path or pattern.
pub fn split_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Split a decoded runtime path into the segment list the matcher expects.
pub fn segments_of(path: &str) -> Vec<String> {
    split_segments(path).map(str::to_owned).collect()
}

/// Canonical store form of a pattern: `"/posts//:id/"` becomes `"posts/:id"`.
pub fn canonical_pattern(pattern: &str) -> String {
    split_segments(pattern).collect::<Vec<_>>().join("/")
}

/// Errors raised when a pattern is registered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    /// A `:` or `*` segment without a name.
    #[error("segment {position} of '{pattern}' has an empty parameter name")]
    EmptyParamName { pattern: String, position: usize },

    /// A catch-all followed by more segments.
    #[error("catch-all '{segment}' must be the last segment of '{pattern}'")]
    CatchAllNotLast { pattern: String, segment: String },

    /// The same parameter name bound twice.
    #[error("parameter '{name}' appears more than once in '{pattern}'")]
    DuplicateParam { pattern: String, name: String },
}

/// A validated pattern in canonical form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RoutePattern(String);

impl RoutePattern {
    /// Canonicalize and validate a pattern supplied at registration.
    pub fn parse(raw: &str) -> Result<Self, PatternError> {
        let canonical = canonical_pattern(raw);
        let segments: Vec<&str> = split_segments(&canonical).collect();
        let mut names: Vec<&str> = Vec::new();

        for (position, raw_segment) in segments.iter().enumerate() {
            let segment = Segment::classify(raw_segment);
            let name = match segment {
                Segment::Static(_) => continue,
                Segment::Variable(name) | Segment::CatchAll(name) => name,
            };

            if name.is_empty() {
                return Err(PatternError::EmptyParamName {
                    pattern: raw.to_string(),
                    position,
                });
            }
            if segment.is_catch_all() && position + 1 != segments.len() {
                return Err(PatternError::CatchAllNotLast {
                    pattern: raw.to_string(),
                    segment: raw_segment.to_string(),
                });
            }
            if names.contains(&name) {
                return Err(PatternError::DuplicateParam {
                    pattern: raw.to_string(),
                    name: name.to_string(),
                });
            }
            names.push(name);
        }

        Ok(Self(canonical))
    }

    /// The canonical text, as stored.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn segments(&self) -> impl Iterator<Item = Segment<'_>> {
        split_segments(&self.0).map(Segment::classify)
    }

    /// True when every segment is literal.
    pub fn is_static(&self) -> bool {
        self.segments().all(|s| !s.is_dynamic())
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.0)
    }
}

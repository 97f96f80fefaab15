//! Locator fragment patterns.
//!
//! A fragment is plain text in which `*` stands for any run of characters.
//! There is no escaping: a fragment without `*` is a literal. Patterns
//! compile into one of three shapes:
//!
//! - **Literal**: plain substring search.
//! - **MatchAll**: the empty fragment or one made only of `*`. It equals every
//!   text but has no position inside one (all occurrence queries report no
//!   match), so positional matchers never fire on it.
//! - **Wildcard**: the literal segments between the `*`s, searched left to
//!   right. Leading and trailing `*` only matter for whole-text equality and
//!   suffix checks; occurrence queries always report the shortest span.
//!
//! All offsets are byte offsets into the searched text. Counts returned by
//! the `chars_*` and `surrounding_chars` queries are character counts.

use super::FindSpot;
use crate::error::PatternError;
use std::fmt;

/// Upper bound on `*` per fragment unless configured otherwise.
pub const DEFAULT_MAX_WILDCARDS: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPattern {
    original: String,
    kind: PatternKind,
    /// Shortest possible match in characters.
    min_length: usize,
    /// Shortest possible match in bytes, used as the cheap pre-filter.
    min_bytes: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PatternKind {
    MatchAll,
    Literal(String),
    Wildcard(Wildcard),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Wildcard {
    /// Non-empty literal runs between the `*`s, in order.
    segments: Vec<String>,
    anchored_start: bool,
    anchored_end: bool,
}

impl SearchPattern {
    pub fn compile(raw: &str) -> Result<Self, PatternError> {
        Self::compile_bounded(raw, DEFAULT_MAX_WILDCARDS)
    }

    pub fn compile_bounded(raw: &str, max_wildcards: usize) -> Result<Self, PatternError> {
        let wildcards = raw.matches('*').count();
        if wildcards > max_wildcards {
            return Err(PatternError::TooManyWildcards {
                pattern: raw.to_string(),
                count: wildcards,
                limit: max_wildcards,
            });
        }

        let kind = if wildcards == 0 && !raw.is_empty() {
            PatternKind::Literal(raw.to_string())
        } else {
            let segments: Vec<String> = raw
                .split('*')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
            if segments.is_empty() {
                PatternKind::MatchAll
            } else {
                PatternKind::Wildcard(Wildcard {
                    segments,
                    anchored_start: !raw.starts_with('*'),
                    anchored_end: !raw.ends_with('*'),
                })
            }
        };

        let (min_length, min_bytes) = match &kind {
            PatternKind::MatchAll => (0, 0),
            PatternKind::Literal(lit) => (lit.chars().count(), lit.len()),
            PatternKind::Wildcard(w) => w.segments.iter().fold((0, 0), |(chars, bytes), s| {
                (chars + s.chars().count(), bytes + s.len())
            }),
        };

        Ok(Self {
            original: raw.to_string(),
            kind,
            min_length,
            min_bytes,
        })
    }

    /// Composite pattern for an ordered list of fragments: each fragment must
    /// appear after the previous one, with anything in between.
    pub fn from_fragments<S: AsRef<str>>(
        fragments: &[S],
        max_wildcards: usize,
    ) -> Result<Self, PatternError> {
        let joined = fragments
            .iter()
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join("*");
        Self::compile_bounded(&joined, max_wildcards + fragments.len().saturating_sub(1))
    }

    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn min_length(&self) -> usize {
        self.min_length
    }

    pub fn is_match_all(&self) -> bool {
        matches!(self.kind, PatternKind::MatchAll)
    }

    fn too_short(&self, text: &str) -> bool {
        text.len() < self.min_bytes || text.chars().count() < self.min_length
    }

    /// Leftmost match starting at or after `from`, shortest at that start.
    pub fn first_occurrence(&self, text: &str, from: usize) -> Option<FindSpot> {
        if from > text.len() {
            return None;
        }
        let from = ceil_char_boundary(text, from);
        let rest = &text[from..];
        if self.too_short(rest) {
            return None;
        }

        match &self.kind {
            PatternKind::MatchAll => None,
            PatternKind::Literal(lit) => rest
                .find(lit.as_str())
                .map(|i| FindSpot::new(from + i, from + i + lit.len())),
            PatternKind::Wildcard(w) => {
                // If the rest of the segments cannot follow the first start,
                // they cannot follow any later start either.
                let start = from + rest.find(w.segments[0].as_str())?;
                w.shortest_end(text, start).map(|end| FindSpot::new(start, end))
            }
        }
    }

    /// Rightmost match, shortest at that start.
    pub fn last_occurrence(&self, text: &str) -> Option<FindSpot> {
        if self.too_short(text) {
            return None;
        }

        match &self.kind {
            PatternKind::MatchAll => None,
            PatternKind::Literal(lit) => text
                .rfind(lit.as_str())
                .map(|i| FindSpot::new(i, i + lit.len())),
            PatternKind::Wildcard(w) => occurrences(text, &w.segments[0])
                .into_iter()
                .rev()
                .find_map(|start| w.shortest_end(text, start).map(|end| FindSpot::new(start, end))),
        }
    }

    /// Whole-text equality.
    pub fn matches(&self, text: &str) -> bool {
        match &self.kind {
            PatternKind::MatchAll => true,
            _ if self.too_short(text) => false,
            PatternKind::Literal(lit) => text == lit,
            PatternKind::Wildcard(w) => w.matches_whole(text, w.anchored_start),
        }
    }

    /// Whether some suffix of `text` equals the pattern.
    pub fn matches_at_end(&self, text: &str) -> bool {
        match &self.kind {
            PatternKind::MatchAll => false,
            _ if self.too_short(text) => false,
            PatternKind::Literal(lit) => text.ends_with(lit.as_str()),
            PatternKind::Wildcard(w) => w.matches_whole(text, false),
        }
    }

    /// Characters in front of the last match; `None` for empty text or no match.
    pub fn chars_before_last_occurrence(&self, text: &str) -> Option<usize> {
        if text.is_empty() {
            return None;
        }
        if self.is_match_all() {
            return Some(0);
        }
        self.last_occurrence(text)
            .map(|spot| text[..spot.start].chars().count())
    }

    /// Characters behind the last match; `Some(0)` for empty text, `None` for no match.
    pub fn chars_after_last_occurrence(&self, text: &str) -> Option<usize> {
        if text.is_empty() {
            return Some(0);
        }
        if self.is_match_all() {
            return Some(text.chars().count());
        }
        self.last_occurrence(text)
            .map(|spot| text[spot.end..].chars().count())
    }

    /// Characters of `text` outside its shortest match, minimised over all
    /// matches; `None` if there is no match.
    pub fn surrounding_chars(&self, text: &str) -> Option<usize> {
        match &self.kind {
            PatternKind::MatchAll => Some(0),
            _ if self.too_short(text) => None,
            PatternKind::Literal(lit) => text
                .contains(lit.as_str())
                .then(|| text.chars().count() - self.min_length),
            PatternKind::Wildcard(w) => {
                let shortest = occurrences(text, &w.segments[0])
                    .into_iter()
                    .filter_map(|start| {
                        w.shortest_end(text, start)
                            .map(|end| text[start..end].chars().count())
                    })
                    .min()?;
                Some(text.chars().count() - shortest)
            }
        }
    }
}

impl Wildcard {
    /// End of the shortest match whose first segment starts at `start`.
    fn shortest_end(&self, text: &str, start: usize) -> Option<usize> {
        let mut pos = start + self.segments[0].len();
        for segment in &self.segments[1..] {
            pos += text[pos..].find(segment.as_str())? + segment.len();
        }
        Some(pos)
    }

    fn matches_whole(&self, text: &str, anchored_start: bool) -> bool {
        let mut lo = 0;
        let mut hi = text.len();
        let mut first = 0;
        let mut last = self.segments.len();

        if anchored_start {
            let head = &self.segments[0];
            if !text.starts_with(head.as_str()) {
                return false;
            }
            lo = head.len();
            first = 1;
        }
        if self.anchored_end {
            if last > first {
                let tail = &self.segments[last - 1];
                if hi - lo < tail.len() || !text[lo..].ends_with(tail.as_str()) {
                    return false;
                }
                hi -= tail.len();
                last -= 1;
            } else if lo != hi {
                return false;
            }
        }

        for segment in &self.segments[first..last] {
            match text[lo..hi].find(segment.as_str()) {
                Some(i) => lo += i + segment.len(),
                None => return false,
            }
        }
        true
    }
}

/// Start offsets of all (possibly overlapping) occurrences of `needle`.
fn occurrences(text: &str, needle: &str) -> Vec<usize> {
    let mut found = Vec::new();
    let mut from = 0;
    while from <= text.len() {
        let Some(i) = text[from..].find(needle) else {
            break;
        };
        let start = from + i;
        found.push(start);
        from = start + text[start..].chars().next().map_or(1, char::len_utf8);
    }
    found
}

fn ceil_char_boundary(text: &str, mut pos: usize) -> usize {
    while pos < text.len() && !text.is_char_boundary(pos) {
        pos += 1;
    }
    pos
}

impl fmt::Display for SearchPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shape = match self.kind {
            PatternKind::MatchAll => "matchAll",
            PatternKind::Literal(_) => "literal",
            PatternKind::Wildcard(_) => "wildcard",
        };
        write!(f, "SearchPattern '{}' [{}]", self.original, shape)
    }
}

use serde::Serialize;

/// Half-open byte range `[start, end)` into a searched text.
///
/// Absence of a match is expressed as `Option<FindSpot>::None`, never as an
/// empty range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FindSpot {
    pub start: usize,
    pub end: usize,
}

impl FindSpot {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether `other` lies completely inside this range.
    pub fn encloses(&self, other: &FindSpot) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

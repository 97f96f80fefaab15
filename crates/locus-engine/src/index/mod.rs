//! Flattened, position-indexed view of the displayed document.

mod normalized;
mod text_index;

pub use normalized::NormalizedText;
pub use text_index::TextIndex;

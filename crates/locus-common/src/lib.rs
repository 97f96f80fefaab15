pub mod document;
pub mod snapshot;

pub use document::{Document, DocumentError, Node, NodeData, NodeId};
pub use snapshot::{ElementSnapshot, SnapshotNode};

//! Node arena: slotmap-backed tree with attribute queries and per-node buses.

pub mod node;
pub mod query;
pub mod tree;

pub use node::{NodeData, NodeId, TEMPLATE_TAG, TEXT_TAG};
pub use query::Selector;
pub use tree::Dom;

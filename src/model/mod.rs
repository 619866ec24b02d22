//! Data model for phylogenetic trees.
//!
//! # Tree representation
//! Two tree types are provided, both using the arena pattern so that no
//! direct node references are stored, only [NodeIndex] values:
//!
//! | Type | Node type | Produced by | Use case |
//! |------|-----------|-------------|----------|
//! | [RawTree] | [RawNode] | Newick parser, structural editor | Topology, labels and branch lengths only |
//! | [PhyloTree] | [Node] | [indexer](crate::indexer) | Traversal indices, aggregates, layout |
//!
//! Trees of arbitrary arity are supported, internal nodes may carry labels.
//!
//! # Lifecycle
//! 1. Text is parsed into a [RawTree] (or converted from nested [NodeData])
//! 2. The indexer turns it into a [PhyloTree]
//! 3. Collapse state, rotation and layout mutate the [PhyloTree] in place;
//!    rerooting and reordering produce a new [RawTree] that is re-indexed

pub mod node;
pub mod raw_tree;
pub mod tree;

pub use node::Node;
pub use raw_tree::{NodeData, RawNode, RawTree};
pub use tree::{NodeIndex, PhyloTree};

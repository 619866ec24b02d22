//! Phylograph turns Newick descriptions of phylogenetic trees into indexed,
//! positioned tree graphs ready for a rendering layer.
//!
//! Core functionality provided:
//! - Newick: Parse single or semicolon-separated Newick strings into a
//!   [RawTree](crate::model::RawTree), and write trees back to Newick.
//!   See [crate::newick].
//! - Indexer: Turn a raw tree into a [PhyloTree] with pre- and post-order
//!   indices and subtree aggregates, allowing O(1) subtree range queries.
//!   See [crate::indexer].
//! - Layout: Position the visible nodes in one of five projections
//!   (rectangular, hierarchical, diagonal, radial, circular) and scale them
//!   to a drawing area. See [crate::layout].
//! - Editing: Reroot, midpoint-root, rotate, collapse/expand and sort
//!   subtrees while keeping all traversal invariants. See [crate::edit].
//! - Session: A memoised pipeline from source and configuration to a styled,
//!   positioned graph that only recomputes stale stages.
//!   See [crate::session].
//! - All trees use the arena pattern, so no direct node references are
//!   stored, only node indices. See [crate::model].
//!
//! The library logs through [tracing] but never installs a subscriber.
//!
//! # Usage patterns
//! 1. Use the building blocks directly: parse, index, lay out.
//! 2. Use a [TreeSession](crate::session::TreeSession) and let it decide
//!    what needs recomputing after a configuration change.
//!
//! ## Example Building Blocks
//! ```
//! use phylograph::layout::{Projection, layout};
//!
//! let mut tree = phylograph::parse_newick_str("((A:0.1,B:0.2):0.3,C:0.4);").unwrap();
//! assert_eq!(tree.num_leaves(), 3);
//!
//! let bounds = layout(&mut tree, Projection::Rectangular, false);
//! assert!(bounds.width() > 0.0);
//! ```
//!
//! ## Example Session
//! ```
//! use phylograph::layout::Projection;
//! use phylograph::session::{TreeProps, TreeSession};
//!
//! let props = TreeProps::default()
//!     .with_projection(Projection::Radial)
//!     .with_drawing_area(400.0, 400.0);
//! let mut session = TreeSession::new("((A:1,B:1):1,C:2);", props);
//!
//! let graph = session.graph_with_styles()?;
//! assert_eq!(graph.leaves().len(), 3);
//!
//! let newick = session.reroot("C")?;
//! assert_eq!(newick, "((A:1,B:1):2,C:1);");
//! # Ok::<(), phylograph::error::PhyloError>(())
//! ```

pub mod edit;
pub mod error;
pub mod indexer;
pub mod layout;
pub mod memo;
pub mod model;
pub mod newick;
pub mod parser;
pub mod session;

pub use crate::error::{EditError, PhyloError};
pub use crate::model::{NodeIndex, PhyloTree};
pub use crate::parser::ParsingError;

// ============================================================================
// Quick API
// ============================================================================
/// Parses and indexes a single Newick string using default settings,
/// returning a [PhyloTree].
///
/// See [`newick::parse_str`] and [`indexer::index`] for full documentation.
pub fn parse_newick_str<S: AsRef<str>>(newick: S) -> Result<PhyloTree, ParsingError> {
    let raw = newick::parse_str(newick)?;
    Ok(indexer::index(raw))
}

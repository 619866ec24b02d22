//! Error types beyond parsing.
//!
//! [EditError] covers structural edits, [PhyloError] is the umbrella type
//! returned by the [session](crate::session) pipeline.

use crate::parser::ParsingError;

// =#========================================================================#=
// EDIT ERROR
// =#========================================================================$=
/// Errors from structural edits and invariant checks.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EditError {
    /// An edit referenced an id that is not in the tree.
    /// Recoverable; nothing was changed.
    #[error("node not found: {0}")]
    NodeNotFound(String),
    /// A traversal or count invariant does not hold.
    /// This is a defect; the offending edit was rejected.
    #[error("invariant violation: {0}")]
    InvariantViolation(String),
}

// =#========================================================================#=
// PHYLO ERROR
// =#========================================================================$=
/// Any error surfaced by the computation pipeline.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PhyloError {
    /// The Newick source could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParsingError),
    /// A structural edit failed.
    #[error(transparent)]
    Edit(#[from] EditError),
    /// A source envelope could not be decoded.
    #[error("invalid source: {0}")]
    InvalidSource(String),
    /// A configuration snapshot could not be decoded.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

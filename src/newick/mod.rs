//! Newick format parser and writer for phylogenetic trees.
//!
//! # Quick API
//! * [`parse_str`] - parses a single tree string into a [RawTree]
//! * [`parse_all_str`] - parses a semicolon-separated list of trees
//! * [`to_newick`] / [`raw_to_newick`] - serialise back to Newick
//!
//! # Full API
//! For more control, configure a [NewickParser] and provide data via a
//! [ByteParser].
//!
//! # Format
//! The Newick format has the following grammar:
//! * `tree ::= subtree ';'`
//! * `subtree ::= leaf | '(' subtree (',' subtree)* ')' [label] [branch_length]`
//! * `leaf ::= [label] [branch_length]`
//! * `branch_length ::= ':' number`
//!
//! Furthermore:
//! * Any number of children per node; nodes may be unnamed
//! * Whitespace can occur between elements,
//!   just not within an unquoted label or a branch_length
//! * Comments are square brackets and can occur anywhere whitespace can
//! * Labels in single quotes may contain any character; `''` is a literal
//!   quote. Unquoted labels are taken verbatim (underscores stay underscores)
//! * Branch lengths accept scientific notation, e.g. `:1.5e-3`

mod defs;
pub mod parser;
pub mod writer;

pub use parser::NewickParser;
pub use writer::{NewickOptions, raw_to_newick, to_newick};

use crate::model::RawTree;
use crate::parser::ParsingError;
use crate::parser::byte_parser::ByteParser;
use tracing::debug;

// ============================================================================
// QUICK PARSING API (pub)
// ============================================================================
/// Parses a single Newick string into a [RawTree].
///
/// # Arguments
/// * `newick` - The Newick format string to parse
///
/// # Returns
/// * [RawTree] - Tree parsed from the string
/// * [ParsingError] - If the string is blank or not valid Newick format
///
/// # Example
/// ```
/// use phylograph::newick::parse_str;
///
/// let tree = parse_str("(Fratercula_cirrhata,(Fratercula_arctica,Fratercula_corniculata));")?;
/// assert_eq!(tree.num_leaves(), 3);
///
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn parse_str<S: AsRef<str>>(newick: S) -> Result<RawTree, ParsingError> {
    let mut byte_parser = ByteParser::for_str(newick.as_ref());
    let tree = NewickParser::new().parse_str(&mut byte_parser)?;
    debug!(nodes = tree.num_nodes(), "parsed Newick tree");
    Ok(tree)
}

/// Parses a semicolon-separated list of Newick strings.
///
/// # Returns
/// * `Vec<RawTree>` - All trees, empty for blank input
/// * [ParsingError] - If any tree is not valid Newick format
pub fn parse_all_str<S: AsRef<str>>(newick: S) -> Result<Vec<RawTree>, ParsingError> {
    let trees = NewickParser::new().parse_all(ByteParser::for_str(newick.as_ref()))?;
    debug!(trees = trees.len(), "parsed Newick trees");
    Ok(trees)
}

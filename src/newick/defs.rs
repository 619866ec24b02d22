//! Constants for the Newick parser and writer.

/// Newick label delimiters: parentheses, comma, colon, semicolon, brackets, whitespace
pub(crate) const NEWICK_LABEL_DELIMITERS: &[u8] = b"(),:;[] \t\n\r";

/// Default guess for number of nodes, when unknown
pub(crate) const DEFAULT_NUM_NODES_GUESS: usize = 16;

/// Estimated number of bytes per node in a Newick string
pub(crate) const BYTES_PER_NODE_GUESS: usize = 12;

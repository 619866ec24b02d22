//! Structs and logic to parse Newick strings.
//!
//! This module provides the [NewickParser] struct, which parses single or
//! semicolon-separated Newick trees of arbitrary arity into [RawTree]s.

use crate::model::{NodeIndex, RawTree};
use crate::newick::defs::{DEFAULT_NUM_NODES_GUESS, NEWICK_LABEL_DELIMITERS};
use crate::parser::byte_parser::ByteParser;
use crate::parser::byte_source::ByteSource;
use crate::parser::parsing_error::ParsingError;

// =#========================================================================#=
// NEWICK PARSER
// =#========================================================================$=
/// Parser (configuration) for Newick format phylogenetic trees.
///
/// The parser performs a single left-to-right scan with an explicit stack of
/// open ancestors, so nesting depth is not bounded by the call stack.
///
/// # Configuration
/// * [`with_num_nodes(num_nodes)`](Self::with_num_nodes)
///     - Capacity hint for the node arena, otherwise inferred from the
///       previously parsed tree.
///
/// # Parsing
/// * [`parse_tree`](Self::parse_tree): Parse one tree up to its `;`
/// * [`parse_str`](Self::parse_str): Parse exactly one tree (nothing may follow)
/// * [`parse_all`](Self::parse_all): Parse all trees until EOF
///
/// # Example
/// ```
/// use phylograph::newick::NewickParser;
/// use phylograph::parser::ByteParser;
///
/// let mut byte_parser = ByteParser::for_str("((Kea:1,Kaka:1)Nestor:2,Kakapo:3);");
/// let tree = NewickParser::new().parse_str(&mut byte_parser).unwrap();
/// assert_eq!(tree.num_nodes(), 5);
/// assert_eq!(tree.num_leaves(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct NewickParser {
    num_nodes: usize,
}

impl Default for NewickParser {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Construction & Configuration (pub)
// ============================================================================
impl NewickParser {
    /// Creates a new [NewickParser] with default settings.
    pub fn new() -> Self {
        Self {
            num_nodes: DEFAULT_NUM_NODES_GUESS,
        }
    }

    /// Sets the expected number of nodes per tree, used to pre-allocate
    /// the node arena.
    pub fn with_num_nodes(mut self, num_nodes: usize) -> Self {
        self.num_nodes = num_nodes;
        self
    }
}

// ============================================================================
// API Parsing (pub)
// ============================================================================
impl NewickParser {
    /// Parses exactly one Newick tree. Only whitespace and `[...]` comments
    /// may follow the terminating `;`.
    ///
    /// # Arguments
    /// * `parser` - The byte parser positioned at the start of a Newick string
    ///
    /// # Returns
    /// * `Ok(RawTree)` - The parsed tree
    /// * `Err(ParsingError)` - If the input is blank or not valid Newick;
    ///   no partial tree is returned
    pub fn parse_str<B: ByteSource>(
        &mut self,
        parser: &mut ByteParser<B>,
    ) -> Result<RawTree, ParsingError> {
        let tree = self.parse_tree(parser)?;

        parser.skip_comment_and_whitespace()?;
        if !parser.is_eof() {
            return Err(ParsingError::syntax(parser, "Trailing content after ';'"));
        }

        Ok(tree)
    }

    /// Parses all Newick trees from the byte source until EOF.
    ///
    /// # Arguments
    /// * `byte_parser` - A byte parser with underlying source containing only
    ///   Newick strings, except for whitespace and `[...]` comments.
    ///
    /// # Returns
    /// * `Ok(Vec<RawTree>)` - All parsed trees (empty for blank input)
    /// * `Err(ParsingError)` - If any tree fails to parse
    pub fn parse_all<B: ByteSource>(
        &mut self,
        mut byte_parser: ByteParser<B>,
    ) -> Result<Vec<RawTree>, ParsingError> {
        let mut trees = Vec::new();
        loop {
            byte_parser.skip_comment_and_whitespace()?;
            if byte_parser.is_eof() {
                break;
            }
            trees.push(self.parse_tree(&mut byte_parser)?);
        }
        Ok(trees)
    }

    /// Parses a single Newick tree up to and including its terminating `;`.
    ///
    /// # Arguments
    /// * `parser` - The byte parser positioned at the start of a Newick string
    ///
    /// # Returns
    /// * `Ok(RawTree)` - The parsed tree
    /// * `Err(ParsingError)` - [EmptyInput](crate::parser::ParsingErrorType::EmptyInput)
    ///   if only whitespace and comments remain, otherwise a syntax,
    ///   unclosed comment or unclosed quote error
    pub fn parse_tree<B: ByteSource>(
        &mut self,
        parser: &mut ByteParser<B>,
    ) -> Result<RawTree, ParsingError> {
        parser.skip_comment_and_whitespace()?;
        if parser.is_eof() {
            return Err(ParsingError::empty_input(parser));
        }

        let mut tree = RawTree::with_capacity(self.num_nodes);
        let mut current: NodeIndex = tree.root_index();
        let mut open: Vec<NodeIndex> = Vec::new();

        loop {
            parser.skip_comment_and_whitespace()?;
            match parser.peek() {
                None => {
                    let msg = if open.is_empty() {
                        "Expected ';' at end of tree but found EOF"
                    } else {
                        "Unclosed '(' at end of input"
                    };
                    return Err(ParsingError::syntax(parser, msg));
                }
                Some(b'(') => {
                    let node = &tree[current];
                    if node.label.is_some() || node.branch_length.is_some() || !node.is_leaf() {
                        return Err(ParsingError::syntax(parser, "Unexpected '('"));
                    }
                    parser.next_byte();
                    open.push(current);
                    current = tree.add_child(current, None, None);
                }
                Some(b',') => {
                    let Some(&parent) = open.last() else {
                        return Err(ParsingError::syntax(parser, "',' outside of parentheses"));
                    };
                    parser.next_byte();
                    current = tree.add_child(parent, None, None);
                }
                Some(b')') => {
                    let Some(parent) = open.pop() else {
                        return Err(ParsingError::syntax(parser, "Unbalanced ')'"));
                    };
                    parser.next_byte();
                    current = parent;
                }
                Some(b':') => {
                    parser.next_byte();
                    let branch_length = Self::parse_branch_length(parser)?;
                    if tree[current].branch_length.is_some() {
                        return Err(ParsingError::syntax(parser, "Duplicate branch length"));
                    }
                    tree[current].branch_length = Some(branch_length);
                }
                Some(b';') => {
                    if !open.is_empty() {
                        return Err(ParsingError::syntax(parser, "Unclosed '(' before ';'"));
                    }
                    parser.next_byte();
                    break;
                }
                Some(next) => {
                    let node = &tree[current];
                    if node.label.is_some() || node.branch_length.is_some() {
                        return Err(ParsingError::syntax(parser, "Unexpected label"));
                    }
                    let quoted = next == b'\'';
                    let label = parser.parse_label(NEWICK_LABEL_DELIMITERS)?;
                    if label.is_empty() && !quoted {
                        return Err(ParsingError::syntax(
                            parser,
                            format!("Unexpected character {:?}", char::from(next)),
                        ));
                    }
                    tree[current].label = Some(label);
                }
            }
        }

        // Remember size of this tree as capacity hint for the next
        self.num_nodes = tree.num_nodes();

        Ok(tree)
    }
}

// ============================================================================
// Parsing helpers
// ============================================================================
impl NewickParser {
    /// Parses the number following a `:` (scientific notation accepted).
    fn parse_branch_length<B: ByteSource>(parser: &mut ByteParser<B>) -> Result<f64, ParsingError> {
        parser.skip_comment_and_whitespace()?;
        let token = parser.parse_number_token();
        token
            .parse::<f64>()
            .map_err(|_| ParsingError::syntax(parser, format!("Invalid branch length {token:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ParsingErrorType;

    fn parse(input: &str) -> Result<RawTree, ParsingError> {
        NewickParser::new().parse_str(&mut ByteParser::for_str(input))
    }

    #[test]
    fn test_multifurcation_and_internal_label() {
        let tree = parse("(A,B,(C,D)cd:0.5)root;").unwrap();
        assert_eq!(tree.num_nodes(), 6);
        assert_eq!(tree.root().label.as_deref(), Some("root"));
        assert_eq!(tree.root().children.len(), 3);
        let cd = tree.root().children[2];
        assert_eq!(tree[cd].label.as_deref(), Some("cd"));
        assert_eq!(tree[cd].branch_length, Some(0.5));
    }

    #[test]
    fn test_deep_nesting_does_not_recurse() {
        let depth = 100_000;
        let input = format!("{}A{};", "(".repeat(depth), ")".repeat(depth));
        let tree = parse(&input).unwrap();
        assert_eq!(tree.num_nodes(), depth + 1);
    }

    #[test]
    fn test_position_of_unbalanced_paren() {
        let err = parse("(A,B));").unwrap_err();
        assert!(matches!(err.kind(), ParsingErrorType::Syntax(_)));
        assert_eq!(err.position(), 5);
    }

    #[test]
    fn test_capacity_hint_is_updated() {
        let mut parser = NewickParser::new().with_num_nodes(1);
        parser.parse_str(&mut ByteParser::for_str("(A,B,C);")).unwrap();
        assert_eq!(parser.num_nodes, 4);
    }
}

//! Error types for the Newick parser.
//!
//! This module provides [ParsingError] and [ParsingErrorType] for representing
//! and reporting errors that occur while parsing tree text.

use crate::parser::byte_parser::ByteParser;
use crate::parser::byte_source::ByteSource;

/// Default length of context provided by error from parser
const DEFAULT_CONTEXT_LENGTH: usize = 50;

// =#========================================================================#=
// PARSING ERROR TYPE
// =#========================================================================$=
/// Error types that can occur during Newick parsing.
#[derive(PartialEq, Debug, Clone, thiserror::Error)]
pub enum ParsingErrorType {
    /// Input is blank (only whitespace and comments).
    #[error("Empty input - no tree to parse")]
    EmptyInput,
    /// Malformed Newick, e.g. unbalanced parentheses or a misplaced label.
    #[error("Syntax error - {0}")]
    Syntax(String),
    /// A `[` comment that is never closed.
    #[error("Unclosed comment")]
    UnclosedComment,
    /// A `'` quoted label that is never closed.
    #[error("Unclosed quoted label")]
    UnclosedQuote,
}

// =#========================================================================#=
// PARSING ERROR
// =#========================================================================$=
/// Parsing error with contextual information (position and surrounding bytes).
///
/// No partial tree ever accompanies a parsing error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{kind} at position {position}{}", format_context(.context))]
pub struct ParsingError {
    kind: ParsingErrorType,
    position: usize,
    context: String,
}

fn format_context(context: &str) -> String {
    if context.is_empty() {
        String::new()
    } else {
        format!("\n  Context (next {} bytes): {}", context.len(), context)
    }
}

impl ParsingError {
    /// Create a ParsingError from an error type and parser state
    pub fn from_parser<S: ByteSource>(kind: ParsingErrorType, parser: &ByteParser<S>) -> Self {
        Self {
            kind,
            position: parser.position(),
            context: parser.get_context_as_string(DEFAULT_CONTEXT_LENGTH),
        }
    }

    /// Convenience constructor for EmptyInput
    pub fn empty_input<S: ByteSource>(parser: &ByteParser<S>) -> Self {
        Self::from_parser(ParsingErrorType::EmptyInput, parser)
    }

    /// Convenience constructor for Syntax, cited at the parser's position
    pub fn syntax<S: ByteSource>(parser: &ByteParser<S>, msg: impl Into<String>) -> Self {
        Self::from_parser(ParsingErrorType::Syntax(msg.into()), parser)
    }

    /// Convenience constructor for UnclosedComment
    pub fn unclosed_comment<S: ByteSource>(parser: &ByteParser<S>) -> Self {
        Self::from_parser(ParsingErrorType::UnclosedComment, parser)
    }

    /// Convenience constructor for UnclosedQuote
    pub fn unclosed_quote<S: ByteSource>(parser: &ByteParser<S>) -> Self {
        Self::from_parser(ParsingErrorType::UnclosedQuote, parser)
    }

    /// Get the error kind
    pub fn kind(&self) -> &ParsingErrorType {
        &self.kind
    }

    /// Get the byte position where the error occurred
    pub fn position(&self) -> usize {
        self.position
    }

    /// Returns whether this is a syntax error (as opposed to empty input etc.)
    pub fn is_syntax_error(&self) -> bool {
        !matches!(self.kind, ParsingErrorType::EmptyInput)
    }
}

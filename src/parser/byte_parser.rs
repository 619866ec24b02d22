//! Low-level byte-by-byte parser for tree text.
//!
//! This module provides [ByteParser] for parsing text-based tree formats with
//! support for peeking, consuming, comment skipping and quote-aware label
//! parsing. Used as the foundation of the Newick parser.

use crate::parser::byte_source::{ByteSource, InMemoryByteSource};
use crate::parser::parsing_error::ParsingError;

// =#========================================================================#=
// BYTE PARSER
// =#========================================================================#=
/// A byte-by-byte parser for tree text with support for peeking, consuming,
/// and skipping whitespace and `[...]` comments.
///
/// # Features
/// - Works with any [ByteSource]
/// - Whitespace and comment skipping
/// - Quote-aware label parsing (single quotes, `''` as escaped quote)
/// - Context extraction for error reporting
///
/// # Example
/// ```
/// use phylograph::parser::ByteParser;
///
/// let mut parser = ByteParser::for_str("  [a comment] 'Kea''s nest':0.5");
/// parser.skip_comment_and_whitespace().unwrap();
/// let label = parser.parse_label(b"(),:;[] \t\n\r").unwrap();
/// assert_eq!(label, "Kea's nest");
/// assert!(parser.consume_if(b':'));
/// ```
#[derive(Debug, Clone)]
pub struct ByteParser<S: ByteSource> {
    source: S,
}

impl<'a> ByteParser<InMemoryByteSource<'a>> {
    /// Creates a new [ByteParser] borrowing the bytes of a string.
    ///
    /// # Arguments
    /// * `input` - The string to parse
    pub fn for_str(input: &'a str) -> Self {
        Self::new(InMemoryByteSource::new(input.as_bytes()))
    }
}

impl<S: ByteSource> ByteParser<S> {
    /// Creates a new [ByteParser] from a byte source.
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Peeks at the current byte without consuming it.
    #[inline(always)]
    pub fn peek(&self) -> Option<u8> {
        self.source.peek()
    }

    /// Gets the current byte and advances the position (consumes it).
    #[inline(always)]
    pub fn next_byte(&mut self) -> Option<u8> {
        self.source.next_byte()
    }

    /// Checks if the current byte is exactly `ch`.
    #[inline]
    pub fn peek_is(&self, ch: u8) -> bool {
        self.peek() == Some(ch)
    }

    /// Consumes the current byte if it is exactly `ch`.
    ///
    /// # Returns
    /// `true` if the byte was matched and consumed, `false` otherwise
    pub fn consume_if(&mut self, ch: u8) -> bool {
        if self.peek_is(ch) {
            self.next_byte();
            true
        } else {
            false
        }
    }

    /// Skips (consumes) all consecutive whitespace characters.
    ///
    /// Whitespace includes: space, tab, newline and carriage return.
    pub fn skip_whitespace(&mut self) {
        while let Some(b) = self.peek() {
            if matches!(b, b' ' | b'\t' | b'\n' | b'\r') {
                self.next_byte();
            } else {
                break;
            }
        }
    }

    /// Skips (consumes) a `[...]` comment if present.
    ///
    /// # Returns
    /// * `Ok(true)` - A comment was found and consumed
    /// * `Ok(false)` - No comment at current position
    /// * `Err(ParsingError)` - Comment was opened but never closed
    pub fn skip_comment(&mut self) -> Result<bool, ParsingError> {
        if !self.peek_is(b'[') {
            return Ok(false);
        }

        let start_error = ParsingError::unclosed_comment(self);
        self.next_byte();
        while let Some(b) = self.next_byte() {
            if b == b']' {
                return Ok(true);
            }
        }

        Err(start_error)
    }

    /// Skips (consumes) all consecutive whitespace and `[...]` comments.
    ///
    /// # Errors
    /// Returns an error if an unclosed comment is encountered.
    pub fn skip_comment_and_whitespace(&mut self) -> Result<(), ParsingError> {
        self.skip_whitespace();

        while self.skip_comment()? {
            self.skip_whitespace();
        }

        Ok(())
    }

    /// Returns whether the end of data (EOF) has been reached.
    pub fn is_eof(&self) -> bool {
        self.source.is_eof()
    }

    /// Returns the current parser position (byte offset) in the input.
    pub fn position(&self) -> usize {
        self.source.position()
    }

    /// Returns a string from up to `k` bytes from the current position for error context.
    ///
    /// Invalid UTF-8 sequences are replaced with the Unicode replacement character.
    pub fn get_context_as_string(&self, k: usize) -> String {
        String::from_utf8_lossy(&self.source.get_context(k)).into_owned()
    }

    /// Parses a label (quoted or unquoted) with the given delimiter set.
    ///
    /// Detects whether the label is quoted (single quotes) and dispatches
    /// accordingly. An empty string is returned if the parser is positioned
    /// at a delimiter.
    ///
    /// # Arguments
    /// * `delimiters` - Bytes that end an unquoted label
    ///
    /// # Errors
    /// Returns an error if a quoted label is not closed.
    pub fn parse_label(&mut self, delimiters: &[u8]) -> Result<String, ParsingError> {
        if self.peek_is(b'\'') {
            self.parse_quoted_label()
        } else {
            Ok(self.parse_unquoted_label(delimiters))
        }
    }

    /// Parses a quoted label enclosed in single quotes.
    ///
    /// Assumes the opening quote has not been consumed yet. Single quotes within
    /// the label are escaped by doubling them (e.g. `'Wilson''s'` becomes `Wilson's`).
    /// Every other byte, delimiters included, is taken literally.
    ///
    /// # Errors
    /// Returns [UnclosedQuote](crate::parser::ParsingErrorType::UnclosedQuote)
    /// if EOF is reached before the closing quote.
    pub fn parse_quoted_label(&mut self) -> Result<String, ParsingError> {
        let start_error = ParsingError::unclosed_quote(self);
        self.next_byte(); // consume opening '

        let mut bytes = Vec::new();
        loop {
            match self.next_byte() {
                None => return Err(start_error),
                Some(b'\'') => {
                    if self.peek_is(b'\'') {
                        bytes.push(b'\'');
                        self.next_byte();
                    } else {
                        break;
                    }
                }
                Some(b) => bytes.push(b),
            }
        }

        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Parses an unquoted label until any of the given delimiters (or EOF) is encountered.
    pub fn parse_unquoted_label(&mut self, delimiters: &[u8]) -> String {
        let mut bytes = Vec::new();
        while let Some(b) = self.peek() {
            if delimiters.contains(&b) {
                break;
            }
            bytes.push(b);
            self.next_byte();
        }

        String::from_utf8_lossy(&bytes).into_owned()
    }

    /// Consumes a run of bytes that may form a floating point number
    /// (digits, `.`, `-`, `+`, `e`, `E`) and returns it unparsed.
    pub fn parse_number_token(&mut self) -> String {
        let mut token = String::new();
        while let Some(b) = self.peek() {
            if b.is_ascii_digit() || matches!(b, b'.' | b'-' | b'+' | b'e' | b'E') {
                token.push(b as char);
                self.next_byte();
            } else {
                break;
            }
        }
        token
    }
}

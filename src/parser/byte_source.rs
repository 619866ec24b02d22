//! Byte source abstractions for parsing.
//!
//! This module provides the [ByteSource] trait and the borrowed
//! [InMemoryByteSource], which is what the Newick parser scans over.

// =#========================================================================#=
// BYTE SOURCE (Trait)
// =#========================================================================T=
/// Trait defining the interface for byte sources used by
/// [ByteParser](crate::parser::ByteParser).
///
/// Tree text is always held in memory in this crate, but keeping the seam
/// lets the parser stay agnostic of where its bytes come from.
pub trait ByteSource {
    /// Peek at the current byte without consuming it.
    ///
    /// # Returns
    /// * `Some(u8)` - The current byte if available
    /// * `None` - If at end of data (EOF)
    fn peek(&self) -> Option<u8>;

    /// Get the current byte and advance the position (consume it).
    fn next_byte(&mut self) -> Option<u8>;

    /// Returns the current position (byte offset) in the byte stream.
    fn position(&self) -> usize;

    /// Returns a slice of up to `k` bytes from the current position without allocating.
    fn peek_slice(&self, k: usize) -> &[u8];

    /// Returns up to `k` bytes from the current position for error context.
    fn get_context(&self, k: usize) -> Vec<u8> {
        self.peek_slice(k).to_vec()
    }

    /// Check if at end of data.
    fn is_eof(&self) -> bool {
        self.peek().is_none()
    }
}

// =#========================================================================#=
// IN MEMORY BYTE SOURCE
// =#========================================================================$=
/// A byte source borrowing its data, e.g. the bytes of a Newick `&str`.
#[derive(Debug, Clone)]
pub struct InMemoryByteSource<'a> {
    /// The borrowed byte data being parsed
    input: &'a [u8],
    /// Current position in the byte slice
    pos: usize,
}

impl<'a> InMemoryByteSource<'a> {
    /// Creates a new in-memory byte source over a byte slice.
    ///
    /// # Arguments
    /// * `bytes` - The bytes to parse
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { input: bytes, pos: 0 }
    }
}

impl ByteSource for InMemoryByteSource<'_> {
    #[inline(always)]
    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    #[inline(always)]
    fn next_byte(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.pos += 1;
        Some(byte)
    }

    #[inline]
    fn position(&self) -> usize {
        self.pos
    }

    #[inline(always)]
    fn peek_slice(&self, k: usize) -> &[u8] {
        let start = self.pos.min(self.input.len());
        let end = (self.pos + k).min(self.input.len());
        &self.input[start..end]
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }
}

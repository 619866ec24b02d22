//! Low-level parsing infrastructure.
//!
//! This module provides the byte-level scanner the Newick parser is built
//! on, together with error handling and label escaping helpers.

pub mod byte_parser;
pub mod byte_source;
pub mod parsing_error;
pub mod utils;

pub use byte_parser::ByteParser;
pub use byte_source::{ByteSource, InMemoryByteSource};
pub use parsing_error::{ParsingError, ParsingErrorType};

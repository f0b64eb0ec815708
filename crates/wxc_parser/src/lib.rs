//! TypeScript/JavaScript parser front end.
//!
//! Wraps the standard SWC parser: picks the syntax from the file extension,
//! keeps the source map and comments for the printer, and turns SWC's
//! diagnostics into a [`ParseError`] carrying a line and column.

pub mod error;
pub mod parse;

pub use error::ParseError;
pub use parse::{parse_source, syntax_for_file, ParseResult};

//! Parse error types.

use thiserror::Error;

/// An error that occurred while parsing a source file.
#[derive(Debug, Clone, Error)]
pub enum ParseError {
    /// The source is not syntactically valid for the selected syntax.
    #[error("{filename}:{line}:{column}: {message}")]
    Syntax {
        filename: String,
        /// 1-based line.
        line: usize,
        /// 1-based column.
        column: usize,
        message: String,
    },
}

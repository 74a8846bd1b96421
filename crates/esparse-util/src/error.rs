//! The syntax error type shared by the scanner and parser.

use thiserror::Error;

/// A syntax error with the position it was detected at.
///
/// `index` is a byte offset into the source; `line_number` is 1-based and
/// `column` is 1-based (one past the 0-based column of the offending
/// character, matching how the positions read in editor goto-line syntax).
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("Line {line_number}: {description}")]
pub struct SyntaxError {
    /// Human-readable description of the problem.
    pub description: String,
    /// Byte offset where the error was detected.
    pub index: usize,
    /// Line number (1-based).
    pub line_number: u32,
    /// Column number (1-based).
    pub column: u32,
}

impl SyntaxError {
    /// The error class name, for hosts that expose one.
    pub const NAME: &'static str = "SyntaxError";

    /// Creates a new syntax error.
    pub fn new(description: String, index: usize, line_number: u32, column: u32) -> Self {
        Self {
            description,
            index,
            line_number,
            column,
        }
    }
}

/// Result alias used across the parser pipeline.
pub type Result<T> = std::result::Result<T, SyntaxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = SyntaxError::new("Unexpected token ;".to_string(), 10, 2, 5);
        assert_eq!(format!("{}", err), "Line 2: Unexpected token ;");
    }

    #[test]
    fn test_fields() {
        let err = SyntaxError::new("Unexpected end of input".to_string(), 0, 1, 1);
        assert_eq!(err.index, 0);
        assert_eq!(err.line_number, 1);
        assert_eq!(err.column, 1);
        assert_eq!(SyntaxError::NAME, "SyntaxError");
    }
}

//! Central sink for syntax errors.
//!
//! The handler runs in one of two modes. In strict mode the first error is
//! returned to the caller and parsing aborts. In tolerant mode errors are
//! appended to a list and parsing continues; the caller collects the list
//! when the parse finishes.

use crate::error::{Result, SyntaxError};

/// Collects or raises syntax errors depending on mode.
///
/// # Examples
///
/// ```
/// use esparse_util::ErrorHandler;
///
/// let mut handler = ErrorHandler::new(true);
/// let err = handler.create_error(0, 1, 1, "Unexpected token ;".to_string());
/// handler.tolerate(err).unwrap();
/// assert_eq!(handler.errors().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct ErrorHandler {
    /// Errors recorded while running tolerant.
    errors: Vec<SyntaxError>,
    /// Whether errors are recorded rather than raised.
    pub tolerant: bool,
}

impl ErrorHandler {
    /// Creates a handler in the given mode.
    pub fn new(tolerant: bool) -> Self {
        Self {
            errors: Vec::new(),
            tolerant,
        }
    }

    /// Builds an error record without raising or recording it.
    pub fn create_error(
        &self,
        index: usize,
        line: u32,
        column: u32,
        description: String,
    ) -> SyntaxError {
        SyntaxError::new(description, index, line, column)
    }

    /// Raises an error unconditionally.
    pub fn throw_error<T>(
        &self,
        index: usize,
        line: u32,
        column: u32,
        description: String,
    ) -> Result<T> {
        Err(self.create_error(index, line, column, description))
    }

    /// Records an error in tolerant mode, raises it otherwise.
    pub fn tolerate_error(
        &mut self,
        index: usize,
        line: u32,
        column: u32,
        description: String,
    ) -> Result<()> {
        let error = self.create_error(index, line, column, description);
        self.tolerate(error)
    }

    /// Records an already-built error in tolerant mode, raises it otherwise.
    pub fn tolerate(&mut self, error: SyntaxError) -> Result<()> {
        if self.tolerant {
            self.errors.push(error);
            Ok(())
        } else {
            Err(error)
        }
    }

    /// Errors recorded so far.
    pub fn errors(&self) -> &[SyntaxError] {
        &self.errors
    }

    /// Returns true if any error has been recorded.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Consumes the handler's recorded errors.
    pub fn take_errors(&mut self) -> Vec<SyntaxError> {
        std::mem::take(&mut self.errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strict_mode_raises() {
        let mut handler = ErrorHandler::new(false);
        let result = handler.tolerate_error(4, 1, 5, "Unexpected token +".to_string());
        assert!(result.is_err());
        assert!(!handler.has_errors());
    }

    #[test]
    fn test_tolerant_mode_records() {
        let mut handler = ErrorHandler::new(true);
        handler
            .tolerate_error(4, 1, 5, "Unexpected token +".to_string())
            .unwrap();
        handler
            .tolerate_error(9, 2, 1, "Unexpected end of input".to_string())
            .unwrap();
        assert_eq!(handler.errors().len(), 2);
        assert_eq!(handler.errors()[0].column, 5);
    }

    #[test]
    fn test_throw_error_always_raises() {
        let handler = ErrorHandler::new(true);
        let result: Result<()> = handler.throw_error(0, 1, 1, "Unexpected token ILLEGAL".to_string());
        assert!(result.is_err());
    }

    #[test]
    fn test_take_errors() {
        let mut handler = ErrorHandler::new(true);
        handler
            .tolerate_error(0, 1, 1, "Unexpected token ILLEGAL".to_string())
            .unwrap();
        let errors = handler.take_errors();
        assert_eq!(errors.len(), 1);
        assert!(!handler.has_errors());
    }
}

//! esparse-util - Shared infrastructure for the esparse parser pipeline.
//!
//! This crate holds the pieces every phase of the parser needs:
//!
//! - [`span`] - source positions, ranges, and locations
//! - [`messages`] - syntax error message templates
//! - [`error`] - the [`SyntaxError`] type carried through every phase
//! - [`handler`] - the strict/tolerant error sink

pub mod error;
pub mod handler;
pub mod messages;
pub mod span;

pub use error::{Result, SyntaxError};
pub use handler::ErrorHandler;
pub use span::{Position, SourceLocation, Span};

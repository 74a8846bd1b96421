//! esparse-lex - Lexical analysis for ECMAScript (ES2017+) source text.
//!
//! The scanner turns a source string into tokens on demand. ECMAScript's
//! lexical grammar is context-sensitive - whether `/` starts a regular
//! expression or is a division sign, and whether `}` closes a block or
//! resumes a template literal, depends on what the parser has already seen -
//! so the scanner exposes one entry point per lexical goal ([`Scanner::lex`],
//! [`Scanner::scan_reg_exp`], the JSX modes) and lets its client pick.
//!
//! The scanner also supports snapshotting its entire state for speculative
//! parsing: see [`Scanner::save_state`] and [`Scanner::restore_state`].

pub mod character;
mod edge_cases;
pub mod scanner;
pub mod token;

pub use scanner::{
    is_future_reserved_word, is_keyword, is_restricted_word, is_strict_mode_reserved_word,
    Scanner, ScannerState,
};
pub use token::{Comment, Token, TokenKind, TokenValue};

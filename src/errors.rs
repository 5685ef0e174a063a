//! Submodule defining the errors reported by the two analysis phases.

use alloc::string::String;
use core::fmt::{self, Display};

use crate::diagnostics::Located;
use crate::token::{Keyword, Position};

/// Errors found while scanning source text.
///
/// The lexer records these and keeps scanning; none of them stops analysis.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexicalError {
    /// A `##` block comment was still open at end of input.
    #[error("Unclosed comment starting at {position}")]
    UnclosedComment {
        /// Position of the opening `##`.
        position: Position,
    },
    /// A string literal reached a newline or end of input before its closing quote.
    #[error("Unclosed string starting at {position}")]
    UnclosedString {
        /// Position of the opening quote.
        position: Position,
    },
    /// A word began with an underscore.
    #[error("Invalid identifier '{lexeme}' at {position}: identifiers must start with a letter")]
    InvalidIdentifierStart {
        /// The rejected word.
        lexeme: String,
        /// Position of the leading underscore.
        position: Position,
    },
    /// A character that starts no token.
    #[error("Invalid character '{character}' at {position}")]
    InvalidCharacter {
        /// The offending character.
        character: char,
        /// Where it was found.
        position: Position,
    },
}

impl Located for LexicalError {
    fn position(&self) -> Position {
        match self {
            LexicalError::UnclosedComment { position }
            | LexicalError::UnclosedString { position }
            | LexicalError::InvalidIdentifierStart { position, .. }
            | LexicalError::InvalidCharacter { position, .. } => *position,
        }
    }
}

/// What the syntax analyzer was looking for when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected {
    /// A specific keyword.
    Keyword(Keyword),
    /// A specific operator or punctuation lexeme.
    Lexeme(&'static str),
    /// Any identifier.
    Identifier,
    /// The start of an expression: identifier, literal or `(`.
    Expression,
    /// One of the data type keywords.
    DataType,
    /// One of the statement-starting keywords.
    Statement,
}

impl Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expected::Keyword(keyword) => write!(f, "'{keyword}'"),
            Expected::Lexeme(lexeme) => write!(f, "'{lexeme}'"),
            Expected::Identifier => f.write_str("an identifier"),
            Expected::Expression => f.write_str("an expression"),
            Expected::DataType => f.write_str("a data type (INT, FLOAT, or TEXT)"),
            Expected::Statement => {
                f.write_str("a statement keyword (SELECT, INSERT, UPDATE, DELETE, CREATE)")
            }
        }
    }
}

/// Errors found while parsing the token sequence.
///
/// Each one abandons the statement it occurred in; the analyzer then
/// resynchronizes and continues with the next statement.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyntaxError {
    /// A token did not match what the grammar required.
    #[error("Expected {expected} at {position}, but found '{found}'")]
    UnexpectedToken {
        /// What the grammar required.
        expected: Expected,
        /// Lexeme of the token actually found.
        found: String,
        /// Position of the token actually found.
        position: Position,
    },
    /// The tokens ran out while the grammar still required something.
    #[error("Expected {expected}, but found end of input at {position}")]
    UnexpectedEndOfInput {
        /// What the grammar required.
        expected: Expected,
        /// Position just past the last token.
        position: Position,
    },
    /// A keyword that cannot begin a statement appeared where one should start.
    #[error(
        "Unexpected keyword '{keyword}' at {position}; expected one of SELECT, INSERT, UPDATE, DELETE, CREATE"
    )]
    UnexpectedStatementKeyword {
        /// The keyword found.
        keyword: String,
        /// Where it was found.
        position: Position,
    },
    /// A column definition named something other than INT, FLOAT or TEXT.
    #[error("Expected a data type (INT, FLOAT, or TEXT) at {position}, but found '{found}'")]
    InvalidDataType {
        /// Lexeme of the token found.
        found: String,
        /// Where it was found.
        position: Position,
    },
    /// Parentheses or NOT operators nested beyond the parser's limit.
    #[error("Nesting deeper than {limit} levels at {position}")]
    NestingTooDeep {
        /// The maximum nesting depth.
        limit: usize,
        /// The `(` or NOT token that exceeded it.
        position: Position,
    },
}

impl Located for SyntaxError {
    fn position(&self) -> Position {
        match self {
            SyntaxError::UnexpectedToken { position, .. }
            | SyntaxError::UnexpectedEndOfInput { position, .. }
            | SyntaxError::UnexpectedStatementKeyword { position, .. }
            | SyntaxError::InvalidDataType { position, .. }
            | SyntaxError::NestingTooDeep { position, .. } => *position,
        }
    }
}

impl SyntaxError {
    /// What the grammar expected, when the error names it.
    #[must_use]
    pub fn expected(&self) -> Option<Expected> {
        match self {
            SyntaxError::UnexpectedToken { expected, .. }
            | SyntaxError::UnexpectedEndOfInput { expected, .. } => Some(*expected),
            SyntaxError::InvalidDataType { .. } => Some(Expected::DataType),
            SyntaxError::UnexpectedStatementKeyword { .. } => Some(Expected::Statement),
            SyntaxError::NestingTooDeep { .. } => None,
        }
    }
}

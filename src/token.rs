//! Token model shared by the lexical and syntax analyzers.

use alloc::string::String;
use core::fmt::{self, Display};

/// A 1-based source position.
///
/// Positions order by line first, then column, which is the order tokens are
/// produced in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Position {
    /// Line number, starting at 1.
    pub line: u32,
    /// Column number in characters, starting at 1.
    pub column: u32,
}

impl Position {
    /// Create a position from a line and a column.
    #[must_use]
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// The classification of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum TokenKind {
    /// One of the reserved words in [`Keyword`], spelled in upper case.
    Keyword,
    /// A table or column name.
    Identifier,
    /// A run of digits without a decimal point.
    IntLiteral,
    /// A run of digits containing one decimal point.
    FloatLiteral,
    /// A single-quoted string; the lexeme keeps both quotes.
    StringLiteral,
    /// An arithmetic or comparison operator.
    Operator,
    /// One of `( ) , ; .`.
    Punctuation,
    /// A comment, only produced when comments are kept.
    Comment,
    /// Marker returned by the streaming lexer once input is exhausted.
    EndOfInput,
    /// A rejected construct, only produced when invalid input is kept.
    Invalid,
}

impl TokenKind {
    /// Whether the kind is one of the three literal kinds.
    #[must_use]
    pub const fn is_literal(self) -> bool {
        matches!(
            self,
            Self::IntLiteral | Self::FloatLiteral | Self::StringLiteral
        )
    }

    /// Whether the syntax analyzer expects tokens of this kind to have been
    /// filtered out beforehand.
    #[must_use]
    pub const fn is_parser_excluded(self) -> bool {
        matches!(self, Self::Comment | Self::Invalid)
    }

    /// Upper-case name of the kind, used in messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Keyword => "KEYWORD",
            Self::Identifier => "IDENTIFIER",
            Self::IntLiteral => "INT_LITERAL",
            Self::FloatLiteral => "FLOAT_LITERAL",
            Self::StringLiteral => "STRING_LITERAL",
            Self::Operator => "OPERATOR",
            Self::Punctuation => "PUNCTUATION",
            Self::Comment => "COMMENT",
            Self::EndOfInput => "EOF",
            Self::Invalid => "INVALID",
        }
    }
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The reserved words of the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Keyword {
    /// SELECT keyword
    Select,
    /// FROM keyword
    From,
    /// WHERE keyword
    Where,
    /// INSERT keyword
    Insert,
    /// INTO keyword
    Into,
    /// VALUES keyword
    Values,
    /// UPDATE keyword
    Update,
    /// SET keyword
    Set,
    /// DELETE keyword
    Delete,
    /// CREATE keyword
    Create,
    /// TABLE keyword
    Table,
    /// INT keyword
    Int,
    /// FLOAT keyword
    Float,
    /// TEXT keyword
    Text,
    /// AND keyword
    And,
    /// OR keyword
    Or,
    /// NOT keyword
    Not,
}

impl Keyword {
    /// Every keyword, in declaration order.
    pub const ALL: [Keyword; 17] = [
        Keyword::Select,
        Keyword::From,
        Keyword::Where,
        Keyword::Insert,
        Keyword::Into,
        Keyword::Values,
        Keyword::Update,
        Keyword::Set,
        Keyword::Delete,
        Keyword::Create,
        Keyword::Table,
        Keyword::Int,
        Keyword::Float,
        Keyword::Text,
        Keyword::And,
        Keyword::Or,
        Keyword::Not,
    ];

    /// Keywords that may begin a statement.
    pub const STATEMENT_STARTS: [Keyword; 5] = [
        Keyword::Select,
        Keyword::Insert,
        Keyword::Update,
        Keyword::Delete,
        Keyword::Create,
    ];

    /// Keywords naming a column data type.
    pub const DATA_TYPES: [Keyword; 3] = [Keyword::Int, Keyword::Float, Keyword::Text];

    /// Canonical upper-case spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Keyword::Select => "SELECT",
            Keyword::From => "FROM",
            Keyword::Where => "WHERE",
            Keyword::Insert => "INSERT",
            Keyword::Into => "INTO",
            Keyword::Values => "VALUES",
            Keyword::Update => "UPDATE",
            Keyword::Set => "SET",
            Keyword::Delete => "DELETE",
            Keyword::Create => "CREATE",
            Keyword::Table => "TABLE",
            Keyword::Int => "INT",
            Keyword::Float => "FLOAT",
            Keyword::Text => "TEXT",
            Keyword::And => "AND",
            Keyword::Or => "OR",
            Keyword::Not => "NOT",
        }
    }

    /// Recognize a scanned word as a keyword.
    ///
    /// Only the exact upper-case spelling counts: `select` is an identifier.
    #[must_use]
    pub fn recognize(word: &str) -> Option<Keyword> {
        Self::ALL.into_iter().find(|kw| kw.as_str() == word)
    }

    /// Whether a keyword token's lexeme spells this keyword, ignoring case.
    ///
    /// This is the grammar-side comparison and is deliberately looser than
    /// [`Keyword::recognize`].
    #[must_use]
    pub fn matches(self, lexeme: &str) -> bool {
        self.as_str().eq_ignore_ascii_case(lexeme)
    }
}

impl Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified lexical unit with its source position.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Token {
    kind: TokenKind,
    lexeme: String,
    position: Position,
}

impl Token {
    /// Create a token.
    #[must_use]
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, position: Position) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            position,
        }
    }

    /// The token's classification.
    #[must_use]
    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// The exact source text of the token.
    #[must_use]
    pub fn lexeme(&self) -> &str {
        &self.lexeme
    }

    /// Where the token starts.
    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    /// Line of the first character.
    #[must_use]
    pub fn line(&self) -> u32 {
        self.position.line
    }

    /// Column of the first character.
    #[must_use]
    pub fn column(&self) -> u32 {
        self.position.column
    }

    /// Position of the character right after the token, assuming the lexeme
    /// does not span lines.
    #[must_use]
    pub fn end(&self) -> Position {
        let width = u32::try_from(self.lexeme.chars().count()).unwrap_or(u32::MAX);
        Position::new(self.position.line, self.position.column.saturating_add(width))
    }

    /// Whether this is a keyword token spelling `keyword` (case-insensitive).
    #[must_use]
    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.kind == TokenKind::Keyword && keyword.matches(&self.lexeme)
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}' at {}", self.kind, self.lexeme, self.position)
    }
}

#[cfg(feature = "testing")]
mod arbitrary_impl {
    use super::Keyword;
    use arbitrary::{Arbitrary, Unstructured};

    impl<'a> Arbitrary<'a> for Keyword {
        fn arbitrary(u: &mut Unstructured<'a>) -> arbitrary::Result<Self> {
            Ok(*u.choose(&Self::ALL)?)
        }
    }
}

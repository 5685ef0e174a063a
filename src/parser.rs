//! Recursive-descent syntax analyzer producing a [`ParseTreeNode`].
//!
//! Grammar productions live in two submodules: `statements` for the five
//! statement forms and their lists, `conditions` for the boolean and
//! arithmetic precedence levels.
//!
//! A production that fails returns the [`SyntaxError`] describing the first
//! mismatch; `?` unwinds every enclosing production up to the statement loop,
//! which records the error once and resynchronizes. A failed production
//! therefore never attaches a partial child.
//!
//! The analyzer expects comment and invalid tokens to have been removed by the
//! caller (see [`crate::Lexed::parser_tokens`]); it treats them as ordinary
//! mismatches.

mod conditions;
mod statements;

use crate::diagnostics::{Diagnostics, Located};
use crate::errors::{Expected, SyntaxError};
use crate::token::{Keyword, Position, Token, TokenKind};
use crate::tree::{NodeKind, ParseTreeNode};

/// Result of a single grammar production.
type PResult<T> = Result<T, SyntaxError>;

/// Maximum number of nested parenthesized groups and NOT operators.
pub const MAX_NESTING_DEPTH: usize = 128;

/// Everything a parsing pass produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parsed {
    /// The PROGRAM root; one child per successfully parsed statement.
    pub tree: ParseTreeNode,
    /// Syntax errors in detection order, at most one per abandoned statement.
    pub diagnostics: Diagnostics<SyntaxError>,
}

/// Predictive parser over a filtered token sequence.
pub struct SyntaxAnalyzer<'t> {
    tokens: &'t [Token],
    cursor: usize,
    depth: usize,
    diagnostics: Diagnostics<SyntaxError>,
}

impl<'t> SyntaxAnalyzer<'t> {
    /// Create a parser over `tokens`.
    ///
    /// An [`TokenKind::EndOfInput`] token, if present, ends the input.
    #[must_use]
    pub fn new(tokens: &'t [Token]) -> Self {
        Self {
            tokens,
            cursor: 0,
            depth: 0,
            diagnostics: Diagnostics::new(),
        }
    }

    /// Parse every statement.
    ///
    /// A malformed statement is abandoned and reported; parsing resumes at the
    /// next synchronization point, so the returned tree holds every statement
    /// that parsed cleanly.
    #[must_use]
    pub fn parse(mut self) -> Parsed {
        let span = tracing::debug_span!(
            target: "minisql.parse",
            "syntax_analysis",
            statements = tracing::field::Empty,
            errors = tracing::field::Empty,
        );
        let _guard = span.enter();

        let mut root = ParseTreeNode::new(NodeKind::Program);
        while self.peek().is_some() {
            let start = self.cursor;
            match self.parse_statement() {
                Ok(statement) => {
                    root.push(statement);
                    if self.check_punct(";") {
                        self.bump();
                    }
                }
                Err(error) => {
                    tracing::trace!(
                        target: "minisql.parse",
                        line = error.line(),
                        column = error.column(),
                        "syntax error: {error}"
                    );
                    self.diagnostics.report(error);
                    self.synchronize();
                    if self.cursor == start {
                        self.bump();
                    }
                }
            }
        }

        span.record("statements", root.children().len());
        span.record("errors", self.diagnostics.len());

        Parsed {
            tree: root,
            diagnostics: self.diagnostics,
        }
    }

    /// Discard tokens up to and including the next `;`, or up to (excluding)
    /// the next statement keyword, whichever comes first.
    fn synchronize(&mut self) {
        let start = self.cursor;
        while let Some(token) = self.peek() {
            if token.kind() == TokenKind::Punctuation && token.lexeme() == ";" {
                self.bump();
                break;
            }
            if Keyword::STATEMENT_STARTS
                .into_iter()
                .any(|keyword| token.is_keyword(keyword))
            {
                break;
            }
            self.bump();
        }
        tracing::debug!(
            target: "minisql.parse",
            skipped = self.cursor - start,
            "synchronized after syntax error"
        );
    }

    /// Statement -> SelectStmt | InsertStmt | UpdateStmt | DeleteStmt | CreateStmt
    fn parse_statement(&mut self) -> PResult<ParseTreeNode> {
        let Some(token) = self.peek() else {
            return Err(self.unexpected(Expected::Statement));
        };
        if token.kind() != TokenKind::Keyword {
            return Err(self.unexpected(Expected::Statement));
        }

        match Keyword::STATEMENT_STARTS
            .into_iter()
            .find(|keyword| token.is_keyword(*keyword))
        {
            Some(Keyword::Select) => self.parse_select(),
            Some(Keyword::Insert) => self.parse_insert(),
            Some(Keyword::Update) => self.parse_update(),
            Some(Keyword::Delete) => self.parse_delete(),
            Some(Keyword::Create) => self.parse_create(),
            _ => Err(SyntaxError::UnexpectedStatementKeyword {
                keyword: token.lexeme().to_ascii_uppercase(),
                position: token.position(),
            }),
        }
    }

    // -----------------------------------------------------------------------
    // Token cursor
    // -----------------------------------------------------------------------

    /// The current token, or `None` at end of input.
    fn peek(&self) -> Option<&'t Token> {
        self.tokens
            .get(self.cursor)
            .filter(|token| token.kind() != TokenKind::EndOfInput)
    }

    /// Step past the current token.
    fn bump(&mut self) {
        if self.peek().is_some() {
            self.cursor += 1;
        }
    }

    /// The current token if it satisfies `pred`.
    fn peek_if(&self, pred: impl FnOnce(&Token) -> bool) -> Option<&'t Token> {
        self.peek().filter(|&token| pred(token))
    }

    fn check_keyword(&self, keyword: Keyword) -> bool {
        self.peek_if(|token| token.is_keyword(keyword)).is_some()
    }

    fn check_punct(&self, lexeme: &str) -> bool {
        self.peek_if(|token| token.kind() == TokenKind::Punctuation && token.lexeme() == lexeme)
            .is_some()
    }

    /// The current token if it is one of the given operators.
    fn peek_operator(&self, operators: &[&str]) -> Option<&'t Token> {
        self.peek_if(|token| {
            token.kind() == TokenKind::Operator && operators.contains(&token.lexeme())
        })
    }

    fn expect_keyword(&mut self, keyword: Keyword) -> PResult<&'t Token> {
        self.expect(
            |token| token.is_keyword(keyword),
            Expected::Keyword(keyword),
        )
    }

    fn expect_punct(&mut self, lexeme: &'static str) -> PResult<&'t Token> {
        self.expect(
            |token| token.kind() == TokenKind::Punctuation && token.lexeme() == lexeme,
            Expected::Lexeme(lexeme),
        )
    }

    fn expect_operator(&mut self, lexeme: &'static str) -> PResult<&'t Token> {
        self.expect(
            |token| token.kind() == TokenKind::Operator && token.lexeme() == lexeme,
            Expected::Lexeme(lexeme),
        )
    }

    /// Consume the current token if it satisfies `pred`, otherwise report
    /// what was `expected`.
    fn expect(
        &mut self,
        pred: impl FnOnce(&Token) -> bool,
        expected: Expected,
    ) -> PResult<&'t Token> {
        match self.peek_if(pred) {
            Some(token) => {
                self.bump();
                Ok(token)
            }
            None => Err(self.unexpected(expected)),
        }
    }

    /// Run `production` one nesting level deeper than the current one.
    ///
    /// `at` is the token opening the level; past [`MAX_NESTING_DEPTH`] the
    /// statement is abandoned with an error positioned on it.
    fn nested<T>(
        &mut self,
        at: &Token,
        production: fn(&mut Self) -> PResult<T>,
    ) -> PResult<T> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(SyntaxError::NestingTooDeep {
                limit: MAX_NESTING_DEPTH,
                position: at.position(),
            });
        }
        self.depth += 1;
        let result = production(self);
        self.depth -= 1;
        result
    }

    /// Error describing a mismatch at the current token.
    fn unexpected(&self, expected: Expected) -> SyntaxError {
        match self.peek() {
            Some(token) => SyntaxError::UnexpectedToken {
                expected,
                found: token.lexeme().into(),
                position: token.position(),
            },
            None => SyntaxError::UnexpectedEndOfInput {
                expected,
                position: self.end_position(),
            },
        }
    }

    /// Position right after the last token.
    fn end_position(&self) -> Position {
        match self.tokens.iter().find(|t| t.kind() == TokenKind::EndOfInput) {
            Some(end) => end.position(),
            None => self.tokens.last().map_or(Position::new(1, 1), Token::end),
        }
    }

    /// Position of the current token, if any.
    fn current_position(&self) -> Option<Position> {
        self.peek().map(Token::position)
    }
}

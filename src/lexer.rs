//! Lexical analyzer turning source text into classified tokens.
//!
//! The scanner makes a single left-to-right pass with one character of
//! lookahead. It never stops on bad input: every rejected construct is
//! recorded in the lexer's [`Diagnostics`] and scanning resumes right after it.

use alloc::string::ToString;
use alloc::vec::Vec;

use crate::diagnostics::{Diagnostics, Located};
use crate::errors::LexicalError;
use crate::symbol_table::SymbolTable;
use crate::token::{Keyword, Position, Token, TokenKind};

/// Knobs controlling which non-grammatical tokens the lexer emits.
///
/// With the defaults only grammatical tokens are produced: comments and
/// rejected input leave no trace in the token sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LexerOptions {
    /// Emit [`TokenKind::Comment`] tokens for closed comments.
    pub keep_comments: bool,
    /// Emit [`TokenKind::Invalid`] tokens for input that was rejected with a diagnostic.
    pub keep_invalid: bool,
}

impl LexerOptions {
    /// Set whether comments are kept as tokens.
    #[must_use]
    pub fn with_comments(mut self, keep: bool) -> Self {
        self.keep_comments = keep;
        self
    }

    /// Set whether rejected input is kept as tokens.
    #[must_use]
    pub fn with_invalid(mut self, keep: bool) -> Self {
        self.keep_invalid = keep;
        self
    }
}

/// Everything a lexing pass produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexed {
    /// Tokens in source order, without an end-of-input marker.
    pub tokens: Vec<Token>,
    /// Identifiers seen, with first position and occurrence count.
    pub symbol_table: SymbolTable,
    /// Lexical errors in detection order.
    pub diagnostics: Diagnostics<LexicalError>,
}

impl Lexed {
    /// The tokens the syntax analyzer accepts: everything except
    /// [`TokenKind::Comment`] and [`TokenKind::Invalid`].
    #[must_use]
    pub fn parser_tokens(&self) -> Vec<Token> {
        self.tokens
            .iter()
            .filter(|token| !token.kind().is_parser_excluded())
            .cloned()
            .collect()
    }
}

/// Single-pass scanner over one source text.
pub struct LexicalAnalyzer<'a> {
    input: &'a str,
    pos: usize,
    line: u32,
    column: u32,
    token_start: usize,
    token_position: Position,
    options: LexerOptions,
    symbol_table: SymbolTable,
    diagnostics: Diagnostics<LexicalError>,
}

impl<'a> LexicalAnalyzer<'a> {
    /// Create a lexer with default options.
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self::with_options(input, LexerOptions::default())
    }

    /// Create a lexer with explicit options.
    #[must_use]
    pub fn with_options(input: &'a str, options: LexerOptions) -> Self {
        Self {
            input,
            pos: 0,
            line: 1,
            column: 1,
            token_start: 0,
            token_position: Position::new(1, 1),
            options,
            symbol_table: SymbolTable::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    /// Scan the whole input.
    #[must_use]
    pub fn analyze(mut self) -> Lexed {
        let span = tracing::debug_span!(
            target: "minisql.lex",
            "lexical_analysis",
            tokens = tracing::field::Empty,
            symbols = tracing::field::Empty,
            errors = tracing::field::Empty,
        );
        let _guard = span.enter();

        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            if token.kind() == TokenKind::EndOfInput {
                break;
            }
            tokens.push(token);
        }

        span.record("tokens", tokens.len());
        span.record("symbols", self.symbol_table.len());
        span.record("errors", self.diagnostics.len());

        Lexed {
            tokens,
            symbol_table: self.symbol_table,
            diagnostics: self.diagnostics,
        }
    }

    /// Identifiers recorded so far.
    #[must_use]
    pub fn symbol_table(&self) -> &SymbolTable {
        &self.symbol_table
    }

    /// Lexical errors recorded so far.
    #[must_use]
    pub fn diagnostics(&self) -> &Diagnostics<LexicalError> {
        &self.diagnostics
    }

    /// Produce the next token.
    ///
    /// Once the input is exhausted this keeps returning an
    /// [`TokenKind::EndOfInput`] token with an empty lexeme.
    pub fn next_token(&mut self) -> Token {
        loop {
            self.skip_whitespace();
            self.token_start = self.pos;
            self.token_position = self.position();

            let Some(c) = self.current() else {
                return self.emit(TokenKind::EndOfInput);
            };
            if let Some(token) = self.scan(c) {
                return token;
            }
        }
    }

    /// Scan one construct starting with `c`. Returns `None` when the
    /// construct produced no token.
    fn scan(&mut self, c: char) -> Option<Token> {
        // Comment starters are checked first: `-` is also an operator.
        match c {
            '-' if self.peek() == Some('-') => self.read_line_comment(),
            '#' if self.peek() == Some('#') => self.read_block_comment(),
            '\'' => self.read_string(),
            _ if c.is_ascii_digit() => Some(self.read_number()),
            _ if c.is_alphabetic() => Some(self.read_word()),
            '_' => self.read_underscore_word(),
            '+' | '-' | '*' | '/' | '%' | '=' | '>' | '<' | '!' => Some(self.read_operator()),
            '(' | ')' | ',' | ';' | '.' => {
                self.advance();
                Some(self.emit(TokenKind::Punctuation))
            }
            _ => {
                self.advance();
                self.report(LexicalError::InvalidCharacter {
                    character: c,
                    position: self.token_position,
                });
                self.reject()
            }
        }
    }

    fn current(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().nth(1)
    }

    fn advance(&mut self) {
        if let Some(c) = self.current() {
            self.pos += c.len_utf8();
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    fn advance_while(&mut self, pred: impl Fn(char) -> bool) {
        while self.current().is_some_and(&pred) {
            self.advance();
        }
    }

    fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    /// Source text of the construct being scanned.
    fn lexeme(&self) -> &'a str {
        &self.input[self.token_start..self.pos]
    }

    fn emit(&self, kind: TokenKind) -> Token {
        Token::new(kind, self.lexeme(), self.token_position)
    }

    fn reject(&self) -> Option<Token> {
        self.options
            .keep_invalid
            .then(|| self.emit(TokenKind::Invalid))
    }

    fn comment(&self) -> Option<Token> {
        self.options
            .keep_comments
            .then(|| self.emit(TokenKind::Comment))
    }

    fn report(&mut self, error: LexicalError) {
        tracing::trace!(
            target: "minisql.lex",
            line = error.line(),
            column = error.column(),
            "lexical error: {error}"
        );
        self.diagnostics.report(error);
    }

    fn skip_whitespace(&mut self) {
        self.advance_while(|c| matches!(c, ' ' | '\t' | '\n' | '\r'));
    }

    /// `--` through end of line; the newline itself is left for whitespace skipping.
    fn read_line_comment(&mut self) -> Option<Token> {
        self.advance();
        self.advance();
        self.advance_while(|c| c != '\n');
        self.comment()
    }

    /// `## ... ##`, possibly spanning lines.
    fn read_block_comment(&mut self) -> Option<Token> {
        self.advance();
        self.advance();
        loop {
            match self.current() {
                None => {
                    self.report(LexicalError::UnclosedComment {
                        position: self.token_position,
                    });
                    return self.reject();
                }
                Some('#') if self.peek() == Some('#') => {
                    self.advance();
                    self.advance();
                    return self.comment();
                }
                Some(_) => self.advance(),
            }
        }
    }

    /// Single-quoted string that must close on its own line. The token
    /// lexeme keeps both quotes.
    fn read_string(&mut self) -> Option<Token> {
        self.advance();
        loop {
            match self.current() {
                None | Some('\n') => {
                    self.report(LexicalError::UnclosedString {
                        position: self.token_position,
                    });
                    return self.reject();
                }
                Some('\'') => {
                    self.advance();
                    return Some(self.emit(TokenKind::StringLiteral));
                }
                Some(_) => self.advance(),
            }
        }
    }

    /// Digits with at most one decimal point; a second point ends the number.
    fn read_number(&mut self) -> Token {
        let mut has_decimal = false;
        while let Some(c) = self.current() {
            if c.is_ascii_digit() {
                self.advance();
            } else if c == '.' && !has_decimal {
                has_decimal = true;
                self.advance();
            } else {
                break;
            }
        }

        if has_decimal {
            self.emit(TokenKind::FloatLiteral)
        } else {
            self.emit(TokenKind::IntLiteral)
        }
    }

    /// Maximal run of letters, digits and underscores, classified only once
    /// complete.
    fn read_word(&mut self) -> Token {
        self.advance_while(is_word_continue);
        let word = self.lexeme();

        if Keyword::recognize(word).is_some() {
            self.emit(TokenKind::Keyword)
        } else {
            self.symbol_table.record(word, self.token_position);
            self.emit(TokenKind::Identifier)
        }
    }

    fn read_underscore_word(&mut self) -> Option<Token> {
        self.advance_while(is_word_continue);
        self.report(LexicalError::InvalidIdentifierStart {
            lexeme: self.lexeme().to_string(),
            position: self.token_position,
        });
        self.reject()
    }

    /// One-character operator, or one of `>=`, `<=`, `!=`, `<>`.
    fn read_operator(&mut self) -> Token {
        let first = self.current();
        self.advance();
        if matches!(
            (first, self.current()),
            (Some('>' | '<' | '!'), Some('=')) | (Some('<'), Some('>'))
        ) {
            self.advance();
        }
        self.emit(TokenKind::Operator)
    }
}

fn is_word_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#![doc = include_str!("../README.md")]
#![no_std]
#![deny(clippy::mod_module_files)]

extern crate alloc;

pub mod diagnostics;
pub mod errors;
pub mod lexer;
pub mod parser;
pub mod symbol_table;
#[cfg(feature = "testing")]
pub mod testing;
pub mod token;
pub mod tree;

pub use diagnostics::{Diagnostics, Located};
pub use errors::{Expected, LexicalError, SyntaxError};
pub use lexer::{Lexed, LexerOptions, LexicalAnalyzer};
pub use parser::{Parsed, SyntaxAnalyzer};
pub use symbol_table::{SymbolEntry, SymbolTable};
pub use token::{Keyword, Position, Token, TokenKind};
pub use tree::{NodeKind, ParseTreeNode};

/// Output of both phases over one source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    /// Tokens, symbol table and lexical errors.
    pub lexed: Lexed,
    /// Parse tree and syntax errors.
    pub parsed: Parsed,
}

impl Analysis {
    /// Whether either phase reported an error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.lexed.diagnostics.is_empty() || !self.parsed.diagnostics.is_empty()
    }
}

/// Lex `source` with default options.
#[must_use]
pub fn lex(source: &str) -> Lexed {
    LexicalAnalyzer::new(source).analyze()
}

/// Run the lexer, drop comment and invalid tokens, and parse the rest.
///
/// # Example
///
/// ```
/// use minisql_analyzer::{NodeKind, analyze};
///
/// let analysis = analyze("SELECT name FROM users WHERE id = 1;");
/// assert!(!analysis.has_errors());
/// assert_eq!(analysis.parsed.tree.children()[0].kind(), NodeKind::SelectStmt);
/// assert_eq!(analysis.lexed.symbol_table.len(), 3);
/// ```
#[must_use]
pub fn analyze(source: &str) -> Analysis {
    analyze_with(source, LexerOptions::default())
}

/// Like [`analyze`], with explicit lexer options.
///
/// Kept comment and invalid tokens appear in [`Analysis::lexed`] but are never
/// handed to the parser.
#[must_use]
pub fn analyze_with(source: &str, options: LexerOptions) -> Analysis {
    let lexed = LexicalAnalyzer::with_options(source, options).analyze();
    let tokens = lexed.parser_tokens();
    let parsed = SyntaxAnalyzer::new(&tokens).parse();
    Analysis { lexed, parsed }
}

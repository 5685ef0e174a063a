//! Invariant checkers shared by the test suite and the fuzz harnesses.
//!
//! This module is gated behind the `testing` feature.
//!
//! # Provided helpers
//!
//! - [`check_lexed`]: positions, symbol-table and token-kind invariants of a lexing pass
//! - [`check_tree`]: structural invariants of a parse tree
//! - [`check_relex`]: re-lexing a token's lexeme yields one token of the same kind
//! - [`check_analysis`]: run both phases over a source and apply every check
//! - [`FuzzSource`]: `arbitrary`-driven generator of query-shaped sources

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Write;

use arbitrary::{Arbitrary, Unstructured};

use crate::lexer::{Lexed, LexicalAnalyzer};
use crate::token::{Keyword, TokenKind};
use crate::tree::{NodeKind, ParseTreeNode};
use crate::{Analysis, analyze};

/// Assert the invariants every default-options lexing pass satisfies.
///
/// # Panics
///
/// Panics if token positions decrease, if a comment or invalid token is
/// present, or if the symbol table disagrees with the identifier tokens.
pub fn check_lexed(lexed: &Lexed) {
    for pair in lexed.tokens.windows(2) {
        assert!(
            pair[0].position() <= pair[1].position(),
            "token positions decrease: {} then {}",
            pair[0],
            pair[1]
        );
    }

    for token in &lexed.tokens {
        assert!(
            !token.kind().is_parser_excluded() && token.kind() != TokenKind::EndOfInput,
            "unexpected {token} with default options"
        );
    }

    let identifiers: Vec<_> = lexed
        .tokens
        .iter()
        .filter(|token| token.kind() == TokenKind::Identifier)
        .collect();
    for (name, entry) in lexed.symbol_table.iter() {
        let mut occurrences = identifiers.iter().filter(|token| token.lexeme() == name);
        let first = occurrences
            .next()
            .unwrap_or_else(|| panic!("symbol {name} has no identifier token"));
        assert_eq!(first.position(), entry.first, "first position of {name}");
        assert_eq!(1 + occurrences.count(), entry.occurrences, "count of {name}");
    }
    for token in identifiers {
        assert!(
            lexed.symbol_table.contains(token.lexeme()),
            "identifier {token} missing from symbol table"
        );
    }
}

/// Assert that every identifier, literal and operator token re-lexes, in
/// isolation, to exactly one token of the same kind.
///
/// # Panics
///
/// Panics on the first token that does not.
pub fn check_relex(lexed: &Lexed) {
    for token in &lexed.tokens {
        if !matches!(
            token.kind(),
            TokenKind::Identifier
                | TokenKind::IntLiteral
                | TokenKind::FloatLiteral
                | TokenKind::StringLiteral
                | TokenKind::Operator
        ) {
            continue;
        }
        let relexed = LexicalAnalyzer::new(token.lexeme()).analyze();
        assert_eq!(relexed.tokens.len(), 1, "re-lexing {token}");
        assert_eq!(relexed.tokens[0].kind(), token.kind(), "re-lexing {token}");
        assert!(relexed.diagnostics.is_empty(), "re-lexing {token}");
    }
}

/// Assert the structural invariants of a parse tree.
///
/// # Panics
///
/// Panics if the root is not a PROGRAM of statements, if a leaf kind has
/// children or no value, or if a binary node does not have two children.
pub fn check_tree(tree: &ParseTreeNode) {
    assert_eq!(tree.kind(), NodeKind::Program);
    for statement in tree.children() {
        assert!(
            statement.kind().is_statement(),
            "{} directly under PROGRAM",
            statement.kind()
        );
    }

    for node in tree.walk() {
        match node.kind() {
            kind if kind.is_leaf() => {
                assert!(node.children().is_empty(), "{kind} has children");
                assert!(node.value().is_some(), "{kind} has no value");
            }
            NodeKind::OrCondition
            | NodeKind::AndCondition
            | NodeKind::Expression
            | NodeKind::Term
            | NodeKind::Assignment
            | NodeKind::ColumnDef => {
                assert_eq!(node.children().len(), 2, "{} arity", node.kind());
            }
            NodeKind::NotCondition | NodeKind::WhereClause => {
                assert_eq!(node.children().len(), 1, "{} arity", node.kind());
            }
            NodeKind::Comparison => {
                let arity = node.children().len();
                assert!(arity == 1 || arity == 3, "COMPARISON arity {arity}");
            }
            NodeKind::Program => {}
            _ => assert!(!node.children().is_empty(), "{} is empty", node.kind()),
        }
    }
}

/// Analyze `source` and apply every check.
///
/// # Panics
///
/// Panics if any invariant is violated.
pub fn check_analysis(source: &str) -> Analysis {
    let analysis = analyze(source);
    check_lexed(&analysis.lexed);
    check_relex(&analysis.lexed);
    check_tree(&analysis.parsed.tree);
    analysis
}

/// One piece of a generated source text.
#[derive(Debug, Clone)]
pub enum FuzzFragment {
    /// A keyword, in canonical or lower case.
    Keyword(Keyword, bool),
    /// An identifier drawn from a small pool, so names repeat.
    Identifier(u8),
    /// An integer literal.
    Int(u16),
    /// A float literal.
    Float(u16, u8),
    /// A string literal, possibly left unclosed.
    Str(String, bool),
    /// An operator or punctuation character.
    Symbol(u8),
    /// A line comment when `true`, otherwise a closed block comment.
    Comment(String, bool),
    /// A line break.
    Newline,
    /// A raw character, usually invalid.
    Raw(char),
}

/// A sequence of fragments rendered into a query-shaped source text.
#[derive(Debug, Clone)]
pub struct FuzzSource(pub Vec<FuzzFragment>);

impl<'a> Arbitrary<'a> for FuzzFragment {
    fn arbitrary(u: &mut Unstructured<'a>) -> arbitrary::Result<Self> {
        Ok(match u.int_in_range(0..=8u8)? {
            0 => Self::Keyword(u.arbitrary()?, u.arbitrary()?),
            1 => Self::Identifier(u.arbitrary()?),
            2 => Self::Int(u.arbitrary()?),
            3 => Self::Float(u.arbitrary()?, u.arbitrary()?),
            4 => Self::Str(u.arbitrary()?, u.arbitrary()?),
            5 => Self::Symbol(u.arbitrary()?),
            6 => Self::Comment(u.arbitrary()?, u.arbitrary()?),
            7 => Self::Newline,
            _ => Self::Raw(u.arbitrary()?),
        })
    }
}

impl<'a> Arbitrary<'a> for FuzzSource {
    fn arbitrary(u: &mut Unstructured<'a>) -> arbitrary::Result<Self> {
        Ok(Self(u.arbitrary()?))
    }
}

const IDENTIFIERS: [&str; 6] = ["users", "id", "name", "age", "t", "price_2"];
const SYMBOLS: [&str; 18] = [
    "+", "-", "*", "/", "%", "=", ">", "<", "!", ">=", "<=", "!=", "<>", "(", ")", ",", ";", ".",
];

impl FuzzSource {
    /// Render the fragments, separated by single spaces.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        for fragment in &self.0 {
            match fragment {
                FuzzFragment::Keyword(keyword, true) => out.push_str(keyword.as_str()),
                FuzzFragment::Keyword(keyword, false) => {
                    out.push_str(&keyword.as_str().to_ascii_lowercase());
                }
                FuzzFragment::Identifier(i) => {
                    out.push_str(IDENTIFIERS[usize::from(*i) % IDENTIFIERS.len()]);
                }
                FuzzFragment::Int(v) => {
                    let _ = write!(out, "{v}");
                }
                FuzzFragment::Float(whole, frac) => {
                    let _ = write!(out, "{whole}.{frac}");
                }
                FuzzFragment::Str(text, closed) => {
                    out.push('\'');
                    out.extend(text.chars().filter(|c| !matches!(c, '\'' | '\n')));
                    if *closed {
                        out.push('\'');
                    }
                }
                FuzzFragment::Symbol(i) => out.push_str(SYMBOLS[usize::from(*i) % SYMBOLS.len()]),
                FuzzFragment::Comment(text, true) => {
                    out.push_str("-- ");
                    out.extend(text.chars().filter(|c| *c != '\n'));
                    out.push('\n');
                }
                FuzzFragment::Comment(text, false) => {
                    out.push_str("## ");
                    out.extend(text.chars().filter(|c| *c != '#'));
                    out.push_str(" ##");
                }
                FuzzFragment::Newline => out.push('\n'),
                FuzzFragment::Raw(c) => out.push(*c),
            }
            out.push(' ');
        }
        out
    }
}

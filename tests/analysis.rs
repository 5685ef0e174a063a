//! End-to-end tests for lexing, parsing and recovery through the public API.

use minisql_analyzer::{
    Expected, LexerOptions, LexicalError, Located, NodeKind, ParseTreeNode, Position,
    SyntaxError, Token, TokenKind, analyze, analyze_with, lex,
};

fn kinds(node: &ParseTreeNode) -> Vec<NodeKind> {
    node.children().iter().map(ParseTreeNode::kind).collect()
}

fn values(node: &ParseTreeNode) -> Vec<Option<&str>> {
    node.children().iter().map(ParseTreeNode::value).collect()
}

/// Place every token lexeme back at its recorded position, one string per line.
fn reconstruct(source: &str) -> Vec<String> {
    let lexed = lex(source);
    let mut lines: Vec<String> = Vec::new();
    for token in &lexed.tokens {
        let line = token.line() as usize;
        while lines.len() < line {
            lines.push(String::new());
        }
        let text = &mut lines[line - 1];
        let column = token.column() as usize;
        while text.chars().count() + 1 < column {
            text.push(' ');
        }
        text.push_str(token.lexeme());
    }
    lines
}

// =============================================================================
// Statement shapes
// =============================================================================

#[test]
fn test_select_star() {
    let analysis = analyze("SELECT * FROM t");
    assert!(!analysis.has_errors());

    let tree = &analysis.parsed.tree;
    assert_eq!(tree.kind(), NodeKind::Program);
    assert_eq!(kinds(tree), [NodeKind::SelectStmt]);

    let select = &tree.children()[0];
    assert_eq!(kinds(select), [NodeKind::SelectList, NodeKind::Identifier]);
    assert_eq!(kinds(&select.children()[0]), [NodeKind::AllColumns]);
    assert_eq!(select.children()[1].value(), Some("t"));
}

#[test]
fn test_select_with_where_comparison() {
    let analysis = analyze("SELECT a, b FROM t WHERE a = 1");
    assert!(!analysis.has_errors());

    let select = &analysis.parsed.tree.children()[0];
    let where_clause = &select.children()[2];
    assert_eq!(where_clause.kind(), NodeKind::WhereClause);

    let comparison = &where_clause.children()[0];
    assert_eq!(comparison.kind(), NodeKind::Comparison);
    assert_eq!(
        kinds(comparison),
        [NodeKind::Identifier, NodeKind::Operator, NodeKind::Literal]
    );
    assert_eq!(values(comparison), [Some("a"), Some("="), Some("1")]);
}

#[test]
fn test_insert_missing_paren() {
    let analysis = analyze("INSERT INTO t VALUES (1, 'x'");
    assert!(analysis.lexed.diagnostics.is_empty());
    assert!(analysis.parsed.tree.children().is_empty());
    assert_eq!(analysis.parsed.diagnostics.len(), 1);
    assert_eq!(
        analysis.parsed.diagnostics[0].expected(),
        Some(Expected::Lexeme(")"))
    );
}

#[test]
fn test_create_table() {
    let analysis = analyze("CREATE TABLE t (a INT, b FLOAT)");
    assert!(!analysis.has_errors());

    let create = &analysis.parsed.tree.children()[0];
    let columns = &create.children()[1];
    assert_eq!(columns.kind(), NodeKind::ColumnDefList);
    assert_eq!(kinds(columns), [NodeKind::ColumnDef, NodeKind::ColumnDef]);
}

#[test]
fn test_create_table_unknown_type() {
    for source in ["CREATE TABLE t (a BOOL, b FLOAT)", "CREATE TABLE t (a INT, b BOOL)"] {
        let analysis = analyze(source);
        assert!(analysis.parsed.tree.children().is_empty(), "{source}");
        assert_eq!(analysis.parsed.diagnostics.len(), 1, "{source}");
        assert!(matches!(
            analysis.parsed.diagnostics[0],
            SyntaxError::InvalidDataType { ref found, .. } if found == "BOOL"
        ));
    }
}

#[test]
fn test_condition_precedence() {
    let analysis = analyze("SELECT a FROM t WHERE NOT (a = 1 AND b = 2) OR c = 3");
    assert!(!analysis.has_errors());

    let where_clause = analysis.parsed.tree.find(NodeKind::WhereClause).unwrap();
    let or = &where_clause.children()[0];
    assert_eq!(or.kind(), NodeKind::OrCondition);
    assert_eq!(kinds(or), [NodeKind::NotCondition, NodeKind::Comparison]);
    assert_eq!(kinds(&or.children()[0]), [NodeKind::AndCondition]);
    assert_eq!(values(&or.children()[1]), [Some("c"), Some("="), Some("3")]);
}

#[test]
fn test_several_statements() {
    let source = "
        CREATE TABLE users (id INT, name TEXT, score FLOAT);
        INSERT INTO users VALUES (1, 'Alice', 9.5);
        UPDATE users SET score = score * 2 WHERE name <> 'Bob';
        SELECT id, name FROM users WHERE score >= 10 AND NOT id = 3;
        DELETE FROM users WHERE id = 1
    ";
    let analysis = analyze(source);
    assert!(!analysis.has_errors(), "{:?}", analysis.parsed.diagnostics);
    assert_eq!(
        kinds(&analysis.parsed.tree),
        [
            NodeKind::CreateStmt,
            NodeKind::InsertStmt,
            NodeKind::UpdateStmt,
            NodeKind::SelectStmt,
            NodeKind::DeleteStmt,
        ]
    );

    let users = analysis.lexed.symbol_table.get("users").unwrap();
    assert_eq!(users.occurrences, 5);
    assert_eq!(users.first, Position::new(2, 22));
}

#[test]
fn test_outline_rendering() {
    let tree = analyze("SELECT * FROM t").parsed.tree;
    assert_eq!(
        tree.to_string(),
        "PROGRAM\n  SELECT_STMT [1:1]\n    SELECT_LIST [1:8]\n      ALL_COLUMNS: * [1:8]\n    IDENTIFIER: t [1:15]\n"
    );
}

// =============================================================================
// Recovery
// =============================================================================

#[test]
fn test_recovery_skips_to_semicolon() {
    let analysis = analyze("SELECT FROM t; SELECT a FROM t");
    assert_eq!(kinds(&analysis.parsed.tree), [NodeKind::SelectStmt]);
    assert_eq!(
        analysis.parsed.diagnostics.as_slice(),
        [SyntaxError::UnexpectedToken {
            expected: Expected::Expression,
            found: "FROM".into(),
            position: Position::new(1, 8),
        }]
    );
}

#[test]
fn test_recovery_stops_at_statement_keyword() {
    let analysis = analyze("SELECT a FROM t WHERE DELETE FROM t");
    assert_eq!(kinds(&analysis.parsed.tree), [NodeKind::DeleteStmt]);
    assert_eq!(analysis.parsed.diagnostics.len(), 1);
    assert_eq!(analysis.parsed.diagnostics[0].position(), Position::new(1, 23));
}

#[test]
fn test_non_statement_keyword() {
    let analysis = analyze("WHERE x = 1; SELECT * FROM t");
    assert_eq!(kinds(&analysis.parsed.tree), [NodeKind::SelectStmt]);
    assert_eq!(
        analysis.parsed.diagnostics.as_slice(),
        [SyntaxError::UnexpectedStatementKeyword {
            keyword: "WHERE".into(),
            position: Position::new(1, 1),
        }]
    );
}

#[test]
fn test_statement_must_start_with_keyword() {
    let analysis = analyze("x = 1; 42; DELETE FROM t");
    assert_eq!(kinds(&analysis.parsed.tree), [NodeKind::DeleteStmt]);
    assert_eq!(analysis.parsed.diagnostics.len(), 2);
    assert!(
        analysis
            .parsed
            .diagnostics
            .iter()
            .all(|error| error.expected() == Some(Expected::Statement))
    );
}

#[test]
fn test_lowercase_keywords_are_identifiers() {
    let analysis = analyze("select * from t");
    assert!(analysis.lexed.diagnostics.is_empty());
    assert!(analysis.lexed.symbol_table.contains("select"));
    assert!(analysis.lexed.symbol_table.contains("from"));
    assert!(analysis.parsed.tree.children().is_empty());
    assert_eq!(analysis.parsed.diagnostics.len(), 1);
}

#[test]
fn test_error_messages() {
    let analysis = analyze("SELECT a FROM 'users'");
    assert_eq!(
        analysis.parsed.diagnostics[0].to_string(),
        "Expected an identifier at line 1, column 15, but found ''users''"
    );

    let analysis = analyze("## open\nSELECT");
    assert_eq!(
        analysis.lexed.diagnostics[0].to_string(),
        "Unclosed comment starting at line 1, column 1"
    );
}

// =============================================================================
// Lexical properties
// =============================================================================

#[test]
fn test_unclosed_block_comment_contributes_nothing() {
    let analysis = analyze("SELECT * FROM t ## no end\n WHERE a = 1");
    assert_eq!(
        analysis.lexed.diagnostics.as_slice(),
        [LexicalError::UnclosedComment {
            position: Position::new(1, 17)
        }]
    );
    assert_eq!(analysis.lexed.tokens.len(), 4);
    assert!(analysis.parsed.diagnostics.is_empty());
}

#[test]
fn test_lexical_errors_do_not_block_parsing() {
    let analysis = analyze("SELECT a @ FROM t _x $");
    assert_eq!(analysis.lexed.diagnostics.len(), 3);
    assert!(analysis.parsed.diagnostics.is_empty());
    assert_eq!(analysis.parsed.tree.children()[0].children()[1].value(), Some("t"));
}

#[test]
fn test_reconstruction_drops_comments_and_rejected_input() {
    let source = "SELECT a, b -- columns\nFROM t ## table\n##  WHERE a >= 1.5 @";
    assert_eq!(
        reconstruct(source),
        ["SELECT a, b", "FROM t", "    WHERE a >= 1.5"]
    );
}

#[test]
fn test_reconstruction_of_clean_source_is_exact() {
    let source = "UPDATE t SET a = 'x y', b = b % 3 WHERE NOT (a <> 'z')";
    assert_eq!(reconstruct(source), [source]);
}

#[test]
fn test_symbol_counts_match_identifier_tokens() {
    let lexed = lex("SELECT a, b, a FROM t WHERE a = b OR c = a");
    for (name, entry) in lexed.symbol_table.iter() {
        let count = lexed
            .tokens
            .iter()
            .filter(|token| token.kind() == TokenKind::Identifier && token.lexeme() == name)
            .count();
        assert_eq!(entry.occurrences, count, "{name}");
    }
    assert_eq!(lexed.symbol_table.get("a").unwrap().occurrences, 4);
    let names: Vec<&str> = lexed.symbol_table.iter().map(|(name, _)| name).collect();
    assert_eq!(names, ["a", "b", "t", "c"]);
}

#[test]
fn test_kept_tokens_are_not_parsed() {
    let options = LexerOptions::default()
        .with_comments(true)
        .with_invalid(true);
    let analysis = analyze_with("-- header\nDELETE @ FROM t", options);
    let kinds: Vec<TokenKind> = analysis.lexed.tokens.iter().map(Token::kind).collect();
    assert_eq!(
        kinds,
        [
            TokenKind::Comment,
            TokenKind::Keyword,
            TokenKind::Invalid,
            TokenKind::Keyword,
            TokenKind::Identifier,
        ]
    );
    assert!(analysis.parsed.diagnostics.is_empty());
    assert_eq!(
        analysis.parsed.tree,
        analyze("-- header\nDELETE @ FROM t").parsed.tree
    );
}

#[test]
fn test_empty_and_blank_sources() {
    for source in ["", "   \n\t ", "-- only a comment", "## block ##"] {
        let analysis = analyze(source);
        assert!(!analysis.has_errors(), "{source:?}");
        assert!(analysis.lexed.tokens.is_empty());
        assert!(analysis.parsed.tree.children().is_empty());
    }
}

#[cfg(feature = "serde")]
#[test]
fn test_serialize_tree_and_symbols() {
    let analysis = analyze("DELETE FROM t");
    let tree = serde_json::to_value(&analysis.parsed.tree).unwrap();
    assert_eq!(tree["kind"], "PROGRAM");
    assert_eq!(tree["children"][0]["kind"], "DELETE_STMT");
    assert_eq!(tree["children"][0]["children"][0]["value"], "t");
    assert_eq!(tree["children"][0]["position"]["column"], 1);

    let symbols = serde_json::to_value(&analysis.lexed.symbol_table).unwrap();
    assert_eq!(symbols["t"]["occurrences"], 1);
    assert_eq!(symbols["t"]["first"]["line"], 1);
}

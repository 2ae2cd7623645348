#![cfg(not(tarpaulin_include))]

use querychat::highlight::{render, tokenize, SqlToken, TokenKind};

// Helper to rebuild the input from its tokens
fn rebuild(tokens: &[SqlToken]) -> String {
    tokens.iter().map(|t| t.text.as_str()).collect()
}

// Helper to check the kind assigned to one token text
fn assert_kind(sql: &str, text: &str, kind: TokenKind) {
    let tokens = tokenize(sql);
    let found = tokens.iter().find(|t| t.text == text);
    assert!(found.is_some(), "token {:?} not found in {:?}", text, sql);
    assert_eq!(found.unwrap().kind, kind, "token {:?} in {:?}", text, sql);
    println!("✓ {:?} classified as {:?}", text, kind);
}

fn test_classification() {
    println!("\n====== Testing token classification ======");
    let sql = "SELECT COUNT(*), \"region name\", 'east''s' FROM sales WHERE total > 10.5";
    assert_kind(sql, "SELECT", TokenKind::Keyword);
    assert_kind(sql, "FROM", TokenKind::Keyword);
    assert_kind(sql, "WHERE", TokenKind::Keyword);
    assert_kind(sql, "COUNT", TokenKind::Function);
    assert_kind(sql, "\"region name\"", TokenKind::QuotedIdentifier);
    assert_kind(sql, "'east''s'", TokenKind::StringLiteral);
    assert_kind(sql, "10.5", TokenKind::Number);
    assert_kind(sql, "sales", TokenKind::Other);
    assert_kind(sql, "*", TokenKind::Other);

    assert_kind("select lower(x) from t", "select", TokenKind::Keyword);
    assert_kind("SELECT 1 -- note\n", "-- note", TokenKind::Other);
    assert_kind("/* header */ SELECT 1", "/* header */", TokenKind::Other);
}

fn test_round_trip() {
    println!("\n====== Testing round-trip reconstruction ======");
    let inputs = [
        "",
        "SELECT * FROM t",
        "WITH x AS (SELECT 'a,b' AS v) SELECT v FROM x ORDER BY 1 DESC",
        "-- only a comment",
        "/* unterminated",
        "'unterminated literal",
        "\t mixed \r\n whitespace  and $#@ symbols",
        "SELECT d FROM \"weird\"\"name\"",
    ];
    for input in inputs {
        assert_eq!(rebuild(&tokenize(input)), input, "input: {:?}", input);
        println!("✓ Round trip holds for {:?}", input);
    }
}

fn test_rendering() {
    println!("\n====== Testing HTML rendering ======");
    let html = render("SELECT 'x<y' FROM t WHERE a > 1");
    assert!(html.contains("color:#2196f3"));
    assert!(html.contains("color:#4caf50"));
    assert!(html.contains("&lt;"));
    assert!(html.contains("&gt;"));
    assert!(!html.contains("<y"));
    println!("✓ Keywords and literals styled, markup escaped");

    assert_eq!(render(""), "");
    println!("✓ Empty input renders to empty output");
}

fn main() {
    println!("=== SQL Highlighter Test Suite ===");
    test_classification();
    test_round_trip();
    test_rendering();
    println!("\nAll tests completed.");
}

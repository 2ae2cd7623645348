#![cfg(not(tarpaulin_include))]

use querychat::reply::{extract_query, ParsedReply};

// Helper to check a parse result against the expected split
fn assert_parsed(input: &str, narrative: &str, query: &str) {
    let parsed = extract_query(input);
    assert_eq!(
        parsed,
        ParsedReply {
            narrative: narrative.to_string(),
            query: query.to_string(),
        },
        "input: {:?}",
        input
    );
    println!("✓ {:?} split as expected", input);
}

fn test_fenced_blocks() {
    println!("\n====== Testing fenced code blocks ======");
    assert_parsed(
        "Top customers below.\n```sql\nSELECT * FROM customers\n```",
        "Top customers below.",
        "SELECT * FROM customers",
    );
    assert_parsed("```\nSELECT 1\n```", "", "SELECT 1");
    assert_parsed(
        "Done.\n**Generated Query**:\n```SQL\nSELECT a\n```",
        "Done.",
        "SELECT a",
    );
}

fn test_markers() {
    println!("\n====== Testing explicit markers ======");
    assert_parsed(
        "Explanation here. Executed query: SELECT * FROM t",
        "Explanation here.",
        "SELECT * FROM t",
    );
    assert_parsed(
        "Summary first.\nGenerated Query - SELECT x FROM y",
        "Summary first.",
        "SELECT x FROM y",
    );
}

fn test_heuristic_and_fallback() {
    println!("\n====== Testing heuristic and fallback ======");
    assert_parsed(
        "Here is the result\nSELECT a FROM b",
        "Here is the result",
        "SELECT a FROM b",
    );
    assert_parsed(
        "Monthly totals:\n  with t as (select 1) select * from t",
        "Monthly totals:",
        "with t as (select 1) select * from t",
    );
    assert_parsed(
        "Just a plain answer with no query.",
        "Just a plain answer with no query.",
        "",
    );
    assert_parsed("", "", "");
    assert_parsed("   \n\t", "", "");
}

fn test_narrative_idempotence() {
    println!("\n====== Testing narrative idempotence ======");
    let inputs = [
        "Revenue grew.\n```sql\nSELECT 1\n```",
        "Numbers below. Executed query: SELECT * FROM t",
        "Here you go\nSELECT a FROM b",
    ];
    for input in inputs {
        let narrative = extract_query(input).narrative;
        assert_eq!(extract_query(&narrative).query, "");
        println!("✓ Reparsing narrative of {:?} finds no query", input);
    }
}

fn main() {
    println!("=== Reply Parser Test Suite ===");
    test_fenced_blocks();
    test_markers();
    test_heuristic_and_fallback();
    test_narrative_idempotence();
    println!("\nAll tests completed.");
}

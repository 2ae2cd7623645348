use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref CODE_BLOCK_REGEX: Regex = Regex::new(r"(?is)```(?:sql)?\s*(.*?)```").unwrap();
    static ref TRAILING_LABEL_REGEX: Regex =
        Regex::new(r"(?i)(\*\*|__)?(Generated Query|Executed query)(\*\*|__)?\s*[:\-–—]?\s*$")
            .unwrap();
    static ref MARKER_REGEX: Regex =
        Regex::new(r"(?i)(?:Executed query|Generated Query)\s*[:\-–—]\s*").unwrap();
    static ref SQL_START_REGEX: Regex =
        Regex::new(r"(?i)^\s*(SELECT|WITH RECURSIVE|WITH)\b").unwrap();
}

/// Result of splitting an assistant reply into prose and SQL.
///
/// `query` is the empty string when no SQL was detected; `narrative` is
/// always trimmed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedReply {
    pub narrative: String,
    pub query: String,
}

/// Split a raw assistant reply into a narrative portion and an embedded SQL query
///
/// The reply text coming back from the generation endpoint mixes free-form
/// prose with the query that was run. Detection strategies are tried in
/// strict priority order, first match wins:
///
/// 1. A fenced code block (```` ```sql ... ``` ````, language tag optional).
///    The block interior becomes the query; the block is removed from the
///    narrative and a trailing "Generated Query:" style label is stripped.
/// 2. An explicit "Executed query:" / "Generated Query -" marker; text
///    before is the narrative, text after is the query.
/// 3. A heuristic: the first line starting with SELECT or WITH begins the
///    query, everything above it is the narrative.
/// 4. Otherwise the whole reply is narrative and the query is empty.
///
/// This function never fails; malformed or absent SQL degrades to an empty
/// query.
///
/// # Arguments
/// * `text` - The raw reply text, possibly empty
///
/// # Returns
/// * `ParsedReply` - The narrative/query split, both trimmed
///
/// # Examples
/// ```
/// use querychat::reply::extract_query;
///
/// let parsed = extract_query("Revenue is up.\n```sql\nSELECT 1\n```");
/// assert_eq!(parsed.narrative, "Revenue is up.");
/// assert_eq!(parsed.query, "SELECT 1");
/// ```
pub fn extract_query(text: &str) -> ParsedReply {
    if text.is_empty() {
        return ParsedReply::default();
    }

    // 1. Fenced code block (e.g. ```sql ... ```)
    if let Some(caps) = CODE_BLOCK_REGEX.captures(text) {
        let whole = caps.get(0).unwrap();
        let query = caps.get(1).map(|m| m.as_str()).unwrap_or("").trim().to_string();

        // Remove the code block from the text to get the narrative
        let narrative = format!("{}{}", &text[..whole.start()], &text[whole.end()..]);
        let narrative = narrative.trim();

        // Clean up trailing labels like "**Generated Query**:" from the narrative
        let narrative = TRAILING_LABEL_REGEX.replace(narrative, "").trim().to_string();

        return ParsedReply { narrative, query };
    }

    // 2. Explicit text marker if no code block was found
    if let Some(m) = MARKER_REGEX.find(text) {
        return ParsedReply {
            narrative: text[..m.start()].trim().to_string(),
            query: text[m.end()..].trim().to_string(),
        };
    }

    // 3. Heuristic check for raw SQL starting on a new line
    let lines: Vec<&str> = text.lines().collect();
    if let Some(sql_start) = lines.iter().position(|l| SQL_START_REGEX.is_match(l)) {
        return ParsedReply {
            narrative: lines[..sql_start].join("\n").trim().to_string(),
            query: lines[sql_start..].join("\n").trim().to_string(),
        };
    }

    ParsedReply {
        narrative: text.trim().to_string(),
        query: String::new(),
    }
}

use serde::{Deserialize, Serialize};

/// Reserved words rendered in the keyword style.
const KEYWORDS: [&str; 38] = [
    "SELECT", "FROM", "WHERE", "GROUP", "BY", "ORDER", "HAVING", "AS", "AND", "OR", "NOT", "IN",
    "ON", "JOIN", "LEFT", "RIGHT", "INNER", "OUTER", "LIMIT", "OFFSET", "DISTINCT", "WITH",
    "UNION", "ALL", "CASE", "WHEN", "THEN", "ELSE", "END", "IS", "NULL", "BETWEEN", "LIKE",
    "ILIKE", "TRUE", "FALSE", "OVER", "PARTITION",
];

/// Built-in function names rendered in the function style.
const FUNCTIONS: [&str; 16] = [
    "AVG", "COUNT", "SUM", "MIN", "MAX", "ROUND", "CAST", "COALESCE", "DATE_TRUNC", "EXTRACT",
    "TO_CHAR", "LAG", "LEAD", "DENSE_RANK", "ROW_NUMBER", "NTILE",
];

/// Single punctuation characters recognized as their own token.
const PUNCTUATION: [char; 12] = ['(', ')', ',', ';', '=', '<', '>', ':', '+', '-', '*', '/'];

/// Presentational category of a span of SQL text.
///
/// Classification never alters content; comments, whitespace and anything
/// unrecognized are carried through as `Other`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenKind {
    StringLiteral,
    QuotedIdentifier,
    Number,
    Keyword,
    Function,
    Other,
}

/// A contiguous span of the input with its classification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqlToken {
    pub text: String,
    pub kind: TokenKind,
}

impl SqlToken {
    fn new(text: &str, kind: TokenKind) -> Self {
        SqlToken {
            text: text.to_string(),
            kind,
        }
    }
}

/// Tokenize a SQL string into classified spans
///
/// A single left-to-right scan, longest match first at each position:
/// comments, quoted literals (with `''` / `""` escaping), numbers, words,
/// punctuation, then a single-character fallback. Concatenating the token
/// texts in order reproduces the input byte-for-byte; whitespace and
/// comments come through verbatim as `Other` tokens.
///
/// An unterminated quoted literal runs to the end of the input and keeps
/// its literal kind, so the scan always terminates and never loses input.
///
/// # Arguments
/// * `sql` - The SQL text to tokenize, possibly empty
///
/// # Returns
/// * `Vec<SqlToken>` - The classified spans in input order
///
/// # Examples
/// ```
/// use querychat::highlight::{tokenize, TokenKind};
///
/// let tokens = tokenize("SELECT * FROM t");
/// assert_eq!(tokens[0].kind, TokenKind::Keyword);
/// let rebuilt: String = tokens.iter().map(|t| t.text.as_str()).collect();
/// assert_eq!(rebuilt, "SELECT * FROM t");
/// ```
pub fn tokenize(sql: &str) -> Vec<SqlToken> {
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < sql.len() {
        let rest = &sql[pos..];
        let c = rest.chars().next().unwrap();

        let token = if rest.starts_with("/*") {
            // Block comment - runs to the closing */ or end of input
            let len = rest.find("*/").map(|i| i + 2).unwrap_or(rest.len());
            SqlToken::new(&rest[..len], TokenKind::Other)
        } else if rest.starts_with("--") {
            // Line comment - the newline itself is not part of the token
            let len = rest.find('\n').unwrap_or(rest.len());
            SqlToken::new(&rest[..len], TokenKind::Other)
        } else if c == '\'' {
            let len = scan_quoted(rest, '\'');
            SqlToken::new(&rest[..len], TokenKind::StringLiteral)
        } else if c == '"' {
            let len = scan_quoted(rest, '"');
            SqlToken::new(&rest[..len], TokenKind::QuotedIdentifier)
        } else if c.is_ascii_digit() {
            let len = scan_number(rest);
            SqlToken::new(&rest[..len], TokenKind::Number)
        } else if c.is_ascii_alphabetic() || c == '_' {
            let len = rest
                .find(|ch: char| !ch.is_ascii_alphanumeric() && ch != '_')
                .unwrap_or(rest.len());
            let word = &rest[..len];
            SqlToken::new(word, classify_word(word))
        } else if PUNCTUATION.contains(&c) {
            SqlToken::new(&rest[..1], TokenKind::Other)
        } else {
            // Anything else (whitespace included) passes through one
            // character at a time
            SqlToken::new(&rest[..c.len_utf8()], TokenKind::Other)
        };

        pos += token.text.len();
        tokens.push(token);
    }

    tokens
}

// Scan a quoted run starting at the opening quote. A doubled quote is an
// escape, not a terminator. Returns the byte length including both quotes,
// or through end of input when unterminated.
fn scan_quoted(rest: &str, quote: char) -> usize {
    let mut chars = rest.char_indices().skip(1).peekable();

    while let Some((i, c)) = chars.next() {
        if c == quote {
            if let Some(&(_, next)) = chars.peek() {
                if next == quote {
                    chars.next();
                    continue;
                }
            }
            return i + c.len_utf8();
        }
    }

    rest.len()
}

// Scan an integer or decimal literal: digits, optionally one '.' followed
// by at least one digit. "1." stops after the "1".
fn scan_number(rest: &str) -> usize {
    fn digits(s: &str) -> usize {
        s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len())
    }

    let mut len = digits(rest);
    let after = &rest[len..];
    if let Some(frac) = after.strip_prefix('.') {
        let frac_len = digits(frac);
        if frac_len > 0 {
            len += 1 + frac_len;
        }
    }
    len
}

fn classify_word(word: &str) -> TokenKind {
    let upper = word.to_uppercase();
    if KEYWORDS.contains(&upper.as_str()) {
        TokenKind::Keyword
    } else if FUNCTIONS.contains(&upper.as_str()) {
        TokenKind::Function
    } else {
        TokenKind::Other
    }
}

/// Escape the characters that are unsafe inside an HTML fragment
///
/// Only `&`, `<` and `>` are rewritten; everything else is copied through.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Render a SQL string as a syntax-highlighted HTML fragment
///
/// Each token becomes a styled `<span>` (or plain escaped text for `Other`
/// tokens) using the client's editor palette. The output is intended for a
/// trusted rendering context; any sanitization beyond the escaping done
/// here is the caller's concern.
///
/// # Arguments
/// * `sql` - The SQL text to highlight
///
/// # Returns
/// * `String` - The HTML fragment; empty input yields an empty string
pub fn render(sql: &str) -> String {
    let mut out = String::new();

    for token in tokenize(sql) {
        let escaped = escape_html(&token.text);
        match token.kind {
            TokenKind::StringLiteral => {
                out.push_str(&format!("<span style=\"color:#4caf50\">{}</span>", escaped));
            }
            TokenKind::QuotedIdentifier => {
                out.push_str(&format!("<span style=\"color:#f44336\">{}</span>", escaped));
            }
            TokenKind::Number => {
                out.push_str(&format!("<span style=\"color:#ff9800\">{}</span>", escaped));
            }
            TokenKind::Keyword => {
                out.push_str(&format!(
                    "<span style=\"color:#2196f3; font-weight:bold\">{}</span>",
                    escaped
                ));
            }
            TokenKind::Function => {
                out.push_str(&format!(
                    "<span style=\"color:#9c27b0; font-weight:bold\">{}</span>",
                    escaped
                ));
            }
            TokenKind::Other => out.push_str(&escaped),
        }
    }

    out
}

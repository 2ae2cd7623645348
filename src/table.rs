use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::error::Error;

/// How a JSON field behaves during flattening.
///
/// Only `NestedObject` values are descended into; arrays, date-shaped
/// strings and plain scalars stay as single leaf values under their key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueKind {
    Scalar,
    Array,
    DateLike,
    NestedObject,
}

/// Classify a JSON value for the flattening step
///
/// Deciding whether to recurse is done through this single explicit check
/// rather than ad hoc type tests scattered through the algorithm.
pub fn classify_value(value: &Value) -> ValueKind {
    match value {
        Value::Object(_) => ValueKind::NestedObject,
        Value::Array(_) => ValueKind::Array,
        Value::String(s) if is_date_like(s) => ValueKind::DateLike,
        _ => ValueKind::Scalar,
    }
}

// Timestamp-shaped strings are leaves. RFC 3339 and bare YYYY-MM-DD both
// count.
fn is_date_like(s: &str) -> bool {
    chrono::DateTime::parse_from_rfc3339(s).is_ok()
        || chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
        || chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").is_ok()
}

/// One input row flattened to a single level of dot-joined keys.
///
/// `original_index` is the row's position in the untouched input sequence.
/// It is assigned once, before any filtering or sorting, and is the stable
/// identity used for selection and export regardless of how the visible
/// order changes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlattenedRow {
    pub original_index: usize,
    pub values: Map<String, Value>,
}

impl FlattenedRow {
    /// Value stored under a flattened column, if any.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values.get(column)
    }

    /// String form of a column value as shown in a table cell.
    ///
    /// Strings come back without JSON quoting; null and missing values are
    /// the empty string.
    pub fn display(&self, column: &str) -> String {
        match self.values.get(column) {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        }
    }
}

/// Flatten a sequence of JSON rows into single-level rows and a column set
///
/// Nested objects are descended into with their key paths joined by `.`;
/// arrays, date-shaped strings and scalars are kept whole. Each flattened
/// row carries `original_index` = its 0-based position in the input. The
/// returned column set is the union of all leaf key paths in first-seen
/// order.
///
/// Rows that are not JSON objects flatten to an empty value map rather than
/// failing.
///
/// # Arguments
/// * `rows` - The JSON-decoded rows, in source order
///
/// # Returns
/// * `(Vec<FlattenedRow>, Vec<String>)` - The flattened rows and the ordered column set
///
/// # Examples
/// ```
/// use querychat::table::flatten_rows;
/// use serde_json::json;
///
/// let rows = vec![json!({"id": 1, "customer": {"name": "Ada"}})];
/// let (flat, columns) = flatten_rows(&rows);
/// assert_eq!(columns, vec!["id", "customer.name"]);
/// assert_eq!(flat[0].display("customer.name"), "Ada");
/// ```
pub fn flatten_rows(rows: &[Value]) -> (Vec<FlattenedRow>, Vec<String>) {
    let mut flattened = Vec::with_capacity(rows.len());
    let mut columns: Vec<String> = Vec::new();

    for (index, row) in rows.iter().enumerate() {
        let mut values = Map::new();
        flatten_into(row, "", &mut values);

        for key in values.keys() {
            if !columns.iter().any(|c| c == key) {
                columns.push(key.clone());
            }
        }

        flattened.push(FlattenedRow {
            original_index: index,
            values,
        });
    }

    (flattened, columns)
}

fn flatten_into(value: &Value, prefix: &str, out: &mut Map<String, Value>) {
    if let Value::Object(map) = value {
        for (key, child) in map {
            let path = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{}.{}", prefix, key)
            };

            match classify_value(child) {
                ValueKind::NestedObject => flatten_into(child, &path, out),
                _ => {
                    out.insert(path, child.clone());
                }
            }
        }
    }
}

/// Keep the rows where any column matches the search text
///
/// Matching is a case-insensitive substring test against the display string
/// of every column (null and missing values read as empty). An empty or
/// whitespace-only query passes every row through unchanged; the output is
/// always an order-preserving subsequence of the input.
pub fn filter_rows(rows: &[FlattenedRow], columns: &[String], query: &str) -> Vec<FlattenedRow> {
    if query.trim().is_empty() {
        return rows.to_vec();
    }

    let needle = query.to_lowercase();
    rows.iter()
        .filter(|row| {
            columns
                .iter()
                .any(|col| row.display(col).to_lowercase().contains(&needle))
        })
        .cloned()
        .collect()
}

/// Sort direction for a table column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Reorder rows by one column
///
/// With no sort key the input order is returned untouched. Otherwise two
/// rows compare numerically when both display values fully parse as `f64`,
/// and as strings in every other case (missing values compare as the empty
/// string). `Descending` reverses the comparator. The sort is stable, so
/// rows with equal keys keep their relative input order in both directions.
///
/// # Arguments
/// * `rows` - The rows to reorder (typically the filtered set)
/// * `key` - The column to sort by, or `None` for input order
/// * `direction` - Ascending or descending
///
/// # Returns
/// * `Vec<FlattenedRow>` - A freshly ordered copy; the input is not mutated
pub fn sort_rows(
    rows: &[FlattenedRow],
    key: Option<&str>,
    direction: SortDirection,
) -> Vec<FlattenedRow> {
    let Some(key) = key else {
        return rows.to_vec();
    };

    let mut sorted = rows.to_vec();
    sorted.sort_by(|a, b| {
        let lhs = a.display(key);
        let rhs = b.display(key);
        let ordering = compare_cells(&lhs, &rhs);
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
    sorted
}

// Numeric when both sides are fully numeric, string comparison otherwise.
// A failed parse can never raise; it just forces the string path.
fn compare_cells(lhs: &str, rhs: &str) -> Ordering {
    if let (Ok(a), Ok(b)) = (lhs.parse::<f64>(), rhs.parse::<f64>()) {
        a.partial_cmp(&b).unwrap_or(Ordering::Equal)
    } else {
        lhs.cmp(rhs)
    }
}

/// Slice out one fixed-size page of rows
///
/// `page_index` is zero-based. A page past the end of the data, or a zero
/// page size, yields an empty page rather than an error.
pub fn paginate(rows: &[FlattenedRow], page_index: usize, page_size: usize) -> Vec<FlattenedRow> {
    let start = page_index.saturating_mul(page_size);
    if page_size == 0 || start >= rows.len() {
        return Vec::new();
    }
    let end = (start + page_size).min(rows.len());
    rows[start..end].to_vec()
}

/// Serialize rows to CSV text
///
/// The first line holds the column names; each row follows with its cells
/// in column order. A field containing a comma, double quote or newline is
/// wrapped in double quotes with internal quotes doubled; null and missing
/// values become empty fields. Lines are joined with `\n` and there is no
/// trailing newline, so an empty row set produces just the header line.
///
/// # Arguments
/// * `rows` - The rows to export (filtered/sorted/selected, caller's choice)
/// * `columns` - The column order for the header and every row
///
/// # Returns
/// * `String` - The CSV text, ready to be offered as a `.csv` download
///
/// # Examples
/// ```
/// use querychat::table::{flatten_rows, to_csv};
/// use serde_json::json;
///
/// let (rows, columns) = flatten_rows(&[json!({"a": "He said \"hi\", bye"})]);
/// assert_eq!(to_csv(&rows, &columns), "a\n\"He said \"\"hi\"\", bye\"");
/// ```
pub fn to_csv(rows: &[FlattenedRow], columns: &[String]) -> String {
    let mut csv = String::new();

    for (i, col) in columns.iter().enumerate() {
        if i > 0 {
            csv.push(',');
        }
        csv.push_str(&csv_escape(col));
    }

    for row in rows {
        csv.push('\n');
        for (i, col) in columns.iter().enumerate() {
            if i > 0 {
                csv.push(',');
            }
            csv.push_str(&csv_escape(&row.display(col)));
        }
    }

    csv
}

// Quote a field only when it needs it, doubling any internal quotes.
fn csv_escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Decode a backend row payload into a vector of JSON rows
///
/// The chat and preview endpoints return row data in several shapes: a JSON
/// array, a single object, or a string containing either. Strings are
/// parsed, lone objects are wrapped in a one-element vector, arrays pass
/// through, and null or blank payloads decode to no rows.
///
/// # Arguments
/// * `payload` - The `raw_data` / `table_data` field of a response body
///
/// # Returns
/// * `Result<Vec<Value>, Box<dyn Error>>` - The rows, or a JSON parse error
pub fn decode_rows(payload: &Value) -> Result<Vec<Value>, Box<dyn Error>> {
    match payload {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => Ok(items.clone()),
        Value::String(text) => {
            if text.trim().is_empty() {
                return Ok(Vec::new());
            }
            let decoded: Value = serde_json::from_str(text)?;
            match decoded {
                Value::Array(items) => Ok(items),
                other => Ok(vec![other]),
            }
        }
        other => Ok(vec![other.clone()]),
    }
}

/// Pick the rows to export
///
/// A selected-only export draws from the full flattened set (input order)
/// restricted to the selection; otherwise the currently visible
/// filtered-and-sorted rows are exported as they stand.
///
/// # Arguments
/// * `all` - Every flattened row, in input order
/// * `visible` - The filtered and sorted rows currently shown
/// * `selection` - Selected `original_index` values
/// * `selected_only` - Whether to restrict the export to the selection
pub fn rows_for_export(
    all: &[FlattenedRow],
    visible: &[FlattenedRow],
    selection: &BTreeSet<usize>,
    selected_only: bool,
) -> Vec<FlattenedRow> {
    if selected_only {
        all.iter()
            .filter(|row| selection.contains(&row.original_index))
            .cloned()
            .collect()
    } else {
        visible.to_vec()
    }
}

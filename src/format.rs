/// Magnitude steps for compact display.
const SI_STEPS: [(f64, &str); 4] = [(1e12, "T"), (1e9, "B"), (1e6, "M"), (1e3, "K")];

/// Format a raw cell value as a compact human-readable number
///
/// KPI cards and table cells receive values like `"$1,234,567"`, `"12.5%"`
/// or plain numbers. Percentages come back untouched, a leading `$` is
/// preserved as a prefix, and currency symbols, commas and whitespace are
/// stripped before parsing. Anything that does not fully parse as a number
/// is returned unchanged.
///
/// # Arguments
/// * `raw` - The value as received from the backend
///
/// # Returns
/// * `String` - The compact form, e.g. `"$1.23M"`, or the input verbatim
///
/// # Examples
/// ```
/// use querychat::format::format_number;
///
/// assert_eq!(format_number("$1,234,567"), "$1.23M");
/// assert_eq!(format_number("12.5%"), "12.5%");
/// assert_eq!(format_number("n/a"), "n/a");
/// ```
pub fn format_number(raw: &str) -> String {
    // Don't format percentages
    if raw.ends_with('%') {
        return raw.to_string();
    }

    let prefix = if raw.starts_with('$') { "$" } else { "" };

    // Strip currency symbols, commas, and whitespace
    let cleaned: String = raw
        .chars()
        .filter(|c| *c != '$' && *c != ',' && !c.is_whitespace())
        .collect();

    match cleaned.parse::<f64>() {
        Ok(num) => format!("{}{}", prefix, format_f64(num)),
        Err(_) => raw.to_string(),
    }
}

/// Format a number compactly, scaling thousands and above to K/M/B/T
///
/// Values under 1000 in magnitude keep at most two decimal places; larger
/// values are divided down to the biggest fitting step and rendered with
/// two decimals, trailing zeros trimmed.
pub fn format_f64(num: f64) -> String {
    if num.abs() < 1000.0 {
        return trim_trailing_zeros(&format!("{:.2}", num));
    }

    for (value, symbol) in SI_STEPS {
        if num.abs() >= value {
            return format!("{}{}", trim_trailing_zeros(&format!("{:.2}", num / value)), symbol);
        }
    }

    trim_trailing_zeros(&format!("{:.2}", num))
}

// "1.50" -> "1.5", "2.00" -> "2"; integers without a point are untouched.
fn trim_trailing_zeros(s: &str) -> String {
    if !s.contains('.') {
        return s.to_string();
    }
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

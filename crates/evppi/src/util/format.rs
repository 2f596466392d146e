/// Format a value with thousands separators and a fixed number of decimals
pub fn format_thousands(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let formatted = format!("{:.*}", decimals, value.abs());
    let (whole, frac) = match formatted.split_once('.') {
        Some((w, f)) => (w, Some(f)),
        None => (formatted.as_str(), None),
    };

    // Add thousands separators
    let mut result = String::new();
    for (i, c) in whole.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    let whole: String = result.chars().rev().collect();

    let sign = if value < 0.0 && formatted.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };
    match frac {
        Some(frac) => format!("{sign}{whole}.{frac}"),
        None => format!("{sign}{whole}"),
    }
}

/// Format an EVPPI percentage for a table cell
pub fn format_percent(value: f64) -> String {
    format!("{value:.1}%")
}

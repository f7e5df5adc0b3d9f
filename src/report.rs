//! Number formatting for reports

/// Insert thousands separators into the integer part of a plain decimal string
fn group_thousands(digits: &str) -> String {
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    match frac_part {
        Some(f) => format!("{}.{}", grouped, f),
        None => grouped,
    }
}

/// `15230.55` -> `15,230.55`
pub fn format_number(x: f64) -> String {
    if !x.is_finite() {
        return "N/A".to_string();
    }
    let s = format!("{:.2}", x.abs());
    let sign = if x < 0.0 && s != "0.00" { "-" } else { "" };
    format!("{}{}", sign, group_thousands(&s))
}

/// `-1234.5` -> `-$1,234.50`
pub fn format_currency(x: f64) -> String {
    if !x.is_finite() {
        return "N/A".to_string();
    }
    let body = format_number(x.abs());
    if x < 0.0 && body != "0.00" {
        format!("-${}", body)
    } else {
        format!("${}", body)
    }
}

/// Abbreviate large values: `1_530_000_000` -> `1.53B`
pub fn format_large(x: f64) -> String {
    if !x.is_finite() {
        return "N/A".to_string();
    }
    let abs = x.abs();
    if abs >= 1e9 {
        format!("{:.2}B", x / 1e9)
    } else if abs >= 1e6 {
        format!("{:.2}M", x / 1e6)
    } else if abs >= 1e3 {
        format!("{:.2}K", x / 1e3)
    } else {
        format!("{:.2}", x)
    }
}

/// Rate as a percentage: `0.1234` -> `12.34%`
pub fn format_percent(rate: f64) -> String {
    if !rate.is_finite() {
        return "N/A".to_string();
    }
    format!("{:.2}%", rate * 100.0)
}

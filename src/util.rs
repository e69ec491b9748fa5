// Formatting and ordering helpers shared by the index, the exports and the
// console front end.
use num_format::{Locale, ToFormattedString};
use std::cmp::Ordering;

/// Order year keys the way a reader expects them.
///
/// Keys that both parse as integers compare numerically so that `"999"`
/// sorts before `"2011"`; anything else falls back to plain text order.
pub fn compare_years(a: &str, b: &str) -> Ordering {
    match (a.trim().parse::<i64>(), b.trim().parse::<i64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        _ => a.cmp(b),
    }
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Fixed decimals plus `1,234,567.89` style separators on the integer part.
    let neg = n.is_sign_negative() && n != 0.0;
    let abs_n = n.abs();
    let s = format!("{:.*}", decimals, abs_n);
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    let int_val: i64 = int_part.parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = frac_part {
        if decimals > 0 {
            res.push('.');
            res.push_str(frac);
        }
    } else if decimals > 0 {
        res.push('.');
        res.push_str(&"0".repeat(decimals));
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

/// Dataset values are mostly whole thousands; only show decimals when present.
pub fn format_value(n: f64) -> String {
    if n.fract() == 0.0 {
        return format_number(n, 0);
    }
    let s = format_number(n, 2);
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

/// Convert a thousand-NTD amount to the ten-thousand unit used in legend labels.
pub fn format_ten_thousand(n: f64) -> String {
    format_value(n / 10.0)
}

pub fn format_optional(n: Option<f64>) -> String {
    n.map(format_value).unwrap_or_else(|| "-".to_string())
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}

/// Whether `name` can be used as one path component of an export file name.
///
/// Only ASCII letters, digits, `-` and `_` are accepted, so separators,
/// `..` and drive prefixes never reach the file system.
pub fn is_safe_file_component(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn years_compare_numerically_when_possible() {
        assert_eq!(compare_years("999", "2011"), Ordering::Less);
        assert_eq!(compare_years("2011", "2022"), Ordering::Less);
        assert_eq!(compare_years("2022", "2022"), Ordering::Equal);
        assert_eq!(compare_years("2022", "draft"), Ordering::Less);
    }

    #[test]
    fn format_number_inserts_separators() {
        assert_eq!(format_number(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_number(-1500.0, 0), "-1,500");
        assert_eq!(format_number(0.0, 1), "0.0");
    }

    #[test]
    fn format_value_drops_trailing_zeros() {
        assert_eq!(format_value(512.0), "512");
        assert_eq!(format_value(1512.5), "1,512.5");
        assert_eq!(format_value(0.83), "0.83");
    }

    #[test]
    fn ten_thousand_unit() {
        assert_eq!(format_ten_thousand(300.0), "30");
        assert_eq!(format_ten_thousand(1500.0), "150");
        assert_eq!(format_ten_thousand(0.0), "0");
    }

    #[test]
    fn optional_values_render_a_dash() {
        assert_eq!(format_optional(None), "-");
        assert_eq!(format_optional(Some(42.0)), "42");
    }

    #[test]
    fn format_int_groups_thousands() {
        assert_eq!(format_int(7_953usize), "7,953");
    }

    #[test]
    fn export_names_reject_path_parts() {
        assert!(is_safe_file_component("67000350032"));
        assert!(is_safe_file_component("A-1_b"));
        assert!(!is_safe_file_component(""));
        assert!(!is_safe_file_component(".."));
        assert!(!is_safe_file_component("../etc/passwd"));
        assert!(!is_safe_file_component("a/b"));
        assert!(!is_safe_file_component("a\\b"));
        assert!(!is_safe_file_component("C:x"));
    }
}

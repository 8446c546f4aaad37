//! Amount arithmetic for the order flow.
//!
//! Amounts travel as decimal strings and are parsed as `f64`. The total is
//! rendered with two decimals.

/// Price of every burger on the menu.
pub const BASE_AMOUNT: &str = "700";

/// Parse a user- or state-supplied amount. Empty, non-numeric and
/// non-finite input (`NaN`, `inf`) yield `None`.
pub fn parse_amount(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// `base + extra`, formatted to two decimal places.
pub fn format_total(base: f64, extra: f64) -> String {
    format!("{:.2}", base + extra)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_integers_decimals_and_negatives() {
        assert_eq!(parse_amount("0"), Some(0.0));
        assert_eq!(parse_amount("10"), Some(10.0));
        assert_eq!(parse_amount("12.50"), Some(12.5));
        assert_eq!(parse_amount("-3.25"), Some(-3.25));
        assert_eq!(parse_amount(".5"), Some(0.5));
    }

    #[test]
    fn rejects_non_numbers() {
        for raw in ["", "abc", "12,50", "$10", " 10", "10 ", "1e", "NaN", "inf", "-infinity"] {
            assert_eq!(parse_amount(raw), None, "input {raw:?}");
        }
    }

    #[test]
    fn base_amount_parses() {
        assert_eq!(parse_amount(BASE_AMOUNT), Some(700.0));
    }

    #[test]
    fn total_is_formatted_to_two_decimals() {
        assert_eq!(format_total(700.0, 12.5), "712.50");
        assert_eq!(format_total(700.0, 10.0), "710.00");
        assert_eq!(format_total(700.0, 0.0), "700.00");
        assert_eq!(format_total(700.0, -0.5), "699.50");
        assert_eq!(format_total(700.0, 0.333), "700.33");
    }
}

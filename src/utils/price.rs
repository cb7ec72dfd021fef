/// Format a dollar amount: whole numbers without decimals, otherwise two.
pub fn format_price(amount: f64) -> String {
    if !amount.is_finite() {
        return "$0".into();
    }
    let cents = (amount * 100.0).round();
    if cents % 100.0 == 0.0 {
        format!("${}", (cents / 100.0) as i64)
    } else {
        format!("${:.2}", cents / 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_amount_has_no_decimals() {
        assert_eq!(format_price(150.0), "$150");
        assert_eq!(format_price(0.0), "$0");
    }

    #[test]
    fn test_fractional_amount_rounds_to_cents() {
        assert_eq!(format_price(49.99 * 3.0), "$149.97");
        assert_eq!(format_price(12.5), "$12.50");
    }

    #[test]
    fn test_non_finite_amount() {
        assert_eq!(format_price(f64::NAN), "$0");
    }
}

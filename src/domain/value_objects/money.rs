/// Converts a decimal amount into minor units (cents), rounding to the nearest cent.
/// Returns `None` for non-finite, non-positive or absurdly large values.
pub fn to_minor_units(amount: f64) -> Option<i64> {
    if !amount.is_finite() || amount <= 0.0 {
        return None;
    }

    let minor = (amount * 100.0).round();
    if minor < 1.0 || minor > i64::MAX as f64 / 2.0 {
        return None;
    }

    Some(minor as i64)
}

/// Formats minor units with exactly two decimals and no grouping, e.g. `150000 -> "1500.00"`.
pub fn format_minor_units(amount_minor: i64) -> String {
    let sign = if amount_minor < 0 { "-" } else { "" };
    let abs = amount_minor.unsigned_abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_and_formats_two_decimals() {
        assert_eq!(to_minor_units(1500.0), Some(150_000));
        assert_eq!(to_minor_units(19.999), Some(2_000));
        assert_eq!(format_minor_units(150_000), "1500.00");
        assert_eq!(format_minor_units(5), "0.05");
        assert_eq!(format_minor_units(1_234_567), "12345.67");
    }

    #[test]
    fn rejects_invalid_amounts() {
        assert_eq!(to_minor_units(0.0), None);
        assert_eq!(to_minor_units(-10.0), None);
        assert_eq!(to_minor_units(0.001), None);
        assert_eq!(to_minor_units(f64::NAN), None);
        assert_eq!(to_minor_units(f64::INFINITY), None);
    }
}

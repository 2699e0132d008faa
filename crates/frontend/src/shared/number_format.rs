//! Amount formatting for the storefront (es-CO: "50.000,00")

/// Format with '.' as thousands separator and ',' before the decimals
pub fn format_number_with_decimals(value: f64, decimals: u8) -> String {
    let formatted = format!("{:.*}", decimals as usize, value);

    let (integer_part, decimal_part) = match formatted.split_once('.') {
        Some((i, d)) => (i, Some(d)),
        None => (formatted.as_str(), None),
    };
    let (sign, digits) = match integer_part.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", integer_part),
    };

    // Group digits by three from the right
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    match decimal_part {
        Some(d) => format!("{}{},{}", sign, grouped, d),
        None => format!("{}{}", sign, grouped),
    }
}

/// Money amount with currency code, e.g. "$ 50.000,00 COP"
pub fn format_money(value: f64, currency: &str) -> String {
    format!("$ {} {}", format_number_with_decimals(value, 2), currency)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number_with_decimals() {
        assert_eq!(format_number_with_decimals(1234.567, 0), "1.235");
        assert_eq!(format_number_with_decimals(1234.567, 2), "1.234,57");
        assert_eq!(format_number_with_decimals(1234567.0, 0), "1.234.567");
        assert_eq!(format_number_with_decimals(999.0, 0), "999");
        assert_eq!(format_number_with_decimals(-1234.5, 1), "-1.234,5");
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(50000.0, "COP"), "$ 50.000,00 COP");
        assert_eq!(format_money(0.0, "USD"), "$ 0,00 USD");
    }
}

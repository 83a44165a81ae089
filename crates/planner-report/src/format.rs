//! 數值與文字格式化

use rust_decimal::{Decimal, RoundingStrategy};

/// 千分位格式，固定小數位數
pub fn format_thousands(value: Decimal, decimal_places: u32) -> String {
    let rounded = value.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointNearestEven);
    let text = format!("{:.*}", decimal_places as usize, rounded.abs());

    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(text.len() + int_part.len() / 3 + 1);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        grouped.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }
    grouped
}

/// 公斤數顯示
pub fn format_kg(value: Decimal, decimal_places: u32) -> String {
    format!("{} Kg", format_thousands(value, decimal_places))
}

/// HTML 跳脫
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Decimal::ZERO, 1, "0.0")]
    #[case(Decimal::from(999), 1, "999.0")]
    #[case(Decimal::from(1000), 1, "1,000.0")]
    #[case(Decimal::new(12345675, 4), 4, "1,234.5675")]
    #[case(Decimal::from(1234567), 0, "1,234,567")]
    #[case(Decimal::new(-12500, 1), 1, "-1,250.0")]
    #[case(Decimal::new(125, 2), 1, "1.2")]
    fn test_format_thousands(#[case] value: Decimal, #[case] dp: u32, #[case] expected: &str) {
        assert_eq!(format_thousands(value, dp), expected);
    }

    #[test]
    fn test_format_kg() {
        assert_eq!(format_kg(Decimal::from(2500), 1), "2,500.0 Kg");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("FG<A> & \"B\""), "FG&lt;A&gt; &amp; &quot;B&quot;");
    }
}

//! Render-time formatting helpers. The engine never formats its numbers.

/// Formats an amount as US dollars with thousands separators and two decimals,
/// e.g. `-$1,234.50`. Non-finite values render as `$0.00`.
pub fn format_currency(value: f64) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    let fixed = format!("{:.2}", value.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}${}.{cents}", group_thousands(whole))
}

/// Formats a plain number with exactly two decimals.
pub fn format_fixed2(value: f64) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    format!("{value:.2}")
}

/// `monthly_invoice_volume` -> `Monthly Invoice Volume`.
pub fn humanize_key(key: &str) -> String {
    key.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_groups_thousands_and_keeps_two_decimals() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(200.0), "$200.00");
        assert_eq!(format_currency(2666.666666), "$2,666.67");
        assert_eq!(format_currency(1234567.891), "$1,234,567.89");
    }

    #[test]
    fn currency_puts_the_sign_before_the_symbol() {
        assert_eq!(format_currency(-700.0), "-$700.00");
        assert_eq!(format_currency(-13400.0), "-$13,400.00");
    }

    #[test]
    fn currency_drops_the_sign_of_values_rounding_to_zero() {
        assert_eq!(format_currency(-0.001), "$0.00");
        assert_eq!(format_currency(f64::NAN), "$0.00");
    }

    #[test]
    fn fixed2_rounds() {
        assert_eq!(format_fixed2(133.333333), "133.33");
        assert_eq!(format_fixed2(-2.948), "-2.95");
        assert_eq!(format_fixed2(5.0), "5.00");
    }

    #[test]
    fn humanize_capitalizes_each_word() {
        assert_eq!(humanize_key("monthly_invoice_volume"), "Monthly Invoice Volume");
        assert_eq!(humanize_key("num_ap_staff"), "Num Ap Staff");
        assert_eq!(humanize_key("error_rate_manual"), "Error Rate Manual");
    }
}

//! Number formatting for board cells, `en-US` style grouping.

const GROUP_SEPARATOR: char = ',';

/// Groups thousands and rounds to at most `max_fraction_digits`, dropping
/// trailing zeros: `"1234567.891"` -> `"1,234,567.89"`.
///
/// Text that is not a finite number is returned unchanged.
pub fn group_number(text: &str, max_fraction_digits: usize) -> String {
    let Some(value) = parse_number(text) else {
        return text.to_string();
    };

    let fixed = format!("{value:.max_fraction_digits$}");
    let (sign, unsigned) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed.as_str()),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((integer, fraction)) => (integer, fraction.trim_end_matches('0')),
        None => (unsigned, ""),
    };

    let mut grouped = String::with_capacity(fixed.len() + integer.len() / 3);
    grouped.push_str(sign);
    for (position, digit) in integer.chars().enumerate() {
        if position > 0 && (integer.len() - position) % 3 == 0 {
            grouped.push(GROUP_SEPARATOR);
        }
        grouped.push(digit);
    }
    if !fraction.is_empty() {
        grouped.push('.');
        grouped.push_str(fraction);
    }
    grouped
}

/// Volume cell: at most two fraction digits.
pub fn format_volume(text: &str) -> String {
    group_number(text, 2)
}

/// Price cell: locale default of at most three fraction digits.
pub fn format_price(text: &str) -> String {
    group_number(text, 3)
}

/// Parses a cell back to a number, ignoring group separators.
pub fn parse_number(text: &str) -> Option<f64> {
    let cleaned: String = text.trim().chars().filter(|c| *c != GROUP_SEPARATOR).collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|value| value.is_finite())
}

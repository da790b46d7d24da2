//! 24h change of a market, derived from the current quote and the day open.

/// Text returned whenever the change cannot be computed.
pub const ZERO_CHANGE: &str = "0.00";

/// Percentage change of the mid price against `open`, with two decimals.
///
/// Returns [`ZERO_CHANGE`] if any input is absent or empty, does not parse as
/// a finite number, or `open` is zero.
pub fn compute_change(ask: Option<&str>, bid: Option<&str>, open: Option<&str>) -> String {
    let (Some(ask), Some(bid), Some(open)) = (parse(ask), parse(bid), parse(open)) else {
        return ZERO_CHANGE.to_string();
    };
    if open == 0.0 {
        return ZERO_CHANGE.to_string();
    }

    let mid = mid_price(bid, ask);
    format_percentage((mid - open) / open)
}

fn parse(value: Option<&str>) -> Option<f64> {
    value
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .and_then(|text| text.parse::<f64>().ok())
        .filter(|number| number.is_finite())
}

fn mid_price(bid: f64, ask: f64) -> f64 {
    (bid + ask) / 2.0
}

fn format_percentage(change: f64) -> String {
    format!("{:.2}", change * 100.0)
}

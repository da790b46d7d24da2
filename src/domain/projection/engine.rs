use std::cmp::Ordering;
use std::sync::Arc;

use serde::Serialize;

use super::format::{format_volume, parse_number};
use super::order::{OrderBy, SortDirection, SortField};
use crate::domain::logging::LogComponent;
use crate::domain::market_data::{RawTicker, TickerSnapshot, compute_change};
use crate::log_trace;

/// Value shown for a price or volume the feed has not sent yet.
pub const MISSING_VALUE: &str = "0";

/// One display-ready line of the board.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayRow {
    pub market: String,
    pub last: String,
    pub volume_quote: String,
    pub change24h: String,
}

impl DisplayRow {
    pub fn from_raw(raw: &RawTicker) -> Self {
        let quote = &raw.quote;
        Self {
            market: raw.market.value().to_string(),
            last: quote.last.clone().unwrap_or_else(|| MISSING_VALUE.to_string()),
            volume_quote: quote
                .volume_quote
                .as_deref()
                .map(format_volume)
                .unwrap_or_else(|| MISSING_VALUE.to_string()),
            change24h: compute_change(
                quote.ask.as_deref(),
                quote.bid.as_deref(),
                quote.open.as_deref(),
            ),
        }
    }

    pub fn value(&self, field: SortField) -> &str {
        match field {
            SortField::Market => &self.market,
            SortField::Last => &self.last,
            SortField::VolumeQuote => &self.volume_quote,
            SortField::Change24h => &self.change24h,
        }
    }
}

/// Maps, filters and sorts the raw rows into board rows.
///
/// Numeric columns that do not parse sort as the smallest value, so they
/// lead an ascending sort and trail a descending one. Ties keep store order.
pub fn project(rows: &[RawTicker], term: &str, order_by: OrderBy) -> Vec<DisplayRow> {
    let needle = term.to_lowercase();
    let mut projected: Vec<DisplayRow> = rows
        .iter()
        .map(DisplayRow::from_raw)
        .filter(|row| needle.is_empty() || row.market.to_lowercase().contains(&needle))
        .collect();

    projected.sort_by(|a, b| match order_by.direction {
        SortDirection::Ascending => compare(a, b, order_by.field),
        SortDirection::Descending => compare(b, a, order_by.field),
    });
    projected
}

fn compare(a: &DisplayRow, b: &DisplayRow, field: SortField) -> Ordering {
    if !field.is_numeric() {
        return a.value(field).cmp(b.value(field));
    }
    match (parse_number(a.value(field)), parse_number(b.value(field))) {
        (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ProjectionKey {
    version: u64,
    term: String,
    order_by: OrderBy,
}

/// Memoizes [`project`] against the last (store version, term, order) triple.
#[derive(Debug, Default)]
pub struct ProjectionEngine {
    cached: Option<(ProjectionKey, Arc<[DisplayRow]>)>,
    recomputations: u64,
}

impl ProjectionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn project(
        &mut self,
        snapshot: &TickerSnapshot,
        term: &str,
        order_by: OrderBy,
    ) -> Arc<[DisplayRow]> {
        if let Some((key, rows)) = &self.cached {
            if key.version == snapshot.version() && key.term == term && key.order_by == order_by {
                return Arc::clone(rows);
            }
        }

        let rows: Arc<[DisplayRow]> = project(snapshot.rows(), term, order_by).into();
        self.recomputations += 1;
        log_trace!(
            LogComponent::Domain("Projection"),
            "recomputed {} rows (version {}, term {:?}, {} {})",
            rows.len(),
            snapshot.version(),
            term,
            order_by.field,
            order_by.direction
        );

        let key = ProjectionKey { version: snapshot.version(), term: term.to_string(), order_by };
        self.cached = Some((key, Arc::clone(&rows)));
        rows
    }

    /// How many times the rows were actually rebuilt.
    pub fn recomputations(&self) -> u64 {
        self.recomputations
    }
}

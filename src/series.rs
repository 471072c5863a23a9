use chrono::{DateTime, Utc};

use crate::model::{CoinSeries, LivePoint, PricePoint};

/// Replace the last historical point of `series` with the live value.
///
/// Falls back to the series' own last close/SMA (0 when absent) stamped
/// with `now` when no live value exists yet. Output length is
/// `series.data.len().saturating_sub(1) + 1`.
pub fn merge_live(
    series: &CoinSeries,
    live: Option<&LivePoint>,
    now: DateTime<Utc>,
) -> Vec<PricePoint> {
    let history = match series.data.split_last() {
        Some((_, rest)) => rest,
        None => &[],
    };

    let live_point = match live {
        Some(point) => point.to_price_point(),
        None => {
            let last = series.last_point();
            PricePoint {
                timestamp: now,
                open: None,
                close: last.map(|p| p.close).unwrap_or(0.0),
                sma: Some(last.and_then(|p| p.sma).unwrap_or(0.0)),
            }
        }
    };

    let mut merged = Vec::with_capacity(history.len() + 1);
    merged.extend_from_slice(history);
    merged.push(live_point);
    merged
}

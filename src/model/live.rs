use std::collections::HashMap;

use chrono::{DateTime, Utc};

use super::price_point::{CoinSeries, PricePoint};

/// Latest simulated value for one symbol.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LivePoint {
    pub close: f64,
    pub sma: f64,
    pub timestamp: DateTime<Utc>,
}

impl LivePoint {
    pub fn to_price_point(&self) -> PricePoint {
        PricePoint {
            timestamp: self.timestamp,
            open: None,
            close: self.close,
            sma: Some(self.sma),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiveStatus {
    Uninitialized,
    Live,
}

/// Symbol -> latest live point. Never mutated after construction; every
/// tick builds a new one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LiveState {
    points: HashMap<String, LivePoint>,
}

impl LiveState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from the last historical point of every series.
    pub fn seeded_from(coins: &[CoinSeries], now: DateTime<Utc>) -> Self {
        let points = coins
            .iter()
            .map(|coin| {
                let point = match coin.last_point() {
                    Some(last) => LivePoint {
                        close: last.close,
                        sma: last.sma.unwrap_or(0.0),
                        timestamp: last.timestamp,
                    },
                    None => LivePoint {
                        close: 0.0,
                        sma: 0.0,
                        timestamp: now,
                    },
                };
                (coin.symbol.clone(), point)
            })
            .collect();
        Self { points }
    }

    pub fn get(&self, symbol: &str) -> Option<&LivePoint> {
        self.points.get(symbol)
    }

    pub fn status(&self, symbol: &str) -> LiveStatus {
        if self.points.contains_key(symbol) {
            LiveStatus::Live
        } else {
            LiveStatus::Uninitialized
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Live price label for a symbol, two decimals.
    pub fn price_label(&self, symbol: &str) -> String {
        format!("{:.2}", self.get(symbol).map(|p| p.close).unwrap_or(0.0))
    }
}

impl FromIterator<(String, LivePoint)> for LiveState {
    fn from_iter<I: IntoIterator<Item = (String, LivePoint)>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).unwrap()
    }

    #[test]
    fn seeding_uses_last_point_and_defaults() {
        let coins = vec![
            CoinSeries::new(
                "BTCUSDT",
                vec![
                    PricePoint::new(ts(0), Some(1.0), 10.0, None),
                    PricePoint::new(ts(1_000), Some(10.0), 12.0, Some(11.0)),
                ],
            ),
            CoinSeries::new("ETHUSDT", vec![PricePoint::new(ts(0), None, 3.0, None)]),
            CoinSeries::new("EMPTY", vec![]),
        ];
        let live = LiveState::seeded_from(&coins, ts(5_000));

        let btc = live.get("BTCUSDT").unwrap();
        assert_eq!((btc.close, btc.sma, btc.timestamp), (12.0, 11.0, ts(1_000)));
        assert_eq!(live.get("ETHUSDT").unwrap().sma, 0.0);
        let empty = live.get("EMPTY").unwrap();
        assert_eq!((empty.close, empty.timestamp), (0.0, ts(5_000)));
    }

    #[test]
    fn status_tracks_presence() {
        let live: LiveState = [(
            "BTCUSDT".to_string(),
            LivePoint {
                close: 1.0,
                sma: 0.0,
                timestamp: ts(0),
            },
        )]
        .into_iter()
        .collect();
        assert_eq!(live.status("BTCUSDT"), LiveStatus::Live);
        assert_eq!(live.status("SOLUSDT"), LiveStatus::Uninitialized);
        assert_eq!(live.price_label("BTCUSDT"), "1.00");
        assert_eq!(live.price_label("SOLUSDT"), "0.00");
    }
}

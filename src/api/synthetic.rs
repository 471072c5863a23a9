use chrono::{DateTime, TimeZone, Utc};

use crate::config::{CandleInterval, MAX_SYMBOL_LIMIT};
use crate::indicator::sma_series;
use crate::live::random::{RandomSource, StdRandom};
use crate::model::{CoinSeries, PricePoint};

/// SMA window the indicators service applies to closes.
pub const PROVIDER_SMA_PERIOD: usize = 20;

const SYMBOLS: [(&str, f64); 20] = [
    ("BTCUSDT", 64_000.0),
    ("ETHUSDT", 3_100.0),
    ("SOLUSDT", 145.0),
    ("BNBUSDT", 580.0),
    ("XRPUSDT", 0.52),
    ("DOGEUSDT", 0.12),
    ("ADAUSDT", 0.45),
    ("AVAXUSDT", 28.0),
    ("LINKUSDT", 14.0),
    ("TRXUSDT", 0.12),
    ("DOTUSDT", 6.2),
    ("LTCUSDT", 72.0),
    ("BCHUSDT", 380.0),
    ("NEARUSDT", 5.1),
    ("UNIUSDT", 7.4),
    ("APTUSDT", 8.3),
    ("ATOMUSDT", 7.0),
    ("FILUSDT", 4.6),
    ("ARBUSDT", 0.9),
    ("OPUSDT", 1.7),
];

/// Offline stand-in for the indicators service: seeded random walks with
/// the same SMA annotation the service produces.
#[derive(Debug, Clone)]
pub struct SyntheticSource {
    seed: u64,
    end: DateTime<Utc>,
}

impl SyntheticSource {
    pub fn new(seed: u64, end: DateTime<Utc>) -> Self {
        Self { seed, end }
    }

    pub fn generate(&self, interval: CandleInterval, limit: usize) -> Vec<CoinSeries> {
        let limit = limit.min(MAX_SYMBOL_LIMIT);
        let mut rng = StdRandom::seeded(self.seed);
        let step = interval.duration_ms() as i64;
        let end_ms = self.end.timestamp_millis().div_euclid(step) * step;
        let start_ms = end_ms - step * limit.saturating_sub(1) as i64;

        SYMBOLS
            .iter()
            .map(|&(symbol, base)| {
                let closes = random_walk(&mut rng, base, limit);
                let smas = sma_series(&closes, PROVIDER_SMA_PERIOD);
                let data = closes
                    .iter()
                    .zip(smas)
                    .enumerate()
                    .filter_map(|(i, (&close, sma))| {
                        let ts = Utc.timestamp_millis_opt(start_ms + step * i as i64).single()?;
                        let open = if i == 0 { close } else { closes[i - 1] };
                        Some(PricePoint::new(ts, Some(open), close, sma))
                    })
                    .collect();
                CoinSeries::new(symbol, data)
            })
            .collect()
    }
}

fn random_walk(rng: &mut dyn RandomSource, base: f64, len: usize) -> Vec<f64> {
    let mut price = base;
    (0..len)
        .map(|_| {
            let drift = (rng.next_unit() - 0.5) * 0.03;
            price = (price * (1.0 + drift)).max(base * 0.01);
            round_to_precision(price, base)
        })
        .collect()
}

fn round_to_precision(price: f64, base: f64) -> f64 {
    let scale = if base < 1.0 { 10_000.0 } else { 100.0 };
    (price * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_aligned_series_with_leading_null_sma() {
        let end = Utc.with_ymd_and_hms(2024, 3, 1, 10, 30, 0).unwrap();
        let coins = SyntheticSource::new(3, end).generate(CandleInterval::OneHour, 30);
        assert_eq!(coins.len(), 20);
        let btc = &coins[0];
        assert_eq!(btc.symbol, "BTCUSDT");
        assert_eq!(btc.data.len(), 30);
        assert_eq!(
            btc.data.last().unwrap().timestamp,
            Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap()
        );
        assert!(btc.data[..PROVIDER_SMA_PERIOD - 1].iter().all(|p| p.sma.is_none()));
        assert!(btc.data[PROVIDER_SMA_PERIOD - 1..].iter().all(|p| p.sma.is_some()));
        assert!(btc
            .data
            .windows(2)
            .all(|w| w[1].open == Some(w[0].close) && w[1].timestamp > w[0].timestamp));
    }

    #[test]
    fn oversized_limit_is_capped() {
        let coins = SyntheticSource::new(1, Utc::now()).generate(CandleInterval::OneDay, usize::MAX);
        assert_eq!(coins[0].data.len(), MAX_SYMBOL_LIMIT);
    }

    #[test]
    fn same_seed_same_series() {
        let end = Utc::now();
        let a = SyntheticSource::new(9, end).generate(CandleInterval::OneDay, 10);
        let b = SyntheticSource::new(9, end).generate(CandleInterval::OneDay, 10);
        assert_eq!(a, b);
    }
}

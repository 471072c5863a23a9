use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::event::AppEvent;
use crate::indicator::trailing_sma;
use crate::lifecycle::{Lifecycle, Registration, RegistrationKind};
use crate::model::{CoinSeries, LivePoint, LiveState};
use crate::store::{LoadStatus, Store};

use super::random::RandomSource;

/// Window of the SMA recomputed for simulated points.
pub const LIVE_SMA_PERIOD: usize = 5;
/// Largest relative move of one simulated tick, either direction.
pub const MAX_FLUCTUATION: f64 = 0.005;

/// Apply a relative fluctuation drawn from `u` in `[0, 1)` and round to cents.
pub fn simulate_close(latest: f64, u: f64) -> f64 {
    let fluctuation = latest * (u * 2.0 * MAX_FLUCTUATION - MAX_FLUCTUATION);
    round_cents((latest + fluctuation).max(0.0))
}

fn round_cents(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Close a tick starts from: last historical close, else the previous
/// simulated close, else 0. Zero counts as missing at each step.
pub fn latest_close(coin: &CoinSeries, previous: Option<&LivePoint>) -> f64 {
    coin.last_close()
        .filter(|c| *c != 0.0)
        .or_else(|| previous.map(|p| p.close).filter(|c| *c != 0.0))
        .unwrap_or(0.0)
}

/// SMA over the last four historical closes plus the new one.
pub fn live_sma(coin: &CoinSeries, new_close: f64) -> f64 {
    let start = coin.data.len().saturating_sub(LIVE_SMA_PERIOD);
    let mut window: Vec<f64> = coin.data[start..].iter().map(|p| p.close).collect();
    window.push(new_close);
    trailing_sma(&window, LIVE_SMA_PERIOD)
}

/// Build the next live state for every symbol in `coins`.
pub fn next_live_state(
    coins: &[CoinSeries],
    previous: &LiveState,
    rng: &mut dyn RandomSource,
    now: DateTime<Utc>,
) -> LiveState {
    coins
        .iter()
        .map(|coin| {
            let latest = latest_close(coin, previous.get(&coin.symbol));
            let close = simulate_close(latest, rng.next_unit());
            let point = LivePoint {
                close,
                sma: live_sma(coin, close),
                timestamp: now,
            };
            (coin.symbol.clone(), point)
        })
        .collect()
}

pub struct LiveTickSimulator {
    period: Duration,
    rng: Box<dyn RandomSource + Send>,
}

impl std::fmt::Debug for LiveTickSimulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LiveTickSimulator")
            .field("period", &self.period)
            .finish_non_exhaustive()
    }
}

impl LiveTickSimulator {
    pub fn new(period: Duration, rng: Box<dyn RandomSource + Send>) -> Self {
        assert!(!period.is_zero(), "tick period must be > 0");
        Self { period, rng }
    }

    /// Run one tick against the latest committed snapshot.
    /// Returns false while the series are not loaded.
    pub fn tick(&mut self, store: &Store) -> bool {
        let snapshot = store.current();
        if snapshot.status != LoadStatus::Ready {
            tracing::debug!(status = ?snapshot.status, "skipping live tick, series not ready");
            return false;
        }
        let next = next_live_state(&snapshot.coins, &snapshot.live, self.rng.as_mut(), Utc::now());
        tracing::debug!(symbols = next.len(), version = snapshot.version, "live tick");
        store.apply(AppEvent::LiveTick(next));
        true
    }

    /// Start the repeating timer. The task stops when the returned
    /// registration is released or dropped.
    pub fn spawn(self, store: Arc<Store>, lifecycle: &Lifecycle) -> Registration {
        let period = self.period;
        let handle = tokio::spawn(self.run(store));
        tracing::info!(period_ms = period.as_millis() as u64, "live tick timer started");
        lifecycle.register(RegistrationKind::Timer, move || handle.abort())
    }

    async fn run(mut self, store: Arc<Store>) {
        let mut ticker = tokio::time::interval(self.period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            self.tick(&store);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::live::random::SequenceRandom;
    use crate::model::PricePoint;
    use chrono::TimeZone;

    fn ts(ms: i64) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(ms).unwrap()
    }

    fn series(symbol: &str, closes: &[f64]) -> CoinSeries {
        CoinSeries::new(
            symbol,
            closes
                .iter()
                .enumerate()
                .map(|(i, &c)| PricePoint::new(ts(i as i64), None, c, None))
                .collect(),
        )
    }

    #[test]
    fn fluctuation_bounds() {
        assert_eq!(simulate_close(100.0, 0.0), 99.5);
        assert_eq!(simulate_close(100.0, 0.5), 100.0);
        assert!((simulate_close(100.0, 0.999_999) - 100.5).abs() < 0.011);
        assert_eq!(simulate_close(0.0, 0.3), 0.0);
    }

    #[test]
    fn rounds_to_two_decimals() {
        let v = simulate_close(1.234_567, 0.5);
        assert_eq!(v, 1.23);
    }

    #[test]
    fn latest_close_prefers_history_then_previous() {
        let prev = LivePoint {
            close: 42.0,
            sma: 0.0,
            timestamp: ts(0),
        };
        assert_eq!(latest_close(&series("A", &[1.0, 2.0]), Some(&prev)), 2.0);
        assert_eq!(latest_close(&series("A", &[1.0, 0.0]), Some(&prev)), 42.0);
        assert_eq!(latest_close(&series("A", &[]), Some(&prev)), 42.0);
        assert_eq!(latest_close(&series("A", &[]), None), 0.0);
    }

    #[test]
    fn live_sma_is_all_or_nothing() {
        assert_eq!(live_sma(&series("A", &[1.0, 2.0, 3.0]), 4.0), 0.0);
        let v = live_sma(&series("A", &[100.0, 1.0, 2.0, 3.0, 4.0]), 5.0);
        assert!((v - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn next_state_covers_every_symbol() {
        let coins = vec![
            series("BTCUSDT", &[10.0, 20.0, 30.0, 40.0, 50.0]),
            series("ETHUSDT", &[5.0]),
        ];
        let mut rng = SequenceRandom::constant(0.5);
        let next = next_live_state(&coins, &LiveState::new(), &mut rng, ts(9));
        let btc = next.get("BTCUSDT").unwrap();
        assert_eq!(btc.close, 50.0);
        assert!((btc.sma - 38.0).abs() < 1e-9);
        assert_eq!(btc.timestamp, ts(9));
        assert_eq!(next.get("ETHUSDT").unwrap().sma, 0.0);
    }
}

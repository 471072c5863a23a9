pub mod rest;
pub mod synthetic;

use chrono::Utc;

use crate::config::CandleInterval;
use crate::error::{AppError, FETCH_FAILURE_MESSAGE};
use crate::event::AppEvent;
use crate::model::CoinSeries;

pub use rest::IndicatorsClient;
pub use synthetic::SyntheticSource;

/// Where the historical series come from.
#[derive(Debug, Clone)]
pub enum SeriesSource {
    Http(IndicatorsClient),
    Synthetic(SyntheticSource),
}

impl SeriesSource {
    pub async fn fetch_top_coins(
        &self,
        interval: CandleInterval,
        limit: usize,
    ) -> Result<Vec<CoinSeries>, AppError> {
        match self {
            Self::Http(client) => client.fetch_top_coins(interval, limit).await,
            Self::Synthetic(source) => Ok(source.generate(interval, limit)),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Http(_) => "http",
            Self::Synthetic(_) => "synthetic",
        }
    }
}

/// Fetch once and turn the outcome into a store event. Failures are logged
/// and collapse into the single user-facing message; no retry.
pub async fn load(source: &SeriesSource, interval: CandleInterval, limit: usize) -> AppEvent {
    match source.fetch_top_coins(interval, limit).await {
        Ok(coins) => AppEvent::SeriesLoaded {
            coins,
            loaded_at: Utc::now(),
        },
        Err(e) => {
            tracing::error!(
                source = source.label(),
                error = %e,
                fetch_failure = e.is_fetch_failure(),
                "initial series load failed"
            );
            AppEvent::FetchFailed(FETCH_FAILURE_MESSAGE.to_string())
        }
    }
}

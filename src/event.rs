use chrono::{DateTime, Utc};

use crate::model::{CoinSeries, LiveState};

/// Everything that can change the committed application state.
#[derive(Debug, Clone)]
pub enum AppEvent {
    SeriesLoaded {
        coins: Vec<CoinSeries>,
        loaded_at: DateTime<Utc>,
    },
    FetchFailed(String),
    LiveTick(LiveState),
}

impl AppEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::SeriesLoaded { .. } => "series_loaded",
            Self::FetchFailed(_) => "fetch_failed",
            Self::LiveTick(_) => "live_tick",
        }
    }
}

use std::sync::Arc;

use tokio::sync::watch;

use crate::event::AppEvent;
use crate::model::{CoinSeries, LiveState};

#[derive(Debug, Clone, PartialEq)]
pub enum LoadStatus {
    Loading,
    Failed(String),
    Ready,
}

/// One committed application state. Never mutated; every event produces a
/// new snapshot with a higher version.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub version: u64,
    pub status: LoadStatus,
    pub coins: Arc<Vec<CoinSeries>>,
    pub live: Arc<LiveState>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            version: 0,
            status: LoadStatus::Loading,
            coins: Arc::new(Vec::new()),
            live: Arc::new(LiveState::new()),
        }
    }
}

impl Snapshot {
    /// Pure transition from this snapshot to the next one.
    pub fn apply(&self, event: AppEvent) -> Snapshot {
        let version = self.version + 1;
        match event {
            AppEvent::SeriesLoaded { coins, loaded_at } => {
                let live = LiveState::seeded_from(&coins, loaded_at);
                Snapshot {
                    version,
                    status: LoadStatus::Ready,
                    coins: Arc::new(coins),
                    live: Arc::new(live),
                }
            }
            AppEvent::FetchFailed(message) => Snapshot {
                version,
                status: LoadStatus::Failed(message),
                coins: Arc::new(Vec::new()),
                live: Arc::new(LiveState::new()),
            },
            AppEvent::LiveTick(live) => Snapshot {
                version,
                status: self.status.clone(),
                coins: Arc::clone(&self.coins),
                live: Arc::new(live),
            },
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == LoadStatus::Ready
    }
}

/// Owner of the committed snapshot. Readers pull `current()` or subscribe.
pub struct Store {
    tx: watch::Sender<Arc<Snapshot>>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Arc::new(Snapshot::default()));
        Self { tx }
    }

    pub fn current(&self) -> Arc<Snapshot> {
        Arc::clone(&self.tx.borrow())
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<Snapshot>> {
        self.tx.subscribe()
    }

    /// Commit the snapshot produced by `event` and return it.
    pub fn apply(&self, event: AppEvent) -> Arc<Snapshot> {
        let kind = event.kind();
        let mut committed = None;
        self.tx.send_modify(|snapshot| {
            let next = Arc::new(snapshot.apply(event));
            committed = Some(Arc::clone(&next));
            *snapshot = next;
        });
        let committed = committed.unwrap_or_else(|| self.current());
        tracing::debug!(event = kind, version = committed.version, "state committed");
        committed
    }
}

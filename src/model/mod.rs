pub mod live;
pub mod price_point;
pub mod signal;

pub use live::{LivePoint, LiveState, LiveStatus};
pub use price_point::{CoinSeries, PricePoint};
pub use signal::{Signal, SignalKind};

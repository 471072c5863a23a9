//! Pure mapping from merged series and signals to draw commands.

pub mod scale;
pub mod scene;

use chrono::{DateTime, Utc};

use crate::live::random::RandomSource;
use crate::model::{CoinSeries, LiveState, Signal};
use crate::series::merge_live;
use crate::strategy::{confirm_buys, detect};

pub use scene::{ChartInput, ChartLayout, ChartScene, DrawCommand, Rgb, Shape};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    pub layout: ChartLayout,
    pub show_confirmations: bool,
    pub confirmation_probability: f64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            layout: ChartLayout::default(),
            show_confirmations: true,
            confirmation_probability: 0.5,
        }
    }
}

/// Merge, detect and lay out one symbol's chart.
pub fn scene_for_coin(
    coin: &CoinSeries,
    live: &LiveState,
    now: DateTime<Utc>,
    viewport_width: f64,
    options: &RenderOptions,
    rng: &mut dyn RandomSource,
) -> ChartScene {
    let merged = merge_live(coin, live.get(&coin.symbol), now);
    let signals: Vec<Signal> = detect(&merged).collect();
    let confirmations = if options.show_confirmations {
        confirm_buys(&signals, rng, options.confirmation_probability)
    } else {
        Vec::new()
    };
    let live_price = live.price_label(&coin.symbol);
    tracing::trace!(
        symbol = %coin.symbol,
        points = merged.len(),
        signals = signals.len(),
        confirmations = confirmations.len(),
        "chart scene rebuilt"
    );

    ChartScene::build(
        ChartInput {
            symbol: &coin.symbol,
            points: &merged,
            signals: &signals,
            confirmations: &confirmations,
            live_price: &live_price,
        },
        &options.layout,
        options.layout.plot_width_for(viewport_width),
    )
}

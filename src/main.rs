use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{Event, KeyEventKind};

use crossover_charts::api::{self, IndicatorsClient, SeriesSource, SyntheticSource};
use crossover_charts::config::Config;
use crossover_charts::input::{parse_key, UiCommand};
use crossover_charts::lifecycle::Lifecycle;
use crossover_charts::live::{LiveTickSimulator, StdRandom};
use crossover_charts::render::RenderOptions;
use crossover_charts::store::Store;
use crossover_charts::ui;
use crossover_charts::view::ChartView;

const LOG_FILE: &str = "crossover-charts.log";

#[tokio::main]
async fn main() -> Result<()> {
    // Install rustls crypto provider (required by rustls 0.23+)
    let _ = rustls::crypto::ring::default_provider().install_default();

    let offline = std::env::args().skip(1).any(|a| a == "--offline");

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {:#}", e);
            std::process::exit(1);
        }
    };
    let interval = config
        .candle_interval()
        .context("validated api.candle_interval became invalid")?;

    // Log to a file so output does not interfere with the TUI
    let log_file = std::fs::File::create(LOG_FILE)
        .with_context(|| format!("failed to create {}", LOG_FILE))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(config.logging.level.as_str())
            }),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .json()
        .init();

    tracing::info!(
        api = %config.api.base_url,
        interval = %interval,
        limit = config.api.symbol_limit,
        poll_interval_ms = config.live.poll_interval_ms,
        offline,
        "Starting crossover-charts"
    );

    let source = if offline {
        SeriesSource::Synthetic(SyntheticSource::new(
            config.live.seed.unwrap_or(7),
            chrono::Utc::now(),
        ))
    } else {
        SeriesSource::Http(
            IndicatorsClient::new(
                &config.api.base_url,
                Duration::from_millis(config.api.request_timeout_ms),
            )
            .context("failed to build indicators client")?,
        )
    };

    let store = Arc::new(Store::new());
    let lifecycle = Lifecycle::new();

    let fetch_store = Arc::clone(&store);
    let limit = config.api.symbol_limit;
    tokio::spawn(async move {
        let event = api::load(&source, interval, limit).await;
        fetch_store.apply(event);
    });

    let mut terminal = ratatui::init();
    let columns = terminal.size().map(|s| s.width).unwrap_or(160);

    let render_options = RenderOptions {
        show_confirmations: config.ui.show_confirmations,
        confirmation_probability: config.ui.confirmation_probability,
        ..RenderOptions::default()
    };
    // Separate streams so resizes never shift the tick sequence.
    let seed = config.live.seed;
    let mut view = ChartView::new(
        Arc::clone(&store),
        render_options,
        Box::new(StdRandom::from_optional_seed(seed.map(|s| s.wrapping_add(1)))),
        ui::viewport_px(columns),
    );
    view.mount(
        &lifecycle,
        LiveTickSimulator::new(
            Duration::from_millis(config.live.poll_interval_ms),
            Box::new(StdRandom::from_optional_seed(seed)),
        ),
    );

    let result = run_loop(&mut terminal, &mut view, &config, interval);

    view.unmount();
    ratatui::restore();
    tracing::info!(active = lifecycle.active(), "Shutdown complete");
    result
}

fn run_loop(
    terminal: &mut ratatui::DefaultTerminal,
    view: &mut ChartView,
    config: &Config,
    interval: crossover_charts::config::CandleInterval,
) -> Result<()> {
    loop {
        view.refresh();
        terminal.draw(|frame| ui::render(frame, view, interval))?;

        if !crossterm::event::poll(Duration::from_millis(config.ui.refresh_rate_ms))? {
            continue;
        }
        match crossterm::event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => match parse_key(&key) {
                Some(UiCommand::Quit) => {
                    tracing::info!("User quit");
                    return Ok(());
                }
                Some(UiCommand::NextSymbol) => view.select_next(),
                Some(UiCommand::PrevSymbol) => view.select_prev(),
                Some(UiCommand::FirstSymbol) => view.select_first(),
                Some(UiCommand::LastSymbol) => view.select_last(),
                None => {}
            },
            Event::Resize(columns, rows) => {
                tracing::debug!(columns, rows, "terminal resized");
                view.on_resize(ui::viewport_px(columns));
            }
            _ => {}
        }
    }
}

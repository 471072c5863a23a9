use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::error::AppError;

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";
/// Largest candle count the indicators service accepts per symbol.
pub const MAX_SYMBOL_LIMIT: usize = 1000;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub live: LiveConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub candle_interval: String,
    pub symbol_limit: usize,
    pub request_timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            candle_interval: "1h".to_string(),
            symbol_limit: 90,
            request_timeout_ms: 10_000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LiveConfig {
    pub poll_interval_ms: u64,
    /// Fixed seed for the tick simulator and confirmation filter.
    pub seed: Option<u64>,
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1_800_000,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub refresh_rate_ms: u64,
    pub confirmation_probability: f64,
    pub show_confirmations: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            refresh_rate_ms: 100,
            confirmation_probability: 0.5,
            show_confirmations: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Candle widths the indicators API is queried with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandleInterval {
    OneHour,
    OneDay,
}

impl CandleInterval {
    pub fn parse(s: &str) -> Result<Self, AppError> {
        match s.trim() {
            "1h" => Ok(Self::OneHour),
            "1d" => Ok(Self::OneDay),
            other => Err(AppError::Config(format!(
                "unsupported candle interval '{}', expected 1h or 1d",
                other
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneHour => "1h",
            Self::OneDay => "1d",
        }
    }

    pub fn duration_ms(&self) -> u64 {
        match self {
            Self::OneHour => 3_600_000,
            Self::OneDay => 86_400_000,
        }
    }
}

impl std::fmt::Display for CandleInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse a duration like "500ms", "30s", "30m" or "1h" into milliseconds.
/// A bare integer is taken as milliseconds.
pub fn parse_duration_ms(s: &str) -> Result<u64> {
    let s = s.trim();
    if s.is_empty() {
        bail!("invalid duration '': expected format like '30m'");
    }
    if let Ok(ms) = s.parse::<u64>() {
        return Ok(ms);
    }

    let (num_str, unit_ms) = if let Some(n) = s.strip_suffix("ms") {
        (n, 1)
    } else {
        let (n, suffix) = s.split_at(s.len() - 1);
        let unit = match suffix {
            "s" => 1_000,
            "m" => 60_000,
            "h" => 3_600_000,
            "d" => 86_400_000,
            _ => bail!(
                "invalid duration '{}': unsupported suffix '{}', expected one of ms/s/m/h/d",
                s,
                suffix
            ),
        };
        (n, unit)
    };
    let n: u64 = num_str
        .parse()
        .with_context(|| format!("invalid duration '{}': quantity must be an integer", s))?;

    n.checked_mul(unit_ms)
        .with_context(|| format!("invalid duration '{}': value is too large", s))
}

impl Config {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        let mut config = Self::from_path(Path::new(DEFAULT_CONFIG_PATH))?;
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Read a TOML config file, falling back to built-in defaults if it does not exist.
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "config file missing, using defaults");
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
    }

    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("CROSSOVER_API_BASE_URL") {
            self.api.base_url = url;
        }
        if let Some(raw) = lookup("CROSSOVER_POLL_INTERVAL_MS") {
            self.live.poll_interval_ms = parse_duration_ms(&raw)
                .context("CROSSOVER_POLL_INTERVAL_MS is invalid")?;
        }
        if let Some(interval) = lookup("CROSSOVER_CANDLE_INTERVAL") {
            self.api.candle_interval = interval;
        }
        if let Some(raw) = lookup("CROSSOVER_SYMBOL_LIMIT") {
            self.api.symbol_limit = raw
                .trim()
                .parse()
                .with_context(|| format!("CROSSOVER_SYMBOL_LIMIT '{}' is not a number", raw))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), AppError> {
        url::Url::parse(&self.api.base_url).map_err(|e| {
            AppError::Config(format!("api.base_url '{}': {}", self.api.base_url, e))
        })?;
        self.candle_interval()?;
        if self.api.symbol_limit == 0 || self.api.symbol_limit > MAX_SYMBOL_LIMIT {
            return Err(AppError::Config(format!(
                "api.symbol_limit {} is outside 1..={}",
                self.api.symbol_limit, MAX_SYMBOL_LIMIT
            )));
        }
        if self.live.poll_interval_ms == 0 {
            return Err(AppError::Config(
                "live.poll_interval_ms must be > 0".to_string(),
            ));
        }
        let p = self.ui.confirmation_probability;
        if !(0.0..=1.0).contains(&p) {
            return Err(AppError::Config(format!(
                "ui.confirmation_probability {} is outside [0, 1]",
                p
            )));
        }
        Ok(())
    }

    pub fn candle_interval(&self) -> Result<CandleInterval, AppError> {
        CandleInterval::parse(&self.api.candle_interval)
    }
}

use std::path::PathBuf;

use tokio_test::{assert_err, assert_ok};

use crossover_charts::config::{CandleInterval, Config};

fn temp_config(name: &str, body: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "crossover-charts-{}-{}.toml",
        name,
        std::process::id()
    ));
    std::fs::write(&path, body).expect("write temp config");
    path
}

#[test]
fn load_from_file() {
    let path = temp_config(
        "full",
        r#"
[api]
base_url = "https://charts.example.net/"
candle_interval = "1d"
symbol_limit = 20

[live]
poll_interval_ms = 5000
"#,
    );
    let config = assert_ok!(Config::from_path(&path));
    std::fs::remove_file(&path).ok();

    assert_eq!(config.api.base_url, "https://charts.example.net/");
    assert_eq!(config.candle_interval().unwrap(), CandleInterval::OneDay);
    assert_eq!(config.api.symbol_limit, 20);
    assert_eq!(config.live.poll_interval_ms, 5000);
    assert_eq!(config.live.seed, None);
    assert!((config.ui.confirmation_probability - 0.5).abs() < f64::EPSILON);
    assert_ok!(config.validate());
}

#[test]
fn missing_file_uses_defaults() {
    let path = std::env::temp_dir().join("crossover-charts-does-not-exist.toml");
    let config = assert_ok!(Config::from_path(&path));

    assert_eq!(config.api.base_url, "http://localhost:8000");
    assert_eq!(config.candle_interval().unwrap(), CandleInterval::OneHour);
    assert_eq!(config.api.symbol_limit, 90);
    assert_eq!(config.live.poll_interval_ms, 1_800_000);
    assert!(config.ui.show_confirmations);
}

#[test]
fn malformed_file_is_reported() {
    let path = temp_config("broken", "[api\nbase_url = ");
    let err = assert_err!(Config::from_path(&path));
    std::fs::remove_file(&path).ok();
    assert!(err.to_string().contains("failed to parse"));
}

#[test]
fn bad_env_override_is_rejected() {
    let mut config = Config::default();
    let err = assert_err!(config.apply_env_overrides(|key| {
        (key == "CROSSOVER_SYMBOL_LIMIT").then(|| "lots".to_string())
    }));
    assert!(err.to_string().contains("CROSSOVER_SYMBOL_LIMIT"));
}

#[test]
fn symbol_limit_above_provider_cap_is_rejected() {
    let mut config = Config::default();
    assert_ok!(config.apply_env_overrides(|key| {
        (key == "CROSSOVER_SYMBOL_LIMIT").then(|| "5000".to_string())
    }));
    let err = assert_err!(config.validate());
    assert!(err.to_string().contains("api.symbol_limit"));
}

#[test]
fn interval_round_trips_through_display() {
    for interval in [CandleInterval::OneHour, CandleInterval::OneDay] {
        assert_eq!(
            CandleInterval::parse(&interval.to_string()).unwrap(),
            interval
        );
    }
    assert_eq!(CandleInterval::OneDay.duration_ms(), 86_400_000);
}

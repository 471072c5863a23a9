use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer};

/// One sampled interval for one symbol.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PricePoint {
    #[serde(deserialize_with = "timestamp_from_iso_or_millis")]
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub open: Option<f64>,
    #[serde(default, deserialize_with = "number_or_null_to_f64")]
    pub close: f64,
    #[serde(default)]
    pub sma: Option<f64>,
}

impl PricePoint {
    pub fn new(timestamp: DateTime<Utc>, open: Option<f64>, close: f64, sma: Option<f64>) -> Self {
        Self {
            timestamp,
            open,
            close,
            sma,
        }
    }

    /// Open price used for drawing; a missing or zero open collapses onto the close.
    pub fn body_open(&self) -> f64 {
        match self.open {
            Some(open) if open != 0.0 => open,
            _ => self.close,
        }
    }

    pub fn is_bullish(&self) -> bool {
        self.close >= self.body_open()
    }

    pub fn body_low(&self) -> f64 {
        self.body_open().min(self.close)
    }

    pub fn body_high(&self) -> f64 {
        self.body_open().max(self.close)
    }
}

/// Historical series for one symbol, oldest point first.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CoinSeries {
    pub symbol: String,
    #[serde(default)]
    pub data: Vec<PricePoint>,
}

impl CoinSeries {
    pub fn new(symbol: impl Into<String>, data: Vec<PricePoint>) -> Self {
        Self {
            symbol: symbol.into(),
            data,
        }
    }

    pub fn last_point(&self) -> Option<&PricePoint> {
        self.data.last()
    }

    pub fn last_close(&self) -> Option<f64> {
        self.data.last().map(|p| p.close)
    }
}

/// Accept an ISO-8601 string or integer epoch milliseconds. Strings
/// without an offset are read as UTC.
fn timestamp_from_iso_or_millis<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = serde_json::Value::deserialize(deserializer)?;
    match v {
        serde_json::Value::String(s) => parse_iso_timestamp(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp '{}'", s))),
        serde_json::Value::Number(n) => {
            let ms = n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f as i64))
                .ok_or_else(|| serde::de::Error::custom("invalid timestamp number"))?;
            Utc.timestamp_millis_opt(ms)
                .single()
                .ok_or_else(|| serde::de::Error::custom(format!("timestamp {} out of range", ms)))
        }
        _ => Err(serde::de::Error::custom("invalid timestamp value")),
    }
}

fn parse_iso_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn number_or_null_to_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let v = serde_json::Value::deserialize(deserializer)?;
    match v {
        serde_json::Value::Null => Ok(0.0),
        serde_json::Value::String(s) => s.parse::<f64>().map_err(serde::de::Error::custom),
        serde_json::Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| serde::de::Error::custom("invalid number")),
        _ => Err(serde::de::Error::custom("invalid numeric value")),
    }
}

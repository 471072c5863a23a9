use std::time::Duration;

use url::Url;

use crate::config::CandleInterval;
use crate::error::AppError;
use crate::model::CoinSeries;

const TOP_COINS_PATH: &str = "indicators/top-coins/";

/// Client for the indicators service.
#[derive(Debug, Clone)]
pub struct IndicatorsClient {
    http: reqwest::Client,
    base_url: Url,
}

impl IndicatorsClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AppError> {
        let mut base_url = Url::parse(base_url)
            .map_err(|e| AppError::Config(format!("invalid api base url '{}': {}", base_url, e)))?;
        // Keep any path prefix when joining relative paths.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base_url })
    }

    pub fn top_coins_url(&self, interval: CandleInterval, limit: usize) -> Result<Url, AppError> {
        let mut url = self
            .base_url
            .join(TOP_COINS_PATH)
            .map_err(|e| AppError::Config(format!("cannot build top-coins url: {}", e)))?;
        url.query_pairs_mut()
            .append_pair("interval", interval.as_str())
            .append_pair("limit", &limit.to_string());
        Ok(url)
    }

    /// `GET /indicators/top-coins/`; non-2xx responses become `AppError::Api`.
    pub async fn fetch_top_coins(
        &self,
        interval: CandleInterval,
        limit: usize,
    ) -> Result<Vec<CoinSeries>, AppError> {
        let url = self.top_coins_url(interval, limit)?;
        tracing::info!(url = %url, "fetching top coins");

        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), body = %body, "top coins request rejected");
            return Err(AppError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = resp.bytes().await?;
        let coins: Vec<CoinSeries> = serde_json::from_slice(&bytes)?;
        tracing::info!(
            symbols = coins.len(),
            points = coins.iter().map(|c| c.data.len()).sum::<usize>(),
            "top coins received"
        );
        Ok(coins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_query_url() {
        let client = IndicatorsClient::new("http://localhost:8000", Duration::from_secs(1)).unwrap();
        let url = client.top_coins_url(CandleInterval::OneHour, 90).unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/indicators/top-coins/?interval=1h&limit=90"
        );
    }

    #[test]
    fn keeps_base_path_prefix() {
        let client = IndicatorsClient::new("https://example.com/api", Duration::from_secs(1)).unwrap();
        let url = client.top_coins_url(CandleInterval::OneDay, 5).unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.com/api/indicators/top-coins/?interval=1d&limit=5"
        );
    }

    #[test]
    fn rejects_bad_base_url() {
        let err = IndicatorsClient::new("::nope", Duration::from_secs(1)).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}

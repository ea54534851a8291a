use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};

use crate::config::CoinGeckoConfig;
use crate::error::FetchError;
use crate::model::PriceSnapshot;
use crate::monitor::MarketDataSource;

use super::types::{MarketChartResponse, SimplePriceResponse};

/// Client for CoinGecko's read-only REST endpoints.
///
/// One outbound request per call, no caching, no retry. Retry policy, if
/// any, belongs to the caller.
pub struct CoinGeckoClient {
    http: reqwest::Client,
    base_url: String,
}

impl CoinGeckoClient {
    pub fn new(config: &CoinGeckoConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(key) = &config.api_key {
            headers.insert("x-cg-demo-api-key", HeaderValue::from_str(key)?);
        }
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("failed to build CoinGecko HTTP client")?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn ping(&self) -> Result<()> {
        let url = format!("{}/ping", self.base_url);
        self.http
            .get(&url)
            .send()
            .await
            .context("ping failed")?
            .error_for_status()
            .context("ping returned error status")?;
        Ok(())
    }

    fn compact_error_body(body: &str) -> String {
        let normalized = body.split_whitespace().collect::<Vec<_>>().join(" ");
        if normalized.len() > 180 {
            format!("{}...", &normalized[..180])
        } else {
            normalized
        }
    }

    async fn read_body(resp: reqwest::Response) -> Result<String, FetchError> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: Self::compact_error_body(&body),
            });
        }
        Ok(resp.text().await?)
    }
}

#[async_trait]
impl MarketDataSource for CoinGeckoClient {
    async fn current_price(&self, coin_id: &str) -> Result<PriceSnapshot, FetchError> {
        let url = format!("{}/simple/price", self.base_url);
        let resp = self
            .http
            .get(&url)
            .query(&[
                ("ids", coin_id),
                ("vs_currencies", "usd"),
                ("include_24hr_change", "true"),
                ("include_24hr_vol", "true"),
            ])
            .send()
            .await?;

        let body = Self::read_body(resp).await?;
        let mut parsed: SimplePriceResponse = serde_json::from_str(&body)?;
        let entry = parsed
            .remove(coin_id)
            .ok_or_else(|| FetchError::UnknownCoin(coin_id.to_string()))?;

        if !entry.usd.is_finite() || entry.usd <= 0.0 {
            return Err(FetchError::InvalidPrice {
                coin: coin_id.to_string(),
                price: entry.usd,
            });
        }
        let change_24h = entry.usd_24h_change.ok_or_else(|| FetchError::MissingField {
            coin: coin_id.to_string(),
            field: "usd_24h_change",
        })?;
        let volume_24h = entry.usd_24h_vol.ok_or_else(|| FetchError::MissingField {
            coin: coin_id.to_string(),
            field: "usd_24h_vol",
        })?;

        Ok(PriceSnapshot {
            price: entry.usd,
            change_24h,
            volume_24h,
        })
    }

    async fn historical_prices(
        &self,
        coin_id: &str,
        lookback_days: u32,
    ) -> Result<Vec<f64>, FetchError> {
        let url = format!("{}/coins/{}/market_chart", self.base_url, coin_id);
        let days = lookback_days.to_string();
        let resp = self
            .http
            .get(&url)
            .query(&[
                ("vs_currency", "usd"),
                ("days", days.as_str()),
                ("interval", "hourly"),
            ])
            .send()
            .await?;

        let body = Self::read_body(resp).await?;
        let chart: MarketChartResponse = serde_json::from_str(&body)?;

        if let (Some(first), Some(last)) = (chart.prices.first(), chart.prices.last()) {
            let span_start = chrono::DateTime::from_timestamp_millis(first[0] as i64);
            let span_end = chrono::DateTime::from_timestamp_millis(last[0] as i64);
            tracing::debug!(
                coin = coin_id,
                samples = chart.prices.len(),
                span_start = ?span_start,
                span_end = ?span_end,
                "fetched historical prices"
            );
        }

        // Provider order is chronological ascending; a short or empty
        // series is a valid outcome, not a fault.
        Ok(chart.prices.iter().map(|pair| pair[1]).collect())
    }
}

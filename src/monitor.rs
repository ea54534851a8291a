use async_trait::async_trait;

use crate::analyzer;
use crate::error::FetchError;
use crate::model::{PriceSnapshot, TrendAnalysis};

/// Seam between the monitor and the market-data provider. Implemented by
/// `CoinGeckoClient` and by test doubles.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    async fn current_price(&self, coin_id: &str) -> Result<PriceSnapshot, FetchError>;

    /// Hourly series over the lookback window, chronological ascending.
    /// May come back shorter than requested when the provider has less
    /// history; that is a valid result, not an error.
    async fn historical_prices(
        &self,
        coin_id: &str,
        lookback_days: u32,
    ) -> Result<Vec<f64>, FetchError>;
}

/// Per-cycle roll-up. `checked` counts coins that made it through
/// analysis; `failures` counts coins whose fetch failed and was skipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleStats {
    pub checked: usize,
    pub failures: usize,
    pub buy_signals: usize,
}

/// Walks the configured coin list once per trigger: fetch, analyze, emit.
/// Coins are processed strictly sequentially in configuration order, and a
/// failing coin is logged and skipped without aborting the cycle.
pub struct PriceMonitor<S> {
    source: S,
    coins: Vec<String>,
    lookback_days: u32,
}

impl<S: MarketDataSource> PriceMonitor<S> {
    pub fn new(source: S, coins: Vec<String>, lookback_days: u32) -> Self {
        Self {
            source,
            coins,
            lookback_days,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub async fn run_cycle(&self) -> CycleStats {
        let mut stats = CycleStats::default();
        for coin_id in &self.coins {
            match self.check_coin(coin_id).await {
                Ok(analysis) => {
                    stats.checked += 1;
                    if analysis.is_buy_signal {
                        stats.buy_signals += 1;
                    }
                }
                Err(err) => {
                    stats.failures += 1;
                    tracing::error!(
                        coin = %coin_id,
                        error = %err,
                        "monitoring failed, continuing with next coin"
                    );
                }
            }
        }
        stats
    }

    async fn check_coin(&self, coin_id: &str) -> Result<TrendAnalysis, FetchError> {
        let current = self.source.current_price(coin_id).await?;
        let history = self
            .source
            .historical_prices(coin_id, self.lookback_days)
            .await?;

        let analysis = analyzer::analyze(&current, &history);
        let coin_display = coin_id.to_uppercase();

        tracing::info!(
            coin = %coin_display,
            price = current.price,
            trend = %analysis.trend,
            momentum = analysis.momentum,
            "{}",
            analysis.summary
        );
        if analysis.is_buy_signal {
            tracing::warn!(
                coin = %coin_display,
                price = current.price,
                "🚨 Buy signal detected for {coin_display}!"
            );
        }

        Ok(analysis)
    }
}

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub coingecko: CoinGeckoConfig,
    pub monitor: MonitorConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CoinGeckoConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    #[serde(skip)]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitorConfig {
    pub coins: Vec<String>,
    pub lookback_days: u32,
    pub poll_interval: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

/// Parse a poll interval string (e.g. "30s", "5m", "1h", "1d") into a
/// duration.
pub fn parse_interval(s: &str) -> Result<Duration> {
    if s.len() < 2 {
        bail!("invalid interval '{}': expected format like '5m'", s);
    }

    let (num_str, suffix) = s.split_at(s.len() - 1);
    let n: u64 = num_str.parse().with_context(|| {
        format!(
            "invalid interval '{}': quantity must be a positive integer",
            s
        )
    })?;
    if n == 0 {
        bail!("invalid interval '{}': quantity must be > 0", s);
    }

    let unit_secs = match suffix {
        "s" => 1,
        "m" => 60,
        "h" => 3_600,
        "d" => 86_400,
        _ => bail!(
            "invalid interval '{}': unsupported suffix '{}', expected one of s/m/h/d",
            s,
            suffix
        ),
    };

    n.checked_mul(unit_secs)
        .map(Duration::from_secs)
        .with_context(|| format!("invalid interval '{}': value is too large", s))
}

impl MonitorConfig {
    pub fn poll_period(&self) -> Result<Duration> {
        parse_interval(&self.poll_interval)
    }

    /// Ordered coin-id list: trimmed, lowercased (CoinGecko ids are
    /// lowercase slugs), empties dropped, duplicates removed keeping the
    /// first occurrence.
    pub fn monitored_coins(&self) -> Vec<String> {
        let mut out = Vec::new();
        for coin in &self.coins {
            let id = coin.trim().to_ascii_lowercase();
            if !id.is_empty() && !out.iter().any(|v| v == &id) {
                out.push(id);
            }
        }
        out
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config_path = Path::new("config/default.toml");
        let config_str = std::fs::read_to_string(config_path)
            .with_context(|| format!("failed to read {}", config_path.display()))?;

        let mut config: Config =
            toml::from_str(&config_str).context("failed to parse config/default.toml")?;

        // Optional; CoinGecko's public endpoints work unauthenticated at a
        // lower rate limit.
        config.coingecko.api_key = std::env::var("COINGECKO_API_KEY").ok();

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.monitor.monitored_coins().is_empty() {
            bail!("monitor.coins must list at least one coin id");
        }
        if self.monitor.lookback_days == 0 {
            bail!("monitor.lookback_days must be > 0");
        }
        self.monitor
            .poll_period()
            .context("monitor.poll_interval is invalid")?;
        if self.coingecko.timeout_secs == 0 {
            bail!("coingecko.timeout_secs must be > 0");
        }
        Ok(())
    }
}

use anyhow::{Context, Result};
use tokio::time::{interval, MissedTickBehavior};

use coin_sentry::coingecko::CoinGeckoClient;
use coin_sentry::config::Config;
use coin_sentry::monitor::PriceMonitor;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load().context("failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                config
                    .logging
                    .level
                    .parse()
                    .unwrap_or_else(|_| "info".parse().unwrap())
            }),
        )
        .init();

    let coins = config.monitor.monitored_coins();
    let period = config
        .monitor
        .poll_period()
        .context("validated monitor.poll_interval became invalid at runtime")?;

    tracing::info!(
        coins = ?coins,
        lookback_days = config.monitor.lookback_days,
        poll_interval = %config.monitor.poll_interval,
        base_url = %config.coingecko.base_url,
        "Starting coin-sentry"
    );

    let client = CoinGeckoClient::new(&config.coingecko)?;
    client
        .ping()
        .await
        .context("CoinGecko is not reachable at startup")?;

    let monitor = PriceMonitor::new(client, coins, config.monitor.lookback_days);

    // One cycle runs at a time: the cycle is awaited inline here, and Skip
    // drops any ticks that fell due while a slow cycle was still running.
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let stats = monitor.run_cycle().await;
                tracing::info!(
                    checked = stats.checked,
                    failures = stats.failures,
                    buy_signals = stats.buy_signals,
                    "cycle complete"
                );
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Ctrl+C received, shutting down");
                break;
            }
        }
    }

    Ok(())
}

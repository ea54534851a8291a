use crate::model::{PriceSnapshot, Trend, TrendAnalysis};

/// Hourly samples in the short moving-average window (~7 days).
pub const MA_SHORT_WINDOW: usize = 168;
/// Hourly samples in the long moving-average window (~25 days).
pub const MA_LONG_WINDOW: usize = 600;

/// 24h change must clear +/-5% before a trend is called.
const TREND_CHANGE_THRESHOLD: f64 = 5.0;
/// Liquidity floor for the buy signal, in USD of 24h volume.
const VOLUME_FLOOR_USD: f64 = 1_000_000.0;
/// "Recovering" band for the 24h change: strictly above the crash floor,
/// strictly below the overextension ceiling.
const RECOVERY_CHANGE_MIN: f64 = -15.0;
const RECOVERY_CHANGE_MAX: f64 = 20.0;

/// Analyze one coin: moving averages, momentum, trend classification and
/// the four-condition buy heuristic. Pure and total over well-formed
/// inputs; `history` must be chronological ascending, most recent last.
pub fn analyze(current: &PriceSnapshot, history: &[f64]) -> TrendAnalysis {
    // 0.0 is the insufficient-history sentinel, not a real price level.
    // The buy-signal comparison below runs against the sentinel when
    // history is short, so it passes trivially for any positive price.
    let ma7 = moving_average(history, MA_SHORT_WINDOW);
    let ma25 = moving_average(history, MA_LONG_WINDOW);
    let momentum = momentum(history);

    let trend = classify(current.change_24h, ma7, ma25);
    let is_buy_signal = evaluate_buy_signal(current, ma25, momentum);

    TrendAnalysis {
        trend,
        momentum,
        is_buy_signal,
        summary: render_summary(current.change_24h, ma7, ma25, momentum, is_buy_signal),
    }
}

/// Mean of the last `window` samples, or 0.0 when there are fewer.
fn moving_average(prices: &[f64], window: usize) -> f64 {
    if prices.len() < window {
        return 0.0;
    }
    let tail = &prices[prices.len() - window..];
    tail.iter().sum::<f64>() / window as f64
}

/// Percent change between the two most recent samples, 0.0 below two.
fn momentum(prices: &[f64]) -> f64 {
    match prices {
        [.., previous, last] => (last - previous) / previous * 100.0,
        _ => 0.0,
    }
}

fn classify(change_24h: f64, ma7: f64, ma25: f64) -> Trend {
    if change_24h > TREND_CHANGE_THRESHOLD && ma7 > ma25 {
        Trend::Bullish
    } else if change_24h < -TREND_CHANGE_THRESHOLD && ma7 < ma25 {
        Trend::Bearish
    } else {
        Trend::Neutral
    }
}

fn evaluate_buy_signal(current: &PriceSnapshot, ma25: f64, momentum: f64) -> bool {
    let price_above_ma = current.price > ma25;
    let positive_momentum = momentum > 0.0;
    let high_volume = current.volume_24h > VOLUME_FLOOR_USD;
    let price_recovering =
        current.change_24h > RECOVERY_CHANGE_MIN && current.change_24h < RECOVERY_CHANGE_MAX;

    price_above_ma && positive_momentum && high_volume && price_recovering
}

/// Two fixed decimal places throughout; consumers parse this line.
fn render_summary(
    change_24h: f64,
    ma7: f64,
    ma25: f64,
    momentum: f64,
    is_buy_signal: bool,
) -> String {
    let verdict = if is_buy_signal {
        "✅ Current market conditions suggest a potential buying opportunity."
    } else {
        "⚠️ Market conditions do not meet buying criteria."
    };
    format!(
        "{} 24h Price Change: {:.2}%. 7-day MA: ${:.2}. 25-day MA: ${:.2}. Momentum: {:.2}%.",
        verdict, change_24h, ma7, ma25, momentum
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(price: f64, change_24h: f64, volume_24h: f64) -> PriceSnapshot {
        PriceSnapshot {
            price,
            change_24h,
            volume_24h,
        }
    }

    #[test]
    fn moving_average_uses_exactly_the_window_tail() {
        let prices: Vec<f64> = (1..=200).map(|i| i as f64).collect();
        let got = moving_average(&prices, MA_SHORT_WINDOW);
        // Mean of 33..=200.
        let expected = (33..=200).sum::<i64>() as f64 / 168.0;
        assert!((got - expected).abs() < 1e-9);
    }

    #[test]
    fn moving_average_short_history_is_sentinel_zero() {
        let prices: Vec<f64> = vec![100.0; MA_SHORT_WINDOW - 1];
        assert_eq!(moving_average(&prices, MA_SHORT_WINDOW), 0.0);
        assert_eq!(moving_average(&[], MA_SHORT_WINDOW), 0.0);
    }

    #[test]
    fn moving_average_exact_window_length() {
        let prices: Vec<f64> = vec![2.5; MA_LONG_WINDOW];
        let got = moving_average(&prices, MA_LONG_WINDOW);
        assert!((got - 2.5).abs() < 1e-12);
    }

    #[test]
    fn momentum_of_short_series_is_zero() {
        assert_eq!(momentum(&[]), 0.0);
        assert_eq!(momentum(&[100.0]), 0.0);
    }

    #[test]
    fn momentum_matches_percent_change_of_last_two() {
        let got = momentum(&[80.0, 99.0, 100.0]);
        assert!((got - (100.0 - 99.0) / 99.0 * 100.0).abs() < 1e-12);

        let falling = momentum(&[100.0, 90.0]);
        assert!((falling - (-10.0)).abs() < 1e-12);
    }

    #[test]
    fn trend_bullish_needs_both_change_and_ma_alignment() {
        assert_eq!(classify(6.0, 10.0, 9.0), Trend::Bullish);
        // Change above threshold but MAs not aligned.
        assert_eq!(classify(6.0, 9.0, 10.0), Trend::Neutral);
        // MAs aligned but change at the threshold, not above.
        assert_eq!(classify(5.0, 10.0, 9.0), Trend::Neutral);
    }

    #[test]
    fn trend_bearish_needs_both_change_and_ma_alignment() {
        assert_eq!(classify(-6.0, 9.0, 10.0), Trend::Bearish);
        assert_eq!(classify(-6.0, 10.0, 9.0), Trend::Neutral);
        assert_eq!(classify(-5.0, 9.0, 10.0), Trend::Neutral);
    }

    #[test]
    fn buy_signal_requires_all_four_conditions() {
        // Baseline: every condition holds.
        let base = snapshot(100.0, 6.0, 2_000_000.0);
        assert!(evaluate_buy_signal(&base, 90.0, 1.0));

        // Price at or below the long MA.
        assert!(!evaluate_buy_signal(&snapshot(90.0, 6.0, 2_000_000.0), 90.0, 1.0));
        // Momentum zero or negative.
        assert!(!evaluate_buy_signal(&base, 90.0, 0.0));
        assert!(!evaluate_buy_signal(&base, 90.0, -0.5));
        // Volume at the floor is not enough; strictly greater required.
        assert!(!evaluate_buy_signal(&snapshot(100.0, 6.0, 1_000_000.0), 90.0, 1.0));
        assert!(!evaluate_buy_signal(&snapshot(100.0, 6.0, 999_999.0), 90.0, 1.0));
        // 24h change outside the recovery band.
        assert!(!evaluate_buy_signal(&snapshot(100.0, -15.0, 2_000_000.0), 90.0, 1.0));
        assert!(!evaluate_buy_signal(&snapshot(100.0, 20.0, 2_000_000.0), 90.0, 1.0));
        // Just inside the band is fine.
        assert!(evaluate_buy_signal(&snapshot(100.0, -14.999, 2_000_000.0), 90.0, 1.0));
    }

    #[test]
    fn summary_formats_two_decimals() {
        let s = render_summary(6.0, 95.123456, 90.0, 1.0101, true);
        assert_eq!(
            s,
            "✅ Current market conditions suggest a potential buying opportunity. \
             24h Price Change: 6.00%. 7-day MA: $95.12. 25-day MA: $90.00. Momentum: 1.01%."
        );

        let s = render_summary(-2.5, 0.0, 0.0, -0.333, false);
        assert_eq!(
            s,
            "⚠️ Market conditions do not meet buying criteria. \
             24h Price Change: -2.50%. 7-day MA: $0.00. 25-day MA: $0.00. Momentum: -0.33%."
        );
    }
}

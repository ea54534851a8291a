use std::collections::HashMap;

use serde::Deserialize;

/// Per-coin object in the `/simple/price` response.
///
/// CoinGecko omits the change/volume fields for coins it has no 24h data
/// for, so they deserialize as `None` and the client decides how to fail.
#[derive(Debug, Deserialize)]
pub struct SimplePriceEntry {
    pub usd: f64,
    #[serde(default)]
    pub usd_24h_change: Option<f64>,
    #[serde(default)]
    pub usd_24h_vol: Option<f64>,
}

/// `/simple/price` keys the response by coin id.
pub type SimplePriceResponse = HashMap<String, SimplePriceEntry>;

/// `/coins/{id}/market_chart` response. Each entry is a
/// `[timestamp_ms, value]` pair, chronological ascending.
#[derive(Debug, Deserialize)]
pub struct MarketChartResponse {
    pub prices: Vec<[f64; 2]>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_simple_price_entry() {
        let json = r#"{
            "pepe": {
                "usd": 0.00001072,
                "usd_24h_change": 2.3456,
                "usd_24h_vol": 410232156.88
            }
        }"#;
        let resp: SimplePriceResponse = serde_json::from_str(json).unwrap();
        let entry = resp.get("pepe").unwrap();
        assert!((entry.usd - 0.00001072).abs() < 1e-12);
        assert!((entry.usd_24h_change.unwrap() - 2.3456).abs() < 1e-9);
        assert!((entry.usd_24h_vol.unwrap() - 410232156.88).abs() < 1e-3);
    }

    #[test]
    fn simple_price_missing_optional_fields() {
        let json = r#"{"dogecoin": {"usd": 0.123}}"#;
        let resp: SimplePriceResponse = serde_json::from_str(json).unwrap();
        let entry = resp.get("dogecoin").unwrap();
        assert!((entry.usd - 0.123).abs() < f64::EPSILON);
        assert!(entry.usd_24h_change.is_none());
        assert!(entry.usd_24h_vol.is_none());
    }

    #[test]
    fn simple_price_unknown_coin_is_empty_object() {
        let resp: SimplePriceResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.is_empty());
    }

    #[test]
    fn deserialize_market_chart() {
        let json = r#"{
            "prices": [
                [1700000000000, 0.0000101],
                [1700003600000, 0.0000102],
                [1700007200000, 0.0000104]
            ],
            "market_caps": [[1700000000000, 4301234567.0]],
            "total_volumes": [[1700000000000, 410232156.88]]
        }"#;
        let chart: MarketChartResponse = serde_json::from_str(json).unwrap();
        assert_eq!(chart.prices.len(), 3);
        assert!((chart.prices[0][0] - 1700000000000.0).abs() < 1.0);
        assert!((chart.prices[2][1] - 0.0000104).abs() < 1e-12);
    }

    #[test]
    fn deserialize_empty_market_chart() {
        let chart: MarketChartResponse = serde_json::from_str(r#"{"prices": []}"#).unwrap();
        assert!(chart.prices.is_empty());
    }
}

use thiserror::Error;

/// Failure of a single market-data fetch. Recovered per coin inside the
/// monitor cycle; never aborts the cycle itself.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("CoinGecko returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no market data for coin '{0}'")]
    UnknownCoin(String),

    #[error("missing field '{field}' in price response for '{coin}'")]
    MissingField { coin: String, field: &'static str },

    #[error("invalid price {price} for '{coin}': must be positive and finite")]
    InvalidPrice { coin: String, price: f64 },
}

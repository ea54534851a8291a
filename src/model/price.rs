/// One CoinGecko price snapshot at the moment of fetch.
///
/// `price` is guaranteed positive and finite by the REST client; a response
/// violating that fails the fetch before a snapshot is ever built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceSnapshot {
    /// Last traded price in USD.
    pub price: f64,
    /// 24h price change, percent (signed).
    pub change_24h: f64,
    /// 24h traded volume in USD.
    pub volume_24h: f64,
}

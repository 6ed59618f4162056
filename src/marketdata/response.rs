use serde::Deserialize;

// One entry of `/coins/markets`.
#[derive(Deserialize, Debug)]
pub struct MarketEntry {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub current_price: Option<f64>,
}

// One row of `/coins/{id}/ohlc`: [timestamp_ms, open, high, low, close].
#[derive(Deserialize, Debug)]
pub struct OhlcRow(pub i64, pub f64, pub f64, pub f64, pub f64);

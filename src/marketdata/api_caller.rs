use chrono::DateTime;

use super::response;
use crate::constants;
use crate::http::client::{RequestError, Requester};
use crate::model;

/// Read-only market data needed by the price table and the chart.
pub trait MarketSource {
    /// Current USD prices for the given coin ids, in the order the API returns them.
    async fn current_prices(&self, ids: &[&str]) -> Result<Vec<model::CoinQuote>, RequestError>;

    /// OHLC bars for one coin over the last `days` days, oldest first.
    async fn ohlc(&self, id: &str, days: u32) -> Result<Vec<model::HistoricalBar>, RequestError>;
}

// CoinGecko implements MarketSource over the public v3 REST API.
pub struct CoinGecko {
    base_url: String,
    requester: Requester,
}

impl CoinGecko {
    pub fn new(base_url: &str, requester: Requester) -> CoinGecko {
        CoinGecko {
            base_url: base_url.trim_end_matches('/').to_string(),
            requester,
        }
    }
}

impl MarketSource for CoinGecko {
    async fn current_prices(&self, ids: &[&str]) -> Result<Vec<model::CoinQuote>, RequestError> {
        let ids = ids.join(",");
        let resp = self
            .requester
            .get::<Vec<response::MarketEntry>>(
                &format!("{}/coins/markets", self.base_url),
                &[
                    ("vs_currency", constants::VS_CURRENCY),
                    ("ids", ids.as_str()),
                    ("order", "market_cap_desc"),
                ],
            )
            .await?;
        Ok(quotes_from_markets(resp))
    }

    async fn ohlc(&self, id: &str, days: u32) -> Result<Vec<model::HistoricalBar>, RequestError> {
        let resp = self
            .requester
            .get::<Vec<response::OhlcRow>>(
                &format!("{}/coins/{}/ohlc", self.base_url, id),
                &[
                    ("vs_currency", constants::VS_CURRENCY),
                    ("days", days.to_string().as_str()),
                ],
            )
            .await?;
        bars_from_rows(resp)
    }
}

// Drops entries without a price, the API sends null for delisted pairs.
fn quotes_from_markets(entries: Vec<response::MarketEntry>) -> Vec<model::CoinQuote> {
    entries
        .into_iter()
        .filter_map(|entry| match entry.current_price {
            Some(price) => Some(model::CoinQuote {
                id: entry.id,
                name: entry.name,
                symbol: entry.symbol,
                price_usd: price,
            }),
            None => {
                log::warn!("{} has no current price, skipping", entry.id);
                None
            }
        })
        .collect()
}

fn bars_from_rows(rows: Vec<response::OhlcRow>) -> Result<Vec<model::HistoricalBar>, RequestError> {
    let mut bars = Vec::with_capacity(rows.len());
    for response::OhlcRow(ts, open, high, low, close) in rows {
        let timestamp = DateTime::from_timestamp_millis(ts)
            .ok_or_else(|| RequestError::JsonError(format!("invalid timestamp {}", ts)))?;
        bars.push(model::HistoricalBar {
            timestamp,
            open,
            high,
            low,
            close,
        });
    }
    bars.sort_by_key(|bar| bar.timestamp);
    Ok(bars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn markets_payload_maps_to_quotes() {
        let body = r#"[
            {"id":"bitcoin","symbol":"btc","name":"Bitcoin","current_price":67012.5,"market_cap":1},
            {"id":"sui","symbol":"sui","name":"Sui","current_price":null}
        ]"#;
        let entries: Vec<response::MarketEntry> = serde_json::from_str(body).unwrap();
        let quotes = quotes_from_markets(entries);
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].id, "bitcoin");
        assert_eq!(quotes[0].symbol, "btc");
        assert_eq!(quotes[0].price_usd, 67012.5);
    }

    #[test]
    fn ohlc_rows_are_sorted_by_time() {
        let body = "[[1700000360000, 2.0, 3.0, 1.5, 2.5], [1700000000000, 1.0, 2.0, 0.5, 1.5]]";
        let rows: Vec<response::OhlcRow> = serde_json::from_str(body).unwrap();
        let bars = bars_from_rows(rows).unwrap();
        assert_eq!(bars.len(), 2);
        assert!(bars[0].timestamp < bars[1].timestamp);
        assert_eq!(bars[0].open, 1.0);
        assert_eq!(bars[1].close, 2.5);
    }

    #[test]
    fn short_ohlc_row_is_malformed() {
        let result = serde_json::from_str::<Vec<response::OhlcRow>>("[[1700000000000, 1.0]]");
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn unreachable_api_surfaces_network_error() {
        let requester = Requester::new(Duration::from_secs(2)).unwrap();
        let api = CoinGecko::new("http://127.0.0.1:1/api/v3/", requester);
        let err = api.current_prices(&["bitcoin"]).await.unwrap_err();
        assert!(matches!(err, RequestError::Network(..)));
        assert!(err.to_string().contains("127.0.0.1:1/api/v3/coins/markets"));
    }
}

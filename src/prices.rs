use std::collections::HashMap;

use chrono::{DateTime, Local};

use crate::marketdata::api_caller::MarketSource;
use crate::model::{self, AppError, Coin, CoinQuote};
use crate::table::{Align, Table};

/// Fetches current quotes for `coins`, ordered by market cap as the API returns them.
pub async fn fetch_quotes(source: &impl MarketSource, coins: &[Coin]) -> model::Result<Vec<CoinQuote>> {
    let ids: Vec<&str> = coins.iter().map(|c| c.id).collect();
    let quotes = source.current_prices(&ids).await?;

    if quotes.is_empty() {
        return Err(AppError::Data("No price data returned.".into()));
    }

    let by_id = quotes_by_id(&quotes);
    for coin in coins {
        if !by_id.contains_key(coin.id) {
            log::warn!("no quote returned for {} ({})", coin.name, coin.symbol);
        }
    }
    log::info!("fetched {} quotes", quotes.len());
    Ok(quotes)
}

/// Quotes keyed by coin id.
pub fn quotes_by_id(quotes: &[CoinQuote]) -> HashMap<&str, &CoinQuote> {
    quotes.iter().map(|q| (q.id.as_str(), q)).collect()
}

/// Formats a USD amount as `$1,234.56`.
pub fn format_usd(amount: f64) -> String {
    let formatted = format!("{:.2}", amount.abs());
    let (int_part, frac_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && formatted != "0.00" { "-" } else { "" };
    format!("{}${}.{}", sign, grouped, frac_part)
}

/// Renders the banner and price table shown at start-up.
pub fn render_price_table(quotes: &[CoinQuote], as_of: DateTime<Local>) -> String {
    let mut table = Table::new(&[
        ("Name", Align::Left),
        ("Symbol", Align::Left),
        ("Price", Align::Right),
    ]);
    for quote in quotes {
        table.add_row(vec![
            quote.name.clone(),
            quote.symbol.to_uppercase(),
            format_usd(quote.price_usd),
        ]);
    }

    format!(
        "\n===== Crypto Data =====\nPrices as of {}\n\n{}",
        as_of.format("%Y-%m-%d %H:%M:%S"),
        table.render()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants;
    use crate::http::client::RequestError;
    use crate::model::HistoricalBar;
    use chrono::TimeZone;

    struct FixedPrices(Vec<CoinQuote>);

    impl MarketSource for FixedPrices {
        async fn current_prices(&self, _ids: &[&str]) -> Result<Vec<CoinQuote>, RequestError> {
            Ok(self.0.clone())
        }

        async fn ohlc(&self, _id: &str, _days: u32) -> Result<Vec<HistoricalBar>, RequestError> {
            Ok(Vec::new())
        }
    }

    struct Offline;

    impl MarketSource for Offline {
        async fn current_prices(&self, _ids: &[&str]) -> Result<Vec<CoinQuote>, RequestError> {
            Err(RequestError::Network(
                "https://api.coingecko.com/api/v3/coins/markets".parse().unwrap(),
                "error trying to connect: dns error".into(),
            ))
        }

        async fn ohlc(&self, _id: &str, _days: u32) -> Result<Vec<HistoricalBar>, RequestError> {
            unreachable!()
        }
    }

    fn quote(id: &str, name: &str, symbol: &str, price: f64) -> CoinQuote {
        CoinQuote {
            id: id.into(),
            name: name.into(),
            symbol: symbol.into(),
            price_usd: price,
        }
    }

    #[test]
    fn usd_formatting() {
        assert_eq!(format_usd(0.0), "$0.00");
        assert_eq!(format_usd(0.123), "$0.12");
        assert_eq!(format_usd(999.999), "$1,000.00");
        assert_eq!(format_usd(1234567.891), "$1,234,567.89");
        assert_eq!(format_usd(100000.0), "$100,000.00");
        assert_eq!(format_usd(-42.5), "-$42.50");
    }

    #[test]
    fn table_lists_every_quote() {
        let quotes = vec![
            quote("bitcoin", "Bitcoin", "btc", 67012.5),
            quote("dogecoin", "Dogecoin", "doge", 0.1234),
        ];
        let as_of = Local.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
        let out = render_price_table(&quotes, as_of);
        assert!(out.contains("===== Crypto Data ====="));
        assert!(out.contains("Prices as of 2024-05-01 09:30:00"));
        assert!(out.contains("Bitcoin   BTC     $67,012.50"));
        assert!(out.contains("Dogecoin  DOGE         $0.12"));
    }

    #[tokio::test]
    async fn empty_response_is_a_data_error() {
        let err = fetch_quotes(&FixedPrices(Vec::new()), &constants::COINS)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Data(_)));
    }

    #[tokio::test]
    async fn keeps_api_order() {
        let source = FixedPrices(vec![
            quote("ethereum", "Ethereum", "eth", 3000.0),
            quote("bitcoin", "Bitcoin", "btc", 60000.0),
        ]);
        let quotes = fetch_quotes(&source, &constants::COINS).await.unwrap();
        let ids: Vec<&str> = quotes.iter().map(|q| q.id.as_str()).collect();
        assert_eq!(ids, vec!["ethereum", "bitcoin"]);
        assert_eq!(quotes_by_id(&quotes)["bitcoin"].price_usd, 60000.0);
    }

    #[tokio::test]
    async fn network_failure_carries_connection_details() {
        let err = fetch_quotes(&Offline, &constants::COINS).await.unwrap_err();
        assert!(matches!(err, AppError::Network(_)));
        let msg = err.to_string();
        assert!(msg.contains("api.coingecko.com"));
        assert!(msg.contains("error trying to connect"));
    }
}

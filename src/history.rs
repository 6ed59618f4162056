use crate::marketdata::api_caller::MarketSource;
use crate::model::{self, AppError, HistoricalBar, Period};

/// Title shown above a chart, e.g. `Bitcoin - Last 7 Days`.
pub fn chart_title(coin_name: &str, period: Period) -> String {
    format!("{} - Last {} Days", coin_name, period.days())
}

/// Fetches OHLC bars for a coin, oldest first.
pub async fn fetch_history(
    source: &impl MarketSource,
    coin_id: &str,
    period: Period,
) -> model::Result<Vec<HistoricalBar>> {
    let bars = source.ohlc(coin_id, period.days()).await?;
    if bars.is_empty() {
        return Err(AppError::Data("No historical data returned.".into()));
    }
    log::info!("fetched {} bars for {} over {} days", bars.len(), coin_id, period.days());
    Ok(bars)
}

/// Fetches the history for a coin and hands it to `plot`. `plot` is not called
/// when the fetch fails or returns no bars.
pub async fn chart_coin<F>(
    source: &impl MarketSource,
    coin_id: &str,
    period: Period,
    plot: F,
) -> model::Result<()>
where
    F: FnOnce(&[HistoricalBar]) -> model::Result<()>,
{
    let bars = fetch_history(source, coin_id, period).await?;
    plot(&bars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::client::RequestError;
    use crate::model::CoinQuote;
    use chrono::{TimeZone, Utc};
    use std::cell::Cell;

    struct MockHistory {
        bars: Vec<HistoricalBar>,
        requested: Cell<Option<(String, u32)>>,
    }

    impl MockHistory {
        fn new(bars: Vec<HistoricalBar>) -> Self {
            MockHistory {
                bars,
                requested: Cell::new(None),
            }
        }
    }

    impl MarketSource for MockHistory {
        async fn current_prices(&self, _ids: &[&str]) -> Result<Vec<CoinQuote>, RequestError> {
            Ok(Vec::new())
        }

        async fn ohlc(&self, id: &str, days: u32) -> Result<Vec<HistoricalBar>, RequestError> {
            self.requested.set(Some((id.to_string(), days)));
            Ok(self.bars.clone())
        }
    }

    fn sample_bar() -> HistoricalBar {
        HistoricalBar {
            timestamp: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
            open: 1.0,
            high: 2.0,
            low: 0.5,
            close: 1.5,
        }
    }

    #[test]
    fn title_names_coin_and_days() {
        assert_eq!(chart_title("Bitcoin", Period::OneWeek), "Bitcoin - Last 7 Days");
        assert_eq!(chart_title("Sui", Period::ThreeMonths), "Sui - Last 90 Days");
    }

    #[tokio::test]
    async fn empty_history_is_reported_and_not_plotted() {
        let source = MockHistory::new(Vec::new());
        let mut plotted = false;
        let err = chart_coin(&source, "bitcoin", Period::OneDay, |_| {
            plotted = true;
            Ok(())
        })
        .await
        .unwrap_err();

        assert_eq!(err.to_string(), "No historical data returned.");
        assert!(!plotted);
    }

    #[tokio::test]
    async fn bars_are_passed_to_plot() {
        let source = MockHistory::new(vec![sample_bar()]);
        let mut seen = 0;
        chart_coin(&source, "solana", Period::TwoWeeks, |bars| {
            seen = bars.len();
            Ok(())
        })
        .await
        .unwrap();

        assert_eq!(seen, 1);
        assert_eq!(source.requested.take(), Some(("solana".to_string(), 14)));
    }
}

use std::fmt::Display;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::http::client;

/// Static catalogue entry for a tracked coin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coin {
    pub id: &'static str,     // CoinGecko id.
    pub symbol: &'static str, // Ticker symbol.
    pub name: &'static str,   // Display name.
}

/// Current price snapshot for one coin.
#[derive(Debug, Clone, PartialEq)]
pub struct CoinQuote {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub price_usd: f64,
}

impl CoinQuote {
    /// Label used in the coin menu, e.g. `Bitcoin (BTC)`.
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.symbol.to_uppercase())
    }
}

/// One OHLC bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalBar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// Direction of a bar, decides its colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Bullish,
    Bearish,
}

impl HistoricalBar {
    pub fn trend(&self) -> Trend {
        if self.close >= self.open {
            Trend::Bullish
        } else {
            Trend::Bearish
        }
    }
}

/// Historical window offered in the period menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    OneDay,
    OneWeek,
    TwoWeeks,
    OneMonth,
    ThreeMonths,
}

impl Period {
    pub const ALL: [Period; 5] = [
        Period::OneDay,
        Period::OneWeek,
        Period::TwoWeeks,
        Period::OneMonth,
        Period::ThreeMonths,
    ];

    pub fn days(self) -> u32 {
        match self {
            Period::OneDay => 1,
            Period::OneWeek => 7,
            Period::TwoWeeks => 14,
            Period::OneMonth => 30,
            Period::ThreeMonths => 90,
        }
    }

    /// strftime pattern for time axis labels.
    pub fn time_format(self) -> &'static str {
        match self {
            Period::OneDay => "%H:%M",
            _ => "%Y-%m-%d",
        }
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.days())
    }
}

/// A validated 1-based menu choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuSelection(usize);

impl MenuSelection {
    /// Builds a selection when `number` lies in `[1, len]`.
    pub fn new(number: usize, len: usize) -> Option<MenuSelection> {
        (1..=len).contains(&number).then_some(MenuSelection(number))
    }

    pub fn number(self) -> usize {
        self.0
    }

    pub fn index(self) -> usize {
        self.0 - 1
    }
}

/// Rejected menu input.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum InputError {
    #[error("Invalid input; please enter a number.")]
    NotANumber,
    #[error("Please enter a number between 1 and {0}.")]
    OutOfRange(usize),
}

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Network(client::RequestError),
    #[error("{0}")]
    Data(String),
    #[error("selection cancelled")]
    Cancelled,
    #[error("Chart error: {0}")]
    Chart(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<client::RequestError> for AppError {
    fn from(value: client::RequestError) -> Self {
        match value {
            client::RequestError::JsonError(msg) => {
                Self::Data(format!("Malformed response: {}", msg))
            }
            other => Self::Network(other),
        }
    }
}

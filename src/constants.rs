use crate::model::Coin;

// Base URL for the CoinGecko API.
pub const DEFAULT_API_BASE: &str = "https://api.coingecko.com/api/v3";

// Quote currency for every request.
pub const VS_CURRENCY: &str = "usd";

pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

// Rows used by the candle area of the terminal chart.
pub const DEFAULT_CHART_HEIGHT: u16 = 20;

// PNG export size, 12x8 aspect.
pub const PNG_WIDTH: u32 = 1200;
pub const PNG_HEIGHT: u32 = 800;

// Coins shown in the price table.
pub const COINS: [Coin; 10] = [
    Coin { id: "bitcoin", symbol: "BTC", name: "Bitcoin" },
    Coin { id: "ethereum", symbol: "ETH", name: "Ethereum" },
    Coin { id: "ripple", symbol: "XRP", name: "XRP" },
    Coin { id: "binancecoin", symbol: "BNB", name: "Binance Coin" },
    Coin { id: "solana", symbol: "SOL", name: "Solana" },
    Coin { id: "dogecoin", symbol: "DOGE", name: "Dogecoin" },
    Coin { id: "cardano", symbol: "ADA", name: "Cardano" },
    Coin { id: "tron", symbol: "TRX", name: "TRON" },
    Coin { id: "hyperliquid", symbol: "HYPE", name: "Hyperliquid" },
    Coin { id: "sui", symbol: "SUI", name: "Sui" },
];

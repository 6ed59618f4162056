// Interactive crypto price table and candlestick chart.
mod marketdata {
    // CoinGecko client.
    pub mod api_caller;
    // Response structures for CoinGecko endpoints.
    pub mod response;
}
// HTTP client module.
mod http {
    // HTTP client implementation.
    pub mod client;
}
// Chart rendering.
mod chart {
    /// PNG export.
    pub mod png;
    /// Candlesticks drawn in the terminal.
    pub mod terminal;
}
// Settings read from the environment.
mod config;
// module storing defaults
mod constants;
// OHLC fetch and chart orchestration.
mod history;
// Numbered menus.
mod menu;
// Data models.
mod model;
// Current prices and the price table.
mod prices;
// Text tables.
mod table;

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use chrono::Local;
use clap::Parser;
use dotenv::dotenv;

use crate::config::Config;
use crate::http::client::Requester;
use crate::marketdata::api_caller::CoinGecko;
use crate::model::{AppError, CoinQuote, MenuSelection, Period};

// Command-line argument parser. The tool is driven by menus, so it takes no flags.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {}

#[tokio::main(flavor = "current_thread")]
// Main function entry point.
async fn main() -> ExitCode {
    dotenv().ok();

    env_logger::init();

    let _args = Args::parse();
    let config = Config::from_env();
    log::debug!("{:?}", config);

    run(&config).await
}

async fn run(config: &Config) -> ExitCode {
    let requester = match Requester::new(config.http_timeout) {
        Ok(requester) => requester,
        Err(err) => {
            log::debug!("{:?}", err);
            println!("Error building HTTP client: {}", err);
            return ExitCode::FAILURE;
        }
    };
    let api = CoinGecko::new(&config.api_base, requester);

    // Fetch and display current prices.
    let quotes = match prices::fetch_quotes(&api, &constants::COINS).await {
        Ok(quotes) => quotes,
        Err(err) => {
            log::debug!("{:?}", err);
            println!("Error fetching current prices: {}", err);
            return ExitCode::FAILURE;
        }
    };
    println!("{}", prices::render_price_table(&quotes, Local::now()));

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();

    // Menu positions follow the table, which follows the API order.
    let labels: Vec<String> = quotes.iter().map(CoinQuote::label).collect();
    let quote = match choose("Select a cryptocurrency:", &labels, &mut input, &mut output) {
        Ok(selection) => &quotes[selection.index()],
        Err(code) => return code,
    };

    let period_labels: Vec<String> = Period::ALL.iter().map(Period::to_string).collect();
    let period = match choose(
        "\nSelect historical data period (days):",
        &period_labels,
        &mut input,
        &mut output,
    ) {
        Ok(selection) => Period::ALL[selection.index()],
        Err(code) => return code,
    };

    println!("\nFetching {} data for last {} days...\n", quote.name, period.days());

    let title = history::chart_title(&quote.name, period);
    let width = crossterm::terminal::size()
        .map(|(cols, _)| cols as usize)
        .unwrap_or(80);

    let result = history::chart_coin(&api, &quote.id, period, |bars| {
        chart::terminal::CandleChart::new(bars, period, width, config.chart_height as usize)
            .draw(&title, &mut io::stdout())?;
        if let Some(path) = &config.chart_png_path {
            chart::png::draw(
                bars,
                &title,
                period,
                path,
                (constants::PNG_WIDTH, constants::PNG_HEIGHT),
            )?;
            println!("\nChart saved to {}", path.display());
        }
        Ok(())
    })
    .await;

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err @ (AppError::Chart(_) | AppError::Io(_))) => {
            log::debug!("{:?}", err);
            println!("Error rendering chart: {}", err);
            ExitCode::FAILURE
        }
        Err(err) => {
            log::debug!("{:?}", err);
            println!("Error fetching historical data for {}: {}", quote.id, err);
            ExitCode::FAILURE
        }
    }
}

// Runs one menu. Cancelling ends the program cleanly.
fn choose<R: BufRead, W: Write>(
    prompt: &str,
    labels: &[String],
    input: &mut R,
    output: &mut W,
) -> Result<MenuSelection, ExitCode> {
    match menu::select_option(prompt, labels, input, output) {
        Ok(selection) => Ok(selection),
        Err(AppError::Cancelled) => {
            println!("\nGoodbye.");
            Err(ExitCode::SUCCESS)
        }
        Err(err) => {
            log::debug!("{:?}", err);
            println!("Error reading selection: {}", err);
            Err(ExitCode::FAILURE)
        }
    }
}

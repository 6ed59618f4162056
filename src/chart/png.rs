use std::ops::Range;
use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::model::{self, AppError, HistoricalBar, Period, Trend};

/// Draws `bars` as a candlestick chart into a PNG file at `path`.
pub fn draw(
    bars: &[HistoricalBar],
    title: &str,
    period: Period,
    path: &Path,
    size: (u32, u32),
) -> model::Result<()> {
    if bars.is_empty() {
        return Err(AppError::Data("No historical data returned.".into()));
    }

    let root = BitMapBackend::new(path, size).into_drawing_area();
    plot(&root, bars, title, period)?;

    log::info!("chart written to {}", path.display());
    Ok(())
}

/// Candle colour, green when close >= open.
pub fn trend_style(bar: &HistoricalBar) -> ShapeStyle {
    match bar.trend() {
        Trend::Bullish => GREEN.filled(),
        Trend::Bearish => RED.filled(),
    }
}

// Renders onto any plotters backend. `bars` must not be empty.
fn plot<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    bars: &[HistoricalBar],
    title: &str,
    period: Period,
) -> model::Result<()> {
    let time_range = time_range(bars);
    let price_range = price_range(bars);
    let candle_width = candle_width(root.dim_in_pixel().0, bars.len());
    let fmt = period.time_format();

    root.fill(&WHITE)
        .map_err(|e| AppError::Chart(format!("Failed to fill canvas: {}", e)))?;

    let mut chart = ChartBuilder::on(root)
        .caption(title, ("sans-serif", 32.0).into_font())
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(80)
        .build_cartesian_2d(time_range, price_range)
        .map_err(|e| AppError::Chart(format!("Failed to build chart: {}", e)))?;

    chart
        .configure_mesh()
        .y_desc("Price (USD)")
        .x_labels(8)
        .x_label_formatter(&|t: &DateTime<Utc>| t.format(fmt).to_string())
        .draw()
        .map_err(|e| AppError::Chart(format!("Failed to draw mesh: {}", e)))?;

    // CandleStick treats open == close as a loss, so the colour comes from trend_style.
    chart
        .draw_series(bars.iter().map(|bar| {
            let style = trend_style(bar);
            CandleStick::new(
                bar.timestamp,
                bar.open,
                bar.high,
                bar.low,
                bar.close,
                style,
                style,
                candle_width,
            )
        }))
        .map_err(|e| AppError::Chart(format!("Failed to draw candles: {}", e)))?;

    root.present()
        .map_err(|e| AppError::Chart(format!("Failed to render chart: {}", e)))?;
    Ok(())
}

// Pads the time axis by half a bucket on each side so edge candles are not clipped.
fn time_range(bars: &[HistoricalBar]) -> Range<DateTime<Utc>> {
    let first = bars[0].timestamp;
    let last = bars[bars.len() - 1].timestamp;
    let bucket = if last > first {
        (last - first) / (bars.len() as i32 - 1)
    } else {
        Duration::minutes(30)
    };
    let pad = bucket / 2;
    (first - pad)..(last + pad)
}

fn price_range(bars: &[HistoricalBar]) -> Range<f64> {
    let min = bars.iter().map(|b| b.low).fold(f64::INFINITY, f64::min);
    let max = bars.iter().map(|b| b.high).fold(f64::NEG_INFINITY, f64::max);
    let padding = ((max - min) * 0.05).max(max.abs() * 1e-4).max(1e-8);
    (min - padding).max(0.0)..(max + padding)
}

fn candle_width(image_width: u32, count: usize) -> u32 {
    let per_bar = image_width as f64 * 0.8 / count.max(1) as f64;
    (per_bar * 0.6).clamp(1.0, 15.0) as u32
}

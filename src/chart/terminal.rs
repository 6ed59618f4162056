use std::io::Write;

use crossterm::{
    queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
};

use crate::model::{self, HistoricalBar, Period, Trend};

const BODY: char = '┃';
const WICK: char = '│';
const VOID: char = ' ';

// Width of the price labels left of the axis.
const Y_LABEL_WIDTH: usize = 12;
// A price label is printed every this many rows.
const Y_LABEL_EVERY: usize = 4;
// Widest spacing between two candles.
const MAX_STEP: usize = 3;

pub fn trend_color(trend: Trend) -> Color {
    match trend {
        Trend::Bullish => Color::Green,
        Trend::Bearish => Color::Red,
    }
}

/// One character of the plot area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub color: Option<Color>,
}

impl Cell {
    const EMPTY: Cell = Cell { ch: VOID, color: None };
}

/// Text candlestick chart sized for a terminal.
pub struct CandleChart<'a> {
    bars: &'a [HistoricalBar], // Visible bars, oldest first.
    period: Period,
    min_price: f64,
    max_price: f64,
    height: usize,     // Rows of the plot area.
    plot_width: usize, // Columns right of the axis.
    step: usize,       // Columns per candle.
}

impl<'a> CandleChart<'a> {
    /// Lays out `bars` in a plot area of `width` by `height` characters.
    /// Only the most recent bars that fit are kept.
    pub fn new(bars: &'a [HistoricalBar], period: Period, width: usize, height: usize) -> Self {
        let plot_width = width.saturating_sub(Y_LABEL_WIDTH + 2).max(1);
        let visible = if bars.len() > plot_width {
            log::info!("showing the last {} of {} bars", plot_width, bars.len());
            &bars[bars.len() - plot_width..]
        } else {
            bars
        };
        let step = if visible.is_empty() {
            1
        } else {
            (plot_width / visible.len()).clamp(1, MAX_STEP)
        };

        let (min_price, max_price) = price_bounds(visible);
        CandleChart {
            bars: visible,
            period,
            min_price,
            max_price,
            height: height.max(1),
            plot_width,
            step,
        }
    }

    // Row index of a price, 0 is the bottom row.
    fn row_of(&self, price: f64) -> usize {
        if self.max_price <= self.min_price {
            return self.height / 2;
        }
        let scaled = (price - self.min_price) / (self.max_price - self.min_price) * self.height as f64;
        (scaled.floor().max(0.0) as usize).min(self.height - 1)
    }

    fn cell(&self, bar: &HistoricalBar, row: usize) -> Cell {
        let body_low = self.row_of(bar.open.min(bar.close));
        let body_high = self.row_of(bar.open.max(bar.close));
        let wick_low = self.row_of(bar.low);
        let wick_high = self.row_of(bar.high);

        let ch = if (body_low..=body_high).contains(&row) {
            BODY
        } else if (wick_low..=wick_high).contains(&row) {
            WICK
        } else {
            return Cell::EMPTY;
        };
        Cell {
            ch,
            color: Some(trend_color(bar.trend())),
        }
    }

    /// Plot area cells, top row first.
    pub fn grid(&self) -> Vec<Vec<Cell>> {
        let width = self.bars.len() * self.step;
        (0..self.height)
            .rev()
            .map(|row| {
                let mut line = vec![Cell::EMPTY; width];
                for (i, bar) in self.bars.iter().enumerate() {
                    line[i * self.step] = self.cell(bar, row);
                }
                line
            })
            .collect()
    }

    fn y_label(&self, row: usize) -> String {
        if row % Y_LABEL_EVERY != 0 && row != self.height - 1 {
            return " ".repeat(Y_LABEL_WIDTH);
        }
        let span = (self.max_price - self.min_price) / self.height as f64;
        let price = self.min_price + span * (row as f64 + 0.5);
        format!("{:>width$.prec$}", price, width = Y_LABEL_WIDTH, prec = price_precision(price))
    }

    /// Time labels under the plot, placed so they never overlap.
    pub fn x_labels(&self) -> String {
        let width = self.plot_width;
        let mut line = vec![' '; width];
        let mut next_free = 0;
        for (i, bar) in self.bars.iter().enumerate() {
            let column = i * self.step;
            let label = bar.timestamp.format(self.period.time_format()).to_string();
            let len = label.chars().count();
            if column < next_free || column + len > width {
                continue;
            }
            for (offset, ch) in label.chars().enumerate() {
                line[column + offset] = ch;
            }
            next_free = column + len + 2;
        }
        line.into_iter().collect::<String>().trim_end().to_string()
    }

    /// Writes the chart with ANSI colours.
    pub fn draw<W: Write>(&self, title: &str, out: &mut W) -> model::Result<()> {
        if self.bars.is_empty() {
            return Err(model::AppError::Data("No historical data returned.".into()));
        }

        queue!(out, Print(format!("\n{:>width$}{}\n\n", "", title, width = Y_LABEL_WIDTH + 2)))?;
        for (i, line) in self.grid().iter().enumerate() {
            let row = self.height - 1 - i;
            queue!(out, Print(self.y_label(row)), Print(" │"))?;
            for cell in line {
                match cell.color {
                    Some(color) => queue!(out, SetForegroundColor(color), Print(cell.ch), ResetColor)?,
                    None => queue!(out, Print(cell.ch))?,
                }
            }
            queue!(out, Print("\n"))?;
        }

        let axis_width = self.bars.len() * self.step;
        queue!(
            out,
            Print(format!("{:>width$} └{}\n", "", "─".repeat(axis_width), width = Y_LABEL_WIDTH)),
            Print(format!("{:>width$}  {}\n", "", self.x_labels(), width = Y_LABEL_WIDTH)),
            Print(format!("{:>width$}  Price (USD)\n", "", width = Y_LABEL_WIDTH)),
        )?;
        out.flush()?;
        Ok(())
    }
}

fn price_bounds(bars: &[HistoricalBar]) -> (f64, f64) {
    let max = bars.iter().fold(f64::NEG_INFINITY, |max, b| max.max(b.high));
    let min = bars.iter().fold(f64::INFINITY, |min, b| min.min(b.low));
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 0.0);
    }
    (min, max)
}

// Sub-dollar coins need more decimals to be readable.
fn price_precision(price: f64) -> usize {
    match price.abs() {
        p if p >= 100.0 => 2,
        p if p >= 1.0 => 3,
        p if p >= 0.01 => 4,
        _ => 6,
    }
}

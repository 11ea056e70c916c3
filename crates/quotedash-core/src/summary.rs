use crate::notice::{Notice, Outcome};
use crate::series::PriceSeries;
use chrono::NaiveDate;
use serde::Serialize;

/// Number of bars in the recent-history table.
pub const RECENT_ROWS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DailyChange {
    pub latest_close: f64,
    pub previous_close: f64,
    pub change: f64,
}

/// Latest close minus the close before it.
pub fn daily_change(series: &PriceSeries) -> Outcome<DailyChange> {
    match series.tail(2) {
        [previous, latest] => Ok(DailyChange {
            latest_close: latest.close,
            previous_close: previous.close,
            change: latest.close - previous.close,
        }),
        bars => Err(Notice::error(format!(
            "Error accessing daily close data: need two closing prices, found {}",
            bars.len()
        ))),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecentRow {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// The most recent bars, newest first, prices rounded to 3 decimals.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecentHistory {
    pub rows: Vec<RecentRow>,
}

impl RecentHistory {
    pub const COLUMNS: [&'static str; 6] = ["Date", "Open", "High", "Low", "Close", "Volume"];
}

pub fn recent_history(series: &PriceSeries) -> RecentHistory {
    let rows = series
        .tail(RECENT_ROWS)
        .iter()
        .rev()
        .map(|bar| RecentRow {
            date: bar.date,
            open: round_to(bar.open, 3),
            high: round_to(bar.high, 3),
            low: round_to(bar.low, 3),
            close: round_to(bar.close, 3),
            volume: bar.volume,
        })
        .collect();
    RecentHistory { rows }
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

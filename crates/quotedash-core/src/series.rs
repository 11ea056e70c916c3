//! Daily OHLCV history for one ticker.

use crate::selection::Period;
use chrono::NaiveDate;
use serde::Serialize;

/// A single daily bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Bars ordered by date, ascending, at most one per date.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PriceSeries {
    bars: Vec<Bar>,
}

impl PriceSeries {
    /// Sorts `bars` by date; when a date repeats, the bar that came last wins.
    pub fn new(mut bars: Vec<Bar>) -> Self {
        // stable sort keeps arrival order within a date, so the later bar is
        // the one that survives the reverse-dedup below
        bars.sort_by_key(|bar| bar.date);
        bars.reverse();
        bars.dedup_by_key(|bar| bar.date);
        bars.reverse();
        Self { bars }
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first(&self) -> Option<&Bar> {
        self.bars.first()
    }

    pub fn latest(&self) -> Option<&Bar> {
        self.bars.last()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars.iter().map(|bar| bar.date).collect()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|bar| bar.close).collect()
    }

    /// The last `n` bars (fewer if the series is shorter), still ascending.
    pub fn tail(&self, n: usize) -> &[Bar] {
        let start = self.bars.len().saturating_sub(n);
        &self.bars[start..]
    }

    /// Index of the first bar inside `period`, counted back from the last bar.
    pub fn window_start(&self, period: Period) -> usize {
        let Some(last) = self.latest() else {
            return 0;
        };
        match period.cutoff(last.date) {
            Some(cutoff) => self.bars.partition_point(|bar| bar.date <= cutoff),
            None => 0,
        }
    }

    /// Copy of the bars that fall inside `period`.
    pub fn window(&self, period: Period) -> PriceSeries {
        PriceSeries {
            bars: self.bars[self.window_start(period)..].to_vec(),
        }
    }
}

impl From<Vec<Bar>> for PriceSeries {
    fn from(bars: Vec<Bar>) -> Self {
        Self::new(bars)
    }
}

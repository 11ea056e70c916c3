//! Chooses which two charts to draw for the current [`Selection`], and from
//! which series.

use crate::notice::{Notice, Outcome};
use crate::selection::{ChartType, Indicator, Period, Selection, SelectionError};
use crate::series::{Bar, PriceSeries};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{error, trace, warn};

/// Message shown instead of charts when the history is empty.
pub const NO_CHART_DATA: &str = "No price history available to chart for this ticker.";

/// Charting helpers the selector drives.
///
/// Each helper draws the bars of a [`ChartSeries`] under its period label.
/// The history before the window is there for indicator warm-up only.
pub trait ChartRenderer {
    type Artifact;

    fn render_close(&self, series: &ChartSeries<'_>) -> anyhow::Result<Self::Artifact>;

    fn render_candlestick(&self, series: &ChartSeries<'_>) -> anyhow::Result<Self::Artifact>;

    fn render_rsi(&self, series: &ChartSeries<'_>) -> anyhow::Result<Self::Artifact>;

    fn render_macd(&self, series: &ChartSeries<'_>) -> anyhow::Result<Self::Artifact>;

    fn render_moving_average(&self, series: &ChartSeries<'_>) -> anyhow::Result<Self::Artifact>;
}

/// The bars one render call draws, still attached to the history they were
/// cut from.
#[derive(Debug, Clone, Copy)]
pub struct ChartSeries<'a> {
    history: &'a PriceSeries,
    start: usize,
    period: Period,
}

impl<'a> ChartSeries<'a> {
    /// Windows `history` to the bars inside `period`.
    pub fn new(history: &'a PriceSeries, period: Period) -> Self {
        Self {
            history,
            start: history.window_start(period),
            period,
        }
    }

    pub fn period(&self) -> Period {
        self.period
    }

    /// Bars inside the period, ascending.
    pub fn bars(&self) -> &'a [Bar] {
        &self.history.bars()[self.start..]
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.bars().iter().map(|bar| bar.date).collect()
    }

    /// The whole history the window was cut from.
    pub fn history(&self) -> &'a PriceSeries {
        self.history
    }

    /// Index of the first drawn bar within [`history`](Self::history).
    pub fn start(&self) -> usize {
        self.start
    }

    pub fn len(&self) -> usize {
        self.history.len() - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cuts values computed bar by bar over the whole history down to the
    /// window.
    pub fn clip<'v, T>(&self, values: &'v [T]) -> &'v [T] {
        &values[self.start.min(values.len())..]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartKind {
    Close,
    Candlestick,
    Rsi,
    Macd,
    MovingAverage,
}

impl ChartKind {
    pub fn label(self) -> &'static str {
        match self {
            ChartKind::Close => "close",
            ChartKind::Candlestick => "candlestick",
            ChartKind::Rsi => "RSI",
            ChartKind::Macd => "MACD",
            ChartKind::MovingAverage => "moving average",
        }
    }
}

/// Which series the charts consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesSource {
    /// The whole history, as fetched.
    Full,
    /// The history cut down to a period.
    Windowed(Period),
}

/// The two render calls for a selection, in the order they are issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartPlan {
    pub primary: ChartKind,
    pub secondary: ChartKind,
    pub source: SeriesSource,
    /// Period label handed to both calls.
    pub period: Period,
}

pub struct ChartSelector;

impl ChartSelector {
    /// Looks the selection up in the dispatch table.
    ///
    /// | chart  | indicator      | primary     | secondary      |
    /// |--------|----------------|-------------|----------------|
    /// | Candle | RSI            | candlestick | RSI            |
    /// | Candle | MACD           | candlestick | MACD           |
    /// | Line   | RSI            | close       | RSI            |
    /// | Line   | Moving Average | close       | moving average |
    /// | Line   | MACD           | close       | MACD           |
    ///
    /// Candle with Moving Average is never offered and is rejected here.
    pub fn plan(selection: &Selection) -> Result<ChartPlan, SelectionError> {
        let (primary, secondary) = match (selection.chart_type, selection.indicator) {
            (ChartType::Candle, Indicator::Rsi) => (ChartKind::Candlestick, ChartKind::Rsi),
            (ChartType::Candle, Indicator::Macd) => (ChartKind::Candlestick, ChartKind::Macd),
            (ChartType::Line, Indicator::Rsi) => (ChartKind::Close, ChartKind::Rsi),
            (ChartType::Line, Indicator::MovingAverage) => {
                (ChartKind::Close, ChartKind::MovingAverage)
            }
            (ChartType::Line, Indicator::Macd) => (ChartKind::Close, ChartKind::Macd),
            (chart_type @ ChartType::Candle, indicator @ Indicator::MovingAverage) => {
                return Err(SelectionError::NotOffered {
                    chart_type,
                    indicator,
                })
            }
        };

        let (source, period) = match selection.period {
            None => (SeriesSource::Full, Period::DEFAULT),
            Some(period) => (SeriesSource::Windowed(period), period),
        };

        Ok(ChartPlan {
            primary,
            secondary,
            source,
            period,
        })
    }

    /// Renders the two charts for `selection` from the full `history`.
    ///
    /// An empty history yields a warning and no render call at all.
    pub fn dispatch<R>(
        selection: &Selection,
        history: &PriceSeries,
        renderer: &R,
    ) -> Outcome<[R::Artifact; 2]>
    where
        R: ChartRenderer + ?Sized,
    {
        if history.is_empty() {
            warn!("refusing to chart an empty price history");
            return Err(Notice::warning(NO_CHART_DATA));
        }

        let plan = Self::plan(selection).map_err(|e| {
            error!("invalid chart selection {selection:?}: {e}");
            Notice::error(e.to_string())
        })?;
        trace!("chart plan: {plan:?}");

        // indicators are computed over all of `history`, only the window is drawn
        let series = match plan.source {
            SeriesSource::Full => ChartSeries::new(history, Period::DEFAULT),
            SeriesSource::Windowed(period) => ChartSeries::new(history, period),
        };

        let primary = render(renderer, plan.primary, &series)?;
        let secondary = render(renderer, plan.secondary, &series)?;
        Ok([primary, secondary])
    }
}

fn render<R>(
    renderer: &R,
    kind: ChartKind,
    series: &ChartSeries<'_>,
) -> Outcome<R::Artifact>
where
    R: ChartRenderer + ?Sized,
{
    let artifact = match kind {
        ChartKind::Close => renderer.render_close(series),
        ChartKind::Candlestick => renderer.render_candlestick(series),
        ChartKind::Rsi => renderer.render_rsi(series),
        ChartKind::Macd => renderer.render_macd(series),
        ChartKind::MovingAverage => renderer.render_moving_average(series),
    };
    artifact.map_err(|e| {
        error!("{} chart failed to render: {e:#}", kind.label());
        Notice::error(format!("Failed to render {} chart: {e}", kind.label()))
    })
}

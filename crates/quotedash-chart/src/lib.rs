//! Plotly figures for the dashboard: price charts, indicator charts and
//! tables.
//!
//! Every chart draws the window of a [`ChartSeries`]. Indicators are computed
//! over the whole history behind it, then clipped to the window.

pub mod figure;
pub mod indicators;
pub mod table;

pub use figure::Figure;
pub use table::render_table;

use chrono::NaiveDate;
use figure::{guide, layout, line, with_range_slider};
use quotedash_core::{Bar, ChartRenderer, ChartSeries};
use serde_json::json;
use tracing::debug;

const PRICE_HEIGHT: u32 = 500;
const RSI_HEIGHT: u32 = 200;
const MACD_HEIGHT: u32 = 320;

const OVERBOUGHT: f64 = 70.0;
const OVERSOLD: f64 = 30.0;

const UP: &str = "green";
const DOWN: &str = "red";

#[derive(Debug, Clone, Copy, Default)]
pub struct PlotlyCharts;

/// The drawn bars of a series and their dates.
struct Window<'a> {
    series: ChartSeries<'a>,
    dates: Vec<NaiveDate>,
}

impl<'a> Window<'a> {
    fn of(series: &ChartSeries<'a>) -> Self {
        debug!(
            "charting {} of {} bars for {}",
            series.len(),
            series.history().len(),
            series.period().label()
        );
        Self {
            series: *series,
            dates: series.dates(),
        }
    }

    fn caption(&self) -> &'static str {
        self.series.period().caption()
    }

    fn field(&self, f: impl Fn(&Bar) -> f64) -> Vec<f64> {
        self.series.bars().iter().map(f).collect()
    }

    /// Closes of the whole history, for indicators that need a warm-up.
    fn all_closes(&self) -> Vec<f64> {
        self.series.history().closes()
    }

    fn clip<'v, T>(&self, values: &'v [T]) -> &'v [T] {
        self.series.clip(values)
    }

    fn ohlc_lines(&self, mut figure: Figure) -> Figure {
        for (name, values) in [
            ("Open", self.field(|b| b.open)),
            ("Close", self.field(|b| b.close)),
            ("High", self.field(|b| b.high)),
            ("Low", self.field(|b| b.low)),
        ] {
            figure = figure.trace(line(name, &self.dates, &values));
        }
        figure
    }
}

impl ChartRenderer for PlotlyCharts {
    type Artifact = Figure;

    fn render_close(&self, series: &ChartSeries<'_>) -> anyhow::Result<Figure> {
        let window = Window::of(series);
        let layout = with_range_slider(layout(format!("Price ({})", window.caption()), PRICE_HEIGHT));
        Ok(window.ohlc_lines(Figure::new(layout)))
    }

    fn render_candlestick(&self, series: &ChartSeries<'_>) -> anyhow::Result<Figure> {
        let window = Window::of(series);
        let mut layout = layout(format!("Candlestick ({})", window.caption()), PRICE_HEIGHT);
        layout = with_range_slider(layout);
        layout["showlegend"] = json!(false);

        Ok(Figure::new(layout).trace(json!({
            "type": "candlestick",
            "name": "Price",
            "x": window.dates,
            "open": window.field(|b| b.open),
            "high": window.field(|b| b.high),
            "low": window.field(|b| b.low),
            "close": window.field(|b| b.close),
        })))
    }

    fn render_rsi(&self, series: &ChartSeries<'_>) -> anyhow::Result<Figure> {
        let window = Window::of(series);
        let values = indicators::rsi(&window.all_closes())?;

        let mut layout = layout(format!("RSI {} ({})", indicators::RSI_PERIOD, window.caption()), RSI_HEIGHT);
        layout["yaxis"] = json!({ "range": [0, 100] });

        Ok(Figure::new(layout)
            .trace(line("RSI", &window.dates, window.clip(&values)))
            .trace(guide("Overbought", &window.dates, OVERBOUGHT, DOWN))
            .trace(guide("Oversold", &window.dates, OVERSOLD, UP)))
    }

    fn render_macd(&self, series: &ChartSeries<'_>) -> anyhow::Result<Figure> {
        let window = Window::of(series);
        let macd = indicators::macd(&window.all_closes())?;

        let histogram = window.clip(&macd.histogram);
        let colors: Vec<&str> = histogram
            .iter()
            .map(|v| if *v >= 0.0 { UP } else { DOWN })
            .collect();

        let title = format!(
            "MACD {}, {}, {} ({})",
            indicators::MACD_FAST,
            indicators::MACD_SLOW,
            indicators::MACD_SIGNAL,
            window.caption()
        );
        Ok(Figure::new(layout(title, MACD_HEIGHT))
            .trace(line("MACD", &window.dates, window.clip(&macd.macd)))
            .trace(line("Signal", &window.dates, window.clip(&macd.signal)))
            .trace(json!({
                "type": "bar",
                "name": "Histogram",
                "x": window.dates,
                "y": histogram,
                "marker": { "color": colors },
            })))
    }

    fn render_moving_average(&self, series: &ChartSeries<'_>) -> anyhow::Result<Figure> {
        let window = Window::of(series);
        let sma = indicators::sma(&window.all_closes())?;

        let layout = layout(
            format!("Moving average {} ({})", indicators::SMA_PERIOD, window.caption()),
            PRICE_HEIGHT,
        );
        let figure = window.ohlc_lines(Figure::new(layout));
        Ok(figure.trace(line(
            &format!("SMA {}", indicators::SMA_PERIOD),
            &window.dates,
            window.clip(&sma),
        )))
    }
}

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    #[error("{indicator} is not available for {chart_type} charts")]
    NotOffered {
        chart_type: ChartType,
        indicator: Indicator,
    },

    #[error("unknown chart type {0:?}; expected candle or line")]
    UnknownChartType(String),

    #[error("unknown indicator {0:?}; expected rsi, macd or moving-average")]
    UnknownIndicator(String),

    #[error("unknown period {0:?}; expected one of 5d, 1mo, 6mo, ytd, 1y, 5y, max")]
    UnknownPeriod(String),
}

///////////////////////////////////////////////////////////////////////////////////////////////////
//
// Chart type
//
///////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    #[default]
    Candle,
    Line,
}

impl ChartType {
    pub const ALL: [ChartType; 2] = [ChartType::Candle, ChartType::Line];

    pub fn label(self) -> &'static str {
        match self {
            ChartType::Candle => "Candle",
            ChartType::Line => "Line",
        }
    }

    /// Value used in query strings.
    pub fn param(self) -> &'static str {
        match self {
            ChartType::Candle => "candle",
            ChartType::Line => "line",
        }
    }
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ChartType {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "candle" | "candlestick" => Ok(ChartType::Candle),
            "line" => Ok(ChartType::Line),
            _ => Err(SelectionError::UnknownChartType(s.to_string())),
        }
    }
}

///////////////////////////////////////////////////////////////////////////////////////////////////
//
// Indicator
//
///////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Indicator {
    #[default]
    Rsi,
    Macd,
    MovingAverage,
}

impl Indicator {
    /// Indicators the selector offers for `chart_type`, in display order.
    ///
    /// Candlestick charts never offer the moving average.
    pub fn offered_for(chart_type: ChartType) -> &'static [Indicator] {
        match chart_type {
            ChartType::Candle => &[Indicator::Rsi, Indicator::Macd],
            ChartType::Line => &[Indicator::Rsi, Indicator::MovingAverage, Indicator::Macd],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Indicator::Rsi => "RSI",
            Indicator::Macd => "MACD",
            Indicator::MovingAverage => "Moving Average",
        }
    }

    pub fn param(self) -> &'static str {
        match self {
            Indicator::Rsi => "rsi",
            Indicator::Macd => "macd",
            Indicator::MovingAverage => "moving-average",
        }
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Indicator {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['_', ' '], "-").as_str() {
            "rsi" => Ok(Indicator::Rsi),
            "macd" => Ok(Indicator::Macd),
            "moving-average" | "ma" | "sma" => Ok(Indicator::MovingAverage),
            _ => Err(SelectionError::UnknownIndicator(s.to_string())),
        }
    }
}

///////////////////////////////////////////////////////////////////////////////////////////////////
//
// Period
//
///////////////////////////////////////////////////////////////////////////////////////////////////

/// Relative window over a price history, measured back from its last bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Period {
    #[serde(rename = "5d")]
    FiveDays,
    #[serde(rename = "1mo")]
    OneMonth,
    #[serde(rename = "6mo")]
    SixMonths,
    #[serde(rename = "ytd")]
    YearToDate,
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "5y")]
    FiveYears,
    #[serde(rename = "max")]
    Max,
}

impl Period {
    /// Button order on the page.
    pub const ALL: [Period; 7] = [
        Period::FiveDays,
        Period::OneMonth,
        Period::SixMonths,
        Period::YearToDate,
        Period::OneYear,
        Period::FiveYears,
        Period::Max,
    ];

    /// Window used for charts when no period button was pressed.
    pub const DEFAULT: Period = Period::OneYear;

    /// Label understood by the market-data provider and used in query strings.
    pub fn label(self) -> &'static str {
        match self {
            Period::FiveDays => "5d",
            Period::OneMonth => "1mo",
            Period::SixMonths => "6mo",
            Period::YearToDate => "ytd",
            Period::OneYear => "1y",
            Period::FiveYears => "5y",
            Period::Max => "max",
        }
    }

    pub fn caption(self) -> &'static str {
        match self {
            Period::FiveDays => "5D",
            Period::OneMonth => "1M",
            Period::SixMonths => "6M",
            Period::YearToDate => "YTD",
            Period::OneYear => "1Y",
            Period::FiveYears => "5Y",
            Period::Max => "MAX",
        }
    }

    /// Bars dated strictly after the returned date fall inside the window that
    /// ends at `last`. `None` keeps everything.
    pub fn cutoff(self, last: NaiveDate) -> Option<NaiveDate> {
        match self {
            Period::FiveDays => last.checked_sub_days(Days::new(5)),
            Period::OneMonth => last.checked_sub_months(Months::new(1)),
            Period::SixMonths => last.checked_sub_months(Months::new(6)),
            Period::YearToDate => NaiveDate::from_ymd_opt(last.year(), 1, 1),
            Period::OneYear => last.checked_sub_months(Months::new(12)),
            Period::FiveYears => last.checked_sub_months(Months::new(60)),
            Period::Max => None,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Period {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Period::ALL
            .into_iter()
            .find(|p| p.label() == needle || p.caption().to_lowercase() == needle)
            .ok_or_else(|| SelectionError::UnknownPeriod(s.to_string()))
    }
}

///////////////////////////////////////////////////////////////////////////////////////////////////
//
// Selection
//
///////////////////////////////////////////////////////////////////////////////////////////////////

/// Current state of the chart controls.
///
/// Fields are public so a selection can be assembled from anywhere; the
/// [`ChartSelector`](crate::selector::ChartSelector) still refuses combinations
/// that the controls never offer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub chart_type: ChartType,
    pub indicator: Indicator,
    /// `None` until a period button is pressed.
    pub period: Option<Period>,
}

impl Selection {
    pub fn new(
        chart_type: ChartType,
        indicator: Indicator,
        period: Option<Period>,
    ) -> Result<Self, SelectionError> {
        if !Indicator::offered_for(chart_type).contains(&indicator) {
            return Err(SelectionError::NotOffered {
                chart_type,
                indicator,
            });
        }
        Ok(Self {
            chart_type,
            indicator,
            period,
        })
    }

    /// Builds a selection the way the on-page selectors behave: when the chart
    /// type changes and the previous indicator is no longer listed, the
    /// indicator resets to the first offered option.
    pub fn from_controls(
        chart_type: ChartType,
        indicator: Option<Indicator>,
        period: Option<Period>,
    ) -> Self {
        let offered = Indicator::offered_for(chart_type);
        let indicator = indicator
            .filter(|i| offered.contains(i))
            .unwrap_or(offered[0]);
        Self {
            chart_type,
            indicator,
            period,
        }
    }

    /// The period charts are drawn for.
    pub fn effective_period(&self) -> Period {
        self.period.unwrap_or(Period::DEFAULT)
    }
}

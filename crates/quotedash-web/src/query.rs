use chrono::{Months, NaiveDate};
use quotedash_core::{ChartType, Indicator, Notice, Period, Selection};
use serde::Deserialize;
use std::str::FromStr;
use tracing::warn;

pub const DEFAULT_TICKER: &str = "AAPL";

/// Raw query string of `GET /`. Every field is optional and may be garbage.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct DashboardQuery {
    pub ticker: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub period: Option<String>,
    pub chart: Option<String>,
    pub indicator: Option<String>,
}

/// The page controls after defaults have been applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inputs {
    pub ticker: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub selection: Selection,
}

impl Inputs {
    pub fn defaults(today: NaiveDate) -> Self {
        Self {
            ticker: DEFAULT_TICKER.to_string(),
            start: default_start(today),
            end: today,
            selection: Selection::default(),
        }
    }

    /// Reads the query, falling back to defaults field by field. Every value
    /// that had to be replaced leaves an error notice behind.
    pub fn resolve(query: &DashboardQuery, today: NaiveDate) -> (Self, Vec<Notice>) {
        let defaults = Self::defaults(today);
        let mut notices = Vec::new();

        let ticker = given(&query.ticker)
            .map(str::to_string)
            .unwrap_or(defaults.ticker);
        let start = parse_or(&query.start, "start date", defaults.start, &mut notices);
        let end = parse_or(&query.end, "end date", defaults.end, &mut notices);

        let chart_type = parse_or(&query.chart, "chart type", ChartType::default(), &mut notices);
        let indicator = given(&query.indicator).and_then(|raw| {
            raw.parse::<Indicator>()
                .map_err(|e| reject("indicator", e, &mut notices))
                .ok()
        });
        let period = given(&query.period).and_then(|raw| {
            raw.parse::<Period>()
                .map_err(|e| reject("period", e, &mut notices))
                .ok()
        });

        let inputs = Self {
            ticker,
            start,
            end,
            selection: Selection::from_controls(chart_type, indicator, period),
        };
        (inputs, notices)
    }
}

/// One year before `today`, clamped to the end of the month.
pub fn default_start(today: NaiveDate) -> NaiveDate {
    today.checked_sub_months(Months::new(12)).unwrap_or(today)
}

fn given(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_or<T>(value: &Option<String>, what: &str, default: T, notices: &mut Vec<Notice>) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match given(value).map(str::parse::<T>) {
        Some(Ok(parsed)) => parsed,
        Some(Err(e)) => {
            reject(what, e, notices);
            default
        }
        None => default,
    }
}

fn reject(what: &str, e: impl std::fmt::Display, notices: &mut Vec<Notice>) {
    warn!("ignoring {what} from query: {e}");
    notices.push(Notice::error(format!("Invalid {what}: {e}. Using the default.")));
}

use crate::transport;
use chrono::{DateTime, Days, NaiveDate};
use quotedash_core::{Bar, PriceSeries, ProviderError, Span, Ticker};
use reqwest::Client;
use serde::Deserialize;
use tracing::{error, trace, warn};

const CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";
const INTERVAL: &str = "1d";

///////////////////////////////////////////////////////////////////////////////////////////////////
//
// Daily prices from Yahoo Finance, per ticker
//
///////////////////////////////////////////////////////////////////////////////////////////////////

pub fn url(ticker: &Ticker, span: Span) -> String {
    let tckr = ticker.as_str();
    let window = match span {
        Span::Dates { start, end } => {
            // period2 is exclusive on Yahoo's side
            let end = end.checked_add_days(Days::new(1)).unwrap_or(end);
            format!("period1={}&period2={}", unix(start), unix(end))
        }
        Span::Period(period) => format!("range={}", period.label()),
    };
    format!("{CHART_URL}/{tckr}?symbol={tckr}&interval={INTERVAL}&{window}&events=div|split")
}

fn unix(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp())
        .unwrap_or_default()
}

pub async fn fetch(client: &Client, ticker: &Ticker, span: Span) -> Result<PriceSeries, ProviderError> {
    let url = url(ticker, span);
    trace!("Fetching price data for [{ticker}] from Yahoo Finance");
    let response = client.get(&url).send().await.map_err(|e| {
        error!("[{ticker}] price fetching error: {e}\nURL: {url}");
        transport(e)
    })?;

    // Yahoo reports unknown symbols as 404 with a JSON body, so the body is
    // decoded before the status is considered
    let status = response.status();
    let body = response.bytes().await.map_err(|e| {
        error!("[{ticker}] byte transformation error: {e}\nURL: {url}");
        transport(e)
    })?;

    match decode(&body) {
        Err(ProviderError::Decode(e)) if !status.is_success() => {
            error!("[{ticker}] price request answered {status}\nURL: {url}");
            Err(ProviderError::Api {
                code: status.to_string(),
                description: e,
            })
        }
        other => other,
    }
}

/// Turns a chart response body into a [`PriceSeries`].
///
/// Bars missing any of open/high/low/close are dropped; a missing volume
/// counts as zero. Dates are taken in the exchange's own time zone.
pub fn decode(body: &[u8]) -> Result<PriceSeries, ProviderError> {
    let de = serde_json::from_slice::<PriceHistory>(body).map_err(|e| {
        error!("price deserialization error: {e}");
        ProviderError::Decode(e.to_string())
    })?;

    if let Some(err) = de.chart.error {
        return Err(api_error(err));
    }

    let Some(base) = de.chart.result.and_then(|r| r.into_iter().next()) else {
        warn!("price response contained no \"chart.result\" object");
        return Ok(PriceSeries::default());
    };

    let offset = base.meta.gmtoffset;
    let Some(price) = base.indicators.quote.into_iter().next() else {
        return Ok(PriceSeries::default());
    };

    let bars = base
        .timestamp
        .iter()
        .enumerate()
        .filter_map(|(i, timestamp)| {
            let date = DateTime::from_timestamp(timestamp + offset, 0)?.date_naive();
            Some(Bar {
                date,
                open: (*price.open.get(i)?)?,
                high: (*price.high.get(i)?)?,
                low: (*price.low.get(i)?)?,
                close: (*price.close.get(i)?)?,
                volume: price.volume.get(i).copied().flatten().unwrap_or_default(),
            })
        })
        .collect::<Vec<_>>();

    let skipped = base.timestamp.len() - bars.len();
    if skipped > 0 {
        trace!("dropped {skipped} incomplete bars");
    }

    Ok(PriceSeries::new(bars))
}

fn api_error(err: ApiError) -> ProviderError {
    if err.code == "Not Found" {
        ProviderError::NotFound(err.description)
    } else {
        ProviderError::Api {
            code: err.code,
            description: err.description,
        }
    }
}

///////////////////////////////////////////////////////////////////////////////////////////////////
//
// Deserialization
//
///////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Deserialize, Debug)]
pub struct PriceHistory {
    pub chart: PriceResponse,
}

#[derive(Deserialize, Debug)]
pub struct PriceResponse {
    pub result: Option<Vec<PriceCategories>>,
    pub error: Option<ApiError>,
}

#[derive(Deserialize, Debug)]
pub struct ApiError {
    pub code: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Deserialize, Debug)]
pub struct PriceCategories {
    #[serde(default)]
    pub meta: Meta,
    #[serde(default)]
    pub timestamp: Vec<i64>,
    pub indicators: Indicators,
}

#[derive(Deserialize, Debug, Default)]
pub struct Meta {
    /// Seconds east of UTC for the listing exchange.
    #[serde(default)]
    pub gmtoffset: i64,
}

#[derive(Deserialize, Debug)]
pub struct Indicators {
    #[serde(default)]
    pub quote: Vec<Quote>,
}

#[derive(Deserialize, Debug, Default)]
pub struct Quote {
    #[serde(default)]
    pub open: Vec<Option<f64>>,
    #[serde(default)]
    pub high: Vec<Option<f64>>,
    #[serde(default)]
    pub low: Vec<Option<f64>>,
    #[serde(default)]
    pub close: Vec<Option<f64>>,
    #[serde(default)]
    pub volume: Vec<Option<u64>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use quotedash_core::Period;

    #[test]
    fn date_span_is_inclusive_of_the_end_date() {
        let ticker = Ticker::new("aapl").unwrap();
        let span = Span::Dates {
            start: "2024-01-02".parse().unwrap(),
            end: "2024-01-05".parse().unwrap(),
        };
        assert_eq!(
            url(&ticker, span),
            "https://query1.finance.yahoo.com/v8/finance/chart/AAPL?symbol=AAPL&interval=1d\
             &period1=1704153600&period2=1704499200&events=div|split"
        );
    }

    #[test]
    fn period_span_uses_the_range_parameter() {
        let ticker = Ticker::new("MSFT").unwrap();
        let url = url(&ticker, Span::Period(Period::YearToDate));
        assert!(url.contains("&range=ytd&"));
        assert!(url.ends_with("&events=div|split"));
        assert!(!url.contains("period1"));
    }
}

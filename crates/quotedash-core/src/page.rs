//! One top-to-bottom evaluation of the stock page.
//!
//! Every fetch is isolated: a failed section turns into a [`Notice`] and the
//! pass carries on, except for the date-range price history, without which
//! nothing below the company profile can be shown.

use crate::notice::{Notice, Outcome};
use crate::profile::CompanyProfile;
use crate::provider::{MarketData, Span};
use crate::selection::Selection;
use crate::selector::{ChartRenderer, ChartSelector};
use crate::summary::{daily_change, recent_history, DailyChange, RecentHistory};
use crate::ticker::{Ticker, TickerError};
use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, error, trace, warn};

pub const NO_RANGE_DATA: &str = "No historical data available for this ticker and date range.";

#[derive(Debug, Error)]
pub enum RequestError {
    #[error(transparent)]
    Ticker(#[from] TickerError),

    #[error("start date {start} is after end date {end}")]
    InvertedRange { start: NaiveDate, end: NaiveDate },
}

/// Everything a render pass depends on besides freshly fetched data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub ticker: Ticker,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub selection: Selection,
}

impl PageRequest {
    pub fn new(
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
        selection: Selection,
    ) -> Result<Self, RequestError> {
        let ticker = Ticker::new(ticker)?;
        if start > end {
            return Err(RequestError::InvertedRange { start, end });
        }
        Ok(Self {
            ticker,
            start,
            end,
            selection,
        })
    }
}

/// Output of a render pass, section by section.
#[derive(Debug)]
pub struct Page<A> {
    pub ticker: Ticker,
    pub selection: Selection,
    pub profile: Outcome<CompanyProfile>,
    /// Everything fed by price history. An `Err` here ends the page.
    pub market: Outcome<MarketSection<A>>,
}

#[derive(Debug)]
pub struct MarketSection<A> {
    pub daily_change: Outcome<DailyChange>,
    pub recent: RecentHistory,
    /// Primary price chart, then the indicator chart.
    pub charts: Outcome<[A; 2]>,
}

pub async fn render_page<M, R>(market: &M, renderer: &R, request: &PageRequest) -> Page<R::Artifact>
where
    M: MarketData + ?Sized,
    R: ChartRenderer + ?Sized,
{
    let time = std::time::Instant::now();
    let ticker = &request.ticker;

    trace!("[{ticker}] fetching company profile");
    let profile = market.company_profile(ticker).await.map_err(|e| {
        error!("[{ticker}] profile fetch failed: {e}");
        Notice::error(format!("Failed to retrieve stock information: {e}"))
    });

    let market_section = market_section(market, renderer, request).await;

    debug!(
        "[{ticker}] page rendered. Elapsed time: {} ms",
        time.elapsed().as_millis()
    );

    Page {
        ticker: ticker.clone(),
        selection: request.selection,
        profile,
        market: market_section,
    }
}

async fn market_section<M, R>(
    market: &M,
    renderer: &R,
    request: &PageRequest,
) -> Outcome<MarketSection<R::Artifact>>
where
    M: MarketData + ?Sized,
    R: ChartRenderer + ?Sized,
{
    let ticker = &request.ticker;
    let span = Span::Dates {
        start: request.start,
        end: request.end,
    };

    trace!("[{ticker}] fetching price history {} to {}", request.start, request.end);
    let data = market.price_history(ticker, span).await.map_err(|e| {
        error!("[{ticker}] price history fetch failed: {e}");
        Notice::error(format!("Failed to download stock data: {e}"))
    })?;
    if data.is_empty() {
        warn!("[{ticker}] no bars between {} and {}", request.start, request.end);
        return Err(Notice::warning(NO_RANGE_DATA));
    }

    let daily_change = daily_change(&data);
    let recent = recent_history(&data);

    trace!("[{ticker}] fetching full price history for charts");
    let charts = match market.price_history(ticker, Span::max()).await {
        Ok(history) => ChartSelector::dispatch(&request.selection, &history, renderer),
        Err(e) => {
            error!("[{ticker}] full history fetch failed: {e}");
            Err(Notice::warning(format!("Failed to download chart history: {e}")))
        }
    };

    Ok(MarketSection {
        daily_change,
        recent,
        charts,
    })
}

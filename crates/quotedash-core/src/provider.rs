use crate::profile::CompanyProfile;
use crate::selection::Period;
use crate::series::PriceSeries;
use crate::ticker::Ticker;
use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

/// What stretch of history to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Span {
    /// Both ends inclusive.
    Dates { start: NaiveDate, end: NaiveDate },
    /// Relative to the most recent trading day.
    Period(Period),
}

impl Span {
    pub fn max() -> Self {
        Span::Period(Period::Max)
    }
}

/// Errors a [`MarketData`] implementation can report.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The request never produced a usable response (DNS, TLS, timeout, ...).
    #[error("request failed: {0}")]
    Transport(String),

    /// The provider answered with an error of its own.
    #[error("{code}: {description}")]
    Api { code: String, description: String },

    /// The response body did not have the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),

    #[error("no data found for {0}")]
    NotFound(String),
}

/// Source of company metadata and daily prices.
///
/// Calls are made one at a time from the render path; retries and timeouts are
/// the implementation's business.
#[async_trait]
pub trait MarketData: Send + Sync {
    async fn company_profile(&self, ticker: &Ticker) -> Result<CompanyProfile, ProviderError>;

    /// Daily bars for `span`, oldest first. May be empty.
    async fn price_history(&self, ticker: &Ticker, span: Span)
        -> Result<PriceSeries, ProviderError>;
}

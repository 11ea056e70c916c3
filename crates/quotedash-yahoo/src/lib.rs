//! Yahoo Finance as a [`MarketData`] source.
//!
//! Prices come from the public `v8/finance/chart` endpoint. Company profiles
//! come from `v10/finance/quoteSummary`, which additionally wants a session
//! cookie and a matching "crumb" token; both are obtained lazily and reused
//! until Yahoo rejects them.

pub mod chart;
pub mod de;
pub mod profile;

use async_trait::async_trait;
use quotedash_core::{CompanyProfile, MarketData, PriceSeries, ProviderError, Span, Ticker};
use reqwest::Client;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, trace};

pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

pub struct YahooFinance {
    client: Client,
    crumb: Mutex<Option<String>>,
}

impl YahooFinance {
    pub fn new(user_agent: &str, timeout: Duration) -> anyhow::Result<Self> {
        Ok(Self::with_client(build_client(user_agent, timeout)?))
    }

    /// The client must keep cookies, otherwise profile requests are refused.
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            crumb: Mutex::new(None),
        }
    }
}

pub fn build_client(user_agent: &str, timeout: Duration) -> anyhow::Result<Client> {
    let client = reqwest::ClientBuilder::new()
        .user_agent(user_agent)
        .cookie_store(true)
        .timeout(timeout)
        .build()?;
    Ok(client)
}

#[async_trait]
impl MarketData for YahooFinance {
    async fn company_profile(&self, ticker: &Ticker) -> Result<CompanyProfile, ProviderError> {
        let time = std::time::Instant::now();
        let profile = profile::fetch(&self.client, &self.crumb, ticker).await?;
        debug!(
            "[{ticker}] profile fetched. Elapsed time: {} ms",
            time.elapsed().as_millis()
        );
        Ok(profile)
    }

    async fn price_history(
        &self,
        ticker: &Ticker,
        span: Span,
    ) -> Result<PriceSeries, ProviderError> {
        let time = std::time::Instant::now();
        let series = chart::fetch(&self.client, ticker, span).await?;
        trace!("[{ticker}] {} bars for {span:?}", series.len());
        debug!(
            "[{ticker}] price history fetched. Elapsed time: {} ms",
            time.elapsed().as_millis()
        );
        Ok(series)
    }
}

pub(crate) fn transport(e: reqwest::Error) -> ProviderError {
    ProviderError::Transport(e.to_string())
}

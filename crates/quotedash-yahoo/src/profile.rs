use crate::de::{de_raw, de_raw_u64};
use crate::transport;
use quotedash_core::{CompanyProfile, ProviderError, Ticker};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{error, trace, warn};

pub const COOKIE_URL: &str = "https://fc.yahoo.com";
pub const CRUMB_URL: &str = "https://query1.finance.yahoo.com/v1/test/getcrumb";
pub const SUMMARY_URL: &str = "https://query2.finance.yahoo.com/v10/finance/quoteSummary";
const MODULES: &str = "assetProfile,summaryDetail,defaultKeyStatistics,financialData";

///////////////////////////////////////////////////////////////////////////////////////////////////
//
// Company profile from Yahoo Finance, per ticker
//
///////////////////////////////////////////////////////////////////////////////////////////////////

pub fn url(ticker: &Ticker, crumb: &str) -> String {
    format!("{SUMMARY_URL}/{ticker}?modules={MODULES}&crumb={crumb}")
}

pub async fn fetch(
    client: &Client,
    crumb: &Mutex<Option<String>>,
    ticker: &Ticker,
) -> Result<CompanyProfile, ProviderError> {
    let token = session_crumb(client, crumb).await?;
    let url = url(ticker, &token);

    trace!("Fetching company profile for [{ticker}] from Yahoo Finance");
    let response = client.get(&url).send().await.map_err(|e| {
        error!("[{ticker}] profile fetching error: {e}\nURL: {url}");
        transport(e)
    })?;

    let status = response.status();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        // the session went stale; the next pass starts a new one
        warn!("[{ticker}] crumb rejected with {status}, dropping it");
        crumb.lock().await.take();
        return Err(ProviderError::Api {
            code: status.to_string(),
            description: "Yahoo Finance refused the session crumb".to_string(),
        });
    }

    let body = response.bytes().await.map_err(|e| {
        error!("[{ticker}] byte transformation error: {e}\nURL: {url}");
        transport(e)
    })?;

    match decode(&body) {
        Err(ProviderError::Decode(e)) if !status.is_success() => {
            error!("[{ticker}] profile request answered {status}\nURL: {url}");
            Err(ProviderError::Api {
                code: status.to_string(),
                description: e,
            })
        }
        Err(ProviderError::NotFound(_)) => Err(ProviderError::NotFound(ticker.to_string())),
        other => other,
    }
}

/// Returns the cached crumb, or starts a session and caches a new one.
///
/// The lock is held for the whole exchange so concurrent passes share one
/// session.
async fn session_crumb(client: &Client, cache: &Mutex<Option<String>>) -> Result<String, ProviderError> {
    let mut cache = cache.lock().await;
    if let Some(crumb) = cache.as_ref() {
        return Ok(crumb.clone());
    }

    // only the Set-Cookie header matters here; the page itself is usually a 404
    trace!("opening a Yahoo Finance session");
    client.get(COOKIE_URL).send().await.map_err(|e| {
        error!("session cookie request failed: {e}");
        transport(e)
    })?;

    let response = client.get(CRUMB_URL).send().await.map_err(|e| {
        error!("crumb request failed: {e}");
        transport(e)
    })?;
    let status = response.status();
    let crumb = response.text().await.map_err(transport)?;
    let crumb = crumb.trim();

    if !status.is_success() || crumb.is_empty() || crumb.starts_with('<') {
        error!("no crumb issued, status {status}");
        return Err(ProviderError::Api {
            code: status.to_string(),
            description: "Yahoo Finance did not issue a session crumb".to_string(),
        });
    }

    *cache = Some(crumb.to_string());
    Ok(crumb.to_string())
}

/// Turns a quoteSummary response body into a [`CompanyProfile`].
pub fn decode(body: &[u8]) -> Result<CompanyProfile, ProviderError> {
    let de = serde_json::from_slice::<QuoteSummary>(body).map_err(|e| {
        error!("profile deserialization error: {e}");
        ProviderError::Decode(e.to_string())
    })?;

    if let Some(err) = de.quote_summary.error {
        return Err(if err.code == "Not Found" {
            ProviderError::NotFound(err.description)
        } else {
            ProviderError::Api {
                code: err.code,
                description: err.description,
            }
        });
    }

    let modules = de
        .quote_summary
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| ProviderError::Decode("empty \"quoteSummary.result\"".to_string()))?;

    let asset = modules.asset_profile;
    let summary = modules.summary_detail;
    let stats = modules.default_key_statistics;
    let financial = modules.financial_data;

    Ok(CompanyProfile {
        long_business_summary: asset.long_business_summary,
        sector: asset.sector,
        full_time_employees: asset.full_time_employees,
        website: asset.website,
        market_cap: summary.market_cap,
        beta: summary.beta.or(stats.beta),
        trailing_eps: stats.trailing_eps,
        trailing_pe: summary.trailing_pe,
        quick_ratio: financial.quick_ratio,
        revenue_per_share: financial.revenue_per_share,
        profit_margins: financial.profit_margins.or(stats.profit_margins),
        debt_to_equity: financial.debt_to_equity,
        return_on_equity: financial.return_on_equity,
    })
}

///////////////////////////////////////////////////////////////////////////////////////////////////
//
// Deserialization
//
///////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Deserialize, Debug)]
pub struct QuoteSummary {
    #[serde(rename = "quoteSummary")]
    pub quote_summary: SummaryResponse,
}

#[derive(Deserialize, Debug)]
pub struct SummaryResponse {
    pub result: Option<Vec<Modules>>,
    pub error: Option<SummaryError>,
}

#[derive(Deserialize, Debug)]
pub struct SummaryError {
    pub code: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Modules {
    #[serde(default)]
    pub asset_profile: AssetProfile,
    #[serde(default)]
    pub summary_detail: SummaryDetail,
    #[serde(default)]
    pub default_key_statistics: KeyStatistics,
    #[serde(default)]
    pub financial_data: FinancialData,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct AssetProfile {
    pub long_business_summary: Option<String>,
    pub sector: Option<String>,
    #[serde(default, deserialize_with = "de_raw_u64")]
    pub full_time_employees: Option<u64>,
    pub website: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct SummaryDetail {
    #[serde(default, deserialize_with = "de_raw")]
    pub market_cap: Option<f64>,
    #[serde(default, deserialize_with = "de_raw")]
    pub beta: Option<f64>,
    #[serde(default, rename = "trailingPE", deserialize_with = "de_raw")]
    pub trailing_pe: Option<f64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct KeyStatistics {
    #[serde(default, deserialize_with = "de_raw")]
    pub trailing_eps: Option<f64>,
    #[serde(default, deserialize_with = "de_raw")]
    pub beta: Option<f64>,
    #[serde(default, deserialize_with = "de_raw")]
    pub profit_margins: Option<f64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct FinancialData {
    #[serde(default, deserialize_with = "de_raw")]
    pub quick_ratio: Option<f64>,
    #[serde(default, deserialize_with = "de_raw")]
    pub revenue_per_share: Option<f64>,
    #[serde(default, deserialize_with = "de_raw")]
    pub profit_margins: Option<f64>,
    #[serde(default, deserialize_with = "de_raw")]
    pub debt_to_equity: Option<f64>,
    #[serde(default, deserialize_with = "de_raw")]
    pub return_on_equity: Option<f64>,
}

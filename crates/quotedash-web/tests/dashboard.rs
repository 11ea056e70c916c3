use actix_web::{test, web, App};
use async_trait::async_trait;
use chrono::{Days, Local, NaiveDate};
use quotedash_core::{
    Bar, CompanyProfile, MarketData, PriceSeries, ProviderError, Span, Ticker,
};
use quotedash_web::{configure, query::default_start, AppState};
use std::sync::{Arc, Mutex};

/// Serves canned data and remembers what it was asked for.
#[derive(Default)]
struct Canned {
    profile: Option<CompanyProfile>,
    range: Option<PriceSeries>,
    max: Option<PriceSeries>,
    asked: Mutex<Vec<(String, Span)>>,
}

#[async_trait]
impl MarketData for Canned {
    async fn company_profile(&self, ticker: &Ticker) -> Result<CompanyProfile, ProviderError> {
        self.profile
            .clone()
            .ok_or_else(|| ProviderError::NotFound(ticker.to_string()))
    }

    async fn price_history(
        &self,
        ticker: &Ticker,
        span: Span,
    ) -> Result<PriceSeries, ProviderError> {
        self.asked.lock().unwrap().push((ticker.to_string(), span));
        let series = match span {
            Span::Dates { .. } => self.range.clone(),
            Span::Period(_) => self.max.clone(),
        };
        series.ok_or_else(|| ProviderError::Transport("connection refused".to_string()))
    }
}

/// `n` daily bars ending 2024-06-28.
fn history(n: u64) -> PriceSeries {
    let last = NaiveDate::from_ymd_opt(2024, 6, 28).unwrap();
    let bars = (0..n)
        .map(|i| {
            let close = 150.0 + (i % 5) as f64 + i as f64 * 0.1;
            Bar {
                date: last.checked_sub_days(Days::new(n - 1 - i)).unwrap(),
                open: close - 0.25,
                high: close + 1.5,
                low: close - 1.5,
                close,
                volume: 1_000_000 + i,
            }
        })
        .collect();
    PriceSeries::new(bars)
}

fn healthy() -> Canned {
    Canned {
        profile: Some(CompanyProfile {
            long_business_summary: Some("Makes <b>widgets</b>.".to_string()),
            sector: Some("Technology".to_string()),
            full_time_employees: Some(1_200),
            market_cap: Some(5.0e9),
            ..Default::default()
        }),
        range: Some(history(30)),
        max: Some(history(600)),
        ..Default::default()
    }
}

async fn get(market: Arc<Canned>, uri: &str) -> (u16, String) {
    let state = web::Data::new(AppState::new(market).unwrap());
    let app = test::init_service(App::new().app_data(state).configure(configure)).await;
    let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
    let status = res.status().as_u16();
    let body = test::read_body(res).await;
    (status, String::from_utf8(body.to_vec()).unwrap())
}

#[actix_web::test]
async fn health_check() {
    let (status, body) = get(Arc::new(Canned::default()), "/health").await;
    assert_eq!(status, 200);
    assert_eq!(body, "ok");
}

#[actix_web::test]
async fn bare_request_uses_defaults() {
    let market = Arc::new(healthy());
    let (status, html) = get(market.clone(), "/").await;
    assert_eq!(status, 200);

    let today = Local::now().date_naive();
    assert!(html.contains(r#"name="ticker" value="AAPL""#));
    assert!(html.contains(&format!(r#"name="start" type="date" value="{}""#, default_start(today))));
    assert!(html.contains(&format!(r#"name="end" type="date" value="{today}""#)));
    assert!(html.contains(r#"<option value="candle" selected>Candle</option>"#));
    assert!(html.contains(r#"<option value="rsi" selected>RSI</option>"#));
    // candlestick charts never list the moving average
    assert!(!html.contains(r#"value="moving-average""#));

    let asked = market.asked.lock().unwrap();
    assert_eq!(asked.len(), 2);
    assert_eq!(asked[0].0, "AAPL");
    assert_eq!(
        asked[0].1,
        Span::Dates {
            start: default_start(today),
            end: today
        }
    );
    assert_eq!(asked[1].1, Span::max());
}

#[actix_web::test]
async fn full_page_renders_every_section() {
    let (_, html) = get(Arc::new(healthy()), "/?ticker=msft&chart=line&indicator=moving-average").await;

    assert!(html.contains("<h2>MSFT</h2>"));
    // profile text is escaped, figures are not
    assert!(html.contains("Makes &lt;b&gt;widgets&lt;&#x2F;b&gt;."));
    assert!(html.contains("<strong>Sector:</strong> Technology"));
    assert!(html.contains("<strong>Website:</strong> N&#x2F;A"));
    assert!(html.contains("draw(\"valuation-table\", {\"data\":"));
    assert!(html.contains("Daily Change"));
    assert!(html.contains("Historical Data (last 10 days)"));
    assert!(html.contains("draw(\"chart-0\""));
    assert!(html.contains("draw(\"chart-1\""));
    assert!(html.contains("\"name\":\"SMA 50\""));
    assert!(html.contains(r#"<option value="moving-average" selected>Moving Average</option>"#));
}

#[actix_web::test]
async fn period_links_carry_the_inputs_and_the_form_does_not() {
    let (_, html) = get(
        Arc::new(healthy()),
        "/?ticker=NVDA&start=2024-01-02&end=2024-06-28&chart=line&indicator=macd&period=6mo",
    )
    .await;

    assert!(html.contains(
        "href=\"/?ticker=NVDA&amp;start=2024-01-02&amp;end=2024-06-28&amp;chart=line&amp;indicator=macd&amp;period=5d\""
    ));
    assert!(html.contains("period=6mo\" class=\"active\">6M</a>"));
    // submitting the form drops the pressed period
    assert!(!html.contains(r#"name="period""#));
    assert!(html.contains("MACD 12, 26, 9 (6M)"));
}

#[actix_web::test]
async fn candle_with_moving_average_falls_back_to_rsi() {
    let (status, html) = get(Arc::new(healthy()), "/?chart=candle&indicator=moving-average").await;
    assert_eq!(status, 200);
    assert!(html.contains(r#"<option value="rsi" selected>RSI</option>"#));
    assert!(html.contains("\"type\":\"candlestick\""));
    assert!(!html.contains("SMA 50"));
}

#[actix_web::test]
async fn bad_inputs_are_reported_and_replaced() {
    let (status, html) = get(Arc::new(healthy()), "/?start=soon&period=2w").await;
    assert_eq!(status, 200);
    assert!(html.contains("Invalid start date"));
    assert!(html.contains("Invalid period"));
    // the page still renders with the defaults
    assert!(html.contains("<h2>AAPL</h2>"));
    assert!(!html.contains("class=\"active\""));
}

#[actix_web::test]
async fn inverted_range_is_rejected_before_fetching() {
    let market = Arc::new(healthy());
    let (_, html) = get(market.clone(), "/?start=2024-06-01&end=2024-01-01").await;
    assert!(html.contains("Invalid request: start date 2024-06-01 is after end date 2024-01-01"));
    assert!(!html.contains("<h2>"));
    assert!(market.asked.lock().unwrap().is_empty());
}

#[actix_web::test]
async fn failures_become_notices_in_place() {
    let market = Canned {
        range: Some(history(30)),
        max: Some(PriceSeries::default()),
        ..Default::default()
    };
    let (status, html) = get(Arc::new(market), "/?ticker=zzzz").await;
    assert_eq!(status, 200);
    assert!(html.contains("Failed to retrieve stock information: no data found for ZZZZ"));
    assert!(html.contains("No price history available to chart for this ticker."));
    assert!(html.contains("Historical Data (last 10 days)"));
}

#[actix_web::test]
async fn empty_range_stops_after_the_profile() {
    let market = Canned {
        range: Some(PriceSeries::default()),
        ..healthy()
    };
    let (_, html) = get(Arc::new(market), "/").await;
    assert!(html.contains("<strong>Sector:</strong> Technology"));
    assert!(html.contains("No historical data available for this ticker and date range."));
    assert!(!html.contains("Daily Change"));
    assert!(!html.contains("draw(\"chart-0\""));
}

#[actix_web::test]
async fn range_failure_is_an_error() {
    let market = Canned {
        range: None,
        ..healthy()
    };
    let (_, html) = get(Arc::new(market), "/").await;
    assert!(html.contains(
        "<div class=\"notice error\">Failed to download stock data: request failed: connection refused</div>"
    ));
}

#[actix_web::test]
async fn short_period_indicators_have_no_gaps() {
    for uri in [
        "/?chart=line&indicator=rsi&period=5d",
        "/?chart=candle&indicator=macd&period=1mo",
        "/?chart=line&indicator=moving-average&period=6mo",
    ] {
        let (status, html) = get(Arc::new(healthy()), uri).await;
        assert_eq!(status, 200);
        assert!(html.contains("draw(\"chart-1\""), "{uri}");
        // warm-up gaps would serialize as null
        assert!(!html.contains("null"), "{uri}");
    }
}

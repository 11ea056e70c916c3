use chrono::NaiveDate;
use quotedash_core::ProviderError;
use quotedash_yahoo::{chart, profile};

fn fixture(name: &str) -> Vec<u8> {
    let path = format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR"));
    std::fs::read(&path).unwrap_or_else(|e| panic!("reading {path}: {e}"))
}

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

#[test]
fn chart_bars_are_dated_in_exchange_time() {
    let series = chart::decode(&fixture("chart_aapl.json")).unwrap();

    // 2024-01-04 has no open and is dropped; the 2024-01-05 bar stamped at
    // midnight UTC is still the 5th in New York and replaces the earlier one
    assert_eq!(
        series.dates(),
        vec![date("2024-01-02"), date("2024-01-03"), date("2024-01-05")]
    );

    let first = &series.bars()[0];
    assert_eq!(first.open, 187.14999389648438);
    assert_eq!(first.close, 185.63999938964844);
    assert_eq!(first.volume, 82_488_700);

    let latest = series.latest().unwrap();
    assert_eq!(latest.volume, 62_303_300);
    assert_eq!(latest.close, 181.17999267578125);
}

#[test]
fn chart_without_timestamps_is_empty() {
    let series = chart::decode(&fixture("chart_empty.json")).unwrap();
    assert!(series.is_empty());
}

#[test]
fn chart_error_object_is_reported() {
    match chart::decode(&fixture("chart_not_found.json")) {
        Err(ProviderError::NotFound(description)) => {
            assert_eq!(description, "No data found, symbol may be delisted")
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[test]
fn chart_garbage_is_a_decode_error() {
    assert!(matches!(
        chart::decode(b"<html>Too Many Requests</html>"),
        Err(ProviderError::Decode(_))
    ));
}

#[test]
fn quote_summary_fills_the_profile() {
    let profile = profile::decode(&fixture("quote_summary_aapl.json")).unwrap();

    assert_eq!(profile.sector.as_deref(), Some("Technology"));
    assert_eq!(profile.website.as_deref(), Some("https://www.apple.com"));
    assert_eq!(profile.full_time_employees, Some(161_000));
    assert!(profile.summary_text().starts_with("Apple Inc. designs"));

    assert_eq!(profile.market_cap, Some(2_817_271_005_184.0));
    assert_eq!(profile.beta, Some(1.29));
    assert_eq!(profile.trailing_eps, Some(6.16));
    assert_eq!(profile.trailing_pe, Some(29.41));
    assert_eq!(profile.quick_ratio, Some(0.843));
    assert_eq!(profile.revenue_per_share, Some(24.344));
    assert_eq!(profile.profit_margins, Some(0.25305998));
    assert_eq!(profile.debt_to_equity, Some(199.418));
    // sent as `{}`
    assert_eq!(profile.return_on_equity, None);
}

#[test]
fn quote_summary_error_is_not_found() {
    assert!(matches!(
        profile::decode(&fixture("quote_summary_not_found.json")),
        Err(ProviderError::NotFound(_))
    ));
}

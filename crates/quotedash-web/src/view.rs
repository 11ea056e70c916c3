//! Flattens a rendered [`Page`] into what the template needs.

use crate::query::Inputs;
use quotedash_chart::{render_table, Figure};
use quotedash_core::{
    ChartType, CompanyProfile, DailyChange, Indicator, MarketSection, Notice, Outcome, Page,
    Period, ProfileTables, RecentHistory,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub inputs: InputsView,
    /// Problems with the request itself, shown above everything else.
    pub notices: Vec<Notice>,
    pub chart_types: Vec<Choice>,
    pub indicators: Vec<Choice>,
    pub periods: Vec<PeriodLink>,
    pub page: Option<PageView>,
}

#[derive(Debug, Serialize)]
pub struct InputsView {
    pub ticker: String,
    pub start: String,
    pub end: String,
    pub chart: &'static str,
    pub indicator: &'static str,
    pub period: Option<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct Choice {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

#[derive(Debug, Serialize)]
pub struct PeriodLink {
    pub label: &'static str,
    pub caption: &'static str,
    pub active: bool,
}

/// Either the content of a section or the notice shown in its place.
#[derive(Debug, Serialize)]
pub struct Section<T> {
    pub content: Option<T>,
    pub notice: Option<Notice>,
}

impl<T> Section<T> {
    fn build<S>(
        outcome: &Outcome<S>,
        f: impl FnOnce(&S) -> anyhow::Result<T>,
    ) -> anyhow::Result<Self> {
        Ok(match outcome {
            Ok(value) => Self {
                content: Some(f(value)?),
                notice: None,
            },
            Err(notice) => Self {
                content: None,
                notice: Some(notice.clone()),
            },
        })
    }
}

#[derive(Debug, Serialize)]
pub struct PageView {
    pub ticker: String,
    pub profile: Section<ProfileView>,
    pub market: Section<MarketView>,
}

#[derive(Debug, Serialize)]
pub struct ProfileView {
    pub summary: String,
    pub sector: String,
    pub employees: String,
    pub website: String,
    /// Plotly figure JSON.
    pub valuation: String,
    pub health: String,
}

#[derive(Debug, Serialize)]
pub struct MarketView {
    pub daily_change: Section<DailyChangeView>,
    pub recent: String,
    pub charts: Section<Vec<ChartView>>,
}

#[derive(Debug, Serialize)]
pub struct DailyChangeView {
    pub latest: String,
    pub change: String,
    pub rising: bool,
}

#[derive(Debug, Serialize)]
pub struct ChartView {
    pub id: String,
    pub figure: String,
}

impl DashboardView {
    pub fn build(
        inputs: &Inputs,
        notices: Vec<Notice>,
        page: Option<&Page<Figure>>,
    ) -> anyhow::Result<Self> {
        let selection = inputs.selection;

        let chart_types = ChartType::ALL
            .into_iter()
            .map(|c| Choice {
                value: c.param(),
                label: c.label(),
                selected: c == selection.chart_type,
            })
            .collect();

        let indicators = Indicator::offered_for(selection.chart_type)
            .iter()
            .map(|i| Choice {
                value: i.param(),
                label: i.label(),
                selected: *i == selection.indicator,
            })
            .collect();

        let periods = Period::ALL
            .into_iter()
            .map(|p| PeriodLink {
                label: p.label(),
                caption: p.caption(),
                active: selection.period == Some(p),
            })
            .collect();

        Ok(Self {
            inputs: InputsView {
                ticker: inputs.ticker.clone(),
                start: inputs.start.to_string(),
                end: inputs.end.to_string(),
                chart: selection.chart_type.param(),
                indicator: selection.indicator.param(),
                period: selection.period.map(Period::label),
            },
            notices,
            chart_types,
            indicators,
            periods,
            page: page.map(page_view).transpose()?,
        })
    }
}

fn page_view(page: &Page<Figure>) -> anyhow::Result<PageView> {
    Ok(PageView {
        ticker: page.ticker.to_string(),
        profile: Section::build(&page.profile, profile_view)?,
        market: Section::build(&page.market, market_view)?,
    })
}

fn profile_view(profile: &CompanyProfile) -> anyhow::Result<ProfileView> {
    let tables = ProfileTables::from(profile);
    Ok(ProfileView {
        summary: profile.summary_text().to_string(),
        sector: profile.sector_text(),
        employees: profile.employees_text(),
        website: profile.website_text(),
        valuation: key_value_table(&tables.valuation)?,
        health: key_value_table(&tables.health)?,
    })
}

fn key_value_table(pairs: &[(&'static str, String)]) -> anyhow::Result<String> {
    let rows: Vec<Vec<String>> = pairs
        .iter()
        .map(|(key, value)| vec![key.to_string(), value.clone()])
        .collect();
    script_json(&render_table(&["", ""], &rows))
}

fn market_view(market: &MarketSection<Figure>) -> anyhow::Result<MarketView> {
    let charts = Section::build(&market.charts, |figures| {
        figures
            .iter()
            .enumerate()
            .map(|(i, figure)| {
                Ok(ChartView {
                    id: format!("chart-{i}"),
                    figure: script_json(figure)?,
                })
            })
            .collect::<anyhow::Result<Vec<_>>>()
    })?;

    Ok(MarketView {
        daily_change: Section::build(&market.daily_change, |c| Ok(daily_change_view(c)))?,
        recent: recent_table(&market.recent)?,
        charts,
    })
}

fn daily_change_view(change: &DailyChange) -> DailyChangeView {
    DailyChangeView {
        latest: format!("{:.2}", change.latest_close),
        change: format!("{:+.2}", change.change),
        rising: change.change >= 0.0,
    }
}

fn recent_table(recent: &RecentHistory) -> anyhow::Result<String> {
    let rows: Vec<Vec<String>> = recent
        .rows
        .iter()
        .map(|row| {
            vec![
                row.date.to_string(),
                row.open.to_string(),
                row.high.to_string(),
                row.low.to_string(),
                row.close.to_string(),
                row.volume.to_string(),
            ]
        })
        .collect();
    script_json(&render_table(&RecentHistory::COLUMNS, &rows))
}

/// Figure JSON that can sit inside a `<script>` element.
fn script_json(figure: &Figure) -> anyhow::Result<String> {
    Ok(figure.to_json()?.replace("</", "<\\/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use quotedash_core::Selection;

    fn inputs(selection: Selection) -> Inputs {
        Inputs {
            ticker: "MSFT".to_string(),
            start: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            selection,
        }
    }

    #[test]
    fn indicator_choices_follow_the_chart_type() {
        let candle = DashboardView::build(&inputs(Selection::default()), vec![], None).unwrap();
        let values: Vec<_> = candle.indicators.iter().map(|c| c.value).collect();
        assert_eq!(values, ["rsi", "macd"]);

        let line = Selection::from_controls(ChartType::Line, Some(Indicator::Macd), None);
        let line = DashboardView::build(&inputs(line), vec![], None).unwrap();
        let values: Vec<_> = line.indicators.iter().map(|c| c.value).collect();
        assert_eq!(values, ["rsi", "moving-average", "macd"]);
        assert!(line.indicators[2].selected);
    }

    #[test]
    fn only_the_pressed_period_is_active() {
        let selection = Selection::from_controls(ChartType::Line, None, Some(Period::FiveYears));
        let view = DashboardView::build(&inputs(selection), vec![], None).unwrap();
        let active: Vec<_> = view.periods.iter().filter(|p| p.active).map(|p| p.label).collect();
        assert_eq!(active, ["5y"]);
        assert_eq!(view.inputs.period, Some("5y"));
    }

    #[test]
    fn daily_change_is_shown_to_two_decimals() {
        let view = daily_change_view(&DailyChange {
            latest_close: 181.179992,
            previous_close: 181.910004,
            change: -0.730012,
        });
        assert_eq!(view.latest, "181.18");
        assert_eq!(view.change, "-0.73");
        assert!(!view.rising);
    }

    #[test]
    fn script_json_cannot_close_the_script_element() {
        let figure = render_table(&["</script>"], &[]);
        assert!(!script_json(&figure).unwrap().contains("</script>"));
    }
}

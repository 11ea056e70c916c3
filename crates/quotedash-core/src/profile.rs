use serde::Serialize;

const NOT_AVAILABLE: &str = "N/A";
const NO_SUMMARY: &str = "No summary available.";

/// Business and valuation attributes of a company. Any of them may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CompanyProfile {
    pub long_business_summary: Option<String>,
    pub sector: Option<String>,
    pub full_time_employees: Option<u64>,
    pub website: Option<String>,
    pub market_cap: Option<f64>,
    pub beta: Option<f64>,
    pub trailing_eps: Option<f64>,
    pub trailing_pe: Option<f64>,
    pub quick_ratio: Option<f64>,
    pub revenue_per_share: Option<f64>,
    pub profit_margins: Option<f64>,
    pub debt_to_equity: Option<f64>,
    pub return_on_equity: Option<f64>,
}

impl CompanyProfile {
    pub fn summary_text(&self) -> &str {
        self.long_business_summary.as_deref().unwrap_or(NO_SUMMARY)
    }

    pub fn sector_text(&self) -> String {
        text_or_na(self.sector.as_deref())
    }

    pub fn employees_text(&self) -> String {
        self.full_time_employees
            .map(|n| n.to_string())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }

    pub fn website_text(&self) -> String {
        text_or_na(self.website.as_deref())
    }
}

fn text_or_na(value: Option<&str>) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(NOT_AVAILABLE)
        .to_string()
}

/// `N/A` for absent figures; otherwise the plain decimal representation.
pub fn figure_text(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => v.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// The two key/value tables shown next to the company summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileTables {
    pub valuation: Vec<(&'static str, String)>,
    pub health: Vec<(&'static str, String)>,
}

impl From<&CompanyProfile> for ProfileTables {
    fn from(p: &CompanyProfile) -> Self {
        Self {
            valuation: vec![
                ("Market cap", figure_text(p.market_cap)),
                ("Beta", figure_text(p.beta)),
                ("EPS", figure_text(p.trailing_eps)),
                ("PE Ratio", figure_text(p.trailing_pe)),
            ],
            health: vec![
                ("Quick Ratio", figure_text(p.quick_ratio)),
                ("Revenue per share", figure_text(p.revenue_per_share)),
                ("Profit Margins", figure_text(p.profit_margins)),
                ("Debt to Equity", figure_text(p.debt_to_equity)),
                ("Return on Equity", figure_text(p.return_on_equity)),
            ],
        }
    }
}

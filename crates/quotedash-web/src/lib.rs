//! HTML shell for the stock dashboard.
//!
//! A single page at `GET /`: every request re-runs the whole render pass with
//! the controls carried in its query string.

pub mod query;
pub mod routes;
pub mod view;

pub use query::{DashboardQuery, Inputs};
pub use routes::configure;

use quotedash_chart::PlotlyCharts;
use quotedash_core::MarketData;
use std::sync::Arc;
use tera::Tera;

pub const TEMPLATE: &str = "dashboard.html";

/// Shared by every worker; nothing in here changes after start-up.
pub struct AppState {
    pub market: Arc<dyn MarketData>,
    pub charts: PlotlyCharts,
    pub templates: Tera,
}

impl AppState {
    pub fn new(market: Arc<dyn MarketData>) -> anyhow::Result<Self> {
        Ok(Self {
            market,
            charts: PlotlyCharts,
            templates: templates()?,
        })
    }
}

/// The page template is compiled into the binary.
pub fn templates() -> anyhow::Result<Tera> {
    let mut tera = Tera::default();
    tera.add_raw_template(TEMPLATE, include_str!("../templates/dashboard.html.tera"))?;
    Ok(tera)
}

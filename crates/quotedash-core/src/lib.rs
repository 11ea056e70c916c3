//! Domain model and render logic behind the quotedash stock page.
//!
//! Network access, chart drawing, and the HTTP shell live in sibling crates;
//! this crate only knows about them through the [`MarketData`] and
//! [`ChartRenderer`] traits.

pub mod notice;
pub mod page;
pub mod profile;
pub mod provider;
pub mod selection;
pub mod selector;
pub mod series;
pub mod summary;
pub mod ticker;

pub use notice::{Notice, Outcome, Severity};
pub use page::{render_page, MarketSection, Page, PageRequest, RequestError};
pub use profile::{CompanyProfile, ProfileTables};
pub use provider::{MarketData, ProviderError, Span};
pub use selection::{ChartType, Indicator, Period, Selection, SelectionError};
pub use selector::{
    ChartKind, ChartPlan, ChartRenderer, ChartSelector, ChartSeries, SeriesSource,
};
pub use series::{Bar, PriceSeries};
pub use summary::{daily_change, recent_history, DailyChange, RecentHistory, RecentRow};
pub use ticker::{Ticker, TickerError};

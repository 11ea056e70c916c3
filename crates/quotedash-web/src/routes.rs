use crate::query::{DashboardQuery, Inputs};
use crate::view::DashboardView;
use crate::{AppState, TEMPLATE};
use actix_web::http::header::ContentType;
use actix_web::error::ErrorInternalServerError;
use actix_web::{get, web, HttpResponse, Responder};
use chrono::Local;
use quotedash_core::{render_page, Notice, PageRequest};
use tera::Context;
use tracing::{debug, error, trace, warn};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(dashboard).service(health);
}

/// The whole dashboard, evaluated top to bottom for this request.
#[get("/")]
async fn dashboard(
    state: web::Data<AppState>,
    query: web::Query<DashboardQuery>,
) -> actix_web::Result<HttpResponse> {
    let time = std::time::Instant::now();
    trace!("dashboard query: {query:?}");

    let today = Local::now().date_naive();
    let (inputs, mut notices) = Inputs::resolve(&query, today);

    let page = match PageRequest::new(&inputs.ticker, inputs.start, inputs.end, inputs.selection) {
        Ok(request) => Some(render_page(state.market.as_ref(), &state.charts, &request).await),
        Err(e) => {
            warn!("[{}] request rejected: {e}", inputs.ticker);
            notices.push(Notice::error(format!("Invalid request: {e}")));
            None
        }
    };

    let html = DashboardView::build(&inputs, notices, page.as_ref())
        .and_then(|view| Ok(Context::from_serialize(&view)?))
        .and_then(|context| Ok(state.templates.render(TEMPLATE, &context)?))
        .map_err(|e| {
            error!("[{}] dashboard failed to render: {e:#}", inputs.ticker);
            ErrorInternalServerError("failed to render the dashboard")
        })?;

    debug!(
        "[{}] dashboard served. Elapsed time: {} ms",
        inputs.ticker,
        time.elapsed().as_millis()
    );
    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(html))
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().body("ok")
}

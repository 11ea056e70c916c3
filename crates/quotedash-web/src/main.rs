use actix_web::{middleware::Logger, web, App, HttpServer};
use clap::Parser;
use cli::Cli;
use dotenv::{dotenv, var};
use quotedash_web::{configure, AppState};
use quotedash_yahoo::{YahooFinance, DEFAULT_USER_AGENT};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, trace, Level};
use tracing_subscriber::{util::SubscriberInitExt, FmtSubscriber};

mod cli;

fn preprocess(trace_level: Level) -> anyhow::Result<()> {
    dotenv().ok();
    // `try_init` also forwards actix-web's `log` records
    FmtSubscriber::builder()
        .with_max_level(trace_level)
        .finish()
        .try_init()?;
    Ok(())
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    preprocess(cli.trace.into())?;
    trace!("Command line input recorded: {cli:#?}");

    let user_agent = var("USER_AGENT").unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string());
    let yahoo = YahooFinance::new(&user_agent, Duration::from_secs(cli.timeout_secs))?;
    let state = web::Data::new(AppState::new(Arc::new(yahoo))?);

    info!("Serving the dashboard at http://{}:{}", cli.host, cli.port);
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((cli.host.as_str(), cli.port))?
    .run()
    .await?;

    Ok(())
}

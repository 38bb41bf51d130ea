//! rangeview - a minimal query page for read-only SQLite databases served
//! over HTTP range requests.

use std::io;
use std::sync::Arc;

use rangeview::cli::Cli;
use rangeview::config::Config;
use rangeview::connection::ConnectionManager;
use rangeview::db::{EngineBootstrap, HttpSqliteBootstrap, MockBootstrap, MockEngine};
use rangeview::error::Result;
use rangeview::page::{spawn_sanity_check, Page};
use rangeview::query::QueryFacade;
use rangeview::{headless, logging, tui};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse_args();

    logging::init(&logging::LogTarget::for_mode(cli.is_headless()));

    match run(cli).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            error!("{}: {}", e.category(), e);
            eprintln!("{}: {}", e.category(), e.message());
            std::process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> Result<i32> {
    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let mut config = Config::load_from_file(&config_path)?;
    cli.apply_to(&mut config);

    let engine_config = config.database.to_engine_config()?;
    info!(
        "Database: {} ({}-byte ranges)",
        engine_config.url, engine_config.request_chunk_size
    );

    let bootstrap: Arc<dyn EngineBootstrap> = if cli.mock_db {
        Arc::new(MockBootstrap::new(Arc::new(MockEngine::games_fixture())))
    } else {
        Arc::new(HttpSqliteBootstrap::new())
    };

    let page = Page::new();
    let connections = ConnectionManager::builder(bootstrap, engine_config)
        .failure_policy(config.connection.on_failure)
        .status_sink(Arc::new(page.clone()))
        .build();
    let facade = QueryFacade::new(connections);

    if let Some(sql) = &cli.query {
        let outcome = headless::run_query(&page, &facade, sql, &cli.query_params()).await;
        headless::write_outcome(&outcome, &mut io::stdout(), &mut io::stderr())?;
        return Ok(outcome.exit_code());
    }

    if config.page.sanity_check {
        spawn_sanity_check(facade.clone(), config.page.sanity_query.clone());
    }

    tui::run(page, facade).await?;
    Ok(0)
}

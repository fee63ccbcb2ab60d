use std::sync::Arc;

use anyhow::Result;
use tracing::info;

mod application;
mod data;
mod domain;
mod infrastructure;
mod presentation;
mod server;

use data::post_repository::TitleMatch;
use data::repositories::Repositories;
use infrastructure::database::{create_pool, run_migrations};
use infrastructure::jwt::JwtService;
use infrastructure::logging::init_logging;
use infrastructure::settings::Settings;
use presentation::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let settings = Settings::from_env()?;

    init_logging(&settings.log_level)?;

    let pool = create_pool(&settings.database_url, settings.database_max_connections).await?;
    run_migrations(&pool).await?;

    let jwt = Arc::new(JwtService::new(&settings.jwt_secret, settings.jwt_ttl_seconds));
    let title_match = if settings.search_case_sensitive {
        TitleMatch::CaseSensitive
    } else {
        TitleMatch::CaseInsensitive
    };
    let state = AppState::new(Repositories::postgres(pool), jwt, title_match);

    info!(addr = %settings.http_addr, "starting quill server");
    server::run_http(&settings, state).await
}

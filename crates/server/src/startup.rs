use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use dotenvy::dotenv;
use migration::MigratorTrait;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use configs::AppConfig;
use service::pagination::PaginationMenu;
use service::pokemon::repo::SeaOrmPokemonRepository;
use service::pokemon::repository::PokemonRepository;
use service::pokemon::PokemonService;

use crate::errors::StartupError;
use crate::routes::{self, auth};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Load the config file at `path`. The environment is consulted only when
/// the file does not exist; a present but invalid file aborts startup.
fn load_config_from(path: &str) -> Result<AppConfig, StartupError> {
    let invalid = |e: anyhow::Error| StartupError::InvalidConfig(format!("{e:#}"));
    match configs::load_file_if_present(path).map_err(invalid)? {
        Some(cfg) => Ok(cfg),
        None => {
            warn!(path, "config file not found; falling back to environment");
            AppConfig::from_env().map_err(invalid)
        }
    }
}

/// Assemble the router around any repository implementation.
pub fn build_app(repo: Arc<dyn PokemonRepository>, menu: PaginationMenu, jwt_secret: impl Into<String>) -> Router {
    let state = auth::ServerState {
        pokemon_svc: Arc::new(PokemonService::new(repo, menu)),
        auth: auth::ServerAuthConfig { jwt_secret: jwt_secret.into() },
    };
    routes::build_router(state, build_cors())
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();

    let cfg = load_config_from(&configs::config_path())?;
    let menu = PaginationMenu::try_from(&cfg.listing).map_err(|e| StartupError::InvalidConfig(e.to_string()))?;

    // DB connection
    let db = models::db::connect_with_config(&cfg.database).await?;
    if cfg.database.auto_migrate {
        migration::Migrator::up(&db, None)
            .await
            .map_err(|e| StartupError::Migration(e.to_string()))?;
        info!("migrations applied");
    }

    let repo: Arc<dyn PokemonRepository> = Arc::new(SeaOrmPokemonRepository::new(db));
    let app = build_app(repo, menu, cfg.auth.jwt_secret.clone());

    // Bind and serve
    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port).parse()?;
    info!(%addr, "starting pokedex api");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

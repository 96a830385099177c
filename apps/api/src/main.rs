//! Data room admin console access API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

use std::sync::Arc;
use std::time::Duration;

use dataroom_application::{AccessService, ActorDirectory};
use dataroom_core::AppError;
use dataroom_domain::{MenuSection, console_menu};
use dataroom_infrastructure::{
    InMemoryActorDirectory, OcsActorDirectory, OcsDirectoryConfig, load_menu_from_file,
};
use tracing::info;

use crate::api_config::{ApiConfig, DirectoryProviderConfig, init_tracing};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;
    let directory = build_directory(&config.directory_provider)?;
    let menu = build_menu(&config)?;

    let app_state = AppState {
        access_service: AccessService::new(directory, menu),
        actor_header: config.actor_header.clone(),
    };

    let app = api_router::build_router(app_state, &config.frontend_url)?;

    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind API listener: {error}")))?;

    info!(%address, "dataroom-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("API server failed: {error}")))
}

fn build_directory(provider: &DirectoryProviderConfig) -> Result<Arc<dyn ActorDirectory>, AppError> {
    match provider {
        DirectoryProviderConfig::Ocs(ocs) => {
            let http_client = reqwest::Client::builder()
                .timeout(Duration::from_secs(ocs.timeout_seconds))
                .build()
                .map_err(|error| {
                    AppError::Internal(format!("failed to build OCS http client: {error}"))
                })?;

            info!(base_url = %ocs.base_url, "using OCS actor directory");
            Ok(Arc::new(OcsActorDirectory::new(
                http_client,
                OcsDirectoryConfig {
                    base_url: ocs.base_url.clone(),
                    username: ocs.username.clone(),
                    app_password: ocs.app_password.clone(),
                    page_size: ocs.page_size,
                },
            )))
        }
        DirectoryProviderConfig::Memory { seed_path } => {
            let Some(seed_path) = seed_path else {
                info!("using empty in-memory actor directory");
                return Ok(Arc::new(InMemoryActorDirectory::new()));
            };

            let json = std::fs::read_to_string(seed_path).map_err(|error| {
                AppError::Internal(format!(
                    "failed to read directory seed '{}': {error}",
                    seed_path.display()
                ))
            })?;
            info!(seed_path = %seed_path.display(), "using seeded in-memory actor directory");
            Ok(Arc::new(InMemoryActorDirectory::from_json(&json)?))
        }
    }
}

fn build_menu(config: &ApiConfig) -> Result<Vec<MenuSection>, AppError> {
    match &config.menu_definition_path {
        Some(path) => load_menu_from_file(path, config.unknown_capability_policy),
        None => console_menu(),
    }
}

//! HTTP server
//!
//! The admin API in front of the lifecycle engine. Each handler awaits
//! its engine call to completion; there are no in-process queues or
//! background workers.

pub mod middleware;
pub mod routes;
mod state;
pub mod types;


pub use state::AppState;

use crate::config::{Config, StoreBackend};
use crate::core::credentials::DEFAULT_SECRET_BYTES;
use crate::core::lifecycle::{LifecycleManager, LifecycleSettings};
use crate::core::policy::PolicyPublisher;
use crate::core::tiers::LimitResolver;
use crate::storage::{
    EntityStore, KubePolicyStore, KubeSettings, KubeStore, MemoryPolicyStore, MemoryStore,
    PolicyStore,
};
use crate::utils::error::Result;
use actix_web::{App, HttpServer, web};
use std::sync::Arc;
use tracing::{info, warn};

/// Build the lifecycle engine from configuration.
pub fn build_engine(config: &Config) -> Result<LifecycleManager> {
    let (entities, policies): (Arc<dyn EntityStore>, Arc<dyn PolicyStore>) =
        match config.store.backend {
            StoreBackend::Memory => (
                Arc::new(MemoryStore::new()),
                Arc::new(MemoryPolicyStore::new()),
            ),
            StoreBackend::Kubernetes => {
                let mut settings = KubeSettings::default();
                settings.namespace = config.store.namespace.clone();
                if let Some(api_url) = &config.store.api_url {
                    settings.api_url = api_url.clone();
                }
                (
                    Arc::new(KubeStore::new(&settings)?),
                    Arc::new(KubePolicyStore::new(&settings)?),
                )
            }
        };

    let publisher = PolicyPublisher::new(
        policies,
        config.gateway.name.clone(),
        config.default_team.team_id.clone(),
    );
    let resolver = LimitResolver::new(config.default_tier()?);
    let settings = LifecycleSettings {
        default_team_id: config.default_team.team_id.clone(),
        default_team_tier: config.default_team_tier()?,
        create_default_team: config.default_team.create,
        secret_bytes: DEFAULT_SECRET_BYTES,
    };

    Ok(LifecycleManager::new(entities, publisher, resolver, settings))
}

/// Build the engine, bootstrap the default team, and serve the admin API.
pub async fn run(config: Config) -> Result<()> {
    let engine = Arc::new(build_engine(&config)?);

    if let Err(err) = engine.ensure_default_team().await {
        warn!("Default team bootstrap failed: {}", err);
    }

    let state = web::Data::new(AppState {
        engine,
        config: config.clone(),
    });
    let admin_key = config.auth.admin_api_key.clone();

    info!(
        "Starting keyforge on {}:{}",
        config.server.host, config.server.port
    );
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(middleware::AdminAuth::new(admin_key.clone()))
            .configure(routes::configure)
    })
    .bind((config.server.host.clone(), config.server.port))?
    .run()
    .await?;

    Ok(())
}

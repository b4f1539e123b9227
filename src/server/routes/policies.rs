//! Policy management endpoints

use crate::server::state::AppState;
use crate::utils::error::KeyforgeError;
use actix_web::{HttpResponse, web};
use serde::Serialize;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/teams/{team_id}/policies", web::get().to(get_policies))
        .route(
            "/teams/{team_id}/policies/sync",
            web::post().to(sync_policies),
        );
}

#[derive(Serialize)]
struct SyncResponse {
    message: &'static str,
    team_id: String,
    tier: String,
}

async fn get_policies(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, KeyforgeError> {
    let intent = state.engine.team_policies(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(intent))
}

async fn sync_policies(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, KeyforgeError> {
    let team_id = path.into_inner();
    let limits = state.engine.sync_team_policy(&team_id).await?;
    Ok(HttpResponse::Ok().json(SyncResponse {
        message: "team policies synchronized",
        team_id,
        tier: limits.tier,
    }))
}

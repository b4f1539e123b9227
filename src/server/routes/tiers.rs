//! Tier catalog endpoints

use crate::core::tiers::{EffectiveLimits, Tier};
use crate::server::state::AppState;
use crate::utils::error::KeyforgeError;
use actix_web::{HttpResponse, web};
use serde::Serialize;
use std::collections::BTreeMap;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/tiers", web::get().to(list_tiers))
        .route("/tiers/{tier}", web::get().to(get_tier));
}

#[derive(Serialize)]
struct TierListResponse {
    tiers: BTreeMap<&'static str, EffectiveLimits>,
}

async fn list_tiers(_state: web::Data<AppState>) -> Result<HttpResponse, KeyforgeError> {
    let tiers = Tier::ALL
        .into_iter()
        .map(|tier| (tier.as_str(), tier.limits()))
        .collect();
    Ok(HttpResponse::Ok().json(TierListResponse { tiers }))
}

/// Effective limits for a tier name; unknown names degrade to the default
/// tier rather than failing.
async fn get_tier(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, KeyforgeError> {
    let limits = state.engine.effective_tier_limits(&path.into_inner());
    Ok(HttpResponse::Ok().json(limits))
}

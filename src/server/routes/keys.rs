//! API key management endpoints

use crate::core::lifecycle::{CreateKeyRequest, UpdateKeyRequest};
use crate::server::state::AppState;
use crate::server::types::{
    CreateKeyResponse, DeleteKeyBySecretRequest, KeyListResponse, MessageResponse,
};
use crate::utils::error::KeyforgeError;
use actix_web::{HttpResponse, web};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/teams/{team_id}/keys")
            .route(web::post().to(create_key))
            .route(web::get().to(list_keys)),
    )
    .service(
        web::resource("/keys/{key_name}")
            .route(web::patch().to(update_key))
            .route(web::delete().to(delete_key_by_name)),
    )
    .route("/keys", web::delete().to(delete_key_by_secret));
}

async fn create_key(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<CreateKeyRequest>,
) -> Result<HttpResponse, KeyforgeError> {
    let issued = state
        .engine
        .create_key(&path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(CreateKeyResponse::from(issued)))
}

async fn list_keys(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, KeyforgeError> {
    let team_id = path.into_inner();
    let keys = state.engine.list_team_keys(&team_id).await?;
    Ok(HttpResponse::Ok().json(KeyListResponse { team_id, keys }))
}

async fn update_key(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<UpdateKeyRequest>,
) -> Result<HttpResponse, KeyforgeError> {
    let key = state
        .engine
        .update_key(&path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(key))
}

async fn delete_key_by_name(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, KeyforgeError> {
    let key_name = path.into_inner();
    state.engine.delete_key_by_name(&key_name).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new(format!("key {} deleted", key_name))))
}

async fn delete_key_by_secret(
    state: web::Data<AppState>,
    body: web::Json<DeleteKeyBySecretRequest>,
) -> Result<HttpResponse, KeyforgeError> {
    state.engine.delete_key_by_secret(&body.key).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("key deleted")))
}

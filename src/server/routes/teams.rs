//! Team management endpoints

use crate::core::lifecycle::CreateTeamRequest;
use crate::server::state::AppState;
use crate::server::types::{
    CreateTeamResponse, MembersResponse, MessageResponse, TeamDetailsResponse, TeamListResponse,
    TeamResponse,
};
use crate::utils::error::KeyforgeError;
use actix_web::{HttpResponse, web};

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/teams")
            .route(web::post().to(create_team))
            .route(web::get().to(list_teams)),
    )
    .service(
        web::resource("/teams/{team_id}")
            .route(web::get().to(get_team))
            .route(web::delete().to(delete_team)),
    )
    .route("/teams/{team_id}/members", web::get().to(list_members))
    .route(
        "/teams/{team_id}/members/{user_id}",
        web::delete().to(remove_member),
    );
}

async fn create_team(
    state: web::Data<AppState>,
    body: web::Json<CreateTeamRequest>,
) -> Result<HttpResponse, KeyforgeError> {
    let team = state.engine.create_team(body.into_inner()).await?;
    let intent = state.engine.team_policies(&team.team_id).await?;
    Ok(HttpResponse::Ok().json(CreateTeamResponse {
        team_id: team.team_id,
        display_name: team.display_name,
        tier: team.tier,
        inherited_limits: intent.limits,
    }))
}

async fn list_teams(state: web::Data<AppState>) -> Result<HttpResponse, KeyforgeError> {
    let teams = state.engine.list_teams().await?;
    Ok(HttpResponse::Ok().json(TeamListResponse {
        teams: teams.into_iter().map(TeamResponse::from).collect(),
    }))
}

async fn get_team(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, KeyforgeError> {
    let details = state.engine.get_team(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(TeamDetailsResponse::from(details)))
}

async fn delete_team(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, KeyforgeError> {
    let team_id = path.into_inner();
    state.engine.delete_team(&team_id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new(format!("team {} deleted", team_id))))
}

async fn list_members(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, KeyforgeError> {
    let team_id = path.into_inner();
    let members = state.engine.list_team_members(&team_id).await?;
    Ok(HttpResponse::Ok().json(MembersResponse { team_id, members }))
}

async fn remove_member(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, KeyforgeError> {
    let (team_id, user_id) = path.into_inner();
    state.engine.remove_team_member(&team_id, &user_id).await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new(format!(
        "user {} removed from team {}",
        user_id, team_id
    ))))
}

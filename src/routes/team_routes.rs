// hackmate-service/src/routes/team_routes.rs
use crate::models::{AddMemberRequest, CreateTeamRequest, ServiceError};
use crate::services::team_roster;
use crate::store::DocumentStore;
use crate::utils::get_user_id_from_request;
use actix_web::{get, post, web, HttpRequest, HttpResponse};
use log::{error, info};
use serde_json::json;

// Create a new team with the caller as leader
#[post("/teams")]
async fn create_team(
    req: HttpRequest,
    db: web::Data<DocumentStore>,
    data: web::Json<CreateTeamRequest>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;

    info!("Creating new team: {} for user: {}", data.name, user_id);

    let team = team_roster::create_team(&db, &user_id, data.into_inner())?;

    Ok(HttpResponse::Ok().json(team))
}

// List all teams
#[get("/teams")]
async fn list_teams(
    req: HttpRequest,
    db: web::Data<DocumentStore>,
) -> Result<HttpResponse, ServiceError> {
    let _user_id = get_user_id_from_request(&req)?;

    let teams = team_roster::fetch_teams(&db)?;

    Ok(HttpResponse::Ok().json(teams))
}

// Get a specific team by ID
#[get("/teams/{team_id}")]
async fn get_team(
    req: HttpRequest,
    db: web::Data<DocumentStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let _user_id = get_user_id_from_request(&req)?;
    let team_id = path.into_inner();

    let team = team_roster::get_team_by_id(&db, &team_id)?;

    Ok(HttpResponse::Ok().json(team))
}

// Add a member to a team (leader only)
#[post("/teams/{team_id}/members")]
async fn add_team_member(
    req: HttpRequest,
    db: web::Data<DocumentStore>,
    path: web::Path<String>,
    data: web::Json<AddMemberRequest>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let team_id = path.into_inner();

    let team = team_roster::get_team_by_id(&db, &team_id)?;
    if team.leader_id != user_id {
        error!("User {} is not the leader of team {}", user_id, team_id);
        return Err(ServiceError::Forbidden);
    }

    let added = team_roster::add_member_to_team(&db, &team_id, &data.user_id)?;

    Ok(HttpResponse::Ok().json(json!({
        "team_id": team_id,
        "user_id": data.user_id,
        "added": added
    })))
}

// Member profiles for a team, fetched in batches
#[get("/teams/{team_id}/members")]
async fn get_team_members(
    req: HttpRequest,
    db: web::Data<DocumentStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let _user_id = get_user_id_from_request(&req)?;
    let team_id = path.into_inner();

    let profiles = team_roster::team_member_profiles(&db, &team_id)?;

    info!("Found {} member profiles for team {}", profiles.len(), team_id);

    Ok(HttpResponse::Ok().json(profiles))
}

// Users the caller could invite: accepted connections not already on the team
#[get("/teams/{team_id}/invite-candidates")]
async fn get_invite_candidates(
    req: HttpRequest,
    db: web::Data<DocumentStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let team_id = path.into_inner();

    let candidates = team_roster::invite_candidates(&db, &team_id, &user_id)?;

    Ok(HttpResponse::Ok().json(candidates))
}

// Register all team routes
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(create_team)
        .service(list_teams)
        .service(get_team)
        .service(add_team_member)
        .service(get_team_members)
        .service(get_invite_candidates);
}

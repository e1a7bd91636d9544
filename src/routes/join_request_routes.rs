// hackmate-service/src/routes/join_request_routes.rs
use crate::models::{RequestStatus, ServiceError, UpdateStatusRequest};
use crate::services::join_request_queue::{self, NewJoinRequest};
use crate::services::team_roster;
use crate::store::{join_request_store, DocumentStore};
use crate::utils::get_claims_from_request;
use actix_web::{get, post, put, web, HttpRequest, HttpResponse};
use log::{error, info};

// Request to join a team; requester identity comes from the token claims
#[post("/teams/{team_id}/join-requests")]
async fn send_join_request(
    req: HttpRequest,
    db: web::Data<DocumentStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let claims = get_claims_from_request(&req)?;
    let team_id = path.into_inner();

    info!("Join request for team {} from user {}", team_id, claims.sub);

    let outcome = join_request_queue::send_join_request(
        &db,
        NewJoinRequest {
            team_id,
            user_id: claims.sub,
            user_name: claims.name,
            user_email: claims.email,
        },
    )?;

    Ok(HttpResponse::Ok().json(outcome))
}

// All join requests for a team (leader only)
#[get("/teams/{team_id}/join-requests")]
async fn get_team_join_requests(
    req: HttpRequest,
    db: web::Data<DocumentStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let claims = get_claims_from_request(&req)?;
    let team_id = path.into_inner();

    let team = team_roster::get_team_by_id(&db, &team_id)?;
    if team.leader_id != claims.sub {
        error!("User {} is not the leader of team {}", claims.sub, team_id);
        return Err(ServiceError::Forbidden);
    }

    let requests = join_request_queue::get_team_join_requests(&db, &team_id)?;

    info!("Found {} join requests for team {}", requests.len(), team_id);

    Ok(HttpResponse::Ok().json(requests))
}

// Accept or reject a join request (leader only). Accepting also adds the
// requester to the roster, mirroring the invite accept path.
#[put("/join-requests/{request_id}")]
async fn respond_to_join_request(
    req: HttpRequest,
    db: web::Data<DocumentStore>,
    path: web::Path<String>,
    data: web::Json<UpdateStatusRequest>,
) -> Result<HttpResponse, ServiceError> {
    let claims = get_claims_from_request(&req)?;
    let request_id = path.into_inner();

    let target = RequestStatus::parse_target(&data.status)?;

    let request = match join_request_store::find_by_id(&db, &request_id)? {
        Some(request) => request,
        None => {
            error!("Join request not found: {}", request_id);
            return Err(ServiceError::NotFound);
        }
    };

    let team = team_roster::get_team_by_id(&db, &request.team_id)?;
    if team.leader_id != claims.sub {
        error!(
            "User {} is not the leader of team {}",
            claims.sub, request.team_id
        );
        return Err(ServiceError::Forbidden);
    }

    let updated = join_request_queue::update_join_request_status(&db, &request_id, target)?;

    if target == RequestStatus::Accepted {
        team_roster::add_member_to_team(&db, &updated.team_id, &updated.user_id)?;
        info!("User {} added to team {}", updated.user_id, updated.team_id);
    }

    Ok(HttpResponse::Ok().json(updated))
}

// Register all join request routes
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(send_join_request)
        .service(get_team_join_requests)
        .service(respond_to_join_request);
}

// hackmate-service/src/services/join_request_queue.rs
//
// Requests to join a specific team, a separate workflow from direct
// connection-based invites.
use crate::models::{RequestStatus, ServiceError, TeamJoinRequest};
use crate::store::{join_request_store, team_store, DocumentStore};
use log::info;
use serde::Serialize;

#[derive(Serialize, Debug, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum JoinOutcome {
    Created { id: String },
    AlreadyRequested,
}

#[derive(Debug, Clone)]
pub struct NewJoinRequest {
    pub team_id: String,
    pub user_id: String,
    pub user_name: String,
    pub user_email: String,
}

// Create a pending join request. The (team, user) keyed insert makes the
// duplicate guard atomic; an existing member is refused outright.
pub fn send_join_request(
    db: &DocumentStore,
    request: NewJoinRequest,
) -> Result<JoinOutcome, ServiceError> {
    if request.team_id.is_empty() || request.user_id.is_empty() {
        return Err(ServiceError::InvalidRequest(
            "Both team and user identifiers are required".to_string(),
        ));
    }

    let team = match team_store::find_team_by_id(db, &request.team_id)? {
        Some(team) => team,
        None => return Err(ServiceError::NotFound),
    };

    if team.has_member(&request.user_id) {
        return Err(ServiceError::Conflict(
            "User is already a member of the team".to_string(),
        ));
    }

    match join_request_store::insert_pending(
        db,
        &request.team_id,
        &request.user_id,
        &request.user_name,
        &request.user_email,
    )? {
        Some(created) => {
            info!(
                "Join request created: user {} -> team {}",
                request.user_id, request.team_id
            );
            Ok(JoinOutcome::Created { id: created.id })
        }
        None => Ok(JoinOutcome::AlreadyRequested),
    }
}

pub fn get_team_join_requests(
    db: &DocumentStore,
    team_id: &str,
) -> Result<Vec<TeamJoinRequest>, ServiceError> {
    join_request_store::list_for_team(db, team_id)
}

pub fn update_join_request_status(
    db: &DocumentStore,
    request_id: &str,
    target: RequestStatus,
) -> Result<TeamJoinRequest, ServiceError> {
    let updated = join_request_store::apply_transition(db, request_id, target)?;
    info!("Join request {} is now {}", request_id, updated.status);
    Ok(updated)
}

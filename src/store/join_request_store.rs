// hackmate-service/src/store/join_request_store.rs
use crate::models::{RequestStatus, ServiceError, TeamJoinRequest};
use crate::store::DocumentStore;
use sha2::{Digest, Sha256};

pub const JOIN_REQUESTS_COLLECTION: &str = "team_requests";

// Deterministic document id for the (team, user) pair, so a duplicate join
// request fails at insert instead of racing a query-then-insert.
pub fn join_key(team_id: &str, user_id: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(team_id.as_bytes());
    hasher.update(b"_");
    hasher.update(user_id.as_bytes());
    format!("{:x}", hasher.finalize())
}

// Insert a pending join request. Returns None when a pending one already
// exists for this (team, user) pair. A settled record does not block: it is
// superseded in place under the document lock, so a user may apply again
// after a rejection.
pub fn insert_pending(
    db: &DocumentStore,
    team_id: &str,
    user_id: &str,
    user_name: &str,
    user_email: &str,
) -> Result<Option<TeamJoinRequest>, ServiceError> {
    let id = join_key(team_id, user_id);
    let request = TeamJoinRequest::new(
        id.clone(),
        team_id.to_string(),
        user_id.to_string(),
        user_name.to_string(),
        user_email.to_string(),
    );

    if db.insert_with_id(JOIN_REQUESTS_COLLECTION, &id, &request)? {
        return Ok(Some(request));
    }

    db.update_with(
        JOIN_REQUESTS_COLLECTION,
        &id,
        |existing: &mut TeamJoinRequest| {
            if existing.status == RequestStatus::Pending {
                return Ok(None);
            }
            *existing = request.clone();
            Ok(Some(existing.clone()))
        },
    )
}

pub fn find_by_id(
    db: &DocumentStore,
    request_id: &str,
) -> Result<Option<TeamJoinRequest>, ServiceError> {
    db.get(JOIN_REQUESTS_COLLECTION, request_id)
}

pub fn list_for_team(
    db: &DocumentStore,
    team_id: &str,
) -> Result<Vec<TeamJoinRequest>, ServiceError> {
    let mut requests: Vec<TeamJoinRequest> = db
        .list::<TeamJoinRequest>(JOIN_REQUESTS_COLLECTION)?
        .into_iter()
        .map(|(_, request)| request)
        .filter(|request| request.team_id == team_id)
        .collect();

    requests.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    Ok(requests)
}

// Same single entry point and pending-only guard as the connection ledger
pub fn apply_transition(
    db: &DocumentStore,
    request_id: &str,
    target: RequestStatus,
) -> Result<TeamJoinRequest, ServiceError> {
    db.update_with(
        JOIN_REQUESTS_COLLECTION,
        request_id,
        |request: &mut TeamJoinRequest| {
            request.status = request.status.transition(target)?;
            Ok(request.clone())
        },
    )
}

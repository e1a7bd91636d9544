// hackmate-service/src/services/connection_ledger.rs
//
// Lifecycle of pairwise connection requests and the relationship queries
// driving the Connect / Request Sent / Connected affordances.
use crate::models::{ConnectionRequest, RequestStatus, ServiceError};
use crate::store::{connection_store, DocumentStore};
use log::info;
use serde::Serialize;

#[derive(Serialize, Debug, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SendOutcome {
    Created { id: String },
    AlreadyExists,
}

fn validate_pair(from_user: &str, to_user: &str) -> Result<(), ServiceError> {
    if from_user.is_empty() || to_user.is_empty() {
        return Err(ServiceError::InvalidRequest(
            "Both user identifiers are required".to_string(),
        ));
    }
    if from_user == to_user {
        return Err(ServiceError::InvalidRequest(
            "Cannot send a connection request to yourself".to_string(),
        ));
    }
    Ok(())
}

// Create a pending request for the unordered pair. The pair-keyed insert is
// atomic, so a concurrent request in either direction resolves to exactly
// one stored record and the loser sees AlreadyExists.
pub fn send_connection_request(
    db: &DocumentStore,
    from_user: &str,
    to_user: &str,
) -> Result<SendOutcome, ServiceError> {
    validate_pair(from_user, to_user)?;

    match connection_store::insert_pending(db, from_user, to_user)? {
        Some(request) => {
            info!("Connection request created: {} -> {}", from_user, to_user);
            Ok(SendOutcome::Created { id: request.id })
        }
        None => Ok(SendOutcome::AlreadyExists),
    }
}

// "none" when no record exists for the pair, else the stored status.
// Symmetric in its arguments by construction of the pair key.
pub fn get_connection_status(
    db: &DocumentStore,
    user_a: &str,
    user_b: &str,
) -> Result<String, ServiceError> {
    validate_pair(user_a, user_b)?;

    Ok(match connection_store::find_by_pair(db, user_a, user_b)? {
        Some(request) => request.status.to_string(),
        None => "none".to_string(),
    })
}

// Pending requests addressed to the user, oldest first. Reads go through
// the participant index, so only documents involving the user are touched.
pub fn get_pending_requests(
    db: &DocumentStore,
    user_id: &str,
) -> Result<Vec<ConnectionRequest>, ServiceError> {
    let mut requests: Vec<ConnectionRequest> = connection_store::list_for_user(db, user_id)?
        .into_iter()
        .filter(|request| request.to_user == user_id && request.status == RequestStatus::Pending)
        .collect();

    requests.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    Ok(requests)
}

pub fn update_connection_status(
    db: &DocumentStore,
    request_id: &str,
    target: RequestStatus,
) -> Result<ConnectionRequest, ServiceError> {
    let updated = connection_store::apply_transition(db, request_id, target)?;
    info!("Connection request {} is now {}", request_id, updated.status);
    Ok(updated)
}

// Distinct counterparties across all accepted records involving the user
pub fn get_accepted_connections(
    db: &DocumentStore,
    user_id: &str,
) -> Result<Vec<String>, ServiceError> {
    let mut counterparties: Vec<String> = Vec::new();

    for request in connection_store::list_for_user(db, user_id)? {
        if request.status != RequestStatus::Accepted {
            continue;
        }
        if let Some(other) = request.counterparty(user_id) {
            if !counterparties.iter().any(|existing| existing == other) {
                counterparties.push(other.to_string());
            }
        }
    }

    Ok(counterparties)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn scratch_store() -> DocumentStore {
        let root = std::env::temp_dir().join(format!("hackmate-ledger-{}", Uuid::new_v4()));
        DocumentStore::new(root)
    }

    #[test]
    fn rejects_missing_or_equal_identifiers() {
        let db = scratch_store();
        assert!(matches!(
            send_connection_request(&db, "", "bob"),
            Err(ServiceError::InvalidRequest(_))
        ));
        assert!(matches!(
            send_connection_request(&db, "alice", "alice"),
            Err(ServiceError::InvalidRequest(_))
        ));
    }

    #[test]
    fn duplicate_request_in_either_direction_is_reported() {
        let db = scratch_store();

        let first = send_connection_request(&db, "alice", "bob").unwrap();
        assert!(matches!(first, SendOutcome::Created { .. }));

        let repeat = send_connection_request(&db, "alice", "bob").unwrap();
        assert_eq!(repeat, SendOutcome::AlreadyExists);

        let reverse = send_connection_request(&db, "bob", "alice").unwrap();
        assert_eq!(reverse, SendOutcome::AlreadyExists);

        assert_eq!(connection_store::list_all(&db).unwrap().len(), 1);
    }

    #[test]
    fn second_transition_fails_and_keeps_first_state() {
        let db = scratch_store();
        let id = match send_connection_request(&db, "alice", "bob").unwrap() {
            SendOutcome::Created { id } => id,
            other => panic!("unexpected outcome: {:?}", other),
        };

        update_connection_status(&db, &id, RequestStatus::Accepted).unwrap();

        let err = update_connection_status(&db, &id, RequestStatus::Rejected).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidTransition(_)));

        let stored = connection_store::find_by_id(&db, &id).unwrap().unwrap();
        assert_eq!(stored.status, RequestStatus::Accepted);
    }

    #[test]
    fn status_is_symmetric_across_call_orders() {
        let db = scratch_store();
        let id = match send_connection_request(&db, "alice", "bob").unwrap() {
            SendOutcome::Created { id } => id,
            other => panic!("unexpected outcome: {:?}", other),
        };

        assert_eq!(get_connection_status(&db, "alice", "bob").unwrap(), "pending");
        assert_eq!(get_connection_status(&db, "bob", "alice").unwrap(), "pending");

        update_connection_status(&db, &id, RequestStatus::Accepted).unwrap();

        assert_eq!(get_connection_status(&db, "alice", "bob").unwrap(), "accepted");
        assert_eq!(get_connection_status(&db, "bob", "alice").unwrap(), "accepted");

        assert_eq!(get_accepted_connections(&db, "alice").unwrap(), vec!["bob"]);
        assert_eq!(get_accepted_connections(&db, "bob").unwrap(), vec!["alice"]);
    }

    #[test]
    fn unknown_pair_reads_as_none() {
        let db = scratch_store();
        assert_eq!(get_connection_status(&db, "alice", "bob").unwrap(), "none");
    }

    #[test]
    fn per_user_listings_resolve_through_the_index() {
        let db = scratch_store();
        send_connection_request(&db, "alice", "bob").unwrap();
        send_connection_request(&db, "carol", "dave").unwrap();

        let involving_alice = connection_store::list_for_user(&db, "alice").unwrap();
        assert_eq!(involving_alice.len(), 1);
        assert_eq!(involving_alice[0].to_user, "bob");

        assert!(connection_store::list_for_user(&db, "erin")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn pending_requests_are_filtered_to_recipient() {
        let db = scratch_store();
        send_connection_request(&db, "alice", "bob").unwrap();
        send_connection_request(&db, "carol", "bob").unwrap();
        send_connection_request(&db, "bob", "dave").unwrap();

        let pending = get_pending_requests(&db, "bob").unwrap();
        assert_eq!(pending.len(), 2);
        assert!(pending.iter().all(|r| r.to_user == "bob"));
    }
}

// hackmate-service/src/store/connection_store.rs
use crate::models::{ConnectionRequest, RequestStatus, ServiceError};
use crate::store::DocumentStore;
use sha2::{Digest, Sha256};

pub const CONNECTIONS_COLLECTION: &str = "connections";
pub const CONNECTION_INDEX_COLLECTION: &str = "connection_index";

// Deterministic document id for the unordered pair {a, b}. Sorting before
// hashing makes the key direction-independent, and hashing keeps arbitrary
// user ids filesystem-safe.
pub fn pair_key(a: &str, b: &str) -> String {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let mut hasher = Sha256::new();
    hasher.update(lo.as_bytes());
    hasher.update(b"_");
    hasher.update(hi.as_bytes());
    format!("{:x}", hasher.finalize())
}

// Insert a pending request keyed by the pair. Returns None when a record
// for the pair already exists, in either direction: the duplicate check is
// the atomic insert itself, not a separate query.
pub fn insert_pending(
    db: &DocumentStore,
    from_user: &str,
    to_user: &str,
) -> Result<Option<ConnectionRequest>, ServiceError> {
    let id = pair_key(from_user, to_user);
    let request = ConnectionRequest::new(id.clone(), from_user.to_string(), to_user.to_string());

    if db.insert_with_id(CONNECTIONS_COLLECTION, &id, &request)? {
        index_add(db, from_user, &id)?;
        index_add(db, to_user, &id)?;
        Ok(Some(request))
    } else {
        Ok(None)
    }
}

// Record a request id in a participant's index document, so per-user
// listings read only the documents that involve the user instead of
// scanning the whole collection.
fn index_add(db: &DocumentStore, user_id: &str, request_id: &str) -> Result<(), ServiceError> {
    db.upsert_with(
        CONNECTION_INDEX_COLLECTION,
        user_id,
        Vec::new,
        |ids: &mut Vec<String>| {
            if !ids.iter().any(|id| id == request_id) {
                ids.push(request_id.to_string());
            }
            Ok(())
        },
    )
}

// All requests involving the user, resolved through the participant index
pub fn list_for_user(
    db: &DocumentStore,
    user_id: &str,
) -> Result<Vec<ConnectionRequest>, ServiceError> {
    let ids: Vec<String> = db
        .get(CONNECTION_INDEX_COLLECTION, user_id)?
        .unwrap_or_default();

    let mut requests = Vec::new();
    for id in ids {
        if let Some(request) = db.get(CONNECTIONS_COLLECTION, &id)? {
            requests.push(request);
        }
    }
    Ok(requests)
}

pub fn find_by_pair(
    db: &DocumentStore,
    user_a: &str,
    user_b: &str,
) -> Result<Option<ConnectionRequest>, ServiceError> {
    db.get(CONNECTIONS_COLLECTION, &pair_key(user_a, user_b))
}

pub fn find_by_id(
    db: &DocumentStore,
    request_id: &str,
) -> Result<Option<ConnectionRequest>, ServiceError> {
    db.get(CONNECTIONS_COLLECTION, request_id)
}

pub fn list_all(db: &DocumentStore) -> Result<Vec<ConnectionRequest>, ServiceError> {
    Ok(db
        .list::<ConnectionRequest>(CONNECTIONS_COLLECTION)?
        .into_iter()
        .map(|(_, request)| request)
        .collect())
}

// Single entry point for status changes; the transition function rejects
// anything but pending -> accepted/rejected while the document lock is held.
pub fn apply_transition(
    db: &DocumentStore,
    request_id: &str,
    target: RequestStatus,
) -> Result<ConnectionRequest, ServiceError> {
    db.update_with(
        CONNECTIONS_COLLECTION,
        request_id,
        |request: &mut ConnectionRequest| {
            request.status = request.status.transition(target)?;
            Ok(request.clone())
        },
    )
}

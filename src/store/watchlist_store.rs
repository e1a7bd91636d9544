// hackmate-service/src/store/watchlist_store.rs
//
// Per-user saved events. One document per user holding the saved event ids
// in insertion order; add and remove run under the document lock, so the
// set operations are atomic and idempotent.
use crate::models::ServiceError;
use crate::store::DocumentStore;

pub const WATCHLIST_COLLECTION: &str = "watchlist";

// Save an event for the user. Returns whether it was newly added.
pub fn add(db: &DocumentStore, user_id: &str, event_id: &str) -> Result<bool, ServiceError> {
    db.upsert_with(
        WATCHLIST_COLLECTION,
        user_id,
        Vec::new,
        |ids: &mut Vec<String>| {
            if ids.iter().any(|id| id == event_id) {
                return Ok(false);
            }
            ids.push(event_id.to_string());
            Ok(true)
        },
    )
}

// Drop an event from the user's watchlist. Returns whether it was present.
pub fn remove(db: &DocumentStore, user_id: &str, event_id: &str) -> Result<bool, ServiceError> {
    db.upsert_with(
        WATCHLIST_COLLECTION,
        user_id,
        Vec::new,
        |ids: &mut Vec<String>| {
            let before = ids.len();
            ids.retain(|id| id != event_id);
            Ok(ids.len() != before)
        },
    )
}

pub fn list_ids(db: &DocumentStore, user_id: &str) -> Result<Vec<String>, ServiceError> {
    Ok(db.get(WATCHLIST_COLLECTION, user_id)?.unwrap_or_default())
}

// hackmate-service/src/store/event_store.rs
use crate::models::{Event, ServiceError};
use crate::store::DocumentStore;

pub const EVENTS_COLLECTION: &str = "events";

pub fn save_event(db: &DocumentStore, event: &Event) -> Result<(), ServiceError> {
    db.put(EVENTS_COLLECTION, &event.id, event)
}

pub fn find_event_by_id(db: &DocumentStore, event_id: &str) -> Result<Option<Event>, ServiceError> {
    db.get(EVENTS_COLLECTION, event_id)
}

// All events, newest first
pub fn list_events(db: &DocumentStore) -> Result<Vec<Event>, ServiceError> {
    let mut events: Vec<Event> = db
        .list::<Event>(EVENTS_COLLECTION)?
        .into_iter()
        .map(|(_, event)| event)
        .collect();

    events.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(events)
}

pub fn list_by_organizer(db: &DocumentStore, organizer_id: &str) -> Result<Vec<Event>, ServiceError> {
    Ok(list_events(db)?
        .into_iter()
        .filter(|event| event.organizer_id == organizer_id)
        .collect())
}

// Fetch events for a batch of ids; missing or deactivated ones are skipped
pub fn find_many(db: &DocumentStore, event_ids: &[String]) -> Result<Vec<Event>, ServiceError> {
    let mut events = Vec::new();
    for event_id in event_ids {
        if let Some(event) = find_event_by_id(db, event_id)? {
            events.push(event);
        }
    }
    Ok(events)
}

// hackmate-service/src/models/event.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Tech event document. Dates arrive as opaque strings from the organizer's
// form; a virtual event carries no location.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Event {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub event_type: String,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub is_virtual: bool,
    #[serde(default)]
    pub registration_url: String,
    #[serde(default)]
    pub max_participants: Option<u32>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    pub organizer_id: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

// Payload for POST /events
#[derive(Serialize, Deserialize, Debug)]
pub struct CreateEventRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub event_type: String,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub is_virtual: bool,
    #[serde(default)]
    pub registration_url: String,
    #[serde(default)]
    pub max_participants: Option<u32>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

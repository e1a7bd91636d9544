// hackmate-service/src/models/profile.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Public profile document, keyed by the identity provider's user id
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Profile {
    pub user_id: String,
    pub username: String,
    pub display_name: String,
    pub email: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub bio: String,
    pub updated_at: DateTime<Utc>,
}

// Payload for PUT /profiles. Fields left out keep their stored value.
#[derive(Serialize, Deserialize, Debug)]
pub struct UpsertProfileRequest {
    pub username: String,
    pub display_name: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub skills: Option<Vec<String>>,
    #[serde(default)]
    pub bio: Option<String>,
}

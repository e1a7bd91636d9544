// hackmate-service/src/models/join_request.rs
use crate::models::RequestStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Request from a user to join a specific team, distinct from a pairwise
// connection between two users.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TeamJoinRequest {
    pub id: String,
    pub team_id: String,
    pub user_id: String,
    pub user_name: String,
    pub user_email: String,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
}

impl TeamJoinRequest {
    pub fn new(
        id: String,
        team_id: String,
        user_id: String,
        user_name: String,
        user_email: String,
    ) -> Self {
        Self {
            id,
            team_id,
            user_id,
            user_name,
            user_email,
            status: RequestStatus::Pending,
            created_at: Utc::now(),
        }
    }
}

// hackmate-service/src/models/connection.rs
use crate::models::ServiceError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// Status shared by connection requests and team join requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestStatus {
    #[serde(rename = "pending")]
    Pending,
    #[serde(rename = "accepted")]
    Accepted,
    #[serde(rename = "rejected")]
    Rejected,
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RequestStatus::Pending => write!(f, "pending"),
            RequestStatus::Accepted => write!(f, "accepted"),
            RequestStatus::Rejected => write!(f, "rejected"),
        }
    }
}

impl RequestStatus {
    // Parse a caller-supplied target status. Only accepted/rejected are
    // valid inputs to a status update.
    pub fn parse_target(value: &str) -> Result<Self, ServiceError> {
        match value {
            "accepted" => Ok(RequestStatus::Accepted),
            "rejected" => Ok(RequestStatus::Rejected),
            other => Err(ServiceError::InvalidStatus(format!(
                "Invalid status: {}. Must be 'accepted' or 'rejected'",
                other
            ))),
        }
    }

    // The single place the pending -> accepted/rejected state machine is
    // enforced. Accepted and rejected are terminal.
    pub fn transition(self, target: RequestStatus) -> Result<RequestStatus, ServiceError> {
        if target == RequestStatus::Pending {
            return Err(ServiceError::InvalidStatus(
                "Cannot transition a request back to pending".to_string(),
            ));
        }
        match self {
            RequestStatus::Pending => Ok(target),
            current => Err(ServiceError::InvalidTransition(format!(
                "Request is already {}",
                current
            ))),
        }
    }
}

// Pairwise user-to-user connection request
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ConnectionRequest {
    pub id: String,
    pub from_user: String,
    pub to_user: String,
    pub status: RequestStatus,
    pub created_at: DateTime<Utc>,
}

impl ConnectionRequest {
    pub fn new(id: String, from_user: String, to_user: String) -> Self {
        Self {
            id,
            from_user,
            to_user,
            status: RequestStatus::Pending,
            created_at: Utc::now(),
        }
    }

    // The other party of the pair, if the given user participates at all
    pub fn counterparty(&self, user_id: &str) -> Option<&str> {
        if self.from_user == user_id {
            Some(&self.to_user)
        } else if self.to_user == user_id {
            Some(&self.from_user)
        } else {
            None
        }
    }
}

// Payload for POST /connections
#[derive(Serialize, Deserialize, Debug)]
pub struct SendConnectionRequest {
    pub to_user: String,
}

// Payload for PUT /connections/{request_id} and /join-requests/{request_id}
#[derive(Serialize, Deserialize, Debug)]
pub struct UpdateStatusRequest {
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_transitions_to_accepted() {
        let next = RequestStatus::Pending
            .transition(RequestStatus::Accepted)
            .unwrap();
        assert_eq!(next, RequestStatus::Accepted);
    }

    #[test]
    fn accepted_is_terminal() {
        let err = RequestStatus::Accepted
            .transition(RequestStatus::Rejected)
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidTransition(_)));
    }

    #[test]
    fn rejected_is_terminal() {
        let err = RequestStatus::Rejected
            .transition(RequestStatus::Accepted)
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidTransition(_)));
    }

    #[test]
    fn cannot_target_pending() {
        let err = RequestStatus::Pending
            .transition(RequestStatus::Pending)
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidStatus(_)));
    }

    #[test]
    fn parse_target_rejects_unknown_values() {
        assert!(RequestStatus::parse_target("accepted").is_ok());
        assert!(RequestStatus::parse_target("rejected").is_ok());
        assert!(RequestStatus::parse_target("pending").is_err());
        assert!(RequestStatus::parse_target("done").is_err());
    }

    #[test]
    fn counterparty_maps_to_other_user() {
        let req = ConnectionRequest::new("k".into(), "alice".into(), "bob".into());
        assert_eq!(req.counterparty("alice"), Some("bob"));
        assert_eq!(req.counterparty("bob"), Some("alice"));
        assert_eq!(req.counterparty("carol"), None);
    }
}

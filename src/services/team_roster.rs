// hackmate-service/src/services/team_roster.rs
//
// Team creation and membership changes. Invite candidates are sourced from
// the connection ledger: only users already connected to the viewer who are
// not yet on the team.
use crate::models::{CreateTeamRequest, Profile, ServiceError, Team, TeamMember, TeamRole};
use crate::services::connection_ledger;
use crate::store::{profile_store, team_store, DocumentStore};
use chrono::Utc;
use log::{info, warn};
use uuid::Uuid;

// The store caps `in`-style membership queries at this many ids per query,
// so member profiles are fetched in batches of this size.
pub const MEMBER_PROFILE_BATCH_SIZE: usize = 10;

pub fn create_team(
    db: &DocumentStore,
    leader_id: &str,
    payload: CreateTeamRequest,
) -> Result<Team, ServiceError> {
    if payload.name.is_empty() {
        return Err(ServiceError::InvalidRequest(
            "Team name is required".to_string(),
        ));
    }
    if payload.max_members == 0 {
        return Err(ServiceError::InvalidRequest(
            "max_members must be a positive integer".to_string(),
        ));
    }

    let team = Team {
        id: Uuid::new_v4().to_string(),
        name: payload.name,
        description: payload.description,
        skills_needed: payload.skills_needed,
        max_members: payload.max_members,
        members: vec![TeamMember {
            user_id: leader_id.to_string(),
            role: TeamRole::Leader,
        }],
        leader_id: leader_id.to_string(),
        created_at: Utc::now(),
    };

    team_store::save_team(db, &team)?;
    info!("Team created: {} ({}) by {}", team.name, team.id, leader_id);

    Ok(team)
}

pub fn get_team_by_id(db: &DocumentStore, team_id: &str) -> Result<Team, ServiceError> {
    team_store::find_team_by_id(db, team_id)?.ok_or(ServiceError::NotFound)
}

pub fn fetch_teams(db: &DocumentStore) -> Result<Vec<Team>, ServiceError> {
    team_store::list_teams(db)
}

// Idempotent atomic set-add. Returns whether the member was newly added.
// The max_members cap is advisory: exceeding it is logged, not rejected.
pub fn add_member_to_team(
    db: &DocumentStore,
    team_id: &str,
    member_uid: &str,
) -> Result<bool, ServiceError> {
    if member_uid.is_empty() {
        return Err(ServiceError::InvalidRequest(
            "Member user id is required".to_string(),
        ));
    }

    let added = team_store::add_member(
        db,
        team_id,
        TeamMember {
            user_id: member_uid.to_string(),
            role: TeamRole::Member,
        },
    )?;

    if added {
        let team = get_team_by_id(db, team_id)?;
        if team.members.len() as u32 > team.max_members {
            warn!(
                "Team {} now has {} members, above its advisory cap of {}",
                team_id,
                team.members.len(),
                team.max_members
            );
        }
        info!("User {} added to team {}", member_uid, team_id);
    }

    Ok(added)
}

// Accepted connections of the viewer that are not already on the team
pub fn invite_candidates(
    db: &DocumentStore,
    team_id: &str,
    viewer_id: &str,
) -> Result<Vec<String>, ServiceError> {
    let team = get_team_by_id(db, team_id)?;
    let connections = connection_ledger::get_accepted_connections(db, viewer_id)?;

    Ok(connections
        .into_iter()
        .filter(|user_id| !team.has_member(user_id))
        .collect())
}

// Member profiles, fetched in batches to stay under the store's query cap.
// Members without a profile document are skipped.
pub fn team_member_profiles(db: &DocumentStore, team_id: &str) -> Result<Vec<Profile>, ServiceError> {
    let team = get_team_by_id(db, team_id)?;
    let member_ids = team.member_ids();

    let mut profiles = Vec::new();
    for batch in member_ids.chunks(MEMBER_PROFILE_BATCH_SIZE) {
        profiles.extend(profile_store::find_many(db, batch)?);
    }

    Ok(profiles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::connection_ledger::send_connection_request;
    use crate::services::connection_ledger::SendOutcome;
    use crate::models::RequestStatus;
    use std::sync::Arc;
    use std::thread;

    fn scratch_store() -> DocumentStore {
        let root = std::env::temp_dir().join(format!("hackmate-roster-{}", Uuid::new_v4()));
        DocumentStore::new(root)
    }

    fn new_team(db: &DocumentStore, leader: &str) -> Team {
        create_team(
            db,
            leader,
            CreateTeamRequest {
                name: "protocol hackers".to_string(),
                description: "build a thing".to_string(),
                skills_needed: vec!["rust".to_string()],
                max_members: 4,
            },
        )
        .unwrap()
    }

    #[test]
    fn leader_is_seeded_as_first_member() {
        let db = scratch_store();
        let team = new_team(&db, "alice");

        assert_eq!(team.member_ids(), vec!["alice"]);
        assert_eq!(team.members[0].role, TeamRole::Leader);
        assert_eq!(team.leader_id, "alice");
    }

    #[test]
    fn add_member_is_idempotent() {
        let db = scratch_store();
        let team = new_team(&db, "alice");

        assert!(add_member_to_team(&db, &team.id, "carol").unwrap());
        assert!(!add_member_to_team(&db, &team.id, "carol").unwrap());

        let stored = get_team_by_id(&db, &team.id).unwrap();
        assert_eq!(stored.member_ids(), vec!["alice", "carol"]);
    }

    #[test]
    fn concurrent_adds_both_land() {
        let db = Arc::new(scratch_store());
        let team = new_team(&db, "alice");

        let mut handles = Vec::new();
        for uid in ["bob", "carol"] {
            let db = db.clone();
            let team_id = team.id.clone();
            handles.push(thread::spawn(move || {
                add_member_to_team(&db, &team_id, uid).unwrap();
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        let stored = get_team_by_id(&db, &team.id).unwrap();
        assert!(stored.has_member("bob"));
        assert!(stored.has_member("carol"));
        assert_eq!(stored.members.len(), 3);
    }

    #[test]
    fn candidates_are_connections_minus_members() {
        let db = scratch_store();
        let team = new_team(&db, "alice");

        for other in ["bob", "carol"] {
            let id = match send_connection_request(&db, "alice", other).unwrap() {
                SendOutcome::Created { id } => id,
                outcome => panic!("unexpected outcome: {:?}", outcome),
            };
            connection_ledger::update_connection_status(&db, &id, RequestStatus::Accepted).unwrap();
        }

        add_member_to_team(&db, &team.id, "carol").unwrap();

        let candidates = invite_candidates(&db, &team.id, "alice").unwrap();
        assert_eq!(candidates, vec!["bob"]);
    }

    #[test]
    fn missing_team_is_not_found() {
        let db = scratch_store();
        assert!(matches!(
            get_team_by_id(&db, "nope"),
            Err(ServiceError::NotFound)
        ));
        assert!(matches!(
            add_member_to_team(&db, "nope", "bob"),
            Err(ServiceError::NotFound)
        ));
    }
}

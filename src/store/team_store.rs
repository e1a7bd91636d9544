// hackmate-service/src/store/team_store.rs
use crate::models::{ServiceError, Team, TeamMember};
use crate::store::DocumentStore;

pub const TEAMS_COLLECTION: &str = "teams";

pub fn save_team(db: &DocumentStore, team: &Team) -> Result<(), ServiceError> {
    db.put(TEAMS_COLLECTION, &team.id, team)
}

pub fn find_team_by_id(db: &DocumentStore, team_id: &str) -> Result<Option<Team>, ServiceError> {
    let team = db.get::<Team>(TEAMS_COLLECTION, team_id)?.map(|mut team| {
        team.normalize_roles();
        team
    });
    Ok(team)
}

pub fn list_teams(db: &DocumentStore) -> Result<Vec<Team>, ServiceError> {
    Ok(db
        .list::<Team>(TEAMS_COLLECTION)?
        .into_iter()
        .map(|(_, mut team)| {
            team.normalize_roles();
            team
        })
        .collect())
}

// Atomic set-add of a member. The append happens inside the document lock,
// so two concurrent adds for different users both land, and a repeat add of
// the same user is a no-op. Returns whether the member was actually added.
pub fn add_member(
    db: &DocumentStore,
    team_id: &str,
    member: TeamMember,
) -> Result<bool, ServiceError> {
    db.update_with(TEAMS_COLLECTION, team_id, |team: &mut Team| {
        if team.has_member(&member.user_id) {
            return Ok(false);
        }
        team.members.push(member);
        Ok(true)
    })
}

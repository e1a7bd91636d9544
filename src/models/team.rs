// hackmate-service/src/models/team.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TeamRole {
    #[serde(rename = "leader")]
    Leader,
    #[serde(rename = "member")]
    Member,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TeamMember {
    pub user_id: String,
    pub role: TeamRole,
}

// Team document. Older records stored `members` as bare user id strings,
// newer ones as role-tagged objects; both shapes are accepted on read and
// normalized to `TeamMember`.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Team {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub skills_needed: Vec<String>,
    pub max_members: u32,
    #[serde(deserialize_with = "deserialize_members")]
    pub members: Vec<TeamMember>,
    pub leader_id: String,
    pub created_at: DateTime<Utc>,
}

// Accepts either member shape found in stored team documents
#[derive(Deserialize)]
#[serde(untagged)]
enum MemberShape {
    Tagged(TeamMember),
    Bare(String),
}

fn deserialize_members<'de, D>(deserializer: D) -> Result<Vec<TeamMember>, D::Error>
where
    D: Deserializer<'de>,
{
    let shapes = Vec::<MemberShape>::deserialize(deserializer)?;
    Ok(shapes
        .into_iter()
        .map(|shape| match shape {
            MemberShape::Tagged(member) => member,
            MemberShape::Bare(user_id) => TeamMember {
                user_id,
                role: TeamRole::Member,
            },
        })
        .collect())
}

impl Team {
    pub fn has_member(&self, user_id: &str) -> bool {
        self.members.iter().any(|m| m.user_id == user_id)
    }

    pub fn member_ids(&self) -> Vec<String> {
        self.members.iter().map(|m| m.user_id.clone()).collect()
    }

    // A bare-string members entry carries no role, so the leader's role is
    // reapplied from `leader_id` after deserialization.
    pub fn normalize_roles(&mut self) {
        for member in &mut self.members {
            member.role = if member.user_id == self.leader_id {
                TeamRole::Leader
            } else {
                TeamRole::Member
            };
        }
    }
}

// Payload for POST /teams
#[derive(Serialize, Deserialize, Debug)]
pub struct CreateTeamRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub skills_needed: Vec<String>,
    pub max_members: u32,
}

// Payload for POST /teams/{team_id}/members
#[derive(Serialize, Deserialize, Debug)]
pub struct AddMemberRequest {
    pub user_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn members_accept_bare_and_tagged_shapes() {
        let raw = json!({
            "id": "t1",
            "name": "hack team",
            "max_members": 4,
            "members": ["alice", {"user_id": "bob", "role": "member"}],
            "leader_id": "alice",
            "created_at": "2026-01-01T00:00:00Z"
        });

        let mut team: Team = serde_json::from_value(raw).unwrap();
        team.normalize_roles();

        assert_eq!(team.members.len(), 2);
        assert_eq!(team.members[0].user_id, "alice");
        assert_eq!(team.members[0].role, TeamRole::Leader);
        assert_eq!(team.members[1].user_id, "bob");
        assert_eq!(team.members[1].role, TeamRole::Member);
    }

    #[test]
    fn has_member_matches_on_user_id() {
        let team = Team {
            id: "t1".into(),
            name: "team".into(),
            description: String::new(),
            skills_needed: vec![],
            max_members: 4,
            members: vec![TeamMember {
                user_id: "alice".into(),
                role: TeamRole::Leader,
            }],
            leader_id: "alice".into(),
            created_at: Utc::now(),
        };
        assert!(team.has_member("alice"));
        assert!(!team.has_member("bob"));
    }
}

// hackmate-service/src/store/profile_store.rs
use crate::models::{Profile, ServiceError};
use crate::store::DocumentStore;
use serde::{Deserialize, Serialize};

pub const PROFILES_COLLECTION: &str = "profiles";
pub const USERNAMES_COLLECTION: &str = "usernames";

// Ownership record for a claimed username, keyed by the username itself
// (validated to be filesystem-safe before it reaches the store)
#[derive(Serialize, Deserialize, Debug, Clone)]
struct UsernameClaim {
    user_id: String,
}

pub fn save_profile(db: &DocumentStore, profile: &Profile) -> Result<(), ServiceError> {
    db.put(PROFILES_COLLECTION, &profile.user_id, profile)
}

pub fn find_by_user_id(db: &DocumentStore, user_id: &str) -> Result<Option<Profile>, ServiceError> {
    db.get(PROFILES_COLLECTION, user_id)
}

pub fn find_by_username(db: &DocumentStore, username: &str) -> Result<Option<Profile>, ServiceError> {
    match db.get::<UsernameClaim>(USERNAMES_COLLECTION, username)? {
        Some(claim) => find_by_user_id(db, &claim.user_id),
        None => Ok(None),
    }
}

// Claim a username for a user. The decision happens under the claim
// document's lock, so two concurrent upserts cannot both take the same
// name. Re-claiming a name the user already owns is a no-op.
pub fn claim_username(
    db: &DocumentStore,
    username: &str,
    user_id: &str,
) -> Result<(), ServiceError> {
    db.upsert_with(
        USERNAMES_COLLECTION,
        username,
        || UsernameClaim {
            user_id: user_id.to_string(),
        },
        |claim: &mut UsernameClaim| {
            if claim.user_id != user_id {
                return Err(ServiceError::Conflict(
                    "Username is already taken".to_string(),
                ));
            }
            Ok(())
        },
    )
}

// Release a username after its owner switched to another one
pub fn release_username(
    db: &DocumentStore,
    username: &str,
    user_id: &str,
) -> Result<(), ServiceError> {
    match db.get::<UsernameClaim>(USERNAMES_COLLECTION, username)? {
        Some(claim) if claim.user_id == user_id => db.remove(USERNAMES_COLLECTION, username),
        _ => Ok(()),
    }
}

pub fn list_by_role(
    db: &DocumentStore,
    role: Option<&str>,
    exclude_user_id: &str,
) -> Result<Vec<Profile>, ServiceError> {
    Ok(db
        .list::<Profile>(PROFILES_COLLECTION)?
        .into_iter()
        .map(|(_, profile)| profile)
        .filter(|profile| profile.user_id != exclude_user_id)
        .filter(|profile| role.map_or(true, |r| profile.role == r))
        .collect())
}

// Fetch profiles for a batch of user ids; missing profiles are skipped
pub fn find_many(db: &DocumentStore, user_ids: &[String]) -> Result<Vec<Profile>, ServiceError> {
    let mut profiles = Vec::new();
    for user_id in user_ids {
        if let Some(profile) = find_by_user_id(db, user_id)? {
            profiles.push(profile);
        }
    }
    Ok(profiles)
}

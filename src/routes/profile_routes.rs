// hackmate-service/src/routes/profile_routes.rs
use crate::models::{Profile, ServiceError, UpsertProfileRequest};
use crate::store::{profile_store, DocumentStore};
use crate::utils::get_claims_from_request;
use actix_web::{get, put, web, HttpRequest, HttpResponse};
use chrono::Utc;
use lazy_static::lazy_static;
use log::info;
use regex::Regex;
use serde::Deserialize;

lazy_static! {
    static ref USERNAME_RE: Regex = Regex::new(r"^[a-z0-9_]{3,30}$").expect("valid regex");
}

#[derive(Deserialize)]
struct CandidateQuery {
    role: Option<String>,
}

// Create or update the caller's profile. Fields omitted from the payload
// keep their stored value.
#[put("/profiles")]
async fn upsert_profile(
    req: HttpRequest,
    db: web::Data<DocumentStore>,
    data: web::Json<UpsertProfileRequest>,
) -> Result<HttpResponse, ServiceError> {
    let claims = get_claims_from_request(&req)?;
    let payload = data.into_inner();

    if !USERNAME_RE.is_match(&payload.username) {
        return Err(ServiceError::InvalidRequest(
            "Username must be 3-30 characters of lowercase letters, digits or underscores"
                .to_string(),
        ));
    }

    // Claiming the name is the uniqueness check; the claim document's lock
    // decides between concurrent upserts for the same name
    profile_store::claim_username(&db, &payload.username, &claims.sub)?;

    let existing = profile_store::find_by_user_id(&db, &claims.sub)?;
    let previous_username = existing.as_ref().map(|profile| profile.username.clone());

    let profile = match existing {
        Some(mut profile) => {
            profile.username = payload.username;
            profile.display_name = payload.display_name;
            if let Some(role) = payload.role {
                profile.role = role;
            }
            if let Some(skills) = payload.skills {
                profile.skills = skills;
            }
            if let Some(bio) = payload.bio {
                profile.bio = bio;
            }
            profile.updated_at = Utc::now();
            profile
        }
        None => Profile {
            user_id: claims.sub.clone(),
            username: payload.username,
            display_name: payload.display_name,
            email: claims.email.clone(),
            role: payload.role.unwrap_or_default(),
            skills: payload.skills.unwrap_or_default(),
            bio: payload.bio.unwrap_or_default(),
            updated_at: Utc::now(),
        },
    };

    profile_store::save_profile(&db, &profile)?;

    if let Some(previous) = previous_username {
        if previous != profile.username {
            profile_store::release_username(&db, &previous, &claims.sub)?;
        }
    }

    info!("Profile saved for user {}", claims.sub);

    Ok(HttpResponse::Ok().json(profile))
}

// Candidate listing for the find-teammates flow, optionally role-filtered,
// always excluding the caller
#[get("/profiles")]
async fn list_candidates(
    req: HttpRequest,
    db: web::Data<DocumentStore>,
    query: web::Query<CandidateQuery>,
) -> Result<HttpResponse, ServiceError> {
    let claims = get_claims_from_request(&req)?;

    let profiles = profile_store::list_by_role(&db, query.role.as_deref(), &claims.sub)?;

    Ok(HttpResponse::Ok().json(profiles))
}

#[get("/profiles/by-username/{username}")]
async fn get_profile_by_username(
    req: HttpRequest,
    db: web::Data<DocumentStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let _claims = get_claims_from_request(&req)?;
    let username = path.into_inner();

    match profile_store::find_by_username(&db, &username)? {
        Some(profile) => Ok(HttpResponse::Ok().json(profile)),
        None => Err(ServiceError::NotFound),
    }
}

#[get("/profiles/{user_id}")]
async fn get_profile(
    req: HttpRequest,
    db: web::Data<DocumentStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let _claims = get_claims_from_request(&req)?;
    let user_id = path.into_inner();

    match profile_store::find_by_user_id(&db, &user_id)? {
        Some(profile) => Ok(HttpResponse::Ok().json(profile)),
        None => Err(ServiceError::NotFound),
    }
}

// Register all profile routes
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(upsert_profile)
        .service(list_candidates)
        .service(get_profile_by_username)
        .service(get_profile);
}

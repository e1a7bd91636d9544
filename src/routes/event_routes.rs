// hackmate-service/src/routes/event_routes.rs
use crate::models::{CreateEventRequest, Event, ServiceError};
use crate::store::{event_store, watchlist_store, DocumentStore};
use crate::utils::get_user_id_from_request;
use actix_web::{delete, get, post, put, web, HttpRequest, HttpResponse};
use chrono::Utc;
use log::info;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

#[derive(Deserialize)]
struct EventQuery {
    organizer: Option<String>,
}

// Publish a new event with the caller as organizer
#[post("/events")]
async fn create_event(
    req: HttpRequest,
    db: web::Data<DocumentStore>,
    data: web::Json<CreateEventRequest>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let payload = data.into_inner();

    if payload.title.is_empty() {
        return Err(ServiceError::InvalidRequest(
            "Event title is required".to_string(),
        ));
    }
    if payload.event_type.is_empty() {
        return Err(ServiceError::InvalidRequest(
            "Event type is required".to_string(),
        ));
    }

    let event = Event {
        id: Uuid::new_v4().to_string(),
        title: payload.title,
        description: payload.description,
        event_type: payload.event_type,
        start_date: payload.start_date,
        end_date: payload.end_date,
        // A virtual event carries no physical location
        location: if payload.is_virtual { None } else { payload.location },
        is_virtual: payload.is_virtual,
        registration_url: payload.registration_url,
        max_participants: payload.max_participants,
        tags: payload.tags,
        image_url: payload.image_url,
        organizer_id: user_id.clone(),
        is_active: true,
        created_at: Utc::now(),
    };

    event_store::save_event(&db, &event)?;

    info!("Event created: {} ({}) by {}", event.title, event.id, user_id);

    Ok(HttpResponse::Ok().json(event))
}

// All events newest first, optionally narrowed to one organizer
#[get("/events")]
async fn list_events(
    req: HttpRequest,
    db: web::Data<DocumentStore>,
    query: web::Query<EventQuery>,
) -> Result<HttpResponse, ServiceError> {
    let _user_id = get_user_id_from_request(&req)?;

    let events = match query.organizer.as_deref() {
        Some(organizer_id) => event_store::list_by_organizer(&db, organizer_id)?,
        None => event_store::list_events(&db)?,
    };

    Ok(HttpResponse::Ok().json(events))
}

#[get("/events/{event_id}")]
async fn get_event(
    req: HttpRequest,
    db: web::Data<DocumentStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let _user_id = get_user_id_from_request(&req)?;
    let event_id = path.into_inner();

    match event_store::find_event_by_id(&db, &event_id)? {
        Some(event) => Ok(HttpResponse::Ok().json(event)),
        None => Err(ServiceError::NotFound),
    }
}

// Save an event to the caller's watchlist
#[put("/watchlist/{event_id}")]
async fn add_to_watchlist(
    req: HttpRequest,
    db: web::Data<DocumentStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let event_id = path.into_inner();

    if event_store::find_event_by_id(&db, &event_id)?.is_none() {
        return Err(ServiceError::NotFound);
    }

    let added = watchlist_store::add(&db, &user_id, &event_id)?;

    Ok(HttpResponse::Ok().json(json!({
        "event_id": event_id,
        "added": added
    })))
}

#[delete("/watchlist/{event_id}")]
async fn remove_from_watchlist(
    req: HttpRequest,
    db: web::Data<DocumentStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let event_id = path.into_inner();

    let removed = watchlist_store::remove(&db, &user_id, &event_id)?;

    Ok(HttpResponse::Ok().json(json!({
        "event_id": event_id,
        "removed": removed
    })))
}

// The caller's saved events; ids whose event has been deleted are skipped
#[get("/watchlist")]
async fn get_watchlist(
    req: HttpRequest,
    db: web::Data<DocumentStore>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;

    let ids = watchlist_store::list_ids(&db, &user_id)?;
    let events = event_store::find_many(&db, &ids)?;

    Ok(HttpResponse::Ok().json(events))
}

// Register all event routes
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(create_event)
        .service(list_events)
        .service(get_event)
        .service(add_to_watchlist)
        .service(remove_from_watchlist)
        .service(get_watchlist);
}

// hackmate-service/src/routes/connection_routes.rs
use crate::models::{RequestStatus, SendConnectionRequest, ServiceError, UpdateStatusRequest};
use crate::services::connection_ledger;
use crate::store::{connection_store, DocumentStore};
use crate::utils::get_user_id_from_request;
use actix_web::{get, post, put, web, HttpRequest, HttpResponse};
use log::{error, info};
use serde_json::json;

// Send a connection request to another user
#[post("/connections")]
async fn send_connection(
    req: HttpRequest,
    db: web::Data<DocumentStore>,
    data: web::Json<SendConnectionRequest>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;

    info!("Connection request from {} to {}", user_id, data.to_user);

    let outcome = connection_ledger::send_connection_request(&db, &user_id, &data.to_user)?;

    Ok(HttpResponse::Ok().json(outcome))
}

// Relationship between the caller and another user
#[get("/connections/status/{other_user}")]
async fn connection_status(
    req: HttpRequest,
    db: web::Data<DocumentStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let other_user = path.into_inner();

    let status = connection_ledger::get_connection_status(&db, &user_id, &other_user)?;

    Ok(HttpResponse::Ok().json(json!({ "status": status })))
}

// Pending requests addressed to the caller
#[get("/connections/pending")]
async fn pending_connections(
    req: HttpRequest,
    db: web::Data<DocumentStore>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;

    let pending = connection_ledger::get_pending_requests(&db, &user_id)?;

    info!("Found {} pending requests for user {}", pending.len(), user_id);

    Ok(HttpResponse::Ok().json(pending))
}

// Accept or reject a connection request (recipient only)
#[put("/connections/{request_id}")]
async fn respond_to_connection(
    req: HttpRequest,
    db: web::Data<DocumentStore>,
    path: web::Path<String>,
    data: web::Json<UpdateStatusRequest>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;
    let request_id = path.into_inner();

    let target = RequestStatus::parse_target(&data.status)?;

    let request = match connection_store::find_by_id(&db, &request_id)? {
        Some(request) => request,
        None => {
            error!("Connection request not found: {}", request_id);
            return Err(ServiceError::NotFound);
        }
    };

    // Only the recipient may decide the request
    if request.to_user != user_id {
        error!("User {} is not the recipient of request {}", user_id, request_id);
        return Err(ServiceError::Forbidden);
    }

    let updated = connection_ledger::update_connection_status(&db, &request_id, target)?;

    Ok(HttpResponse::Ok().json(updated))
}

// Accepted counterparties of the caller
#[get("/connections")]
async fn accepted_connections(
    req: HttpRequest,
    db: web::Data<DocumentStore>,
) -> Result<HttpResponse, ServiceError> {
    let user_id = get_user_id_from_request(&req)?;

    let connections = connection_ledger::get_accepted_connections(&db, &user_id)?;

    Ok(HttpResponse::Ok().json(connections))
}

// Register all connection routes
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(send_connection)
        .service(connection_status)
        .service(pending_connections)
        .service(respond_to_connection)
        .service(accepted_connections);
}

// hackmate-service/src/models/mod.rs
use actix_web::{HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod connection;
pub use connection::*;

pub mod event;
pub use event::*;

pub mod team;
pub use team::*;

pub mod join_request;
pub use join_request::*;

pub mod profile;
pub use profile::*;

// JWT claims supplied by the external identity provider
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Claims {
    pub sub: String, // Subject (user ID)
    pub email: String,
    pub name: String,
    pub exp: usize, // Expiration time
    pub iat: usize, // Issued at
}

// Custom error types
#[derive(Debug)]
pub enum ServiceError {
    InvalidRequest(String),
    InvalidStatus(String),
    InvalidTransition(String),
    NotFound,
    Conflict(String),
    Unauthorized,
    Forbidden,
    StoreUnavailable,
    InternalServerError,
}

// Implement Display for ServiceError
impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ServiceError::InvalidRequest(msg) => write!(f, "InvalidRequest: {}", msg),
            ServiceError::InvalidStatus(msg) => write!(f, "InvalidStatus: {}", msg),
            ServiceError::InvalidTransition(msg) => write!(f, "InvalidTransition: {}", msg),
            ServiceError::NotFound => write!(f, "Not Found"),
            ServiceError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ServiceError::Unauthorized => write!(f, "Unauthorized"),
            ServiceError::Forbidden => write!(f, "Forbidden"),
            ServiceError::StoreUnavailable => write!(f, "Store Unavailable"),
            ServiceError::InternalServerError => write!(f, "Internal Server Error"),
        }
    }
}

// Implement std::error::Error for ServiceError
impl std::error::Error for ServiceError {}

// Implement ResponseError for ServiceError
impl ResponseError for ServiceError {
    fn error_response(&self) -> HttpResponse {
        match self {
            ServiceError::InvalidRequest(ref message) => HttpResponse::BadRequest().json(message),
            ServiceError::InvalidStatus(ref message) => HttpResponse::BadRequest().json(message),
            ServiceError::InvalidTransition(ref message) => HttpResponse::Conflict().json(message),
            ServiceError::NotFound => HttpResponse::NotFound().json("Not Found"),
            ServiceError::Conflict(ref message) => HttpResponse::Conflict().json(message),
            ServiceError::Unauthorized => HttpResponse::Unauthorized().json("Unauthorized"),
            ServiceError::Forbidden => HttpResponse::Forbidden()
                .json("Forbidden: You don't have permission to access this resource"),
            ServiceError::StoreUnavailable => {
                HttpResponse::ServiceUnavailable().json("Store Unavailable")
            }
            ServiceError::InternalServerError => {
                HttpResponse::InternalServerError().json("Internal Server Error")
            }
        }
    }
}

use crate::models::{Claims, ServiceError};
use actix_web::{HttpMessage, HttpRequest};

// JWT utility functions. Token issuance is the identity provider's job;
// this service only verifies the shared-secret signature and reads claims.
pub mod jwt {
    use crate::models::{Claims, ServiceError};
    use chrono::{Duration, Utc};
    use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
    use std::env;

    // Get JWT secret from environment or use default
    fn get_jwt_secret() -> String {
        env::var("JWT_SECRET").unwrap_or_else(|_| "hackmate_dev_secret".to_string())
    }

    // Mint a token with the claims the identity provider would supply.
    // Used by local development and the integration tests.
    pub fn generate_token(user_id: &str, email: &str, name: &str) -> Result<String, ServiceError> {
        let secret = get_jwt_secret();
        let now = Utc::now();
        let expiration = now + Duration::days(7);

        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            name: name.to_string(),
            exp: expiration.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_ref()),
        )
        .map_err(|_| ServiceError::InternalServerError)
    }

    // Validate and decode a JWT token
    pub fn decode_token(token: &str) -> Result<Claims, ServiceError> {
        let secret = get_jwt_secret();

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(secret.as_ref()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|_| ServiceError::Unauthorized)
    }

    // Extract JWT from Authorization header
    pub fn extract_token_from_header(auth_header: &str) -> Result<String, ServiceError> {
        if !auth_header.starts_with("Bearer ") {
            return Err(ServiceError::Unauthorized);
        }

        Ok(auth_header.trim_start_matches("Bearer ").to_string())
    }
}

// Claims placed in request extensions by the auth middleware
pub fn get_claims_from_request(req: &HttpRequest) -> Result<Claims, ServiceError> {
    req.extensions()
        .get::<Claims>()
        .cloned()
        .ok_or(ServiceError::Unauthorized)
}

pub fn get_user_id_from_request(req: &HttpRequest) -> Result<String, ServiceError> {
    Ok(get_claims_from_request(req)?.sub)
}

// Middleware for JWT authentication
pub mod auth_middleware {
    use super::jwt;
    use actix_web::dev::{forward_ready, Service, ServiceRequest, Transform};
    use actix_web::http::header;
    use actix_web::{error::ErrorUnauthorized, Error, HttpMessage};
    use futures::future::{ok, Ready};
    use std::future::Future;
    use std::pin::Pin;

    pub struct Authentication;

    impl<S, B> Transform<S, ServiceRequest> for Authentication
    where
        S: Service<ServiceRequest, Response = actix_web::dev::ServiceResponse<B>, Error = Error>,
        S::Future: 'static,
        B: 'static,
    {
        type Response = actix_web::dev::ServiceResponse<B>;
        type Error = Error;
        type Transform = AuthenticationMiddleware<S>;
        type InitError = ();
        type Future = Ready<Result<Self::Transform, Self::InitError>>;

        fn new_transform(&self, service: S) -> Self::Future {
            ok(AuthenticationMiddleware { service })
        }
    }

    pub struct AuthenticationMiddleware<S> {
        service: S,
    }

    impl<S, B> Service<ServiceRequest> for AuthenticationMiddleware<S>
    where
        S: Service<ServiceRequest, Response = actix_web::dev::ServiceResponse<B>, Error = Error>,
        S::Future: 'static,
        B: 'static,
    {
        type Response = actix_web::dev::ServiceResponse<B>;
        type Error = Error;
        type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

        forward_ready!(service);

        fn call(&self, req: ServiceRequest) -> Self::Future {
            // Get Authorization header
            let auth_header = req.headers().get(header::AUTHORIZATION);

            if let Some(auth_header) = auth_header {
                if let Ok(auth_str) = auth_header.to_str() {
                    if let Ok(token) = jwt::extract_token_from_header(auth_str) {
                        if let Ok(claims) = jwt::decode_token(&token) {
                            // Add the claims to the request extensions
                            req.extensions_mut().insert(claims);
                            let fut = self.service.call(req);
                            return Box::pin(async move { fut.await });
                        }
                    }
                }
            }

            Box::pin(async move { Err(ErrorUnauthorized("Unauthorized")) })
        }
    }
}

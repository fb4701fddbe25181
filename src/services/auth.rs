use actix_web::{
    Error as ActixError, FromRequest, HttpRequest, dev::Payload, web::Data,
};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use std::future::{Ready, ready};
use uuid::Uuid;

use crate::config::Config;
use crate::error::AppError;

/// Claims inside the session token the external identity provider issues.
/// This service verifies the signature; it never mints user-facing tokens.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: Uuid,       // user id
    pub sid: String,     // provider-side session id
    pub email: String,
    pub email_verified: bool,
    pub exp: usize,      // expiration time
}

/// The authenticated caller, extracted from the Authorization header.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user_id: Uuid,
    pub session_id: String,
    pub email: String,
    pub email_verified: bool,
}

impl From<SessionClaims> for AuthSession {
    fn from(claims: SessionClaims) -> Self {
        AuthSession {
            user_id: claims.sub,
            session_id: claims.sid,
            email: claims.email,
            email_verified: claims.email_verified,
        }
    }
}

impl FromRequest for AuthSession {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let auth_header = req.headers().get("Authorization");

        if let Some(auth_header) = auth_header {
            if let Ok(auth_str) = auth_header.to_str() {
                if auth_str.starts_with("Bearer ") {
                    let token = &auth_str[7..]; // Remove "Bearer " prefix

                    // Get the config from app data
                    if let Some(config) = req.app_data::<Data<Config>>() {
                        match decode::<SessionClaims>(
                            token,
                            &DecodingKey::from_secret(config.session_secret.as_ref()),
                            &Validation::new(Algorithm::HS256),
                        ) {
                            Ok(token_data) => {
                                return ready(Ok(token_data.claims.into()));
                            }
                            Err(_) => {
                                return ready(Err(AppError::Unauthorized.into()));
                            }
                        }
                    }
                }
            }
        }

        ready(Err(AppError::Unauthorized.into()))
    }
}

// src/utils/jwt.rs

use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::{config::Config, error::AppError};

pub const ROLE_INSTRUCTOR: &str = "instructor";
pub const ROLE_STUDENT: &str = "student";
pub const ROLE_ADMIN: &str = "admin";

/// JWT Claims structure.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Claims {
    /// Subject - Stores the User ID (as string).
    pub sub: String,
    /// User's role: 'instructor', 'student' or 'admin'.
    pub role: String,
    /// Expiration time as Unix timestamp.
    pub exp: usize,
}

impl Claims {
    pub fn user_id(&self) -> Result<i64, AppError> {
        self.sub
            .parse::<i64>()
            .map_err(|_| AppError::AuthError("Invalid token subject".to_string()))
    }

    /// Whether this identity may see answer keys.
    pub fn can_author(&self) -> bool {
        self.role == ROLE_INSTRUCTOR || self.role == ROLE_ADMIN
    }
}

/// Signs a new JWT for the user.
///
/// Tokens are normally issued by the identity service; this exists so that
/// tooling and tests can mint tokens with the shared secret.
pub fn sign_jwt(
    id: i64,
    role: &str,
    secret: &str,
    expiration_seconds: u64,
) -> Result<String, AppError> {
    // Calculate expiration: current time + expiration_seconds
    let expiration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AppError::InternalServerError(e.to_string()))?
        .as_secs() as usize
        + expiration_seconds as usize;

    let claims = Claims {
        sub: id.to_string(),
        role: role.to_owned(),
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalServerError(e.to_string()))
}

/// Verifies and decodes a JWT string.
///
/// Returns the `Claims` if valid, otherwise returns an `AppError`.
pub fn verify_jwt(token: &str, secret: &str) -> Result<Claims, AppError> {
    let token_data = decode(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AppError::AuthError("Invalid token".to_string()))?;

    Ok(token_data.claims)
}

/// Axum Middleware: Authentication.
///
/// Intercepts requests, validates the 'Authorization: Bearer <token>' header.
/// If valid, injects `Claims` into the request extensions for handlers to use.
/// If invalid, returns 401 Unauthorized.
pub async fn auth_middleware(
    State(config): State<Config>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::AuthError("Missing bearer token".to_string()))?;

    let claims = verify_jwt(token, &config.jwt_secret)?;
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

fn require_role(req: &Request<Body>, role: &str) -> Result<(), AppError> {
    let claims = req
        .extensions()
        .get::<Claims>()
        .ok_or_else(|| AppError::AuthError("Not authenticated".to_string()))?;

    if claims.role != role {
        return Err(AppError::Forbidden(format!(
            "This route is only for {}s",
            role
        )));
    }

    Ok(())
}

/// Axum Middleware: Instructor Authorization.
///
/// Must be used AFTER `auth_middleware`.
pub async fn instructor_middleware(req: Request<Body>, next: Next) -> Result<Response, AppError> {
    require_role(&req, ROLE_INSTRUCTOR)?;
    Ok(next.run(req).await)
}

/// Axum Middleware: Student Authorization.
///
/// Must be used AFTER `auth_middleware`.
pub async fn student_middleware(req: Request<Body>, next: Next) -> Result<Response, AppError> {
    require_role(&req, ROLE_STUDENT)?;
    Ok(next.run(req).await)
}

use std::sync::Arc;

use axum::{
    extract::{Extension, State},
    http::HeaderMap,
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use tracing::{debug, info};
use uuid::Uuid;

use shared_models::auth::{Role, TokenResponse, User};
use shared_models::error::AppError;
use shared_models::patient::Patient;
use shared_store::seed::ADMIN_USER_ID;
use shared_store::AppState;
use shared_utils::jwt::{issue_token, validate_token};

use crate::credentials;
use crate::models::{LoginRequest, LoginResponse, RegisterRequest};

fn extract_bearer_token(headers: &HeaderMap) -> Result<String, AppError> {
    let auth_header = headers
        .get("Authorization")
        .ok_or_else(|| AppError::Auth("Missing authorization header".to_string()))?;

    let auth_value = auth_header
        .to_str()
        .map_err(|_| AppError::Auth("Invalid authorization header format".to_string()))?;

    if !auth_value.starts_with("Bearer ") {
        return Err(AppError::Auth("Invalid authorization header format".to_string()));
    }

    Ok(auth_value[7..].to_string())
}

/// Resolve the caller's id: doctors and patients use their directory
/// record, the admin a fixed id with no record.
fn resolve_caller(state: &AppState, credential: &credentials::DemoCredential) -> Result<User, AppError> {
    let id = match credential.role {
        Role::Admin => ADMIN_USER_ID,
        Role::Doctor => state
            .store
            .doctors
            .find(|d| d.email == credential.email)
            .into_iter()
            .next()
            .map(|d| d.id)
            .ok_or_else(|| AppError::Auth("No doctor record for this account".to_string()))?,
        Role::Patient => state
            .store
            .patients
            .find(|p| p.email == credential.email)
            .into_iter()
            .next()
            .map(|p| p.id)
            .ok_or_else(|| AppError::Auth("No patient record for this account".to_string()))?,
    };

    Ok(User {
        id,
        name: credential.name.to_string(),
        email: credential.email.to_string(),
        role: credential.role,
    })
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    debug!("Login attempt for {}", request.email);

    let credential = credentials::verify(&request.email, &request.password)
        .ok_or_else(|| AppError::Auth("Invalid email or password".to_string()))?;

    let user = resolve_caller(&state, credential)?;

    let token = issue_token(&user, &state.config.jwt_secret, state.config.token_ttl_seconds)
        .map_err(AppError::Internal)?;

    info!("User {} logged in as {}", user.email, user.role);
    Ok(Json(LoginResponse { token, user }))
}

/// Demo parity with the original portal: registration creates a patient
/// record and mints a token, but no credential is persisted.
#[axum::debug_handler]
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    debug!("Registration attempt for {}", request.email);

    if request.password.trim().is_empty() {
        return Err(AppError::ValidationError("Password must not be empty".to_string()));
    }

    let taken = !state
        .store
        .patients
        .find(|p| p.email == request.email)
        .is_empty();
    if taken {
        return Err(AppError::Conflict(format!(
            "Patient with email {} already exists",
            request.email
        )));
    }

    let now = Utc::now();
    let patient = state.store.patients.insert(Patient {
        id: Uuid::new_v4(),
        name: request.name,
        email: request.email,
        phone: request.phone,
        date_of_birth: request.date_of_birth,
        created_at: now,
        updated_at: now,
    });

    let user = User {
        id: patient.id,
        name: patient.name.clone(),
        email: patient.email.clone(),
        role: Role::Patient,
    };
    let token = issue_token(&user, &state.config.jwt_secret, state.config.token_ttl_seconds)
        .map_err(AppError::Internal)?;

    info!("Registered new patient {}", patient.id);
    Ok(Json(LoginResponse { token, user }))
}

#[axum::debug_handler]
pub async fn validate(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<TokenResponse>, AppError> {
    debug!("Validating token");

    let token = extract_bearer_token(&headers)?;

    match validate_token(&token, &state.config.jwt_secret) {
        Ok(user) => Ok(Json(TokenResponse {
            valid: true,
            user_id: user.id,
            email: user.email,
            role: user.role,
        })),
        Err(err) => Err(AppError::Auth(err)),
    }
}

#[axum::debug_handler]
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    debug!("Getting profile for user: {}", user.id);

    let record = match user.role {
        Role::Doctor => state.store.doctors.get(user.id).map(|d| json!(d)),
        Role::Patient => state.store.patients.get(user.id).map(|p| json!(p)),
        Role::Admin => None,
    };

    Ok(Json(json!({
        "user": user,
        "record": record
    })))
}

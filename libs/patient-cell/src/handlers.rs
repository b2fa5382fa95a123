use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::auth::{Role, User};
use shared_models::error::AppError;
use shared_store::AppState;

use crate::models::{CreatePatientRequest, PatientError, UpdatePatientRequest};
use crate::services::patient::PatientService;

fn map_error(error: PatientError) -> AppError {
    match error {
        PatientError::NotFound => AppError::NotFound("Patient not found".to_string()),
        PatientError::EmailTaken(_) => AppError::Conflict(error.to_string()),
    }
}

fn require_admin(user: &User) -> Result<(), AppError> {
    if !user.is_admin() {
        return Err(AppError::Forbidden(
            "Only admins can manage the patient directory".to_string(),
        ));
    }
    Ok(())
}

#[axum::debug_handler]
pub async fn create_patient(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Json(request): Json<CreatePatientRequest>,
) -> Result<Json<Value>, AppError> {
    require_admin(&user)?;

    let service = PatientService::new(state);
    let patient = service.create_patient(request).map_err(map_error)?;

    Ok(Json(json!({ "success": true, "patient": patient })))
}

#[axum::debug_handler]
pub async fn list_patients(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    // Doctors see the directory for their appointment views; patients do not.
    if user.role == Role::Patient {
        return Err(AppError::Forbidden(
            "Not authorized to list patients".to_string(),
        ));
    }

    let service = PatientService::new(state);
    Ok(Json(json!({ "patients": service.list_patients() })))
}

#[axum::debug_handler]
pub async fn get_patient(
    State(state): State<Arc<AppState>>,
    Path(patient_id): Path<Uuid>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let is_self = user.role == Role::Patient && user.id == patient_id;
    if user.role == Role::Patient && !is_self {
        return Err(AppError::Forbidden(
            "Not authorized to view this patient".to_string(),
        ));
    }

    let service = PatientService::new(state);
    let patient = service.get_patient(patient_id).map_err(map_error)?;
    Ok(Json(json!(patient)))
}

#[axum::debug_handler]
pub async fn update_patient(
    State(state): State<Arc<AppState>>,
    Path(patient_id): Path<Uuid>,
    Extension(user): Extension<User>,
    Json(request): Json<UpdatePatientRequest>,
) -> Result<Json<Value>, AppError> {
    // Admins edit any record; a patient may edit their own contact details.
    let is_self = user.role == Role::Patient && user.id == patient_id;
    if !is_self && !user.is_admin() {
        return Err(AppError::Forbidden(
            "Not authorized to update this patient".to_string(),
        ));
    }

    let service = PatientService::new(state);
    let patient = service.update_patient(patient_id, request).map_err(map_error)?;

    Ok(Json(json!({ "success": true, "patient": patient })))
}

#[axum::debug_handler]
pub async fn delete_patient(
    State(state): State<Arc<AppState>>,
    Path(patient_id): Path<Uuid>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    require_admin(&user)?;

    let service = PatientService::new(state);
    service.delete_patient(patient_id).map_err(map_error)?;

    Ok(Json(json!({ "success": true })))
}

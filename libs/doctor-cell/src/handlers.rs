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

use crate::models::{
    CreateDoctorRequest, CreateScheduleWindowRequest, DoctorError, UpdateDoctorRequest,
    UpdateScheduleWindowRequest,
};
use crate::services::doctor::DoctorService;
use crate::services::scheduling::ScheduleService;

fn map_error(error: DoctorError) -> AppError {
    match error {
        DoctorError::NotFound => AppError::NotFound("Doctor not found".to_string()),
        DoctorError::WindowNotFound => AppError::NotFound("Schedule window not found".to_string()),
        DoctorError::EmailTaken(_) => AppError::Conflict(error.to_string()),
        DoctorError::DuplicateWindow(_) => AppError::Conflict(error.to_string()),
        DoctorError::InvalidWindow(msg) => AppError::ValidationError(msg),
    }
}

fn require_admin(user: &User) -> Result<(), AppError> {
    if !user.is_admin() {
        return Err(AppError::Forbidden(
            "Only admins can manage the doctor directory".to_string(),
        ));
    }
    Ok(())
}

/// Admin or the doctor whose schedule is being edited.
fn require_schedule_access(user: &User, doctor_id: Uuid) -> Result<(), AppError> {
    let is_self = user.role == Role::Doctor && user.id == doctor_id;
    if !is_self && !user.is_admin() {
        return Err(AppError::Forbidden(
            "Not authorized to manage this doctor's schedule".to_string(),
        ));
    }
    Ok(())
}

#[axum::debug_handler]
pub async fn create_doctor(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Json(request): Json<CreateDoctorRequest>,
) -> Result<Json<Value>, AppError> {
    require_admin(&user)?;

    let service = DoctorService::new(state);
    let doctor = service.create_doctor(request).map_err(map_error)?;

    Ok(Json(json!({ "success": true, "doctor": doctor })))
}

#[axum::debug_handler]
pub async fn list_doctors(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Value>, AppError> {
    let service = DoctorService::new(state);
    Ok(Json(json!({ "doctors": service.list_doctors() })))
}

#[axum::debug_handler]
pub async fn get_doctor(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = DoctorService::new(state);
    let doctor = service.get_doctor(doctor_id).map_err(map_error)?;
    Ok(Json(json!(doctor)))
}

#[axum::debug_handler]
pub async fn update_doctor(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<Uuid>,
    Extension(user): Extension<User>,
    Json(request): Json<UpdateDoctorRequest>,
) -> Result<Json<Value>, AppError> {
    require_admin(&user)?;

    let service = DoctorService::new(state);
    let doctor = service.update_doctor(doctor_id, request).map_err(map_error)?;

    Ok(Json(json!({ "success": true, "doctor": doctor })))
}

#[axum::debug_handler]
pub async fn delete_doctor(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<Uuid>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    require_admin(&user)?;

    let service = DoctorService::new(state);
    service.delete_doctor(doctor_id).map_err(map_error)?;

    Ok(Json(json!({ "success": true })))
}

#[axum::debug_handler]
pub async fn list_schedule(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = ScheduleService::new(state);
    let windows = service.list_windows(doctor_id).map_err(map_error)?;
    Ok(Json(json!({ "schedule": windows })))
}

#[axum::debug_handler]
pub async fn create_schedule_window(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<Uuid>,
    Extension(user): Extension<User>,
    Json(request): Json<CreateScheduleWindowRequest>,
) -> Result<Json<Value>, AppError> {
    require_schedule_access(&user, doctor_id)?;

    let service = ScheduleService::new(state);
    let window = service.create_window(doctor_id, request).map_err(map_error)?;

    Ok(Json(json!({ "success": true, "window": window })))
}

#[axum::debug_handler]
pub async fn update_schedule_window(
    State(state): State<Arc<AppState>>,
    Path(window_id): Path<Uuid>,
    Extension(user): Extension<User>,
    Json(request): Json<UpdateScheduleWindowRequest>,
) -> Result<Json<Value>, AppError> {
    let service = ScheduleService::new(state);
    let existing = service.get_window(window_id).map_err(map_error)?;
    require_schedule_access(&user, existing.doctor_id)?;

    let window = service.update_window(window_id, request).map_err(map_error)?;

    Ok(Json(json!({ "success": true, "window": window })))
}

#[axum::debug_handler]
pub async fn delete_schedule_window(
    State(state): State<Arc<AppState>>,
    Path(window_id): Path<Uuid>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let service = ScheduleService::new(state);
    let existing = service.get_window(window_id).map_err(map_error)?;
    require_schedule_access(&user, existing.doctor_id)?;

    service.delete_window(window_id).map_err(map_error)?;

    Ok(Json(json!({ "success": true })))
}

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::auth::{Role, User};
use shared_models::error::AppError;
use shared_store::AppState;

use crate::models::{
    AppointmentError, AvailabilityQuery, AvailabilityResponse, BookAppointmentRequest,
    TransitionRequest, UpdateNotesRequest,
};
use crate::services::availability::AvailabilityService;
use crate::services::booking::BookingService;
use crate::services::lifecycle::LifecycleService;

fn map_error(error: AppointmentError) -> AppError {
    match error {
        AppointmentError::NotFound => AppError::NotFound("Appointment not found".to_string()),
        AppointmentError::PatientNotFound => AppError::NotFound("Patient not found".to_string()),
        AppointmentError::DoctorNotFound => AppError::NotFound("Doctor not found".to_string()),
        AppointmentError::SlotTaken | AppointmentError::OutsideSchedule => {
            AppError::Conflict(error.to_string())
        }
        AppointmentError::OutOfRange(msg) => AppError::ValidationError(msg),
        AppointmentError::InvalidTransition { .. } => AppError::BadRequest(error.to_string()),
        AppointmentError::Unauthorized(msg) => AppError::Forbidden(msg),
    }
}

#[axum::debug_handler]
pub async fn get_availability(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    if state.store.doctors.get(query.doctor_id).is_none() {
        return Err(AppError::NotFound("Doctor not found".to_string()));
    }

    let service = AvailabilityService::new(state);
    let available_slots = service.available_slots(query.doctor_id, query.date);

    Ok(Json(AvailabilityResponse {
        doctor_id: query.doctor_id,
        date: query.date,
        available_slots,
    }))
}

#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(state);
    let appointment = service.book(&user, request).map_err(map_error)?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment,
        "message": "Appointment booked successfully"
    })))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<Arc<AppState>>,
    Path(appointment_id): Path<Uuid>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(state);
    let appointment = service.get_appointment(appointment_id).map_err(map_error)?;

    // Only the patient, the assigned doctor, or an admin can view.
    let is_patient = user.role == Role::Patient && user.id == appointment.patient_id;
    let is_doctor = user.role == Role::Doctor && user.id == appointment.doctor_id;
    if !is_patient && !is_doctor && !user.is_admin() {
        return Err(AppError::Forbidden(
            "Not authorized to view this appointment".to_string(),
        ));
    }

    Ok(Json(json!(appointment)))
}

#[axum::debug_handler]
pub async fn list_appointments(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    if !user.is_admin() {
        return Err(AppError::Forbidden(
            "Only admins can list all appointments".to_string(),
        ));
    }

    let service = BookingService::new(state);
    Ok(Json(json!({ "appointments": service.list_appointments() })))
}

#[axum::debug_handler]
pub async fn get_patient_appointments(
    State(state): State<Arc<AppState>>,
    Path(patient_id): Path<Uuid>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let is_self = user.role == Role::Patient && user.id == patient_id;
    if !is_self && !user.is_admin() {
        return Err(AppError::Forbidden(
            "Not authorized to view this patient's appointments".to_string(),
        ));
    }

    let service = BookingService::new(state);
    Ok(Json(json!({ "appointments": service.patient_appointments(patient_id) })))
}

#[axum::debug_handler]
pub async fn get_doctor_appointments(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<Uuid>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let is_self = user.role == Role::Doctor && user.id == doctor_id;
    if !is_self && !user.is_admin() {
        return Err(AppError::Forbidden(
            "Not authorized to view this doctor's appointments".to_string(),
        ));
    }

    let service = BookingService::new(state);
    Ok(Json(json!({ "appointments": service.doctor_appointments(doctor_id) })))
}

#[axum::debug_handler]
pub async fn transition_status(
    State(state): State<Arc<AppState>>,
    Path(appointment_id): Path<Uuid>,
    Extension(user): Extension<User>,
    Json(request): Json<TransitionRequest>,
) -> Result<Json<Value>, AppError> {
    let service = LifecycleService::new(state);
    let appointment = service
        .transition(&user, appointment_id, request.status)
        .map_err(map_error)?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment
    })))
}

#[axum::debug_handler]
pub async fn update_notes(
    State(state): State<Arc<AppState>>,
    Path(appointment_id): Path<Uuid>,
    Extension(user): Extension<User>,
    Json(request): Json<UpdateNotesRequest>,
) -> Result<Json<Value>, AppError> {
    let service = LifecycleService::new(state);
    let appointment = service
        .update_notes(&user, appointment_id, request.notes)
        .map_err(map_error)?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment
    })))
}

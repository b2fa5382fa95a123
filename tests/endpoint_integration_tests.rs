//! End-to-end flows over the assembled HTTP surface: login, availability,
//! booking, and the appointment lifecycle, exercised exactly as a portal
//! client would drive them.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    routing::get,
    Router,
};
use chrono::{Duration, NaiveDate, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use appointment_cell::router::appointment_routes;
use auth_cell::router::auth_routes;
use doctor_cell::router::doctor_routes;
use patient_cell::router::patient_routes;
use shared_store::AppState;
use shared_utils::test_utils::seeded_state;

fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(|| async { "Hospital Portal API is running!" }))
        .nest("/auth", auth_routes(state.clone()))
        .nest("/doctors", doctor_routes(state.clone()))
        .nest("/patients", patient_routes(state.clone()))
        .nest("/appointments", appointment_routes(state))
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(
    state: &Arc<AppState>,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app(state.clone()).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn login(state: &Arc<AppState>, email: &str, password: &str) -> (String, Value) {
    let (status, body) = send(
        state,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed for {}: {}", email, body);
    (body["token"].as_str().unwrap().to_string(), body["user"].clone())
}

/// Finds an upcoming date (within the booking horizon) where the doctor
/// has open slots, as a client scanning the calendar would.
async fn first_open_day(
    state: &Arc<AppState>,
    token: &str,
    doctor_id: &str,
) -> (NaiveDate, Vec<String>) {
    let today = Utc::now().date_naive();
    for offset in 0..14 {
        let date = today + Duration::days(offset);
        let uri = format!(
            "/appointments/availability?doctor_id={}&date={}",
            doctor_id, date
        );
        let (status, body) = send(state, "GET", &uri, Some(token), None).await;
        assert_eq!(status, StatusCode::OK);

        let slots: Vec<String> = body["available_slots"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s.as_str().unwrap().to_string())
            .collect();
        if !slots.is_empty() {
            return (date, slots);
        }
    }
    panic!("no open day found for doctor {} in the next two weeks", doctor_id);
}

#[tokio::test]
async fn health_endpoint_is_public() {
    let state = seeded_state();
    let response = app(state)
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn appointment_routes_reject_anonymous_callers() {
    let state = seeded_state();
    let (status, _) = send(&state, "GET", "/appointments", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn full_booking_and_lifecycle_flow() {
    let state = seeded_state();

    let (patient_token, patient) =
        login(&state, "john.doe@example.com", "patient123").await;
    let (doctor_token, doctor) =
        login(&state, "john.smith@hospital.com", "doctor123").await;

    let doctor_id = doctor["id"].as_str().unwrap();
    let patient_id = patient["id"].as_str().unwrap();

    let (date, slots) = first_open_day(&state, &patient_token, doctor_id).await;
    let slot = slots[0].clone();

    // Book the first open slot.
    let (status, body) = send(
        &state,
        "POST",
        "/appointments",
        Some(&patient_token),
        Some(json!({
            "patient_id": patient_id,
            "doctor_id": doctor_id,
            "date": date,
            "time": slot,
            "notes": "Persistent cough"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "booking failed: {}", body);
    assert_eq!(body["success"], true);
    assert_eq!(body["appointment"]["status"], "pending");
    let appointment_id = body["appointment"]["id"].as_str().unwrap().to_string();

    // The slot is no longer offered.
    let (same_day, remaining) = first_open_day(&state, &patient_token, doctor_id).await;
    assert_eq!(same_day, date);
    assert!(!remaining.contains(&slot));

    // A second booking of the same slot conflicts.
    let (status, _) = send(
        &state,
        "POST",
        "/appointments",
        Some(&patient_token),
        Some(json!({
            "patient_id": patient_id,
            "doctor_id": doctor_id,
            "date": date,
            "time": slot,
            "notes": null
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // The assigned doctor confirms, then completes.
    let (status, body) = send(
        &state,
        "POST",
        &format!("/appointments/{}/status", appointment_id),
        Some(&doctor_token),
        Some(json!({ "status": "confirmed" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["appointment"]["status"], "confirmed");

    let (status, body) = send(
        &state,
        "POST",
        &format!("/appointments/{}/status", appointment_id),
        Some(&doctor_token),
        Some(json!({ "status": "completed" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["appointment"]["status"], "completed");

    // Completed is terminal.
    let (status, _) = send(
        &state,
        "POST",
        &format!("/appointments/{}/status", appointment_id),
        Some(&doctor_token),
        Some(json!({ "status": "cancelled" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // The patient sees the appointment in their history.
    let (status, body) = send(
        &state,
        "GET",
        &format!("/appointments/patients/{}", patient_id),
        Some(&patient_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = body["appointments"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["id"].as_str().unwrap())
        .collect();
    assert!(ids.contains(&appointment_id.as_str()));
}

#[tokio::test]
async fn patients_cannot_drive_the_lifecycle_and_doctors_cannot_book() {
    let state = seeded_state();

    let (patient_token, patient) =
        login(&state, "john.doe@example.com", "patient123").await;
    let (doctor_token, doctor) =
        login(&state, "john.smith@hospital.com", "doctor123").await;

    let doctor_id = doctor["id"].as_str().unwrap();
    let patient_id = patient["id"].as_str().unwrap();

    let (date, slots) = first_open_day(&state, &patient_token, doctor_id).await;

    // Doctors do not book.
    let (status, _) = send(
        &state,
        "POST",
        "/appointments",
        Some(&doctor_token),
        Some(json!({
            "patient_id": patient_id,
            "doctor_id": doctor_id,
            "date": date,
            "time": slots[0],
            "notes": null
        })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Book one properly, then have the patient try to confirm it.
    let (status, body) = send(
        &state,
        "POST",
        "/appointments",
        Some(&patient_token),
        Some(json!({
            "patient_id": patient_id,
            "doctor_id": doctor_id,
            "date": date,
            "time": slots[0],
            "notes": null
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let appointment_id = body["appointment"]["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &state,
        "POST",
        &format!("/appointments/{}/status", appointment_id),
        Some(&patient_token),
        Some(json!({ "status": "confirmed" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_manages_the_doctor_directory() {
    let state = seeded_state();
    let (admin_token, _) = login(&state, "admin@hospital.com", "admin123").await;
    let (patient_token, _) = login(&state, "john.doe@example.com", "patient123").await;

    // Patients cannot create doctors.
    let (status, _) = send(
        &state,
        "POST",
        "/doctors",
        Some(&patient_token),
        Some(json!({
            "name": "Dr. New",
            "specialty": "Oncology",
            "email": "dr.new@hospital.com",
            "phone": "123-456-0050"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Admin creates a doctor and attaches a schedule window.
    let (status, body) = send(
        &state,
        "POST",
        "/doctors",
        Some(&admin_token),
        Some(json!({
            "name": "Dr. New",
            "specialty": "Oncology",
            "email": "dr.new@hospital.com",
            "phone": "123-456-0050"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "doctor create failed: {}", body);
    let doctor_id = body["doctor"]["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &state,
        "POST",
        &format!("/doctors/{}/schedule", doctor_id),
        Some(&admin_token),
        Some(json!({
            "weekday": "Monday",
            "start_time": "09:00:00",
            "end_time": "17:00:00"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // A duplicate weekday window is rejected.
    let (status, _) = send(
        &state,
        "POST",
        &format!("/doctors/{}/schedule", doctor_id),
        Some(&admin_token),
        Some(json!({
            "weekday": "Monday",
            "start_time": "10:00:00",
            "end_time": "16:00:00"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn patients_only_see_their_own_appointments() {
    let state = seeded_state();
    let (patient_token, _) = login(&state, "john.doe@example.com", "patient123").await;

    let other = Uuid::new_v4();
    let (status, _) = send(
        &state,
        "GET",
        &format!("/appointments/patients/{}", other),
        Some(&patient_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // And the full appointment book is admin-only.
    let (status, _) = send(&state, "GET", "/appointments", Some(&patient_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

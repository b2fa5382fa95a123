//! Helpers shared by the per-cell test crates and the workspace endpoint
//! tests: a seeded in-memory state, caller constructors for each role, and
//! token minting against the test secret.

use std::sync::Arc;

use shared_config::AppConfig;
use shared_models::auth::{Role, User};
use shared_models::doctor::Doctor;
use shared_models::patient::Patient;
use shared_store::seed::ADMIN_USER_ID;
use shared_store::AppState;

use crate::jwt::issue_token;

pub fn test_config() -> AppConfig {
    AppConfig {
        jwt_secret: "test-secret".to_string(),
        ..AppConfig::default()
    }
}

pub fn seeded_state() -> Arc<AppState> {
    Arc::new(AppState::seeded(test_config()))
}

pub fn empty_state() -> Arc<AppState> {
    Arc::new(AppState::new(test_config()))
}

pub fn admin_caller() -> User {
    User {
        id: ADMIN_USER_ID,
        name: "Admin User".to_string(),
        email: "admin@hospital.com".to_string(),
        role: Role::Admin,
    }
}

pub fn doctor_caller(doctor: &Doctor) -> User {
    User {
        id: doctor.id,
        name: doctor.name.clone(),
        email: doctor.email.clone(),
        role: Role::Doctor,
    }
}

pub fn patient_caller(patient: &Patient) -> User {
    User {
        id: patient.id,
        name: patient.name.clone(),
        email: patient.email.clone(),
        role: Role::Patient,
    }
}

pub fn bearer_token(state: &AppState, user: &User) -> String {
    issue_token(user, &state.config.jwt_secret, state.config.token_ttl_seconds)
        .expect("failed to issue test token")
}

pub fn doctor_by_email(state: &AppState, email: &str) -> Doctor {
    state
        .store
        .doctors
        .find(|d| d.email == email)
        .into_iter()
        .next()
        .unwrap_or_else(|| panic!("seed doctor {} missing", email))
}

pub fn patient_by_email(state: &AppState, email: &str) -> Patient {
    state
        .store
        .patients
        .find(|p| p.email == email)
        .into_iter()
        .next()
        .unwrap_or_else(|| panic!("seed patient {} missing", email))
}

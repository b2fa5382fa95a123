use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use shared_models::schedule::Weekday;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDoctorRequest {
    pub name: String,
    pub specialty: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub available_days: Vec<Weekday>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateDoctorRequest {
    pub name: Option<String>,
    pub specialty: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub available_days: Option<Vec<Weekday>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateScheduleWindowRequest {
    pub weekday: Weekday,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateScheduleWindowRequest {
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DoctorError {
    #[error("Doctor not found")]
    NotFound,

    #[error("Schedule window not found")]
    WindowNotFound,

    #[error("Doctor with email {0} already exists")]
    EmailTaken(String),

    #[error("Doctor already has a schedule window on {0}")]
    DuplicateWindow(Weekday),

    #[error("Invalid schedule window: {0}")]
    InvalidWindow(String),
}

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use shared_models::schedule::ScheduleWindow;
use shared_store::AppState;

use crate::models::{CreateScheduleWindowRequest, DoctorError, UpdateScheduleWindowRequest};

/// Manages a doctor's weekly availability windows. One window per weekday;
/// the window's times bound the booking grid for dates falling on that day.
pub struct ScheduleService {
    state: Arc<AppState>,
}

impl ScheduleService {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    pub fn create_window(
        &self,
        doctor_id: Uuid,
        request: CreateScheduleWindowRequest,
    ) -> Result<ScheduleWindow, DoctorError> {
        debug!(
            "Creating schedule window for doctor {} on {}",
            doctor_id, request.weekday
        );

        if self.state.store.doctors.get(doctor_id).is_none() {
            return Err(DoctorError::NotFound);
        }

        if request.start_time >= request.end_time {
            return Err(DoctorError::InvalidWindow(
                "Start time must be before end time".to_string(),
            ));
        }

        let duplicate = !self
            .state
            .store
            .schedule_windows
            .find(|w| w.doctor_id == doctor_id && w.weekday == request.weekday)
            .is_empty();
        if duplicate {
            return Err(DoctorError::DuplicateWindow(request.weekday));
        }

        let now = Utc::now();
        let window = self.state.store.schedule_windows.insert(ScheduleWindow {
            id: Uuid::new_v4(),
            doctor_id,
            weekday: request.weekday,
            start_time: request.start_time,
            end_time: request.end_time,
            created_at: now,
            updated_at: now,
        });

        info!("Schedule window {} created for doctor {}", window.id, doctor_id);
        Ok(window)
    }

    pub fn list_windows(&self, doctor_id: Uuid) -> Result<Vec<ScheduleWindow>, DoctorError> {
        if self.state.store.doctors.get(doctor_id).is_none() {
            return Err(DoctorError::NotFound);
        }

        let mut windows = self
            .state
            .store
            .schedule_windows
            .find(|w| w.doctor_id == doctor_id);
        windows.sort_by_key(|w| (w.weekday as u8, w.start_time));
        Ok(windows)
    }

    pub fn get_window(&self, window_id: Uuid) -> Result<ScheduleWindow, DoctorError> {
        self.state
            .store
            .schedule_windows
            .get(window_id)
            .ok_or(DoctorError::WindowNotFound)
    }

    /// Adjusts a window's times; the weekday is fixed for the window's
    /// lifetime so the one-window-per-weekday invariant cannot be broken
    /// by an update.
    pub fn update_window(
        &self,
        window_id: Uuid,
        request: UpdateScheduleWindowRequest,
    ) -> Result<ScheduleWindow, DoctorError> {
        let existing = self.get_window(window_id)?;

        let start_time = request.start_time.unwrap_or(existing.start_time);
        let end_time = request.end_time.unwrap_or(existing.end_time);
        if start_time >= end_time {
            return Err(DoctorError::InvalidWindow(
                "Start time must be before end time".to_string(),
            ));
        }

        self.state
            .store
            .schedule_windows
            .update(window_id, |window| {
                window.start_time = start_time;
                window.end_time = end_time;
                window.updated_at = Utc::now();
            })
            .ok_or(DoctorError::WindowNotFound)
    }

    pub fn delete_window(&self, window_id: Uuid) -> Result<(), DoctorError> {
        if !self.state.store.schedule_windows.remove(window_id) {
            return Err(DoctorError::WindowNotFound);
        }
        info!("Schedule window {} deleted", window_id);
        Ok(())
    }
}

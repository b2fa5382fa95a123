use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_models::appointment::{Appointment, AppointmentStatus};
use shared_models::auth::{Role, User};
use shared_store::AppState;

use crate::models::AppointmentError;

/// The only writer of appointment status. Enforces the transition table and
/// the doctor/admin gate; a transition changes nothing but the status.
pub struct LifecycleService {
    state: Arc<AppState>,
}

impl LifecycleService {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// All valid next statuses for a given current status. Completed and
    /// cancelled are terminal.
    pub fn valid_transitions(current: AppointmentStatus) -> &'static [AppointmentStatus] {
        match current {
            AppointmentStatus::Pending => {
                &[AppointmentStatus::Confirmed, AppointmentStatus::Cancelled]
            }
            AppointmentStatus::Confirmed => {
                &[AppointmentStatus::Completed, AppointmentStatus::Cancelled]
            }
            AppointmentStatus::Completed => &[],
            AppointmentStatus::Cancelled => &[],
        }
    }

    pub fn transition(
        &self,
        caller: &User,
        appointment_id: Uuid,
        target: AppointmentStatus,
    ) -> Result<Appointment, AppointmentError> {
        debug!("Transitioning appointment {} to {}", appointment_id, target);

        let store = &self.state.store;

        // The status check-then-write must be atomic relative to bookings
        // and other transitions: a cancel landing between this read and the
        // write below could free the slot for a new booking while a stale
        // confirm re-occupies it.
        let _guard = store.booking_guard();

        let appointment = store
            .appointments
            .get(appointment_id)
            .ok_or(AppointmentError::NotFound)?;

        self.authorize(caller, &appointment)?;

        if !Self::valid_transitions(appointment.status).contains(&target) {
            warn!(
                "Invalid status transition attempted on {}: {} -> {}",
                appointment_id, appointment.status, target
            );
            return Err(AppointmentError::InvalidTransition {
                from: appointment.status,
                to: target,
            });
        }

        let updated = store
            .appointments
            .update(appointment_id, |a| {
                a.status = target;
                a.updated_at = Utc::now();
            })
            .ok_or(AppointmentError::NotFound)?;

        info!(
            "Appointment {} transitioned {} -> {}",
            appointment_id, appointment.status, target
        );
        Ok(updated)
    }

    /// Doctor-facing notes update; independent of the status lifecycle.
    pub fn update_notes(
        &self,
        caller: &User,
        appointment_id: Uuid,
        notes: String,
    ) -> Result<Appointment, AppointmentError> {
        let appointment = self
            .state
            .store
            .appointments
            .get(appointment_id)
            .ok_or(AppointmentError::NotFound)?;

        self.authorize(caller, &appointment)?;

        self.state
            .store
            .appointments
            .update(appointment_id, |a| {
                a.notes = Some(notes);
                a.updated_at = Utc::now();
            })
            .ok_or(AppointmentError::NotFound)
    }

    /// Only the assigned doctor or an admin may move an appointment through
    /// its lifecycle.
    fn authorize(&self, caller: &User, appointment: &Appointment) -> Result<(), AppointmentError> {
        let is_assigned_doctor =
            caller.role == Role::Doctor && caller.id == appointment.doctor_id;
        if !is_assigned_doctor && !caller.is_admin() {
            return Err(AppointmentError::Unauthorized(
                "Only the assigned doctor or an admin can modify this appointment".to_string(),
            ));
        }
        Ok(())
    }
}

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use shared_models::appointment::{Appointment, AppointmentStatus};
use shared_models::auth::{Role, User};
use shared_models::schedule::Weekday;
use shared_store::AppState;
use shared_utils::clock::{Clock, SystemClock};

use crate::models::{AppointmentError, BookAppointmentRequest};
use crate::services::availability::{candidate_slots, resolve_available_slots};

/// The sole appointment-creation path. Validates the caller and the booking
/// policy, then re-checks availability against the current store state and
/// appends the record as one atomic unit under the store's booking lock.
pub struct BookingService {
    state: Arc<AppState>,
    clock: Arc<dyn Clock>,
}

impl BookingService {
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            state,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(state: Arc<AppState>, clock: Arc<dyn Clock>) -> Self {
        Self { state, clock }
    }

    pub fn book(
        &self,
        caller: &User,
        request: BookAppointmentRequest,
    ) -> Result<Appointment, AppointmentError> {
        info!(
            "Booking appointment for patient {} with doctor {} on {} at {}",
            request.patient_id, request.doctor_id, request.date, request.time
        );

        // Only the patient may book, and only for themself.
        if caller.role != Role::Patient {
            return Err(AppointmentError::Unauthorized(
                "Only patients can book appointments".to_string(),
            ));
        }
        if caller.id != request.patient_id {
            return Err(AppointmentError::Unauthorized(
                "Cannot book an appointment for another patient".to_string(),
            ));
        }

        if self.state.store.patients.get(request.patient_id).is_none() {
            return Err(AppointmentError::PatientNotFound);
        }
        if self.state.store.doctors.get(request.doctor_id).is_none() {
            return Err(AppointmentError::DoctorNotFound);
        }

        self.validate_booking_date(&request)?;

        let store = &self.state.store;

        // Atomic check-then-append: availability is recomputed fresh here,
        // never taken from an earlier snapshot, so two bookings contending
        // for one slot cannot both pass the check.
        let _guard = store.booking_guard();

        let windows = store.schedule_windows.list();
        let appointments = store.appointments.list();
        let candidates = candidate_slots();
        let open = resolve_available_slots(
            request.doctor_id,
            request.date,
            &candidates,
            &windows,
            &appointments,
        );

        if !open.contains(&request.time) {
            let weekday = Weekday::from_date(request.date);
            let in_window = windows
                .iter()
                .find(|w| w.doctor_id == request.doctor_id && w.weekday == weekday)
                .map(|w| w.covers(request.time))
                .unwrap_or(false);

            if in_window && candidates.contains(&request.time) {
                warn!(
                    "Slot {} on {} already taken for doctor {}",
                    request.time, request.date, request.doctor_id
                );
                return Err(AppointmentError::SlotTaken);
            }
            return Err(AppointmentError::OutsideSchedule);
        }

        let now = Utc::now();
        let appointment = store.appointments.insert(Appointment {
            id: Uuid::new_v4(),
            patient_id: request.patient_id,
            doctor_id: request.doctor_id,
            date: request.date,
            time: request.time,
            status: AppointmentStatus::Pending,
            notes: request.notes,
            created_at: now,
            updated_at: now,
        });

        info!("Appointment {} booked successfully", appointment.id);
        Ok(appointment)
    }

    /// Policy: bookings land today or later, and no further out than the
    /// configured horizon.
    fn validate_booking_date(&self, request: &BookAppointmentRequest) -> Result<(), AppointmentError> {
        let today = self.clock.today();
        if request.date < today {
            return Err(AppointmentError::OutOfRange(
                "Appointment date must be today or later".to_string(),
            ));
        }

        let horizon = today + Duration::days(self.state.config.booking_horizon_days);
        if request.date > horizon {
            return Err(AppointmentError::OutOfRange(format!(
                "Appointments can be booked at most {} days ahead",
                self.state.config.booking_horizon_days
            )));
        }

        Ok(())
    }

    pub fn get_appointment(&self, appointment_id: Uuid) -> Result<Appointment, AppointmentError> {
        debug!("Fetching appointment: {}", appointment_id);
        self.state
            .store
            .appointments
            .get(appointment_id)
            .ok_or(AppointmentError::NotFound)
    }

    pub fn list_appointments(&self) -> Vec<Appointment> {
        let mut appointments = self.state.store.appointments.list();
        appointments.sort_by_key(|a| (a.date, a.time));
        appointments
    }

    pub fn patient_appointments(&self, patient_id: Uuid) -> Vec<Appointment> {
        let mut appointments = self
            .state
            .store
            .appointments
            .find(|a| a.patient_id == patient_id);
        appointments.sort_by_key(|a| (a.date, a.time));
        appointments
    }

    pub fn doctor_appointments(&self, doctor_id: Uuid) -> Vec<Appointment> {
        let mut appointments = self
            .state
            .store
            .appointments
            .find(|a| a.doctor_id == doctor_id);
        appointments.sort_by_key(|a| (a.date, a.time));
        appointments
    }
}

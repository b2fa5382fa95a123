use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use shared_models::doctor::Doctor;
use shared_store::AppState;

use crate::models::{CreateDoctorRequest, DoctorError, UpdateDoctorRequest};

pub struct DoctorService {
    state: Arc<AppState>,
}

impl DoctorService {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    pub fn create_doctor(&self, request: CreateDoctorRequest) -> Result<Doctor, DoctorError> {
        debug!("Creating doctor profile for: {}", request.email);

        let taken = !self
            .state
            .store
            .doctors
            .find(|d| d.email == request.email)
            .is_empty();
        if taken {
            return Err(DoctorError::EmailTaken(request.email));
        }

        let now = Utc::now();
        let doctor = self.state.store.doctors.insert(Doctor {
            id: Uuid::new_v4(),
            name: request.name,
            specialty: request.specialty,
            email: request.email,
            phone: request.phone,
            available_days: request.available_days,
            created_at: now,
            updated_at: now,
        });

        info!("Doctor {} created", doctor.id);
        Ok(doctor)
    }

    pub fn get_doctor(&self, doctor_id: Uuid) -> Result<Doctor, DoctorError> {
        self.state
            .store
            .doctors
            .get(doctor_id)
            .ok_or(DoctorError::NotFound)
    }

    pub fn list_doctors(&self) -> Vec<Doctor> {
        let mut doctors = self.state.store.doctors.list();
        doctors.sort_by(|a, b| a.name.cmp(&b.name));
        doctors
    }

    pub fn update_doctor(
        &self,
        doctor_id: Uuid,
        request: UpdateDoctorRequest,
    ) -> Result<Doctor, DoctorError> {
        debug!("Updating doctor: {}", doctor_id);

        if let Some(ref email) = request.email {
            let taken = !self
                .state
                .store
                .doctors
                .find(|d| d.email == *email && d.id != doctor_id)
                .is_empty();
            if taken {
                return Err(DoctorError::EmailTaken(email.clone()));
            }
        }

        self.state
            .store
            .doctors
            .update(doctor_id, |doctor| {
                if let Some(name) = request.name {
                    doctor.name = name;
                }
                if let Some(specialty) = request.specialty {
                    doctor.specialty = specialty;
                }
                if let Some(email) = request.email {
                    doctor.email = email;
                }
                if let Some(phone) = request.phone {
                    doctor.phone = phone;
                }
                if let Some(available_days) = request.available_days {
                    doctor.available_days = available_days;
                }
                doctor.updated_at = Utc::now();
            })
            .ok_or(DoctorError::NotFound)
    }

    /// Removes the doctor and their schedule windows. Appointment history
    /// is left in place.
    pub fn delete_doctor(&self, doctor_id: Uuid) -> Result<(), DoctorError> {
        if !self.state.store.doctors.remove(doctor_id) {
            return Err(DoctorError::NotFound);
        }

        for window in self
            .state
            .store
            .schedule_windows
            .find(|w| w.doctor_id == doctor_id)
        {
            self.state.store.schedule_windows.remove(window.id);
        }

        info!("Doctor {} deleted", doctor_id);
        Ok(())
    }
}

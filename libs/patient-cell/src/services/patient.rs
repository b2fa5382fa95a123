use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use shared_models::patient::Patient;
use shared_store::AppState;

use crate::models::{CreatePatientRequest, PatientError, UpdatePatientRequest};

pub struct PatientService {
    state: Arc<AppState>,
}

impl PatientService {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    pub fn create_patient(&self, request: CreatePatientRequest) -> Result<Patient, PatientError> {
        debug!("Creating patient profile for: {}", request.email);

        let taken = !self
            .state
            .store
            .patients
            .find(|p| p.email == request.email)
            .is_empty();
        if taken {
            return Err(PatientError::EmailTaken(request.email));
        }

        let now = Utc::now();
        let patient = self.state.store.patients.insert(Patient {
            id: Uuid::new_v4(),
            name: request.name,
            email: request.email,
            phone: request.phone,
            date_of_birth: request.date_of_birth,
            created_at: now,
            updated_at: now,
        });

        info!("Patient {} created", patient.id);
        Ok(patient)
    }

    pub fn get_patient(&self, patient_id: Uuid) -> Result<Patient, PatientError> {
        self.state
            .store
            .patients
            .get(patient_id)
            .ok_or(PatientError::NotFound)
    }

    pub fn list_patients(&self) -> Vec<Patient> {
        let mut patients = self.state.store.patients.list();
        patients.sort_by(|a, b| a.name.cmp(&b.name));
        patients
    }

    pub fn update_patient(
        &self,
        patient_id: Uuid,
        request: UpdatePatientRequest,
    ) -> Result<Patient, PatientError> {
        debug!("Updating patient: {}", patient_id);

        if let Some(ref email) = request.email {
            let taken = !self
                .state
                .store
                .patients
                .find(|p| p.email == *email && p.id != patient_id)
                .is_empty();
            if taken {
                return Err(PatientError::EmailTaken(email.clone()));
            }
        }

        self.state
            .store
            .patients
            .update(patient_id, |patient| {
                if let Some(name) = request.name {
                    patient.name = name;
                }
                if let Some(email) = request.email {
                    patient.email = email;
                }
                if let Some(phone) = request.phone {
                    patient.phone = phone;
                }
                if let Some(date_of_birth) = request.date_of_birth {
                    patient.date_of_birth = date_of_birth;
                }
                patient.updated_at = Utc::now();
            })
            .ok_or(PatientError::NotFound)
    }

    pub fn delete_patient(&self, patient_id: Uuid) -> Result<(), PatientError> {
        if !self.state.store.patients.remove(patient_id) {
            return Err(PatientError::NotFound);
        }
        info!("Patient {} deleted", patient_id);
        Ok(())
    }
}

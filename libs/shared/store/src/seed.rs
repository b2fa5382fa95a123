use chrono::{NaiveDate, NaiveTime, Utc};
use tracing::info;
use uuid::Uuid;

use shared_models::appointment::{Appointment, AppointmentStatus};
use shared_models::doctor::Doctor;
use shared_models::patient::Patient;
use shared_models::schedule::{ScheduleWindow, Weekday};

use crate::memory::MemoryStore;

/// The admin caller has no directory record; its id is fixed so tokens can
/// be verified against it.
pub const ADMIN_USER_ID: Uuid = Uuid::from_u128(0x0000_0000_0000_0000_0000_0000_0000_0001);

/// Loads the demo dataset: five doctors with weekly schedules, five
/// patients, and an appointment book in assorted lifecycle states.
pub fn load_demo_data(store: &MemoryStore) {
    let now = Utc::now();

    let doctors: Vec<Doctor> = [
        (
            "Dr. John Smith",
            "Cardiology",
            "john.smith@hospital.com",
            "123-456-7890",
            vec![Weekday::Monday, Weekday::Wednesday, Weekday::Friday],
        ),
        (
            "Dr. Sarah Johnson",
            "Neurology",
            "sarah.johnson@hospital.com",
            "123-456-7891",
            vec![Weekday::Tuesday, Weekday::Thursday],
        ),
        (
            "Dr. Michael Brown",
            "Orthopedics",
            "michael.brown@hospital.com",
            "123-456-7892",
            vec![Weekday::Monday, Weekday::Tuesday, Weekday::Friday],
        ),
        (
            "Dr. Emily Davis",
            "Pediatrics",
            "emily.davis@hospital.com",
            "123-456-7893",
            vec![Weekday::Wednesday, Weekday::Thursday, Weekday::Friday],
        ),
        (
            "Dr. Robert Wilson",
            "Dermatology",
            "robert.wilson@hospital.com",
            "123-456-7894",
            vec![Weekday::Monday, Weekday::Thursday],
        ),
    ]
    .into_iter()
    .map(|(name, specialty, email, phone, available_days)| {
        store.doctors.insert(Doctor {
            id: Uuid::new_v4(),
            name: name.to_string(),
            specialty: specialty.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            available_days,
            created_at: now,
            updated_at: now,
        })
    })
    .collect();

    let patients: Vec<Patient> = [
        ("John Doe", "john.doe@example.com", "123-456-7895", (1985, 5, 15)),
        ("Jane Smith", "jane.smith@example.com", "123-456-7896", (1990, 10, 20)),
        ("Michael Johnson", "michael.johnson@example.com", "123-456-7897", (1978, 3, 25)),
        ("Emily Brown", "emily.brown@example.com", "123-456-7898", (1995, 12, 10)),
        ("David Wilson", "david.wilson@example.com", "123-456-7899", (1982, 7, 30)),
    ]
    .into_iter()
    .map(|(name, email, phone, (y, m, d))| {
        store.patients.insert(Patient {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            date_of_birth: date(y, m, d),
            created_at: now,
            updated_at: now,
        })
    })
    .collect();

    // Weekly windows keyed by doctor index in the list above.
    let windows: [(usize, Weekday, &str, &str); 13] = [
        (0, Weekday::Monday, "09:00", "17:00"),
        (0, Weekday::Wednesday, "09:00", "17:00"),
        (0, Weekday::Friday, "09:00", "17:00"),
        (1, Weekday::Tuesday, "08:00", "16:00"),
        (1, Weekday::Thursday, "08:00", "16:00"),
        (2, Weekday::Monday, "10:00", "18:00"),
        (2, Weekday::Tuesday, "10:00", "18:00"),
        (2, Weekday::Friday, "10:00", "18:00"),
        (3, Weekday::Wednesday, "09:00", "17:00"),
        (3, Weekday::Thursday, "09:00", "17:00"),
        (3, Weekday::Friday, "09:00", "17:00"),
        (4, Weekday::Monday, "08:00", "16:00"),
        (4, Weekday::Thursday, "08:00", "16:00"),
    ];
    for (doctor_index, weekday, start, end) in windows {
        store.schedule_windows.insert(ScheduleWindow {
            id: Uuid::new_v4(),
            doctor_id: doctors[doctor_index].id,
            weekday,
            start_time: time(start),
            end_time: time(end),
            created_at: now,
            updated_at: now,
        });
    }

    use AppointmentStatus::{Cancelled, Completed, Confirmed, Pending};
    let appointments: [(usize, usize, (i32, u32, u32), &str, AppointmentStatus, &str); 10] = [
        (0, 0, (2025, 6, 15), "09:00", Confirmed, "Regular checkup"),
        (1, 2, (2025, 6, 16), "10:30", Pending, "Follow-up appointment"),
        (2, 1, (2025, 6, 17), "14:00", Completed, "Prescription renewal"),
        (3, 4, (2025, 6, 18), "11:15", Cancelled, "Skin examination"),
        (4, 3, (2025, 6, 19), "15:45", Confirmed, "Annual checkup"),
        (0, 1, (2025, 6, 20), "13:30", Pending, "Consultation"),
        (1, 0, (2025, 6, 21), "10:00", Confirmed, "Blood test results"),
        (2, 4, (2025, 6, 22), "16:15", Pending, "New patient visit"),
        (3, 2, (2025, 6, 23), "09:45", Confirmed, "X-ray review"),
        (4, 3, (2025, 6, 24), "14:30", Pending, "Vaccination"),
    ];
    for (patient_index, doctor_index, (y, m, d), slot, status, notes) in appointments {
        store.appointments.insert(Appointment {
            id: Uuid::new_v4(),
            patient_id: patients[patient_index].id,
            doctor_id: doctors[doctor_index].id,
            date: date(y, m, d),
            time: time(slot),
            status,
            notes: Some(notes.to_string()),
            created_at: now,
            updated_at: now,
        });
    }

    info!(
        "Seeded demo data: {} doctors, {} patients, {} schedule windows, {} appointments",
        store.doctors.len(),
        store.patients.len(),
        store.schedule_windows.len(),
        store.appointments.len()
    );
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap_or_else(|| panic!("invalid seed date {}-{}-{}", year, month, day))
}

fn time(value: &str) -> NaiveTime {
    NaiveTime::parse_from_str(value, "%H:%M")
        .unwrap_or_else(|_| panic!("invalid seed time {}", value))
}

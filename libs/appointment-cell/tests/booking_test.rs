use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::{NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

use appointment_cell::models::{AppointmentError, BookAppointmentRequest};
use appointment_cell::BookingService;
use shared_models::appointment::AppointmentStatus;
use shared_models::auth::{Role, User};
use shared_models::doctor::Doctor;
use shared_models::patient::Patient;
use shared_models::schedule::{ScheduleWindow, Weekday};
use shared_store::AppState;
use shared_utils::clock::FixedClock;
use shared_utils::test_utils::{empty_state, patient_caller};

fn time(value: &str) -> NaiveTime {
    NaiveTime::parse_from_str(value, "%H:%M").unwrap()
}

// 2025-06-16 is a Monday.
fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 16).unwrap()
}

struct Fixture {
    state: Arc<AppState>,
    doctor: Doctor,
    patient: Patient,
}

/// One doctor with a Monday morning window and one patient, clock pinned
/// to the Monday itself.
fn fixture() -> (Fixture, BookingService) {
    let state = empty_state();
    let now = Utc::now();

    let doctor = state.store.doctors.insert(Doctor {
        id: Uuid::new_v4(),
        name: "Dr. Grace Hopper".to_string(),
        specialty: "Neurology".to_string(),
        email: "grace.hopper@hospital.com".to_string(),
        phone: "123-456-0002".to_string(),
        available_days: vec![Weekday::Monday],
        created_at: now,
        updated_at: now,
    });
    let patient = state.store.patients.insert(Patient {
        id: Uuid::new_v4(),
        name: "Alan Turing".to_string(),
        email: "alan.turing@example.com".to_string(),
        phone: "123-456-0003".to_string(),
        date_of_birth: NaiveDate::from_ymd_opt(1985, 6, 23).unwrap(),
        created_at: now,
        updated_at: now,
    });
    state.store.schedule_windows.insert(ScheduleWindow {
        id: Uuid::new_v4(),
        doctor_id: doctor.id,
        weekday: Weekday::Monday,
        start_time: time("09:00"),
        end_time: time("12:00"),
        created_at: now,
        updated_at: now,
    });

    let service = BookingService::with_clock(state.clone(), Arc::new(FixedClock(monday())));
    (
        Fixture {
            state,
            doctor,
            patient,
        },
        service,
    )
}

fn request(fixture: &Fixture, date: NaiveDate, slot: &str) -> BookAppointmentRequest {
    BookAppointmentRequest {
        patient_id: fixture.patient.id,
        doctor_id: fixture.doctor.id,
        date,
        time: time(slot),
        notes: Some("First visit".to_string()),
    }
}

#[test]
fn booking_an_open_slot_creates_a_pending_appointment() {
    let (fixture, service) = fixture();
    let caller = patient_caller(&fixture.patient);

    let appointment = service
        .book(&caller, request(&fixture, monday(), "09:30"))
        .unwrap();

    assert_eq!(appointment.status, AppointmentStatus::Pending);
    assert_eq!(appointment.time, time("09:30"));
    assert_eq!(appointment.notes.as_deref(), Some("First visit"));
    assert!(fixture.state.store.appointments.get(appointment.id).is_some());
}

#[test]
fn booked_slot_disappears_from_availability() {
    let (fixture, service) = fixture();
    let caller = patient_caller(&fixture.patient);

    service
        .book(&caller, request(&fixture, monday(), "10:00"))
        .unwrap();

    let err = service
        .book(&caller, request(&fixture, monday(), "10:00"))
        .unwrap_err();
    assert_eq!(err, AppointmentError::SlotTaken);
}

#[test]
fn slot_outside_the_window_is_rejected() {
    let (fixture, service) = fixture();
    let caller = patient_caller(&fixture.patient);

    // 13:00 is on the grid but past the 09:00-12:00 window.
    let err = service
        .book(&caller, request(&fixture, monday(), "13:00"))
        .unwrap_err();
    assert_eq!(err, AppointmentError::OutsideSchedule);
}

#[test]
fn off_grid_time_is_rejected_even_inside_the_window() {
    let (fixture, service) = fixture();
    let caller = patient_caller(&fixture.patient);

    let err = service
        .book(&caller, request(&fixture, monday(), "09:15"))
        .unwrap_err();
    assert_eq!(err, AppointmentError::OutsideSchedule);
}

#[test]
fn day_without_a_window_is_rejected() {
    let (fixture, service) = fixture();
    let caller = patient_caller(&fixture.patient);

    // The next day is a Tuesday with no window.
    let tuesday = NaiveDate::from_ymd_opt(2025, 6, 17).unwrap();
    let err = service
        .book(&caller, request(&fixture, tuesday, "09:30"))
        .unwrap_err();
    assert_eq!(err, AppointmentError::OutsideSchedule);
}

#[test]
fn past_dates_are_out_of_range() {
    let (fixture, service) = fixture();
    let caller = patient_caller(&fixture.patient);

    let yesterday = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
    let err = service
        .book(&caller, request(&fixture, yesterday, "09:30"))
        .unwrap_err();
    assert_matches!(err, AppointmentError::OutOfRange(_));
}

#[test]
fn dates_beyond_the_horizon_are_out_of_range() {
    let (fixture, service) = fixture();
    let caller = patient_caller(&fixture.patient);

    // 91 days out with the default 90-day horizon, still a Monday.
    let far = NaiveDate::from_ymd_opt(2025, 9, 22).unwrap();
    let err = service
        .book(&caller, request(&fixture, far, "09:30"))
        .unwrap_err();
    assert_matches!(err, AppointmentError::OutOfRange(_));
}

#[test]
fn horizon_boundary_date_is_accepted() {
    let (fixture, service) = fixture();
    let caller = patient_caller(&fixture.patient);

    // Exactly 84 days ahead, the last Monday inside the 90-day horizon.
    let boundary = NaiveDate::from_ymd_opt(2025, 9, 8).unwrap();
    let appointment = service
        .book(&caller, request(&fixture, boundary, "09:30"))
        .unwrap();
    assert_eq!(appointment.date, boundary);
}

#[test]
fn only_patients_can_book() {
    let (fixture, service) = fixture();
    let doctor_caller = User {
        id: fixture.doctor.id,
        name: fixture.doctor.name.clone(),
        email: fixture.doctor.email.clone(),
        role: Role::Doctor,
    };

    let err = service
        .book(&doctor_caller, request(&fixture, monday(), "09:30"))
        .unwrap_err();
    assert_matches!(err, AppointmentError::Unauthorized(_));
}

#[test]
fn patients_cannot_book_for_someone_else() {
    let (fixture, service) = fixture();
    let mut caller = patient_caller(&fixture.patient);
    caller.id = Uuid::new_v4();

    let err = service
        .book(&caller, request(&fixture, monday(), "09:30"))
        .unwrap_err();
    assert_matches!(err, AppointmentError::Unauthorized(_));
}

#[test]
fn unknown_doctor_is_not_found() {
    let (fixture, service) = fixture();
    let caller = patient_caller(&fixture.patient);

    let mut req = request(&fixture, monday(), "09:30");
    req.doctor_id = Uuid::new_v4();
    let err = service.book(&caller, req).unwrap_err();
    assert_eq!(err, AppointmentError::DoctorNotFound);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_bookings_for_one_slot_admit_exactly_one() {
    let (fixture, _) = fixture();
    let caller = patient_caller(&fixture.patient);

    let mut handles = Vec::new();
    for _ in 0..8 {
        let state = fixture.state.clone();
        let caller = caller.clone();
        let req = request(&fixture, monday(), "11:00");
        handles.push(tokio::spawn(async move {
            let service = BookingService::with_clock(state, Arc::new(FixedClock(monday())));
            service.book(&caller, req)
        }));
    }

    let results: Vec<_> = futures::future::join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.expect("booking task panicked"))
        .collect();

    let successes = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1);
    for result in results.iter().filter(|r| r.is_err()) {
        assert_eq!(result.as_ref().unwrap_err(), &AppointmentError::SlotTaken);
    }
    assert_eq!(fixture.state.store.appointments.len(), 1);
}

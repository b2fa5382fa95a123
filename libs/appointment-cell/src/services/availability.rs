use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use tracing::debug;
use uuid::Uuid;

use shared_models::appointment::Appointment;
use shared_models::schedule::{ScheduleWindow, Weekday};
use shared_store::AppState;

/// The fixed booking grid: 30-minute slot starts across clinic hours, with
/// the lunch hour left out. 17:00 is the last bookable start of the day.
pub fn candidate_slots() -> Vec<NaiveTime> {
    let mut slots = Vec::new();
    for hour in 9..=17 {
        if hour == 12 {
            continue;
        }
        for minute in [0, 30] {
            if hour == 17 && minute == 30 {
                break;
            }
            if let Some(slot) = NaiveTime::from_hms_opt(hour, minute, 0) {
                slots.push(slot);
            }
        }
    }
    slots
}

/// Compute the bookable slots for a doctor on a calendar date.
///
/// The doctor's window for the date's weekday bounds the candidate grid
/// (half-open: a slot exactly at the window's end is not bookable), then
/// slots held by pending or confirmed appointments are removed. No window
/// on that weekday is a valid empty-availability outcome, not an error.
/// Pure over its inputs; ascending order is preserved.
pub fn resolve_available_slots(
    doctor_id: Uuid,
    date: NaiveDate,
    candidates: &[NaiveTime],
    windows: &[ScheduleWindow],
    appointments: &[Appointment],
) -> Vec<NaiveTime> {
    let weekday = Weekday::from_date(date);

    let Some(window) = windows
        .iter()
        .find(|w| w.doctor_id == doctor_id && w.weekday == weekday)
    else {
        return Vec::new();
    };

    let booked: Vec<NaiveTime> = appointments
        .iter()
        .filter(|a| a.doctor_id == doctor_id && a.date == date && a.status.blocks_slot())
        .map(|a| a.time)
        .collect();

    candidates
        .iter()
        .copied()
        .filter(|slot| window.covers(*slot))
        .filter(|slot| !booked.contains(slot))
        .collect()
}

/// Store-backed wrapper around [`resolve_available_slots`] for the HTTP
/// surface.
pub struct AvailabilityService {
    state: Arc<AppState>,
}

impl AvailabilityService {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    pub fn available_slots(&self, doctor_id: Uuid, date: NaiveDate) -> Vec<NaiveTime> {
        let windows = self.state.store.schedule_windows.list();
        let appointments = self.state.store.appointments.list();

        let slots =
            resolve_available_slots(doctor_id, date, &candidate_slots(), &windows, &appointments);
        debug!(
            "Resolved {} available slots for doctor {} on {}",
            slots.len(),
            doctor_id,
            date
        );
        slots
    }
}

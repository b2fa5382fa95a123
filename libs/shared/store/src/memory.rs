use std::sync::{Mutex, MutexGuard, PoisonError, RwLock};

use uuid::Uuid;

use shared_models::appointment::Appointment;
use shared_models::doctor::Doctor;
use shared_models::patient::Patient;
use shared_models::schedule::ScheduleWindow;

pub trait HasId {
    fn id(&self) -> Uuid;
}

impl HasId for Doctor {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl HasId for Patient {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl HasId for ScheduleWindow {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl HasId for Appointment {
    fn id(&self) -> Uuid {
        self.id
    }
}

/// A single entity collection: `list`, `get`, `insert`, `update`, `remove`
/// over an in-memory vector. Each operation takes the collection lock for
/// its full duration, so individual writes are atomic; multi-step
/// check-then-write sequences (booking) serialize through
/// [`MemoryStore::booking_guard`] instead.
#[derive(Debug)]
pub struct Collection<T> {
    items: RwLock<Vec<T>>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            items: RwLock::new(Vec::new()),
        }
    }
}

impl<T: Clone + HasId> Collection<T> {
    pub fn new() -> Self {
        Self {
            items: RwLock::new(Vec::new()),
        }
    }

    pub fn list(&self) -> Vec<T> {
        self.read().clone()
    }

    pub fn get(&self, id: Uuid) -> Option<T> {
        self.read().iter().find(|item| item.id() == id).cloned()
    }

    pub fn find<P>(&self, predicate: P) -> Vec<T>
    where
        P: Fn(&T) -> bool,
    {
        self.read()
            .iter()
            .filter(|item| predicate(item))
            .cloned()
            .collect()
    }

    pub fn insert(&self, item: T) -> T {
        let mut items = self.write();
        items.push(item.clone());
        item
    }

    /// Apply `mutate` to the record with the given id, returning the updated
    /// record, or `None` if no such record exists.
    pub fn update<F>(&self, id: Uuid, mutate: F) -> Option<T>
    where
        F: FnOnce(&mut T),
    {
        let mut items = self.write();
        let item = items.iter_mut().find(|item| item.id() == id)?;
        mutate(item);
        Some(item.clone())
    }

    pub fn remove(&self, id: Uuid) -> bool {
        let mut items = self.write();
        let before = items.len();
        items.retain(|item| item.id() != id);
        items.len() < before
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Vec<T>> {
        self.items.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Vec<T>> {
        self.items.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// The process-wide dataset: doctor and patient directories, weekly
/// schedule windows, and the appointment book. Everything lives in memory
/// and is lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub doctors: Collection<Doctor>,
    pub patients: Collection<Patient>,
    pub schedule_windows: Collection<ScheduleWindow>,
    pub appointments: Collection<Appointment>,
    booking_lock: Mutex<()>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            doctors: Collection::new(),
            patients: Collection::new(),
            schedule_windows: Collection::new(),
            appointments: Collection::new(),
            booking_lock: Mutex::new(()),
        }
    }

    /// Serializes multi-step appointment writes: booking's check-then-append
    /// and the lifecycle's check-then-transition both run under this guard.
    /// Two concurrent bookings for the same (doctor, date, time) cannot both
    /// observe the slot as free, and a status write cannot land on a record
    /// whose status changed after it was validated.
    pub fn booking_guard(&self) -> MutexGuard<'_, ()> {
        self.booking_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

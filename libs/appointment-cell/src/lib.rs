pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::*;
pub use services::availability::{candidate_slots, resolve_available_slots, AvailabilityService};
pub use services::booking::BookingService;
pub use services::lifecycle::LifecycleService;

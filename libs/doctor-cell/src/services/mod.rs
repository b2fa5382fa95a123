pub mod doctor;
pub mod scheduling;

pub mod appointment;
pub mod booking_draft;

pub use appointment::Appointment;
pub use booking_draft::{BookingDraft, BookingFields, BookingStep};

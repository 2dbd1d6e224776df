use serde::{Serialize, Deserialize};

/// A calendar event as shown in the "my appointments" listing:
/// studio-local `YYYY-MM-DD HH:mm` start plus the event summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub datetime: String,
    pub summary: String,
}

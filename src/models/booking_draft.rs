use serde::{Serialize, Deserialize};
use chrono::NaiveDateTime;

/// Which input the guided booking dialogue is currently waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingStep {
    AwaitingName,
    AwaitingDatetime,
    AwaitingSessionType,
    AwaitingPhone,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingFields {
    pub name: Option<String>,
    pub datetime: Option<NaiveDateTime>,
    pub session_type: Option<String>,
    pub phone: Option<String>,
}

/// One in-progress booking per sender. A draft exists exactly while the
/// sender is mid-dialogue; completion or cancellation removes it from the
/// store, so there is no stored terminal state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingDraft {
    pub step: BookingStep,
    pub fields: BookingFields,
}

impl BookingDraft {
    pub fn new() -> Self {
        Self {
            step: BookingStep::AwaitingName,
            fields: BookingFields::default(),
        }
    }
}

impl Default for BookingDraft {
    fn default() -> Self {
        Self::new()
    }
}

use serde::{Deserialize, Serialize};

// Wire types for the Google Calendar v3 events API.

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EventDateTime {
    #[serde(rename = "dateTime", skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    #[serde(rename = "timeZone", skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EventResource {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<EventDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end: Option<EventDateTime>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct EventsListResponse {
    #[serde(default)]
    pub items: Vec<EventResource>,
}

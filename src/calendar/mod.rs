pub mod config;

use std::env;

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};
use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};

use crate::business_hours::{business_offset, format_local_datetime, local_now};
use crate::calendar::config::{EventDateTime, EventResource, EventsListResponse};
use crate::models::Appointment;

const RETRIES: u32 = 1;
const API_TOKEN_ENV: &str = "GOOGLE_API_TOKEN";
const CALENDAR_ID_ENV: &str = "GOOGLE_CALENDAR_ID";
const EVENTS_BASE: &str = "https://www.googleapis.com/calendar/v3/calendars";
const TIME_ZONE: &str = "America/El_Salvador";
const NAME_PLACEHOLDER: &str = "WhatsApp customer";

const BOOKING_MINUTES: i64 = 60;
const TEST_EVENT_MINUTES: i64 = 15;

/// Appointment operations against the studio calendar.
///
/// The calendar service exposes no stable client-visible id for "my
/// appointment", so `cancel` and `list_upcoming` locate events by testing
/// whether the caller's phone digits (full number or last-4 suffix) appear
/// in the event description or summary.
#[async_trait]
pub trait CalendarApi: Send + Sync {
    /// Books a one-hour appointment starting at `start`, studio local time.
    async fn create(
        &self,
        start: NaiveDateTime,
        session_type: &str,
        phone: &str,
        name: Option<&str>,
    ) -> Result<()>;

    /// Deletes the first event on `start`'s calendar day whose own start
    /// equals `start` exactly and whose text carries the caller's digits.
    /// `Ok(false)` means nothing matched.
    async fn cancel(&self, start: NaiveDateTime, phone: &str) -> Result<bool>;

    /// Events in the next 30 days carrying the caller's digits, in the
    /// service's chronological order.
    async fn list_upcoming(&self, phone: &str) -> Result<Vec<Appointment>>;

    /// Inserts a short placeholder event one hour from now, used to verify
    /// connectivity. Same embedding and failure semantics as `create`.
    async fn create_test_event(&self, name: Option<&str>, phone: Option<&str>) -> Result<()>;
}

/// Google Calendar v3 REST client. The credential and target calendar are
/// provisioned externally; if either is missing every operation fails
/// before touching the network.
pub struct GoogleCalendar {
    api_token: Option<String>,
    calendar_id: Option<String>,
}

impl GoogleCalendar {
    pub fn from_env() -> Self {
        Self {
            api_token: env::var(API_TOKEN_ENV).ok().filter(|v| !v.is_empty()),
            calendar_id: env::var(CALENDAR_ID_ENV).ok().filter(|v| !v.is_empty()),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_token.is_some() && self.calendar_id.is_some()
    }

    fn credentials(&self) -> Result<(&str, &str)> {
        match (self.api_token.as_deref(), self.calendar_id.as_deref()) {
            (Some(token), Some(id)) => Ok((token, id)),
            _ => bail!("calendar is not configured"),
        }
    }

    fn client() -> ClientWithMiddleware {
        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(RETRIES);

        ClientBuilder::new(Client::new())
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build()
    }

    async fn insert_event(&self, event: &EventResource) -> Result<()> {
        let (token, calendar_id) = self.credentials()?;

        let response = Self::client()
            .post(format!("{EVENTS_BASE}/{calendar_id}/events"))
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {token}"))
            .body(serde_json::to_vec(event)?)
            .send()
            .await?;

        if !response.status().is_success() {
            bail!("calendar insert failed: {}", response.status());
        }
        Ok(())
    }

    async fn list_events(&self, time_min: &str, time_max: &str) -> Result<Vec<EventResource>> {
        let (token, calendar_id) = self.credentials()?;

        let response = Self::client()
            .get(format!("{EVENTS_BASE}/{calendar_id}/events"))
            .header("Authorization", format!("Bearer {token}"))
            .query(&[
                ("timeMin", time_min),
                ("timeMax", time_max),
                ("singleEvents", "true"),
                ("orderBy", "startTime"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            bail!("calendar list failed: {}", response.status());
        }

        let listing = response.json::<EventsListResponse>().await?;
        Ok(listing.items)
    }

    async fn delete_event(&self, event_id: &str) -> Result<()> {
        let (token, calendar_id) = self.credentials()?;

        let response = Self::client()
            .delete(format!("{EVENTS_BASE}/{calendar_id}/events/{event_id}"))
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await?;

        if !response.status().is_success() {
            bail!("calendar delete failed: {}", response.status());
        }
        Ok(())
    }
}

#[async_trait]
impl CalendarApi for GoogleCalendar {
    async fn create(
        &self,
        start: NaiveDateTime,
        session_type: &str,
        phone: &str,
        name: Option<&str>,
    ) -> Result<()> {
        let event = booking_event(start, session_type, phone, name, BOOKING_MINUTES);
        self.insert_event(&event).await
    }

    async fn cancel(&self, start: NaiveDateTime, phone: &str) -> Result<bool> {
        let (time_min, time_max) = day_bounds(start.date())?;
        let events = self.list_events(&time_min, &time_max).await?;

        let want = format_local_datetime(&start);
        match find_match(&events, &want, phone) {
            Some(event) => {
                let id = event.id.as_deref().context("matched event has no id")?;
                self.delete_event(id).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_upcoming(&self, phone: &str) -> Result<Vec<Appointment>> {
        let from = local_now();
        let to = from + Duration::days(30);
        let events = self.list_events(&from.to_rfc3339(), &to.to_rfc3339()).await?;

        Ok(events
            .iter()
            .filter(|event| phone_matches(event, phone))
            .filter_map(|event| {
                Some(Appointment {
                    datetime: event_start_local(event)?,
                    summary: event.summary.clone().unwrap_or_else(|| "Appointment".to_string()),
                })
            })
            .collect())
    }

    async fn create_test_event(&self, name: Option<&str>, phone: Option<&str>) -> Result<()> {
        let start = (local_now() + Duration::hours(1)).naive_local();
        let event = booking_event(
            start,
            "connectivity test",
            phone.unwrap_or_default(),
            name,
            TEST_EVENT_MINUTES,
        );
        self.insert_event(&event).await
    }
}

/// Synthesizes the inserted event. The phone number embedded in the
/// description is the only handle `cancel`/`list_upcoming` have later.
fn booking_event(
    start: NaiveDateTime,
    session_type: &str,
    phone: &str,
    name: Option<&str>,
    minutes: i64,
) -> EventResource {
    let end = start + Duration::minutes(minutes);
    let display_name = name.unwrap_or(NAME_PLACEHOLDER);

    let mut description = String::from("Appointment booked through the studio WhatsApp assistant.\n");
    if let Some(name) = name {
        description.push_str(&format!("Name: {name}\n"));
    }
    description.push_str(&format!("Phone: {phone}"));

    EventResource {
        id: None,
        summary: Some(format!("{session_type} - {display_name}")),
        description: Some(description),
        start: Some(local_event_time(start)),
        end: Some(local_event_time(end)),
    }
}

fn local_event_time(at: NaiveDateTime) -> EventDateTime {
    EventDateTime {
        date_time: Some(at.format("%Y-%m-%dT%H:%M:%S").to_string()),
        time_zone: Some(TIME_ZONE.to_string()),
    }
}

/// RFC 3339 bounds of one studio-local calendar day.
fn day_bounds(day: NaiveDate) -> Result<(String, String)> {
    let offset = business_offset();
    let start = day
        .and_hms_opt(0, 0, 0)
        .and_then(|t| t.and_local_timezone(offset).single())
        .context("invalid day lower bound")?;
    let end = day
        .and_hms_opt(23, 59, 59)
        .and_then(|t| t.and_local_timezone(offset).single())
        .context("invalid day upper bound")?;
    Ok((start.to_rfc3339(), end.to_rfc3339()))
}

fn digits(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Full-number-or-last-4-digits containment against description/summary.
/// A phone with no digits at all matches nothing.
fn phone_matches(event: &EventResource, phone: &str) -> bool {
    let number = digits(phone);
    if number.is_empty() {
        return false;
    }
    let last4 = if number.len() > 4 {
        &number[number.len() - 4..]
    } else {
        number.as_str()
    };

    let description = event.description.as_deref().unwrap_or_default();
    let summary = event.summary.as_deref().unwrap_or_default();

    description.contains(&number)
        || summary.contains(&number)
        || description.contains(last4)
        || summary.contains(last4)
}

/// The event's own start, reformatted to studio-local `YYYY-MM-DD HH:mm`.
/// All-day events have no dateTime and yield `None`.
fn event_start_local(event: &EventResource) -> Option<String> {
    let raw = event.start.as_ref()?.date_time.as_deref()?;
    let parsed = DateTime::parse_from_rfc3339(raw).ok()?;
    Some(format_local_datetime(
        &parsed.with_timezone(&business_offset()).naive_local(),
    ))
}

/// First listed event starting exactly at `want` that carries the caller's
/// digits. With several same-time matches the first one returned by the
/// service wins; the upstream data offers nothing better to break the tie.
fn find_match<'a>(events: &'a [EventResource], want: &str, phone: &str) -> Option<&'a EventResource> {
    events
        .iter()
        .find(|event| event_start_local(event).as_deref() == Some(want) && phone_matches(event, phone))
}

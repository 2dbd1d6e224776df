use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::NaiveDateTime;

use studio_bot::bot_state::BotState;
use studio_bot::business_hours::parse_local_datetime;
use studio_bot::calendar::CalendarApi;
use studio_bot::handlers::handle_incoming;
use studio_bot::models::{Appointment, BookingStep};

const SENDER: &str = "50312345678";

#[derive(Debug, Clone, PartialEq)]
struct CreateCall {
    start: NaiveDateTime,
    session_type: String,
    phone: String,
    name: Option<String>,
}

/// Calendar double that records every call instead of talking to the
/// network.
#[derive(Default)]
struct RecordingCalendar {
    creates: Mutex<Vec<CreateCall>>,
    cancels: Mutex<Vec<(NaiveDateTime, String)>>,
    fail_creates: bool,
    cancel_matches: bool,
}

impl RecordingCalendar {
    fn creates(&self) -> Vec<CreateCall> {
        self.creates.lock().unwrap().clone()
    }

    fn cancels(&self) -> Vec<(NaiveDateTime, String)> {
        self.cancels.lock().unwrap().clone()
    }
}

#[async_trait]
impl CalendarApi for RecordingCalendar {
    async fn create(
        &self,
        start: NaiveDateTime,
        session_type: &str,
        phone: &str,
        name: Option<&str>,
    ) -> Result<()> {
        self.creates.lock().unwrap().push(CreateCall {
            start,
            session_type: session_type.to_string(),
            phone: phone.to_string(),
            name: name.map(str::to_string),
        });
        if self.fail_creates {
            bail!("calendar down");
        }
        Ok(())
    }

    async fn cancel(&self, start: NaiveDateTime, phone: &str) -> Result<bool> {
        self.cancels.lock().unwrap().push((start, phone.to_string()));
        Ok(self.cancel_matches)
    }

    async fn list_upcoming(&self, _phone: &str) -> Result<Vec<Appointment>> {
        Ok(Vec::new())
    }

    async fn create_test_event(&self, _name: Option<&str>, _phone: Option<&str>) -> Result<()> {
        Ok(())
    }
}

fn harness(calendar: RecordingCalendar) -> (BotState, Arc<RecordingCalendar>) {
    let calendar = Arc::new(calendar);
    (BotState::new(calendar.clone(), None), calendar)
}

async fn say(state: &BotState, text: &str) -> String {
    handle_incoming(state, SENDER, text)
        .await
        .expect("every non-empty message draws a reply")
}

/// 2025-11-14 is a Friday; 15:00 is inside the afternoon window.
async fn run_full_dialogue(state: &BotState) {
    say(state, "5").await;
    say(state, "Jane Doe").await;
    say(state, "2025-11-14 15:00").await;
    say(state, "family session").await;
    say(state, "50370000000").await;
}

#[tokio::test]
async fn full_dialogue_books_exactly_once() {
    let (state, calendar) = harness(RecordingCalendar::default());

    let reply = say(&state, "5").await;
    assert!(reply.contains("full name"));

    let reply = say(&state, "Jane Doe").await;
    assert!(reply.contains("Jane Doe"));

    let reply = say(&state, "2025-11-14 15:00").await;
    assert!(reply.contains("type of session"));

    let reply = say(&state, "family session").await;
    assert!(reply.contains("contact number"));

    let reply = say(&state, "50370000000").await;
    assert!(reply.contains("✅"));

    let creates = calendar.creates();
    assert_eq!(
        creates,
        vec![CreateCall {
            start: parse_local_datetime("2025-11-14 15:00").unwrap(),
            session_type: "family session".to_string(),
            phone: "50370000000".to_string(),
            name: Some("Jane Doe".to_string()),
        }]
    );
    assert!(state.get_draft(SENDER).await.is_none());
}

#[tokio::test]
async fn repeating_the_dialogue_books_twice() {
    // Duplicate bookings are not deduplicated; two runs mean two events.
    let (state, calendar) = harness(RecordingCalendar::default());

    run_full_dialogue(&state).await;
    run_full_dialogue(&state).await;

    assert_eq!(calendar.creates().len(), 2);
}

#[tokio::test]
async fn fresh_dialogue_starts_at_name() {
    let (state, _calendar) = harness(RecordingCalendar::default());

    say(&state, "5").await;

    let draft = state.get_draft(SENDER).await.expect("draft created");
    assert_eq!(draft.step, BookingStep::AwaitingName);
    assert!(draft.fields.name.is_none());
}

#[tokio::test]
async fn cancel_keyword_aborts_at_any_step() {
    let (state, calendar) = harness(RecordingCalendar::default());

    say(&state, "5").await;
    say(&state, "Jane Doe").await;
    say(&state, "2025-11-14 15:00").await;

    let reply = say(&state, "cancel booking").await;
    assert!(reply.contains("cancelled"));
    assert!(state.get_draft(SENDER).await.is_none());
    assert!(calendar.creates().is_empty());

    // Plain text no longer resumes the booking.
    say(&state, "Jane Doe").await;
    assert!(state.get_draft(SENDER).await.is_none());
}

#[tokio::test]
async fn unparsable_datetime_reprompts_without_advancing() {
    let (state, calendar) = harness(RecordingCalendar::default());

    say(&state, "5").await;
    say(&state, "Jane Doe").await;

    let reply = say(&state, "next friday at three").await;
    assert!(reply.contains("YYYY-MM-DD"));

    let draft = state.get_draft(SENDER).await.expect("draft kept");
    assert_eq!(draft.step, BookingStep::AwaitingDatetime);
    assert!(draft.fields.datetime.is_none());
    assert!(calendar.creates().is_empty());
}

#[tokio::test]
async fn out_of_window_datetime_reprompts_without_advancing() {
    let (state, calendar) = harness(RecordingCalendar::default());

    say(&state, "5").await;
    say(&state, "Jane Doe").await;

    // 2025-11-16 is a Sunday.
    let reply = say(&state, "2025-11-16 03:00").await;
    assert!(reply.contains("outside opening hours"));

    let draft = state.get_draft(SENDER).await.expect("draft kept");
    assert_eq!(draft.step, BookingStep::AwaitingDatetime);
    assert!(draft.fields.datetime.is_none());
    assert!(calendar.creates().is_empty());
}

#[tokio::test]
async fn empty_phone_defaults_to_sender() {
    let (state, calendar) = harness(RecordingCalendar::default());

    say(&state, "5").await;
    say(&state, "Jane Doe").await;
    say(&state, "2025-11-14 15:00").await;
    say(&state, "family session").await;
    say(&state, "").await;

    let creates = calendar.creates();
    assert_eq!(creates.len(), 1);
    assert_eq!(creates[0].phone, SENDER);
}

#[tokio::test]
async fn create_failure_still_discards_the_draft() {
    let (state, calendar) = harness(RecordingCalendar {
        fail_creates: true,
        ..RecordingCalendar::default()
    });

    run_full_dialogue(&state).await;

    assert_eq!(calendar.creates().len(), 1);
    assert!(state.get_draft(SENDER).await.is_none());

    // The next plain message starts nothing; the user must re-enter the flow.
    say(&state, "hello?").await;
    assert!(state.get_draft(SENDER).await.is_none());
}

#[tokio::test]
async fn one_shot_book_applies_defaults() {
    let (state, calendar) = harness(RecordingCalendar::default());

    let reply = say(&state, "book: 2025-11-14 15:00;;").await;
    assert!(reply.contains("✅"));

    let creates = calendar.creates();
    assert_eq!(creates.len(), 1);
    assert_eq!(creates[0].session_type, "general session");
    assert_eq!(creates[0].phone, SENDER);
    assert_eq!(creates[0].name, None);
}

#[tokio::test]
async fn one_shot_book_outside_hours_never_reaches_the_calendar() {
    let (state, calendar) = harness(RecordingCalendar::default());

    let reply = say(&state, "book: 2025-11-16 03:00;;").await;
    assert!(reply.contains("Mon-Fri"));
    assert!(calendar.creates().is_empty());
}

#[tokio::test]
async fn malformed_one_shot_book_yields_usage_hint() {
    let (state, calendar) = harness(RecordingCalendar::default());

    let reply = say(&state, "book: tomorrow;;").await;
    assert!(reply.contains("book: 2025-11-15 15:00"));
    assert!(calendar.creates().is_empty());
}

#[tokio::test]
async fn one_shot_cancel_reports_match_and_miss() {
    let (state, calendar) = harness(RecordingCalendar {
        cancel_matches: true,
        ..RecordingCalendar::default()
    });

    let reply = say(&state, "cancel: 2025-11-15 15:00; 50370000000").await;
    assert!(reply.contains("cancelled"));
    assert_eq!(calendar.cancels().len(), 1);
    assert_eq!(calendar.cancels()[0].1, "50370000000");

    let (state, calendar) = harness(RecordingCalendar::default());

    let reply = say(&state, "cancel: 2025-11-15 15:00; 50370000000").await;
    assert!(reply.contains("could not find"));
    assert_eq!(calendar.cancels().len(), 1);
}

#[tokio::test]
async fn one_shot_cancel_defaults_phone_to_sender() {
    let (state, calendar) = harness(RecordingCalendar {
        cancel_matches: true,
        ..RecordingCalendar::default()
    });

    say(&state, "cancel: 2025-11-15 15:00").await;

    assert_eq!(calendar.cancels()[0].1, SENDER);
}

#[tokio::test]
async fn listing_with_no_matches_says_so() {
    let (state, _calendar) = harness(RecordingCalendar::default());

    let reply = say(&state, "my appointments").await;
    assert!(reply.contains("did not find"));
}

#[tokio::test]
async fn senders_have_independent_drafts() {
    let (state, calendar) = harness(RecordingCalendar::default());

    say(&state, "5").await;
    let _ = handle_incoming(&state, "50399999999", "5").await;
    let _ = handle_incoming(&state, "50399999999", "Maria Lopez").await;

    let mine = state.get_draft(SENDER).await.expect("my draft");
    assert_eq!(mine.step, BookingStep::AwaitingName);

    let theirs = state.get_draft("50399999999").await.expect("their draft");
    assert_eq!(theirs.step, BookingStep::AwaitingDatetime);
    assert_eq!(theirs.fields.name.as_deref(), Some("Maria Lopez"));
    assert!(calendar.creates().is_empty());
}

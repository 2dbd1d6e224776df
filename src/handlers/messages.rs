use crate::bot_state::BotState;
use crate::business_hours::{format_local_datetime, is_open_at};
use crate::handlers::dialogue;
use crate::handlers::interpreter::{
    self, Action, BookCommand, CancelCommand, MenuSelection, OneShotCommand, UsageError,
};
use crate::handlers::replies;
use crate::llm;
use crate::models::BookingDraft;

/// Core entry point: one inbound message in, zero or one reply out.
/// Transport, delivery and the outside-hours auto-reply live in the
/// webhook layer; everything here is deterministic given the draft store
/// and the calendar collaborator.
pub async fn handle_incoming(state: &BotState, sender: &str, text: &str) -> Option<String> {
    let draft = state.get_draft(sender).await;
    if text.trim().is_empty() && draft.is_none() {
        return None;
    }

    let reply = match interpreter::classify(text, draft.is_some()) {
        Action::CancelDialogue => {
            state.remove_draft(sender).await;
            replies::dialogue_cancelled()
        }
        Action::DialogueInput => {
            let draft = draft.unwrap_or_default();
            dialogue::advance(state, sender, draft, text).await
        }
        Action::OneShot(Ok(OneShotCommand::Book(cmd))) => book_one_shot(state, sender, cmd).await,
        Action::OneShot(Ok(OneShotCommand::Cancel(cmd))) => cancel_one_shot(state, sender, cmd).await,
        Action::OneShot(Ok(OneShotCommand::ListAppointments)) => list_appointments(state, sender).await,
        Action::OneShot(Err(UsageError::Book)) => replies::book_usage(),
        Action::OneShot(Err(UsageError::Cancel)) => replies::cancel_usage(),
        Action::Menu(MenuSelection::Greeting) => replies::menu(),
        Action::Menu(MenuSelection::StudioServices) => replies::studio_services(),
        Action::Menu(MenuSelection::EventPackages) => replies::event_packages(),
        Action::Menu(MenuSelection::PhotoPrinting) => replies::photo_printing(),
        Action::Menu(MenuSelection::OrderStatus) => replies::order_status(),
        Action::Menu(MenuSelection::StartBooking) => {
            state.set_draft(sender, BookingDraft::new()).await;
            replies::start_booking()
        }
        Action::Freeform => freeform(sender, text).await,
    };

    Some(reply)
}

async fn book_one_shot(state: &BotState, sender: &str, cmd: BookCommand) -> String {
    if !is_open_at(cmd.start) {
        return replies::outside_hours();
    }
    let phone = cmd.phone.as_deref().unwrap_or(sender);

    match state.calendar.create(cmd.start, &cmd.session_type, phone, None).await {
        Ok(()) => replies::one_shot_booked(
            &format_local_datetime(&cmd.start),
            &cmd.session_type,
            phone,
        ),
        Err(e) => {
            log::error!("❌ Calendar create failed for {}: {}", sender, e);
            replies::one_shot_failed()
        }
    }
}

async fn cancel_one_shot(state: &BotState, sender: &str, cmd: CancelCommand) -> String {
    let phone = cmd.phone.as_deref().unwrap_or(sender);

    match state.calendar.cancel(cmd.start, phone).await {
        Ok(true) => replies::cancel_confirmed(&format_local_datetime(&cmd.start), phone),
        Ok(false) => replies::cancel_not_found(),
        Err(e) => {
            log::error!("❌ Calendar cancel failed for {}: {}", sender, e);
            replies::cancel_unavailable()
        }
    }
}

async fn list_appointments(state: &BotState, sender: &str) -> String {
    match state.calendar.list_upcoming(sender).await {
        Ok(items) if items.is_empty() => replies::no_appointments(),
        Ok(items) => replies::appointments(&items),
        Err(e) => {
            log::error!("❌ Calendar list failed for {}: {}", sender, e);
            replies::list_unavailable()
        }
    }
}

async fn freeform(sender: &str, text: &str) -> String {
    match llm::ask(text).await {
        Ok(Some(answer)) => answer,
        Ok(None) => replies::fallback(),
        Err(e) => {
            log::error!("❌ Freeform fallback failed for {}: {}", sender, e);
            replies::fallback()
        }
    }
}

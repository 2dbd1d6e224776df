use crate::bot_state::BotState;
use crate::business_hours::{format_local_datetime, is_open_at, parse_local_datetime};
use crate::handlers::interpreter::DEFAULT_SESSION_TYPE;
use crate::handlers::replies;
use crate::models::{BookingDraft, BookingStep};

/// Feeds one message into the sender's booking dialogue and returns the
/// reply. Every branch either re-prompts the same step, advances the
/// draft, or finishes it; the only external side effect is the single
/// calendar `create` at the final step.
pub async fn advance(state: &BotState, sender: &str, mut draft: BookingDraft, text: &str) -> String {
    let input = text.trim();

    match draft.step {
        BookingStep::AwaitingName => {
            if input.is_empty() {
                return replies::ask_name();
            }
            draft.fields.name = Some(input.to_string());
            draft.step = BookingStep::AwaitingDatetime;
            let reply = replies::ask_datetime(input);
            state.set_draft(sender, draft).await;
            reply
        }

        BookingStep::AwaitingDatetime => {
            let Some(start) = parse_local_datetime(input) else {
                return replies::bad_datetime();
            };
            if !is_open_at(start) {
                return replies::outside_hours();
            }
            draft.fields.datetime = Some(start);
            draft.step = BookingStep::AwaitingSessionType;
            state.set_draft(sender, draft).await;
            replies::ask_session_type()
        }

        BookingStep::AwaitingSessionType => {
            if input.is_empty() {
                return replies::ask_session_type();
            }
            draft.fields.session_type = Some(input.to_string());
            draft.step = BookingStep::AwaitingPhone;
            state.set_draft(sender, draft).await;
            replies::ask_phone()
        }

        BookingStep::AwaitingPhone => {
            let phone = if input.is_empty() { sender } else { input };
            let name = draft.fields.name.clone().unwrap_or_default();
            let session_type = draft
                .fields
                .session_type
                .clone()
                .unwrap_or_else(|| DEFAULT_SESSION_TYPE.to_string());

            let reply = match draft.fields.datetime {
                Some(start) => {
                    match state.calendar.create(start, &session_type, phone, Some(&name)).await {
                        Ok(()) => replies::booking_confirmed(
                            &name,
                            &format_local_datetime(&start),
                            &session_type,
                            phone,
                        ),
                        Err(e) => {
                            log::error!("❌ Calendar create failed for {}: {}", sender, e);
                            replies::booking_failed()
                        }
                    }
                }
                None => {
                    log::error!("❌ Draft for {} reached the phone step without a datetime", sender);
                    replies::booking_failed()
                }
            };

            // The draft is gone whether or not the calendar call worked;
            // a failed booking has to be restarted from scratch.
            state.remove_draft(sender).await;
            reply
        }
    }
}

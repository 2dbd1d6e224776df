use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use crate::bot_state::BotState;
use crate::business_hours;
use crate::database::{AUTHOR_BOT, AUTHOR_CUSTOMER};
use crate::handlers::messages::handle_incoming;
use crate::handlers::replies;
use crate::whatsapp::WhatsAppClient;

/// Everything the webhook endpoints need; cloned per request by axum.
#[derive(Clone)]
pub struct AppState {
    pub bot: BotState,
    pub whatsapp: WhatsAppClient,
    pub verify_token: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/webhook", get(verify).post(receive))
        .with_state(state)
}

async fn index() -> &'static str {
    "Photo studio assistant is running 🚀"
}

/// Subscription handshake: echo the challenge when the verify token matches.
async fn verify(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, String) {
    let mode = params.get("hub.mode").map(String::as_str);
    let token = params.get("hub.verify_token").map(String::as_str);

    if mode == Some("subscribe") && token == Some(state.verify_token.as_str()) {
        log::info!("✅ Webhook verified");
        let challenge = params.get("hub.challenge").cloned().unwrap_or_default();
        (StatusCode::OK, challenge)
    } else {
        (StatusCode::FORBIDDEN, String::new())
    }
}

// Inbound payload, limited to the fields the bot actually reads.

#[derive(Debug, Deserialize)]
struct WebhookPayload {
    #[serde(default)]
    entry: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
struct Entry {
    #[serde(default)]
    changes: Vec<Change>,
}

#[derive(Debug, Deserialize)]
struct Change {
    value: Option<ChangeValue>,
}

#[derive(Debug, Deserialize)]
struct ChangeValue {
    #[serde(default)]
    messages: Vec<IncomingMessage>,
    #[serde(default)]
    contacts: Vec<Contact>,
}

#[derive(Debug, Deserialize)]
struct IncomingMessage {
    from: String,
    text: Option<TextBody>,
}

#[derive(Debug, Deserialize)]
struct TextBody {
    body: String,
}

#[derive(Debug, Deserialize)]
struct Contact {
    profile: Option<ContactProfile>,
}

#[derive(Debug, Deserialize)]
struct ContactProfile {
    name: Option<String>,
}

/// Inbound messages. Always answers 200: the channel retries on anything
/// else, and a processing failure must never take the handler down.
async fn receive(State(state): State<AppState>, Json(payload): Json<WebhookPayload>) -> StatusCode {
    process(&state, payload).await;
    StatusCode::OK
}

async fn process(state: &AppState, payload: WebhookPayload) {
    // Status updates and other non-message notifications carry no
    // messages array and are acknowledged silently.
    let Some(value) = payload
        .entry
        .into_iter()
        .flat_map(|entry| entry.changes)
        .filter_map(|change| change.value)
        .next()
    else {
        return;
    };
    let Some(message) = value.messages.into_iter().next() else {
        return;
    };

    let sender = message.from;
    let text = message.text.map(|t| t.body).unwrap_or_default();
    let text = text.trim();
    let contact_name = value
        .contacts
        .first()
        .and_then(|c| c.profile.as_ref())
        .and_then(|p| p.name.clone());

    record(state, &sender, contact_name.as_deref(), AUTHOR_CUSTOMER, text).await;

    // Outside opening hours nothing is processed; the studio just says so.
    let reply = if !business_hours::is_open_now() {
        Some(replies::closed_now(business_hours::is_sunday_now()))
    } else {
        handle_incoming(&state.bot, &sender, text).await
    };

    if let Some(reply) = reply {
        match state.whatsapp.send_text(&sender, &reply).await {
            Ok(()) => record(state, &sender, None, AUTHOR_BOT, &reply).await,
            Err(e) => log::error!("❌ WhatsApp send to {} failed: {}", sender, e),
        }
    }
}

async fn record(state: &AppState, phone: &str, name: Option<&str>, author: &str, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(db) = &state.bot.db {
        if let Err(e) = db.record_message(phone, name, author, text).await {
            log::error!("❌ Could not record conversation message for {}: {}", phone, e);
        }
    }
}

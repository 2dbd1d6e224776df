use std::env;
use std::error::Error;
use std::sync::Arc;

use studio_bot::bot_state::BotState;
use studio_bot::calendar::{CalendarApi, GoogleCalendar};
use studio_bot::database::Database;
use studio_bot::handlers::webhook::{self, AppState};
use studio_bot::whatsapp::WhatsAppClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    dotenvy::dotenv().ok();
    env_logger::init();
    log::info!("Starting photo studio WhatsApp assistant...");

    let calendar = GoogleCalendar::from_env();
    if !calendar.is_configured() {
        log::warn!("⚠️ Calendar credentials missing, booking operations will fail");
    }
    let calendar: Arc<dyn CalendarApi> = Arc::new(calendar);

    // One-off connectivity check, then exit.
    if env::args().any(|arg| arg == "--test-event") {
        match calendar.create_test_event(None, None).await {
            Ok(()) => log::info!("✅ Test event created"),
            Err(e) => log::error!("❌ Test event failed: {}", e),
        }
        return Ok(());
    }

    let db = match env::var("DATABASE_URL") {
        Ok(url) => {
            let db = Database::new(&url).await?;
            db.init().await?;
            log::info!("✅ Database initialized");
            Some(db)
        }
        Err(_) => {
            log::warn!("⚠️ DATABASE_URL not set, conversation log disabled");
            None
        }
    };

    let whatsapp = WhatsAppClient::from_env()?;
    let verify_token = env::var("WHATSAPP_VERIFY_TOKEN")
        .expect("WHATSAPP_VERIFY_TOKEN must be set");

    let state = AppState {
        bot: BotState::new(calendar, db),
        whatsapp,
        verify_token,
    };

    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(3000);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    log::info!("🚀 Listening on port {}", port);

    axum::serve(listener, webhook::router(state)).await?;

    Ok(())
}

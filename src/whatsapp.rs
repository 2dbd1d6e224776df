use std::env;

use anyhow::{bail, Result};
use reqwest::Client;
use reqwest_middleware::ClientBuilder;
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use serde::Serialize;

const RETRIES: u32 = 1;
const GRAPH_BASE: &str = "https://graph.facebook.com/v21.0";
const TOKEN_ENV: &str = "WHATSAPP_TOKEN";
const PHONE_NUMBER_ID_ENV: &str = "WHATSAPP_PHONE_NUMBER_ID";

#[derive(Serialize)]
struct OutboundMessage<'a> {
    messaging_product: &'a str,
    to: &'a str,
    text: OutboundText<'a>,
}

#[derive(Serialize)]
struct OutboundText<'a> {
    body: &'a str,
}

/// Outbound side of the WhatsApp Cloud API. Sends are fire-and-forget:
/// the bot never waits for delivery confirmation.
#[derive(Clone, Debug)]
pub struct WhatsAppClient {
    token: String,
    phone_number_id: String,
}

impl WhatsAppClient {
    pub fn from_env() -> Result<Self> {
        let token = env::var(TOKEN_ENV)?;
        let phone_number_id = env::var(PHONE_NUMBER_ID_ENV)?;
        if token.is_empty() || phone_number_id.is_empty() {
            bail!("WhatsApp credentials are empty");
        }
        Ok(Self { token, phone_number_id })
    }

    pub async fn send_text(&self, to: &str, body: &str) -> Result<()> {
        let payload = OutboundMessage {
            messaging_product: "whatsapp",
            to,
            text: OutboundText { body },
        };

        let retry_policy = ExponentialBackoff::builder()
            .build_with_max_retries(RETRIES);

        let client = ClientBuilder::new(Client::new())
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        let response = client
            .post(format!("{}/{}/messages", GRAPH_BASE, self.phone_number_id))
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.token))
            .body(serde_json::to_vec(&payload)?)
            .send()
            .await?;

        if !response.status().is_success() {
            bail!("WhatsApp send failed: {}", response.status());
        }
        Ok(())
    }
}

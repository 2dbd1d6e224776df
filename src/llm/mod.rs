pub mod config;

use std::env;

use reqwest::Client;
use reqwest_middleware::ClientBuilder;
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};

use anyhow::Result;

use crate::llm::config::ChatMessage;
use crate::llm::config::ServiceChatRequest;
use crate::llm::config::ServiceChatResponse;

const RETRIES: u32 = 1;
const LLM_SERVICE_HOST_ENV: &str = "LLM_SERVICE_HOST";
const PROVIDER: &str = "openai";
const MODEL: &str = "gpt-4o-mini";
const TEMPERATURE: f32 = 0.2;

pub const ADDRESS_TEXT: &str =
    "Masferrer Street at Morazan Avenue, 2nd North Avenue #1-2, between Piedra Lisa \
     and the Casa de Cultura, across from the Patty Academy, Sonsonate.";
pub const MAPS_LINK: &str = "https://maps.app.goo.gl/7GWy4QG27d9Jdw9G9";

fn system_prompt() -> String {
    format!(
        "You are the photo studio assistant. Answer warmly, professionally and concisely. \
         Quote exact figures only when the customer gave them or they are confirmed. \
         Studio address: {ADDRESS_TEXT} Map link: {MAPS_LINK}"
    )
}

/// Free-form fallback for messages no other rule claims. Returns
/// `Ok(None)` when no text-generation sidecar is configured so callers
/// can fall back to a canned reply.
pub async fn ask(question: &str) -> Result<Option<String>> {
    let Ok(service_host) = env::var(LLM_SERVICE_HOST_ENV) else {
        return Ok(None);
    };

    let request = ServiceChatRequest {
        provider: PROVIDER.to_string(),
        model: MODEL.to_string(),
        messages: vec![
            ChatMessage {
                role: "system".to_string(),
                content: system_prompt(),
            },
            ChatMessage {
                role: "user".to_string(),
                content: question.to_string(),
            },
        ],
        temperature: TEMPERATURE,
    };

    let retry_policy = ExponentialBackoff::builder()
        .build_with_max_retries(RETRIES);

    let client = ClientBuilder::new(Client::new())
        .with(RetryTransientMiddleware::new_with_policy(retry_policy))
        .build();

    let response = client
        .post(format!("{}/chat", service_host))
        .header("Accept", "application/json")
        .header("Content-Type", "application/json")
        .body(serde_json::to_vec(&request)?)
        .send()
        .await?;

    let text = response.text().await?;
    let response = serde_json::from_str::<ServiceChatResponse>(&text)?;

    Ok(response
        .content
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty()))
}

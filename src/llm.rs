use std::time::Duration;
use once_cell::sync::Lazy;
use reqwest::{Client, ClientBuilder};
use serde::Serialize;
use tracing::debug;
use crate::error::{Result, AppError};

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Upstream error bodies are cut to this many characters before reaching clients.
const MAX_ERROR_DETAIL_CHARS: usize = 200;

// Shared so connections are reused across requests. No total timeout here:
// the handler's request timeout bounds the whole call.
static CLIENT: Lazy<Client> = Lazy::new(|| {
    ClientBuilder::new()
        .connect_timeout(Duration::from_secs(5))
        .pool_max_idle_per_host(10)
        .build()
        .unwrap_or_default()
});

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
}

pub async fn call_openrouter(base_url: &str, api_key: &str, model: &str, prompt: &str) -> Result<String> {
    let body = ChatRequest {
        model,
        messages: vec![Message {
            role: "user",
            content: prompt,
        }],
    };

    let url = format!("{}/chat/completions", base_url.trim_end_matches('/'));
    debug!(%url, model, prompt_chars = prompt.len(), "Sending chat completion request");
    let res = CLIENT
        .post(&url)
        .bearer_auth(api_key)
        .header("X-Title", "Socrato")
        .json(&body)
        .send()
        .await?;

    let status = res.status();
    if !status.is_success() {
        let detail = res.text().await.unwrap_or_default();
        return Err(AppError::Llm(format!(
            "OpenRouter returned {}: {}",
            status,
            truncate_detail(detail.trim())
        )));
    }

    let json: serde_json::Value = res.json().await?;
    extract_reply(&json)
}

fn truncate_detail(detail: &str) -> String {
    match detail.char_indices().nth(MAX_ERROR_DETAIL_CHARS) {
        Some((cut, _)) => format!("{}...", &detail[..cut]),
        None => detail.to_string(),
    }
}

fn extract_reply(json: &serde_json::Value) -> Result<String> {
    json["choices"][0]["message"]["content"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| AppError::Llm("Invalid response format from LLM".to_string()))
}

/// Returns the JSON object inside a reply, skipping code fences and surrounding prose.
///
/// Takes everything from the first `{` to the last `}`. Replies without braces
/// are returned trimmed so the parse error names the real content.
pub fn extract_json(reply: &str) -> &str {
    let trimmed = reply.trim();
    match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if start < end => &trimmed[start..=end],
        _ => trimmed,
    }
}

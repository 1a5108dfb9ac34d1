use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use roster_config::LlmProviderConfig;

use crate::{Error, Result};

/// Sends one chat completion and returns the assistant's text reply.
///
/// Single attempt; callers treat any error as "no expansion".
pub async fn complete(
	client: &Client,
	cfg: &LlmProviderConfig,
	system_prompt: &str,
	user_prompt: &str,
) -> Result<String> {
	crate::require_api_key("expansion", &cfg.api_key)?;

	let body = serde_json::json!({
		"model": cfg.model,
		"temperature": cfg.temperature,
		"messages": [
			{ "role": "system", "content": system_prompt },
			{ "role": "user", "content": user_prompt },
		],
	});
	let res = client
		.post(crate::endpoint(&cfg.api_base, &cfg.path))
		.timeout(Duration::from_millis(cfg.timeout_ms))
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	parse_chat_content(&json)
}

fn parse_chat_content(json: &Value) -> Result<String> {
	let content = json
		.get("choices")
		.and_then(|v| v.as_array())
		.and_then(|arr| arr.first())
		.and_then(|choice| choice.get("message"))
		.and_then(|msg| msg.get("content"))
		.and_then(|c| c.as_str())
		.ok_or_else(|| Error::InvalidResponse {
			message: "Chat response is missing message content.".to_string(),
		})?;

	Ok(content.trim().to_string())
}

// screen-translator/src/translator/openai.rs

// ============================================================================
// OPENAI (CHAT COMPLETIONS)
// ============================================================================

use async_trait::async_trait;
use serde_json::json;

use super::{build_prompt, ProviderKind, TranslationError, TranslationProvider};

const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const PROVIDER: &str = "OpenAI";
const SYSTEM_PROMPT: &str = "Literal translator.";

pub struct OpenAiTranslator {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiTranslator {
    pub fn new(api_key: String, model: impl Into<String>) -> Self {
        OpenAiTranslator {
            client: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.trim().to_string(),
            model: model.into(),
        }
    }

    #[cfg(test)]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl TranslationProvider for OpenAiTranslator {
    async fn translate(&self, text: &str, target_language: &str) -> Result<String, TranslationError> {
        if self.api_key.is_empty() {
            return Err(TranslationError::MissingCredentials { provider: PROVIDER });
        }

        let body = chat_request_body(&self.model, &build_prompt(text, target_language));

        debug!("   🌐 [OpenAI] modelo {}", self.model);

        let response = self
            .client
            .post(format!(
                "{}/v1/chat/completions",
                self.base_url.trim_end_matches('/')
            ))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(TranslationError::Api {
                provider: PROVIDER,
                status: status.as_u16(),
                body,
            });
        }

        parse_chat_response(&body)
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::LanguageModel
    }

    fn name(&self) -> &str {
        PROVIDER
    }
}

/// Modelos de raciocínio (o1, o3-mini...) rejeitam `temperature`
fn is_reasoning_model(model: &str) -> bool {
    let mut chars = model.chars();
    chars.next() == Some('o') && chars.next().is_some_and(|c| c.is_ascii_digit())
}

fn chat_request_body(model: &str, prompt: &str) -> serde_json::Value {
    let mut body = json!({
        "model": model,
        "messages": [
            { "role": "system", "content": SYSTEM_PROMPT },
            { "role": "user", "content": prompt }
        ]
    });
    if !is_reasoning_model(model) {
        body["temperature"] = json!(0);
    }
    body
}

/// choices[0].message.content
fn parse_chat_response(body: &str) -> Result<String, TranslationError> {
    let response: serde_json::Value =
        serde_json::from_str(body).map_err(|e| TranslationError::MalformedResponse {
            provider: PROVIDER,
            detail: e.to_string(),
        })?;

    response
        .get("choices")
        .and_then(|c| c.as_array())
        .and_then(|arr| arr.first())
        .and_then(|choice| choice.get("message"))
        .and_then(|msg| msg.get("content"))
        .and_then(|t| t.as_str())
        .map(str::to_string)
        .ok_or_else(|| TranslationError::MalformedResponse {
            provider: PROVIDER,
            detail: "choices[0].message.content ausente".to_string(),
        })
}

// screen-translator/src/translator/gemini.rs

// ============================================================================
// GEMINI (generateContent)
// ============================================================================

use async_trait::async_trait;
use serde_json::json;

use super::{build_prompt, ProviderKind, TranslationError, TranslationProvider};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const PROVIDER: &str = "Gemini";

pub struct GeminiTranslator {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiTranslator {
    pub fn new(api_key: String, model: impl Into<String>) -> Self {
        GeminiTranslator {
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
impl TranslationProvider for GeminiTranslator {
    async fn translate(&self, text: &str, target_language: &str) -> Result<String, TranslationError> {
        if self.api_key.is_empty() {
            return Err(TranslationError::MissingCredentials { provider: PROVIDER });
        }

        let body = json!({
            "contents": [{ "parts": [{ "text": build_prompt(text, target_language) }] }]
        });

        debug!("   🌐 [Gemini] modelo {}", self.model);

        let response = self
            .client
            .post(format!(
                "{}/v1beta/models/{}:generateContent",
                self.base_url.trim_end_matches('/'),
                self.model
            ))
            .header("x-goog-api-key", &self.api_key)
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

        parse_generate_response(&body)
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::LanguageModel
    }

    fn name(&self) -> &str {
        PROVIDER
    }
}

/// candidates[0].content.parts[*].text, concatenados
fn parse_generate_response(body: &str) -> Result<String, TranslationError> {
    let malformed = |detail: &str| TranslationError::MalformedResponse {
        provider: PROVIDER,
        detail: detail.to_string(),
    };

    let response: serde_json::Value =
        serde_json::from_str(body).map_err(|e| malformed(&e.to_string()))?;

    let parts = response
        .get("candidates")
        .and_then(|c| c.as_array())
        .and_then(|arr| arr.first())
        .and_then(|candidate| candidate.get("content"))
        .and_then(|content| content.get("parts"))
        .and_then(|parts| parts.as_array())
        .ok_or_else(|| malformed("candidates[0].content.parts ausente"))?;

    Ok(parts
        .iter()
        .filter_map(|part| part.get("text").and_then(|t| t.as_str()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn calls_generate_content_for_model() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1beta/models/gemini-2.0-flash:generateContent")
            .match_header("x-goog-api-key", "g-key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"candidates":[{"content":{"parts":[{"text":"Here is the translation:\n"},{"text":"สวัสดี"}]}}]}"#,
            )
            .create_async()
            .await;

        let gemini = GeminiTranslator::new("g-key".into(), "gemini-2.0-flash").with_base_url(server.url());
        assert_eq!(
            gemini.translate("Hello", "Thai").await.unwrap(),
            "Here is the translation:\nสวัสดี"
        );
        mock.assert_async().await;
    }

    #[test]
    fn blocked_prompt_without_candidates_is_malformed() {
        let body = r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#;
        assert!(matches!(
            parse_generate_response(body),
            Err(TranslationError::MalformedResponse { .. })
        ));
    }
}

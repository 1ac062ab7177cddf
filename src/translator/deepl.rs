// screen-translator/src/translator/deepl.rs

// ============================================================================
// DeepL TRADUTOR
// ============================================================================
//
// Chaves do plano gratuito terminam com ":fx" e usam outro host.
// Sem `source_lang` o DeepL detecta o idioma de origem sozinho.
//
// ============================================================================

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{ProviderKind, TranslationError, TranslationProvider};
use crate::language;

const FREE_BASE_URL: &str = "https://api-free.deepl.com";
const PRO_BASE_URL: &str = "https://api.deepl.com";
const PROVIDER: &str = "DeepL";

#[derive(Debug, Serialize)]
struct DeepLRequest<'a> {
    text: Vec<&'a str>,
    target_lang: String,
}

#[derive(Debug, Deserialize)]
struct DeepLResponse {
    translations: Vec<DeepLTranslation>,
}

#[derive(Debug, Deserialize)]
struct DeepLTranslation {
    text: String,
}

pub struct DeepLTranslator {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl DeepLTranslator {
    pub fn new(api_key: String) -> Self {
        let api_key = api_key.trim().to_string();
        let base_url = if api_key.ends_with(":fx") {
            FREE_BASE_URL
        } else {
            PRO_BASE_URL
        };

        DeepLTranslator {
            client: reqwest::Client::new(),
            base_url: base_url.to_string(),
            api_key,
        }
    }

    #[cfg(test)]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl TranslationProvider for DeepLTranslator {
    async fn translate(&self, text: &str, target_language: &str) -> Result<String, TranslationError> {
        if self.api_key.is_empty() {
            return Err(TranslationError::MissingCredentials { provider: PROVIDER });
        }

        let request_body = DeepLRequest {
            text: vec![text],
            target_lang: language::deepl_code(target_language),
        };

        debug!("   🌐 [DeepL] auto → {}", request_body.target_lang);

        let response = self
            .client
            .post(format!("{}/v2/translate", self.base_url.trim_end_matches('/')))
            .header("Authorization", format!("DeepL-Auth-Key {}", self.api_key))
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TranslationError::Api {
                provider: PROVIDER,
                status: status.as_u16(),
                body,
            });
        }

        let deepl_response: DeepLResponse =
            response
                .json()
                .await
                .map_err(|e| TranslationError::MalformedResponse {
                    provider: PROVIDER,
                    detail: e.to_string(),
                })?;

        Ok(deepl_response
            .translations
            .into_iter()
            .map(|t| t.text)
            .collect::<Vec<_>>()
            .join("\n"))
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::MachineTranslation
    }

    fn name(&self) -> &str {
        PROVIDER
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_keys_use_the_free_host() {
        assert_eq!(DeepLTranslator::new("abc:fx".into()).base_url, FREE_BASE_URL);
        assert_eq!(DeepLTranslator::new("abc".into()).base_url, PRO_BASE_URL);
    }

    #[tokio::test]
    async fn missing_key_fails_before_any_request() {
        let deepl = DeepLTranslator::new("  ".into()).with_base_url("http://127.0.0.1:9");
        assert!(matches!(
            deepl.translate("Hello", "Thai").await,
            Err(TranslationError::MissingCredentials { .. })
        ));
    }

    #[tokio::test]
    async fn posts_auth_header_and_codes() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v2/translate")
            .match_header("authorization", "DeepL-Auth-Key secret")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "text": ["Hello"],
                "target_lang": "JA"
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"translations":[{"detected_source_language":"EN","text":"こんにちは"}]}"#)
            .create_async()
            .await;

        let deepl = DeepLTranslator::new("secret".into()).with_base_url(server.url());
        assert_eq!(deepl.translate("Hello", "Japanese").await.unwrap(), "こんにちは");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn quota_error_keeps_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v2/translate")
            .with_status(456)
            .with_body("Quota exceeded")
            .create_async()
            .await;

        let deepl = DeepLTranslator::new("secret".into()).with_base_url(server.url());
        let err = deepl.translate("Hello", "Thai").await.unwrap_err();
        assert_eq!(err.to_string(), "DeepL respondeu 456: Quota exceeded");
    }
}

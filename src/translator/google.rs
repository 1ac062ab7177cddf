// screen-translator/src/translator/google.rs

// ============================================================================
// GOOGLE TRANSLATE (GRÁTIS, SEM API KEY)
// ============================================================================

use async_trait::async_trait;

use super::{ProviderKind, TranslationError, TranslationProvider};
use crate::language;

const DEFAULT_BASE_URL: &str = "https://translate.googleapis.com";
const PROVIDER: &str = "Google Translate";

/// O idioma de origem é detectado pelo próprio Google (`sl=auto`)
pub struct GoogleTranslate {
    client: reqwest::Client,
    base_url: String,
}

impl GoogleTranslate {
    pub fn new() -> Self {
        GoogleTranslate {
            client: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    #[cfg(test)]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl Default for GoogleTranslate {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TranslationProvider for GoogleTranslate {
    async fn translate(&self, text: &str, target_language: &str) -> Result<String, TranslationError> {
        let target = language::iso_code(target_language);
        debug!("   🌐 [Google] auto → {}", target);

        let url = format!(
            "{}/translate_a/single?client=gtx&sl=auto&tl={}&dt=t&q={}",
            self.base_url.trim_end_matches('/'),
            target,
            urlencoding::encode(text)
        );

        let response = self
            .client
            .get(&url)
            .header(
                "User-Agent",
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36",
            )
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

        parse_google_response(&body)
    }

    fn kind(&self) -> ProviderKind {
        ProviderKind::MachineTranslation
    }

    fn name(&self) -> &str {
        PROVIDER
    }
}

/// Formato: [[["tradução", "original", ...], ...], ...]
/// Cada frase vem num item; as quebras de linha vêm dentro dos próprios trechos.
fn parse_google_response(body: &str) -> Result<String, TranslationError> {
    let malformed = |detail: String| TranslationError::MalformedResponse {
        provider: PROVIDER,
        detail,
    };

    let json: serde_json::Value = serde_json::from_str(body).map_err(|e| malformed(e.to_string()))?;

    let sentences = json
        .get(0)
        .and_then(|first| first.as_array())
        .ok_or_else(|| malformed("lista de frases ausente".to_string()))?;

    let translated: String = sentences
        .iter()
        .filter_map(|sentence| sentence.get(0).and_then(|t| t.as_str()))
        .collect();

    Ok(translated)
}

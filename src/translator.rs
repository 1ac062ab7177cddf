// screen-translator/src/translator.rs

// ============================================================================
// MÓDULO TRANSLATOR - Tradução usando múltiplos provedores
// ============================================================================
//
// Provedores suportados:
// - Google Translate (grátis, sem API key)
// - DeepL (requer API key)
// - OpenAI / ChatGPT (LLM, requer API key)
// - Gemini (LLM, requer API key)
//
// O `TranslationRouter` escolhe o provedor uma vez (a partir do config),
// aplica um prazo a cada chamada e limpa a resposta dos LLMs.
// Nenhum erro de provedor derruba o loop: tudo vira `TranslationResult::Failure`.
//
// ============================================================================

pub mod deepl;
pub mod gemini;
pub mod google;
pub mod openai;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::config::AppConfig;

// ============================================================================
// ERROS E RESULTADOS
// ============================================================================

#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("{provider} API key não configurada")]
    MissingCredentials { provider: &'static str },

    #[error("falha de rede: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{provider} respondeu {status}: {body}")]
    Api {
        provider: &'static str,
        status: u16,
        body: String,
    },

    #[error("resposta inesperada de {provider}: {detail}")]
    MalformedResponse {
        provider: &'static str,
        detail: String,
    },

    #[error("tempo esgotado após {0:?}")]
    Timeout(Duration),

    #[error("resposta vazia do tradutor")]
    EmptyResponse,
}

/// Resultado exibido no painel de tradução
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationResult {
    Success(String),
    Failure(String),
}

impl TranslationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, TranslationResult::Success(_))
    }

    /// Texto que vai para o painel (falhas ganham o prefixo de erro)
    pub fn display_text(&self) -> String {
        match self {
            TranslationResult::Success(text) => text.clone(),
            TranslationResult::Failure(message) => format!("[Error]: {}", message),
        }
    }
}

// ============================================================================
// PROVEDORES
// ============================================================================

/// Tipo do provedor: define se a resposta precisa de limpeza
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    MachineTranslation,
    LanguageModel,
}

/// Capacidade comum a todos os provedores
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    /// Traduz `text` para `target_language` (nome legível, ex: "Thai")
    async fn translate(&self, text: &str, target_language: &str) -> Result<String, TranslationError>;

    fn kind(&self) -> ProviderKind;

    fn name(&self) -> &str;
}

/// Provedores conhecidos (valor salvo no config.json)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    #[default]
    Google,
    DeepL,
    OpenAI,
    Gemini,
}

impl ProviderId {
    pub const ALL: [ProviderId; 4] = [
        ProviderId::Google,
        ProviderId::DeepL,
        ProviderId::OpenAI,
        ProviderId::Gemini,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ProviderId::Google => "Google Translate",
            ProviderId::DeepL => "DeepL",
            ProviderId::OpenAI => "ChatGPT",
            ProviderId::Gemini => "Gemini",
        }
    }

    /// Modelos oferecidos na tela de configurações
    pub fn models(&self) -> &'static [&'static str] {
        match self {
            ProviderId::Google | ProviderId::DeepL => &["Standard"],
            ProviderId::OpenAI => &["gpt-4o", "o3-mini"],
            ProviderId::Gemini => &["gemini-2.0-flash", "gemini-1.5-pro"],
        }
    }

    pub fn default_model(&self) -> &'static str {
        self.models()[0]
    }
}

// ============================================================================
// PROMPT E LIMPEZA DE RESPOSTA (LLMs)
// ============================================================================

/// Frases de "enfeite" que os LLMs adicionam antes da tradução
const BOILERPLATE_PHRASES: &[&str] = &[
    "แน่นอน",
    "นี่คือคำแปล",
    "แปลได้ว่า",
    "บรรทัดต่อบรรทัด",
    "Certainly",
    "Here is",
    "Translated text:",
];

/// Linhas maiores que isso nunca são removidas (provavelmente é conteúdo)
const BOILERPLATE_MAX_LEN: usize = 100;

/// Prompt enviado aos provedores LLM
pub fn build_prompt(text: &str, target_language: &str) -> String {
    format!(
        "Translate the following text into {target_language}.\n\
         Output ONLY the translation.\n\
         Keep the original line breaks.\n\
         No greetings, no explanations.\n\n\
         {text}"
    )
}

/// Remove linhas de enfeite e espaços das pontas
pub fn sanitize_response(response: &str) -> String {
    response
        .lines()
        .filter(|line| {
            line.chars().count() > BOILERPLATE_MAX_LEN
                || !BOILERPLATE_PHRASES.iter().any(|phrase| line.contains(phrase))
        })
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

// ============================================================================
// ROUTER
// ============================================================================

/// Prazo padrão de uma tradução
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Despacha o texto para o provedor configurado.
///
/// Os provedores são async (reqwest); o router tem seu próprio runtime Tokio
/// e bloqueia a thread do tick até a resposta ou o prazo.
pub struct TranslationRouter {
    provider: Box<dyn TranslationProvider>,
    runtime: tokio::runtime::Runtime,
    timeout: Duration,
}

impl TranslationRouter {
    pub fn new(provider: Box<dyn TranslationProvider>, timeout: Duration) -> anyhow::Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        Ok(TranslationRouter {
            provider,
            runtime,
            timeout,
        })
    }

    /// Monta o provedor escolhido no config (credenciais já resolvidas)
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let credentials = config.credentials.resolved();
        let model = config.translation.model_or_default();

        let provider: Box<dyn TranslationProvider> = match config.translation.provider {
            ProviderId::Google => Box::new(google::GoogleTranslate::new()),
            ProviderId::DeepL => Box::new(deepl::DeepLTranslator::new(credentials.deepl_api_key)),
            ProviderId::OpenAI => Box::new(openai::OpenAiTranslator::new(
                credentials.openai_api_key,
                model.clone(),
            )),
            ProviderId::Gemini => Box::new(gemini::GeminiTranslator::new(
                credentials.gemini_api_key,
                model.clone(),
            )),
        };

        info!("🌐 Tradutor: {} ({})", provider.name(), model);

        Self::new(
            provider,
            Duration::from_secs(config.translation.timeout_secs.max(1)),
        )
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Traduz de forma bloqueante. Nunca entra em pânico por erro de provedor.
    pub fn translate(&self, text: &str, target_language: &str) -> TranslationResult {
        info!("🌐 [{}] Traduzindo para {}...", self.provider.name(), target_language);

        let call = self.provider.translate(text, target_language);
        let outcome = self
            .runtime
            .block_on(async { tokio::time::timeout(self.timeout, call).await })
            .unwrap_or_else(|_| Err(TranslationError::Timeout(self.timeout)));

        let outcome = outcome.and_then(|raw| {
            let cleaned = match self.provider.kind() {
                ProviderKind::LanguageModel => sanitize_response(&raw),
                ProviderKind::MachineTranslation => raw.trim().to_string(),
            };
            if cleaned.is_empty() {
                Err(TranslationError::EmptyResponse)
            } else {
                Ok(cleaned)
            }
        });

        match outcome {
            Ok(text) => {
                info!("✅ [{}] Tradução concluída", self.provider.name());
                TranslationResult::Success(text)
            }
            Err(e) => {
                warn!("❌ [{}] {}", self.provider.name(), e);
                TranslationResult::Failure(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    struct MockProvider {
        kind: ProviderKind,
        reply: Result<String, String>,
        delay: Duration,
        calls: Mutex<Vec<(String, String)>>,
    }

    impl MockProvider {
        fn llm(reply: &str) -> Self {
            MockProvider {
                kind: ProviderKind::LanguageModel,
                reply: Ok(reply.to_string()),
                delay: Duration::ZERO,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl TranslationProvider for MockProvider {
        async fn translate(
            &self,
            text: &str,
            target_language: &str,
        ) -> Result<String, TranslationError> {
            self.calls
                .lock()
                .push((text.to_string(), target_language.to_string()));
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.reply.clone().map_err(|body| TranslationError::Api {
                provider: "mock",
                status: 500,
                body,
            })
        }

        fn kind(&self) -> ProviderKind {
            self.kind
        }

        fn name(&self) -> &str {
            "mock"
        }
    }

    fn router(provider: MockProvider) -> TranslationRouter {
        TranslationRouter::new(Box::new(provider), Duration::from_millis(200)).unwrap()
    }

    #[test]
    fn llm_boilerplate_is_stripped() {
        let router = router(MockProvider::llm(
            "Certainly! Here is the translation:\nSawasdee",
        ));
        assert_eq!(
            router.translate("Hello", "Thai"),
            TranslationResult::Success("Sawasdee".to_string())
        );
    }

    #[test]
    fn long_lines_with_phrases_survive_sanitizing() {
        let long = format!("Here is {}", "a".repeat(120));
        assert_eq!(sanitize_response(&format!("  {long}\n")), long);
        assert_eq!(sanitize_response("แน่นอน ครับ\nสวัสดี"), "สวัสดี");
        assert_eq!(sanitize_response("Line one\nLine two"), "Line one\nLine two");
    }

    #[test]
    fn machine_translation_is_not_sanitized() {
        let mut provider = MockProvider::llm("Here is the plan");
        provider.kind = ProviderKind::MachineTranslation;
        assert_eq!(
            router(provider).translate("x", "English"),
            TranslationResult::Success("Here is the plan".to_string())
        );
    }

    #[test]
    fn only_boilerplate_is_an_empty_response_failure() {
        let result = router(MockProvider::llm("Certainly!")).translate("Hi", "Thai");
        assert!(!result.is_success());
        assert_eq!(result.display_text(), "[Error]: resposta vazia do tradutor");
    }

    #[test]
    fn provider_error_becomes_failure() {
        let mut provider = MockProvider::llm("");
        provider.reply = Err("quota".to_string());

        let result = router(provider).translate("Hi", "Thai");
        assert!(result.display_text().starts_with("[Error]: "));
        assert!(result.display_text().contains("quota"));
    }

    #[test]
    fn slow_provider_times_out() {
        let mut provider = MockProvider::llm("late");
        provider.delay = Duration::from_secs(5);

        let result = router(provider).translate("Hi", "Thai");
        assert_eq!(
            result,
            TranslationResult::Failure(
                TranslationError::Timeout(Duration::from_millis(200)).to_string()
            )
        );
    }

    #[test]
    fn prompt_carries_target_and_text() {
        let prompt = build_prompt("Hello\nWorld", "Thai");
        assert!(prompt.contains("into Thai"));
        assert!(prompt.contains("Keep the original line breaks"));
        assert!(prompt.ends_with("Hello\nWorld"));
    }

    #[test]
    fn provider_ids_round_trip_through_config_names() {
        let id: ProviderId = serde_json::from_str("\"gemini\"").unwrap();
        assert_eq!(id, ProviderId::Gemini);
        assert_eq!(serde_json::to_string(&ProviderId::OpenAI).unwrap(), "\"openai\"");
        assert_eq!(ProviderId::Gemini.default_model(), "gemini-2.0-flash");
    }

    #[test]
    fn missing_key_fails_without_network() {
        let router = TranslationRouter::new(
            Box::new(gemini::GeminiTranslator::new(String::new(), "gemini-2.0-flash")),
            Duration::from_secs(1),
        )
        .unwrap();

        let result = router.translate("Hi", "Thai");
        assert_eq!(
            result,
            TranslationResult::Failure("Gemini API key não configurada".to_string())
        );
    }
}

// screen-translator/src/config.rs

// ============================================================================
// MÓDULO CONFIG - Configurações da aplicação
// ============================================================================
//
// Tudo fica em `config.json` no diretório de trabalho.
// - Campos ausentes recebem o valor padrão (`#[serde(default)]`)
// - Arquivo ausente ou corrompido = configuração padrão (com aviso)
// - API keys vazias caem nas variáveis de ambiente / .env, que nunca são
//   gravadas de volta no arquivo
//
// ============================================================================

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::novelty::{DedupPolicy, FilterSettings};
use crate::translator::{ProviderId, DEFAULT_TIMEOUT};

/// Caminho padrão do arquivo de configuração
pub const CONFIG_FILE: &str = "config.json";

/// Configuração do tradutor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationConfig {
    pub provider: ProviderId,
    /// Modelo do provedor (vazio = primeiro modelo da lista)
    pub model: String,
    /// Idioma de origem (nome legível, ex: "English")
    pub source_language: String,
    /// Idioma de destino (nome legível, ex: "Thai")
    pub target_language: String,
    /// Prazo de cada tradução, em segundos
    pub timeout_secs: u64,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        TranslationConfig {
            provider: ProviderId::Google,
            model: ProviderId::Google.default_model().to_string(),
            source_language: "English".to_string(),
            target_language: "Thai".to_string(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl TranslationConfig {
    /// Modelo salvo, se for válido para o provedor; senão o padrão do provedor
    pub fn model_or_default(&self) -> String {
        let models = self.provider.models();
        if models.contains(&self.model.as_str()) {
            self.model.clone()
        } else {
            self.provider.default_model().to_string()
        }
    }
}

/// API keys por provedor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialsConfig {
    pub gemini_api_key: String,
    pub openai_api_key: String,
    pub deepl_api_key: String,
}

impl CredentialsConfig {
    /// API keys: prioriza config.json, fallback pro ambiente (.env)
    pub fn resolved(&self) -> CredentialsConfig {
        CredentialsConfig {
            gemini_api_key: key_or_env(&self.gemini_api_key, "GEMINI_API_KEY"),
            openai_api_key: key_or_env(&self.openai_api_key, "OPENAI_API_KEY"),
            deepl_api_key: key_or_env(&self.deepl_api_key, "DEEPL_API_KEY"),
        }
    }
}

fn key_or_env(value: &str, var: &str) -> String {
    let value = value.trim();
    if !value.is_empty() {
        return value.to_string();
    }
    env::var(var).map(|v| v.trim().to_string()).unwrap_or_default()
}

/// Configuração do OCR
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Executável do Tesseract
    pub tesseract_path: PathBuf,
}

impl Default for OcrConfig {
    fn default() -> Self {
        let tesseract_path = if cfg!(windows) {
            PathBuf::from(r"C:\Program Files\Tesseract-OCR\tesseract.exe")
        } else {
            PathBuf::from("tesseract")
        };
        OcrConfig { tesseract_path }
    }
}

/// Configuração da captura contínua e da deduplicação
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Intervalo entre ticks automáticos
    pub auto_interval_ms: u64,
    pub dedup_policy: DedupPolicy,
    pub similarity_threshold: f64,
    pub min_remembered_key_len: usize,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        let filter = FilterSettings::default();
        CaptureConfig {
            auto_interval_ms: 1500,
            dedup_policy: filter.policy,
            similarity_threshold: filter.similarity_threshold,
            min_remembered_key_len: filter.min_remembered_key_len,
        }
    }
}

impl CaptureConfig {
    pub fn filter_settings(&self) -> FilterSettings {
        FilterSettings {
            policy: self.dedup_policy,
            similarity_threshold: self.similarity_threshold.clamp(0.0, 1.0),
            min_remembered_key_len: self.min_remembered_key_len,
        }
    }
}

/// Configuração da área de texto
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Arquivo sugerido para "Salvar"
    pub export_path: PathBuf,
    /// Exporta também o texto original
    pub export_both: bool,
    /// Fontes extras (tailandês, CJK...) carregadas se existirem
    pub fallback_fonts: Vec<PathBuf>,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            export_path: PathBuf::from("translations.txt"),
            export_both: false,
            fallback_fonts: default_fallback_fonts(),
        }
    }
}

fn default_fallback_fonts() -> Vec<PathBuf> {
    let candidates: &[&str] = if cfg!(windows) {
        &[
            r"C:\Windows\Fonts\tahoma.ttf",
            r"C:\Windows\Fonts\LeelawUI.ttf",
            r"C:\Windows\Fonts\YuGothM.ttc",
            r"C:\Windows\Fonts\malgun.ttf",
        ]
    } else if cfg!(target_os = "macos") {
        &[
            "/System/Library/Fonts/Supplemental/Thonburi.ttc",
            "/System/Library/Fonts/Hiragino Sans GB.ttc",
        ]
    } else {
        &[
            "/usr/share/fonts/truetype/noto/NotoSansThai-Regular.ttf",
            "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
            "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
        ]
    };
    candidates.iter().map(PathBuf::from).collect()
}

/// Estrutura principal de configuração
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub translation: TranslationConfig,
    pub credentials: CredentialsConfig,
    pub ocr: OcrConfig,
    pub capture: CaptureConfig,
    pub display: DisplayConfig,
}

impl AppConfig {
    /// Carrega configurações do arquivo. Nunca falha: qualquer problema vira padrão.
    pub fn load_from(path: &Path) -> Self {
        info!("📋 Carregando configurações de {}...", path.display());

        if !path.exists() {
            warn!("⚠️  {} não encontrado, usando valores padrão", path.display());
            return AppConfig::default();
        }

        let parsed = fs::read_to_string(path)
            .with_context(|| format!("Falha ao ler {}", path.display()))
            .and_then(|contents| {
                serde_json::from_str::<AppConfig>(&contents)
                    .with_context(|| format!("Falha ao parsear {}", path.display()))
            });

        match parsed {
            Ok(config) => {
                info!("✅ Configurações carregadas");
                info!(
                    "   🌐 Tradutor: {} ({})",
                    config.translation.provider.label(),
                    config.translation.model_or_default()
                );
                info!("   🔍 Tesseract: {}", config.ocr.tesseract_path.display());
                config
            }
            Err(e) => {
                warn!("⚠️  {:#}; usando valores padrão", e);
                AppConfig::default()
            }
        }
    }

    /// Salva configurações no arquivo
    pub fn save_to(&self, path: &Path) -> Result<()> {
        info!("💾 Salvando configurações...");

        let json =
            serde_json::to_string_pretty(self).context("Falha ao serializar configurações")?;

        fs::write(path, json).with_context(|| format!("Falha ao escrever {}", path.display()))?;

        info!("✅ Configurações salvas em {}", path.display());

        Ok(())
    }

    /// Resumo das credenciais disponíveis (config ou ambiente)
    pub fn log_credentials(&self) {
        let resolved = self.credentials.resolved();
        for (name, key) in [
            ("Gemini", &resolved.gemini_api_key),
            ("OpenAI", &resolved.openai_api_key),
            ("DeepL", &resolved.deepl_api_key),
        ] {
            if key.is_empty() {
                info!("   🔑 {}: ⏸️  Não configurado", name);
            } else {
                info!("   🔑 {}: ✅ Configurado", name);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("config.json"));
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.capture.auto_interval_ms, 1500);
        assert_eq!(config.translation.timeout_secs, 20);
        assert_eq!(config.capture.dedup_policy, DedupPolicy::LineCache);
    }

    #[test]
    fn malformed_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        assert_eq!(AppConfig::load_from(&path), AppConfig::default());
    }

    #[test]
    fn partial_file_fills_missing_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{ "translation": { "provider": "gemini", "model": "gemini-1.5-pro" },
                 "capture": { "dedup_policy": "block_similarity" } }"#,
        )
        .unwrap();

        let config = AppConfig::load_from(&path);
        assert_eq!(config.translation.provider, ProviderId::Gemini);
        assert_eq!(config.translation.model_or_default(), "gemini-1.5-pro");
        assert_eq!(config.translation.target_language, "Thai");
        assert_eq!(config.capture.dedup_policy, DedupPolicy::BlockSimilarity);
        assert_eq!(config.capture.auto_interval_ms, 1500);
    }

    #[test]
    fn save_then_load_keeps_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = AppConfig::default();
        config.translation.provider = ProviderId::OpenAI;
        config.credentials.openai_api_key = "sk-local".to_string();
        config.ocr.tesseract_path = PathBuf::from("/opt/tesseract");
        config.save_to(&path).unwrap();

        assert_eq!(AppConfig::load_from(&path), config);
    }

    #[test]
    fn model_from_another_provider_falls_back() {
        let config = TranslationConfig {
            provider: ProviderId::OpenAI,
            model: "gemini-2.0-flash".to_string(),
            ..TranslationConfig::default()
        };
        assert_eq!(config.model_or_default(), "gpt-4o");
    }

    #[test]
    fn explicit_key_wins_over_environment() {
        let credentials = CredentialsConfig {
            gemini_api_key: "  from-file ".to_string(),
            ..CredentialsConfig::default()
        };
        assert_eq!(credentials.resolved().gemini_api_key, "from-file");
    }

    #[test]
    fn similarity_threshold_is_clamped() {
        let capture = CaptureConfig {
            similarity_threshold: 3.0,
            ..CaptureConfig::default()
        };
        assert_eq!(capture.filter_settings().similarity_threshold, 1.0);
    }
}

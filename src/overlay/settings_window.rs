// screen-translator/src/overlay/settings_window.rs

// ============================================================================
// TELA DE CONFIGURAÇÕES
// ============================================================================
//
// Edita uma cópia (rascunho) da configuração. Só "Salvar" grava no
// config.json e reconstrói tradutor/OCR/filtro.
//
// ============================================================================

use eframe::egui;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use crate::app_state::AppState;
use crate::config::AppConfig;
use crate::novelty::DedupPolicy;
use crate::translator::ProviderId;

/// O que a tela pede para a janela principal depois do frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsAction {
    Stay,
    Close,
}

/// Rascunho editado na tela
pub struct SettingsDraft {
    config: AppConfig,
    tesseract_path: String,
    export_path: String,
    status: Option<(String, Instant)>,
}

impl SettingsDraft {
    pub fn from_config(config: AppConfig) -> Self {
        SettingsDraft {
            tesseract_path: config.ocr.tesseract_path.display().to_string(),
            export_path: config.display.export_path.display().to_string(),
            config,
            status: None,
        }
    }

    /// Configuração final com os campos de texto aplicados
    pub fn to_config(&self) -> AppConfig {
        let mut config = self.config.clone();
        config.ocr.tesseract_path = PathBuf::from(self.tesseract_path.trim());
        config.display.export_path = PathBuf::from(self.export_path.trim());
        config.translation.model = config.translation.model_or_default();
        config
    }

    /// Troca o provedor e volta o modelo para o padrão dele
    pub fn select_provider(&mut self, provider: ProviderId) {
        if self.config.translation.provider != provider {
            self.config.translation.provider = provider;
            self.config.translation.model = provider.default_model().to_string();
        }
    }
}

pub fn render_settings_window(
    ctx: &egui::Context,
    state: &AppState,
    draft: &mut SettingsDraft,
) -> SettingsAction {
    let mut action = SettingsAction::Stay;

    // ================================================================
    // FOOTER FIXO - Botões de ação
    // ================================================================
    egui::TopBottomPanel::bottom("settings_footer").show(ctx, |ui| {
        ui.add_space(8.0);
        ui.horizontal(|ui| {
            if ui.button("💾 Salvar").clicked() {
                let message = match state.apply_config(draft.to_config()) {
                    Ok(()) => "Salvo!".to_string(),
                    Err(e) => {
                        error!("❌ Erro ao salvar configurações: {:#}", e);
                        format!("Erro: {:#}", e)
                    }
                };
                draft.status = Some((message, Instant::now()));
            }

            if ui.button("↺ Recarregar").clicked() {
                *draft = SettingsDraft::from_config(AppConfig::load_from(&state.config_path));
                draft.status = Some(("Recarregado!".to_string(), Instant::now()));
            }

            // Status temporário (3 segundos)
            if let Some((message, at)) = &draft.status {
                if at.elapsed() < Duration::from_secs(3) {
                    ui.label(message);
                }
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Fechar").clicked() {
                    action = SettingsAction::Close;
                }
            });
        });
        ui.add_space(5.0);
    });

    egui::CentralPanel::default().show(ctx, |ui| {
        egui::ScrollArea::vertical().show(ui, |ui| {
            translation_section(ui, draft);
            ui.separator();
            credentials_section(ui, draft);
            ui.separator();
            capture_section(ui, draft);
            ui.separator();
            output_section(ui, draft);
        });
    });

    action
}

fn translation_section(ui: &mut egui::Ui, draft: &mut SettingsDraft) {
    ui.heading("🌐 Tradutor");

    let current = draft.config.translation.provider;
    egui::ComboBox::from_label("Provedor")
        .selected_text(current.label())
        .show_ui(ui, |ui| {
            for provider in ProviderId::ALL {
                if ui.selectable_label(provider == current, provider.label()).clicked() {
                    draft.select_provider(provider);
                }
            }
        });

    let translation = &mut draft.config.translation;
    egui::ComboBox::from_label("Modelo")
        .selected_text(translation.model.clone())
        .show_ui(ui, |ui| {
            for model in translation.provider.models() {
                ui.selectable_value(&mut translation.model, model.to_string(), *model);
            }
        });

    ui.add(
        egui::Slider::new(&mut translation.timeout_secs, 1..=120)
            .text("Prazo da tradução (s)"),
    );
}

fn credentials_section(ui: &mut egui::Ui, draft: &mut SettingsDraft) {
    ui.heading("🔑 API keys");
    ui.label("Vazio = usa GEMINI_API_KEY / OPENAI_API_KEY / DEEPL_API_KEY do ambiente");

    let credentials = &mut draft.config.credentials;
    for (label, key) in [
        ("Gemini", &mut credentials.gemini_api_key),
        ("OpenAI", &mut credentials.openai_api_key),
        ("DeepL", &mut credentials.deepl_api_key),
    ] {
        ui.horizontal(|ui| {
            ui.label(format!("{label}:"));
            ui.add(egui::TextEdit::singleline(key).password(true));
        });
    }
}

fn capture_section(ui: &mut egui::Ui, draft: &mut SettingsDraft) {
    ui.heading("📸 Captura e OCR");

    ui.horizontal(|ui| {
        ui.label("Tesseract:");
        ui.text_edit_singleline(&mut draft.tesseract_path);
    });

    let capture = &mut draft.config.capture;
    ui.add(
        egui::Slider::new(&mut capture.auto_interval_ms, 250..=10_000)
            .text("Intervalo automático (ms)"),
    );

    ui.horizontal(|ui| {
        ui.label("Deduplicação:");
        ui.radio_value(&mut capture.dedup_policy, DedupPolicy::LineCache, "Por linha");
        ui.radio_value(
            &mut capture.dedup_policy,
            DedupPolicy::BlockSimilarity,
            "Por similaridade do bloco",
        );
    });

    ui.add_enabled(
        capture.dedup_policy == DedupPolicy::BlockSimilarity,
        egui::Slider::new(&mut capture.similarity_threshold, 0.5..=1.0).text("Similaridade mínima"),
    );
    ui.add_enabled(
        capture.dedup_policy == DedupPolicy::LineCache,
        egui::Slider::new(&mut capture.min_remembered_key_len, 0..=100)
            .text("Lembrar linhas com mais de N caracteres"),
    );
}

fn output_section(ui: &mut egui::Ui, draft: &mut SettingsDraft) {
    ui.heading("💾 Exportação");

    ui.horizontal(|ui| {
        ui.label("Arquivo:");
        ui.text_edit_singleline(&mut draft.export_path);
    });
    ui.checkbox(&mut draft.config.display.export_both, "Incluir o texto original");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn switching_provider_resets_model() {
        let mut draft = SettingsDraft::from_config(AppConfig::default());
        draft.select_provider(ProviderId::Gemini);
        assert_eq!(draft.to_config().translation.model, "gemini-2.0-flash");

        draft.config.translation.model = "gemini-1.5-pro".to_string();
        draft.select_provider(ProviderId::Gemini);
        assert_eq!(draft.to_config().translation.model, "gemini-1.5-pro");
    }

    #[test]
    fn text_fields_become_paths() {
        let mut draft = SettingsDraft::from_config(AppConfig::default());
        draft.tesseract_path = "  /usr/local/bin/tesseract ".to_string();
        draft.export_path = "out/session.txt".to_string();

        let config = draft.to_config();
        assert_eq!(config.ocr.tesseract_path, PathBuf::from("/usr/local/bin/tesseract"));
        assert_eq!(config.display.export_path, PathBuf::from("out/session.txt"));
    }

    #[test]
    fn untouched_draft_round_trips() {
        let config = AppConfig::default();
        assert_eq!(SettingsDraft::from_config(config.clone()).to_config(), config);
    }
}

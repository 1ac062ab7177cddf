// screen-translator/src/overlay.rs

// ============================================================================
// MÓDULO OVERLAY - Janela principal (egui)
// ============================================================================
//
// Layout:
// - Topo: barra de controles + idiomas (com botão de inverter)
// - Centro: texto original (com caixa manual) | tradução (somente leitura)
// - Rodapé: status do último tick
//
// A janela nunca faz trabalho pesado: "traduzir agora" roda numa thread
// curta e o resultado chega pelos buffers compartilhados + canal de eventos.
//
// ============================================================================

pub mod area_selector;
pub mod fonts;
pub mod settings_window;

use anyhow::Result;
use crossbeam_channel::Receiver;
use eframe::egui;
use std::time::Duration;

use crate::app_state::AppState;
use crate::display::ExportScope;
use crate::language;
use crate::processing::{self, TickEvent};

use area_selector::{AreaSelector, SelectionStatus};
use settings_window::{SettingsAction, SettingsDraft};

/// Tela mostrada no momento
enum Screen {
    Main,
    SelectingArea(AreaSelector),
    Settings(SettingsDraft),
}

pub struct TranslatorApp {
    state: AppState,
    events: Receiver<TickEvent>,
    screen: Screen,
    /// Texto digitado para tradução sem captura
    manual_text: String,
    source_language: String,
    target_language: String,
    status: String,
}

impl TranslatorApp {
    pub fn new(cc: &eframe::CreationContext<'_>, state: AppState, events: Receiver<TickEvent>) -> Self {
        let config = state.config_snapshot();
        fonts::install_fallback_fonts(&cc.egui_ctx, &config.display.fallback_fonts);
        cc.egui_ctx.set_visuals(egui::Visuals::dark());

        TranslatorApp {
            state,
            events,
            screen: Screen::Main,
            manual_text: String::new(),
            source_language: config.translation.source_language,
            target_language: config.translation.target_language,
            status: "Selecione uma área para começar".to_string(),
        }
    }

    /// Último resultado de tick vira a linha de status
    fn drain_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            self.status = format!("{:?}: {}", event.trigger, event.outcome);
        }
    }

    fn swap_languages(&mut self) {
        std::mem::swap(&mut self.source_language, &mut self.target_language);
        self.state
            .set_languages(&self.source_language, &self.target_language);
    }

    fn export(&mut self) {
        if self.state.display.is_empty() {
            self.status = "💾 Nada para salvar".to_string();
            return;
        }

        let display = self.state.config_snapshot().display;
        let scope = if display.export_both {
            ExportScope::Both
        } else {
            ExportScope::TranslationOnly
        };

        self.status = match self.state.display.export(&display.export_path, scope) {
            Ok(()) => format!("💾 Salvo em {}", display.export_path.display()),
            Err(e) => {
                error!("❌ {:#}", e);
                format!("❌ {:#}", e)
            }
        };
    }

    // ========================================================================
    // BARRA DE CONTROLES
    // ========================================================================

    fn controls(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("🎯 Selecionar área").clicked() {
                match AreaSelector::open(ctx) {
                    Ok(selector) => self.screen = Screen::SelectingArea(selector),
                    Err(e) => {
                        error!("❌ Falha ao abrir seletor: {:#}", e);
                        self.status = format!("❌ {:#}", e);
                    }
                }
            }

            if ui.button("▶ Traduzir agora").clicked() {
                processing::spawn_manual(&self.state, self.manual_text.clone());
            }

            let auto_label = if self.state.auto_mode() {
                "🔁 Auto: ON"
            } else {
                "🔁 Auto: OFF"
            };
            if ui
                .selectable_label(self.state.auto_mode(), auto_label)
                .clicked()
            {
                self.state.toggle_auto_mode();
            }

            if ui.button("🧹 Limpar").clicked() {
                self.state.clear_all();
                self.manual_text.clear();
                self.status = "🧹 Limpo".to_string();
            }

            if ui.button("💾 Salvar").clicked() {
                self.export();
            }

            if ui.button("⚙ Configurações").clicked() {
                self.screen = Screen::Settings(SettingsDraft::from_config(self.state.config_snapshot()));
            }
        });

        ui.horizontal(|ui| {
            let mut changed = language_combo(ui, "source_language", &mut self.source_language);
            if ui.button("⇄").on_hover_text("Inverter idiomas").clicked() {
                self.swap_languages();
            }
            changed |= language_combo(ui, "target_language", &mut self.target_language);

            if changed {
                self.state
                    .set_languages(&self.source_language, &self.target_language);
            }
        });
    }

    fn main_screen(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            ui.add_space(4.0);
            self.controls(ctx, ui);
            ui.add_space(4.0);
        });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(self.status.as_str());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.weak(self.state.router().provider_name());
                    ui.separator();

                    let (pairs, _) = self.state.display.segment_counts();
                    let remembered = self.state.filter.lock().seen_len();
                    ui.weak(format!("{} traduções • {} linhas lembradas", pairs, remembered));

                    if self.state.gate.is_busy() {
                        ui.spinner();
                    }
                });
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| self.panes(ui));
    }

    // ========================================================================
    // PAINÉIS DE TEXTO
    // ========================================================================

    fn panes(&mut self, ui: &mut egui::Ui) {
        let source = self.state.display.source_text();
        let translation = self.state.display.translation_text();

        ui.columns(2, |columns| {
            columns[0].label("Original");
            columns[0].add(
                egui::TextEdit::multiline(&mut self.manual_text)
                    .hint_text("Digite ou cole um texto para traduzir sem captura")
                    .desired_rows(2)
                    .desired_width(f32::INFINITY),
            );
            read_only_pane(&mut columns[0], "source_pane", &source);

            columns[1].label("Tradução");
            read_only_pane(&mut columns[1], "translation_pane", &translation);
        });
    }
}

/// Combo de idiomas; devolve true se o usuário trocou a seleção
fn language_combo(ui: &mut egui::Ui, id: &str, selected: &mut String) -> bool {
    let mut changed = false;
    egui::ComboBox::from_id_source(id)
        .selected_text(selected.clone())
        .show_ui(ui, |ui| {
            for name in language::names() {
                changed |= ui
                    .selectable_value(selected, name.to_string(), name)
                    .changed();
            }
        });
    changed
}

fn read_only_pane(ui: &mut egui::Ui, id: &str, text: &str) {
    egui::ScrollArea::vertical()
        .id_source(id)
        .stick_to_bottom(true)
        .auto_shrink([false, false])
        .show(ui, |ui| {
            let mut text = text;
            ui.add(
                egui::TextEdit::multiline(&mut text)
                    .desired_width(f32::INFINITY)
                    .desired_rows(12),
            );
        });
}

impl eframe::App for TranslatorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_events();

        match &mut self.screen {
            Screen::SelectingArea(selector) => {
                if let SelectionStatus::Finished(region) = selector.show(ctx) {
                    if let Some(region) = region {
                        self.state.region.replace(region);
                        self.status = format!(
                            "🎯 Área: {}x{} em ({}, {})",
                            region.width, region.height, region.x, region.y
                        );
                    }
                    self.screen = Screen::Main;
                }
            }
            Screen::Settings(draft) => {
                if settings_window::render_settings_window(ctx, &self.state, draft)
                    == SettingsAction::Close
                {
                    // Idiomas podem ter sido recarregados do disco
                    let config = self.state.config_snapshot();
                    self.source_language = config.translation.source_language;
                    self.target_language = config.translation.target_language;
                    self.screen = Screen::Main;
                }
            }
            Screen::Main => self.main_screen(ctx),
        }

        // Ticks em background mudam os buffers sem evento de input
        ctx.request_repaint_after(Duration::from_millis(200));
    }
}

/// Abre a janela principal e bloqueia até ela ser fechada
pub fn run(state: AppState, events: Receiver<TickEvent>) -> Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Screen Translator")
            .with_inner_size([900.0, 520.0])
            .with_min_inner_size([520.0, 300.0])
            .with_always_on_top(),
        ..Default::default()
    };

    eframe::run_native(
        "Screen Translator",
        options,
        Box::new(move |cc| Ok(Box::new(TranslatorApp::new(cc, state, events)) as Box<dyn eframe::App>)),
    )
    .map_err(|e| anyhow::anyhow!("Falha ao abrir a janela: {}", e))
}

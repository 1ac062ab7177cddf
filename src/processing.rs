// screen-translator/src/processing.rs

// ============================================================================
// MÓDULO PROCESSING - Um tick do pipeline
// ============================================================================
// captura → pré-processamento → OCR → filtro de novidade → tradução → exibição
//
// Todo tick passa pelo gate de execução única. Nada aqui é fatal: cada
// saída vira um `TickOutcome`, que vai para o log e para a barra de status.
// ============================================================================

use std::fmt;
use std::thread;

use crate::app_state::AppState;
use crate::display;
use crate::ocr;
use crate::preprocess;

/// Origem do tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Botão "traduzir agora": ignora o filtro de novidade
    Manual,
    /// Loop automático: só traduz texto novo
    Auto,
}

/// Como o tick terminou
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// Outro tick já estava rodando; este foi descartado
    Busy,
    NoRegion,
    CaptureFailed,
    NothingExtracted,
    /// Texto já exibido
    Duplicate,
    Translated,
    TranslationFailed(String),
    /// "Limpar" aconteceu durante a tradução; resultado jogado fora
    Discarded,
}

impl fmt::Display for TickOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TickOutcome::Busy => write!(f, "⏳ Ocupado"),
            TickOutcome::NoRegion => write!(f, "🎯 Nenhuma área selecionada"),
            TickOutcome::CaptureFailed => write!(f, "❌ Falha na captura"),
            TickOutcome::NothingExtracted => write!(f, "🔍 Nenhum texto encontrado"),
            TickOutcome::Duplicate => write!(f, "🔁 Sem texto novo"),
            TickOutcome::Translated => write!(f, "✅ Traduzido"),
            TickOutcome::TranslationFailed(message) => write!(f, "❌ {}", message),
            TickOutcome::Discarded => write!(f, "🧹 Resultado descartado (limpo durante a tradução)"),
        }
    }
}

/// Evento enviado para a UI ao fim de cada tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickEvent {
    pub trigger: Trigger,
    pub outcome: TickOutcome,
}

// ============================================================================
// TICK DE CAPTURA
// ============================================================================

/// Executa um tick completo. Bloqueia a thread atual até terminar.
pub fn run_tick(state: &AppState, trigger: Trigger) -> TickOutcome {
    let outcome = match state.gate.try_acquire() {
        Some(_guard) => capture_and_translate(state, trigger),
        None => {
            debug!("⏳ Tick {:?} descartado: outro tick em andamento", trigger);
            TickOutcome::Busy
        }
    };

    state.report(TickEvent {
        trigger,
        outcome: outcome.clone(),
    });
    outcome
}

fn capture_and_translate(state: &AppState, trigger: Trigger) -> TickOutcome {
    let session = state.session();

    let Some(region) = state.region.get() else {
        debug!("🎯 Nenhuma região selecionada");
        return TickOutcome::NoRegion;
    };

    let (source_language, target_language) = {
        let config = state.config.lock();
        (
            config.translation.source_language.clone(),
            config.translation.target_language.clone(),
        )
    };

    // [1/4] Captura
    debug!("📸 [1/4] Capturando região...");
    let image = match state.capturer().capture(&region) {
        Ok(image) => image,
        Err(e) => {
            warn!("❌ Falha na captura: {:#}", e);
            return TickOutcome::CaptureFailed;
        }
    };

    // [2/4] OCR
    debug!("🔍 [2/4] Executando OCR...");
    let processed = preprocess::prepare_for_ocr(&image);
    let lines = ocr::recognize_lines(state.ocr().as_ref(), &processed, &source_language);
    if lines.is_empty() {
        return TickOutcome::NothingExtracted;
    }

    // [3/4] Filtro de novidade
    let admission = {
        let filter = state.filter.lock();
        match trigger {
            Trigger::Manual => filter.admit_all(&lines),
            Trigger::Auto => filter.evaluate(&lines),
        }
    };
    let Some(admission) = admission else {
        debug!("🔁 Nada novo na captura");
        return TickOutcome::Duplicate;
    };

    // [4/4] Tradução
    info!("🌐 [4/4] Traduzindo {} linha(s)...", admission.text.lines().count());
    let result = state.router().translate(&admission.text, &target_language);

    // Buffers e filtro só são gravados se ninguém limpou nesse meio tempo
    let mut filter = state.filter.lock();
    if state.session() != session {
        info!("🧹 Tela limpa durante a tradução; resultado descartado");
        return TickOutcome::Discarded;
    }

    state
        .display
        .append_pair(&admission.text, &result.display_text());

    if result.is_success() {
        filter.commit(&admission);
        TickOutcome::Translated
    } else {
        // Mesma captura não é reenviada até a tela mudar (ou clique manual)
        filter.record_failure(&admission);
        TickOutcome::TranslationFailed(result.display_text())
    }
}

// ============================================================================
// TRADUÇÃO SÓ DE TEXTO
// ============================================================================

/// Traduz o texto digitado na caixa manual (sem captura nem filtro)
pub fn translate_text(state: &AppState, text: &str) -> TickOutcome {
    let outcome = match state.gate.try_acquire() {
        Some(_guard) => {
            let text = display::strip_markers(text);
            if text.is_empty() {
                TickOutcome::NothingExtracted
            } else {
                let session = state.session();
                let target_language = state.config.lock().translation.target_language.clone();
                info!("🌐 Traduzindo texto manual para {}...", target_language);

                let result = state.router().translate(&text, &target_language);

                let _filter = state.filter.lock();
                if state.session() != session {
                    TickOutcome::Discarded
                } else {
                    state.display.append_pair(&text, &result.display_text());
                    if result.is_success() {
                        TickOutcome::Translated
                    } else {
                        TickOutcome::TranslationFailed(result.display_text())
                    }
                }
            }
        }
        None => TickOutcome::Busy,
    };

    state.report(TickEvent {
        trigger: Trigger::Manual,
        outcome: outcome.clone(),
    });
    outcome
}

/// "Traduzir agora" da UI: roda numa thread curta para a janela não travar.
/// Sem região e com texto na caixa manual, traduz só o texto.
pub fn spawn_manual(state: &AppState, manual_text: String) {
    let state = state.clone();
    thread::spawn(move || {
        if !state.region.is_set() && !display::strip_markers(&manual_text).is_empty() {
            translate_text(&state, &manual_text);
        } else {
            run_tick(&state, Trigger::Manual);
        }
    });
}

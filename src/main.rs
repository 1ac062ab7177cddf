// screen-translator/src/main.rs

// ============================================================================
// SCREEN TRANSLATOR - Captura, OCR e tradução de uma área da tela
// ============================================================================
//
// Threads:
// - Main: janela egui (overlay)
// - Loop automático: dispara ticks no intervalo configurado
// - Ticks manuais: uma thread curta por clique em "Traduzir agora"
//
// ============================================================================

#[macro_use]
extern crate log;

// ============================================================================
// DECLARAÇÃO DE MÓDULOS
// ============================================================================
mod app_state;
mod config;
mod display;
mod language;
mod novelty;
mod ocr;
mod overlay;
mod preprocess;
mod processing;
mod region;
mod runtime;
mod screenshot;
mod translator;

use anyhow::Result;
use crossbeam_channel::unbounded;
use std::path::PathBuf;

use app_state::AppState;
use config::{AppConfig, CONFIG_FILE};
use processing::TickEvent;

fn main() -> Result<()> {
    // .env é opcional: só serve de fallback para as API keys
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("🌐 ============================================");
    info!("🌐 SCREEN TRANSLATOR - OCR + Tradução");
    info!("🌐 ============================================");
    info!("");

    let config_path = PathBuf::from(CONFIG_FILE);
    let config = AppConfig::load_from(&config_path);
    config.log_credentials();
    info!(
        "   🗣️  Idiomas: {} → {}",
        config.translation.source_language, config.translation.target_language
    );

    info!("⚙️  Configurando sistema...");

    let (event_sender, event_receiver) = unbounded::<TickEvent>();
    let state = AppState::from_config(config, config_path, event_sender)?;

    let mut auto_loop = runtime::auto_loop::start_auto_loop(state.clone());

    info!("✅ Sistema pronto!");
    info!("🎯 Clique em \"Selecionar área\" e depois em \"Traduzir agora\" ou ligue o modo Auto");
    info!("");

    // ========================================================================
    // JANELA NA MAIN THREAD
    // ========================================================================
    let result = overlay::run(state, event_receiver);

    auto_loop.stop();
    info!("👋 Encerrado");

    result
}

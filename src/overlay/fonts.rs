// screen-translator/src/overlay/fonts.rs

// ============================================================================
// FONTES DA JANELA
// ============================================================================
//
// As fontes embutidas do egui não têm tailandês nem CJK. As fontes listadas
// no config entram como fallback nas famílias proporcional e monoespaçada;
// as que não existem na máquina são ignoradas.
//
// ============================================================================

use eframe::egui;
use std::fs;
use std::path::PathBuf;

/// Lê as fontes que existem: (nome, bytes)
pub fn read_fallback_fonts(paths: &[PathBuf]) -> Vec<(String, Vec<u8>)> {
    paths
        .iter()
        .filter(|path| path.exists())
        .filter_map(|path| match fs::read(path) {
            Ok(bytes) => {
                let name = path
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                Some((name, bytes))
            }
            Err(e) => {
                warn!("⚠️  Erro ao ler fonte {}: {}", path.display(), e);
                None
            }
        })
        .collect()
}

/// Instala as fontes de fallback no contexto do egui
pub fn install_fallback_fonts(ctx: &egui::Context, paths: &[PathBuf]) {
    let loaded = read_fallback_fonts(paths);
    if loaded.is_empty() {
        warn!("⚠️  Nenhuma fonte de fallback encontrada; tailandês/CJK podem não aparecer");
        return;
    }

    let mut fonts = egui::FontDefinitions::default();

    for (name, bytes) in loaded {
        info!("🔤 Fonte de fallback: {}", name);
        fonts
            .font_data
            .insert(name.clone(), egui::FontData::from_owned(bytes));

        for family in [egui::FontFamily::Proportional, egui::FontFamily::Monospace] {
            fonts.families.entry(family).or_default().push(name.clone());
        }
    }

    ctx.set_fonts(fonts);
}

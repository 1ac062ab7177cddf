// screen-translator/src/display.rs

// ============================================================================
// MÓDULO DISPLAY - Buffers de texto original e tradução
// ============================================================================
//
// Dois buffers "só acrescenta": cada tick aceito adiciona um segmento no
// original (●) e um na tradução (➤). Os dois sempre têm a mesma quantidade
// de segmentos; a única remoção é o "limpar" do usuário.
//
// ============================================================================

use anyhow::{Context, Result};
use parking_lot::Mutex;
use std::fs;
use std::path::Path;
use std::sync::Arc;

pub const SOURCE_MARKER: &str = "●";
pub const TRANSLATION_MARKER: &str = "➤";

/// Um bloco de texto com seu marcador
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub marker: &'static str,
    pub content: String,
}

impl Segment {
    fn render(&self) -> String {
        format!("{} {}", self.marker, self.content)
    }
}

/// O que vai para o arquivo exportado
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportScope {
    TranslationOnly,
    Both,
}

#[derive(Debug, Default)]
struct Buffers {
    source: Vec<Segment>,
    translation: Vec<Segment>,
}

/// Buffers compartilhados entre o tick (escrita) e a UI (leitura)
#[derive(Debug, Clone, Default)]
pub struct DisplaySink {
    buffers: Arc<Mutex<Buffers>>,
}

impl DisplaySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acrescenta o par (original, tradução) de uma vez só
    pub fn append_pair(&self, source: &str, translation: &str) {
        let mut buffers = self.buffers.lock();
        buffers.source.push(Segment {
            marker: SOURCE_MARKER,
            content: source.trim().to_string(),
        });
        buffers.translation.push(Segment {
            marker: TRANSLATION_MARKER,
            content: translation.trim().to_string(),
        });
    }

    /// Texto do painel de origem
    pub fn source_text(&self) -> String {
        render(&self.buffers.lock().source)
    }

    /// Texto do painel de tradução
    pub fn translation_text(&self) -> String {
        render(&self.buffers.lock().translation)
    }

    /// (segmentos de origem, segmentos de tradução)
    pub fn segment_counts(&self) -> (usize, usize) {
        let buffers = self.buffers.lock();
        (buffers.source.len(), buffers.translation.len())
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.lock().source.is_empty()
    }

    pub fn clear(&self) {
        let mut buffers = self.buffers.lock();
        buffers.source.clear();
        buffers.translation.clear();
    }

    /// Grava o conteúdo em UTF-8 texto puro
    pub fn export(&self, path: &Path, scope: ExportScope) -> Result<()> {
        let contents = match scope {
            ExportScope::TranslationOnly => self.translation_text(),
            ExportScope::Both => {
                let buffers = self.buffers.lock();
                buffers
                    .source
                    .iter()
                    .zip(&buffers.translation)
                    .map(|(source, translation)| {
                        format!("{}\n{}", source.render(), translation.render())
                    })
                    .collect::<Vec<_>>()
                    .join("\n\n")
            }
        };

        fs::write(path, contents)
            .with_context(|| format!("Falha ao exportar para {}", path.display()))?;

        info!("💾 Texto exportado para {}", path.display());
        Ok(())
    }
}

/// Segmentos separados por uma linha em branco
fn render(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(Segment::render)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Remove os marcadores de um texto colado de volta na caixa manual
pub fn strip_markers(text: &str) -> String {
    text.replace(SOURCE_MARKER, "")
        .replace(TRANSLATION_MARKER, "")
        .trim()
        .to_string()
}

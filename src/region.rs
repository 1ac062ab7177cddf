// screen-translator/src/region.rs

// ============================================================================
// MÓDULO REGION - Região de captura escolhida pelo usuário
// ============================================================================
//
// A região é sempre substituída inteira (nunca editada campo a campo).
// Cada tick lê uma cópia dela no início da execução.
//
// ============================================================================

use parking_lot::Mutex;
use std::sync::Arc;

/// Retângulo da tela que será capturado a cada tick (pixels físicos)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CaptureRegion {
    /// Cria uma região válida. Largura ou altura zero não formam uma região.
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }

        Some(CaptureRegion {
            x,
            y,
            width,
            height,
        })
    }

    /// Verifica se a região cabe inteira numa tela `screen_width` x `screen_height`
    pub fn fits_within(&self, screen_width: u32, screen_height: u32) -> bool {
        self.x.checked_add(self.width).is_some_and(|right| right <= screen_width)
            && self
                .y
                .checked_add(self.height)
                .is_some_and(|bottom| bottom <= screen_height)
    }
}

/// Guarda a região atual (ou nenhuma, antes da primeira seleção)
#[derive(Clone, Default)]
pub struct RegionStore {
    current: Arc<Mutex<Option<CaptureRegion>>>,
}

impl RegionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Substitui a região atual
    pub fn replace(&self, region: CaptureRegion) {
        info!(
            "🎯 Nova região: {}x{} na posição ({}, {})",
            region.width, region.height, region.x, region.y
        );
        *self.current.lock() = Some(region);
    }

    pub fn get(&self) -> Option<CaptureRegion> {
        *self.current.lock()
    }

    pub fn is_set(&self) -> bool {
        self.current.lock().is_some()
    }
}

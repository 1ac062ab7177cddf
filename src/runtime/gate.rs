// screen-translator/src/runtime/gate.rs

// ============================================================================
// GATE DE EXECUÇÃO ÚNICA
// ============================================================================
//
// Flag atômica com compare-and-set. Quem consegue o guard roda o tick;
// quem chega enquanto o gate está ocupado é descartado (sem fila).
// O guard libera o gate no Drop, inclusive durante um pânico.
//
// ============================================================================

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct InFlightGate {
    busy: Arc<AtomicBool>,
}

impl InFlightGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// IDLE → BUSY. `None` se já existe um tick rodando.
    pub fn try_acquire(&self) -> Option<TickGuard> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| TickGuard {
                busy: Arc::clone(&self.busy),
            })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Mantém o gate ocupado enquanto existir
#[derive(Debug)]
pub struct TickGuard {
    busy: Arc<AtomicBool>,
}

impl Drop for TickGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

// screen-translator/src/runtime.rs

// ============================================================================
// MÓDULO RUNTIME - Agendamento dos ticks
// ============================================================================
// - gate: garante que só um tick roda por vez (manual ou automático)
// - auto_loop: thread de background do modo automático
// ============================================================================

pub mod auto_loop;
pub mod gate;

// screen-translator/src/runtime/auto_loop.rs

// ============================================================================
// THREAD DO MODO AUTOMÁTICO (roda em background)
// ============================================================================
//
// Acorda a cada 100ms; com o modo automático ligado e o intervalo vencido,
// dispara um tick. Um tick que entra em pânico é registrado no log e o loop
// continua.
//
// ============================================================================

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::app_state::AppState;
use crate::processing::{self, Trigger};

/// Frequência com que o loop verifica flags e intervalo
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Controle da thread do loop automático
pub struct AutoLoopHandle {
    stop: Arc<AtomicBool>,
    thread: Option<JoinHandle<()>>,
}

impl AutoLoopHandle {
    /// Pede para o loop parar e espera a thread terminar
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                error!("❌ Thread do modo automático terminou com pânico");
            }
        }
    }
}

impl Drop for AutoLoopHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

pub fn start_auto_loop(state: AppState) -> AutoLoopHandle {
    let stop = Arc::new(AtomicBool::new(false));
    let stop_flag = Arc::clone(&stop);

    let thread = thread::spawn(move || {
        info!("🔁 Thread do modo automático iniciada");
        let mut last_tick: Option<Instant> = None;

        while !stop_flag.load(Ordering::Acquire) {
            thread::sleep(POLL_INTERVAL);

            if !state.auto_mode() {
                continue;
            }

            let interval = Duration::from_millis(state.config.lock().capture.auto_interval_ms);
            if last_tick.is_some_and(|at| at.elapsed() < interval) {
                continue;
            }
            last_tick = Some(Instant::now());

            let tick = panic::catch_unwind(AssertUnwindSafe(|| {
                processing::run_tick(&state, Trigger::Auto)
            }));

            match tick {
                Ok(outcome) => trace!("🔁 Tick automático: {}", outcome),
                Err(_) => error!("❌ Tick automático entrou em pânico; continuando"),
            }
        }

        info!("🔁 Thread do modo automático encerrada");
    });

    AutoLoopHandle {
        stop,
        thread: Some(thread),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_state::testing::*;
    use crate::config::AppConfig;

    fn fast_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.capture.auto_interval_ms = 10;
        config
    }

    fn wait_until(deadline: Duration, condition: impl Fn() -> bool) -> bool {
        let start = Instant::now();
        while start.elapsed() < deadline {
            if condition() {
                return true;
            }
            thread::sleep(Duration::from_millis(20));
        }
        condition()
    }

    #[test]
    fn loop_is_idle_while_auto_mode_is_off() {
        let h = harness(HarnessOptions {
            ocr_outputs: &["Hello"],
            config: fast_config(),
            ..HarnessOptions::default()
        });
        select_region(&h.state);

        let mut handle = start_auto_loop(h.state.clone());
        thread::sleep(Duration::from_millis(350));
        handle.stop();

        assert!(h.calls.lock().is_empty());
    }

    #[test]
    fn repeated_capture_is_translated_once() {
        let h = harness(HarnessOptions {
            ocr_outputs: &["Hello\nWorld"],
            config: fast_config(),
            ..HarnessOptions::default()
        });
        select_region(&h.state);
        h.state.set_auto_mode(true);

        let mut handle = start_auto_loop(h.state.clone());
        assert!(wait_until(Duration::from_secs(3), || {
            h.ocr_calls.load(Ordering::SeqCst) >= 4
        }));
        handle.stop();

        assert_eq!(h.calls.lock().len(), 1);
        assert_eq!(h.state.display.segment_counts(), (1, 1));
    }

    #[test]
    fn panicking_tick_does_not_kill_the_loop() {
        let h = harness(HarnessOptions {
            ocr_outputs: &["PANIC", "Still alive"],
            config: fast_config(),
            ..HarnessOptions::default()
        });
        select_region(&h.state);
        h.state.set_auto_mode(true);

        let mut handle = start_auto_loop(h.state.clone());
        let translated = wait_until(Duration::from_secs(3), || !h.calls.lock().is_empty());
        handle.stop();

        assert!(translated);
        assert_eq!(h.calls.lock().as_slice(), ["Still alive"]);
        assert!(!h.state.gate.is_busy());
    }

    #[test]
    fn stop_joins_the_thread() {
        let h = harness(HarnessOptions::default());
        let mut handle = start_auto_loop(h.state.clone());
        handle.stop();
        assert!(handle.thread.is_none());
        // Segundo stop não faz nada
        handle.stop();
    }
}

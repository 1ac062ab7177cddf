// screen-translator/src/app_state.rs

// ============================================================================
// MÓDULO APP STATE - Estado compartilhado da aplicação
// ============================================================================
// Criado uma vez no início e clonado para cada thread (UI, loop automático,
// ticks manuais). Tudo aqui dentro é Arc, então os clones compartilham o
// mesmo estado:
// - config + caminho do config.json
// - região de captura
// - filtro de novidade (LastLineKey / SeenSet)
// - buffers de exibição
// - gate de execução única + flag do modo automático
// - colaboradores (captura, OCR, tradutor)
// ============================================================================

use anyhow::Result;
use crossbeam_channel::Sender;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::display::DisplaySink;
use crate::novelty::NoveltyFilter;
use crate::ocr::{OcrEngine, TesseractEngine};
use crate::processing::TickEvent;
use crate::region::RegionStore;
use crate::runtime::gate::InFlightGate;
use crate::screenshot::{PrimaryScreenCapturer, ScreenCapturer};
use crate::translator::TranslationRouter;

/// Implementações externas usadas pelo tick
pub struct Collaborators {
    pub capturer: Arc<dyn ScreenCapturer>,
    pub ocr: Arc<dyn OcrEngine>,
    pub router: TranslationRouter,
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Mutex<AppConfig>>,
    pub config_path: PathBuf,
    pub region: RegionStore,
    pub filter: Arc<Mutex<NoveltyFilter>>,
    pub display: DisplaySink,
    pub gate: InFlightGate,
    auto_mode: Arc<AtomicBool>,
    /// Incrementado a cada "limpar"; ticks de uma sessão antiga não gravam nada
    session: Arc<AtomicU64>,
    capturer: Arc<dyn ScreenCapturer>,
    ocr: Arc<Mutex<Arc<dyn OcrEngine>>>,
    router: Arc<Mutex<Arc<TranslationRouter>>>,
    events: Sender<TickEvent>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        config_path: PathBuf,
        collaborators: Collaborators,
        events: Sender<TickEvent>,
    ) -> Self {
        let filter = NoveltyFilter::new(config.capture.filter_settings());

        AppState {
            config: Arc::new(Mutex::new(config)),
            config_path,
            region: RegionStore::new(),
            filter: Arc::new(Mutex::new(filter)),
            display: DisplaySink::new(),
            gate: InFlightGate::new(),
            auto_mode: Arc::new(AtomicBool::new(false)),
            session: Arc::new(AtomicU64::new(0)),
            capturer: collaborators.capturer,
            ocr: Arc::new(Mutex::new(collaborators.ocr)),
            router: Arc::new(Mutex::new(Arc::new(collaborators.router))),
            events,
        }
    }

    /// Monta os colaboradores reais (tela principal, Tesseract, provedor do config)
    pub fn from_config(
        config: AppConfig,
        config_path: PathBuf,
        events: Sender<TickEvent>,
    ) -> Result<Self> {
        let collaborators = Collaborators {
            capturer: Arc::new(PrimaryScreenCapturer),
            ocr: Arc::new(TesseractEngine::new(config.ocr.tesseract_path.clone())),
            router: TranslationRouter::from_config(&config)?,
        };

        Ok(Self::new(config, config_path, collaborators, events))
    }

    pub fn capturer(&self) -> &dyn ScreenCapturer {
        self.capturer.as_ref()
    }

    pub fn ocr(&self) -> Arc<dyn OcrEngine> {
        Arc::clone(&self.ocr.lock())
    }

    pub fn router(&self) -> Arc<TranslationRouter> {
        Arc::clone(&self.router.lock())
    }

    /// Cópia da configuração atual
    pub fn config_snapshot(&self) -> AppConfig {
        self.config.lock().clone()
    }

    // ------------------------------------------------------------------------
    // MODO AUTOMÁTICO
    // ------------------------------------------------------------------------

    pub fn auto_mode(&self) -> bool {
        self.auto_mode.load(Ordering::Acquire)
    }

    pub fn set_auto_mode(&self, enabled: bool) {
        self.auto_mode.store(enabled, Ordering::Release);
        if enabled {
            info!("🔁 Modo automático: ✅ ATIVADO");
        } else {
            info!("🔁 Modo automático: ❌ DESATIVADO");
        }
    }

    /// Inverte o modo automático e devolve o novo valor
    pub fn toggle_auto_mode(&self) -> bool {
        let enabled = !self.auto_mode();
        self.set_auto_mode(enabled);
        enabled
    }

    // ------------------------------------------------------------------------
    // AÇÕES DO USUÁRIO
    // ------------------------------------------------------------------------

    /// Sessão atual de exibição (muda a cada "limpar")
    pub fn session(&self) -> u64 {
        self.session.load(Ordering::Acquire)
    }

    /// "Limpar": esvazia os buffers e o histórico de deduplicação.
    /// Usa o mesmo lock do filtro que o tick segura para gravar, então um
    /// tick em andamento ou grava antes do clear ou descarta o resultado.
    pub fn clear_all(&self) {
        let mut filter = self.filter.lock();
        self.session.fetch_add(1, Ordering::AcqRel);
        self.display.clear();
        filter.clear();
    }

    /// Aplica uma configuração confirmada na tela de configurações:
    /// grava no disco e reconstrói tradutor, OCR e filtro.
    pub fn apply_config(&self, new_config: AppConfig) -> Result<()> {
        new_config.save_to(&self.config_path)?;

        let router = TranslationRouter::from_config(&new_config)?;
        *self.router.lock() = Arc::new(router);
        *self.ocr.lock() = Arc::new(TesseractEngine::new(new_config.ocr.tesseract_path.clone()));
        self.filter
            .lock()
            .update_settings(new_config.capture.filter_settings());

        *self.config.lock() = new_config;
        info!("✅ Nova configuração aplicada");
        Ok(())
    }

    /// Troca só os idiomas (combos da barra principal), sem gravar no disco.
    /// O de origem é a dica do OCR; o de destino vai para o tradutor.
    pub fn set_languages(&self, source: &str, target: &str) {
        let mut config = self.config.lock();
        config.translation.source_language = source.to_string();
        config.translation.target_language = target.to_string();
    }

    pub(crate) fn report(&self, event: TickEvent) {
        // UI fechada = ninguém ouvindo; não é erro
        let _ = self.events.send(event);
    }
}

// ============================================================================
// FAKES PARA TESTES
// ============================================================================

#[cfg(test)]
pub mod testing {
    use super::*;
    use async_trait::async_trait;
    use crossbeam_channel::Receiver;
    use image::{DynamicImage, GrayImage, RgbImage};
    use std::collections::VecDeque;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    use crate::region::CaptureRegion;
    use crate::translator::{ProviderKind, TranslationError, TranslationProvider};

    pub struct FakeCapturer {
        pub fail: bool,
    }

    impl ScreenCapturer for FakeCapturer {
        fn capture(&self, region: &CaptureRegion) -> Result<DynamicImage> {
            if self.fail {
                anyhow::bail!("monitor desconectado");
            }
            Ok(DynamicImage::ImageRgb8(RgbImage::new(region.width, region.height)))
        }
    }

    /// Devolve as saídas na ordem; depois repete a última.
    /// `"PANIC"` faz o motor entrar em pânico.
    pub struct ScriptedOcr {
        outputs: Mutex<VecDeque<String>>,
        last: Mutex<String>,
    }

    impl ScriptedOcr {
        pub fn new(outputs: &[&str]) -> Self {
            ScriptedOcr {
                outputs: Mutex::new(outputs.iter().map(|s| s.to_string()).collect()),
                last: Mutex::new(String::new()),
            }
        }
    }

    impl OcrEngine for ScriptedOcr {
        fn recognize(&self, _image: &GrayImage, _language_code: &str) -> Result<String> {
            let next = self.outputs.lock().pop_front();
            let output = match next {
                Some(output) if output == "PANIC" => output,
                Some(output) => {
                    *self.last.lock() = output.clone();
                    output
                }
                None => self.last.lock().clone(),
            };
            if output == "PANIC" {
                panic!("motor de OCR quebrou");
            }
            Ok(output)
        }
    }

    /// Provedor que registra as chamadas e responde "<alvo>: <texto>"
    pub struct RecordingProvider {
        pub calls: Arc<Mutex<Vec<String>>>,
        pub fail: bool,
        pub delay: Duration,
    }

    #[async_trait]
    impl TranslationProvider for RecordingProvider {
        async fn translate(
            &self,
            text: &str,
            target_language: &str,
        ) -> Result<String, TranslationError> {
            self.calls.lock().push(text.to_string());
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            if self.fail {
                return Err(TranslationError::Api {
                    provider: "recording",
                    status: 503,
                    body: "indisponível".to_string(),
                });
            }
            Ok(format!("{target_language}: {text}"))
        }

        fn kind(&self) -> ProviderKind {
            ProviderKind::MachineTranslation
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    pub struct Harness {
        pub state: AppState,
        pub calls: Arc<Mutex<Vec<String>>>,
        pub events: Receiver<TickEvent>,
        pub ocr_calls: Arc<AtomicUsize>,
    }

    pub struct HarnessOptions<'a> {
        pub ocr_outputs: &'a [&'a str],
        pub capture_fails: bool,
        pub translation_fails: bool,
        pub translation_delay: Duration,
        pub config: AppConfig,
    }

    impl Default for HarnessOptions<'_> {
        fn default() -> Self {
            HarnessOptions {
                ocr_outputs: &[],
                capture_fails: false,
                translation_fails: false,
                translation_delay: Duration::ZERO,
                config: AppConfig::default(),
            }
        }
    }

    /// Conta chamadas ao OCR antes de delegar
    struct CountingOcr {
        inner: ScriptedOcr,
        count: Arc<AtomicUsize>,
    }

    impl OcrEngine for CountingOcr {
        fn recognize(&self, image: &GrayImage, language_code: &str) -> Result<String> {
            self.count.fetch_add(1, Ordering::SeqCst);
            self.inner.recognize(image, language_code)
        }
    }

    pub fn harness(options: HarnessOptions<'_>) -> Harness {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let ocr_calls = Arc::new(AtomicUsize::new(0));
        let provider = RecordingProvider {
            calls: Arc::clone(&calls),
            fail: options.translation_fails,
            delay: options.translation_delay,
        };

        let collaborators = Collaborators {
            capturer: Arc::new(FakeCapturer {
                fail: options.capture_fails,
            }),
            ocr: Arc::new(CountingOcr {
                inner: ScriptedOcr::new(options.ocr_outputs),
                count: Arc::clone(&ocr_calls),
            }),
            router: TranslationRouter::new(Box::new(provider), Duration::from_secs(5))
                .expect("runtime de teste"),
        };

        let (tx, rx) = crossbeam_channel::unbounded();
        let config_path = std::env::temp_dir().join("screen-translator-tests-config.json");
        let state = AppState::new(options.config, config_path, collaborators, tx);

        Harness {
            state,
            calls,
            events: rx,
            ocr_calls,
        }
    }

    pub fn select_region(state: &AppState) {
        let region = CaptureRegion::new(0, 0, 100, 40).expect("região válida");
        state.region.replace(region);
    }
}

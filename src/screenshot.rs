// screen-translator/src/screenshot.rs

// ============================================================================
// MÓDULO SCREENSHOT - Captura de tela
// ============================================================================
//
// A captura é feita sempre em memória (nada vai para o disco).
// O trait `ScreenCapturer` separa o tick do backend real para que os testes
// possam injetar imagens prontas.
//
// ============================================================================

use anyhow::{Context, Result};
use image::{DynamicImage, ImageBuffer, Rgba};
use screenshots::Screen;

use crate::region::CaptureRegion;

/// Fonte de capturas de tela
pub trait ScreenCapturer: Send + Sync {
    /// Captura apenas a região pedida
    fn capture(&self, region: &CaptureRegion) -> Result<DynamicImage>;
}

/// Captura usando o monitor principal (crate `screenshots`)
#[derive(Debug, Default)]
pub struct PrimaryScreenCapturer;

impl ScreenCapturer for PrimaryScreenCapturer {
    fn capture(&self, region: &CaptureRegion) -> Result<DynamicImage> {
        capture_region_to_memory(region)
    }
}

// ============================================================================
// CAPTURA EM MEMÓRIA
// ============================================================================

/// Captura a tela inteira do monitor principal
pub fn capture_screen_to_memory() -> Result<DynamicImage> {
    let screens = Screen::all().context("Falha ao listar monitores")?;
    let screen = screens.first().context("Nenhum monitor encontrado")?;

    trace!(
        "   Monitor: {}x{}",
        screen.display_info.width,
        screen.display_info.height
    );

    let buffer = screen.capture().context("Falha ao capturar tela")?;
    buffer_to_image(&buffer)
}

/// Captura uma região específica e devolve a imagem recortada
pub fn capture_region_to_memory(region: &CaptureRegion) -> Result<DynamicImage> {
    debug!(
        "📸 Capturando região {}x{} em ({}, {})",
        region.width, region.height, region.x, region.y
    );

    let full_img = capture_screen_to_memory()?;

    // Valida se a região está dentro da tela
    let (screen_width, screen_height) = (full_img.width(), full_img.height());
    if !region.fits_within(screen_width, screen_height) {
        anyhow::bail!(
            "Região ({},{} {}x{}) está fora dos limites da tela ({}x{})",
            region.x,
            region.y,
            region.width,
            region.height,
            screen_width,
            screen_height
        );
    }

    Ok(full_img.crop_imm(region.x, region.y, region.width, region.height))
}

// ============================================================================
// FUNÇÃO AUXILIAR - Converte buffer para imagem
// ============================================================================

/// Converte o buffer da screenshot para DynamicImage
fn buffer_to_image(buffer: &screenshots::Image) -> Result<DynamicImage> {
    let width = buffer.width();
    let height = buffer.height();
    let rgba = buffer.rgba();

    let img_buffer: ImageBuffer<Rgba<u8>, Vec<u8>> =
        ImageBuffer::from_raw(width, height, rgba.to_vec())
            .context("Falha ao criar ImageBuffer")?;

    Ok(DynamicImage::ImageRgba8(img_buffer))
}

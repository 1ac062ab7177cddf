// screen-translator/src/preprocess.rs

// ============================================================================
// MÓDULO PREPROCESS - Prepara a captura para o OCR
// ============================================================================
//
// Pipeline fixo:
// 1. Escala de cinza
// 2. Upscale 2x (interpolação cúbica)
// 3. Binarização com limiar automático de Otsu
//
// OCR funciona muito melhor em texto grande, preto e branco, do que nos
// pixels anti-aliased da tela.
//
// ============================================================================

use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, Luma};

/// Fator de upscale aplicado antes da binarização
pub const UPSCALE_FACTOR: u32 = 2;

/// Converte a captura bruta na imagem binarizada entregue ao OCR
pub fn prepare_for_ocr(image: &DynamicImage) -> GrayImage {
    let gray = image.to_luma8();
    let (width, height) = gray.dimensions();

    // Catmull-Rom = filtro cúbico do crate image
    let upscaled = imageops::resize(
        &gray,
        width * UPSCALE_FACTOR,
        height * UPSCALE_FACTOR,
        FilterType::CatmullRom,
    );

    let level = otsu_level(&upscaled);
    trace!(
        "   🔍 Pré-processamento: {}x{} → {}x{}, limiar Otsu {}",
        width,
        height,
        upscaled.width(),
        upscaled.height(),
        level
    );

    binarize(&upscaled, level)
}

/// Calcula o limiar de Otsu: o nível que maximiza a variância entre as duas
/// classes (o mesmo que minimizar a variância dentro de cada classe).
pub fn otsu_level(image: &GrayImage) -> u8 {
    let mut histogram = [0u64; 256];
    for pixel in image.pixels() {
        histogram[pixel[0] as usize] += 1;
    }

    let total: u64 = histogram.iter().sum();
    if total == 0 {
        return 0;
    }

    let weighted_total: f64 = histogram
        .iter()
        .enumerate()
        .map(|(level, &count)| level as f64 * count as f64)
        .sum();

    let mut background_weight = 0u64;
    let mut background_sum = 0f64;
    let mut best_variance = -1f64;
    let mut best_level = 0u8;

    for (level, &count) in histogram.iter().enumerate() {
        background_weight += count;
        if background_weight == 0 {
            continue;
        }

        let foreground_weight = total - background_weight;
        if foreground_weight == 0 {
            break;
        }

        background_sum += level as f64 * count as f64;

        let background_mean = background_sum / background_weight as f64;
        let foreground_mean = (weighted_total - background_sum) / foreground_weight as f64;
        let mean_gap = background_mean - foreground_mean;
        let between_variance =
            background_weight as f64 * foreground_weight as f64 * mean_gap * mean_gap;

        if between_variance > best_variance {
            best_variance = between_variance;
            best_level = level as u8;
        }
    }

    best_level
}

/// Acima do limiar = branco, resto = preto
pub fn binarize(image: &GrayImage, level: u8) -> GrayImage {
    let mut binary = image.clone();
    for pixel in binary.pixels_mut() {
        *pixel = if pixel[0] > level { Luma([255]) } else { Luma([0]) };
    }
    binary
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    /// Texto escuro (40) sobre fundo claro (210), com um pouco de ruído
    fn two_tone_capture() -> DynamicImage {
        let mut img = RgbImage::from_pixel(40, 20, Rgb([210, 210, 210]));
        for x in 10..30 {
            for y in 5..15 {
                let noise = ((x + y) % 3) as u8 * 5;
                img.put_pixel(x, y, Rgb([40 + noise, 40 + noise, 40 + noise]));
            }
        }
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn otsu_splits_bimodal_histogram_between_modes() {
        let gray = two_tone_capture().to_luma8();
        let level = otsu_level(&gray);
        assert!((40..205).contains(&level), "limiar inesperado: {level}");
    }

    #[test]
    fn output_is_upscaled_and_binary() {
        let processed = prepare_for_ocr(&two_tone_capture());

        assert_eq!(processed.dimensions(), (80, 40));
        assert!(processed.pixels().all(|p| p[0] == 0 || p[0] == 255));

        // Centro do bloco de texto fica preto, canto fica branco
        assert_eq!(processed.get_pixel(40, 20)[0], 0);
        assert_eq!(processed.get_pixel(1, 1)[0], 255);
    }

    #[test]
    fn preprocessing_is_deterministic() {
        let capture = two_tone_capture();
        assert_eq!(prepare_for_ocr(&capture), prepare_for_ocr(&capture));
    }

    #[test]
    fn uniform_image_does_not_panic() {
        let flat = GrayImage::from_pixel(8, 8, Luma([128]));
        let level = otsu_level(&flat);
        let binary = binarize(&flat, level);
        assert!(binary.pixels().all(|p| p[0] == binary.get_pixel(0, 0)[0]));
    }
}

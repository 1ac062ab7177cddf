// screen-translator/src/ocr.rs

// ============================================================================
// MÓDULO OCR - Extração de texto usando o Tesseract
// ============================================================================
//
// O OCR em si é feito por um executável externo (Tesseract). Este módulo:
// 1. Escreve a imagem pré-processada num PNG temporário
// 2. Chama o Tesseract com o código de idioma certo
// 3. Normaliza as linhas devolvidas
//
// Qualquer falha do motor vira "nenhum texto" - nunca um erro para o usuário.
//
// ============================================================================

use anyhow::{Context, Result};
use image::GrayImage;
use std::path::PathBuf;
use std::process::Command;

use crate::language;

/// Motor de reconhecimento de texto
pub trait OcrEngine: Send + Sync {
    /// Reconhece o texto da imagem. `language_code` já está no formato do motor.
    fn recognize(&self, image: &GrayImage, language_code: &str) -> Result<String>;
}

// ============================================================================
// TESSERACT
// ============================================================================

/// Chama o executável do Tesseract configurado pelo usuário
#[derive(Debug, Clone)]
pub struct TesseractEngine {
    binary: PathBuf,
}

impl TesseractEngine {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        TesseractEngine {
            binary: binary.into(),
        }
    }
}

impl OcrEngine for TesseractEngine {
    fn recognize(&self, image: &GrayImage, language_code: &str) -> Result<String> {
        let tmp = tempfile::Builder::new()
            .prefix("screen-translator-")
            .suffix(".png")
            .tempfile()
            .context("Falha ao criar arquivo temporário para o OCR")?;

        image
            .save_with_format(tmp.path(), image::ImageFormat::Png)
            .context("Falha ao escrever imagem temporária para o OCR")?;

        let output = Command::new(&self.binary)
            .arg(tmp.path())
            .arg("stdout")
            .arg("-l")
            .arg(language_code)
            .output()
            .with_context(|| format!("Falha ao executar {:?} (Tesseract instalado?)", self.binary))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("Tesseract falhou: {}", stderr.trim());
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

// ============================================================================
// EXTRAÇÃO + NORMALIZAÇÃO
// ============================================================================

/// Executa o OCR e devolve as linhas limpas.
///
/// `language_hint` é o nome legível do idioma ("Thai", "English"...).
/// Falha do motor ou resultado vazio = lista vazia.
pub fn recognize_lines(engine: &dyn OcrEngine, image: &GrayImage, language_hint: &str) -> Vec<String> {
    let code = language::ocr_code(language_hint);

    match engine.recognize(image, code) {
        Ok(raw) => {
            let lines = normalize_ocr_output(&raw);
            debug!("🔍 OCR [{}]: {} linhas", code, lines.len());
            lines
        }
        Err(e) => {
            warn!("⚠️  OCR indisponível: {:#}", e);
            Vec::new()
        }
    }
}

/// Quebra o texto bruto em linhas, corrige espaçamento falso e descarta vazias
pub fn normalize_ocr_output(raw: &str) -> Vec<String> {
    raw.lines()
        .map(|line| collapse_script_spacing(line).trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

/// Remove espaços que o OCR insere entre dois caracteres do mesmo script sem
/// espaçamento (tailandês, CJK). Espaços entre palavras latinas ficam intactos.
pub fn collapse_script_spacing(line: &str) -> String {
    let chars: Vec<char> = line.chars().collect();
    let mut out = String::with_capacity(line.len());
    let mut i = 0;

    while i < chars.len() {
        if !chars[i].is_whitespace() {
            out.push(chars[i]);
            i += 1;
            continue;
        }

        let start = i;
        while i < chars.len() && chars[i].is_whitespace() {
            i += 1;
        }

        let before = start.checked_sub(1).and_then(|p| language::unspaced_script(chars[p]));
        let after = chars.get(i).and_then(|c| language::unspaced_script(*c));

        let same_script = matches!((before, after), (Some(a), Some(b)) if a == b);
        if !same_script {
            out.extend(&chars[start..i]);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    struct FixedOcr {
        output: Result<String, String>,
        last_code: Mutex<Option<String>>,
    }

    impl OcrEngine for FixedOcr {
        fn recognize(&self, _image: &GrayImage, language_code: &str) -> Result<String> {
            *self.last_code.lock() = Some(language_code.to_string());
            self.output.clone().map_err(anyhow::Error::msg)
        }
    }

    fn blank() -> GrayImage {
        GrayImage::new(4, 4)
    }

    #[test]
    fn thai_spacing_artifact_is_collapsed() {
        assert_eq!(collapse_script_spacing("สวัส ดี ครับ"), "สวัสดีครับ");
        assert_eq!(collapse_script_spacing("日 本 語"), "日本語");
    }

    #[test]
    fn spacing_between_different_scripts_is_kept() {
        assert_eq!(collapse_script_spacing("Hello world"), "Hello world");
        assert_eq!(collapse_script_spacing("สวัสดี Bob"), "สวัสดี Bob");
        assert_eq!(collapse_script_spacing("ไทย 日本"), "ไทย 日本");
    }

    #[test]
    fn lines_are_trimmed_and_empty_ones_dropped() {
        let raw = "  Hello  \n\n   \nWorld\r\n";
        assert_eq!(normalize_ocr_output(raw), vec!["Hello", "World"]);
    }

    #[test]
    fn engine_failure_means_nothing_extracted() {
        let engine = FixedOcr {
            output: Err("tesseract not found".to_string()),
            last_code: Mutex::new(None),
        };
        assert!(recognize_lines(&engine, &blank(), "English").is_empty());
    }

    #[test]
    fn language_hint_is_mapped_before_calling_engine() {
        let engine = FixedOcr {
            output: Ok("สวัส ดี\n".to_string()),
            last_code: Mutex::new(None),
        };

        let lines = recognize_lines(&engine, &blank(), "Thai");

        assert_eq!(lines, vec!["สวัสดี"]);
        assert_eq!(engine.last_code.lock().as_deref(), Some("tha+eng"));

        recognize_lines(&engine, &blank(), "Elvish");
        assert_eq!(engine.last_code.lock().as_deref(), Some(language::DEFAULT_OCR_CODE));
    }

    #[test]
    fn missing_binary_is_an_error_not_a_panic() {
        let engine = TesseractEngine::new("/nonexistent/tesseract-binary");
        assert!(engine.recognize(&blank(), "eng").is_err());
    }
}

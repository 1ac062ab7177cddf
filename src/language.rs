// screen-translator/src/language.rs

// ============================================================================
// MÓDULO LANGUAGE - Tabela de idiomas suportados
// ============================================================================
//
// A UI trabalha com nomes legíveis ("Thai", "English"...). Cada backend
// precisa de um código diferente:
// - Tesseract: "tha+eng", "jpn"...
// - Google Translate: ISO ("th", "zh-CN"...)
// - DeepL: maiúsculo ("EN-US", "JA"...)
//
// ============================================================================

/// Código Tesseract usado quando o idioma não é reconhecido
pub const DEFAULT_OCR_CODE: &str = "tha+eng";

/// Um idioma com seus códigos em cada backend
#[derive(Debug, Clone, Copy)]
pub struct Language {
    pub name: &'static str,
    pub tesseract: &'static str,
    pub iso: &'static str,
    pub deepl: &'static str,
}

pub const LANGUAGES: &[Language] = &[
    Language {
        name: "Thai",
        tesseract: "tha+eng",
        iso: "th",
        deepl: "TH",
    },
    Language {
        name: "English",
        tesseract: "eng",
        iso: "en",
        deepl: "EN-US",
    },
    Language {
        name: "Japanese",
        tesseract: "jpn",
        iso: "ja",
        deepl: "JA",
    },
    Language {
        name: "Chinese",
        tesseract: "chi_sim",
        iso: "zh-CN",
        deepl: "ZH",
    },
    Language {
        name: "Korean",
        tesseract: "kor",
        iso: "ko",
        deepl: "KO",
    },
];

/// Procura um idioma pelo nome (sem diferenciar maiúsculas)
pub fn find(name: &str) -> Option<&'static Language> {
    LANGUAGES
        .iter()
        .find(|lang| lang.name.eq_ignore_ascii_case(name.trim()))
}

/// Nomes para os combos da UI
pub fn names() -> impl Iterator<Item = &'static str> {
    LANGUAGES.iter().map(|lang| lang.name)
}

/// Código(s) Tesseract para o idioma; desconhecido cai no código combinado padrão
pub fn ocr_code(name: &str) -> &'static str {
    find(name).map_or(DEFAULT_OCR_CODE, |lang| lang.tesseract)
}

/// Código ISO (Google Translate). Nomes desconhecidos passam em minúsculas.
pub fn iso_code(name: &str) -> String {
    match find(name) {
        Some(lang) => lang.iso.to_string(),
        None => name.trim().to_lowercase(),
    }
}

/// Código DeepL. Nomes desconhecidos passam em maiúsculas.
pub fn deepl_code(name: &str) -> String {
    match find(name) {
        Some(lang) => lang.deepl.to_string(),
        None => name.trim().to_uppercase(),
    }
}

// ============================================================================
// SCRIPTS
// ============================================================================

/// Scripts escritos sem espaço entre palavras.
/// O OCR costuma inserir espaços falsos entre caracteres desses scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnspacedScript {
    Thai,
    Cjk,
}

/// Faixa tailandesa "ก-๙" (consoantes, vogais, tons e dígitos)
pub fn is_thai(c: char) -> bool {
    ('\u{0E01}'..='\u{0E59}').contains(&c)
}

fn is_cjk(c: char) -> bool {
    matches!(c,
        '\u{3040}'..='\u{309F}'   // hiragana
        | '\u{30A0}'..='\u{30FF}' // katakana
        | '\u{3400}'..='\u{4DBF}'
        | '\u{4E00}'..='\u{9FFF}')
}

pub fn unspaced_script(c: char) -> Option<UnspacedScript> {
    if is_thai(c) {
        Some(UnspacedScript::Thai)
    } else if is_cjk(c) {
        Some(UnspacedScript::Cjk)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ocr_code_maps_known_names_and_falls_back() {
        assert_eq!(ocr_code("Thai"), "tha+eng");
        assert_eq!(ocr_code("english"), "eng");
        assert_eq!(ocr_code("Chinese"), "chi_sim");
        assert_eq!(ocr_code("Klingon"), DEFAULT_OCR_CODE);
    }

    #[test]
    fn translation_codes() {
        assert_eq!(iso_code("Chinese"), "zh-CN");
        assert_eq!(iso_code("Portuguese"), "portuguese");
        assert_eq!(deepl_code("English"), "EN-US");
        assert_eq!(deepl_code("pt-br"), "PT-BR");
    }

    #[test]
    fn script_classes() {
        assert_eq!(unspaced_script('ก'), Some(UnspacedScript::Thai));
        assert_eq!(unspaced_script('๙'), Some(UnspacedScript::Thai));
        assert_eq!(unspaced_script('日'), Some(UnspacedScript::Cjk));
        assert_eq!(unspaced_script('カ'), Some(UnspacedScript::Cjk));
        assert_eq!(unspaced_script('a'), None);
        assert_eq!(unspaced_script('한'), None);
    }
}

// screen-translator/src/novelty.rs

// ============================================================================
// MÓDULO NOVELTY - Detecta se o texto capturado é novo
// ============================================================================
//
// Com captura contínua, a mesma caixa de diálogo é lida dezenas de vezes
// antes de mudar. Sem deduplicação, cada tick retraduziria o mesmo texto.
//
// Duas políticas:
// - LineCache (padrão): compara linha a linha pela chave canônica, com a
//   última linha aceita + conjunto de linhas longas já vistas.
// - BlockSimilarity: compara o bloco inteiro com o último bloco aceito,
//   usando similaridade (tolerante a erros pequenos do OCR).
//
// O filtro só AVALIA; o estado muda em `commit` (tradução deu certo) ou
// em `record_failure` (só o bloco, para não reenviar a mesma falha).
//
// ============================================================================

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::language;

/// Política de deduplicação usada durante a sessão
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DedupPolicy {
    /// Cache por linha (exato, granularidade fina)
    #[default]
    LineCache,
    /// Similaridade do bloco inteiro (tolerante a ruído do OCR)
    BlockSimilarity,
}

/// Parâmetros do filtro (vêm do config)
#[derive(Debug, Clone, Copy)]
pub struct FilterSettings {
    pub policy: DedupPolicy,
    /// Blocos com similaridade >= este valor são "o mesmo texto"
    pub similarity_threshold: f64,
    /// Só chaves com MAIS caracteres que isso entram no SeenSet
    pub min_remembered_key_len: usize,
}

impl Default for FilterSettings {
    fn default() -> Self {
        FilterSettings {
            policy: DedupPolicy::LineCache,
            similarity_threshold: 0.95,
            min_remembered_key_len: 15,
        }
    }
}

/// Uma linha do OCR com sua chave de comparação
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedLine {
    pub display: String,
    pub key: String,
}

impl NormalizedLine {
    pub fn new(display: &str) -> Self {
        NormalizedLine {
            display: display.to_string(),
            key: canonical_key(display),
        }
    }
}

/// Chave canônica: minúsculas, só letras/dígitos (qualquer script) e a faixa
/// tailandesa inteira (vogais e tons tailandeses não são "alfanuméricos").
pub fn canonical_key(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_alphanumeric() || language::is_thai(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Chave do bloco: chaves das linhas (sem as vazias) separadas por \n.
/// "Hello\nWorld" e "HelloWorld" são blocos diferentes.
fn block_key(lines: &[NormalizedLine]) -> String {
    lines
        .iter()
        .map(|line| line.key.as_str())
        .filter(|key| !key.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn display_text<'a>(lines: impl IntoIterator<Item = &'a NormalizedLine>) -> String {
    lines
        .into_iter()
        .map(|line| line.display.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Texto aprovado pelo filtro, com o estado a gravar se a tradução der certo
#[derive(Debug, Clone, PartialEq)]
pub struct Admission {
    /// Texto que vai para a tradução (linhas separadas por \n)
    pub text: String,
    block_key: String,
    last_line_key: Option<String>,
    remembered: Vec<String>,
}

/// Estado de deduplicação da sessão
#[derive(Debug, Clone)]
pub struct NoveltyFilter {
    settings: FilterSettings,
    /// Chave da última linha aceita
    last_line_key: String,
    /// Chaves longas já exibidas
    seen: HashSet<String>,
    /// Chave do último bloco tentado (traduzido ou com falha)
    last_block_key: String,
}

impl NoveltyFilter {
    pub fn new(settings: FilterSettings) -> Self {
        NoveltyFilter {
            settings,
            last_line_key: String::new(),
            seen: HashSet::new(),
            last_block_key: String::new(),
        }
    }

    /// Troca os parâmetros sem perder o histórico da sessão
    pub fn update_settings(&mut self, settings: FilterSettings) {
        self.settings = settings;
    }

    /// Quantas linhas longas estão no SeenSet
    pub fn seen_len(&self) -> usize {
        self.seen.len()
    }

    /// Decide se as linhas trazem algo novo (tick automático)
    pub fn evaluate(&self, lines: &[String]) -> Option<Admission> {
        let lines: Vec<NormalizedLine> = lines.iter().map(|line| NormalizedLine::new(line)).collect();

        let block_key = block_key(&lines);
        if block_key.is_empty() {
            return None;
        }

        match self.settings.policy {
            DedupPolicy::BlockSimilarity => self.evaluate_block(&lines, block_key),
            DedupPolicy::LineCache => self.evaluate_lines(&lines, block_key),
        }
    }

    /// Aceita todas as linhas sem filtrar (tick manual)
    pub fn admit_all(&self, lines: &[String]) -> Option<Admission> {
        if lines.is_empty() {
            return None;
        }

        let lines: Vec<NormalizedLine> = lines.iter().map(|line| NormalizedLine::new(line)).collect();
        let (last_line_key, remembered) = self.line_state_after(&lines);

        Some(Admission {
            text: display_text(&lines),
            block_key: block_key(&lines),
            last_line_key,
            remembered,
        })
    }

    /// Grava o estado de uma admissão cuja tradução foi concluída
    pub fn commit(&mut self, admission: &Admission) {
        self.last_block_key = admission.block_key.clone();
        if let Some(key) = &admission.last_line_key {
            self.last_line_key = key.clone();
        }
        self.seen.extend(admission.remembered.iter().cloned());
    }

    /// Tradução falhou: guarda só o bloco, para a mesma captura não ser
    /// reenviada a cada tick. Linhas não entram no SeenSet.
    pub fn record_failure(&mut self, admission: &Admission) {
        self.last_block_key = admission.block_key.clone();
    }

    /// Ação "limpar" do usuário
    pub fn clear(&mut self) {
        self.last_line_key.clear();
        self.seen.clear();
        self.last_block_key.clear();
        info!("🧹 Histórico de deduplicação limpo");
    }

    // ------------------------------------------------------------------------
    // Políticas
    // ------------------------------------------------------------------------

    fn evaluate_block(&self, lines: &[NormalizedLine], block_key: String) -> Option<Admission> {
        if block_key == self.last_block_key {
            trace!("🔁 Bloco idêntico ao anterior");
            return None;
        }

        let similarity = similarity_ratio(&block_key, &self.last_block_key);
        if similarity >= self.settings.similarity_threshold {
            trace!("🔁 Bloco {:.1}% similar ao anterior", similarity * 100.0);
            return None;
        }

        let (last_line_key, remembered) = self.line_state_after(lines);
        Some(Admission {
            text: display_text(lines),
            block_key,
            last_line_key,
            remembered,
        })
    }

    fn evaluate_lines(&self, lines: &[NormalizedLine], block_key: String) -> Option<Admission> {
        // Captura idêntica à última tentada: nem olha linha a linha
        if block_key == self.last_block_key {
            trace!("🔁 Captura idêntica à última aceita");
            return None;
        }

        let mut last_key = self.last_line_key.as_str();
        let mut remembered: Vec<String> = Vec::new();
        let mut kept: Vec<&NormalizedLine> = Vec::new();

        for line in lines {
            if line.key.is_empty() || line.key == last_key {
                continue;
            }
            if self.seen.contains(&line.key) || remembered.contains(&line.key) {
                continue;
            }

            kept.push(line);
            if self.is_rememberable(&line.key) {
                remembered.push(line.key.clone());
            }
            last_key = line.key.as_str();
        }

        if kept.is_empty() {
            trace!("🔁 Nenhuma linha nova");
            return None;
        }

        Some(Admission {
            text: display_text(kept),
            block_key,
            last_line_key: Some(last_key.to_string()),
            remembered,
        })
    }

    /// Estado de linhas depois de aceitar todas as linhas dadas
    fn line_state_after(&self, lines: &[NormalizedLine]) -> (Option<String>, Vec<String>) {
        let mut last_key = None;
        let mut remembered = Vec::new();

        for key in lines.iter().map(|line| &line.key).filter(|k| !k.is_empty()) {
            if self.is_rememberable(key) && !remembered.contains(key) {
                remembered.push(key.clone());
            }
            last_key = Some(key.clone());
        }

        (last_key, remembered)
    }

    fn is_rememberable(&self, key: &str) -> bool {
        key.chars().count() > self.settings.min_remembered_key_len
    }
}

#[cfg(test)]
impl NoveltyFilter {
    pub fn settings(&self) -> FilterSettings {
        self.settings
    }

    pub fn last_line_key(&self) -> &str {
        &self.last_line_key
    }

    pub fn has_seen(&self, key: &str) -> bool {
        self.seen.contains(key)
    }
}

impl Default for NoveltyFilter {
    fn default() -> Self {
        Self::new(FilterSettings::default())
    }
}

// ============================================================================
// SIMILARIDADE (Ratcliff/Obershelp)
// ============================================================================

/// Similaridade em [0, 1]: 2*M / T, onde M é o total de caracteres nos blocos
/// em comum (achados recursivamente a partir do maior) e T a soma dos tamanhos.
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    2.0 * matching_chars(&a, &b) as f64 / total as f64
}

fn matching_chars(a: &[char], b: &[char]) -> usize {
    let (i, j, size) = longest_common_block(a, b);
    if size == 0 {
        return 0;
    }

    size + matching_chars(&a[..i], &b[..j]) + matching_chars(&a[i + size..], &b[j + size..])
}

/// Maior trecho contíguo em comum: (início em a, início em b, tamanho).
/// Empates ficam com o trecho que aparece primeiro em `a`.
fn longest_common_block(a: &[char], b: &[char]) -> (usize, usize, usize) {
    let mut best = (0, 0, 0);
    let mut prev_row = vec![0usize; b.len() + 1];
    let mut curr_row = vec![0usize; b.len() + 1];

    for i in 0..a.len() {
        for j in 0..b.len() {
            curr_row[j + 1] = if a[i] == b[j] { prev_row[j] + 1 } else { 0 };

            let size = curr_row[j + 1];
            if size > best.2 {
                best = (i + 1 - size, j + 1 - size, size);
            }
        }
        std::mem::swap(&mut prev_row, &mut curr_row);
    }

    best
}

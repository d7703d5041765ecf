//! Sentence-level BLEU against a single reference

use std::collections::HashMap;
use unicode_segmentation::UnicodeSegmentation;

pub const MAX_ORDER: usize = 4;

/// English clitics split off their host word, as Treebank-style tokenizers do
const CLITICS: &[&str] = &[
    "n't", "'s", "'re", "'ve", "'ll", "'d", "'m", "n’t", "’s", "’re", "’ve", "’ll", "’d", "’m",
];

fn split_clitic(word: &str) -> (&str, Option<&str>) {
    for clitic in CLITICS {
        if word.len() <= clitic.len() {
            continue;
        }
        let at = word.len() - clitic.len();
        if word.is_char_boundary(at) && word[at..].eq_ignore_ascii_case(clitic) {
            return (&word[..at], Some(&word[at..]));
        }
    }
    (word, None)
}

/// Split on Unicode word boundaries, keeping punctuation as separate tokens
/// and contractions as host plus clitic (`don't` -> `do`, `n't`)
pub fn tokenize(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    for segment in text.split_word_bounds() {
        if segment.trim().is_empty() {
            continue;
        }
        let (host, clitic) = split_clitic(segment);
        tokens.push(host);
        tokens.extend(clitic);
    }
    tokens
}

fn ngram_counts<'a>(tokens: &'a [&'a str], n: usize) -> HashMap<&'a [&'a str], usize> {
    let mut counts = HashMap::new();
    if tokens.len() < n {
        return counts;
    }
    for window in tokens.windows(n) {
        *counts.entry(window).or_insert(0) += 1;
    }
    counts
}

/// Clipped matches and hypothesis n-gram total for one order
fn modified_precision<'a>(reference: &'a [&'a str], hypothesis: &'a [&'a str], n: usize) -> (usize, usize) {
    let reference_counts = ngram_counts(reference, n);
    let hypothesis_counts = ngram_counts(hypothesis, n);

    let matches = hypothesis_counts
        .iter()
        .map(|(gram, &count)| count.min(reference_counts.get(gram).copied().unwrap_or(0)))
        .sum();
    let total = hypothesis_counts.values().sum();
    (matches, total)
}

fn brevity_penalty(reference_len: usize, hypothesis_len: usize) -> f64 {
    if hypothesis_len == 0 {
        0.0
    } else if hypothesis_len > reference_len {
        1.0
    } else {
        (1.0 - reference_len as f64 / hypothesis_len as f64).exp()
    }
}

/// BLEU with uniform weights over orders 1..=4 and no smoothing.
///
/// Any order without a single match yields 0.0.
pub fn sentence_bleu_tokens(reference: &[&str], hypothesis: &[&str]) -> f64 {
    let mut log_precision_sum = 0.0;
    for n in 1..=MAX_ORDER {
        let (matches, total) = modified_precision(reference, hypothesis, n);
        if matches == 0 {
            log::warn!(
                "BLEU: no {}-gram overlap between summary and reference, score is 0",
                n
            );
            return 0.0;
        }
        log_precision_sum += (matches as f64 / total as f64).ln();
    }

    let geometric_mean = (log_precision_sum / MAX_ORDER as f64).exp();
    brevity_penalty(reference.len(), hypothesis.len()) * geometric_mean
}

pub fn sentence_bleu(reference: &str, hypothesis: &str) -> f64 {
    sentence_bleu_tokens(&tokenize(reference), &tokenize(hypothesis))
}

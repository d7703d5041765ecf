//! ROUGE-N and ROUGE-L F-measures over lowercased alphanumeric tokens

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RougeScore {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

impl RougeScore {
    fn from_counts(overlap: f64, hypothesis_total: f64, reference_total: f64) -> Self {
        if hypothesis_total == 0.0 || reference_total == 0.0 {
            return Self::default();
        }
        let precision = overlap / hypothesis_total;
        let recall = overlap / reference_total;
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };
        Self {
            precision,
            recall,
            f1,
        }
    }
}

/// Lowercase and split on every non-alphanumeric character
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect()
}

fn ngram_counts(tokens: &[String], n: usize) -> HashMap<&[String], usize> {
    let mut counts = HashMap::new();
    if n == 0 || tokens.len() < n {
        return counts;
    }
    for window in tokens.windows(n) {
        *counts.entry(window).or_insert(0) += 1;
    }
    counts
}

/// Clipped n-gram overlap between pre-tokenized texts
pub fn rouge_n_tokens(reference: &[String], hypothesis: &[String], n: usize) -> RougeScore {
    let reference_counts = ngram_counts(reference, n);
    let hypothesis_counts = ngram_counts(hypothesis, n);

    let reference_total: usize = reference_counts.values().sum();
    let hypothesis_total: usize = hypothesis_counts.values().sum();

    let overlap: usize = reference_counts
        .iter()
        .filter_map(|(gram, &count)| hypothesis_counts.get(gram).map(|&c| c.min(count)))
        .sum();

    RougeScore::from_counts(overlap as f64, hypothesis_total as f64, reference_total as f64)
}

fn lcs_len(a: &[String], b: &[String]) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];

    for x in a {
        for (j, y) in b.iter().enumerate() {
            curr[j + 1] = if x == y {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// Longest-common-subsequence F-measure between pre-tokenized texts
pub fn rouge_l_tokens(reference: &[String], hypothesis: &[String]) -> RougeScore {
    let lcs = lcs_len(reference, hypothesis);
    RougeScore::from_counts(lcs as f64, hypothesis.len() as f64, reference.len() as f64)
}

pub fn rouge_n(reference: &str, hypothesis: &str, n: usize) -> RougeScore {
    rouge_n_tokens(&tokenize(reference), &tokenize(hypothesis), n)
}

pub fn rouge_l(reference: &str, hypothesis: &str) -> RougeScore {
    rouge_l_tokens(&tokenize(reference), &tokenize(hypothesis))
}

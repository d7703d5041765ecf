//! Language code formats and special-token cleanup shared by the families

use regex::Regex;
use std::sync::OnceLock;

/// Target-language tokens accepted by `Helsinki-NLP/opus-mt-en-roa`
pub const OPUS_MT_ROA_TARGETS: &[&str] = &[
    "arg", "ast", "cat", "cos", "egl", "ext", "fra", "frm_Latn", "gcf_Latn", "glg", "hat",
    "ind", "ita", "lad", "lad_Latn", "lij", "lld_Latn", "lmo", "max_Latn", "mfe", "min",
    "mwl", "oci", "pap", "pms", "por", "roh", "ron", "scn", "spa", "tmw_Latn", "vec", "wln",
    "zlm_Latn",
];

fn special_tokens() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"</?s>|<pad>|<unk>|>>[A-Za-z_]+<<|<2[A-Za-z_\-]+>").expect("valid regex")
    })
}

fn repeated_spaces() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[ \t]{2,}").expect("valid regex"))
}

/// Remove tokenizer control tokens and target markers left in decoded text
pub fn strip_special_tokens(text: &str) -> String {
    let stripped = special_tokens().replace_all(text, " ");
    repeated_spaces()
        .replace_all(&stripped, " ")
        .trim()
        .to_string()
}

/// ISO 639-3 form of a code given as ISO 639-1 or ISO 639-3
pub fn to_iso639_3(code: &str) -> Option<String> {
    let code = code.trim().to_lowercase();
    match code.len() {
        2 => isolang::Language::from_639_1(&code).map(|l| l.to_639_3().to_string()),
        3 => isolang::Language::from_639_3(&code).map(|l| l.to_639_3().to_string()),
        _ => None,
    }
}

/// MADLAD-400 tag: ISO 639-1 where one exists, otherwise ISO 639-3, with any
/// script or region suffix (`zh_Hant`, `pt-BR`) preserved
pub fn to_madlad_tag(code: &str) -> Option<String> {
    let code = code.trim();
    let (primary, suffix) = match code.find(|c: char| c == '_' || c == '-') {
        Some(pos) => (&code[..pos], &code[pos..]),
        None => (code, ""),
    };
    if suffix.len() == 1 {
        return None;
    }

    let primary = primary.to_lowercase();
    let language = match primary.len() {
        2 => isolang::Language::from_639_1(&primary),
        3 => isolang::Language::from_639_3(&primary),
        _ => None,
    }?;

    let base = language
        .to_639_1()
        .unwrap_or_else(|| language.to_639_3());
    Some(format!("{}{}", base, suffix))
}

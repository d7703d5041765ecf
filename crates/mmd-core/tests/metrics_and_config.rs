use mmd_core::config::{ConfigLoader, SummarizerBackend};
use mmd_core::evaluation::{bleu, rouge};
use mmd_core::translation::codes::strip_special_tokens;
use mmd_core::{LanguageIdentifier, MetricName, MmdError, ModelSelector};

#[test]
fn test_rouge_and_bleu_on_reference_sentence() {
    let reference = "The cat was found under the bed.";
    let summary = "The cat was under the bed.";

    let r1 = rouge::rouge_n(reference, summary, 1);
    // 6 of 7 reference unigrams, all 6 summary unigrams
    assert!((r1.precision - 1.0).abs() < 1e-9);
    assert!((r1.recall - 6.0 / 7.0).abs() < 1e-9);

    let r2 = rouge::rouge_n(reference, summary, 2);
    assert!(r2.f1 > 0.0 && r2.f1 < r1.f1);

    let rl = rouge::rouge_l(reference, summary);
    assert!((rl.f1 - r1.f1).abs() < 1e-9);

    let score = bleu::sentence_bleu(reference, summary);
    assert!(score > 0.0 && score < 1.0);
}

#[test]
fn test_metric_labels() {
    let labels: Vec<String> = MetricName::ALL.iter().map(|m| m.to_string()).collect();
    assert_eq!(labels, ["ROUGE-1", "ROUGE-2", "ROUGE-L", "BLEU", "BERTScore (F1)"]);
}

#[test]
fn test_language_identification() {
    let identifier = LanguageIdentifier::new();

    let english = identifier
        .identify("This is a perfectly ordinary English sentence about the weather today.")
        .unwrap();
    assert_eq!(english.code, "eng");
    assert_eq!(english.iso639_1.as_deref(), Some("en"));

    let spanish = identifier
        .identify("El gato duerme tranquilamente sobre la alfombra mientras los niños juegan en el jardín con sus amigos.")
        .unwrap();
    assert_eq!(spanish.code, "spa");

    assert!(matches!(
        identifier.identify("   "),
        Err(MmdError::ClassifierError(_))
    ));
}

#[test]
fn test_model_selector_parsing() {
    assert_eq!("0".parse::<ModelSelector>().unwrap(), ModelSelector::Seamless);
    assert_eq!("madlad".parse::<ModelSelector>().unwrap(), ModelSelector::Madlad);
    assert!("3".parse::<ModelSelector>().is_err());
}

#[test]
fn test_special_token_cleanup() {
    assert_eq!(strip_special_tokens("<s> Hola mundo </s>"), "Hola mundo");
}

#[test]
fn test_config_from_yaml() {
    let yaml = r#"
translation:
  default_target_language: spa
  default_model: 1
summarization:
  backend: remote
  min_length: 10
  max_length: 40
"#;
    let config = ConfigLoader::from_str(yaml).unwrap();
    assert_eq!(config.translation.default_target_language, "spa");
    assert_eq!(config.translation.default_model, 1);
    assert_eq!(config.summarization.backend, SummarizerBackend::Remote);
    assert_eq!(config.summarization.max_input_words, 1024);
    assert_eq!(config.evaluation.bertscore.model, "roberta-large");
}

#[test]
fn test_config_rejects_inverted_bounds() {
    let yaml = "summarization:\n  min_length: 60\n  max_length: 50\n";
    assert!(matches!(
        ConfigLoader::from_str(yaml),
        Err(MmdError::ConfigError(_))
    ));
}

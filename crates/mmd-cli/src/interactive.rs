use crate::render;
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use mmd_core::pipeline::{SummaryOutcome, EMPTY_INPUT_MESSAGE};
use mmd_core::{LengthBounds, MmdConfig, ModelSelector, Pipeline};

pub(crate) const MIN_LENGTH_RANGE: (usize, usize) = (5, 100);
pub(crate) const MAX_LENGTH_RANGE: (usize, usize) = (5, 200);

/// Prompt-driven session: the model is chosen once, then texts are
/// processed until the user stops
pub async fn run_session(pipeline: &Pipeline, config: &MmdConfig, selector: Option<ModelSelector>) -> Result<()> {
    let theme = ColorfulTheme::default();

    println!("Multilingual Translation, Summarization and Evaluation");
    println!();

    let selector = match selector {
        Some(selector) => selector,
        None => prompt_model(&theme, config.translation.default_model as usize)?,
    };
    println!("Using {} ({})", selector, configured_model_id(config, selector));

    loop {
        if let Err(e) = run_interaction(pipeline, config, &theme, selector).await {
            log::error!("Interaction failed: {:#}", e);
            println!("Error: {:#}", e);
        }

        println!();
        let again = Confirm::with_theme(&theme)
            .with_prompt("Translate another text?")
            .default(true)
            .interact()?;
        if !again {
            break;
        }
    }

    pipeline.models().clear().await;
    Ok(())
}

async fn run_interaction(
    pipeline: &Pipeline,
    config: &MmdConfig,
    theme: &ColorfulTheme,
    selector: ModelSelector,
) -> Result<()> {
    let text: String = Input::with_theme(theme)
        .with_prompt("Enter text to translate")
        .allow_empty(true)
        .interact_text()?;

    if text.trim().is_empty() {
        println!("{}", EMPTY_INPUT_MESSAGE);
        return Ok(());
    }

    let target_language: String = Input::with_theme(theme)
        .with_prompt("Output language code")
        .default(config.translation.default_target_language.clone())
        .interact_text()?;

    let translation = pipeline
        .translate_step(&text, target_language.trim(), selector)
        .await?;
    println!();
    println!("{}", render::translation(&translation));
    println!();

    let bounds = prompt_bounds(theme, config)?;
    let outcome = pipeline.summarize_step(&translation.text, bounds).await?;
    println!();
    println!("{}", render::summary_outcome(&outcome));

    if let SummaryOutcome::Summarized(summary) = outcome {
        let (stats, metrics) = pipeline.evaluate_step(&text, &summary.text).await?;
        println!();
        println!("{}", render::stats(&stats));
        println!();
        println!("{}", render::metrics(&metrics));
    }

    Ok(())
}

fn prompt_model(theme: &ColorfulTheme, default: usize) -> Result<ModelSelector> {
    let names: Vec<&str> = ModelSelector::ALL.iter().map(|s| s.display_name()).collect();
    let index = Select::with_theme(theme)
        .with_prompt("Select a translation model")
        .items(&names)
        .default(default.min(names.len() - 1))
        .interact()?;
    Ok(ModelSelector::try_from(index as i64)?)
}

fn prompt_bounds(theme: &ColorfulTheme, config: &MmdConfig) -> Result<LengthBounds> {
    let min_len = prompt_length(
        theme,
        "Minimum summary length",
        config.summarization.min_length,
        MIN_LENGTH_RANGE,
    )?;
    let max_len = prompt_length(
        theme,
        "Maximum summary length",
        config.summarization.max_length.max(min_len),
        (MAX_LENGTH_RANGE.0.max(min_len), MAX_LENGTH_RANGE.1),
    )?;
    Ok(LengthBounds::new(min_len, max_len)?)
}

fn prompt_length(theme: &ColorfulTheme, prompt: &str, default: usize, (low, high): (usize, usize)) -> Result<usize> {
    let value = Input::<usize>::with_theme(theme)
        .with_prompt(format!("{} ({}-{})", prompt, low, high))
        .default(default.clamp(low, high))
        .validate_with(move |value: &usize| -> Result<(), String> {
            if (low..=high).contains(value) {
                Ok(())
            } else {
                Err(format!("Enter a number between {} and {}", low, high))
            }
        })
        .interact_text()?;
    Ok(value)
}

fn configured_model_id(config: &MmdConfig, selector: ModelSelector) -> &str {
    let models = &config.translation.models;
    match selector {
        ModelSelector::Seamless => &models.seamless,
        ModelSelector::OpusMt => &models.opus_mt,
        ModelSelector::Madlad => &models.madlad,
    }
}

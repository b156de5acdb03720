use anyhow::{Result, anyhow};
use std::path::Path;

const AVAILABLE_MODELS: &[&str] = &[
    "tiny",
    "tiny.en",
    "base",
    "base.en",
    "small",
    "small.en",
    "medium",
    "medium.en",
    "large-v3",
    "large-v3-turbo",
];

pub fn list_available_models() -> String {
    let mut output = String::from("\nAvailable models:\n");
    for model in AVAILABLE_MODELS {
        output.push_str(&format!("  {model}\n"));
    }
    output.push_str("\n.en = english-only\n");
    output
}

pub fn validate_model(model: &str) -> Result<()> {
    if AVAILABLE_MODELS.contains(&model) {
        Ok(())
    } else {
        Err(anyhow!(
            "Invalid model: {}\n{}",
            model,
            list_available_models()
        ))
    }
}

/// Fetch a whisper ggml model. One-time setup; the server expects the model
/// at WHISPER_MODEL_PATH (default models/ggml-base.en.bin).
pub async fn download_model(model: &str, models_path: Option<String>) -> Result<()> {
    validate_model(model)?;

    let download_path = models_path.unwrap_or_else(|| "models".to_string());
    let file_path = Path::new(&download_path).join(format!("ggml-{model}.bin"));

    if file_path.exists() {
        println!("Model '{model}' already exists. Skipping download.");
        return Ok(());
    }

    if let Some(parent) = file_path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| anyhow!("Failed to create directory: {}", e))?;
    }

    let url =
        format!("https://huggingface.co/ggerganov/whisper.cpp/resolve/main/ggml-{model}.bin");
    println!("Downloading ggml model '{model}'...");

    let response = reqwest::get(&url)
        .await
        .map_err(|e| anyhow!("Failed to download model: {}", e))?;

    if !response.status().is_success() {
        return Err(anyhow!("Download failed with status {}", response.status()));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| anyhow!("Failed to read model data: {}", e))?;

    tokio::fs::write(&file_path, &bytes)
        .await
        .map_err(|e| anyhow!("Failed to write model file: {}", e))?;

    println!("Done! Model '{}' saved in '{}'", model, file_path.display());
    println!("You can now start the server:");
    println!("  $ mood-scribe serve");

    Ok(())
}

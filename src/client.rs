use anyhow::{Result, anyhow};
use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::config::ClientConfig;

pub async fn send_analysis_request(config: &ClientConfig) -> Result<Value> {
    let client = reqwest::Client::new();

    if !Path::new(&config.audio_file).exists() {
        return Err(anyhow!("Audio file not found: {}", config.audio_file));
    }

    let audio_data = fs::read(&config.audio_file)
        .map_err(|e| anyhow!("Failed to read audio file: {}", e))?;

    println!(
        "📁 Audio source: {} ({} bytes)",
        config.audio_file,
        audio_data.len()
    );

    let form = reqwest::multipart::Form::new().part(
        "audio",
        reqwest::multipart::Part::bytes(audio_data).file_name(config.audio_file.clone()),
    );

    println!(
        "🚀 Sending analysis request to: {}/api/v1/analyze",
        config.server_url
    );

    let response = client
        .post(format!("{}/api/v1/analyze", config.server_url))
        .multipart(form)
        .send()
        .await
        .map_err(|e| anyhow!("Failed to send request: {}", e))?;

    let status = response.status();
    let response_text = response
        .text()
        .await
        .map_err(|e| anyhow!("Failed to read response: {}", e))?;

    if !status.is_success() {
        return Err(anyhow!(
            "Server returned error {}: {}",
            status,
            response_text
        ));
    }

    let json: Value = serde_json::from_str(&response_text)
        .map_err(|e| anyhow!("Failed to parse JSON response: {}", e))?;

    Ok(json)
}

pub async fn check_server_health(server_url: &str) -> Result<()> {
    let client = reqwest::Client::new();

    println!("🔍 Checking server health at: {server_url}/api/v1/health");

    let response = client
        .get(format!("{server_url}/api/v1/health"))
        .send()
        .await
        .map_err(|e| anyhow!("Failed to connect to server: {}", e))?;

    if response.status().is_success() {
        println!("✅ Server is healthy");
        Ok(())
    } else {
        Err(anyhow!("Server health check failed: {}", response.status()))
    }
}

pub async fn run_client(config: ClientConfig) -> Result<()> {
    println!("🎵 Mood Scribe Client");
    println!("=====================");
    println!("📁 File: {}", config.audio_file);
    println!();

    if let Err(e) = check_server_health(&config.server_url).await {
        eprintln!("❌ {e}");
        eprintln!("💡 Make sure the server is running: mood-scribe serve");
        return Err(e);
    }

    match send_analysis_request(&config).await {
        Ok(result) => {
            println!("\n✅ Analysis completed!");
            println!("📝 Result:");
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Err(e) => {
            eprintln!("❌ Analysis failed: {e}");
            return Err(e);
        }
    }

    Ok(())
}

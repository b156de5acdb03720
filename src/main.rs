mod cli;
mod client;
mod config;
mod download;
mod dto;
mod pages;
mod sentiment;
mod server;
mod speech;
mod upload;

use clap::Parser;

use cli::{Cli, Commands};
use config::ClientConfig;
use sentiment::SentimentAnalyzer;

fn analyze_text_locally(text: &str) {
    let analyzer = SentimentAnalyzer::new();
    match analyzer.analyze_review(text) {
        Some(analysis) => {
            println!(
                "{} {}  (mean compound {:.4} over {} segment{})",
                analysis.label,
                analysis.label.emoji(),
                analysis.mean_compound,
                analysis.segment_count,
                if analysis.segment_count == 1 { "" } else { "s" }
            );
        }
        None => println!("Nothing to analyze: text contains no sentences."),
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Serve { host, port } => server::run_server(host, port).await?,
        Commands::AnalyzeFile {
            audio_file,
            server_url,
        } => client::run_client(ClientConfig::new(server_url, audio_file)).await?,
        Commands::AnalyzeText { text } => analyze_text_locally(&text),
        Commands::DownloadModel { model, models_path } => {
            download::download_model(&model, models_path).await?
        }
    }

    Ok(())
}

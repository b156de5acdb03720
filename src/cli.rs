use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "mood-scribe",
    about = "Mood Scribe - Speech & Text Sentiment Analysis",
    long_about = "A small web application that transcribes uploaded audio or scores typed text, maps the sentiment to Happy/Sad/Neutral, and renders the result. Also ships a client mode for talking to a running server.",
    after_help = "EXAMPLES:\n    # Start the analysis server\n    mood-scribe serve\n\n    # Fetch a whisper model first\n    mood-scribe download base.en\n\n    # Send an audio file to a running server\n    mood-scribe file my_review.wav\n\n    # Score text locally, no server needed\n    mood-scribe text \"I love this. I hate that.\"\n\n    # Use a different server when in client mode\n    mood-scribe file review.mp3 --server-url http://my-server:8080"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(name = "serve")]
    Serve {
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        #[arg(long, default_value = "8080")]
        port: u16,
    },
    #[command(name = "file")]
    AnalyzeFile {
        audio_file: String,

        #[arg(long, default_value = "http://localhost:8080")]
        server_url: String,
    },
    #[command(name = "text")]
    AnalyzeText { text: String },
    #[command(name = "download")]
    DownloadModel {
        model: String,

        #[arg(long)]
        models_path: Option<String>,
    },
}

use dotenv::dotenv;
use std::path::PathBuf;

#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
pub struct SpeechConfig {
    pub model_path: PathBuf,
    pub use_gpu: bool,
    pub language: String,
    pub audio_context: i32,
    pub no_speech_threshold: f32,
    pub num_threads: i32,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        dotenv().ok();
        Self {
            model_path: PathBuf::from(
                std::env::var("WHISPER_MODEL_PATH")
                    .unwrap_or_else(|_| "models/ggml-base.en.bin".to_string()),
            ),
            use_gpu: true,
            language: "en".to_string(),
            audio_context: 768,
            no_speech_threshold: 0.5,
            num_threads: 2,
        }
    }
}

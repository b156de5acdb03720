use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use log::{debug, info};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::speech::config::SpeechConfig;
use crate::speech::decoder::decode_audio_file;
use crate::speech::resampler::resample_to_16khz;

/// Speech-to-text collaborator: saved audio artifact in, transcript out.
///
/// `Ok(None)` means the engine could not make out any speech. That is a
/// normal outcome, not an error.
pub trait TranscriptionEngine: Send + Sync {
    fn transcribe_file(&self, path: &Path) -> Result<Option<String>>;
}

/// whisper.cpp-backed engine. The context is loaded once at startup and
/// shared read-only; transcription runs serialize on the inner lock.
#[derive(Clone)]
pub struct WhisperEngine {
    inner: Arc<Mutex<EngineInner>>,
    config: SpeechConfig,
}

struct EngineInner {
    ctx: WhisperContext,
}

impl WhisperEngine {
    pub fn new(config: SpeechConfig) -> Result<Self> {
        let mut ctx_params = WhisperContextParameters::default();
        ctx_params.use_gpu(config.use_gpu);

        let model_path = config
            .model_path
            .to_str()
            .ok_or_else(|| anyhow::anyhow!("Model path is not valid UTF-8"))?;
        let ctx = WhisperContext::new_with_params(model_path, ctx_params)
            .map_err(|e| anyhow::anyhow!("Failed to load model: {}", e))?;

        Ok(Self {
            inner: Arc::new(Mutex::new(EngineInner { ctx })),
            config,
        })
    }
}

impl TranscriptionEngine for WhisperEngine {
    fn transcribe_file(&self, path: &Path) -> Result<Option<String>> {
        let decoded = decode_audio_file(path)?;
        let audio = resample_to_16khz(&decoded.samples, decoded.sample_rate)?;

        if audio.len() < 16000 {
            debug!("Audio shorter than one second, treating as unintelligible");
            return Ok(None);
        }

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_language(Some(&self.config.language));
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);
        params.set_audio_ctx(self.config.audio_context);
        params.set_no_speech_thold(self.config.no_speech_threshold);
        params.set_n_threads(self.config.num_threads);

        let inner = self
            .inner
            .lock()
            .map_err(|_| anyhow::anyhow!("Failed to acquire transcriber lock"))?;

        let mut state = inner
            .ctx
            .create_state()
            .map_err(|e| anyhow::anyhow!("Failed to create whisper state: {}", e))?;

        state
            .full(params, &audio)
            .map_err(|e| anyhow::anyhow!("Failed to run transcription: {}", e))?;

        let num_segments = state
            .full_n_segments()
            .map_err(|e| anyhow::anyhow!("Failed to get segment count: {}", e))?;

        let mut transcript = String::new();
        for i in 0..num_segments {
            let text = state
                .full_get_segment_text(i)
                .map_err(|e| anyhow::anyhow!("Failed to get segment text: {}", e))?;
            transcript.push_str(&text);
        }

        let transcript = transcript.trim().to_string();
        if transcript.is_empty() {
            info!("No intelligible speech recognized in {}", path.display());
            return Ok(None);
        }

        Ok(Some(transcript))
    }
}

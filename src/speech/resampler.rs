use anyhow::Result;
use rubato::{Resampler, SincFixedIn, SincInterpolationType, WindowFunction};

pub const WHISPER_SAMPLE_RATE: u32 = 16000;

/// Resample a mono signal to the 16kHz whisper expects.
pub fn resample_to_16khz(samples: &[f32], sample_rate: u32) -> Result<Vec<f32>> {
    if sample_rate == WHISPER_SAMPLE_RATE {
        return Ok(samples.to_vec());
    }
    if samples.is_empty() {
        return Err(anyhow::anyhow!("No audio frames to resample"));
    }

    let params = rubato::SincInterpolationParameters {
        sinc_len: 128,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };

    let resample_ratio = WHISPER_SAMPLE_RATE as f64 / sample_rate as f64;
    let mut resampler = SincFixedIn::<f32>::new(resample_ratio, 2.0, params, samples.len(), 1)?;

    let resampled = resampler.process(&[samples], None)?;
    let delay = resampler.output_delay();
    let expected_frames = (samples.len() as f64 * resample_ratio) as usize;

    let end = (delay + expected_frames).min(resampled[0].len());
    let start = delay.min(end);

    Ok(resampled[0][start..end].to_vec())
}

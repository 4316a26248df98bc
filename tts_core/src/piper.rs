//! Piper-backed [`SpeechSynthesizer`].

use std::{
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};

use piper_rs::synth::{PiperSpeechStreamParallel, PiperSpeechSynthesizer};
use tracing::{debug, info};

use crate::error::{TtsError, TtsResult};
use crate::synth::{PcmChunks, SpeechSynthesizer};

/// A single Piper voice, loaded once and shared for the process lifetime.
pub struct PiperSynthesizer {
    // piper-rs makes no promise about concurrent inference, so calls are serialized
    synth: Mutex<PiperSpeechSynthesizer>,
    sample_rate: u32,
    model_path: PathBuf,
}

// Manual Debug implementation since PiperSpeechSynthesizer doesn't implement Debug
impl std::fmt::Debug for PiperSynthesizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PiperSynthesizer")
            .field("synth", &"<PiperSpeechSynthesizer>")
            .field("sample_rate", &self.sample_rate)
            .field("model_path", &self.model_path)
            .finish()
    }
}

impl PiperSynthesizer {
    /// Load a voice from its `.onnx` model path (or directly from its `.onnx.json` config).
    pub fn load<P: AsRef<Path>>(model_path: P) -> TtsResult<Self> {
        let model_path = model_path.as_ref().to_path_buf();
        let cfg_path = config_path_for(&model_path);

        if !cfg_path.is_file() {
            return Err(TtsError::model_load(
                &model_path,
                format!("voice config {} not found", cfg_path.display()),
            ));
        }

        let sample_rate = read_sample_rate(&cfg_path)?;
        info!(config = %cfg_path.display(), sample_rate, "Loading Piper voice");

        let model = piper_rs::from_config_path(&cfg_path)
            .map_err(|e| TtsError::model_load(&model_path, format!("piper load error: {e}")))?;
        let synth = PiperSpeechSynthesizer::new(model)
            .map_err(|e| TtsError::model_load(&model_path, e))?;

        Ok(Self {
            synth: Mutex::new(synth),
            sample_rate,
            model_path,
        })
    }

    pub fn model_path(&self) -> &Path {
        &self.model_path
    }
}

impl SpeechSynthesizer for PiperSynthesizer {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn synthesize<'a>(&'a self, text: &str) -> TtsResult<PcmChunks<'a>> {
        let stream: PiperSpeechStreamParallel = {
            let synth = self.synth.lock().map_err(|_| {
                TtsError::Synthesis(
                    "Synthesizer lock poisoned - this indicates a previous panic. Please restart the server."
                        .to_string(),
                )
            })?;
            synth
                .synthesize_parallel(text.to_string(), None)
                .map_err(|e| TtsError::Synthesis(e.to_string()))?
        };
        debug!(chars = text.chars().count(), "Piper synthesis started");

        Ok(Box::new(stream.map(|part| {
            part.map(|samples| samples_to_pcm16(&samples.into_vec()))
                .map_err(|e| TtsError::Synthesis(e.to_string()))
        })))
    }
}

/// Piper keeps a voice's config next to the model as `<model>.onnx.json`.
pub fn config_path_for(model_path: &Path) -> PathBuf {
    if model_path.extension().is_some_and(|ext| ext == "json") {
        return model_path.to_path_buf();
    }
    let mut cfg = model_path.as_os_str().to_owned();
    cfg.push(".json");
    PathBuf::from(cfg)
}

/// Read the output sample rate from a voice config JSON.
pub fn read_sample_rate<P: AsRef<Path>>(cfg_path: P) -> TtsResult<u32> {
    let cfg_path = cfg_path.as_ref();
    let text = fs::read_to_string(cfg_path)
        .map_err(|e| TtsError::model_load(cfg_path, format!("failed to read config file: {e}")))?;
    let json: serde_json::Value = serde_json::from_str(&text)
        .map_err(|e| TtsError::model_load(cfg_path, format!("config file is not valid JSON: {e}")))?;

    json.get("audio")
        .and_then(|a| a.get("sample_rate"))
        .and_then(|sr| sr.as_u64())
        .and_then(|sr| u32::try_from(sr).ok())
        .filter(|&sr| sr > 0)
        .ok_or_else(|| TtsError::model_load(cfg_path, "missing or invalid 'audio.sample_rate' in config"))
}

/// Convert f32 samples in [-1.0, 1.0] to little-endian 16-bit PCM.
pub fn samples_to_pcm16(samples: &[f32]) -> Vec<u8> {
    const I16_MAX_F32: f32 = i16::MAX as f32;

    let mut pcm = Vec::with_capacity(samples.len() * 2);
    for &s in samples {
        let v = (s.clamp(-1.0, 1.0) * I16_MAX_F32) as i16;
        pcm.extend_from_slice(&v.to_le_bytes());
    }
    pcm
}

//! Common utilities for integration tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, Response},
    Router,
};
use base64::Engine;
use tts_core::{inspect_wav, PcmChunks, SpeechSynthesizer, TtsError, TtsResult, WavInfo};
use tts_server::{router, AppState};

pub const SAMPLE_RATE: u32 = 22_050;

/// Deterministic stand-in for a Piper voice.
///
/// Emits one chunk per whitespace-separated word. Every sample in a word's
/// chunk carries that word's position and length, so reordered or mixed-up
/// chunks are visible in the decoded audio.
pub struct FakeVoice {
    pub calls: AtomicUsize,
}

impl FakeVoice {
    pub fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The PCM chunks this voice produces for `text`.
    pub fn expected_chunks(text: &str) -> Vec<Vec<u8>> {
        text.split_whitespace()
            .enumerate()
            .map(|(i, word)| {
                let value = (i as i16 + 1) * 100 + word.len() as i16;
                let samples = 10 * word.len();
                (0..samples).flat_map(|_| value.to_le_bytes()).collect()
            })
            .collect()
    }
}

impl SpeechSynthesizer for FakeVoice {
    fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    fn synthesize<'a>(&'a self, text: &str) -> TtsResult<PcmChunks<'a>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(Self::expected_chunks(text).into_iter().map(Ok)))
    }
}

/// A voice whose engine always fails partway through.
pub struct BrokenVoice {
    pub message: &'static str,
}

impl SpeechSynthesizer for BrokenVoice {
    fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    fn synthesize<'a>(&'a self, _text: &str) -> TtsResult<PcmChunks<'a>> {
        let chunks = vec![Ok(vec![0u8; 64]), Err(TtsError::Synthesis(self.message.to_string()))];
        Ok(Box::new(chunks.into_iter()))
    }
}

pub fn app_with(synth: Arc<dyn SpeechSynthesizer>) -> Router {
    router(AppState::new(synth))
}

/// Create a test app backed by a fresh [`FakeVoice`].
pub fn create_test_app() -> (Router, Arc<FakeVoice>) {
    let voice = Arc::new(FakeVoice::new());
    (app_with(voice.clone()), voice)
}

pub fn post_tts(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/tts")
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// Decode the `audio` field of a `/tts` response body into a WAV.
pub fn decode_audio(json: &serde_json::Value) -> WavInfo {
    let b64 = json["audio"].as_str().expect("audio should be a string");
    let wav = base64::engine::general_purpose::STANDARD
        .decode(b64)
        .expect("audio should be valid base64");
    inspect_wav(&wav).expect("audio should be a valid WAV")
}

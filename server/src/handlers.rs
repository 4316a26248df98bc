use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use base64::Engine;
use serde::Serialize;
use tracing::debug;
use tts_core::{encode_wav, synthesize_pcm, PcmFormat, SpeechSynthesizer};

use crate::error::ApiError;
use crate::validation::parse_tts_request;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct TtsResponse {
    pub audio: String,
    pub format: &'static str,
}

/// A finished utterance, ready to be written out.
struct RenderedAudio {
    wav_base64: String,
    chunks: usize,
    pcm_len: usize,
    duration_ms: u64,
}

/// Synthesize `text`, wrap the PCM in a WAV container and base64 it.
///
/// Blocks on the engine; run it off the async runtime.
fn render_wav(synth: &dyn SpeechSynthesizer, text: &str) -> Result<RenderedAudio, ApiError> {
    let (pcm, chunks) = synthesize_pcm(synth, text)?;

    let format = PcmFormat::mono16(synth.sample_rate());
    let wav = encode_wav(&pcm, format)?;

    Ok(RenderedAudio {
        wav_base64: base64::engine::general_purpose::STANDARD.encode(wav),
        chunks,
        pcm_len: pcm.len(),
        duration_ms: format.duration_ms(pcm.len()),
    })
}

pub async fn tts_endpoint(State(state): State<AppState>, body: Bytes) -> Result<Response, ApiError> {
    let text = parse_tts_request(&body)?;
    let text_len = text.chars().count();

    let synth = Arc::clone(&state.synth);
    let rendered = tokio::task::spawn_blocking(move || render_wav(synth.as_ref(), &text))
        .await
        .map_err(|e| ApiError::InternalError(format!("Task join error: {e}")))??;

    debug!(
        text_len,
        chunks = rendered.chunks,
        pcm_bytes = rendered.pcm_len,
        duration_ms = rendered.duration_ms,
        "Synthesized speech"
    );

    let mut response = Json(TtsResponse {
        audio: rendered.wav_base64,
        format: "wav",
    })
    .into_response();
    response.headers_mut().insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    Ok(response)
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound
}

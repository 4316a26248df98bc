//! The synthesis contract the HTTP layer programs against.

use crate::error::{TtsError, TtsResult};

/// One unit of engine output: consecutive little-endian 16-bit samples.
pub type PcmChunk = Vec<u8>;

/// A finite, ordered producer of PCM chunks for one input text.
pub type PcmChunks<'a> = Box<dyn Iterator<Item = TtsResult<PcmChunk>> + 'a>;

/// A loaded voice that turns text into mono 16-bit PCM.
///
/// Implementations are created once at startup and shared by every request,
/// so they must be safe to call from several threads at once.
pub trait SpeechSynthesizer: Send + Sync {
    /// Fixed sample rate of everything this voice produces.
    fn sample_rate(&self) -> u32;

    /// Start synthesizing `text`. Concatenating the yielded chunks in order
    /// gives the complete utterance.
    fn synthesize<'a>(&'a self, text: &str) -> TtsResult<PcmChunks<'a>>;
}

/// Drain `chunks` into one buffer, preserving order.
///
/// Returns the number of chunks alongside the buffer. The first failed chunk
/// aborts the whole utterance.
pub fn collect_pcm(chunks: PcmChunks<'_>) -> TtsResult<(Vec<u8>, usize)> {
    let mut pcm = Vec::new();
    let mut count = 0usize;
    for chunk in chunks {
        pcm.extend_from_slice(&chunk?);
        count += 1;
    }
    Ok((pcm, count))
}

/// Synthesize `text` completely and return the concatenated PCM.
pub fn synthesize_pcm<S>(synth: &S, text: &str) -> TtsResult<(Vec<u8>, usize)>
where
    S: SpeechSynthesizer + ?Sized,
{
    if text.is_empty() {
        return Err(TtsError::EmptyText);
    }
    collect_pcm(synth.synthesize(text)?)
}

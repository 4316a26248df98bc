//! Speech synthesis core: the synthesizer contract, the Piper voice adapter
//! and WAV packaging of the PCM it produces.

mod error;
pub mod piper;
pub mod synth;
pub mod wav;

pub use error::{TtsError, TtsResult};
pub use piper::PiperSynthesizer;
pub use synth::{collect_pcm, synthesize_pcm, PcmChunk, PcmChunks, SpeechSynthesizer};
pub use wav::{encode_wav, inspect_wav, PcmFormat, WavInfo};

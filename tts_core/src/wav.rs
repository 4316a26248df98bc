//! WAV (RIFF) packaging of raw PCM payloads.
//!
//! The container header states the exact payload length, so a container is
//! always written in one go from a complete buffer.

use std::io::Cursor;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use crate::error::{TtsError, TtsResult};

/// Size of the canonical PCM header hound writes for mono/stereo 16-bit audio.
pub const WAV_HEADER_LEN: usize = 44;

/// Layout of a raw PCM payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PcmFormat {
    pub channels: u16,
    /// Bytes per sample.
    pub sample_width: u16,
    pub sample_rate: u32,
}

impl PcmFormat {
    /// Mono, 16-bit signed samples: what every Piper voice produces.
    pub fn mono16(sample_rate: u32) -> Self {
        Self {
            channels: 1,
            sample_width: 2,
            sample_rate,
        }
    }

    /// Bytes per frame (one sample for every channel).
    pub fn frame_size(&self) -> usize {
        self.channels as usize * self.sample_width as usize
    }

    /// Playback length of `payload_len` bytes of PCM in this layout.
    pub fn duration_ms(&self, payload_len: usize) -> u64 {
        let frame = self.frame_size();
        if frame == 0 || self.sample_rate == 0 {
            return 0;
        }
        (payload_len / frame) as u64 * 1000 / self.sample_rate as u64
    }

    fn wav_spec(&self) -> TtsResult<WavSpec> {
        if self.channels == 0 {
            return Err(TtsError::Encoding("channel count must be positive".to_string()));
        }
        if self.sample_rate == 0 {
            return Err(TtsError::Encoding("sample rate must be positive".to_string()));
        }
        if self.sample_width != 2 {
            return Err(TtsError::Encoding(format!(
                "unsupported sample width: {} bytes (only 16-bit PCM is supported)",
                self.sample_width
            )));
        }

        Ok(WavSpec {
            channels: self.channels,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        })
    }
}

/// Wrap little-endian 16-bit PCM bytes in a WAV container.
///
/// `pcm` should hold whole frames. A trailing partial sample cannot be
/// represented and is left out of the container.
pub fn encode_wav(pcm: &[u8], format: PcmFormat) -> TtsResult<Vec<u8>> {
    let spec = format.wav_spec()?;

    let mut cursor = Cursor::new(Vec::<u8>::with_capacity(WAV_HEADER_LEN + pcm.len()));
    {
        let mut writer = WavWriter::new(&mut cursor, spec)?;
        for sample in pcm.chunks_exact(2) {
            writer.write_sample(i16::from_le_bytes([sample[0], sample[1]]))?;
        }
        // finalize rewrites the RIFF and data lengths now that the payload is known
        writer.finalize()?;
    }

    Ok(cursor.into_inner())
}

/// A decoded 16-bit WAV container.
#[derive(Debug, Clone)]
pub struct WavInfo {
    pub format: PcmFormat,
    /// Interleaved samples in file order.
    pub samples: Vec<i16>,
}

impl WavInfo {
    pub fn duration_ms(&self) -> u64 {
        self.format.duration_ms(self.samples.len() * 2)
    }

    /// The payload as little-endian bytes, i.e. what was handed to [`encode_wav`].
    pub fn pcm_bytes(&self) -> Vec<u8> {
        self.samples.iter().flat_map(|s| s.to_le_bytes()).collect()
    }
}

/// Parse a 16-bit integer WAV container.
pub fn inspect_wav(bytes: &[u8]) -> TtsResult<WavInfo> {
    let reader = WavReader::new(Cursor::new(bytes))?;
    let spec = reader.spec();
    if spec.sample_format != SampleFormat::Int || spec.bits_per_sample != 16 {
        return Err(TtsError::Encoding(format!(
            "unsupported WAV layout: {:?} {}-bit",
            spec.sample_format, spec.bits_per_sample
        )));
    }

    let samples = reader
        .into_samples::<i16>()
        .collect::<Result<Vec<_>, _>>()?;

    Ok(WavInfo {
        format: PcmFormat {
            channels: spec.channels,
            sample_width: spec.bits_per_sample / 8,
            sample_rate: spec.sample_rate,
        },
        samples,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pcm_from(samples: &[i16]) -> Vec<u8> {
        samples.iter().flat_map(|s| s.to_le_bytes()).collect()
    }

    fn u32_at(buf: &[u8], offset: usize) -> u32 {
        u32::from_le_bytes(buf[offset..offset + 4].try_into().unwrap())
    }

    fn u16_at(buf: &[u8], offset: usize) -> u16 {
        u16::from_le_bytes(buf[offset..offset + 2].try_into().unwrap())
    }

    #[test]
    fn test_header_describes_payload() {
        let pcm = pcm_from(&[0, 1000, -1000, i16::MAX, i16::MIN]);
        let wav = encode_wav(&pcm, PcmFormat::mono16(22_050)).unwrap();

        assert_eq!(wav.len(), WAV_HEADER_LEN + pcm.len());
        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(u32_at(&wav, 4) as usize, wav.len() - 8);
        assert_eq!(&wav[8..12], b"WAVE");
        assert_eq!(&wav[12..16], b"fmt ");
        assert_eq!(u16_at(&wav, 20), 1); // PCM
        assert_eq!(u16_at(&wav, 22), 1); // channels
        assert_eq!(u32_at(&wav, 24), 22_050);
        assert_eq!(u32_at(&wav, 28), 22_050 * 2); // byte rate
        assert_eq!(u16_at(&wav, 32), 2); // block align
        assert_eq!(u16_at(&wav, 34), 16);
        assert_eq!(&wav[36..40], b"data");
        assert_eq!(u32_at(&wav, 40) as usize, pcm.len());
        assert_eq!(&wav[WAV_HEADER_LEN..], &pcm[..]);
    }

    #[test]
    fn test_round_trip_preserves_samples_and_rate() {
        let samples: Vec<i16> = (0..2_205).map(|i| ((i * 37) % 65_536 - 32_768) as i16).collect();
        let pcm = pcm_from(&samples);

        let wav = encode_wav(&pcm, PcmFormat::mono16(16_000)).unwrap();
        let info = inspect_wav(&wav).unwrap();

        assert_eq!(info.format, PcmFormat::mono16(16_000));
        assert_eq!(info.samples.len(), samples.len());
        assert_eq!(info.pcm_bytes(), pcm);
    }

    #[test]
    fn test_empty_payload_is_still_a_valid_container() {
        let wav = encode_wav(&[], PcmFormat::mono16(22_050)).unwrap();
        assert_eq!(wav.len(), WAV_HEADER_LEN);

        let info = inspect_wav(&wav).unwrap();
        assert!(info.samples.is_empty());
        assert_eq!(info.duration_ms(), 0);
    }

    #[test]
    fn test_trailing_partial_sample_is_dropped() {
        let mut pcm = pcm_from(&[10, 20, 30]);
        pcm.push(0x7f);

        let wav = encode_wav(&pcm, PcmFormat::mono16(8_000)).unwrap();
        let info = inspect_wav(&wav).unwrap();
        assert_eq!(info.samples, vec![10, 20, 30]);
    }

    #[test]
    fn test_rejects_unsupported_layouts() {
        let pcm = pcm_from(&[1, 2]);

        let wide = PcmFormat {
            sample_width: 3,
            ..PcmFormat::mono16(22_050)
        };
        assert!(matches!(encode_wav(&pcm, wide), Err(TtsError::Encoding(_))));

        let no_rate = PcmFormat::mono16(0);
        assert!(matches!(encode_wav(&pcm, no_rate), Err(TtsError::Encoding(_))));

        let no_channels = PcmFormat {
            channels: 0,
            ..PcmFormat::mono16(22_050)
        };
        assert!(matches!(encode_wav(&pcm, no_channels), Err(TtsError::Encoding(_))));
    }

    #[test]
    fn test_inspect_rejects_garbage() {
        assert!(inspect_wav(b"definitely not a wav file").is_err());
    }

    #[test]
    fn test_duration_ms() {
        let format = PcmFormat::mono16(22_050);
        assert_eq!(format.duration_ms(22_050 * 2), 1000);
        assert_eq!(format.duration_ms(11_025 * 2), 500);
        assert_eq!(format.duration_ms(0), 0);
    }
}

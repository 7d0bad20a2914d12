//! External interface types (§6): the producer-side `AudioSample` and the
//! consumer-side `DecodeResult`.

use crate::error::{AudioError, BitDepthMismatchSnafu, ChannelCountMismatchSnafu, SampleRateTooLowSnafu};
use serde::Serialize;
use snafu::ensure;

/// Minimum tolerated sample rate, per §6.
pub const MIN_SAMPLE_RATE_HZ: u32 = 12_000;

/// A chunk of mono 16-bit PCM audio tagged with a GPS-anchored arrival time.
///
/// `t_ns` is the GPS-anchored wall-clock nanosecond timestamp of the chunk's
/// first sample. The decoder tolerates arbitrary chunk sizes.
#[derive(Debug, Clone)]
pub struct AudioSample {
    pub samples: Vec<i16>,
    pub sample_rate: u32,
    pub t_ns: i64,
}

impl AudioSample {
    /// Construct a chunk, rejecting anything the decoder cannot admit.
    /// Never panics: every pre-slot rejection in §7 is an `Err`, not a panic.
    pub fn new(samples: Vec<i16>, sample_rate: u32, t_ns: i64) -> Result<Self, AudioError> {
        ensure!(sample_rate >= MIN_SAMPLE_RATE_HZ, SampleRateTooLowSnafu { rate: sample_rate });
        Ok(AudioSample { samples, sample_rate, t_ns })
    }

    /// Construct from an interleaved source that also reports channel count
    /// and bit depth, for producers (like a WAV reader) that must validate
    /// those before even normalizing to mono PCM.
    pub fn from_wav_frame(
        samples: Vec<i16>,
        sample_rate: u32,
        channels: u16,
        bits_per_sample: u16,
        t_ns: i64,
    ) -> Result<Self, AudioError> {
        ensure!(channels == 1, ChannelCountMismatchSnafu { channels });
        ensure!(bits_per_sample == 16, BitDepthMismatchSnafu { bits: bits_per_sample });
        Self::new(samples, sample_rate, t_ns)
    }

    /// Normalized float samples in [-1.0, 1.0), as fed to the Monitor.
    pub fn to_f32(&self) -> Vec<f32> {
        self.samples.iter().map(|&s| s as f32 / 32768.0).collect()
    }
}

/// One decoded transmission, ready for serialization to a downstream
/// consumer. Field names match §6's JSON contract exactly.
#[derive(Debug, Clone, Serialize)]
pub struct DecodeResult {
    pub timestamp: i64,
    pub utc: String,
    pub snr: f32,
    pub delta_t: f32,
    pub frequency: f32,
    pub message: String,
    pub protocol: String,
    pub slot_number: u64,
    pub score: i16,
}

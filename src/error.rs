//! Typed errors for the audio ingestion boundary.
//!
//! Every variant here is recoverable: the slot controller turns an
//! `AudioError` into a dropped chunk and a warning. Nothing in this module
//! is fatal to the running decoder instance. Per-candidate decode failures
//! (C5–C7) are local to `slot.rs::run_decode_pass` and reported there as
//! plain `Result<_, String>`/`debug` logging rather than a typed enum, since
//! nothing outside that loop ever inspects which stage rejected a candidate.

use snafu::Snafu;

/// Rejections raised while constructing or admitting an `AudioSample`.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum AudioError {
    #[snafu(display("audio chunk has {channels} channels, decoder requires mono"))]
    ChannelCountMismatch { channels: u16 },

    #[snafu(display("audio chunk has {bits}-bit samples, decoder requires 16-bit"))]
    BitDepthMismatch { bits: u16 },

    #[snafu(display("sample rate {rate} Hz is below the 12 000 Hz minimum"))]
    SampleRateTooLow { rate: u32 },
}

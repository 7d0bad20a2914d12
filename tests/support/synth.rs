//! Test-only waveform synthesis: GFSK tone modulation plus an AWGN channel,
//! used to build end-to-end fixtures for the slot controller.
//!
//! Grounded on `src/sync/synthesize.rs` (Gaussian pulse shaping, phase
//! accumulation) and `src/modulation/mgfsk.rs` (boxcar-convolution framing),
//! collapsed to a single real-valued (not complex-baseband) waveform since
//! the decoder consumes real `AudioSample` PCM, plus `src/simulation/noise.rs`
//! (RMS-power SNR scaling, white noise generation).

use rand::prelude::*;
use rand_distr::{Distribution, Normal};

use rustyft8::protocol::{Protocol, SAMPLE_RATE, TONE_SPACING};

const TWOPI: f32 = 2.0 * std::f32::consts::PI;
const BT: f32 = 2.0;

fn gfsk_pulse(bt: f32, t: f32) -> f32 {
    let c = std::f32::consts::PI * (2.0 * bt / f32::sqrt(f32::ln(2.0)));
    let arg = c * t;
    f32::exp(-arg * arg)
}

fn generate_pulse(nsps: usize, bt: f32) -> Vec<f32> {
    let mut pulse = vec![0.0f32; 3 * nsps];
    for (i, p) in pulse.iter_mut().enumerate() {
        let tt = (i as f32 - 1.5 * nsps as f32) / nsps as f32;
        *p = gfsk_pulse(bt, tt);
    }
    pulse
}

/// Synthesize a real-valued GFSK waveform for a full tone sequence (sync and
/// data tones both included), centered at `f0` Hz.
pub fn synthesize_tone_waveform(protocol: Protocol, tones: &[u8], f0: f32) -> Vec<f32> {
    let nsps = protocol.block_size();
    let nsym = tones.len();
    let pulse = generate_pulse(nsps, BT);
    let dphi_peak = TWOPI * TONE_SPACING / SAMPLE_RATE;

    let dphi_len = (nsym + 2) * nsps;
    let mut dphi = vec![0.0f32; dphi_len];

    for (j, &tone) in tones.iter().enumerate() {
        let ib = j * nsps;
        for (k, &p) in pulse.iter().enumerate() {
            let idx = ib + k;
            if idx < dphi.len() {
                dphi[idx] += dphi_peak * p * tone as f32;
            }
        }
    }

    let dt = 1.0 / SAMPLE_RATE;
    for d in dphi.iter_mut() {
        *d += TWOPI * f0 * dt;
    }

    let nwave = nsym * nsps;
    let mut phi = 0.0f32;
    let mut out = vec![0.0f32; nwave];
    for (k, sample) in out.iter_mut().enumerate() {
        let j = nsps + k;
        *sample = f32::cos(phi);
        if j < dphi.len() {
            phi = (phi + dphi[j]) % TWOPI;
        }
    }
    out
}

fn rms_power(signal: &[f32]) -> f32 {
    let sum_squares: f32 = signal.iter().map(|&x| x * x).sum();
    (sum_squares / signal.len() as f32).sqrt()
}

/// Generate zero-mean Gaussian white noise with the given standard deviation.
pub fn white_noise(num_samples: usize, sigma: f32) -> Vec<f32> {
    let mut rng = rand::rng();
    let normal = Normal::new(0.0, sigma).unwrap();
    (0..num_samples).map(|_| normal.sample(&mut rng) as f32).collect()
}

/// Lay `waveform` into a `len`-sample noise floor at `start_index`, scaled to
/// hit the requested SNR (dB) against the noise's RMS power.
pub fn mix_at_snr(waveform: &[f32], start_index: usize, len: usize, noise_sigma: f32, snr_db: f32) -> Vec<f32> {
    let mut samples = white_noise(len, noise_sigma);

    let snr_linear = 10.0f32.powf(snr_db / 10.0);
    let desired_signal_rms = noise_sigma * snr_linear;
    let signal_rms = rms_power(waveform).max(1e-9);
    let scale = desired_signal_rms / signal_rms;

    for (i, &s) in waveform.iter().enumerate() {
        let idx = start_index + i;
        if idx < samples.len() {
            samples[idx] += s * scale;
        }
    }
    samples
}

/// Convert a normalized `f32` waveform to 16-bit PCM, clipping at full scale.
pub fn to_i16_samples(waveform: &[f32], scale: f32) -> Vec<i16> {
    waveform.iter().map(|&s| (s * scale).clamp(i16::MIN as f32, i16::MAX as f32) as i16).collect()
}

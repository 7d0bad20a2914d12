//! Result assembly (C9): SNR estimation, per-slot duplicate suppression.
//!
//! Grounded on the teacher's `sync::calculate_snr` (same reconstruct-tones,
//! measure-power-at-expected-and-offset-tone shape), restructured to read
//! from the already-built `Waterfall` instead of raw `s8` power arrays
//! collected during symbol extraction.

use std::collections::HashSet;

use crate::candidate::Candidate;
use crate::protocol::Protocol;
use crate::waterfall::Waterfall;

/// Reconstruct the full transmitted tone sequence (sync + data) from 174
/// decoded bits, for use as the expected-tone reference in SNR estimation.
pub fn reconstruct_tones(protocol: Protocol, bits: &[bool; 174]) -> Vec<u8> {
    let mut tones = vec![0u8; protocol.symbol_count()];
    for (i, tone) in tones.iter_mut().enumerate() {
        if let Some(sync_tone) = protocol.sync_tone(i) {
            *tone = sync_tone;
        }
    }

    let gray_map = protocol.gray_map();
    let bits_per_symbol = protocol.bits_per_symbol();
    for k in 0..protocol.data_symbol_count() {
        let mut value = 0usize;
        for b in 0..bits_per_symbol {
            let bit_idx = k * bits_per_symbol + b;
            value = (value << 1) | (bits[bit_idx] as usize);
        }
        tones[protocol.data_symbol_index(k)] = gray_map[value];
    }
    tones
}

fn mag_to_db(u: u8) -> f32 {
    u as f32 * 0.5 - 120.0
}

/// Estimate SNR (dB) per §4.8's baseline method: linear power at each data
/// symbol's expected tone vs. an offset tone `(expected+4) mod tone_count`
/// used as a noise proxy.
pub fn estimate_snr(waterfall: &Waterfall, protocol: Protocol, candidate: &Candidate, tones: &[u8]) -> f32 {
    let tone_count = protocol.tone_count();
    let mut xsig = 0.0f64;
    let mut xbase = 0.0f64;
    let mut xnoi = 0.0f64;

    for k in 0..protocol.data_symbol_count() {
        let sym_index = protocol.data_symbol_index(k);
        let block = candidate.time_offset as i32 + sym_index as i32;
        if block < 0 {
            continue;
        }
        let tone = tones[sym_index] as i32;

        let bin = candidate.freq_offset as i32 + tone;
        if bin >= 0 {
            if let Some(u) = waterfall.mag(block as usize, candidate.time_sub as usize, candidate.freq_sub as usize, bin as usize) {
                let p = 10f64.powf(mag_to_db(u) as f64 / 10.0);
                xsig += p * p;
                xbase += p;
            }
        }

        let offset_tone = (tone as usize + 4) % tone_count;
        let obin = candidate.freq_offset as i32 + offset_tone as i32;
        if obin >= 0 {
            if let Some(u) = waterfall.mag(block as usize, candidate.time_sub as usize, candidate.freq_sub as usize, obin as usize) {
                let p = 10f64.powf(mag_to_db(u) as f64 / 10.0);
                xnoi += p * p;
            }
        }
    }

    tracing::trace!(xnoi, "offset-tone noise proxy accumulated, unused by the baseline SNR formula");

    if xbase <= 0.0 {
        return -24.0;
    }
    let arg = xsig / xbase / 3.0e6 - 1.0;
    if arg <= 0.0 {
        return -24.0;
    }
    let snr = 10.0 * arg.log10() - 27.0;
    (snr as f32).clamp(-24.0, 99.0)
}

/// Tracks CRC words already emitted within the current slot, so converging
/// candidates that decode to the same transmission collapse to one result.
#[derive(Default)]
pub struct DuplicateFilter {
    seen: HashSet<u16>,
}

impl DuplicateFilter {
    pub fn new() -> Self {
        DuplicateFilter::default()
    }

    /// Returns `true` the first time `crc` is seen this slot, `false` on
    /// every subsequent occurrence.
    pub fn accept(&mut self, crc: u16) -> bool {
        self.seen.insert(crc)
    }

    pub fn reset(&mut self) {
        self.seen.clear();
    }
}

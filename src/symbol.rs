//! Symbol extractor (C5): waterfall cells to 174 soft LLRs.
//!
//! Generalizes the teacher's Gray map/data-symbol layout and the
//! single-symbol branch of its max-log LLR computation (`sync::extract`),
//! but reads directly from already-built waterfall magnitudes instead of
//! re-downsampling the raw signal, and drops the multi-symbol coherent
//! combining the teacher layers on top — this contract is single-symbol,
//! max-log only.

use crate::candidate::Candidate;
use crate::protocol::Protocol;
use crate::waterfall::Waterfall;

pub const NUM_LLR: usize = 174;

/// Inverse of the waterfall's `u8 = clamp(round(2·dB + 240), 0, 255)` encoding.
fn mag_to_f32(u: u8) -> f32 {
    u as f32 * 0.5 - 120.0
}

/// Convert a candidate's waterfall neighborhood into 174 LLRs, normalized so
/// their variance is exactly 24.0.
pub fn extract_llrs(waterfall: &Waterfall, protocol: Protocol, candidate: &Candidate) -> [f32; NUM_LLR] {
    let mut llr = [0.0f32; NUM_LLR];
    let gray_map = protocol.gray_map();
    let tone_count = protocol.tone_count();
    let bits_per_symbol = protocol.bits_per_symbol();
    let mut bit_idx = 0;

    for k in 0..protocol.data_symbol_count() {
        let sym_index = protocol.data_symbol_index(k);
        let block = candidate.time_offset as i32 + sym_index as i32;

        let mut s = vec![0.0f32; tone_count];
        let mut in_bounds = block >= 0;
        if in_bounds {
            for (j, &tone) in gray_map.iter().enumerate() {
                let bin = candidate.freq_offset as i32 + tone as i32;
                if bin < 0 {
                    in_bounds = false;
                    break;
                }
                match waterfall.mag(block as usize, candidate.time_sub as usize, candidate.freq_sub as usize, bin as usize) {
                    Some(u) => s[j] = mag_to_f32(u),
                    None => {
                        in_bounds = false;
                        break;
                    }
                }
            }
        }

        for bit_pos in 0..bits_per_symbol {
            if bit_idx >= NUM_LLR {
                break;
            }
            if !in_bounds {
                llr[bit_idx] = 0.0;
                bit_idx += 1;
                continue;
            }
            let shift = bits_per_symbol - 1 - bit_pos;
            let mask = 1usize << shift;
            let mut max1 = f32::NEG_INFINITY;
            let mut max0 = f32::NEG_INFINITY;
            for (j, &v) in s.iter().enumerate() {
                if j & mask != 0 {
                    max1 = max1.max(v);
                } else {
                    max0 = max0.max(v);
                }
            }
            llr[bit_idx] = max1 - max0;
            bit_idx += 1;
        }
    }

    normalize(&mut llr);
    llr
}

/// Scale so the LLR sequence has variance exactly 24.0.
fn normalize(llr: &mut [f32; NUM_LLR]) {
    let n = NUM_LLR as f32;
    let mean: f32 = llr.iter().sum::<f32>() / n;
    let mean_sq: f32 = llr.iter().map(|v| v * v).sum::<f32>() / n;
    let variance = mean_sq - mean * mean;
    if variance > 0.0 {
        let scale = (24.0f32 / variance).sqrt();
        for v in llr.iter_mut() {
            *v *= scale;
        }
    }
}

//! Decoder configuration (§3, §6).
//!
//! Process-level configuration *loading* (files, env vars, CLI flags) is an
//! external collaborator; this module exposes the struct plus a `Default`
//! impl and nothing more, matching the teacher's `DecoderConfig` pattern in
//! `decoder.rs`.

use crate::protocol::Protocol;

#[derive(Debug, Clone, Copy)]
pub struct DecoderConfig {
    pub protocol: Protocol,
    /// Minimum Costas sync score a candidate must clear to be searched.
    pub min_score: i16,
    pub max_candidates: usize,
    pub ldpc_iterations: usize,
    pub freq_min: f32,
    pub freq_max: f32,
    pub time_osr: usize,
    pub freq_osr: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        DecoderConfig {
            protocol: Protocol::Ft8,
            min_score: 0,
            max_candidates: 140,
            ldpc_iterations: 25,
            freq_min: 100.0,
            freq_max: 3100.0,
            time_osr: 2,
            freq_osr: 2,
        }
    }
}

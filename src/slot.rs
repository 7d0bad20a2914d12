//! Slot controller (C8): GPS-slot alignment, sample buffering, and
//! orchestration of one decode pass (C3 through C9) per completed slot.
//!
//! Grounded on the teacher's `decoder::decode_ft8` orchestration (coarse
//! sync → per-candidate decode → dedup → callback), restructured from a
//! whole-recording batch function into an incremental state machine that
//! consumes `AudioSample` chunks as they arrive, per §4.1's
//! `{WaitingForSlot, Accumulating, Decoding}` contract.

use std::sync::Arc;

use crate::audio::{AudioSample, DecodeResult};
use crate::candidate;
use crate::config::DecoderConfig;
use crate::crc;
use crate::ldpc;
use crate::message::{self, CallsignHashTable};
use crate::result::{self, DuplicateFilter};
use crate::symbol;
use crate::waterfall::Monitor;

/// The 0.8 s early-RX offset from slot top, per §4.1.
const RX_EARLY_OFFSET_S: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    WaitingForSlot,
    Accumulating,
    Decoding,
}

pub struct SlotController {
    config: DecoderConfig,
    monitor: Monitor,
    hash_table: Arc<CallsignHashTable>,
    state: SlotState,
    slot_start_unix_s: i64,
    slot_number: u64,
    pending: Vec<f32>,
}

impl SlotController {
    pub fn new(config: DecoderConfig, hash_table: Arc<CallsignHashTable>) -> Self {
        let monitor = Monitor::new(config.protocol, config.freq_min, config.freq_max, config.time_osr, config.freq_osr);
        SlotController {
            config,
            monitor,
            hash_table,
            state: SlotState::WaitingForSlot,
            slot_start_unix_s: 0,
            slot_number: 0,
            pending: Vec::new(),
        }
    }

    pub fn state(&self) -> SlotState {
        self.state
    }

    pub fn slot_number(&self) -> u64 {
        self.slot_number
    }

    /// Consume one audio chunk, returning zero or more results for any slot
    /// completed by this call.
    pub fn ingest(&mut self, sample: &AudioSample) -> Vec<DecodeResult> {
        let period = self.config.protocol.slot_time() as f64;
        let t_s = sample.t_ns as f64 * 1e-9;
        let tau = (t_s - RX_EARLY_OFFSET_S).rem_euclid(period);

        match self.state {
            SlotState::WaitingForSlot => {
                if tau > period / 4.0 {
                    tracing::debug!(t_ns = sample.t_ns, tau, "sample rejected, mid-slot join");
                    return Vec::new();
                }
                self.slot_start_unix_s = t_s.floor() as i64 - tau as i64;
                self.monitor.reset();
                self.pending.clear();
                self.state = SlotState::Accumulating;
                self.accumulate(sample)
            }
            SlotState::Accumulating => {
                let slot_end_s = self.slot_start_unix_s as f64 + period;
                if t_s >= slot_end_s {
                    tracing::warn!(t_ns = sample.t_ns, "sample beyond current slot end, re-syncing");
                    self.state = SlotState::WaitingForSlot;
                    self.monitor.reset();
                    self.pending.clear();
                    return self.ingest(sample);
                }
                self.accumulate(sample)
            }
            SlotState::Decoding => Vec::new(),
        }
    }

    fn accumulate(&mut self, sample: &AudioSample) -> Vec<DecodeResult> {
        self.pending.extend(sample.to_f32());

        let block_size = self.config.protocol.block_size();
        let max_blocks = self.monitor.waterfall.max_blocks();
        while self.pending.len() >= block_size && self.monitor.waterfall.num_blocks() < max_blocks {
            let block: Vec<f32> = self.pending.drain(..block_size).collect();
            self.monitor.process(&block);
        }

        if self.monitor.waterfall.num_blocks() >= max_blocks {
            self.state = SlotState::Decoding;
            let results = self.run_decode_pass();
            self.slot_number += 1;
            self.state = SlotState::WaitingForSlot;
            results
        } else {
            Vec::new()
        }
    }

    fn run_decode_pass(&mut self) -> Vec<DecodeResult> {
        let protocol = self.config.protocol;
        let candidates = candidate::find_candidates(&self.monitor.waterfall, protocol, self.config.min_score, self.config.max_candidates);
        let mut dedup = DuplicateFilter::new();
        let mut results = Vec::new();

        for cand in &candidates {
            let llr = symbol::extract_llrs(&self.monitor.waterfall, protocol, cand);
            let ldpc_result = ldpc::decode(&llr, self.config.ldpc_iterations);
            if ldpc_result.errors != 0 {
                tracing::debug!(score = cand.score, "LDPC did not converge, candidate rejected");
                continue;
            }

            let payload91 = &ldpc_result.bits[..91];
            if !crc::crc14_check(payload91) {
                tracing::debug!(score = cand.score, "CRC mismatch after LDPC success, candidate rejected");
                continue;
            }

            let message_text = match message::decode_message(payload91, &self.hash_table) {
                Ok(text) => text,
                Err(err) => {
                    tracing::debug!(score = cand.score, error = %err, "message unpack failed, candidate rejected");
                    continue;
                }
            };

            let crc_word = crc::crc14(&payload91[..77]);
            if !dedup.accept(crc_word) {
                tracing::debug!(score = cand.score, "duplicate CRC within slot, candidate suppressed");
                continue;
            }

            let mut bits174 = [false; 174];
            for (i, bit) in ldpc_result.bits.iter().enumerate().take(174) {
                bits174[i] = *bit;
            }
            let tones = result::reconstruct_tones(protocol, &bits174);
            let snr = result::estimate_snr(&self.monitor.waterfall, protocol, cand, &tones);

            let time_osr = self.monitor.waterfall.time_osr() as f32;
            let delta_t = (cand.time_offset as f32 + cand.time_sub as f32 / time_osr) * protocol.symbol_period()
                - RX_EARLY_OFFSET_S as f32;
            let frequency = self.monitor.bin_frequency_hz(cand.freq_offset, cand.freq_sub);

            results.push(DecodeResult {
                timestamp: self.slot_start_unix_s,
                utc: unix_to_hms(self.slot_start_unix_s),
                snr,
                delta_t,
                frequency,
                message: message_text,
                protocol: protocol.name().to_string(),
                slot_number: self.slot_number,
                score: cand.score,
            });
        }

        results
    }
}

fn unix_to_hms(unix_seconds: i64) -> String {
    let secs_of_day = unix_seconds.rem_euclid(86_400);
    format!("{:02}:{:02}:{:02}", secs_of_day / 3600, (secs_of_day % 3600) / 60, secs_of_day % 60)
}

//! End-to-end scenarios against the public `SlotController`/`message` API,
//! covering the literal scenarios this system is specified against: sync
//! alignment, LDPC non-convergence, a clean standard-message decode, and
//! cross-slot hash resolution.

mod support;

use std::sync::Arc;

use bitvec::prelude::*;

use rustyft8::message::callsign::pack_callsign;
use rustyft8::message::grid::encode_grid;
use rustyft8::message::{decode_message, CallsignHashTable};
use rustyft8::protocol::{Protocol, SAMPLE_RATE};
use rustyft8::{ldpc, result, AudioSample, DecoderConfig, SlotController, SlotState};

use support::synth;

fn build_standard_payload(call_a: &str, call_b: &str, ir: bool, grid_or_report: &str) -> BitVec<u8, Msb0> {
    let n28a = pack_callsign(call_a).unwrap();
    let n28b = pack_callsign(call_b).unwrap();
    let igrid4 = encode_grid(grid_or_report).unwrap();

    let mut bits = bitvec![u8, Msb0; 0; 91];
    bits[0..28].store_be(n28a);
    bits.set(28, false);
    bits[29..57].store_be(n28b);
    bits.set(57, false);
    bits.set(58, ir);
    bits[59..74].store_be(igrid4);
    bits[74..77].store_be(1u8); // i3 = 1, standard message
    let crc = rustyft8::crc::crc14(&bits[..77]);
    for i in 0..14 {
        bits.set(77 + i, ((crc >> (13 - i)) & 1) != 0);
    }
    bits
}

fn encode_codeword(payload91: &BitSlice<u8, Msb0>) -> [bool; 174] {
    let mut storage = [0u8; 22];
    let codeword = &mut storage.view_bits_mut::<Msb0>()[..174];
    ldpc::encode(payload91, codeword);
    let mut out = [false; 174];
    for (i, bit) in codeword.iter().enumerate() {
        out[i] = *bit;
    }
    out
}

/// *S1 — FT8 standard CQ.* Synthesize a clean (noiseless) FT8 transmission
/// carrying `CQ K1ABC FN42` at 1500 Hz and verify it decodes end to end
/// through the slot controller.
#[test]
fn s1_ft8_standard_cq_decodes() {
    let payload = build_standard_payload("CQ", "K1ABC", false, "FN42");
    let codeword = encode_codeword(&payload);

    let protocol = Protocol::Ft8;
    let tones = result::reconstruct_tones(protocol, &codeword);
    let waveform = synth::synthesize_tone_waveform(protocol, &tones, 1500.0);

    let max_blocks = protocol.max_blocks();
    let buffer_len = max_blocks * protocol.block_size();
    let start_index = (0.8 * SAMPLE_RATE as f64).round() as usize;
    let samples_f32 = synth::mix_at_snr(&waveform, start_index, buffer_len, 0.01, 40.0);
    let samples = synth::to_i16_samples(&samples_f32, 6000.0);

    let config = DecoderConfig { min_score: -1000, ..DecoderConfig::default() };
    let hash_table = Arc::new(CallsignHashTable::default());
    let mut controller = SlotController::new(config, hash_table);

    let chunk_size = 4096;
    let mut t_ns = 800_000_000i64;
    let mut results = Vec::new();
    for chunk in samples.chunks(chunk_size) {
        let sample = AudioSample::new(chunk.to_vec(), 12_000, t_ns).unwrap();
        results.extend(controller.ingest(&sample));
        t_ns += (chunk.len() as f64 / SAMPLE_RATE as f64 * 1e9) as i64;
    }

    assert_eq!(results.len(), 1, "expected exactly one decode, got {results:?}");
    let r = &results[0];
    assert_eq!(r.protocol, "FT8");
    assert_eq!(r.message, "CQ K1ABC FN42");
    assert!((r.frequency - 1500.0).abs() <= 3.13, "frequency {} not within 3.13 Hz of 1500", r.frequency);
    assert!(r.delta_t.abs() <= 0.08, "delta_t {} not within 0.08 s of 0", r.delta_t);
    assert!(r.score >= 10, "score {} below 10", r.score);
}

/// *S3 — Sync alignment rejection.* A chunk arriving 6 s into a 15 s slot
/// must never enter `Accumulating`; the next chunk at a valid slot top must
/// still be accepted.
#[test]
fn s3_mid_slot_chunk_rejected_then_next_slot_top_accepted() {
    let config = DecoderConfig { min_score: -1000, ..DecoderConfig::default() };
    let mut controller = SlotController::new(config, Arc::new(CallsignHashTable::default()));

    let mid_slot = AudioSample::new(vec![0i16; 1920], 12_000, 6_800_000_000).unwrap();
    let results = controller.ingest(&mid_slot);
    assert!(results.is_empty());
    assert_eq!(controller.state(), SlotState::WaitingForSlot);

    let slot_top = AudioSample::new(vec![0i16; 1920], 12_000, 15_800_000_000).unwrap();
    controller.ingest(&slot_top);
    assert_eq!(controller.state(), SlotState::Accumulating);
}

/// *S4 — LDPC rejection.* A valid codeword with two flipped bits must not
/// converge within 25 iterations.
#[test]
fn s4_corrupted_codeword_fails_to_converge() {
    let payload = build_standard_payload("N0YPR", "K1ABC", false, "-10");
    let mut codeword = encode_codeword(&payload);
    codeword[10] = !codeword[10];
    codeword[80] = !codeword[80];

    let llrs: Vec<f32> = codeword.iter().map(|&b| if b { -4.0 } else { 4.0 }).collect();
    let decoded = ldpc::decode(&llrs, 25);
    assert_ne!(decoded.errors, 0);
}

/// *S6 — Hash resolution across slots.* A callsign learned while decoding
/// one message resolves by hash in a later message that only carries its
/// 22-bit hash.
#[test]
fn s6_hash_learned_in_one_message_resolves_in_the_next() {
    let hashes = CallsignHashTable::default();

    let first = build_standard_payload("CQ", "W1AWX", false, "FN42");
    hashes.insert("W1AWX");
    let text = decode_message(&first[..91], &hashes).unwrap();
    assert_eq!(text, "CQ W1AWX FN42");

    let n28a = pack_callsign("N0YPR").unwrap();
    let n22 = rustyft8::message::callsign::hash22("W1AWX");
    let n28b = rustyft8::message::constants::NTOKENS + n22;

    let mut bits = bitvec![u8, Msb0; 0; 91];
    bits[0..28].store_be(n28a);
    bits[29..57].store_be(n28b);
    bits[59..74].store_be(encode_grid("").unwrap());
    bits[74..77].store_be(1u8);
    let crc = rustyft8::crc::crc14(&bits[..77]);
    for i in 0..14 {
        bits.set(77 + i, ((crc >> (13 - i)) & 1) != 0);
    }

    let second = decode_message(&bits[..91], &hashes).unwrap();
    assert_eq!(second, "N0YPR W1AWX");
}

//! Protocol message unpacker (C7).
//!
//! Dispatches a decoded 91-bit buffer (77 payload bits + 14 CRC bits) to the
//! sub-type decoder named by `i3` (bits[74..77]) and, for `i3=0`, further by
//! `n3` (bits[71..74]). CRC validation happens here, once, before any
//! sub-type decoder runs — `ldpc::decode` only produces hard bits and a
//! parity-error count, it never looks at the CRC field.

pub mod callsign;
pub mod constants;
mod contesting;
pub mod grid;
pub mod hash;
mod nonstandard;
mod standard;
mod telemetry;
mod text_encoding;

use bitvec::prelude::*;

pub use hash::CallsignHashTable;

/// Decode a 91-bit LDPC payload (77 message bits + 14 CRC bits) into its
/// human-readable text.
///
/// Returns an error if the CRC doesn't check out. Message shapes this
/// decoder doesn't implement still produce a result, just a placeholder
/// naming the unimplemented type rather than an error, so a candidate's
/// slot in the result stream is never silently dropped.
pub fn decode_message(bits: &BitSlice<u8, Msb0>, hashes: &CallsignHashTable) -> Result<String, String> {
    if bits.len() != 91 {
        return Err(format!("message buffer must be 91 bits, got {}", bits.len()));
    }
    if !crate::crc::crc14_check(bits) {
        return Err("CRC check failed".to_string());
    }

    let payload = &bits[..77];
    let i3 = payload[74..77].load_be::<u8>();

    match i3 {
        1 | 2 => standard::decode_standard(payload, hashes),
        4 => nonstandard::decode_nonstandard(payload, hashes),
        0 => {
            let n3 = payload[71..74].load_be::<u8>();
            match n3 {
                0 => {
                    let t71 = payload[0..71].load_be::<u128>();
                    Ok(text_encoding::decode_free_text(t71))
                }
                5 => Ok(telemetry::decode_telemetry(payload)),
                6 => contesting::decode_contesting(payload, hashes),
                other => Ok(format!("<undecoded type 0.{other}>")),
            }
        }
        other => Ok(format!("<undecoded type {other}.0>")),
    }
}

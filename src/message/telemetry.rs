//! Telemetry message decoder (i3=0, n3=5), grounded on the teacher's
//! `message/telemetry_message.rs`, which treats the 71-bit payload as a
//! single opaque integer rather than the three-field breakdown documented
//! (but never implemented) in `message/types.rs`.

use bitvec::prelude::*;

pub fn decode_telemetry(bits: &BitSlice<u8, Msb0>) -> String {
    let t71 = bits[0..71].load_be::<u128>();
    format!("{t71:018X}")
}

pub fn encode_telemetry(hex: &str) -> Result<u128, String> {
    u128::from_str_radix(hex, 16).map_err(|_| format!("invalid telemetry hex: '{hex}'"))
}

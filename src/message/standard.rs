//! Standard message decoder (i3=1 and i3=2), grounded on the teacher's
//! `message/decode/standard.rs::decode_type1_standard`, with the bit
//! offsets corrected to the i3-at-the-end convention used everywhere else
//! in this codebase (i3 occupies bits[74..77], not bits[0..3]).
//!
//! i3=1 is a plain two-callsign exchange; i3=2 is the EU VHF contest
//! variant, which reuses the exact same 77-bit layout (`n28a`/`n28b`/
//! `ir`/`igrid4`), so one function covers both.

use bitvec::prelude::*;

use crate::message::callsign::unpack_callsign;
use crate::message::grid::decode_grid;
use crate::message::hash::CallsignHashTable;

pub fn decode_standard(bits: &BitSlice<u8, Msb0>, hashes: &CallsignHashTable) -> Result<String, String> {
    let n28a = bits[0..28].load_be::<u32>();
    let ipa = bits[28];
    let n28b = bits[29..57].load_be::<u32>();
    let ipb = bits[57];
    let ir = bits[58];
    let igrid4 = bits[59..74].load_be::<u16>();

    let call_a = resolve_call(n28a, hashes)?;
    let call_b = resolve_call(n28b, hashes)?;

    let call_a = if ipa { format!("{call_a}/R") } else { call_a };
    let call_b = if ipb { format!("{call_b}/R") } else { call_b };

    let suffix = decode_grid(igrid4)?;
    let mut out = format!("{call_a} {call_b}");
    if !suffix.is_empty() {
        if ir {
            out.push_str(&format!(" R {suffix}"));
        } else {
            out.push_str(&format!(" {suffix}"));
        }
    }
    Ok(out)
}

fn resolve_call(n28: u32, hashes: &CallsignHashTable) -> Result<String, String> {
    let unpacked = unpack_callsign(n28)?;
    if unpacked != "<...>" {
        return Ok(unpacked);
    }
    let n22 = n28 - crate::message::constants::NTOKENS;
    Ok(hashes.lookup_n22(n22).unwrap_or_else(|| "<...>".to_string()))
}

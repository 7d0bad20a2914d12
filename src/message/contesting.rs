//! Contesting message decoder (i3=0, n3=6).
//!
//! Unlike the other sub-types, no teacher or pack file implements this
//! variant; the layout here is authored from general FT8/FT4 contest
//! exchange structure (two packed callsigns, an acknowledgement flag, a
//! signal report, and a short exchange field) rather than ported from any
//! source file.

use bitvec::prelude::*;

use crate::message::callsign::{pack_callsign, unpack_callsign};
use crate::message::hash::CallsignHashTable;

pub fn decode_contesting(bits: &BitSlice<u8, Msb0>, hashes: &CallsignHashTable) -> Result<String, String> {
    let tu = bits[0];
    let n28a = bits[1..29].load_be::<u32>();
    let n28b = bits[29..57].load_be::<u32>();
    let r = bits[57];
    let rst = bits[58..61].load_be::<u8>();
    let exch = bits[61..71].load_be::<u16>();

    let call_a = resolve_call(n28a, hashes)?;
    let call_b = resolve_call(n28b, hashes)?;

    let mut out = if tu { format!("TU; {call_a} {call_b}") } else { format!("{call_a} {call_b}") };
    if r {
        out.push_str(" R");
    }
    out.push_str(&format!(" {:+03} {}", rst as i16 - 5, exch));
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

//! Non-standard callsign message decoder (i3=4), grounded on the teacher's
//! `message/decode/nonstandard.rs`, which is self-consistent where
//! `message/non_standard_message.rs` and `message/decode/standard.rs`
//! reference a `decode_callsign_base38` helper that doesn't exist anywhere
//! in the tree.

use bitvec::prelude::*;

use crate::message::constants::CHARSET_BASE38;
use crate::message::hash::CallsignHashTable;

pub fn decode_nonstandard(bits: &BitSlice<u8, Msb0>, hashes: &CallsignHashTable) -> Result<String, String> {
    let n12 = bits[0..12].load_be::<u16>();
    let n58 = bits[12..70].load_be::<u64>();
    let iflip = bits[70];
    let nrpt = bits[71..73].load_be::<u8>();
    let icq = bits[73];

    let compound = decode_base38(n58);
    let hash = hashes.lookup_n12(n12).unwrap_or_else(|| "<...>".to_string());

    let mut out = if icq {
        format!("CQ {compound}")
    } else if iflip {
        format!("{hash} {compound}")
    } else {
        format!("{compound} {hash}")
    };

    match nrpt {
        1 => out.push_str(" RRR"),
        2 => out.push_str(" RR73"),
        3 => out.push_str(" 73"),
        _ => {}
    }
    Ok(out)
}

fn decode_base38(mut n58: u64) -> String {
    let mut chars = [' '; 11];
    for slot in chars.iter_mut().rev() {
        let idx = (n58 % 38) as usize;
        *slot = CHARSET_BASE38[idx] as char;
        n58 /= 38;
    }
    chars.iter().collect::<String>().trim_start().to_string()
}

//! Standard callsign pack28/unpack28 and the rolling callsign hash (C7).
//!
//! `pack_callsign`/`unpack_callsign` are generalized from the teacher's
//! `message/callsign.rs` (same token ranges, directed-CQ base-27 suffix, and
//! six-character positional base-10/base-26 body). The hash functions are
//! restructured around a single `n58` base-38 accumulator from which `n22`,
//! `n12`, and `n10` are all derived by further right-shifts, matching the
//! derivation chain rather than three independent `ihashcall` calls — the
//! two are numerically identical, but this mirrors how the callsign hash
//! table actually looks values up (one callsign, three widths at once).

use crate::message::constants::{CHARSET_A1, CHARSET_A2, CHARSET_A3, CHARSET_A4, CHARSET_BASE38, MAX22, NTOKENS};

/// All three hash widths derived from one callsign.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallsignHashes {
    pub n22: u32,
    pub n12: u16,
    pub n10: u16,
}

/// Pack a callsign into its 58-bit base-38 accumulator, space-padded to 11
/// characters. Unrecognized characters are treated as space (index 0), same
/// as WSJT-X's Fortran `index()` fallback.
fn n58_of(callsign: &str) -> u64 {
    let upper = callsign.to_uppercase();
    let mut padded: String = upper.chars().take(11).collect();
    while padded.chars().count() < 11 {
        padded.push(' ');
    }

    let mut n58: u64 = 0;
    for ch in padded.chars() {
        let j = CHARSET_BASE38.iter().position(|&c| c == ch as u8).unwrap_or(0) as u64;
        n58 = 38 * n58 + j;
    }
    n58
}

/// Derive `n22`, `n12`, and `n10` from a callsign in one pass.
pub fn hash_callsign(callsign: &str) -> CallsignHashes {
    let n58 = n58_of(callsign);
    let n22 = ((n58.wrapping_mul(47055833459u64)) >> (64 - 22)) & 0x3FFFFF;
    CallsignHashes {
        n22: n22 as u32,
        n12: (n22 >> 10) as u16,
        n10: (n22 >> 12) as u16,
    }
}

pub fn hash22(callsign: &str) -> u32 {
    hash_callsign(callsign).n22
}

pub fn hash12(callsign: &str) -> u16 {
    hash_callsign(callsign).n12
}

pub fn hash10(callsign: &str) -> u16 {
    hash_callsign(callsign).n10
}

/// Unpack a 28-bit value into a callsign string, following WSJT-X's
/// token / directed-CQ / hash / standard-callsign bands.
pub fn unpack_callsign(n28: u32) -> Result<String, String> {
    if n28 == 0 {
        return Ok("DE".to_string());
    }
    if n28 == 1 {
        return Ok("QRZ".to_string());
    }
    if n28 == 2 {
        return Ok("CQ".to_string());
    }

    if n28 >= 3 && n28 < NTOKENS {
        if n28 <= 1002 {
            return Ok(format!("CQ {:03}", n28 - 3));
        }

        let value = n28 - 1003;
        if value <= 26 {
            let ch = (b'A' + (value - 1) as u8) as char;
            return Ok(format!("CQ {}", ch));
        }

        let max_2letter = 27 + 27 * 26;
        let max_3letter = max_2letter + 27 * 27 * 26;
        let len = if value < max_2letter { 2 } else if value < max_3letter { 3 } else { 4 };

        let mut remaining = value;
        let mut chars = Vec::new();
        for i in (0..len).rev() {
            let divisor = 27u32.pow(i);
            let idx = remaining / divisor;
            remaining %= divisor;
            if idx == 0 {
                chars.push(' ');
            } else if idx <= 26 {
                chars.push((b'A' + (idx - 1) as u8) as char);
            } else {
                return Err(format!("invalid directed CQ value: {n28}"));
            }
        }
        let suffix: String = chars.into_iter().collect();
        return Ok(format!("CQ {}", suffix.trim_start()));
    }

    if n28 >= NTOKENS + MAX22 {
        let n = n28 - NTOKENS - MAX22;

        let base = 36 * 10 * 27 * 27 * 27;
        let i1 = (n / base) as usize;
        let mut remainder = n % base;
        let base = 10 * 27 * 27 * 27;
        let i2 = (remainder / base) as usize;
        remainder %= base;
        let base = 27 * 27 * 27;
        let i3 = (remainder / base) as usize;
        remainder %= base;
        let base = 27 * 27;
        let i4 = (remainder / base) as usize;
        remainder %= base;
        let i5 = (remainder / 27) as usize;
        let i6 = (remainder % 27) as usize;

        let a1: Vec<char> = CHARSET_A1.chars().collect();
        let a2: Vec<char> = CHARSET_A2.chars().collect();
        let a3: Vec<char> = CHARSET_A3.chars().collect();
        let a4: Vec<char> = CHARSET_A4.chars().collect();
        if i1 >= a1.len() || i2 >= a2.len() || i3 >= a3.len() || i4 >= a4.len() || i5 >= a4.len() || i6 >= a4.len() {
            return Err(format!("n28 {n28} produces out-of-range positional indices"));
        }

        let callsign_6 = format!("{}{}{}{}{}{}", a1[i1], a2[i2], a3[i3], a4[i4], a4[i5], a4[i6]);
        return Ok(callsign_6.trim().to_string());
    }

    if n28 >= NTOKENS && n28 < NTOKENS + MAX22 {
        return Ok("<...>".to_string());
    }

    Err(format!("n28 {n28} out of range"))
}

/// Apply the two WSJT-X prefix remaps before standard-callsign packing.
fn remap_prefix(callsign: &str) -> String {
    match callsign {
        "3DA0" => "3D0".to_string(),
        "3XA0" => "QA0".to_string(),
        other => other.to_string(),
    }
}

/// Pack a callsign into its 28-bit WSJT-X representation.
pub fn pack_callsign(callsign: &str) -> Result<u32, String> {
    if callsign == "DE" {
        return Ok(0);
    }
    if callsign == "QRZ" {
        return Ok(1);
    }
    if callsign == "CQ" {
        return Ok(2);
    }

    if let Some(suffix) = callsign.strip_prefix("CQ ") {
        if !suffix.is_empty() && suffix.chars().all(|c| c.is_ascii_digit()) {
            let n: u32 = suffix.parse().map_err(|_| format!("invalid numeric CQ suffix: {callsign}"))?;
            if n > 999 {
                return Err(format!("numeric CQ suffix must be 0-999: {callsign}"));
            }
            return Ok(3 + n);
        }
        if !suffix.is_empty() && suffix.chars().all(|c| c.is_ascii_alphabetic()) {
            let upper = suffix.to_uppercase();
            if upper.len() > 4 {
                return Err(format!("alphabetic CQ suffix must be 1-4 letters: {callsign}"));
            }
            let mut value = 0u32;
            let len = upper.chars().count();
            for (i, ch) in upper.chars().enumerate() {
                let idx = (ch as u32) - ('A' as u32) + 1;
                value += idx * 27u32.pow((len - 1 - i) as u32);
            }
            return Ok(1003 + value);
        }
        return Err(format!("invalid directed CQ suffix: {callsign}"));
    }

    if let Some(inner) = callsign.strip_prefix('<').and_then(|s| s.strip_suffix('>')) {
        return Ok(NTOKENS + hash22(inner));
    }

    let mut base_call = callsign;
    if callsign.contains('/') {
        let parts: Vec<&str> = callsign.split('/').collect();
        if parts.len() != 2 {
            return Err(format!("invalid slash callsign: {callsign}"));
        }
        base_call = if parts[1].eq_ignore_ascii_case("P") || parts[1].eq_ignore_ascii_case("R") {
            parts[0]
        } else {
            parts[1]
        };
    }

    let call = remap_prefix(&base_call.to_uppercase());
    let chars: Vec<char> = call.chars().collect();
    let n = chars.len();
    if n < 3 || n > 6 {
        return Err(format!("callsign length must be 3-6: {callsign}"));
    }

    let iarea = (1..n).rev().find(|&i| chars[i].is_ascii_digit());
    let iarea = match iarea {
        Some(pos) if pos <= 2 => pos,
        _ => return Err(format!("callsign must carry a digit in position 2 or 3: {callsign}")),
    };

    let npdig = chars[..iarea].iter().filter(|c| c.is_ascii_digit()).count();
    let nplet = chars[..iarea].iter().filter(|c| c.is_ascii_alphabetic()).count();
    let nslet = chars[iarea + 1..].iter().filter(|c| c.is_ascii_alphabetic()).count();
    if nplet == 0 || npdig >= iarea || nslet > 3 {
        return Err(format!("invalid standard callsign shape: {callsign}"));
    }

    let callsign_6 = if iarea == 1 { format!(" {:<5}", call) } else { format!("{:<6}", call) };
    let c6: Vec<char> = callsign_6.chars().collect();

    let i1 = CHARSET_A1.find(c6[0]).ok_or_else(|| format!("bad char at position 1: {}", c6[0]))?;
    let i2 = CHARSET_A2.find(c6[1]).ok_or_else(|| format!("bad char at position 2: {}", c6[1]))?;
    let i3 = CHARSET_A3.find(c6[2]).ok_or_else(|| format!("bad char at position 3: {}", c6[2]))?;
    let i4 = CHARSET_A4.find(c6[3]).ok_or_else(|| format!("bad char at position 4: {}", c6[3]))?;
    let i5 = CHARSET_A4.find(c6[4]).ok_or_else(|| format!("bad char at position 5: {}", c6[4]))?;
    let i6 = CHARSET_A4.find(c6[5]).ok_or_else(|| format!("bad char at position 6: {}", c6[5]))?;

    let n28 = 36 * 10 * 27 * 27 * 27 * (i1 as u32)
        + 10 * 27 * 27 * 27 * (i2 as u32)
        + 27 * 27 * 27 * (i3 as u32)
        + 27 * 27 * (i4 as u32)
        + 27 * (i5 as u32)
        + (i6 as u32)
        + NTOKENS
        + MAX22;
    Ok(n28 & ((1 << 28) - 1))
}

//! Free text (i3=0, n3=0) 71-bit / 13-character base-42 packing, kept from
//! the teacher's `message/text_encoding.rs`.
//!
//! The teacher packs through a 9-byte big-endian accumulator with
//! `multiply_add`/`divide_inplace` helpers. 71 bits fits comfortably in a
//! `u128`, so the accumulator here is just an integer; the digit order and
//! the first-byte mask (71 bits leaves one spare high bit in the 9th byte)
//! carry over unchanged. The teacher's separate c58 helpers applied this
//! same base-42 alphabet to the non-standard callsign's 58-bit field, but
//! that field is actually base-38 (see `message/callsign.rs`), so those
//! helpers aren't carried over.

use crate::message::constants::CHARSET_BASE42;

const TEXT_LEN: usize = 13;
const MASK_71: u128 = (1u128 << 71) - 1;

pub fn encode_free_text(text: &str) -> Result<u128, String> {
    let padded = pad_text(text)?;

    let mut acc: u128 = 0;
    for ch in padded.chars() {
        let idx = CHARSET_BASE42
            .iter()
            .position(|&c| c == ch as u8)
            .ok_or_else(|| format!("character '{ch}' not in free-text alphabet"))?;
        acc = acc * CHARSET_BASE42.len() as u128 + idx as u128;
    }
    Ok(acc & MASK_71)
}

pub fn decode_free_text(t71: u128) -> String {
    let mut acc = t71 & MASK_71;
    let mut chars = [' '; TEXT_LEN];
    for slot in chars.iter_mut().rev() {
        let idx = (acc % CHARSET_BASE42.len() as u128) as usize;
        *slot = CHARSET_BASE42[idx] as char;
        acc /= CHARSET_BASE42.len() as u128;
    }
    chars.iter().collect::<String>().trim_end().to_string()
}

fn pad_text(text: &str) -> Result<String, String> {
    let upper = text.to_uppercase();
    if upper.chars().count() > TEXT_LEN {
        return Err(format!("free text longer than {TEXT_LEN} characters: '{text}'"));
    }
    Ok(format!("{upper:<width$}", width = TEXT_LEN))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrips_short_text() {
        let t71 = encode_free_text("HELLO WORLD").unwrap();
        assert_eq!(decode_free_text(t71), "HELLO WORLD");
    }

    #[test]
    fn roundtrips_full_width_text() {
        let t71 = encode_free_text("RUNNING LATE.").unwrap();
        assert_eq!(decode_free_text(t71), "RUNNING LATE.");
    }

    #[test]
    fn roundtrips_empty_text() {
        let t71 = encode_free_text("").unwrap();
        assert_eq!(decode_free_text(t71), "");
    }

    #[test]
    fn rejects_text_too_long() {
        assert!(encode_free_text("THIS MESSAGE IS WAY TOO LONG").is_err());
    }

    #[test]
    fn rejects_characters_outside_alphabet() {
        assert!(encode_free_text("lowercase").is_err());
    }

    #[test]
    fn value_fits_in_71_bits() {
        let t71 = encode_free_text("ZZZZZZZZZZZZZ").unwrap();
        assert!(t71 <= MASK_71);
    }
}

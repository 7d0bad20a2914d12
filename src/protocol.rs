//! Protocol-derived constants (C1).
//!
//! FT8 and FT4 share one pipeline that differs only in a handful of derived
//! numbers: symbol timing, tone count, sync layout. Modeled as a tagged enum
//! producing a table of derived values, rather than a trait object, so the
//! inner DSP loops (candidate search, symbol extraction) monomorphize over
//! `Protocol` instead of paying for dynamic dispatch.
//!
//! Costas pattern and Gray map values are carried over unchanged from
//! `N0YPR-RustyFt8`'s `constants.rs`/`symbol.rs`. The FT4 equivalents have no
//! counterpart in that tree (the teacher only implements FT8); they are the
//! commonly published FT4 protocol constants (four 4-tone Costas arrays, one
//! per sync block, and the 2-bit Gray map that is also FT8's Gray map
//! restricted to its first four tones) — see `DESIGN.md`.

/// Analysis sample rate. Fixed per §6's configuration surface.
pub const SAMPLE_RATE: f32 = 12_000.0;

/// Nominal tone spacing of a single FSK tone, in Hz (both protocols).
pub const TONE_SPACING: f32 = 6.25;

/// FT8's single 7-tone Costas array, used at all three sync positions.
pub const FT8_COSTAS: [u8; 7] = [3, 1, 4, 0, 6, 5, 2];

/// FT8's Gray map: tone index for pre-Gray value `j`.
pub const FT8_GRAY_MAP: [u8; 8] = [0, 1, 3, 2, 5, 6, 4, 7];

/// FT4's four 4-tone Costas arrays, one per sync block (`S1`..`S4`).
pub const FT4_COSTAS: [[u8; 4]; 4] = [
    [0, 1, 3, 2],
    [1, 0, 2, 3],
    [2, 3, 1, 0],
    [3, 2, 0, 1],
];

/// FT4's Gray map: tone index for pre-Gray value `j`.
pub const FT4_GRAY_MAP: [u8; 4] = [0, 1, 3, 2];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    Ft8,
    Ft4,
}

impl Protocol {
    pub fn name(self) -> &'static str {
        match self {
            Protocol::Ft8 => "FT8",
            Protocol::Ft4 => "FT4",
        }
    }

    /// Wall-clock period of one transmission slot, in seconds.
    pub fn slot_time(self) -> f32 {
        match self {
            Protocol::Ft8 => 15.0,
            Protocol::Ft4 => 7.5,
        }
    }

    /// Samples per symbol at `SAMPLE_RATE`. FT8: 1920 (Rs=6.25 Bd). FT4: 512
    /// (Rs=23.4375 Bd).
    pub fn block_size(self) -> usize {
        match self {
            Protocol::Ft8 => 1920,
            Protocol::Ft4 => 512,
        }
    }

    /// Symbol period, in seconds, derived from `block_size`.
    pub fn symbol_period(self) -> f32 {
        self.block_size() as f32 / SAMPLE_RATE
    }

    /// Number of FSK tones per symbol: 8 for FT8, 4 for FT4.
    pub fn tone_count(self) -> usize {
        match self {
            Protocol::Ft8 => 8,
            Protocol::Ft4 => 4,
        }
    }

    /// Bits carried by one symbol: log2(tone_count).
    pub fn bits_per_symbol(self) -> usize {
        match self {
            Protocol::Ft8 => 3,
            Protocol::Ft4 => 2,
        }
    }

    /// Total channel symbols in one transmission (sync + data).
    pub fn symbol_count(self) -> usize {
        match self {
            Protocol::Ft8 => 79,
            Protocol::Ft4 => 105,
        }
    }

    /// Data (non-sync) symbols: 58 for FT8 (174 bits / 3), 87 for FT4 (174/2).
    pub fn data_symbol_count(self) -> usize {
        match self {
            Protocol::Ft8 => 58,
            Protocol::Ft4 => 87,
        }
    }

    /// Maps data-symbol index `k` (0..data_symbol_count) to the channel
    /// symbol index within the full `symbol_count`-long transmission.
    ///
    /// FT8: three sync groups of 7 at channel offsets 0, 36, 72; two data
    /// regions of 29 symbols each, at `k+7` (k<29) and `k+14` (k>=29).
    ///
    /// FT4: one ramp symbol, four sync groups of 4, three data regions of 29;
    /// channel offsets `k+5` (k<29), `k+9` (29<=k<58), `k+13` (k>=58).
    pub fn data_symbol_index(self, k: usize) -> usize {
        match self {
            Protocol::Ft8 => {
                if k < 29 {
                    k + 7
                } else {
                    k + 14
                }
            }
            Protocol::Ft4 => {
                if k < 29 {
                    k + 5
                } else if k < 58 {
                    k + 9
                } else {
                    k + 13
                }
            }
        }
    }

    /// Expected tone at sync channel symbol `index`, or `None` if `index`
    /// does not fall on a sync position.
    pub fn sync_tone(self, index: usize) -> Option<u8> {
        match self {
            Protocol::Ft8 => {
                for &start in &[0usize, 36, 72] {
                    if index >= start && index < start + 7 {
                        return Some(FT8_COSTAS[index - start]);
                    }
                }
                None
            }
            Protocol::Ft4 => {
                for (group, &start) in [1usize, 34, 67, 100].iter().enumerate() {
                    if index >= start && index < start + 4 {
                        return Some(FT4_COSTAS[group][index - start]);
                    }
                }
                None
            }
        }
    }

    /// Gray map table for this protocol's tone count.
    pub fn gray_map(self) -> &'static [u8] {
        match self {
            Protocol::Ft8 => &FT8_GRAY_MAP,
            Protocol::Ft4 => &FT4_GRAY_MAP,
        }
    }

    /// `ceil(slot_time / symbol_time) + 1`, per §3's Waterfall dimension.
    pub fn max_blocks(self) -> usize {
        (self.slot_time() / self.symbol_period()).ceil() as usize + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ft8_derived_constants() {
        assert_eq!(Protocol::Ft8.block_size(), 1920);
        assert!((Protocol::Ft8.symbol_period() - 0.16).abs() < 1e-6);
        assert_eq!(Protocol::Ft8.tone_count(), 8);
        assert_eq!(Protocol::Ft8.bits_per_symbol(), 3);
        assert_eq!(Protocol::Ft8.data_symbol_count() * Protocol::Ft8.bits_per_symbol(), 174);
    }

    #[test]
    fn ft4_derived_constants() {
        assert_eq!(Protocol::Ft4.block_size(), 512);
        assert_eq!(Protocol::Ft4.tone_count(), 4);
        assert_eq!(Protocol::Ft4.bits_per_symbol(), 2);
        assert_eq!(Protocol::Ft4.data_symbol_count() * Protocol::Ft4.bits_per_symbol(), 174);
    }

    #[test]
    fn ft8_data_symbol_layout_matches_sync_gaps() {
        // Every data index must land strictly between the three 7-wide sync
        // groups at 0, 36, 72.
        for k in 0..Protocol::Ft8.data_symbol_count() {
            let idx = Protocol::Ft8.data_symbol_index(k);
            assert!(Protocol::Ft8.sync_tone(idx).is_none(), "k={k} idx={idx} collides with sync");
        }
        assert_eq!(Protocol::Ft8.data_symbol_index(0), 7);
        assert_eq!(Protocol::Ft8.data_symbol_index(28), 35);
        assert_eq!(Protocol::Ft8.data_symbol_index(29), 43);
        assert_eq!(Protocol::Ft8.data_symbol_index(57), 71);
    }

    #[test]
    fn ft4_data_symbol_layout_matches_sync_gaps() {
        for k in 0..Protocol::Ft4.data_symbol_count() {
            let idx = Protocol::Ft4.data_symbol_index(k);
            assert!(Protocol::Ft4.sync_tone(idx).is_none(), "k={k} idx={idx} collides with sync");
        }
        assert_eq!(Protocol::Ft4.data_symbol_index(0), 5);
        assert_eq!(Protocol::Ft4.data_symbol_index(29), 38);
        assert_eq!(Protocol::Ft4.data_symbol_index(58), 71);
    }

    #[test]
    fn nfft_for_ft8_sample_rate_is_4096() {
        let nfft = crate::waterfall::next_pow2((SAMPLE_RATE * 2.0 / 6.25) as usize);
        assert_eq!(nfft, 4096);
    }
}

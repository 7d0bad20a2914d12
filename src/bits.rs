//! MSB-first bit packing helpers (C2), used throughout the message unpacker
//! and the LDPC/CRC stages.
//!
//! Grounded on `util/bitvec_utils.rs`'s `bitslice_to_u*`/`FromBitSlice`
//! pattern, generalized into a couple of free functions rather than a trait
//! — the new code only ever needs `u32`/`u64` extraction plus a packer.

use bitvec::prelude::*;

/// Interpret a bit slice (MSB-first) as an unsigned integer. Panics if
/// `bits.len() > 64`, matching the teacher's `FromBitSlice` assertions.
pub fn bits_to_u64(bits: &BitSlice<u8, Msb0>) -> u64 {
    assert!(bits.len() <= 64, "bit slice too wide for u64: {}", bits.len());
    let mut value: u64 = 0;
    for bit in bits {
        value = (value << 1) | (*bit as u64);
    }
    value
}

pub fn bits_to_u32(bits: &BitSlice<u8, Msb0>) -> u32 {
    assert!(bits.len() <= 32, "bit slice too wide for u32: {}", bits.len());
    bits_to_u64(bits) as u32
}

/// Pack an array of 0/1 bytes into bits, MSB-first, returning a `BitVec`.
pub fn pack_bits(values: &[u8]) -> BitVec<u8, Msb0> {
    let mut out = BitVec::<u8, Msb0>::repeat(false, values.len());
    for (i, &v) in values.iter().enumerate() {
        out.set(i, v != 0);
    }
    out
}

/// Write `value`'s low `width` bits (MSB-first) into `bits` starting at
/// `offset`.
pub fn write_bits(bits: &mut BitSlice<u8, Msb0>, offset: usize, width: usize, value: u64) {
    for i in 0..width {
        let bit = (value >> (width - 1 - i)) & 1 != 0;
        bits.set(offset + i, bit);
    }
}

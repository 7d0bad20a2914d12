//! CRC-14 Implementation for FT8/FT4 (C2)
//!
//! The CRC polynomial is 0x2757, width 14, no init, no final XOR, MSB-first.
//!
//! Reference: https://wsjt.sourceforge.io/FT4_FT8_QEX.pdf page 8
//! "The CRC is calculated on the source-encoded message, zero-extended from 77 to 82 bits."

use crc::{Algorithm, Crc};
use bitvec::prelude::*;

const CRC_POLYNOMIAL: u16 = 0x2757;

const CRC_FT8: Algorithm<u16> = Algorithm {
    width: 14,
    poly: CRC_POLYNOMIAL,
    init: 0x0,
    refin: false,
    refout: false,
    xorout: 0x0,
    check: 0x0,
    residue: 0x0,
};

const FT8_CRC: Crc<u16> = Crc::<u16>::new(&CRC_FT8);

/// Calculate 14-bit CRC for a 77-bit message, zero-extended to 82 bits.
pub fn crc14(bits: &BitSlice<u8, Msb0>) -> u16 {
    let mut msg: u128 = 0;
    for (i, bit) in bits.iter().take(77).enumerate() {
        if *bit {
            msg |= 1u128 << (76 - i);
        }
    }

    let padded_msg = msg << 5;
    let msg_bytes = padded_msg.to_be_bytes();
    let trimmed_bytes = &msg_bytes[msg_bytes.len() - 11..];

    FT8_CRC.checksum(trimmed_bytes)
}

/// Check a 91-bit (77 payload + 14 CRC) message against its own CRC.
pub fn crc14_check(bits: &BitSlice<u8, Msb0>) -> bool {
    let calculated_crc = crc14(&bits[..77]);

    let mut received_crc: u16 = 0;
    for bit in bits[77..91].iter() {
        received_crc = (received_crc << 1) | (*bit as u16);
    }

    calculated_crc == received_crc
}

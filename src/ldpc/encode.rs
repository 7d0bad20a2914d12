//! LDPC(174,91) systematic encoder, kept verbatim from the teacher's
//! `ldpc.rs`/`ldpc::encode` (only the import path changed — `get_generator_bit`
//! now lives in `constants` alongside the derived Tanner graph it also feeds).

use super::constants::{get_generator_bit, K, M, N};
use bitvec::prelude::*;

pub fn encode(message: &BitSlice<u8, Msb0>, codeword: &mut BitSlice<u8, Msb0>) {
    assert_eq!(message.len(), K, "Message must be {} bits", K);
    assert_eq!(codeword.len(), N, "Codeword must be {} bits", N);

    codeword[..K].copy_from_bitslice(message);

    for i in 0..M {
        let mut parity = false;
        for j in 0..K {
            parity ^= message[j] & (get_generator_bit(i, j) != 0);
        }
        codeword.set(K + i, parity);
    }
}

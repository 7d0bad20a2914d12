//! LDPC(174,91) belief propagation (sum-product) decoder.
//!
//! Graph walk and hard-decision/parity-count structure follow the teacher's
//! `ldpc/decode.rs`, generalized to the `Lazy`-built `NM`/`MN` tables in
//! `constants` instead of fixed-width `NRW`/`MAX_NRW`/`NCW` arrays, and
//! stripped of the teacher's internal CRC check — this decoder reports hard
//! bits and a remaining parity-error count only; CRC validation is a
//! separate, later concern. `fast_atanh` is the teacher's `platanh`, the
//! WSJT-X piecewise-linear approximation, kept verbatim. `fast_tanh` has no
//! teacher counterpart (the teacher's V→C step calls `f32::tanh` directly);
//! it's a standard [3/2] Padé rational approximation, saturating outside
//! ±4.97 as required.

use super::constants::{M, MN, N, NM};
use bitvec::prelude::*;

/// Rational-polynomial approximation of tanh, saturating to ±1 outside
/// ±4.97.
#[inline]
fn fast_tanh(x: f32) -> f32 {
    if x >= 4.97 {
        1.0
    } else if x <= -4.97 {
        -1.0
    } else {
        let x2 = x * x;
        x * (27.0 + x2) / (27.0 + 9.0 * x2)
    }
}

/// Piecewise-linear approximation of atanh used by WSJT-X. Not mathematical
/// atanh: tuned for LDPC decoding performance, caps output at ±7.0.
#[inline]
fn fast_atanh(x: f32) -> f32 {
    let isign = if x < 0.0 { -1.0 } else { 1.0 };
    let z = x.abs();

    if z <= 0.664 {
        x / 0.83
    } else if z <= 0.9217 {
        isign * (z - 0.4064) / 0.322
    } else if z <= 0.9951 {
        isign * (z - 0.8378) / 0.0524
    } else if z <= 0.9998 {
        isign * (z - 0.9914) / 0.0012
    } else {
        isign * 7.0
    }
}

/// Outcome of one belief-propagation decode attempt.
pub struct LdpcResult {
    /// Hard bit decisions from the best (lowest-error) iteration seen.
    pub bits: BitVec<u8, Msb0>,
    /// Iterations actually run.
    pub iterations: usize,
    /// Remaining parity violations in `bits`; 0 means a perfect codeword.
    pub errors: usize,
}

/// Decode 174 LLRs into hard bits via sum-product belief propagation.
pub fn decode(llr: &[f32; N], max_iterations: usize) -> LdpcResult {
    let mut toc = NM.iter().map(|row| vec![0.0f32; row.len()]).collect::<Vec<_>>();
    let mut tov = MN.iter().map(|row| vec![0.0f32; row.len()]).collect::<Vec<_>>();
    let mut zn = [0.0f32; N];

    for (j, row) in NM.iter().enumerate() {
        for (i, &n) in row.iter().enumerate() {
            toc[j][i] = llr[n as usize];
        }
    }

    let mut best_bits = BitVec::<u8, Msb0>::repeat(false, N);
    let mut best_errors = M + 1;
    let mut iterations_run = 0;

    for iter in 0..=max_iterations {
        iterations_run = iter;

        for n in 0..N {
            zn[n] = llr[n] + tov[n].iter().sum::<f32>();
        }

        let mut plain = BitVec::<u8, Msb0>::repeat(false, N);
        for n in 0..N {
            plain.set(n, zn[n] > 0.0);
        }

        if plain.not_any() {
            break;
        }

        let mut ncheck = 0usize;
        for row in NM.iter() {
            let mut parity = 0u8;
            for &n in row {
                if plain[n as usize] {
                    parity ^= 1;
                }
            }
            if parity != 0 {
                ncheck += 1;
            }
        }

        if ncheck < best_errors {
            best_errors = ncheck;
            best_bits = plain.clone();
        }

        if ncheck == 0 {
            break;
        }
        if iter == max_iterations {
            break;
        }

        // V→C: each check's incoming message is the variable's belief minus
        // what it last received from that same check.
        for (j, row) in NM.iter().enumerate() {
            for (i, &n) in row.iter().enumerate() {
                let n = n as usize;
                let mut v = zn[n];
                if let Some(pos) = MN[n].iter().position(|&m| m as usize == j) {
                    v -= tov[n][pos];
                }
                toc[j][i] = fast_tanh(-v / 2.0);
            }
        }

        // C→V: product of incoming tanh messages over the check, excluding
        // the target variable's own edge.
        for (n, row) in MN.iter().enumerate() {
            for (i, &m) in row.iter().enumerate() {
                let m = m as usize;
                let mut product = 1.0f32;
                for (k, &other_n) in NM[m].iter().enumerate() {
                    if other_n as usize != n {
                        product *= toc[m][k];
                    }
                }
                tov[n][i] = -2.0 * fast_atanh(product);
            }
        }
    }

    LdpcResult { bits: best_bits, iterations: iterations_run, errors: best_errors }
}

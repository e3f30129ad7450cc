// -*- mode: rust; -*-
//
// This file is part of csidh256.
// See LICENSE for licensing information.

//! The CSIDH-256 class-group parameter set.
//!
//! The field prime is \\( p = 4 \ell_1 \cdots \ell_{42} - 1 \\), where the
//! \\( \ell_i \\) are the odd primes below, so that every \\( \ell_i \\)
//! divides \\( (p+1)/4 \\) and both the base curve and its quadratic twist
//! carry full rational \\( \ell_i \\)-torsion.  The prime was found by
//! taking the consecutive odd primes up to 191, dropping 7, and swapping
//! in 241 so that \\( p \\) is a 256-bit prime with \\( p \equiv 3
//! \pmod 8 \\).
//!
//! Everything in this module is compile-time constant data; nothing here
//! is ever mutated.

use crate::backend::serial::u64::constants::P;

/// The number of class-group generators (small odd primes).
pub const NUM_PRIMES: usize = 42;

/// The small odd primes \\( \ell_i \\) dividing \\( p+1 \\), in
/// descending order.
pub(crate) const L: [u32; NUM_PRIMES] = [
    241, 191, 181, 179, 173, 167, 163, 157, 151, 149, 139, 137, 131, 127, 113, 109, 107, 103,
    101, 97, 89, 83, 79, 73, 71, 67, 61, 59, 53, 47, 43, 41, 37, 31, 29, 23, 19, 17, 13, 11, 5,
    3,
];

/// The bit length of each \\( \ell_i \\), used by the square-and-multiply
/// loop that raises curve coefficients to the \\( \ell_i \\)-th power.
pub(crate) const L_BITS: [u32; NUM_PRIMES] = [
    8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 8, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 7, 6, 6, 6, 6, 6,
    6, 6, 5, 5, 5, 5, 5, 4, 4, 3, 2,
];

/// The per-generator exponent bound.  Private exponents are drawn from
/// \\( \\{ -B, -B+2, \ldots, B-2, B \\} \\), and the evaluator applies
/// exactly `B` degree-\\( \ell_i \\) isogenies per generator.
///
/// The bound is even so that the zero exponent is representable.
pub(crate) const B: [u8; NUM_PRIMES] = [6; NUM_PRIMES];

/// Shortest differential addition chains for the scalar multiplications
/// by each \\( \ell_i \\), walked low bit first.
///
/// Each chain drives the Lucas three-point walk in
/// [`ProjectivePoint::mul_by_prime`](crate::edwards::ProjectivePoint):
/// starting from \\( (P, 2P, 3P) \\), a zero bit replaces the triple
/// \\( (a, b, c) \\) with \\( (b, c, b+c) \\) and a one bit with
/// \\( (a, c, a+c) \\), so after [`CHAIN_LENGTHS`]`[i]` steps the third
/// slot holds \\( [\ell_i]P \\).
#[rustfmt::skip]
pub(crate) const CHAINS: [u64; NUM_PRIMES] = [
    0x340, 0x88,  0xA8,  0x110, 0xC0,  0x60,  0xD0,  0x180,
    0x98,  0x1A0, 0x184, 0x190, 0x40,  0x70,  0x1D0, 0x84,
    0x60,  0x30,  0x68,  0xC0,  0x0,   0x6C,  0x10,  0x14,
    0x50,  0x48,  0x2C,  0x58,  0x4C,  0x20,  0x22,  0x18,
    0x30,  0x8,   0x10,  0x18,  0x4,   0xA,   0x0,   0x4,
    0x0,   0x0,
];

/// The number of steps in each entry of [`CHAINS`].
#[rustfmt::skip]
pub(crate) const CHAIN_LENGTHS: [u8; NUM_PRIMES] = [
    10, 9, 9, 9, 9, 9, 9, 9,
     9, 9, 9, 9, 8, 9, 9, 8,
     8, 8, 8, 8, 7, 8, 7, 7,
     7, 7, 7, 7, 7, 6, 6, 6,
     6, 5, 5, 5, 4, 4, 3, 3,
     1, 0,
];

/// The number of disjoint generator batches used to amortize point
/// sampling.
pub(crate) const NUM_BATCHES: usize = 3;

/// The generator indices of each batch (round-robin partition).
#[rustfmt::skip]
pub(crate) const BATCHES: [[usize; NUM_PRIMES / NUM_BATCHES]; NUM_BATCHES] = [
    [0, 3, 6,  9, 12, 15, 18, 21, 24, 27, 30, 33, 36, 39],
    [1, 4, 7, 10, 13, 16, 19, 22, 25, 28, 31, 34, 37, 40],
    [2, 5, 8, 11, 14, 17, 20, 23, 26, 29, 32, 35, 38, 41],
];

/// For each batch, the generator indices *not* in that batch; sampled
/// points are multiplied by these to project them into the batch's
/// torsion subgroup.
#[rustfmt::skip]
pub(crate) const BATCH_COMPLEMENTS: [[usize; NUM_PRIMES - NUM_PRIMES / NUM_BATCHES]; NUM_BATCHES] = [
    [1, 2, 4, 5, 7, 8, 10, 11, 13, 14, 16, 17, 19, 20, 22, 23, 25, 26, 28, 29, 31, 32, 34, 35,
     37, 38, 40, 41],
    [0, 2, 3, 5, 6, 8, 9, 11, 12, 14, 15, 17, 18, 20, 21, 23, 24, 26, 27, 29, 30, 32, 33, 35,
     36, 38, 39, 41],
    [0, 1, 3, 4, 6, 7, 9, 10, 12, 13, 15, 16, 18, 19, 21, 22, 24, 25, 27, 28, 30, 31, 33, 34,
     36, 37, 39, 40],
];

/// The last generator index processed in a pass over each batch.  Once it
/// is reached the carried points are dead, so the isogeny evaluation on
/// them is skipped and only the curve is updated.
pub(crate) const LAST_ISOGENY: [usize; NUM_BATCHES] = [39, 40, 41];

/// Number of passes over all batches before the remaining unfinished
/// generators are regrouped into a single cleanup batch.
pub(crate) const BATCH_PASSES_BEFORE_CLEANUP: usize = 8;

/// The total number of isogenies applied by one group-action evaluation,
/// \\( \sum_i B_i \\).
pub(crate) const NUM_ISOGENIES: u16 = 252;

/// An upper bound on outer sampling rounds in one group-action
/// evaluation.  Cofactor-cleared points miss their target order with
/// probability at most \\( 1/3 \\) per generator, so runs take nowhere
/// near this many rounds; exceeding it indicates corrupted parameters.
pub(crate) const MAX_SAMPLING_ROUNDS: usize = 10_000;

/// Kernel size of the largest-degree isogeny, \\( (\max \ell_i - 1)/2 \\).
pub(crate) const MAX_KERNEL_POINTS: usize = 120;

/// Verify that the compiled-in parameter table is internally consistent:
/// \\( 4 \ell_1 \cdots \ell_n - 1 \\) must reproduce the field prime
/// exactly, and the isogeny budget must equal \\( \sum_i B_i \\).
///
/// The check is cheap and runs once per keypair generation; an
/// implementation with an inconsistent table must refuse to operate
/// rather than silently compute an incorrect action.
pub(crate) fn is_consistent() -> bool {
    // acc = l_1 * ... * l_n, which must fit in 254 bits
    let mut acc: [u64; 4] = [1, 0, 0, 0];
    for &l in L.iter() {
        let mut carry: u64 = 0;
        for limb in acc.iter_mut() {
            let t = (*limb as u128) * (l as u128) + (carry as u128);
            *limb = t as u64;
            carry = (t >> 64) as u64;
        }
        if carry != 0 {
            return false;
        }
    }

    // p + 1 = 4 * acc, so acc must have its top two bits clear
    if acc[3] >> 62 != 0 {
        return false;
    }
    let four_acc = [
        acc[0] << 2,
        (acc[1] << 2) | (acc[0] >> 62),
        (acc[2] << 2) | (acc[1] >> 62),
        (acc[3] << 2) | (acc[2] >> 62),
    ];

    // p = 4 * acc - 1; the low limb of 4 * acc is nonzero, so no borrow
    if four_acc[0] == 0 {
        return false;
    }
    let p_expected = [four_acc[0] - 1, four_acc[1], four_acc[2], four_acc[3]];
    if p_expected != P {
        return false;
    }

    let mut total: u16 = 0;
    for &b in B.iter() {
        total += b as u16;
    }
    total == NUM_ISOGENIES
}

// -*- mode: rust; -*-
//
// This file is part of csidh256.
// See LICENSE for licensing information.

//! Field arithmetic modulo the CSIDH-256 prime.
//!
//! The `csidh256::field` module provides a type alias
//! `csidh256::field::FieldElement` to a field element type defined in
//! the `backend` module.
//!
//! Field operations defined in terms of machine operations, such as
//! field multiplication or squaring, are defined in the backend
//! implementation.
//!
//! Field operations defined in terms of other field operations, such as
//! field inversion or the quadratic-residue test, are defined here.

use rand_core::{CryptoRng, RngCore};
use subtle::Choice;
use subtle::ConstantTimeEq;

use crate::backend;
use crate::backend::serial::u64::constants;

/// A `FieldElement` represents an element of the field
/// \\( \mathbb Z / p \mathbb Z \\), in Montgomery representation.
///
/// The `FieldElement` type is an alias for the platform-specific
/// implementation.
pub(crate) type FieldElement = backend::serial::u64::field::FieldElement64;

/// Interpret four little-endian limbs as an integer and test whether it
/// is strictly below `bound`.
fn limbs_below(limbs: &[u64; 4], bound: &[u64; 4]) -> bool {
    for i in (0..4).rev() {
        if limbs[i] < bound[i] {
            return true;
        }
        if limbs[i] > bound[i] {
            return false;
        }
    }
    false
}

impl FieldElement {
    /// Raise this field element to the power given by four little-endian
    /// exponent limbs, using left-to-right binary exponentiation.
    ///
    /// The exponent is public parameter data (\\( p-2 \\) or
    /// \\( (p-1)/2 \\)), so the running time may depend on it, but never
    /// on `self`.
    pub(crate) fn pow_vartime(&self, exponent: &[u64; 4]) -> FieldElement {
        let mut acc = FieldElement::ONE;
        for i in (0..4).rev() {
            for j in (0..64).rev() {
                acc = acc.square();
                if (exponent[i] >> j) & 1 == 1 {
                    acc = &acc * self;
                }
            }
        }
        acc
    }

    /// Given a nonzero field element, compute its inverse.
    ///
    /// The inverse is computed as self^(p-2), since
    /// x^(p-2)x = x^(p-1) = 1 (mod p).
    ///
    /// This function returns zero on input zero.
    pub(crate) fn invert(&self) -> FieldElement {
        self.pow_vartime(&constants::P_MINUS_2)
    }

    /// Test whether this field element is a nonzero quadratic residue,
    /// by the Euler criterion \\( x\^{(p-1)/2} = 1 \\).
    ///
    /// Returns `Choice(0)` for zero.
    pub(crate) fn is_square(&self) -> Choice {
        self.pow_vartime(&constants::P_MINUS_1_OVER_2)
            .ct_eq(&FieldElement::ONE)
    }

    /// Return a uniformly random field element.
    ///
    /// Candidate 256-bit strings are drawn from `rng` and rejected until
    /// one lands below \\( p \\), so the output is unbiased.  The number
    /// of rejected candidates is independent of the accepted value.
    pub(crate) fn random<R: RngCore + CryptoRng>(rng: &mut R) -> FieldElement {
        FieldElement::to_montgomery(&random_limbs_below(rng, &constants::P))
    }

    /// Return a uniformly random field element whose canonical value lies
    /// in \\( [2, (p-1)/2] \\), as required by the twist-aware point
    /// sampler.
    pub(crate) fn random_half_range<R: RngCore + CryptoRng>(rng: &mut R) -> FieldElement {
        // random_limbs_below excludes its bound, so pass (p-1)/2 + 1
        let mut bound = constants::P_MINUS_1_OVER_2;
        bound[0] += 1;
        loop {
            let limbs = random_limbs_below(rng, &bound);
            // the values 0 and 1 degenerate under the rational map
            if limbs[0] >= 2 || limbs[1..] != [0, 0, 0] {
                return FieldElement::to_montgomery(&limbs);
            }
        }
    }
}

/// Draw uniformly random four-limb integers from `rng` until one is
/// strictly below `bound`.
fn random_limbs_below<R: RngCore + CryptoRng>(rng: &mut R, bound: &[u64; 4]) -> [u64; 4] {
    loop {
        let mut bytes = [0u8; 32];
        rng.fill_bytes(&mut bytes);
        let mut limbs = [0u64; 4];
        for i in 0..4 {
            let mut chunk = [0u8; 8];
            chunk.copy_from_slice(&bytes[i * 8..(i + 1) * 8]);
            limbs[i] = u64::from_le_bytes(chunk);
        }
        if limbs_below(&limbs, bound) {
            return limbs;
        }
    }
}

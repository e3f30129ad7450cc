// -*- mode: rust; -*-
//
// This file is part of csidh256.
// See LICENSE for licensing information.

//! Arithmetic modulo the CSIDH-256 prime \\( p = 4 \ell_1 \cdots \ell_{42} - 1 \\)
//! with four 64-bit unsigned limbs in Montgomery representation.
//!
//! Because the limbs are full 64-bit words, a \\( 4 \times 4 \\) schoolbook
//! product cannot accumulate whole columns in a `u128`; instead both the
//! product and the REDC pass run limb-by-limb with an explicit carry chain.
//! Every value handed out by this module is fully reduced, so the limb
//! encoding of a field element is canonical.

use core::fmt::Debug;
use core::ops::{Add, AddAssign, Mul, MulAssign, Sub, SubAssign};

use cfg_if::cfg_if;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

#[cfg(feature = "zeroize")]
use zeroize::Zeroize;

use crate::backend::serial::u64::constants;

/// A `FieldElement64` represents an element of the field
/// \\( \mathbb Z / p \mathbb Z \\), held in Montgomery representation
/// as four 64-bit limbs in little-endian order.
///
/// The limbs are always reduced below \\( p \\).
#[derive(Copy, Clone)]
pub struct FieldElement64(pub(crate) [u64; 4]);

impl Debug for FieldElement64 {
    fn fmt(&self, f: &mut ::core::fmt::Formatter) -> ::core::fmt::Result {
        write!(f, "FieldElement64: {:?}", &self.0[..])
    }
}

#[cfg(feature = "zeroize")]
impl Zeroize for FieldElement64 {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

/// u64 * u64 = u128 multiply helper
#[inline(always)]
const fn m(x: u64, y: u64) -> u128 {
    (x as u128) * (y as u128)
}

/// Compute `a + b + carry`, returning the sum limb and the new carry.
#[inline(always)]
const fn adc(a: u64, b: u64, carry: u64) -> (u64, u64) {
    let t = (a as u128) + (b as u128) + (carry as u128);
    (t as u64, (t >> 64) as u64)
}

/// Compute `a - b - borrow`, returning the difference limb and the new
/// borrow.  The borrow is all-ones on underflow, so it can double as a mask.
#[inline(always)]
const fn sbb(a: u64, b: u64, borrow: u64) -> (u64, u64) {
    let t = (a as u128).wrapping_sub((b as u128) + ((borrow >> 63) as u128));
    (t as u64, (t >> 64) as u64)
}

/// Compute `a + b * c + carry`, returning the result limb and the new carry.
#[inline(always)]
const fn mac(a: u64, b: u64, c: u64, carry: u64) -> (u64, u64) {
    let t = (a as u128) + m(b, c) + (carry as u128);
    (t as u64, (t >> 64) as u64)
}

/// Given a five-limb value `(hi, lo)` known to be below \\( 2p \\), subtract
/// \\( p \\) once if the value is at least \\( p \\), in constant time.
#[inline(always)]
fn sub_modulus(lo: &[u64; 4], hi: u64) -> FieldElement64 {
    let mut d = [0u64; 4];
    let mut borrow: u64 = 0;
    for i in 0..4 {
        let (di, b) = sbb(lo[i], constants::P[i], borrow);
        d[i] = di;
        borrow = b;
    }
    let (_, borrow) = sbb(hi, 0, borrow);

    // borrow is all-ones iff (hi, lo) < p, in which case keep lo
    let mut r = [0u64; 4];
    for i in 0..4 {
        r[i] = (lo[i] & borrow) | (d[i] & !borrow);
    }
    FieldElement64(r)
}

impl FieldElement64 {
    /// The zero element of the field.
    pub const ZERO: FieldElement64 = FieldElement64([0, 0, 0, 0]);

    /// The one element of the field, i.e. \\( R \bmod p \\).
    pub const ONE: FieldElement64 = constants::R;

    /// Load a field element from its canonical 32-byte little-endian
    /// encoding, mapping it into the Montgomery domain.
    ///
    /// Encodings of values at or above \\( p \\) are reduced; since
    /// \\( 2\^{256} < 2p \\), a single conditional subtraction suffices.
    pub fn from_bytes(bytes: &[u8; 32]) -> FieldElement64 {
        let mut words = [0u64; 4];
        for i in 0..4 {
            let mut chunk = [0u8; 8];
            chunk.copy_from_slice(&bytes[i * 8..(i + 1) * 8]);
            words[i] = u64::from_le_bytes(chunk);
        }
        FieldElement64::to_montgomery(&sub_modulus(&words, 0).0)
    }

    /// Serialize this field element to its canonical 32-byte little-endian
    /// encoding, leaving the Montgomery domain first.
    pub fn as_bytes(&self) -> [u8; 32] {
        let limbs = self.from_montgomery();
        let mut bytes = [0u8; 32];
        for i in 0..4 {
            bytes[i * 8..(i + 1) * 8].copy_from_slice(&limbs[i].to_le_bytes());
        }
        bytes
    }

    /// Compute `a + b` (mod p).
    pub fn add(a: &FieldElement64, b: &FieldElement64) -> FieldElement64 {
        let mut sum = [0u64; 4];
        let mut carry: u64 = 0;
        for i in 0..4 {
            let (s, c) = adc(a.0[i], b.0[i], carry);
            sum[i] = s;
            carry = c;
        }
        // both inputs are below p, so (carry, sum) < 2p
        sub_modulus(&sum, carry)
    }

    /// Compute `a - b` (mod p).
    pub fn sub(a: &FieldElement64, b: &FieldElement64) -> FieldElement64 {
        let mut difference = [0u64; 4];
        let mut borrow: u64 = 0;
        for i in 0..4 {
            let (d, bw) = sbb(a.0[i], b.0[i], borrow);
            difference[i] = d;
            borrow = bw;
        }

        // conditionally add p if the difference is negative
        let underflow_mask = borrow;
        let mut carry: u64 = 0;
        for i in 0..4 {
            let (d, c) = adc(difference[i], constants::P[i] & underflow_mask, carry);
            difference[i] = d;
            carry = c;
        }
        FieldElement64(difference)
    }

    /// Compute the full 512-bit product `a * b` as eight limbs.
    #[inline(always)]
    pub(crate) fn mul_internal(a: &FieldElement64, b: &FieldElement64) -> [u64; 8] {
        let mut z = [0u64; 8];
        for i in 0..4 {
            let mut carry: u64 = 0;
            for j in 0..4 {
                let (zij, c) = mac(z[i + j], a.0[i], b.0[j], carry);
                z[i + j] = zij;
                carry = c;
            }
            z[i + 4] = carry;
        }
        z
    }

    /// Compute `limbs / R` (mod p), where R is the Montgomery modulus 2^256.
    ///
    /// Each of the four rounds folds one low limb to zero by adding the
    /// right multiple of p, then the high half is the reduced value up to
    /// one final conditional subtraction.
    #[inline(always)]
    pub(crate) fn montgomery_reduce(limbs: &[u64; 8]) -> FieldElement64 {
        let mut r = *limbs;
        let mut carry2: u64 = 0;

        for i in 0..4 {
            let k = r[i].wrapping_mul(constants::PINV);
            let (_, mut carry) = mac(r[i], k, constants::P[0], 0);
            for j in 1..4 {
                let (rij, c) = mac(r[i + j], k, constants::P[j], carry);
                r[i + j] = rij;
                carry = c;
            }
            let (ri4, c2) = adc(r[i + 4], carry2, carry);
            r[i + 4] = ri4;
            carry2 = c2;
        }

        // (carry2, r[4..8]) < 2p, so subtract p at most once
        let hi = [r[4], r[5], r[6], r[7]];
        sub_modulus(&hi, carry2)
    }

    /// Compute `(a * b) / R` (mod p) with the multiplication and the REDC
    /// pass fused into a single operand-scanning loop (CIOS).
    ///
    /// Bit-identical to `montgomery_reduce(&mul_internal(a, b))`.
    #[inline(always)]
    pub(crate) fn montgomery_mul_fused(a: &FieldElement64, b: &FieldElement64) -> FieldElement64 {
        let mut t = [0u64; 4];
        let mut t4: u64 = 0;
        let mut t5: u64 = 0;

        for i in 0..4 {
            // t += a[i] * b
            let mut carry: u64 = 0;
            for j in 0..4 {
                let (tj, c) = mac(t[j], a.0[i], b.0[j], carry);
                t[j] = tj;
                carry = c;
            }
            let (nt4, c) = adc(t4, carry, 0);
            t4 = nt4;
            t5 += c;

            // fold t[0] to zero and shift down one limb
            let k = t[0].wrapping_mul(constants::PINV);
            let (_, mut carry) = mac(t[0], k, constants::P[0], 0);
            for j in 1..4 {
                let (tj, c) = mac(t[j], k, constants::P[j], carry);
                t[j - 1] = tj;
                carry = c;
            }
            let (nt3, c2) = adc(t4, carry, 0);
            t[3] = nt3;
            t4 = t5 + c2;
            t5 = 0;
        }

        sub_modulus(&t, t4)
    }

    /// Compute `(a * b) / R` (mod p) as a separate schoolbook product
    /// followed by a standalone REDC pass.
    #[inline(always)]
    pub(crate) fn montgomery_mul_reference(
        a: &FieldElement64,
        b: &FieldElement64,
    ) -> FieldElement64 {
        FieldElement64::montgomery_reduce(&FieldElement64::mul_internal(a, b))
    }

    /// Compute `a^2` (mod p).
    pub fn square(&self) -> FieldElement64 {
        FieldElement64::mul(self, self)
    }

    /// Map canonical limbs (already below p) into the Montgomery domain,
    /// i.e. compute `limbs * R (mod p)`.
    pub(crate) fn to_montgomery(limbs: &[u64; 4]) -> FieldElement64 {
        FieldElement64::mul(&FieldElement64(*limbs), &constants::RR)
    }

    /// Leave the Montgomery domain, i.e. compute `self / R (mod p)` as
    /// canonical limbs.
    pub(crate) fn from_montgomery(&self) -> [u64; 4] {
        let mut limbs = [0u64; 8];
        limbs[..4].copy_from_slice(&self.0);
        FieldElement64::montgomery_reduce(&limbs).0
    }

    /// Determine whether this field element is zero.
    pub fn is_zero(&self) -> Choice {
        self.ct_eq(&FieldElement64::ZERO)
    }
}

cfg_if! {
    if #[cfg(feature = "reference-mul")] {
        impl FieldElement64 {
            /// Compute `a * b` (mod p) on Montgomery-domain operands.
            ///
            /// The multiplication strategy is selected at compile time; the
            /// candidates agree bit-for-bit on every input pair.
            #[inline(always)]
            pub fn mul(a: &FieldElement64, b: &FieldElement64) -> FieldElement64 {
                FieldElement64::montgomery_mul_reference(a, b)
            }
        }
    } else {
        impl FieldElement64 {
            /// Compute `a * b` (mod p) on Montgomery-domain operands.
            ///
            /// The multiplication strategy is selected at compile time; the
            /// candidates agree bit-for-bit on every input pair.
            #[inline(always)]
            pub fn mul(a: &FieldElement64, b: &FieldElement64) -> FieldElement64 {
                FieldElement64::montgomery_mul_fused(a, b)
            }
        }
    }
}

impl ConditionallySelectable for FieldElement64 {
    fn conditional_select(
        a: &FieldElement64,
        b: &FieldElement64,
        choice: Choice,
    ) -> FieldElement64 {
        FieldElement64([
            u64::conditional_select(&a.0[0], &b.0[0], choice),
            u64::conditional_select(&a.0[1], &b.0[1], choice),
            u64::conditional_select(&a.0[2], &b.0[2], choice),
            u64::conditional_select(&a.0[3], &b.0[3], choice),
        ])
    }
}

impl ConstantTimeEq for FieldElement64 {
    /// Test equality between two `FieldElement64`s.  The Montgomery limb
    /// encoding is canonical, so the limbs can be compared directly.
    fn ct_eq(&self, other: &FieldElement64) -> Choice {
        self.0.ct_eq(&other.0)
    }
}

impl PartialEq for FieldElement64 {
    fn eq(&self, other: &FieldElement64) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for FieldElement64 {}

impl<'a, 'b> Add<&'b FieldElement64> for &'a FieldElement64 {
    type Output = FieldElement64;
    fn add(self, rhs: &'b FieldElement64) -> FieldElement64 {
        FieldElement64::add(self, rhs)
    }
}

impl<'b> AddAssign<&'b FieldElement64> for FieldElement64 {
    fn add_assign(&mut self, rhs: &'b FieldElement64) {
        *self = FieldElement64::add(self, rhs);
    }
}

impl<'a, 'b> Sub<&'b FieldElement64> for &'a FieldElement64 {
    type Output = FieldElement64;
    fn sub(self, rhs: &'b FieldElement64) -> FieldElement64 {
        FieldElement64::sub(self, rhs)
    }
}

impl<'b> SubAssign<&'b FieldElement64> for FieldElement64 {
    fn sub_assign(&mut self, rhs: &'b FieldElement64) {
        *self = FieldElement64::sub(self, rhs);
    }
}

impl<'a, 'b> Mul<&'b FieldElement64> for &'a FieldElement64 {
    type Output = FieldElement64;
    fn mul(self, rhs: &'b FieldElement64) -> FieldElement64 {
        FieldElement64::mul(self, rhs)
    }
}

impl<'b> MulAssign<&'b FieldElement64> for FieldElement64 {
    fn mul_assign(&mut self, rhs: &'b FieldElement64) {
        *self = FieldElement64::mul(self, rhs);
    }
}

define_add_variants!(
    LHS = FieldElement64,
    RHS = FieldElement64,
    Output = FieldElement64
);
define_sub_variants!(
    LHS = FieldElement64,
    RHS = FieldElement64,
    Output = FieldElement64
);
define_mul_variants!(
    LHS = FieldElement64,
    RHS = FieldElement64,
    Output = FieldElement64
);
define_add_assign_variants!(LHS = FieldElement64, RHS = FieldElement64);
define_sub_assign_variants!(LHS = FieldElement64, RHS = FieldElement64);
define_mul_assign_variants!(LHS = FieldElement64, RHS = FieldElement64);

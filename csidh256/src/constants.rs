// -*- mode: rust; -*-
//
// This file is part of csidh256.
// See LICENSE for licensing information.

//! Various constants, such as the base curve of the key exchange.

use crate::backend::serial::u64::constants;
use crate::edwards::EdwardsCurve;

/// The fixed public starting curve \\( E_0 \\) of the key exchange, the
/// Edwards y-line counterpart of the Montgomery curve
/// \\( y\^2 = x\^3 + x \\).
///
/// In Edwards terms this is \\( a = 1, d = -1 \\), stored as the
/// coefficient pair \\( (a : a-d) = (1 : 2) \\) in Montgomery
/// representation.  Since \\( p \equiv 3 \pmod 8 \\), this curve is
/// supersingular with \\( p + 1 \\) rational points, as is its quadratic
/// twist.
pub const BASE_CURVE: EdwardsCurve = EdwardsCurve {
    a: constants::R,
    a_minus_d: constants::TWO_R,
};

#[cfg(test)]
mod test {
    use super::*;
    use crate::backend::serial::u64::constants::{P, PINV, P_MINUS_1_OVER_2, P_MINUS_2, R, RR};
    use crate::backend::serial::u64::field::FieldElement64;
    use crate::field::FieldElement;

    /// `R` must equal 2^256 mod p.  Recompute it by 256 modular
    /// doublings of one, which only relies on field addition.
    #[test]
    fn r_is_two_to_256() {
        let mut acc = FieldElement64([1, 0, 0, 0]);
        for _ in 0..256 {
            acc = FieldElement::add(&acc, &acc);
        }
        assert_eq!(acc.0, R.0);
    }

    /// Dividing R out of `R` and `RR` must yield 1 and R respectively.
    #[test]
    fn montgomery_constants_reduce_correctly() {
        assert_eq!(R.from_montgomery(), [1, 0, 0, 0]);
        assert_eq!(RR.from_montgomery(), R.0);
    }

    /// `PINV` must be the negated inverse of p modulo 2^64.  Newton's
    /// iteration doubles the number of correct bits each round, so six
    /// rounds from an odd seed give all 64.
    #[test]
    fn pinv_is_negated_inverse_of_p() {
        let mut x = P[0];
        for _ in 0..6 {
            x = x.wrapping_mul(2u64.wrapping_sub(P[0].wrapping_mul(x)));
        }
        assert_eq!(PINV, x.wrapping_neg());
        assert_eq!(P[0].wrapping_mul(PINV), u64::MAX);
    }

    #[test]
    fn exponent_constants_derive_from_p() {
        // (p-1)/2: p is odd, so this is a plain shift of p - 1
        let p_minus_1 = [P[0] - 1, P[1], P[2], P[3]];
        let mut half = [0u64; 4];
        for i in 0..4 {
            half[i] = p_minus_1[i] >> 1;
            if i < 3 {
                half[i] |= p_minus_1[i + 1] << 63;
            }
        }
        assert_eq!(half, P_MINUS_1_OVER_2);
        assert_eq!([P[0] - 2, P[1], P[2], P[3]], P_MINUS_2);
    }

    #[test]
    fn base_curve_coefficients() {
        assert_eq!(BASE_CURVE.a.from_montgomery(), [1, 0, 0, 0]);
        assert_eq!(BASE_CURVE.a_minus_d.from_montgomery(), [2, 0, 0, 0]);
    }
}

// -*- mode: rust; -*-
//
// This file is part of csidh256.
// See LICENSE for licensing information.

//! Projective y-coordinate arithmetic on Edwards curves.
//!
//! A curve \\( E_{a,d} : a x\^2 + y\^2 = 1 + d x\^2 y\^2 \\) is tracked by
//! the projective coefficient pair \\( (a : a-d) \\), and a point only by
//! the projective pair \\( (Y : Z) \\) with \\( y = Y/Z \\).  Discarding
//! the x-coordinate identifies \\( P \\) and \\( -P \\), which is exactly
//! what the isogeny walk needs; the neutral element becomes \\( Y = Z \\).
//!
//! The y-line is the Edwards-side mirror of Montgomery x-line arithmetic:
//! the curve \\( (a : a-d) \\) corresponds to the Montgomery coefficient
//! \\( (2(a+d) : a-d) \\), and the maps between the two lines are the
//! linear substitutions \\( (Y : Z) = (X_m - Z_m : X_m + Z_m) \\).  All
//! formulas below are fixed sequences of field operations; the curve is
//! always an explicit parameter and never implicit global state.

#![allow(non_snake_case)]

use rand_core::{CryptoRng, RngCore};
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

use crate::field::FieldElement;
use crate::params;

/// A curve in the Edwards y-coordinate model, held as the projective
/// coefficient pair \\( (a : a-d) \\) with both entries in Montgomery
/// representation.
///
/// The same object doubles as the protocol's public key and shared
/// secret: the group action maps curves to curves, and a curve's
/// isomorphism class is exactly the projective class of this pair.
#[derive(Copy, Clone, Debug)]
pub struct EdwardsCurve {
    pub(crate) a: FieldElement,
    pub(crate) a_minus_d: FieldElement,
}

impl EdwardsCurve {
    /// Check that this coefficient pair describes a curve.  The only
    /// rejected input is the all-zero pair, which is not a projective
    /// point at all.
    pub fn is_valid(&self) -> Choice {
        !(self.a.is_zero() & self.a_minus_d.is_zero())
    }

    /// Serialize the coefficient pair as \\( a \parallel (a-d) \\), each
    /// coordinate as 32 little-endian bytes.
    ///
    /// The projective representation is not normalized first, so equal
    /// curves need not serialize identically; compare curves, not bytes.
    pub fn to_bytes(&self) -> [u8; 64] {
        let mut bytes = [0u8; 64];
        bytes[..32].copy_from_slice(&self.a.as_bytes());
        bytes[32..].copy_from_slice(&self.a_minus_d.as_bytes());
        bytes
    }

    /// Deserialize a coefficient pair produced by [`EdwardsCurve::to_bytes`].
    ///
    /// No curve validation happens here; consumers of the curve reject
    /// the zero pair.
    pub fn from_bytes(bytes: &[u8; 64]) -> EdwardsCurve {
        let mut a = [0u8; 32];
        let mut a_minus_d = [0u8; 32];
        a.copy_from_slice(&bytes[..32]);
        a_minus_d.copy_from_slice(&bytes[32..]);
        EdwardsCurve {
            a: FieldElement::from_bytes(&a),
            a_minus_d: FieldElement::from_bytes(&a_minus_d),
        }
    }

    /// The numerator \\( 2(a+d) = 2(2a - (a-d)) \\) of the corresponding
    /// Montgomery coefficient, over the shared denominator \\( a-d \\).
    fn montgomery_numerator(&self) -> FieldElement {
        let t = &(&self.a + &self.a) - &self.a_minus_d;
        &t + &t
    }
}

impl ConstantTimeEq for EdwardsCurve {
    /// Test projective equality of the coefficient pairs by
    /// cross-multiplication, \\( a_1 (a_2 - d_2) = a_2 (a_1 - d_1) \\).
    fn ct_eq(&self, other: &EdwardsCurve) -> Choice {
        (&self.a * &other.a_minus_d).ct_eq(&(&other.a * &self.a_minus_d))
    }
}

impl PartialEq for EdwardsCurve {
    fn eq(&self, other: &EdwardsCurve) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for EdwardsCurve {}

/// A point on (or off) an Edwards curve, tracked only by the projective
/// pair \\( (Y : Z) \\) of its y-coordinate.
#[derive(Copy, Clone, Debug)]
pub struct ProjectivePoint {
    pub(crate) Y: FieldElement,
    pub(crate) Z: FieldElement,
}

impl ConditionallySelectable for ProjectivePoint {
    fn conditional_select(
        a: &ProjectivePoint,
        b: &ProjectivePoint,
        choice: Choice,
    ) -> ProjectivePoint {
        ProjectivePoint {
            Y: FieldElement::conditional_select(&a.Y, &b.Y, choice),
            Z: FieldElement::conditional_select(&a.Z, &b.Z, choice),
        }
    }
}

impl ConstantTimeEq for ProjectivePoint {
    /// Test projective equality by cross-multiplication.
    fn ct_eq(&self, other: &ProjectivePoint) -> Choice {
        (&self.Y * &other.Z).ct_eq(&(&other.Y * &self.Z))
    }
}

impl PartialEq for ProjectivePoint {
    fn eq(&self, other: &ProjectivePoint) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for ProjectivePoint {}

impl ProjectivePoint {
    /// The neutral element of the y-line, \\( y = 1 \\).
    pub(crate) fn identity() -> ProjectivePoint {
        ProjectivePoint {
            Y: FieldElement::ONE,
            Z: FieldElement::ONE,
        }
    }

    /// Determine whether this point is the neutral element, i.e. whether
    /// \\( Y = Z \\).
    pub(crate) fn is_identity(&self) -> Choice {
        (&self.Y - &self.Z).is_zero()
    }

    /// Point doubling, \\( [2]P \\).
    pub(crate) fn double(&self, curve: &EdwardsCurve) -> ProjectivePoint {
        let ysq = self.Y.square();
        let zsq = self.Z.square();

        let e = &curve.a_minus_d * &ysq;
        let q0 = &e * &zsq;
        let zsq_minus_ysq = &zsq - &ysq;
        let f = &(&e + &(&curve.a * &zsq_minus_ysq)) * &zsq_minus_ysq;

        ProjectivePoint {
            Y: &q0 - &f,
            Z: &q0 + &f,
        }
    }

    /// Differential addition: compute \\( P + Q \\) given the difference
    /// \\( P - Q \\) (up to sign, which the y-line ignores).
    pub(crate) fn differential_add(
        &self,
        other: &ProjectivePoint,
        difference: &ProjectivePoint,
    ) -> ProjectivePoint {
        // carry the difference over to the Montgomery x-line
        let xd = &difference.Z + &difference.Y;
        let zd = &difference.Z - &difference.Y;

        let t0 = &self.Z * &other.Y;
        let t1 = &self.Y * &other.Z;

        let sum_sq = (&t0 + &t1).square();
        let diff_sq = (&t0 - &t1).square();

        let u = &sum_sq * &zd;
        let v = &diff_sq * &xd;

        // and back to the Edwards y-line
        ProjectivePoint {
            Y: &u - &v,
            Z: &u + &v,
        }
    }

    /// Scalar multiplication \\( [\ell_i]P \\) by the `index`-th class
    /// group prime, walking that prime's fixed differential addition
    /// chain.
    ///
    /// The walk keeps a Lucas triple \\( (R_0, R_1, R_2) \\) with
    /// \\( R_2 = R_0 + R_1 \\), so the difference needed by each
    /// [`differential_add`](Self::differential_add) is always one of the
    /// slots.  Chain bits and length are public parameter data, and the
    /// identity test only short-circuits for degenerate inputs whose
    /// order the caller already gave away by construction.
    pub(crate) fn mul_by_prime(&self, curve: &EdwardsCurve, index: usize) -> ProjectivePoint {
        let mut r0 = *self;
        let mut r1 = self.double(curve);
        let mut r2 = r1.differential_add(&r0, self);

        let mut chain = params::CHAINS[index];
        for _ in 0..params::CHAIN_LENGTHS[index] {
            let bit = (chain & 1) as usize;
            let (sel, other) = if bit == 0 { (r0, r1) } else { (r1, r0) };

            let t = if bool::from(sel.is_identity()) {
                r2.double(curve)
            } else {
                r2.differential_add(&other, &sel)
            };

            r0 = other;
            r1 = r2;
            r2 = t;
            chain >>= 1;
        }
        r2
    }
}

/// Map a uniformly random field element onto the curve and its quadratic
/// twist simultaneously, returning `(curve_point, twist_point)`.
///
/// For a curve with Montgomery coefficient \\( (M : C) \\) and parameter
/// \\( u \in [2, (p-1)/2] \\), the two candidate x-coordinates are
/// \\( \hat x = M / (C(u\^2-1)) \\) and \\( -\hat x - M/C \\); exactly one
/// of them lies on the curve, decided by the Euler criterion on
/// \\( t = MC(u\^2-1)\bigl(M\^2u\^2 + C\^2(u\^2-1)\^2\bigr) \\), which is a
/// square precisely when \\( \hat x \\) does.
///
/// Since \\( -1 \\) is a nonsquare, \\( t \\) vanishes only when
/// \\( M = 0 \\).  That case is folded in by a masked swap rather than a
/// branch: it replaces the candidates by \\( u \\) and \\( -u \\) and the
/// criterion input by \\( u\^3 + u \\).  Both selections here are masked
/// swaps keyed on field-element predicates, not branches.
pub(crate) fn elligator<R: RngCore + CryptoRng>(
    curve: &EdwardsCurve,
    rng: &mut R,
) -> (ProjectivePoint, ProjectivePoint) {
    let u = FieldElement::random_half_range(rng);
    let usq = u.square();

    let u2_plus_1 = &usq + &FieldElement::ONE;
    let u2_minus_1 = &usq - &FieldElement::ONE;

    // Z-coordinate shared by both candidates
    let cz = &curve.a_minus_d * &u2_minus_1;
    let M = curve.montgomery_numerator();

    let t0 = &M * &cz;
    let t1 = &(&M.square() * &usq) + &cz.square();
    let mut t = &t0 * &t1;

    // alpha becomes u exactly when M = 0, the Montgomery-coefficient-zero
    // special case; otherwise it stays zero and drops out of the formulas
    let mut alpha = FieldElement::ZERO;
    let mut beta = u;
    FieldElement::conditional_swap(&mut alpha, &mut beta, t.is_zero());

    let alpha_u2_plus_1 = &alpha * &u2_plus_1;
    let alpha_cz = &alpha * &cz;

    let mut x_plus = &M + &alpha_cz;
    let mut x_minus = &(&(&FieldElement::ZERO - &M) * &usq) - &alpha_cz;

    t += &alpha_u2_plus_1;
    FieldElement::conditional_swap(&mut x_plus, &mut x_minus, !t.is_square());

    // map the Montgomery pairs (x : cz) back to the Edwards y-line
    let on_curve = ProjectivePoint {
        Y: &x_plus - &cz,
        Z: &x_plus + &cz,
    };
    let on_twist = ProjectivePoint {
        Y: &x_minus - &cz,
        Z: &x_minus + &cz,
    };
    (on_curve, on_twist)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::constants;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// The Montgomery x-coordinate of a y-line point, `(Z + Y) / (Z - Y)`.
    fn montgomery_x(p: &ProjectivePoint) -> FieldElement {
        &(&p.Z + &p.Y) * &(&p.Z - &p.Y).invert()
    }

    /// Whether the Montgomery x-coordinate `x` lies on the curve with
    /// coefficient `A`, i.e. whether `x^3 + A x^2 + x` is a square.
    fn on_montgomery_curve(x: &FieldElement, A: &FieldElement) -> bool {
        let rhs = &(&(&x.square() * x) + &(&(A * x) * x)) + x;
        rhs.is_square().into()
    }

    #[test]
    fn identity_doubles_to_identity() {
        let id = ProjectivePoint::identity();
        assert!(bool::from(id.double(&constants::BASE_CURVE).is_identity()));
    }

    #[test]
    fn base_curve_is_valid() {
        assert!(bool::from(constants::BASE_CURVE.is_valid()));
        let zero = EdwardsCurve {
            a: FieldElement::ZERO,
            a_minus_d: FieldElement::ZERO,
        };
        assert!(!bool::from(zero.is_valid()));
    }

    #[test]
    fn curve_equality_is_projective() {
        let curve = constants::BASE_CURVE;
        let three = FieldElement::to_montgomery(&[3, 0, 0, 0]);
        let scaled = EdwardsCurve {
            a: &curve.a * &three,
            a_minus_d: &curve.a_minus_d * &three,
        };
        assert_eq!(curve, scaled);
    }

    #[test]
    fn curve_encoding_round_trip() {
        let curve = constants::BASE_CURVE;
        let decoded = EdwardsCurve::from_bytes(&curve.to_bytes());
        assert_eq!(curve, decoded);
    }

    #[test]
    fn elligator_splits_curve_and_twist() {
        // On the base curve the Montgomery coefficient is zero, so a
        // point with x-coordinate x is on the curve iff x^3 + x is
        // square, and the twist candidate is -x.
        let mut rng = StdRng::seed_from_u64(0x656c_6c69);
        let curve = constants::BASE_CURVE;
        let zero = FieldElement::ZERO;
        for _ in 0..20 {
            let (plus, minus) = elligator(&curve, &mut rng);
            assert!(on_montgomery_curve(&montgomery_x(&plus), &zero));
            assert!(!on_montgomery_curve(&montgomery_x(&minus), &zero));
        }
    }

    #[test]
    fn elligator_generic_curve() {
        // An arbitrary valid coefficient pair exercises the generic
        // (nonzero Montgomery coefficient) path of the sampler; the
        // membership split must still hold.
        let mut rng = StdRng::seed_from_u64(0x6c69_6f6e_73);
        let curve = EdwardsCurve {
            a: FieldElement::to_montgomery(&[5, 0, 0, 0]),
            a_minus_d: FieldElement::to_montgomery(&[3, 0, 0, 0]),
        };
        let A = &curve.montgomery_numerator() * &curve.a_minus_d.invert();
        for _ in 0..20 {
            let (plus, minus) = elligator(&curve, &mut rng);
            assert!(on_montgomery_curve(&montgomery_x(&plus), &A));
            assert!(!on_montgomery_curve(&montgomery_x(&minus), &A));
        }
    }

    #[test]
    fn small_multiples_match_chain_walk() {
        let mut rng = StdRng::seed_from_u64(0x6d75_6c73);
        let curve = constants::BASE_CURVE;
        let (p, _) = elligator(&curve, &mut rng);

        let two_p = p.double(&curve);
        let three_p = two_p.differential_add(&p, &p);
        let five_p = three_p.differential_add(&two_p, &p);

        // l = 3 is index 41, l = 5 is index 40
        assert_eq!(p.mul_by_prime(&curve, 41), three_p);
        assert_eq!(p.mul_by_prime(&curve, 40), five_p);
    }

    #[test]
    fn cleared_points_have_prime_order() {
        let mut rng = StdRng::seed_from_u64(0x6f72_6465_72);
        let curve = constants::BASE_CURVE;

        // clear the cofactor down to the l_0 = 241 torsion
        for _ in 0..4 {
            let (mut point, _) = elligator(&curve, &mut rng);
            point = point.double(&curve).double(&curve);
            for j in 1..params::NUM_PRIMES {
                point = point.mul_by_prime(&curve, j);
            }
            if bool::from(point.is_identity()) {
                // the sample had no 241-torsion component; rare but legal
                continue;
            }
            // multiplying by a prime that does not divide the order must
            // not kill the point
            assert!(!bool::from(point.mul_by_prime(&curve, 1).is_identity()));
            assert!(bool::from(point.mul_by_prime(&curve, 0).is_identity()));
        }
    }

    #[test]
    fn twist_points_clear_the_same_cofactor() {
        // both the curve and its twist have group order p + 1
        let mut rng = StdRng::seed_from_u64(0x7477_6973_74);
        let curve = constants::BASE_CURVE;
        let (_, mut point) = elligator(&curve, &mut rng);
        point = point.double(&curve).double(&curve);
        for j in 0..params::NUM_PRIMES - 1 {
            point = point.mul_by_prime(&curve, j);
        }
        // now at most 3-torsion is left (index 41)
        assert!(bool::from(
            point.mul_by_prime(&curve, params::NUM_PRIMES - 1).is_identity()
        ));
    }
}

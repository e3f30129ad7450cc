// -*- mode: rust; -*-
//
// This file is part of csidh256.
// See LICENSE for licensing information.

//! Construction and evaluation of odd-degree isogenies on the Edwards
//! y-line.
//!
//! Given a point \\( P \\) of odd prime order \\( \ell \\), the quotient
//! isogeny \\( E \to E / \langle P \rangle \\) is determined by the
//! multiples \\( P, [2]P, \ldots, [(\ell-1)/2]P \\) of the kernel
//! generator.  Both the codomain coefficients and the image of an
//! arbitrary point are products over these multiples, so they are
//! computed once per isogeny and reused.
//!
//! Neither function validates that `point` really has order
//! \\( \ell_i \\); the group-action evaluator guarantees that by
//! cofactor clearing, and detects the degenerate identity kernel before
//! calling in here.

use crate::edwards::{EdwardsCurve, ProjectivePoint};
use crate::field::FieldElement;
use crate::params;

/// The precomputed multiples of an isogeny's kernel generator, together
/// with the generator index recording the isogeny degree.
///
/// The buffer is sized for the largest class-group prime and reused
/// across isogeny computations, so nothing here allocates.
pub(crate) struct KernelPoints {
    points: [ProjectivePoint; params::MAX_KERNEL_POINTS],
    degree_index: usize,
}

impl KernelPoints {
    /// Allocate an empty kernel buffer.
    pub(crate) fn new() -> KernelPoints {
        KernelPoints {
            points: [ProjectivePoint::identity(); params::MAX_KERNEL_POINTS],
            degree_index: 0,
        }
    }
}

/// Construct the degree-\\( \ell_i \\) isogeny with kernel generated by
/// `point`, filling `kernel` with the first \\( (\ell_i - 1)/2 \\)
/// multiples of `point` and returning the codomain curve.
///
/// The codomain coefficients are \\( a' = a\^{\ell} B_z\^8 \\) and
/// \\( d' = d\^{\ell} B_y\^8 \\), where \\( B_y, B_z \\) are the products
/// of the kernel multiples' coordinates; the \\( \ell \\)-th powers walk
/// the public bits of \\( \ell \\).
pub(crate) fn compute_isogeny(
    kernel: &mut KernelPoints,
    point: &ProjectivePoint,
    curve: &EdwardsCurve,
    index: usize,
) -> EdwardsCurve {
    let l = params::L[index];
    let s = (l >> 1) as usize;
    kernel.degree_index = index;

    let k = &mut kernel.points;
    k[0] = *point;
    if s > 1 {
        k[1] = point.double(curve);
    }

    let mut by = point.Y;
    let mut bz = point.Z;
    for j in 2..s {
        by = &by * &k[j - 1].Y;
        bz = &bz * &k[j - 1].Z;
        k[j] = k[j - 1].differential_add(point, &k[j - 2]);
    }
    if l != 3 {
        by = &by * &k[s - 1].Y;
        bz = &bz * &k[s - 1].Z;
    }

    // a^l and d^l by square-and-multiply over the public bits of l
    let d = &curve.a - &curve.a_minus_d;
    let mut a_pow = curve.a;
    let mut d_pow = d;
    let bits = params::L_BITS[index];
    for j in 1..bits {
        a_pow = a_pow.square();
        d_pow = d_pow.square();
        if (l >> (bits - 1 - j)) & 1 == 1 {
            a_pow = &a_pow * &curve.a;
            d_pow = &d_pow * &d;
        }
    }

    // raise the coordinate products to the eighth power
    for _ in 0..3 {
        by = by.square();
        bz = bz.square();
    }

    let a_image = &a_pow * &bz;
    let d_image = &d_pow * &by;
    EdwardsCurve {
        a: a_image,
        a_minus_d: &a_image - &d_image,
    }
}

/// Push an arbitrary point through the isogeny described by `kernel`,
/// returning its image on the codomain curve.
///
/// Points in the kernel map to the identity.
pub(crate) fn evaluate_isogeny(kernel: &KernelPoints, point: &ProjectivePoint) -> ProjectivePoint {
    let s = (params::L[kernel.degree_index] >> 1) as usize;
    let k = &kernel.points;

    let s0 = &point.Y * &k[0].Z;
    let s1 = &point.Z * &k[0].Y;
    let mut r0 = &s0 + &s1;
    let mut r1 = &s0 - &s1;

    for kj in k.iter().take(s).skip(1) {
        let s0 = &point.Y * &kj.Z;
        let s1 = &point.Z * &kj.Y;
        r0 = &r0 * &(&s0 + &s1);
        r1 = &r1 * &(&s0 - &s1);
    }

    r0 = r0.square();
    r1 = r1.square();

    let u = &r0 * &(&point.Z + &point.Y);
    let v = &r1 * &(&point.Z - &point.Y);
    ProjectivePoint {
        Y: &u - &v,
        Z: &u + &v,
    }
}

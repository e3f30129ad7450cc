// -*- mode: rust; -*-
//
// This file is part of csidh256.
// See LICENSE for licensing information.

//! This module contains backend-specific constant values, such as the
//! 64-bit limbs of the field prime and the Montgomery domain parameters.

use crate::backend::serial::u64::field::FieldElement64;

/// The CSIDH-256 field prime \\( p = 4 \cdot \ell_1 \cdots \ell_{42} - 1 \\),
/// as four 64-bit limbs in little-endian order.
pub(crate) const P: [u64; 4] = [
    0xbeb1_2441_3a0d_2503,
    0x08ea_47e2_de78_0582,
    0x80df_a9bd_4d37_5778,
    0x9cef_b8cf_89f7_15f5,
];

/// `PINV` = \\( -p\^{-1} \pmod{2\^{64}} \\), the REDC folding constant.
pub(crate) const PINV: u64 = 0xe824_04e4_932d_9255;

/// `R` = \\( 2\^{256} \pmod p \\).
///
/// This is the Montgomery representation of one; multiplying by `RR` and
/// reducing carries a value into the Montgomery domain.
pub(crate) const R: FieldElement64 = FieldElement64([
    0x414e_dbbe_c5f2_dafd,
    0xf715_b81d_2187_fa7d,
    0x7f20_5642_b2c8_a887,
    0x6310_4730_7608_ea0a,
]);

/// `RR` = \\( R\^2 \pmod p \\).
pub(crate) const RR: FieldElement64 = FieldElement64([
    0x9112_accd_a6b1_2f0b,
    0x190d_ee57_e7a5_dfd2,
    0x9af3_d6d6_90f5_4272,
    0x082f_7e34_856f_cd44,
]);

/// `TWO_R` = \\( 2R \bmod p \\), the Montgomery representation of two.
pub(crate) const TWO_R: FieldElement64 = FieldElement64([
    0xc3ec_933c_51d8_90f7,
    0xe541_2857_6497_ef77,
    0x7d61_02c8_1859_f997,
    0x2930_d591_621a_be1f,
]);

/// The limbs of \\( (p-1)/2 \\), the exponent of the Euler criterion.
pub(crate) const P_MINUS_1_OVER_2: [u64; 4] = [
    0x5f58_9220_9d06_9281,
    0x0475_23f1_6f3c_02c1,
    0xc06f_d4de_a69b_abbc,
    0x4e77_dc67_c4fb_8afa,
];

/// The limbs of \\( p-2 \\), the exponent of the Fermat inversion.
pub(crate) const P_MINUS_2: [u64; 4] = [
    0xbeb1_2441_3a0d_2501,
    0x08ea_47e2_de78_0582,
    0x80df_a9bd_4d37_5778,
    0x9cef_b8cf_89f7_15f5,
];

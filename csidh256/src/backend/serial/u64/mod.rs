// -*- mode: rust; -*-
//
// This file is part of csidh256.
// See LICENSE for licensing information.

//! The `u64` backend uses `u64`s with `u128` products.

pub mod constants;
pub mod field;

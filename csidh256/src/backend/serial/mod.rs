// -*- mode: rust; -*-
//
// This file is part of csidh256.
// See LICENSE for licensing information.

//! Serial implementations of field arithmetic.

pub mod u64;

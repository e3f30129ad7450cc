// -*- mode: rust; -*-
//
// This file is part of csidh256.
// See LICENSE for licensing information.

//! Pluggable implementations for different architectures.
//!
//! There is currently one serial backend, using four full 64-bit limbs
//! per field element.  The module layering leaves room for a 32-bit or
//! vectorized backend without disturbing the layers above, which only
//! ever name `crate::field::FieldElement`.

pub mod serial;

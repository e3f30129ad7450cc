// -*- mode: rust; -*-
//
// This file is part of csidh256.
// See LICENSE for licensing information.

#![cfg_attr(not(test), no_std)]
#![deny(missing_docs)]
#![doc = include_str!("../README.md")]

//------------------------------------------------------------------------
// External dependencies:
//------------------------------------------------------------------------

#[cfg(feature = "std")]
extern crate std;

// Internal macros. Must come first!
#[macro_use]
pub(crate) mod macros;

//------------------------------------------------------------------------
// csidh256 public modules
//------------------------------------------------------------------------

pub mod action;
pub mod constants;
pub mod edwards;
pub mod errors;
pub mod params;

//------------------------------------------------------------------------
// csidh256 internal modules
//------------------------------------------------------------------------

pub(crate) mod backend;
pub(crate) mod field;
pub(crate) mod isogeny;

pub use crate::action::{evaluate_action, sample_exponents};
pub use crate::constants::BASE_CURVE;
pub use crate::edwards::EdwardsCurve;
pub use crate::errors::Error;
pub use crate::params::NUM_PRIMES;

/// Check the compiled-in class-group parameter table for internal
/// consistency.
///
/// The prime, generator list, and isogeny budget are fixed at compile
/// time, so this can only fail for a corrupted build; callers that
/// construct keys should check once and refuse to operate on failure
/// rather than compute an action over a broken table.
pub fn parameters_are_consistent() -> bool {
    params::is_consistent()
}

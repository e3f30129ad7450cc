// -*- mode: rust; -*-
//
// This file is part of csidh256.
// See LICENSE for licensing information.

//! Errors which may occur while evaluating the group action.
//!
//! The core is closed over inputs produced by its own key generation, so
//! the taxonomy is deliberately narrow.  Degenerate sampled points are
//! routine and handled internally by retrying; they never surface here.

use core::fmt;
use core::fmt::Display;

/// Errors which may occur while validating inputs or evaluating the
/// class-group action.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Error {
    /// The curve coefficient pair was (0, 0), which does not describe a
    /// curve.  This input is rejected, never retried.
    InvalidCurve,
    /// The compiled-in class-group parameter table failed its
    /// self-consistency check; refusing to compute an action with it.
    InconsistentParameters,
    /// The evaluator exhausted its sampling-round budget before applying
    /// all required isogenies.  With a consistent parameter table this is
    /// unreachable in practice.
    SamplingBudgetExceeded,
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::InvalidCurve => write!(f, "Curve coefficient pair is zero"),
            Error::InconsistentParameters => {
                write!(f, "Class-group parameter table is inconsistent")
            }
            Error::SamplingBudgetExceeded => {
                write!(f, "Point sampling budget exhausted during group action")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

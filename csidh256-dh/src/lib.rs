// -*- mode: rust; -*-
//
// This file is part of csidh256-dh.
// See LICENSE for licensing information.

#![cfg_attr(not(test), no_std)]
#![deny(missing_docs)]
#![doc = include_str!("../README.md")]

//------------------------------------------------------------------------
// csidh256-dh public API
//------------------------------------------------------------------------

mod dh;

pub use crate::dh::*;

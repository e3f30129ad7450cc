// -*- mode: rust; -*-
//
// This file is part of csidh256-dh.
// See LICENSE for licensing information.

//! CSIDH-256 non-interactive key exchange.
//!
//! Unlike a Diffie-Hellman over a fixed group, deriving a public key or
//! a shared secret here evaluates an isogeny walk, which consumes
//! entropy along the way (the walk's waypoints are sampled, its
//! destination is not).  Every derivation therefore takes a CSPRNG
//! argument; the resulting curves are deterministic functions of the
//! keys alone.

use csidh256::{
    evaluate_action, parameters_are_consistent, sample_exponents, EdwardsCurve, Error,
    BASE_CURVE, NUM_PRIMES,
};
use rand_core::{CryptoRng, RngCore};

#[cfg(feature = "zeroize")]
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A CSIDH-256 public key: the curve reached by applying the private
/// class-group element to the base curve.
#[derive(Copy, Clone, Debug)]
pub struct PublicKey(pub(crate) EdwardsCurve);

impl From<[u8; 64]> for PublicKey {
    /// Given a byte array, construct a CSIDH-256 `PublicKey`.
    fn from(bytes: [u8; 64]) -> PublicKey {
        PublicKey(EdwardsCurve::from_bytes(&bytes))
    }
}

impl PublicKey {
    /// Convert this public key to a byte array.
    ///
    /// The encoding is the curve's projective coefficient pair and is
    /// not normalized; compare public keys with `==`, not by bytes.
    #[inline]
    pub fn to_bytes(&self) -> [u8; 64] {
        self.0.to_bytes()
    }
}

impl PartialEq for PublicKey {
    /// Public keys are equal when they name the same curve, which is
    /// decided projectively by cross-multiplication.
    fn eq(&self, other: &PublicKey) -> bool {
        self.0 == other.0
    }
}

impl Eq for PublicKey {}

/// A CSIDH-256 private key: one signed, bounded exponent per class-group
/// generator, in the `(magnitude << 1) | sign` byte encoding.
///
/// This key may be used for any number of derivations; CSIDH is a
/// non-interactive key exchange and its public keys are static by
/// design.
#[derive(Clone)]
pub struct PrivateKey(pub(crate) [u8; NUM_PRIMES]);

impl PrivateKey {
    /// Generate a new [`PrivateKey`] with the supplied RNG.
    pub fn random_from_rng<R: RngCore + CryptoRng>(csprng: &mut R) -> Self {
        PrivateKey(sample_exponents(csprng))
    }

    /// Generate a new [`PrivateKey`].
    #[cfg(feature = "getrandom")]
    pub fn random() -> Self {
        Self::random_from_rng(&mut rand_core::OsRng)
    }

    /// Derive the public key for this private key by walking the
    /// class-group action away from the base curve.
    pub fn public_key<R: RngCore + CryptoRng>(&self, csprng: &mut R) -> Result<PublicKey, Error> {
        Ok(PublicKey(evaluate_action(&self.0, &BASE_CURVE, csprng)?))
    }

    /// Perform a key agreement between `self` and `their_public`,
    /// producing a [`SharedSecret`].
    pub fn diffie_hellman<R: RngCore + CryptoRng>(
        &self,
        their_public: &PublicKey,
        csprng: &mut R,
    ) -> Result<SharedSecret, Error> {
        Ok(SharedSecret(evaluate_action(
            &self.0,
            &their_public.0,
            csprng,
        )?))
    }

    /// Extract this key's bytes for serialization.
    #[inline]
    pub fn to_bytes(&self) -> [u8; NUM_PRIMES] {
        self.0
    }

    /// View this key as a byte array.
    #[inline]
    pub fn as_bytes(&self) -> &[u8; NUM_PRIMES] {
        &self.0
    }
}

impl From<[u8; NUM_PRIMES]> for PrivateKey {
    /// Load a private key from a byte array.
    fn from(bytes: [u8; NUM_PRIMES]) -> PrivateKey {
        PrivateKey(bytes)
    }
}

impl Drop for PrivateKey {
    fn drop(&mut self) {
        #[cfg(feature = "zeroize")]
        self.0.zeroize();
    }
}

#[cfg(feature = "zeroize")]
impl ZeroizeOnDrop for PrivateKey {}

/// The result of a key agreement: the curve reached by applying one
/// party's private element to the other party's public curve.
#[derive(Copy, Clone, Debug)]
pub struct SharedSecret(pub(crate) EdwardsCurve);

impl SharedSecret {
    /// Convert this shared secret to a byte array.
    ///
    /// Both parties reach the same curve but generally different
    /// projective representatives of it, so the raw encodings of a
    /// matching pair of shared secrets will differ.  Compare with
    /// [`shared_secrets_equal`] (or `==`); feed a key-derivation
    /// function only after normalizing, or derive from the agreement
    /// transcript instead.
    #[inline]
    pub fn to_bytes(&self) -> [u8; 64] {
        self.0.to_bytes()
    }
}

impl PartialEq for SharedSecret {
    fn eq(&self, other: &SharedSecret) -> bool {
        self.0 == other.0
    }
}

impl Eq for SharedSecret {}

/// Test whether two shared secrets name the same curve, by
/// cross-multiplying the projective coefficient pairs.
pub fn shared_secrets_equal(ours: &SharedSecret, theirs: &SharedSecret) -> bool {
    ours == theirs
}

/// Generate a fresh keypair: sample a private exponent vector and derive
/// its public curve.
///
/// The compiled-in parameter table is checked for consistency first;
/// key generation refuses to proceed over a corrupted table.
pub fn generate_keypair<R: RngCore + CryptoRng>(
    csprng: &mut R,
) -> Result<(PrivateKey, PublicKey), Error> {
    if !parameters_are_consistent() {
        return Err(Error::InconsistentParameters);
    }
    let private = PrivateKey::random_from_rng(csprng);
    let public = private.public_key(csprng)?;
    Ok((private, public))
}

// -*- mode: rust; -*-
//
// This file is part of csidh256-dh.
// See LICENSE for licensing information.

//! Integration tests for the CSIDH-256 key exchange.

use csidh256_dh::{generate_keypair, shared_secrets_equal, PrivateKey, PublicKey};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn alice_and_bob_agree() {
    let mut rng = StdRng::seed_from_u64(0x616c_6963_65);

    let (alice_sk, alice_pk) = generate_keypair(&mut rng).unwrap();
    let (bob_sk, bob_pk) = generate_keypair(&mut rng).unwrap();

    let alice_shared = alice_sk.diffie_hellman(&bob_pk, &mut rng).unwrap();
    let bob_shared = bob_sk.diffie_hellman(&alice_pk, &mut rng).unwrap();

    assert!(shared_secrets_equal(&alice_shared, &bob_shared));
    assert_eq!(alice_shared, bob_shared);
}

#[test]
fn group_action_commutes() {
    // The heart of the protocol: [a][b]E = [b][a]E over many random
    // keypairs.
    let mut rng = StdRng::seed_from_u64(0x636f_6d6d_7574);

    for _ in 0..100 {
        let (alice_sk, alice_pk) = generate_keypair(&mut rng).unwrap();
        let (bob_sk, bob_pk) = generate_keypair(&mut rng).unwrap();

        let alice_shared = alice_sk.diffie_hellman(&bob_pk, &mut rng).unwrap();
        let bob_shared = bob_sk.diffie_hellman(&alice_pk, &mut rng).unwrap();

        assert!(shared_secrets_equal(&alice_shared, &bob_shared));
    }
}

#[test]
fn distinct_keys_disagree() {
    let mut rng = StdRng::seed_from_u64(0x6469_7374);

    let (alice_sk, _) = generate_keypair(&mut rng).unwrap();
    let (bob_sk, bob_pk) = generate_keypair(&mut rng).unwrap();
    let (eve_sk, _) = generate_keypair(&mut rng).unwrap();

    let alice_shared = alice_sk.diffie_hellman(&bob_pk, &mut rng).unwrap();
    let eve_shared = eve_sk.diffie_hellman(&bob_pk, &mut rng).unwrap();

    assert_ne!(alice_shared, eve_shared);
    let _ = bob_sk;
}

#[test]
fn public_key_bytes_round_trip() {
    let mut rng = StdRng::seed_from_u64(0x6279_7465_73);

    let (_, pk) = generate_keypair(&mut rng).unwrap();
    let decoded = PublicKey::from(pk.to_bytes());
    assert_eq!(pk, decoded);
    // the encoding itself is stable once canonicalized by a round trip
    assert_eq!(pk.to_bytes(), decoded.to_bytes());
}

#[test]
fn private_key_bytes_round_trip() {
    let mut rng = StdRng::seed_from_u64(0x7072_6976);

    let sk = PrivateKey::random_from_rng(&mut rng);
    let restored = PrivateKey::from(sk.to_bytes());
    assert_eq!(sk.as_bytes(), restored.as_bytes());

    // the same private key derives the same public curve
    let pk1 = sk.public_key(&mut rng).unwrap();
    let pk2 = restored.public_key(&mut rng).unwrap();
    assert_eq!(pk1, pk2);
}

#[test]
fn reusing_a_private_key_is_stable() {
    // CSIDH public keys are static: repeated agreements with the same
    // key pair always land on the same curve.
    let mut rng = StdRng::seed_from_u64(0x7374_6162);

    let (alice_sk, _) = generate_keypair(&mut rng).unwrap();
    let (_, bob_pk) = generate_keypair(&mut rng).unwrap();

    let first = alice_sk.diffie_hellman(&bob_pk, &mut rng).unwrap();
    let second = alice_sk.diffie_hellman(&bob_pk, &mut rng).unwrap();
    assert_eq!(first, second);
}

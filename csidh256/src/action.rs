// -*- mode: rust; -*-
//
// This file is part of csidh256.
// See LICENSE for licensing information.

//! The batched class-group action evaluator.
//!
//! A private key is a vector of signed exponents \\( (e_1, \ldots, e_n) \\),
//! one per class-group prime.  The action applies \\( |e_i| \\)
//! degree-\\( \ell_i \\) isogenies in the direction given by the sign of
//! \\( e_i \\), plus paired dummy steps that cancel, so that exactly
//! \\( B_i \\) isogenies are applied per generator no matter what
//! \\( e_i \\) is.
//!
//! To amortize point sampling, the generators are partitioned into
//! disjoint batches: one sampled point pair serves every unfinished
//! generator in a batch, after cofactor clearing against the batch
//! complement.  Once every batch has been visited a fixed number of
//! times, the stragglers are regrouped into a single cleanup batch for
//! the remainder of the run.
//!
//! Which of the sampled pair acts as the kernel source is selected by a
//! masked swap keyed on the exponent's sign bit, and the per-generator
//! exponent state is read through a constant-time table scan.  One
//! timing caveat remains: when a sampled point happens to carry no
//! \\( \ell_i \\)-torsion, the isogeny for that generator is skipped and
//! retried on a later sample, and that skip is data-dependent.  The
//! fixed per-generator isogeny count masks *which exponent* is being
//! processed, but not the skip itself.  A deployment needing full timing
//! uniformity must additionally pad skipped slots with dummy
//! constructions.

use rand_core::{CryptoRng, RngCore};
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

#[cfg(feature = "zeroize")]
use zeroize::Zeroize;

use crate::edwards::{elligator, EdwardsCurve, ProjectivePoint};
use crate::errors::Error;
use crate::isogeny::{compute_isogeny, evaluate_isogeny, KernelPoints};
use crate::params;

/// Fetch `exponents[position]` without leaking `position` through memory
/// access patterns: every entry is read and the match is selected by a
/// constant-time move.
fn lookup(position: usize, exponents: &[u8; params::NUM_PRIMES]) -> u8 {
    let mut r = exponents[0];
    for (j, &e) in exponents.iter().enumerate().skip(1) {
        r.conditional_assign(&e, j.ct_eq(&position));
    }
    r
}

/// Sample a fresh private exponent vector.
///
/// For each generator the magnitude is drawn uniformly from
/// \\( [0, B_i] \\) by rejection, recentered into
/// \\( \\{-B_i, -B_i+2, \ldots, B_i\\} \\) (the exponent keeps the parity
/// of \\( B_i \\), which the fixed-count evaluator requires), and encoded
/// as `(magnitude << 1) | sign`, with a set sign bit meaning
/// non-negative.
pub fn sample_exponents<R: RngCore + CryptoRng>(rng: &mut R) -> [u8; params::NUM_PRIMES] {
    let mut key = [0u8; params::NUM_PRIMES];
    for (i, key_byte) in key.iter_mut().enumerate() {
        let bound = params::B[i];
        let parity = bound & 1;
        let mask = (bound + 1).next_power_of_two() - 1;

        let magnitude = loop {
            let mut byte = [0u8; 1];
            rng.fill_bytes(&mut byte);
            let candidate = byte[0] & mask;
            if candidate <= bound {
                break candidate;
            }
        };

        // recenter [0, B] onto the signed parity lattice [-B, B]
        let mut e = ((magnitude as i8) << 1).wrapping_sub((bound + parity) as i8) >> 1;
        e = (e << 1) + parity as i8;

        let sign = e >> 7; // 0 or -1
        let abs = i8::conditional_select(&e, &e.wrapping_neg(), Choice::from((sign & 1) as u8));
        *key_byte = ((abs as u8) << 1) ^ (1 & (1 + sign) as u8);
    }
    key
}

/// Apply the class-group element described by `exponents` to `curve`,
/// returning the resulting curve.
///
/// The output is a deterministic function of `exponents` and `curve`;
/// the randomness only chooses which auxiliary points are sampled along
/// the way, never the destination.  Entropy failures inside `rng` are
/// fatal by contract and must not be silently degraded by the caller.
pub fn evaluate_action<R: RngCore + CryptoRng>(
    exponents: &[u8; params::NUM_PRIMES],
    curve: &EdwardsCurve,
    rng: &mut R,
) -> Result<EdwardsCurve, Error> {
    if !bool::from(curve.is_valid()) {
        return Err(Error::InvalidCurve);
    }

    const N: usize = params::NUM_PRIMES;

    // Working copies of the batch layout; the cleanup phase rewrites
    // batch 0 in place, so these use full-capacity rows.
    let mut batches = [[0usize; N]; params::NUM_BATCHES];
    let mut batch_sizes = [0usize; params::NUM_BATCHES];
    let mut complements = [[0usize; N]; params::NUM_BATCHES];
    let mut complement_sizes = [0usize; params::NUM_BATCHES];
    for m in 0..params::NUM_BATCHES {
        batch_sizes[m] = params::BATCHES[m].len();
        batches[m][..batch_sizes[m]].copy_from_slice(&params::BATCHES[m]);
        complement_sizes[m] = params::BATCH_COMPLEMENTS[m].len();
        complements[m][..complement_sizes[m]].copy_from_slice(&params::BATCH_COMPLEMENTS[m]);
    }
    let mut last_isogeny = params::LAST_ISOGENY;

    let mut e = *exponents;
    let mut counters = params::B;
    let mut finished = [false; N];
    let mut current = *curve;
    let mut kernel = KernelPoints::new();

    let mut applied: u16 = 0;
    let mut num_batches = params::NUM_BATCHES;
    let mut pass_count: usize = 0;
    let mut rounds: usize = 0;
    let mut m = 0;

    while applied < params::NUM_ISOGENIES {
        rounds += 1;
        if rounds > params::MAX_SAMPLING_ROUNDS {
            return Err(Error::SamplingBudgetExceeded);
        }
        m = (m + 1) % num_batches;

        // After a fixed number of passes, fold every unfinished
        // generator into one cleanup batch.
        if pass_count == params::BATCH_PASSES_BEFORE_CLEANUP * num_batches {
            m = 0;
            num_batches = 1;
            batch_sizes[0] = 0;
            complement_sizes[0] = 0;
            for i in 0..N {
                if counters[i] == 0 {
                    complements[0][complement_sizes[0]] = i;
                    complement_sizes[0] += 1;
                } else {
                    last_isogeny[0] = i;
                    batches[0][batch_sizes[0]] = i;
                    batch_sizes[0] += 1;
                }
            }
        }

        // One fresh sample serves the whole batch: t[1] lies on the
        // curve, t[0] on its twist.
        let (plus, minus) = elligator(&current, rng);
        let mut t = [minus, plus];
        for point in t.iter_mut() {
            *point = point.double(&current).double(&current);
        }
        for &j in complements[m][..complement_sizes[m]].iter() {
            t[0] = t[0].mul_by_prime(&current, j);
            t[1] = t[1].mul_by_prime(&current, j);
        }

        for pos in 0..batch_sizes[m] {
            let index = batches[m][pos];
            if finished[index] {
                continue;
            }

            let mut g = [t[0], t[1]];
            let ec = lookup(index, &e);
            let sign = Choice::from(ec & 1);

            // the sign of e_i picks which of the pair becomes the
            // kernel source; the swap is masked, not branched
            {
                let (g0, g1) = g.split_at_mut(1);
                ProjectivePoint::conditional_swap(&mut g0[0], &mut g1[0], sign);
            }
            {
                let (t0, t1) = t.split_at_mut(1);
                ProjectivePoint::conditional_swap(&mut t0[0], &mut t1[0], sign);
            }

            // isolate the order-l_i component of the kernel candidate
            for &index2 in batches[m][pos + 1..batch_sizes[m]].iter() {
                if !finished[index2] {
                    g[0] = g[0].mul_by_prime(&current, index2);
                }
            }

            if !bool::from(g[0].is_identity() | g[1].is_identity()) {
                // dummy direction flip for exhausted exponents: when the
                // magnitude hits zero, subsequent isogenies alternate
                // direction and cancel pairwise
                let bc = ((ec >> 1).ct_eq(&0)).unwrap_u8();

                let image_curve = compute_isogeny(&mut kernel, &g[0], &current, index);

                if index != last_isogeny[m] {
                    t[0] = evaluate_isogeny(&kernel, &t[0]);
                    t[1] = evaluate_isogeny(&kernel, &t[1]);
                    t[1] = t[1].mul_by_prime(&image_curve, index);
                }
                current = image_curve;

                e[index] = ((((ec >> 1).wrapping_sub(bc ^ 1)) ^ bc) << 1) ^ ((ec & 1) ^ bc);
                counters[index] -= 1;
                applied += 1;
            } else {
                // the sample carried no l_i-torsion; retry on a later pass
                t[1] = t[1].mul_by_prime(&current, index);
            }

            {
                let (t0, t1) = t.split_at_mut(1);
                ProjectivePoint::conditional_swap(&mut t0[0], &mut t1[0], sign);
            }

            if counters[index] == 0 {
                finished[index] = true;
                complements[m][complement_sizes[m]] = index;
                complement_sizes[m] += 1;
            }
        }
        pass_count += 1;
    }

    #[cfg(feature = "zeroize")]
    e.zeroize();

    Ok(current)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::constants::BASE_CURVE;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn sampled_exponents_respect_bounds() {
        let mut rng = StdRng::seed_from_u64(0x6578_706f);
        let mut saw_negative = [false; params::NUM_PRIMES];
        let mut saw_positive = [false; params::NUM_PRIMES];
        for _ in 0..200 {
            let key = sample_exponents(&mut rng);
            for (i, &byte) in key.iter().enumerate() {
                let magnitude = byte >> 1;
                assert!(magnitude <= params::B[i]);
                // exponents keep the parity of the bound
                assert_eq!(magnitude & 1, params::B[i] & 1);
                if magnitude > 0 {
                    if byte & 1 == 1 {
                        saw_positive[i] = true;
                    } else {
                        saw_negative[i] = true;
                    }
                }
            }
        }
        assert!(saw_negative.iter().all(|&b| b));
        assert!(saw_positive.iter().all(|&b| b));
    }

    #[test]
    fn rejects_the_zero_curve() {
        let mut rng = StdRng::seed_from_u64(0);
        let zero = EdwardsCurve::from_bytes(&[0u8; 64]);
        let key = sample_exponents(&mut rng);
        assert_eq!(
            evaluate_action(&key, &zero, &mut rng),
            Err(Error::InvalidCurve)
        );
    }

    #[test]
    fn zero_key_fixes_the_base_curve() {
        // all magnitudes zero, positive sign: the dummy steps must
        // cancel pairwise and land back on E_0
        let mut rng = StdRng::seed_from_u64(0x7a65_726f);
        let zero_key = [1u8; params::NUM_PRIMES];
        let result = evaluate_action(&zero_key, &BASE_CURVE, &mut rng).unwrap();
        assert_eq!(result, BASE_CURVE);
    }

    #[test]
    fn action_is_deterministic_given_the_rng_stream() {
        let mut key_rng = StdRng::seed_from_u64(0x6465_7465);
        let key = sample_exponents(&mut key_rng);

        let mut rng1 = StdRng::seed_from_u64(42);
        let mut rng2 = StdRng::seed_from_u64(42);
        let a = evaluate_action(&key, &BASE_CURVE, &mut rng1).unwrap();
        let b = evaluate_action(&key, &BASE_CURVE, &mut rng2).unwrap();
        assert_eq!(a.to_bytes(), b.to_bytes());
    }

    #[test]
    fn action_output_is_independent_of_the_rng_stream() {
        let mut key_rng = StdRng::seed_from_u64(0x696e_6465);
        let key = sample_exponents(&mut key_rng);

        let mut rng1 = StdRng::seed_from_u64(1);
        let mut rng2 = StdRng::seed_from_u64(2);
        let a = evaluate_action(&key, &BASE_CURVE, &mut rng1).unwrap();
        let b = evaluate_action(&key, &BASE_CURVE, &mut rng2).unwrap();
        // different projective representatives, same curve
        assert_eq!(a, b);
    }

    #[test]
    fn saturated_key_terminates() {
        // every exponent at its positive bound maximizes real isogenies;
        // the walk must still finish within the sampling budget
        let mut rng = StdRng::seed_from_u64(0x7361_7475);
        let mut key = [0u8; params::NUM_PRIMES];
        for (i, byte) in key.iter_mut().enumerate() {
            *byte = (params::B[i] << 1) | 1;
        }
        let result = evaluate_action(&key, &BASE_CURVE, &mut rng).unwrap();
        assert!(bool::from(result.is_valid()));
    }

    #[test]
    fn single_generator_moves_the_curve() {
        // a lone +2 exponent on one generator must change the curve class
        let mut rng = StdRng::seed_from_u64(0x6d6f_7665);
        let mut key = [1u8; params::NUM_PRIMES];
        key[0] = (2 << 1) | 1;
        let result = evaluate_action(&key, &BASE_CURVE, &mut rng).unwrap();
        assert_ne!(result, BASE_CURVE);
    }

    #[test]
    fn opposite_keys_compose_to_the_identity() {
        // [+B] followed by [-B] walks back to the base curve
        let mut rng = StdRng::seed_from_u64(0x6f70_706f);
        let mut forward = [0u8; params::NUM_PRIMES];
        let mut backward = [0u8; params::NUM_PRIMES];
        for i in 0..params::NUM_PRIMES {
            forward[i] = (params::B[i] << 1) | 1;
            backward[i] = params::B[i] << 1;
        }
        let there = evaluate_action(&forward, &BASE_CURVE, &mut rng).unwrap();
        let back = evaluate_action(&backward, &there, &mut rng).unwrap();
        assert_eq!(back, BASE_CURVE);
    }

    #[test]
    fn constant_time_lookup_matches_indexing() {
        let mut rng = StdRng::seed_from_u64(0x6c6f_6f6b);
        let key = sample_exponents(&mut rng);
        for i in 0..params::NUM_PRIMES {
            assert_eq!(lookup(i, &key), key[i]);
        }
    }
}

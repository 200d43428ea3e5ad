//! Scalar sampling and random oracle utilities shared by setup, signing and opening.

use crate::error::GroupSigError;
use ark_ec::AffineRepr;
use ark_ff::{
    field_hashers::{DefaultFieldHasher, HashToField},
    PrimeField,
};
use ark_std::rand::RngCore;
use digest::{Digest, DynDigest};
use dock_crypto_utils::{concat_slices, hashing_utils::affine_group_elem_from_try_and_incr};

/// Domain separation tag used when hashing fresh random bytes onto G1 during group setup.
/// Deployments interoperating with another implementation of the scheme must agree on this value;
/// use [`rand_non_identity_g1_with_dst`] to supply a different one.
pub const HASH_TO_G1_DST: &[u8] = b"domain-separation-tag";

/// Attempts at drawing usable randomness before reporting the RNG as broken. Each draw succeeds
/// except with negligible probability, so reaching this means the entropy source is returning
/// degenerate output.
const MAX_SAMPLING_ATTEMPTS: usize = 100;

/// Uniform scalar from `Z_p*`, i.e. uniform over the full scalar field with zero rejected and
/// redrawn.
pub fn rand_non_zero_scalar<R: RngCore, F: PrimeField>(rng: &mut R) -> Result<F, GroupSigError> {
    for _ in 0..MAX_SAMPLING_ATTEMPTS {
        let r = F::rand(rng);
        if !r.is_zero() {
            return Ok(r);
        }
    }
    Err(GroupSigError::RandomnessFailure)
}

/// Random non-identity element of the group, obtained by hashing 48 fresh random bytes onto the
/// curve under [`HASH_TO_G1_DST`]. Nobody, the caller included, learns its discrete log with
/// respect to any other generator.
pub fn rand_non_identity_g1<R: RngCore, G: AffineRepr, D: Digest>(
    rng: &mut R,
) -> Result<G, GroupSigError> {
    rand_non_identity_g1_with_dst::<R, G, D>(rng, HASH_TO_G1_DST)
}

/// Same as [`rand_non_identity_g1`] but with a caller-chosen domain separation tag.
pub fn rand_non_identity_g1_with_dst<R: RngCore, G: AffineRepr, D: Digest>(
    rng: &mut R,
    dst: &[u8],
) -> Result<G, GroupSigError> {
    for _ in 0..MAX_SAMPLING_ATTEMPTS {
        let mut seed = [0u8; 48];
        rng.fill_bytes(&mut seed);
        let elem = affine_group_elem_from_try_and_incr::<G, D>(&concat_slices![dst, b" : ", seed]);
        if !elem.is_zero() {
            return Ok(elem);
        }
    }
    Err(GroupSigError::RandomnessFailure)
}

/// Random oracle for the Fiat-Shamir challenge: digest the transcript bytes with `D` and reduce
/// the digest, read big-endian, modulo the scalar field order. With a 256-bit digest and a 255-bit
/// prime order the reduction biases toward small scalars by at most `2^-255`, which is acceptable
/// for a challenge.
pub fn compute_random_oracle_challenge<F: PrimeField, D: Digest>(challenge_bytes: &[u8]) -> F {
    F::from_be_bytes_mod_order(&D::digest(challenge_bytes))
}

/// Alternative challenge derivation through an RFC 9380 style hash-to-field. Produces a different
/// scalar than [`compute_random_oracle_challenge`] for the same transcript; signer and verifier
/// must agree on one derivation, and the digest-then-reduce one is what
/// [`SignatureG1`](crate::signature::SignatureG1) uses.
pub fn compute_random_oracle_challenge_using_hash_to_field<
    F: PrimeField,
    D: Default + DynDigest + Clone,
>(
    challenge_bytes: &[u8],
) -> F {
    let hasher = <DefaultFieldHasher<D> as HashToField<F>>::new(b"BBS04-CHALLENGE");
    hasher.hash_to_field(challenge_bytes, 1).pop().unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_bls12_381::{Fr, G1Affine};
    use ark_ff::Zero;
    use ark_std::rand::{rngs::StdRng, SeedableRng};
    use blake2::Blake2b512;
    use sha2::Sha256;

    #[test]
    fn non_zero_scalar_sampling() {
        let mut rng = StdRng::seed_from_u64(0u64);
        for _ in 0..100 {
            let s: Fr = rand_non_zero_scalar(&mut rng).unwrap();
            assert!(!s.is_zero());
        }
    }

    #[test]
    fn random_group_element_is_not_identity() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let a: G1Affine = rand_non_identity_g1::<_, _, Sha256>(&mut rng).unwrap();
        let b: G1Affine = rand_non_identity_g1::<_, _, Sha256>(&mut rng).unwrap();
        assert!(!a.is_zero());
        assert!(!b.is_zero());
        // Fresh randomness on every call
        assert_ne!(a, b);

        let c: G1Affine = rand_non_identity_g1::<_, _, Blake2b512>(&mut rng).unwrap();
        assert!(!c.is_zero());
    }

    #[test]
    fn challenge_is_deterministic_in_transcript() {
        let c1: Fr = compute_random_oracle_challenge::<_, Sha256>(b"some transcript");
        let c2: Fr = compute_random_oracle_challenge::<_, Sha256>(b"some transcript");
        let c3: Fr = compute_random_oracle_challenge::<_, Sha256>(b"some transcripu");
        assert_eq!(c1, c2);
        assert_ne!(c1, c3);
    }

    #[test]
    fn hash_to_field_derivation_differs() {
        let c1: Fr = compute_random_oracle_challenge::<_, Sha256>(b"some transcript");
        let c2: Fr =
            compute_random_oracle_challenge_using_hash_to_field::<_, Sha256>(b"some transcript");
        assert_ne!(c1, c2);
    }
}

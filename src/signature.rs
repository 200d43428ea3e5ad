//! Signing and verification.
//!
//! A signature is a linear encryption `(T1, T2, T3)` of the signer's credential element `A`
//! together with a Fiat-Shamir proof of knowledge of an SDH tuple consistent with it:
//! 1. Pick `alpha`, `beta` and set `T1 = u * alpha`, `T2 = v * beta`,
//!    `T3 = A + h * (alpha + beta)`, `delta_1 = x * alpha`, `delta_2 = x * beta`.
//! 2. Commit with fresh nonces: `R1 = u * r_alpha`, `R2 = v * r_beta`,
//!    `R3 = e(T3, g2) * r_x + e(h, w) * -(r_alpha + r_beta) + e(h, g2) * -(r_delta_1 + r_delta_2)`,
//!    `R4 = T1 * r_x - u * r_delta_1`, `R5 = T2 * r_x - v * r_delta_2`.
//! 3. Derive the challenge `c` by hashing the message with all commitments, then respond with
//!    `s = r + c * witness` for each of the five witnesses.
//!
//! The verifier recomputes `R1..R5` from the responses, the challenge from the identical
//! transcript, and accepts iff it equals the `c` carried in the signature.

use crate::{
    common::{compute_random_oracle_challenge, rand_non_zero_scalar},
    error::GroupSigError,
    setup::{GroupPublicKey, PreparedGroupPublicKey, UserCredential},
};
use ark_ec::{
    pairing::{Pairing, PairingOutput},
    AffineRepr, CurveGroup,
};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize, SerializationError};
use ark_std::{io::Write, ops::Neg, rand::RngCore, vec::Vec};
use digest::Digest;
use dock_crypto_utils::{msm::WindowTable, serde_utils::ArkObjectBytes};
use serde::{Deserialize, Serialize};
use serde_with::serde_as;

/// Group signature over a byte-string message: the commitments `(T1, T2, T3)`, the challenge `c`
/// and the five Schnorr responses.
#[serde_as]
#[derive(
    Clone, PartialEq, Eq, Debug, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct SignatureG1<E: Pairing> {
    /// `u * alpha`
    #[serde_as(as = "ArkObjectBytes")]
    pub T1: E::G1Affine,
    /// `v * beta`
    #[serde_as(as = "ArkObjectBytes")]
    pub T2: E::G1Affine,
    /// `A + h * (alpha + beta)`
    #[serde_as(as = "ArkObjectBytes")]
    pub T3: E::G1Affine,
    /// Fiat-Shamir challenge
    #[serde_as(as = "ArkObjectBytes")]
    pub c: E::ScalarField,
    #[serde_as(as = "ArkObjectBytes")]
    pub s_alpha: E::ScalarField,
    #[serde_as(as = "ArkObjectBytes")]
    pub s_beta: E::ScalarField,
    #[serde_as(as = "ArkObjectBytes")]
    pub s_x: E::ScalarField,
    #[serde_as(as = "ArkObjectBytes")]
    pub s_delta_1: E::ScalarField,
    #[serde_as(as = "ArkObjectBytes")]
    pub s_delta_2: E::ScalarField,
}

impl<E: Pairing> SignatureG1<E> {
    /// Sign `message` with a member credential. `D` is the digest for the Fiat-Shamir challenge;
    /// interoperating implementations must use the same one.
    pub fn new<R: RngCore, D: Digest>(
        rng: &mut R,
        message: &[u8],
        credential: &UserCredential<E>,
        gpk: &GroupPublicKey<E>,
    ) -> Result<Self, GroupSigError> {
        let alpha = rand_non_zero_scalar::<R, E::ScalarField>(rng)?;
        let beta = rand_non_zero_scalar::<R, E::ScalarField>(rng)?;
        let delta_1 = alpha * credential.x;
        let delta_2 = beta * credential.x;

        let r_alpha = rand_non_zero_scalar::<R, E::ScalarField>(rng)?;
        let r_beta = rand_non_zero_scalar::<R, E::ScalarField>(rng)?;
        let r_x = rand_non_zero_scalar::<R, E::ScalarField>(rng)?;
        let r_delta_1 = rand_non_zero_scalar::<R, E::ScalarField>(rng)?;
        let r_delta_2 = rand_non_zero_scalar::<R, E::ScalarField>(rng)?;

        let h_table = WindowTable::new(3, gpk.h.into_group());
        let T1 = (gpk.u * alpha).into_affine();
        let T2 = (gpk.v * beta).into_affine();
        let T3 = (credential.A + h_table.multiply(&(alpha + beta))).into_affine();

        let R1 = (gpk.u * r_alpha).into_affine();
        let R2 = (gpk.v * r_beta).into_affine();
        // R3 = e(T3, g2) * r_x + e(h, w) * -(r_alpha + r_beta) + e(h, g2) * -(r_delta_1 + r_delta_2)
        let g2_prepared = E::G2Prepared::from(gpk.g2);
        let R3 = E::multi_pairing(
            [
                E::G1Prepared::from(T3 * r_x),
                E::G1Prepared::from(h_table.multiply(&(r_alpha + r_beta).neg())),
                E::G1Prepared::from(h_table.multiply(&(r_delta_1 + r_delta_2).neg())),
            ],
            [
                g2_prepared.clone(),
                E::G2Prepared::from(gpk.w),
                g2_prepared,
            ],
        );
        let R4 = (T1 * r_x - gpk.u * r_delta_1).into_affine();
        let R5 = (T2 * r_x - gpk.v * r_delta_2).into_affine();

        let mut challenge_bytes = Vec::new();
        Self::compute_challenge_contribution(
            message,
            &T1,
            &T2,
            &T3,
            &R1,
            &R2,
            &R3,
            &R4,
            &R5,
            &mut challenge_bytes,
        )?;
        let c = compute_random_oracle_challenge::<E::ScalarField, D>(&challenge_bytes);

        Ok(Self {
            T1,
            T2,
            T3,
            c,
            s_alpha: r_alpha + c * alpha,
            s_beta: r_beta + c * beta,
            s_x: r_x + c * credential.x,
            s_delta_1: r_delta_1 + c * delta_1,
            s_delta_2: r_delta_2 + c * delta_2,
        })
    }

    pub fn verify<D: Digest>(
        &self,
        message: &[u8],
        gpk: &GroupPublicKey<E>,
    ) -> Result<(), GroupSigError> {
        self.verify_given_prepared::<D>(message, &PreparedGroupPublicKey::from(gpk.clone()))
    }

    /// Verify against a prepared public key, recomputing all proof commitments from the responses
    /// and checking that the recomputed challenge equals `self.c`.
    pub fn verify_given_prepared<D: Digest>(
        &self,
        message: &[u8],
        gpk: &PreparedGroupPublicKey<E>,
    ) -> Result<(), GroupSigError> {
        let minus_c = self.c.neg();
        let h_table = WindowTable::new(2, gpk.h.into_group());
        let R1 = (gpk.u * self.s_alpha + self.T1 * minus_c).into_affine();
        let R2 = (gpk.v * self.s_beta + self.T2 * minus_c).into_affine();
        // R3 = e(T3, g2) * s_x + e(h, w) * -(s_alpha + s_beta) + e(h, g2) * -(s_delta_1 + s_delta_2)
        //      + e(g1, g2) * -c + e(T3, w) * c
        // where the last two terms are (e(g1, g2) - e(T3, w)) * -c
        let R3 = E::multi_pairing(
            [
                E::G1Prepared::from(self.T3 * self.s_x),
                E::G1Prepared::from(h_table.multiply(&(self.s_alpha + self.s_beta).neg())),
                E::G1Prepared::from(h_table.multiply(&(self.s_delta_1 + self.s_delta_2).neg())),
                E::G1Prepared::from(gpk.g1 * minus_c),
                E::G1Prepared::from(self.T3 * self.c),
            ],
            [
                gpk.g2.clone(),
                gpk.w.clone(),
                gpk.g2.clone(),
                gpk.g2.clone(),
                gpk.w.clone(),
            ],
        );
        let R4 = (self.T1 * self.s_x + gpk.u * self.s_delta_1.neg()).into_affine();
        let R5 = (self.T2 * self.s_x + gpk.v * self.s_delta_2.neg()).into_affine();

        let mut challenge_bytes = Vec::new();
        Self::compute_challenge_contribution(
            message,
            &self.T1,
            &self.T2,
            &self.T3,
            &R1,
            &R2,
            &R3,
            &R4,
            &R5,
            &mut challenge_bytes,
        )?;
        let c = compute_random_oracle_challenge::<E::ScalarField, D>(&challenge_bytes);
        if c != self.c {
            return Err(GroupSigError::InvalidSignature);
        }
        Ok(())
    }

    /// The challenge transcript, identical on the signing and verifying side: the raw message
    /// bytes followed by the compressed encodings of the commitments, in this exact order.
    pub fn compute_challenge_contribution<W: Write>(
        message: &[u8],
        T1: &E::G1Affine,
        T2: &E::G1Affine,
        T3: &E::G1Affine,
        R1: &E::G1Affine,
        R2: &E::G1Affine,
        R3: &PairingOutput<E>,
        R4: &E::G1Affine,
        R5: &E::G1Affine,
        mut writer: W,
    ) -> Result<(), GroupSigError> {
        writer.write_all(message).map_err(SerializationError::from)?;
        T1.serialize_compressed(&mut writer)?;
        T2.serialize_compressed(&mut writer)?;
        T3.serialize_compressed(&mut writer)?;
        R1.serialize_compressed(&mut writer)?;
        R2.serialize_compressed(&mut writer)?;
        R3.serialize_compressed(&mut writer)?;
        R4.serialize_compressed(&mut writer)?;
        R5.serialize_compressed(&mut writer)?;
        Ok(())
    }
}

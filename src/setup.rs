//! Keys, credentials and group setup.
//!
//! The manager runs [`GroupSetup::generate_using_rng`] once for a fixed set of `n` members. It
//! outputs the [`GroupPublicKey`] `(g1, g2, h, u, v, w)` that verifiers use, the manager-only
//! [`OpeningKey`] `(epsilon_1, epsilon_2)` and one [`UserCredential`] `(A_i, x_i)` per member.
//! The issuing exponent `gamma` with `w = g2 * gamma` exists only inside setup and is erased
//! before it returns; anyone holding it could mint credentials for arbitrary identities.

use crate::{
    common::{rand_non_identity_g1, rand_non_zero_scalar},
    error::GroupSigError,
};
use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup};
use ark_ff::{batch_inversion, Field, PrimeField, Zero};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use ark_std::{cfg_into_iter, ops::Neg, rand::RngCore, vec::Vec};
use digest::Digest;
use dock_crypto_utils::serde_utils::ArkObjectBytes;
use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use zeroize::{Zeroize, ZeroizeOnDrop};

#[cfg(feature = "parallel")]
use rayon::iter::{IntoParallelIterator, ParallelIterator};

/// Public key of the group, sufficient to verify any member's signature.
///
/// `g1`, `g2` are the curve generators, `h` a random non-identity element of G1 with unknown
/// discrete log, `(u, v)` the linear encryption basis satisfying `u * epsilon_1 = v * epsilon_2 = h`
/// and `w = g2 * gamma` the issuer's public exponent.
#[serde_as]
#[derive(
    Clone, PartialEq, Eq, Debug, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
pub struct GroupPublicKey<E: Pairing> {
    #[serde_as(as = "ArkObjectBytes")]
    pub g1: E::G1Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub g2: E::G2Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub h: E::G1Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub u: E::G1Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub v: E::G1Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub w: E::G2Affine,
}

impl<E: Pairing> GroupPublicKey<E> {
    /// No element of the key may be the identity. A verifier receiving a key from elsewhere must
    /// check this before using it.
    pub fn is_valid(&self) -> bool {
        !(self.g1.is_zero()
            || self.g2.is_zero()
            || self.h.is_zero()
            || self.u.is_zero()
            || self.v.is_zero()
            || self.w.is_zero())
    }
}

/// [`GroupPublicKey`] with its G2 members converted to prepared form, for verifiers that check
/// many signatures under the same key.
#[derive(Clone, Debug)]
pub struct PreparedGroupPublicKey<E: Pairing> {
    pub g1: E::G1Affine,
    pub h: E::G1Affine,
    pub u: E::G1Affine,
    pub v: E::G1Affine,
    pub g2: E::G2Prepared,
    pub w: E::G2Prepared,
}

impl<E: Pairing> From<GroupPublicKey<E>> for PreparedGroupPublicKey<E> {
    fn from(pk: GroupPublicKey<E>) -> Self {
        Self {
            g1: pk.g1,
            h: pk.h,
            u: pk.u,
            v: pk.v,
            g2: E::G2Prepared::from(pk.g2),
            w: E::G2Prepared::from(pk.w),
        }
    }
}

/// The manager's opening key `(epsilon_1, epsilon_2)`. Knowing it, `T1 * epsilon_1 + T2 * epsilon_2`
/// unmasks the credential element inside any signature's linear encryption.
#[serde_as]
#[derive(
    Clone,
    PartialEq,
    Eq,
    Debug,
    CanonicalSerialize,
    CanonicalDeserialize,
    Zeroize,
    ZeroizeOnDrop,
    Serialize,
    Deserialize,
)]
pub struct OpeningKey<F: PrimeField> {
    #[serde_as(as = "ArkObjectBytes")]
    pub epsilon_1: F,
    #[serde_as(as = "ArkObjectBytes")]
    pub epsilon_2: F,
}

impl<F: PrimeField> OpeningKey<F> {
    pub fn is_valid(&self) -> bool {
        !(self.epsilon_1.is_zero() || self.epsilon_2.is_zero())
    }
}

/// A member's signing credential, the SDH tuple `(A = g1 * 1/(gamma + x), x)`.
#[serde_as]
#[derive(
    Clone,
    PartialEq,
    Eq,
    Debug,
    CanonicalSerialize,
    CanonicalDeserialize,
    Zeroize,
    ZeroizeOnDrop,
    Serialize,
    Deserialize,
)]
pub struct UserCredential<E: Pairing> {
    #[serde_as(as = "ArkObjectBytes")]
    pub A: E::G1Affine,
    #[serde_as(as = "ArkObjectBytes")]
    pub x: E::ScalarField,
}

impl<E: Pairing> UserCredential<E> {
    /// The credential is valid iff `e(A, w + g2 * x) == e(g1, g2)`, the SDH relation the issuer
    /// guarantees at setup.
    pub fn verify(&self, gpk: &GroupPublicKey<E>) -> Result<(), GroupSigError> {
        // e(A, w + g2*x) == e(g1, g2) <=> e(A, -(w + g2*x)) + e(g1, g2) == 0
        let gx = (gpk.g2 * self.x + gpk.w).neg();
        if !E::multi_pairing(
            [E::G1Prepared::from(self.A), E::G1Prepared::from(gpk.g1)],
            [E::G2Prepared::from(gx), E::G2Prepared::from(gpk.g2)],
        )
        .is_zero()
        {
            return Err(GroupSigError::InvalidCredential);
        }
        Ok(())
    }
}

/// Everything the group setup produces. The opening key and the credential table are secrets of
/// the manager (credentials get handed to their members over a secure channel) and are zeroized
/// on drop; the public key is published.
#[derive(
    Clone, PartialEq, Eq, Debug, CanonicalSerialize, CanonicalDeserialize, Serialize, Deserialize,
)]
#[serde(bound = "")]
pub struct GroupSetup<E: Pairing> {
    pub public_key: GroupPublicKey<E>,
    pub opening_key: OpeningKey<E::ScalarField>,
    pub credentials: Vec<UserCredential<E>>,
}

impl<E: Pairing> Zeroize for GroupSetup<E> {
    fn zeroize(&mut self) {
        self.opening_key.zeroize();
        self.credentials.zeroize();
    }
}

impl<E: Pairing> Drop for GroupSetup<E> {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl<E: Pairing> GroupSetup<E> {
    /// Sets up a group of `n` members. `n = 0` is legal and yields an empty credential table.
    /// `D` is the digest used when hashing onto G1 to sample `h`.
    pub fn generate_using_rng<R: RngCore, D: Digest>(
        rng: &mut R,
        n: usize,
    ) -> Result<Self, GroupSigError> {
        let g1 = E::G1Affine::generator();
        let g2 = E::G2Affine::generator();
        let h = rand_non_identity_g1::<R, E::G1Affine, D>(rng)?;

        // u * epsilon_1 = v * epsilon_2 = h
        let epsilon_1 = rand_non_zero_scalar::<R, E::ScalarField>(rng)?;
        let epsilon_2 = rand_non_zero_scalar::<R, E::ScalarField>(rng)?;
        let u = (h * epsilon_1.inverse().unwrap()).into_affine();
        let v = (h * epsilon_2.inverse().unwrap()).into_affine();

        let mut gamma = rand_non_zero_scalar::<R, E::ScalarField>(rng)?;
        let w = (g2 * gamma).into_affine();

        // x_i in Z_p* with gamma + x_i != 0 so that the denominator below is invertible
        let mut x = Vec::with_capacity(n);
        let mut denominators = Vec::with_capacity(n);
        while x.len() < n {
            let x_i = rand_non_zero_scalar::<R, E::ScalarField>(rng)?;
            let denominator = gamma + x_i;
            if denominator.is_zero() {
                continue;
            }
            x.push(x_i);
            denominators.push(denominator);
        }

        // A_i = g1 * 1/(gamma + x_i), with a single batched inversion
        batch_inversion(&mut denominators);
        let g1_group = g1.into_group();
        let A = E::G1::normalize_batch(
            &cfg_into_iter!(denominators)
                .map(|d| g1_group * d)
                .collect::<Vec<_>>(),
        );
        let credentials = x
            .into_iter()
            .zip(A)
            .map(|(x_i, A_i)| UserCredential { A: A_i, x: x_i })
            .collect();
        gamma.zeroize();

        Ok(Self {
            public_key: GroupPublicKey { g1, g2, h, u, v, w },
            opening_key: OpeningKey {
                epsilon_1,
                epsilon_2,
            },
            credentials,
        })
    }
}

//! Identifying the signer of a valid signature with the manager's opening key.

use crate::{
    error::GroupSigError,
    setup::{GroupPublicKey, OpeningKey, UserCredential},
    signature::SignatureG1,
};
use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup};
use ark_ff::PrimeField;
use digest::Digest;

impl<F: PrimeField> OpeningKey<F> {
    /// Decrypts the linear encryption `(T1, T2, T3)` back to the signer's credential element.
    /// `T1 * epsilon_1 + T2 * epsilon_2 = u * (alpha * epsilon_1) + v * (beta * epsilon_2)
    /// = h * (alpha + beta)`, which is exactly the mask on `A` in `T3`.
    pub fn recover_credential_element<E: Pairing<ScalarField = F>>(
        &self,
        sig: &SignatureG1<E>,
    ) -> E::G1Affine {
        (sig.T3.into_group() - (sig.T1 * self.epsilon_1 + sig.T2 * self.epsilon_2)).into_affine()
    }

    /// Verifies the signature and returns the index of its signer in `credentials`.
    ///
    /// Fails with [`GroupSigError::InvalidSignature`] when verification rejects and with
    /// [`GroupSigError::UnknownSigner`] when the recovered element matches no credential in the
    /// table, e.g. because the signature was produced in a different group.
    pub fn open<E: Pairing<ScalarField = F>, D: Digest>(
        &self,
        message: &[u8],
        sig: &SignatureG1<E>,
        gpk: &GroupPublicKey<E>,
        credentials: &[UserCredential<E>],
    ) -> Result<usize, GroupSigError> {
        sig.verify::<D>(message, gpk)?;
        let A = self.recover_credential_element(sig);
        credentials
            .iter()
            .position(|credential| credential.A == A)
            .ok_or(GroupSigError::UnknownSigner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::setup::GroupSetup;
    use ark_bls12_381::{Bls12_381, Fr};
    use ark_std::{
        rand::{rngs::StdRng, SeedableRng},
        UniformRand,
    };
    use sha2::Sha256;

    #[test]
    fn opening_identifies_the_signer() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let setup = GroupSetup::<Bls12_381>::generate_using_rng::<_, Sha256>(&mut rng, 5).unwrap();
        let gpk = &setup.public_key;

        let message = b"Anna Maria Gut";
        let sig =
            SignatureG1::new::<_, Sha256>(&mut rng, message, &setup.credentials[2], gpk).unwrap();
        let recovered = setup.opening_key.recover_credential_element(&sig);
        assert_eq!(recovered, setup.credentials[2].A);
        assert_eq!(
            setup
                .opening_key
                .open::<_, Sha256>(message, &sig, gpk, &setup.credentials)
                .unwrap(),
            2
        );
    }

    #[test]
    fn opening_a_single_member_group() {
        let mut rng = StdRng::seed_from_u64(1u64);
        let setup = GroupSetup::<Bls12_381>::generate_using_rng::<_, Sha256>(&mut rng, 1).unwrap();
        let gpk = &setup.public_key;

        let sig = SignatureG1::new::<_, Sha256>(&mut rng, b"", &setup.credentials[0], gpk).unwrap();
        assert_eq!(
            setup
                .opening_key
                .open::<_, Sha256>(b"", &sig, gpk, &setup.credentials)
                .unwrap(),
            0
        );
    }

    #[test]
    fn both_signatures_of_a_signer_open_to_it() {
        let mut rng = StdRng::seed_from_u64(2u64);
        let setup = GroupSetup::<Bls12_381>::generate_using_rng::<_, Sha256>(&mut rng, 10).unwrap();
        let gpk = &setup.public_key;

        let message = b"same message, same signer";
        let sig1 =
            SignatureG1::new::<_, Sha256>(&mut rng, message, &setup.credentials[4], gpk).unwrap();
        let sig2 =
            SignatureG1::new::<_, Sha256>(&mut rng, message, &setup.credentials[4], gpk).unwrap();
        assert_ne!(sig1.T1, sig2.T1);
        for sig in [&sig1, &sig2] {
            assert_eq!(
                setup
                    .opening_key
                    .open::<_, Sha256>(message, sig, gpk, &setup.credentials)
                    .unwrap(),
                4
            );
        }
    }

    #[test]
    fn opening_rejects_an_invalid_signature() {
        let mut rng = StdRng::seed_from_u64(3u64);
        let setup = GroupSetup::<Bls12_381>::generate_using_rng::<_, Sha256>(&mut rng, 3).unwrap();
        let gpk = &setup.public_key;

        let message = b"to be mangled";
        let mut sig =
            SignatureG1::new::<_, Sha256>(&mut rng, message, &setup.credentials[0], gpk).unwrap();
        sig.s_beta = Fr::rand(&mut rng);
        assert!(matches!(
            setup
                .opening_key
                .open::<_, Sha256>(message, &sig, gpk, &setup.credentials),
            Err(GroupSigError::InvalidSignature)
        ));
    }

    #[test]
    fn signer_outside_the_credential_table_is_unknown() {
        let mut rng = StdRng::seed_from_u64(4u64);
        // Two independently set up groups
        let setup1 = GroupSetup::<Bls12_381>::generate_using_rng::<_, Sha256>(&mut rng, 2).unwrap();
        let setup2 = GroupSetup::<Bls12_381>::generate_using_rng::<_, Sha256>(&mut rng, 2).unwrap();
        let gpk = &setup1.public_key;

        let message = b"cross-group";
        let sig =
            SignatureG1::new::<_, Sha256>(&mut rng, message, &setup1.credentials[1], gpk).unwrap();
        // The signature itself is fine under the first group's public key
        sig.verify::<Sha256>(message, gpk).unwrap();
        // but opening against the other group's credential table identifies nobody
        assert!(matches!(
            setup1
                .opening_key
                .open::<_, Sha256>(message, &sig, gpk, &setup2.credentials),
            Err(GroupSigError::UnknownSigner)
        ));
    }
}

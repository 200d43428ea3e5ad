#![cfg_attr(not(feature = "std"), no_std)]
#![allow(non_snake_case)]

//! # BBS04 group signatures
//!
//! Short group signatures over a Type-3 pairing as described in the paper [Short Group Signatures](https://eprint.iacr.org/2004/174).
//! A group manager runs the setup producing a group public key, a manager-only opening key and one
//! SDH credential `(A_i = g1 * 1/(gamma + x_i), x_i)` per member. Any member can then sign arbitrary
//! byte strings:
//! 1. The signer linearly encrypts its credential element `A` under the encryption basis `(u, v, h)`
//!    of the group public key, giving the commitments `(T1, T2, T3)`.
//! 2. A Fiat-Shamir proof of knowledge of the SDH tuple consistent with that encryption is attached,
//!    with the challenge derived from the hash of the message and all proof commitments.
//!
//! Verification recomputes the proof commitments from the responses and accepts iff the recomputed
//! challenge equals the one in the signature. Signatures are constant size and unlinkable; only the
//! holder of the opening key can decrypt `(T1, T2, T3)` back to `A` and thus identify the signer.
//! The implementation tries to use the same variable names as the paper and thus violates Rust's
//! naming conventions at places.
//!
//! # Examples
//!
//! ```
//! use ark_bls12_381::Bls12_381;
//! use ark_std::rand::{rngs::StdRng, SeedableRng};
//! use bbs04_group_sig::{setup::GroupSetup, signature::SignatureG1};
//! use sha2::Sha256;
//!
//! let mut rng = StdRng::seed_from_u64(0u64);
//! let setup = GroupSetup::<Bls12_381>::generate_using_rng::<_, Sha256>(&mut rng, 3).unwrap();
//!
//! // Any member signs; verifiers only need the group public key
//! let sig = SignatureG1::new::<_, Sha256>(&mut rng, b"hello", &setup.credentials[1], &setup.public_key).unwrap();
//! sig.verify::<Sha256>(b"hello", &setup.public_key).unwrap();
//!
//! // The manager can identify the signer
//! let signer = setup
//!     .opening_key
//!     .open::<_, Sha256>(b"hello", &sig, &setup.public_key, &setup.credentials)
//!     .unwrap();
//! assert_eq!(signer, 1);
//! ```

extern crate alloc;

pub mod common;
pub mod error;
pub mod open;
pub mod setup;
pub mod signature;

#[cfg(test)]
#[macro_use]
pub mod tests {
    #[macro_export]
    macro_rules! test_serialization {
        ($obj_type:ty, $obj: ident) => {
            // Test ark serialization
            let mut serz = vec![];
            ark_serialize::CanonicalSerialize::serialize_compressed(&$obj, &mut serz).unwrap();
            let deserz: $obj_type =
                ark_serialize::CanonicalDeserialize::deserialize_compressed(&serz[..]).unwrap();
            assert_eq!(deserz, $obj);

            // Test JSON serialization with serde
            let obj_ser = serde_json::to_string(&$obj).unwrap();
            let obj_deser = serde_json::from_str::<$obj_type>(&obj_ser).unwrap();
            assert_eq!($obj, obj_deser);

            // Test Message Pack serialization
            let ser = rmp_serde::to_vec_named(&$obj).unwrap();
            let deser = rmp_serde::from_slice::<$obj_type>(&ser).unwrap();
            assert_eq!($obj, deser);
        };
    }
}

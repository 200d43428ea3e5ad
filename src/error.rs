use ark_serialize::SerializationError;
use dock_crypto_utils::serde_utils::ArkSerializationError;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub enum GroupSigError {
    /// The RNG kept producing unusable draws; entropy source is assumed broken
    RandomnessFailure,
    /// Verification rejected the signature. A normal protocol outcome, not a library fault
    InvalidSignature,
    /// The credential does not satisfy the SDH relation under the given group public key
    InvalidCredential,
    /// Opening recovered an element that matches no credential in the table
    UnknownSigner,
    #[serde(with = "ArkSerializationError")]
    Serialization(SerializationError),
}

impl From<SerializationError> for GroupSigError {
    fn from(e: SerializationError) -> Self {
        Self::Serialization(e)
    }
}

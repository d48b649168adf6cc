use crate::poly_commit::errors::PolyComSchemeError;
use ark_std::{error, fmt, string::String};
use redshift_algebra::prelude::AlgebraError;

pub(crate) type Result<T> = core::result::Result<T, PlonkError>;

#[derive(Debug, Clone, Eq, PartialEq)]
#[allow(missing_docs)]
pub enum PlonkError {
    /// Algebra error
    Algebra(AlgebraError),
    /// The preprocessed data or the assignment does not match the circuit.
    SetupError(String),
    /// No radix-2 domain of this size exists in the field.
    GroupNotFound(usize),
    /// The witness does not satisfy the circuit.
    ProofErrorInvalidWitness,
    /// Polynomial commitment error, forwarded as produced by the scheme.
    Commitment(PolyComSchemeError),
    /// The transcript cannot absorb this kind of input.
    UnsupportedOperation,
    /// A challenge was requested out of the manifest order.
    ChallengeOrderError,
    /// Function params error.
    FuncParamsError,
}

impl fmt::Display for PlonkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use PlonkError::*;
        match self {
            Algebra(e) => write!(f, "Algebra: {}", e),
            SetupError(msg) => write!(f, "Setup error: {}", msg),
            GroupNotFound(n) => write!(f, "No evaluation domain of size {}.", n),
            ProofErrorInvalidWitness => f.write_str("Proof error invalid witness."),
            Commitment(e) => write!(f, "Commitment: {}", e),
            UnsupportedOperation => {
                f.write_str("The transcript does not support absorbing raw bytes.")
            }
            ChallengeOrderError => f.write_str("Challenge derived out of order."),
            FuncParamsError => f.write_str("Function params error"),
        }
    }
}

impl error::Error for PlonkError {}

impl From<AlgebraError> for PlonkError {
    fn from(e: AlgebraError) -> PlonkError {
        PlonkError::Algebra(e)
    }
}

impl From<PolyComSchemeError> for PlonkError {
    fn from(e: PolyComSchemeError) -> PlonkError {
        PlonkError::Commitment(e)
    }
}

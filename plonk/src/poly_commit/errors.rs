use ark_std::{error, fmt};

pub(crate) type Result<T> = core::result::Result<T, PolyComSchemeError>;

/// Polynomial commitment scheme errors.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PolyComSchemeError {
    /// It is not possible to compute the proof as F(x) != y.
    PCSProveEvalError,
    /// The degree of the polynomial is higher than the maximum degree allowed.
    DegreeError,
    /// The Merkle tree cannot be built or the leaf does not exist.
    MerkleTreeError,
    /// The evaluation proof does not verify.
    VerificationError,
    /// The evaluation domain is not supported by the field.
    DomainError,
}

impl fmt::Display for PolyComSchemeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            PolyComSchemeError::PCSProveEvalError => {
                "It is not possible to compute the proof as F(x) != y."
            }
            PolyComSchemeError::DegreeError => {
                "The degree of the polynomial is higher than the maximum degree allowed."
            }
            PolyComSchemeError::MerkleTreeError => "Merkle tree error.",
            PolyComSchemeError::VerificationError => "Evaluation proof verification failed.",
            PolyComSchemeError::DomainError => "Unsupported evaluation domain.",
        };

        write!(f, "{}", c)
    }
}

impl error::Error for PolyComSchemeError {}

use crate::poly_commit::{
    errors::Result,
    field_polynomial::{FpDomain, FpPolynomial},
};
use crate::transcript::TranscriptInput;
use ark_std::fmt::Debug;
use redshift_algebra::prelude::*;
use serde::{de::DeserializeOwned, Serialize};

/// What `commit` returns: the root to publish plus whatever the scheme
/// needs later to open the commitment.
pub trait CommitmentHandle<D> {
    /// The digest absorbed into the transcript.
    fn root(&self) -> D;
}

/// Trait for polynomial commitment scheme.
pub trait PolyComScheme: Sized + Sync {
    /// Type of prime field.
    type Field: Domain;

    /// Type of commitment digest.
    type Digest: Clone
        + Debug
        + PartialEq
        + Eq
        + Serialize
        + DeserializeOwned
        + Send
        + Sync
        + TranscriptInput<Self::Field>;

    /// Type of commitment handle.
    type Handle: CommitmentHandle<Self::Digest> + Send + Sync;

    /// Type of `EvalProof`.
    type EvalProof: Clone + Debug + PartialEq + Eq + Serialize + DeserializeOwned + Send + Sync;

    /// Upper bound on the evaluations of a committed polynomial, outside the
    /// opened points, that one opening proof discloses.
    fn revealed_evaluations(&self) -> usize;

    /// Commits to a polynomial of degree smaller than the size of `domain`.
    /// Deterministic for identical inputs.
    fn commit(
        &self,
        polynomial: &FpPolynomial<Self::Field>,
        domain: &FpDomain<Self::Field>,
    ) -> Result<Self::Handle>;

    /// Prove the evaluations of a committed polynomial at `points`.
    fn proof_eval(
        &self,
        points: &[Self::Field],
        handle: &Self::Handle,
        polynomial: &FpPolynomial<Self::Field>,
        domain: &FpDomain<Self::Field>,
    ) -> Result<Self::EvalProof>;

    /// Check an evaluation proof against a commitment root, returning the
    /// proven evaluations in the order of `points`.
    fn verify_eval(
        &self,
        root: &Self::Digest,
        points: &[Self::Field],
        proof: &Self::EvalProof,
        domain: &FpDomain<Self::Field>,
    ) -> Result<Vec<Self::Field>>;
}

//! The Redshift prover: witness commitments, a grand-product permutation
//! argument, gate constraints combined into one quotient, and openings at
//! a transcript-derived point.

/// Module for the challenge manifest.
pub mod challenges;

/// Module for constraint systems.
pub mod constraint_system;

/// Module for the helper functions of the prover.
pub(crate) mod helpers;

/// Module for the preprocessed circuit data.
pub mod preprocessor;

/// Module for the proof object.
pub mod proof;

/// Module for the prover.
pub mod prover;

//! The crate for the Redshift prover and its Fiat-Shamir transcripts.
#![allow(clippy::needless_borrow)]
#![allow(clippy::upper_case_acronyms)]

#[macro_use]
extern crate serde_derive;

/// Module for error handling.
pub mod errors;

/// Module for polynomial commitments.
pub mod poly_commit;

/// Module for the Redshift prover.
pub mod redshift;

/// Module for Fiat-Shamir transcripts.
pub mod transcript;

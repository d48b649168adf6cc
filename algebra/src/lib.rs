//! Field arithmetic used by the Redshift prover: the [`traits::Scalar`] and
//! [`traits::Domain`] abstractions and the BLS12-381 scalar field.
#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unused_import_braces, unused_qualifications, trivial_casts)]
#![deny(trivial_numeric_casts)]
#![deny(stable_features, unreachable_pub, non_shorthand_field_patterns)]
#![deny(unused_attributes, unused_imports, unused_mut, missing_docs)]
#![deny(renamed_and_removed_lints, stable_features, unused_allocation)]
#![deny(unused_comparisons, bare_trait_objects, unused_must_use)]
#![allow(clippy::upper_case_acronyms)]

/// Module for the BLS12-381 scalar field.
pub mod bls12_381;

/// Module for error handling.
pub mod errors;

/// Module for the prelude.
pub mod prelude;

/// Module for test rngs.
pub mod rand_helper;

/// Module for serialization.
pub mod serialization;

/// Module for traits.
pub mod traits;

/// Module for utils.
pub mod utils;

#[doc(hidden)]
pub use ark_std::{
    borrow, cmp, collections, fmt, hash, iter, marker, ops, rand, One, UniformRand, Zero,
};

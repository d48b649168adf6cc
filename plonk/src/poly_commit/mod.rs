/// Module for polynomial commitment errors.
pub mod errors;

/// Module for field polynomial.
pub mod field_polynomial;

/// Module for the Merkle-tree polynomial commitment scheme.
pub mod merkle_pcs;

/// Module for binary Merkle trees.
pub mod merkle_tree;

/// Module for polynomial commitment traits.
pub mod pcs;

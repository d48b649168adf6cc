use crate::poly_commit::pcs::PolyComScheme;

/// A Redshift proof. Every list keeps the order in which the prover
/// absorbed the commitments; openings follow the order of the commitments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedshiftProof<D, E> {
    /// the commitments of the wire polynomials.
    pub wire_commitments: Vec<D>,
    /// the commitment of the grand product over the identity labels.
    pub p_commitment: D,
    /// the commitment of the grand product over the permuted labels.
    pub q_commitment: D,
    /// the commitments of the quotient pieces.
    pub t_commitments: Vec<D>,
    /// the openings of the wire polynomials at upsilon.
    pub wire_openings: Vec<E>,
    /// the opening of P at upsilon and upsilon * omega.
    pub p_opening: E,
    /// the opening of Q at upsilon and upsilon * omega.
    pub q_opening: E,
    /// the openings of the quotient pieces at upsilon.
    pub t_openings: Vec<E>,
}

/// The proof type produced with the commitment scheme `PCS`.
pub type RedshiftPf<PCS> =
    RedshiftProof<<PCS as PolyComScheme>::Digest, <PCS as PolyComScheme>::EvalProof>;

use crate::errors::{PlonkError, Result};
use crate::poly_commit::{
    field_polynomial::FpPolynomial,
    pcs::{CommitmentHandle, PolyComScheme},
};
use crate::redshift::{
    challenges::{RedshiftChallenges, MAX_GATE_TYPES},
    constraint_system::{interpolate_rows, ConstraintSystem, VariableAssignment},
    helpers::{
        commit_polys, consolidated_poly, divide_by_vanishing, grand_products, hide_polynomial,
        open_polys, pi_poly, row_values, split_t, ConsolidationInput, OpeningRequest,
        MAX_OPENING_POINTS,
    },
    preprocessor::{lagrange_at_row, vanishing_poly, PreprocessedData},
    proof::{RedshiftPf, RedshiftProof},
};
use crate::transcript::{ChallengeId, FieldDigest, Transcript};
use ark_std::{end_timer, start_timer};
use redshift_algebra::prelude::*;

fn check_config<CS: ConstraintSystem>(
    cs: &CS,
    pre: &PreprocessedData<CS::Field>,
    assignment: &VariableAssignment<CS::Field>,
) -> Result<()> {
    let n = pre.n;
    let setup_error = |msg: String| Err(PlonkError::SetupError(msg));
    if n < 2 || !n.is_power_of_two() {
        return setup_error(format!("{} rows is not a power of two", n));
    }
    let domain = pre.domain()?;
    if pre.omega != FpPolynomial::<CS::Field>::domain_generator(&domain) {
        return setup_error("omega does not generate the row domain".to_string());
    }
    if pre.z_poly != vanishing_poly::<CS::Field>(n) {
        return setup_error("vanishing polynomial does not match the domain".to_string());
    }
    if cs.size() != n {
        return setup_error(format!("circuit has {} rows, preprocessed {}", cs.size(), n));
    }
    if cs.wires_amount() != pre.wires_amount || assignment.wires.len() != pre.wires_amount {
        return setup_error(format!(
            "{} wires assigned, {} expected",
            assignment.wires.len(),
            pre.wires_amount
        ));
    }
    if assignment.wires.iter().any(|col| col.len() > n) {
        return setup_error(format!("an assignment column exceeds {} rows", n));
    }
    if assignment.public_inputs.len() != pre.public_rows.len() {
        return setup_error(format!(
            "{} public inputs assigned, {} expected",
            assignment.public_inputs.len(),
            pre.public_rows.len()
        ));
    }
    let mut seen = vec![false; n + 1];
    for row in pre.public_rows.iter() {
        if *row < 2 || *row > n || seen[*row] {
            return setup_error(format!("public-input row {} is not available", row));
        }
        seen[*row] = true;
    }
    let n_perm = pre.num_perm_columns();
    if pre.s_id.len() != n_perm || pre.s_sigma.len() != n_perm {
        return setup_error(format!("permutation needs {} columns", n_perm));
    }
    if pre.gates.len() > MAX_GATE_TYPES || pre.selectors.len() != pre.gates.len() {
        return setup_error(format!("at most {} gate types are supported", MAX_GATE_TYPES));
    }
    if !pre
        .gates
        .iter()
        .all(|g| g.check_bounds(pre.wires_amount, pre.fixed.len()))
    {
        return setup_error("gate refers to a missing column".to_string());
    }
    let columns = [
        ("identity", &pre.s_id),
        ("permutation", &pre.s_sigma),
        ("selector", &pre.selectors),
        ("fixed", &pre.fixed),
    ];
    for (name, polys) in columns.iter() {
        if let Some(i) = polys.iter().position(|p| p.degree() >= n) {
            return setup_error(format!("{} polynomial {} exceeds the row domain", name, i));
        }
    }
    let l_first = lagrange_at_row::<CS::Field>(&domain, 1);
    let l_last = lagrange_at_row::<CS::Field>(&domain, n);
    if pre.l_first != l_first || pre.l_last != l_last {
        return setup_error("Lagrange polynomials do not match the domain".to_string());
    }
    Ok(())
}

/// Number of evaluations hidden by the blinding of the wire, `P` and `Q`
/// polynomials: what one opening of `pcs` discloses plus the opened points.
pub fn num_hide_points<PCS: PolyComScheme>(pcs: &PCS) -> usize {
    pcs.revealed_evaluations() + MAX_OPENING_POINTS
}

/// Redshift Prover: it produces a proof that `assignment` satisfies the
/// constraint system `cs`, whose preprocessed data is `pre`.
///
/// The wire polynomials and the grand products `P` and `Q` are blinded with
/// randomness drawn from `prng`, so two proofs of the same assignment differ.
/// The transcript must be fresh. Challenges are derived in the order of
/// [`REDSHIFT_MANIFEST`](crate::redshift::challenges::REDSHIFT_MANIFEST).
/// It returns [`PlonkError::ProofErrorInvalidWitness`] when the assignment
/// does not satisfy the circuit and forwards the errors of the commitment
/// scheme as [`PlonkError::Commitment`].
/// # Example
/// ```
/// use redshift_plonk::redshift::{
///     constraint_system::StandardCS, preprocessor::preprocess, prover::prover,
/// };
/// use redshift_plonk::poly_commit::{
///     merkle_pcs::{MerklePcsParams, MerklePolyComScheme},
///     merkle_tree::Sha256MerkleHasher,
/// };
/// use redshift_plonk::transcript::AccumulativeTranscript;
/// use redshift_algebra::{prelude::*, bls12_381::BLSScalar};
/// use rand_chacha::ChaChaRng;
///
/// let pcs = MerklePolyComScheme::new(MerklePcsParams::default(), Sha256MerkleHasher).unwrap();
/// let mut cs = StandardCS::new();
///
/// // circuit (x_0 + x_1);
/// let one = BLSScalar::one();
/// let two = one.add(&one);
/// let var_one = cs.new_variable(one);
/// let var_two = cs.new_variable(two);
/// let _ = cs.add(var_one, var_two);
/// cs.pad();
///
/// let pre = preprocess(&cs).unwrap();
/// let assignment = cs.get_and_clear_assignment().unwrap();
/// let mut prng = ChaChaRng::from_seed([0u8; 32]);
/// let mut transcript = AccumulativeTranscript::new(b"Test");
/// let proof = prover(&mut prng, &mut transcript, &pcs, &cs, &pre, &assignment).unwrap();
/// assert_eq!(proof.wire_commitments.len(), 3);
/// ```
pub fn prover<R, T, PCS, CS>(
    prng: &mut R,
    transcript: &mut T,
    pcs: &PCS,
    cs: &CS,
    pre: &PreprocessedData<PCS::Field>,
    assignment: &VariableAssignment<PCS::Field>,
) -> Result<RedshiftPf<PCS>>
where
    R: CryptoRng + RngCore,
    T: Transcript<PCS::Field>,
    PCS: PolyComScheme,
    CS: ConstraintSystem<Field = PCS::Field>,
{
    let prover_timer = start_timer!(|| "Redshift::Prover");

    let config_timer = start_timer!(|| "Round 0: configuration");
    check_config(cs, pre, assignment)?;
    let n = pre.n;
    let domain = pre.domain()?;
    let hide = num_hide_points(pcs);
    let commit_domain = pre.commit_domain(hide)?;
    let n_t = pre.num_t_pieces(hide);
    transcript.absorb(&FieldDigest(PCS::Field::from(n as u64)))?;
    for pi in assignment.public_inputs.iter() {
        transcript.absorb(&FieldDigest(*pi))?;
    }
    let mut challenges = RedshiftChallenges::new();
    end_timer!(config_timer);

    // 1. interpolate and blind the witness polynomials
    let w_timer = start_timer!(|| "Round 1: witness polynomials");
    let mut w_polys = cs.polynoms(assignment)?;
    let mut columns: Vec<Vec<PCS::Field>> =
        w_polys.iter().map(|p| row_values(p, &domain)).collect();
    for w in w_polys.iter_mut() {
        hide_polynomial(prng, w, hide, n);
    }
    end_timer!(w_timer);

    // 2. commit them, absorb in wire order
    let w_comm_timer = start_timer!(|| "Round 2: commit witness polynomials");
    let w_handles = commit_polys(pcs, &w_polys, &commit_domain)?;
    let wire_commitments: Vec<PCS::Digest> = w_handles.iter().map(|h| h.root()).collect();
    for cm in wire_commitments.iter() {
        transcript.absorb(cm)?;
    }
    end_timer!(w_comm_timer);

    // 3. beta, gamma
    let beta = challenges.derive(transcript, ChallengeId::Beta)?;
    let gamma = challenges.derive(transcript, ChallengeId::Gamma)?;

    // 4. grand products
    let perm_timer = start_timer!(|| "Round 4: grand products");
    let mut f_polys = w_polys;
    let pi = pi_poly(pre, &assignment.public_inputs, &domain)?;
    columns.push(row_values(&pi, &domain));
    f_polys.push(pi);
    let s_id_rows: Vec<Vec<PCS::Field>> =
        pre.s_id.iter().map(|p| row_values(p, &domain)).collect();
    let s_sigma_rows: Vec<Vec<PCS::Field>> =
        pre.s_sigma.iter().map(|p| row_values(p, &domain)).collect();
    let (p_rows, q_rows) = grand_products(&columns, &s_id_rows, &s_sigma_rows, &beta, &gamma, n);
    let mut p_poly = interpolate_rows(&domain, &p_rows);
    let mut q_poly = interpolate_rows(&domain, &q_rows);
    hide_polynomial(prng, &mut p_poly, hide, n);
    hide_polynomial(prng, &mut q_poly, hide, n);
    end_timer!(perm_timer);

    // 5. commit P and Q
    let pq_timer = start_timer!(|| "Round 5: commit P and Q");
    let p_handle = pcs.commit(&p_poly, &commit_domain)?;
    let q_handle = pcs.commit(&q_poly, &commit_domain)?;
    let p_commitment = p_handle.root();
    let q_commitment = q_handle.root();
    transcript.absorb(&p_commitment)?;
    transcript.absorb(&q_commitment)?;
    end_timer!(pq_timer);

    // 6-8. theta is reserved for a lookup argument and only keeps its slot
    let _theta = challenges.derive(transcript, ChallengeId::Theta)?;
    let alphas = challenges.derive_alphas(transcript)?;
    let tau = challenges.derive(transcript, ChallengeId::Tau)?;

    // 9. consolidated constraint polynomial
    let f_timer = start_timer!(|| "Round 9: consolidated polynomial");
    let input = ConsolidationInput {
        f_polys: &f_polys,
        p_poly: &p_poly,
        q_poly: &q_poly,
        n_t,
    };
    let consolidated = consolidated_poly(pre, &input, &beta, &gamma, &alphas, &tau)?;
    end_timer!(f_timer);

    // 10. exact division by Z
    let t_timer = start_timer!(|| "Round 10: quotient");
    let (t_poly, remainder) = divide_by_vanishing(&consolidated, n);
    if !remainder.is_zero() {
        return Err(PlonkError::ProofErrorInvalidWitness);
    }
    end_timer!(t_timer);

    // 11. split, commit and absorb the pieces
    let t_comm_timer = start_timer!(|| "Round 11: commit quotient pieces");
    let t_polys = split_t(&t_poly, n, n_t)?;
    let t_handles = commit_polys(pcs, &t_polys, &commit_domain)?;
    let t_commitments: Vec<PCS::Digest> = t_handles.iter().map(|h| h.root()).collect();
    for cm in t_commitments.iter() {
        transcript.absorb(cm)?;
    }
    end_timer!(t_comm_timer);

    // 12. evaluation point
    let upsilon = challenges.derive(transcript, ChallengeId::Upsilon)?;
    let single = [upsilon];
    let shifted = [upsilon, upsilon.mul(&pre.omega)];

    // 13. opening proofs
    let open_timer = start_timer!(|| "Round 13: opening proofs");
    let mut requests: Vec<OpeningRequest<'_, PCS>> =
        Vec::with_capacity(w_handles.len() + 2 + t_handles.len());
    for (poly, handle) in f_polys.iter().zip(w_handles.iter()) {
        requests.push((poly, handle, &single[..]));
    }
    requests.push((&p_poly, &p_handle, &shifted[..]));
    requests.push((&q_poly, &q_handle, &shifted[..]));
    for (poly, handle) in t_polys.iter().zip(t_handles.iter()) {
        requests.push((poly, handle, &single[..]));
    }
    let mut openings = open_polys(pcs, &requests, &commit_domain)?;
    let t_openings = openings.split_off(w_handles.len() + 2);
    let q_opening = openings.pop().ok_or(PlonkError::FuncParamsError)?;
    let p_opening = openings.pop().ok_or(PlonkError::FuncParamsError)?;
    end_timer!(open_timer);

    end_timer!(prover_timer);

    // 14. assemble
    Ok(RedshiftProof {
        wire_commitments,
        p_commitment,
        q_commitment,
        t_commitments,
        wire_openings: openings,
        p_opening,
        q_opening,
        t_openings,
    })
}

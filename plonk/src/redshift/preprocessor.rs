use crate::errors::{PlonkError, Result};
use crate::poly_commit::field_polynomial::{FpDomain, FpPolynomial};
use crate::redshift::{
    challenges::MAX_GATE_TYPES,
    constraint_system::{interpolate_rows, ConstraintSystem, Gate},
};
use ark_poly::EvaluationDomain;
use ark_std::{end_timer, start_timer};
use redshift_algebra::prelude::*;

/// The circuit data shared by every proof of one circuit. Immutable once
/// built, wrap it in an `Arc` to share it between threads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreprocessedData<F> {
    /// the number of rows, a power of two.
    pub n: usize,
    /// the generator of the row domain.
    pub omega: F,
    /// the number of wire columns.
    pub wires_amount: usize,
    /// `X^n - 1`.
    pub z_poly: FpPolynomial<F>,
    /// the identity labels, wire columns then the public-input column.
    pub s_id: Vec<FpPolynomial<F>>,
    /// the permuted labels, same layout as `s_id`.
    pub s_sigma: Vec<FpPolynomial<F>>,
    /// one selector per gate type.
    pub selectors: Vec<FpPolynomial<F>>,
    /// the fixed columns.
    pub fixed: Vec<FpPolynomial<F>>,
    /// the gate types.
    pub gates: Vec<Gate<F>>,
    /// the Lagrange polynomial of row 1.
    pub l_first: FpPolynomial<F>,
    /// the Lagrange polynomial of row n.
    pub l_last: FpPolynomial<F>,
    /// the rows of the public-input column carrying the public inputs.
    pub public_rows: Vec<usize>,
}

impl<F: Domain> PreprocessedData<F> {
    /// The row domain.
    pub fn domain(&self) -> Result<FpDomain<F>> {
        FpPolynomial::<F>::evaluation_domain(self.n).ok_or(PlonkError::GroupNotFound(self.n))
    }

    /// Number of columns in the permutation argument.
    pub fn num_perm_columns(&self) -> usize {
        self.wires_amount + 1
    }

    /// Degree of a wire, `P` or `Q` polynomial once `num_hide_points`
    /// evaluations are hidden.
    pub fn blinded_degree(&self, num_hide_points: usize) -> usize {
        self.n + num_hide_points
    }

    /// The domain blinded polynomials and quotient pieces are committed over.
    pub fn commit_domain(&self, num_hide_points: usize) -> Result<FpDomain<F>> {
        let size = (self.blinded_degree(num_hide_points) + 1).next_power_of_two();
        FpPolynomial::<F>::evaluation_domain(size).ok_or(PlonkError::GroupNotFound(size))
    }

    /// Bound on the degree of `F_consolidated` when the witness side is
    /// blinded with `num_hide_points`.
    pub fn consolidated_degree(&self, num_hide_points: usize) -> usize {
        let d_w = self.blinded_degree(num_hide_points);
        let fixed = self.n - 1;
        // (X - 1) * P(omega X) and (X - 1) * P(X) * prod_j (f_j + beta S_j + gamma)
        let perm = 1 + d_w * (self.num_perm_columns() + 1);
        // L_1 * (P - 1) and L_n * (P - Q)
        let boundary = fixed + d_w;
        let gates = self
            .gates
            .iter()
            .map(|g| fixed + g.degree_bound(d_w, fixed))
            .max()
            .unwrap_or(0);
        perm.max(boundary).max(gates)
    }

    /// Number of quotient pieces of `n` coefficients, never fewer than the
    /// permutation columns.
    pub fn num_t_pieces(&self, num_hide_points: usize) -> usize {
        let t_degree = self
            .consolidated_degree(num_hide_points)
            .saturating_sub(self.n);
        core::cmp::max(t_degree / self.n + 1, self.num_perm_columns())
    }
}

/// `X^n - 1`.
pub(crate) fn vanishing_poly<F: Scalar>(n: usize) -> FpPolynomial<F> {
    let mut z_coefs = vec![F::zero(); n + 1];
    z_coefs[0] = F::one().neg();
    z_coefs[n] = F::one();
    FpPolynomial::from_coefs(z_coefs)
}

/// The Lagrange polynomial that is one on `row` and zero on the other rows.
pub(crate) fn lagrange_at_row<F: Domain>(domain: &FpDomain<F>, row: usize) -> FpPolynomial<F> {
    let mut rows = vec![F::zero(); domain.size()];
    rows[row - 1] = F::one();
    interpolate_rows(domain, &rows)
}

fn check_columns<F>(name: &str, columns: &[Vec<F>], n: usize) -> Result<()> {
    match columns.iter().position(|c| c.len() != n) {
        Some(i) => Err(PlonkError::SetupError(format!(
            "{} column {} has {} rows, expected {}",
            name,
            i,
            columns[i].len(),
            n
        ))),
        None => Ok(()),
    }
}

/// Compute the preprocessed data of a padded constraint system.
pub fn preprocess<CS: ConstraintSystem>(cs: &CS) -> Result<PreprocessedData<CS::Field>> {
    let preprocess_timer = start_timer!(|| "Redshift::Preprocess");

    let n = cs.size();
    if n < 2 || !n.is_power_of_two() {
        return Err(PlonkError::SetupError(format!(
            "circuit size {} is not a power of two",
            n
        )));
    }
    let domain =
        FpPolynomial::<CS::Field>::evaluation_domain(n).ok_or(PlonkError::GroupNotFound(n))?;
    let omega = FpPolynomial::<CS::Field>::domain_generator(&domain);

    let wires_amount = cs.wires_amount();
    if cs.wiring().len() != wires_amount {
        return Err(PlonkError::SetupError(format!(
            "wiring has {} columns, expected {}",
            cs.wiring().len(),
            wires_amount
        )));
    }
    let gates = cs.gates();
    if gates.len() > MAX_GATE_TYPES {
        return Err(PlonkError::SetupError(format!(
            "{} gate types, at most {} are supported",
            gates.len(),
            MAX_GATE_TYPES
        )));
    }
    if cs.selectors().len() != gates.len() {
        return Err(PlonkError::SetupError(
            "one selector per gate type is required".to_string(),
        ));
    }
    if !gates
        .iter()
        .all(|g| g.check_bounds(wires_amount, cs.fixed_columns().len()))
    {
        return Err(PlonkError::SetupError(
            "gate refers to a missing column".to_string(),
        ));
    }
    check_columns("wire", cs.wiring(), n)?;
    check_columns("selector", cs.selectors(), n)?;
    check_columns("fixed", cs.fixed_columns(), n)?;

    let public_rows = cs.public_rows();
    if public_rows.len() != cs.public_vars_witness_indices().len()
        || public_rows.iter().any(|r| *r < 2 || *r > n)
    {
        return Err(PlonkError::SetupError(
            "public inputs do not fit the public-input column".to_string(),
        ));
    }

    let perm_timer = start_timer!(|| "Permutation polynomials");
    let n_perm = wires_amount + 1;
    let perm = cs.compute_permutation();
    if perm.len() != n_perm * n {
        return Err(PlonkError::SetupError(format!(
            "permutation has {} cells, expected {}",
            perm.len(),
            n_perm * n
        )));
    }
    if (0..n_perm).any(|j| perm[j * n] != j * n) {
        return Err(PlonkError::SetupError(
            "row 1 is reserved and cannot be wired".to_string(),
        ));
    }
    let label = |l: usize| CS::Field::from(l as u64);
    let mut s_id = Vec::with_capacity(n_perm);
    let mut s_sigma = Vec::with_capacity(n_perm);
    for j in 0..n_perm {
        let id_rows: Vec<CS::Field> = (j * n..(j + 1) * n).map(label).collect();
        let sigma_rows: Vec<CS::Field> = perm[j * n..(j + 1) * n]
            .iter()
            .map(|l| label(*l))
            .collect();
        s_id.push(interpolate_rows(&domain, &id_rows));
        s_sigma.push(interpolate_rows(&domain, &sigma_rows));
    }
    end_timer!(perm_timer);

    let selectors = cs
        .selectors()
        .iter()
        .map(|s| interpolate_rows(&domain, s))
        .collect();
    let fixed = cs
        .fixed_columns()
        .iter()
        .map(|c| interpolate_rows(&domain, c))
        .collect();

    let res = PreprocessedData {
        n,
        omega,
        wires_amount,
        z_poly: vanishing_poly(n),
        s_id,
        s_sigma,
        selectors,
        fixed,
        gates: gates.to_vec(),
        l_first: lagrange_at_row(&domain, 1),
        l_last: lagrange_at_row(&domain, n),
        public_rows,
    };
    end_timer!(preprocess_timer);
    Ok(res)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::redshift::constraint_system::StandardCS;
    use redshift_algebra::bls12_381::BLSScalar;

    fn sample_cs() -> StandardCS<BLSScalar> {
        let mut cs = StandardCS::new();
        let x = cs.new_variable(BLSScalar::from(5u32));
        let y = cs.new_variable(BLSScalar::from(6u32));
        let _ = cs.add(x, y);
        cs.pad();
        cs
    }

    #[test]
    fn test_preprocess() {
        let cs = sample_cs();
        let pre = preprocess(&cs).unwrap();
        let n = pre.n;
        assert_eq!(n, 2);
        assert_eq!(pre.s_id.len(), 4);
        // 1 + 2 * 5 from the permutation products, the quotient drops n
        assert_eq!(pre.consolidated_degree(0), 11);
        assert_eq!(pre.num_t_pieces(0), 5);
        assert_eq!(pre.consolidated_degree(6), 1 + 8 * 5);
        assert_eq!(pre.num_t_pieces(6), 20);
        assert_eq!(pre.commit_domain(6).unwrap().size(), 16);
        assert_eq!(pre.omega.pow(&[n as u64]), BLSScalar::one());

        // labels, row 2 of column 1 is at omega^2 = 1
        assert_eq!(pre.s_id[1].eval(&BLSScalar::one()), BLSScalar::from(3u32));
        assert_eq!(pre.s_id[0].eval(&pre.omega), BLSScalar::zero());

        assert_eq!(pre.l_first.eval(&pre.omega), BLSScalar::one());
        assert_eq!(pre.l_first.eval(&BLSScalar::one()), BLSScalar::zero());
        assert_eq!(pre.l_last.eval(&BLSScalar::one()), BLSScalar::one());
        assert!(pre.z_poly.eval(&pre.omega).is_zero());

        // row 1 holds no selector
        for s in pre.selectors.iter() {
            assert!(s.eval(&pre.omega).is_zero());
        }
    }

    #[test]
    fn test_reserved_row_rejected() {
        let mut cs = StandardCS::<BLSScalar>::new();
        let zero = cs.zero_var();
        cs.pad();
        assert!(preprocess(&cs).is_ok());
        cs.wiring[1][0] = zero;
        assert!(matches!(preprocess(&cs), Err(PlonkError::SetupError(_))));
    }

    #[test]
    fn test_unpadded_rejected() {
        let mut cs = StandardCS::<BLSScalar>::new();
        let x = cs.new_variable(BLSScalar::from(5u32));
        let _ = cs.add(x, x);
        let _ = cs.add(x, x);
        assert_eq!(cs.size(), 3);
        assert!(preprocess(&cs).is_err());
        cs.pad();
        assert!(preprocess(&cs).is_ok());
    }

    #[test]
    fn test_too_many_gates() {
        let mut cs = sample_cs();
        let gate = cs.gates[0].clone();
        let n = cs.size();
        for _ in 0..MAX_GATE_TYPES {
            cs.gates.push(gate.clone());
            cs.selectors.push(vec![BLSScalar::zero(); n]);
        }
        assert!(preprocess(&cs).is_err());
    }
}

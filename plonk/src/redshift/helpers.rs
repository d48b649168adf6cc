use crate::errors::{PlonkError, Result};
use crate::poly_commit::{
    field_polynomial::{FpDomain, FpPolynomial},
    pcs::PolyComScheme,
};
use crate::redshift::{
    challenges::PERMUTATION_SLOTS,
    constraint_system::interpolate_rows,
    preprocessor::PreprocessedData,
};
use ark_poly::EvaluationDomain;
use redshift_algebra::prelude::*;

/// The most points a single polynomial is opened at: `P` and `Q` are opened
/// at `upsilon` and `upsilon * omega`.
pub const MAX_OPENING_POINTS: usize = 2;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Commit a list of polynomials, in parallel when the feature is on.
pub(super) fn commit_polys<PCS: PolyComScheme>(
    pcs: &PCS,
    polys: &[FpPolynomial<PCS::Field>],
    domain: &FpDomain<PCS::Field>,
) -> Result<Vec<PCS::Handle>> {
    let commit = |poly: &FpPolynomial<PCS::Field>| -> Result<PCS::Handle> {
        Ok(pcs.commit(poly, domain)?)
    };
    #[cfg(feature = "parallel")]
    let handles = polys.par_iter().map(commit).collect();
    #[cfg(not(feature = "parallel"))]
    let handles = polys.iter().map(commit).collect();
    handles
}

/// A polynomial, its commitment and the points to open it at.
pub(super) type OpeningRequest<'a, PCS> = (
    &'a FpPolynomial<<PCS as PolyComScheme>::Field>,
    &'a <PCS as PolyComScheme>::Handle,
    &'a [<PCS as PolyComScheme>::Field],
);

/// Compute the opening proofs, in parallel when the feature is on. The
/// output order is the order of `requests`.
pub(super) fn open_polys<PCS: PolyComScheme>(
    pcs: &PCS,
    requests: &[OpeningRequest<'_, PCS>],
    domain: &FpDomain<PCS::Field>,
) -> Result<Vec<PCS::EvalProof>> {
    let open = |(poly, handle, points): &OpeningRequest<'_, PCS>| -> Result<PCS::EvalProof> {
        Ok(pcs.proof_eval(points, handle, poly, domain)?)
    };
    #[cfg(feature = "parallel")]
    let proofs = requests.par_iter().map(open).collect();
    #[cfg(not(feature = "parallel"))]
    let proofs = requests.iter().map(open).collect();
    proofs
}

/// Add a random multiple of `X^zeroing_degree - 1` to `polynomial`, so that
/// `num_hide_points` evaluations outside the zeroing domain reveal nothing
/// about it. Return the blinds.
pub(crate) fn hide_polynomial<R: CryptoRng + RngCore, F: Scalar>(
    prng: &mut R,
    polynomial: &mut FpPolynomial<F>,
    num_hide_points: usize,
    zeroing_degree: usize,
) -> Vec<F> {
    let mut blinds = Vec::with_capacity(num_hide_points + 1);
    for i in 0..num_hide_points + 1 {
        let mut blind = F::random(prng);
        blinds.push(blind);
        polynomial.add_coef_assign(&blind, i);
        blind = blind.neg();
        polynomial.add_coef_assign(&blind, zeroing_degree + i);
    }
    blinds
}

/// Evaluate a polynomial on the row domain and return the values of rows
/// `1..=n`.
pub(crate) fn row_values<F: Domain>(poly: &FpPolynomial<F>, domain: &FpDomain<F>) -> Vec<F> {
    let n = domain.size();
    let evals = poly.fft_with_domain(domain);
    (1..=n).map(|r| evals[r % n]).collect()
}

/// The values of the public-input column, row by row.
pub(crate) fn pi_rows<F: Scalar>(pre: &PreprocessedData<F>, public_inputs: &[F]) -> Result<Vec<F>> {
    if public_inputs.len() != pre.public_rows.len() {
        return Err(PlonkError::SetupError(format!(
            "{} public inputs given, {} expected",
            public_inputs.len(),
            pre.public_rows.len()
        )));
    }
    let mut rows = vec![F::zero(); pre.n];
    for (row, v) in pre.public_rows.iter().zip(public_inputs.iter()) {
        if *row == 0 || *row > pre.n {
            return Err(PlonkError::FuncParamsError);
        }
        rows[row - 1] = *v;
    }
    Ok(rows)
}

/// Return the public-input column polynomial.
pub(crate) fn pi_poly<F: Domain>(
    pre: &PreprocessedData<F>,
    public_inputs: &[F],
    domain: &FpDomain<F>,
) -> Result<FpPolynomial<F>> {
    Ok(interpolate_rows(domain, &pi_rows(pre, public_inputs)?))
}

/// Compute the row values of the grand products
/// `P(omega) = 1, P(omega^r) = P(omega^(r-1)) * prod_j (f_j + beta * S_id_j + gamma)(omega^r)`
/// and `Q` likewise with `S_sigma`.
pub(crate) fn grand_products<F: Scalar>(
    columns: &[Vec<F>],
    s_id_rows: &[Vec<F>],
    s_sigma_rows: &[Vec<F>],
    beta: &F,
    gamma: &F,
    n: usize,
) -> (Vec<F>, Vec<F>) {
    let factor = |labels: &[Vec<F>], i: usize| -> F {
        let mut r = F::one();
        for (col, label) in columns.iter().zip(labels.iter()) {
            r.mul_assign(&col[i].add(&beta.mul(&label[i])).add(gamma));
        }
        r
    };

    let mut p_rows = Vec::with_capacity(n);
    let mut q_rows = Vec::with_capacity(n);
    let mut p = F::one();
    let mut q = F::one();
    p_rows.push(p);
    q_rows.push(q);
    for i in 1..n {
        p.mul_assign(&factor(s_id_rows, i));
        q.mul_assign(&factor(s_sigma_rows, i));
        p_rows.push(p);
        q_rows.push(q);
    }
    (p_rows, q_rows)
}

/// The polynomials `F_consolidated` is built from.
pub(crate) struct ConsolidationInput<'a, F> {
    /// Wire polynomials followed by the public-input polynomial.
    pub(crate) f_polys: &'a [FpPolynomial<F>],
    pub(crate) p_poly: &'a FpPolynomial<F>,
    pub(crate) q_poly: &'a FpPolynomial<F>,
    /// Number of quotient pieces, which sizes the coset.
    pub(crate) n_t: usize,
}

/// Size of the coset the consolidated polynomial is computed on.
pub(crate) fn coset_size(n: usize, n_t: usize) -> usize {
    ((n_t + 1) * n + 1).next_power_of_two()
}

/// Compute `F_consolidated = sum_c alpha[c] * F[c]` on a coset of a domain of
/// size `coset_size(n, n_t)` and interpolate it back.
pub(crate) fn consolidated_poly<F: Domain>(
    pre: &PreprocessedData<F>,
    input: &ConsolidationInput<'_, F>,
    beta: &F,
    gamma: &F,
    alphas: &[F],
    tau: &F,
) -> Result<FpPolynomial<F>> {
    let n = pre.n;
    let n_perm = pre.num_perm_columns();
    if input.f_polys.len() != n_perm || pre.s_id.len() != n_perm || pre.s_sigma.len() != n_perm {
        return Err(PlonkError::FuncParamsError);
    }
    if alphas.len() < PERMUTATION_SLOTS + pre.gates.len() {
        return Err(PlonkError::FuncParamsError);
    }

    let m = coset_size(n, input.n_t);
    let domain_m =
        FpPolynomial::<F>::evaluation_domain(m).ok_or(PlonkError::GroupNotFound(m))?;
    let zeta = FpPolynomial::<F>::domain_generator(&domain_m);
    let k = F::multiplicative_generator();
    let k_inv = k.inv()?;
    let shift = m / n;

    let coset = |polys: &[FpPolynomial<F>]| -> Vec<Vec<F>> {
        polys
            .iter()
            .map(|p| p.coset_fft_with_domain(&domain_m, &k))
            .collect()
    };
    let f_evals = coset(input.f_polys);
    let s_id_evals = coset(&pre.s_id);
    let s_sigma_evals = coset(&pre.s_sigma);
    let selector_evals = coset(&pre.selectors);
    let fixed_evals = coset(&pre.fixed);
    let p_evals = input.p_poly.coset_fft_with_domain(&domain_m, &k);
    let q_evals = input.q_poly.coset_fft_with_domain(&domain_m, &k);
    let l1_evals = pre.l_first.coset_fft_with_domain(&domain_m, &k);
    let ln_evals = pre.l_last.coset_fft_with_domain(&domain_m, &k);

    let product = |labels: &[Vec<F>], t: usize| -> F {
        let mut r = F::one();
        for (f, label) in f_evals.iter().zip(labels.iter()) {
            r.mul_assign(&f[t].add(&beta.mul(&label[t])).add(gamma));
        }
        r
    };
    let p_prime: Vec<F> = (0..m).map(|t| product(&s_id_evals, t)).collect();
    let q_prime: Vec<F> = (0..m).map(|t| product(&s_sigma_evals, t)).collect();

    let mut x_evals = Vec::with_capacity(m);
    let mut x = k;
    for _ in 0..m {
        x_evals.push(x);
        x.mul_assign(&zeta);
    }

    let one = F::one();
    let wires_amount = pre.wires_amount;
    let eval_at = |t: usize| -> F {
        let next = (t + shift) % m;
        let x_minus_one = x_evals[t].sub(&one);

        let mut acc = alphas[0].mul(&l1_evals[t].mul(&p_evals[t].sub(&one)));
        acc.add_assign(&alphas[1].mul(&l1_evals[t].mul(&q_evals[t].sub(&one))));
        acc.add_assign(
            &alphas[2].mul(&x_minus_one.mul(&p_evals[next].sub(&p_evals[t].mul(&p_prime[next])))),
        );
        acc.add_assign(
            &alphas[3].mul(&x_minus_one.mul(&q_evals[next].sub(&q_evals[t].mul(&q_prime[next])))),
        );
        acc.add_assign(&alphas[4].mul(&ln_evals[t].mul(&p_evals[t].sub(&q_evals[t]))));

        let wires: Vec<F> = f_evals[..wires_amount].iter().map(|e| e[t]).collect();
        let fixed: Vec<F> = fixed_evals.iter().map(|e| e[t]).collect();
        for (i, (gate, sel)) in pre.gates.iter().zip(selector_evals.iter()).enumerate() {
            let g = sel[t].mul(&gate.eval_combined(&wires, &fixed, tau));
            acc.add_assign(&alphas[PERMUTATION_SLOTS + i].mul(&g));
        }
        acc
    };

    #[cfg(feature = "parallel")]
    let evals: Vec<F> = (0..m).into_par_iter().map(eval_at).collect();
    #[cfg(not(feature = "parallel"))]
    let evals: Vec<F> = (0..m).map(eval_at).collect();

    Ok(FpPolynomial::coset_ffti(&domain_m, &evals, &k_inv))
}

/// Divide by `X^n - 1`, returning the quotient and the remainder.
pub(crate) fn divide_by_vanishing<F: Scalar>(
    poly: &FpPolynomial<F>,
    n: usize,
) -> (FpPolynomial<F>, FpPolynomial<F>) {
    let mut rem = poly.get_coefs_ref().to_vec();
    if rem.len() <= n {
        return (FpPolynomial::zero(), poly.clone());
    }
    let mut quo = vec![F::zero(); rem.len() - n];
    // X^i = X^(i-n) * (X^n - 1) + X^(i-n)
    for i in (n..rem.len()).rev() {
        let c = rem[i];
        quo[i - n] = c;
        rem[i - n].add_assign(&c);
    }
    rem.truncate(n);
    (FpPolynomial::from_coefs(quo), FpPolynomial::from_coefs(rem))
}

/// Split `t` into `n_t` pieces of `n` coefficients, `t = sum_i X^(i*n) t_i`.
pub(crate) fn split_t<F: Scalar>(
    t: &FpPolynomial<F>,
    n: usize,
    n_t: usize,
) -> Result<Vec<FpPolynomial<F>>> {
    let coefs = t.get_coefs_ref();
    if coefs.len() > n * n_t {
        return Err(PlonkError::SetupError(format!(
            "quotient of degree {} does not fit {} pieces",
            t.degree(),
            n_t
        )));
    }
    let mut pieces: Vec<FpPolynomial<F>> = coefs
        .chunks(n)
        .map(|c| FpPolynomial::from_coefs(c.to_vec()))
        .collect();
    pieces.resize(n_t, FpPolynomial::zero());
    Ok(pieces)
}

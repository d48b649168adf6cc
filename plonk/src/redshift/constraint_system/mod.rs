use crate::errors::{PlonkError, Result};
use crate::poly_commit::field_polynomial::{FpDomain, FpPolynomial};
use ark_poly::EvaluationDomain;
use redshift_algebra::prelude::*;

pub mod standard;

pub use standard::StandardCS;

/// Variable index
pub type VarIndex = usize;

/// Marks a cell that carries no variable. Such a cell is a fixed point of
/// the copy-constraint permutation and holds zero.
pub const UNWIRED: VarIndex = usize::MAX;

/// A variable appearing in a gate constraint, evaluated at the current row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Variable {
    /// The value of a wire column.
    Wire(usize),
    /// The value of a preprocessed fixed column.
    Fixed(usize),
}

/// `coeff * prod(vars)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term<F> {
    /// The constant factor.
    pub coeff: F,
    /// The multiplied variables.
    pub vars: Vec<Variable>,
}

/// A sum of terms that must vanish on every row the gate is enabled.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraint<F> {
    /// The terms.
    pub terms: Vec<Term<F>>,
}

/// A gate type: a set of constraints sharing one selector.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gate<F> {
    /// The constraints of the gate.
    pub constraints: Vec<Constraint<F>>,
}

impl<F: Scalar> Term<F> {
    /// Build a term.
    pub fn new(coeff: F, vars: Vec<Variable>) -> Self {
        Self { coeff, vars }
    }

    /// Evaluate the term given the wire and fixed values of one row.
    pub fn eval(&self, wires: &[F], fixed: &[F]) -> F {
        let mut r = self.coeff;
        for var in self.vars.iter() {
            match var {
                Variable::Wire(i) => r.mul_assign(&wires[*i]),
                Variable::Fixed(i) => r.mul_assign(&fixed[*i]),
            }
        }
        r
    }

    /// Bound on the degree of the term once every variable is replaced by
    /// its polynomial.
    pub fn degree_bound(&self, wire_degree: usize, fixed_degree: usize) -> usize {
        self.vars
            .iter()
            .map(|v| match v {
                Variable::Wire(_) => wire_degree,
                Variable::Fixed(_) => fixed_degree,
            })
            .sum()
    }
}

impl<F: Scalar> Constraint<F> {
    /// Evaluate the constraint given the wire and fixed values of one row.
    pub fn eval(&self, wires: &[F], fixed: &[F]) -> F {
        self.terms.iter().map(|t| t.eval(wires, fixed)).sum()
    }

    /// The largest degree bound among the terms.
    pub fn degree_bound(&self, wire_degree: usize, fixed_degree: usize) -> usize {
        self.terms
            .iter()
            .map(|t| t.degree_bound(wire_degree, fixed_degree))
            .max()
            .unwrap_or(0)
    }
}

impl<F: Scalar> Gate<F> {
    /// The largest degree bound among the constraints.
    pub fn degree_bound(&self, wire_degree: usize, fixed_degree: usize) -> usize {
        self.constraints
            .iter()
            .map(|c| c.degree_bound(wire_degree, fixed_degree))
            .max()
            .unwrap_or(0)
    }

    /// Combine the constraints as `sum_j tau^j * C[j]`.
    pub fn eval_combined(&self, wires: &[F], fixed: &[F], tau: &F) -> F {
        let mut r = F::zero();
        let mut tau_power = F::one();
        for c in self.constraints.iter() {
            r.add_assign(&c.eval(wires, fixed).mul(&tau_power));
            tau_power.mul_assign(tau);
        }
        r
    }

    /// Check that every variable the gate mentions exists.
    pub fn check_bounds(&self, wires_amount: usize, fixed_amount: usize) -> bool {
        self.constraints.iter().all(|c| {
            c.terms.iter().all(|t| {
                t.vars.iter().all(|v| match v {
                    Variable::Wire(i) => *i < wires_amount,
                    Variable::Fixed(i) => *i < fixed_amount,
                })
            })
        })
    }
}

/// The values of every wire column, row by row, and the public inputs.
/// `wires[j][r - 1]` is the value of wire `j` on row `r`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableAssignment<F> {
    /// One column per wire.
    pub wires: Vec<Vec<F>>,
    /// The public inputs, in the order they were declared.
    pub public_inputs: Vec<F>,
}

/// Put the values of rows `1..=n` in FFT order: row `r` is the point
/// `omega^r`, which sits at index `r % n`. Missing rows are zero.
pub fn rows_to_evals<F: Scalar>(rows: &[F], n: usize) -> Vec<F> {
    let mut evals = vec![F::zero(); n];
    for (i, v) in rows.iter().enumerate().take(n) {
        evals[(i + 1) % n] = *v;
    }
    evals
}

/// Interpolate the polynomial taking `rows[r - 1]` at `omega^r`.
pub fn interpolate_rows<F: Domain>(domain: &FpDomain<F>, rows: &[F]) -> FpPolynomial<F> {
    FpPolynomial::ffti(domain, &rows_to_evals(rows, domain.size()))
}

/// Trait for Redshift constraint systems.
pub trait ConstraintSystem: Sized {
    /// The field the circuit is defined over.
    type Field: Domain;

    /// Return the number of rows, including the reserved first row.
    /// Must be a power of two before preprocessing.
    fn size(&self) -> usize;

    /// Return the number of wire columns.
    fn wires_amount(&self) -> usize;

    /// Return number of variables in the constraint system.
    fn num_vars(&self) -> usize;

    /// Return the wiring: `wiring()[j][r - 1]` is the variable on wire `j`, row `r`.
    fn wiring(&self) -> &[Vec<VarIndex>];

    /// Return the variables that are public inputs.
    fn public_vars_witness_indices(&self) -> &[VarIndex];

    /// The rows of the public-input column carrying the public inputs.
    fn public_rows(&self) -> Vec<usize> {
        (0..self.public_vars_witness_indices().len())
            .map(|k| k + 2)
            .collect()
    }

    /// Return the gate types.
    fn gates(&self) -> &[Gate<Self::Field>];

    /// Return one selector column per gate type.
    fn selectors(&self) -> &[Vec<Self::Field>];

    /// Return the preprocessed fixed columns.
    fn fixed_columns(&self) -> &[Vec<Self::Field>];

    /// Compute the permutation implied by the copy constraints, over the
    /// wire columns followed by the public-input column. Cell `(j, r)` has
    /// label `j * size + (r - 1)`. The cells of one variable form a cycle,
    /// unwired cells map to themselves.
    fn compute_permutation(&self) -> Vec<usize> {
        let n = self.size();
        let wires_amount = self.wires_amount();
        let mut cells = vec![UNWIRED; (wires_amount + 1) * n];
        for (j, wire) in self.wiring().iter().enumerate().take(wires_amount) {
            for (i, var) in wire.iter().enumerate().take(n) {
                cells[j * n + i] = *var;
            }
        }
        for (row, var) in self
            .public_rows()
            .iter()
            .zip(self.public_vars_witness_indices().iter())
        {
            if (1..=n).contains(row) {
                cells[wires_amount * n + row - 1] = *var;
            }
        }

        let mut perm: Vec<usize> = (0..cells.len()).collect();
        let mut first = vec![UNWIRED; self.num_vars()];
        let mut last = vec![UNWIRED; self.num_vars()];
        for (label, var) in cells.iter().enumerate() {
            if *var == UNWIRED || *var >= self.num_vars() {
                continue;
            }
            if first[*var] == UNWIRED {
                first[*var] = label;
            } else {
                perm[last[*var]] = label;
            }
            last[*var] = label;
        }
        // close each cycle
        for (f, l) in first.iter().zip(last.iter()) {
            if *f != UNWIRED {
                perm[*l] = *f;
            }
        }
        perm
    }

    /// Map the witness into the wire columns of the circuit.
    fn extend_witness(&self, witness: &[Self::Field]) -> Result<VariableAssignment<Self::Field>> {
        let lookup = |var: &VarIndex| -> Result<Self::Field> {
            if *var == UNWIRED {
                return Ok(Self::Field::zero());
            }
            witness
                .get(*var)
                .copied()
                .ok_or(PlonkError::FuncParamsError)
        };
        let wires = self
            .wiring()
            .iter()
            .map(|wire| wire.iter().map(lookup).collect::<Result<Vec<_>>>())
            .collect::<Result<Vec<_>>>()?;
        let public_inputs = self
            .public_vars_witness_indices()
            .iter()
            .map(lookup)
            .collect::<Result<Vec<_>>>()?;
        Ok(VariableAssignment {
            wires,
            public_inputs,
        })
    }

    /// Interpolate one polynomial per wire from the assignment.
    fn polynoms(
        &self,
        assignment: &VariableAssignment<Self::Field>,
    ) -> Result<Vec<FpPolynomial<Self::Field>>> {
        let n = self.size();
        if assignment.wires.len() != self.wires_amount() {
            return Err(PlonkError::SetupError(format!(
                "assignment has {} wires, circuit has {}",
                assignment.wires.len(),
                self.wires_amount()
            )));
        }
        if let Some(col) = assignment.wires.iter().find(|col| col.len() > n) {
            return Err(PlonkError::SetupError(format!(
                "column of length {} does not fit {} rows",
                col.len(),
                n
            )));
        }
        let domain = FpPolynomial::<Self::Field>::evaluation_domain(n)
            .ok_or(PlonkError::GroupNotFound(n))?;
        Ok(assignment
            .wires
            .iter()
            .map(|col| interpolate_rows(&domain, col))
            .collect())
    }
}

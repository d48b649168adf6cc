//! A three-wire constraint system with an arithmetic gate and a
//! two-bit decomposition gate. Row 1 is reserved and never wired.
use super::{
    Constraint, ConstraintSystem, Gate, Term, VarIndex, Variable, VariableAssignment, UNWIRED,
};
use crate::errors::{PlonkError, Result};
use redshift_algebra::prelude::*;

/// The wires number of a row.
pub const N_WIRES: usize = 3;

/// The fixed columns: `qL, qR, qO, qM, qC`.
pub const N_FIXED: usize = 5;

/// Index of the arithmetic gate.
pub const ARITHMETIC_GATE: usize = 0;

/// Index of the two-bit decomposition gate.
pub const TWO_BIT_GATE: usize = 1;

/// Standard Redshift constraint system.
#[derive(Serialize, Deserialize)]
pub struct StandardCS<F> {
    /// the gate types.
    pub gates: Vec<Gate<F>>,
    /// one selector column per gate type.
    pub selectors: Vec<Vec<F>>,
    /// the fixed columns.
    pub fixed: Vec<Vec<F>>,
    /// the wiring of the circuit.
    pub wiring: Vec<Vec<VarIndex>>,
    /// the number of variables.
    pub num_vars: usize,
    /// the number of rows.
    pub size: usize,
    /// the public witness variables indices.
    pub public_vars_witness_indices: Vec<VarIndex>,
    /// A private witness for the circuit, cleared after computing a proof.
    pub witness: Vec<F>,
    /// whether the zero and one variables are already constrained.
    pub constants_pinned: [bool; 2],
}

impl<F: Domain> ConstraintSystem for StandardCS<F> {
    type Field = F;

    fn size(&self) -> usize {
        self.size
    }

    fn wires_amount(&self) -> usize {
        N_WIRES
    }

    fn num_vars(&self) -> usize {
        self.num_vars
    }

    fn wiring(&self) -> &[Vec<VarIndex>] {
        &self.wiring
    }

    fn public_vars_witness_indices(&self) -> &[VarIndex] {
        &self.public_vars_witness_indices
    }

    fn gates(&self) -> &[Gate<F>] {
        &self.gates
    }

    fn selectors(&self) -> &[Vec<F>] {
        &self.selectors
    }

    fn fixed_columns(&self) -> &[Vec<F>] {
        &self.fixed
    }
}

impl<F: Domain> Default for StandardCS<F> {
    fn default() -> Self {
        Self::new()
    }
}

/// `qL a + qR b + qO c + qM ab + qC`
fn arithmetic_gate<F: Scalar>() -> Gate<F> {
    let one = F::one();
    Gate {
        constraints: vec![Constraint {
            terms: vec![
                Term::new(one, vec![Variable::Fixed(0), Variable::Wire(0)]),
                Term::new(one, vec![Variable::Fixed(1), Variable::Wire(1)]),
                Term::new(one, vec![Variable::Fixed(2), Variable::Wire(2)]),
                Term::new(
                    one,
                    vec![Variable::Fixed(3), Variable::Wire(0), Variable::Wire(1)],
                ),
                Term::new(one, vec![Variable::Fixed(4)]),
            ],
        }],
    }
}

/// `a` and `b` are bits and `c = a + 2b`.
fn two_bit_gate<F: Scalar>() -> Gate<F> {
    let one = F::one();
    let bit = |i: usize| Constraint {
        terms: vec![
            Term::new(one, vec![Variable::Wire(i), Variable::Wire(i)]),
            Term::new(one.neg(), vec![Variable::Wire(i)]),
        ],
    };
    Gate {
        constraints: vec![
            bit(0),
            bit(1),
            Constraint {
                terms: vec![
                    Term::new(one, vec![Variable::Wire(0)]),
                    Term::new(F::from(2u32), vec![Variable::Wire(1)]),
                    Term::new(one.neg(), vec![Variable::Wire(2)]),
                ],
            },
        ],
    }
}

impl<F: Domain> StandardCS<F> {
    /// Create a constraint system holding only the reserved row.
    /// With default witness [F::zero(), F::one()].
    pub fn new() -> StandardCS<F> {
        let mut cs = StandardCS {
            gates: vec![arithmetic_gate(), two_bit_gate()],
            selectors: vec![vec![], vec![]],
            fixed: vec![vec![]; N_FIXED],
            wiring: vec![vec![]; N_WIRES],
            num_vars: 2,
            size: 0,
            public_vars_witness_indices: vec![],
            witness: vec![F::zero(), F::one()],
            constants_pinned: [false; 2],
        };
        cs.push_empty_row();
        cs
    }

    /// 0-index is Zero. The first call adds the row constraining it.
    pub fn zero_var(&mut self) -> VarIndex {
        self.pin_constant(0, F::zero());
        0
    }

    /// 1-index is One. The first call adds the row constraining it.
    pub fn one_var(&mut self) -> VarIndex {
        self.pin_constant(1, F::one());
        1
    }

    fn pin_constant(&mut self, var: VarIndex, value: F) {
        if !self.constants_pinned[var] {
            self.constants_pinned[var] = true;
            self.insert_constant_gate(var, value);
        }
    }

    /// Add a variable (with actual value `value`) into the constraint system.
    pub fn new_variable(&mut self, value: F) -> VarIndex {
        self.num_vars += 1;
        self.witness.push(value);
        self.num_vars - 1
    }

    fn push_row(&mut self, selector: Option<usize>, fixed: [F; N_FIXED], wires: [VarIndex; N_WIRES]) {
        for (i, s) in self.selectors.iter_mut().enumerate() {
            s.push(if Some(i) == selector {
                F::one()
            } else {
                F::zero()
            });
        }
        for (col, v) in self.fixed.iter_mut().zip(fixed.iter()) {
            col.push(*v);
        }
        for (col, var) in self.wiring.iter_mut().zip(wires.iter()) {
            assert!(
                *var == UNWIRED || *var < self.num_vars,
                "variable index out of bound"
            );
            col.push(*var);
        }
        self.size += 1;
    }

    fn push_empty_row(&mut self) {
        self.push_row(None, [F::zero(); N_FIXED], [UNWIRED; N_WIRES]);
    }

    /// Add a linear combination gate: out = left * q1 + right * q2.
    pub fn insert_lc_gate(
        &mut self,
        left_var: VarIndex,
        right_var: VarIndex,
        out_var: VarIndex,
        q1: F,
        q2: F,
    ) {
        let zero = F::zero();
        self.push_row(
            Some(ARITHMETIC_GATE),
            [q1, q2, F::one().neg(), zero, zero],
            [left_var, right_var, out_var],
        );
    }

    /// Add an Add gate. (left, right, out).
    pub fn insert_add_gate(&mut self, left_var: VarIndex, right_var: VarIndex, out_var: VarIndex) {
        self.insert_lc_gate(left_var, right_var, out_var, F::one(), F::one());
    }

    /// Add a Sub gate. (left, right, out).
    pub fn insert_sub_gate(&mut self, left_var: VarIndex, right_var: VarIndex, out_var: VarIndex) {
        self.insert_lc_gate(left_var, right_var, out_var, F::one(), F::one().neg());
    }

    /// Add a Mul gate. (left, right, out).
    pub fn insert_mul_gate(&mut self, left_var: VarIndex, right_var: VarIndex, out_var: VarIndex) {
        let zero = F::zero();
        self.push_row(
            Some(ARITHMETIC_GATE),
            [zero, zero, F::one().neg(), F::one(), zero],
            [left_var, right_var, out_var],
        );
    }

    /// Add a constant constraint: var = constant.
    pub fn insert_constant_gate(&mut self, var: VarIndex, constant: F) {
        let zero = F::zero();
        self.push_row(
            Some(ARITHMETIC_GATE),
            [F::one(), zero, zero, zero, constant.neg()],
            [var, UNWIRED, UNWIRED],
        );
    }

    /// Add a decomposition constraint: `low`, `high` are bits and `out = low + 2 * high`.
    pub fn insert_two_bit_decomposition_gate(
        &mut self,
        low_var: VarIndex,
        high_var: VarIndex,
        out_var: VarIndex,
    ) {
        self.push_row(
            Some(TWO_BIT_GATE),
            [F::zero(); N_FIXED],
            [low_var, high_var, out_var],
        );
    }

    /// Create a variable holding `left + right`.
    pub fn add(&mut self, left_var: VarIndex, right_var: VarIndex) -> VarIndex {
        let value = self.witness[left_var].add(&self.witness[right_var]);
        let out = self.new_variable(value);
        self.insert_add_gate(left_var, right_var, out);
        out
    }

    /// Create a variable holding `left * right`.
    pub fn mul(&mut self, left_var: VarIndex, right_var: VarIndex) -> VarIndex {
        let value = self.witness[left_var].mul(&self.witness[right_var]);
        let out = self.new_variable(value);
        self.insert_mul_gate(left_var, right_var, out);
        out
    }

    /// Mark `var` as a public input. The variable is placed on a row of its
    /// own so that it always takes part in the permutation.
    pub fn prepare_pi_variable(&mut self, var: VarIndex) {
        self.public_vars_witness_indices.push(var);
        self.push_row(None, [F::zero(); N_FIXED], [var, UNWIRED, UNWIRED]);
    }

    /// Pad the number of rows to a power of two, at least two.
    pub fn pad(&mut self) {
        let n = core::cmp::max(self.size.next_power_of_two(), 2);
        while self.size < n {
            self.push_empty_row();
        }
    }

    /// Verify the given witness and publics.
    pub fn verify_witness(&self, witness: &[F], online_vars: &[F]) -> Result<()> {
        if witness.len() != self.num_vars {
            return Err(PlonkError::SetupError(format!(
                "witness len = {}, num_vars = {}",
                witness.len(),
                self.num_vars
            )));
        }
        if online_vars.len() != self.public_vars_witness_indices.len() {
            return Err(PlonkError::SetupError(
                "wrong number of online variables".to_string(),
            ));
        }
        for (var, online) in self
            .public_vars_witness_indices
            .iter()
            .zip(online_vars.iter())
        {
            if witness[*var] != *online {
                return Err(PlonkError::ProofErrorInvalidWitness);
            }
        }

        let value = |var: VarIndex| {
            if var == UNWIRED {
                F::zero()
            } else {
                witness[var]
            }
        };
        for row in 0..self.size {
            let wires: Vec<F> = self.wiring.iter().map(|w| value(w[row])).collect();
            let fixed: Vec<F> = self.fixed.iter().map(|c| c[row]).collect();
            for (gate, selector) in self.gates.iter().zip(self.selectors.iter()) {
                if selector[row].is_zero() {
                    continue;
                }
                if gate
                    .constraints
                    .iter()
                    .any(|c| !c.eval(&wires, &fixed).is_zero())
                {
                    return Err(PlonkError::ProofErrorInvalidWitness);
                }
            }
        }
        Ok(())
    }

    /// Extract and clear the entire witness of the circuit. The witness consists of
    /// secret inputs, public inputs, and the values of intermediate variables.
    pub fn get_and_clear_witness(&mut self) -> Vec<F> {
        let res = self.witness.clone();
        self.witness.clear();
        res
    }

    /// Extract the witness as wire columns and clear it.
    pub fn get_and_clear_assignment(&mut self) -> Result<VariableAssignment<F>> {
        let witness = self.get_and_clear_witness();
        self.extend_witness(&witness)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use redshift_algebra::bls12_381::BLSScalar;

    fn sample_cs() -> StandardCS<BLSScalar> {
        let mut cs = StandardCS::new();
        let x = cs.new_variable(BLSScalar::from(3u32));
        let y = cs.new_variable(BLSScalar::from(4u32));
        let sum = cs.add(x, y);
        let _ = cs.mul(sum, x);
        cs.prepare_pi_variable(sum);
        cs.pad();
        cs
    }

    #[test]
    fn test_layout() {
        let cs = sample_cs();
        // reserved row, add, mul, public input
        assert_eq!(cs.size(), 4);
        assert_eq!(cs.num_vars(), 6);
        assert!(cs.wiring.iter().all(|w| w[0] == UNWIRED));
        assert!(cs.selectors.iter().all(|s| s[0].is_zero()));
        assert_eq!(cs.public_rows(), vec![2]);

        let witness = cs.witness.clone();
        assert!(cs.verify_witness(&witness, &[BLSScalar::from(7u32)]).is_ok());
        assert!(cs.verify_witness(&witness, &[BLSScalar::from(8u32)]).is_err());
    }

    #[test]
    fn test_bad_witness() {
        let cs = sample_cs();
        let mut witness = cs.witness.clone();
        witness[5] = BLSScalar::from(22u32);
        assert_eq!(
            cs.verify_witness(&witness, &[BLSScalar::from(7u32)]),
            Err(PlonkError::ProofErrorInvalidWitness)
        );
    }

    #[test]
    fn test_constants_are_constrained() {
        let mut cs = StandardCS::<BLSScalar>::new();
        let one = cs.one_var();
        let zero = cs.zero_var();
        assert_eq!(cs.size(), 3);
        assert_eq!(cs.one_var(), one);
        assert_eq!(cs.zero_var(), zero);
        assert_eq!(cs.size(), 3);
        let x = cs.new_variable(BLSScalar::from(9u32));
        let _ = cs.mul(x, one);
        cs.pad();
        assert!(cs.verify_witness(&cs.witness, &[]).is_ok());

        let mut witness = cs.witness.clone();
        witness[one] = BLSScalar::from(2u32);
        witness[3] = BLSScalar::from(18u32);
        assert_eq!(
            cs.verify_witness(&witness, &[]),
            Err(PlonkError::ProofErrorInvalidWitness)
        );

        let mut witness = cs.witness.clone();
        witness[zero] = BLSScalar::one();
        assert!(cs.verify_witness(&witness, &[]).is_err());
    }

    #[test]
    fn test_two_bit_gate() {
        let mut cs = StandardCS::<BLSScalar>::new();
        let lo = cs.new_variable(BLSScalar::one());
        let hi = cs.new_variable(BLSScalar::one());
        let out = cs.new_variable(BLSScalar::from(3u32));
        cs.insert_two_bit_decomposition_gate(lo, hi, out);
        cs.pad();
        assert!(cs.verify_witness(&cs.witness, &[]).is_ok());

        let mut witness = cs.witness.clone();
        witness[hi] = BLSScalar::from(2u32);
        witness[out] = BLSScalar::from(5u32);
        assert!(cs.verify_witness(&witness, &[]).is_err());
    }

    #[test]
    fn test_permutation() {
        let cs = sample_cs();
        let n = cs.size();
        let perm = cs.compute_permutation();
        assert_eq!(perm.len(), (N_WIRES + 1) * n);

        // a permutation
        let mut seen = vec![false; perm.len()];
        for p in perm.iter() {
            assert!(!seen[*p]);
            seen[*p] = true;
        }

        // the reserved row is fixed
        for j in 0..=N_WIRES {
            assert_eq!(perm[j * n], j * n);
        }

        // `sum` is the output of row 2, the left input of row 3, the wire of
        // row 4 and the first public cell
        let out_cell = 2 * n + 1;
        let public_cell = N_WIRES * n + 1;
        assert_eq!(perm[2], 3);
        assert_eq!(perm[3], out_cell);
        assert_eq!(perm[out_cell], public_cell);
        assert_eq!(perm[public_cell], 2);

        // `x` appears on rows 2 and 3
        assert_eq!(perm[1], n + 2);
        assert_eq!(perm[n + 2], 1);
    }

    #[test]
    fn test_assignment() {
        let mut cs = sample_cs();
        let assignment = cs.get_and_clear_assignment().unwrap();
        assert!(cs.witness.is_empty());
        assert_eq!(assignment.wires.len(), N_WIRES);
        assert_eq!(assignment.public_inputs, vec![BLSScalar::from(7u32)]);
        assert_eq!(assignment.wires[2][1], BLSScalar::from(7u32));
        assert_eq!(assignment.wires[0][0], BLSScalar::zero());
        assert_eq!(cs.polynoms(&assignment).unwrap().len(), N_WIRES);
    }
}

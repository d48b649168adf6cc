// Poseidon over a width-3 state (rate 2, capacity 1) with the x^5 S-box.
//
// A permutation call runs FULL_ROUNDS / 2 full rounds, PARTIAL_ROUNDS
// partial rounds and FULL_ROUNDS / 2 full rounds again. Each round is
//   - add the round constants,
//   - apply the S-box to every element (full round) or to the first one
//     (partial round),
//   - multiply by the MDS matrix.
// The MDS matrix is the Cauchy matrix M[i][j] = 1 / (x_i + y_j) with
// x_i = i and y_j = WIDTH + j. Each round constant is `F::from_hash` of
// SHA-512 over a fixed domain tag and the constant index, that is a
// field element sampled from ChaCha20 seeded with the digest.
use crate::errors::Result;
use redshift_algebra::prelude::*;
use sha2::{Digest, Sha512};

/// The state width.
pub const WIDTH: usize = 3;

/// The number of full rounds.
pub const FULL_ROUNDS: usize = 8;

/// The number of partial rounds.
pub const PARTIAL_ROUNDS: usize = 57;

const ALPHA: u64 = 5;

const CONSTANTS_TAG: &[u8] = b"Redshift Poseidon round constants, t = 3";

/// A permutation over three field elements.
pub trait Permutation<F: Scalar>: Clone + Send + Sync {
    /// Permute the state in place.
    fn permute(&self, state: &mut [F; WIDTH]);

    /// `permute([0, a, b])[2]`
    fn pair_hash(&self, a: &F, b: &F) -> F {
        let mut state = [F::zero(), *a, *b];
        self.permute(&mut state);
        state[2]
    }
}

/// The Poseidon permutation instance.
#[derive(Clone, Debug, PartialEq, Eq)]
#[allow(non_snake_case)]
pub struct PoseidonPermutation<F> {
    /// one WIDTH-vector per round
    pub round_constants: Vec<[F; WIDTH]>,
    /// the Cauchy MDS matrix
    pub MDS: [[F; WIDTH]; WIDTH],
}

impl<F: Scalar> PoseidonPermutation<F> {
    /// Derive the instance constants.
    pub fn new() -> Result<Self> {
        let rounds = FULL_ROUNDS + PARTIAL_ROUNDS;
        let round_constants = (0..rounds)
            .map(|round| {
                let mut rc = [F::zero(); WIDTH];
                for (i, c) in rc.iter_mut().enumerate() {
                    let index = (round * WIDTH + i) as u64;
                    *c = F::from_hash(
                        Sha512::new()
                            .chain_update(CONSTANTS_TAG)
                            .chain_update(index.to_le_bytes()),
                    );
                }
                rc
            })
            .collect();

        let mut mds = [[F::zero(); WIDTH]; WIDTH];
        for (i, row) in mds.iter_mut().enumerate() {
            for (j, m_ij) in row.iter_mut().enumerate() {
                *m_ij = F::from((i + WIDTH + j) as u64).inv()?;
            }
        }

        Ok(Self {
            round_constants,
            MDS: mds,
        })
    }

    // helper function: compute r = M*r, result is stored in r.
    fn linear_op(&self, state: &mut [F; WIDTH]) {
        let mut aux = [F::zero(); WIDTH];
        for (m_i, aux_i) in self.MDS.iter().zip(aux.iter_mut()) {
            for (m_ij, v_j) in m_i.iter().zip(state.iter()) {
                aux_i.add_assign(&m_ij.mul(v_j));
            }
        }
        *state = aux;
    }

    fn add_constants(state: &mut [F; WIDTH], rc: &[F; WIDTH]) {
        for (s, c) in state.iter_mut().zip(rc.iter()) {
            s.add_assign(c);
        }
    }
}

impl<F: Scalar> Permutation<F> for PoseidonPermutation<F> {
    fn permute(&self, state: &mut [F; WIDTH]) {
        let half_full = FULL_ROUNDS / 2;
        for (round, rc) in self.round_constants.iter().enumerate() {
            Self::add_constants(state, rc);
            let is_full = round < half_full || round >= half_full + PARTIAL_ROUNDS;
            if is_full {
                for s in state.iter_mut() {
                    *s = s.pow(&[ALPHA]);
                }
            } else {
                state[0] = state[0].pow(&[ALPHA]);
            }
            self.linear_op(state);
        }
    }
}

#[cfg(test)]
mod test {
    use super::{Permutation, PoseidonPermutation, FULL_ROUNDS, PARTIAL_ROUNDS};
    use redshift_algebra::{bls12_381::BLSScalar, prelude::*};

    #[test]
    fn test_instance_is_fixed() {
        let p1 = PoseidonPermutation::<BLSScalar>::new().unwrap();
        let p2 = PoseidonPermutation::<BLSScalar>::new().unwrap();
        assert_eq!(p1, p2);
        assert_eq!(p1.round_constants.len(), FULL_ROUNDS + PARTIAL_ROUNDS);
        assert_ne!(p1.round_constants[0][0], p1.round_constants[0][1]);

        let three = BLSScalar::from(3u32);
        assert_eq!(p1.MDS[0][0] * three, BLSScalar::one());
    }

    #[test]
    fn test_permutation() {
        let perm = PoseidonPermutation::<BLSScalar>::new().unwrap();
        let mut prng = test_rng();
        let a = BLSScalar::random(&mut prng);
        let b = BLSScalar::random(&mut prng);

        assert_eq!(perm.pair_hash(&a, &b), perm.pair_hash(&a, &b));
        assert_ne!(perm.pair_hash(&a, &b), perm.pair_hash(&b, &a));

        let mut state = [BLSScalar::zero(); 3];
        perm.permute(&mut state);
        assert_ne!(state, [BLSScalar::zero(); 3]);
        assert_eq!(
            perm.pair_hash(&BLSScalar::zero(), &BLSScalar::zero()),
            state[2]
        );
    }
}

//! A Merkle-tree polynomial commitment over a low-degree extension.
//!
//! A commitment is the Merkle root of the evaluations of the polynomial on a
//! coset `k * <zeta>` of a domain `blowup_factor` times larger than the
//! committed domain, `k` the multiplicative generator. The coset is disjoint
//! from the committed domain, so spot checks never land on the rows of a
//! circuit. An opening
//! at points `z_1..z_k` commits to the quotient `q = (f - I) / prod(X - z_i)`,
//! where `I` interpolates the claimed values, and answers `num_queries`
//! spot checks of `f(x) - I(x) = q(x) * prod(x - z_i)` at positions
//! derived from the roots.
//!
//! There is no low-degree test on `q`, so soundness against a prover that
//! commits to arbitrary vectors is not claimed here.
use crate::poly_commit::{
    errors::{PolyComSchemeError, Result},
    field_polynomial::{FpDomain, FpPolynomial},
    merkle_tree::{mt_build, mt_prove, mt_verify, MerkleHasher, MerklePath, MerkleTree},
    pcs::{CommitmentHandle, PolyComScheme},
};
use crate::transcript::{SequentialTranscript, TranscriptInput};
use ark_poly::EvaluationDomain;
use redshift_algebra::prelude::*;
use sha2::Sha256;

/// Parameters of the Merkle commitment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerklePcsParams {
    /// Ratio between the evaluation domain and the committed domain.
    pub blowup_factor: usize,
    /// Number of spot checks per opening.
    pub num_queries: usize,
}

impl Default for MerklePcsParams {
    fn default() -> Self {
        Self {
            blowup_factor: 4,
            num_queries: 16,
        }
    }
}

/// The commitment scheme, generic over the field and the tree hasher.
#[derive(Clone, Debug)]
pub struct MerklePolyComScheme<F, H> {
    params: MerklePcsParams,
    hasher: H,
    _field: PhantomData<F>,
}

/// The tree and the evaluations it was built from.
#[derive(Clone, Debug)]
pub struct MerkleCommitment<F, D> {
    tree: MerkleTree<D>,
    evals: Vec<F>,
}

impl<F, D: Clone> CommitmentHandle<D> for MerkleCommitment<F, D> {
    fn root(&self) -> D {
        self.tree.root()
    }
}

/// One spot check.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleQuery<F, D> {
    /// The committed value at the queried position.
    pub value: F,
    /// Its path in the polynomial tree.
    pub path: MerklePath<D>,
    /// The quotient value at the same position.
    pub quotient_value: F,
    /// Its path in the quotient tree.
    pub quotient_path: MerklePath<D>,
}

/// Opening of a commitment at a set of points.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleEvalProof<F, D> {
    /// The claimed evaluations, in the order of the points.
    pub values: Vec<F>,
    /// The root of the quotient tree.
    pub quotient_root: D,
    /// The spot checks.
    pub queries: Vec<MerkleQuery<F, D>>,
}

impl<F: Domain, H: MerkleHasher<F>> MerklePolyComScheme<F, H> {
    /// Create the scheme. The blowup factor must be a power of two
    /// greater than one and at least one query is required.
    pub fn new(params: MerklePcsParams, hasher: H) -> Result<Self> {
        if params.blowup_factor < 2
            || !params.blowup_factor.is_power_of_two()
            || params.num_queries == 0
        {
            return Err(PolyComSchemeError::DomainError);
        }
        Ok(Self {
            params,
            hasher,
            _field: PhantomData,
        })
    }

    /// The parameters in use.
    pub fn params(&self) -> &MerklePcsParams {
        &self.params
    }

    fn lde_offset() -> F {
        F::multiplicative_generator()
    }

    fn lde_domain(&self, domain: &FpDomain<F>) -> Result<FpDomain<F>> {
        let size = domain
            .size()
            .checked_mul(self.params.blowup_factor)
            .ok_or(PolyComSchemeError::DomainError)?;
        FpPolynomial::<F>::evaluation_domain(size).ok_or(PolyComSchemeError::DomainError)
    }

    fn query_indices(
        &self,
        root: &H::Digest,
        points: &[F],
        values: &[F],
        quotient_root: &H::Digest,
        lde_size: usize,
    ) -> Vec<usize> {
        let mut transcript = SequentialTranscript::<Sha256>::with_seed(b"Merkle PCS");
        transcript.absorb_bytes(&root.to_transcript_bytes());
        for (point, value) in points.iter().zip(values.iter()) {
            transcript.absorb_bytes(&point.to_bytes());
            transcript.absorb_bytes(&value.to_bytes());
        }
        transcript.absorb_bytes(&quotient_root.to_transcript_bytes());
        (0..self.params.num_queries)
            .map(|_| (transcript.next_u64() % lde_size as u64) as usize)
            .collect()
    }
}

impl<F: Domain, H: MerkleHasher<F>> PolyComScheme for MerklePolyComScheme<F, H> {
    type Field = F;
    type Digest = H::Digest;
    type Handle = MerkleCommitment<F, H::Digest>;
    type EvalProof = MerkleEvalProof<F, H::Digest>;

    fn revealed_evaluations(&self) -> usize {
        self.params.num_queries
    }

    fn commit(&self, polynomial: &FpPolynomial<F>, domain: &FpDomain<F>) -> Result<Self::Handle> {
        if polynomial.degree() >= domain.size() {
            return Err(PolyComSchemeError::DegreeError);
        }
        let lde = self.lde_domain(domain)?;
        let evals = polynomial.coset_fft_with_domain(&lde, &Self::lde_offset());
        let tree = mt_build(&self.hasher, &evals)?;
        Ok(MerkleCommitment { tree, evals })
    }

    fn proof_eval(
        &self,
        points: &[F],
        handle: &Self::Handle,
        polynomial: &FpPolynomial<F>,
        domain: &FpDomain<F>,
    ) -> Result<Self::EvalProof> {
        if points.is_empty() {
            return Err(PolyComSchemeError::PCSProveEvalError);
        }
        let lde = self.lde_domain(domain)?;
        if handle.evals.len() != lde.size() {
            return Err(PolyComSchemeError::PCSProveEvalError);
        }

        let values: Vec<F> = points.iter().map(|p| polynomial.eval(p)).collect();
        let interpolant = FpPolynomial::lagrange_interpolation(points, &values)
            .map_err(|_| PolyComSchemeError::PCSProveEvalError)?;
        let (quotient, remainder) = polynomial
            .sub(&interpolant)
            .div_rem(&FpPolynomial::from_zeroes(points))
            .map_err(|_| PolyComSchemeError::PCSProveEvalError)?;
        if !remainder.is_zero() {
            return Err(PolyComSchemeError::PCSProveEvalError);
        }

        let quotient_evals = quotient.coset_fft_with_domain(&lde, &Self::lde_offset());
        let quotient_tree = mt_build(&self.hasher, &quotient_evals)?;
        let quotient_root = quotient_tree.root();

        let indices = self.query_indices(
            &handle.root(),
            points,
            &values,
            &quotient_root,
            lde.size(),
        );
        let queries = indices
            .into_iter()
            .map(|idx| {
                Ok(MerkleQuery {
                    value: handle.evals[idx],
                    path: mt_prove(&handle.tree, idx)?,
                    quotient_value: quotient_evals[idx],
                    quotient_path: mt_prove(&quotient_tree, idx)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(MerkleEvalProof {
            values,
            quotient_root,
            queries,
        })
    }

    fn verify_eval(
        &self,
        root: &H::Digest,
        points: &[F],
        proof: &Self::EvalProof,
        domain: &FpDomain<F>,
    ) -> Result<Vec<F>> {
        if points.is_empty()
            || proof.values.len() != points.len()
            || proof.queries.len() != self.params.num_queries
        {
            return Err(PolyComSchemeError::VerificationError);
        }
        let lde = self.lde_domain(domain)?;
        let generator = FpPolynomial::<F>::domain_generator(&lde);
        let offset = Self::lde_offset();
        let interpolant = FpPolynomial::lagrange_interpolation(points, &proof.values)
            .map_err(|_| PolyComSchemeError::VerificationError)?;
        let vanishing = FpPolynomial::from_zeroes(points);

        let indices = self.query_indices(
            root,
            points,
            &proof.values,
            &proof.quotient_root,
            lde.size(),
        );
        for (idx, query) in indices.into_iter().zip(proof.queries.iter()) {
            if query.path.index != idx || query.quotient_path.index != idx {
                return Err(PolyComSchemeError::VerificationError);
            }
            mt_verify(&self.hasher, root, &query.value, &query.path)
                .map_err(|_| PolyComSchemeError::VerificationError)?;
            mt_verify(
                &self.hasher,
                &proof.quotient_root,
                &query.quotient_value,
                &query.quotient_path,
            )
            .map_err(|_| PolyComSchemeError::VerificationError)?;

            let x = offset.mul(&generator.pow(&[idx as u64]));
            let lhs = query.value.sub(&interpolant.eval(&x));
            let rhs = query.quotient_value.mul(&vanishing.eval(&x));
            if lhs != rhs {
                return Err(PolyComSchemeError::VerificationError);
            }
        }
        Ok(proof.values.clone())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::poly_commit::merkle_tree::{AlgebraicMerkleHasher, Sha256MerkleHasher};
    use crate::transcript::PoseidonPermutation;
    use rand_chacha::ChaChaRng;
    use redshift_algebra::bls12_381::BLSScalar;

    fn setup<H: MerkleHasher<BLSScalar>>(
        hasher: H,
    ) -> (
        MerklePolyComScheme<BLSScalar, H>,
        FpDomain<BLSScalar>,
        FpPolynomial<BLSScalar>,
        ChaChaRng,
    ) {
        let mut prng = ChaChaRng::from_seed([1u8; 32]);
        let pcs = MerklePolyComScheme::new(MerklePcsParams::default(), hasher).unwrap();
        let domain = FpPolynomial::<BLSScalar>::evaluation_domain(16).unwrap();
        let poly = FpPolynomial::random(&mut prng, 15);
        (pcs, domain, poly, prng)
    }

    #[test]
    fn test_open_and_verify() {
        let (pcs, domain, poly, mut prng) = setup(Sha256MerkleHasher);
        let handle = pcs.commit(&poly, &domain).unwrap();
        let root = handle.root();

        let z = BLSScalar::random(&mut prng);
        let omega = FpPolynomial::<BLSScalar>::domain_generator(&domain);
        let points = [z, z.mul(&omega)];
        let proof = pcs.proof_eval(&points, &handle, &poly, &domain).unwrap();
        let values = pcs.verify_eval(&root, &points, &proof, &domain).unwrap();
        assert_eq!(values, vec![poly.eval(&points[0]), poly.eval(&points[1])]);
    }

    #[test]
    fn test_algebraic_hasher() {
        let perm = PoseidonPermutation::<BLSScalar>::new().unwrap();
        let (pcs, domain, poly, mut prng) = setup(AlgebraicMerkleHasher::new(perm));
        let handle = pcs.commit(&poly, &domain).unwrap();
        let points = [BLSScalar::random(&mut prng)];
        let proof = pcs.proof_eval(&points, &handle, &poly, &domain).unwrap();
        let values = pcs
            .verify_eval(&handle.root(), &points, &proof, &domain)
            .unwrap();
        assert_eq!(values[0], poly.eval(&points[0]));
    }

    #[test]
    fn test_tampered_value_rejected() {
        let (pcs, domain, poly, mut prng) = setup(Sha256MerkleHasher);
        let handle = pcs.commit(&poly, &domain).unwrap();
        let points = [BLSScalar::random(&mut prng)];
        let mut proof = pcs.proof_eval(&points, &handle, &poly, &domain).unwrap();
        proof.values[0] = proof.values[0].add(&BLSScalar::one());
        assert!(pcs
            .verify_eval(&handle.root(), &points, &proof, &domain)
            .is_err());
    }

    #[test]
    fn test_wrong_root_rejected() {
        let (pcs, domain, poly, mut prng) = setup(Sha256MerkleHasher);
        let handle = pcs.commit(&poly, &domain).unwrap();
        let other = pcs
            .commit(&FpPolynomial::random(&mut prng, 10), &domain)
            .unwrap();
        let points = [BLSScalar::random(&mut prng)];
        let proof = pcs.proof_eval(&points, &handle, &poly, &domain).unwrap();
        assert!(pcs
            .verify_eval(&other.root(), &points, &proof, &domain)
            .is_err());
    }

    #[test]
    fn test_commit_is_deterministic() {
        let (pcs, domain, poly, _) = setup(Sha256MerkleHasher);
        let a = pcs.commit(&poly, &domain).unwrap();
        let b = pcs.commit(&poly, &domain).unwrap();
        assert_eq!(a.root(), b.root());
    }

    #[test]
    fn test_degree_too_large() {
        let (pcs, domain, _, mut prng) = setup(Sha256MerkleHasher);
        let poly = FpPolynomial::<BLSScalar>::random(&mut prng, 16);
        assert_eq!(
            pcs.commit(&poly, &domain).unwrap_err(),
            PolyComSchemeError::DegreeError
        );
    }

    #[test]
    fn test_queries_miss_the_domain() {
        let (pcs, domain, poly, mut prng) = setup(Sha256MerkleHasher);
        let handle = pcs.commit(&poly, &domain).unwrap();
        let points = [BLSScalar::random(&mut prng)];
        let proof = pcs.proof_eval(&points, &handle, &poly, &domain).unwrap();
        assert_eq!(proof.queries.len(), pcs.revealed_evaluations());

        let lde = pcs.lde_domain(&domain).unwrap();
        let generator = FpPolynomial::<BLSScalar>::domain_generator(&lde);
        let offset = MerklePolyComScheme::<BLSScalar, Sha256MerkleHasher>::lde_offset();
        for query in proof.queries.iter() {
            let x = offset.mul(&generator.pow(&[query.path.index as u64]));
            assert_ne!(x.pow(&[domain.size() as u64]), BLSScalar::one());
            assert_eq!(query.value, poly.eval(&x));
        }
    }

    #[test]
    fn test_bad_params() {
        let params = MerklePcsParams {
            blowup_factor: 3,
            num_queries: 4,
        };
        assert!(MerklePolyComScheme::<BLSScalar, _>::new(params, Sha256MerkleHasher).is_err());
    }
}

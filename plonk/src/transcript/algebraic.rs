use crate::errors::{PlonkError, Result};
use crate::transcript::{ChallengeId, Permutation, Transcript, TranscriptInput};
use redshift_algebra::prelude::*;

/// Sequential transcript over a field permutation. It only accepts
/// field digests.
#[derive(Clone, Debug)]
pub struct AlgebraicTranscript<F, P> {
    state: F,
    permutation: P,
}

impl<F: Scalar, P: Permutation<F>> AlgebraicTranscript<F, P> {
    /// Start from the hash of the zero digest.
    pub fn new(permutation: P) -> Self {
        let state = permutation.pair_hash(&F::zero(), &F::zero());
        Self { state, permutation }
    }

    /// Start from the hash of `seed`.
    pub fn with_seed(permutation: P, seed: &F) -> Self {
        let state = permutation.pair_hash(seed, &F::zero());
        Self { state, permutation }
    }

    /// The current state.
    pub fn state(&self) -> F {
        self.state
    }

    /// Absorb one field element, mixing it with the previous state.
    pub fn absorb_field(&mut self, value: &F) {
        let tmp = self.permutation.pair_hash(&self.state, &self.state);
        self.state = self.permutation.pair_hash(value, &tmp);
    }

    fn squeeze(&mut self) -> F {
        self.state = self.permutation.pair_hash(&self.state, &self.state);
        self.state
    }
}

impl<F: Scalar, P: Permutation<F>> Transcript<F> for AlgebraicTranscript<F, P> {
    fn absorb<T: TranscriptInput<F> + ?Sized>(&mut self, data: &T) -> Result<()> {
        let value = data
            .as_field_digest()
            .ok_or(PlonkError::UnsupportedOperation)?;
        self.absorb_field(&value);
        Ok(())
    }

    fn challenge(&mut self, _id: ChallengeId) -> F {
        self.squeeze()
    }

    fn int_challenge(&mut self) -> u64 {
        self.squeeze().get_little_endian_u64()[0]
    }
}

#[cfg(test)]
mod test {
    use crate::errors::PlonkError;
    use crate::transcript::{
        AlgebraicTranscript, ChallengeId, FieldDigest, Permutation, PoseidonPermutation,
        Transcript,
    };
    use redshift_algebra::{bls12_381::BLSScalar, prelude::*};

    /// `[s0, s1, s2] -> [s1, s2, s0 + 2 s1 + 3 s2 + 1]`, so that
    /// `pair_hash(a, b) = 2a + 3b + 1`.
    #[derive(Clone)]
    struct LinearPermutation;

    impl Permutation<BLSScalar> for LinearPermutation {
        fn permute(&self, state: &mut [BLSScalar; 3]) {
            let two = BLSScalar::from(2u32);
            let three = BLSScalar::from(3u32);
            let mixed = state[0] + two * state[1] + three * state[2] + BLSScalar::one();
            *state = [state[1], state[2], mixed];
        }
    }

    #[test]
    fn test_known_answer() {
        let mut transcript = AlgebraicTranscript::new(LinearPermutation);
        assert_eq!(transcript.state(), BLSScalar::from(1u32));
        for x in [1u32, 2, 3] {
            transcript.absorb(&FieldDigest(BLSScalar::from(x))).unwrap();
        }
        assert_eq!(transcript.state(), BLSScalar::from(4855u32));

        let first = transcript.challenge(ChallengeId::Beta);
        assert_eq!(first, BLSScalar::from(24276u32));
        let second = transcript.challenge(ChallengeId::Gamma);
        assert_eq!(second, BLSScalar::from(121381u32));
    }

    #[test]
    fn test_rejects_bytes() {
        let mut transcript = AlgebraicTranscript::new(LinearPermutation);
        let before = transcript.state();
        let raw: &[u8] = b"not a field element";
        assert_eq!(
            transcript.absorb(raw),
            Err(PlonkError::UnsupportedOperation)
        );
        assert_eq!(transcript.state(), before);
    }

    #[test]
    fn test_poseidon_challenges() {
        let perm = PoseidonPermutation::<BLSScalar>::new().unwrap();
        let mut t1 = AlgebraicTranscript::new(perm.clone());
        let mut t2 = AlgebraicTranscript::new(perm.clone());
        let mut t3 = AlgebraicTranscript::with_seed(perm, &BLSScalar::from(9u32));
        for t in [&mut t1, &mut t2, &mut t3] {
            t.absorb(&FieldDigest(BLSScalar::from(5u32))).unwrap();
        }

        let a: [BLSScalar; 4] = t1.challenges(ChallengeId::Alpha(0));
        let b: [BLSScalar; 4] = t2.challenges(ChallengeId::Alpha(0));
        assert_eq!(a, b);
        for i in 0..4 {
            for j in i + 1..4 {
                assert_ne!(a[i], a[j]);
            }
        }

        let c = t3.challenge(ChallengeId::Alpha(0));
        assert_ne!(a[0], c);
        assert_eq!(t1.int_challenge(), t2.int_challenge());
    }
}

use crate::errors::Result;
use crate::transcript::{ChallengeId, Transcript, TranscriptInput, CHALLENGE_BYTES};
use digest::Digest;
use redshift_algebra::prelude::*;

/// Sequential transcript over a byte hash `D`: the whole state is one digest,
/// `state = H(state || input)` on absorb and `state = H(state)` on squeeze.
#[derive(Clone, Debug)]
pub struct SequentialTranscript<D> {
    state: Vec<u8>,
    _hash: PhantomData<D>,
}

impl<D: Digest> Default for SequentialTranscript<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Digest> SequentialTranscript<D> {
    /// Start from the hash of the zero byte.
    pub fn new() -> Self {
        Self::with_seed(&[0u8])
    }

    /// Start from the hash of `seed`.
    pub fn with_seed(seed: &[u8]) -> Self {
        Self {
            state: D::digest(seed).to_vec(),
            _hash: PhantomData,
        }
    }

    /// The current digest.
    pub fn state(&self) -> &[u8] {
        &self.state
    }

    /// Absorb raw bytes.
    pub fn absorb_bytes(&mut self, bytes: &[u8]) {
        let mut hasher = D::new();
        hasher.update(&self.state);
        hasher.update(bytes);
        self.state = hasher.finalize().to_vec();
    }

    fn ratchet(&mut self) {
        self.state = D::digest(&self.state).to_vec();
    }

    /// Squeeze `CHALLENGE_BYTES` bytes: ratchet, then expand the new state
    /// in counter mode.
    pub fn squeeze_bytes(&mut self) -> [u8; CHALLENGE_BYTES] {
        self.ratchet();
        let mut out = [0u8; CHALLENGE_BYTES];
        let mut filled = 0;
        let mut counter = 0u8;
        while filled < CHALLENGE_BYTES {
            let mut hasher = D::new();
            hasher.update(&self.state);
            hasher.update([counter]);
            let block = hasher.finalize();
            let take = core::cmp::min(block.len(), CHALLENGE_BYTES - filled);
            out[filled..filled + take].copy_from_slice(&block[..take]);
            filled += take;
            counter += 1;
        }
        out
    }

    /// Ratchet and read the low 8 bytes of the state.
    pub fn next_u64(&mut self) -> u64 {
        self.ratchet();
        u8_le_slice_to_u64(&self.state[..8])
    }
}

impl<F: Scalar, D: Digest> Transcript<F> for SequentialTranscript<D> {
    fn absorb<T: TranscriptInput<F> + ?Sized>(&mut self, data: &T) -> Result<()> {
        self.absorb_bytes(&data.to_transcript_bytes());
        Ok(())
    }

    /// The state already binds the derivation order, so `id` only
    /// names the challenge.
    fn challenge(&mut self, _id: ChallengeId) -> F {
        F::from_bytes_mod_order(&self.squeeze_bytes())
    }

    fn int_challenge(&mut self) -> u64 {
        self.next_u64()
    }
}

#[cfg(test)]
mod test {
    use crate::transcript::{ChallengeId, SequentialTranscript, Transcript};
    use digest::Digest;
    use redshift_algebra::{bls12_381::BLSScalar, prelude::*};
    use sha2::Sha256;
    use sha3::Keccak256;

    #[test]
    fn test_state_chain() {
        let mut transcript = SequentialTranscript::<Sha256>::new();
        let init = Sha256::digest([0u8]).to_vec();
        assert_eq!(transcript.state(), &init[..]);

        Transcript::<BLSScalar>::absorb(&mut transcript, &b"abc"[..]).unwrap();
        let expected = Sha256::new().chain_update(&init).chain_update(b"abc").finalize();
        assert_eq!(transcript.state(), &expected[..]);

        let challenge: BLSScalar = transcript.challenge(ChallengeId::Beta);
        let ratcheted = Sha256::digest(&expected);
        let mut wide = Sha256::new()
            .chain_update(&ratcheted)
            .chain_update([0u8])
            .finalize()
            .to_vec();
        wide.extend(Sha256::new().chain_update(&ratcheted).chain_update([1u8]).finalize());
        assert_eq!(challenge, BLSScalar::from_bytes_mod_order(&wide));
        assert_eq!(transcript.state(), &ratcheted[..]);
    }

    #[test]
    fn test_deterministic_and_order_sensitive() {
        let run = |inputs: &[&[u8]]| {
            let mut transcript = SequentialTranscript::<Keccak256>::new();
            for input in inputs {
                Transcript::<BLSScalar>::absorb(&mut transcript, *input).unwrap();
            }
            let c1: BLSScalar = transcript.challenge(ChallengeId::Beta);
            let c2: BLSScalar = transcript.challenge(ChallengeId::Gamma);
            (c1, c2)
        };
        let (a1, a2) = run(&[b"first", b"second"]);
        let (b1, b2) = run(&[b"first", b"second"]);
        let (c1, _) = run(&[b"second", b"first"]);
        assert_eq!((a1, a2), (b1, b2));
        assert_ne!(a1, a2);
        assert_ne!(a1, c1);
    }

    #[test]
    fn test_seed_and_hash_separate() {
        let mut t1 = SequentialTranscript::<Sha256>::new();
        let mut t2 = SequentialTranscript::<Sha256>::with_seed(b"seed");
        let mut t3 = SequentialTranscript::<Keccak256>::new();
        let c1: BLSScalar = t1.challenge(ChallengeId::Tau);
        let c2: BLSScalar = t2.challenge(ChallengeId::Tau);
        let c3: BLSScalar = t3.challenge(ChallengeId::Tau);
        assert_ne!(c1, c2);
        assert_ne!(c1, c3);
    }

    #[test]
    fn test_int_challenge() {
        let mut t = SequentialTranscript::<Sha256>::new();
        let init = t.state().to_vec();
        let i = Transcript::<BLSScalar>::int_challenge(&mut t);
        let ratcheted = Sha256::digest(&init);
        assert_eq!(i, u8_le_slice_to_u64(&ratcheted[..8]));
        assert_ne!(i, Transcript::<BLSScalar>::int_challenge(&mut t));
    }
}

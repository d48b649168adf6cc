use crate::errors::Result;
use crate::transcript::{ChallengeId, Transcript, TranscriptInput, CHALLENGE_BYTES};
use merlin::Transcript as MerlinTranscript;
use redshift_algebra::prelude::*;

/// Accumulative transcript: every message is fed into merlin's STROBE
/// state, challenges are squeezed under the identifier's label.
#[derive(Clone)]
pub struct AccumulativeTranscript {
    inner: MerlinTranscript,
}

impl AccumulativeTranscript {
    /// Create a transcript separated by the protocol `label`.
    pub fn new(label: &'static [u8]) -> Self {
        let mut inner = MerlinTranscript::new(label);
        inner.append_message(b"New Domain", b"Redshift");
        Self { inner }
    }
}

impl<F: Scalar> Transcript<F> for AccumulativeTranscript {
    fn absorb<T: TranscriptInput<F> + ?Sized>(&mut self, data: &T) -> Result<()> {
        self.inner
            .append_message(b"absorb", &data.to_transcript_bytes());
        Ok(())
    }

    fn challenge(&mut self, id: ChallengeId) -> F {
        if let Some(i) = id.family_index() {
            self.inner.append_u64(b"family index", i as u64);
        }
        let mut buff = [0u8; CHALLENGE_BYTES];
        self.inner.challenge_bytes(id.label(), &mut buff);
        F::from_bytes_mod_order(&buff)
    }

    fn int_challenge(&mut self) -> u64 {
        let mut buff = [0u8; 8];
        self.inner.challenge_bytes(b"int challenge", &mut buff);
        u64::from_le_bytes(buff)
    }
}

#[cfg(test)]
mod test {
    use crate::transcript::{AccumulativeTranscript, ChallengeId, FieldDigest, Transcript};
    use redshift_algebra::bls12_381::BLSScalar;

    fn transcript_with(inputs: &[&[u8]]) -> AccumulativeTranscript {
        let mut transcript = AccumulativeTranscript::new(b"test");
        for input in inputs {
            Transcript::<BLSScalar>::absorb(&mut transcript, *input).unwrap();
        }
        transcript
    }

    #[test]
    fn test_deterministic() {
        let mut t1 = transcript_with(&[b"commitment 1", b"commitment 2"]);
        let mut t2 = transcript_with(&[b"commitment 1", b"commitment 2"]);
        let c1: BLSScalar = t1.challenge(ChallengeId::Beta);
        let c2: BLSScalar = t2.challenge(ChallengeId::Beta);
        assert_eq!(c1, c2);
        let a1: [BLSScalar; 11] = t1.challenges(ChallengeId::Alpha(0));
        let a2: [BLSScalar; 11] = t2.challenges(ChallengeId::Alpha(0));
        assert_eq!(a1, a2);
        assert_ne!(a1[0], a1[1]);
    }

    #[test]
    fn test_order_sensitive() {
        let mut t1 = transcript_with(&[b"commitment 1", b"commitment 2"]);
        let mut t2 = transcript_with(&[b"commitment 2", b"commitment 1"]);
        let c1: BLSScalar = t1.challenge(ChallengeId::Beta);
        let c2: BLSScalar = t2.challenge(ChallengeId::Beta);
        assert_ne!(c1, c2);
    }

    #[test]
    fn test_label_separates() {
        let mut t1 = transcript_with(&[b"commitment"]);
        let mut t2 = transcript_with(&[b"commitment"]);
        let beta: BLSScalar = t1.challenge(ChallengeId::Beta);
        let gamma: BLSScalar = t2.challenge(ChallengeId::Gamma);
        assert_ne!(beta, gamma);
    }

    #[test]
    fn test_field_digest_and_int_challenge() {
        let mut t1 = AccumulativeTranscript::new(b"test");
        let mut t2 = AccumulativeTranscript::new(b"test");
        t1.absorb(&FieldDigest(BLSScalar::from(7u32))).unwrap();
        t2.absorb(&FieldDigest(BLSScalar::from(7u32))).unwrap();
        let i1 = Transcript::<BLSScalar>::int_challenge(&mut t1);
        let i2 = Transcript::<BLSScalar>::int_challenge(&mut t2);
        assert_eq!(i1, i2);
        let j1 = Transcript::<BLSScalar>::int_challenge(&mut t1);
        assert_ne!(i1, j1);
    }
}

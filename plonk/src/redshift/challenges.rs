use crate::errors::{PlonkError, Result};
use crate::transcript::{ChallengeId, Transcript};
use redshift_algebra::prelude::*;

/// Number of constraint categories weighted by an `alpha`.
pub const ALPHAS_AMOUNT: usize = 11;

/// Constraint categories used by the permutation argument.
pub const PERMUTATION_SLOTS: usize = 5;

/// Gate types that fit in the remaining `alpha` slots.
pub const MAX_GATE_TYPES: usize = ALPHAS_AMOUNT - PERMUTATION_SLOTS;

/// The order in which the prover derives its challenges.
pub const REDSHIFT_MANIFEST: [ChallengeId; 16] = [
    ChallengeId::Beta,
    ChallengeId::Gamma,
    ChallengeId::Theta,
    ChallengeId::Alpha(0),
    ChallengeId::Alpha(1),
    ChallengeId::Alpha(2),
    ChallengeId::Alpha(3),
    ChallengeId::Alpha(4),
    ChallengeId::Alpha(5),
    ChallengeId::Alpha(6),
    ChallengeId::Alpha(7),
    ChallengeId::Alpha(8),
    ChallengeId::Alpha(9),
    ChallengeId::Alpha(10),
    ChallengeId::Tau,
    ChallengeId::Upsilon,
];

/// The data structure for challenges in Redshift, filled in manifest order.
#[derive(Default)]
pub struct RedshiftChallenges<F> {
    challenges: Vec<F>,
}

impl<F: Scalar> RedshiftChallenges<F> {
    /// Create an empty set of challenges.
    pub fn new() -> RedshiftChallenges<F> {
        RedshiftChallenges {
            challenges: Vec::with_capacity(REDSHIFT_MANIFEST.len()),
        }
    }

    /// The identifier expected next, if any.
    pub fn next_id(&self) -> Option<ChallengeId> {
        REDSHIFT_MANIFEST.get(self.challenges.len()).copied()
    }

    /// Derive the challenge `id`, which must be the next one in the manifest.
    pub fn derive<T: Transcript<F>>(&mut self, transcript: &mut T, id: ChallengeId) -> Result<F> {
        if self.next_id() != Some(id) {
            return Err(PlonkError::ChallengeOrderError);
        }
        let c = transcript.challenge(id);
        self.challenges.push(c);
        Ok(c)
    }

    /// Derive the whole `alpha` family at once.
    pub fn derive_alphas<T: Transcript<F>>(
        &mut self,
        transcript: &mut T,
    ) -> Result<[F; ALPHAS_AMOUNT]> {
        if self.next_id() != Some(ChallengeId::Alpha(0)) {
            return Err(PlonkError::ChallengeOrderError);
        }
        let alphas = transcript.challenges::<ALPHAS_AMOUNT>(ChallengeId::Alpha(0));
        self.challenges.extend_from_slice(&alphas);
        Ok(alphas)
    }

    /// Return a challenge already derived.
    pub fn get(&self, id: ChallengeId) -> Result<&F> {
        REDSHIFT_MANIFEST
            .iter()
            .position(|m| *m == id)
            .and_then(|i| self.challenges.get(i))
            .ok_or(PlonkError::ChallengeOrderError)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::transcript::AccumulativeTranscript;
    use redshift_algebra::bls12_381::BLSScalar;

    #[test]
    fn test_manifest_order() {
        let mut transcript = AccumulativeTranscript::new(b"manifest");
        let mut challenges = RedshiftChallenges::<BLSScalar>::new();
        assert_eq!(
            challenges.derive(&mut transcript, ChallengeId::Gamma),
            Err(PlonkError::ChallengeOrderError)
        );
        assert!(challenges.get(ChallengeId::Beta).is_err());

        let beta = challenges.derive(&mut transcript, ChallengeId::Beta).unwrap();
        assert_eq!(*challenges.get(ChallengeId::Beta).unwrap(), beta);
        assert!(challenges.derive_alphas(&mut transcript).is_err());
        challenges.derive(&mut transcript, ChallengeId::Gamma).unwrap();
        assert!(challenges.derive(&mut transcript, ChallengeId::Gamma).is_err());
        challenges.derive(&mut transcript, ChallengeId::Theta).unwrap();

        let alphas = challenges.derive_alphas(&mut transcript).unwrap();
        for (i, alpha) in alphas.iter().enumerate() {
            assert_eq!(challenges.get(ChallengeId::Alpha(i)).unwrap(), alpha);
        }
        assert!(challenges.get(ChallengeId::Upsilon).is_err());

        challenges.derive(&mut transcript, ChallengeId::Tau).unwrap();
        challenges.derive(&mut transcript, ChallengeId::Upsilon).unwrap();
        assert_eq!(challenges.next_id(), None);
        assert!(challenges.derive(&mut transcript, ChallengeId::Upsilon).is_err());
    }

    #[test]
    fn test_same_transcript_same_challenges() {
        let run = || {
            let mut transcript = AccumulativeTranscript::new(b"manifest");
            let mut challenges = RedshiftChallenges::<BLSScalar>::new();
            for id in REDSHIFT_MANIFEST.iter().take(3) {
                challenges.derive(&mut transcript, *id).unwrap();
            }
            challenges.derive_alphas(&mut transcript).unwrap()
        };
        let a = run();
        let b = run();
        assert_eq!(a, b);
        assert_ne!(a[0], a[1]);
    }
}

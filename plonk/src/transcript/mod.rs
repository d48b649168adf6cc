//! Fiat-Shamir transcripts.
//!
//! Every engine absorbs prover messages in call order and derives
//! challenges as a deterministic function of everything absorbed so far.
//! There is no way to rewind an engine.

use crate::errors::Result;
use redshift_algebra::prelude::*;

/// Module for the merlin-backed accumulative transcript.
pub mod accumulative;

/// Module for the sequential transcript over an algebraic permutation.
pub mod algebraic;

/// Module for the Poseidon permutation.
pub mod poseidon;

/// Module for the sequential transcript over a byte hash.
pub mod sequential;

pub use accumulative::AccumulativeTranscript;
pub use algebraic::AlgebraicTranscript;
pub use poseidon::{Permutation, PoseidonPermutation};
pub use sequential::SequentialTranscript;

/// Number of bytes squeezed for one field challenge by the byte-oriented engines.
pub const CHALLENGE_BYTES: usize = 64;

/// The verifier challenges of the Redshift protocol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChallengeId {
    /// Permutation argument, identity column weight.
    Beta,
    /// Permutation argument, shift.
    Gamma,
    /// Reserved for a lookup argument.
    Theta,
    /// Weight of constraint category `i`.
    Alpha(usize),
    /// Combines the constraints of one gate.
    Tau,
    /// The evaluation point.
    Upsilon,
}

impl ChallengeId {
    /// The domain separation label.
    pub fn label(&self) -> &'static [u8] {
        match self {
            ChallengeId::Beta => b"beta",
            ChallengeId::Gamma => b"gamma",
            ChallengeId::Theta => b"theta",
            ChallengeId::Alpha(_) => b"alpha",
            ChallengeId::Tau => b"tau",
            ChallengeId::Upsilon => b"upsilon",
        }
    }

    /// The index inside an indexed family.
    pub fn family_index(&self) -> Option<usize> {
        match self {
            ChallengeId::Alpha(i) => Some(*i),
            _ => None,
        }
    }

    /// The `i`-th member of this identifier's family.
    pub fn at(&self, i: usize) -> ChallengeId {
        match self {
            ChallengeId::Alpha(_) => ChallengeId::Alpha(i),
            other => *other,
        }
    }
}

/// How a value is fed into a transcript.
pub trait TranscriptInput<F> {
    /// Byte encoding, used by byte-oriented engines.
    fn to_transcript_bytes(&self) -> Vec<u8>;

    /// Field encoding, required by algebraic engines.
    fn as_field_digest(&self) -> Option<F> {
        None
    }
}

impl<F> TranscriptInput<F> for [u8] {
    fn to_transcript_bytes(&self) -> Vec<u8> {
        self.to_vec()
    }
}

impl<F> TranscriptInput<F> for Vec<u8> {
    fn to_transcript_bytes(&self) -> Vec<u8> {
        self.clone()
    }
}

/// A 32-byte digest.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ByteDigest(pub [u8; 32]);

impl<F> TranscriptInput<F> for ByteDigest {
    fn to_transcript_bytes(&self) -> Vec<u8> {
        self.0.to_vec()
    }
}

/// A digest that is a single field element.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDigest<F>(pub F);

impl<F: Scalar> TranscriptInput<F> for FieldDigest<F> {
    fn to_transcript_bytes(&self) -> Vec<u8> {
        self.0.to_bytes()
    }

    fn as_field_digest(&self) -> Option<F> {
        Some(self.0)
    }
}

/// A Fiat-Shamir transcript over the field `F`.
pub trait Transcript<F: Scalar> {
    /// Absorb a prover message.
    fn absorb<T: TranscriptInput<F> + ?Sized>(&mut self, data: &T) -> Result<()>;

    /// Derive one field challenge.
    fn challenge(&mut self, id: ChallengeId) -> F;

    /// Derive the first `N` members of an indexed family.
    fn challenges<const N: usize>(&mut self, id: ChallengeId) -> [F; N] {
        core::array::from_fn(|i| self.challenge(id.at(i)))
    }

    /// Derive an integer challenge, e.g. for query positions.
    fn int_challenge(&mut self) -> u64;
}

/// `log2` of the statistical distance between a byte-squeezed challenge and
/// a uniform field element.
pub fn challenge_bias_log2<F: Scalar>() -> isize {
    F::modulus_bits() as isize - (CHALLENGE_BYTES * 8) as isize
}

#[cfg(test)]
mod test {
    use super::*;
    use redshift_algebra::bls12_381::BLSScalar;

    #[test]
    fn test_challenge_bias_bound() {
        let bias = challenge_bias_log2::<BLSScalar>();
        assert_eq!(bias, 255 - 512);
        assert!(bias <= -128);
    }

    #[test]
    fn test_family_index() {
        assert_eq!(ChallengeId::Alpha(0).at(7), ChallengeId::Alpha(7));
        assert_eq!(ChallengeId::Tau.at(3), ChallengeId::Tau);
        assert_eq!(ChallengeId::Alpha(4).family_index(), Some(4));
        assert_eq!(ChallengeId::Beta.family_index(), None);
    }

    #[test]
    fn test_field_digest_input() {
        let x = BLSScalar::from(42u32);
        let digest = FieldDigest(x);
        assert_eq!(TranscriptInput::<BLSScalar>::as_field_digest(&digest), Some(x));
        assert_eq!(
            TranscriptInput::<BLSScalar>::to_transcript_bytes(&digest),
            x.to_bytes()
        );
        let raw: &[u8] = b"raw";
        assert_eq!(TranscriptInput::<BLSScalar>::as_field_digest(raw), None);
    }
}

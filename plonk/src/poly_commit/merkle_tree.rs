//! Binary Merkle tree over field elements, used to commit to the
//! evaluations of a polynomial.
use crate::poly_commit::errors::{PolyComSchemeError, Result};
use crate::transcript::{ByteDigest, FieldDigest, Permutation, TranscriptInput};
use ark_std::fmt::Debug;
use redshift_algebra::prelude::*;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// The hash used in the leaves and the inner nodes of a tree.
pub trait MerkleHasher<F>: Clone + Send + Sync {
    /// The node value, also the commitment root.
    type Digest: Clone
        + Debug
        + PartialEq
        + Eq
        + Serialize
        + DeserializeOwned
        + Send
        + Sync
        + TranscriptInput<F>;

    /// Hash a leaf value.
    fn hash_leaf(&self, value: &F) -> Self::Digest;

    /// Hash two children.
    fn hash_node(&self, left: &Self::Digest, right: &Self::Digest) -> Self::Digest;
}

/// SHA-256 with distinct prefixes for leaves and nodes.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sha256MerkleHasher;

impl<F: Scalar> MerkleHasher<F> for Sha256MerkleHasher {
    type Digest = ByteDigest;

    fn hash_leaf(&self, value: &F) -> ByteDigest {
        let h = Sha256::new()
            .chain_update([0u8])
            .chain_update(value.to_bytes())
            .finalize();
        ByteDigest(h.into())
    }

    fn hash_node(&self, left: &ByteDigest, right: &ByteDigest) -> ByteDigest {
        let h = Sha256::new()
            .chain_update([1u8])
            .chain_update(left.0)
            .chain_update(right.0)
            .finalize();
        ByteDigest(h.into())
    }
}

/// A permutation-based hasher whose digests are field elements.
/// Leaves permute `[1, value, 0]`, nodes permute `[2, left, right]`.
#[derive(Clone, Debug)]
pub struct AlgebraicMerkleHasher<P> {
    permutation: P,
}

impl<P> AlgebraicMerkleHasher<P> {
    /// Wrap the permutation.
    pub fn new(permutation: P) -> Self {
        Self { permutation }
    }
}

impl<F: Scalar, P: Permutation<F>> MerkleHasher<F> for AlgebraicMerkleHasher<P> {
    type Digest = FieldDigest<F>;

    fn hash_leaf(&self, value: &F) -> FieldDigest<F> {
        let mut state = [F::one(), *value, F::zero()];
        self.permutation.permute(&mut state);
        FieldDigest(state[2])
    }

    fn hash_node(&self, left: &FieldDigest<F>, right: &FieldDigest<F>) -> FieldDigest<F> {
        let mut state = [F::from(2u32), left.0, right.0];
        self.permutation.permute(&mut state);
        FieldDigest(state[2])
    }
}

/// Which side of its parent a node is on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathDirection {
    /// Left child.
    LEFT,
    /// Right child.
    RIGHT,
}

/// A complete binary tree, `layers[0]` are the hashed leaves and the last
/// layer holds the root.
#[derive(Clone, Debug)]
pub struct MerkleTree<D> {
    layers: Vec<Vec<D>>,
}

/// Authentication path from a leaf to the root, bottom-up.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerklePath<D> {
    /// The position of the leaf.
    pub index: usize,
    /// Sibling digests and the side the path node is on.
    pub nodes: Vec<(PathDirection, D)>,
}

impl<D: Clone> MerkleTree<D> {
    /// The root digest.
    pub fn root(&self) -> D {
        // `mt_build` never produces an empty layer.
        self.layers[self.layers.len() - 1][0].clone()
    }

    /// The number of leaves.
    pub fn size(&self) -> usize {
        self.layers[0].len()
    }
}

/// Builds a binary Merkle tree from a set of elements
/// * `elements` - elements to be placed at the leaves of the tree. The number of elements must be a power of 2.
/// * `returns` Merkle tree data structure or an error
pub fn mt_build<F, H: MerkleHasher<F>>(
    hasher: &H,
    elements: &[F],
) -> Result<MerkleTree<H::Digest>> {
    if !elements.len().is_power_of_two() {
        return Err(PolyComSchemeError::MerkleTreeError);
    }

    let mut layers = vec![elements
        .iter()
        .map(|e| hasher.hash_leaf(e))
        .collect::<Vec<_>>()];
    while layers[layers.len() - 1].len() > 1 {
        let next = layers[layers.len() - 1]
            .chunks(2)
            .map(|pair| hasher.hash_node(&pair[0], &pair[1]))
            .collect();
        layers.push(next);
    }
    Ok(MerkleTree { layers })
}

/// Computes the authentication path for the leaf at `index`,
/// 0 being the index of the most left one.
pub fn mt_prove<D: Clone>(tree: &MerkleTree<D>, index: usize) -> Result<MerklePath<D>> {
    if index >= tree.size() {
        return Err(PolyComSchemeError::MerkleTreeError);
    }
    let mut nodes = Vec::with_capacity(tree.layers.len() - 1);
    let mut position = index;
    for layer in tree.layers[..tree.layers.len() - 1].iter() {
        let direction = if position % 2 == 0 {
            PathDirection::LEFT
        } else {
            PathDirection::RIGHT
        };
        nodes.push((direction, layer[position ^ 1].clone()));
        position /= 2;
    }
    Ok(MerklePath { index, nodes })
}

/// Verifies that `element` sits at `path.index` in the tree with `root`.
pub fn mt_verify<F, H: MerkleHasher<F>>(
    hasher: &H,
    root: &H::Digest,
    element: &F,
    path: &MerklePath<H::Digest>,
) -> Result<()> {
    let mut position = path.index;
    let mut current = hasher.hash_leaf(element);
    for (direction, sibling) in path.nodes.iter() {
        let expected = if position % 2 == 0 {
            PathDirection::LEFT
        } else {
            PathDirection::RIGHT
        };
        if *direction != expected {
            return Err(PolyComSchemeError::MerkleTreeError);
        }
        current = match direction {
            PathDirection::LEFT => hasher.hash_node(&current, sibling),
            PathDirection::RIGHT => hasher.hash_node(sibling, &current),
        };
        position /= 2;
    }
    if position == 0 && current == *root {
        Ok(())
    } else {
        Err(PolyComSchemeError::MerkleTreeError)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::transcript::PoseidonPermutation;
    use redshift_algebra::bls12_381::BLSScalar;

    fn check_tree<H: MerkleHasher<BLSScalar>>(hasher: &H) {
        let elements: Vec<BLSScalar> = (0..8u32).map(BLSScalar::from).collect();
        let tree = mt_build(hasher, &elements).unwrap();
        let root = tree.root();
        assert_eq!(tree.size(), 8);

        for (i, e) in elements.iter().enumerate() {
            let path = mt_prove(&tree, i).unwrap();
            assert_eq!(path.nodes.len(), 3);
            assert!(mt_verify(hasher, &root, e, &path).is_ok());
        }

        let path = mt_prove(&tree, 5).unwrap();
        assert!(mt_verify(hasher, &root, &BLSScalar::from(100u32), &path).is_err());

        let mut moved = path.clone();
        moved.index = 4;
        assert!(mt_verify(hasher, &root, &elements[5], &moved).is_err());

        assert!(mt_prove(&tree, 8).is_err());
        assert!(mt_build(hasher, &elements[..6]).is_err());
    }

    #[test]
    fn test_sha256_tree() {
        check_tree(&Sha256MerkleHasher);
    }

    #[test]
    fn test_algebraic_tree() {
        let perm = PoseidonPermutation::<BLSScalar>::new().unwrap();
        check_tree(&AlgebraicMerkleHasher::new(perm));
    }

    #[test]
    fn test_single_leaf() {
        let tree = mt_build(&Sha256MerkleHasher, &[BLSScalar::from(1u32)]).unwrap();
        let path = mt_prove(&tree, 0).unwrap();
        assert!(path.nodes.is_empty());
        let root = tree.root();
        assert!(mt_verify(&Sha256MerkleHasher, &root, &BLSScalar::from(1u32), &path).is_ok());
    }
}

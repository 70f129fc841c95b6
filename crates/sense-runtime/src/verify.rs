//! Placement verification.
//!
//! The world gives no causal link between "a block was placed" and "this block
//! appeared", so solid placements are confirmed by comparing names.

use sense_core::{Block, Item};

/// Decides whether an observed block is the result of placing `item`.
pub trait PlacementVerifier: Send + Sync {
    fn verify(&self, item: &Item, placed: &Block) -> bool;
}

/// Accepts the block when its name is within edit distance of the item name.
#[derive(Debug, Clone, Copy)]
pub struct NameSimilarityVerifier {
    /// Exclusive upper bound on the edit distance.
    pub threshold: usize,
}

impl Default for NameSimilarityVerifier {
    fn default() -> Self {
        Self { threshold: 8 }
    }
}

impl PlacementVerifier for NameSimilarityVerifier {
    fn verify(&self, item: &Item, placed: &Block) -> bool {
        edit_distance(&item.name, &placed.name) < self.threshold
    }
}

/// Levenshtein distance over chars.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.chars().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if ca == *cb {
                diagonal
            } else {
                1 + diagonal.min(above).min(row[j])
            };
            diagonal = above;
        }
    }
    row[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use sense_core::IVec3;

    fn block(name: &str) -> Block {
        Block {
            position: IVec3::ZERO,
            type_id: 1,
            name: name.into(),
            metadata: 0,
            transparent: false,
            diggable: true,
            waterlogged: false,
        }
    }

    fn item(name: &str) -> Item {
        Item {
            slot: 36,
            name: name.into(),
            count: 1,
            stack_size: 64,
        }
    }

    #[test]
    fn test_edit_distance() {
        assert_eq!(edit_distance("", ""), 0);
        assert_eq!(edit_distance("kitten", "sitting"), 3);
        assert_eq!(edit_distance("slime_block", "slime_block"), 0);
        assert_eq!(edit_distance("", "abc"), 3);
        assert_eq!(edit_distance("abc", ""), 3);
    }

    #[test]
    fn test_similar_names_verify() {
        let verifier = NameSimilarityVerifier::default();
        assert!(verifier.verify(&item("slime_block"), &block("slime_block")));
        assert!(verifier.verify(&item("oak_log"), &block("oak_wood")));
        assert!(!verifier.verify(&item("slime_block"), &block("water")));
    }
}

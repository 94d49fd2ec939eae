//! Feature hashing for folded fingerprints

use xxhash_rust::xxh3::{xxh3_64, xxh3_64_with_seed};

/// Hash of an integer feature tuple (atom invariants, path tokens, ...)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FeatureHash(u64);

impl FeatureHash {
	/// Hash a sequence of feature words
	pub fn of(words: &[u64]) -> Self {
		Self(xxh3_64(&to_bytes(words)))
	}

	/// Seeded variant, used to derive extra bits from one feature
	pub fn seeded(words: &[u64], seed: u64) -> Self {
		Self(xxh3_64_with_seed(&to_bytes(words), seed))
	}

	pub fn value(&self) -> u64 {
		self.0
	}

	/// Fold into a bit position of an `nbits`-long vector
	pub fn fold(&self, nbits: usize) -> usize {
		(self.0 % nbits as u64) as usize
	}
}

fn to_bytes(words: &[u64]) -> Vec<u8> {
	words.iter().flat_map(|w| w.to_le_bytes()).collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_deterministic() {
		assert_eq!(FeatureHash::of(&[6, 3, 1]), FeatureHash::of(&[6, 3, 1]));
		assert_ne!(FeatureHash::of(&[6, 3, 1]), FeatureHash::of(&[6, 1, 3]));
	}

	#[test]
	fn test_fold_in_range() {
		for w in 0..200u64 {
			assert!(FeatureHash::of(&[w]).fold(167) < 167);
		}
	}

	#[test]
	fn test_seed_changes_hash() {
		assert_ne!(FeatureHash::seeded(&[7], 1), FeatureHash::seeded(&[7], 2));
	}
}

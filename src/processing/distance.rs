//! Pairwise distance construction

use crate::core::{pair_count, DistanceList, Fingerprint, Similarity};
use crate::error::{Error, Result};

/// Similarity between two fingerprints, in [0, 1]
pub trait SimilarityMeasure {
	fn similarity(&self, a: &Fingerprint, b: &Fingerprint) -> Result<f64>;
}

impl SimilarityMeasure for Similarity {
	fn similarity(&self, a: &Fingerprint, b: &Fingerprint) -> Result<f64> {
		self.compute(a, b)
	}
}

impl<F> SimilarityMeasure for F
where
	F: Fn(&Fingerprint, &Fingerprint) -> Result<f64>,
{
	fn similarity(&self, a: &Fingerprint, b: &Fingerprint) -> Result<f64> {
		self(a, b)
	}
}

/// Builds the condensed `1 - similarity` distance list for a set of fingerprints
#[derive(Debug, Clone, Copy)]
pub struct PairwiseDistanceBuilder<S = Similarity> {
	measure: S,
}

impl Default for PairwiseDistanceBuilder<Similarity> {
	fn default() -> Self {
		Self::new(Similarity::Tanimoto)
	}
}

impl<S: SimilarityMeasure> PairwiseDistanceBuilder<S> {
	pub fn new(measure: S) -> Self {
		Self { measure }
	}

	/// Distances enumerated for i in 1..n, j in 0..i
	pub fn build(&self, fps: &[Fingerprint]) -> Result<DistanceList> {
		let n = fps.len();
		if let Some(first) = fps.first() {
			if let Some(other) = fps.iter().find(|fp| fp.len() != first.len()) {
				return Err(Error::LengthMismatch {
					expected: first.len(),
					found: other.len(),
				});
			}
		}

		let mut values = Vec::with_capacity(pair_count(n));
		for i in 1..n {
			for j in 0..i {
				values.push(1.0 - self.measure.similarity(&fps[i], &fps[j])?);
			}
		}
		DistanceList::new(n, values)
	}
}

/// Tanimoto distances
pub fn tanimoto_distances(fps: &[Fingerprint]) -> Result<DistanceList> {
	PairwiseDistanceBuilder::<Similarity>::default().build(fps)
}

//! Threshold (Butina) clustering
//!
//! Items closer than a distance cutoff are neighbors. The unassigned item
//! with the most unassigned neighbors seeds a cluster that absorbs all of
//! those neighbors; this repeats until every item is assigned.

use crate::core::{pair_count, ClusterAssignment, DistanceList, Fingerprint};
use crate::error::{Error, Result};
use crate::processing::distance::tanimoto_distances;
use crate::processing::traits::Clustering;

/// Assigns items to clusters from a condensed distance list
#[derive(Debug, Clone, Copy, Default)]
pub struct ThresholdClusterAssigner;

impl ThresholdClusterAssigner {
	/// Cluster `n_items` items; `distances` is in (1,0), (2,0), (2,1), ... order
	pub fn assign(&self, n_items: usize, distances: &[f64], cutoff: f64) -> Result<ClusterAssignment> {
		if cutoff.is_nan() || !(0.0..=1.0).contains(&cutoff) {
			return Err(Error::CutoffOutOfRange(cutoff));
		}

		let expected = pair_count(n_items);
		if distances.len() != expected {
			return Err(Error::DistanceLength {
				n_items,
				expected,
				found: distances.len(),
			});
		}

		if let Some(pos) = distances.iter().position(|d| d.is_nan()) {
			return Err(Error::NanDistance(pos));
		}

		// neighbor lists come out sorted because pairs are visited row by row
		let mut neighbors: Vec<Vec<usize>> = vec![Vec::new(); n_items];
		let mut pos = 0;
		for i in 1..n_items {
			for j in 0..i {
				if distances[pos] <= cutoff {
					neighbors[i].push(j);
					neighbors[j].push(i);
				}
				pos += 1;
			}
		}

		let mut counts: Vec<usize> = neighbors.iter().map(Vec::len).collect();
		let mut assigned = vec![false; n_items];
		let mut remaining = n_items;
		let mut clusters = Vec::new();

		while remaining > 0 {
			let seed = (0..n_items)
				.filter(|&i| !assigned[i])
				.fold(None, |best: Option<usize>, i| match best {
					Some(b) if counts[b] >= counts[i] => Some(b),
					_ => Some(i),
				});
			let Some(seed) = seed else {
				break;
			};

			let mut members = vec![seed];
			members.extend(neighbors[seed].iter().copied().filter(|&n| !assigned[n]));

			for &m in &members {
				assigned[m] = true;
			}
			for &m in &members {
				for &n in &neighbors[m] {
					if !assigned[n] {
						counts[n] -= 1;
					}
				}
			}

			remaining -= members.len();
			clusters.push(members);
		}

		Ok(ClusterAssignment::from_clusters(n_items, clusters))
	}

	pub fn assign_list(&self, distances: &DistanceList, cutoff: f64) -> Result<ClusterAssignment> {
		self.assign(distances.n_items(), distances.as_slice(), cutoff)
	}
}

/// Butina clustering on Tanimoto similarity
#[derive(Debug, Clone, Copy)]
pub struct Butina {
	similarity_cutoff: f64,
}

impl Butina {
	/// Molecules at least `similarity_cutoff` similar are neighbors
	pub fn new(similarity_cutoff: f64) -> Result<Self> {
		if similarity_cutoff.is_nan() || !(0.0..=1.0).contains(&similarity_cutoff) {
			return Err(Error::parameter("similarity", format!("{} is outside [0, 1]", similarity_cutoff)));
		}
		Ok(Self { similarity_cutoff })
	}

	pub fn similarity_cutoff(&self) -> f64 {
		self.similarity_cutoff
	}

	/// Full assignment, keeping cluster seeds
	pub fn fit(&self, fps: &[Fingerprint]) -> Result<ClusterAssignment> {
		if fps.is_empty() {
			return Err(Error::EmptyInput);
		}
		let distances = tanimoto_distances(fps)?;
		let cutoff = (1.0 - self.similarity_cutoff).clamp(0.0, 1.0);
		ThresholdClusterAssigner.assign_list(&distances, cutoff)
	}
}

impl Clustering for Butina {
	fn fit_predict(&self, fps: &[Fingerprint]) -> Result<Vec<Option<usize>>> {
		let assignment = self.fit(fps)?;
		Ok(assignment.into_labels().into_iter().map(Some).collect())
	}

	fn name(&self) -> &'static str {
		"butina"
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::ErrorKind;

	const FOUR: [f64; 6] = [0.1, 0.9, 0.9, 0.9, 0.9, 0.1];

	#[test]
	fn test_two_pairs() {
		let assignment = ThresholdClusterAssigner.assign(4, &FOUR, 0.2).unwrap();
		assert_eq!(assignment.clusters(), &[vec![0, 1], vec![2, 3]]);
		assert_eq!(assignment.labels(), &[0, 0, 1, 1]);
	}

	#[test]
	fn test_tight_cutoff_gives_singletons() {
		let assignment = ThresholdClusterAssigner.assign(4, &FOUR, 0.05).unwrap();
		assert_eq!(assignment.n_clusters(), 4);
		assert_eq!(assignment.labels(), &[0, 1, 2, 3]);
	}

	#[test]
	fn test_wrong_length() {
		let err = ThresholdClusterAssigner.assign(4, &FOUR[..5], 0.2).unwrap_err();
		assert_eq!(err.kind(), ErrorKind::InvalidInput);
	}

	#[test]
	fn test_cutoff_range() {
		for cutoff in [-0.1, 1.5, f64::NAN] {
			let err = ThresholdClusterAssigner.assign(4, &FOUR, cutoff).unwrap_err();
			assert_eq!(err.kind(), ErrorKind::InvalidInput);
		}
	}

	#[test]
	fn test_nan_distance() {
		let mut distances = FOUR;
		distances[3] = f64::NAN;
		let err = ThresholdClusterAssigner.assign(4, &distances, 0.2).unwrap_err();
		assert!(matches!(err, Error::NanDistance(3)));
	}

	#[test]
	fn test_densest_item_seeds_first() {
		// item 2 neighbors everything, items 0, 1, 3 only neighbor item 2
		let distances = [0.9, 0.1, 0.1, 0.9, 0.9, 0.1];
		let assignment = ThresholdClusterAssigner.assign(4, &distances, 0.2).unwrap();
		assert_eq!(assignment.n_clusters(), 1);
		assert_eq!(assignment.seed(0), 2);
		assert_eq!(assignment.members(0), &[2, 0, 1, 3]);
	}

	#[test]
	fn test_counts_shrink_as_items_are_taken() {
		// chain 0-1-2-3-4: seed 1 takes {0,1,2}; 3 and 4 remain neighbors
		let mut distances = vec![0.9; pair_count(5)];
		for (i, j) in [(1, 0), (2, 1), (3, 2), (4, 3)] {
			distances[crate::core::distance::index(i, j)] = 0.1;
		}
		let assignment = ThresholdClusterAssigner.assign(5, &distances, 0.2).unwrap();
		assert_eq!(assignment.clusters(), &[vec![1, 0, 2], vec![3, 4]]);
	}

	#[test]
	fn test_trivial_sizes() {
		assert_eq!(ThresholdClusterAssigner.assign(0, &[], 0.5).unwrap().n_clusters(), 0);
		assert_eq!(ThresholdClusterAssigner.assign(1, &[], 0.5).unwrap().labels(), &[0]);
	}

	#[test]
	fn test_butina_on_fingerprints() {
		let fps = vec![
			Fingerprint::from_on_bits(16, [0, 1, 2, 3]),
			Fingerprint::from_on_bits(16, [8, 9, 10, 11]),
			Fingerprint::from_on_bits(16, [0, 1, 2]),
		];
		let labels = Butina::new(0.7).unwrap().fit_predict(&fps).unwrap();
		assert_eq!(labels, vec![Some(0), Some(1), Some(0)]);
	}

	#[test]
	fn test_butina_rejects_bad_cutoff_and_empty_input() {
		assert_eq!(Butina::new(1.2).unwrap_err().kind(), ErrorKind::Configuration);
		assert_eq!(Butina::new(0.5).unwrap().fit(&[]).unwrap_err().kind(), ErrorKind::InvalidInput);
	}
}

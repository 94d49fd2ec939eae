//! Agglomerative hierarchical clustering
//!
//! Builds the full merge tree with kodama, then cuts it either at a fixed
//! number of clusters or at a linkage distance threshold.

use std::fmt;

use clap::ValueEnum;
use kodama::{linkage, Method as KodamaMethod, Step};
use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_HIERARCHICAL_CLUSTERS;
use crate::core::Fingerprint;
use crate::error::{Error, Result};
use crate::processing::traits::Clustering;

/// How the distance between two clusters is measured
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Linkage {
	/// Minimise the increase in within-cluster variance (euclidean only)
	#[default]
	Ward,
	/// Maximum distance between members
	Complete,
	/// Mean distance between members
	Average,
	/// Minimum distance between members
	Single,
}

/// Dissimilarity between two fingerprints
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
	/// Euclidean distance over 0/1 bit features
	#[default]
	Euclidean,
	/// 1 - Tanimoto similarity
	Tanimoto,
}

impl fmt::Display for Linkage {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			Linkage::Ward => "ward",
			Linkage::Complete => "complete",
			Linkage::Average => "average",
			Linkage::Single => "single",
		};
		f.write_str(name)
	}
}

impl fmt::Display for Metric {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Metric::Euclidean => "euclidean",
			Metric::Tanimoto => "tanimoto",
		})
	}
}

impl Metric {
	pub(crate) fn distance(self, a: &Fingerprint, b: &Fingerprint) -> Result<f64> {
		match self {
			Metric::Euclidean => Ok((a.hamming(b)? as f64).sqrt()),
			Metric::Tanimoto => Ok(1.0 - a.tanimoto(b)?),
		}
	}
}

/// Where the merge tree is cut
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cut {
	/// Stop merging once this many clusters remain
	Clusters(usize),
	/// Only merge clusters closer than this linkage distance
	Threshold(f64),
}

#[derive(Debug, Clone, Copy)]
pub struct HierarchicalClusterer {
	cut: Cut,
	linkage: Linkage,
	metric: Metric,
}

impl HierarchicalClusterer {
	/// `n_clusters` and `distance_threshold` are mutually exclusive; with
	/// neither set the tree is cut at the default cluster count
	pub fn new(
		n_clusters: Option<usize>,
		distance_threshold: Option<f64>,
		linkage: Linkage,
		metric: Metric,
	) -> Result<Self> {
		let cut = match (n_clusters, distance_threshold) {
			(Some(_), Some(_)) => {
				return Err(Error::parameter(
					"n_clusters",
					"cannot be combined with distance_threshold",
				))
			}
			(Some(0), None) => return Err(Error::parameter("n_clusters", "must be greater than zero")),
			(Some(k), None) => Cut::Clusters(k),
			(None, Some(t)) if t.is_nan() || t < 0.0 => {
				return Err(Error::parameter("distance_threshold", format!("{} must be non-negative", t)))
			}
			(None, Some(t)) => Cut::Threshold(t),
			(None, None) => Cut::Clusters(DEFAULT_HIERARCHICAL_CLUSTERS),
		};

		if linkage == Linkage::Ward && metric != Metric::Euclidean {
			return Err(Error::parameter("linkage", format!("ward requires euclidean metric, got {}", metric)));
		}

		Ok(Self { cut, linkage, metric })
	}

	pub fn cut(&self) -> Cut {
		self.cut
	}

	/// Condensed upper-triangular dissimilarities: (0,1), (0,2), ..., (1,2), ...
	fn condensed(&self, fps: &[Fingerprint]) -> Result<Vec<f64>> {
		let n = fps.len();
		let mut values = Vec::with_capacity(n * n.saturating_sub(1) / 2);
		for row in 0..n.saturating_sub(1) {
			for col in (row + 1)..n {
				values.push(self.metric.distance(&fps[row], &fps[col])?);
			}
		}
		Ok(values)
	}

	fn method(&self) -> KodamaMethod {
		match self.linkage {
			Linkage::Ward => KodamaMethod::Ward,
			Linkage::Complete => KodamaMethod::Complete,
			Linkage::Average => KodamaMethod::Average,
			Linkage::Single => KodamaMethod::Single,
		}
	}

	pub fn fit(&self, fps: &[Fingerprint]) -> Result<Vec<usize>> {
		let n = fps.len();
		if n == 0 {
			return Err(Error::EmptyInput);
		}
		if let Cut::Clusters(k) = self.cut {
			if k > n {
				return Err(Error::InvalidClusterCount { requested: k, n_items: n });
			}
		}
		if n == 1 {
			return Ok(vec![0]);
		}

		let mut condensed = self.condensed(fps)?;
		let dendrogram = linkage(&mut condensed, n, self.method());
		let steps = dendrogram.steps();

		let applied = match self.cut {
			Cut::Clusters(k) => n - k,
			Cut::Threshold(t) => steps.iter().take_while(|s| s.dissimilarity < t).count(),
		};
		Ok(cut_tree(n, &steps[..applied]))
	}
}

/// Labels after applying `steps`; merge `i` creates node `n + i`
fn cut_tree(n: usize, steps: &[Step<f64>]) -> Vec<usize> {
	let mut parent: Vec<usize> = (0..n + steps.len()).collect();
	for (i, step) in steps.iter().enumerate() {
		parent[step.cluster1] = n + i;
		parent[step.cluster2] = n + i;
	}

	let root = |mut node: usize| {
		while parent[node] != node {
			node = parent[node];
		}
		node
	};

	let mut ids: Vec<Option<usize>> = vec![None; n + steps.len()];
	let mut next = 0;
	(0..n)
		.map(|item| {
			let r = root(item);
			*ids[r].get_or_insert_with(|| {
				next += 1;
				next - 1
			})
		})
		.collect()
}

impl Clustering for HierarchicalClusterer {
	fn fit_predict(&self, fps: &[Fingerprint]) -> Result<Vec<Option<usize>>> {
		Ok(self.fit(fps)?.into_iter().map(Some).collect())
	}

	fn name(&self) -> &'static str {
		"hierarchical"
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::ErrorKind;

	fn blocks() -> Vec<Fingerprint> {
		vec![
			Fingerprint::from_on_bits(16, [0, 1, 2, 3]),
			Fingerprint::from_on_bits(16, [0, 1, 2, 4]),
			Fingerprint::from_on_bits(16, [10, 11, 12, 13]),
			Fingerprint::from_on_bits(16, [10, 11, 12, 14]),
			Fingerprint::from_on_bits(16, [10, 11, 12, 13, 14]),
		]
	}

	#[test]
	fn test_cut_at_k() {
		for linkage in [Linkage::Ward, Linkage::Complete, Linkage::Average, Linkage::Single] {
			let hc = HierarchicalClusterer::new(Some(2), None, linkage, Metric::Euclidean).unwrap();
			assert_eq!(hc.fit(&blocks()).unwrap(), vec![0, 0, 1, 1, 1], "{}", linkage);
		}
	}

	#[test]
	fn test_cut_at_threshold() {
		let hc = HierarchicalClusterer::new(None, Some(0.6), Linkage::Average, Metric::Tanimoto).unwrap();
		assert_eq!(hc.fit(&blocks()).unwrap(), vec![0, 0, 1, 1, 1]);

		let hc = HierarchicalClusterer::new(None, Some(0.0), Linkage::Single, Metric::Tanimoto).unwrap();
		assert_eq!(hc.fit(&blocks()).unwrap(), vec![0, 1, 2, 3, 4]);
	}

	#[test]
	fn test_parameter_conflicts() {
		let err = HierarchicalClusterer::new(Some(2), Some(0.5), Linkage::Ward, Metric::Euclidean).unwrap_err();
		assert_eq!(err.kind(), ErrorKind::Configuration);
		let err = HierarchicalClusterer::new(Some(2), None, Linkage::Ward, Metric::Tanimoto).unwrap_err();
		assert_eq!(err.kind(), ErrorKind::Configuration);
		let err = HierarchicalClusterer::new(Some(0), None, Linkage::Single, Metric::Tanimoto).unwrap_err();
		assert_eq!(err.kind(), ErrorKind::Configuration);
		let err = HierarchicalClusterer::new(None, Some(f64::NAN), Linkage::Single, Metric::Tanimoto).unwrap_err();
		assert_eq!(err.kind(), ErrorKind::Configuration);
	}

	#[test]
	fn test_default_cut() {
		let hc = HierarchicalClusterer::new(None, None, Linkage::Ward, Metric::Euclidean).unwrap();
		assert_eq!(hc.cut(), Cut::Clusters(DEFAULT_HIERARCHICAL_CLUSTERS));
	}

	#[test]
	fn test_too_many_clusters() {
		let hc = HierarchicalClusterer::new(Some(9), None, Linkage::Single, Metric::Euclidean).unwrap();
		assert_eq!(hc.fit(&blocks()).unwrap_err().kind(), ErrorKind::InvalidInput);
		assert_eq!(hc.fit(&[]).unwrap_err().kind(), ErrorKind::InvalidInput);
	}

	#[test]
	fn test_single_item() {
		let hc = HierarchicalClusterer::new(Some(1), None, Linkage::Single, Metric::Euclidean).unwrap();
		assert_eq!(hc.fit(&blocks()[..1]).unwrap(), vec![0]);
	}
}

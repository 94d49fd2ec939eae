//! HDBSCAN density clustering for fingerprints

use std::collections::HashMap;

use hdbscan::{DistanceMetric, Hdbscan, HdbscanHyperParams};

use crate::core::Fingerprint;
use crate::error::{Error, Result};
use crate::processing::hierarchical::Metric;
use crate::processing::traits::Clustering;

#[derive(Debug, Clone, Copy)]
pub struct DensityClusterer {
	min_cluster_size: usize,
	min_samples: Option<usize>,
	metric: Metric,
}

impl DensityClusterer {
	pub fn new(min_cluster_size: usize, min_samples: Option<usize>) -> Result<Self> {
		if min_cluster_size < 2 {
			return Err(Error::parameter("min_cluster_size", "must be at least 2"));
		}
		if min_samples == Some(0) {
			return Err(Error::parameter("min_samples", "must be greater than zero"));
		}
		Ok(Self {
			min_cluster_size,
			min_samples,
			metric: Metric::Tanimoto,
		})
	}

	pub fn with_metric(mut self, metric: Metric) -> Self {
		self.metric = metric;
		self
	}

	pub fn metric(&self) -> Metric {
		self.metric
	}

	/// Rows handed to hdbscan: dense bits, or a full distance matrix for tanimoto
	fn rows(&self, fps: &[Fingerprint]) -> Result<Vec<Vec<f32>>> {
		match self.metric {
			Metric::Euclidean => Ok(fps.iter().map(|fp| fp.to_dense()).collect()),
			Metric::Tanimoto => {
				let n = fps.len();
				let mut matrix = vec![vec![0.0f32; n]; n];
				for i in 1..n {
					for j in 0..i {
						let d = self.metric.distance(&fps[i], &fps[j])? as f32;
						matrix[i][j] = d;
						matrix[j][i] = d;
					}
				}
				Ok(matrix)
			}
		}
	}
}

impl Clustering for DensityClusterer {
	fn fit_predict(&self, fps: &[Fingerprint]) -> Result<Vec<Option<usize>>> {
		if fps.is_empty() {
			return Err(Error::EmptyInput);
		}
		let n_features = fps[0].len();
		if let Some(other) = fps.iter().find(|fp| fp.len() != n_features) {
			return Err(Error::LengthMismatch {
				expected: n_features,
				found: other.len(),
			});
		}

		// core distances index the min_samples-th neighbor
		let min_samples = self.min_samples.unwrap_or(self.min_cluster_size);
		if min_samples > fps.len() {
			return Err(Error::InvalidClusterCount {
				requested: min_samples,
				n_items: fps.len(),
			});
		}

		let data = self.rows(fps)?;

		let builder = HdbscanHyperParams::builder()
			.min_cluster_size(self.min_cluster_size)
			.min_samples(min_samples);
		let hyper_params = match self.metric {
			Metric::Euclidean => builder.dist_metric(DistanceMetric::Euclidean).build(),
			Metric::Tanimoto => builder.dist_metric(DistanceMetric::Precalculated).build(),
		};

		let clusterer = Hdbscan::new(&data, hyper_params);
		let labels = clusterer.cluster().map_err(|e| Error::Backend {
			backend: "hdbscan",
			message: e.to_string(),
		})?;

		// renumber in order of first appearance; -1 is noise
		let mut ids: HashMap<i32, usize> = HashMap::new();
		Ok(labels
			.into_iter()
			.map(|label| {
				if label < 0 {
					return None;
				}
				let next = ids.len();
				Some(*ids.entry(label).or_insert(next))
			})
			.collect())
	}

	fn name(&self) -> &'static str {
		"hdbscan"
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::ErrorKind;

	fn block(offset: usize) -> Vec<Fingerprint> {
		(0..6)
			.map(|i| Fingerprint::from_on_bits(64, (offset..offset + 8).chain([offset + 8 + i])))
			.collect()
	}

	#[test]
	fn test_two_dense_blocks() {
		let mut fps = block(0);
		fps.extend(block(32));
		for metric in [Metric::Tanimoto, Metric::Euclidean] {
			let labels = DensityClusterer::new(3, None)
				.unwrap()
				.with_metric(metric)
				.fit_predict(&fps)
				.unwrap();
			assert_eq!(labels.len(), 12);
			assert!(labels[..6].iter().all(|l| l.is_some() && *l == labels[0]), "{}", metric);
			assert!(labels[6..].iter().all(|l| l.is_some() && *l == labels[6]), "{}", metric);
			assert_ne!(labels[0], labels[6]);
		}
	}

	#[test]
	fn test_fewer_items_than_min_samples() {
		let fps = block(0);
		let fps = &fps[..3];
		let err = DensityClusterer::new(5, None).unwrap().fit_predict(fps).unwrap_err();
		assert_eq!(err.kind(), ErrorKind::InvalidInput);
		assert!(matches!(err, Error::InvalidClusterCount { requested: 5, n_items: 3 }));

		let err = DensityClusterer::new(2, Some(4)).unwrap().fit_predict(fps).unwrap_err();
		assert!(matches!(err, Error::InvalidClusterCount { requested: 4, n_items: 3 }));

		let labels = DensityClusterer::new(2, Some(3)).unwrap().fit_predict(fps).unwrap();
		assert_eq!(labels.len(), 3);
	}

	#[test]
	fn test_metric_changes_grouping() {
		// two large scaffolds with four private bits each, plus five one-bit fragments
		let scaffold = |core: usize, tail: usize| -> Vec<Fingerprint> {
			(0..5)
				.map(|i| Fingerprint::from_on_bits(256, (core..core + 100).chain(tail + 4 * i..tail + 4 * i + 4)))
				.collect()
		};
		let mut fps = scaffold(0, 100);
		fps.extend(scaffold(120, 220));
		fps.extend((240..245).map(|b| Fingerprint::from_on_bits(256, [b])));
		assert_eq!(fps.len(), 15);

		let fit = |metric| {
			DensityClusterer::new(3, None)
				.unwrap()
				.with_metric(metric)
				.fit_predict(&fps)
				.unwrap()
		};

		// euclidean: fragments differ by two bits, scaffold members by eight
		let labels = fit(Metric::Euclidean);
		let fragment = labels[10];
		assert!(fragment.is_some());
		assert!(labels[10..].iter().all(|l| *l == fragment));
		assert!(labels[..10].iter().all(|l| *l != fragment));

		// tanimoto: fragments share nothing, scaffolds are near-identical
		let labels = fit(Metric::Tanimoto);
		assert!(labels[..5].iter().all(|l| l.is_some() && *l == labels[0]));
		assert!(labels[5..10].iter().all(|l| l.is_some() && *l == labels[5]));
		assert_ne!(labels[0], labels[5]);
		for label in labels[10..].iter().flatten() {
			assert!(labels[..10].contains(&Some(*label)), "fragments formed their own cluster");
		}
	}

	#[test]
	fn test_invalid_parameters() {
		assert_eq!(DensityClusterer::new(1, None).unwrap_err().kind(), ErrorKind::Configuration);
		assert_eq!(DensityClusterer::new(5, Some(0)).unwrap_err().kind(), ErrorKind::Configuration);
		assert_eq!(DensityClusterer::new(5, None).unwrap().metric(), Metric::Tanimoto);
		let err = DensityClusterer::new(5, None).unwrap().fit_predict(&[]).unwrap_err();
		assert_eq!(err.kind(), ErrorKind::InvalidInput);
	}
}

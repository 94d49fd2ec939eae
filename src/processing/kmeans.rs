//! K-means clustering of fingerprints via linfa

use linfa::prelude::*;
use linfa_clustering::KMeans;
use ndarray::{Array1, Array2};
use rand_xoshiro::rand_core::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;

use crate::config::{DEFAULT_KMEANS_MAX_ITER, DEFAULT_KMEANS_RUNS, DEFAULT_KMEANS_SEED, DEFAULT_KMEANS_TOLERANCE};
use crate::core::Fingerprint;
use crate::error::{Error, Result};
use crate::processing::traits::Clustering;

/// Dense 0/1 feature matrix, one row per fingerprint
pub(crate) fn feature_matrix(fps: &[Fingerprint]) -> Result<Array2<f64>> {
	let n_features = fps.first().map_or(0, Fingerprint::len);
	if let Some(other) = fps.iter().find(|fp| fp.len() != n_features) {
		return Err(Error::LengthMismatch {
			expected: n_features,
			found: other.len(),
		});
	}

	let mut data = Array2::<f64>::zeros((fps.len(), n_features));
	for (row, fp) in fps.iter().enumerate() {
		for bit in fp.on_bits() {
			data[[row, bit]] = 1.0;
		}
	}
	Ok(data)
}

/// K-means with k-means++ initialisation and several restarts
#[derive(Debug, Clone, Copy)]
pub struct KMeansClusterer {
	n_clusters: usize,
	max_iter: u64,
	n_init: usize,
	seed: u64,
}

/// Labels plus the within-cluster sum of squares of the fitted model
#[derive(Debug, Clone)]
pub struct KMeansFit {
	pub labels: Vec<usize>,
	pub inertia: f64,
}

impl KMeansClusterer {
	pub fn new(n_clusters: usize) -> Result<Self> {
		if n_clusters == 0 {
			return Err(Error::parameter("n_clusters", "must be greater than zero"));
		}
		Ok(Self {
			n_clusters,
			max_iter: DEFAULT_KMEANS_MAX_ITER,
			n_init: DEFAULT_KMEANS_RUNS,
			seed: DEFAULT_KMEANS_SEED,
		})
	}

	pub fn with_max_iter(mut self, max_iter: u64) -> Self {
		self.max_iter = max_iter.max(1);
		self
	}

	pub fn with_n_init(mut self, n_init: usize) -> Self {
		self.n_init = n_init.max(1);
		self
	}

	pub fn with_seed(mut self, seed: u64) -> Self {
		self.seed = seed;
		self
	}

	pub fn n_clusters(&self) -> usize {
		self.n_clusters
	}

	pub fn fit(&self, fps: &[Fingerprint]) -> Result<KMeansFit> {
		if fps.is_empty() {
			return Err(Error::EmptyInput);
		}
		if self.n_clusters > fps.len() {
			return Err(Error::InvalidClusterCount {
				requested: self.n_clusters,
				n_items: fps.len(),
			});
		}

		let records = feature_matrix(fps)?;
		let dataset = DatasetBase::from(records.clone());
		let rng = Xoshiro256Plus::seed_from_u64(self.seed);

		let model = KMeans::params_with_rng(self.n_clusters, rng)
			.max_n_iterations(self.max_iter)
			.n_runs(self.n_init)
			.tolerance(DEFAULT_KMEANS_TOLERANCE)
			.fit(&dataset)
			.map_err(|e| Error::Backend {
				backend: "kmeans",
				message: e.to_string(),
			})?;

		let labels: Array1<usize> = model.predict(&records);
		Ok(KMeansFit {
			labels: labels.to_vec(),
			inertia: model.inertia(),
		})
	}
}

impl Clustering for KMeansClusterer {
	fn fit_predict(&self, fps: &[Fingerprint]) -> Result<Vec<Option<usize>>> {
		let fit = self.fit(fps)?;
		Ok(fit.labels.into_iter().map(Some).collect())
	}

	fn name(&self) -> &'static str {
		"kmeans"
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
			Fingerprint::from_on_bits(16, [0, 1, 3, 4]),
			Fingerprint::from_on_bits(16, [10, 11, 12, 13]),
			Fingerprint::from_on_bits(16, [10, 11, 12, 14]),
			Fingerprint::from_on_bits(16, [10, 11, 13, 14]),
		]
	}

	#[test]
	fn test_feature_matrix() {
		let m = feature_matrix(&blocks()).unwrap();
		assert_eq!(m.shape(), &[6, 16]);
		assert_eq!(m[[0, 3]], 1.0);
		assert_eq!(m[[0, 4]], 0.0);
	}

	#[test]
	fn test_separates_blocks() {
		let fit = KMeansClusterer::new(2).unwrap().with_seed(7).fit(&blocks()).unwrap();
		let l = &fit.labels;
		assert_eq!(l[0], l[1]);
		assert_eq!(l[1], l[2]);
		assert_eq!(l[3], l[4]);
		assert_eq!(l[4], l[5]);
		assert_ne!(l[0], l[3]);
		assert!(fit.inertia >= 0.0);
	}

	#[test]
	fn test_invalid_counts() {
		assert_eq!(KMeansClusterer::new(0).unwrap_err().kind(), ErrorKind::Configuration);
		let err = KMeansClusterer::new(7).unwrap().fit(&blocks()).unwrap_err();
		assert_eq!(err.kind(), ErrorKind::InvalidInput);
		let err = KMeansClusterer::new(1).unwrap().fit(&[]).unwrap_err();
		assert_eq!(err.kind(), ErrorKind::InvalidInput);
	}
}

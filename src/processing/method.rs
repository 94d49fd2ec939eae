//! Clustering method selection

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::{
	DEFAULT_KMEANS_CLUSTERS, DEFAULT_KMEANS_MAX_ITER, DEFAULT_KMEANS_RUNS, DEFAULT_KMEANS_SEED,
	DEFAULT_MIN_CLUSTER_SIZE, DEFAULT_SIMILARITY_CUTOFF,
};
use crate::error::Result;
use crate::processing::butina::Butina;
use crate::processing::density::DensityClusterer;
use crate::processing::hierarchical::{HierarchicalClusterer, Linkage, Metric};
use crate::processing::kmeans::KMeansClusterer;
use crate::processing::traits::Clustering;

/// A clustering method together with its parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "lowercase")]
pub enum Method {
	Butina {
		similarity_cutoff: f64,
	},
	Kmeans {
		n_clusters: usize,
		max_iter: u64,
		n_init: usize,
		seed: u64,
	},
	Hierarchical {
		n_clusters: Option<usize>,
		distance_threshold: Option<f64>,
		linkage: Linkage,
		metric: Metric,
	},
	Hdbscan {
		min_cluster_size: usize,
		min_samples: Option<usize>,
		metric: Metric,
	},
}

impl Default for Method {
	fn default() -> Self {
		Method::Butina {
			similarity_cutoff: DEFAULT_SIMILARITY_CUTOFF,
		}
	}
}

impl Method {
	pub fn kmeans(n_clusters: usize) -> Self {
		Method::Kmeans {
			n_clusters,
			max_iter: DEFAULT_KMEANS_MAX_ITER,
			n_init: DEFAULT_KMEANS_RUNS,
			seed: DEFAULT_KMEANS_SEED,
		}
	}

	pub fn hdbscan() -> Self {
		Method::Hdbscan {
			min_cluster_size: DEFAULT_MIN_CLUSTER_SIZE,
			min_samples: None,
			metric: Metric::Tanimoto,
		}
	}

	pub fn name(&self) -> &'static str {
		match self {
			Method::Butina { .. } => "butina",
			Method::Kmeans { .. } => "kmeans",
			Method::Hierarchical { .. } => "hierarchical",
			Method::Hdbscan { .. } => "hdbscan",
		}
	}

	/// Validate the parameters and build the clusterer
	pub fn clusterer(&self) -> Result<Box<dyn Clustering + Send + Sync>> {
		Ok(match *self {
			Method::Butina { similarity_cutoff } => Box::new(Butina::new(similarity_cutoff)?),
			Method::Kmeans {
				n_clusters,
				max_iter,
				n_init,
				seed,
			} => Box::new(
				KMeansClusterer::new(n_clusters)?
					.with_max_iter(max_iter)
					.with_n_init(n_init)
					.with_seed(seed),
			),
			Method::Hierarchical {
				n_clusters,
				distance_threshold,
				linkage,
				metric,
			} => Box::new(HierarchicalClusterer::new(n_clusters, distance_threshold, linkage, metric)?),
			Method::Hdbscan {
				min_cluster_size,
				min_samples,
				metric,
			} => Box::new(DensityClusterer::new(min_cluster_size, min_samples)?.with_metric(metric)),
		})
	}
}

impl fmt::Display for Method {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Method::Butina { similarity_cutoff } => write!(f, "butina (similarity >= {})", similarity_cutoff),
			Method::Kmeans { n_clusters, n_init, seed, .. } => {
				write!(f, "kmeans (k={}, runs={}, seed={})", n_clusters, n_init, seed)
			}
			Method::Hierarchical {
				n_clusters,
				distance_threshold,
				linkage,
				metric,
			} => match (n_clusters, distance_threshold) {
				(_, Some(t)) => write!(f, "hierarchical ({}, {}, threshold={})", linkage, metric, t),
				(k, None) => write!(
					f,
					"hierarchical ({}, {}, k={})",
					linkage,
					metric,
					k.unwrap_or(crate::config::DEFAULT_HIERARCHICAL_CLUSTERS)
				),
			},
			Method::Hdbscan {
				min_cluster_size,
				min_samples,
				metric,
			} => match min_samples {
				Some(s) => write!(
					f,
					"hdbscan ({}, min_cluster_size={}, min_samples={})",
					metric, min_cluster_size, s
				),
				None => write!(f, "hdbscan ({}, min_cluster_size={})", metric, min_cluster_size),
			},
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::ErrorKind;

	#[test]
	fn test_default_is_butina() {
		assert_eq!(Method::default().name(), "butina");
		assert_eq!(Method::default().clusterer().unwrap().name(), "butina");
	}

	#[test]
	fn test_clusterer_validates() {
		let method = Method::Hierarchical {
			n_clusters: Some(3),
			distance_threshold: Some(0.4),
			linkage: Linkage::Average,
			metric: Metric::Tanimoto,
		};
		assert_eq!(method.clusterer().err().map(|e| e.kind()), Some(ErrorKind::Configuration));
		assert!(Method::kmeans(0).clusterer().is_err());
		assert_eq!(Method::hdbscan().clusterer().unwrap().name(), "hdbscan");
	}

	#[test]
	fn test_serializes_with_tag() {
		let json = serde_json::to_value(Method::kmeans(4)).unwrap();
		assert_eq!(json["name"], "kmeans");
		assert_eq!(json["n_clusters"], 4);

		let json = serde_json::to_value(Method::hdbscan()).unwrap();
		assert_eq!(json["metric"], "tanimoto");
	}
}

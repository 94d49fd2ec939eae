//! Cluster assignments and reports

use serde::{Deserialize, Serialize};

use crate::processing::Method;

/// Partition of `n` items into clusters, labelled in discovery order
///
/// Every item belongs to exactly one cluster. The first member of each
/// cluster is the seed it was grown from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterAssignment {
	labels: Vec<usize>,
	clusters: Vec<Vec<usize>>,
}

impl ClusterAssignment {
	/// Build from member lists; `clusters[id]` holds the items of cluster `id`
	pub(crate) fn from_clusters(n_items: usize, clusters: Vec<Vec<usize>>) -> Self {
		let mut labels = vec![0; n_items];
		for (id, members) in clusters.iter().enumerate() {
			for &item in members {
				labels[item] = id;
			}
		}
		Self { labels, clusters }
	}

	pub fn labels(&self) -> &[usize] {
		&self.labels
	}

	pub fn label(&self, item: usize) -> usize {
		self.labels[item]
	}

	pub fn n_items(&self) -> usize {
		self.labels.len()
	}

	pub fn n_clusters(&self) -> usize {
		self.clusters.len()
	}

	pub fn clusters(&self) -> &[Vec<usize>] {
		&self.clusters
	}

	pub fn members(&self, id: usize) -> &[usize] {
		&self.clusters[id]
	}

	/// Item the cluster was grown from
	pub fn seed(&self, id: usize) -> usize {
		self.clusters[id][0]
	}

	pub fn into_labels(self) -> Vec<usize> {
		self.labels
	}
}

/// A single cluster of structurally similar molecules
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cluster {
	/// Cluster ID (discovery order for Butina, else sorted by size)
	pub id: usize,
	/// Names of the member molecules
	pub members: Vec<String>,
	/// Seed or medoid of the cluster
	pub representative: String,
	/// Mean pairwise Tanimoto similarity within the cluster (0.0-1.0)
	pub cohesion: f32,
}

impl Cluster {
	pub fn size(&self) -> usize {
		self.members.len()
	}
}

/// Complete clustering result for one input file
#[derive(Debug, Serialize, Deserialize)]
pub struct ClusterReport {
	/// molcluster version that created this
	pub version: String,
	/// When clustering was performed
	pub timestamp: String,
	/// Method and parameters used
	pub method: Method,
	/// Fingerprint scheme description
	pub fingerprint: String,
	pub clusters: Vec<Cluster>,
	/// Molecules not assigned to any cluster
	pub noise: Vec<String>,
	pub total_molecules: usize,
}

impl ClusterReport {
	pub fn noise_percent(&self) -> f32 {
		if self.total_molecules == 0 {
			0.0
		} else {
			(self.noise.len() as f32 / self.total_molecules as f32) * 100.0
		}
	}

	pub fn singleton_count(&self) -> usize {
		self.clusters.iter().filter(|c| c.size() == 1).count()
	}
}

//! Clustering traits

use crate::core::Fingerprint;
use crate::error::Result;

/// A configured clustering algorithm over fingerprints
pub trait Clustering {
	/// Cluster label per fingerprint; `None` marks noise
	fn fit_predict(&self, fps: &[Fingerprint]) -> Result<Vec<Option<usize>>>;

	/// Short algorithm name used in logs and reports
	fn name(&self) -> &'static str;
}

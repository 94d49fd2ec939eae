//! Application configuration and constants

use std::sync::OnceLock;

static THREAD_POOL: OnceLock<usize> = OnceLock::new();

// === Fingerprints ===
pub const DEFAULT_NBITS: usize = 2048;
pub const DEFAULT_RADIUS: u32 = 2;
pub const PATH_FP_NBITS: usize = 2048;
pub const PATH_MAX_BONDS: usize = 7;
pub const PATH_BITS_PER_FEATURE: u64 = 2;
pub const ATOM_PAIR_NBITS: usize = 2048;
pub const ATOM_PAIR_MAX_DISTANCE: usize = 30;

// === Clustering Defaults ===
pub const DEFAULT_SIMILARITY_CUTOFF: f64 = 0.65;
pub const DEFAULT_KMEANS_CLUSTERS: usize = 10;
pub const DEFAULT_KMEANS_MAX_ITER: u64 = 500;
pub const DEFAULT_KMEANS_RUNS: usize = 10;
pub const DEFAULT_KMEANS_TOLERANCE: f64 = 1e-4;
pub const DEFAULT_KMEANS_SEED: u64 = 42;
pub const DEFAULT_HIERARCHICAL_CLUSTERS: usize = 2;
pub const DEFAULT_MIN_CLUSTER_SIZE: usize = 5;

// === Output ===
pub const DEFAULT_PREVIEW: usize = 5;
pub const NOISE_PREVIEW: usize = 10;

pub const THREADS_ENV: &str = "MOLCLUSTER_THREADS";

/// Resolve worker threads: explicit flag, then MOLCLUSTER_THREADS, else rayon default
pub fn resolve_threads(flag: Option<usize>) -> Option<usize> {
	if let Some(n) = flag.filter(|&n| n > 0) {
		return Some(n);
	}

	match std::env::var(THREADS_ENV) {
		Ok(value) => match value.trim().parse::<usize>() {
			Ok(n) if n > 0 => {
				crate::ui::debug(&format!("Using {}={}", THREADS_ENV, n));
				Some(n)
			}
			_ => {
				crate::ui::warn(&format!("Ignoring invalid {}='{}'", THREADS_ENV, value));
				None
			}
		},
		Err(_) => None,
	}
}

/// Size the global rayon pool once; later calls are no-ops
pub fn init_thread_pool(threads: Option<usize>) {
	let Some(n) = resolve_threads(threads) else {
		return;
	};

	THREAD_POOL.get_or_init(|| {
		if let Err(e) = rayon::ThreadPoolBuilder::new().num_threads(n).build_global() {
			crate::ui::warn(&format!("Could not configure thread pool: {}", e));
		}
		n
	});
}

/// Threads configured through [`init_thread_pool`], if any
pub fn configured_threads() -> Option<usize> {
	THREAD_POOL.get().copied()
}

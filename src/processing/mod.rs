//! Fingerprinting and clustering pipeline

pub mod butina;
pub mod cluster;
pub mod density;
pub mod distance;
pub mod fingerprint;
pub mod hierarchical;
pub mod input;
pub mod kmeans;
pub mod method;
pub mod smiles;
pub mod traits;

pub use butina::{Butina, ThresholdClusterAssigner};
pub use cluster::cluster_fingerprints;
pub use density::DensityClusterer;
pub use distance::{tanimoto_distances, PairwiseDistanceBuilder, SimilarityMeasure};
pub use fingerprint::{FingerprintGenerator, FingerprintScheme};
pub use hierarchical::{Cut, HierarchicalClusterer, Linkage, Metric};
pub use input::{load_smiles_file, Dataset, Record};
pub use kmeans::{KMeansClusterer, KMeansFit};
pub use method::Method;
pub use traits::Clustering;

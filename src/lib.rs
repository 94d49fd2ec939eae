//! # molcluster
//!
//! Fingerprint-based clustering of molecular datasets.
//! Parses SMILES, computes structural fingerprints and groups molecules
//! with Butina threshold clustering or k-means, hierarchical and HDBSCAN
//! backends.

pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod error;
pub mod processing;
pub mod ui;

pub use crate::core::{ClusterAssignment, DistanceList, Fingerprint, Molecule, Similarity};
pub use error::{Error, ErrorKind, Result};
pub use processing::{
	Butina, Clustering, FingerprintGenerator, FingerprintScheme, PairwiseDistanceBuilder, ThresholdClusterAssigner,
};

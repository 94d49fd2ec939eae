//! Core domain types

pub mod cluster;
pub mod distance;
pub mod fingerprint;
pub mod hash;
pub mod molecule;

pub use cluster::{Cluster, ClusterAssignment, ClusterReport};
pub use distance::{pair_count, DistanceList};
pub use fingerprint::{Fingerprint, Similarity};
pub use hash::FeatureHash;
pub use molecule::{Atom, Bond, BondOrder, Molecule, RingInfo};

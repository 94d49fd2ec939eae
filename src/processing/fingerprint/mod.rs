//! Fingerprint generation
//!
//! Four schemes are available:
//!
//! | Name | Aliases | Features | Length |
//! |------|---------|----------|--------|
//! | `structural-hash` | `rdkit` | linear bond paths of 1..=7 bonds | 2048 |
//! | `circular-bits` | `morgan`, `morgan2` | circular atom environments | configurable (2048) |
//! | `substructure-keys` | `maccs` | fixed table of structural keys | one bit per key |
//! | `atom-pair` | `ap` | (atom type, distance, atom type) triples | 2048 |
//!
//! Hashed schemes fold each feature into the bit vector with xxh3. Generation
//! is a pure function of the molecule and scheme; [`FingerprintGenerator::generate_all`]
//! runs it in parallel over a collection.

mod atom_pair;
mod circular;
mod keys;
mod path;

use std::fmt;
use std::str::FromStr;

use rayon::prelude::*;

use crate::config::{ATOM_PAIR_NBITS, DEFAULT_NBITS, DEFAULT_RADIUS, PATH_FP_NBITS};
use crate::core::{Fingerprint, Molecule};
use crate::error::{Error, Result};

/// Fingerprint scheme selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FingerprintScheme {
	StructuralHash,
	CircularBits { nbits: usize, radius: u32 },
	SubstructureKeys,
	AtomPair,
}

impl FingerprintScheme {
	pub const NAMES: [&'static str; 4] = [
		"structural-hash",
		"circular-bits",
		"substructure-keys",
		"atom-pair",
	];

	/// Circular fingerprint with the default length and radius
	pub fn circular() -> Self {
		FingerprintScheme::CircularBits {
			nbits: DEFAULT_NBITS,
			radius: DEFAULT_RADIUS,
		}
	}

	/// Resolve a scheme name; `nbits` and `radius` apply to circular bits only
	pub fn from_name(name: &str, nbits: usize, radius: u32) -> Result<Self> {
		let scheme = match name.trim().to_ascii_lowercase().as_str() {
			"structural-hash" | "rdkit" => FingerprintScheme::StructuralHash,
			"circular-bits" | "morgan" | "morgan2" => FingerprintScheme::CircularBits { nbits, radius },
			"substructure-keys" | "maccs" => FingerprintScheme::SubstructureKeys,
			"atom-pair" | "ap" => FingerprintScheme::AtomPair,
			_ => return Err(Error::UnknownScheme(name.to_string())),
		};
		scheme.validate()?;
		Ok(scheme)
	}

	pub fn name(&self) -> &'static str {
		match self {
			FingerprintScheme::StructuralHash => Self::NAMES[0],
			FingerprintScheme::CircularBits { .. } => Self::NAMES[1],
			FingerprintScheme::SubstructureKeys => Self::NAMES[2],
			FingerprintScheme::AtomPair => Self::NAMES[3],
		}
	}

	/// Length of fingerprints produced by this scheme
	pub fn nbits(&self) -> usize {
		match self {
			FingerprintScheme::StructuralHash => PATH_FP_NBITS,
			FingerprintScheme::CircularBits { nbits, .. } => *nbits,
			FingerprintScheme::SubstructureKeys => keys::key_count(),
			FingerprintScheme::AtomPair => ATOM_PAIR_NBITS,
		}
	}

	/// Key names by bit position, for schemes whose bits have fixed meanings
	pub fn bit_labels(&self) -> Option<Vec<&'static str>> {
		match self {
			FingerprintScheme::SubstructureKeys => Some(keys::key_names().collect()),
			_ => None,
		}
	}

	fn validate(&self) -> Result<()> {
		if let FingerprintScheme::CircularBits { nbits, .. } = self {
			if *nbits == 0 {
				return Err(Error::parameter("nbits", "must be greater than zero"));
			}
		}
		Ok(())
	}
}

impl Default for FingerprintScheme {
	fn default() -> Self {
		FingerprintScheme::StructuralHash
	}
}

impl FromStr for FingerprintScheme {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self> {
		Self::from_name(s, DEFAULT_NBITS, DEFAULT_RADIUS)
	}
}

impl fmt::Display for FingerprintScheme {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			FingerprintScheme::CircularBits { nbits, radius } => {
				write!(f, "{} (nbits={}, radius={})", self.name(), nbits, radius)
			}
			_ => write!(f, "{}", self.name()),
		}
	}
}

/// Converts molecules into fingerprints under one scheme
#[derive(Debug, Clone, Copy)]
pub struct FingerprintGenerator {
	scheme: FingerprintScheme,
}

impl FingerprintGenerator {
	pub fn new(scheme: FingerprintScheme) -> Result<Self> {
		scheme.validate()?;
		Ok(Self { scheme })
	}

	pub fn scheme(&self) -> FingerprintScheme {
		self.scheme
	}

	pub fn generate(&self, mol: &Molecule) -> Fingerprint {
		match self.scheme {
			FingerprintScheme::StructuralHash => path::fingerprint(mol, PATH_FP_NBITS),
			FingerprintScheme::CircularBits { nbits, radius } => circular::fingerprint(mol, nbits, radius),
			FingerprintScheme::SubstructureKeys => keys::fingerprint(mol),
			FingerprintScheme::AtomPair => atom_pair::fingerprint(mol, ATOM_PAIR_NBITS),
		}
	}

	/// Fingerprint every molecule on the rayon pool, preserving input order
	pub fn generate_all(&self, mols: &[Molecule]) -> Vec<Fingerprint> {
		mols.par_iter().map(|m| self.generate(m)).collect()
	}
}

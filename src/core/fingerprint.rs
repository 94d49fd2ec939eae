//! Fixed-length bit-vector fingerprints and set similarities

use bitvec::prelude::*;

use crate::error::{Error, Result};

/// Storage for fingerprint bits.
pub type Bits = BitVec<u64, Lsb0>;

/// Immutable fixed-length binary descriptor of one structure
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(Bits);

impl Fingerprint {
	/// Build from on-bit positions; positions must be `< len`
	pub fn from_on_bits(len: usize, on_bits: impl IntoIterator<Item = usize>) -> Self {
		let mut bits = bitvec![u64, Lsb0; 0; len];
		for idx in on_bits {
			bits.set(idx, true);
		}
		Self(bits)
	}

	pub fn from_bits(bits: Bits) -> Self {
		Self(bits)
	}

	/// Number of bits
	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn count_ones(&self) -> usize {
		self.0.count_ones()
	}

	pub fn contains(&self, bit: usize) -> bool {
		self.0.get(bit).map(|b| *b).unwrap_or(false)
	}

	pub fn on_bits(&self) -> impl Iterator<Item = usize> + '_ {
		self.0.iter_ones()
	}

	pub fn as_bits(&self) -> &BitSlice<u64, Lsb0> {
		&self.0
	}

	/// Dense 0/1 feature vector for numeric backends
	pub fn to_dense<T: From<u8>>(&self) -> Vec<T> {
		self.0.iter().map(|b| T::from(u8::from(*b))).collect()
	}

	/// (|A and B|, |A or B|)
	fn overlap(&self, other: &Self) -> Result<(usize, usize)> {
		if self.len() != other.len() {
			return Err(Error::LengthMismatch {
				expected: self.len(),
				found: other.len(),
			});
		}
		let (common, union) = self
			.0
			.as_raw_slice()
			.iter()
			.zip(other.0.as_raw_slice())
			.fold((0u32, 0u32), |(c, u), (a, b)| {
				(c + (a & b).count_ones(), u + (a | b).count_ones())
			});
		Ok((common as usize, union as usize))
	}

	/// Tanimoto (Jaccard) similarity; two empty fingerprints are identical (1.0)
	pub fn tanimoto(&self, other: &Self) -> Result<f64> {
		let (common, union) = self.overlap(other)?;
		if union == 0 {
			return Ok(1.0);
		}
		Ok(common as f64 / union as f64)
	}

	/// Number of positions where the two fingerprints differ
	pub fn hamming(&self, other: &Self) -> Result<usize> {
		let (common, union) = self.overlap(other)?;
		Ok(union - common)
	}

	/// Dice similarity: 2|A and B| / (|A| + |B|)
	pub fn dice(&self, other: &Self) -> Result<f64> {
		let (common, _) = self.overlap(other)?;
		let total = self.count_ones() + other.count_ones();
		if total == 0 {
			return Ok(1.0);
		}
		Ok(2.0 * common as f64 / total as f64)
	}
}

/// Built-in similarity measures over fingerprints
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Similarity {
	#[default]
	Tanimoto,
	Dice,
}

impl Similarity {
	pub fn compute(self, a: &Fingerprint, b: &Fingerprint) -> Result<f64> {
		match self {
			Similarity::Tanimoto => a.tanimoto(b),
			Similarity::Dice => a.dice(b),
		}
	}
}

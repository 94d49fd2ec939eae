//! Condensed lower-triangular distance list

use crate::error::{Error, Result};

/// Number of unordered pairs among `n` items
pub fn pair_count(n: usize) -> usize {
	n * n.saturating_sub(1) / 2
}

/// Pairwise distances in canonical order: (1,0), (2,0), (2,1), (3,0), ...
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceList {
	n_items: usize,
	values: Vec<f64>,
}

impl DistanceList {
	/// Wrap raw distances, checking the length against `n_items`
	pub fn new(n_items: usize, values: Vec<f64>) -> Result<Self> {
		let expected = pair_count(n_items);
		if values.len() != expected {
			return Err(Error::DistanceLength {
				n_items,
				expected,
				found: values.len(),
			});
		}
		Ok(Self { n_items, values })
	}

	pub fn n_items(&self) -> usize {
		self.n_items
	}

	pub fn len(&self) -> usize {
		self.values.len()
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	pub fn as_slice(&self) -> &[f64] {
		&self.values
	}

	/// Distance between two items; 0.0 on the diagonal
	pub fn get(&self, i: usize, j: usize) -> f64 {
		match i.cmp(&j) {
			std::cmp::Ordering::Equal => 0.0,
			std::cmp::Ordering::Greater => self.values[index(i, j)],
			std::cmp::Ordering::Less => self.values[index(j, i)],
		}
	}

	/// Iterate `(i, j, distance)` with `i > j` in storage order
	pub fn pairs(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
		(1..self.n_items)
			.flat_map(|i| (0..i).map(move |j| (i, j)))
			.zip(self.values.iter())
			.map(|((i, j), &d)| (i, j, d))
	}
}

/// Position of pair (i, j), i > j
#[inline]
pub fn index(i: usize, j: usize) -> usize {
	debug_assert!(i > j);
	i * (i - 1) / 2 + j
}

//! Library error type

use thiserror::Error;

/// Broad category of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
	/// Unknown scheme, linkage or an invalid parameter combination.
	Configuration,
	/// Inputs that violate a length, range or shape requirement.
	InvalidInput,
	/// Malformed structural input.
	Parse,
	/// An external clustering library reported a failure.
	Backend,
}

/// Errors returned by fingerprinting and clustering.
#[derive(Debug, Error)]
pub enum Error {
	/// Fingerprint scheme name is not one of the supported schemes.
	#[error("unsupported fingerprint scheme '{0}'")]
	UnknownScheme(String),

	/// Parameter value or combination rejected at configuration time.
	#[error("invalid parameter {name}: {message}")]
	InvalidParameter {
		name: &'static str,
		message: String,
	},

	/// Distance list does not hold one entry per unordered pair.
	#[error("distance list has {found} entries, expected {expected} for {n_items} items")]
	DistanceLength {
		n_items: usize,
		expected: usize,
		found: usize,
	},

	/// Distance cutoff outside [0, 1].
	#[error("cutoff {0} is outside [0, 1]")]
	CutoffOutOfRange(f64),

	/// A distance entry is NaN.
	#[error("distance at position {0} is NaN")]
	NanDistance(usize),

	/// Fingerprints being compared have different lengths.
	#[error("fingerprint length mismatch: expected {expected}, found {found}")]
	LengthMismatch { expected: usize, found: usize },

	/// Requested cluster count is incompatible with the dataset.
	#[error("invalid cluster count: requested {requested}, but dataset has {n_items} items")]
	InvalidClusterCount { requested: usize, n_items: usize },

	/// Dataset is empty.
	#[error("empty input")]
	EmptyInput,

	/// SMILES string could not be parsed.
	#[error("failed to parse SMILES '{smiles}' at position {position}: {reason}")]
	Smiles {
		smiles: String,
		position: usize,
		reason: String,
	},

	/// External clustering backend failed.
	#[error("{backend} clustering failed: {message}")]
	Backend {
		backend: &'static str,
		message: String,
	},
}

impl Error {
	pub fn kind(&self) -> ErrorKind {
		match self {
			Error::UnknownScheme(_) | Error::InvalidParameter { .. } => ErrorKind::Configuration,
			Error::DistanceLength { .. }
			| Error::CutoffOutOfRange(_)
			| Error::NanDistance(_)
			| Error::LengthMismatch { .. }
			| Error::InvalidClusterCount { .. }
			| Error::EmptyInput => ErrorKind::InvalidInput,
			Error::Smiles { .. } => ErrorKind::Parse,
			Error::Backend { .. } => ErrorKind::Backend,
		}
	}

	pub(crate) fn parameter(name: &'static str, message: impl Into<String>) -> Self {
		Error::InvalidParameter {
			name,
			message: message.into(),
		}
	}
}

/// Result type used by the library layer.
pub type Result<T> = std::result::Result<T, Error>;

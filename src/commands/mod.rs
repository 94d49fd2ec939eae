//! # Command Implementations
//!
//! Each submodule handles one CLI command.

pub mod cluster;
pub mod fingerprint;

use std::path::Path;

use anyhow::Result;

use crate::cli::FingerprintArgs;
use crate::processing::FingerprintScheme;
use crate::ui;

fn resolve_scheme(args: &FingerprintArgs) -> Result<FingerprintScheme> {
	Ok(FingerprintScheme::from_name(&args.scheme, args.nbits, args.radius)?)
}

/// Write `text` to a file, or to stdout when the path is `-`
fn write_output(text: &str, path: &Path) -> Result<()> {
	if path.to_str() == Some("-") || path.as_os_str().is_empty() {
		println!("{}", text);
	} else {
		std::fs::write(path, text)?;
		ui::success(&format!("Exported to {}", path.display()));
	}
	Ok(())
}

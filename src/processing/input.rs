//! SMILES file loading

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::core::Molecule;
use crate::ui;

/// One parsed line of an input file
#[derive(Debug, Clone)]
pub struct Record {
	pub name: String,
	pub smiles: String,
	pub molecule: Molecule,
}

/// Parsed records plus the number of lines that failed to parse
#[derive(Debug, Default)]
pub struct Dataset {
	pub records: Vec<Record>,
	pub skipped: usize,
}

impl Dataset {
	pub fn len(&self) -> usize {
		self.records.len()
	}

	pub fn is_empty(&self) -> bool {
		self.records.is_empty()
	}

	pub fn names(&self) -> Vec<String> {
		self.records.iter().map(|r| r.name.clone()).collect()
	}

	pub fn molecules(&self) -> Vec<Molecule> {
		self.records.iter().map(|r| r.molecule.clone()).collect()
	}
}

/// Load a `SMILES [name]` file; blank and `#` lines are skipped
pub fn load_smiles_file(path: &Path) -> Result<Dataset> {
	let text = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
	Ok(parse_smiles_lines(&text))
}

/// Parse `SMILES [name]` lines; bad lines are reported and skipped
pub fn parse_smiles_lines(text: &str) -> Dataset {
	let mut dataset = Dataset::default();

	for (idx, line) in text.lines().enumerate() {
		let line_no = idx + 1;
		let line = line.trim();
		if line.is_empty() || line.starts_with('#') {
			continue;
		}

		// the name is the rest of the line, spaces included
		let (smiles, name) = match line.split_once(char::is_whitespace) {
			Some((smiles, rest)) => (smiles, rest.trim().to_string()),
			None => (line, format!("mol_{}", line_no)),
		};

		match Molecule::from_smiles(smiles) {
			Ok(molecule) => dataset.records.push(Record {
				name,
				smiles: smiles.to_string(),
				molecule,
			}),
			Err(e) => {
				ui::warn(&format!("Line {}: {}", line_no, e));
				dataset.skipped += 1;
			}
		}
	}

	ui::debug(&format!(
		"Parsed {} molecules, skipped {}",
		dataset.len(),
		dataset.skipped
	));
	dataset
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	#[test]
	fn test_parse_lines() {
		let text = "# header\nCCO ethanol\n\nc1ccccc1\nC1CC bad_ring\nCC(=O)O acetic acid\nCCCl\t 1-chloropropane \n";
		let dataset = parse_smiles_lines(text);
		assert_eq!(dataset.names(), vec!["ethanol", "mol_4", "acetic acid", "1-chloropropane"]);
		assert_eq!(dataset.skipped, 1);
		assert_eq!(dataset.records[1].smiles, "c1ccccc1");
	}

	#[test]
	fn test_load_file() {
		let mut file = tempfile::NamedTempFile::new().unwrap();
		writeln!(file, "CCN ethylamine").unwrap();
		writeln!(file, "CCC").unwrap();
		let dataset = load_smiles_file(file.path()).unwrap();
		assert_eq!(dataset.len(), 2);
		assert_eq!(dataset.names()[1], "mol_2");
	}

	#[test]
	fn test_missing_file() {
		assert!(load_smiles_file(Path::new("/nonexistent/input.smi")).is_err());
	}
}

//! Fingerprint command - compute and dump fingerprints

use std::path::Path;

use anyhow::{Context, Result};
use colored::*;
use serde::Serialize;

use crate::cli::FingerprintArgs;
use crate::processing::{load_smiles_file, FingerprintGenerator};
use crate::ui;

use super::resolve_scheme;

#[derive(Debug, Serialize)]
struct FingerprintExport {
	scheme: String,
	nbits: usize,
	molecules: Vec<FingerprintEntry>,
}

#[derive(Debug, Serialize)]
struct FingerprintEntry {
	name: String,
	smiles: String,
	on_bits: Vec<usize>,
	/// Names of the set keys, for substructure keys
	#[serde(skip_serializing_if = "Option::is_none")]
	on_keys: Option<Vec<&'static str>>,
}

pub fn run(input: &Path, fingerprint: &FingerprintArgs, export: Option<&Path>) -> Result<()> {
	let scheme = resolve_scheme(fingerprint)?;
	let generator = FingerprintGenerator::new(scheme)?;

	let dataset = load_smiles_file(input)?;
	if dataset.is_empty() {
		anyhow::bail!("No valid molecules in {}", input.display());
	}
	ui::success(&format!("Loaded {} molecules", dataset.len()));

	let fps = generator.generate_all(&dataset.molecules());

	if let Some(export_path) = export {
		let labels = scheme.bit_labels();
		let export = FingerprintExport {
			scheme: scheme.to_string(),
			nbits: scheme.nbits(),
			molecules: dataset
				.records
				.iter()
				.zip(&fps)
				.map(|(record, fp)| FingerprintEntry {
					name: record.name.clone(),
					smiles: record.smiles.clone(),
					on_bits: fp.on_bits().collect(),
					on_keys: labels.as_ref().map(|names| fp.on_bits().map(|b| names[b]).collect()),
				})
				.collect(),
		};
		let json = serde_json::to_string_pretty(&export).context("Failed to serialize fingerprints")?;
		return super::write_output(&json, export_path);
	}

	ui::header(&format!("{} ({} bits)", scheme, scheme.nbits()));
	for (record, fp) in dataset.records.iter().zip(&fps) {
		let density = fp.count_ones() as f32 / fp.len().max(1) as f32 * 100.0;
		println!(
			"  {} {} {}",
			ui::truncate(&record.name, 30).bright_white(),
			format!("{} on", fp.count_ones()).bright_cyan(),
			format!("({:.1}%)", density).dimmed()
		);
	}

	Ok(())
}

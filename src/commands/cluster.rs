//! Cluster command - group molecules by fingerprint similarity

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use colored::*;

use crate::cli::{FingerprintArgs, MethodArgs};
use crate::config::NOISE_PREVIEW;
use crate::core::ClusterReport;
use crate::processing::{cluster_fingerprints, load_smiles_file, FingerprintGenerator};
use crate::ui;

use super::resolve_scheme;

pub fn run(
	input: &Path,
	fingerprint: &FingerprintArgs,
	method: MethodArgs,
	preview_count: usize,
	export: Option<&Path>,
) -> Result<()> {
	let start = Instant::now();
	let method = method.into_method();
	let scheme = resolve_scheme(fingerprint)?;

	ui::debug(&format!(
		"Starting clustering: input={}, method={}, fingerprint={}, threads={}",
		input.display(),
		method,
		scheme,
		crate::config::configured_threads().unwrap_or_else(rayon::current_num_threads)
	));

	// Validate parameters before any work is done
	method.clusterer()?;

	ui::info(&format!("Loading molecules from {}", ui::path_link(input, 40)));
	let dataset = load_smiles_file(input)?;

	if dataset.is_empty() {
		anyhow::bail!("No valid molecules in {}", input.display());
	}
	if dataset.skipped > 0 {
		ui::warn(&format!("Skipped {} unparsable lines", dataset.skipped));
	}
	ui::success(&format!("Loaded {} molecules", dataset.len()));

	let generator = FingerprintGenerator::new(scheme)?;
	let fp_start = Instant::now();
	let fps = generator.generate_all(&dataset.molecules());
	ui::debug(&format!(
		"Generated {} {} fingerprints in {:.2}s",
		fps.len(),
		scheme.name(),
		fp_start.elapsed().as_secs_f32()
	));

	let report = cluster_fingerprints(&dataset.names(), &fps, method, scheme)?;

	if !report.clusters.is_empty() {
		let sizes: Vec<usize> = report.clusters.iter().map(|c| c.size()).collect();
		let avg_size = sizes.iter().sum::<usize>() as f32 / sizes.len() as f32;
		let max_size = sizes.iter().max().unwrap_or(&0);
		ui::debug(&format!(
			"Cluster sizes: max={}, avg={:.1}, singletons={}",
			max_size,
			avg_size,
			report.singleton_count()
		));
	}

	if let Some(export_path) = export {
		return export_report(&report, export_path);
	}

	print_clusters(&report, preview_count);
	eprintln!(
		"\n{}",
		format!("Completed in {:.1}s", start.elapsed().as_secs_f32()).dimmed()
	);

	Ok(())
}

fn print_clusters(report: &ClusterReport, preview_count: usize) {
	ui::success(&format!(
		"{} clusters, {} molecules, {} noise ({:.1}%)",
		report.clusters.len(),
		report.total_molecules,
		report.noise.len(),
		report.noise_percent()
	));

	for cluster in &report.clusters {
		eprintln!(
			"\n{} {} ({} molecules, {:.1}% cohesion)",
			"Cluster".bright_white(),
			cluster.id.to_string().bright_cyan(),
			cluster.size(),
			cluster.cohesion * 100.0
		);

		eprintln!(
			"  {}: {}",
			"Representative".dimmed(),
			ui::truncate(&cluster.representative, 60).bright_white()
		);

		for (i, name) in cluster.members.iter().take(preview_count).enumerate() {
			eprintln!("  {} {}", format!("[{}]", i + 1).dimmed(), ui::truncate(name, 60));
		}

		if cluster.size() > preview_count {
			eprintln!(
				"  {}",
				format!("... and {} more", cluster.size() - preview_count).dimmed()
			);
		}
	}

	if !report.noise.is_empty() {
		eprintln!("\n{} ({} molecules)", "Noise".bright_yellow(), report.noise.len());
		for name in report.noise.iter().take(NOISE_PREVIEW) {
			eprintln!("  {}", ui::truncate(name, 60));
		}
		if report.noise.len() > NOISE_PREVIEW {
			eprintln!(
				"  {}",
				format!("... and {} more", report.noise.len() - NOISE_PREVIEW).dimmed()
			);
		}
	}
}

fn export_report(report: &ClusterReport, export_path: &Path) -> Result<()> {
	let json = serde_json::to_string_pretty(report).context("Failed to serialize clusters")?;
	super::write_output(&json, export_path)
}

//! Cluster report construction

use anyhow::{Context, Result};
use rayon::prelude::*;

use crate::core::{Cluster, ClusterReport, Fingerprint};
use crate::processing::butina::Butina;
use crate::processing::fingerprint::FingerprintScheme;
use crate::processing::Method;
use crate::ui;

/// Member indices of one cluster and, when known, the seed it grew from
struct Group {
	members: Vec<usize>,
	seed: Option<usize>,
}

/// Clusters fingerprints with `method` and summarises the result
pub fn cluster_fingerprints(
	names: &[String],
	fps: &[Fingerprint],
	method: Method,
	scheme: FingerprintScheme,
) -> Result<ClusterReport> {
	if fps.is_empty() {
		anyhow::bail!("No molecules found to cluster");
	}
	if names.len() != fps.len() {
		anyhow::bail!("{} names for {} fingerprints", names.len(), fps.len());
	}

	ui::info(&format!("Clustering {} molecules with {}", fps.len(), method));

	let mut noise: Vec<String> = Vec::new();
	let groups: Vec<Group> = match method {
		Method::Butina { similarity_cutoff } => {
			let assignment = Butina::new(similarity_cutoff)?
				.fit(fps)
				.context("Butina clustering failed")?;
			assignment
				.clusters()
				.iter()
				.map(|members| Group {
					members: members.clone(),
					seed: members.first().copied(),
				})
				.collect()
		}
		_ => {
			let clusterer = method.clusterer()?;
			let labels = clusterer
				.fit_predict(fps)
				.with_context(|| format!("{} clustering failed", clusterer.name()))?;

			let mut groups: Vec<Group> = Vec::new();
			for (idx, label) in labels.into_iter().enumerate() {
				match label {
					Some(id) => {
						if groups.len() <= id {
							groups.resize_with(id + 1, || Group {
								members: Vec::new(),
								seed: None,
							});
						}
						groups[id].members.push(idx);
					}
					None => noise.push(names[idx].clone()),
				}
			}
			groups.retain(|g| !g.members.is_empty());
			// largest first
			groups.sort_by(|a, b| b.members.len().cmp(&a.members.len()));
			groups
		}
	};

	let clusters: Vec<Cluster> = groups
		.into_par_iter()
		.enumerate()
		.map(|(id, group)| -> crate::Result<Cluster> {
			let representative = match group.seed {
				Some(seed) => seed,
				None => find_medoid(&group.members, fps)?,
			};
			Ok(Cluster {
				id,
				members: group.members.iter().map(|&i| names[i].clone()).collect(),
				representative: names[representative].clone(),
				cohesion: compute_cohesion(&group.members, fps)?,
			})
		})
		.collect::<crate::Result<_>>()
		.context("Failed to summarise clusters")?;

	ui::debug(&format!(
		"Found {} clusters and {} noise points",
		clusters.len(),
		noise.len()
	));

	Ok(ClusterReport {
		version: env!("CARGO_PKG_VERSION").to_string(),
		timestamp: chrono::Utc::now().to_rfc3339(),
		method,
		fingerprint: scheme.to_string(),
		clusters,
		noise,
		total_molecules: fps.len(),
	})
}

/// Member with the highest mean similarity to the rest; lowest index on ties
fn find_medoid(members: &[usize], fps: &[Fingerprint]) -> crate::Result<usize> {
	let mut best = members[0];
	let mut best_score = f64::NEG_INFINITY;
	for &i in members {
		let mut score = 0.0;
		for &j in members.iter().filter(|&&j| j != i) {
			score += fps[i].tanimoto(&fps[j])?;
		}
		if score > best_score {
			best = i;
			best_score = score;
		}
	}
	Ok(best)
}

/// Mean pairwise similarity within a cluster; 1.0 for singletons
fn compute_cohesion(members: &[usize], fps: &[Fingerprint]) -> crate::Result<f32> {
	if members.len() < 2 {
		return Ok(1.0);
	}

	let mut total = 0.0;
	let mut count = 0;
	for (k, &i) in members.iter().enumerate() {
		for &j in &members[k + 1..] {
			total += fps[i].tanimoto(&fps[j])?;
			count += 1;
		}
	}
	Ok((total / count as f64) as f32)
}

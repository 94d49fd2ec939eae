//! molcluster - fingerprint-based clustering of molecules
//!
//! Reads SMILES files, computes structural fingerprints and groups the
//! molecules with Butina, k-means, hierarchical or HDBSCAN clustering.

use std::process::ExitCode;

use anyhow::Result;
use clap::{CommandFactory, Parser};

use molcluster::cli::{Cli, Command, MethodArgs};
use molcluster::{commands, config, ui};

fn main() -> ExitCode {
	let cli = Cli::parse();

	ui::Log::set_verbose(cli.verbose);
	config::init_thread_pool(cli.threads);

	match run(cli.command) {
		Ok(()) => ExitCode::SUCCESS,
		Err(e) => {
			ui::error(&format!("{:#}", e));
			ExitCode::FAILURE
		}
	}
}

fn run(command: Command) -> Result<()> {
	match command {
		Command::Cluster {
			input,
			method,
			fingerprint,
			similarity,
			n_clusters,
			distance_threshold,
			linkage,
			metric,
			min_cluster_size,
			min_samples,
			max_iter,
			n_init,
			seed,
			preview,
			export,
		} => {
			let method = MethodArgs {
				method,
				similarity,
				n_clusters,
				distance_threshold,
				linkage,
				metric,
				min_cluster_size,
				min_samples,
				max_iter,
				n_init,
				seed,
			};
			commands::cluster::run(&input, &fingerprint, method, preview, export.as_deref())
		}
		Command::Fingerprint {
			input,
			fingerprint,
			export,
		} => commands::fingerprint::run(&input, &fingerprint, export.as_deref()),
		Command::Help { subcommand } => {
			let mut cmd = Cli::command();
			if let Some(sub) = subcommand {
				if let Some(sub_cmd) = cmd.find_subcommand_mut(&sub) {
					sub_cmd.print_help()?;
				} else {
					ui::warn(&format!("Unknown subcommand: {}", sub));
					cmd.print_help()?;
				}
			} else {
				cmd.print_help()?;
			}
			Ok(())
		}
	}
}

use clap::builder::styling::{AnsiColor, Color, Style, Styles};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;

use crate::config::{
	DEFAULT_KMEANS_CLUSTERS, DEFAULT_KMEANS_MAX_ITER, DEFAULT_KMEANS_RUNS, DEFAULT_KMEANS_SEED,
	DEFAULT_MIN_CLUSTER_SIZE, DEFAULT_NBITS, DEFAULT_PREVIEW, DEFAULT_RADIUS, DEFAULT_SIMILARITY_CUTOFF,
};
use crate::processing::{Linkage, Method, Metric};

/// Clustering algorithm
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum MethodName {
	/// Similarity-threshold clustering (Taylor-Butina)
	#[default]
	Butina,
	/// K-means on bit features
	Kmeans,
	/// Agglomerative clustering
	Hierarchical,
	/// Density-based clustering, may leave noise
	Hdbscan,
}

fn parse_unit(s: &str) -> Result<f64, String> {
	let val: f64 = s.parse().map_err(|_| format!("'{}' is not a valid number", s))?;
	if !(0.0..=1.0).contains(&val) {
		Err(format!("value must be between 0.0 and 1.0, got {}", val))
	} else {
		Ok(val)
	}
}

fn styles() -> Styles {
	let blue = Some(Color::Ansi(AnsiColor::Blue));
	Styles::styled()
		.header(Style::new().bold().fg_color(blue))
		.usage(Style::new().bold().fg_color(blue))
		.literal(Style::new().fg_color(blue))
		.placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Yellow))))
		.valid(Style::new().fg_color(blue))
		.invalid(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Red))))
}

#[derive(Parser, Debug)]
#[command(
	name = "molcluster",
	author,
	version,
	about = "Fingerprint-based clustering of molecular datasets",
	styles = styles(),
	disable_help_subcommand = true,
	after_help = format!(
		"{title}
  {bin} {cluster}      {cluster_args}          {cluster_desc}
  {bin} {cluster}      {kmeans_args}   {kmeans_desc}
  {bin} {fingerprint}  {fp_args}   {fp_desc}
  {bin} {help}         {help_args}                      {help_desc}",
		title = "Examples:".bright_blue().bold(),
		bin = "molcluster".bright_blue(),
		cluster = "cluster".yellow(),
		cluster_args = "-i mols.smi -s 0.7",
		cluster_desc = "Butina at 70% similarity".dimmed(),
		kmeans_args = "-i mols.smi -m kmeans -k 8",
		kmeans_desc = "K-means into 8 clusters".dimmed(),
		fingerprint = "fingerprint".yellow(),
		fp_args = "-i mols.smi --fp maccs -e -",
		fp_desc = "Dump key bits as JSON".dimmed(),
		help = "help".yellow(),
		help_args = "cluster",
		help_desc = "Show help for cluster".dimmed(),
	),
)]
pub struct Cli {
	/// Enable verbose debug output
	#[arg(short = 'v', long = "verbose", global = true)]
	pub verbose: bool,

	/// Worker threads (default: MOLCLUSTER_THREADS or all cores)
	#[arg(short = 't', long = "threads", global = true)]
	pub threads: Option<usize>,

	#[command(subcommand)]
	pub command: Command,
}

/// Fingerprint selection shared by subcommands
#[derive(clap::Args, Debug, Clone)]
pub struct FingerprintArgs {
	/// Scheme: structural-hash, circular-bits, substructure-keys, atom-pair
	#[arg(short = 'f', long = "fp", default_value = "structural-hash")]
	pub scheme: String,

	/// Bit length for circular-bits
	#[arg(long = "nbits", default_value_t = DEFAULT_NBITS)]
	pub nbits: usize,

	/// Radius for circular-bits
	#[arg(long = "radius", default_value_t = DEFAULT_RADIUS)]
	pub radius: u32,
}

#[derive(Subcommand, Debug)]
pub enum Command {
	/// Cluster molecules from a SMILES file
	Cluster {
		/// Input file, one `SMILES [name]` per line
		#[arg(short = 'i', long = "input", value_name = "FILE")]
		input: PathBuf,

		/// Clustering method
		#[arg(short = 'm', long = "method", default_value = "butina")]
		method: MethodName,

		#[command(flatten)]
		fingerprint: FingerprintArgs,

		/// Butina: minimum Tanimoto similarity for neighbors (0.0-1.0)
		#[arg(short = 's', long = "similarity", default_value_t = DEFAULT_SIMILARITY_CUTOFF, value_parser = parse_unit)]
		similarity: f64,

		/// K-means / hierarchical: number of clusters
		#[arg(short = 'k', long = "n-clusters")]
		n_clusters: Option<usize>,

		/// Hierarchical: merge clusters closer than this distance
		#[arg(long = "distance-threshold", conflicts_with = "n_clusters")]
		distance_threshold: Option<f64>,

		/// Hierarchical: linkage criterion
		#[arg(long = "linkage", default_value = "ward")]
		linkage: Linkage,

		/// Hierarchical / HDBSCAN: distance metric (default: euclidean for hierarchical, tanimoto for hdbscan)
		#[arg(long = "metric")]
		metric: Option<Metric>,

		/// HDBSCAN: minimum cluster size
		#[arg(long = "min-cluster-size", default_value_t = DEFAULT_MIN_CLUSTER_SIZE)]
		min_cluster_size: usize,

		/// HDBSCAN: minimum samples (default: min cluster size)
		#[arg(long = "min-samples")]
		min_samples: Option<usize>,

		/// K-means: maximum iterations per run
		#[arg(long = "max-iter", default_value_t = DEFAULT_KMEANS_MAX_ITER)]
		max_iter: u64,

		/// K-means: number of restarts
		#[arg(long = "n-init", default_value_t = DEFAULT_KMEANS_RUNS)]
		n_init: usize,

		/// K-means: random seed
		#[arg(long = "seed", default_value_t = DEFAULT_KMEANS_SEED)]
		seed: u64,

		/// Members shown per cluster
		#[arg(short = 'p', long = "preview", default_value_t = DEFAULT_PREVIEW)]
		preview: usize,

		/// Write the report as JSON to a file, or `-` for stdout
		#[arg(short = 'e', long = "export", value_name = "PATH")]
		export: Option<PathBuf>,
	},

	/// Compute fingerprints for a SMILES file
	Fingerprint {
		/// Input file, one `SMILES [name]` per line
		#[arg(short = 'i', long = "input", value_name = "FILE")]
		input: PathBuf,

		#[command(flatten)]
		fingerprint: FingerprintArgs,

		/// Write on-bit lists as JSON to a file, or `-` for stdout
		#[arg(short = 'e', long = "export", value_name = "PATH")]
		export: Option<PathBuf>,
	},

	/// Show help for a subcommand
	Help {
		/// Subcommand name
		subcommand: Option<String>,
	},
}

/// Method parameters as given on the command line
#[derive(Debug, Clone, Copy)]
pub struct MethodArgs {
	pub method: MethodName,
	pub similarity: f64,
	pub n_clusters: Option<usize>,
	pub distance_threshold: Option<f64>,
	pub linkage: Linkage,
	pub metric: Option<Metric>,
	pub min_cluster_size: usize,
	pub min_samples: Option<usize>,
	pub max_iter: u64,
	pub n_init: usize,
	pub seed: u64,
}

impl MethodArgs {
	/// Keep only the parameters that apply to the selected method
	pub fn into_method(self) -> Method {
		match self.method {
			MethodName::Butina => Method::Butina {
				similarity_cutoff: self.similarity,
			},
			MethodName::Kmeans => Method::Kmeans {
				n_clusters: self.n_clusters.unwrap_or(DEFAULT_KMEANS_CLUSTERS),
				max_iter: self.max_iter,
				n_init: self.n_init,
				seed: self.seed,
			},
			MethodName::Hierarchical => Method::Hierarchical {
				n_clusters: self.n_clusters,
				distance_threshold: self.distance_threshold,
				linkage: self.linkage,
				metric: self.metric.unwrap_or(Metric::Euclidean),
			},
			MethodName::Hdbscan => Method::Hdbscan {
				min_cluster_size: self.min_cluster_size,
				min_samples: self.min_samples,
				metric: self.metric.unwrap_or(Metric::Tanimoto),
			},
		}
	}
}

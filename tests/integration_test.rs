// Integration tests for molcluster

use std::io::Write;
use std::process::Command;

use molcluster::core::pair_count;
use molcluster::processing::{cluster_fingerprints, load_smiles_file, Method, PairwiseDistanceBuilder};
use molcluster::{
	ErrorKind, Fingerprint, FingerprintGenerator, FingerprintScheme, Molecule, Similarity, ThresholdClusterAssigner,
};

const SAMPLE: &str = "# small test set
CCO ethanol
CCCO propanol
CCCCO butanol
c1ccccc1 benzene
Cc1ccccc1 toluene
CCc1ccccc1 ethylbenzene
C1CC broken
[Na+].[Cl-] salt
";

fn sample_file() -> tempfile::NamedTempFile {
	let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
	file.write_all(SAMPLE.as_bytes()).expect("Failed to write temp file");
	file
}

fn molcluster() -> Command {
	Command::new(env!("CARGO_BIN_EXE_molcluster"))
}

#[test]
fn test_end_to_end_butina() {
	let file = sample_file();
	let dataset = load_smiles_file(file.path()).unwrap();
	assert_eq!(dataset.len(), 7);
	assert_eq!(dataset.skipped, 1);

	let generator = FingerprintGenerator::new(FingerprintScheme::circular()).unwrap();
	let fps = generator.generate_all(&dataset.molecules());
	let report = cluster_fingerprints(
		&dataset.names(),
		&fps,
		Method::Butina { similarity_cutoff: 0.3 },
		generator.scheme(),
	)
	.unwrap();

	assert_eq!(report.total_molecules, 7);
	let total: usize = report.clusters.iter().map(|c| c.size()).sum();
	assert_eq!(total, 7);

	// the salt shares nothing with the organics
	let salt = report.clusters.iter().find(|c| c.members.contains(&"salt".to_string())).unwrap();
	assert_eq!(salt.size(), 1);
	assert_eq!(salt.representative, "salt");
	assert_eq!(salt.cohesion, 1.0);
}

#[test]
fn test_distance_then_assign() {
	let fps: Vec<Fingerprint> = ["CCO", "CCO", "c1ccccc1"]
		.iter()
		.map(|s| {
			let mol = Molecule::from_smiles(s).unwrap();
			FingerprintGenerator::new(FingerprintScheme::StructuralHash).unwrap().generate(&mol)
		})
		.collect();

	let distances = PairwiseDistanceBuilder::new(Similarity::Tanimoto).build(&fps).unwrap();
	assert_eq!(distances.len(), pair_count(3));
	assert_eq!(distances.get(1, 0), 0.0);
	// folded path hashes may collide, so only require a large distance
	assert!(distances.get(2, 0) > 0.5, "ethanol vs benzene: {}", distances.get(2, 0));
	assert_eq!(distances.get(2, 0), distances.get(2, 1));

	let assignment = ThresholdClusterAssigner.assign_list(&distances, 0.5).unwrap();
	assert_eq!(assignment.labels(), &[0, 0, 1]);
}

#[test]
fn test_unfolded_keys_separate_unrelated_molecules() {
	let generator = FingerprintGenerator::new(FingerprintScheme::SubstructureKeys).unwrap();
	let fps: Vec<Fingerprint> = ["[Na+]", "[Na+]", "CCCCCCCC"]
		.iter()
		.map(|s| generator.generate(&Molecule::from_smiles(s).unwrap()))
		.collect();

	let distances = PairwiseDistanceBuilder::new(Similarity::Tanimoto).build(&fps).unwrap();
	assert_eq!(distances.get(1, 0), 0.0);
	assert_eq!(distances.get(2, 0), 1.0);
}

#[test]
fn test_documented_four_item_case() {
	let distances = [0.1, 0.9, 0.9, 0.9, 0.9, 0.1];
	let pairs = ThresholdClusterAssigner.assign(4, &distances, 0.2).unwrap();
	assert_eq!(pairs.clusters(), &[vec![0, 1], vec![2, 3]]);

	let singletons = ThresholdClusterAssigner.assign(4, &distances, 0.05).unwrap();
	assert_eq!(singletons.n_clusters(), 4);

	let err = ThresholdClusterAssigner.assign(4, &distances[..5], 0.2).unwrap_err();
	assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[test]
fn test_every_method_labels_every_molecule() {
	let file = sample_file();
	let dataset = load_smiles_file(file.path()).unwrap();
	let fps = FingerprintGenerator::new(FingerprintScheme::SubstructureKeys)
		.unwrap()
		.generate_all(&dataset.molecules());

	let methods = [
		Method::default(),
		Method::kmeans(3),
		Method::Hierarchical {
			n_clusters: Some(3),
			distance_threshold: None,
			linkage: Default::default(),
			metric: Default::default(),
		},
	];

	for method in methods {
		let labels = method.clusterer().unwrap().fit_predict(&fps).unwrap();
		assert_eq!(labels.len(), fps.len(), "{}", method);
	}
}

#[test]
fn test_version_display() {
	let output = molcluster().arg("--version").output().expect("Failed to run molcluster --version");

	assert!(output.status.success(), "Version command failed");

	let stdout = String::from_utf8_lossy(&output.stdout);
	assert!(stdout.contains("molcluster"), "Expected 'molcluster' in version output");
}

#[test]
fn test_help_display() {
	let output = molcluster().arg("--help").output().expect("Failed to run molcluster --help");

	assert!(output.status.success(), "Help command failed");

	let stdout = String::from_utf8_lossy(&output.stdout);
	assert!(
		stdout.contains("cluster") && stdout.contains("fingerprint"),
		"Expected cluster and fingerprint in help output"
	);
}

#[test]
fn test_cluster_export_stdout() {
	let file = sample_file();
	let output = molcluster()
		.args(["cluster", "-i"])
		.arg(file.path())
		.args(["--fp", "morgan", "-s", "0.5", "-e", "-"])
		.output()
		.expect("Failed to run molcluster cluster");

	assert!(output.status.success(), "Cluster command failed: {}", String::from_utf8_lossy(&output.stderr));

	let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("Export is not JSON");
	assert_eq!(report["total_molecules"], 7);
	assert_eq!(report["method"]["name"], "butina");
	assert!(report["clusters"].as_array().map_or(false, |c| !c.is_empty()));
}

#[test]
fn test_fingerprint_export_file() {
	let file = sample_file();
	let dir = tempfile::tempdir().unwrap();
	let out = dir.path().join("fps.json");

	let status = molcluster()
		.args(["fingerprint", "--fp", "maccs", "-i"])
		.arg(file.path())
		.arg("-e")
		.arg(&out)
		.status()
		.expect("Failed to run molcluster fingerprint");
	assert!(status.success());

	let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
	assert_eq!(json["scheme"], "substructure-keys");
	assert_eq!(json["molecules"].as_array().map(Vec::len), Some(7));
	assert_eq!(json["molecules"][0]["name"], "ethanol");
	let keys = json["molecules"][0]["on_keys"].as_array().expect("Expected key names for substructure keys");
	assert!(keys.iter().any(|k| k == "oxygen"));
	assert_eq!(keys.len(), json["molecules"][0]["on_bits"].as_array().map_or(0, Vec::len));
}

#[test]
fn test_hdbscan_too_few_molecules_fails_cleanly() {
	let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
	file.write_all(b"CCO a\nCCCO b\nCCCCO c\n").expect("Failed to write temp file");

	let output = molcluster()
		.args(["cluster", "-m", "hdbscan", "-i"])
		.arg(file.path())
		.output()
		.expect("Failed to run molcluster cluster");
	assert!(!output.status.success());
	let stderr = String::from_utf8_lossy(&output.stderr);
	assert!(!stderr.contains("panicked"), "hdbscan panicked: {}", stderr);
	assert!(stderr.contains("invalid cluster count"), "unexpected error: {}", stderr);
}

#[test]
fn test_invalid_parameters_fail() {
	let file = sample_file();

	let output = molcluster()
		.args(["cluster", "--fp", "ecfp9", "-i"])
		.arg(file.path())
		.output()
		.unwrap();
	assert!(!output.status.success(), "Unknown scheme should fail");

	let output = molcluster()
		.args(["cluster", "-m", "hierarchical", "--linkage", "ward", "--metric", "tanimoto", "-i"])
		.arg(file.path())
		.output()
		.unwrap();
	assert!(!output.status.success(), "Ward with tanimoto should fail");

	let output = molcluster().args(["cluster", "-i", "/nonexistent/file.smi"]).output().unwrap();
	assert!(!output.status.success(), "Missing input should fail");
}

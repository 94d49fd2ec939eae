//! Linear path fingerprint ("structural-hash")

use crate::config::{PATH_BITS_PER_FEATURE, PATH_MAX_BONDS};
use crate::core::{FeatureHash, Fingerprint, Molecule};

pub(super) fn fingerprint(mol: &Molecule, nbits: usize) -> Fingerprint {
	let mut on_bits = Vec::new();
	let mut visited = vec![false; mol.atom_count()];
	let mut tokens = Vec::with_capacity(2 * PATH_MAX_BONDS + 1);

	for start in 0..mol.atom_count() {
		if mol.atoms()[start].is_hydrogen() {
			continue;
		}
		visited[start] = true;
		tokens.push(atom_token(mol, start));
		extend(mol, start, 0, &mut visited, &mut tokens, nbits, &mut on_bits);
		tokens.pop();
		visited[start] = false;
	}

	Fingerprint::from_on_bits(nbits, on_bits)
}

fn atom_token(mol: &Molecule, atom: usize) -> u64 {
	let a = &mol.atoms()[atom];
	u64::from(a.atomic_number) * 2 + u64::from(a.aromatic)
}

#[allow(clippy::too_many_arguments)]
fn extend(
	mol: &Molecule,
	tip: usize,
	depth: usize,
	visited: &mut [bool],
	tokens: &mut Vec<u64>,
	nbits: usize,
	on_bits: &mut Vec<usize>,
) {
	if depth == PATH_MAX_BONDS {
		return;
	}

	for &(next, bond) in mol.neighbors(tip) {
		if visited[next] || mol.atoms()[next].is_hydrogen() {
			continue;
		}
		visited[next] = true;
		tokens.push(mol.bonds()[bond].order.code() + 1000);
		tokens.push(atom_token(mol, next));

		record(tokens, depth + 1, nbits, on_bits);
		extend(mol, next, depth + 1, visited, tokens, nbits, on_bits);

		tokens.pop();
		tokens.pop();
		visited[next] = false;
	}
}

/// Hash a path independent of the direction it was walked in
fn record(tokens: &[u64], bonds: usize, nbits: usize, on_bits: &mut Vec<usize>) {
	let reversed: Vec<u64> = tokens.iter().rev().copied().collect();
	let canonical = if reversed.as_slice() < tokens { reversed.as_slice() } else { tokens };

	let mut words = Vec::with_capacity(canonical.len() + 1);
	words.push(bonds as u64);
	words.extend_from_slice(canonical);

	for seed in 0..PATH_BITS_PER_FEATURE {
		on_bits.push(FeatureHash::seeded(&words, seed).fold(nbits));
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn fp(smiles: &str) -> Fingerprint {
		fingerprint(&Molecule::from_smiles(smiles).unwrap(), 2048)
	}

	#[test]
	fn test_single_atom_has_no_paths() {
		assert_eq!(fp("C").count_ones(), 0);
	}

	#[test]
	fn test_direction_independent() {
		// same molecule written from both ends
		assert_eq!(fp("CCO"), fp("OCC"));
		assert_eq!(fp("NCC(=O)O"), fp("OC(=O)CN"));
	}

	#[test]
	fn test_substructure_bits_are_subset() {
		let ethanol = fp("CCO");
		let propanol = fp("CCCO");
		assert!(ethanol.on_bits().all(|b| propanol.contains(b)));
	}

	#[test]
	fn test_explicit_hydrogen_ignored() {
		assert_eq!(fp("C[H]"), fp("C"));
	}
}

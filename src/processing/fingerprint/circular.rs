//! Circular atom-environment fingerprint ("circular-bits")
//!
//! Each heavy atom starts from an invariant built from its element, heavy
//! degree, hydrogen count, charge, isotope, ring membership and aromaticity.
//! Every iteration folds the sorted (bond, neighbor invariant) list into a new
//! invariant; all invariants from iteration 0 to `radius` set one bit.

use crate::core::{FeatureHash, Fingerprint, Molecule};

pub(super) fn fingerprint(mol: &Molecule, nbits: usize, radius: u32) -> Fingerprint {
	let rings = mol.rings();
	let heavy: Vec<usize> = (0..mol.atom_count())
		.filter(|&i| !mol.atoms()[i].is_hydrogen())
		.collect();

	let mut current: Vec<FeatureHash> = (0..mol.atom_count())
		.map(|i| {
			let atom = &mol.atoms()[i];
			FeatureHash::of(&[
				u64::from(atom.atomic_number),
				mol.heavy_degree(i) as u64,
				mol.total_hydrogens(i) as u64,
				atom.charge as i64 as u64,
				u64::from(atom.isotope.unwrap_or(0)),
				u64::from(rings.is_ring_atom(i)),
				u64::from(atom.aromatic),
			])
		})
		.collect();

	let mut on_bits: Vec<usize> = heavy.iter().map(|&i| current[i].fold(nbits)).collect();

	for iteration in 1..=radius {
		let mut next = current.clone();
		for &i in &heavy {
			let mut env: Vec<(u64, u64)> = mol
				.neighbors(i)
				.iter()
				.filter(|(n, _)| !mol.atoms()[*n].is_hydrogen())
				.map(|&(n, b)| (mol.bonds()[b].order.code(), current[n].value()))
				.collect();
			env.sort_unstable();

			let mut words = Vec::with_capacity(2 + 2 * env.len());
			words.push(u64::from(iteration));
			words.push(current[i].value());
			for (bond, invariant) in env {
				words.push(bond);
				words.push(invariant);
			}
			next[i] = FeatureHash::of(&words);
			on_bits.push(next[i].fold(nbits));
		}
		current = next;
	}

	Fingerprint::from_on_bits(nbits, on_bits)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn fp(smiles: &str, radius: u32) -> Fingerprint {
		fingerprint(&Molecule::from_smiles(smiles).unwrap(), 2048, radius)
	}

	#[test]
	fn test_radius_zero_counts_atom_types() {
		// ethane: both carbons share one invariant
		assert_eq!(fp("CC", 0).count_ones(), 1);
		assert_eq!(fp("CCO", 0).count_ones(), 3);
	}

	#[test]
	fn test_larger_radius_adds_bits() {
		let r1 = fp("CCCCO", 1);
		let r2 = fp("CCCCO", 2);
		assert!(r2.count_ones() > r1.count_ones());
		assert!(r1.on_bits().all(|b| r2.contains(b)));
	}

	#[test]
	fn test_atom_order_invariant() {
		assert_eq!(fp("OCC(N)C", 2), fp("CC(N)CO", 2));
	}

	#[test]
	fn test_bits_fit_short_vectors() {
		let mol = Molecule::from_smiles("CC(=O)Nc1ccc(O)cc1").unwrap();
		for nbits in [1, 7, 64] {
			let short = fingerprint(&mol, nbits, 2);
			assert_eq!(short.len(), nbits);
			assert!(short.on_bits().all(|b| b < nbits));
		}
	}

	#[test]
	fn test_charge_changes_bits() {
		assert_ne!(fp("CC(=O)O", 1), fp("CC(=O)[O-]", 1));
	}
}

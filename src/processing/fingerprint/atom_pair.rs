//! Atom-pair fingerprint ("atom-pair")

use crate::config::ATOM_PAIR_MAX_DISTANCE;
use crate::core::{FeatureHash, Fingerprint, Molecule};

/// Atom type: element, heavy degree (capped at 7), pi electrons (capped at 3)
fn atom_code(mol: &Molecule, atom: usize) -> u64 {
	let a = &mol.atoms()[atom];
	let pi = if a.aromatic {
		1
	} else {
		mol.neighbors(atom)
			.iter()
			.map(|&(_, b)| mol.bonds()[b].order.valence() - 1)
			.sum::<u32>()
	};
	let degree = mol.heavy_degree(atom).min(7) as u64;
	(u64::from(a.atomic_number) << 5) | (degree << 2) | u64::from(pi.min(3))
}

pub(super) fn fingerprint(mol: &Molecule, nbits: usize) -> Fingerprint {
	let heavy: Vec<usize> = (0..mol.atom_count())
		.filter(|&i| !mol.atoms()[i].is_hydrogen())
		.collect();
	let codes: Vec<u64> = heavy.iter().map(|&i| atom_code(mol, i)).collect();

	let mut on_bits = Vec::new();
	for (k, &i) in heavy.iter().enumerate() {
		let dist = mol.distances_from(i);
		for (l, &j) in heavy.iter().enumerate().skip(k + 1) {
			let Some(d) = dist[j] else {
				continue;
			};
			let d = d.min(ATOM_PAIR_MAX_DISTANCE) as u64;
			let (lo, hi) = if codes[k] <= codes[l] {
				(codes[k], codes[l])
			} else {
				(codes[l], codes[k])
			};
			on_bits.push(FeatureHash::of(&[lo, d, hi]).fold(nbits));
		}
	}

	Fingerprint::from_on_bits(nbits, on_bits)
}

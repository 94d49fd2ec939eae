//! Substructure key fingerprint ("substructure-keys")
//!
//! One bit per entry of a fixed key table, set when the molecule contains
//! the key's pattern. Bit positions follow table order and never change.

use crate::core::{BondOrder, Fingerprint, Molecule, RingInfo};

const HALOGENS: [u8; 4] = [9, 17, 35, 53];
const COMMON: [u8; 14] = [0, 1, 5, 6, 7, 8, 9, 14, 15, 16, 17, 34, 35, 53];

struct Context<'a> {
	mol: &'a Molecule,
	rings: RingInfo,
}

impl Context<'_> {
	fn count(&self, atomic: u8) -> usize {
		self.mol
			.atoms()
			.iter()
			.filter(|a| a.atomic_number == atomic)
			.count()
	}

	fn has(&self, atomic: u8) -> bool {
		self.count(atomic) > 0
	}

	fn halogen_count(&self) -> usize {
		HALOGENS.iter().map(|&z| self.count(z)).sum()
	}

	fn any_atom(&self, pred: impl Fn(usize) -> bool) -> bool {
		(0..self.mol.atom_count()).any(pred)
	}

	fn z(&self, atom: usize) -> u8 {
		self.mol.atoms()[atom].atomic_number
	}

	/// Some bond of `order` joins elements `a` and `b`
	fn bond_between(&self, a: u8, b: u8, order: BondOrder) -> bool {
		self.mol.bonds().iter().any(|bond| {
			let (x, y) = (self.z(bond.a), self.z(bond.b));
			bond.order == order && ((x == a && y == b) || (x == b && y == a))
		})
	}

	/// Neighbors of `atom` with element `z` over a bond of `order`
	fn neighbor_count(&self, atom: usize, z: u8, order: BondOrder) -> usize {
		self.mol
			.neighbors(atom)
			.iter()
			.filter(|&&(n, b)| self.z(n) == z && self.mol.bonds()[b].order == order)
			.count()
	}

	fn aliphatic(&self, atom: usize, z: u8) -> bool {
		let a = &self.mol.atoms()[atom];
		a.atomic_number == z && !a.aromatic
	}
}

struct Key {
	name: &'static str,
	test: fn(&Context) -> bool,
}

static KEYS: &[Key] = &[
	Key { name: "boron", test: |c| c.has(5) },
	Key { name: "carbon", test: |c| c.has(6) },
	Key { name: "nitrogen", test: |c| c.has(7) },
	Key { name: "oxygen", test: |c| c.has(8) },
	Key { name: "fluorine", test: |c| c.has(9) },
	Key { name: "silicon", test: |c| c.has(14) },
	Key { name: "phosphorus", test: |c| c.has(15) },
	Key { name: "sulfur", test: |c| c.has(16) },
	Key { name: "chlorine", test: |c| c.has(17) },
	Key { name: "selenium", test: |c| c.has(34) },
	Key { name: "bromine", test: |c| c.has(35) },
	Key { name: "iodine", test: |c| c.has(53) },
	Key { name: "halogen", test: |c| c.halogen_count() > 0 },
	Key { name: "other element", test: |c| c.any_atom(|i| !COMMON.contains(&c.z(i))) },
	Key { name: "positive charge", test: |c| c.mol.atoms().iter().any(|a| a.charge > 0) },
	Key { name: "negative charge", test: |c| c.mol.atoms().iter().any(|a| a.charge < 0) },
	Key { name: "isotope label", test: |c| c.mol.atoms().iter().any(|a| a.isotope.is_some()) },
	Key { name: "aromatic atom", test: |c| c.mol.atoms().iter().any(|a| a.aromatic) },
	Key { name: "aromatic nitrogen", test: |c| c.mol.atoms().iter().any(|a| a.aromatic && a.atomic_number == 7) },
	Key { name: "aromatic oxygen", test: |c| c.mol.atoms().iter().any(|a| a.aromatic && a.atomic_number == 8) },
	Key { name: "aromatic sulfur", test: |c| c.mol.atoms().iter().any(|a| a.aromatic && a.atomic_number == 16) },
	Key { name: "ring", test: |c| c.rings.ring_count() > 0 },
	Key { name: "3-membered ring", test: |c| c.rings.has_ring_of_size(3) },
	Key { name: "4-membered ring", test: |c| c.rings.has_ring_of_size(4) },
	Key { name: "5-membered ring", test: |c| c.rings.has_ring_of_size(5) },
	Key { name: "6-membered ring", test: |c| c.rings.has_ring_of_size(6) },
	Key { name: "7-membered ring", test: |c| c.rings.has_ring_of_size(7) },
	Key {
		name: "large ring",
		test: |c| (0..c.mol.bond_count()).any(|b| c.rings.smallest_ring(b).is_some_and(|s| s >= 8)),
	},
	Key { name: "multiple rings", test: |c| c.rings.ring_count() > 1 },
	Key { name: "fused ring atom", test: |c| c.any_atom(|i| c.rings.ring_bond_count(c.mol, i) >= 3) },
	Key { name: "double bond", test: |c| c.mol.bonds().iter().any(|b| b.order == BondOrder::Double) },
	Key { name: "triple bond", test: |c| c.mol.bonds().iter().any(|b| b.order == BondOrder::Triple) },
	Key { name: "C=O", test: |c| c.bond_between(6, 8, BondOrder::Double) },
	Key { name: "C=N", test: |c| c.bond_between(6, 7, BondOrder::Double) },
	Key { name: "C#N", test: |c| c.bond_between(6, 7, BondOrder::Triple) },
	Key { name: "N=O", test: |c| c.bond_between(7, 8, BondOrder::Double) },
	Key { name: "S=O", test: |c| c.bond_between(16, 8, BondOrder::Double) },
	Key { name: "P=O", test: |c| c.bond_between(15, 8, BondOrder::Double) },
	Key {
		name: "hydroxyl",
		test: |c| c.any_atom(|i| c.aliphatic(i, 8) && c.mol.total_hydrogens(i) == 1 && c.mol.heavy_degree(i) == 1),
	},
	Key { name: "NH2", test: |c| c.any_atom(|i| c.z(i) == 7 && c.mol.total_hydrogens(i) == 2) },
	Key { name: "NH", test: |c| c.any_atom(|i| c.z(i) == 7 && c.mol.total_hydrogens(i) == 1) },
	Key { name: "thiol", test: |c| c.any_atom(|i| c.z(i) == 16 && c.mol.total_hydrogens(i) >= 1) },
	Key { name: "methyl", test: |c| c.any_atom(|i| c.z(i) == 6 && c.mol.total_hydrogens(i) == 3) },
	Key {
		name: "ether",
		test: |c| {
			c.any_atom(|i| {
				c.aliphatic(i, 8)
					&& c.mol.total_hydrogens(i) == 0
					&& c.neighbor_count(i, 6, BondOrder::Single) == 2
			})
		},
	},
	Key {
		name: "carboxyl or ester",
		test: |c| {
			c.any_atom(|i| {
				c.z(i) == 6
					&& c.neighbor_count(i, 8, BondOrder::Double) == 1
					&& c.neighbor_count(i, 8, BondOrder::Single) >= 1
			})
		},
	},
	Key {
		name: "amide",
		test: |c| {
			c.any_atom(|i| {
				c.z(i) == 6
					&& c.neighbor_count(i, 8, BondOrder::Double) == 1
					&& c.neighbor_count(i, 7, BondOrder::Single) >= 1
			})
		},
	},
	Key { name: "quaternary carbon", test: |c| c.any_atom(|i| c.z(i) == 6 && c.mol.heavy_degree(i) == 4) },
	Key {
		name: "aryl amine",
		test: |c| {
			c.any_atom(|i| {
				c.aliphatic(i, 7)
					&& c.mol.neighbors(i).iter().any(|&(n, _)| c.mol.atoms()[n].aromatic)
			})
		},
	},
	Key {
		name: "aryl halide",
		test: |c| {
			c.any_atom(|i| {
				HALOGENS.contains(&c.z(i))
					&& c.mol.neighbors(i).iter().any(|&(n, _)| c.mol.atoms()[n].aromatic)
			})
		},
	},
	Key { name: "more than one nitrogen", test: |c| c.count(7) > 1 },
	Key { name: "more than one oxygen", test: |c| c.count(8) > 1 },
	Key { name: "more than two oxygens", test: |c| c.count(8) > 2 },
	Key { name: "more than one halogen", test: |c| c.halogen_count() > 1 },
	Key { name: "more than 10 heavy atoms", test: |c| c.mol.heavy_atom_count() > 10 },
	Key { name: "more than 20 heavy atoms", test: |c| c.mol.heavy_atom_count() > 20 },
	Key { name: "multiple components", test: |c| c.mol.component_count() > 1 },
];

pub(super) fn key_count() -> usize {
	KEYS.len()
}

/// Names of the keys, indexed by bit position
pub(super) fn key_names() -> impl Iterator<Item = &'static str> {
	KEYS.iter().map(|k| k.name)
}

pub(super) fn fingerprint(mol: &Molecule) -> Fingerprint {
	let ctx = Context { mol, rings: mol.rings() };
	let on_bits = KEYS
		.iter()
		.enumerate()
		.filter(|(_, key)| (key.test)(&ctx))
		.map(|(idx, _)| idx);
	Fingerprint::from_on_bits(KEYS.len(), on_bits)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn keys_of(smiles: &str) -> Vec<&'static str> {
		let fp = fingerprint(&Molecule::from_smiles(smiles).unwrap());
		fp.on_bits().map(|b| KEYS[b].name).collect()
	}

	#[test]
	fn test_names_unique() {
		let mut names: Vec<&str> = key_names().collect();
		names.sort_unstable();
		names.dedup();
		assert_eq!(names.len(), key_count());
	}

	#[test]
	fn test_acetic_acid() {
		let keys = keys_of("CC(=O)O");
		for expected in ["carbon", "oxygen", "C=O", "hydroxyl", "methyl", "carboxyl or ester", "more than one oxygen"] {
			assert!(keys.contains(&expected), "missing {}", expected);
		}
		assert!(!keys.contains(&"ring"));
		assert!(!keys.contains(&"nitrogen"));
	}

	#[test]
	fn test_chlorobenzene() {
		let keys = keys_of("Clc1ccccc1");
		for expected in ["chlorine", "halogen", "aromatic atom", "ring", "6-membered ring", "aryl halide"] {
			assert!(keys.contains(&expected), "missing {}", expected);
		}
		assert!(!keys.contains(&"multiple rings"));
	}

	#[test]
	fn test_acetanilide() {
		let keys = keys_of("CC(=O)Nc1ccccc1");
		assert!(keys.contains(&"amide"));
		assert!(keys.contains(&"aryl amine"));
		assert!(keys.contains(&"NH"));
	}

	#[test]
	fn test_salt() {
		let keys = keys_of("[Na+].[Cl-]");
		for expected in ["other element", "positive charge", "negative charge", "multiple components", "chlorine"] {
			assert!(keys.contains(&expected), "missing {}", expected);
		}
	}
}

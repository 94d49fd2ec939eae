//! Molecular graph: atoms, bonds and ring perception

use std::collections::VecDeque;

use crate::error::Result;

const ELEMENTS: [&str; 86] = [
	"H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg", "Al", "Si", "P", "S", "Cl",
	"Ar", "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge", "As",
	"Se", "Br", "Kr", "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In",
	"Sn", "Sb", "Te", "I", "Xe", "Cs", "Ba", "La", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu", "Gd", "Tb",
	"Dy", "Ho", "Er", "Tm", "Yb", "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg", "Tl",
	"Pb", "Bi", "Po", "At", "Rn",
];

/// Atomic number for an element symbol (case-sensitive, e.g. "Cl")
pub fn atomic_number(symbol: &str) -> Option<u8> {
	ELEMENTS
		.iter()
		.position(|&s| s == symbol)
		.map(|idx| idx as u8 + 1)
}

/// Element symbol for an atomic number; 0 is the `*` wildcard
pub fn element_symbol(atomic_number: u8) -> &'static str {
	match atomic_number {
		0 => "*",
		n => ELEMENTS.get(n as usize - 1).copied().unwrap_or("?"),
	}
}

/// Default valences of the SMILES organic subset
pub fn default_valences(atomic_number: u8) -> &'static [u32] {
	match atomic_number {
		5 => &[3],
		6 => &[4],
		7 => &[3, 5],
		8 => &[2],
		15 => &[3, 5],
		16 => &[2, 4, 6],
		9 | 17 | 35 | 53 => &[1],
		_ => &[],
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BondOrder {
	Single,
	Double,
	Triple,
	Quadruple,
	Aromatic,
}

impl BondOrder {
	/// Stable integer code used in feature hashing
	pub fn code(self) -> u64 {
		match self {
			BondOrder::Single => 1,
			BondOrder::Double => 2,
			BondOrder::Triple => 3,
			BondOrder::Quadruple => 4,
			BondOrder::Aromatic => 12,
		}
	}

	/// Contribution to an atom's valence; aromatic bonds count as one
	pub fn valence(self) -> u32 {
		match self {
			BondOrder::Single | BondOrder::Aromatic => 1,
			BondOrder::Double => 2,
			BondOrder::Triple => 3,
			BondOrder::Quadruple => 4,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Atom {
	pub atomic_number: u8,
	pub aromatic: bool,
	pub charge: i8,
	pub isotope: Option<u16>,
	/// Attached hydrogens (implicit or from a bracket H count)
	pub hydrogens: u8,
}

impl Atom {
	pub fn new(atomic_number: u8) -> Self {
		Self {
			atomic_number,
			aromatic: false,
			charge: 0,
			isotope: None,
			hydrogens: 0,
		}
	}

	pub fn symbol(&self) -> &'static str {
		element_symbol(self.atomic_number)
	}

	pub fn is_hydrogen(&self) -> bool {
		self.atomic_number == 1
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bond {
	pub a: usize,
	pub b: usize,
	pub order: BondOrder,
}

impl Bond {
	/// The atom at the other end of the bond
	pub fn other(&self, atom: usize) -> usize {
		if self.a == atom {
			self.b
		} else {
			self.a
		}
	}
}

/// Parsed molecular structure
#[derive(Debug, Clone)]
pub struct Molecule {
	atoms: Vec<Atom>,
	bonds: Vec<Bond>,
	/// Per atom: (neighbor atom, bond index)
	adjacency: Vec<Vec<(usize, usize)>>,
}

impl Molecule {
	pub fn new(atoms: Vec<Atom>, bonds: Vec<Bond>) -> Self {
		let mut adjacency = vec![Vec::new(); atoms.len()];
		for (idx, bond) in bonds.iter().enumerate() {
			adjacency[bond.a].push((bond.b, idx));
			adjacency[bond.b].push((bond.a, idx));
		}
		Self { atoms, bonds, adjacency }
	}

	/// Parse a SMILES string
	pub fn from_smiles(smiles: &str) -> Result<Self> {
		crate::processing::smiles::parse(smiles)
	}

	pub fn atoms(&self) -> &[Atom] {
		&self.atoms
	}

	pub fn bonds(&self) -> &[Bond] {
		&self.bonds
	}

	pub fn atom_count(&self) -> usize {
		self.atoms.len()
	}

	pub fn bond_count(&self) -> usize {
		self.bonds.len()
	}

	pub fn neighbors(&self, atom: usize) -> &[(usize, usize)] {
		&self.adjacency[atom]
	}

	/// Number of non-hydrogen neighbors
	pub fn heavy_degree(&self, atom: usize) -> usize {
		self.adjacency[atom]
			.iter()
			.filter(|(n, _)| !self.atoms[*n].is_hydrogen())
			.count()
	}

	/// Hydrogens attached to an atom, counting explicit [H] neighbors
	pub fn total_hydrogens(&self, atom: usize) -> usize {
		let explicit = self.adjacency[atom]
			.iter()
			.filter(|(n, _)| self.atoms[*n].is_hydrogen())
			.count();
		self.atoms[atom].hydrogens as usize + explicit
	}

	pub fn heavy_atom_count(&self) -> usize {
		self.atoms.iter().filter(|a| !a.is_hydrogen()).count()
	}

	/// Number of connected components
	pub fn component_count(&self) -> usize {
		let mut seen = vec![false; self.atoms.len()];
		let mut components = 0;
		for start in 0..self.atoms.len() {
			if seen[start] {
				continue;
			}
			components += 1;
			seen[start] = true;
			let mut stack = vec![start];
			while let Some(u) = stack.pop() {
				for &(v, _) in &self.adjacency[u] {
					if !seen[v] {
						seen[v] = true;
						stack.push(v);
					}
				}
			}
		}
		components
	}

	/// Topological (bond count) distances from one atom; `None` if unreachable
	pub fn distances_from(&self, start: usize) -> Vec<Option<usize>> {
		let mut dist = vec![None; self.atoms.len()];
		dist[start] = Some(0);
		let mut queue = VecDeque::from([start]);
		while let Some(u) = queue.pop_front() {
			let du = dist[u].unwrap_or(0);
			for &(v, _) in &self.adjacency[u] {
				if dist[v].is_none() {
					dist[v] = Some(du + 1);
					queue.push_back(v);
				}
			}
		}
		dist
	}

	/// Ring membership of atoms and bonds
	pub fn rings(&self) -> RingInfo {
		RingInfo::perceive(self)
	}
}

/// Ring perception results for one molecule
#[derive(Debug, Clone)]
pub struct RingInfo {
	ring_bond: Vec<bool>,
	ring_atom: Vec<bool>,
	smallest_ring: Vec<Option<usize>>,
	cyclomatic: usize,
}

impl RingInfo {
	fn perceive(mol: &Molecule) -> Self {
		let bridges = find_bridges(mol);
		let ring_bond: Vec<bool> = bridges.iter().map(|b| !b).collect();

		let mut ring_atom = vec![false; mol.atom_count()];
		for (bond, _) in mol.bonds.iter().zip(&ring_bond).filter(|(_, r)| **r) {
			ring_atom[bond.a] = true;
			ring_atom[bond.b] = true;
		}

		let smallest_ring = (0..mol.bond_count())
			.map(|b| {
				if ring_bond[b] {
					smallest_cycle_through(mol, &ring_bond, b)
				} else {
					None
				}
			})
			.collect();

		let cyclomatic = (mol.bond_count() + mol.component_count()).saturating_sub(mol.atom_count());

		Self {
			ring_bond,
			ring_atom,
			smallest_ring,
			cyclomatic,
		}
	}

	pub fn is_ring_bond(&self, bond: usize) -> bool {
		self.ring_bond[bond]
	}

	pub fn is_ring_atom(&self, atom: usize) -> bool {
		self.ring_atom[atom]
	}

	/// Size of the smallest ring containing a bond
	pub fn smallest_ring(&self, bond: usize) -> Option<usize> {
		self.smallest_ring[bond]
	}

	/// Number of independent rings (bonds - atoms + components)
	pub fn ring_count(&self) -> usize {
		self.cyclomatic
	}

	/// True if any ring bond lies in a smallest ring of exactly `size` atoms
	pub fn has_ring_of_size(&self, size: usize) -> bool {
		self.smallest_ring.iter().any(|s| *s == Some(size))
	}

	pub fn ring_bond_count(&self, mol: &Molecule, atom: usize) -> usize {
		mol.neighbors(atom)
			.iter()
			.filter(|(_, b)| self.ring_bond[*b])
			.count()
	}
}

/// Tarjan bridge detection, iterative to stay off the call stack
fn find_bridges(mol: &Molecule) -> Vec<bool> {
	const UNSEEN: usize = usize::MAX;

	let n = mol.atom_count();
	let mut disc = vec![UNSEEN; n];
	let mut low = vec![0usize; n];
	let mut bridge = vec![false; mol.bond_count()];
	let mut timer = 0;

	for root in 0..n {
		if disc[root] != UNSEEN {
			continue;
		}
		disc[root] = timer;
		low[root] = timer;
		timer += 1;

		// (atom, bond used to reach it, next neighbor slot)
		let mut stack: Vec<(usize, usize, usize)> = vec![(root, UNSEEN, 0)];
		while let Some(top) = stack.last_mut() {
			let (u, parent_bond) = (top.0, top.1);
			if top.2 < mol.adjacency[u].len() {
				let (v, b) = mol.adjacency[u][top.2];
				top.2 += 1;
				if b == parent_bond {
					continue;
				}
				if disc[v] == UNSEEN {
					disc[v] = timer;
					low[v] = timer;
					timer += 1;
					stack.push((v, b, 0));
				} else {
					low[u] = low[u].min(disc[v]);
				}
			} else {
				stack.pop();
				if let Some(parent) = stack.last() {
					let p = parent.0;
					low[p] = low[p].min(low[u]);
					if low[u] > disc[p] {
						bridge[parent_bond] = true;
					}
				}
			}
		}
	}

	bridge
}

/// BFS between the ends of `bond` over ring bonds, excluding the bond itself
fn smallest_cycle_through(mol: &Molecule, ring_bond: &[bool], bond: usize) -> Option<usize> {
	let Bond { a, b, .. } = mol.bonds[bond];
	let mut dist = vec![usize::MAX; mol.atom_count()];
	dist[a] = 0;
	let mut queue = VecDeque::from([a]);

	while let Some(u) = queue.pop_front() {
		for &(v, e) in &mol.adjacency[u] {
			if e == bond || !ring_bond[e] || dist[v] != usize::MAX {
				continue;
			}
			dist[v] = dist[u] + 1;
			if v == b {
				return Some(dist[v] + 1);
			}
			queue.push_back(v);
		}
	}

	None
}

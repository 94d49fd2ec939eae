//! SMILES reader producing a [`Molecule`]
//!
//! Supports the organic subset, bracket atoms (isotope, chirality marks,
//! hydrogen count, charge, atom class), explicit bonds, branches, ring
//! closures (`1`..`9`, `%nn`) and `.`-separated components. Stereo marks
//! are accepted and discarded.

use std::collections::HashMap;

use crate::core::molecule::{atomic_number, default_valences, Atom, Bond, BondOrder, Molecule};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BondSymbol {
	Single,
	Double,
	Triple,
	Quadruple,
	Aromatic,
	/// `/` or `\`: single bond with a stereo hint
	Directional,
}

impl BondSymbol {
	fn from_byte(c: u8) -> Option<Self> {
		match c {
			b'-' => Some(BondSymbol::Single),
			b'=' => Some(BondSymbol::Double),
			b'#' => Some(BondSymbol::Triple),
			b'$' => Some(BondSymbol::Quadruple),
			b':' => Some(BondSymbol::Aromatic),
			b'/' | b'\\' => Some(BondSymbol::Directional),
			_ => None,
		}
	}

	fn order(self) -> BondOrder {
		match self {
			BondSymbol::Single | BondSymbol::Directional => BondOrder::Single,
			BondSymbol::Double => BondOrder::Double,
			BondSymbol::Triple => BondOrder::Triple,
			BondSymbol::Quadruple => BondOrder::Quadruple,
			BondSymbol::Aromatic => BondOrder::Aromatic,
		}
	}
}

#[derive(Debug, Clone, Copy)]
struct RingOpen {
	atom: usize,
	bond: Option<BondSymbol>,
}

struct Parser<'a> {
	src: &'a str,
	bytes: &'a [u8],
	pos: usize,
	atoms: Vec<Atom>,
	/// Whether hydrogens are implicit (organic subset) for each atom
	implicit_h: Vec<bool>,
	bonds: Vec<Bond>,
	prev: Option<usize>,
	branches: Vec<usize>,
	pending: Option<BondSymbol>,
	rings: HashMap<u16, RingOpen>,
}

/// Parse a SMILES string into a molecule
pub fn parse(smiles: &str) -> Result<Molecule> {
	let mut parser = Parser::new(smiles);
	parser.run()?;
	Ok(parser.finish())
}

impl<'a> Parser<'a> {
	fn new(src: &'a str) -> Self {
		Self {
			src,
			bytes: src.as_bytes(),
			pos: 0,
			atoms: Vec::new(),
			implicit_h: Vec::new(),
			bonds: Vec::new(),
			prev: None,
			branches: Vec::new(),
			pending: None,
			rings: HashMap::new(),
		}
	}

	fn fail(&self, position: usize, reason: impl Into<String>) -> Error {
		Error::Smiles {
			smiles: self.src.to_string(),
			position,
			reason: reason.into(),
		}
	}

	fn peek(&self) -> Option<u8> {
		self.bytes.get(self.pos).copied()
	}

	fn run(&mut self) -> Result<()> {
		if self.bytes.is_empty() {
			return Err(self.fail(0, "empty input"));
		}
		if let Some(idx) = self.src.find(|c: char| !c.is_ascii()) {
			return Err(self.fail(idx, "non-ASCII character"));
		}

		while let Some(c) = self.peek() {
			match c {
				b'(' => {
					let Some(prev) = self.prev else {
						return Err(self.fail(self.pos, "branch without a preceding atom"));
					};
					if self.pending.is_some() {
						return Err(self.fail(self.pos, "bond before branch"));
					}
					self.branches.push(prev);
					self.pos += 1;
				}
				b')' => {
					if self.pending.is_some() {
						return Err(self.fail(self.pos, "dangling bond"));
					}
					let Some(parent) = self.branches.pop() else {
						return Err(self.fail(self.pos, "unbalanced ')'"));
					};
					self.prev = Some(parent);
					self.pos += 1;
				}
				b'.' => {
					if self.pending.is_some() {
						return Err(self.fail(self.pos, "dangling bond"));
					}
					self.prev = None;
					self.pos += 1;
				}
				b'0'..=b'9' => {
					let num = (c - b'0') as u16;
					self.ring_closure(num, self.pos)?;
					self.pos += 1;
				}
				b'%' => {
					let start = self.pos;
					let digits = self.bytes.get(self.pos + 1..self.pos + 3);
					let num = match digits {
						Some([a, b]) if a.is_ascii_digit() && b.is_ascii_digit() => {
							((a - b'0') * 10 + (b - b'0')) as u16
						}
						_ => return Err(self.fail(start, "expected two digits after '%'")),
					};
					self.ring_closure(num, start)?;
					self.pos += 3;
				}
				b'[' => self.bracket_atom()?,
				_ => {
					if let Some(sym) = BondSymbol::from_byte(c) {
						if self.prev.is_none() {
							return Err(self.fail(self.pos, "bond without a preceding atom"));
						}
						if self.pending.is_some() {
							return Err(self.fail(self.pos, "consecutive bond symbols"));
						}
						self.pending = Some(sym);
						self.pos += 1;
					} else {
						self.organic_atom()?;
					}
				}
			}
		}

		if self.pending.is_some() {
			return Err(self.fail(self.bytes.len(), "dangling bond"));
		}
		if !self.branches.is_empty() {
			return Err(self.fail(self.bytes.len(), "unclosed branch"));
		}
		if let Some(num) = self.rings.keys().min() {
			return Err(self.fail(self.bytes.len(), format!("unclosed ring {}", num)));
		}
		Ok(())
	}

	fn organic_atom(&mut self) -> Result<()> {
		let start = self.pos;
		let bytes = self.bytes;
		let rest = &bytes[self.pos..];

		let (atomic, aromatic, len) = match rest {
			[b'C', b'l', ..] => (17, false, 2),
			[b'B', b'r', ..] => (35, false, 2),
			[b'B', ..] => (5, false, 1),
			[b'C', ..] => (6, false, 1),
			[b'N', ..] => (7, false, 1),
			[b'O', ..] => (8, false, 1),
			[b'P', ..] => (15, false, 1),
			[b'S', ..] => (16, false, 1),
			[b'F', ..] => (9, false, 1),
			[b'I', ..] => (53, false, 1),
			[b'b', ..] => (5, true, 1),
			[b'c', ..] => (6, true, 1),
			[b'n', ..] => (7, true, 1),
			[b'o', ..] => (8, true, 1),
			[b'p', ..] => (15, true, 1),
			[b's', ..] => (16, true, 1),
			[b'*', ..] => (0, false, 1),
			_ => {
				let c = rest.first().map(|&b| b as char).unwrap_or(' ');
				return Err(self.fail(start, format!("unexpected character '{}'", c)));
			}
		};

		self.pos += len;
		let mut atom = Atom::new(atomic);
		atom.aromatic = aromatic;
		self.add_atom(atom, atomic != 0, start)
	}

	fn bracket_atom(&mut self) -> Result<()> {
		let start = self.pos;
		self.pos += 1;

		let isotope = self.read_number();

		let (atomic, aromatic) = self.bracket_symbol(start)?;
		let mut atom = Atom::new(atomic);
		atom.aromatic = aromatic;
		atom.isotope = isotope.map(|v| v as u16);

		// chirality: @, @@, @TH1, @SP2, @OH15 ...
		while self.peek() == Some(b'@') {
			self.pos += 1;
		}
		let tags: [&[u8]; 5] = [b"TH", b"AL", b"SP", b"TB", b"OH"];
		if tags.iter().any(|t| self.bytes[self.pos..].starts_with(t)) {
			self.pos += 2;
			self.read_number();
		}

		if self.peek() == Some(b'H') {
			self.pos += 1;
			atom.hydrogens = self.read_number().unwrap_or(1).min(u8::MAX as u32) as u8;
		}

		atom.charge = self.read_charge()?;

		if self.peek() == Some(b':') {
			self.pos += 1;
			if self.read_number().is_none() {
				return Err(self.fail(self.pos, "expected atom class after ':'"));
			}
		}

		if self.peek() != Some(b']') {
			return Err(self.fail(self.pos, "expected ']'"));
		}
		self.pos += 1;

		self.add_atom(atom, false, start)
	}

	fn bracket_symbol(&mut self, start: usize) -> Result<(u8, bool)> {
		let bytes = self.bytes;
		let rest = &bytes[self.pos..];
		match rest {
			[b'*', ..] => {
				self.pos += 1;
				Ok((0, false))
			}
			[first, ..] if first.is_ascii_lowercase() => {
				for (sym, len) in [("se", 2), ("as", 2), ("te", 2), ("b", 1), ("c", 1), ("n", 1), ("o", 1), ("p", 1), ("s", 1)] {
					if rest.starts_with(sym.as_bytes()) {
						let mut upper = sym.to_string();
						upper[..1].make_ascii_uppercase();
						self.pos += len;
						let atomic = atomic_number(&upper).unwrap_or(0);
						return Ok((atomic, true));
					}
				}
				Err(self.fail(self.pos, "unknown aromatic element"))
			}
			[first, second, ..] if first.is_ascii_uppercase() && second.is_ascii_lowercase() => {
				let two = std::str::from_utf8(&rest[..2]).unwrap_or("");
				if let Some(atomic) = atomic_number(two) {
					self.pos += 2;
					return Ok((atomic, false));
				}
				self.single_letter_element(start)
			}
			[first, ..] if first.is_ascii_uppercase() => self.single_letter_element(start),
			_ => Err(self.fail(self.pos, "expected element symbol")),
		}
	}

	fn single_letter_element(&mut self, start: usize) -> Result<(u8, bool)> {
		let one = std::str::from_utf8(&self.bytes[self.pos..self.pos + 1]).unwrap_or("");
		match atomic_number(one) {
			Some(atomic) => {
				self.pos += 1;
				Ok((atomic, false))
			}
			None => Err(self.fail(start, format!("unknown element '{}'", one))),
		}
	}

	fn read_number(&mut self) -> Option<u32> {
		let start = self.pos;
		while self.peek().is_some_and(|c| c.is_ascii_digit()) {
			self.pos += 1;
		}
		if self.pos == start {
			return None;
		}
		std::str::from_utf8(&self.bytes[start..self.pos])
			.ok()
			.and_then(|s| s.parse().ok())
	}

	fn read_charge(&mut self) -> Result<i8> {
		let sign: i32 = match self.peek() {
			Some(b'+') => 1,
			Some(b'-') => -1,
			_ => return Ok(0),
		};
		let symbol = self.bytes[self.pos];
		let start = self.pos;
		self.pos += 1;

		let magnitude = if let Some(n) = self.read_number() {
			n as i32
		} else {
			let mut count = 1;
			while self.peek() == Some(symbol) {
				count += 1;
				self.pos += 1;
			}
			count
		};

		i8::try_from(sign * magnitude).map_err(|_| self.fail(start, "charge out of range"))
	}

	fn add_atom(&mut self, atom: Atom, implicit_h: bool, position: usize) -> Result<()> {
		let idx = self.atoms.len();
		self.atoms.push(atom);
		self.implicit_h.push(implicit_h);

		if let Some(prev) = self.prev {
			let sym = self.pending.take();
			let order = sym
				.map(BondSymbol::order)
				.unwrap_or_else(|| self.default_order(prev, idx));
			self.add_bond(prev, idx, order, position)?;
		}
		self.prev = Some(idx);
		Ok(())
	}

	fn ring_closure(&mut self, num: u16, position: usize) -> Result<()> {
		let Some(atom) = self.prev else {
			return Err(self.fail(position, "ring closure without a preceding atom"));
		};
		let sym = self.pending.take();

		match self.rings.remove(&num) {
			Some(open) => {
				if open.atom == atom {
					return Err(self.fail(position, "ring closure to the same atom"));
				}
				let order = match (open.bond, sym) {
					(Some(a), Some(b)) if a.order() != b.order() => {
						return Err(self.fail(position, format!("conflicting bonds for ring {}", num)));
					}
					(Some(a), _) | (None, Some(a)) => a.order(),
					(None, None) => self.default_order(open.atom, atom),
				};
				self.add_bond(open.atom, atom, order, position)
			}
			None => {
				self.rings.insert(num, RingOpen { atom, bond: sym });
				Ok(())
			}
		}
	}

	fn default_order(&self, a: usize, b: usize) -> BondOrder {
		if self.atoms[a].aromatic && self.atoms[b].aromatic {
			BondOrder::Aromatic
		} else {
			BondOrder::Single
		}
	}

	fn add_bond(&mut self, a: usize, b: usize, order: BondOrder, position: usize) -> Result<()> {
		let duplicate = self
			.bonds
			.iter()
			.any(|bond| (bond.a == a && bond.b == b) || (bond.a == b && bond.b == a));
		if duplicate {
			return Err(self.fail(position, "duplicate bond"));
		}
		self.bonds.push(Bond { a, b, order });
		Ok(())
	}

	fn finish(mut self) -> Molecule {
		let mut used = vec![0u32; self.atoms.len()];
		for bond in &self.bonds {
			used[bond.a] += bond.order.valence();
			used[bond.b] += bond.order.valence();
		}

		for (idx, atom) in self.atoms.iter_mut().enumerate() {
			if !self.implicit_h[idx] {
				continue;
			}
			let valences = default_valences(atom.atomic_number);
			let hydrogens = if atom.aromatic {
				let used = used[idx] + 1;
				valences.first().map(|v| v.saturating_sub(used)).unwrap_or(0)
			} else {
				valences
					.iter()
					.find(|&&v| v >= used[idx])
					.map(|v| v - used[idx])
					.unwrap_or(0)
			};
			atom.hydrogens = hydrogens as u8;
		}

		Molecule::new(self.atoms, self.bonds)
	}
}

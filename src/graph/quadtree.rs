//! Barnes-Hut quadtree for the many-body charge force.
//!
//! Exact pairwise repulsion is O(n²); the tree lets distant groups of nodes
//! act through their aggregate charge instead. Approximation error is bounded
//! by the opening angle `theta`: a region is treated as a single charge when
//! `region_width / distance < theta`, otherwise the walk descends.
//!
//! Uses theta 0.9 and a minimum-distance clamp so coincident or
//! near-coincident points never produce unbounded forces.

const THETA2: f64 = 0.81;
const DISTANCE_MIN2: f64 = 1.0;

/// Deterministic sub-micron offset for exactly coincident points.
///
/// Hash-based rather than drawn from an RNG, so layout runs are
/// reproducible. The link force reuses it for zero-length springs.
pub(super) fn jiggle(seed: f64) -> f64 {
	let x = (seed * 12.9898 + 78.233).sin() * 43758.5453;
	(x - x.floor() - 0.5) * 1e-6
}

enum Cell {
	/// One position, possibly shared by several coincident points.
	Leaf { x: f64, y: f64, points: Vec<usize> },
	/// Quadrants in (top-left, top-right, bottom-left, bottom-right) order,
	/// with the aggregate charge and its weighted center.
	Internal {
		children: [Option<Box<Cell>>; 4],
		strength: f64,
		x: f64,
		y: f64,
	},
}

/// Quadtree over a fixed set of charged points.
pub struct ChargeTree {
	root: Option<Box<Cell>>,
	/// Center and half-extent of the root region (a square).
	cx: f64,
	cy: f64,
	half: f64,
	/// Charge carried by each individual point (negative = repulsive).
	per_point: f64,
}

impl ChargeTree {
	/// Build a tree over `points`, each carrying `per_point` charge.
	pub fn build(points: &[(f64, f64)], per_point: f64) -> Self {
		let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
		let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
		for &(x, y) in points {
			min_x = min_x.min(x);
			min_y = min_y.min(y);
			max_x = max_x.max(x);
			max_y = max_y.max(y);
		}

		let mut tree = if points.is_empty() {
			Self {
				root: None,
				cx: 0.0,
				cy: 0.0,
				half: 1.0,
				per_point,
			}
		} else {
			Self {
				root: None,
				cx: (min_x + max_x) / 2.0,
				cy: (min_y + max_y) / 2.0,
				half: ((max_x - min_x).max(max_y - min_y) / 2.0).max(1.0),
				per_point,
			}
		};

		for (i, &(x, y)) in points.iter().enumerate() {
			let (cx, cy, half) = (tree.cx, tree.cy, tree.half);
			insert(&mut tree.root, i, x, y, cx, cy, half);
		}
		if let Some(root) = tree.root.as_mut() {
			aggregate(root, per_point);
		}
		tree
	}

	/// Accumulated repulsive velocity contribution on the point `index` at
	/// `(tx, ty)`, scaled by the simulation's current alpha.
	pub fn force_on(&self, index: usize, tx: f64, ty: f64, alpha: f64) -> (f64, f64) {
		let mut out = (0.0, 0.0);
		if let Some(root) = self.root.as_deref() {
			self.visit(root, self.cx, self.cy, self.half, index, tx, ty, alpha, &mut out);
		}
		out
	}

	#[allow(clippy::too_many_arguments)]
	fn visit(
		&self,
		cell: &Cell,
		cx: f64,
		cy: f64,
		half: f64,
		index: usize,
		tx: f64,
		ty: f64,
		alpha: f64,
		out: &mut (f64, f64),
	) {
		match cell {
			Cell::Internal {
				children,
				strength,
				x,
				y,
			} => {
				let (dx, dy) = (x - tx, y - ty);
				let l2 = dx * dx + dy * dy;
				let width = half * 2.0;
				if width * width / THETA2 < l2 {
					apply(dx, dy, l2, strength * alpha, out);
					return;
				}
				for (q, child) in children.iter().enumerate() {
					if let Some(child) = child {
						let (qx, qy) = child_center(q, cx, cy, half);
						self.visit(child, qx, qy, half / 2.0, index, tx, ty, alpha, out);
					}
				}
			}
			Cell::Leaf { x, y, points } => {
				let others = points.len() - points.contains(&index) as usize;
				if others == 0 {
					return;
				}
				let (mut dx, mut dy) = (x - tx, y - ty);
				if dx == 0.0 && dy == 0.0 {
					// Coincident stack: push apart along a deterministic offset.
					dx = jiggle(tx + index as f64);
					dy = jiggle(ty - index as f64);
				}
				let l2 = dx * dx + dy * dy;
				apply(dx, dy, l2, self.per_point * others as f64 * alpha, out);
			}
		}
	}
}

fn apply(dx: f64, dy: f64, l2: f64, scaled_strength: f64, out: &mut (f64, f64)) {
	let l2 = if l2 < DISTANCE_MIN2 {
		(DISTANCE_MIN2 * l2).sqrt().max(f64::MIN_POSITIVE)
	} else {
		l2
	};
	let w = scaled_strength / l2;
	out.0 += dx * w;
	out.1 += dy * w;
}

fn quadrant(x: f64, y: f64, cx: f64, cy: f64) -> usize {
	(x >= cx) as usize | ((y >= cy) as usize) << 1
}

/// Center of quadrant `q` within the region `(cx, cy, half)`.
fn child_center(q: usize, cx: f64, cy: f64, half: f64) -> (f64, f64) {
	let quarter = half / 2.0;
	(
		cx + if q & 1 == 1 { quarter } else { -quarter },
		cy + if q & 2 == 2 { quarter } else { -quarter },
	)
}

fn descend(
	children: &mut [Option<Box<Cell>>; 4],
	index: usize,
	x: f64,
	y: f64,
	cx: f64,
	cy: f64,
	half: f64,
) {
	let q = quadrant(x, y, cx, cy);
	let (qx, qy) = child_center(q, cx, cy, half);
	insert(&mut children[q], index, x, y, qx, qy, half / 2.0);
}

fn insert(slot: &mut Option<Box<Cell>>, index: usize, x: f64, y: f64, cx: f64, cy: f64, half: f64) {
	let Some(cell) = slot else {
		*slot = Some(Box::new(Cell::Leaf {
			x,
			y,
			points: vec![index],
		}));
		return;
	};

	match cell.as_mut() {
		Cell::Internal { children, .. } => {
			descend(children, index, x, y, cx, cy, half);
			return;
		}
		Cell::Leaf {
			x: lx,
			y: ly,
			points,
		} => {
			if *lx == x && *ly == y {
				points.push(index);
				return;
			}
		}
	}

	// Distinct position hit an occupied leaf: split it and re-insert both.
	let previous = std::mem::replace(
		cell.as_mut(),
		Cell::Internal {
			children: [None, None, None, None],
			strength: 0.0,
			x: 0.0,
			y: 0.0,
		},
	);
	let Cell::Leaf {
		x: lx,
		y: ly,
		points,
	} = previous
	else {
		unreachable!()
	};
	let Cell::Internal { children, .. } = cell.as_mut() else {
		unreachable!()
	};
	for &p in &points {
		descend(children, p, lx, ly, cx, cy, half);
	}
	descend(children, index, x, y, cx, cy, half);
}

/// Bottom-up pass filling each internal cell's aggregate charge and its
/// charge-weighted center. Returns `(strength, weighted_x, weighted_y)`.
fn aggregate(cell: &mut Cell, per_point: f64) -> (f64, f64, f64) {
	match cell {
		Cell::Leaf { x, y, points } => {
			let strength = per_point * points.len() as f64;
			(strength, strength * *x, strength * *y)
		}
		Cell::Internal {
			children,
			strength,
			x,
			y,
		} => {
			let (mut s, mut wx, mut wy) = (0.0, 0.0, 0.0);
			for child in children.iter_mut().flatten() {
				let (cs, cwx, cwy) = aggregate(child, per_point);
				s += cs;
				wx += cwx;
				wy += cwy;
			}
			*strength = s;
			// All charges share a sign, so the weighted mean is well defined.
			*x = wx / s;
			*y = wy / s;
			(s, wx, wy)
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn single_point_feels_no_force() {
		let tree = ChargeTree::build(&[(100.0, 100.0)], -2000.0);
		assert_eq!(tree.force_on(0, 100.0, 100.0, 1.0), (0.0, 0.0));
	}

	#[test]
	fn two_points_repel_along_their_axis() {
		let points = [(0.0, 0.0), (100.0, 0.0)];
		let tree = ChargeTree::build(&points, -2000.0);

		let (fx, fy) = tree.force_on(0, 0.0, 0.0, 1.0);
		// Negative charge at +x pushes the left point further left.
		assert!(fx < 0.0);
		assert_eq!(fy, 0.0);

		let (gx, gy) = tree.force_on(1, 100.0, 0.0, 1.0);
		assert!((fx + gx).abs() < 1e-9, "forces must be equal and opposite");
		assert_eq!(gy, 0.0);
	}

	#[test]
	fn force_magnitude_matches_inverse_square_charge() {
		// Two points 100 apart: |v| = |strength| * alpha / l² * |dx| = 2000/100.
		let points = [(0.0, 0.0), (100.0, 0.0)];
		let tree = ChargeTree::build(&points, -2000.0);
		let (fx, _) = tree.force_on(0, 0.0, 0.0, 1.0);
		assert!((fx - (-20.0)).abs() < 1e-9);
	}

	#[test]
	fn coincident_points_still_separate() {
		let points = [(50.0, 50.0), (50.0, 50.0)];
		let tree = ChargeTree::build(&points, -2000.0);
		let (fx, fy) = tree.force_on(0, 50.0, 50.0, 1.0);
		assert!(fx != 0.0 || fy != 0.0, "jiggle must break the tie");
		assert!(fx.is_finite() && fy.is_finite());
	}

	#[test]
	fn distant_cluster_approximates_its_aggregate() {
		// A tight far-away cluster should act like one 3x charge at its center.
		let points = [(0.0, 0.0), (1000.0, 0.0), (1001.0, 0.0), (1000.0, 1.0)];
		let tree = ChargeTree::build(&points, -2000.0);
		let (fx, _) = tree.force_on(0, 0.0, 0.0, 1.0);
		let expected = -3.0 * 2000.0 / 1000.0; // sign and order of magnitude
		assert!(fx < 0.0);
		assert!((fx - expected).abs() < expected.abs() * 0.05);
	}

	#[test]
	fn empty_tree_is_inert() {
		let tree = ChargeTree::build(&[], -2000.0);
		assert_eq!(tree.force_on(0, 0.0, 0.0, 1.0), (0.0, 0.0));
	}
}

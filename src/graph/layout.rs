//! Force-directed layout engine for the visible subset of one focus node.
//!
//! The engine is a host-driven simulation: the owning component calls
//! [`LayoutEngine::step`] once per animation frame and the engine advances one
//! physics tick, returning a position snapshot only on every tenth tick. A
//! decaying "alpha" energy scalar both damps the forces and terminates the
//! run; the numerics (charge -2000, centering, 300-unit link distance, alpha
//! and velocity decay rates) are part of the visual contract and must not
//! drift.
//!
//! One engine instance belongs to exactly one focus view. Any dependency
//! change (nodes, edges, canvas size) is handled by cancelling the old engine
//! and constructing a fresh one; positions never carry across runs.

use super::navigator::{PageEdge, VisibleNode};
use super::quadtree::{ChargeTree, jiggle};

/// Node circle radius in canvas units.
pub const NODE_RADIUS: f64 = 120.0;
/// Target separation for linked nodes.
pub const LINK_DISTANCE: f64 = NODE_RADIUS * 2.5;
/// Per-node many-body charge (negative = repulsive).
pub const CHARGE_STRENGTH: f64 = -2000.0;

/// Run ends once alpha falls below this.
const ALPHA_MIN: f64 = 0.001;
/// Fraction of velocity retained per tick.
const VELOCITY_RETAIN: f64 = 0.6;
/// One snapshot per this many ticks.
const SAMPLE_EVERY: u32 = 10;
/// Hard bound on ticks, above the ~300-tick alpha horizon.
const MAX_TICKS: u32 = 1000;

/// Alpha decay sized so the run lasts ~300 ticks.
fn alpha_decay() -> f64 {
	1.0 - ALPHA_MIN.powf(1.0 / 300.0)
}

/// Lifecycle of one layout run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
	/// Constructed, no tick taken yet.
	Idle,
	/// Ticking toward convergence.
	Running,
	/// Alpha fell below threshold (or the tick cap was hit); no further
	/// snapshots will be emitted.
	Converged,
	/// Torn down by the owner; no further snapshots will be emitted.
	Cancelled,
}

/// A node with its sampled position, as handed to the renderer.
///
/// Value copies, not shared simulation state: the engine keeps mutating its
/// own points between samples while consumers hold earlier snapshots.
#[derive(Clone, Debug, PartialEq)]
pub struct PositionedNode {
	/// Node id, used as navigation target for children.
	pub id: String,
	/// Display name.
	pub name: String,
	/// Circle fill color.
	pub color: String,
	/// Longer description shown on the node face.
	pub text: String,
	/// Whether this child can be navigated into.
	pub has_children: bool,
	/// Sampled x position in canvas units.
	pub x: f64,
	/// Sampled y position in canvas units.
	pub y: f64,
}

#[derive(Clone, Copy, Debug, Default)]
struct PointMass {
	x: f64,
	y: f64,
	vx: f64,
	vy: f64,
}

/// An edge surviving index resolution, with its degree-derived spring
/// strength and integration bias precomputed.
#[derive(Clone, Copy, Debug)]
struct SpringLink {
	source: usize,
	target: usize,
	strength: f64,
	bias: f64,
}

/// The simulation for one visible subset.
pub struct LayoutEngine {
	meta: Vec<VisibleNode>,
	points: Vec<PointMass>,
	links: Vec<SpringLink>,
	width: f64,
	height: f64,
	alpha: f64,
	alpha_decay: f64,
	ticks: u32,
	phase: Phase,
}

impl LayoutEngine {
	/// Build an engine for `nodes` laid out on a `width` × `height` canvas.
	///
	/// Edges with an [`UNRESOLVED`](super::navigator::UNRESOLVED) or
	/// out-of-range endpoint are dropped here; the force loop only ever sees
	/// resolved index pairs. Initial positions follow a deterministic
	/// phyllotaxis spiral around the canvas center, so identical inputs
	/// produce identical snapshot streams.
	pub fn new(nodes: Vec<VisibleNode>, edges: &[PageEdge], width: f64, height: f64) -> Self {
		let n = nodes.len();
		let links = resolve_links(edges, n);

		// Phyllotaxis: radius 10·√(0.5+i), golden-angle steps.
		let initial_angle = std::f64::consts::PI * (3.0 - 5.0_f64.sqrt());
		let points = (0..n)
			.map(|i| {
				let radius = 10.0 * (0.5 + i as f64).sqrt();
				let angle = i as f64 * initial_angle;
				PointMass {
					x: width / 2.0 + radius * angle.cos(),
					y: height / 2.0 + radius * angle.sin(),
					vx: 0.0,
					vy: 0.0,
				}
			})
			.collect();

		Self {
			meta: nodes,
			points,
			links,
			width,
			height,
			alpha: 1.0,
			alpha_decay: alpha_decay(),
			ticks: 0,
			phase: Phase::Idle,
		}
	}

	/// Current lifecycle phase.
	pub fn phase(&self) -> Phase {
		self.phase
	}

	/// Whether the engine still wants `step` calls.
	pub fn is_live(&self) -> bool {
		matches!(self.phase, Phase::Idle | Phase::Running)
	}

	/// Ticks taken so far.
	pub fn ticks(&self) -> u32 {
		self.ticks
	}

	/// Tear the run down. A cancelled engine never emits again; the owner
	/// checks this before every scheduled step so a stale animation callback
	/// becomes a no-op.
	pub fn cancel(&mut self) {
		self.phase = Phase::Cancelled;
	}

	/// Advance one tick. Returns a snapshot on every tenth tick, `None`
	/// otherwise. A finished or cancelled engine always returns `None`.
	pub fn step(&mut self) -> Option<Vec<PositionedNode>> {
		match self.phase {
			Phase::Converged | Phase::Cancelled => return None,
			Phase::Idle => self.phase = Phase::Running,
			Phase::Running => {}
		}

		if self.points.is_empty() {
			// Zero-node layout: one empty snapshot, then done.
			self.phase = Phase::Converged;
			return Some(Vec::new());
		}

		self.alpha += (0.0 - self.alpha) * self.alpha_decay;

		self.apply_links();
		self.apply_charge();
		self.apply_center();

		for p in &mut self.points {
			p.vx *= VELOCITY_RETAIN;
			p.vy *= VELOCITY_RETAIN;
			p.x += p.vx;
			p.y += p.vy;
		}

		self.ticks += 1;
		let snapshot = (self.ticks % SAMPLE_EVERY == 0).then(|| self.snapshot());

		if self.alpha < ALPHA_MIN || self.ticks >= MAX_TICKS {
			self.phase = Phase::Converged;
		}
		snapshot
	}

	/// Spring force pulling each linked pair toward [`LINK_DISTANCE`], the
	/// more-connected endpoint moving less (degree bias).
	fn apply_links(&mut self) {
		let alpha = self.alpha;
		let points = &mut self.points;
		for link in &self.links {
			let s = points[link.source];
			let t = points[link.target];
			let mut dx = (t.x + t.vx) - (s.x + s.vx);
			let mut dy = (t.y + t.vy) - (s.y + s.vy);
			if dx == 0.0 && dy == 0.0 {
				// Zero-length spring: separate along the same deterministic
				// offset the charge tree uses for coincident points.
				dx = jiggle(s.x + link.source as f64);
				dy = jiggle(s.y - link.target as f64);
			}
			let len = (dx * dx + dy * dy).sqrt();
			let pull = (len - LINK_DISTANCE) / len * alpha * link.strength;
			let (fx, fy) = (dx * pull, dy * pull);

			points[link.target].vx -= fx * link.bias;
			points[link.target].vy -= fy * link.bias;
			points[link.source].vx += fx * (1.0 - link.bias);
			points[link.source].vy += fy * (1.0 - link.bias);
		}
	}

	/// Many-body repulsion through the Barnes-Hut approximation.
	fn apply_charge(&mut self) {
		let positions: Vec<(f64, f64)> = self.points.iter().map(|p| (p.x, p.y)).collect();
		let tree = ChargeTree::build(&positions, CHARGE_STRENGTH);
		for (i, p) in self.points.iter_mut().enumerate() {
			let (fx, fy) = tree.force_on(i, p.x, p.y, self.alpha);
			p.vx += fx;
			p.vy += fy;
		}
	}

	/// Translate every point so the centroid sits at the canvas center.
	fn apply_center(&mut self) {
		let n = self.points.len() as f64;
		let sx = self.points.iter().map(|p| p.x).sum::<f64>() / n - self.width / 2.0;
		let sy = self.points.iter().map(|p| p.y).sum::<f64>() / n - self.height / 2.0;
		for p in &mut self.points {
			p.x -= sx;
			p.y -= sy;
		}
	}

	fn snapshot(&self) -> Vec<PositionedNode> {
		self.meta
			.iter()
			.zip(&self.points)
			.map(|(v, p)| PositionedNode {
				id: v.node.id.clone(),
				name: v.node.name.clone(),
				color: v.node.color.clone(),
				text: v.node.text.clone(),
				has_children: v.has_children,
				x: p.x,
				y: p.y,
			})
			.collect()
	}
}

/// Drop unresolvable edges and derive per-link spring parameters from node
/// degrees: strength `1 / min(deg)`, bias `deg(source) / (deg(source) +
/// deg(target))`.
fn resolve_links(edges: &[PageEdge], node_count: usize) -> Vec<SpringLink> {
	let resolved: Vec<(usize, usize)> = edges
		.iter()
		.filter_map(|e| {
			let source = usize::try_from(e.source).ok()?;
			let target = usize::try_from(e.target).ok()?;
			(source < node_count && target < node_count).then_some((source, target))
		})
		.collect();

	let mut degree = vec![0usize; node_count];
	for &(s, t) in &resolved {
		degree[s] += 1;
		degree[t] += 1;
	}

	resolved
		.into_iter()
		.map(|(s, t)| SpringLink {
			source: s,
			target: t,
			strength: 1.0 / degree[s].min(degree[t]) as f64,
			bias: degree[s] as f64 / (degree[s] + degree[t]) as f64,
		})
		.collect()
}

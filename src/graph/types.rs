//! Graph data structures shared by the navigator and the layout engine.

use serde::Deserialize;

/// A topic node in the graph.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct GraphNode {
	/// Unique identifier for this node. Used to reference nodes in links.
	pub id: String,
	/// Display name shown inside the node circle and in breadcrumbs.
	pub name: String,
	/// Fill color as a 7-character `#`-prefixed hex string (validated upstream).
	pub color: String,
	/// Longer description revealed on the node face.
	pub text: String,
}

/// A directed link; `target` is a child of `source`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct GraphLink {
	/// Source (parent) node ID.
	pub source: String,
	/// Target (child) node ID.
	pub target: String,
}

/// Complete graph data: the immutable per-load snapshot of nodes and links.
///
/// Constructed once when data loads and read-only afterwards; the navigator
/// derives per-focus views from it without mutating it.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct GraphData {
	/// All nodes, in load order.
	pub nodes: Vec<GraphNode>,
	/// All links, in load order. Link order is semantic: it decides the
	/// parent tie-break and the visible-child ordering.
	pub links: Vec<GraphLink>,
}

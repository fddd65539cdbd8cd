//! Graph navigation: visible subsets, edge re-indexing, and breadcrumbs.
//!
//! All functions here are pure views over [`GraphData`]. For a focus id they
//! derive the one-level visible subset (the focused node plus its direct
//! children), the edge list rewritten against that subset, and the ancestor
//! chain walked parent-by-parent back to the root.
//!
//! Graph data is loosely curated: dangling link endpoints, duplicate ids and
//! multi-parent nodes are all expected and resolved by fixed policy rather
//! than reported. The one hard failure is a cycle in the parent links, which
//! would otherwise make the ancestor walk non-terminating.

use std::collections::HashSet;

use thiserror::Error;

use super::types::{GraphData, GraphNode};

/// Sentinel index for an edge endpoint that is not part of the visible subset.
///
/// Consumers must drop such edges before feeding them to the layout engine.
pub const UNRESOLVED: i32 = -1;

/// Errors produced while navigating the graph.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GraphError {
	/// The parent links loop back onto an already-visited node.
	#[error("ancestor links form a cycle at node `{0}`")]
	CycleDetected(String),
}

/// A node in the visible subset, tagged with whether it has further children.
#[derive(Clone, Debug, PartialEq)]
pub struct VisibleNode {
	/// The node itself.
	pub node: GraphNode,
	/// True iff some link has this node as source and it is not the focus.
	/// Marks children that can themselves be navigated into.
	pub has_children: bool,
}

/// An edge with endpoints rewritten as indices into the visible subset.
///
/// Either endpoint may be [`UNRESOLVED`] when the referenced node is missing
/// from the subset (dangling link data).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageEdge {
	/// Index of the source node in the visible subset, or [`UNRESOLVED`].
	pub source: i32,
	/// Index of the target node in the visible subset, or [`UNRESOLVED`].
	pub target: i32,
}

/// The resolved view for one focus id: visible nodes plus re-indexed edges.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NodeView {
	/// Focused node first (when present), then its direct children.
	pub nodes: Vec<VisibleNode>,
	/// Links leaving the focus, re-indexed against `nodes`.
	pub edges: Vec<PageEdge>,
}

impl NodeView {
	/// Resolve the full view for `focus_id`.
	pub fn resolve(data: &GraphData, focus_id: &str) -> Self {
		let nodes = visible_nodes(data, focus_id);
		let edges = visible_edges(data, &nodes, focus_id);
		Self { nodes, edges }
	}

	/// Whether this view renders as a not-found state: an unknown focus id
	/// yields no nodes, and a childless leaf reached by URL yields no edges.
	/// Neither is an error.
	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty() || self.edges.is_empty()
	}
}

fn has_further_children(data: &GraphData, id: &str, focus_id: &str) -> bool {
	id != focus_id && data.links.iter().any(|link| link.source == id)
}

/// The visible subset for `focus_id`: the focused node first (when present),
/// then its direct children in link order, each node at most once.
pub fn visible_nodes(data: &GraphData, focus_id: &str) -> Vec<VisibleNode> {
	let mut seen: HashSet<&str> = HashSet::new();
	let mut out = Vec::new();

	if let Some(node) = data.nodes.iter().find(|n| n.id == focus_id) {
		seen.insert(node.id.as_str());
		out.push(VisibleNode {
			node: node.clone(),
			has_children: false,
		});
	}

	for link in &data.links {
		if link.source != focus_id || !seen.insert(link.target.as_str()) {
			continue;
		}
		// Duplicate ids: first match wins.
		if let Some(node) = data.nodes.iter().find(|n| n.id == link.target) {
			out.push(VisibleNode {
				has_children: has_further_children(data, &node.id, focus_id),
				node: node.clone(),
			});
		}
	}

	out
}

/// Every link leaving `focus_id`, endpoints rewritten as positions in
/// `visible`. Endpoints that resolve to no visible node map to [`UNRESOLVED`].
pub fn visible_edges(data: &GraphData, visible: &[VisibleNode], focus_id: &str) -> Vec<PageEdge> {
	let index_of = |id: &str| -> i32 {
		visible
			.iter()
			.position(|v| v.node.id == id)
			.map_or(UNRESOLVED, |i| i as i32)
	};

	data.links
		.iter()
		.filter(|link| link.source == focus_id)
		.map(|link| PageEdge {
			source: index_of(&link.source),
			target: index_of(&link.target),
		})
		.collect()
}

/// The ancestor chain of `focus_id`, root first, excluding the focus itself.
///
/// Each step finds the first link (in input order) targeting the current id
/// and resolves its source node; the walk stops when no parent link exists or
/// the parent node is missing. First-link-wins is the tie-break for
/// multi-parent nodes; callers depend on it.
pub fn ancestor_chain(data: &GraphData, focus_id: &str) -> Result<Vec<GraphNode>, GraphError> {
	let mut visited: HashSet<&str> = HashSet::new();
	visited.insert(focus_id);

	let mut chain: Vec<GraphNode> = Vec::new();
	let mut current = focus_id;

	loop {
		let Some(link) = data.links.iter().find(|l| l.target == current) else {
			break;
		};
		let Some(parent) = data.nodes.iter().find(|n| n.id == link.source) else {
			break;
		};
		if !visited.insert(parent.id.as_str()) {
			return Err(GraphError::CycleDetected(parent.id.clone()));
		}
		chain.push(parent.clone());
		current = parent.id.as_str();
	}

	chain.reverse();
	Ok(chain)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::types::GraphLink;

	fn node(id: &str) -> GraphNode {
		GraphNode {
			id: id.into(),
			name: format!("Node {id}"),
			color: "#336699".into(),
			text: String::new(),
		}
	}

	fn link(source: &str, target: &str) -> GraphLink {
		GraphLink {
			source: source.into(),
			target: target.into(),
		}
	}

	fn data(nodes: &[&str], links: &[(&str, &str)]) -> GraphData {
		GraphData {
			nodes: nodes.iter().map(|id| node(id)).collect(),
			links: links.iter().map(|(s, t)| link(s, t)).collect(),
		}
	}

	fn ids(visible: &[VisibleNode]) -> Vec<&str> {
		visible.iter().map(|v| v.node.id.as_str()).collect()
	}

	#[test]
	fn visible_subset_is_focus_plus_direct_children() {
		let data = data(
			&["a", "b", "c", "d"],
			&[("a", "b"), ("a", "c"), ("b", "d")],
		);
		let visible = visible_nodes(&data, "a");
		// One level only: "d" is a grandchild and stays hidden.
		assert_eq!(ids(&visible), vec!["a", "b", "c"]);
	}

	#[test]
	fn duplicate_links_do_not_duplicate_nodes() {
		let data = data(&["a", "b"], &[("a", "b"), ("a", "b")]);
		let visible = visible_nodes(&data, "a");
		assert_eq!(ids(&visible), vec!["a", "b"]);
	}

	#[test]
	fn duplicate_node_ids_resolve_to_first_match() {
		let mut data = data(&["a", "b"], &[("a", "b")]);
		let mut imposter = node("b");
		imposter.name = "Imposter".into();
		data.nodes.push(imposter);

		let visible = visible_nodes(&data, "a");
		assert_eq!(visible.len(), 2);
		assert_eq!(visible[1].node.name, "Node b");
	}

	#[test]
	fn unknown_focus_yields_empty_view() {
		let data = data(&["a", "b"], &[("a", "b")]);
		let view = NodeView::resolve(&data, "zzz");
		assert!(view.is_empty());
		assert!(view.edges.is_empty());
	}

	#[test]
	fn childless_focus_is_an_empty_view() {
		let data = data(&["a", "b"], &[("a", "b")]);
		let view = NodeView::resolve(&data, "b");
		// The leaf itself resolves, but with nothing to stage the view
		// still reads as not-found.
		assert!(!view.nodes.is_empty());
		assert!(view.is_empty());
	}

	#[test]
	fn edges_are_reindexed_against_the_visible_subset() {
		let data = data(&["a", "b", "c"], &[("a", "b"), ("a", "c")]);
		let view = NodeView::resolve(&data, "a");
		assert_eq!(
			view.edges,
			vec![
				PageEdge { source: 0, target: 1 },
				PageEdge { source: 0, target: 2 },
			]
		);
		for edge in &view.edges {
			assert_eq!(edge.source, 0);
		}
	}

	#[test]
	fn dangling_link_target_maps_to_unresolved() {
		let data = data(&["a", "b"], &[("a", "b"), ("a", "ghost")]);
		let view = NodeView::resolve(&data, "a");
		assert_eq!(view.edges[1].target, UNRESOLVED);
	}

	#[test]
	fn has_children_marks_children_not_the_focus() {
		let data = data(&["a", "b", "c"], &[("a", "b"), ("b", "c")]);
		let visible = visible_nodes(&data, "a");
		let a = visible.iter().find(|v| v.node.id == "a").unwrap();
		let b = visible.iter().find(|v| v.node.id == "b").unwrap();
		// "a" has outgoing links but is the focus, so it is never flagged.
		assert!(!a.has_children);
		assert!(b.has_children);
	}

	#[test]
	fn ancestor_chain_is_root_first() {
		let data = data(&["a", "b", "c"], &[("a", "b"), ("b", "c")]);
		let chain = ancestor_chain(&data, "c").unwrap();
		assert_eq!(
			chain.iter().map(|n| n.id.as_str()).collect::<Vec<_>>(),
			vec!["a", "b"]
		);
	}

	#[test]
	fn first_listed_parent_wins() {
		let data = data(&["a", "b", "c"], &[("a", "c"), ("b", "c")]);
		let chain = ancestor_chain(&data, "c").unwrap();
		assert_eq!(
			chain.iter().map(|n| n.id.as_str()).collect::<Vec<_>>(),
			vec!["a"]
		);
	}

	#[test]
	fn chain_stops_at_dangling_parent_link() {
		let data = data(&["b", "c"], &[("ghost", "b"), ("b", "c")]);
		let chain = ancestor_chain(&data, "c").unwrap();
		assert_eq!(
			chain.iter().map(|n| n.id.as_str()).collect::<Vec<_>>(),
			vec!["b"]
		);
	}

	#[test]
	fn cyclic_parent_links_are_detected() {
		let data = data(&["a", "b"], &[("a", "b"), ("b", "a")]);
		let err = ancestor_chain(&data, "a").unwrap_err();
		assert_eq!(err, GraphError::CycleDetected("a".into()));
	}

	#[test]
	fn self_loop_is_detected() {
		let data = data(&["a"], &[("a", "a")]);
		let err = ancestor_chain(&data, "a").unwrap_err();
		assert_eq!(err, GraphError::CycleDetected("a".into()));
	}

	#[test]
	fn root_has_empty_chain() {
		let data = data(&["a", "b"], &[("a", "b")]);
		assert_eq!(ancestor_chain(&data, "a").unwrap(), vec![]);
	}
}

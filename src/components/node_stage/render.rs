//! Canvas drawing for one sampled layout snapshot.
//!
//! Two passes for z-ordering: edge lines first, then node circles with their
//! centered labels on top. Childless nodes draw slightly smaller and faded,
//! signalling that they cannot be navigated into.

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use crate::graph::{PageEdge, PositionedNode, NODE_RADIUS};

/// Radius multiplier for childless (non-navigable) nodes.
pub const LEAF_SCALE: f64 = 0.9;

const EDGE_COLOR: &str = "#d4d4d8";
const LABEL_COLOR: &str = "#ffffff";

/// Renders a full snapshot to the canvas.
pub fn render(
	ctx: &CanvasRenderingContext2d,
	width: f64,
	height: f64,
	snapshot: &[PositionedNode],
	edges: &[PageEdge],
) {
	ctx.clear_rect(0.0, 0.0, width, height);
	draw_edges(ctx, snapshot, edges);
	for node in snapshot {
		draw_node(ctx, node);
	}
}

fn draw_edges(ctx: &CanvasRenderingContext2d, snapshot: &[PositionedNode], edges: &[PageEdge]) {
	ctx.set_stroke_style_str(EDGE_COLOR);
	ctx.set_line_width(2.0);

	for edge in edges {
		// Unresolved endpoints never reach the simulation; skip them when
		// drawing too.
		let (Ok(s), Ok(t)) = (usize::try_from(edge.source), usize::try_from(edge.target)) else {
			continue;
		};
		let (Some(from), Some(to)) = (snapshot.get(s), snapshot.get(t)) else {
			continue;
		};
		ctx.begin_path();
		ctx.move_to(from.x, from.y);
		ctx.line_to(to.x, to.y);
		ctx.stroke();
	}
}

fn draw_node(ctx: &CanvasRenderingContext2d, node: &PositionedNode) {
	let (radius, alpha) = if node.has_children {
		(NODE_RADIUS, 1.0)
	} else {
		(NODE_RADIUS * LEAF_SCALE, 0.9)
	};

	ctx.set_global_alpha(alpha);
	ctx.set_fill_style_str(&node.color);
	ctx.begin_path();
	let _ = ctx.arc(node.x, node.y, radius, 0.0, PI * 2.0);
	ctx.fill();

	ctx.set_fill_style_str(LABEL_COLOR);
	ctx.set_font("bold 30px sans-serif");
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	let _ = ctx.fill_text(&node.name, node.x, node.y);
	ctx.set_global_alpha(1.0);
}

//! Leptos component owning the layout engine for one focused node.
//!
//! The component creates a canvas sized to its parent and drives the engine
//! from a `requestAnimationFrame` loop: one physics tick per frame, a redraw
//! whenever the engine hands back a sampled snapshot. Every change to the
//! view signal (or a window resize) cancels the current engine and starts a
//! fresh one from default positions. At most one engine is live at a time,
//! and a cancelled engine is a no-op for any still-scheduled frame.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;
use send_wrapper::SendWrapper;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, Window};

use super::render;
use crate::graph::{LayoutEngine, NodeView, PositionedNode, NODE_RADIUS};

/// Engine plus everything a frame needs to draw and hit-test.
struct StageContext {
	engine: LayoutEngine,
	ctx: CanvasRenderingContext2d,
	view: NodeView,
	width: f64,
	height: f64,
	/// Positions from the most recent sampled snapshot, kept for hit tests.
	last: Vec<PositionedNode>,
}

fn parent_size(canvas: &HtmlCanvasElement) -> (f64, f64) {
	canvas
		.parent_element()
		.map(|p| (p.client_width() as f64, p.client_height() as f64))
		.filter(|&(w, h)| w > 0.0 && h > 0.0)
		.unwrap_or((800.0, 600.0))
}

fn fresh_context(canvas: &HtmlCanvasElement, view: &NodeView) -> Option<StageContext> {
	let (w, h) = parent_size(canvas);
	canvas.set_width(w as u32);
	canvas.set_height(h as u32);

	let ctx: CanvasRenderingContext2d = canvas.get_context("2d").ok()??.dyn_into().ok()?;

	Some(StageContext {
		engine: LayoutEngine::new(view.nodes.clone(), &view.edges, w, h),
		ctx,
		view: view.clone(),
		width: w,
		height: h,
		last: Vec::new(),
	})
}

/// Id to navigate to for a click at `(x, y)`, if any.
///
/// Later nodes draw on top, so the test runs back to front and the topmost
/// hit wins. A childless node absorbs the click instead of passing it
/// through to whatever sits beneath it, using its smaller drawn radius.
fn click_target(nodes: &[PositionedNode], x: f64, y: f64) -> Option<String> {
	let hit = nodes.iter().rev().find(|node| {
		let radius = if node.has_children {
			NODE_RADIUS
		} else {
			NODE_RADIUS * render::LEAF_SCALE
		};
		(node.x - x).hypot(node.y - y) < radius
	})?;
	hit.has_children.then(|| hit.id.clone())
}

/// Renders the focused node and its children on a force-laid-out canvas.
///
/// Clicking a child that itself has children navigates to it.
#[component]
pub fn NodeStage(#[prop(into)] view: Signal<NodeView>) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let context: Rc<RefCell<Option<StageContext>>> = Rc::new(RefCell::new(None));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let raf_live: Rc<Cell<bool>> = Rc::new(Cell::new(false));
	let (context_init, animate_init, resize_cb_init, raf_live_init) = (
		context.clone(),
		animate.clone(),
		resize_cb.clone(),
		raf_live.clone(),
	);

	Effect::new(move |_| {
		let v = view.get();
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let window: Window = web_sys::window().unwrap();

		// Dependency change: the previous run must never emit again.
		if let Some(c) = context_init.borrow_mut().as_mut() {
			c.engine.cancel();
		}
		*context_init.borrow_mut() = fresh_context(&canvas, &v);

		if animate_init.borrow().is_none() {
			let (context_anim, animate_inner, raf_live_anim) = (
				context_init.clone(),
				animate_init.clone(),
				raf_live_init.clone(),
			);
			*animate_init.borrow_mut() = Some(Closure::new(move || {
				let mut live = false;
				if let Some(ref mut c) = *context_anim.borrow_mut() {
					if let Some(snapshot) = c.engine.step() {
						render::render(&c.ctx, c.width, c.height, &snapshot, &c.view.edges);
						c.last = snapshot;
					}
					live = c.engine.is_live();
				}
				if live {
					if let Some(ref cb) = *animate_inner.borrow() {
						let _ = web_sys::window()
							.unwrap()
							.request_animation_frame(cb.as_ref().unchecked_ref());
					}
				} else {
					raf_live_anim.set(false);
				}
			}));
		}

		if resize_cb_init.borrow().is_none() {
			let (context_resize, canvas_resize) = (context_init.clone(), canvas.clone());
			let (animate_resize, raf_live_resize) = (animate_init.clone(), raf_live_init.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				// Geometry change invalidates the run: tear down, relayout.
				let view = {
					let mut slot = context_resize.borrow_mut();
					let Some(c) = slot.as_mut() else {
						return;
					};
					c.engine.cancel();
					c.view.clone()
				};
				*context_resize.borrow_mut() = fresh_context(&canvas_resize, &view);
				if !raf_live_resize.get() {
					raf_live_resize.set(true);
					if let Some(ref cb) = *animate_resize.borrow() {
						let _ = web_sys::window()
							.unwrap()
							.request_animation_frame(cb.as_ref().unchecked_ref());
					}
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		if !raf_live_init.get() {
			raf_live_init.set(true);
			if let Some(ref cb) = *animate_init.borrow() {
				let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}
	});

	// `on_cleanup` demands `Send + Sync`; these `Rc`s never leave the wasm
	// main thread, so `SendWrapper` satisfies the bound without changing
	// behavior.
	let (context_cleanup, resize_cleanup) = (
		SendWrapper::new(context.clone()),
		SendWrapper::new(resize_cb.clone()),
	);
	on_cleanup(move || {
		if let Some(c) = context_cleanup.borrow_mut().as_mut() {
			c.engine.cancel();
		}
		// The component unmounts on every route change; the listener must go
		// with it or the browser ends up holding a dropped closure.
		if let Some(cb) = resize_cleanup.borrow_mut().take() {
			if let Some(window) = web_sys::window() {
				let _ = window
					.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}
	});

	let navigate = use_navigate();
	let context_click = context.clone();
	let on_click = move |ev: MouseEvent| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let rect = canvas.get_bounding_client_rect();
		let (x, y) = (
			ev.client_x() as f64 - rect.left(),
			ev.client_y() as f64 - rect.top(),
		);

		let target = context_click
			.borrow()
			.as_ref()
			.and_then(|c| click_target(&c.last, x, y));
		if let Some(id) = target {
			navigate(&format!("/{id}"), Default::default());
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="node-stage-canvas"
			on:click=on_click
			style="display: block; width: 100%; height: 100%;"
		/>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn node(id: &str, x: f64, y: f64, has_children: bool) -> PositionedNode {
		PositionedNode {
			id: id.into(),
			name: id.into(),
			color: "#336699".into(),
			text: String::new(),
			has_children,
			x,
			y,
		}
	}

	#[test]
	fn clicking_a_navigable_node_returns_its_id() {
		let nodes = vec![node("hub", 400.0, 300.0, true)];
		assert_eq!(click_target(&nodes, 410.0, 290.0), Some("hub".into()));
	}

	#[test]
	fn clicking_empty_space_returns_nothing() {
		let nodes = vec![node("hub", 400.0, 300.0, true)];
		assert_eq!(click_target(&nodes, 400.0 + NODE_RADIUS + 1.0, 300.0), None);
	}

	#[test]
	fn a_leaf_on_top_absorbs_the_click() {
		// The leaf draws last (on top); the navigable node beneath it must
		// not receive a click aimed at the leaf.
		let nodes = vec![
			node("under", 400.0, 300.0, true),
			node("leaf", 400.0, 300.0, false),
		];
		assert_eq!(click_target(&nodes, 400.0, 300.0), None);
	}

	#[test]
	fn leaf_hit_area_uses_the_smaller_drawn_radius() {
		// Just outside the scaled leaf circle but still inside the full
		// circle of the node beneath: the click reaches the navigable node.
		let nodes = vec![
			node("under", 400.0, 300.0, true),
			node("leaf", 400.0, 300.0, false),
		];
		let x = 400.0 + NODE_RADIUS * (render::LEAF_SCALE + 1.0) / 2.0;
		assert_eq!(click_target(&nodes, x, 300.0), Some("under".into()));
	}
}

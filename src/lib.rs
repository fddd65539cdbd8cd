//! topic-graph: a browsable force-laid-out topic graph.
//!
//! The app shows a knowledge graph one focus node at a time: the focused
//! topic plus its direct children positioned by force simulation, with a
//! breadcrumb trail of ancestors above. The navigable core ([`graph`]) is
//! pure Rust; [`components`] and [`pages`] wire it to the browser.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;
pub mod graph;
pub mod pages;

pub use graph::{GraphData, GraphError, GraphLink, GraphNode, LayoutEngine, NodeView};

use crate::pages::home::Home;
use crate::pages::node::NodePage;
use crate::pages::not_found::NotFound;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("topic-graph: logging initialized");
}

/// Load graph data from a script element with id="graph-data".
/// Expected format: JSON with { nodes: [...], links: [...] }
fn load_graph_data() -> Option<GraphData> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("graph-data")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match serde_json::from_str::<GraphData>(&json_text) {
		Ok(data) => {
			info!(
				"topic-graph: loaded {} nodes, {} links",
				data.nodes.len(),
				data.links.len()
			);
			Some(data)
		}
		Err(e) => {
			warn!("topic-graph: failed to parse graph data: {}", e);
			None
		}
	}
}

/// Main application component.
/// Provides the loaded graph snapshot as context and mounts the routes.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	// One immutable snapshot per load; every page derives its view from it.
	let graph_data = load_graph_data().unwrap_or_default();
	let graph_signal = Signal::derive(move || graph_data.clone());
	provide_context(graph_signal);

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="light" />
		<Title text="Topic Graph" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=Home />
				<Route path=path!("/:node_id") view=NodePage />
			</Routes>
		</Router>
	}
}

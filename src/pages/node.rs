//! Focused-node page: breadcrumb trail plus the force-laid-out stage.
//!
//! The route parameter is the focus id. An id matching nothing, or naming a
//! childless leaf with nothing to stage, is a normal not-found state; a cycle
//! in the ancestor links degrades to an empty breadcrumb with a logged
//! warning rather than taking the page down.

use leptos::prelude::*;
use leptos_router::components::A;
use leptos_router::hooks::use_params_map;
use log::warn;

use crate::components::node_stage::NodeStage;
use crate::graph::{GraphData, GraphNode, NodeView, ancestor_chain};

/// Renders one focused node: its ancestors as links, its children on stage.
#[component]
pub fn NodePage() -> impl IntoView {
	let params = use_params_map();
	let data = expect_context::<Signal<GraphData>>();

	let node_id = Memo::new(move |_| params.read().get("node_id").unwrap_or_default());
	let node_view = Memo::new(move |_| NodeView::resolve(&data.get(), &node_id.get()));
	let ancestors = Memo::new(move |_| match ancestor_chain(&data.get(), &node_id.get()) {
		Ok(chain) => chain,
		Err(e) => {
			warn!("topic-graph: breadcrumb disabled: {e}");
			Vec::new()
		}
	});
	let focus_name = Memo::new(move |_| {
		node_view
			.get()
			.nodes
			.first()
			.map(|v| v.node.name.clone())
			.unwrap_or_default()
	});

	view! {
		<div class="node-page">
			<Show
				when=move || !node_view.get().is_empty()
				fallback=|| view! { <p class="not-found">"404"</p> }
			>
				<div class="breadcrumbs">
					<For
						each=move || ancestors.get()
						key=|n| n.id.clone()
						children=|n: GraphNode| {
							view! {
								<A href=format!("/{}", n.id)>{n.name.clone()}</A>
								<span class="crumb-sep">" > "</span>
							}
						}
					/>
					<span class="crumb-current">{move || focus_name.get()}</span>
				</div>
				<div class="stage-wrap">
					<NodeStage view=node_view />
				</div>
			</Show>
		</div>
	}
}

//! Landing page listing the graph's root topics.

use std::collections::HashSet;

use leptos::prelude::*;
use leptos_router::components::A;

use crate::graph::{GraphData, GraphNode};

/// Nodes that are no link's target: the graph's entry points.
fn root_nodes(data: &GraphData) -> Vec<GraphNode> {
	let mut seen: HashSet<&str> = HashSet::new();
	data.nodes
		.iter()
		.filter(|n| seen.insert(n.id.as_str()))
		.filter(|n| !data.links.iter().any(|l| l.target == n.id))
		.cloned()
		.collect()
}

/// Entry page: pick a root topic to start browsing from.
#[component]
pub fn Home() -> impl IntoView {
	let data = expect_context::<Signal<GraphData>>();
	let roots = Memo::new(move |_| root_nodes(&data.get()));

	view! {
		<main class="home">
			<h1>"Topic Graph"</h1>
			<Show
				when=move || !roots.get().is_empty()
				fallback=|| view! { <p>"No topics loaded."</p> }
			>
				<ul class="root-list">
					<For
						each=move || roots.get()
						key=|n| n.id.clone()
						children=|n: GraphNode| {
							view! {
								<li>
									<A href=format!("/{}", n.id)>{n.name.clone()}</A>
								</li>
							}
						}
					/>
				</ul>
			</Show>
		</main>
	}
}

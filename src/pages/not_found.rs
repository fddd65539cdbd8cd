//! Fallback route for unknown paths.

use leptos::prelude::*;

/// 404 page.
#[component]
pub fn NotFound() -> impl IntoView {
	view! {
		<main class="not-found">
			<h1>"404"</h1>
			<p>"This page does not exist."</p>
		</main>
	}
}

use leptos::prelude::*;

use crate::components::graph_view::GraphView;
use crate::session::ViewerStatus;

fn status_line(status: &ViewerStatus) -> String {
	format!(
		"{} · {} atoms · {} links",
		status.connection.label(),
		status.nodes,
		status.links
	)
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let status = RwSignal::new(ViewerStatus::default());

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-graph">
				<GraphView status=status />
				<div class="graph-overlay">
					<h1>"Atom Graph"</h1>
					<p class="subtitle">"Click an atom to fly to it. Drag to orbit, scroll to zoom."</p>
					<p class="status">{move || status_line(&status.get())}</p>
				</div>
			</div>
		</ErrorBoundary>
	}
}

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::error;
use web_sys::HtmlElement;

use crate::config::ViewerConfig;
use crate::connection::Transport;
use crate::renderer::{ForceGraph3d, GraphRenderer};
use crate::session::{ViewerSession, ViewerStatus};

/// Hosts the 3D renderer and the live connection feeding it.
///
/// `status` is updated after every connection event. The socket is closed
/// when the view is unmounted.
#[component]
pub fn GraphView(status: RwSignal<ViewerStatus>) -> impl IntoView {
	let container_ref = NodeRef::<leptos::html::Div>::new();
	let transport = StoredValue::new_local(None::<Rc<Transport<ForceGraph3d>>>);

	on_cleanup(move || {
		let _ = transport.try_update_value(|t| {
			if let Some(t) = t.take() {
				t.close();
			}
		});
	});

	Effect::new(move |_| {
		let Some(container) = container_ref.get() else {
			return;
		};
		if transport.with_value(Option::is_some) {
			return;
		}
		let container: HtmlElement = container.into();
		let config = ViewerConfig::load();

		let renderer = match ForceGraph3d::mount(&container) {
			Ok(r) => r,
			Err(e) => {
				error!("{e}");
				return;
			}
		};
		let session = Rc::new(RefCell::new(ViewerSession::new(&config, renderer)));

		let session_click = Rc::downgrade(&session);
		session
			.borrow_mut()
			.renderer_mut()
			.on_node_click(Box::new(move |node| {
				if let Some(session) = session_click.upgrade() {
					session.borrow_mut().handle_node_click(&node);
				}
			}));

		match Transport::for_current_page(session, &config.ws_path, move |s| status.set(s)) {
			Ok(t) => {
				t.connect();
				transport.set_value(Some(t));
			}
			Err(e) => error!("{e}"),
		}
	});

	view! { <div node_ref=container_ref class="graph-view" style="position: absolute; inset: 0;" /> }
}

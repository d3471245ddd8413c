use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use log::{debug, error, info, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CloseEvent, Event, MessageEvent, WebSocket};

use super::endpoint::endpoint_url;
use super::machine::ConnectionEvent;
use super::reconnect::timer_delay;
use crate::error::{ConnectionError, js_message};
use crate::renderer::GraphRenderer;
use crate::session::{Command, ViewerSession, ViewerStatus};

/// A browser socket together with the callbacks it dispatches to.
struct LiveSocket {
	ws: WebSocket,
	_on_open: Closure<dyn FnMut()>,
	_on_message: Closure<dyn FnMut(MessageEvent)>,
	_on_error: Closure<dyn FnMut(Event)>,
	_on_close: Closure<dyn FnMut(CloseEvent)>,
}

impl Drop for LiveSocket {
	fn drop(&mut self) {
		// Detach first: the callbacks are freed right after this.
		self.ws.set_onopen(None);
		self.ws.set_onmessage(None);
		self.ws.set_onerror(None);
		self.ws.set_onclose(None);
		if let Err(e) = self.ws.close() {
			warn!("closing socket failed: {}", js_message(&e));
		}
	}
}

/// Owns the live websocket and feeds its events into a [`ViewerSession`].
///
/// Only this type writes to the socket.
pub struct Transport<R: GraphRenderer + 'static> {
	session: Rc<RefCell<ViewerSession<R>>>,
	url: String,
	live: RefCell<Option<LiveSocket>>,
	closed: Cell<bool>,
	notify: Box<dyn Fn(ViewerStatus)>,
}

impl<R: GraphRenderer + 'static> Transport<R> {
	/// Build a transport for the page at `page_url`.
	pub fn new(
		session: Rc<RefCell<ViewerSession<R>>>,
		page_url: &str,
		ws_path: &str,
		notify: impl Fn(ViewerStatus) + 'static,
	) -> Result<Rc<Self>, ConnectionError> {
		let url = endpoint_url(page_url, ws_path)?;
		Ok(Rc::new(Self {
			session,
			url,
			live: RefCell::new(None),
			closed: Cell::new(false),
			notify: Box::new(notify),
		}))
	}

	/// Build a transport for the current page.
	pub fn for_current_page(
		session: Rc<RefCell<ViewerSession<R>>>,
		ws_path: &str,
		notify: impl Fn(ViewerStatus) + 'static,
	) -> Result<Rc<Self>, ConnectionError> {
		let href = web_sys::window()
			.ok_or(ConnectionError::NoWindow)?
			.location()
			.href()
			.map_err(|e| ConnectionError::Socket(js_message(&e)))?;
		Self::new(session, &href, ws_path, notify)
	}

	/// The websocket URL this transport connects to.
	pub fn url(&self) -> &str {
		&self.url
	}

	/// Open the socket. Failures are logged and reported as a closed connection.
	pub fn connect(self: &Rc<Self>) {
		if self.closed.get() {
			debug!("transport closed, not connecting");
			return;
		}
		self.dispatch(ConnectionEvent::Connect);
		info!("connecting to {}", self.url);
		match self.open_socket() {
			Ok(live) => *self.live.borrow_mut() = Some(live),
			Err(e) => {
				error!("{e}");
				self.dispatch(ConnectionEvent::Closed {
					code: 0,
					reason: e.to_string(),
					clean: false,
				});
			}
		}
	}

	/// Shut the socket down for good. Pending reconnects become no-ops.
	pub fn close(&self) {
		self.closed.set(true);
		if self.live.borrow_mut().take().is_some() {
			info!("closed connection to {}", self.url);
		}
	}

	fn open_socket(self: &Rc<Self>) -> Result<LiveSocket, ConnectionError> {
		let ws = WebSocket::new(&self.url).map_err(|e| ConnectionError::Socket(js_message(&e)))?;

		let weak = Rc::downgrade(self);
		let on_open = Closure::<dyn FnMut()>::new(move || {
			with(&weak, |t| t.dispatch(ConnectionEvent::Opened));
		});

		let weak = Rc::downgrade(self);
		let on_message = Closure::<dyn FnMut(MessageEvent)>::new(move |ev: MessageEvent| {
			let Some(text) = ev.data().as_string() else {
				warn!("ignoring non-text frame");
				return;
			};
			with(&weak, |t| t.dispatch(ConnectionEvent::Message(text)));
		});

		let weak = Rc::downgrade(self);
		let on_error = Closure::<dyn FnMut(Event)>::new(move |ev: Event| {
			let reason = format!("{} event", ev.type_());
			with(&weak, |t| t.dispatch(ConnectionEvent::Failed(reason)));
		});

		let weak = Rc::downgrade(self);
		let on_close = Closure::<dyn FnMut(CloseEvent)>::new(move |ev: CloseEvent| {
			with(&weak, |t| {
				t.dispatch(ConnectionEvent::Closed {
					code: ev.code(),
					reason: ev.reason(),
					clean: ev.was_clean(),
				})
			});
		});

		ws.set_onopen(Some(on_open.as_ref().unchecked_ref()));
		ws.set_onmessage(Some(on_message.as_ref().unchecked_ref()));
		ws.set_onerror(Some(on_error.as_ref().unchecked_ref()));
		ws.set_onclose(Some(on_close.as_ref().unchecked_ref()));

		Ok(LiveSocket {
			ws,
			_on_open: on_open,
			_on_message: on_message,
			_on_error: on_error,
			_on_close: on_close,
		})
	}

	fn dispatch(self: &Rc<Self>, event: ConnectionEvent) {
		let (commands, status) = {
			let mut session = self.session.borrow_mut();
			let commands = session.handle_connection_event(event);
			(commands, session.status())
		};
		(self.notify)(status);
		for command in commands {
			match command {
				Command::Send(text) => self.send(&text),
				Command::Reconnect { delay_ms } => self.schedule_reconnect(delay_ms),
			}
		}
	}

	fn send(&self, text: &str) {
		let live = self.live.borrow();
		let Some(live) = live.as_ref() else {
			warn!("no socket to send on");
			return;
		};
		if let Err(e) = live.ws.send_with_str(text) {
			error!("send failed: {}", js_message(&e));
		}
	}

	fn schedule_reconnect(self: &Rc<Self>, delay_ms: u32) {
		let Some(window) = web_sys::window() else {
			error!("{}", ConnectionError::NoWindow);
			return;
		};
		let weak = Rc::downgrade(self);
		// One-shot: the closure frees itself after the timer fires.
		let retry = Closure::once_into_js(move || {
			with(&weak, |t| t.connect());
		});
		if let Err(e) = window.set_timeout_with_callback_and_timeout_and_arguments_0(
			retry.unchecked_ref(),
			timer_delay(delay_ms),
		) {
			error!("could not schedule reconnect: {}", js_message(&e));
		}
	}
}

fn with<R: GraphRenderer + 'static>(weak: &Weak<Transport<R>>, f: impl FnOnce(&Rc<Transport<R>>)) {
	if let Some(transport) = weak.upgrade() {
		f(&transport);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::camera::CameraPose;
	use crate::config::ViewerConfig;
	use crate::connection::ConnectionState;
	use crate::graph::{GraphSnapshot, Position};
	use crate::renderer::NodeClickHandler;

	struct NullRenderer;

	impl GraphRenderer for NullRenderer {
		fn set_graph_data(&mut self, _: &GraphSnapshot) {}
		fn on_node_click(&mut self, _: NodeClickHandler) {}
		fn set_camera_pose(&mut self, _: &CameraPose, _: Option<&Position>, _: u32) {}
	}

	fn transport() -> (Rc<RefCell<ViewerSession<NullRenderer>>>, Rc<Transport<NullRenderer>>) {
		let session = Rc::new(RefCell::new(ViewerSession::new(
			&ViewerConfig::default(),
			NullRenderer,
		)));
		let transport =
			Transport::new(Rc::clone(&session), "https://example.com/view", "/ws", |_| {}).unwrap();
		(session, transport)
	}

	#[test]
	fn derives_url_from_page() {
		let (_, transport) = transport();
		assert_eq!(transport.url(), "wss://example.com/ws");
	}

	#[test]
	fn closed_transport_never_reconnects() {
		let (session, transport) = transport();
		transport.close();
		transport.connect();
		assert_eq!(session.borrow().connection_state(), ConnectionState::Disconnected);
		assert!(transport.live.borrow().is_none());
	}
}

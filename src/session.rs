//! Single-threaded dispatcher tying the model, connection, camera and renderer.
//!
//! Each handler applies the state transition first and then commits its side
//! effects (render calls here, socket work returned as [`Command`]s). Handlers
//! run to completion before the host dispatches the next event.

use log::{debug, error};

use crate::camera::{CameraController, CameraTransition};
use crate::config::ViewerConfig;
use crate::connection::{ConnectionEvent, ConnectionMachine, ConnectionState, Effect};
use crate::graph::{GraphModel, GraphSnapshot, IncomingUpdate, Node};
use crate::renderer::GraphRenderer;

/// Socket work the transport owner must perform.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
	/// Write this text frame.
	Send(String),
	/// Reconnect after a delay.
	Reconnect {
		/// Milliseconds to wait.
		delay_ms: u32,
	},
}

/// Summary shown in the page overlay.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct ViewerStatus {
	/// Connection lifecycle state.
	pub connection: ConnectionState,
	/// Nodes in the graph.
	pub nodes: usize,
	/// Links in the graph.
	pub links: usize,
}

/// One viewing session: the graph, its connection state, camera and renderer.
pub struct ViewerSession<R: GraphRenderer> {
	model: GraphModel,
	machine: ConnectionMachine,
	camera: CameraController,
	renderer: R,
	framed: bool,
}

impl<R: GraphRenderer> ViewerSession<R> {
	/// Empty session drawing into `renderer`.
	pub fn new(config: &ViewerConfig, renderer: R) -> Self {
		Self {
			model: GraphModel::new(),
			machine: ConnectionMachine::new(config.reconnect.clone()),
			camera: CameraController::new(config),
			renderer,
			framed: false,
		}
	}

	/// The current graph.
	pub fn snapshot(&self) -> &GraphSnapshot {
		self.model.current_snapshot()
	}

	/// State of the live connection.
	pub fn connection_state(&self) -> ConnectionState {
		self.machine.state()
	}

	/// Overlay summary.
	pub fn status(&self) -> ViewerStatus {
		let snapshot = self.snapshot();
		ViewerStatus {
			connection: self.connection_state(),
			nodes: snapshot.nodes.len(),
			links: snapshot.links.len(),
		}
	}

	/// The renderer this session draws into.
	pub fn renderer(&self) -> &R {
		&self.renderer
	}

	/// Mutable access to the renderer, for wiring callbacks.
	pub fn renderer_mut(&mut self) -> &mut R {
		&mut self.renderer
	}

	/// Feed a transport event through the connection machine and apply its
	/// effects. Socket work comes back as commands.
	pub fn handle_connection_event(&mut self, event: ConnectionEvent) -> Vec<Command> {
		let mut commands = Vec::new();
		for effect in self.machine.handle(event) {
			match effect {
				Effect::Send(message) => match message.encode() {
					Ok(text) => commands.push(Command::Send(text)),
					Err(e) => error!("{e}"),
				},
				Effect::Apply(update) => self.apply(update),
				Effect::ScheduleReconnect { delay_ms } => {
					commands.push(Command::Reconnect { delay_ms })
				}
			}
		}
		commands
	}

	/// Fly the camera to a clicked node.
	pub fn handle_node_click(&mut self, node: &Node) {
		debug!("node clicked: {:?}", node.name);
		if let Some(transition) = self.camera.focus(node) {
			self.transition(&transition);
		}
	}

	fn apply(&mut self, update: IncomingUpdate) {
		let positions = self.renderer.layout_positions();
		self.model.sync_positions(&positions);
		let snapshot = self.model.merge(update);
		self.renderer.set_graph_data(snapshot);

		if !self.framed {
			self.framed = true;
			let home = self.camera.home();
			self.transition(&home);
		}
	}

	fn transition(&mut self, t: &CameraTransition) {
		self.renderer
			.set_camera_pose(&t.pose, t.look_at.as_ref(), t.duration_ms);
	}
}

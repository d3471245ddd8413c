//! Boundary to the external 3D graph renderer.

mod force_graph_3d;

pub use force_graph_3d::ForceGraph3d;

use crate::camera::CameraPose;
use crate::graph::{GraphSnapshot, Node, Position};

/// Callback invoked with the node the user clicked.
pub type NodeClickHandler = Box<dyn FnMut(Node)>;

/// What the viewer needs from a rendering engine.
///
/// The renderer draws copies of the snapshot; it never writes into the model.
pub trait GraphRenderer {
	/// Push a full snapshot for (re)drawing.
	fn set_graph_data(&mut self, snapshot: &GraphSnapshot);

	/// Register the callback for node clicks, replacing any earlier one.
	fn on_node_click(&mut self, handler: NodeClickHandler);

	/// Animate the camera to `pose`, looking at `look_at` if given.
	fn set_camera_pose(&mut self, pose: &CameraPose, look_at: Option<&Position>, duration_ms: u32);

	/// Layout positions currently assigned by the engine, by node index.
	fn layout_positions(&self) -> Vec<Option<Position>> {
		Vec::new()
	}
}

/// Copy of `snapshot` in the shape the engine resolves links against.
///
/// The engine matches link endpoints to a node's `id` field only, so every
/// node carries its key there, falling back to its name.
pub fn render_payload(snapshot: &GraphSnapshot) -> GraphSnapshot {
	let mut payload = snapshot.clone();
	for node in &mut payload.nodes {
		node.id = node.key();
	}
	payload
}

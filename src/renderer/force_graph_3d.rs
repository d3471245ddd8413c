use js_sys::{Array, Reflect};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

use super::{GraphRenderer, NodeClickHandler, render_payload};
use crate::camera::CameraPose;
use crate::error::{RendererError, js_message};
use crate::graph::{GraphSnapshot, Key, Node, Position};

const COLOR_KEY: &str = "group";
const LABEL_KEY: &str = "name";

#[wasm_bindgen]
extern "C" {
	/// The `3d-force-graph` instance, loaded by the page as a global.
	#[wasm_bindgen(js_name = ForceGraph3D)]
	type JsForceGraph;

	#[wasm_bindgen(catch, constructor, js_class = "ForceGraph3D")]
	fn new(element: &HtmlElement) -> Result<JsForceGraph, JsValue>;

	#[wasm_bindgen(method, js_name = graphData)]
	fn set_graph_data(this: &JsForceGraph, data: &JsValue);

	#[wasm_bindgen(method, js_name = graphData)]
	fn graph_data(this: &JsForceGraph) -> JsValue;

	#[wasm_bindgen(method, js_name = onNodeClick)]
	fn on_node_click(this: &JsForceGraph, callback: &Closure<dyn FnMut(JsValue)>);

	#[wasm_bindgen(method, js_name = cameraPosition)]
	fn camera_position(this: &JsForceGraph, position: &JsValue, look_at: &JsValue, ms: u32);

	#[wasm_bindgen(method, js_name = nodeAutoColorBy)]
	fn node_auto_color_by(this: &JsForceGraph, key: &str);

	#[wasm_bindgen(method, js_name = nodeLabel)]
	fn node_label(this: &JsForceGraph, key: &str);
}

/// Node fields read back from the engine. The engine hangs scene objects off
/// its nodes, so only known keys are pulled out.
#[derive(Deserialize)]
struct RenderedNode {
	#[serde(default)]
	id: Option<Key>,
	#[serde(default)]
	name: Option<String>,
	#[serde(default)]
	group: Option<Key>,
	#[serde(default)]
	x: Option<f64>,
	#[serde(default)]
	y: Option<f64>,
	#[serde(default)]
	z: Option<f64>,
	#[serde(default)]
	home: bool,
}

impl From<RenderedNode> for Node {
	fn from(r: RenderedNode) -> Self {
		Node {
			id: r.id,
			name: r.name,
			group: r.group,
			x: r.x,
			y: r.y,
			z: r.z,
			is_home: r.home,
			..Node::default()
		}
	}
}

#[derive(Deserialize)]
struct LayoutPoint {
	x: Option<f64>,
	y: Option<f64>,
	z: Option<f64>,
}

/// Adapter over the `3d-force-graph` JS library.
pub struct ForceGraph3d {
	graph: JsForceGraph,
	click: Option<Closure<dyn FnMut(JsValue)>>,
}

impl ForceGraph3d {
	/// Create the renderer inside `element`.
	pub fn mount(element: &HtmlElement) -> Result<Self, RendererError> {
		let graph = JsForceGraph::new(element)
			.map_err(|e| RendererError::Unavailable(js_message(&e)))?;
		graph.node_auto_color_by(COLOR_KEY);
		graph.node_label(LABEL_KEY);
		Ok(Self { graph, click: None })
	}

	fn to_js<T: Serialize>(value: &T) -> Result<JsValue, RendererError> {
		let serializer = serde_wasm_bindgen::Serializer::json_compatible();
		value
			.serialize(&serializer)
			.map_err(|e| RendererError::Convert(e.to_string()))
	}
}

impl GraphRenderer for ForceGraph3d {
	fn set_graph_data(&mut self, snapshot: &GraphSnapshot) {
		match Self::to_js(&render_payload(snapshot)) {
			Ok(data) => self.graph.set_graph_data(&data),
			Err(e) => warn!("{e}"),
		}
	}

	fn on_node_click(&mut self, mut handler: NodeClickHandler) {
		let closure = Closure::new(move |value: JsValue| {
			match serde_wasm_bindgen::from_value::<RenderedNode>(value) {
				Ok(node) => handler(node.into()),
				Err(e) => warn!("ignoring click on unreadable node: {e}"),
			}
		});
		self.graph.on_node_click(&closure);
		// Replacing the closure drops the previous one, which the engine no
		// longer references.
		self.click = Some(closure);
	}

	fn set_camera_pose(&mut self, pose: &CameraPose, look_at: Option<&Position>, duration_ms: u32) {
		let position = match Self::to_js(pose) {
			Ok(p) => p,
			Err(e) => {
				warn!("{e}");
				return;
			}
		};
		let look_at = look_at
			.and_then(|p| Self::to_js(p).ok())
			.unwrap_or(JsValue::UNDEFINED);
		self.graph.camera_position(&position, &look_at, duration_ms);
	}

	fn layout_positions(&self) -> Vec<Option<Position>> {
		let data = self.graph.graph_data();
		let nodes = match Reflect::get(&data, &JsValue::from_str("nodes")) {
			Ok(nodes) if Array::is_array(&nodes) => Array::from(&nodes),
			_ => return Vec::new(),
		};
		let positions: Vec<Option<Position>> = nodes
			.iter()
			.map(|node| {
				serde_wasm_bindgen::from_value::<LayoutPoint>(node)
					.ok()
					.and_then(|p| match (p.x, p.y, p.z) {
						(Some(x), Some(y), Some(z)) => Some(Position::new(x, y, z)),
						_ => None,
					})
			})
			.collect();
		debug!("read {} layout positions", positions.len());
		positions
	}
}

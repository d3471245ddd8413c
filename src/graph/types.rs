use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// A string-or-number key, used for node ids, groups and link endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Key {
	/// Numeric key, as JSON numbers arrive.
	Number(Number),
	/// String key.
	Text(String),
}

impl fmt::Display for Key {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Key::Number(n) => write!(f, "{n}"),
			Key::Text(s) => f.write_str(s),
		}
	}
}

impl From<&str> for Key {
	fn from(value: &str) -> Self {
		Key::Text(value.to_owned())
	}
}

impl From<i64> for Key {
	fn from(value: i64) -> Self {
		Key::Number(value.into())
	}
}

impl From<i32> for Key {
	fn from(value: i32) -> Self {
		Key::Number(value.into())
	}
}

/// A point in layout space.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
	/// Horizontal axis.
	pub x: f64,
	/// Vertical axis.
	pub y: f64,
	/// Depth axis, towards the home camera.
	pub z: f64,
}

impl Position {
	/// Point at `(x, y, z)`.
	pub fn new(x: f64, y: f64, z: f64) -> Self {
		Self { x, y, z }
	}

	/// Euclidean distance from the origin.
	pub fn norm(&self) -> f64 {
		(self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
	}

	/// Multiply every axis by `k`.
	pub fn scale(&self, k: f64) -> Self {
		Self::new(self.x * k, self.y * k, self.z * k)
	}
}

/// An atom in the graph.
///
/// Coordinates stay `None` until the layout engine places the node. Fields the
/// viewer does not interpret are kept in `extra` and handed back to the
/// renderer untouched.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Node {
	/// Explicit identity, when the server sends one.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub id: Option<Key>,
	/// Display name; doubles as identity when `id` is absent.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// Categorical key used for colouring.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub group: Option<Key>,
	/// Layout x, filled in by the layout engine.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub x: Option<f64>,
	/// Layout y.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub y: Option<f64>,
	/// Layout z.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub z: Option<f64>,
	/// Marks the distinguished home node.
	#[serde(default, rename = "home", skip_serializing_if = "std::ops::Not::not")]
	pub is_home: bool,
	/// Fields the viewer passes through untouched.
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

impl Node {
	/// A bare node with a name and group, as the server usually sends them.
	pub fn named(name: &str, group: impl Into<Key>) -> Self {
		Self {
			name: Some(name.to_owned()),
			group: Some(group.into()),
			..Self::default()
		}
	}

	/// Identity used by links: the explicit id, falling back to the name.
	pub fn key(&self) -> Option<Key> {
		self.id
			.clone()
			.or_else(|| self.name.as_deref().map(Key::from))
	}

	/// Layout position, once all three coordinates have been assigned.
	pub fn position(&self) -> Option<Position> {
		match (self.x, self.y, self.z) {
			(Some(x), Some(y), Some(z)) => Some(Position::new(x, y, z)),
			_ => None,
		}
	}

	/// Assign all three coordinates.
	pub fn set_position(&mut self, pos: Position) {
		self.x = Some(pos.x);
		self.y = Some(pos.y);
		self.z = Some(pos.z);
	}

	/// Builder form of [`Node::set_position`].
	pub fn with_position(mut self, x: f64, y: f64, z: f64) -> Self {
		self.set_position(Position::new(x, y, z));
		self
	}
}

/// A relation between two nodes, by node key.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Link {
	/// Key of the first endpoint.
	pub source: Key,
	/// Key of the second endpoint.
	pub target: Key,
	/// Fields the viewer passes through untouched.
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

impl Link {
	/// Link two node keys.
	pub fn new(source: impl Into<Key>, target: impl Into<Key>) -> Self {
		Self {
			source: source.into(),
			target: target.into(),
			extra: Map::new(),
		}
	}
}

/// The full current graph, in arrival order.
#[derive(Clone, Debug, PartialEq, Default, Serialize)]
pub struct GraphSnapshot {
	/// Every node merged so far.
	pub nodes: Vec<Node>,
	/// Every link merged so far.
	pub links: Vec<Link>,
}

/// One decoded inbound batch. Consumed by a single merge.
#[derive(Clone, Debug, PartialEq, Default, Deserialize)]
pub struct IncomingUpdate {
	/// Nodes to append, in arrival order.
	#[serde(default, rename = "nodes")]
	pub new_nodes: Vec<Node>,
	/// Links to append, in arrival order.
	#[serde(default, rename = "links")]
	pub new_links: Vec<Link>,
}

impl IncomingUpdate {
	/// Batch from already-decoded parts.
	pub fn new(new_nodes: Vec<Node>, new_links: Vec<Link>) -> Self {
		Self {
			new_nodes,
			new_links,
		}
	}

	/// True when the batch carries nothing.
	pub fn is_empty(&self) -> bool {
		self.new_nodes.is_empty() && self.new_links.is_empty()
	}
}

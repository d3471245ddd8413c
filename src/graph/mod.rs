//! The session graph: wire-facing types and the append-only model.

mod model;
mod types;

pub use model::GraphModel;
pub use types::{GraphSnapshot, IncomingUpdate, Key, Link, Node, Position};

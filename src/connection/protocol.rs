use serde::Serialize;

use crate::error::ProtocolError;
use crate::graph::IncomingUpdate;

/// Messages the viewer sends to the graph server.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OutboundMessage {
	/// Ask for the initial subgraph around the home node.
	Home,
}

impl OutboundMessage {
	/// Wire form of the message.
	pub fn encode(&self) -> Result<String, ProtocolError> {
		serde_json::to_string(self).map_err(ProtocolError::Encode)
	}
}

/// Decode one inbound text frame into an update batch.
pub fn decode_update(text: &str) -> Result<IncomingUpdate, ProtocolError> {
	serde_json::from_str(text).map_err(ProtocolError::Decode)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::Key;

	#[test]
	fn home_request_wire_form() {
		assert_eq!(OutboundMessage::Home.encode().unwrap(), r#"{"type":"home"}"#);
	}

	#[test]
	fn decodes_nodes_and_links() {
		let update = decode_update(
			r#"{"nodes":[{"name":"A","group":1},{"name":"B","group":"x"}],
			    "links":[{"source":"A","target":"B","value":2}]}"#,
		)
		.unwrap();
		assert_eq!(update.new_nodes.len(), 2);
		assert_eq!(update.new_links[0].source, Key::from("A"));
		assert_eq!(update.new_links[0].extra["value"], 2);
	}

	#[test]
	fn missing_sections_decode_as_empty() {
		assert!(decode_update(r#"{"nodes":[]}"#).unwrap().is_empty());
		assert!(decode_update("{}").unwrap().is_empty());
	}

	#[test]
	fn malformed_payloads_are_decode_errors() {
		for bad in ["", "{nodes:", "[1,2]", r#"{"links":[{"source":"A"}]}"#] {
			assert!(
				matches!(decode_update(bad), Err(ProtocolError::Decode(_))),
				"accepted {bad:?}"
			);
		}
	}
}

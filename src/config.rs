//! Viewer configuration.
//!
//! Read from an optional inline JSON block in the hosting page:
//!
//! ```html
//! <script id="viewer-config" type="application/json">
//!   { "focus_standoff": 60, "reconnect": { "mode": "exponential", "max_attempts": 10 } }
//! </script>
//! ```
//!
//! Every field is optional. A missing block means defaults; a malformed one is
//! logged and also falls back to defaults.

use log::{info, warn};
use serde::Deserialize;

use crate::connection::{DEFAULT_WS_PATH, ReconnectPolicy};
use crate::error::ConfigError;

/// Element id of the inline config block.
pub const CONFIG_ELEMENT_ID: &str = "viewer-config";

/// Tunables for one viewer page.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
	/// Websocket path on the page's host.
	pub ws_path: String,
	/// Camera distance for the initial framing.
	pub home_distance: f64,
	/// Duration of the initial framing; zero jumps straight there.
	pub home_duration_ms: u32,
	/// How far the camera stays from a clicked node.
	pub focus_standoff: f64,
	/// Length of the fly-to animation on click.
	pub focus_duration_ms: u32,
	/// What to do when the connection closes.
	pub reconnect: ReconnectPolicy,
}

impl Default for ViewerConfig {
	fn default() -> Self {
		Self {
			ws_path: DEFAULT_WS_PATH.to_owned(),
			home_distance: 200.0,
			home_duration_ms: 0,
			focus_standoff: 40.0,
			focus_duration_ms: 3000,
			reconnect: ReconnectPolicy::Never,
		}
	}
}

impl ViewerConfig {
	/// Parse a config block; absent fields take defaults.
	pub fn from_json(text: &str) -> Result<Self, ConfigError> {
		Ok(serde_json::from_str(text)?)
	}

	/// Load from the page, falling back to defaults.
	pub fn load() -> Self {
		let text = web_sys::window()
			.and_then(|w| w.document())
			.and_then(|d| d.get_element_by_id(CONFIG_ELEMENT_ID))
			.and_then(|el| el.text_content());
		match text {
			None => Self::default(),
			Some(text) => match Self::from_json(&text) {
				Ok(config) => {
					info!("loaded viewer config: {config:?}");
					config
				}
				Err(e) => {
					warn!("{e}; using defaults");
					Self::default()
				}
			},
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_object_gives_defaults() {
		assert_eq!(ViewerConfig::from_json("{}").unwrap(), ViewerConfig::default());
	}

	#[test]
	fn partial_override() {
		let config = ViewerConfig::from_json(
			r#"{"ws_path":"/graph","focus_standoff":60,"reconnect":{"mode":"exponential"}}"#,
		)
		.unwrap();
		assert_eq!(config.ws_path, "/graph");
		assert_eq!(config.focus_standoff, 60.0);
		assert_eq!(config.home_distance, 200.0);
		assert_eq!(config.reconnect, ReconnectPolicy::exponential());
	}

	#[test]
	fn malformed_json_is_an_error() {
		assert!(ViewerConfig::from_json("{ws_path:").is_err());
		assert!(ViewerConfig::from_json(r#"{"home_distance":"far"}"#).is_err());
	}
}

//! Error taxonomy for the viewer.
//!
//! None of these are fatal to a session: call sites log them and carry on with
//! whatever graph state they already have.

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Failures encoding or decoding wire messages.
#[derive(Error, Debug)]
pub enum ProtocolError {
	/// The frame was not a well-formed update.
	#[error("malformed inbound message: {0}")]
	Decode(#[source] serde_json::Error),

	/// An outbound message could not be serialized.
	#[error("failed to encode outbound message: {0}")]
	Encode(#[source] serde_json::Error),
}

/// Failures deriving the websocket endpoint from the page location.
#[derive(Error, Debug)]
pub enum EndpointError {
	/// The page location is not a URL.
	#[error("invalid page origin: {0}")]
	Parse(#[from] url::ParseError),

	/// The page was not served over http or https.
	#[error("unsupported page scheme '{0}', expected http or https")]
	UnsupportedScheme(String),

	/// The url crate refused the scheme swap.
	#[error("could not rewrite scheme of '{0}'")]
	SchemeRewrite(String),
}

/// Failures reading the inline viewer configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
	/// The config block is not valid JSON for [`crate::config::ViewerConfig`].
	#[error("invalid viewer config: {0}")]
	Json(#[from] serde_json::Error),
}

/// Failures from the browser connection API.
#[derive(Error, Debug)]
pub enum ConnectionError {
	/// Running outside a browser window.
	#[error("no browser window available")]
	NoWindow,

	/// The browser rejected a socket call.
	#[error("websocket error: {0}")]
	Socket(String),

	/// No usable endpoint for this page.
	#[error(transparent)]
	Endpoint(#[from] EndpointError),
}

/// Failures from the external 3D renderer boundary.
#[derive(Error, Debug)]
pub enum RendererError {
	/// The engine script is missing or its constructor threw.
	#[error("3D renderer unavailable: {0}")]
	Unavailable(String),

	/// Graph data could not be turned into a JS value.
	#[error("could not convert graph data for the renderer: {0}")]
	Convert(String),
}

/// Render a thrown JS value as a readable message.
pub fn js_message(value: &JsValue) -> String {
	value
		.as_string()
		.or_else(|| {
			js_sys::JSON::stringify(value)
				.ok()
				.and_then(|s| s.as_string())
		})
		.unwrap_or_else(|| format!("{value:?}"))
}

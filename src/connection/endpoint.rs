use url::Url;

use crate::error::EndpointError;

/// Path the graph server listens on.
pub const DEFAULT_WS_PATH: &str = "/ws";

/// Derive the websocket URL from the page location.
///
/// `https` pages get `wss`, `http` pages get `ws`. Host and port are kept,
/// while path, query and fragment are replaced by `path`.
pub fn endpoint_url(page: &str, path: &str) -> Result<String, EndpointError> {
	let mut url = Url::parse(page)?;
	let scheme = match url.scheme() {
		"https" => "wss",
		"http" => "ws",
		other => return Err(EndpointError::UnsupportedScheme(other.to_owned())),
	};
	url.set_scheme(scheme)
		.map_err(|_| EndpointError::SchemeRewrite(page.to_owned()))?;
	// Credentials in the page URL never travel to the socket.
	let _ = url.set_username("");
	let _ = url.set_password(None);
	url.set_path(path);
	url.set_query(None);
	url.set_fragment(None);
	Ok(url.into())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn secure_origin_upgrades_to_wss() {
		assert_eq!(
			endpoint_url("https://example.com/app", DEFAULT_WS_PATH).unwrap(),
			"wss://example.com/ws"
		);
	}

	#[test]
	fn plain_origin_uses_ws() {
		assert_eq!(
			endpoint_url("http://example.com/app", DEFAULT_WS_PATH).unwrap(),
			"ws://example.com/ws"
		);
	}

	#[test]
	fn port_is_kept_and_query_dropped() {
		assert_eq!(
			endpoint_url("http://localhost:8080/view/?q=rust#top", DEFAULT_WS_PATH).unwrap(),
			"ws://localhost:8080/ws"
		);
	}

	#[test]
	fn other_schemes_are_rejected() {
		assert!(matches!(
			endpoint_url("file:///tmp/index.html", DEFAULT_WS_PATH),
			Err(EndpointError::UnsupportedScheme(s)) if s == "file"
		));
		assert!(matches!(
			endpoint_url("not a url", DEFAULT_WS_PATH),
			Err(EndpointError::Parse(_))
		));
	}
}

use log::{error, info, warn};

use super::protocol::{OutboundMessage, decode_update};
use super::reconnect::ReconnectPolicy;
use crate::graph::IncomingUpdate;

/// Lifecycle of the live connection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ConnectionState {
	/// No socket yet.
	#[default]
	Disconnected,
	/// Socket created, handshake pending.
	Connecting,
	/// Handshake done; updates flow.
	Open,
	/// The socket closed, expectedly or not.
	Closed,
}

impl ConnectionState {
	/// Lowercase name for logs and the status overlay.
	pub fn label(&self) -> &'static str {
		match self {
			ConnectionState::Disconnected => "disconnected",
			ConnectionState::Connecting => "connecting",
			ConnectionState::Open => "open",
			ConnectionState::Closed => "closed",
		}
	}
}

/// Transport events, as delivered by the host event loop.
#[derive(Clone, Debug, PartialEq)]
pub enum ConnectionEvent {
	/// A socket is being opened.
	Connect,
	/// The socket finished its handshake.
	Opened,
	/// One inbound text frame.
	Message(String),
	/// The transport reported an error. A close normally follows.
	Failed(String),
	/// The socket closed.
	Closed {
		/// Close code from the transport.
		code: u16,
		/// Close reason from the transport.
		reason: String,
		/// Whether the closing handshake completed.
		clean: bool,
	},
}

/// Work the transport owner has to carry out after a transition.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
	/// Write a message to the socket.
	Send(OutboundMessage),
	/// Merge a decoded batch into the graph.
	Apply(IncomingUpdate),
	/// Open a new socket after `delay_ms`.
	ScheduleReconnect {
		/// Milliseconds to wait.
		delay_ms: u32,
	},
}

/// Pure connection state machine: `Disconnected -> Connecting -> Open -> Closed`.
///
/// It never touches the socket. Each event yields the effects the caller must
/// commit, so the whole handshake and decode path runs without a browser.
#[derive(Debug, Default)]
pub struct ConnectionMachine {
	state: ConnectionState,
	policy: ReconnectPolicy,
	attempts: u32,
	dropped: usize,
}

impl ConnectionMachine {
	/// A disconnected machine using `policy` after closes.
	pub fn new(policy: ReconnectPolicy) -> Self {
		Self {
			policy,
			..Self::default()
		}
	}

	/// Current lifecycle state.
	pub fn state(&self) -> ConnectionState {
		self.state
	}

	/// Inbound frames discarded because they could not be decoded.
	pub fn dropped_messages(&self) -> usize {
		self.dropped
	}

	/// Apply one event and return the effects to commit.
	pub fn handle(&mut self, event: ConnectionEvent) -> Vec<Effect> {
		match (self.state, event) {
			(ConnectionState::Disconnected | ConnectionState::Closed, ConnectionEvent::Connect) => {
				self.state = ConnectionState::Connecting;
				Vec::new()
			}
			(ConnectionState::Connecting, ConnectionEvent::Opened) => {
				info!("connection open, requesting home subgraph");
				self.state = ConnectionState::Open;
				self.attempts = 0;
				vec![Effect::Send(OutboundMessage::Home)]
			}
			(ConnectionState::Open, ConnectionEvent::Message(text)) => match decode_update(&text) {
				Ok(update) => vec![Effect::Apply(update)],
				Err(e) => {
					self.dropped += 1;
					warn!("dropping inbound message: {e}");
					Vec::new()
				}
			},
			(_, ConnectionEvent::Failed(reason)) => {
				error!("connection error while {}: {reason}", self.state.label());
				Vec::new()
			}
			(previous, ConnectionEvent::Closed { code, reason, clean }) => {
				self.state = ConnectionState::Closed;
				if previous == ConnectionState::Open && clean {
					warn!("connection closed by server (code {code}): {reason}");
				} else {
					error!(
						"connection lost while {} (code {code}, clean: {clean}): {reason}",
						previous.label()
					);
				}
				self.schedule_reconnect()
			}
			(state, event) => {
				warn!("ignoring {event:?} while {}", state.label());
				Vec::new()
			}
		}
	}

	fn schedule_reconnect(&mut self) -> Vec<Effect> {
		match self.policy.delay_ms(self.attempts) {
			Some(delay_ms) => {
				self.attempts += 1;
				info!("reconnect attempt {} in {delay_ms}ms", self.attempts);
				vec![Effect::ScheduleReconnect { delay_ms }]
			}
			None => Vec::new(),
		}
	}
}

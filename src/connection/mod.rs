//! Live connection to the graph server.
//!
//! The state machine, wire codec and endpoint rule are plain Rust; `socket`
//! is the browser glue that drives them.

mod endpoint;
mod machine;
mod protocol;
mod reconnect;
mod socket;

pub use endpoint::{DEFAULT_WS_PATH, endpoint_url};
pub use machine::{ConnectionEvent, ConnectionMachine, ConnectionState, Effect};
pub use protocol::{OutboundMessage, decode_update};
pub use reconnect::{ReconnectPolicy, timer_delay};
pub use socket::Transport;

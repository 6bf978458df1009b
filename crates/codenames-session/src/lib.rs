//! Connection sessions for the Codenames server.
//!
//! This crate moves frames between one client connection and the room it
//! joined. It knows nothing about sockets (that's the transport layer)
//! and nothing about rules (that's the room layer); it only pumps.
//!
//! # How it fits in the stack
//!
//! ```text
//! Room Layer (above)  ← receives commands, pushes snapshots into queues
//!     ↕
//! Session Layer (this crate)  ← inbound + outbound pump per connection
//!     ↕
//! Transport Layer (below)  ← FrameSink / FrameSource halves
//! ```
//!
//! # Key types
//!
//! - [`ConnectionSession`]: joins a room and runs both pumps to completion
//! - [`SessionConfig`]: idle timeout, ping interval, write deadline, and
//!   outbound queue size
//! - [`SessionEnd`]: why a session finished

mod config;
mod error;
mod session;

pub use config::SessionConfig;
pub use error::SessionError;
pub use session::{run_inbound, run_outbound, ConnectionSession, SessionEnd};

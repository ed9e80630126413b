//! parley-core: Conversation session state machine and agent dispatcher
//!
//! This crate holds the non-visual core of the chat client: the persona
//! registry, the per-session state machine (message log, draft, in-flight
//! tracking), and the dispatcher that talks to the remote agent endpoint.

pub mod dispatcher;
pub mod error;
pub mod registry;
pub mod session;
pub mod types;

pub use dispatcher::{AgentEndpoint, Dispatcher, HttpEndpoint};
pub use error::{Error, Result};
pub use session::{Outbound, SendRejected, Session};
pub use types::*;

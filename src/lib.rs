//! A file-backed command bridge.
//!
//! A peer appends lines to an inbox file. Data lines accumulate into a
//! prompt; `build` and `test` echo the prompt to an outbox and a mirror
//! file; `quit` stops the bridge.

pub mod bridge;
pub mod client;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod inbox;
pub mod logging;
pub mod prompt;
pub mod protocol;
pub mod shutdown;
pub mod sink;

pub use bridge::{Bridge, ExitReason, PassOutcome};
pub use client::{BridgeClient, InboxWriter};
pub use config::{Config, ConfigError, CursorMode};
pub use error::BridgeError;
pub use protocol::{Command, InboxLine, PromptKind};
pub use shutdown::ShutdownHandle;

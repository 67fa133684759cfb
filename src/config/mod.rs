pub mod loader;
pub mod types;

pub use loader::ConfigError;
pub use types::{
    Config, CursorMode, DiagnosticsConfig, InboxConfig, PollingConfig, SinksConfig,
};

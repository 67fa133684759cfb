use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub inbox: InboxConfig,
    #[serde(default)]
    pub sinks: SinksConfig,
    #[serde(default)]
    pub polling: PollingConfig,
    /// Echo every inbox line to stdout as it is decoded.
    #[serde(default = "default_echo")]
    pub echo: bool,
    #[serde(default)]
    pub diagnostics: DiagnosticsConfig,
}

/// Where commands are read from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboxConfig {
    /// Line-oriented file the peer appends to.
    #[serde(default = "default_inbox_path")]
    pub path: PathBuf,
    /// How the read position moves between passes.
    #[serde(default)]
    pub cursor: CursorMode,
}

/// Read-position strategy for the inbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CursorMode {
    /// Continue after the last complete line seen; reset on truncation.
    #[default]
    Tail,
    /// Re-read the whole file every pass.
    Rescan,
}

/// Output files receiving command results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SinksConfig {
    /// Sink A, closed on `quit`.
    #[serde(default = "default_outbox_path")]
    pub outbox: PathBuf,
    /// Sink B, receives `BYE` on `quit`.
    #[serde(default = "default_mirror_path")]
    pub mirror: PathBuf,
}

/// Timing and prompt rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollingConfig {
    /// Delay between polling passes in milliseconds (default: 500).
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// Separator used when a prompt is rendered as one string (default: tab).
    #[serde(default = "default_separator")]
    pub separator: char,
}

/// Optional redirection of the process's own standard streams.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticsConfig {
    #[serde(default)]
    pub stdout: Option<PathBuf>,
    #[serde(default)]
    pub stderr: Option<PathBuf>,
    #[serde(default)]
    pub stdin: Option<PathBuf>,
}

fn default_echo() -> bool {
    true
}

fn default_inbox_path() -> PathBuf {
    PathBuf::from("test.pipe.topy")
}

fn default_outbox_path() -> PathBuf {
    PathBuf::from("test.pipe.frompy")
}

fn default_mirror_path() -> PathBuf {
    PathBuf::from("pipebridge.mirror")
}

fn default_interval_ms() -> u64 {
    500
}

fn default_separator() -> char {
    '\t'
}

impl Default for Config {
    fn default() -> Self {
        Self {
            inbox: InboxConfig::default(),
            sinks: SinksConfig::default(),
            polling: PollingConfig::default(),
            echo: default_echo(),
            diagnostics: DiagnosticsConfig::default(),
        }
    }
}

impl Default for InboxConfig {
    fn default() -> Self {
        Self {
            path: default_inbox_path(),
            cursor: CursorMode::default(),
        }
    }
}

impl Default for SinksConfig {
    fn default() -> Self {
        Self {
            outbox: default_outbox_path(),
            mirror: default_mirror_path(),
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            separator: default_separator(),
        }
    }
}

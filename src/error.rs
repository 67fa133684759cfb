//! Error types for the bridge, its sinks and the client side.
//!
//! Every I/O failure carries the path it happened on so the top-level
//! handler can report it without extra context.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while running or driving the bridge.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The inbox file could not be opened.
    #[error("Failed to open inbox '{path}': {source}")]
    OpenInbox {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading or seeking the inbox failed mid-pass.
    #[error("Failed to read inbox '{path}': {source}")]
    ReadInbox {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An output sink could not be created.
    #[error("Failed to open sink '{path}': {source}")]
    OpenSink {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing or flushing a sink failed.
    #[error("Failed to write sink '{path}': {source}")]
    WriteSink {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A write was attempted on the outbox after `quit` closed it.
    #[error("Sink '{path}' is already closed")]
    SinkClosed { path: PathBuf },

    /// Redirecting one of the process's standard streams failed.
    #[error("Failed to redirect {stream} to '{path}': {source}")]
    Redirect {
        stream: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Echoing an inbox line to stdout failed.
    #[error("Failed to echo inbox line to stdout: {source}")]
    Echo {
        #[source]
        source: std::io::Error,
    },

    /// A prompt line would be misread by the bridge.
    #[error("Invalid prompt line {line:?}: lines must not be command words or contain line breaks")]
    InvalidPromptLine { line: String },

    /// The bridge child process could not be started.
    #[error("Failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Polling the bridge child process failed.
    #[error("Failed to wait for bridge process: {source}")]
    ChildWait {
        #[source]
        source: std::io::Error,
    },
}

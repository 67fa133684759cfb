//! Shared test utilities.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{Duration, Instant};

use pipebridge::Config;
use tempfile::TempDir;

/// Inbox, outbox and mirror inside a fresh temp dir.
pub struct BridgeFiles {
    pub dir: TempDir,
    pub inbox: PathBuf,
    pub outbox: PathBuf,
    pub mirror: PathBuf,
}

impl BridgeFiles {
    pub fn new(inbox_content: &str) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let inbox = dir.path().join("test.pipe.topy");
        let outbox = dir.path().join("test.pipe.frompy");
        let mirror = dir.path().join("mirror.log");
        fs::write(&inbox, inbox_content).expect("Failed to write inbox");
        Self {
            dir,
            inbox,
            outbox,
            mirror,
        }
    }

    /// Config pointing at these files, fast polling, no stdout echo.
    pub fn config(&self) -> Config {
        let mut config = Config::default();
        config.inbox.path = self.inbox.clone();
        config.sinks.outbox = self.outbox.clone();
        config.sinks.mirror = self.mirror.clone();
        config.polling.interval_ms = 10;
        config.echo = false;
        config
    }

    pub fn append(&self, text: &str) {
        use std::io::Write;
        let mut file = fs::OpenOptions::new()
            .append(true)
            .open(&self.inbox)
            .expect("Failed to open inbox");
        file.write_all(text.as_bytes()).expect("Failed to append");
    }

    pub fn outbox_text(&self) -> String {
        fs::read_to_string(&self.outbox).expect("Failed to read outbox")
    }

    pub fn mirror_text(&self) -> String {
        fs::read_to_string(&self.mirror).expect("Failed to read mirror")
    }

    /// A config path inside the temp dir that does not exist.
    pub fn absent_config(&self) -> PathBuf {
        self.dir.path().join("no-config.toml")
    }
}

pub fn pipebridge_cmd() -> Command {
    Command::new(env!("CARGO_BIN_EXE_pipebridge"))
}

pub fn bin_path() -> &'static Path {
    Path::new(env!("CARGO_BIN_EXE_pipebridge"))
}

/// Polls `check` until it returns true or `timeout` elapses.
pub fn wait_until(timeout: Duration, mut check: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if check() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(20));
    }
    check()
}

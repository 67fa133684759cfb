mod common;

use common::BridgeFiles;
use pipebridge::{Bridge, CursorMode, ExitReason, PassOutcome, ShutdownHandle};
use std::time::Duration;

#[test]
fn build_echoes_lines_in_arrival_order() {
    let files = BridgeFiles::new("a\nb\nbuild\n");
    let mut bridge = Bridge::open(&files.config()).unwrap();

    bridge.poll_once().unwrap();

    let expected = "Received build prompt\na\nb\n";
    assert_eq!(files.outbox_text(), expected);
    assert_eq!(files.mirror_text(), expected);
    assert!(bridge.prompt().is_empty());
}

#[test]
fn test_uses_its_own_header() {
    let files = BridgeFiles::new("first\nsecond\ntest\n");
    let mut bridge = Bridge::open(&files.config()).unwrap();

    bridge.poll_once().unwrap();

    assert_eq!(files.outbox_text(), "Received test prompt\nfirst\nsecond\n");
    assert_eq!(files.mirror_text(), "Received test prompt\nfirst\nsecond\n");
}

#[test]
fn empty_prompt_writes_only_header() {
    let files = BridgeFiles::new("test\n");
    let mut bridge = Bridge::open(&files.config()).unwrap();

    bridge.poll_once().unwrap();

    assert_eq!(files.outbox_text(), "Received test prompt\n");
    assert_eq!(files.mirror_text(), "Received test prompt\n");
}

#[test]
fn separator_inside_line_is_one_data_line() {
    let files = BridgeFiles::new("x\ty\tbuild\nbuild\n");
    let mut bridge = Bridge::open(&files.config()).unwrap();

    let outcome = bridge.poll_once().unwrap();

    assert_eq!(outcome, PassOutcome::Continue { lines: 2, dispatched: 1 });
    assert_eq!(files.outbox_text(), "Received build prompt\nx\ty\tbuild\n");
}

#[test]
fn consecutive_commands_each_get_their_own_prompt() {
    let files = BridgeFiles::new("a\nbuild\nb\ntest\nbuild\n");
    let mut bridge = Bridge::open(&files.config()).unwrap();

    bridge.poll_once().unwrap();

    assert_eq!(
        files.outbox_text(),
        "Received build prompt\na\nReceived test prompt\nb\nReceived build prompt\n"
    );
}

#[test]
fn quit_writes_bye_and_closes_outbox_regardless_of_prompt() {
    let files = BridgeFiles::new("pending\nquit\n");
    let mut bridge = Bridge::open(&files.config()).unwrap();

    assert_eq!(bridge.poll_once().unwrap(), PassOutcome::Quit);

    assert_eq!(files.outbox_text(), "");
    assert_eq!(files.mirror_text(), "BYE");
    assert!(bridge.prompt().is_empty());
}

#[test]
fn crlf_terminated_commands_are_recognized() {
    let files = BridgeFiles::new("a\r\nbuild\r\n");
    let mut bridge = Bridge::open(&files.config()).unwrap();

    bridge.poll_once().unwrap();

    assert_eq!(files.outbox_text(), "Received build prompt\na\n");
}

#[test]
fn rescan_mode_reprocesses_unchanged_inbox() {
    let files = BridgeFiles::new("a\nbuild\n");
    let mut config = files.config();
    config.inbox.cursor = CursorMode::Rescan;
    let mut bridge = Bridge::open(&config).unwrap();

    bridge.poll_once().unwrap();
    bridge.poll_once().unwrap();

    assert_eq!(
        files.outbox_text(),
        "Received build prompt\na\nReceived build prompt\na\n"
    );
}

#[test]
fn tail_mode_processes_each_line_once() {
    let files = BridgeFiles::new("a\nbuild\n");
    let mut bridge = Bridge::open(&files.config()).unwrap();

    bridge.poll_once().unwrap();
    let second = bridge.poll_once().unwrap();

    assert_eq!(second, PassOutcome::Continue { lines: 0, dispatched: 0 });
    assert_eq!(files.outbox_text(), "Received build prompt\na\n");
}

#[cfg(unix)]
#[test]
fn inbox_renamed_over_by_peer_is_followed() {
    let files = BridgeFiles::new("a\nbuild\n");
    let mut bridge = Bridge::open(&files.config()).unwrap();
    bridge.poll_once().unwrap();

    let staged = files.dir.path().join("inbox.next");
    std::fs::write(&staged, "z\ntest\n").unwrap();
    std::fs::rename(&staged, &files.inbox).unwrap();

    let outcome = bridge.poll_once().unwrap();

    assert_eq!(outcome, PassOutcome::Continue { lines: 2, dispatched: 1 });
    assert_eq!(
        files.outbox_text(),
        "Received build prompt\na\nReceived test prompt\nz\n"
    );
}

#[tokio::test]
async fn run_picks_up_appended_lines_and_stops_on_quit() {
    let files = BridgeFiles::new("a\n");
    let mut bridge = Bridge::open(&files.config()).unwrap();
    let shutdown = ShutdownHandle::new();

    let writer = async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        files.append("b\nbuild\n");
        tokio::time::sleep(Duration::from_millis(50)).await;
        files.append("quit\n");
    };
    let (reason, ()) = tokio::join!(bridge.run(&shutdown), writer);

    assert_eq!(reason.unwrap(), ExitReason::Quit);
    assert_eq!(files.outbox_text(), "Received build prompt\na\nb\n");
    assert_eq!(files.mirror_text(), "Received build prompt\na\nb\nBYE");
}

#[tokio::test]
async fn run_returns_cancelled_on_shutdown() {
    let files = BridgeFiles::new("");
    let mut config = files.config();
    config.polling.interval_ms = 60_000;
    let mut bridge = Bridge::open(&config).unwrap();
    let shutdown = ShutdownHandle::new();

    let trigger = async {
        tokio::time::sleep(Duration::from_millis(30)).await;
        shutdown.signal();
    };
    let (reason, ()) = tokio::time::timeout(
        Duration::from_secs(5),
        async { tokio::join!(bridge.run(&shutdown), trigger) },
    )
    .await
    .expect("run did not observe shutdown");

    assert_eq!(reason.unwrap(), ExitReason::Cancelled);
    assert_eq!(files.mirror_text(), "");
}

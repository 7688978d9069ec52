//! Scenario: full replace of router secrets
//!
//! # Invariants under test
//!
//! 1. Zero rows: erase still runs, rebuild runs with an empty payload, Ok.
//! 2. One active row renders the exact add directive.
//! 3. Inactive rows are fetched but excluded from the rebuild.
//! 4. Unmapped option codes produce the default profile.
//! 5. Exactly two sessions per call; erase is closed before rebuild opens.
//! 6. Running twice with unchanged rows yields identical commands.
//!
//! All tests are pure in-process; no DB or router required.

use std::sync::Arc;

use ppp_reconcile::ERASE_ALL_DIRECTIVE;
use ppp_testkit::{row, MemoryStore, RecordingChannel, SessionEvent};
use ppp_updater::{Update, Updater};
use tokio_util::sync::CancellationToken;

const DEVICE: i64 = 12;

fn updater(store: MemoryStore, channel: &RecordingChannel) -> Updater {
    Updater::new(Arc::new(store), Arc::new(channel.clone()))
}

// ---------------------------------------------------------------------------
// 1. Empty device
// ---------------------------------------------------------------------------

#[tokio::test]
async fn zero_rows_erases_and_rebuilds_empty() {
    let channel = RecordingChannel::new();
    let upd = updater(MemoryStore::new(), &channel);

    let report = upd.update(&CancellationToken::new(), DEVICE).await.unwrap();
    assert_eq!(report.fetched, 0);
    assert_eq!(report.applied, 0);

    assert_eq!(
        channel.commands(),
        vec![ERASE_ALL_DIRECTIVE.to_string(), String::new()]
    );
}

// ---------------------------------------------------------------------------
// 2. Single active row
// ---------------------------------------------------------------------------

#[tokio::test]
async fn single_active_row_renders_exact_directive() {
    let channel = RecordingChannel::new();
    let store = MemoryStore::new().with_rows(DEVICE, vec![row("alice", "p1", "10.1.1.5", 1, "20")]);
    let upd = updater(store, &channel);

    let report = upd.update(&CancellationToken::new(), DEVICE).await.unwrap();
    assert_eq!(report.applied, 1);

    let cmds = channel.commands();
    assert_eq!(cmds.len(), 2);
    assert_eq!(
        cmds[1],
        "/ppp secret add local-address=10.0.0.0 name=alice password=p1 remote-address=10.1.1.5 disabled=yes profile=vpn_10Mb\n"
    );
}

// ---------------------------------------------------------------------------
// 3. Inactive row excluded
// ---------------------------------------------------------------------------

#[tokio::test]
async fn inactive_row_is_excluded() {
    let channel = RecordingChannel::new();
    let store = MemoryStore::new().with_rows(DEVICE, vec![row("bob", "p2", "10.1.1.6", 0, "20")]);
    let upd = updater(store, &channel);

    let report = upd.update(&CancellationToken::new(), DEVICE).await.unwrap();
    assert_eq!(report.fetched, 1);
    assert_eq!(report.applied, 0);
    assert_eq!(
        channel.commands(),
        vec![ERASE_ALL_DIRECTIVE.to_string(), String::new()]
    );
}

// ---------------------------------------------------------------------------
// 4. Unmapped option code
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unmapped_option_code_uses_default_profile() {
    let channel = RecordingChannel::new();
    let store = MemoryStore::new().with_rows(DEVICE, vec![row("carol", "p3", "10.1.1.7", 1, "99")]);
    let upd = updater(store, &channel);

    upd.update(&CancellationToken::new(), DEVICE).await.unwrap();
    assert!(channel.commands()[1].ends_with("profile=vpn_2Mb\n"));
}

// ---------------------------------------------------------------------------
// 5. Session discipline
// ---------------------------------------------------------------------------

#[tokio::test]
async fn each_phase_uses_its_own_session_in_order() {
    let channel = RecordingChannel::new();
    let store = MemoryStore::new().with_rows(
        DEVICE,
        vec![
            row("a", "1", "10.0.0.1", 1, "8"),
            row("b", "2", "10.0.0.2", 0, "8"),
            row("c", "3", "10.0.0.3", 1, "30"),
        ],
    );
    let upd = updater(store, &channel);

    let report = upd.update(&CancellationToken::new(), DEVICE).await.unwrap();
    assert_eq!(report.fetched, 3);
    assert_eq!(report.applied, 2);

    let events = channel.events();
    assert_eq!(events.len(), 6);
    assert_eq!(events[0], SessionEvent::Open(0));
    assert_eq!(
        events[1],
        SessionEvent::Run(0, ERASE_ALL_DIRECTIVE.to_string())
    );
    assert_eq!(events[2], SessionEvent::Close(0));
    assert_eq!(events[3], SessionEvent::Open(1));
    assert!(matches!(&events[4], SessionEvent::Run(1, payload) if payload.lines().count() == 2));
    assert_eq!(events[5], SessionEvent::Close(1));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn multi_thread_runtime_runs_both_phases() {
    let channel = RecordingChannel::new();
    let store = MemoryStore::new().with_rows(DEVICE, vec![row("alice", "p1", "10.1.1.5", 1, "20")]);
    let upd = updater(store, &channel);

    upd.update(&CancellationToken::new(), DEVICE).await.unwrap();
    assert_eq!(channel.sessions_opened(), 2);
}

// ---------------------------------------------------------------------------
// 6. Idempotent end state
// ---------------------------------------------------------------------------

#[tokio::test]
async fn repeated_update_issues_identical_commands() {
    let channel = RecordingChannel::new();
    let store = MemoryStore::new().with_rows(
        DEVICE,
        vec![
            row("zed", "z", "10.9.9.9", 1, "26"),
            row("amy", "a", "10.1.1.1", 1, "12"),
        ],
    );
    let upd = updater(store, &channel);
    let cancel = CancellationToken::new();

    upd.update(&cancel, DEVICE).await.unwrap();
    upd.update(&cancel, DEVICE).await.unwrap();

    let cmds = channel.commands();
    assert_eq!(cmds.len(), 4);
    assert_eq!(cmds[0], cmds[2]);
    assert_eq!(cmds[1], cmds[3]);
    assert!(cmds[1].starts_with("/ppp secret add local-address=10.0.0.0 name=zed "));
}

#[tokio::test]
async fn other_devices_rows_are_not_used() {
    let channel = RecordingChannel::new();
    let store = MemoryStore::new()
        .with_rows(DEVICE, vec![row("mine", "m", "10.0.0.1", 1, "8")])
        .with_rows(13, vec![row("theirs", "t", "10.0.0.2", 1, "8")]);
    let upd = updater(store, &channel);

    upd.update(&CancellationToken::new(), DEVICE).await.unwrap();
    let rebuild = &channel.commands()[1];
    assert!(rebuild.contains("name=mine "));
    assert!(!rebuild.contains("name=theirs "));
}

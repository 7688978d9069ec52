//! Scenario: dry-run planning
//!
//! # Invariants under test
//!
//! 1. `plan` fetches and synthesizes without opening any session.
//! 2. `plan` output matches what `update` sends.
//! 3. Rows loaded from a JSON fixture flow through unchanged.

use std::io::Write;
use std::sync::Arc;

use ppp_testkit::{load_rows_json, row, MemoryStore, RecordingChannel};
use ppp_updater::{Update, Updater};
use tokio_util::sync::CancellationToken;

#[tokio::test]
async fn plan_opens_no_session_and_matches_update() {
    let channel = RecordingChannel::new();
    let store = MemoryStore::new().with_rows(
        7,
        vec![
            row("a", "1", "10.0.0.1", 1, "13"),
            row("b", "2", "10.0.0.2", 0, "13"),
        ],
    );
    let upd = Updater::new(Arc::new(store), Arc::new(channel.clone()));
    let cancel = CancellationToken::new();

    let plan = upd.plan(&cancel, 7).await.unwrap();
    assert_eq!(channel.sessions_opened(), 0);
    assert_eq!(plan.fetched, 2);
    assert_eq!(plan.active, 1);

    upd.update(&cancel, 7).await.unwrap();
    let cmds = channel.commands();
    assert_eq!(cmds[0], plan.erase);
    assert_eq!(cmds[1], plan.rebuild);
}

#[tokio::test]
async fn fixture_rows_flow_through() {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    write!(
        f,
        r#"[
  {{"login":"dave","secret":"pw","address":"10.3.3.3","status":1,"option_code":"25"}},
  {{"login":"erin","secret":"pw2","address":"10.3.3.4","status":1,"option_code":"x"}}
]"#
    )
    .unwrap();

    let rows = load_rows_json(f.path().to_str().unwrap()).unwrap();
    let store = MemoryStore::new().with_rows(3, rows);
    let upd = Updater::new(Arc::new(store), Arc::new(RecordingChannel::new()));

    let plan = upd.plan(&CancellationToken::new(), 3).await.unwrap();
    let lines: Vec<&str> = plan.rebuild.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with("remote-address=10.3.3.3 disabled=yes profile=vpn_20Mb"));
    assert!(lines[1].ends_with("remote-address=10.3.3.4 disabled=yes profile=vpn_2Mb"));
}

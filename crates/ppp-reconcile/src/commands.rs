//! RouterOS command rendering.
//!
//! Output must stay byte-compatible with the router's configuration
//! language; do not reformat.

use crate::ServiceRecord;

/// Removes every local PPP secret on the router.
pub const ERASE_ALL_DIRECTIVE: &str = "/ppp secret remove [/ppp secret find]";

/// Static local address assigned to every rebuilt secret.
pub const LOCAL_ADDRESS_SENTINEL: &str = "10.0.0.0";

/// Stands in for a secret in any operator-facing rendering.
pub const REDACTED_SECRET: &str = "<REDACTED>";

/// One `/ppp secret add` line (no trailing newline).
///
/// Entries are always created with `disabled=yes`.
pub fn add_directive(record: &ServiceRecord) -> String {
    render_add(record, &record.secret)
}

/// Concatenate add directives for the active records, in input order, each
/// terminated by `\n`. Empty when nothing is active.
pub fn rebuild_payload(records: &[ServiceRecord]) -> String {
    join_active(records, add_directive)
}

/// [`rebuild_payload`] with every secret replaced by [`REDACTED_SECRET`].
pub fn redacted_rebuild_payload(records: &[ServiceRecord]) -> String {
    join_active(records, |r| render_add(r, REDACTED_SECRET))
}

fn render_add(record: &ServiceRecord, secret: &str) -> String {
    format!(
        "/ppp secret add local-address={} name={} password={} remote-address={} disabled=yes profile={}",
        LOCAL_ADDRESS_SENTINEL,
        record.login,
        secret,
        record.remote_address,
        record.bandwidth_tier,
    )
}

fn join_active(records: &[ServiceRecord], line: impl Fn(&ServiceRecord) -> String) -> String {
    let mut out = String::new();
    for record in records.iter().filter(|r| r.is_active()) {
        out.push_str(&line(record));
        out.push('\n');
    }
    out
}

use crate::commands::{rebuild_payload, redacted_rebuild_payload, ERASE_ALL_DIRECTIVE};
use crate::ServiceRecord;

/// The two remote payloads for one device, plus bookkeeping counts.
#[derive(Clone, PartialEq, Eq)]
pub struct UpdatePlan {
    pub erase: &'static str,
    pub rebuild: String,
    /// Rows returned by the store.
    pub fetched: usize,
    /// Rows that produced an add directive.
    pub active: usize,
    redacted: String,
}

impl UpdatePlan {
    pub fn from_records(records: &[ServiceRecord]) -> Self {
        Self {
            erase: ERASE_ALL_DIRECTIVE,
            rebuild: rebuild_payload(records),
            fetched: records.len(),
            active: records.iter().filter(|r| r.is_active()).count(),
            redacted: redacted_rebuild_payload(records),
        }
    }

    /// Rebuild payload with every secret masked. Rendered from the records,
    /// so secrets containing spaces or `password=` are masked whole.
    pub fn redacted_payload(&self) -> &str {
        &self.redacted
    }
}

impl std::fmt::Debug for UpdatePlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdatePlan")
            .field("erase", &self.erase)
            .field("rebuild", &self.redacted)
            .field("fetched", &self.fetched)
            .field("active", &self.active)
            .finish()
    }
}

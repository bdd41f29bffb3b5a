//! Append-only audit ledger with hash chain

use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::info;

use super::types::{OverrideAuditEntry, OverrideKind};

/// prev_hash of the first entry
const GENESIS_HASH: &str = "0000000000000000000000000000000000000000000000000000000000000000";

/// A break in the hash chain
#[derive(Debug, Clone, Serialize)]
pub struct AuditChainBreak {
    pub entry_id: u64,
    pub expected_prev_hash: String,
    pub actual_prev_hash: String,
}

/// Chain verification result
#[derive(Debug, Clone, Serialize)]
pub struct AuditChainVerification {
    pub total_entries: u64,
    pub chain_intact: bool,
    pub breaks: Vec<AuditChainBreak>,
}

/// Append-only ledger of override/void audit entries
#[derive(Debug, Default)]
pub struct AuditLedger {
    entries: Vec<OverrideAuditEntry>,
}

impl AuditLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new entry. The entry is immutable once created.
    #[allow(clippy::too_many_arguments)]
    pub fn append(
        &mut self,
        actor_id: &str,
        actor_name: &str,
        order_id: &str,
        instance_id: Option<&str>,
        kind: OverrideKind,
        reason: &str,
        before: serde_json::Value,
        after: serde_json::Value,
    ) -> &OverrideAuditEntry {
        let id = self.entries.len() as u64 + 1;
        let prev_hash = self
            .entries
            .last()
            .map(|e| e.curr_hash.clone())
            .unwrap_or_else(|| GENESIS_HASH.to_string());

        let mut entry = OverrideAuditEntry {
            id,
            timestamp: shared::util::now_millis(),
            actor_id: actor_id.to_string(),
            actor_name: actor_name.to_string(),
            order_id: order_id.to_string(),
            instance_id: instance_id.map(|i| i.to_string()),
            kind,
            reason: reason.to_string(),
            before,
            after,
            prev_hash,
            curr_hash: String::new(),
        };
        entry.curr_hash = entry_hash(&entry);

        info!(
            id,
            kind = %kind,
            order_id,
            actor = actor_name,
            "audit entry appended"
        );

        self.entries.push(entry);
        self.entries.last().expect("just pushed")
    }

    pub fn entries(&self) -> &[OverrideAuditEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries for one order, in append order
    pub fn for_order(&self, order_id: &str) -> Vec<&OverrideAuditEntry> {
        self.entries
            .iter()
            .filter(|e| e.order_id == order_id)
            .collect()
    }

    /// Walk the chain and report any breaks
    pub fn verify_chain(&self) -> AuditChainVerification {
        let mut breaks = Vec::new();
        let mut expected_prev = GENESIS_HASH.to_string();

        for entry in &self.entries {
            if entry.prev_hash != expected_prev {
                breaks.push(AuditChainBreak {
                    entry_id: entry.id,
                    expected_prev_hash: expected_prev.clone(),
                    actual_prev_hash: entry.prev_hash.clone(),
                });
            }
            let recomputed = entry_hash(entry);
            if recomputed != entry.curr_hash {
                breaks.push(AuditChainBreak {
                    entry_id: entry.id,
                    expected_prev_hash: recomputed,
                    actual_prev_hash: entry.curr_hash.clone(),
                });
            }
            expected_prev = entry.curr_hash.clone();
        }

        AuditChainVerification {
            total_entries: self.entries.len() as u64,
            chain_intact: breaks.is_empty(),
            breaks,
        }
    }
}

/// SHA-256 over the entry's content plus the previous hash
fn entry_hash(entry: &OverrideAuditEntry) -> String {
    let mut hasher = Sha256::new();
    hasher.update(entry.prev_hash.as_bytes());
    hasher.update(entry.id.to_be_bytes());
    hasher.update(entry.timestamp.to_be_bytes());
    hasher.update(entry.actor_id.as_bytes());
    hasher.update(entry.actor_name.as_bytes());
    hasher.update(entry.order_id.as_bytes());
    if let Some(instance_id) = &entry.instance_id {
        hasher.update(instance_id.as_bytes());
    }
    hasher.update(entry.kind.to_string().as_bytes());
    hasher.update(entry.reason.as_bytes());
    hasher.update(entry.before.to_string().as_bytes());
    hasher.update(entry.after.to_string().as_bytes());
    hex::encode(hasher.finalize())
}

//! Append-only, hash-chained approval history
use super::error::{Result, WorkflowError};
use super::request::TimeStamp;
use super::scope::{Actor, Role};
use super::status::LeaveStatus;
use super::utils::cbor_hash;
use chrono::Utc;
use sled::Tree;
use sled::transaction::{ConflictableTransactionError, ConflictableTransactionResult, TransactionalTree};
use sled::Transactional;
use std::fmt;

#[derive(Debug, PartialEq, Eq, minicbor::Encode, minicbor::Decode, Clone, Copy)]
pub enum ApprovalAction {
    #[n(0)]
    Approved,
    #[n(1)]
    Rejected,
}

impl fmt::Display for ApprovalAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApprovalAction::Approved => f.write_str("approved"),
            ApprovalAction::Rejected => f.write_str("rejected"),
        }
    }
}

#[derive(Debug, PartialEq, Eq, minicbor::Encode, minicbor::Decode, Clone)]
pub struct ApprovalHistoryEntry {
    #[n(0)]
    pub request_id: String,
    #[n(1)]
    pub seq: u64, // 1-based position in the request's trail, assigned on append
    #[n(2)]
    pub approver_id: String,
    #[n(3)]
    pub approver_name: String,
    #[n(4)]
    pub approver_role: Role,
    #[n(5)]
    pub action: ApprovalAction,
    #[n(6)]
    pub notes: String,
    #[n(7)]
    pub from_status: LeaveStatus,
    #[n(8)]
    pub to_status: LeaveStatus,
    #[n(9)]
    pub timestamp: TimeStamp<Utc>,
    #[n(10)]
    pub prev_hash: Option<String>, // hash of the previous entry for this request
}

// last entry written for a request
#[derive(Debug, PartialEq, Eq, minicbor::Encode, minicbor::Decode, Clone)]
struct LedgerHead {
    #[n(0)]
    seq: u64,
    #[n(1)]
    hash: String,
}

#[derive(Clone)]
pub struct ApprovalLedger {
    entries: Tree,
    heads: Tree,
}

impl ApprovalHistoryEntry {
    pub fn new(
        request_id: &str,
        actor: &Actor,
        action: ApprovalAction,
        notes: &str,
        from_status: LeaveStatus,
        to_status: LeaveStatus,
    ) -> Self {
        Self {
            request_id: request_id.to_string(),
            seq: 0,
            approver_id: actor.id.clone(),
            approver_name: actor.name.clone(),
            approver_role: actor.role,
            action,
            notes: notes.trim().to_string(),
            from_status,
            to_status,
            timestamp: TimeStamp::new(),
            prev_hash: None,
        }
    }

    pub fn hash(&self) -> Result<String> {
        Ok(cbor_hash(self)?.0)
    }
}

fn entry_prefix(request_id: &str) -> Vec<u8> {
    format!("{request_id}/").into_bytes()
}

fn entry_key(request_id: &str, seq: u64) -> Vec<u8> {
    let mut key = entry_prefix(request_id);
    key.extend_from_slice(&seq.to_be_bytes());
    key
}

fn abort_on<T>(value: Result<T>) -> ConflictableTransactionResult<T, WorkflowError> {
    value.map_err(ConflictableTransactionError::Abort)
}

/// Stamp `entry` with its sequence number and chain hash, then write it.
/// Runs inside the caller's transaction so the entry commits with the status change.
pub(crate) fn append_in(
    entries: &TransactionalTree,
    heads: &TransactionalTree,
    mut entry: ApprovalHistoryEntry,
) -> ConflictableTransactionResult<ApprovalHistoryEntry, WorkflowError> {
    let head = match heads.get(entry.request_id.as_bytes())? {
        Some(bytes) => Some(abort_on(
            minicbor::decode::<LedgerHead>(&bytes).map_err(WorkflowError::from),
        )?),
        None => None,
    };

    entry.seq = head.as_ref().map_or(1, |h| h.seq + 1);
    entry.prev_hash = head.map(|h| h.hash);

    let (hash, cbor) = abort_on(cbor_hash(&entry))?;
    let head = LedgerHead {
        seq: entry.seq,
        hash,
    };
    let head_cbor = abort_on(minicbor::to_vec(&head).map_err(WorkflowError::from))?;

    entries.insert(entry_key(&entry.request_id, entry.seq), cbor)?;
    heads.insert(entry.request_id.as_bytes(), head_cbor)?;

    Ok(entry)
}

impl ApprovalLedger {
    pub(crate) fn new(entries: Tree, heads: Tree) -> Self {
        Self { entries, heads }
    }

    /// Insert a decision on its own. Storage failures are propagated.
    pub fn append(&self, entry: ApprovalHistoryEntry) -> Result<ApprovalHistoryEntry> {
        let entry = (&self.entries, &self.heads)
            .transaction(|(entries, heads)| append_in(entries, heads, entry.clone()))?;
        Ok(entry)
    }

    /// The full decision trail for a request, oldest first.
    pub fn entries_for(&self, request_id: &str) -> Result<Vec<ApprovalHistoryEntry>> {
        let mut trail = vec![];
        for item in self.entries.scan_prefix(entry_prefix(request_id)) {
            let (_, bytes) = item?;
            trail.push(minicbor::decode::<ApprovalHistoryEntry>(&bytes)?);
        }
        Ok(trail)
    }

    /// Recompute the hash chain for a request. `false` means an entry was altered or removed.
    pub fn verify_chain(&self, request_id: &str) -> Result<bool> {
        let trail = self.entries_for(request_id)?;
        let head = match self.heads.get(request_id.as_bytes())? {
            Some(bytes) => Some(minicbor::decode::<LedgerHead>(&bytes)?),
            None => None,
        };

        let mut prev: Option<String> = None;
        for (idx, entry) in trail.iter().enumerate() {
            if entry.seq != idx as u64 + 1 || entry.prev_hash != prev {
                return Ok(false);
            }
            prev = Some(entry.hash()?);
        }

        Ok(match head {
            Some(head) => head.seq == trail.len() as u64 && Some(head.hash) == prev,
            None => trail.is_empty(),
        })
    }
}

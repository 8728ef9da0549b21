//! sled-backed persistence with optimistic compare-and-set commits
use super::error::{Result, WorkflowError};
use super::ledger::{ApprovalHistoryEntry, ApprovalLedger, append_in};
use super::request::{LeaveRequest, TimeStamp};
use super::status::LeaveStatus;
use super::ticket::{TicketDirection, TicketLeg};
use sled::transaction::{ConflictableTransactionError, ConflictableTransactionResult, abort};
use sled::{Db, Transactional, Tree};
use std::sync::Arc;
use tracing::debug;

const REQUESTS_TREE: &str = "leave_requests";
const HISTORY_TREE: &str = "approval_history";
const HEADS_TREE: &str = "approval_heads";

#[derive(Clone)]
pub struct LeaveStore {
    instance: Arc<Db>,
    requests: Tree,
    history: Tree,
    heads: Tree,
}

fn encode_record(request: &LeaveRequest) -> Result<Vec<u8>> {
    Ok(minicbor::to_vec(request)?)
}

fn decode_record(bytes: &[u8]) -> Result<LeaveRequest> {
    Ok(minicbor::decode(bytes)?)
}

impl LeaveStore {
    pub fn new(instance: Arc<Db>) -> Result<Self> {
        let requests = instance.open_tree(REQUESTS_TREE)?;
        let history = instance.open_tree(HISTORY_TREE)?;
        let heads = instance.open_tree(HEADS_TREE)?;
        Ok(Self {
            instance,
            requests,
            history,
            heads,
        })
    }

    pub fn ledger(&self) -> ApprovalLedger {
        ApprovalLedger::new(self.history.clone(), self.heads.clone())
    }

    pub fn flush(&self) -> Result<()> {
        self.instance.flush()?;
        Ok(())
    }

    /// Insert a freshly created request. Fails with `Conflict` if the id is taken.
    pub fn insert_new(&self, request: &LeaveRequest) -> Result<()> {
        let cbor = encode_record(request)?;
        self.requests
            .compare_and_swap(request.id.as_bytes(), None::<&[u8]>, Some(cbor))?
            .map_err(|_| WorkflowError::Conflict {
                request_id: request.id.clone(),
                expected: "no existing record".into(),
            })?;
        Ok(())
    }

    pub fn get(&self, request_id: &str) -> Result<LeaveRequest> {
        debug!(request_id, "loading leave request");
        match self.requests.get(request_id.as_bytes())? {
            Some(bytes) => decode_record(&bytes),
            None => Err(WorkflowError::NotFound(request_id.to_string())),
        }
    }

    pub fn all(&self) -> Result<Vec<LeaveRequest>> {
        let mut requests = vec![];
        for item in self.requests.iter() {
            let (_, bytes) = item?;
            requests.push(decode_record(&bytes)?);
        }
        Ok(requests)
    }

    /// Move `snapshot` to `next` and append `entry`, as one unit.
    ///
    /// The stored status must still equal the snapshot's status; otherwise another
    /// decision won the race and this one fails with `Conflict`. Only the status
    /// and `updated_at` are written back, onto the freshly read record, so ticket
    /// updates committed in between survive.
    pub fn commit_transition(
        &self,
        snapshot: &LeaveRequest,
        next: LeaveStatus,
        entry: ApprovalHistoryEntry,
    ) -> Result<(LeaveRequest, ApprovalHistoryEntry)> {
        let outcome = (&self.requests, &self.history, &self.heads).transaction(
            |(requests, history, heads)| -> ConflictableTransactionResult<_, WorkflowError> {
                let mut current = match requests.get(snapshot.id.as_bytes())? {
                    Some(bytes) => decode_record(&bytes).map_err(ConflictableTransactionError::Abort)?,
                    None => return abort(WorkflowError::NotFound(snapshot.id.clone())),
                };
                if current.status != snapshot.status {
                    return abort(WorkflowError::Conflict {
                        request_id: snapshot.id.clone(),
                        expected: snapshot.status.to_string(),
                    });
                }

                current.status = next;
                current.updated_at = TimeStamp::new();
                let cbor = encode_record(&current).map_err(ConflictableTransactionError::Abort)?;
                requests.insert(snapshot.id.as_bytes(), cbor)?;

                let entry = append_in(history, heads, entry.clone())?;
                Ok((current, entry))
            },
        )?;
        Ok(outcome)
    }

    /// Replace one ticket direction, guarded on that direction being unchanged
    /// since `snapshot` was read and on the request not having been rejected.
    pub fn commit_ticket(
        &self,
        snapshot: &LeaveRequest,
        direction: TicketDirection,
        leg: TicketLeg,
    ) -> Result<LeaveRequest> {
        let updated = self.requests.transaction(|requests| -> ConflictableTransactionResult<_, WorkflowError> {
            let mut current = match requests.get(snapshot.id.as_bytes())? {
                Some(bytes) => decode_record(&bytes).map_err(ConflictableTransactionError::Abort)?,
                None => return abort(WorkflowError::NotFound(snapshot.id.clone())),
            };
            if current.status.is_rejected() {
                return abort(WorkflowError::invalid_transition(
                    &snapshot.id,
                    current.status,
                    "tickets cannot change on a rejected request",
                ));
            }
            if current.ticket(direction) != snapshot.ticket(direction) {
                return abort(WorkflowError::Conflict {
                    request_id: snapshot.id.clone(),
                    expected: format!("unchanged {direction} ticket"),
                });
            }

            *current.ticket_mut(direction) = leg.clone();
            current.updated_at = TimeStamp::new();
            let cbor = encode_record(&current).map_err(ConflictableTransactionError::Abort)?;
            requests.insert(snapshot.id.as_bytes(), cbor)?;
            Ok(current)
        })?;
        Ok(updated)
    }
}

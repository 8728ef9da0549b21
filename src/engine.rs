//! Status transitions along the approval chain
use super::error::{Result, ValidationError, WorkflowError};
use super::ledger::{ApprovalAction, ApprovalHistoryEntry};
use super::request::LeaveRequest;
use super::scope::{Actor, ScopePolicy};
use super::status::{LeaveStatus, Transition};
use super::store::LeaveStore;
use tracing::{info, warn};

pub struct StatusTransitionEngine {
    store: LeaveStore,
    policy: ScopePolicy,
}

impl StatusTransitionEngine {
    pub fn new(store: LeaveStore, policy: ScopePolicy) -> Self {
        Self { store, policy }
    }

    /// Check that `actor` may decide on `request` in its current status.
    /// Returns the chain row for that status.
    pub fn authorize(&self, request: &LeaveRequest, actor: &Actor) -> Result<&'static Transition> {
        let step = match request.status.transition() {
            Some(step) => step,
            None => {
                return Err(WorkflowError::invalid_transition(
                    &request.id,
                    request.status,
                    "request is already final",
                ));
            }
        };

        if actor.role.approver().is_none() {
            warn!(request_id = %request.id, actor = %actor.id, role = %actor.role, "decision by non-approver role");
            return Err(WorkflowError::unauthorized(actor, "role cannot approve or reject"));
        }
        if !self.policy.covers(actor, request) {
            warn!(request_id = %request.id, actor = %actor.id, role = %actor.role, "decision outside actor scope");
            return Err(WorkflowError::unauthorized(
                actor,
                "request is outside the actor's site or department",
            ));
        }
        if actor.role.approver() != Some(step.approver) {
            return Err(WorkflowError::invalid_transition(
                &request.id,
                request.status,
                format!("awaiting {}, not {}", step.approver.step_key(), actor.role),
            ));
        }

        Ok(step)
    }

    /// Advance `request` one step. Not idempotent: once the step has moved on, the
    /// same actor gets `InvalidTransition`.
    pub fn approve(
        &self,
        request: &LeaveRequest,
        actor: &Actor,
        notes: Option<&str>,
    ) -> Result<(LeaveRequest, ApprovalHistoryEntry)> {
        let step = self.authorize(request, actor)?;
        self.decide(request, actor, ApprovalAction::Approved, notes.unwrap_or(""), step.on_approve)
    }

    /// Reject `request` at its current step. Notes are mandatory.
    pub fn reject(
        &self,
        request: &LeaveRequest,
        actor: &Actor,
        notes: &str,
    ) -> Result<(LeaveRequest, ApprovalHistoryEntry)> {
        if notes.trim().is_empty() {
            return Err(ValidationError::EmptyRejectionNotes.into());
        }
        let step = self.authorize(request, actor)?;
        self.decide(request, actor, ApprovalAction::Rejected, notes, step.on_reject)
    }

    fn decide(
        &self,
        request: &LeaveRequest,
        actor: &Actor,
        action: ApprovalAction,
        notes: &str,
        next: LeaveStatus,
    ) -> Result<(LeaveRequest, ApprovalHistoryEntry)> {
        let entry = ApprovalHistoryEntry::new(&request.id, actor, action, notes, request.status, next);

        match self.store.commit_transition(request, next, entry) {
            Ok((updated, entry)) => {
                info!(
                    request_id = %updated.id,
                    actor = %actor.id,
                    role = %actor.role,
                    from = %request.status,
                    to = %updated.status,
                    "leave request {action}"
                );
                Ok((updated, entry))
            }
            Err(e @ WorkflowError::Conflict { .. }) => {
                warn!(request_id = %request.id, actor = %actor.id, expected = %request.status, "lost concurrent decision");
                Err(e)
            }
            Err(e) => Err(e),
        }
    }
}

//! Service layer API for leave workflow operations
use super::config::WorkflowConfig;
use super::engine::StatusTransitionEngine;
use super::error::{Result, WorkflowError};
use super::filter::{self, ListFilter};
use super::ledger::{ApprovalHistoryEntry, ApprovalLedger};
use super::periodic::{self, PeriodicRule};
use super::request::{DraftLimits, JobLevel, LeaveDate, LeaveRequest, LeaveRequestDraft};
use super::scope::{Actor, ScopePolicy};
use super::stats::{self, Counters};
use super::store::LeaveStore;
use super::ticket::{TicketDirection, TicketFields, TicketSubsystem};
use super::utils;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct LeaveService {
    store: LeaveStore,
    ledger: ApprovalLedger,
    engine: StatusTransitionEngine,
    tickets: TicketSubsystem,
    policy: ScopePolicy,
    limits: DraftLimits,
    periodic_rule: PeriodicRule,
    periodic_leave_type: String,
}

impl LeaveService {
    pub fn new(instance: Arc<sled::Db>, config: &WorkflowConfig) -> Result<Self> {
        config.validate()?;
        let store = LeaveStore::new(instance)?;
        let policy = config.scope_policy();
        Ok(Self {
            ledger: store.ledger(),
            engine: StatusTransitionEngine::new(store.clone(), policy.clone()),
            tickets: TicketSubsystem::new(store.clone(), policy.clone()),
            store,
            policy,
            limits: config.draft_limits(),
            periodic_rule: config.periodic_rule(),
            periodic_leave_type: config.periodic.leave_type.clone(),
        })
    }

    /// Open the database named in `config` and build a service over it.
    pub fn open(config: &WorkflowConfig) -> Result<Self> {
        config.validate()?;
        let db = config.sled_config().open()?;
        Self::new(Arc::new(db), config)
    }

    pub fn policy(&self) -> &ScopePolicy {
        &self.policy
    }

    pub fn engine(&self) -> &StatusTransitionEngine {
        &self.engine
    }

    pub fn tickets(&self) -> &TicketSubsystem {
        &self.tickets
    }

    pub fn ledger(&self) -> &ApprovalLedger {
        &self.ledger
    }

    /// File a new request on an employee's behalf.
    pub fn create(&self, draft: LeaveRequestDraft, filed_by: &Actor) -> Result<LeaveRequest> {
        if !filed_by.role.can_file() {
            warn!(actor = %filed_by.id, role = %filed_by.role, "filing by non-filer role");
            return Err(WorkflowError::unauthorized(filed_by, "role cannot file leave requests"));
        }

        let id = utils::new_request_id()?;
        let request = draft.validate_and_finalise(id, filed_by, self.limits)?;

        if !self.policy.covers(filed_by, &request) {
            warn!(actor = %filed_by.id, site = %request.employee.site, "filing outside actor scope");
            return Err(WorkflowError::unauthorized(
                filed_by,
                "employee is outside the actor's site",
            ));
        }

        self.store.insert_new(&request)?;
        info!(
            request_id = %request.id,
            nik = %request.employee.nik,
            category = request.category.as_str(),
            days = request.day_count,
            filed_by = %filed_by.id,
            "leave request created"
        );
        Ok(request)
    }

    /// Fetch a request the actor is allowed to see.
    pub fn get(&self, request_id: &str, actor: &Actor) -> Result<LeaveRequest> {
        let request = self.store.get(request_id)?;
        if !self.policy.covers(actor, &request) {
            return Err(WorkflowError::unauthorized(actor, "request is outside the actor's scope"));
        }
        Ok(request)
    }

    pub fn approve(&self, request_id: &str, actor: &Actor, notes: Option<&str>) -> Result<LeaveRequest> {
        let request = self.store.get(request_id)?;
        let (updated, _) = self.engine.approve(&request, actor, notes)?;
        Ok(updated)
    }

    pub fn reject(&self, request_id: &str, actor: &Actor, notes: &str) -> Result<LeaveRequest> {
        let request = self.store.get(request_id)?;
        let (updated, _) = self.engine.reject(&request, actor, notes)?;
        Ok(updated)
    }

    pub fn issue_or_update_ticket(
        &self,
        request_id: &str,
        direction: TicketDirection,
        fields: &TicketFields,
        actor: &Actor,
    ) -> Result<LeaveRequest> {
        let request = self.store.get(request_id)?;
        self.tickets.issue_or_update(&request, direction, fields, actor)
    }

    /// Requests visible to `actor` that pass `filters`, newest first.
    pub fn list(&self, actor: &Actor, filters: &ListFilter) -> Result<Vec<LeaveRequest>> {
        let all = self.store.all()?;
        let listed = filter::apply(&all, self.policy.visible(actor), filters);
        debug!(actor = %actor.id, role = %actor.role, count = listed.len(), "listed leave requests");
        Ok(listed)
    }

    pub fn stats(&self, actor: &Actor) -> Result<Counters> {
        self.stats_filtered(actor, &ListFilter::default())
    }

    /// Counters over the same base filter a dashboard list uses.
    pub fn stats_filtered(&self, actor: &Actor, filters: &ListFilter) -> Result<Counters> {
        let all = self.store.all()?;
        Ok(stats::compute_stats(&all, self.policy.visible(actor), filters))
    }

    /// Decision trail for a request, oldest first.
    pub fn history(&self, request_id: &str) -> Result<Vec<ApprovalHistoryEntry>> {
        // unknown ids are an error, not an empty trail
        self.store.get(request_id)?;
        self.ledger.entries_for(request_id)
    }

    pub fn previous_periodic_leave(&self, nik: &str) -> Result<Option<LeaveRequest>> {
        let all = self.store.all()?;
        Ok(periodic::previous_periodic_leave(&all, nik, &self.periodic_leave_type))
    }

    /// When the employee is next due a periodic leave, if they have taken one before.
    pub fn next_periodic_eligibility(&self, nik: &str, job_level: JobLevel) -> Result<Option<LeaveDate>> {
        Ok(self
            .previous_periodic_leave(nik)?
            .and_then(|previous| self.periodic_rule.next_eligibility(previous.end_date, job_level)))
    }

    pub fn flush(&self) -> Result<()> {
        self.store.flush()
    }
}

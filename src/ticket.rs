//! Outbound and return travel tickets, tracked independently of the approval chain
use super::error::{Result, ValidationError, WorkflowError};
use super::request::{LeaveCategory, LeaveDate, LeaveRequest, TimeStamp};
use super::scope::{Actor, ScopePolicy};
use super::store::LeaveStore;
use chrono::{NaiveTime, Utc};
use std::fmt;
use tracing::{info, warn};

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TicketFlag {
    #[n(0)]
    #[default]
    NotIssued,
    #[n(1)]
    Issued,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TicketDirection {
    Outbound,
    Return,
}

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq, Eq, Default)]
pub struct TicketRoute {
    #[n(0)]
    pub origin: String,
    #[n(1)]
    pub destination: String,
}

/// Sub-state of one travel direction.
#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq, Eq, Default)]
pub struct TicketLeg {
    #[n(0)]
    pub flag: TicketFlag,
    #[n(1)]
    pub booking_code: Option<String>,
    #[n(2)]
    pub carrier: Option<String>, // airline name
    #[n(3)]
    pub departure_date: Option<LeaveDate>,
    #[n(4)]
    pub departure_time: Option<String>, // HH:MM, local to the origin
    #[n(5)]
    pub route: TicketRoute,
    #[n(6)]
    pub issued_at: Option<TimeStamp<Utc>>,
    #[n(7)]
    pub issued_by: Option<String>,
}

/// What the ticketing desk submits for one direction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketFields {
    pub booking_code: Option<String>,
    pub carrier: Option<String>,
    pub departure_date: Option<LeaveDate>,
    pub departure_time: Option<String>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    // mark the direction issued; requires a booking code
    pub issue: bool,
}

pub struct TicketSubsystem {
    store: LeaveStore,
    policy: ScopePolicy,
}

impl TicketDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketDirection::Outbound => "outbound",
            TicketDirection::Return => "return",
        }
    }
}

impl fmt::Display for TicketDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TicketRoute {
    pub fn new(origin: &str, destination: &str) -> Self {
        Self {
            origin: origin.to_string(),
            destination: destination.to_string(),
        }
    }
}

impl TicketLeg {
    pub(crate) fn planned(route: TicketRoute, departure_date: Option<LeaveDate>) -> Self {
        Self {
            route,
            departure_date,
            ..Self::default()
        }
    }

    pub fn is_issued(&self) -> bool {
        self.flag == TicketFlag::Issued
    }

    /// Merge `fields` into a copy of this leg. The flag only ever moves to issued.
    pub fn upserted(&self, fields: &TicketFields, actor: &Actor) -> Result<TicketLeg> {
        // flipping the flag needs the booking code in this submission
        if fields.issue && !self.is_issued() && clean(&fields.booking_code).is_none() {
            return Err(ValidationError::MissingBookingCode.into());
        }
        let booking_code = clean(&fields.booking_code).or_else(|| self.booking_code.clone());

        let departure_time = match clean(&fields.departure_time) {
            Some(time) => {
                let parsed = NaiveTime::parse_from_str(&time, "%H:%M")
                    .map_err(|_| ValidationError::InvalidDepartureTime(time.clone()))?;
                Some(parsed.format("%H:%M").to_string())
            }
            None => self.departure_time.clone(),
        };

        let mut leg = TicketLeg {
            flag: self.flag,
            booking_code,
            carrier: clean(&fields.carrier).or_else(|| self.carrier.clone()),
            departure_date: fields.departure_date.or(self.departure_date),
            departure_time,
            route: TicketRoute {
                origin: clean(&fields.origin).unwrap_or_else(|| self.route.origin.clone()),
                destination: clean(&fields.destination)
                    .unwrap_or_else(|| self.route.destination.clone()),
            },
            issued_at: self.issued_at.clone(),
            issued_by: self.issued_by.clone(),
        };

        if fields.issue && !self.is_issued() {
            leg.flag = TicketFlag::Issued;
            leg.issued_at = Some(TimeStamp::new());
            leg.issued_by = Some(actor.id.clone());
        }

        Ok(leg)
    }
}

fn clean(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl TicketSubsystem {
    pub fn new(store: LeaveStore, policy: ScopePolicy) -> Self {
        Self { store, policy }
    }

    /// Upsert one direction of `request`. Never touches the approval status.
    pub fn issue_or_update(
        &self,
        request: &LeaveRequest,
        direction: TicketDirection,
        fields: &TicketFields,
        actor: &Actor,
    ) -> Result<LeaveRequest> {
        if !actor.role.can_ticket() {
            warn!(request_id = %request.id, actor = %actor.id, role = %actor.role, "ticket update by non-ticketing role");
            return Err(WorkflowError::unauthorized(actor, "only the ticketing role may issue tickets"));
        }
        if !self.policy.covers(actor, request) {
            warn!(request_id = %request.id, actor = %actor.id, site = %actor.site, "ticket update outside actor scope");
            return Err(WorkflowError::unauthorized(actor, "request is outside the actor's site"));
        }
        if request.category == LeaveCategory::Local {
            return Err(ValidationError::TicketsNotApplicable.into());
        }
        if request.status.is_rejected() {
            return Err(WorkflowError::invalid_transition(
                &request.id,
                request.status,
                "tickets cannot change on a rejected request",
            ));
        }

        let leg = request.ticket(direction).upserted(fields, actor)?;
        let updated = self.store.commit_ticket(request, direction, leg)?;

        info!(
            request_id = %updated.id,
            actor = %actor.id,
            direction = %direction,
            issued = updated.ticket(direction).is_issued(),
            "ticket updated"
        );
        Ok(updated)
    }
}

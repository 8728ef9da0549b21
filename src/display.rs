//! The single rule turning stored state into the status people see
use super::request::{LeaveCategory, LeaveRequest};
use super::status::{ApproverRole, LeaveStatus};
use super::ticket::TicketFlag;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayStatus {
    LocalNoTicket,
    TicketComplete,
    OutboundIssued,
    Awaiting(ApproverRole),
    Rejected,
    InProcess,
}

/// Dashboard buckets. Every request lands in exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCategory {
    AwaitingApproval,
    InProcess,
    OutboundOnly,
    TicketComplete,
    Local,
    Rejected,
}

/// First matching rule wins: what ticketing must do next outranks the raw status.
pub fn resolve(
    status: LeaveStatus,
    outbound: TicketFlag,
    return_flag: TicketFlag,
    category: LeaveCategory,
) -> DisplayStatus {
    if category == LeaveCategory::Local {
        return DisplayStatus::LocalNoTicket;
    }
    match (outbound, return_flag) {
        (TicketFlag::Issued, TicketFlag::Issued) => return DisplayStatus::TicketComplete,
        (TicketFlag::Issued, _) => return DisplayStatus::OutboundIssued,
        _ => {}
    }
    if let Some(approver) = status.required_approver() {
        return DisplayStatus::Awaiting(approver);
    }
    if status.is_rejected() {
        return DisplayStatus::Rejected;
    }
    DisplayStatus::InProcess
}

pub fn resolve_request(request: &LeaveRequest) -> DisplayStatus {
    resolve(
        request.status,
        request.outbound.flag,
        request.return_leg.flag,
        request.category,
    )
}

impl DisplayStatus {
    pub fn category(&self) -> StatusCategory {
        match self {
            DisplayStatus::LocalNoTicket => StatusCategory::Local,
            DisplayStatus::TicketComplete => StatusCategory::TicketComplete,
            DisplayStatus::OutboundIssued => StatusCategory::OutboundOnly,
            DisplayStatus::Awaiting(_) => StatusCategory::AwaitingApproval,
            DisplayStatus::Rejected => StatusCategory::Rejected,
            DisplayStatus::InProcess => StatusCategory::InProcess,
        }
    }

    pub fn label(&self) -> String {
        match self {
            DisplayStatus::LocalNoTicket => "local_no_ticket".into(),
            DisplayStatus::TicketComplete => "ticket_complete".into(),
            DisplayStatus::OutboundIssued => "outbound_issued".into(),
            DisplayStatus::Awaiting(approver) => format!("awaiting_{}", approver.step_key()),
            DisplayStatus::Rejected => "rejected".into(),
            DisplayStatus::InProcess => "in_process".into(),
        }
    }
}

impl fmt::Display for DisplayStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl StatusCategory {
    pub const ALL: [StatusCategory; 6] = [
        StatusCategory::AwaitingApproval,
        StatusCategory::InProcess,
        StatusCategory::OutboundOnly,
        StatusCategory::TicketComplete,
        StatusCategory::Local,
        StatusCategory::Rejected,
    ];

    pub fn matches(&self, request: &LeaveRequest) -> bool {
        resolve_request(request).category() == *self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_wins_over_everything() {
        for status in LeaveStatus::ALL {
            assert_eq!(
                resolve(status, TicketFlag::Issued, TicketFlag::Issued, LeaveCategory::Local),
                DisplayStatus::LocalNoTicket
            );
        }
    }

    #[test]
    fn tickets_outrank_approval_status() {
        assert_eq!(
            resolve(
                LeaveStatus::PendingPjo,
                TicketFlag::Issued,
                TicketFlag::NotIssued,
                LeaveCategory::WithTicket
            ),
            DisplayStatus::OutboundIssued
        );
        assert_eq!(
            resolve(
                LeaveStatus::Approved,
                TicketFlag::NotIssued,
                TicketFlag::NotIssued,
                LeaveCategory::WithTicket
            ),
            DisplayStatus::InProcess
        );
        // a return ticket alone does not count as progress
        assert_eq!(
            resolve(
                LeaveStatus::PendingHrHo,
                TicketFlag::NotIssued,
                TicketFlag::Issued,
                LeaveCategory::WithTicket
            ),
            DisplayStatus::Awaiting(ApproverRole::HrHo)
        );
    }

    #[test]
    fn labels() {
        assert_eq!(DisplayStatus::Awaiting(ApproverRole::ManagerHo).label(), "awaiting_manager_ho");
        assert_eq!(DisplayStatus::Awaiting(ApproverRole::PjoSite).to_string(), "awaiting_pjo");
        assert_eq!(DisplayStatus::Rejected.label(), "rejected");
    }
}

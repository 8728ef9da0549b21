//! Smoke Screen Unit tests for leave workflow components
//!
//! These tests span the codebase and exercise each piece in isolation from
//! the integration scenarios. They mostly cover the happy path.
//!

use leave_approval::{
    display::{DisplayStatus, StatusCategory, resolve},
    request::{LeaveCategory, LeaveDate},
    scope::{Role, ScopeRule},
    status::{ApproverRole, LeaveStatus},
    utils::{LEAVE_HRP, new_request_id, new_uuid_to_bech32},
};

// UTILS MODULE TESTS
#[cfg(test)]
mod utils_tests {
    use super::*;

    /// Generated ids carry the human-readable prefix
    #[test]
    fn generates_valid_bech32_with_hrp() {
        let encoded = new_uuid_to_bech32("leave").unwrap();
        assert!(encoded.starts_with("leave1"));
        assert!(encoded.len() > 10);
    }

    #[test]
    fn handles_empty_hrp() {
        assert!(new_uuid_to_bech32("").is_err());
    }

    #[test]
    fn request_ids_are_unique() {
        let a = new_request_id().unwrap();
        let b = new_request_id().unwrap();
        assert_ne!(a, b);
        assert!(a.starts_with(LEAVE_HRP));
    }
}

// STATUS MODULE TESTS
#[cfg(test)]
mod status_tests {
    use super::*;

    /// Walking the approve edges from the initial status visits every approver once
    #[test]
    fn approve_edges_walk_the_chain() {
        let mut status = LeaveStatus::INITIAL;
        let mut seen = Vec::new();
        while let Some(transition) = status.transition() {
            seen.push(transition.approver);
            status = transition.on_approve;
        }
        assert_eq!(status, LeaveStatus::Approved);
        assert_eq!(seen, ApproverRole::ALL.to_vec());
    }

    #[test]
    fn reject_edges_remember_the_step() {
        for approver in ApproverRole::ALL {
            let pending = LeaveStatus::ALL
                .into_iter()
                .find(|s| s.required_approver() == Some(approver))
                .unwrap();
            let rejected = pending.transition().unwrap().on_reject;
            assert!(rejected.is_terminal());
            assert_eq!(rejected.rejected_by(), Some(approver));
        }
    }

    #[test]
    fn status_names_parse_back() {
        for status in LeaveStatus::ALL {
            assert_eq!(status.as_str().parse::<LeaveStatus>().unwrap(), status);
        }
        assert!("pending_everyone".parse::<LeaveStatus>().is_err());
    }
}

// SCOPE MODULE TESTS
#[cfg(test)]
mod scope_tests {
    use super::*;

    #[test]
    fn roles_map_to_scope_rules() {
        assert_eq!(Role::Dic.scope(), ScopeRule::SiteAndDepartment);
        assert_eq!(Role::PjoSite.scope(), ScopeRule::Site);
        assert_eq!(Role::HrTicketing.scope(), ScopeRule::SiteOrWildcard);
        assert_eq!(Role::SuperAdmin.scope(), ScopeRule::Global);
        assert_eq!(Role::ManagerHo.scope(), ScopeRule::Global);
        assert_eq!(Role::HrHo.scope(), ScopeRule::Global);
    }

    #[test]
    fn only_approver_roles_approve() {
        let approvers: Vec<Role> = Role::ALL.into_iter().filter(|r| r.approver().is_some()).collect();
        assert_eq!(approvers, vec![Role::Dic, Role::PjoSite, Role::ManagerHo, Role::HrHo]);
        assert!(!Role::SuperAdmin.can_ticket());
        assert!(Role::HrTicketing.can_ticket());
    }

    #[test]
    fn role_names_parse_back() {
        for role in Role::ALL {
            assert_eq!(role.to_string().parse::<Role>().unwrap(), role);
        }
    }
}

// DISPLAY RESOLVER TESTS
#[cfg(test)]
mod display_tests {
    use super::*;
    use leave_approval::ticket::TicketFlag::{Issued, NotIssued};

    #[test]
    fn ticket_state_outranks_approval_status() {
        assert_eq!(
            resolve(LeaveStatus::PendingManagerHo, Issued, Issued, LeaveCategory::WithTicket),
            DisplayStatus::TicketComplete
        );
        assert_eq!(
            resolve(LeaveStatus::PendingDic, Issued, NotIssued, LeaveCategory::WithTicket),
            DisplayStatus::OutboundIssued
        );
    }

    #[test]
    fn return_alone_does_not_count() {
        assert_eq!(
            resolve(LeaveStatus::Approved, NotIssued, Issued, LeaveCategory::WithTicket),
            DisplayStatus::InProcess
        );
    }

    #[test]
    fn awaiting_label_names_the_step() {
        let shown = resolve(LeaveStatus::PendingHrHo, NotIssued, NotIssued, LeaveCategory::WithTicket);
        assert_eq!(shown, DisplayStatus::Awaiting(ApproverRole::HrHo));
        assert_eq!(shown.label(), "awaiting_hr_ho");
        assert_eq!(shown.category(), StatusCategory::AwaitingApproval);
    }

    #[test]
    fn local_wins_over_everything() {
        for status in LeaveStatus::ALL {
            assert_eq!(
                resolve(status, NotIssued, NotIssued, LeaveCategory::Local),
                DisplayStatus::LocalNoTicket
            );
        }
    }
}

// DATE TESTS
#[cfg(test)]
mod date_tests {
    use super::*;

    #[test]
    fn day_count_is_inclusive() {
        let start = LeaveDate::from_ymd(2025, 2, 27).unwrap();
        let end = LeaveDate::from_ymd(2025, 3, 2).unwrap();
        assert_eq!(start.days_through(&end), Some(4));
        assert_eq!(start.days_through(&start), Some(1));
        assert_eq!(end.days_through(&start), None);
    }

    #[test]
    fn dates_display_as_iso() {
        let date: LeaveDate = "2025-03-01".parse().unwrap();
        assert_eq!(date.to_string(), "2025-03-01");
        assert_eq!(date.year(), 2025);
        assert_eq!(date.month(), 3);
    }
}

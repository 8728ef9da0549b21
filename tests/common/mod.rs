#![allow(dead_code)]

use leave_approval::{
    config::WorkflowConfig,
    request::{Employee, JobLevel, LeaveCategory, LeaveDate, LeaveRequestDraft},
    scope::{Actor, Role},
    service::LeaveService,
    ticket::TicketFields,
};
use std::sync::Arc;
use tempfile::TempDir;

pub const SITE: &str = "BSF";
pub const DEPARTMENT: &str = "Plant";
pub const HEAD_OFFICE: &str = "HO";

// Sled takes a file lock, so every test gets its own database under a temp dir.
pub fn open_service(name: &str) -> anyhow::Result<(TempDir, LeaveService)> {
    let temp_dir = tempfile::tempdir()?;
    let db = sled::open(temp_dir.path().join(format!("{name}.db")))?;
    let service = LeaveService::new(Arc::new(db), &WorkflowConfig::default())?;
    Ok((temp_dir, service))
}

pub fn date(year: i32, month: u32, day: u32) -> LeaveDate {
    LeaveDate::from_ymd(year, month, day).expect("valid test date")
}

pub fn employee(nik: &str) -> Employee {
    Employee {
        nik: nik.to_string(),
        name: format!("Employee {nik}"),
        site: SITE.to_string(),
        department: DEPARTMENT.to_string(),
        position: "Mechanic".to_string(),
        job_level: Some(JobLevel::Staff),
    }
}

pub fn with_ticket_draft(nik: &str) -> LeaveRequestDraft {
    LeaveRequestDraft::new()
        .set_employee(employee(nik))
        .set_leave_type("periodic")
        .set_category(LeaveCategory::WithTicket)
        .set_period(date(2025, 3, 1), date(2025, 3, 14))
        .set_travel("Balikpapan", "Jakarta", date(2025, 3, 1))
}

pub fn local_draft(nik: &str) -> LeaveRequestDraft {
    LeaveRequestDraft::new()
        .set_employee(employee(nik))
        .set_leave_type("annual")
        .set_category(LeaveCategory::Local)
        .set_period(date(2025, 4, 7), date(2025, 4, 9))
}

pub fn hr_site() -> Actor {
    Actor::new("hr-site-1", "HR Site", Role::HrSite, SITE)
}

pub fn dic() -> Actor {
    Actor::new("dic-1", "Dept Head", Role::Dic, SITE).with_department(DEPARTMENT)
}

pub fn pjo() -> Actor {
    Actor::new("pjo-1", "PJO", Role::PjoSite, SITE)
}

pub fn manager_ho() -> Actor {
    Actor::new("mgr-ho-1", "Manager HO", Role::ManagerHo, HEAD_OFFICE)
}

pub fn hr_ho() -> Actor {
    Actor::new("hr-ho-1", "HR HO", Role::HrHo, HEAD_OFFICE)
}

pub fn ticketing() -> Actor {
    Actor::new("ticket-1", "HR Ticketing", Role::HrTicketing, "ALL")
}

/// Every approver in chain order.
pub fn chain() -> Vec<Actor> {
    vec![dic(), pjo(), manager_ho(), hr_ho()]
}

pub fn issue(booking_code: &str) -> TicketFields {
    TicketFields {
        booking_code: Some(booking_code.to_string()),
        carrier: Some("Garuda Indonesia".to_string()),
        departure_time: Some("08:30".to_string()),
        issue: true,
        ..TicketFields::default()
    }
}

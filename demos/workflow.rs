//! Walks one with-ticket leave request through the approval chain and ticketing.
//!
//! Run with `RUST_LOG=debug` to see every step the service logs.

use anyhow::Context;
use leave_approval::{
    config::WorkflowConfig,
    display::resolve_request,
    filter::ListFilter,
    request::{Employee, JobLevel, LeaveCategory, LeaveDate, LeaveRequestDraft},
    scope::{Actor, Role},
    service::LeaveService,
    ticket::{TicketDirection, TicketFields},
};

fn date(year: i32, month: u32, day: u32) -> anyhow::Result<LeaveDate> {
    LeaveDate::from_ymd(year, month, day).context("invalid calendar date")
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => WorkflowConfig::load(path.as_ref())?,
        None => WorkflowConfig::temporary(),
    };
    let service = LeaveService::open(&config)?;

    let hr_site = Actor::new("hr-bsf", "Rina", Role::HrSite, "BSF");
    let chain = [
        Actor::new("dic-plant", "Budi", Role::Dic, "BSF").with_department("Plant"),
        Actor::new("pjo-bsf", "Sari", Role::PjoSite, "BSF"),
        Actor::new("mgr-ho", "Andi", Role::ManagerHo, "HO"),
        Actor::new("hr-ho", "Dewi", Role::HrHo, "HO"),
    ];
    let ticketing = Actor::new("ticketing", "Tiket Desk", Role::HrTicketing, "ALL");

    let draft = LeaveRequestDraft::new()
        .set_employee(Employee {
            nik: "BSF-00123".into(),
            name: "Agus Santoso".into(),
            site: "BSF".into(),
            department: "Plant".into(),
            position: "Mechanic".into(),
            job_level: Some(JobLevel::Staff),
        })
        .set_leave_type("periodic")
        .set_category(LeaveCategory::WithTicket)
        .set_period(date(2025, 3, 1)?, date(2025, 3, 14)?)
        .set_travel("Balikpapan", "Jakarta", date(2025, 3, 1)?);

    let request = service.create(draft, &hr_site)?;
    println!("created {} -> {}", request.id, resolve_request(&request));

    for approver in &chain {
        let updated = service.approve(&request.id, approver, Some("ok"))?;
        println!("{} approved -> {}", approver.role, resolve_request(&updated));
    }

    for (direction, code) in [(TicketDirection::Outbound, "GA1234"), (TicketDirection::Return, "GA5678")] {
        let fields = TicketFields {
            booking_code: Some(code.into()),
            carrier: Some("Garuda Indonesia".into()),
            departure_time: Some("07:45".into()),
            issue: true,
            ..TicketFields::default()
        };
        let updated = service.issue_or_update_ticket(&request.id, direction, &fields, &ticketing)?;
        println!("{direction} issued -> {}", resolve_request(&updated));
    }

    for entry in service.history(&request.id)? {
        println!(
            "#{} {} by {} ({}): {} -> {}",
            entry.seq, entry.action, entry.approver_name, entry.approver_role, entry.from_status, entry.to_status
        );
    }
    println!("ledger intact: {}", service.ledger().verify_chain(&request.id)?);

    let stats = service.stats(&hr_site)?;
    println!("{stats:?}");
    println!(
        "listed for hr_site: {}",
        service.list(&hr_site, &ListFilter::default())?.len()
    );
    println!(
        "next periodic leave from: {:?}",
        service.next_periodic_eligibility("BSF-00123", JobLevel::Staff)?
    );

    service.flush()?;
    Ok(())
}

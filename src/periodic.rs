//! Periodic leave cycle. Informational only; nothing here blocks a filing.
use super::request::{JobLevel, LeaveDate, LeaveRequest};
use super::status::LeaveStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodicRule {
    pub short_cycle_days: u32,
    pub standard_cycle_days: u32,
}

impl Default for PeriodicRule {
    fn default() -> Self {
        Self {
            short_cycle_days: 56,
            standard_cycle_days: 70,
        }
    }
}

impl PeriodicRule {
    pub fn cycle_days(&self, job_level: JobLevel) -> u32 {
        match job_level {
            JobLevel::Head | JobLevel::PjoClass => self.short_cycle_days,
            JobLevel::Staff => self.standard_cycle_days,
        }
    }

    /// Earliest date the next periodic leave is due, counted from the previous period's end.
    pub fn next_eligibility(&self, previous_period_end: LeaveDate, job_level: JobLevel) -> Option<LeaveDate> {
        previous_period_end.add_days(u64::from(self.cycle_days(job_level)))
    }
}

pub fn next_periodic_leave_eligibility(previous_period_end: LeaveDate, job_level: JobLevel) -> Option<LeaveDate> {
    PeriodicRule::default().next_eligibility(previous_period_end, job_level)
}

/// The employee's most recent approved periodic leave, by period end.
pub fn previous_periodic_leave<'a, I>(requests: I, nik: &str, periodic_leave_type: &str) -> Option<LeaveRequest>
where
    I: IntoIterator<Item = &'a LeaveRequest>,
{
    requests
        .into_iter()
        .filter(|r| {
            r.employee.nik == nik
                && r.status == LeaveStatus::Approved
                && r.is_periodic(periodic_leave_type)
        })
        .max_by(|a, b| a.end_date.cmp(&b.end_date).then_with(|| a.created_at.cmp(&b.created_at)))
        .cloned()
}

//! Dashboard counters, derived with the exact predicates the lists use
use super::display::StatusCategory;
use super::filter::ListFilter;
use super::request::LeaveRequest;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    pub total: usize,
    pub awaiting_approval: usize,
    pub in_process: usize,
    pub outbound_only: usize,
    pub ticket_complete: usize,
    pub local: usize,
    pub rejected: usize,
}

impl Counters {
    pub fn get(&self, category: StatusCategory) -> usize {
        match category {
            StatusCategory::AwaitingApproval => self.awaiting_approval,
            StatusCategory::InProcess => self.in_process,
            StatusCategory::OutboundOnly => self.outbound_only,
            StatusCategory::TicketComplete => self.ticket_complete,
            StatusCategory::Local => self.local,
            StatusCategory::Rejected => self.rejected,
        }
    }

    fn bump(&mut self, category: StatusCategory) {
        let slot = match category {
            StatusCategory::AwaitingApproval => &mut self.awaiting_approval,
            StatusCategory::InProcess => &mut self.in_process,
            StatusCategory::OutboundOnly => &mut self.outbound_only,
            StatusCategory::TicketComplete => &mut self.ticket_complete,
            StatusCategory::Local => &mut self.local,
            StatusCategory::Rejected => &mut self.rejected,
        };
        *slot += 1;
    }
}

/// Count the requests passing `visible` and the non-category part of `filter`.
///
/// Each bucket is tested with [`StatusCategory::matches`], the same call
/// [`ListFilter::matches`] makes, so a list filtered to one category always has
/// exactly as many rows as that category's counter.
pub fn compute_stats<'a, I, P>(requests: I, visible: P, filter: &ListFilter) -> Counters
where
    I: IntoIterator<Item = &'a LeaveRequest>,
    P: Fn(&LeaveRequest) -> bool,
{
    let base = filter.without_category();
    let mut counters = Counters::default();

    for request in requests {
        if !visible(request) || !base.matches(request) {
            continue;
        }
        counters.total += 1;
        for category in StatusCategory::ALL {
            if category.matches(request) {
                counters.bump(category);
            }
        }
    }

    counters
}

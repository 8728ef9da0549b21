//! Dashboard list filters, built on the resolver categories
use super::display::{StatusCategory, resolve_request};
use super::request::LeaveRequest;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    pub category: Option<StatusCategory>,
    pub employee_nik: Option<String>,
    pub year: Option<i32>,
    pub month: Option<u32>, // 1-12
    pub search: Option<String>,
}

impl ListFilter {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn set_category(mut self, category: StatusCategory) -> Self {
        self.category = Some(category);
        self
    }
    pub fn set_employee(mut self, nik: &str) -> Self {
        self.employee_nik = Some(nik.to_string());
        self
    }
    pub fn set_period(mut self, year: i32, month: Option<u32>) -> Self {
        self.year = Some(year);
        self.month = month;
        self
    }
    pub fn set_search(mut self, query: &str) -> Self {
        self.search = Some(query.to_string());
        self
    }

    /// The same filter with the category dropped; what the counters are taken over.
    pub fn without_category(&self) -> Self {
        Self {
            category: None,
            ..self.clone()
        }
    }

    /// Every criterion except the category.
    pub fn matches_base(&self, request: &LeaveRequest) -> bool {
        if let Some(nik) = &self.employee_nik {
            if request.employee.nik != *nik {
                return false;
            }
        }

        let date = request.reference_date();
        if self.year.is_some_and(|year| date.year() != year) {
            return false;
        }
        if self.month.is_some_and(|month| date.month() != month) {
            return false;
        }

        match self.search.as_deref().map(str::trim) {
            Some(query) if !query.is_empty() => {
                let query = query.to_lowercase();
                let label = resolve_request(request).label();
                [
                    request.employee.name.as_str(),
                    request.employee.nik.as_str(),
                    request.leave_type.as_str(),
                    label.as_str(),
                ]
                .iter()
                .any(|field| field.to_lowercase().contains(&query))
            }
            _ => true,
        }
    }

    pub fn matches(&self, request: &LeaveRequest) -> bool {
        self.category.is_none_or(|category| category.matches(request)) && self.matches_base(request)
    }
}

/// Requests passing both `visible` and `filter`, newest first.
pub fn apply<'a, I, P>(requests: I, visible: P, filter: &ListFilter) -> Vec<LeaveRequest>
where
    I: IntoIterator<Item = &'a LeaveRequest>,
    P: Fn(&LeaveRequest) -> bool,
{
    let mut listed: Vec<LeaveRequest> = requests
        .into_iter()
        .filter(|request| visible(request) && filter.matches(request))
        .cloned()
        .collect();
    listed.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
    listed
}

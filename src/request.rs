//! Leave request record, draft builder and date codecs
use super::error::{Result, ValidationError};
use super::scope::Actor;
use super::status::LeaveStatus;
use super::ticket::{TicketDirection, TicketLeg, TicketRoute};
use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct TimeStamp<T: TimeZone>(DateTime<T>);

impl<T: TimeZone> PartialEq for TimeStamp<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T: TimeZone> Eq for TimeStamp<T> {}

impl<T: TimeZone> PartialOrd for TimeStamp<T> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: TimeZone> Ord for TimeStamp<T> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.cmp(&other.0)
    }
}

/// Calendar day without a time zone, stored as days from the common era.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub struct LeaveDate(NaiveDate);

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeaveCategory {
    #[n(0)]
    WithTicket,
    #[n(1)]
    Local,
}

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobLevel {
    #[n(0)]
    Head,
    #[n(1)]
    PjoClass,
    #[n(2)]
    Staff,
}

// denormalized snapshot of the employee at filing time
#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq, Eq, Default)]
pub struct Employee {
    #[n(0)]
    pub nik: String,
    #[n(1)]
    pub name: String,
    #[n(2)]
    pub site: String,
    #[n(3)]
    pub department: String,
    #[n(4)]
    pub position: String, // jabatan
    #[n(5)]
    pub job_level: Option<JobLevel>,
}

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq, Eq)]
pub struct TravelDetails {
    #[n(0)]
    pub origin: String,
    #[n(1)]
    pub destination: String,
    #[n(2)]
    pub departure_date: LeaveDate,
}

#[derive(minicbor::Encode, minicbor::Decode, Debug, Clone, PartialEq, Eq)]
pub struct LeaveRequest {
    #[n(0)]
    pub id: String, // bech32 encoded uuid7
    #[n(1)]
    pub employee: Employee,
    #[n(2)]
    pub leave_type: String,
    #[n(3)]
    pub category: LeaveCategory,
    #[n(4)]
    pub start_date: LeaveDate,
    #[n(5)]
    pub end_date: LeaveDate,
    #[n(6)]
    pub day_count: u32,
    #[n(7)]
    pub travel: Option<TravelDetails>,
    #[n(8)]
    pub status: LeaveStatus,
    #[n(9)]
    pub outbound: TicketLeg,
    #[n(10)]
    pub return_leg: TicketLeg,
    #[n(11)]
    pub notes: Option<String>,
    #[n(12)]
    pub next_periodic_leave: Option<LeaveDate>,
    #[n(13)]
    pub onsite_days: Option<u32>,
    #[n(14)]
    pub submitted_by: String,
    #[n(15)]
    pub created_at: TimeStamp<Utc>,
    #[n(16)]
    pub updated_at: TimeStamp<Utc>,
}

/// Input for filing a new request. Built up with the setters, then finalised.
#[derive(Debug, Clone, Default)]
pub struct LeaveRequestDraft {
    employee: Employee,
    leave_type: Option<String>,
    category: Option<LeaveCategory>,
    start_date: Option<LeaveDate>,
    end_date: Option<LeaveDate>,
    travel_origin: Option<String>,
    travel_destination: Option<String>,
    departure_date: Option<LeaveDate>,
    notes: Option<String>,
    next_periodic_leave: Option<LeaveDate>,
    onsite_days: Option<u32>,
}

/// Limits applied while finalising a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DraftLimits {
    pub min_nik_len: usize,
    pub max_leave_days: u32,
}

impl TimeStamp<Utc> {
    pub fn new() -> Self {
        Self(Utc::now())
    }
    pub fn to_datetime_utc(&self) -> DateTime<Utc> {
        self.0
    }
}

impl Default for TimeStamp<Utc> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TimeZone> From<DateTime<T>> for TimeStamp<T> {
    fn from(value: DateTime<T>) -> Self {
        TimeStamp(value)
    }
}

impl LeaveDate {
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(LeaveDate)
    }
    pub fn year(&self) -> i32 {
        self.0.year()
    }
    pub fn month(&self) -> u32 {
        self.0.month()
    }
    pub fn add_days(&self, days: u64) -> Option<Self> {
        self.0
            .checked_add_days(chrono::Days::new(days))
            .map(LeaveDate)
    }
    /// Inclusive number of days from `self` to `end`, `None` if `end` is earlier.
    pub fn days_through(&self, end: &LeaveDate) -> Option<u32> {
        let span = (end.0 - self.0).num_days();
        if span < 0 {
            return None;
        }
        u32::try_from(span + 1).ok()
    }
}

impl From<NaiveDate> for LeaveDate {
    fn from(value: NaiveDate) -> Self {
        LeaveDate(value)
    }
}

impl fmt::Display for LeaveDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for LeaveDate {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map(LeaveDate)
    }
}

impl LeaveCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeaveCategory::WithTicket => "with_ticket",
            LeaveCategory::Local => "local",
        }
    }
}

impl Default for DraftLimits {
    fn default() -> Self {
        Self {
            min_nik_len: 3,
            max_leave_days: 365,
        }
    }
}

impl LeaveRequest {
    pub fn ticket(&self, direction: TicketDirection) -> &TicketLeg {
        match direction {
            TicketDirection::Outbound => &self.outbound,
            TicketDirection::Return => &self.return_leg,
        }
    }

    pub fn ticket_mut(&mut self, direction: TicketDirection) -> &mut TicketLeg {
        match direction {
            TicketDirection::Outbound => &mut self.outbound,
            TicketDirection::Return => &mut self.return_leg,
        }
    }

    /// The date dashboards bucket a request by: travel date, else the filing date.
    pub fn reference_date(&self) -> LeaveDate {
        match &self.travel {
            Some(travel) => travel.departure_date,
            None => LeaveDate(self.created_at.to_datetime_utc().date_naive()),
        }
    }

    pub fn is_periodic(&self, periodic_leave_type: &str) -> bool {
        self.leave_type.trim().eq_ignore_ascii_case(periodic_leave_type)
    }
}

impl LeaveRequestDraft {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn set_employee(mut self, employee: Employee) -> Self {
        self.employee = employee;
        self
    }
    pub fn set_leave_type(mut self, leave_type: &str) -> Self {
        self.leave_type = Some(leave_type.to_string());
        self
    }
    pub fn set_category(mut self, category: LeaveCategory) -> Self {
        self.category = Some(category);
        self
    }
    pub fn set_period(mut self, start: LeaveDate, end: LeaveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }
    pub fn set_travel(mut self, origin: &str, destination: &str, departure_date: LeaveDate) -> Self {
        self.travel_origin = Some(origin.to_string());
        self.travel_destination = Some(destination.to_string());
        self.departure_date = Some(departure_date);
        self
    }
    pub fn set_notes(mut self, notes: &str) -> Self {
        self.notes = Some(notes.to_string());
        self
    }
    pub fn set_next_periodic_leave(mut self, date: LeaveDate) -> Self {
        self.next_periodic_leave = Some(date);
        self
    }
    pub fn set_onsite_days(mut self, days: u32) -> Self {
        self.onsite_days = Some(days);
        self
    }

    pub fn employee(&self) -> &Employee {
        &self.employee
    }

    // Checks fields and builds the initial record in the first pending status
    pub fn validate_and_finalise(
        self,
        id: String,
        filed_by: &Actor,
        limits: DraftLimits,
    ) -> Result<LeaveRequest> {
        let employee = self.employee;
        if employee.nik.trim().len() < limits.min_nik_len {
            return Err(ValidationError::InvalidNik(limits.min_nik_len).into());
        }
        require_text(&employee.name, "employee name")?;
        require_text(&employee.site, "site")?;
        require_text(&employee.department, "department")?;

        let leave_type = self
            .leave_type
            .filter(|t| !t.trim().is_empty())
            .ok_or(ValidationError::MissingField("leave type"))?;
        let category = self.category.ok_or(ValidationError::MissingField("category"))?;
        let start_date = self.start_date.ok_or(ValidationError::MissingField("start date"))?;
        let end_date = self.end_date.ok_or(ValidationError::MissingField("end date"))?;

        // day count is always derived, never taken from the caller
        let day_count = start_date
            .days_through(&end_date)
            .ok_or(ValidationError::InvalidDates)?;
        if day_count > limits.max_leave_days {
            return Err(ValidationError::PeriodTooLong(day_count, limits.max_leave_days).into());
        }

        let travel = match category {
            LeaveCategory::Local => None,
            LeaveCategory::WithTicket => Some(TravelDetails {
                origin: non_empty(self.travel_origin)
                    .ok_or(ValidationError::MissingTravelDetails("origin"))?,
                destination: non_empty(self.travel_destination)
                    .ok_or(ValidationError::MissingTravelDetails("destination"))?,
                departure_date: self
                    .departure_date
                    .ok_or(ValidationError::MissingTravelDetails("departure date"))?,
            }),
        };

        let (outbound, return_leg) = match &travel {
            Some(t) => (
                TicketLeg::planned(TicketRoute::new(&t.origin, &t.destination), Some(t.departure_date)),
                TicketLeg::planned(TicketRoute::new(&t.destination, &t.origin), None),
            ),
            None => (TicketLeg::default(), TicketLeg::default()),
        };

        let now = TimeStamp::new();
        Ok(LeaveRequest {
            id,
            employee,
            leave_type: leave_type.trim().to_string(),
            category,
            start_date,
            end_date,
            day_count,
            travel,
            status: LeaveStatus::INITIAL,
            outbound,
            return_leg,
            notes: non_empty(self.notes),
            next_periodic_leave: self.next_periodic_leave,
            onsite_days: self.onsite_days,
            submitted_by: filed_by.id.clone(),
            created_at: now.clone(),
            updated_at: now,
        })
    }
}

fn require_text(value: &str, field: &'static str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField(field).into());
    }
    Ok(())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl<C> minicbor::Encode<C> for TimeStamp<Utc> {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        _: &mut C,
    ) -> std::result::Result<(), minicbor::encode::Error<W::Error>> {
        if let Some(nsec) = self.0.timestamp_nanos_opt() {
            return e.i64(nsec)?.ok();
        }

        Err(minicbor::encode::Error::message(
            "failed to encode timestamp. timestamp_nanos_opt returned None",
        ))
    }
}
impl<'b, C> minicbor::Decode<'b, C> for TimeStamp<Utc> {
    fn decode(
        d: &mut minicbor::Decoder<'b>,
        _: &mut C,
    ) -> std::result::Result<Self, minicbor::decode::Error> {
        let nsecs = d.i64()?;

        Ok(TimeStamp(DateTime::from_timestamp_nanos(nsecs)))
    }
}

impl<C> minicbor::Encode<C> for LeaveDate {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        _: &mut C,
    ) -> std::result::Result<(), minicbor::encode::Error<W::Error>> {
        e.i32(self.0.num_days_from_ce())?.ok()
    }
}
impl<'b, C> minicbor::Decode<'b, C> for LeaveDate {
    fn decode(
        d: &mut minicbor::Decoder<'b>,
        _: &mut C,
    ) -> std::result::Result<Self, minicbor::decode::Error> {
        let days = d.i32()?;

        NaiveDate::from_num_days_from_ce_opt(days)
            .map(LeaveDate)
            .ok_or(minicbor::decode::Error::message(
                "failed to convert day number to a calendar date",
            ))
    }
}

use crate::tickets::{Reconciliation, TicketNumber};
use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StaffTickets {
    pub name: String,
    pub start_order_number: TicketNumber,
    #[serde(default)]
    pub end_order_number: Option<TicketNumber>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shift {
    pub id: u64,
    pub business_date: NaiveDate,
    pub opened_at: DateTime<Local>,
    #[serde(default)]
    pub closed_at: Option<DateTime<Local>>,
    pub opening_cash: u64,
    #[serde(default)]
    pub closing_cash: Option<u64>,
    pub staff: Vec<StaffTickets>,
}

impl Shift {
    pub fn is_open(&self) -> bool {
        self.closed_at.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppData {
    #[serde(default = "first_id")]
    pub next_id: u64,
    #[serde(default)]
    pub shifts: BTreeMap<u64, Shift>,
}

impl Default for AppData {
    fn default() -> Self {
        Self {
            next_id: first_id(),
            shifts: BTreeMap::new(),
        }
    }
}

fn first_id() -> u64 {
    1
}

#[derive(Debug, Deserialize)]
pub struct StaffOpening {
    pub name: String,
    pub start_order_number: TicketNumber,
}

#[derive(Debug, Deserialize)]
pub struct OpenShiftRequest {
    pub staff: Vec<StaffOpening>,
    #[serde(default)]
    pub opening_cash: u64,
}

/// End tickets are given in the same order the staff were listed when the
/// shift was opened.
#[derive(Debug, Deserialize)]
pub struct CloseShiftRequest {
    pub end_order_numbers: Vec<TicketNumber>,
    pub closing_cash: u64,
}

#[derive(Debug, Deserialize)]
pub struct ReconcileQuery {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReconcileResponse {
    pub start: u64,
    pub end: u64,
    pub book_size: u64,
    pub start_book: u64,
    pub end_book: u64,
    pub book_rollover: bool,
    pub valid: bool,
    pub tickets_used: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ShiftStatus {
    Open,
    Closed,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StaffUsage {
    pub name: String,
    pub start_order_number: u64,
    pub end_order_number: Option<u64>,
    pub valid: Option<bool>,
    pub book_rollover: Option<bool>,
    pub tickets_used: Option<u64>,
}

impl StaffUsage {
    pub fn pending(staff: &StaffTickets) -> Self {
        Self {
            name: staff.name.clone(),
            start_order_number: staff.start_order_number.get(),
            end_order_number: None,
            valid: None,
            book_rollover: None,
            tickets_used: None,
        }
    }

    pub fn reconciled(staff: &StaffTickets, end: TicketNumber, result: Reconciliation) -> Self {
        Self {
            name: staff.name.clone(),
            start_order_number: staff.start_order_number.get(),
            end_order_number: Some(end.get()),
            valid: Some(result.valid),
            book_rollover: Some(result.book_rollover),
            tickets_used: Some(result.tickets_used),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ShiftSummary {
    pub id: u64,
    pub business_date: String,
    pub status: ShiftStatus,
    pub opened_at: String,
    pub closed_at: Option<String>,
    pub opening_cash: u64,
    pub closing_cash: Option<u64>,
    pub cash_taken: Option<i64>,
    pub staff: Vec<StaffUsage>,
    pub total_tickets: u64,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DayTotals {
    pub tickets: u64,
    pub shifts: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DailyPoint {
    pub date: String,
    pub tickets_used: u64,
    pub shifts_closed: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WeeklyPoint {
    pub week: String,
    pub start_date: String,
    pub end_date: String,
    pub tickets_used: u64,
    pub shifts_closed: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WeeklyAveragePoint {
    pub week: String,
    pub days_counted: u8,
    pub avg_tickets: f64,
    pub avg_shifts: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    pub last_7_days: Vec<DailyPoint>,
    pub weekly_totals: Vec<WeeklyPoint>,
    pub weekly_averages: Vec<WeeklyAveragePoint>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub open_shift: Option<u64>,
}

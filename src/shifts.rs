use crate::models::{
    AppData, CloseShiftRequest, OpenShiftRequest, Shift, ShiftStatus, ShiftSummary, StaffTickets,
    StaffUsage,
};
use crate::tickets::{BookSize, CountMode, TicketRange};
use chrono::{DateTime, Local};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShiftError {
    #[error("shift {0} is already open")]
    AlreadyOpen(u64),
    #[error("shift {0} not found")]
    NotFound(u64),
    #[error("shift {0} is already closed")]
    AlreadyClosed(u64),
    #[error("a shift needs at least one staff member")]
    NoStaff,
    #[error("staff name must not be blank")]
    BlankName,
    #[error("staff member {0:?} is listed twice")]
    DuplicateName(String),
    #[error("expected {expected} end order numbers, got {got}")]
    EndCountMismatch { expected: usize, got: usize },
}

pub fn current_shift(data: &AppData) -> Option<&Shift> {
    data.shifts.values().rev().find(|shift| shift.is_open())
}

pub fn open_shift(
    data: &mut AppData,
    request: OpenShiftRequest,
    now: DateTime<Local>,
) -> Result<Shift, ShiftError> {
    if let Some(open) = current_shift(data) {
        return Err(ShiftError::AlreadyOpen(open.id));
    }
    if request.staff.is_empty() {
        return Err(ShiftError::NoStaff);
    }

    let mut seen = HashSet::new();
    let mut staff = Vec::with_capacity(request.staff.len());
    for opening in request.staff {
        let name = opening.name.trim().to_string();
        if name.is_empty() {
            return Err(ShiftError::BlankName);
        }
        if !seen.insert(name.to_lowercase()) {
            return Err(ShiftError::DuplicateName(name));
        }
        staff.push(StaffTickets {
            name,
            start_order_number: opening.start_order_number,
            end_order_number: None,
        });
    }

    let id = data.next_id;
    data.next_id = data.next_id.saturating_add(1);

    let shift = Shift {
        id,
        business_date: now.date_naive(),
        opened_at: now,
        closed_at: None,
        opening_cash: request.opening_cash,
        closing_cash: None,
        staff,
    };
    data.shifts.insert(id, shift.clone());
    Ok(shift)
}

pub fn close_shift(
    data: &mut AppData,
    id: u64,
    request: CloseShiftRequest,
    now: DateTime<Local>,
) -> Result<Shift, ShiftError> {
    let shift = data.shifts.get_mut(&id).ok_or(ShiftError::NotFound(id))?;
    if !shift.is_open() {
        return Err(ShiftError::AlreadyClosed(id));
    }
    if request.end_order_numbers.len() != shift.staff.len() {
        return Err(ShiftError::EndCountMismatch {
            expected: shift.staff.len(),
            got: request.end_order_numbers.len(),
        });
    }

    for (staff, end) in shift.staff.iter_mut().zip(request.end_order_numbers) {
        staff.end_order_number = Some(end);
    }
    shift.closing_cash = Some(request.closing_cash);
    shift.closed_at = Some(now);

    Ok(shift.clone())
}

/// Tickets used by a closed shift. Open shifts and staff without an end
/// ticket contribute nothing.
pub fn tickets_used(shift: &Shift, book: BookSize, mode: CountMode) -> u64 {
    shift
        .staff
        .iter()
        .filter_map(|staff| {
            staff
                .end_order_number
                .map(|end| TicketRange::new(staff.start_order_number, end).count(book, mode))
        })
        .fold(0u64, u64::saturating_add)
}

// Clamped to the i64 range; the difference of two u64 amounts can exceed it.
fn cash_difference(opening: u64, closing: u64) -> i64 {
    let diff = i128::from(closing) - i128::from(opening);
    i64::try_from(diff).unwrap_or(if diff < 0 { i64::MIN } else { i64::MAX })
}

pub fn summarize(shift: &Shift, book: BookSize, mode: CountMode) -> ShiftSummary {
    let mut warnings = Vec::new();
    let mut total_tickets = 0u64;

    let staff: Vec<StaffUsage> = shift
        .staff
        .iter()
        .map(|staff| match staff.end_order_number {
            None => StaffUsage::pending(staff),
            Some(end) => {
                let result = TicketRange::new(staff.start_order_number, end).reconcile(book, mode);
                if !result.valid {
                    warnings.push(format!(
                        "{}: end ticket {} is before start ticket {} in the same book",
                        staff.name, end, staff.start_order_number
                    ));
                }
                total_tickets = total_tickets.saturating_add(result.tickets_used);
                StaffUsage::reconciled(staff, end, result)
            }
        })
        .collect();

    let cash_taken = shift
        .closing_cash
        .map(|closing| cash_difference(shift.opening_cash, closing));

    ShiftSummary {
        id: shift.id,
        business_date: shift.business_date.to_string(),
        status: if shift.is_open() {
            ShiftStatus::Open
        } else {
            ShiftStatus::Closed
        },
        opened_at: shift.opened_at.to_rfc3339(),
        closed_at: shift.closed_at.map(|at| at.to_rfc3339()),
        opening_cash: shift.opening_cash,
        closing_cash: shift.closing_cash,
        cash_taken,
        staff,
        total_tickets,
        warnings,
    }
}

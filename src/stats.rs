use crate::models::{
    AppData, DailyPoint, DayTotals, StatsResponse, WeeklyAveragePoint, WeeklyPoint,
};
use crate::shifts::tickets_used;
use crate::tickets::{BookSize, CountMode};
use chrono::{Datelike, Duration, Local, NaiveDate};
use std::collections::BTreeMap;

pub fn build_stats(data: &AppData, book: BookSize, mode: CountMode) -> StatsResponse {
    build_stats_at(Local::now().date_naive(), data, book, mode)
}

pub fn build_stats_at(today: NaiveDate, data: &AppData, book: BookSize, mode: CountMode) -> StatsResponse {
    const WEEK_COUNT: usize = 8;

    let days = daily_totals(data, book, mode);
    let totals_on = |date: NaiveDate| days.get(&date).cloned().unwrap_or_default();

    let mut last_7_days = Vec::with_capacity(7);
    for offset in (0..7).rev() {
        let date = today - Duration::days(offset as i64);
        let totals = totals_on(date);
        last_7_days.push(DailyPoint {
            date: date.to_string(),
            tickets_used: totals.tickets,
            shifts_closed: totals.shifts,
        });
    }

    let current_week_start = week_start(today);
    let mut weekly_totals = Vec::with_capacity(WEEK_COUNT);
    let mut weekly_averages = Vec::with_capacity(WEEK_COUNT);

    for offset in (0..WEEK_COUNT).rev() {
        let start = current_week_start - Duration::weeks(offset as i64);
        let end = start + Duration::days(6);

        let mut ticket_sum = 0u64;
        let mut shift_sum = 0u64;
        for day_offset in 0..7 {
            let totals = totals_on(start + Duration::days(day_offset));
            ticket_sum = ticket_sum.saturating_add(totals.tickets);
            shift_sum = shift_sum.saturating_add(totals.shifts);
        }

        let days_counted = if today < start {
            0
        } else if today > end {
            7
        } else {
            (today - start).num_days() as u8 + 1
        };

        let denom = if days_counted == 0 { 1.0 } else { f64::from(days_counted) };

        weekly_totals.push(WeeklyPoint {
            week: week_label(start),
            start_date: start.to_string(),
            end_date: end.to_string(),
            tickets_used: ticket_sum,
            shifts_closed: shift_sum,
        });

        weekly_averages.push(WeeklyAveragePoint {
            week: week_label(start),
            days_counted,
            avg_tickets: ticket_sum as f64 / denom,
            avg_shifts: shift_sum as f64 / denom,
        });
    }

    StatsResponse {
        last_7_days,
        weekly_totals,
        weekly_averages,
    }
}

// Closed shifts only, keyed by the day the shift was opened.
fn daily_totals(data: &AppData, book: BookSize, mode: CountMode) -> BTreeMap<NaiveDate, DayTotals> {
    let mut days: BTreeMap<NaiveDate, DayTotals> = BTreeMap::new();
    for shift in data.shifts.values().filter(|shift| !shift.is_open()) {
        let entry = days.entry(shift.business_date).or_default();
        entry.tickets = entry.tickets.saturating_add(tickets_used(shift, book, mode));
        entry.shifts = entry.shifts.saturating_add(1);
    }
    days
}

fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

fn week_label(date: NaiveDate) -> String {
    let iso = date.iso_week();
    format!("{}-W{:02}", iso.year(), iso.week())
}

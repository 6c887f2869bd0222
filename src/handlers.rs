use crate::errors::AppError;
use crate::models::{
    CloseShiftRequest, HealthResponse, OpenShiftRequest, ReconcileQuery, ReconcileResponse,
    ShiftSummary, StatsResponse,
};
use crate::shifts::{self, ShiftError};
use crate::state::AppState;
use crate::stats::build_stats;
use crate::storage::persist_data;
use crate::tickets::{TicketNumber, TicketRange};
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use chrono::Local;
use tracing::{info, warn};

pub const PASSCODE_HEADER: &str = "x-pos-passcode";

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let data = state.data.lock().await;
    Json(HealthResponse {
        status: "ok",
        open_shift: shifts::current_shift(&data).map(|shift| shift.id),
    })
}

pub async fn reconcile(
    State(state): State<AppState>,
    Query(query): Query<ReconcileQuery>,
) -> Result<Json<ReconcileResponse>, AppError> {
    let start: TicketNumber = query.start.parse()?;
    let end: TicketNumber = query.end.parse()?;
    let book = state.config.book_size;

    let result = TicketRange::new(start, end).reconcile(book, state.config.count_mode);
    Ok(Json(ReconcileResponse {
        start: start.get(),
        end: end.get(),
        book_size: book.get(),
        start_book: result.start_book,
        end_book: result.end_book,
        book_rollover: result.book_rollover,
        valid: result.valid,
        tickets_used: result.tickets_used,
    }))
}

pub async fn list_shifts(State(state): State<AppState>) -> Json<Vec<ShiftSummary>> {
    let data = state.data.lock().await;
    let summaries = data
        .shifts
        .values()
        .rev()
        .map(|shift| summarize(&state, shift))
        .collect();
    Json(summaries)
}

pub async fn current_shift(State(state): State<AppState>) -> Result<Json<ShiftSummary>, AppError> {
    let data = state.data.lock().await;
    let shift = shifts::current_shift(&data).ok_or_else(|| AppError::not_found("no shift is open"))?;
    Ok(Json(summarize(&state, shift)))
}

pub async fn get_shift(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<ShiftSummary>, AppError> {
    let data = state.data.lock().await;
    let shift = data.shifts.get(&id).ok_or(ShiftError::NotFound(id))?;
    Ok(Json(summarize(&state, shift)))
}

pub async fn open_shift(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<OpenShiftRequest>,
) -> Result<(StatusCode, Json<ShiftSummary>), AppError> {
    require_passcode(&state, &headers)?;

    let mut data = state.data.lock().await;
    let mut next = data.clone();
    let shift = shifts::open_shift(&mut next, payload, Local::now())?;
    persist_data(&state.data_path, &next).await?;
    *data = next;

    info!(shift_id = shift.id, staff = shift.staff.len(), "shift opened");
    Ok((StatusCode::CREATED, Json(summarize(&state, &shift))))
}

pub async fn close_shift(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    headers: HeaderMap,
    Json(payload): Json<CloseShiftRequest>,
) -> Result<Json<ShiftSummary>, AppError> {
    require_passcode(&state, &headers)?;

    let mut data = state.data.lock().await;
    let mut next = data.clone();
    let shift = shifts::close_shift(&mut next, id, payload, Local::now())?;
    persist_data(&state.data_path, &next).await?;
    *data = next;

    let summary = summarize(&state, &shift);
    for warning in &summary.warnings {
        warn!(shift_id = id, "{warning}");
    }
    info!(shift_id = id, tickets = summary.total_tickets, "shift closed");
    Ok(Json(summary))
}

pub async fn get_stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, AppError> {
    let data = state.data.lock().await;
    Ok(Json(build_stats(&data, state.config.book_size, state.config.count_mode)))
}

fn summarize(state: &AppState, shift: &crate::models::Shift) -> ShiftSummary {
    shifts::summarize(shift, state.config.book_size, state.config.count_mode)
}

fn require_passcode(state: &AppState, headers: &HeaderMap) -> Result<(), AppError> {
    let Some(expected) = state.config.passcode.as_deref() else {
        return Ok(());
    };
    let given = headers
        .get(PASSCODE_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim);
    if given == Some(expected.trim()) {
        Ok(())
    } else {
        warn!("rejected shift change with missing or wrong passcode");
        Err(AppError::unauthorized("passcode required"))
    }
}

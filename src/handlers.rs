use crate::errors::AppError;
use crate::models::{
    EntryResponse, MemberScore, ResetRequest, ScoresResponse, SeriesResponse, SubmitRequest,
    TodayEntry, TodayResponse,
};
use crate::scoring::{build_cumulative_series, compute_scores};
use crate::state::AppState;
use crate::ui::render_index;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, Redirect},
    Form, Json,
};
use chrono::{Local, NaiveDate};

pub async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let date = today();
    let entries = state.store.all().await?;
    let scores = compute_scores(&entries, &state.config);
    Ok(Html(render_index(&state.config, date, &entries, &scores)))
}

pub async fn get_today(State(state): State<AppState>) -> Result<Json<TodayResponse>, AppError> {
    let date = today();
    let mut entries = Vec::with_capacity(state.config.members.len());
    for member in &state.config.members {
        let entry = state.store.find(member, date).await?;
        entries.push(TodayEntry {
            member: member.clone(),
            status: entry.as_ref().map(|e| e.status.clone()),
            points: entry.map(|e| e.points),
        });
    }

    Ok(Json(TodayResponse { date, entries }))
}

pub async fn get_scores(State(state): State<AppState>) -> Result<Json<ScoresResponse>, AppError> {
    let entries = state.store.all().await?;
    let totals = compute_scores(&entries, &state.config);

    let scores = state
        .config
        .members
        .iter()
        .map(|member| MemberScore {
            member: member.clone(),
            points: totals.get(member).copied().unwrap_or_default(),
        })
        .collect();

    Ok(Json(ScoresResponse {
        window_days: state.config.window_days,
        scores,
    }))
}

pub async fn get_series(State(state): State<AppState>) -> Result<Json<SeriesResponse>, AppError> {
    let entries = state.store.all().await?;
    Ok(Json(SeriesResponse {
        series: build_cumulative_series(&entries, &state.config),
    }))
}

pub async fn submit(
    State(state): State<AppState>,
    Json(payload): Json<SubmitRequest>,
) -> Result<Json<EntryResponse>, AppError> {
    let entry = apply_submit(&state, &payload.member, &payload.status).await?;
    Ok(Json(entry.into()))
}

pub async fn reset(
    State(state): State<AppState>,
    Json(payload): Json<ResetRequest>,
) -> Result<StatusCode, AppError> {
    apply_reset(&state, &payload.member).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn submit_form(
    State(state): State<AppState>,
    Form(payload): Form<SubmitRequest>,
) -> Result<Redirect, AppError> {
    apply_submit(&state, &payload.member, &payload.status).await?;
    Ok(Redirect::to("/"))
}

pub async fn reset_form(
    State(state): State<AppState>,
    Form(payload): Form<ResetRequest>,
) -> Result<Redirect, AppError> {
    apply_reset(&state, &payload.member).await?;
    Ok(Redirect::to("/"))
}

async fn apply_submit(
    state: &AppState,
    member: &str,
    status: &str,
) -> Result<crate::models::Entry, AppError> {
    let member = member.trim();
    let status = status.trim();
    let date = today();

    // Once-per-day rule lives here; the store itself stays
    // idempotent-overwrite.
    if state.store.find(member, date).await?.is_some() {
        return Err(AppError::conflict(format!(
            "{member} already recorded Fajr for {date}; reset today's entry first"
        )));
    }

    state.store.upsert(member, status, date).await
}

async fn apply_reset(state: &AppState, member: &str) -> Result<(), AppError> {
    let member = member.trim();
    if !state.config.is_member(member) {
        return Err(AppError::bad_request(format!("unknown member: {member}")));
    }

    state.store.delete(member, today()).await
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

//! Route table and handlers, one handler per tool operation.

use crate::error::ApiError;
use crate::extract::CallScope;
use axum::extract::{Path, Query, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use futures::stream::Stream;
use serde::Deserialize;
use std::collections::HashSet;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use workpad_application::{
    AddNoteRequest, AddQuestionRequest, AddTaskRequest, AnsweredQuestionsResponse,
    CreateSessionRequest, CreateSessionResponse, DeleteSessionResponse, ListSectionsResponse,
    ListSessionsResponse, NoteResponse, NotesResponse, PauseCheckResponse,
    PendingQuestionsResponse, PlanResponse, QuestionResponse, Scratchpad, SectionResponse,
    SubmitAnswersRequest, SubmitAnswersResponse, TaskResponse, UpdateTaskRequest,
    WriteSectionRequest,
};
use workpad_domain::{DraftSection, EventKind, NoteFilter, SessionId};

/// Shared state for all routes.
#[derive(Clone)]
pub struct AppState {
    pub scratchpad: Arc<Scratchpad>,
}

/// Build the full router: session lifecycle, the tool surface, and the SSE
/// subscription endpoint. CORS is fully permissive; the service is
/// demo-scoped and fronted by the orchestrator.
pub fn router(scratchpad: Arc<Scratchpad>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/sessions", post(create_session).get(list_sessions))
        .route("/session", delete(delete_session))
        .route("/sessions/:session_id/events", get(session_events))
        .route("/tools/add_note", post(add_note))
        .route("/tools/read_notes", get(read_notes))
        .route("/tools/write_section", post(write_section))
        .route("/tools/read_section/:section_id", get(read_section))
        .route("/tools/list_sections", get(list_sections))
        .route("/tools/add_task", post(add_task))
        .route("/tools/update_task", post(update_task))
        .route("/tools/read_plan", get(read_plan))
        .route("/tools/add_question", post(add_question))
        .route("/tools/pending_questions", get(pending_questions))
        .route("/tools/answered_questions", get(answered_questions))
        .route("/tools/submit_answers", post(submit_answers))
        .route("/tools/pause_check", get(pause_check))
        .with_state(AppState { scratchpad })
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

// ==================== Session lifecycle ====================

async fn create_session(
    State(state): State<AppState>,
    body: Option<Json<CreateSessionRequest>>,
) -> Json<CreateSessionResponse> {
    let req = body.map(|Json(req)| req).unwrap_or_default();
    Json(state.scratchpad.create_session(req).await)
}

async fn list_sessions(State(state): State<AppState>) -> Json<ListSessionsResponse> {
    Json(state.scratchpad.list_sessions().await)
}

async fn delete_session(
    State(state): State<AppState>,
    CallScope(ctx): CallScope,
) -> Result<Json<DeleteSessionResponse>, ApiError> {
    Ok(Json(state.scratchpad.delete_session(&ctx).await?))
}

// ==================== Subscription surface ====================

#[derive(Debug, Deserialize)]
struct EventsQuery {
    /// Comma-separated event kinds; absent means every kind.
    types: Option<String>,
}

fn parse_kinds(query: &EventsQuery) -> Result<HashSet<EventKind>, ApiError> {
    let Some(types) = query.types.as_deref() else {
        return Ok(HashSet::new());
    };
    types
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| {
            name.parse::<EventKind>()
                .map_err(|err| ApiError::BadRequest(err.to_string()))
        })
        .collect()
}

/// SSE stream of a session's change events. Delivery is at-most-once with
/// no replay: events published before the stream is established are gone.
async fn session_events(
    State(state): State<AppState>,
    Path(session_id): Path<SessionId>,
    Query(query): Query<EventsQuery>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let kinds = parse_kinds(&query)?;
    let subscription = state.scratchpad.subscribe(session_id, kinds).await?;
    tracing::debug!(%session_id, subscription_id = %subscription.id, "SSE stream established");

    let stream = futures::stream::unfold(subscription, |mut subscription| async move {
        let event = subscription.next().await?;
        let data = serde_json::to_string(&event).ok()?;
        let sse_event = Event::default().event(event.kind().as_str()).data(data);
        Some((Ok::<_, Infallible>(sse_event), subscription))
    });

    Ok(Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    ))
}

// ==================== Notes ====================

async fn add_note(
    State(state): State<AppState>,
    CallScope(ctx): CallScope,
    Json(req): Json<AddNoteRequest>,
) -> Result<Json<NoteResponse>, ApiError> {
    Ok(Json(state.scratchpad.add_note(&ctx, req).await?))
}

async fn read_notes(
    State(state): State<AppState>,
    CallScope(ctx): CallScope,
    Query(filter): Query<NoteFilter>,
) -> Result<Json<NotesResponse>, ApiError> {
    Ok(Json(state.scratchpad.read_notes(&ctx, filter).await?))
}

// ==================== Draft ====================

async fn write_section(
    State(state): State<AppState>,
    CallScope(ctx): CallScope,
    Json(req): Json<WriteSectionRequest>,
) -> Result<Json<SectionResponse>, ApiError> {
    Ok(Json(state.scratchpad.write_section(&ctx, req).await?))
}

async fn read_section(
    State(state): State<AppState>,
    CallScope(ctx): CallScope,
    Path(section_id): Path<String>,
) -> Result<Json<DraftSection>, ApiError> {
    Ok(Json(state.scratchpad.read_section(&ctx, &section_id).await?))
}

async fn list_sections(
    State(state): State<AppState>,
    CallScope(ctx): CallScope,
) -> Result<Json<ListSectionsResponse>, ApiError> {
    Ok(Json(state.scratchpad.list_sections(&ctx).await?))
}

// ==================== Plan ====================

async fn add_task(
    State(state): State<AppState>,
    CallScope(ctx): CallScope,
    Json(req): Json<AddTaskRequest>,
) -> Result<Json<TaskResponse>, ApiError> {
    Ok(Json(state.scratchpad.add_task(&ctx, req).await?))
}

async fn update_task(
    State(state): State<AppState>,
    CallScope(ctx): CallScope,
    Json(req): Json<UpdateTaskRequest>,
) -> Result<Json<TaskResponse>, ApiError> {
    Ok(Json(state.scratchpad.update_task(&ctx, req).await?))
}

async fn read_plan(
    State(state): State<AppState>,
    CallScope(ctx): CallScope,
) -> Result<Json<PlanResponse>, ApiError> {
    Ok(Json(state.scratchpad.read_plan(&ctx).await?))
}

// ==================== Questions ====================

async fn add_question(
    State(state): State<AppState>,
    CallScope(ctx): CallScope,
    Json(req): Json<AddQuestionRequest>,
) -> Result<Json<QuestionResponse>, ApiError> {
    Ok(Json(state.scratchpad.add_question(&ctx, req).await?))
}

async fn pending_questions(
    State(state): State<AppState>,
    CallScope(ctx): CallScope,
) -> Result<Json<PendingQuestionsResponse>, ApiError> {
    Ok(Json(state.scratchpad.pending_questions(&ctx).await?))
}

async fn answered_questions(
    State(state): State<AppState>,
    CallScope(ctx): CallScope,
) -> Result<Json<AnsweredQuestionsResponse>, ApiError> {
    Ok(Json(state.scratchpad.answered_questions(&ctx).await?))
}

async fn submit_answers(
    State(state): State<AppState>,
    CallScope(ctx): CallScope,
    Json(req): Json<SubmitAnswersRequest>,
) -> Result<Json<SubmitAnswersResponse>, ApiError> {
    Ok(Json(state.scratchpad.submit_answers(&ctx, req).await?))
}

// ==================== Pause advisor ====================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PauseQuery {
    at_phase_boundary: bool,
}

async fn pause_check(
    State(state): State<AppState>,
    CallScope(ctx): CallScope,
    Query(query): Query<PauseQuery>,
) -> Result<Json<PauseCheckResponse>, ApiError> {
    Ok(Json(
        state
            .scratchpad
            .pause_check(&ctx, query.at_phase_boundary)
            .await?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_lists_parse_and_reject_unknown_names() {
        let query = EventsQuery {
            types: Some("note_added, question_added".to_string()),
        };
        let kinds = parse_kinds(&query).unwrap();
        assert_eq!(
            kinds,
            HashSet::from([EventKind::NoteAdded, EventKind::QuestionAdded])
        );

        let bad = EventsQuery {
            types: Some("note_added,explosions".to_string()),
        };
        assert!(matches!(parse_kinds(&bad), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn absent_types_means_every_kind() {
        let query = EventsQuery { types: None };
        assert!(parse_kinds(&query).unwrap().is_empty());
    }
}

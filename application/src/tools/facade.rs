//! The scratchpad tool façade.
//!
//! Every operation follows the same discipline: resolve the session through
//! the gate, take that session's write (or read) lock, apply the mutation,
//! publish the corresponding event while the lock is still held (so
//! subscribers observe notifications in the order mutations were applied),
//! then record exactly one audit entry. Gate failures abort before any lock
//! is acquired.

use crate::config::ServiceConfig;
use crate::gate::{CallContext, SessionGate};
use crate::ports::audit::{AuditRecord, AuditSink};
use crate::ports::notifier::{ChangeNotifier, Subscription};
use crate::ports::session_store::{SessionHandle, SessionStore};
use crate::tools::payload::*;
use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};
use workpad_domain::util::preview;
use workpad_domain::{
    DraftSection, EventKind, NoteFilter, SessionId, WorkpadError, WorkspaceEvent,
};

/// The shared scratchpad service: one instance serves all sessions.
pub struct Scratchpad {
    store: Arc<dyn SessionStore>,
    notifier: Arc<dyn ChangeNotifier>,
    audit: Arc<dyn AuditSink>,
    gate: SessionGate,
    config: ServiceConfig,
}

impl Scratchpad {
    pub fn new(
        store: Arc<dyn SessionStore>,
        notifier: Arc<dyn ChangeNotifier>,
        audit: Arc<dyn AuditSink>,
        config: ServiceConfig,
    ) -> Self {
        let gate = SessionGate::new(store.clone());
        Self {
            store,
            notifier,
            audit,
            gate,
            config,
        }
    }

    // ==================== Session lifecycle ====================

    /// Create a session (idempotent on an explicit id). Orchestrator-facing;
    /// agents never choose their session.
    pub async fn create_session(&self, req: CreateSessionRequest) -> CreateSessionResponse {
        let (session_id, handle) = self.store.create(req.session_id).await;
        let session = handle.read().await;
        let response = CreateSessionResponse {
            session_id,
            created_at: session.created_at,
            expires_at: session.expires_at(),
        };
        drop(session);

        info!(%session_id, "session created");
        self.audit.record(AuditRecord::success(
            "create_session",
            Some(session_id.to_string()),
            None,
            None,
        ));
        response
    }

    pub async fn delete_session(
        &self,
        ctx: &CallContext,
    ) -> Result<DeleteSessionResponse, WorkpadError> {
        let result = async {
            let (session_id, _) = self.resolve(ctx).await?;
            let deleted = self.store.delete(session_id).await;
            self.notifier.drop_session(session_id).await;
            info!(%session_id, "session deleted");
            Ok(DeleteSessionResponse { deleted })
        }
        .await;
        self.finish(ctx, "delete_session", None, result)
    }

    pub async fn list_sessions(&self) -> ListSessionsResponse {
        ListSessionsResponse {
            sessions: self.store.list().await,
        }
    }

    // ==================== Notes ====================

    pub async fn add_note(
        &self,
        ctx: &CallContext,
        req: AddNoteRequest,
    ) -> Result<NoteResponse, WorkpadError> {
        let content_preview = self.preview_of(&req.content);
        let result = async {
            let (session_id, handle) = self.resolve(ctx).await?;
            let now = Utc::now();
            let mut session = handle.write().await;
            let note = session
                .workspace
                .add_note(req.content, req.author, req.tags, now);
            session.touch(now);
            self.notifier
                .publish(WorkspaceEvent::note_added(
                    session_id,
                    &note,
                    self.config.preview_chars,
                    now,
                ))
                .await;
            drop(session);

            debug!(%session_id, note_id = %note.id, "note appended");
            Ok(NoteResponse { note })
        }
        .await;
        self.finish(ctx, "add_note", Some(content_preview), result)
    }

    pub async fn read_notes(
        &self,
        ctx: &CallContext,
        filter: NoteFilter,
    ) -> Result<NotesResponse, WorkpadError> {
        let result = async {
            let (_, handle) = self.resolve(ctx).await?;
            let session = handle.read().await;
            let notes = session
                .workspace
                .read_notes(&filter)
                .into_iter()
                .cloned()
                .collect();
            Ok(NotesResponse { notes })
        }
        .await;
        self.finish(ctx, "read_notes", None, result)
    }

    // ==================== Draft ====================

    pub async fn write_section(
        &self,
        ctx: &CallContext,
        req: WriteSectionRequest,
    ) -> Result<SectionResponse, WorkpadError> {
        let content_preview = self.preview_of(&req.content);
        let result = async {
            let (session_id, handle) = self.resolve(ctx).await?;
            let now = Utc::now();
            let mut session = handle.write().await;
            let (section, created) = session.workspace.write_section(
                req.section_id,
                req.title,
                req.content,
                req.author,
                now,
            );
            session.touch(now);
            self.notifier
                .publish(WorkspaceEvent::section_written(
                    session_id,
                    &section,
                    created,
                    self.config.preview_chars,
                    now,
                ))
                .await;
            drop(session);

            debug!(%session_id, section_id = %section.id, version = section.version, "section written");
            Ok(SectionResponse { section, created })
        }
        .await;
        self.finish(ctx, "write_section", Some(content_preview), result)
    }

    pub async fn read_section(
        &self,
        ctx: &CallContext,
        section_id: &str,
    ) -> Result<DraftSection, WorkpadError> {
        let result = async {
            let (session_id, handle) = self.resolve(ctx).await?;
            let session = handle.read().await;
            let section = session.workspace.read_section(section_id)?.clone();
            self.notifier
                .publish(WorkspaceEvent::section_read(
                    session_id,
                    section_id,
                    ctx.caller.clone(),
                    Utc::now(),
                ))
                .await;
            Ok(section)
        }
        .await;
        self.finish(ctx, "read_section", None, result)
    }

    pub async fn list_sections(
        &self,
        ctx: &CallContext,
    ) -> Result<ListSectionsResponse, WorkpadError> {
        let result = async {
            let (_, handle) = self.resolve(ctx).await?;
            let session = handle.read().await;
            Ok(ListSectionsResponse {
                sections: session.workspace.sections().clone(),
            })
        }
        .await;
        self.finish(ctx, "list_sections", None, result)
    }

    // ==================== Plan ====================

    pub async fn add_task(
        &self,
        ctx: &CallContext,
        req: AddTaskRequest,
    ) -> Result<TaskResponse, WorkpadError> {
        let description_preview = self.preview_of(&req.description);
        let result = async {
            let (session_id, handle) = self.resolve(ctx).await?;
            let now = Utc::now();
            let mut session = handle.write().await;
            let task = session
                .workspace
                .add_task(req.description, req.assigned_to, req.dependencies)?;
            session.touch(now);
            self.notifier
                .publish(WorkspaceEvent::checklist_updated(
                    session_id,
                    &task,
                    self.config.preview_chars,
                    now,
                ))
                .await;
            drop(session);

            debug!(%session_id, task_id = %task.id, "task added");
            Ok(TaskResponse { task })
        }
        .await;
        self.finish(ctx, "add_task", Some(description_preview), result)
    }

    pub async fn update_task(
        &self,
        ctx: &CallContext,
        req: UpdateTaskRequest,
    ) -> Result<TaskResponse, WorkpadError> {
        let result = async {
            let (session_id, handle) = self.resolve(ctx).await?;
            let now = Utc::now();
            let mut session = handle.write().await;
            let task = session
                .workspace
                .update_task(req.task_id, req.status, req.assigned_to)?
                .clone();
            session.touch(now);
            self.notifier
                .publish(WorkspaceEvent::checklist_updated(
                    session_id,
                    &task,
                    self.config.preview_chars,
                    now,
                ))
                .await;
            drop(session);

            debug!(%session_id, task_id = %task.id, status = %task.status, "task updated");
            Ok(TaskResponse { task })
        }
        .await;
        self.finish(ctx, "update_task", None, result)
    }

    pub async fn read_plan(&self, ctx: &CallContext) -> Result<PlanResponse, WorkpadError> {
        let result = async {
            let (_, handle) = self.resolve(ctx).await?;
            let session = handle.read().await;
            Ok(PlanResponse {
                tasks: session.workspace.read_plan().to_vec(),
            })
        }
        .await;
        self.finish(ctx, "read_plan", None, result)
    }

    // ==================== Questions ====================

    pub async fn add_question(
        &self,
        ctx: &CallContext,
        req: AddQuestionRequest,
    ) -> Result<QuestionResponse, WorkpadError> {
        let question_preview = self.preview_of(&req.question);
        let result = async {
            let (session_id, handle) = self.resolve(ctx).await?;
            let now = Utc::now();
            let mut session = handle.write().await;
            let question = session.questions.add(workpad_domain::Question::new(
                req.question,
                req.context,
                req.asked_by,
                req.priority,
                req.options,
                now,
            ));
            session.touch(now);
            self.notifier
                .publish(WorkspaceEvent::question_added(
                    session_id,
                    &question,
                    self.config.preview_chars,
                    now,
                ))
                .await;
            drop(session);

            info!(%session_id, question_id = %question.id, priority = %question.priority, "question raised");
            Ok(QuestionResponse { question })
        }
        .await;
        self.finish(ctx, "add_question", Some(question_preview), result)
    }

    pub async fn pending_questions(
        &self,
        ctx: &CallContext,
    ) -> Result<PendingQuestionsResponse, WorkpadError> {
        let result = async {
            let (_, handle) = self.resolve(ctx).await?;
            let session = handle.read().await;
            Ok(PendingQuestionsResponse {
                questions: session.questions.pending().into_iter().cloned().collect(),
                facts: session.questions.facts(),
            })
        }
        .await;
        self.finish(ctx, "get_pending_questions", None, result)
    }

    pub async fn answered_questions(
        &self,
        ctx: &CallContext,
    ) -> Result<AnsweredQuestionsResponse, WorkpadError> {
        let result = async {
            let (_, handle) = self.resolve(ctx).await?;
            let session = handle.read().await;
            Ok(AnsweredQuestionsResponse {
                questions: session.questions.answered().into_iter().cloned().collect(),
            })
        }
        .await;
        self.finish(ctx, "get_answered_questions", None, result)
    }

    /// Record human answers. Partial success: a bad id rejects that item
    /// only, and each question answered here produces its own event.
    pub async fn submit_answers(
        &self,
        ctx: &CallContext,
        req: SubmitAnswersRequest,
    ) -> Result<SubmitAnswersResponse, WorkpadError> {
        let result = async {
            let (session_id, handle) = self.resolve(ctx).await?;
            let answers: Vec<_> = req
                .answers
                .iter()
                .map(|(id, text)| (*id, text.clone()))
                .collect();

            let now = Utc::now();
            let mut session = handle.write().await;
            let outcomes = session.questions.submit_answers(&answers, now);

            let mut answered = 0usize;
            for outcome in &outcomes {
                if let workpad_domain::AnswerOutcome::Answered(question) = outcome {
                    answered += 1;
                    self.notifier
                        .publish(WorkspaceEvent::question_answered(
                            session_id,
                            question,
                            self.config.preview_chars,
                            now,
                        ))
                        .await;
                }
            }
            if answered > 0 {
                session.touch(now);
            }
            drop(session);

            info!(%session_id, answered, rejected = outcomes.len() - answered, "answers submitted");
            Ok(SubmitAnswersResponse {
                outcomes: outcomes.into_iter().map(Into::into).collect(),
            })
        }
        .await;
        self.finish(ctx, "submit_answers", None, result)
    }

    // ==================== Pause advisor ====================

    /// Evaluate the configured pause policy over the current queue facts.
    pub async fn pause_check(
        &self,
        ctx: &CallContext,
        at_phase_boundary: bool,
    ) -> Result<PauseCheckResponse, WorkpadError> {
        let result = async {
            let (_, handle) = self.resolve(ctx).await?;
            let facts = handle.read().await.questions.facts();
            Ok(PauseCheckResponse {
                facts,
                at_phase_boundary,
                decision: self.config.pause.evaluate(facts, at_phase_boundary),
            })
        }
        .await;
        self.finish(ctx, "pause_check", None, result)
    }

    // ==================== Subscriptions ====================

    /// Subscribe to a session's events. Orchestrator-facing: the session id
    /// is explicit here because subscribing is not an agent tool. An empty
    /// kind set subscribes to every kind.
    pub async fn subscribe(
        &self,
        session_id: SessionId,
        kinds: HashSet<EventKind>,
    ) -> Result<Subscription, WorkpadError> {
        if let Err(err) = self.store.get(session_id).await {
            if matches!(err, WorkpadError::SessionExpired { .. }) {
                self.notifier.drop_session(session_id).await;
            }
            return Err(err);
        }
        Ok(self.notifier.subscribe(session_id, kinds).await)
    }

    // ==================== Internals ====================

    /// Gate resolution plus lifecycle coupling: discovering an expired
    /// session lazily is the moment its subscriptions get invalidated.
    async fn resolve(
        &self,
        ctx: &CallContext,
    ) -> Result<(SessionId, SessionHandle), WorkpadError> {
        match self.gate.resolve(ctx).await {
            Ok(resolved) => Ok(resolved),
            Err(err) => {
                if let WorkpadError::SessionExpired { id } = &err {
                    self.notifier.drop_session(*id).await;
                }
                Err(err)
            }
        }
    }

    fn preview_of(&self, content: &str) -> String {
        preview(content, self.config.preview_chars)
    }

    /// Record the audit entry for a finished call and pass the result on.
    fn finish<T>(
        &self,
        ctx: &CallContext,
        operation: &'static str,
        content_preview: Option<String>,
        result: Result<T, WorkpadError>,
    ) -> Result<T, WorkpadError> {
        let session_id = ctx.raw_session_id.clone();
        let caller = ctx.caller.as_ref().map(|c| c.to_string());
        match &result {
            Ok(_) => self.audit.record(AuditRecord::success(
                operation,
                session_id,
                caller,
                content_preview,
            )),
            Err(err) => {
                warn!(operation, error = %err, "tool call failed");
                self.audit
                    .record(AuditRecord::failure(operation, session_id, caller, err));
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::audit::AuditOutcome;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tokio::sync::{RwLock, broadcast};
    use workpad_domain::Session;

    /// Store double without expiry; the real adapter is exercised in the
    /// infrastructure crate.
    #[derive(Default)]
    struct TestStore {
        sessions: Mutex<HashMap<SessionId, SessionHandle>>,
    }

    #[async_trait]
    impl SessionStore for TestStore {
        async fn create(&self, id: Option<SessionId>) -> (SessionId, SessionHandle) {
            let id = id.unwrap_or_else(SessionId::generate);
            let mut sessions = self.sessions.lock().unwrap();
            let handle = sessions
                .entry(id)
                .or_insert_with(|| {
                    Arc::new(RwLock::new(Session::with_default_ttl(id, Utc::now())))
                })
                .clone();
            (id, handle)
        }

        async fn get(&self, id: SessionId) -> Result<SessionHandle, WorkpadError> {
            self.sessions
                .lock()
                .unwrap()
                .get(&id)
                .cloned()
                .ok_or(WorkpadError::SessionNotFound { id })
        }

        async fn delete(&self, id: SessionId) -> bool {
            self.sessions.lock().unwrap().remove(&id).is_some()
        }

        async fn list(&self) -> Vec<SessionId> {
            self.sessions.lock().unwrap().keys().copied().collect()
        }
    }

    #[derive(Default)]
    struct TestNotifier {
        channels: Mutex<HashMap<SessionId, broadcast::Sender<WorkspaceEvent>>>,
    }

    #[async_trait]
    impl ChangeNotifier for TestNotifier {
        async fn subscribe(
            &self,
            session_id: SessionId,
            kinds: HashSet<EventKind>,
        ) -> Subscription {
            let mut channels = self.channels.lock().unwrap();
            let sender = channels
                .entry(session_id)
                .or_insert_with(|| broadcast::channel(16).0);
            Subscription::new(session_id, kinds, sender.subscribe())
        }

        async fn publish(&self, event: WorkspaceEvent) {
            if let Some(sender) = self.channels.lock().unwrap().get(&event.session_id) {
                let _ = sender.send(event);
            }
        }

        async fn drop_session(&self, session_id: SessionId) {
            self.channels.lock().unwrap().remove(&session_id);
        }
    }

    #[derive(Default)]
    struct CaptureAudit {
        records: Mutex<Vec<AuditRecord>>,
    }

    impl AuditSink for CaptureAudit {
        fn record(&self, record: AuditRecord) {
            self.records.lock().unwrap().push(record);
        }
    }

    fn service() -> (Scratchpad, Arc<CaptureAudit>) {
        let audit = Arc::new(CaptureAudit::default());
        let scratchpad = Scratchpad::new(
            Arc::new(TestStore::default()),
            Arc::new(TestNotifier::default()),
            audit.clone(),
            ServiceConfig::default(),
        );
        (scratchpad, audit)
    }

    #[tokio::test]
    async fn missing_session_signal_produces_no_success_audit() {
        let (scratchpad, audit) = service();
        let err = scratchpad
            .add_note(
                &CallContext::default(),
                AddNoteRequest {
                    content: "orphan".to_string(),
                    author: "analyst-1".into(),
                    tags: Default::default(),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err, WorkpadError::MissingSessionId);

        let records = audit.records.lock().unwrap();
        assert_eq!(records.len(), 1);
        assert!(matches!(records[0].outcome, AuditOutcome::Error { .. }));
    }

    #[tokio::test]
    async fn every_call_is_audited_exactly_once() {
        let (scratchpad, audit) = service();
        let created = scratchpad
            .create_session(CreateSessionRequest::default())
            .await;
        let ctx = CallContext::for_session(created.session_id).with_caller("scout");

        scratchpad
            .add_note(
                &ctx,
                AddNoteRequest {
                    content: "rent data".to_string(),
                    author: "scout".into(),
                    tags: Default::default(),
                },
            )
            .await
            .unwrap();
        scratchpad.read_notes(&ctx, NoteFilter::all()).await.unwrap();

        let records = audit.records.lock().unwrap();
        let ops: Vec<_> = records.iter().map(|r| r.operation.as_str()).collect();
        assert_eq!(ops, vec!["create_session", "add_note", "read_notes"]);
        assert_eq!(records[1].caller.as_deref(), Some("scout"));
    }

    #[tokio::test]
    async fn audit_preview_is_bounded() {
        let (scratchpad, audit) = service();
        let created = scratchpad
            .create_session(CreateSessionRequest::default())
            .await;
        let ctx = CallContext::for_session(created.session_id);

        scratchpad
            .add_note(
                &ctx,
                AddNoteRequest {
                    content: "x".repeat(5000),
                    author: "scout".into(),
                    tags: Default::default(),
                },
            )
            .await
            .unwrap();

        let records = audit.records.lock().unwrap();
        let preview = records[1].preview.as_ref().unwrap();
        assert_eq!(preview.len(), crate::config::DEFAULT_PREVIEW_CHARS);
    }

    #[tokio::test]
    async fn entity_error_is_scoped_to_the_call() {
        let (scratchpad, _) = service();
        let created = scratchpad
            .create_session(CreateSessionRequest::default())
            .await;
        let ctx = CallContext::for_session(created.session_id);

        let err = scratchpad.read_section(&ctx, "missing").await.unwrap_err();
        assert!(matches!(err, WorkpadError::SectionNotFound { .. }));

        // The session remains fully usable afterwards.
        scratchpad
            .write_section(
                &ctx,
                WriteSectionRequest {
                    section_id: "exec_summary".to_string(),
                    title: "Executive Summary".to_string(),
                    content: "Draft v1".to_string(),
                    author: "synth".into(),
                },
            )
            .await
            .unwrap();
        assert!(scratchpad.read_section(&ctx, "exec_summary").await.is_ok());
    }

    #[tokio::test]
    async fn subscription_sees_mutation_only_after_it_is_readable() {
        let (scratchpad, _) = service();
        let created = scratchpad
            .create_session(CreateSessionRequest::default())
            .await;
        let ctx = CallContext::for_session(created.session_id);

        let mut subscription = scratchpad
            .subscribe(created.session_id, HashSet::new())
            .await
            .unwrap();

        scratchpad
            .write_section(
                &ctx,
                WriteSectionRequest {
                    section_id: "exec_summary".to_string(),
                    title: "Executive Summary".to_string(),
                    content: "Draft v1".to_string(),
                    author: "synth".into(),
                },
            )
            .await
            .unwrap();

        let event = subscription.next().await.unwrap();
        assert_eq!(event.kind(), EventKind::SectionCreated);
        // Notify-after-apply: the state the event describes is readable now.
        let section = scratchpad.read_section(&ctx, "exec_summary").await.unwrap();
        assert_eq!(section.version, 1);
    }
}

//! Human-in-the-loop questions and the per-session question queue.
//!
//! The queue is purely declarative: it records questions and answers and
//! exposes the facts ([`QueueFacts`]) an orchestrator needs to decide whether
//! to pause. The pause heuristic itself lives in [`crate::policy`].

use crate::core::error::WorkpadError;
use crate::core::ids::{AgentId, QuestionId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Priority of a question, from informational to workflow-stopping.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum QuestionPriority {
    Low,
    Medium,
    High,
    /// Mandates an immediate workflow pause until answered.
    Blocking,
}

impl QuestionPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionPriority::Low => "low",
            QuestionPriority::Medium => "medium",
            QuestionPriority::High => "high",
            QuestionPriority::Blocking => "blocking",
        }
    }

    pub fn is_blocking(&self) -> bool {
        matches!(self, QuestionPriority::Blocking)
    }
}

impl std::fmt::Display for QuestionPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A request for human input raised by an agent.
///
/// Invariant: `answered` is true iff `answer` is present. A question is
/// answered exactly once; re-answering is rejected and leaves the recorded
/// answer untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub question: String,
    pub context: String,
    pub asked_by: AgentId,
    pub priority: QuestionPriority,
    /// Suggested answer options shown to the human (may be empty).
    pub options: Vec<String>,
    pub asked_at: DateTime<Utc>,
    pub answered: bool,
    pub answer: Option<String>,
    pub answered_at: Option<DateTime<Utc>>,
}

impl Question {
    pub fn new(
        question: impl Into<String>,
        context: impl Into<String>,
        asked_by: AgentId,
        priority: QuestionPriority,
        options: Vec<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: QuestionId::generate(),
            question: question.into(),
            context: context.into(),
            asked_by,
            priority,
            options,
            asked_at: now,
            answered: false,
            answer: None,
            answered_at: None,
        }
    }
}

/// The facts the pause policy is evaluated over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueFacts {
    pub pending_count: usize,
    pub has_blocking_pending: bool,
}

/// Per-item result of a batch answer submission. The batch is intentionally
/// not all-or-nothing: one bad id never discards the human's other answers.
#[derive(Debug, Clone, PartialEq)]
pub enum AnswerOutcome {
    Answered(Question),
    Rejected {
        question_id: QuestionId,
        error: WorkpadError,
    },
}

/// Ordered set of human-in-the-loop questions for one session.
#[derive(Debug, Default)]
pub struct QuestionQueue {
    questions: Vec<Question>,
}

impl QuestionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a question with `answered = false`.
    pub fn add(&mut self, question: Question) -> Question {
        self.questions.push(question.clone());
        question
    }

    /// All unanswered questions, insertion order.
    pub fn pending(&self) -> Vec<&Question> {
        self.questions.iter().filter(|q| !q.answered).collect()
    }

    /// All answered questions, insertion order.
    pub fn answered(&self) -> Vec<&Question> {
        self.questions.iter().filter(|q| q.answered).collect()
    }

    pub fn facts(&self) -> QueueFacts {
        QueueFacts {
            pending_count: self.questions.iter().filter(|q| !q.answered).count(),
            has_blocking_pending: self
                .questions
                .iter()
                .any(|q| !q.answered && q.priority.is_blocking()),
        }
    }

    /// Record the single answer for one question.
    pub fn answer(
        &mut self,
        question_id: QuestionId,
        answer: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<&Question, WorkpadError> {
        let question = self
            .questions
            .iter_mut()
            .find(|q| q.id == question_id)
            .ok_or(WorkpadError::QuestionNotFound { question_id })?;

        if question.answered {
            return Err(WorkpadError::AlreadyAnswered { question_id });
        }

        question.answered = true;
        question.answer = Some(answer.into());
        question.answered_at = Some(now);
        Ok(question)
    }

    /// Answer a batch of questions with per-item outcomes.
    pub fn submit_answers(
        &mut self,
        answers: &[(QuestionId, String)],
        now: DateTime<Utc>,
    ) -> Vec<AnswerOutcome> {
        answers
            .iter()
            .map(|(id, text)| match self.answer(*id, text.clone(), now) {
                Ok(question) => AnswerOutcome::Answered(question.clone()),
                Err(error) => AnswerOutcome::Rejected {
                    question_id: *id,
                    error,
                },
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocking_question(now: DateTime<Utc>) -> Question {
        Question::new(
            "Budget range?",
            "needed to shortlist locations",
            "finance".into(),
            QuestionPriority::Blocking,
            vec![],
            now,
        )
    }

    #[test]
    fn new_questions_are_pending() {
        let mut queue = QuestionQueue::new();
        let now = Utc::now();
        queue.add(blocking_question(now));

        assert_eq!(queue.pending().len(), 1);
        assert!(queue.answered().is_empty());
        let facts = queue.facts();
        assert_eq!(facts.pending_count, 1);
        assert!(facts.has_blocking_pending);
    }

    #[test]
    fn answering_moves_question_to_answered() {
        let mut queue = QuestionQueue::new();
        let now = Utc::now();
        let id = queue.add(blocking_question(now)).id;

        let answered = queue.answer(id, "€500k", now).unwrap();
        assert!(answered.answered);
        assert_eq!(answered.answer.as_deref(), Some("€500k"));
        assert!(answered.answered_at.is_some());

        assert!(queue.pending().is_empty());
        assert_eq!(queue.answered().len(), 1);
        assert!(!queue.facts().has_blocking_pending);
    }

    #[test]
    fn second_answer_is_rejected_and_leaves_first_untouched() {
        let mut queue = QuestionQueue::new();
        let now = Utc::now();
        let id = queue.add(blocking_question(now)).id;

        queue.answer(id, "€500k", now).unwrap();
        let err = queue.answer(id, "€900k", now).unwrap_err();
        assert!(matches!(err, WorkpadError::AlreadyAnswered { question_id } if question_id == id));

        let question = &queue.answered()[0];
        assert_eq!(question.answer.as_deref(), Some("€500k"));
    }

    #[test]
    fn unknown_question_is_rejected() {
        let mut queue = QuestionQueue::new();
        let ghost = QuestionId::generate();
        let err = queue.answer(ghost, "n/a", Utc::now()).unwrap_err();
        assert!(matches!(err, WorkpadError::QuestionNotFound { question_id } if question_id == ghost));
    }

    #[test]
    fn batch_submission_is_partial_not_all_or_nothing() {
        let mut queue = QuestionQueue::new();
        let now = Utc::now();
        let known = queue.add(blocking_question(now)).id;
        let ghost = QuestionId::generate();

        let outcomes = queue.submit_answers(
            &[(ghost, "ignored".to_string()), (known, "€500k".to_string())],
            now,
        );

        assert_eq!(outcomes.len(), 2);
        assert!(matches!(
            &outcomes[0],
            AnswerOutcome::Rejected { error: WorkpadError::QuestionNotFound { .. }, .. }
        ));
        assert!(matches!(&outcomes[1], AnswerOutcome::Answered(q) if q.id == known));
        assert!(queue.pending().is_empty());
    }

    #[test]
    fn non_blocking_pending_does_not_raise_blocking_flag() {
        let mut queue = QuestionQueue::new();
        let now = Utc::now();
        queue.add(Question::new(
            "Preferred roast?",
            "",
            "market".into(),
            QuestionPriority::Low,
            vec!["dark".to_string(), "light".to_string()],
            now,
        ));

        let facts = queue.facts();
        assert_eq!(facts.pending_count, 1);
        assert!(!facts.has_blocking_pending);
    }
}

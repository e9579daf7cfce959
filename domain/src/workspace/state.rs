//! The workspace engine: pure data operations over one session's collections.

use crate::core::error::WorkpadError;
use crate::core::ids::{AgentId, TaskId};
use crate::workspace::entities::{DraftSection, Note, Task, TaskStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Filter for reading notes. All provided criteria must match; an empty
/// filter matches every note.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NoteFilter {
    /// Exact tag membership.
    pub tag: Option<String>,
    /// Case-insensitive substring match over note content.
    pub text: Option<String>,
}

impl NoteFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn by_tag(tag: impl Into<String>) -> Self {
        Self {
            tag: Some(tag.into()),
            text: None,
        }
    }

    pub fn matches(&self, note: &Note) -> bool {
        if let Some(tag) = &self.tag
            && !note.has_tag(tag)
        {
            return false;
        }
        if let Some(text) = &self.text
            && !note.content.to_lowercase().contains(&text.to_lowercase())
        {
            return false;
        }
        true
    }
}

/// One session's scratchpad collections.
///
/// Operations here assume the caller has already serialized access per
/// session; the engine itself is plain single-threaded data manipulation.
#[derive(Debug, Default)]
pub struct WorkspaceState {
    notes: Vec<Note>,
    draft: HashMap<String, DraftSection>,
    plan: Vec<Task>,
}

impl WorkspaceState {
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== Notes ====================

    /// Append a note. Always succeeds; notes are never edited or removed.
    pub fn add_note(
        &mut self,
        content: impl Into<String>,
        author: AgentId,
        tags: BTreeSet<String>,
        now: DateTime<Utc>,
    ) -> Note {
        let note = Note::new(content, author, tags, now);
        self.notes.push(note.clone());
        note
    }

    /// Notes matching the filter, in insertion order.
    pub fn read_notes(&self, filter: &NoteFilter) -> Vec<&Note> {
        self.notes.iter().filter(|n| filter.matches(n)).collect()
    }

    pub fn note_count(&self) -> usize {
        self.notes.len()
    }

    // ==================== Draft ====================

    /// Upsert a draft section. Returns the resulting section and whether it
    /// was newly created (`true`) or overwritten (`false`).
    pub fn write_section(
        &mut self,
        section_id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
        author: AgentId,
        now: DateTime<Utc>,
    ) -> (DraftSection, bool) {
        let section_id = section_id.into();
        match self.draft.entry(section_id) {
            std::collections::hash_map::Entry::Occupied(mut entry) => {
                entry.get_mut().overwrite(title, content, author, now);
                (entry.get().clone(), false)
            }
            std::collections::hash_map::Entry::Vacant(entry) => {
                let section =
                    DraftSection::new(entry.key().clone(), title, content, author, now);
                (entry.insert(section).clone(), true)
            }
        }
    }

    /// Read one section by key.
    pub fn read_section(&self, section_id: &str) -> Result<&DraftSection, WorkpadError> {
        self.draft
            .get(section_id)
            .ok_or_else(|| WorkpadError::SectionNotFound {
                section_id: section_id.to_string(),
            })
    }

    /// The full draft map (possibly empty). Map order carries no meaning.
    pub fn sections(&self) -> &HashMap<String, DraftSection> {
        &self.draft
    }

    // ==================== Plan ====================

    /// Add a task. Every dependency must reference a task that already
    /// exists in the plan; the new task cannot appear in its own dependency
    /// set because its id is minted only after validation passes.
    pub fn add_task(
        &mut self,
        description: impl Into<String>,
        assigned_to: Option<AgentId>,
        dependencies: BTreeSet<TaskId>,
    ) -> Result<Task, WorkpadError> {
        for dep in &dependencies {
            if !self.plan.iter().any(|t| t.id == *dep) {
                return Err(WorkpadError::InvalidDependency { dependency: *dep });
            }
        }
        let task = Task::new(description, assigned_to, dependencies);
        self.plan.push(task.clone());
        Ok(task)
    }

    /// Partial in-place update: only the provided fields change.
    pub fn update_task(
        &mut self,
        task_id: TaskId,
        status: Option<TaskStatus>,
        assigned_to: Option<AgentId>,
    ) -> Result<&Task, WorkpadError> {
        let task = self
            .plan
            .iter_mut()
            .find(|t| t.id == task_id)
            .ok_or(WorkpadError::TaskNotFound { task_id })?;

        if let Some(status) = status {
            task.status = status;
        }
        if let Some(agent) = assigned_to {
            task.assigned_to = Some(agent);
        }
        Ok(task)
    }

    /// The full plan in insertion order.
    pub fn read_plan(&self) -> &[Task] {
        &self.plan
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn notes_are_returned_in_insertion_order() {
        let mut ws = WorkspaceState::new();
        for i in 0..5 {
            ws.add_note(format!("finding {i}"), "scout".into(), BTreeSet::new(), Utc::now());
        }
        let all = ws.read_notes(&NoteFilter::all());
        let contents: Vec<_> = all.iter().map(|n| n.content.as_str()).collect();
        assert_eq!(
            contents,
            vec!["finding 0", "finding 1", "finding 2", "finding 3", "finding 4"]
        );
    }

    #[test]
    fn tag_filter_returns_exact_matches_only() {
        let mut ws = WorkspaceState::new();
        ws.add_note(
            "Starbucks Vienna: 18 locations",
            "analyst-1".into(),
            tags(&["competitor"]),
            Utc::now(),
        );
        ws.add_note("rent is high", "scout".into(), tags(&["location"]), Utc::now());

        let hits = ws.read_notes(&NoteFilter::by_tag("competitor"));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].content, "Starbucks Vienna: 18 locations");
    }

    #[test]
    fn text_filter_is_case_insensitive_substring() {
        let mut ws = WorkspaceState::new();
        ws.add_note("Foot traffic PEAKS at noon", "scout".into(), BTreeSet::new(), Utc::now());

        let filter = NoteFilter {
            tag: None,
            text: Some("peaks at".to_string()),
        };
        assert_eq!(ws.read_notes(&filter).len(), 1);

        let miss = NoteFilter {
            tag: None,
            text: Some("valleys".to_string()),
        };
        assert!(ws.read_notes(&miss).is_empty());
    }

    #[test]
    fn combined_filters_must_all_match() {
        let mut ws = WorkspaceState::new();
        ws.add_note("rent data", "scout".into(), tags(&["finance"]), Utc::now());

        let filter = NoteFilter {
            tag: Some("finance".to_string()),
            text: Some("competitor".to_string()),
        };
        assert!(ws.read_notes(&filter).is_empty());
    }

    #[test]
    fn writing_new_section_starts_at_version_one() {
        let mut ws = WorkspaceState::new();
        let (section, created) =
            ws.write_section("exec_summary", "Executive Summary", "Draft v1", "synth".into(), Utc::now());
        assert!(created);
        assert_eq!(section.version, 1);
    }

    #[test]
    fn overwriting_section_increments_version_by_one() {
        let mut ws = WorkspaceState::new();
        ws.write_section("exec_summary", "Executive Summary", "Draft v1", "synth".into(), Utc::now());
        let (section, created) =
            ws.write_section("exec_summary", "Executive Summary", "Draft v2", "synth".into(), Utc::now());
        assert!(!created);
        assert_eq!(section.version, 2);
        assert_eq!(section.content, "Draft v2");
    }

    #[test]
    fn reading_missing_section_fails() {
        let ws = WorkspaceState::new();
        let err = ws.read_section("nope").unwrap_err();
        assert!(matches!(err, WorkpadError::SectionNotFound { section_id } if section_id == "nope"));
    }

    #[test]
    fn add_task_validates_dependency_existence() {
        let mut ws = WorkspaceState::new();
        let ghost = TaskId::generate();
        let err = ws
            .add_task("impossible", None, [ghost].into_iter().collect())
            .unwrap_err();
        assert!(matches!(err, WorkpadError::InvalidDependency { dependency } if dependency == ghost));
    }

    #[test]
    fn add_task_accepts_existing_dependencies() {
        let mut ws = WorkspaceState::new();
        let first = ws.add_task("gather data", None, BTreeSet::new()).unwrap().id;
        let second = ws
            .add_task("write report", Some("synth".into()), [first].into_iter().collect())
            .unwrap();
        assert!(second.dependencies.contains(&first));
        assert_eq!(second.status, TaskStatus::Todo);
    }

    #[test]
    fn update_task_changes_only_provided_fields() {
        let mut ws = WorkspaceState::new();
        let id = ws
            .add_task("gather data", Some("scout".into()), BTreeSet::new())
            .unwrap()
            .id;

        let task = ws.update_task(id, Some(TaskStatus::InProgress), None).unwrap();
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.assigned_to, Some("scout".into()));

        let task = ws.update_task(id, None, Some("analyst-2".into())).unwrap();
        assert_eq!(task.status, TaskStatus::InProgress);
        assert_eq!(task.assigned_to, Some("analyst-2".into()));
    }

    #[test]
    fn update_unknown_task_fails() {
        let mut ws = WorkspaceState::new();
        let ghost = TaskId::generate();
        let err = ws.update_task(ghost, Some(TaskStatus::Completed), None).unwrap_err();
        assert!(matches!(err, WorkpadError::TaskNotFound { task_id } if task_id == ghost));
    }
}

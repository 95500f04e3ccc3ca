//! Task records as supplied by the host, plus the host-side status helpers.
//!
//! The canvas never mutates a [`Task`]. It reads the identifier, the two size
//! inputs, the status and the title; everything else belongs to the host.

#[cfg(test)]
#[path = "task_test.rs"]
mod task_test;

use serde::{Deserialize, Serialize};

/// Identifier of a task, as issued by the host.
pub type TaskId = String;

/// Workflow status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
    /// Any status string the canvas does not know about.
    #[serde(other)]
    Other,
}

impl TaskStatus {
    /// The status a long-press usually moves a task to.
    ///
    /// todo -> in-progress -> done -> todo; unknown statuses restart at todo.
    #[must_use]
    pub fn cycled(self) -> Self {
        match self {
            Self::Todo => Self::InProgress,
            Self::InProgress => Self::Done,
            Self::Done | Self::Other => Self::Todo,
        }
    }
}

/// A task record as the host hands it to the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Host identifier. Tasks without one (or with an empty one) are never laid out.
    #[serde(default)]
    pub id: Option<TaskId>,
    #[serde(default)]
    pub title: String,
    /// 1 (low) to 5 (high).
    pub priority: u8,
    /// 1 (low) to 5 (high).
    pub importance: u8,
    #[serde(default)]
    pub status: TaskStatus,
}

impl Task {
    /// Convenience constructor with status `todo`.
    #[must_use]
    pub fn new(id: impl Into<TaskId>, title: impl Into<String>, priority: u8, importance: u8) -> Self {
        Self {
            id: Some(id.into()),
            title: title.into(),
            priority,
            importance,
            status: TaskStatus::Todo,
        }
    }

    #[must_use]
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// The identifier, if present and non-empty.
    #[must_use]
    pub fn layout_id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    /// Bubble radius for this task.
    #[must_use]
    pub fn radius(&self) -> f64 {
        crate::sizing::radius_of(self.priority, self.importance)
    }
}

/// Host-side filter chips shown above the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskFilter {
    #[default]
    All,
    Todo,
    InProgress,
    Done,
    /// Priority 4 and above.
    HighPriority,
}

impl TaskFilter {
    #[must_use]
    pub fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Todo => task.status == TaskStatus::Todo,
            Self::InProgress => task.status == TaskStatus::InProgress,
            Self::Done => task.status == TaskStatus::Done,
            Self::HighPriority => task.priority >= 4,
        }
    }

    /// Keep the matching tasks, preserving order.
    #[must_use]
    pub fn apply(self, tasks: &[Task]) -> Vec<Task> {
        tasks.iter().filter(|t| self.matches(t)).cloned().collect()
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::{
    datetime_field, enum_field, non_blank, optional_text, required_text, uuid_field, Patch,
};
use crate::error::{FieldErrors, Result};

/// Workflow state. Any transition is allowed in either direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }

    /// Quick-toggle shortcut: completed goes back to pending, everything
    /// else (including in_progress) becomes completed.
    pub fn toggled(self) -> Self {
        match self {
            Self::Completed => Self::Pending,
            _ => Self::Completed,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            _ => Err(format!("unknown status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Tie-break rank within a category: high sorts first.
    pub fn rank(&self) -> u8 {
        match self {
            Self::High => 0,
            Self::Medium => 1,
            Self::Low => 2,
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(format!("unknown priority: {}", s)),
        }
    }
}

/// The three fixed task lists. Each one is an independent ordering partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskCategory {
    Work,
    People,
    #[default]
    Personal,
}

impl TaskCategory {
    pub const ALL: [TaskCategory; 3] = [Self::Work, Self::People, Self::Personal];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::People => "people",
            Self::Personal => "personal",
        }
    }

    /// Board heading
    pub fn label(&self) -> &'static str {
        match self {
            Self::Work => "Work Todos",
            Self::People => "People to Reach Out",
            Self::Personal => "Personal",
        }
    }
}

impl fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "work" => Ok(Self::Work),
            "people" => Ok(Self::People),
            "personal" => Ok(Self::Personal),
            _ => Err(format!("unknown category: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    /// Optional link to a contact; cleared when the contact is deleted
    pub contact_id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub category: TaskCategory,
    /// Position within `category`
    pub sort_order: i64,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.is_completed() && self.due_date.map_or(false, |due| due < now)
    }
}

/// A validated task ready to insert. `sort_order` is assigned by storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub category: TaskCategory,
    pub due_date: Option<DateTime<Utc>>,
    pub contact_id: Option<Uuid>,
}

impl NewTask {
    pub fn new(title: impl Into<String>, category: TaskCategory) -> Self {
        Self {
            title: title.into(),
            description: None,
            status: TaskStatus::default(),
            priority: TaskPriority::default(),
            category,
            due_date: None,
            contact_id: None,
        }
    }
}

/// POST body for a task.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub category: Option<String>,
    pub due_date: Option<String>,
    pub contact_id: Option<String>,
}

impl TaskInput {
    pub fn validate(self) -> Result<NewTask> {
        let mut errors = FieldErrors::new();

        let title = errors.check(required_text("title", "Title is required", self.title));
        let status = errors.check(enum_field::<TaskStatus>("status", self.status));
        let priority = errors.check(enum_field::<TaskPriority>("priority", self.priority));
        let category = errors.check(enum_field::<TaskCategory>("category", self.category));
        let due_date = errors.check(
            optional_text(self.due_date)
                .map(|s| datetime_field("due_date", &s))
                .transpose(),
        );
        let contact_id = errors.check(
            optional_text(self.contact_id)
                .map(|s| uuid_field("contact_id", &s))
                .transpose(),
        );

        errors.finish(NewTask {
            title: title.unwrap_or_default(),
            description: optional_text(self.description),
            status: status.flatten().unwrap_or_default(),
            priority: priority.flatten().unwrap_or_default(),
            category: category.flatten().unwrap_or_default(),
            due_date: due_date.flatten(),
            contact_id: contact_id.flatten(),
        })
    }
}

/// PUT body for a task. Absent keys keep the stored value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Patch<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub due_date: Patch<String>,
    #[serde(default)]
    pub contact_id: Patch<String>,
}

/// Validated field changes for an existing task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Patch<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub category: Option<TaskCategory>,
    pub due_date: Patch<DateTime<Utc>>,
    pub contact_id: Patch<Uuid>,
}

impl TaskUpdate {
    pub fn validate(self) -> Result<TaskChanges> {
        let mut errors = FieldErrors::new();

        let title = non_blank(&mut errors, "title", "Title cannot be empty", self.title);
        let status = errors.check(enum_field("status", self.status)).flatten();
        let priority = errors.check(enum_field("priority", self.priority)).flatten();
        let category = errors.check(enum_field("category", self.category)).flatten();
        let due_date = errors
            .check(
                self.due_date
                    .normalize_text()
                    .try_map(|s| datetime_field("due_date", &s)),
            )
            .unwrap_or_default();
        let contact_id = errors
            .check(
                self.contact_id
                    .normalize_text()
                    .try_map(|s| uuid_field("contact_id", &s)),
            )
            .unwrap_or_default();

        errors.finish(TaskChanges {
            title,
            description: self.description.normalize_text(),
            status,
            priority,
            category,
            due_date,
            contact_id,
        })
    }
}

/// Task list filters, combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub category: Option<TaskCategory>,
    pub contact_id: Option<Uuid>,
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{datetime_field, non_blank, optional_text, required_text, uuid_field, Patch};
use crate::error::{FieldErrors, Result};

/// A dated note, optionally linked to a contact and/or a task. Inert: nothing
/// is delivered when the date passes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: Uuid,
    /// Deleting the contact deletes the reminder
    pub contact_id: Option<Uuid>,
    /// Deleting the task only clears this link
    pub task_id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub reminder_date: DateTime<Utc>,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
}

impl Reminder {
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.is_completed && self.reminder_date < now
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReminder {
    pub title: String,
    pub description: Option<String>,
    pub reminder_date: DateTime<Utc>,
    pub contact_id: Option<Uuid>,
    pub task_id: Option<Uuid>,
}

impl NewReminder {
    pub fn new(title: impl Into<String>, reminder_date: DateTime<Utc>) -> Self {
        Self {
            title: title.into(),
            description: None,
            reminder_date,
            contact_id: None,
            task_id: None,
        }
    }
}

/// POST body for a reminder.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReminderInput {
    pub title: Option<String>,
    pub description: Option<String>,
    pub reminder_date: Option<String>,
    pub contact_id: Option<String>,
    pub task_id: Option<String>,
}

impl ReminderInput {
    pub fn validate(self) -> Result<NewReminder> {
        let mut errors = FieldErrors::new();

        let title = errors.check(required_text("title", "Title is required", self.title));
        let reminder_date = match optional_text(self.reminder_date) {
            Some(s) => errors.check(datetime_field("reminder_date", &s)),
            None => {
                errors.push("reminder_date", "Reminder date is required");
                None
            }
        };
        let contact_id = errors.check(
            optional_text(self.contact_id)
                .map(|s| uuid_field("contact_id", &s))
                .transpose(),
        );
        let task_id = errors.check(
            optional_text(self.task_id)
                .map(|s| uuid_field("task_id", &s))
                .transpose(),
        );

        errors.finish(NewReminder {
            title: title.unwrap_or_default(),
            description: optional_text(self.description),
            reminder_date: reminder_date.unwrap_or_default(),
            contact_id: contact_id.flatten(),
            task_id: task_id.flatten(),
        })
    }
}

/// PUT body for a reminder.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReminderUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Patch<String>,
    #[serde(default)]
    pub reminder_date: Option<String>,
    #[serde(default)]
    pub is_completed: Option<bool>,
    #[serde(default)]
    pub contact_id: Patch<String>,
    #[serde(default)]
    pub task_id: Patch<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReminderChanges {
    pub title: Option<String>,
    pub description: Patch<String>,
    pub reminder_date: Option<DateTime<Utc>>,
    pub is_completed: Option<bool>,
    pub contact_id: Patch<Uuid>,
    pub task_id: Patch<Uuid>,
}

impl ReminderUpdate {
    pub fn validate(self) -> Result<ReminderChanges> {
        let mut errors = FieldErrors::new();

        let title = non_blank(&mut errors, "title", "Title cannot be empty", self.title);
        let reminder_date = errors
            .check(
                optional_text(self.reminder_date)
                    .map(|s| datetime_field("reminder_date", &s))
                    .transpose(),
            )
            .flatten();
        let contact_id = errors
            .check(
                self.contact_id
                    .normalize_text()
                    .try_map(|s| uuid_field("contact_id", &s)),
            )
            .unwrap_or_default();
        let task_id = errors
            .check(
                self.task_id
                    .normalize_text()
                    .try_map(|s| uuid_field("task_id", &s)),
            )
            .unwrap_or_default();

        errors.finish(ReminderChanges {
            title,
            description: self.description.normalize_text(),
            reminder_date,
            is_completed: self.is_completed,
            contact_id,
            task_id,
        })
    }
}

/// Reminder list filters, combined with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReminderFilter {
    /// Only incomplete reminders dated now or later
    pub upcoming: bool,
    /// Calendar month (year, 1-12)
    pub month: Option<(i32, u32)>,
    pub contact_id: Option<Uuid>,
}

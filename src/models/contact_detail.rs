use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{Contact, Reminder, Task};

/// Full contact detail - the contact with its linked tasks and reminders
#[derive(Debug, Clone, Serialize)]
pub struct ContactDetail {
    #[serde(flatten)]
    pub contact: Contact,
    /// Ordered by due date
    pub tasks: Vec<Task>,
    /// Ordered by reminder date
    pub reminders: Vec<Reminder>,
}

impl ContactDetail {
    /// Tasks that are not completed yet
    pub fn open_tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(|t| !t.is_completed())
    }

    /// The earliest incomplete reminder at or after `now`, if any
    pub fn next_reminder(&self, now: DateTime<Utc>) -> Option<&Reminder> {
        self.reminders
            .iter()
            .find(|r| !r.is_completed && r.reminder_date >= now)
    }
}

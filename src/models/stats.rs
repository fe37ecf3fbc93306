use chrono::NaiveDate;
use serde::Serialize;

use super::{Reminder, Task};

/// Dashboard counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_contacts: i64,
    /// Tasks not completed (pending or in progress)
    pub pending_tasks: i64,
    pub completed_tasks: i64,
    /// Incomplete reminders dated now or later
    pub upcoming_reminders: i64,
    /// Incomplete reminders dated before now
    pub overdue_reminders: i64,
}

/// One day of the calendar month view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub reminders: Vec<Reminder>,
    /// Tasks due on this day
    pub tasks: Vec<Task>,
}

use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeMap;

use super::reminders::month_bounds;
use super::Database;
use crate::error::Result;
use crate::models::*;

impl Database {
    /// Dashboard counters as of now.
    pub fn dashboard_stats(&self) -> Result<DashboardStats> {
        self.dashboard_stats_at(Utc::now())
    }

    pub fn dashboard_stats_at(&self, now: DateTime<Utc>) -> Result<DashboardStats> {
        let now = to_db_timestamp(&now);
        let stats = self.conn.query_row(
            r#"SELECT
                (SELECT COUNT(*) FROM contacts),
                (SELECT COUNT(*) FROM tasks WHERE status != 'completed'),
                (SELECT COUNT(*) FROM tasks WHERE status = 'completed'),
                (SELECT COUNT(*) FROM reminders WHERE is_completed = 0 AND reminder_date >= ?1),
                (SELECT COUNT(*) FROM reminders WHERE is_completed = 0 AND reminder_date < ?1)"#,
            [now],
            |row| {
                Ok(DashboardStats {
                    total_contacts: row.get(0)?,
                    pending_tasks: row.get(1)?,
                    completed_tasks: row.get(2)?,
                    upcoming_reminders: row.get(3)?,
                    overdue_reminders: row.get(4)?,
                })
            },
        )?;
        Ok(stats)
    }

    /// Days of a month that have reminders or tasks due, in date order.
    /// Days with nothing scheduled are left out.
    pub fn calendar_month(&self, year: i32, month: u32) -> Result<Vec<CalendarDay>> {
        let (start, end) = month_bounds(year, month)?;
        let (start, end) = (to_db_timestamp(&start), to_db_timestamp(&end));

        let mut days: BTreeMap<NaiveDate, CalendarDay> = BTreeMap::new();

        let mut stmt = self.conn.prepare(
            "SELECT * FROM reminders
             WHERE reminder_date >= ? AND reminder_date < ?
             ORDER BY reminder_date ASC",
        )?;
        let reminders = stmt
            .query_map([&start, &end], Self::row_to_reminder)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        for reminder in reminders {
            day_entry(&mut days, reminder.reminder_date.date_naive())
                .reminders
                .push(reminder);
        }

        let mut stmt = self.conn.prepare(
            "SELECT * FROM tasks
             WHERE due_date >= ? AND due_date < ?
             ORDER BY due_date ASC, sort_order ASC",
        )?;
        let tasks = stmt
            .query_map([&start, &end], Self::row_to_task)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        for task in tasks {
            if let Some(due) = task.due_date {
                day_entry(&mut days, due.date_naive()).tasks.push(task);
            }
        }

        Ok(days.into_values().collect())
    }
}

fn day_entry(days: &mut BTreeMap<NaiveDate, CalendarDay>, date: NaiveDate) -> &mut CalendarDay {
    days.entry(date).or_insert_with(|| CalendarDay {
        date,
        reminders: Vec::new(),
        tasks: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_stats_empty() {
        let db = Database::open_memory().unwrap();
        assert_eq!(db.dashboard_stats().unwrap(), DashboardStats::default());
    }

    #[test]
    fn test_stats_counts() {
        let db = Database::open_memory().unwrap();
        let now = Utc::now();

        db.insert_contact(&NewContact::new("Sarah", "Chen")).unwrap();
        db.insert_contact(&NewContact::new("Marcus", "Johnson")).unwrap();

        // N = 5 tasks, K = 2 completed
        let mut ids = Vec::new();
        for (i, category) in [
            TaskCategory::Work,
            TaskCategory::Work,
            TaskCategory::People,
            TaskCategory::Personal,
            TaskCategory::Personal,
        ]
        .into_iter()
        .enumerate()
        {
            ids.push(db.create_task(&NewTask::new(format!("t{}", i), category)).unwrap().id);
        }
        db.toggle_task(ids[0]).unwrap();
        db.toggle_task(ids[3]).unwrap();
        db.update_task(
            ids[1],
            TaskChanges {
                status: Some(TaskStatus::InProgress),
                ..Default::default()
            },
        )
        .unwrap();

        db.insert_reminder(&NewReminder::new("soon", now + Duration::hours(2)))
            .unwrap();
        db.insert_reminder(&NewReminder::new("late", now - Duration::hours(2)))
            .unwrap();
        let done = db
            .insert_reminder(&NewReminder::new("late but done", now - Duration::days(3)))
            .unwrap();
        db.update_reminder(
            done.id,
            ReminderChanges {
                is_completed: Some(true),
                ..Default::default()
            },
        )
        .unwrap();

        let stats = db.dashboard_stats_at(now).unwrap();
        assert_eq!(
            stats,
            DashboardStats {
                total_contacts: 2,
                pending_tasks: 3,
                completed_tasks: 2,
                upcoming_reminders: 1,
                overdue_reminders: 1,
            }
        );

        let json = serde_json::to_value(stats).unwrap();
        assert_eq!(json["pendingTasks"], 3);
        assert_eq!(json["totalContacts"], 2);
    }

    #[test]
    fn test_calendar_month_groups_by_day() {
        let db = Database::open_memory().unwrap();
        let at = |s: &str| parse_datetime(s).unwrap();

        db.insert_reminder(&NewReminder::new("call", at("2026-06-10 09:00")))
            .unwrap();
        db.insert_reminder(&NewReminder::new("lunch", at("2026-06-10 12:30")))
            .unwrap();
        db.insert_reminder(&NewReminder::new("july", at("2026-07-01")))
            .unwrap();

        let mut due = NewTask::new("report", TaskCategory::Work);
        due.due_date = Some(at("2026-06-03 17:00"));
        db.create_task(&due).unwrap();
        db.create_task(&NewTask::new("undated", TaskCategory::Work))
            .unwrap();

        let days = db.calendar_month(2026, 6).unwrap();
        assert_eq!(days.len(), 2);

        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2026, 6, 3).unwrap());
        assert_eq!(days[0].tasks.len(), 1);
        assert!(days[0].reminders.is_empty());

        assert_eq!(days[1].date, NaiveDate::from_ymd_opt(2026, 6, 10).unwrap());
        let titles: Vec<&str> = days[1].reminders.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["call", "lunch"]);

        assert!(db.calendar_month(2026, 0).is_err());
    }
}

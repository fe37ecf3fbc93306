use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::{params, params_from_iter, OptionalExtension, Row};
use uuid::Uuid;

use super::{parse_optional_uuid, parse_timestamp, parse_uuid, Database};
use crate::error::{CrmError, Result};
use crate::models::*;

const REMINDER_WITH_CONTACT: &str = r#"
    SELECT r.*, c.first_name AS contact_first_name, c.last_name AS contact_last_name
    FROM reminders r
    LEFT JOIN contacts c ON c.id = r.contact_id
"#;

/// Half-open UTC range `[first day, first day of next month)` for a calendar
/// month. Rejects months outside 1-12.
pub(crate) fn month_bounds(year: i32, month: u32) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    let invalid = || CrmError::field("month", format!("Invalid month: {}-{}", year, month));
    let start = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let end = NaiveDate::from_ymd_opt(next_year, next_month, 1).ok_or_else(invalid)?;

    let midnight = |d: NaiveDate| d.and_hms_opt(0, 0, 0).map(|n| n.and_utc());
    Ok((
        midnight(start).ok_or_else(invalid)?,
        midnight(end).ok_or_else(invalid)?,
    ))
}

impl Database {
    // ==================== REMINDER CREATE ====================

    pub fn insert_reminder(&self, new: &NewReminder) -> Result<Reminder> {
        let id = Uuid::new_v4();
        self.conn.execute(
            r#"INSERT INTO reminders (
                id, contact_id, task_id, title, description, reminder_date,
                is_completed, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, 0, ?)"#,
            params![
                id.to_string(),
                new.contact_id.map(|c| c.to_string()),
                new.task_id.map(|t| t.to_string()),
                new.title,
                new.description,
                to_db_timestamp(&new.reminder_date),
                to_db_timestamp(&Utc::now()),
            ],
        )?;
        self.require_reminder(id)
    }

    // ==================== REMINDER READ ====================

    /// Single reminder with the linked contact's name
    pub fn get_reminder(&self, id: Uuid) -> Result<Option<WithContact<Reminder>>> {
        let sql = format!("{} WHERE r.id = ?", REMINDER_WITH_CONTACT);
        let reminder = self
            .conn
            .query_row(&sql, [id.to_string()], Self::row_to_reminder_with_contact)
            .optional()?;
        Ok(reminder)
    }

    pub fn require_reminder(&self, id: Uuid) -> Result<Reminder> {
        let reminder = self
            .conn
            .query_row(
                "SELECT * FROM reminders WHERE id = ?",
                [id.to_string()],
                Self::row_to_reminder,
            )
            .optional()?;
        reminder.ok_or_else(|| CrmError::not_found("reminder", id))
    }

    pub fn list_reminders(&self, filter: &ReminderFilter) -> Result<Vec<WithContact<Reminder>>> {
        let mut conditions: Vec<&str> = Vec::new();
        let mut values: Vec<String> = Vec::new();

        if filter.upcoming {
            conditions.push("r.is_completed = 0 AND r.reminder_date >= ?");
            values.push(to_db_timestamp(&Utc::now()));
        }
        if let Some((year, month)) = filter.month {
            let (start, end) = month_bounds(year, month)?;
            conditions.push("r.reminder_date >= ? AND r.reminder_date < ?");
            values.push(to_db_timestamp(&start));
            values.push(to_db_timestamp(&end));
        }
        if let Some(contact_id) = filter.contact_id {
            conditions.push("r.contact_id = ?");
            values.push(contact_id.to_string());
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        let sql = format!(
            "{} {} ORDER BY r.reminder_date ASC",
            REMINDER_WITH_CONTACT, where_clause
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(
            params_from_iter(values.iter()),
            Self::row_to_reminder_with_contact,
        )?;
        let reminders = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(reminders)
    }

    pub fn reminders_for_contact(&self, contact_id: Uuid) -> Result<Vec<Reminder>> {
        let mut stmt = self
            .conn
            .prepare("SELECT * FROM reminders WHERE contact_id = ? ORDER BY reminder_date ASC")?;
        let rows = stmt.query_map([contact_id.to_string()], Self::row_to_reminder)?;
        let reminders = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(reminders)
    }

    // ==================== REMINDER UPDATE ====================

    pub fn update_reminder(&self, id: Uuid, changes: ReminderChanges) -> Result<Reminder> {
        let existing = self.require_reminder(id)?;

        self.conn.execute(
            r#"UPDATE reminders SET
                contact_id = ?, task_id = ?, title = ?, description = ?,
                reminder_date = ?, is_completed = ?
               WHERE id = ?"#,
            params![
                changes
                    .contact_id
                    .apply(existing.contact_id)
                    .map(|c| c.to_string()),
                changes.task_id.apply(existing.task_id).map(|t| t.to_string()),
                changes.title.unwrap_or(existing.title),
                changes.description.apply(existing.description),
                to_db_timestamp(&changes.reminder_date.unwrap_or(existing.reminder_date)),
                changes.is_completed.unwrap_or(existing.is_completed),
                id.to_string(),
            ],
        )?;

        self.require_reminder(id)
    }

    // ==================== REMINDER DELETE ====================

    pub fn delete_reminder(&self, id: Uuid) -> Result<()> {
        let rows = self
            .conn
            .execute("DELETE FROM reminders WHERE id = ?", [id.to_string()])?;
        if rows == 0 {
            return Err(CrmError::not_found("reminder", id));
        }
        Ok(())
    }

    // ==================== ROW MAPPERS ====================

    pub(crate) fn row_to_reminder(row: &Row) -> rusqlite::Result<Reminder> {
        let id: String = row.get("id")?;
        let reminder_date: String = row.get("reminder_date")?;
        let created_at: String = row.get("created_at")?;

        Ok(Reminder {
            id: parse_uuid(&id)?,
            contact_id: parse_optional_uuid(row.get("contact_id")?)?,
            task_id: parse_optional_uuid(row.get("task_id")?)?,
            title: row.get("title")?,
            description: row.get("description")?,
            reminder_date: parse_timestamp(&reminder_date)?,
            is_completed: row.get("is_completed")?,
            created_at: parse_timestamp(&created_at)?,
        })
    }

    fn row_to_reminder_with_contact(row: &Row) -> rusqlite::Result<WithContact<Reminder>> {
        Ok(WithContact {
            item: Self::row_to_reminder(row)?,
            contact_first_name: row.get("contact_first_name")?,
            contact_last_name: row.get("contact_last_name")?,
        })
    }
}

use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};
use uuid::Uuid;

use super::{escape_like, parse_timestamp, parse_uuid, Database};
use crate::error::{CrmError, Result};
use crate::models::*;

impl Database {
    // ==================== CONTACT CREATE ====================

    pub fn insert_contact(&self, new: &NewContact) -> Result<Contact> {
        let id = Uuid::new_v4();
        let now = to_db_timestamp(&Utc::now());
        self.conn.execute(
            r#"INSERT INTO contacts (
                id, first_name, last_name, email, phone, company, title, notes,
                avatar_color, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
            params![
                id.to_string(),
                new.first_name,
                new.last_name,
                new.email,
                new.phone,
                new.company,
                new.title,
                new.notes,
                new.avatar_color,
                now,
                now,
            ],
        )?;
        self.require_contact(id)
    }

    // ==================== CONTACT READ ====================

    pub fn get_contact(&self, id: Uuid) -> Result<Option<Contact>> {
        let contact = self
            .conn
            .query_row(
                "SELECT * FROM contacts WHERE id = ?",
                [id.to_string()],
                Self::row_to_contact,
            )
            .optional()?;
        Ok(contact)
    }

    /// Like [`Database::get_contact`], but a missing row is an error.
    pub fn require_contact(&self, id: Uuid) -> Result<Contact> {
        self.get_contact(id)?
            .ok_or_else(|| CrmError::not_found("contact", id))
    }

    pub fn count_contacts(&self) -> Result<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM contacts", [], |row| row.get(0))?;
        Ok(count)
    }

    /// List contacts, optionally filtered by a case-insensitive substring of
    /// first name, last name, email or company.
    pub fn list_contacts(&self, query: &ContactQuery) -> Result<Vec<Contact>> {
        let search = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        // Column and direction come from closed enums, never from input text
        let order = format!(
            "ORDER BY {} {}",
            query.sort.column(),
            query.direction.as_sql()
        );

        let contacts = match search {
            Some(term) => {
                let pattern = format!("%{}%", escape_like(term));
                let sql = format!(
                    r#"SELECT * FROM contacts
                       WHERE first_name LIKE ?1 ESCAPE '\'
                          OR last_name LIKE ?1 ESCAPE '\'
                          OR email LIKE ?1 ESCAPE '\'
                          OR company LIKE ?1 ESCAPE '\'
                       {}"#,
                    order
                );
                let mut stmt = self.conn.prepare(&sql)?;
                let rows = stmt.query_map([pattern], Self::row_to_contact)?;
                rows.collect::<rusqlite::Result<Vec<_>>>()?
            }
            None => {
                let sql = format!("SELECT * FROM contacts {}", order);
                let mut stmt = self.conn.prepare(&sql)?;
                let rows = stmt.query_map([], Self::row_to_contact)?;
                rows.collect::<rusqlite::Result<Vec<_>>>()?
            }
        };

        Ok(contacts)
    }

    // ==================== CONTACT UPDATE ====================

    pub fn update_contact(&self, id: Uuid, changes: ContactChanges) -> Result<Contact> {
        let existing = self.require_contact(id)?;
        let now = Utc::now();

        self.conn.execute(
            r#"UPDATE contacts SET
                first_name = ?, last_name = ?, email = ?, phone = ?, company = ?,
                title = ?, notes = ?, updated_at = ?
               WHERE id = ?"#,
            params![
                changes.first_name.unwrap_or(existing.first_name),
                changes.last_name.unwrap_or(existing.last_name),
                changes.email.apply(existing.email),
                changes.phone.apply(existing.phone),
                changes.company.apply(existing.company),
                changes.title.apply(existing.title),
                changes.notes.apply(existing.notes),
                to_db_timestamp(&now),
                id.to_string(),
            ],
        )?;

        self.require_contact(id)
    }

    // ==================== CONTACT DELETE ====================

    /// Hard delete. Reminders of the contact go with it (CASCADE); its tasks
    /// stay but lose the link (SET NULL).
    pub fn delete_contact(&self, id: Uuid) -> Result<()> {
        let rows = self
            .conn
            .execute("DELETE FROM contacts WHERE id = ?", [id.to_string()])?;
        if rows == 0 {
            return Err(CrmError::not_found("contact", id));
        }
        Ok(())
    }

    // ==================== CONTACT DETAIL ====================

    /// Get the contact with its tasks and reminders
    pub fn get_contact_detail(&self, id: Uuid) -> Result<Option<ContactDetail>> {
        let contact = match self.get_contact(id)? {
            Some(c) => c,
            None => return Ok(None),
        };

        let tasks = self.tasks_for_contact(id)?;
        let reminders = self.reminders_for_contact(id)?;

        Ok(Some(ContactDetail {
            contact,
            tasks,
            reminders,
        }))
    }

    // ==================== ROW MAPPERS ====================

    fn row_to_contact(row: &Row) -> rusqlite::Result<Contact> {
        let id: String = row.get("id")?;
        let created_at: String = row.get("created_at")?;
        let updated_at: String = row.get("updated_at")?;

        Ok(Contact {
            id: parse_uuid(&id)?,
            first_name: row.get("first_name")?,
            last_name: row.get("last_name")?,
            email: row.get("email")?,
            phone: row.get("phone")?,
            company: row.get("company")?,
            title: row.get("title")?,
            notes: row.get("notes")?,
            avatar_color: row.get("avatar_color")?,
            created_at: parse_timestamp(&created_at)?,
            updated_at: parse_timestamp(&updated_at)?,
        })
    }
}

use chrono::Utc;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use uuid::Uuid;

use super::{
    batch_failure, parse_enum, parse_optional_timestamp, parse_optional_uuid, parse_timestamp,
    parse_uuid, Database,
};
use crate::error::{CrmError, Result};
use crate::models::*;
use crate::ordering::{next_sort_order, validate_batch, ReorderItem, TaskBoard};

const TASK_WITH_CONTACT: &str = r#"
    SELECT t.*, c.first_name AS contact_first_name, c.last_name AS contact_last_name
    FROM tasks t
    LEFT JOIN contacts c ON c.id = t.contact_id
"#;

/// Read-path order: category lists in board order, then position, then
/// priority (high first), then due date.
const TASK_ORDER: &str = r#"
    ORDER BY
        CASE t.category WHEN 'work' THEN 0 WHEN 'people' THEN 1 ELSE 2 END,
        t.sort_order ASC,
        CASE t.priority WHEN 'high' THEN 0 WHEN 'medium' THEN 1 ELSE 2 END,
        t.due_date ASC
"#;

impl Database {
    // ==================== TASK CREATE ====================

    /// Insert a task at the end of its category. The position is read and
    /// written under one write lock, so concurrent creates cannot collide.
    pub fn create_task(&self, new: &NewTask) -> Result<Task> {
        if new.title.trim().is_empty() {
            return Err(CrmError::field("title", "Title is required"));
        }

        let id = Uuid::new_v4();
        let now = to_db_timestamp(&Utc::now());

        let tx = self.write_transaction()?;
        let sort_order = next_sort_order(Self::max_sort_order(&tx, new.category)?);
        tx.execute(
            r#"INSERT INTO tasks (
                id, contact_id, title, description, status, priority, category,
                sort_order, due_date, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
            params![
                id.to_string(),
                new.contact_id.map(|c| c.to_string()),
                new.title,
                new.description,
                new.status.as_str(),
                new.priority.as_str(),
                new.category.as_str(),
                sort_order,
                new.due_date.as_ref().map(to_db_timestamp),
                now,
                now,
            ],
        )?;
        tx.commit()?;

        log::debug!("created task {} at {}#{}", id, new.category, sort_order);
        self.require_task(id)
    }

    fn max_sort_order(conn: &Connection, category: TaskCategory) -> Result<Option<i64>> {
        let max = conn.query_row(
            "SELECT MAX(sort_order) FROM tasks WHERE category = ?",
            [category.as_str()],
            |row| row.get(0),
        )?;
        Ok(max)
    }

    // ==================== TASK READ ====================

    pub fn get_task(&self, id: Uuid) -> Result<Option<Task>> {
        let task = self
            .conn
            .query_row(
                "SELECT * FROM tasks WHERE id = ?",
                [id.to_string()],
                Self::row_to_task,
            )
            .optional()?;
        Ok(task)
    }

    pub fn require_task(&self, id: Uuid) -> Result<Task> {
        self.get_task(id)?.ok_or_else(|| CrmError::not_found("task", id))
    }

    /// Single task with the linked contact's name
    pub fn get_task_with_contact(&self, id: Uuid) -> Result<Option<WithContact<Task>>> {
        let sql = format!("{} WHERE t.id = ?", TASK_WITH_CONTACT);
        let task = self
            .conn
            .query_row(&sql, [id.to_string()], Self::row_to_task_with_contact)
            .optional()?;
        Ok(task)
    }

    pub fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<WithContact<Task>>> {
        let mut conditions: Vec<&str> = Vec::new();
        let mut values: Vec<String> = Vec::new();

        if let Some(status) = filter.status {
            conditions.push("t.status = ?");
            values.push(status.as_str().to_string());
        }
        if let Some(priority) = filter.priority {
            conditions.push("t.priority = ?");
            values.push(priority.as_str().to_string());
        }
        if let Some(category) = filter.category {
            conditions.push("t.category = ?");
            values.push(category.as_str().to_string());
        }
        if let Some(contact_id) = filter.contact_id {
            conditions.push("t.contact_id = ?");
            values.push(contact_id.to_string());
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        let sql = format!("{} {} {}", TASK_WITH_CONTACT, where_clause, TASK_ORDER);

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(values.iter()), Self::row_to_task_with_contact)?;
        let tasks = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(tasks)
    }

    /// Every task, split into the three category columns.
    pub fn task_board(&self) -> Result<TaskBoard> {
        Self::load_board(&self.conn)
    }

    fn load_board(conn: &Connection) -> Result<TaskBoard> {
        let mut stmt = conn.prepare("SELECT * FROM tasks")?;
        let rows = stmt.query_map([], Self::row_to_task)?;
        let tasks = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(TaskBoard::from_tasks(tasks))
    }

    /// Tasks linked to a contact, soonest due first
    pub fn tasks_for_contact(&self, contact_id: Uuid) -> Result<Vec<Task>> {
        let mut stmt = self
            .conn
            .prepare("SELECT * FROM tasks WHERE contact_id = ? ORDER BY due_date ASC, sort_order ASC")?;
        let rows = stmt.query_map([contact_id.to_string()], Self::row_to_task)?;
        let tasks = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(tasks)
    }

    // ==================== TASK UPDATE ====================

    /// Apply field changes. A category change appends the task to the end of
    /// the destination list; the source list keeps its gap until the next
    /// reorder.
    pub fn update_task(&self, id: Uuid, changes: TaskChanges) -> Result<Task> {
        let tx = self.write_transaction()?;
        let existing = self.require_task(id)?;

        let (category, sort_order) = match changes.category {
            Some(category) if category != existing.category => {
                (category, next_sort_order(Self::max_sort_order(&tx, category)?))
            }
            _ => (existing.category, existing.sort_order),
        };

        tx.execute(
            r#"UPDATE tasks SET
                contact_id = ?, title = ?, description = ?, status = ?, priority = ?,
                category = ?, sort_order = ?, due_date = ?, updated_at = ?
               WHERE id = ?"#,
            params![
                changes
                    .contact_id
                    .apply(existing.contact_id)
                    .map(|c| c.to_string()),
                changes.title.unwrap_or(existing.title),
                changes.description.apply(existing.description),
                changes.status.unwrap_or(existing.status).as_str(),
                changes.priority.unwrap_or(existing.priority).as_str(),
                category.as_str(),
                sort_order,
                changes
                    .due_date
                    .apply(existing.due_date)
                    .as_ref()
                    .map(to_db_timestamp),
                to_db_timestamp(&Utc::now()),
                id.to_string(),
            ],
        )?;
        tx.commit()?;

        self.require_task(id)
    }

    /// Completed goes back to pending; anything else becomes completed.
    pub fn toggle_task(&self, id: Uuid) -> Result<Task> {
        let task = self.require_task(id)?;
        self.conn.execute(
            "UPDATE tasks SET status = ?, updated_at = ? WHERE id = ?",
            params![
                task.status.toggled().as_str(),
                to_db_timestamp(&Utc::now()),
                id.to_string()
            ],
        )?;
        self.require_task(id)
    }

    // ==================== TASK DELETE ====================

    /// Hard delete. Reminders pointing at the task keep existing with the
    /// link cleared.
    pub fn delete_task(&self, id: Uuid) -> Result<()> {
        let rows = self
            .conn
            .execute("DELETE FROM tasks WHERE id = ?", [id.to_string()])?;
        if rows == 0 {
            return Err(CrmError::not_found("task", id));
        }
        Ok(())
    }

    // ==================== ORDERING ====================

    /// Apply a reorder batch all-or-nothing. An unknown id fails the whole
    /// batch with `NotFound`; any storage failure fails it with
    /// `Transaction`. In both cases nothing is written.
    pub fn reorder_tasks(&self, items: &[ReorderItem]) -> Result<()> {
        validate_batch(items)?;
        if items.is_empty() {
            return Ok(());
        }

        let tx = self.write_transaction().map_err(batch_failure)?;
        Self::apply_reorder(&tx, items)?;
        tx.commit().map_err(batch_failure)?;

        log::debug!("reordered {} tasks", items.len());
        Ok(())
    }

    /// Write every item of a checked batch. Any failure returns early and the
    /// caller's transaction rolls back on drop.
    fn apply_reorder(conn: &Connection, items: &[ReorderItem]) -> Result<()> {
        let now = to_db_timestamp(&Utc::now());
        let mut stmt = conn
            .prepare("UPDATE tasks SET category = ?, sort_order = ?, updated_at = ? WHERE id = ?")
            .map_err(batch_failure)?;

        for item in items {
            let rows = stmt
                .execute(params![
                    item.category.as_str(),
                    item.sort_order,
                    now,
                    item.id.to_string()
                ])
                .map_err(|e| {
                    log::warn!("reorder rolled back at task {}: {}", item.id, e);
                    batch_failure(e)
                })?;
            if rows == 0 {
                log::warn!("reorder rolled back: task {} does not exist", item.id);
                return Err(CrmError::not_found("task", item.id));
            }
        }
        Ok(())
    }

    /// Move a task to `index` within `category` and re-index every list the
    /// move touches. The board is read and rewritten under one write lock.
    /// Returns the board after the move.
    pub fn move_task(&self, id: Uuid, category: TaskCategory, index: usize) -> Result<TaskBoard> {
        let tx = self.write_transaction().map_err(batch_failure)?;
        let items = Self::load_board(&tx)?.plan_move(id, category, index)?;
        validate_batch(&items)?;
        Self::apply_reorder(&tx, &items)?;
        tx.commit().map_err(batch_failure)?;

        log::debug!("moved task {} to {}#{}", id, category, index);
        self.task_board()
    }

    // ==================== ROW MAPPERS ====================

    pub(crate) fn row_to_task(row: &Row) -> rusqlite::Result<Task> {
        let id: String = row.get("id")?;
        let status: String = row.get("status")?;
        let priority: String = row.get("priority")?;
        let category: String = row.get("category")?;
        let created_at: String = row.get("created_at")?;
        let updated_at: String = row.get("updated_at")?;

        Ok(Task {
            id: parse_uuid(&id)?,
            contact_id: parse_optional_uuid(row.get("contact_id")?)?,
            title: row.get("title")?,
            description: row.get("description")?,
            status: parse_enum(&status)?,
            priority: parse_enum(&priority)?,
            category: parse_enum(&category)?,
            sort_order: row.get("sort_order")?,
            due_date: parse_optional_timestamp(row.get("due_date")?)?,
            created_at: parse_timestamp(&created_at)?,
            updated_at: parse_timestamp(&updated_at)?,
        })
    }

    fn row_to_task_with_contact(row: &Row) -> rusqlite::Result<WithContact<Task>> {
        Ok(WithContact {
            item: Self::row_to_task(row)?,
            contact_first_name: row.get("contact_first_name")?,
            contact_last_name: row.get("contact_last_name")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(db: &Database, title: &str, category: TaskCategory) -> Task {
        db.create_task(&NewTask::new(title, category)).unwrap()
    }

    fn titles(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.title.as_str()).collect()
    }

    fn orders(tasks: &[Task]) -> Vec<i64> {
        tasks.iter().map(|t| t.sort_order).collect()
    }

    fn snapshot(db: &Database) -> Vec<(Uuid, TaskCategory, i64)> {
        let mut rows: Vec<_> = db
            .list_tasks(&TaskFilter::default())
            .unwrap()
            .into_iter()
            .map(|t| (t.item.id, t.item.category, t.item.sort_order))
            .collect();
        rows.sort();
        rows
    }

    #[test]
    fn test_create_assigns_sequential_sort_order() {
        let db = Database::open_memory().unwrap();
        let a = task(&db, "a", TaskCategory::Work);
        let b = task(&db, "b", TaskCategory::Work);
        let c = task(&db, "c", TaskCategory::Work);
        let p = task(&db, "p", TaskCategory::Personal);

        assert_eq!((a.sort_order, b.sort_order, c.sort_order), (0, 1, 2));
        // Each category is its own sequence
        assert_eq!(p.sort_order, 0);
        assert_eq!(a.status, TaskStatus::Pending);
    }

    #[test]
    fn test_create_after_gap_uses_max() {
        let db = Database::open_memory().unwrap();
        let a = task(&db, "a", TaskCategory::Work);
        task(&db, "b", TaskCategory::Work);
        db.delete_task(a.id).unwrap();
        let c = task(&db, "c", TaskCategory::Work);
        assert_eq!(c.sort_order, 2);
    }

    #[test]
    fn test_create_rejects_blank_title() {
        let db = Database::open_memory().unwrap();
        let err = db
            .create_task(&NewTask::new("   ", TaskCategory::Work))
            .unwrap_err();
        match err {
            CrmError::Validation(fields) => assert_eq!(fields[0].field, "title"),
            other => panic!("expected validation error, got {:?}", other),
        }
        assert!(db.list_tasks(&TaskFilter::default()).unwrap().is_empty());

        // The failed create does not consume a position
        assert_eq!(task(&db, "first", TaskCategory::Work).sort_order, 0);
    }

    #[test]
    fn test_create_with_unknown_contact_is_constraint_error() {
        let db = Database::open_memory().unwrap();
        let mut new = NewTask::new("Orphan", TaskCategory::People);
        new.contact_id = Some(Uuid::new_v4());
        let err = db.create_task(&new).unwrap_err();
        assert!(matches!(
            err,
            CrmError::Constraint {
                kind: crate::error::ConstraintKind::ForeignKey,
                ..
            }
        ));
        assert!(db.list_tasks(&TaskFilter::default()).unwrap().is_empty());
    }

    #[test]
    fn test_reorder_scenario() {
        let db = Database::open_memory().unwrap();
        let a = db.insert_contact(&NewContact::new("Alex", "Morgan")).unwrap();

        let mut new_t = NewTask::new("T", TaskCategory::Work);
        new_t.contact_id = Some(a.id);
        let t = db.create_task(&new_t).unwrap();
        let u = task(&db, "U", TaskCategory::Work);
        assert_eq!((t.sort_order, u.sort_order), (0, 1));

        db.reorder_tasks(&[
            ReorderItem { id: t.id, category: TaskCategory::Work, sort_order: 1 },
            ReorderItem { id: u.id, category: TaskCategory::Work, sort_order: 0 },
        ])
        .unwrap();

        let listed = db.list_tasks(&TaskFilter::default()).unwrap();
        let names: Vec<&str> = listed.iter().map(|t| t.item.title.as_str()).collect();
        assert_eq!(names, vec!["U", "T"]);
        assert_eq!(listed[1].contact_first_name.as_deref(), Some("Alex"));
        assert_eq!(listed[0].contact_first_name, None);
    }

    #[test]
    fn test_reorder_unknown_id_rolls_back() {
        let db = Database::open_memory().unwrap();
        let a = task(&db, "a", TaskCategory::Work);
        let b = task(&db, "b", TaskCategory::Work);
        let before = snapshot(&db);

        let missing = Uuid::new_v4();
        let err = db
            .reorder_tasks(&[
                ReorderItem { id: b.id, category: TaskCategory::Work, sort_order: 0 },
                ReorderItem { id: missing, category: TaskCategory::Work, sort_order: 1 },
                ReorderItem { id: a.id, category: TaskCategory::Work, sort_order: 2 },
            ])
            .unwrap_err();

        match err {
            CrmError::NotFound { entity, id } => {
                assert_eq!(entity, "task");
                assert_eq!(id, missing.to_string());
            }
            other => panic!("expected not found, got {:?}", other),
        }
        assert_eq!(snapshot(&db), before);
    }

    #[test]
    fn test_reorder_fault_mid_batch_rolls_back() {
        let db = Database::open_memory().unwrap();
        let a = task(&db, "a", TaskCategory::Work);
        let b = task(&db, "b", TaskCategory::Work);
        let c = task(&db, "c", TaskCategory::Personal);
        let before = snapshot(&db);

        db.conn()
            .execute_batch(&format!(
                "CREATE TRIGGER fail_reorder BEFORE UPDATE ON tasks WHEN NEW.id = '{}'
                 BEGIN SELECT RAISE(ABORT, 'injected fault'); END;",
                b.id
            ))
            .unwrap();

        let err = db
            .reorder_tasks(&[
                ReorderItem { id: a.id, category: TaskCategory::Work, sort_order: 1 },
                ReorderItem { id: b.id, category: TaskCategory::Work, sort_order: 0 },
                ReorderItem { id: c.id, category: TaskCategory::Work, sort_order: 2 },
            ])
            .unwrap_err();

        assert!(matches!(err, CrmError::Transaction(ref msg) if msg.contains("injected fault")));
        assert_eq!(snapshot(&db), before);
    }

    #[test]
    fn test_reorder_rejects_inconsistent_batch() {
        let db = Database::open_memory().unwrap();
        let a = task(&db, "a", TaskCategory::Work);
        let b = task(&db, "b", TaskCategory::Work);
        let before = snapshot(&db);

        let err = db
            .reorder_tasks(&[
                ReorderItem { id: a.id, category: TaskCategory::Work, sort_order: 0 },
                ReorderItem { id: b.id, category: TaskCategory::Work, sort_order: 0 },
            ])
            .unwrap_err();
        assert!(matches!(err, CrmError::Validation(_)));
        assert_eq!(snapshot(&db), before);

        // Empty batch is a no-op
        db.reorder_tasks(&[]).unwrap();
        assert_eq!(snapshot(&db), before);
    }

    #[test]
    fn test_move_across_categories() {
        let db = Database::open_memory().unwrap();
        task(&db, "w0", TaskCategory::Work);
        let w1 = task(&db, "w1", TaskCategory::Work);
        task(&db, "w2", TaskCategory::Work);
        task(&db, "p0", TaskCategory::People);

        let board = db.move_task(w1.id, TaskCategory::People, 0).unwrap();

        assert_eq!(titles(&board.work), vec!["w0", "w2"]);
        assert_eq!(orders(&board.work), vec![0, 1]);
        assert_eq!(titles(&board.people), vec!["w1", "p0"]);
        assert_eq!(orders(&board.people), vec![0, 1]);

        let moved = db.require_task(w1.id).unwrap();
        assert_eq!(moved.category, TaskCategory::People);
        assert_eq!(moved.sort_order, 0);
    }

    #[test]
    fn test_move_within_category_and_unknown() {
        let db = Database::open_memory().unwrap();
        task(&db, "a", TaskCategory::Personal);
        task(&db, "b", TaskCategory::Personal);
        let c = task(&db, "c", TaskCategory::Personal);

        let board = db.move_task(c.id, TaskCategory::Personal, 1).unwrap();
        assert_eq!(titles(&board.personal), vec!["a", "c", "b"]);
        assert_eq!(orders(&board.personal), vec![0, 1, 2]);

        let err = db
            .move_task(Uuid::new_v4(), TaskCategory::Work, 0)
            .unwrap_err();
        assert!(matches!(err, CrmError::NotFound { .. }));
    }

    #[test]
    fn test_move_waits_for_write_lock_before_planning() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crm.db");
        let db = Database::open_at(path.clone()).unwrap();
        let other = Database::open_at(path).unwrap();
        db.conn.busy_timeout(std::time::Duration::ZERO).unwrap();

        task(&db, "w0", TaskCategory::Work);
        let w1 = task(&db, "w1", TaskCategory::Work);
        task(&db, "p0", TaskCategory::People);
        let before = snapshot(&db);

        // Another writer holds the lock: the move neither plans nor writes
        {
            let tx = other.write_transaction().unwrap();
            tx.execute(
                "UPDATE tasks SET sort_order = sort_order + 1 WHERE category = 'people'",
                [],
            )
            .unwrap();
            let err = db.move_task(w1.id, TaskCategory::People, 0).unwrap_err();
            assert!(matches!(err, CrmError::Transaction(_)));
            tx.commit().unwrap();
        }

        // Once the lock is free the plan sees the other writer's change
        let after_other: Vec<_> = before
            .iter()
            .map(|&(id, cat, order)| {
                let order = if cat == TaskCategory::People { order + 1 } else { order };
                (id, cat, order)
            })
            .collect();
        assert_eq!(snapshot(&db), after_other);

        let board = db.move_task(w1.id, TaskCategory::People, 0).unwrap();
        assert_eq!(titles(&board.people), vec!["w1", "p0"]);
        assert_eq!(orders(&board.people), vec![0, 1]);
        assert_eq!(titles(&board.work), vec!["w0"]);
    }

    #[test]
    fn test_update_category_appends_to_destination() {
        let db = Database::open_memory().unwrap();
        task(&db, "p0", TaskCategory::People);
        task(&db, "p1", TaskCategory::People);
        let w = task(&db, "w", TaskCategory::Work);

        let updated = db
            .update_task(
                w.id,
                TaskChanges {
                    category: Some(TaskCategory::People),
                    priority: Some(TaskPriority::High),
                    description: Patch::Set("Bring notes".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.category, TaskCategory::People);
        assert_eq!(updated.sort_order, 2);
        assert_eq!(updated.priority, TaskPriority::High);
        assert_eq!(updated.description.as_deref(), Some("Bring notes"));
        assert_eq!(updated.title, "w");

        // Same category keeps its position
        let same = db
            .update_task(
                w.id,
                TaskChanges {
                    category: Some(TaskCategory::People),
                    title: Some("renamed".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(same.sort_order, 2);
        assert_eq!(same.title, "renamed");
    }

    #[test]
    fn test_update_clears_fields_and_missing_task() {
        let db = Database::open_memory().unwrap();
        let mut new = NewTask::new("Dated", TaskCategory::Work);
        new.due_date = Some(Utc::now());
        new.description = Some("x".to_string());
        let t = db.create_task(&new).unwrap();

        let updated = db
            .update_task(
                t.id,
                TaskChanges {
                    due_date: Patch::Clear,
                    description: Patch::Clear,
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.due_date, None);
        assert_eq!(updated.description, None);

        let err = db
            .update_task(Uuid::new_v4(), TaskChanges::default())
            .unwrap_err();
        assert!(matches!(err, CrmError::NotFound { .. }));
    }

    #[test]
    fn test_toggle() {
        let db = Database::open_memory().unwrap();
        let t = task(&db, "t", TaskCategory::Work);

        let done = db.toggle_task(t.id).unwrap();
        assert_eq!(done.status, TaskStatus::Completed);
        let back = db.toggle_task(t.id).unwrap();
        assert_eq!(back.status, TaskStatus::Pending);

        db.update_task(
            t.id,
            TaskChanges {
                status: Some(TaskStatus::InProgress),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(db.toggle_task(t.id).unwrap().status, TaskStatus::Completed);
    }

    #[test]
    fn test_filters_combine() {
        let db = Database::open_memory().unwrap();
        let a = db.insert_contact(&NewContact::new("Jordan", "Lee")).unwrap();

        let mut high_work = NewTask::new("high work", TaskCategory::Work);
        high_work.priority = TaskPriority::High;
        high_work.contact_id = Some(a.id);
        db.create_task(&high_work).unwrap();

        let mut high_personal = NewTask::new("high personal", TaskCategory::Personal);
        high_personal.priority = TaskPriority::High;
        db.create_task(&high_personal).unwrap();

        task(&db, "low work", TaskCategory::Work);

        let high = db
            .list_tasks(&TaskFilter {
                priority: Some(TaskPriority::High),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(high.len(), 2);
        assert_eq!(high[0].item.title, "high work");

        let high_and_work = db
            .list_tasks(&TaskFilter {
                priority: Some(TaskPriority::High),
                category: Some(TaskCategory::Work),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(high_and_work.len(), 1);

        let for_contact = db
            .list_tasks(&TaskFilter {
                contact_id: Some(a.id),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(for_contact.len(), 1);
        assert_eq!(for_contact[0].contact_last_name.as_deref(), Some("Lee"));

        let with_contact = db.get_task_with_contact(for_contact[0].item.id).unwrap().unwrap();
        assert_eq!(with_contact.contact_first_name.as_deref(), Some("Jordan"));
    }

    #[test]
    fn test_list_ties_break_by_priority() {
        let db = Database::open_memory().unwrap();
        let low = task(&db, "low", TaskCategory::Work);
        let mut high = NewTask::new("high", TaskCategory::Work);
        high.priority = TaskPriority::High;
        let high = db.create_task(&high).unwrap();

        // Force a shared position through raw SQL; reads must stay stable
        db.conn()
            .execute("UPDATE tasks SET sort_order = 0", [])
            .unwrap();

        let listed = db.list_tasks(&TaskFilter::default()).unwrap();
        let ids: Vec<Uuid> = listed.iter().map(|t| t.item.id).collect();
        assert_eq!(ids, vec![high.id, low.id]);

        let board = db.task_board().unwrap();
        assert_eq!(titles(&board.work), vec!["high", "low"]);
    }

    #[test]
    fn test_delete_task_clears_reminder_link() {
        let db = Database::open_memory().unwrap();
        let t = task(&db, "Prepare deck", TaskCategory::Work);

        let mut new_reminder = NewReminder::new("Deck due", Utc::now());
        new_reminder.task_id = Some(t.id);
        let r = db.insert_reminder(&new_reminder).unwrap();

        db.delete_task(t.id).unwrap();

        assert!(db.get_task(t.id).unwrap().is_none());
        let kept = db.get_reminder(r.id).unwrap().unwrap();
        assert_eq!(kept.item.task_id, None);
        assert!(matches!(
            db.delete_task(t.id),
            Err(CrmError::NotFound { .. })
        ));
    }
}

//! Task ordering engine.
//!
//! Every category is an independent list whose order is given by each task's
//! `sort_order`. A drag-and-drop move is expressed as the full re-indexed
//! contents (0..n-1) of every list it touches, and storage applies that batch
//! in a single transaction (see [`crate::Database::reorder_tasks`]).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

use crate::error::{CrmError, FieldErrors, Result};
use crate::models::{Task, TaskCategory};

/// New position of one task, as sent by a reorder request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReorderItem {
    pub id: Uuid,
    pub category: TaskCategory,
    pub sort_order: i64,
}

/// Position for a task appended to a category whose largest `sort_order`
/// is `current_max` (`None` for an empty category).
pub fn next_sort_order(current_max: Option<i64>) -> i64 {
    current_max.map_or(0, |max| max + 1)
}

/// Reject batches that cannot describe a consistent ordering: the same task
/// twice, negative positions, or two tasks claiming one slot of a category.
pub fn validate_batch(items: &[ReorderItem]) -> Result<()> {
    let mut errors = FieldErrors::new();
    let mut ids = HashSet::new();
    let mut slots = HashSet::new();

    for (i, item) in items.iter().enumerate() {
        if item.sort_order < 0 {
            errors.push(
                format!("items[{}].sort_order", i),
                "sort_order must not be negative",
            );
        }
        if !ids.insert(item.id) {
            errors.push(
                format!("items[{}].id", i),
                format!("task {} appears more than once", item.id),
            );
        }
        if !slots.insert((item.category, item.sort_order)) {
            errors.push(
                format!("items[{}].sort_order", i),
                format!(
                    "position {} in {} is claimed twice",
                    item.sort_order, item.category
                ),
            );
        }
    }

    errors.finish(())
}

/// Read-path key within a category: position, then priority (high first),
/// then due date (undated first). Only position matters unless two tasks
/// share a `sort_order`.
pub fn display_key(task: &Task) -> (i64, u8, Option<DateTime<Utc>>) {
    (task.sort_order, task.priority.rank(), task.due_date)
}

/// All tasks split into the three category columns in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaskBoard {
    pub work: Vec<Task>,
    pub people: Vec<Task>,
    pub personal: Vec<Task>,
}

impl TaskBoard {
    pub fn from_tasks(tasks: impl IntoIterator<Item = Task>) -> Self {
        let mut board = Self::default();
        for task in tasks {
            board.column_mut(task.category).push(task);
        }
        for category in TaskCategory::ALL {
            board.column_mut(category).sort_by_key(display_key);
        }
        board
    }

    pub fn column(&self, category: TaskCategory) -> &[Task] {
        match category {
            TaskCategory::Work => &self.work,
            TaskCategory::People => &self.people,
            TaskCategory::Personal => &self.personal,
        }
    }

    fn column_mut(&mut self, category: TaskCategory) -> &mut Vec<Task> {
        match category {
            TaskCategory::Work => &mut self.work,
            TaskCategory::People => &mut self.people,
            TaskCategory::Personal => &mut self.personal,
        }
    }

    pub fn find(&self, id: Uuid) -> Option<&Task> {
        TaskCategory::ALL
            .iter()
            .flat_map(|c| self.column(*c))
            .find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.work.len() + self.people.len() + self.personal.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Compute the reorder batch for dropping task `id` into `dest` at
    /// `index`. The index is clamped to the destination length. Both the
    /// source and destination lists come back fully re-indexed; a move
    /// within one category yields just that list.
    pub fn plan_move(&self, id: Uuid, dest: TaskCategory, index: usize) -> Result<Vec<ReorderItem>> {
        let source = self
            .find(id)
            .ok_or_else(|| CrmError::not_found("task", id))?
            .category;

        let mut source_ids: Vec<Uuid> = self
            .column(source)
            .iter()
            .map(|t| t.id)
            .filter(|t| *t != id)
            .collect();

        if source == dest {
            let at = index.min(source_ids.len());
            source_ids.insert(at, id);
            return Ok(reindex(dest, &source_ids));
        }

        let mut dest_ids: Vec<Uuid> = self.column(dest).iter().map(|t| t.id).collect();
        let at = index.min(dest_ids.len());
        dest_ids.insert(at, id);

        let mut items = reindex(source, &source_ids);
        items.extend(reindex(dest, &dest_ids));
        Ok(items)
    }
}

fn reindex(category: TaskCategory, ids: &[Uuid]) -> Vec<ReorderItem> {
    ids.iter()
        .enumerate()
        .map(|(i, id)| ReorderItem {
            id: *id,
            category,
            sort_order: i as i64,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TaskPriority, TaskStatus};

    fn task(title: &str, category: TaskCategory, sort_order: i64) -> Task {
        let now = Utc::now();
        Task {
            id: Uuid::new_v4(),
            contact_id: None,
            title: title.to_string(),
            description: None,
            status: TaskStatus::Pending,
            priority: TaskPriority::Medium,
            category,
            sort_order,
            due_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn titles(board: &TaskBoard, items: &[ReorderItem], category: TaskCategory) -> Vec<String> {
        let mut placed: Vec<&ReorderItem> =
            items.iter().filter(|i| i.category == category).collect();
        placed.sort_by_key(|i| i.sort_order);
        placed
            .iter()
            .map(|i| board.find(i.id).unwrap().title.clone())
            .collect()
    }

    #[test]
    fn test_next_sort_order() {
        assert_eq!(next_sort_order(None), 0);
        assert_eq!(next_sort_order(Some(0)), 1);
        assert_eq!(next_sort_order(Some(6)), 7);
    }

    #[test]
    fn test_board_orders_columns() {
        let mut high = task("high", TaskCategory::Work, 1);
        high.priority = TaskPriority::High;
        let low = task("low", TaskCategory::Work, 1);
        let first = task("first", TaskCategory::Work, 0);
        let other = task("other", TaskCategory::People, 0);

        let board = TaskBoard::from_tasks(vec![low, other, high, first]);
        let work: Vec<&str> = board.work.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(work, vec!["first", "high", "low"]);
        assert_eq!(board.people.len(), 1);
        assert!(board.personal.is_empty());
        assert_eq!(board.len(), 4);
    }

    #[test]
    fn test_move_within_category() {
        let board = TaskBoard::from_tasks(vec![
            task("a", TaskCategory::Work, 0),
            task("b", TaskCategory::Work, 1),
            task("c", TaskCategory::Work, 2),
        ]);
        let c = board.work[2].id;

        let items = board.plan_move(c, TaskCategory::Work, 0).unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(titles(&board, &items, TaskCategory::Work), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_move_across_categories_reindexes_both() {
        let board = TaskBoard::from_tasks(vec![
            task("a", TaskCategory::Work, 0),
            task("b", TaskCategory::Work, 3),
            task("c", TaskCategory::Work, 7),
            task("x", TaskCategory::Personal, 0),
            task("y", TaskCategory::Personal, 1),
        ]);
        let b = board.work[1].id;

        let items = board.plan_move(b, TaskCategory::Personal, 1).unwrap();
        assert_eq!(items.len(), 5);
        assert_eq!(titles(&board, &items, TaskCategory::Work), vec!["a", "c"]);
        assert_eq!(
            titles(&board, &items, TaskCategory::Personal),
            vec!["x", "b", "y"]
        );

        let work_orders: Vec<i64> = items
            .iter()
            .filter(|i| i.category == TaskCategory::Work)
            .map(|i| i.sort_order)
            .collect();
        assert_eq!(work_orders, vec![0, 1]);
        validate_batch(&items).unwrap();
    }

    #[test]
    fn test_move_index_is_clamped() {
        let board = TaskBoard::from_tasks(vec![
            task("a", TaskCategory::Work, 0),
            task("p", TaskCategory::People, 0),
        ]);
        let a = board.work[0].id;
        let items = board.plan_move(a, TaskCategory::People, 99).unwrap();
        assert_eq!(titles(&board, &items, TaskCategory::People), vec!["p", "a"]);
        assert!(items
            .iter()
            .all(|i| i.category == TaskCategory::People));
    }

    #[test]
    fn test_move_unknown_task() {
        let board = TaskBoard::default();
        let err = board
            .plan_move(Uuid::new_v4(), TaskCategory::Work, 0)
            .unwrap_err();
        assert!(matches!(err, CrmError::NotFound { .. }));
    }

    #[test]
    fn test_validate_batch() {
        let id = Uuid::new_v4();
        let ok = vec![
            ReorderItem { id, category: TaskCategory::Work, sort_order: 0 },
            ReorderItem { id: Uuid::new_v4(), category: TaskCategory::People, sort_order: 0 },
        ];
        assert!(validate_batch(&ok).is_ok());
        assert!(validate_batch(&[]).is_ok());

        let duplicate_id = vec![
            ReorderItem { id, category: TaskCategory::Work, sort_order: 0 },
            ReorderItem { id, category: TaskCategory::Work, sort_order: 1 },
        ];
        assert!(validate_batch(&duplicate_id).is_err());

        let shared_slot = vec![
            ReorderItem { id, category: TaskCategory::Work, sort_order: 0 },
            ReorderItem { id: Uuid::new_v4(), category: TaskCategory::Work, sort_order: 0 },
        ];
        assert!(validate_batch(&shared_slot).is_err());

        let negative = vec![ReorderItem { id, category: TaskCategory::Work, sort_order: -1 }];
        match validate_batch(&negative) {
            Err(CrmError::Validation(errs)) => assert_eq!(errs[0].field, "items[0].sort_order"),
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}

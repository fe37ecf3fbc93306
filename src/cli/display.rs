use chrono::{DateTime, Datelike, Local, Utc};

use crate::models::{DashboardStats, Task, TaskCategory};
use crate::ordering::TaskBoard;

const TITLE_WIDTH: usize = 40;
const DATE_WIDTH: usize = 16;

/// Print the dashboard counters
pub fn print_stats(stats: &DashboardStats) {
    println!("Contacts             {}", stats.total_contacts);
    println!("Open tasks           {}", stats.pending_tasks);
    println!("Completed tasks      {}", stats.completed_tasks);
    println!("Upcoming reminders   {}", stats.upcoming_reminders);
    println!("Overdue reminders    {}", stats.overdue_reminders);
}

/// Print the board, one section per category in display order.
pub fn print_board(board: &TaskBoard, only: Option<TaskCategory>) {
    let now = Utc::now();
    let mut first = true;

    for category in TaskCategory::ALL {
        if only.map_or(false, |c| c != category) {
            continue;
        }
        if !first {
            println!();
        }
        first = false;

        let tasks = board.column(category);
        println!("--- {} ({}) ---", category.label(), tasks.len());
        if tasks.is_empty() {
            println!("  (empty)");
        }
        for task in tasks {
            println!("{}", task_row(task, now));
        }
    }
}

/// One task line: position, checkbox, title, due date, priority
fn task_row(task: &Task, now: DateTime<Utc>) -> String {
    let checkbox = if task.is_completed() { "[x]" } else { "[ ]" };
    let due = task
        .due_date
        .map(|d| format_due(d, now, task.is_completed()))
        .unwrap_or_default();

    format!(
        "{:>3} {}  {:<title$}  {:<date$}  {}",
        task.sort_order,
        checkbox,
        truncate(&task.title, TITLE_WIDTH),
        truncate(&due, DATE_WIDTH),
        task.priority,
        title = TITLE_WIDTH,
        date = DATE_WIDTH
    )
}

/// Format a due date relative to `now`
fn format_due(due: DateTime<Utc>, now: DateTime<Utc>, completed: bool) -> String {
    let due_date = due.with_timezone(&Local).date_naive();
    let today = now.with_timezone(&Local).date_naive();

    if due_date == today {
        "today".to_string()
    } else if Some(due_date) == today.succ_opt() {
        "tomorrow".to_string()
    } else if due_date < today && !completed {
        format!("{} (overdue)", short_date(due_date, today))
    } else {
        short_date(due_date, today)
    }
}

fn short_date(date: chrono::NaiveDate, today: chrono::NaiveDate) -> String {
    if date.year() == today.year() {
        format!("{} {}", month_abbrev(date.month()), date.day())
    } else {
        format!("{} {}, {}", month_abbrev(date.month()), date.day(), date.year())
    }
}

fn month_abbrev(month: u32) -> &'static str {
    match month {
        1 => "Jan", 2 => "Feb", 3 => "Mar", 4 => "Apr",
        5 => "May", 6 => "Jun", 7 => "Jul", 8 => "Aug",
        9 => "Sep", 10 => "Oct", 11 => "Nov", 12 => "Dec",
        _ => "???",
    }
}

/// Truncate to `max` characters, ending with an ellipsis when cut
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let text: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", text.trim_end())
    }
}

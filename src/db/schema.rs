pub const SCHEMA_VERSION: i32 = 1;

/// Initial schema. Timestamps are fixed-width RFC 3339 UTC strings, so
/// ordering and range comparisons on them can be done as text.
pub const SCHEMA_V1: &str = r#"
-- Schema version tracking
CREATE TABLE IF NOT EXISTS schema_version (
    id INTEGER PRIMARY KEY,
    version INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS contacts (
    id TEXT PRIMARY KEY,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    email TEXT,
    phone TEXT,
    company TEXT,
    title TEXT,
    notes TEXT,
    avatar_color TEXT NOT NULL DEFAULT '#0071e3',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS tasks (
    id TEXT PRIMARY KEY,
    contact_id TEXT,
    title TEXT NOT NULL,
    description TEXT,
    status TEXT NOT NULL DEFAULT 'pending'
        CHECK(status IN ('pending', 'in_progress', 'completed')),
    priority TEXT NOT NULL DEFAULT 'medium'
        CHECK(priority IN ('low', 'medium', 'high')),
    category TEXT NOT NULL DEFAULT 'personal'
        CHECK(category IN ('work', 'people', 'personal')),
    sort_order INTEGER NOT NULL DEFAULT 0 CHECK(sort_order >= 0),
    due_date TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    FOREIGN KEY (contact_id) REFERENCES contacts(id) ON DELETE SET NULL
);

CREATE TABLE IF NOT EXISTS reminders (
    id TEXT PRIMARY KEY,
    contact_id TEXT,
    task_id TEXT,
    title TEXT NOT NULL,
    description TEXT,
    reminder_date TEXT NOT NULL,
    is_completed INTEGER NOT NULL DEFAULT 0 CHECK(is_completed IN (0, 1)),
    created_at TEXT NOT NULL,
    FOREIGN KEY (contact_id) REFERENCES contacts(id) ON DELETE CASCADE,
    FOREIGN KEY (task_id) REFERENCES tasks(id) ON DELETE SET NULL
);

-- Indexes
CREATE INDEX IF NOT EXISTS idx_contact_updated ON contacts(updated_at);
CREATE INDEX IF NOT EXISTS idx_task_contact ON tasks(contact_id);
CREATE INDEX IF NOT EXISTS idx_task_status ON tasks(status);
CREATE INDEX IF NOT EXISTS idx_task_due_date ON tasks(due_date);
CREATE INDEX IF NOT EXISTS idx_task_category_order ON tasks(category, sort_order);
CREATE INDEX IF NOT EXISTS idx_reminder_contact ON reminders(contact_id);
CREATE INDEX IF NOT EXISTS idx_reminder_task ON reminders(task_id);
CREATE INDEX IF NOT EXISTS idx_reminder_date ON reminders(reminder_date);
"#;

//! Demo data set for trying out the board and dashboard.

use chrono::{DateTime, Duration, Utc};
use rusqlite::params;
use uuid::Uuid;

use super::Database;
use crate::error::Result;
use crate::models::{to_db_timestamp, TaskCategory, TaskPriority, TaskStatus};

/// Row counts written by [`Database::seed_demo_data`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub contacts: usize,
    pub tasks: usize,
    pub reminders: usize,
}

struct DemoContact {
    first_name: &'static str,
    last_name: &'static str,
    email: &'static str,
    phone: &'static str,
    company: &'static str,
    title: &'static str,
    notes: &'static str,
    avatar_color: &'static str,
    created_days: i64,
    updated_days: i64,
}

struct DemoTask {
    contact: Option<usize>,
    title: &'static str,
    description: &'static str,
    status: TaskStatus,
    priority: TaskPriority,
    category: TaskCategory,
    due_days: i64,
    created_days: i64,
}

struct DemoReminder {
    contact: Option<usize>,
    task: Option<usize>,
    title: &'static str,
    description: &'static str,
    date_days: i64,
}

const CONTACTS: &[DemoContact] = &[
    DemoContact {
        first_name: "Sarah",
        last_name: "Chen",
        email: "sarah.chen@techcorp.io",
        phone: "(415) 555-0142",
        company: "TechCorp",
        title: "VP of Engineering",
        notes: "Met at React Conf. Interested in our API platform; prefers data-driven discussions.",
        avatar_color: "#0071e3",
        created_days: -30,
        updated_days: -1,
    },
    DemoContact {
        first_name: "Marcus",
        last_name: "Johnson",
        email: "marcus@designco.com",
        phone: "(212) 555-0198",
        company: "DesignCo",
        title: "Head of Product Design",
        notes: "Referred by Sarah Chen. Leading a design system overhaul.",
        avatar_color: "#bf5af2",
        created_days: -25,
        updated_days: -2,
    },
    DemoContact {
        first_name: "Emily",
        last_name: "Rodriguez",
        email: "emily@startupxyz.com",
        phone: "(650) 555-0167",
        company: "StartupXYZ",
        title: "Founder & CEO",
        notes: "Series A stage. Looking for technical partners.",
        avatar_color: "#ff375f",
        created_days: -20,
        updated_days: -1,
    },
    DemoContact {
        first_name: "David",
        last_name: "Kim",
        email: "david.kim@bigtech.com",
        phone: "(408) 555-0133",
        company: "BigTech Inc",
        title: "Engineering Manager",
        notes: "Manages a team of 40. Weekly 1:1 scheduled.",
        avatar_color: "#30d158",
        created_days: -18,
        updated_days: -3,
    },
    DemoContact {
        first_name: "Olivia",
        last_name: "Thompson",
        email: "olivia.t@mediagroup.com",
        phone: "(310) 555-0155",
        company: "MediaGroup",
        title: "Marketing Director",
        notes: "Owns digital marketing strategy. Interested in analytics integration.",
        avatar_color: "#ff9f0a",
        created_days: -15,
        updated_days: -2,
    },
    DemoContact {
        first_name: "James",
        last_name: "Wilson",
        email: "jwilson@innovatetech.io",
        phone: "(617) 555-0171",
        company: "InnovateTech",
        title: "CTO",
        notes: "Former colleague. Building ML infrastructure; open to an advisory role.",
        avatar_color: "#5e5ce6",
        created_days: -12,
        updated_days: -4,
    },
    DemoContact {
        first_name: "Priya",
        last_name: "Patel",
        email: "priya.patel@dataflow.ai",
        phone: "(206) 555-0188",
        company: "DataFlow AI",
        title: "Lead Data Scientist",
        notes: "Works on recommendation engines.",
        avatar_color: "#64d2ff",
        created_days: -10,
        updated_days: -1,
    },
    DemoContact {
        first_name: "Alex",
        last_name: "Morgan",
        email: "alex.morgan@growthco.com",
        phone: "(312) 555-0144",
        company: "GrowthCo",
        title: "Sales Director",
        notes: "Manages enterprise accounts. Wants simpler CRM workflows.",
        avatar_color: "#ff375f",
        created_days: -8,
        updated_days: -5,
    },
];

const TASKS: &[DemoTask] = &[
    DemoTask {
        contact: Some(0),
        title: "Follow up on API partnership proposal",
        description: "Send revised proposal with updated pricing tiers and SLA details",
        status: TaskStatus::InProgress,
        priority: TaskPriority::High,
        category: TaskCategory::Work,
        due_days: 2,
        created_days: -5,
    },
    DemoTask {
        contact: Some(2),
        title: "Prepare investor intro deck",
        description: "Tailored introduction deck for the Series A investors",
        status: TaskStatus::Pending,
        priority: TaskPriority::High,
        category: TaskCategory::Work,
        due_days: 1,
        created_days: -7,
    },
    DemoTask {
        contact: Some(3),
        title: "Technical architecture review",
        description: "Review the microservices migration plan and send feedback",
        status: TaskStatus::InProgress,
        priority: TaskPriority::Medium,
        category: TaskCategory::Work,
        due_days: 5,
        created_days: -4,
    },
    DemoTask {
        contact: Some(6),
        title: "ML model integration spec",
        description: "Technical spec for the recommendation engine integration",
        status: TaskStatus::InProgress,
        priority: TaskPriority::High,
        category: TaskCategory::Work,
        due_days: 6,
        created_days: -3,
    },
    DemoTask {
        contact: Some(2),
        title: "Due diligence document prep",
        description: "Gather technical documentation for due diligence",
        status: TaskStatus::Pending,
        priority: TaskPriority::High,
        category: TaskCategory::Work,
        due_days: 3,
        created_days: -1,
    },
    DemoTask {
        contact: Some(4),
        title: "Q1 marketing campaign review",
        description: "Analyze campaign performance data and prepare recommendations",
        status: TaskStatus::Completed,
        priority: TaskPriority::Medium,
        category: TaskCategory::Work,
        due_days: -2,
        created_days: -10,
    },
    DemoTask {
        contact: Some(1),
        title: "Review design system mockups",
        description: "Check the new component library designs for consistency",
        status: TaskStatus::Pending,
        priority: TaskPriority::Medium,
        category: TaskCategory::People,
        due_days: 4,
        created_days: -3,
    },
    DemoTask {
        contact: Some(5),
        title: "Draft advisory agreement",
        description: "Prepare advisory terms for the board position",
        status: TaskStatus::Pending,
        priority: TaskPriority::High,
        category: TaskCategory::People,
        due_days: 3,
        created_days: -6,
    },
    DemoTask {
        contact: Some(0),
        title: "Schedule product demo",
        description: "Set up a live demo of new features for the TechCorp team",
        status: TaskStatus::Pending,
        priority: TaskPriority::Medium,
        category: TaskCategory::People,
        due_days: 8,
        created_days: -1,
    },
    DemoTask {
        contact: Some(7),
        title: "Quarterly business review prep",
        description: "Compile metrics and growth projections for the review",
        status: TaskStatus::Pending,
        priority: TaskPriority::Low,
        category: TaskCategory::People,
        due_days: 10,
        created_days: -2,
    },
    DemoTask {
        contact: None,
        title: "Update personal website",
        description: "Refresh portfolio with recent projects",
        status: TaskStatus::Pending,
        priority: TaskPriority::Low,
        category: TaskCategory::Personal,
        due_days: 14,
        created_days: -1,
    },
    DemoTask {
        contact: None,
        title: "Industry report research",
        description: "Competitive analysis of SaaS market trends",
        status: TaskStatus::Pending,
        priority: TaskPriority::Medium,
        category: TaskCategory::Personal,
        due_days: 7,
        created_days: -2,
    },
];

const REMINDERS: &[DemoReminder] = &[
    DemoReminder {
        contact: Some(0),
        task: Some(0),
        title: "Coffee meeting with Sarah",
        description: "Partnership next steps",
        date_days: 2,
    },
    DemoReminder {
        contact: Some(1),
        task: Some(1),
        title: "Design review call",
        description: "Walk through the latest design system components",
        date_days: 4,
    },
    DemoReminder {
        contact: Some(2),
        task: Some(2),
        title: "Pitch deck deadline",
        description: "Final version of the intro deck is due",
        date_days: 1,
    },
    DemoReminder {
        contact: Some(3),
        task: Some(3),
        title: "Sprint planning with David",
        description: "Monthly architecture sync",
        date_days: 7,
    },
    DemoReminder {
        contact: Some(4),
        task: None,
        title: "Campaign launch check-in",
        description: "Review creative assets before launch",
        date_days: 5,
    },
    DemoReminder {
        contact: Some(5),
        task: Some(5),
        title: "Board meeting prep",
        description: "Materials for the quarterly board meeting",
        date_days: 14,
    },
    DemoReminder {
        contact: Some(6),
        task: Some(6),
        title: "ML model demo",
        description: "Latest recommendation engine results",
        date_days: 4,
    },
    DemoReminder {
        contact: Some(7),
        task: Some(7),
        title: "Sales pipeline review",
        description: "Monthly pipeline review call",
        date_days: 9,
    },
    DemoReminder {
        contact: Some(0),
        task: None,
        title: "Send birthday card to Sarah",
        description: "Handwritten note",
        date_days: 12,
    },
    DemoReminder {
        contact: Some(2),
        task: None,
        title: "Follow up on funding round",
        description: "Check in on Series A progress",
        date_days: 6,
    },
    DemoReminder {
        contact: None,
        task: None,
        title: "Renew professional memberships",
        description: "ACM and IEEE memberships expire soon",
        date_days: 20,
    },
    DemoReminder {
        contact: Some(4),
        task: None,
        title: "Marketing analytics report",
        description: "Monthly analytics deep-dive",
        date_days: -1,
    },
    DemoReminder {
        contact: Some(1),
        task: None,
        title: "Share design resources",
        description: "Send the UI pattern library links",
        date_days: 0,
    },
];

impl Database {
    /// Replace all data with the demo set, in one transaction. Dates are
    /// placed relative to `now` so the dashboard always has upcoming and
    /// overdue items.
    pub fn seed_demo_data(&self, now: DateTime<Utc>) -> Result<SeedSummary> {
        let day = |offset: i64| to_db_timestamp(&(now + Duration::days(offset)));

        let tx = self.write_transaction()?;
        tx.execute_batch(
            "DELETE FROM reminders;
             DELETE FROM tasks;
             DELETE FROM contacts;",
        )?;

        let mut contact_ids = Vec::with_capacity(CONTACTS.len());
        for c in CONTACTS {
            let id = Uuid::new_v4().to_string();
            tx.execute(
                r#"INSERT INTO contacts (
                    id, first_name, last_name, email, phone, company, title, notes,
                    avatar_color, created_at, updated_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
                params![
                    id,
                    c.first_name,
                    c.last_name,
                    c.email,
                    c.phone,
                    c.company,
                    c.title,
                    c.notes,
                    c.avatar_color,
                    day(c.created_days),
                    day(c.updated_days),
                ],
            )?;
            contact_ids.push(id);
        }

        let mut task_ids = Vec::with_capacity(TASKS.len());
        let mut next_position = [0i64; 3];
        for t in TASKS {
            let id = Uuid::new_v4().to_string();
            let slot = &mut next_position[t.category as usize];
            let sort_order = *slot;
            *slot += 1;

            tx.execute(
                r#"INSERT INTO tasks (
                    id, contact_id, title, description, status, priority, category,
                    sort_order, due_date, created_at, updated_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
                params![
                    id,
                    t.contact.map(|i| contact_ids[i].as_str()),
                    t.title,
                    t.description,
                    t.status.as_str(),
                    t.priority.as_str(),
                    t.category.as_str(),
                    sort_order,
                    day(t.due_days),
                    day(t.created_days),
                    day(t.created_days),
                ],
            )?;
            task_ids.push(id);
        }

        for r in REMINDERS {
            tx.execute(
                r#"INSERT INTO reminders (
                    id, contact_id, task_id, title, description, reminder_date,
                    is_completed, created_at
                ) VALUES (?, ?, ?, ?, ?, ?, 0, ?)"#,
                params![
                    Uuid::new_v4().to_string(),
                    r.contact.map(|i| contact_ids[i].as_str()),
                    r.task.map(|i| task_ids[i].as_str()),
                    r.title,
                    r.description,
                    day(r.date_days),
                    day(0),
                ],
            )?;
        }

        tx.commit()?;

        let summary = SeedSummary {
            contacts: CONTACTS.len(),
            tasks: TASKS.len(),
            reminders: REMINDERS.len(),
        };
        log::info!(
            "seeded {} contacts, {} tasks, {} reminders",
            summary.contacts,
            summary.tasks,
            summary.reminders
        );
        Ok(summary)
    }
}

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{non_blank, optional_text, required_text, Patch};
use crate::error::{FieldErrors, Result};

/// Avatar background colors handed out at contact creation.
pub const AVATAR_PALETTE: [&str; 7] = [
    "#0071e3", "#bf5af2", "#ff375f", "#ff9f0a", "#30d158", "#64d2ff", "#5e5ce6",
];

/// Pick an avatar color from [`AVATAR_PALETTE`] using the given random source.
pub fn pick_avatar_color<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    AVATAR_PALETTE.choose(rng).copied().unwrap_or(AVATAR_PALETTE[0])
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub title: Option<String>,
    pub notes: Option<String>,
    pub avatar_color: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Contact {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Two-letter avatar initials
    pub fn initials(&self) -> String {
        self.first_name
            .chars()
            .take(1)
            .chain(self.last_name.chars().take(1))
            .flat_map(char::to_uppercase)
            .collect()
    }
}

/// A task or reminder row joined with its linked contact's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WithContact<T> {
    #[serde(flatten)]
    pub item: T,
    pub contact_first_name: Option<String>,
    pub contact_last_name: Option<String>,
}

/// Sortable contact columns for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContactSort {
    FirstName,
    LastName,
    Company,
    CreatedAt,
    #[default]
    UpdatedAt,
}

impl ContactSort {
    pub fn column(&self) -> &'static str {
        match self {
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::Company => "company",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
        }
    }

    /// Unknown keys fall back to `updated_at`.
    pub fn parse(s: &str) -> Self {
        match s {
            "first_name" => Self::FirstName,
            "last_name" => Self::LastName,
            "company" => Self::Company,
            "created_at" => Self::CreatedAt,
            _ => Self::UpdatedAt,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }

    /// Anything other than "asc" (any case) is descending.
    pub fn parse(s: &str) -> Self {
        if s.eq_ignore_ascii_case("asc") {
            Self::Asc
        } else {
            Self::Desc
        }
    }
}

/// Contact list query: optional free-text search plus ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactQuery {
    pub search: Option<String>,
    pub sort: ContactSort,
    pub direction: SortDirection,
}

/// Validated contact ready to insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContact {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub title: Option<String>,
    pub notes: Option<String>,
    pub avatar_color: String,
}

impl NewContact {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: None,
            phone: None,
            company: None,
            title: None,
            notes: None,
            avatar_color: AVATAR_PALETTE[0].to_string(),
        }
    }
}

/// POST body for a contact.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub title: Option<String>,
    pub notes: Option<String>,
}

impl ContactInput {
    /// Validate and assign an avatar color drawn from `rng`.
    pub fn validate<R: Rng + ?Sized>(self, rng: &mut R) -> Result<NewContact> {
        let mut errors = FieldErrors::new();

        let first_name = errors.check(required_text(
            "first_name",
            "First name is required",
            self.first_name,
        ));
        let last_name = errors.check(required_text(
            "last_name",
            "Last name is required",
            self.last_name,
        ));
        let email = optional_text(self.email);
        if let Some(ref e) = email {
            if !is_valid_email(e) {
                errors.push("email", "Invalid email");
            }
        }

        errors.finish(NewContact {
            first_name: first_name.unwrap_or_default(),
            last_name: last_name.unwrap_or_default(),
            email,
            phone: optional_text(self.phone),
            company: optional_text(self.company),
            title: optional_text(self.title),
            notes: optional_text(self.notes),
            avatar_color: pick_avatar_color(rng).to_string(),
        })
    }
}

/// PUT body for a contact.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactUpdate {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Patch<String>,
    #[serde(default)]
    pub phone: Patch<String>,
    #[serde(default)]
    pub company: Patch<String>,
    #[serde(default)]
    pub title: Patch<String>,
    #[serde(default)]
    pub notes: Patch<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Patch<String>,
    pub phone: Patch<String>,
    pub company: Patch<String>,
    pub title: Patch<String>,
    pub notes: Patch<String>,
}

impl ContactUpdate {
    pub fn validate(self) -> Result<ContactChanges> {
        let mut errors = FieldErrors::new();

        let first_name = non_blank(&mut errors, "first_name", "First name cannot be empty", self.first_name);
        let last_name = non_blank(&mut errors, "last_name", "Last name cannot be empty", self.last_name);
        let email = self.email.normalize_text();
        if let Patch::Set(ref e) = email {
            if !is_valid_email(e) {
                errors.push("email", "Invalid email");
            }
        }

        errors.finish(ContactChanges {
            first_name,
            last_name,
            email,
            phone: self.phone.normalize_text(),
            company: self.company.normalize_text(),
            title: self.title.normalize_text(),
            notes: self.notes.normalize_text(),
        })
    }
}

/// Basic email validation
pub fn is_valid_email(email: &str) -> bool {
    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 {
        return false;
    }
    let (local, domain) = (parts[0], parts[1]);
    !local.is_empty() && !domain.is_empty() && domain.contains('.') && !email.contains(char::is_whitespace)
}

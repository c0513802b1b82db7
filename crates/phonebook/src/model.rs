//! Core record types for phonebook.
//!
//! This module defines the contacts, groups and memberships held in memory
//! and persisted by the storage layer, plus the input shapes used to create
//! and update them.

use std::fmt;

use chrono::{Local, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// Text form used for `created_at` in data files and on screen.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A single address-book entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Unique identifier, assigned as max existing id + 1.
    pub id: u32,

    /// Display name. Sorting uses its last word.
    pub full_name: String,

    /// Phone number, unique across all contacts.
    pub phone_number: String,

    /// Email address, possibly empty.
    pub email: String,

    /// Postal address, possibly empty.
    pub address: String,

    /// Free-form note.
    pub note: String,

    /// Whether the contact is starred.
    pub is_favorite: bool,

    /// When the contact was first added.
    pub created_at: NaiveDateTime,
}

impl Contact {
    /// Build a contact from user input, stamped with the current local time.
    #[must_use]
    pub fn new(id: u32, input: NewContact) -> Self {
        Self {
            id,
            full_name: input.full_name,
            phone_number: input.phone_number,
            email: input.email,
            address: input.address,
            note: input.note,
            is_favorite: false,
            created_at: now(),
        }
    }

    /// Key used for name ordering: the last word of the name, lowercased.
    ///
    /// `"Nguyen Van A"` sorts as `"a"`.
    #[must_use]
    pub fn sort_key(&self) -> String {
        self.full_name
            .trim()
            .split(' ')
            .next_back()
            .unwrap_or_default()
            .to_lowercase()
    }

    /// `created_at` rendered with [`TIMESTAMP_FORMAT`].
    #[must_use]
    pub fn created_at_display(&self) -> String {
        self.created_at.format(TIMESTAMP_FORMAT).to_string()
    }

    /// Check whether the keyword appears in the name, phone or email.
    ///
    /// Name and email match case-insensitively; the phone matches verbatim.
    /// `keyword` must already be lowercased.
    #[must_use]
    pub fn matches(&self, keyword: &str) -> bool {
        self.full_name.to_lowercase().contains(keyword)
            || self.phone_number.contains(keyword)
            || self.email.to_lowercase().contains(keyword)
    }
}

impl fmt::Display for Contact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fav = if self.is_favorite { "[*]" } else { "[ ]" };
        write!(
            f,
            "{:<5} | {:<20} | {:<12} | {fav}",
            self.id, self.full_name, self.phone_number
        )
    }
}

/// Fields supplied when adding a contact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewContact {
    /// Display name.
    pub full_name: String,
    /// Required phone number.
    pub phone_number: String,
    /// Optional email.
    pub email: String,
    /// Optional address.
    pub address: String,
    /// Optional note.
    pub note: String,
}

impl NewContact {
    /// Shorthand for the two fields every contact needs.
    #[must_use]
    pub fn new(full_name: impl Into<String>, phone_number: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            phone_number: phone_number.into(),
            ..Self::default()
        }
    }

    /// Set the email.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    /// Set the address.
    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    /// Set the note.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }
}

/// Changes to apply to an existing contact. Empty strings keep the old value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactUpdate {
    /// New name.
    pub full_name: String,
    /// New phone number.
    pub phone_number: String,
    /// New email.
    pub email: String,
    /// New address.
    pub address: String,
    /// New note.
    pub note: String,
}

/// A named collection of contacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Unique identifier.
    pub id: u32,
    /// Name, unique ignoring case.
    pub name: String,
    /// Optional description.
    pub description: String,
}

impl Group {
    /// Create a group.
    #[must_use]
    pub fn new(id: u32, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
        }
    }

    /// Case-insensitive name comparison.
    #[must_use]
    pub fn has_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<5} | {:<20} | {}", self.id, self.name, self.description)
    }
}

/// A contact's membership in a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Membership {
    /// The member.
    pub contact_id: u32,
    /// The group.
    pub group_id: u32,
}

impl Membership {
    /// Create a membership pair.
    #[must_use]
    pub fn new(contact_id: u32, group_id: u32) -> Self {
        Self {
            contact_id,
            group_id,
        }
    }
}

/// Ordering for contact listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Ascending id, i.e. oldest first.
    #[default]
    Id,
    /// Last name A to Z.
    NameAsc,
    /// Last name Z to A.
    NameDesc,
}

impl SortOrder {
    /// The order the list screen switches to next.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Id => Self::NameAsc,
            Self::NameAsc => Self::NameDesc,
            Self::NameDesc => Self::Id,
        }
    }

    /// Short label shown in the list header.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Id => "ID (Default)",
            Self::NameAsc => "Name (A-Z)",
            Self::NameDesc => "Name (Z-A)",
        }
    }

    /// Sort contacts in place. The sort is stable.
    pub fn apply(self, contacts: &mut [Contact]) {
        match self {
            Self::Id => contacts.sort_by_key(|c| c.id),
            Self::NameAsc => contacts.sort_by_cached_key(Contact::sort_key),
            Self::NameDesc => {
                contacts.sort_by(|a, b| b.sort_key().cmp(&a.sort_key()));
            }
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id => write!(f, "id"),
            Self::NameAsc => write!(f, "name_asc"),
            Self::NameDesc => write!(f, "name_desc"),
        }
    }
}

/// Current local time truncated to whole seconds.
#[must_use]
pub fn now() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

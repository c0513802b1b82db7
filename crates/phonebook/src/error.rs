//! Error types for phonebook.
//!
//! This module defines all error types used throughout the phonebook crate.
//! Display strings are phrased so the menu can show them to the user as-is.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for phonebook operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Validation Errors ===
    /// A contact was submitted without a phone number.
    #[error("Phone number is required.")]
    PhoneRequired,

    /// The phone number belongs to another contact.
    #[error("Phone number {phone} already exists.")]
    DuplicatePhone {
        /// The conflicting phone number.
        phone: String,
    },

    /// The email address does not look like an email address.
    #[error("Invalid email format: {email}")]
    InvalidEmail {
        /// The rejected value.
        email: String,
    },

    /// A group was submitted without a name.
    #[error("Group name is required.")]
    GroupNameRequired,

    /// Another group already uses this name (case-insensitive).
    #[error("Group name '{name}' already exists.")]
    DuplicateGroupName {
        /// The conflicting name.
        name: String,
    },

    /// A field contains a character the line-delimited store cannot hold.
    #[error("Field '{field}' must not contain '|' or line breaks.")]
    ReservedCharacter {
        /// Name of the offending field.
        field: &'static str,
    },

    // === Lookup Errors ===
    /// No contact has the given id.
    #[error("Contact {id} not found.")]
    ContactNotFound {
        /// The requested contact id.
        id: u32,
    },

    /// No group has the given id.
    #[error("Group {id} not found.")]
    GroupNotFound {
        /// The requested group id.
        id: u32,
    },

    /// The contact is already a member of the group.
    #[error("Contact {contact_id} is already in group {group_id}.")]
    AlreadyInGroup {
        /// Contact side of the pair.
        contact_id: u32,
        /// Group side of the pair.
        group_id: u32,
    },

    /// The contact is not a member of the group.
    #[error("Contact {contact_id} is not in group {group_id}.")]
    MembershipNotFound {
        /// Contact side of the pair.
        contact_id: u32,
        /// Group side of the pair.
        group_id: u32,
    },

    /// The largest id is taken, so no new id can be assigned.
    #[error("No {record} id left after {max}.")]
    IdSpaceExhausted {
        /// Kind of record being created.
        record: &'static str,
        /// The highest id in use.
        max: u32,
    },

    // === Storage Errors ===
    /// The import source file does not exist.
    #[error("File not found: {path}")]
    ImportFileNotFound {
        /// Path that was requested.
        path: PathBuf,
    },

    /// Failed to read a data file.
    #[error("failed to read {path}: {source}")]
    FileRead {
        /// Path of the file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a data file.
    #[error("failed to write {path}: {source}")]
    FileWrite {
        /// Path of the file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// Terminal or other I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Serialization Errors ===
    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for phonebook operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a duplicate phone error.
    #[must_use]
    pub fn duplicate_phone(phone: impl Into<String>) -> Self {
        Self::DuplicatePhone {
            phone: phone.into(),
        }
    }

    /// Create an invalid email error.
    #[must_use]
    pub fn invalid_email(email: impl Into<String>) -> Self {
        Self::InvalidEmail {
            email: email.into(),
        }
    }

    /// Create a duplicate group name error.
    #[must_use]
    pub fn duplicate_group_name(name: impl Into<String>) -> Self {
        Self::DuplicateGroupName { name: name.into() }
    }

    /// Check if this error means a record was missing.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ContactNotFound { .. }
                | Self::GroupNotFound { .. }
                | Self::MembershipNotFound { .. }
                | Self::ImportFileNotFound { .. }
        )
    }

    /// Check if this error was caused by invalid user input.
    ///
    /// Validation failures are reported back to the user; everything else
    /// points at the environment (disk, config).
    #[must_use]
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Self::PhoneRequired
                | Self::DuplicatePhone { .. }
                | Self::InvalidEmail { .. }
                | Self::GroupNameRequired
                | Self::DuplicateGroupName { .. }
                | Self::ReservedCharacter { .. }
                | Self::AlreadyInGroup { .. }
        )
    }
}

//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::model::{ContactUpdate, NewContact, SortOrder};

/// Contact commands.
#[derive(Debug, Subcommand)]
pub enum ContactCommand {
    /// List all contacts
    List {
        /// Ordering of the list
        #[arg(short, long, value_enum, default_value = "id")]
        sort: SortArg,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Show one contact with its groups
    Show {
        /// Contact ID
        id: u32,

        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Add a contact
    Add(ContactFields),

    /// Update a contact; omitted fields keep their value
    Update {
        /// Contact ID
        id: u32,

        #[command(flatten)]
        fields: ContactChanges,
    },

    /// Delete a contact and its group assignments
    Delete {
        /// Contact ID
        id: u32,
    },

    /// Toggle the favorite flag
    Favorite {
        /// Contact ID
        id: u32,
    },

    /// Search by name, phone or email
    Search {
        /// Keyword to look for
        keyword: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
}

/// Fields for a new contact.
#[derive(Debug, Args)]
pub struct ContactFields {
    /// Full name
    #[arg(short, long)]
    pub name: String,

    /// Phone number (must be unique)
    #[arg(short, long)]
    pub phone: String,

    /// Email address
    #[arg(short, long, default_value = "")]
    pub email: String,

    /// Postal address
    #[arg(short, long, default_value = "")]
    pub address: String,

    /// Free-form note
    #[arg(long, default_value = "")]
    pub note: String,
}

impl From<ContactFields> for NewContact {
    fn from(fields: ContactFields) -> Self {
        Self {
            full_name: fields.name,
            phone_number: fields.phone,
            email: fields.email,
            address: fields.address,
            note: fields.note,
        }
    }
}

/// Replacement values for an existing contact.
#[derive(Debug, Args)]
pub struct ContactChanges {
    /// New full name
    #[arg(short, long)]
    pub name: Option<String>,

    /// New phone number
    #[arg(short, long)]
    pub phone: Option<String>,

    /// New email address
    #[arg(short, long)]
    pub email: Option<String>,

    /// New postal address
    #[arg(short, long)]
    pub address: Option<String>,

    /// New note
    #[arg(long)]
    pub note: Option<String>,
}

impl From<ContactChanges> for ContactUpdate {
    fn from(changes: ContactChanges) -> Self {
        Self {
            full_name: changes.name.unwrap_or_default(),
            phone_number: changes.phone.unwrap_or_default(),
            email: changes.email.unwrap_or_default(),
            address: changes.address.unwrap_or_default(),
            note: changes.note.unwrap_or_default(),
        }
    }
}

/// Group commands.
#[derive(Debug, Subcommand)]
pub enum GroupCommand {
    /// List all groups
    List {
        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Show one group
    Show {
        /// Group ID
        id: u32,
    },

    /// Create a group
    Create {
        /// Group name (unique, ignoring case)
        name: String,

        /// Group description
        #[arg(long, default_value = "")]
        description: String,
    },

    /// Rename a group or change its description
    Update {
        /// Group ID
        id: u32,

        /// New name
        #[arg(short, long)]
        name: Option<String>,

        /// New description
        #[arg(long)]
        description: Option<String>,
    },

    /// Delete a group and its assignments
    Delete {
        /// Group ID
        id: u32,
    },

    /// List contacts in a group
    Members {
        /// Group ID
        id: u32,

        /// Output format
        #[arg(short, long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
}

/// Membership command arguments.
#[derive(Debug, Args)]
pub struct MembershipArgs {
    /// Contact ID
    pub contact: u32,

    /// Group ID
    pub group: u32,
}

/// File transfer arguments for import and export.
#[derive(Debug, Args)]
pub struct TransferArgs {
    /// Path of the pipe-delimited contacts file
    pub file: PathBuf,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Sort order argument for listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    /// Insertion order
    Id,
    /// Last name, A to Z
    NameAsc,
    /// Last name, Z to A
    NameDesc,
}

impl From<SortArg> for SortOrder {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Id => Self::Id,
            SortArg::NameAsc => Self::NameAsc,
            SortArg::NameDesc => Self::NameDesc,
        }
    }
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// Formatted table
    Table,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_arg_conversion() {
        assert_eq!(SortOrder::from(SortArg::Id), SortOrder::Id);
        assert_eq!(SortOrder::from(SortArg::NameAsc), SortOrder::NameAsc);
        assert_eq!(SortOrder::from(SortArg::NameDesc), SortOrder::NameDesc);
    }

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Plain);
    }

    #[test]
    fn test_contact_fields_into_new_contact() {
        let fields = ContactFields {
            name: "Alex Smith".to_string(),
            phone: "0901".to_string(),
            email: "alex@example.com".to_string(),
            address: String::new(),
            note: "met at work".to_string(),
        };
        let contact = NewContact::from(fields);
        assert_eq!(contact.full_name, "Alex Smith");
        assert_eq!(contact.phone_number, "0901");
        assert_eq!(contact.email, "alex@example.com");
        assert_eq!(contact.note, "met at work");
    }

    #[test]
    fn test_contact_changes_missing_fields_are_blank() {
        let changes = ContactChanges {
            name: None,
            phone: Some("0902".to_string()),
            email: None,
            address: None,
            note: None,
        };
        let update = ContactUpdate::from(changes);
        assert_eq!(update.phone_number, "0902");
        assert!(update.full_name.is_empty());
        assert!(update.email.is_empty());
    }

    #[test]
    fn test_config_command_debug() {
        let cmd = ConfigCommand::Show { json: false };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Show"));
    }

    #[test]
    fn test_output_format_debug() {
        let format = OutputFormat::Json;
        let debug_str = format!("{format:?}");
        assert_eq!(debug_str, "Json");
    }
}

//! Command-line interface for phonebook.
//!
//! This module provides the CLI structure for the `pbook` binary. Without a
//! subcommand the binary opens the interactive menu.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    ConfigCommand, ContactChanges, ContactCommand, ContactFields, GroupCommand, MembershipArgs,
    OutputFormat, SortArg, StatusCommand, TransferArgs,
};

/// pbook - A terminal address book
///
/// Keeps contacts and groups in plain pipe-delimited text files and offers
/// both an interactive menu and one-shot commands.
#[derive(Debug, Parser)]
#[command(name = "pbook")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory holding the data files (overrides configuration)
    #[arg(short, long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute (defaults to the interactive menu)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Open the interactive menu
    Menu,

    /// Manage contacts
    #[command(subcommand)]
    Contact(ContactCommand),

    /// Manage groups
    #[command(subcommand)]
    Group(GroupCommand),

    /// Put a contact into a group
    Assign(MembershipArgs),

    /// Take a contact out of a group
    Unassign(MembershipArgs),

    /// Import contacts from a pipe-delimited file
    Import(TransferArgs),

    /// Export all contacts to a pipe-delimited file
    Export(TransferArgs),

    /// Show data directory and record counts
    Status(StatusCommand),

    /// View configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                2 => crate::logging::Verbosity::Debug,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn cli_with(verbose: u8, quiet: bool) -> Cli {
        Cli {
            config: None,
            data_dir: None,
            verbose,
            quiet,
            command: None,
        }
    }

    #[test]
    fn test_cli_name() {
        let cli = Cli::command();
        assert_eq!(cli.get_name(), "pbook");
    }

    #[test]
    fn test_verbosity_quiet() {
        assert_eq!(cli_with(0, true).verbosity(), crate::logging::Verbosity::Quiet);
    }

    #[test]
    fn test_verbosity_normal() {
        assert_eq!(cli_with(0, false).verbosity(), crate::logging::Verbosity::Normal);
    }

    #[test]
    fn test_verbosity_verbose() {
        assert_eq!(cli_with(1, false).verbosity(), crate::logging::Verbosity::Verbose);
    }

    #[test]
    fn test_verbosity_debug() {
        assert_eq!(cli_with(2, false).verbosity(), crate::logging::Verbosity::Debug);
    }

    #[test]
    fn test_verbosity_trace() {
        assert_eq!(cli_with(3, false).verbosity(), crate::logging::Verbosity::Trace);
    }

    #[test]
    fn test_cli_verify() {
        // Verify the CLI structure is valid
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_no_command() {
        let cli = Cli::try_parse_from(["pbook"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_parse_menu() {
        let cli = Cli::try_parse_from(["pbook", "menu"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Menu)));
    }

    #[test]
    fn test_parse_contact_list_sorted() {
        let cli = Cli::try_parse_from(["pbook", "contact", "list", "--sort", "name-desc"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Contact(ContactCommand::List {
                sort: SortArg::NameDesc,
                format: OutputFormat::Table,
            }))
        ));
    }

    #[test]
    fn test_parse_contact_add() {
        let args = [
            "pbook", "contact", "add", "--name", "Alex Smith", "--phone", "0901", "-e",
            "alex@example.com",
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        let Some(Command::Contact(ContactCommand::Add(fields))) = cli.command else {
            panic!("expected contact add");
        };
        assert_eq!(fields.name, "Alex Smith");
        assert_eq!(fields.phone, "0901");
        assert_eq!(fields.email, "alex@example.com");
        assert!(fields.address.is_empty());
    }

    #[test]
    fn test_parse_contact_add_requires_phone() {
        let result = Cli::try_parse_from(["pbook", "contact", "add", "--name", "Alex"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_contact_update() {
        let cli =
            Cli::try_parse_from(["pbook", "contact", "update", "3", "--note", "moved"]).unwrap();
        let Some(Command::Contact(ContactCommand::Update { id, fields })) = cli.command else {
            panic!("expected contact update");
        };
        assert_eq!(id, 3);
        assert_eq!(fields.note.as_deref(), Some("moved"));
        assert!(fields.name.is_none());
    }

    #[test]
    fn test_parse_group_create() {
        let cli = Cli::try_parse_from([
            "pbook",
            "group",
            "create",
            "Family",
            "--description",
            "relatives",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Group(GroupCommand::Create { ref name, ref description }))
                if name == "Family" && description == "relatives"
        ));
    }

    #[test]
    fn test_parse_assign() {
        let cli = Cli::try_parse_from(["pbook", "assign", "1", "2"]).unwrap();
        let Some(Command::Assign(args)) = cli.command else {
            panic!("expected assign");
        };
        assert_eq!((args.contact, args.group), (1, 2));
    }

    #[test]
    fn test_parse_rejects_non_numeric_id() {
        assert!(Cli::try_parse_from(["pbook", "contact", "show", "abc"]).is_err());
    }

    #[test]
    fn test_parse_import() {
        let cli = Cli::try_parse_from(["pbook", "import", "backup.txt"]).unwrap();
        let Some(Command::Import(args)) = cli.command else {
            panic!("expected import");
        };
        assert_eq!(args.file, PathBuf::from("backup.txt"));
    }

    #[test]
    fn test_parse_with_config() {
        let args = ["pbook", "-c", "/custom/config.toml", "status"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_parse_with_data_dir_after_subcommand() {
        let cli = Cli::try_parse_from(["pbook", "status", "-d", "/tmp/book"]).unwrap();
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/book")));
    }

    #[test]
    fn test_parse_with_verbose() {
        let cli = Cli::try_parse_from(["pbook", "-vv", "status"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_parse_with_quiet() {
        let cli = Cli::try_parse_from(["pbook", "-q", "status"]).unwrap();
        assert!(cli.quiet);
    }
}

//! `pbook` - CLI for phonebook
//!
//! This binary opens the interactive address book menu, or runs a single
//! command against the data files and exits.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io;

use anyhow::Context;
use clap::Parser;

use phonebook::cli::{
    Cli, Command, ConfigCommand, ContactCommand, GroupCommand, OutputFormat, StatusCommand,
};
use phonebook::menu::{Menu, MenuSettings};
use phonebook::{init_logging, Config, Contact, Group, PhoneBook};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration, letting --data-dir win over every other source
    let mut config = Config::load_from(cli.config.clone()).context("failed to load configuration")?;
    if let Some(dir) = cli.data_dir.clone() {
        config.storage.data_dir = Some(dir);
        config.validate()?;
    }

    // Execute the command
    match cli.command.unwrap_or(Command::Menu) {
        Command::Menu => handle_menu(&config),
        Command::Contact(cmd) => handle_contact(&config, cmd),
        Command::Group(cmd) => handle_group(&config, cmd),
        Command::Assign(args) => {
            let mut book = open_book(&config)?;
            book.assign(args.contact, args.group)?;
            println!("Assigned contact {} to group {}.", args.contact, args.group);
            Ok(())
        }
        Command::Unassign(args) => {
            let mut book = open_book(&config)?;
            book.unassign(args.contact, args.group)?;
            println!("Removed contact {} from group {}.", args.contact, args.group);
            Ok(())
        }
        Command::Import(args) => {
            let mut book = open_book(&config)?;
            let report = book.import_contacts(&args.file)?;
            println!("{report}");
            Ok(())
        }
        Command::Export(args) => {
            let book = open_book(&config)?;
            let count = book.export_contacts(&args.file)?;
            println!("Exported {count} contacts to {}.", args.file.display());
            Ok(())
        }
        Command::Status(cmd) => handle_status(&config, &cmd),
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

fn open_book(config: &Config) -> anyhow::Result<PhoneBook> {
    let dir = config.data_dir();
    PhoneBook::open_dir(&dir).with_context(|| format!("failed to open data in {}", dir.display()))
}

fn handle_menu(config: &Config) -> anyhow::Result<()> {
    let mut book = open_book(config)?;
    let stdin = io::stdin();
    Menu::new(
        &mut book,
        stdin.lock(),
        io::stdout(),
        MenuSettings::from(config),
    )
    .run()?;
    Ok(())
}

fn print_contacts(contacts: &[&Contact], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(contacts)?);
        }
        OutputFormat::Plain => {
            for contact in contacts {
                println!("{contact}");
            }
        }
        OutputFormat::Table => {
            println!(
                "{:<5} | {:<20} | {:<12} | {:<25} | Fav",
                "ID", "Full Name", "Phone", "Email"
            );
            println!("{}", "-".repeat(78));
            for c in contacts {
                println!(
                    "{:<5} | {:<20} | {:<12} | {:<25} | {}",
                    c.id,
                    c.full_name,
                    c.phone_number,
                    c.email,
                    if c.is_favorite { "[*]" } else { "[ ]" }
                );
            }
            println!("{}", "-".repeat(78));
            println!("{} contact(s)", contacts.len());
        }
    }
    Ok(())
}

fn print_groups(groups: &[Group], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(groups)?);
        }
        OutputFormat::Plain => {
            for group in groups {
                println!("{group}");
            }
        }
        OutputFormat::Table => {
            println!("{:<5} | {:<20} | Description", "ID", "Group Name");
            println!("{}", "-".repeat(50));
            for group in groups {
                println!("{group}");
            }
            println!("{}", "-".repeat(50));
            println!("{} group(s)", groups.len());
        }
    }
    Ok(())
}

fn handle_contact(config: &Config, cmd: ContactCommand) -> anyhow::Result<()> {
    let mut book = open_book(config)?;

    match cmd {
        ContactCommand::List { sort, format } => {
            let contacts = book.contacts(sort.into());
            let refs: Vec<&Contact> = contacts.iter().collect();
            print_contacts(&refs, format)?;
        }
        ContactCommand::Show { id, json } => {
            let contact = book
                .contact(id)
                .ok_or(phonebook::Error::ContactNotFound { id })?;
            let groups = book.groups_of_contact(id);

            if json {
                let detail = serde_json::json!({
                    "contact": contact,
                    "groups": groups,
                });
                println!("{}", serde_json::to_string_pretty(&detail)?);
            } else {
                let names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
                println!("ID:           {}", contact.id);
                println!("Full Name:    {}", contact.full_name);
                println!("Phone:        {}", contact.phone_number);
                println!("Email:        {}", contact.email);
                println!("Address:      {}", contact.address);
                println!("Note:         {}", contact.note);
                println!(
                    "Groups:       {}",
                    if names.is_empty() {
                        "(None)".to_string()
                    } else {
                        names.join(", ")
                    }
                );
                println!(
                    "Favorite:     {}",
                    if contact.is_favorite { "Yes" } else { "No" }
                );
                println!("Created At:   {}", contact.created_at_display());
            }
        }
        ContactCommand::Add(fields) => {
            let contact = book.add_contact(fields.into())?;
            println!("Added contact {} ({}).", contact.id, contact.full_name);
        }
        ContactCommand::Update { id, fields } => {
            let contact = book.update_contact(id, fields.into())?;
            println!("Updated contact {} ({}).", contact.id, contact.full_name);
        }
        ContactCommand::Delete { id } => {
            let contact = book.delete_contact(id)?;
            println!("Deleted contact {} ({}).", contact.id, contact.full_name);
        }
        ContactCommand::Favorite { id } => {
            let starred = book.toggle_favorite(id)?;
            if starred {
                println!("Contact {id} marked as favorite.");
            } else {
                println!("Contact {id} is no longer a favorite.");
            }
        }
        ContactCommand::Search { keyword, format } => {
            let results = book.search(&keyword);
            print_contacts(&results, format)?;
        }
    }
    Ok(())
}

fn handle_group(config: &Config, cmd: GroupCommand) -> anyhow::Result<()> {
    let mut book = open_book(config)?;

    match cmd {
        GroupCommand::List { format } => {
            print_groups(book.groups(), format)?;
        }
        GroupCommand::Show { id } => {
            let group = book.group(id).ok_or(phonebook::Error::GroupNotFound { id })?;
            println!("ID:           {}", group.id);
            println!("Name:         {}", group.name);
            println!("Description:  {}", group.description);
            println!("Members:      {}", book.contacts_in_group(id).len());
        }
        GroupCommand::Create { name, description } => {
            let group = book.create_group(&name, &description)?;
            println!("Created group {} ({}).", group.id, group.name);
        }
        GroupCommand::Update {
            id,
            name,
            description,
        } => {
            let group = book.update_group(
                id,
                name.as_deref().unwrap_or_default(),
                description.as_deref().unwrap_or_default(),
            )?;
            println!("Updated group {} ({}).", group.id, group.name);
        }
        GroupCommand::Delete { id } => {
            let group = book.delete_group(id)?;
            println!("Deleted group {} ({}).", group.id, group.name);
        }
        GroupCommand::Members { id, format } => {
            if book.group(id).is_none() {
                return Err(phonebook::Error::GroupNotFound { id }.into());
            }
            print_contacts(&book.contacts_in_group(id), format)?;
        }
    }
    Ok(())
}

fn handle_status(config: &Config, cmd: &StatusCommand) -> anyhow::Result<()> {
    let book = open_book(config)?;
    let stats = book.stats();

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("pbook status");
        println!("------------");
        println!("Data directory: {}", stats.data_dir.display());
        println!("Contacts:       {}", stats.total_contacts);
        println!("Favorites:      {}", stats.favorite_contacts);
        println!("Groups:         {}", stats.total_groups);
        println!("Assignments:    {}", stats.total_memberships);
        println!("Size on disk:   {} bytes", stats.size_bytes);
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Data directory:     {}", config.data_dir().display());
                println!();
                println!("[UI]");
                println!("  Clear screen:       {}", config.ui.clear_screen);
                println!("  Pause (ms):         {}", config.ui.pause_ms);
                println!("  Default sort:       {}", config.ui.default_sort);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            Config::load_from(Some(path.clone()))
                .with_context(|| format!("configuration {} is invalid", path.display()))?;
            println!("Configuration is valid.");
        }
    }
    Ok(())
}

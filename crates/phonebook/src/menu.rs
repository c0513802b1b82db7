//! Interactive text menu.
//!
//! The menu reads answers line by line from any [`BufRead`] and draws screens
//! to any [`Write`], so the same code drives a terminal and the tests. End of
//! input anywhere leaves the menu cleanly.

use std::io::{self, BufRead, Write};
use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::{Contact, ContactUpdate, Group, NewContact, SortOrder};
use crate::service::PhoneBook;

const WIDE_RULE: usize = 50;
const NARROW_RULE: usize = 30;
const CLEAR: &str = "\x1B[2J\x1B[1;1H";

/// Presentation settings for the menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuSettings {
    /// Clear the terminal before each screen.
    pub clear_screen: bool,
    /// How long transient messages stay up.
    pub pause: Duration,
    /// Order the contact list opens with.
    pub default_sort: SortOrder,
}

impl Default for MenuSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for MenuSettings {
    fn from(config: &Config) -> Self {
        Self {
            clear_screen: config.ui.clear_screen,
            pause: config.pause(),
            default_sort: config.ui.default_sort,
        }
    }
}

/// The interactive menu over a [`PhoneBook`].
#[derive(Debug)]
pub struct Menu<'a, R, W> {
    book: &'a mut PhoneBook,
    input: R,
    output: W,
    settings: MenuSettings,
}

fn parse_id(text: &str) -> Option<u32> {
    if text.is_empty() || !text.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

fn sort_notice(order: SortOrder) -> &'static str {
    match order {
        SortOrder::Id => "List reset to Default (Oldest -> Newest)",
        SortOrder::NameAsc => "List is now sorted A - Z (Alex -> Bob)",
        SortOrder::NameDesc => "List is now sorted Z - A (Bob -> Alex)",
    }
}

fn next_sort_action(order: SortOrder) -> &'static str {
    match order {
        SortOrder::Id => "Sort Name A-Z",
        SortOrder::NameAsc => "Sort Name Z-A",
        SortOrder::NameDesc => "Reset to Default (ID)",
    }
}

impl<'a, R: BufRead, W: Write> Menu<'a, R, W> {
    /// Create a menu reading from `input` and drawing to `output`.
    pub fn new(book: &'a mut PhoneBook, input: R, output: W, settings: MenuSettings) -> Self {
        Self {
            book,
            input,
            output,
            settings,
        }
    }

    /// Run the main menu until the user exits or input ends.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input or writing output fails.
    pub fn run(&mut self) -> Result<()> {
        match self.main_menu() {
            Err(Error::Io(e)) if e.kind() == io::ErrorKind::UnexpectedEof => {
                debug!("Input closed, leaving menu");
                writeln!(self.output)?;
                Ok(())
            }
            other => other,
        }
    }

    // === Terminal helpers ===

    fn clear(&mut self) -> Result<()> {
        if self.settings.clear_screen {
            write!(self.output, "{CLEAR}")?;
        }
        Ok(())
    }

    fn header(&mut self, title: &str) -> Result<()> {
        let rule = "=".repeat(WIDE_RULE);
        writeln!(self.output, "{rule}")?;
        writeln!(self.output, "   {}", title.to_uppercase())?;
        writeln!(self.output, "{rule}")?;
        Ok(())
    }

    fn rule(&mut self, width: usize) -> Result<()> {
        writeln!(self.output, "{}", "-".repeat(width))?;
        Ok(())
    }

    /// Show a prompt and read one trimmed line.
    fn ask(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{prompt}: ")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into());
        }
        Ok(line.trim().to_string())
    }

    /// Ask with the current value shown in brackets; blank keeps it.
    fn ask_with_current(&mut self, prompt: &str, current: &str) -> Result<String> {
        if current.is_empty() {
            self.ask(prompt)
        } else {
            self.ask(&format!("{prompt} [{current}]"))
        }
    }

    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        Ok(self.ask(prompt)?.eq_ignore_ascii_case("y"))
    }

    fn wait_for_enter(&mut self) -> Result<()> {
        self.ask("Press Enter to return...")?;
        Ok(())
    }

    fn pause(&self) {
        if !self.settings.pause.is_zero() {
            thread::sleep(self.settings.pause);
        }
    }

    fn say(&mut self, message: &str) -> Result<()> {
        writeln!(self.output, ">> {message}")?;
        Ok(())
    }

    /// Print the outcome of a service call.
    fn report<T>(&mut self, result: Result<T>, success: impl FnOnce(T) -> String) -> Result<()> {
        match result {
            Ok(value) => {
                let message = success(value);
                self.say(&format!("Success: {message}"))
            }
            Err(e) => {
                if !e.is_validation_error() && !e.is_not_found() {
                    warn!("Operation failed: {e}");
                }
                self.say(&format!("Error: {e}"))
            }
        }
    }

    fn group_rows(&mut self, groups: &[Group]) -> Result<()> {
        writeln!(self.output, "{:<5} | {:<20}", "ID", "Group Name")?;
        self.rule(NARROW_RULE)?;
        for g in groups {
            writeln!(self.output, "{:<5} | {:<20}", g.id, g.name)?;
        }
        self.rule(NARROW_RULE)
    }

    fn contact_rows(&mut self, contacts: &[Contact]) -> Result<()> {
        writeln!(self.output, "{:<5} | {:<20} | {:<12}", "ID", "Full Name", "Phone")?;
        self.rule(WIDE_RULE)?;
        for c in contacts {
            writeln!(
                self.output,
                "{:<5} | {:<20} | {:<12}",
                c.id, c.full_name, c.phone_number
            )?;
        }
        Ok(())
    }

    // === Main menu ===

    fn main_menu(&mut self) -> Result<()> {
        loop {
            self.clear()?;
            let rule = "=".repeat(45);
            writeln!(self.output, "{rule}")?;
            writeln!(self.output, "      PHONE BOOK MANAGEMENT SYSTEM")?;
            writeln!(self.output, "{rule}")?;
            writeln!(self.output, "[1] View Contact List")?;
            writeln!(self.output, "[2] Add New Contact")?;
            writeln!(self.output, "[3] Manage Groups")?;
            writeln!(self.output, "[4] Search Contact")?;
            writeln!(self.output, "[5] Import/Export")?;
            writeln!(self.output, "[0] Exit")?;
            writeln!(self.output, "{rule}")?;

            match self.ask("Enter your choice")?.as_str() {
                "1" => self.contact_list()?,
                "2" => self.add_contact()?,
                "3" => self.manage_groups()?,
                "4" => self.search()?,
                "5" => self.import_export()?,
                "0" => {
                    writeln!(self.output, "Goodbye!")?;
                    return Ok(());
                }
                _ => {
                    self.say("Invalid choice! Try again.")?;
                    self.pause();
                }
            }
        }
    }

    // === Contacts ===

    fn contact_list(&mut self) -> Result<()> {
        let mut order = self.settings.default_sort;
        let mut notice: Option<&'static str> = None;

        loop {
            self.clear()?;
            self.header(&format!("Contact List (Current: {})", order.label()))?;

            if let Some(text) = notice.take() {
                writeln!(self.output, ">> NOTE: {text}")?;
                writeln!(self.output, "{}", "=".repeat(WIDE_RULE))?;
            }

            let contacts = self.book.contacts(order);
            if contacts.is_empty() {
                self.say("No contacts found in system.")?;
            } else {
                writeln!(
                    self.output,
                    "{:<5} | {:<20} | {:<12} | Fav",
                    "ID", "Full Name", "Phone"
                )?;
                self.rule(55)?;
                for c in &contacts {
                    writeln!(self.output, "{c}")?;
                }
                self.rule(55)?;
            }

            writeln!(self.output)?;
            writeln!(self.output, "--- MENU COMMANDS ---")?;
            writeln!(self.output, "[Number] Enter ID to View Detail")?;
            writeln!(self.output, "[A]      Add New Contact")?;
            writeln!(self.output, "[F]      Find / Search")?;
            writeln!(self.output, "[S]      {}", next_sort_action(order))?;
            writeln!(self.output, "[M]      Back to Main Menu")?;
            self.rule(NARROW_RULE)?;

            let choice = self.ask("Choice")?.to_uppercase();
            match choice.as_str() {
                "M" => return Ok(()),
                "A" => self.add_contact()?,
                "F" => self.search()?,
                "S" => {
                    order = order.next();
                    notice = Some(sort_notice(order));
                }
                other => {
                    if let Some(id) = parse_id(other) {
                        self.contact_detail(id)?;
                    }
                }
            }
        }
    }

    fn add_contact(&mut self) -> Result<()> {
        self.clear()?;
        self.header("Add New Contact")?;

        let full_name = self.ask("Enter Full Name (Req)")?;
        let phone_number = self.ask("Enter Phone (Req)")?;
        if full_name.is_empty() || phone_number.is_empty() {
            writeln!(self.output)?;
            self.say("Error: Name and Phone are required!")?;
            return self.wait_for_enter();
        }

        let input = NewContact {
            full_name,
            phone_number,
            email: self.ask("Email")?,
            address: self.ask("Address")?,
            note: self.ask("Note")?,
        };
        writeln!(self.output)?;
        let result = self.book.add_contact(input);
        self.report(result, |c| format!("Contact added with ID {}.", c.id))?;
        self.wait_for_enter()
    }

    fn contact_detail(&mut self, id: u32) -> Result<()> {
        loop {
            self.clear()?;
            let Some(contact) = self.book.contact(id).cloned() else {
                self.say("Error: Contact not found (might be deleted).")?;
                self.pause();
                return Ok(());
            };

            let groups: Vec<String> = self
                .book
                .groups_of_contact(id)
                .iter()
                .map(|g| g.name.clone())
                .collect();
            let group_names = if groups.is_empty() {
                "(None)".to_string()
            } else {
                groups.join(", ")
            };

            self.header("Contact Detail")?;
            writeln!(self.output, "ID:           {}", contact.id)?;
            writeln!(self.output, "Full Name:    {}", contact.full_name)?;
            writeln!(self.output, "Phone:        {}", contact.phone_number)?;
            writeln!(self.output, "Email:        {}", contact.email)?;
            writeln!(self.output, "Address:      {}", contact.address)?;
            writeln!(self.output, "Note:         {}", contact.note)?;
            writeln!(self.output, "Groups:       {group_names}")?;
            writeln!(
                self.output,
                "Favorite:     {}",
                if contact.is_favorite { "Yes [*]" } else { "No [ ]" }
            )?;
            writeln!(self.output, "Created At:   {}", contact.created_at_display())?;
            self.rule(WIDE_RULE)?;
            writeln!(self.output, "[U] Update Info")?;
            writeln!(self.output, "[D] Delete Contact")?;
            writeln!(self.output, "[F] Toggle Favorite")?;
            writeln!(self.output, "[G] Assign to Group")?;
            writeln!(self.output, "[R] Remove from Group")?;
            writeln!(self.output, "[B] Back")?;

            let choice = self.ask("Choose action")?.to_uppercase();
            match choice.as_str() {
                "B" => return Ok(()),
                "F" => {
                    if let Err(e) = self.book.toggle_favorite(id) {
                        self.say(&format!("Error: {e}"))?;
                        self.pause();
                    }
                }
                "D" => {
                    if self.confirm("Are you sure you want to delete? (Y/N)")? {
                        match self.book.delete_contact(id) {
                            Ok(_) => {
                                self.say("Contact deleted successfully.")?;
                                self.pause();
                                return Ok(());
                            }
                            Err(e) => {
                                self.say(&format!("Error: {e}"))?;
                                self.wait_for_enter()?;
                            }
                        }
                    }
                }
                "U" => self.update_contact(&contact)?,
                "G" => self.assign_group(&contact)?,
                "R" => self.remove_from_group(&contact)?,
                _ => {}
            }
        }
    }

    fn update_contact(&mut self, contact: &Contact) -> Result<()> {
        self.clear()?;
        self.header("Update Contact")?;
        writeln!(
            self.output,
            "(Leave blank and press Enter to keep current value)"
        )?;
        writeln!(self.output)?;

        let update = ContactUpdate {
            full_name: self.ask_with_current("Full Name", &contact.full_name)?,
            phone_number: self.ask_with_current("Phone", &contact.phone_number)?,
            email: self.ask_with_current("Email", &contact.email)?,
            address: self.ask_with_current("Address", &contact.address)?,
            note: self.ask_with_current("Note", &contact.note)?,
        };

        writeln!(self.output)?;
        let result = self.book.update_contact(contact.id, update);
        self.report(result, |_| "Contact updated.".to_string())?;
        self.wait_for_enter()
    }

    fn assign_group(&mut self, contact: &Contact) -> Result<()> {
        self.clear()?;
        self.header("Assign to Group")?;

        let groups = self.book.groups().to_vec();
        if groups.is_empty() {
            self.say("No groups available. Please create a group first.")?;
            return self.wait_for_enter();
        }
        self.group_rows(&groups)?;

        writeln!(self.output)?;
        let answer = self.ask("Enter Group ID to assign")?;
        match parse_id(&answer) {
            Some(group_id) => {
                let result = self.book.assign(contact.id, group_id);
                self.report(result, |()| "Assigned to group.".to_string())?;
            }
            None => self.say("Error: Invalid ID format.")?,
        }
        self.wait_for_enter()
    }

    fn remove_from_group(&mut self, contact: &Contact) -> Result<()> {
        self.clear()?;
        self.header("Remove from Group")?;

        let groups: Vec<Group> = self
            .book
            .groups_of_contact(contact.id)
            .into_iter()
            .cloned()
            .collect();
        if groups.is_empty() {
            self.say("This contact is not in any group.")?;
            return self.wait_for_enter();
        }
        self.group_rows(&groups)?;

        writeln!(self.output)?;
        let answer = self.ask("Enter Group ID to remove")?;
        match parse_id(&answer) {
            Some(group_id) => {
                let result = self.book.unassign(contact.id, group_id);
                self.report(result, |()| "Removed from group.".to_string())?;
            }
            None => self.say("Error: Invalid ID format.")?,
        }
        self.wait_for_enter()
    }

    fn search(&mut self) -> Result<()> {
        loop {
            self.clear()?;
            self.header("Search Contact")?;
            writeln!(self.output, "Enter keyword to search (Name/Phone/Email)")?;
            writeln!(self.output, "(Leave blank and press Enter to go back)")?;

            let keyword = self.ask("Keyword")?;
            if keyword.is_empty() {
                return Ok(());
            }

            let results: Vec<Contact> = self.book.search(&keyword).into_iter().cloned().collect();
            writeln!(self.output)?;
            writeln!(self.output, "Found {} result(s):", results.len())?;
            if results.is_empty() {
                writeln!(self.output)?;
                self.ask("No results found. Press Enter to try again...")?;
                continue;
            }

            self.contact_rows(&results)?;
            writeln!(self.output)?;
            let choice = self.ask("[ID] View Detail or [Enter] New Search")?;
            if let Some(id) = parse_id(&choice) {
                self.contact_detail(id)?;
            }
        }
    }

    // === Groups ===

    fn manage_groups(&mut self) -> Result<()> {
        loop {
            self.clear()?;
            self.header("Manage Groups")?;
            writeln!(self.output, "[1] View All Groups")?;
            writeln!(self.output, "[2] Create New Group")?;
            writeln!(self.output, "[3] Edit Group")?;
            writeln!(self.output, "[4] Delete Group")?;
            writeln!(self.output, "[5] View Contacts in Group (Filter)")?;
            writeln!(self.output, "[0] Back to Main Menu")?;

            match self.ask("Choice")?.as_str() {
                "1" => self.list_groups()?,
                "2" => self.create_group()?,
                "3" => self.edit_group()?,
                "4" => self.delete_group()?,
                "5" => self.group_members()?,
                "0" => return Ok(()),
                _ => {}
            }
        }
    }

    fn print_groups(&mut self) -> Result<()> {
        let lines: Vec<String> = self.book.groups().iter().map(ToString::to_string).collect();
        for line in lines {
            writeln!(self.output, "{line}")?;
        }
        Ok(())
    }

    fn list_groups(&mut self) -> Result<()> {
        self.clear()?;
        self.header("Group List")?;
        if self.book.groups().is_empty() {
            self.say("No groups found.")?;
        } else {
            self.print_groups()?;
        }
        writeln!(self.output)?;
        self.wait_for_enter()
    }

    fn create_group(&mut self) -> Result<()> {
        self.clear()?;
        self.header("Create Group")?;
        let name = self.ask("Name")?;
        let description = self.ask("Desc")?;
        let result = self.book.create_group(&name, &description);
        self.report(result, |g| format!("Group created with ID {}.", g.id))?;
        self.wait_for_enter()
    }

    fn edit_group(&mut self) -> Result<()> {
        self.clear()?;
        self.header("Edit Group")?;
        self.print_groups()?;
        self.rule(NARROW_RULE)?;

        let answer = self.ask("Enter Group ID to Edit")?;
        match parse_id(&answer) {
            Some(id) => {
                let name = self.ask("New Name")?;
                let description = self.ask("New Desc")?;
                let result = self.book.update_group(id, &name, &description);
                self.report(result, |_| "Group updated.".to_string())?;
            }
            None => self.say("Error: Invalid ID format.")?,
        }
        self.wait_for_enter()
    }

    fn delete_group(&mut self) -> Result<()> {
        self.clear()?;
        self.header("Delete Group")?;
        self.print_groups()?;
        self.rule(NARROW_RULE)?;

        let answer = self.ask("Enter Group ID to DELETE")?;
        match parse_id(&answer) {
            Some(id) => {
                if self.confirm("Confirm deletion? (Y/N)")? {
                    let result = self.book.delete_group(id);
                    self.report(result, |_| "Group deleted.".to_string())?;
                }
            }
            None => self.say("Error: Invalid ID format.")?,
        }
        self.wait_for_enter()
    }

    fn group_members(&mut self) -> Result<()> {
        self.clear()?;
        self.header("Filter by Group")?;

        if self.book.groups().is_empty() {
            self.say("No groups available.")?;
        } else {
            self.print_groups()?;
            self.rule(NARROW_RULE)?;
            let answer = self.ask("Enter Group ID")?;
            match parse_id(&answer) {
                Some(id) => {
                    let members: Vec<Contact> = self
                        .book
                        .contacts_in_group(id)
                        .into_iter()
                        .cloned()
                        .collect();
                    writeln!(self.output)?;
                    writeln!(self.output, "--- Members of Group ID {id} ---")?;
                    if members.is_empty() {
                        self.say("This group is empty.")?;
                    } else {
                        self.contact_rows(&members)?;
                    }
                }
                None => self.say("Error: Invalid ID format.")?,
            }
        }
        writeln!(self.output)?;
        self.wait_for_enter()
    }

    // === Import / export ===

    fn import_export(&mut self) -> Result<()> {
        loop {
            self.clear()?;
            self.header("Import / Export")?;
            writeln!(self.output, "[1] Import from TXT file")?;
            writeln!(self.output, "[2] Export to TXT file")?;
            writeln!(self.output, "[0] Back")?;

            match self.ask("Choice")?.as_str() {
                "1" => {
                    self.clear()?;
                    self.header("Import Data")?;
                    let path = self.ask("Enter file path (e.g. data/contacts.txt)")?;
                    self.say("Processing...")?;
                    let result = self.book.import_contacts(&path);
                    self.report(result, |report| report.to_string())?;
                    self.wait_for_enter()?;
                }
                "2" => {
                    self.clear()?;
                    self.header("Export Data")?;
                    let path = self.ask("Enter destination path (e.g. data/backup.txt)")?;
                    let result = self.book.export_contacts(&path);
                    self.report(result, |count| format!("Exported {count} contacts."))?;
                    self.wait_for_enter()?;
                }
                "0" => return Ok(()),
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    use crate::logging::init_test_logging;

    fn quiet_settings() -> MenuSettings {
        MenuSettings {
            clear_screen: false,
            pause: Duration::ZERO,
            default_sort: SortOrder::Id,
        }
    }

    fn create_test_book() -> (tempfile::TempDir, PhoneBook) {
        init_test_logging();
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let book = PhoneBook::open_dir(dir.path()).expect("failed to open phone book");
        (dir, book)
    }

    /// Feed `script` (one answer per line) to a menu and return everything drawn.
    fn drive(book: &mut PhoneBook, script: &str) -> String {
        let mut out = Vec::new();
        Menu::new(book, Cursor::new(script.as_bytes()), &mut out, quiet_settings())
            .run()
            .expect("menu failed");
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("12"), Some(12));
        assert_eq!(parse_id(""), None);
        assert_eq!(parse_id("-1"), None);
        assert_eq!(parse_id("1a"), None);
        assert_eq!(parse_id("99999999999"), None);
    }

    #[test]
    fn test_exit_immediately() {
        let (_dir, mut book) = create_test_book();
        let out = drive(&mut book, "0\n");
        assert!(out.contains("PHONE BOOK MANAGEMENT SYSTEM"));
        assert!(out.ends_with("Goodbye!\n"));
    }

    #[test]
    fn test_end_of_input_exits_cleanly() {
        let (_dir, mut book) = create_test_book();
        let out = drive(&mut book, "1\n");
        assert!(out.contains("CONTACT LIST"));
    }

    #[test]
    fn test_invalid_main_choice() {
        let (_dir, mut book) = create_test_book();
        let out = drive(&mut book, "9\n0\n");
        assert!(out.contains(">> Invalid choice! Try again."));
    }

    #[test]
    fn test_add_contact_from_main_menu() {
        let (_dir, mut book) = create_test_book();
        let out = drive(
            &mut book,
            "2\nAlex Smith\n0901\nalex@example.com\n12 Main St\nfriend\n\n0\n",
        );

        assert!(out.contains(">> Success: Contact added with ID 1."));
        let contact = book.contact(1).unwrap();
        assert_eq!(contact.full_name, "Alex Smith");
        assert_eq!(contact.email, "alex@example.com");
        assert_eq!(contact.note, "friend");
    }

    #[test]
    fn test_add_contact_requires_name_and_phone() {
        let (_dir, mut book) = create_test_book();
        let out = drive(&mut book, "2\nAlex\n\n\n0\n");
        assert!(out.contains(">> Error: Name and Phone are required!"));
        assert!(book.contact(1).is_none());
    }

    #[test]
    fn test_add_contact_reports_service_error() {
        let (_dir, mut book) = create_test_book();
        book.add_contact(NewContact::new("Alex", "0901")).unwrap();
        let out = drive(&mut book, "2\nBob\n0901\n\n\n\n\n0\n");
        assert!(out.contains(">> Error: Phone number 0901 already exists."));
    }

    #[test]
    fn test_contact_list_sort_cycle() {
        let (_dir, mut book) = create_test_book();
        book.add_contact(NewContact::new("Bob Zed", "0901")).unwrap();
        book.add_contact(NewContact::new("Alex Adams", "0902")).unwrap();

        let out = drive(&mut book, "1\nS\nS\nS\nM\n0\n");
        assert!(out.contains("CONTACT LIST (CURRENT: ID (DEFAULT))"));
        assert!(out.contains(">> NOTE: List is now sorted A - Z (Alex -> Bob)"));
        assert!(out.contains("CONTACT LIST (CURRENT: NAME (A-Z))"));
        assert!(out.contains("CONTACT LIST (CURRENT: NAME (Z-A))"));
        assert!(out.contains(">> NOTE: List reset to Default (Oldest -> Newest)"));

        let a_to_z = out.find("NAME (A-Z)").unwrap();
        let adams = out[a_to_z..].find("Alex Adams").unwrap();
        let zed = out[a_to_z..].find("Bob Zed").unwrap();
        assert!(adams < zed);
    }

    #[test]
    fn test_empty_contact_list() {
        let (_dir, mut book) = create_test_book();
        let out = drive(&mut book, "1\nM\n0\n");
        assert!(out.contains(">> No contacts found in system."));
    }

    #[test]
    fn test_detail_toggle_favorite_and_back() {
        let (_dir, mut book) = create_test_book();
        book.add_contact(NewContact::new("Alex", "0901")).unwrap();

        let out = drive(&mut book, "1\n1\nF\nB\nM\n0\n");
        assert!(out.contains("Favorite:     No [ ]"));
        assert!(out.contains("Favorite:     Yes [*]"));
        assert!(book.contact(1).unwrap().is_favorite);
    }

    #[test]
    fn test_detail_of_missing_contact() {
        let (_dir, mut book) = create_test_book();
        let out = drive(&mut book, "1\n42\nM\n0\n");
        assert!(out.contains(">> Error: Contact not found (might be deleted)."));
    }

    #[test]
    fn test_detail_delete_requires_confirmation() {
        let (_dir, mut book) = create_test_book();
        book.add_contact(NewContact::new("Alex", "0901")).unwrap();

        drive(&mut book, "1\n1\nD\nn\nB\nM\n0\n");
        assert!(book.contact(1).is_some());

        let out = drive(&mut book, "1\n1\nD\ny\nM\n0\n");
        assert!(out.contains(">> Contact deleted successfully."));
        assert!(book.contact(1).is_none());
    }

    #[test]
    fn test_update_contact_keeps_blank_answers() {
        let (_dir, mut book) = create_test_book();
        book.add_contact(NewContact::new("Alex", "0901").with_email("a@x.io"))
            .unwrap();

        let out = drive(&mut book, "1\n1\nU\nAlex Smith\n\n\nHanoi\n\n\nB\nM\n0\n");
        assert!(out.contains("Phone [0901]: "));
        assert!(out.contains(">> Success: Contact updated."));

        let contact = book.contact(1).unwrap();
        assert_eq!(contact.full_name, "Alex Smith");
        assert_eq!(contact.phone_number, "0901");
        assert_eq!(contact.email, "a@x.io");
        assert_eq!(contact.address, "Hanoi");
    }

    #[test]
    fn test_assign_and_remove_group_from_detail() {
        let (_dir, mut book) = create_test_book();
        book.add_contact(NewContact::new("Alex", "0901")).unwrap();
        book.create_group("Family", "").unwrap();

        let out = drive(&mut book, "1\n1\nG\n1\n\nB\nM\n0\n");
        assert!(out.contains(">> Success: Assigned to group."));
        assert!(out.contains("Groups:       Family"));
        assert_eq!(book.groups_of_contact(1).len(), 1);

        let out = drive(&mut book, "1\n1\nR\n1\n\nB\nM\n0\n");
        assert!(out.contains(">> Success: Removed from group."));
        assert!(book.groups_of_contact(1).is_empty());
    }

    #[test]
    fn test_assign_with_bad_input() {
        let (_dir, mut book) = create_test_book();
        book.add_contact(NewContact::new("Alex", "0901")).unwrap();

        let out = drive(&mut book, "1\n1\nG\n\nB\nM\n0\n");
        assert!(out.contains(">> No groups available. Please create a group first."));

        book.create_group("Family", "").unwrap();
        let out = drive(&mut book, "1\n1\nG\nabc\n\nG\n5\n\nB\nM\n0\n");
        assert!(out.contains(">> Error: Invalid ID format."));
        assert!(out.contains(">> Error: Group 5 not found."));
    }

    #[test]
    fn test_remove_when_not_in_any_group() {
        let (_dir, mut book) = create_test_book();
        book.add_contact(NewContact::new("Alex", "0901")).unwrap();
        let out = drive(&mut book, "1\n1\nR\n\nB\nM\n0\n");
        assert!(out.contains(">> This contact is not in any group."));
    }

    #[test]
    fn test_search_flow() {
        let (_dir, mut book) = create_test_book();
        book.add_contact(NewContact::new("Alex Smith", "0901")).unwrap();
        book.add_contact(NewContact::new("Bob", "0902")).unwrap();

        let out = drive(&mut book, "4\nsmith\n\nzzz\n\n\n0\n");
        assert!(out.contains("Found 1 result(s):"));
        assert!(out.contains("1     | Alex Smith"));
        assert!(out.contains("Found 0 result(s):"));
        assert!(out.contains("No results found. Press Enter to try again..."));
    }

    #[test]
    fn test_search_opens_detail() {
        let (_dir, mut book) = create_test_book();
        book.add_contact(NewContact::new("Alex Smith", "0901")).unwrap();

        let out = drive(&mut book, "4\nalex\n1\nB\n\n0\n");
        assert!(out.contains("CONTACT DETAIL"));
        assert!(out.contains("Full Name:    Alex Smith"));
    }

    #[test]
    fn test_group_management_flow() {
        let (_dir, mut book) = create_test_book();
        let script = "3\n\
                      2\nFamily\nrelatives\n\n\
                      2\nfamily\n\n\n\
                      1\n\n\
                      3\n1\nKin\n\n\n\
                      0\n0\n";
        let out = drive(&mut book, script);

        assert!(out.contains(">> Success: Group created with ID 1."));
        assert!(out.contains(">> Error: Group name 'family' already exists."));
        assert!(out.contains("1     | Family               | relatives"));
        assert!(out.contains(">> Success: Group updated."));
        assert_eq!(book.group(1).unwrap().name, "Kin");
        assert_eq!(book.group(1).unwrap().description, "relatives");
    }

    #[test]
    fn test_group_members_and_delete() {
        let (_dir, mut book) = create_test_book();
        book.add_contact(NewContact::new("Alex", "0901")).unwrap();
        book.create_group("Family", "").unwrap();
        book.create_group("Empty", "").unwrap();
        book.assign(1, 1).unwrap();

        let out = drive(&mut book, "3\n5\n1\n\n5\n2\n\n4\n1\ny\n\n0\n0\n");
        assert!(out.contains("--- Members of Group ID 1 ---"));
        assert!(out.contains("1     | Alex"));
        assert!(out.contains(">> This group is empty."));
        assert!(out.contains(">> Success: Group deleted."));
        assert!(book.group(1).is_none());
        assert!(book.groups_of_contact(1).is_empty());
    }

    #[test]
    fn test_group_screens_without_groups() {
        let (_dir, mut book) = create_test_book();
        let out = drive(&mut book, "3\n1\n\n5\n\n4\nx\n\n0\n0\n");
        assert!(out.contains(">> No groups found."));
        assert!(out.contains(">> No groups available."));
        assert!(out.contains(">> Error: Invalid ID format."));
    }

    #[test]
    fn test_export_and_import_screens() {
        let (dir, mut book) = create_test_book();
        book.add_contact(NewContact::new("Alex", "0901")).unwrap();
        let backup = dir.path().join("backup.txt");

        let script = format!("5\n2\n{}\n\n0\n0\n", backup.display());
        let out = drive(&mut book, &script);
        assert!(out.contains(">> Success: Exported 1 contacts."));
        assert!(backup.exists());

        let other = tempfile::tempdir().unwrap();
        let mut fresh = PhoneBook::open_dir(other.path()).unwrap();
        let script = format!("5\n1\n{}\n\n1\n{}\n\n0\n0\n", backup.display(), backup.display());
        let out = drive(&mut fresh, &script);
        assert!(out.contains(">> Processing..."));
        assert!(out.contains(">> Success: Imported 1 contacts. Skipped 0 duplicates."));
        assert!(out.contains(">> Success: Imported 0 contacts. Skipped 1 duplicates."));
        assert_eq!(fresh.contact(1).unwrap().full_name, "Alex");
    }

    #[test]
    fn test_import_missing_file_screen() {
        let (dir, mut book) = create_test_book();
        let missing = dir.path().join("nope.txt");
        let script = format!("5\n1\n{}\n\n0\n0\n", missing.display());
        let out = drive(&mut book, &script);
        assert!(out.contains(">> Error: File not found:"));
    }

    #[test]
    fn test_clear_screen_setting() {
        let (_dir, mut book) = create_test_book();
        let mut out = Vec::new();
        let settings = MenuSettings {
            clear_screen: true,
            ..quiet_settings()
        };
        Menu::new(&mut book, Cursor::new("0\n"), &mut out, settings)
            .run()
            .unwrap();
        assert!(String::from_utf8(out).unwrap().starts_with(CLEAR));
    }

    #[test]
    fn test_settings_from_config() {
        let mut config = Config::default();
        config.ui.clear_screen = false;
        config.ui.pause_ms = 0;
        config.ui.default_sort = SortOrder::NameAsc;

        let settings = MenuSettings::from(&config);
        assert!(!settings.clear_screen);
        assert!(settings.pause.is_zero());
        assert_eq!(settings.default_sort, SortOrder::NameAsc);
    }
}

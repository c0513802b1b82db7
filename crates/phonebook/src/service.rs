//! The address book itself.
//!
//! [`PhoneBook`] owns the loaded [`Dataset`] and the [`Storage`] it came from.
//! Every mutation builds the next dataset, writes it to disk and only then
//! replaces the in-memory copy, so a failed operation changes nothing.

use std::fmt;
use std::fs;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::model::{Contact, ContactUpdate, Group, Membership, NewContact, SortOrder};
use crate::storage::codec::{self, EXPORT_HEADER, HEADER_MARKER};
use crate::storage::{write_lines, Dataset, Storage, StorageStats};
use crate::validate;

/// Outcome of an import run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct ImportReport {
    /// Contacts added.
    pub imported: usize,
    /// Lines skipped because the phone number was already present.
    pub duplicates: usize,
    /// Lines skipped because they failed validation.
    pub rejected: usize,
}

impl fmt::Display for ImportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Imported {} contacts. Skipped {} duplicates.",
            self.imported, self.duplicates
        )?;
        if self.rejected > 0 {
            write!(f, " Rejected {} invalid lines.", self.rejected)?;
        }
        Ok(())
    }
}

/// In-memory address book backed by flat files.
#[derive(Debug)]
pub struct PhoneBook {
    storage: Storage,
    data: Dataset,
}

fn next_id(record: &'static str, ids: impl Iterator<Item = u32>) -> Result<u32> {
    match ids.max() {
        None => Ok(1),
        Some(max) => max
            .checked_add(1)
            .ok_or(Error::IdSpaceExhausted { record, max }),
    }
}

impl PhoneBook {
    /// Load the address book from storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the data files exist but cannot be read.
    pub fn open(storage: Storage) -> Result<Self> {
        let data = storage.load()?;
        Ok(Self { storage, data })
    }

    /// Open storage in `data_dir` and load it.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or read.
    pub fn open_dir(data_dir: impl AsRef<Path>) -> Result<Self> {
        Self::open(Storage::open(data_dir)?)
    }

    /// The backing storage.
    #[must_use]
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Storage statistics for the current data.
    #[must_use]
    pub fn stats(&self) -> StorageStats {
        self.storage.stats(&self.data)
    }

    fn commit(&mut self, next: Dataset) -> Result<()> {
        self.storage.save(&next)?;
        self.data = next;
        Ok(())
    }

    fn contact_index(&self, id: u32) -> Result<usize> {
        self.data
            .contacts
            .iter()
            .position(|c| c.id == id)
            .ok_or(Error::ContactNotFound { id })
    }

    fn group_index(&self, id: u32) -> Result<usize> {
        self.data
            .groups
            .iter()
            .position(|g| g.id == id)
            .ok_or(Error::GroupNotFound { id })
    }

    fn phone_taken(&self, phone: &str) -> bool {
        self.data.contacts.iter().any(|c| c.phone_number == phone)
    }

    // === Contacts ===

    /// All contacts in the requested order.
    #[must_use]
    pub fn contacts(&self, order: SortOrder) -> Vec<Contact> {
        let mut contacts = self.data.contacts.clone();
        order.apply(&mut contacts);
        contacts
    }

    /// Look up a contact by id.
    #[must_use]
    pub fn contact(&self, id: u32) -> Option<&Contact> {
        self.data.contacts.iter().find(|c| c.id == id)
    }

    /// Add a contact and return it.
    ///
    /// # Errors
    ///
    /// Returns an error if the phone is missing or already used, the email is
    /// malformed, a field holds a reserved character, no id is left, or
    /// saving fails.
    pub fn add_contact(&mut self, input: NewContact) -> Result<Contact> {
        validate::new_contact(&input)?;
        if self.phone_taken(&input.phone_number) {
            return Err(Error::duplicate_phone(input.phone_number));
        }

        let id = next_id("contact", self.data.contacts.iter().map(|c| c.id))?;
        let contact = Contact::new(id, input);

        let mut next = self.data.clone();
        next.contacts.push(contact.clone());
        self.commit(next)?;

        debug!("Added contact {} ({})", contact.id, contact.full_name);
        Ok(contact)
    }

    /// Apply the non-empty fields of `update` to a contact.
    ///
    /// # Errors
    ///
    /// Returns an error if the contact does not exist, the new phone belongs
    /// to someone else, the new email is malformed, or saving fails.
    pub fn update_contact(&mut self, id: u32, update: ContactUpdate) -> Result<Contact> {
        let index = self.contact_index(id)?;
        validate::contact_update(&update)?;

        let current = &self.data.contacts[index];
        if !update.phone_number.is_empty()
            && update.phone_number != current.phone_number
            && self.phone_taken(&update.phone_number)
        {
            return Err(Error::duplicate_phone(update.phone_number));
        }

        let mut next = self.data.clone();
        let contact = &mut next.contacts[index];
        for (slot, value) in [
            (&mut contact.full_name, update.full_name),
            (&mut contact.phone_number, update.phone_number),
            (&mut contact.email, update.email),
            (&mut contact.address, update.address),
            (&mut contact.note, update.note),
        ] {
            if !value.is_empty() {
                *slot = value;
            }
        }
        let updated = contact.clone();
        self.commit(next)?;

        debug!("Updated contact {}", id);
        Ok(updated)
    }

    /// Delete a contact along with its group memberships.
    ///
    /// # Errors
    ///
    /// Returns an error if the contact does not exist or saving fails.
    pub fn delete_contact(&mut self, id: u32) -> Result<Contact> {
        let index = self.contact_index(id)?;

        let mut next = self.data.clone();
        let removed = next.contacts.remove(index);
        next.memberships.retain(|m| m.contact_id != id);
        self.commit(next)?;

        debug!("Deleted contact {}", id);
        Ok(removed)
    }

    /// Flip the favourite flag and return the new value.
    ///
    /// # Errors
    ///
    /// Returns an error if the contact does not exist or saving fails.
    pub fn toggle_favorite(&mut self, id: u32) -> Result<bool> {
        let index = self.contact_index(id)?;

        let mut next = self.data.clone();
        let contact = &mut next.contacts[index];
        contact.is_favorite = !contact.is_favorite;
        let favorite = contact.is_favorite;
        self.commit(next)?;

        debug!("Contact {} favorite = {}", id, favorite);
        Ok(favorite)
    }

    /// Contacts whose name, phone or email contains `keyword`.
    #[must_use]
    pub fn search(&self, keyword: &str) -> Vec<&Contact> {
        let keyword = keyword.to_lowercase();
        self.data
            .contacts
            .iter()
            .filter(|c| c.matches(&keyword))
            .collect()
    }

    // === Groups ===

    /// All groups in storage order.
    #[must_use]
    pub fn groups(&self) -> &[Group] {
        &self.data.groups
    }

    /// Look up a group by id.
    #[must_use]
    pub fn group(&self, id: u32) -> Option<&Group> {
        self.data.groups.iter().find(|g| g.id == id)
    }

    /// Create a group and return it.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or already used (ignoring
    /// case), a field holds a reserved character, no id is left, or saving
    /// fails.
    pub fn create_group(&mut self, name: &str, description: &str) -> Result<Group> {
        let name = name.trim();
        validate::group(name, description, true)?;
        if self.data.groups.iter().any(|g| g.has_name(name)) {
            return Err(Error::duplicate_group_name(name));
        }

        let id = next_id("group", self.data.groups.iter().map(|g| g.id))?;
        let group = Group::new(id, name, description);

        let mut next = self.data.clone();
        next.groups.push(group.clone());
        self.commit(next)?;

        debug!("Created group {} ({})", group.id, group.name);
        Ok(group)
    }

    /// Rename a group and/or replace its description. Empty values keep the
    /// current one.
    ///
    /// # Errors
    ///
    /// Returns an error if the group does not exist, another group already
    /// has the new name, or saving fails.
    pub fn update_group(&mut self, id: u32, name: &str, description: &str) -> Result<Group> {
        let index = self.group_index(id)?;
        let name = name.trim();
        validate::group(name, description, false)?;

        if !name.is_empty() && self.data.groups.iter().any(|g| g.id != id && g.has_name(name)) {
            return Err(Error::duplicate_group_name(name));
        }

        let mut next = self.data.clone();
        let group = &mut next.groups[index];
        if !name.is_empty() {
            group.name = name.to_string();
        }
        if !description.is_empty() {
            group.description = description.to_string();
        }
        let updated = group.clone();
        self.commit(next)?;

        debug!("Updated group {}", id);
        Ok(updated)
    }

    /// Delete a group and every membership in it.
    ///
    /// # Errors
    ///
    /// Returns an error if the group does not exist or saving fails.
    pub fn delete_group(&mut self, id: u32) -> Result<Group> {
        let index = self.group_index(id)?;

        let mut next = self.data.clone();
        let removed = next.groups.remove(index);
        next.memberships.retain(|m| m.group_id != id);
        self.commit(next)?;

        debug!("Deleted group {}", id);
        Ok(removed)
    }

    // === Memberships ===

    /// Groups the contact belongs to, in group storage order.
    #[must_use]
    pub fn groups_of_contact(&self, contact_id: u32) -> Vec<&Group> {
        self.data
            .groups
            .iter()
            .filter(|g| {
                self.data
                    .memberships
                    .contains(&Membership::new(contact_id, g.id))
            })
            .collect()
    }

    /// Members of the group, in contact storage order.
    #[must_use]
    pub fn contacts_in_group(&self, group_id: u32) -> Vec<&Contact> {
        self.data
            .contacts
            .iter()
            .filter(|c| {
                self.data
                    .memberships
                    .contains(&Membership::new(c.id, group_id))
            })
            .collect()
    }

    /// Put a contact into a group.
    ///
    /// # Errors
    ///
    /// Returns an error if either side does not exist, the pair already
    /// exists, or saving fails.
    pub fn assign(&mut self, contact_id: u32, group_id: u32) -> Result<()> {
        self.contact_index(contact_id)?;
        self.group_index(group_id)?;

        let membership = Membership::new(contact_id, group_id);
        if self.data.memberships.contains(&membership) {
            return Err(Error::AlreadyInGroup {
                contact_id,
                group_id,
            });
        }

        let mut next = self.data.clone();
        next.memberships.push(membership);
        self.commit(next)?;

        debug!("Assigned contact {} to group {}", contact_id, group_id);
        Ok(())
    }

    /// Take a contact out of a group.
    ///
    /// # Errors
    ///
    /// Returns an error if the pair does not exist or saving fails.
    pub fn unassign(&mut self, contact_id: u32, group_id: u32) -> Result<()> {
        let membership = Membership::new(contact_id, group_id);
        let index = self
            .data
            .memberships
            .iter()
            .position(|m| *m == membership)
            .ok_or(Error::MembershipNotFound {
                contact_id,
                group_id,
            })?;

        let mut next = self.data.clone();
        next.memberships.remove(index);
        self.commit(next)?;

        debug!("Removed contact {} from group {}", contact_id, group_id);
        Ok(())
    }

    // === Import / export ===

    /// Write all contacts, with a header line, to `path`. Returns the count.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn export_contacts(&self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let lines = std::iter::once(EXPORT_HEADER.to_string())
            .chain(self.data.contacts.iter().map(codec::encode_contact));
        write_lines(path, lines)?;

        let count = self.data.contacts.len();
        info!("Exported {} contacts to {}", count, path.display());
        Ok(count)
    }

    /// Add contacts from an export-format file.
    ///
    /// A leading header line is skipped. Lines with fewer than three fields
    /// are ignored; lines whose phone is already known (including earlier
    /// lines of the same file) count as duplicates; lines failing validation
    /// count as rejected. Data is saved once at the end.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or cannot be read, the id
    /// space runs out, or saving fails.
    pub fn import_contacts(&mut self, path: impl AsRef<Path>) -> Result<ImportReport> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::ImportFileNotFound {
                path: path.to_path_buf(),
            });
        }
        let text = fs::read_to_string(path).map_err(|source| Error::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

        let mut lines = text.lines().enumerate().peekable();
        if lines
            .peek()
            .is_some_and(|(_, first)| first.contains(HEADER_MARKER))
        {
            lines.next();
        }

        let mut next = self.data.clone();
        let mut report = ImportReport::default();
        for (index, line) in lines {
            let Ok(record) = codec::decode_import(line) else {
                continue;
            };

            if next
                .contacts
                .iter()
                .any(|c| c.phone_number == record.phone_number)
            {
                report.duplicates += 1;
                continue;
            }

            let input = NewContact {
                full_name: record.full_name,
                phone_number: record.phone_number,
                email: record.email,
                address: record.address,
                note: record.note,
            };
            if let Err(e) = validate::new_contact(&input) {
                warn!("Rejected line {} of {}: {}", index + 1, path.display(), e);
                report.rejected += 1;
                continue;
            }

            let id = next_id("contact", next.contacts.iter().map(|c| c.id))?;
            next.contacts.push(Contact::new(id, input));
            report.imported += 1;
        }

        if report.imported > 0 {
            self.commit(next)?;
        }
        info!("Import from {}: {}", path.display(), report);
        Ok(report)
    }
}

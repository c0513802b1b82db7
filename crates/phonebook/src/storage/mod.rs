//! Storage layer for phonebook.
//!
//! Persists the three record collections as pipe-delimited text files inside
//! a data directory. Every save rewrites all three files in full.

pub mod codec;

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::model::{Contact, Group, Membership};

/// File holding one contact per line.
pub const CONTACTS_FILE: &str = "contacts.txt";

/// File holding one group per line.
pub const GROUPS_FILE: &str = "groups.txt";

/// File holding one `contact_id|group_id` pair per line.
pub const MEMBERSHIPS_FILE: &str = "contact_group.txt";

/// Everything the address book holds, in storage order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    /// All contacts.
    pub contacts: Vec<Contact>,
    /// All groups.
    pub groups: Vec<Group>,
    /// Contact/group pairs, without duplicates.
    pub memberships: Vec<Membership>,
}

/// Flat-file storage rooted at a data directory.
#[derive(Debug, Clone)]
pub struct Storage {
    /// Directory holding the data files.
    data_dir: PathBuf,
}

impl Storage {
    /// Open storage in the given directory, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Self> {
        let data_dir = data_dir.as_ref().to_path_buf();

        if !data_dir.exists() {
            fs::create_dir_all(&data_dir).map_err(|source| Error::DirectoryCreate {
                path: data_dir.clone(),
                source,
            })?;
            info!("Created data directory {}", data_dir.display());
        }

        debug!("Using data directory {}", data_dir.display());
        Ok(Self { data_dir })
    }

    /// Get the data directory.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the contacts file.
    #[must_use]
    pub fn contacts_path(&self) -> PathBuf {
        self.data_dir.join(CONTACTS_FILE)
    }

    /// Path of the groups file.
    #[must_use]
    pub fn groups_path(&self) -> PathBuf {
        self.data_dir.join(GROUPS_FILE)
    }

    /// Path of the memberships file.
    #[must_use]
    pub fn memberships_path(&self) -> PathBuf {
        self.data_dir.join(MEMBERSHIPS_FILE)
    }

    /// Load all three files.
    ///
    /// A missing file is an empty collection. Lines that cannot be decoded
    /// are skipped with a warning, as are repeated memberships.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be read.
    pub fn load(&self) -> Result<Dataset> {
        let contacts = read_records(&self.contacts_path(), codec::decode_contact)?;
        let groups = read_records(&self.groups_path(), codec::decode_group)?;

        let mut memberships: Vec<Membership> = Vec::new();
        for m in read_records(&self.memberships_path(), codec::decode_membership)? {
            if memberships.contains(&m) {
                warn!(
                    "Ignoring repeated membership {}|{}",
                    m.contact_id, m.group_id
                );
            } else {
                memberships.push(m);
            }
        }

        debug!(
            "Loaded {} contacts, {} groups, {} memberships",
            contacts.len(),
            groups.len(),
            memberships.len()
        );
        Ok(Dataset {
            contacts,
            groups,
            memberships,
        })
    }

    /// Rewrite all three files from the dataset.
    ///
    /// Nothing on disk changes unless all three new files could be written.
    ///
    /// # Errors
    ///
    /// Returns an error if any file cannot be written.
    pub fn save(&self, data: &Dataset) -> Result<()> {
        write_files(vec![
            (
                self.contacts_path(),
                render(data.contacts.iter().map(codec::encode_contact)),
            ),
            (
                self.groups_path(),
                render(data.groups.iter().map(codec::encode_group)),
            ),
            (
                self.memberships_path(),
                render(data.memberships.iter().copied().map(codec::encode_membership)),
            ),
        ])?;
        debug!("Saved data to {}", self.data_dir.display());
        Ok(())
    }

    /// Get storage statistics for the given dataset.
    #[must_use]
    pub fn stats(&self, data: &Dataset) -> StorageStats {
        let size = |path: PathBuf| fs::metadata(path).map(|m| m.len()).unwrap_or(0);
        StorageStats {
            data_dir: self.data_dir.clone(),
            total_contacts: data.contacts.len(),
            favorite_contacts: data.contacts.iter().filter(|c| c.is_favorite).count(),
            total_groups: data.groups.len(),
            total_memberships: data.memberships.len(),
            size_bytes: size(self.contacts_path())
                + size(self.groups_path())
                + size(self.memberships_path()),
        }
    }
}

/// Read and decode every non-blank line of a file.
fn read_records<T, E: std::fmt::Display>(
    path: &Path,
    decode: impl Fn(&str) -> std::result::Result<T, E>,
) -> Result<Vec<T>> {
    if !path.exists() {
        debug!("{} does not exist yet", path.display());
        return Ok(Vec::new());
    }

    let text = fs::read_to_string(path).map_err(|source| Error::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let mut records = Vec::new();
    for (index, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match decode(line) {
            Ok(record) => records.push(record),
            Err(e) => warn!(
                "Skipping line {} of {}: {}",
                index + 1,
                path.display(),
                e
            ),
        }
    }
    Ok(records)
}

fn render(lines: impl Iterator<Item = String>) -> String {
    let mut text = String::new();
    for line in lines {
        text.push_str(&line);
        text.push('\n');
    }
    text
}

/// Sibling of `path` with `.tmp` appended to the whole file name.
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn discard(staged: &[(PathBuf, PathBuf)]) {
    for (tmp, _) in staged {
        if let Err(e) = fs::remove_file(tmp) {
            warn!("Could not remove {}: {}", tmp.display(), e);
        }
    }
}

/// Write every file to its temp sibling, then rename them all into place.
///
/// If any temp write fails, the temp files already written are removed and
/// no target file is touched.
fn write_files(files: Vec<(PathBuf, String)>) -> Result<()> {
    let mut staged: Vec<(PathBuf, PathBuf)> = Vec::with_capacity(files.len());
    for (path, text) in files {
        let tmp = temp_path(&path);
        if let Err(source) = fs::write(&tmp, text) {
            discard(&staged);
            return Err(Error::FileWrite { path, source });
        }
        staged.push((tmp, path));
    }

    for (index, (tmp, path)) in staged.iter().enumerate() {
        if let Err(source) = fs::rename(tmp, path) {
            discard(&staged[index..]);
            return Err(Error::FileWrite {
                path: path.clone(),
                source,
            });
        }
    }
    Ok(())
}

/// Write lines to a sibling temp file, then rename it over `path`.
pub(crate) fn write_lines(path: &Path, lines: impl Iterator<Item = String>) -> Result<()> {
    write_files(vec![(path.to_path_buf(), render(lines))])
}

/// Statistics about the stored address book.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct StorageStats {
    /// Directory holding the data files.
    pub data_dir: PathBuf,
    /// Number of contacts.
    pub total_contacts: usize,
    /// Number of starred contacts.
    pub favorite_contacts: usize,
    /// Number of groups.
    pub total_groups: usize,
    /// Number of contact/group pairs.
    pub total_memberships: usize,
    /// Combined size of the data files in bytes.
    pub size_bytes: u64,
}

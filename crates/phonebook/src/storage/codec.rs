//! Pipe-delimited line format for the data files.
//!
//! One record per line, fields separated by `|`, no quoting. Fields are
//! validated on the way in so they never contain the separator.

use chrono::NaiveDateTime;
use thiserror::Error;
use tracing::warn;

use crate::model::{now, Contact, Group, Membership, TIMESTAMP_FORMAT};

/// Field separator.
pub const SEPARATOR: char = '|';

/// Header written at the top of exported contact files.
pub const EXPORT_HEADER: &str = "ID|FullName|Phone|Email|Address|Note|Favorite|CreatedAt";

/// Marker identifying a header line on import.
pub const HEADER_MARKER: &str = "ID|";

/// Why a line could not be decoded.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LineError {
    /// The line has fewer fields than the record needs.
    #[error("expected at least {expected} fields, found {found}")]
    TooFewFields {
        /// Minimum field count.
        expected: usize,
        /// Fields present.
        found: usize,
    },

    /// A relation line must have exactly two fields.
    #[error("expected exactly {expected} fields, found {found}")]
    WrongFieldCount {
        /// Required field count.
        expected: usize,
        /// Fields present.
        found: usize,
    },

    /// An id field is not a number.
    #[error("invalid id '{0}'")]
    InvalidId(String),
}

fn split(line: &str) -> Vec<&str> {
    line.trim().split(SEPARATOR).collect()
}

fn parse_id(field: &str) -> Result<u32, LineError> {
    field
        .trim()
        .parse()
        .map_err(|_| LineError::InvalidId(field.to_string()))
}

fn bool_text(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

/// Encode a contact as a data-file line (without the newline).
#[must_use]
pub fn encode_contact(contact: &Contact) -> String {
    format!(
        "{}|{}|{}|{}|{}|{}|{}|{}",
        contact.id,
        contact.full_name,
        contact.phone_number,
        contact.email,
        contact.address,
        contact.note,
        bool_text(contact.is_favorite),
        contact.created_at_display()
    )
}

/// Decode a contact line.
///
/// Only id, name and phone are mandatory; missing trailing fields take their
/// defaults. An unreadable timestamp is replaced with the current time.
///
/// # Errors
///
/// Returns a [`LineError`] if the line has fewer than three fields or the id
/// is not a number.
pub fn decode_contact(line: &str) -> Result<Contact, LineError> {
    let fields = split(line);
    if fields.len() < 3 {
        return Err(LineError::TooFewFields {
            expected: 3,
            found: fields.len(),
        });
    }
    let field = |i: usize| fields.get(i).copied().unwrap_or_default().to_string();

    let created_at = match fields.get(7) {
        Some(raw) => NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT).unwrap_or_else(|_| {
            warn!("Unreadable created_at '{}', using current time", raw);
            now()
        }),
        None => now(),
    };

    Ok(Contact {
        id: parse_id(fields[0])?,
        full_name: field(1),
        phone_number: field(2),
        email: field(3),
        address: field(4),
        note: field(5),
        is_favorite: fields
            .get(6)
            .is_some_and(|v| v.eq_ignore_ascii_case("true")),
        created_at,
    })
}

/// Encode a group as a data-file line.
#[must_use]
pub fn encode_group(group: &Group) -> String {
    format!("{}|{}|{}", group.id, group.name, group.description)
}

/// Decode a group line; the description is optional.
///
/// # Errors
///
/// Returns a [`LineError`] if the line has fewer than two fields or the id
/// is not a number.
pub fn decode_group(line: &str) -> Result<Group, LineError> {
    let fields = split(line);
    if fields.len() < 2 {
        return Err(LineError::TooFewFields {
            expected: 2,
            found: fields.len(),
        });
    }
    Ok(Group::new(
        parse_id(fields[0])?,
        fields[1],
        fields.get(2).copied().unwrap_or_default(),
    ))
}

/// Encode a membership as `contact_id|group_id`.
#[must_use]
pub fn encode_membership(membership: Membership) -> String {
    format!("{}|{}", membership.contact_id, membership.group_id)
}

/// Decode a membership line.
///
/// # Errors
///
/// Returns a [`LineError`] unless the line is exactly two numeric fields.
pub fn decode_membership(line: &str) -> Result<Membership, LineError> {
    let fields = split(line);
    if fields.len() != 2 {
        return Err(LineError::WrongFieldCount {
            expected: 2,
            found: fields.len(),
        });
    }
    Ok(Membership::new(parse_id(fields[0])?, parse_id(fields[1])?))
}

/// Fields of one import line: name, phone and whatever optional columns exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRecord {
    /// Display name (column 2).
    pub full_name: String,
    /// Phone (column 3).
    pub phone_number: String,
    /// Email (column 4), empty when absent.
    pub email: String,
    /// Address (column 5), empty when absent.
    pub address: String,
    /// Note (column 6), empty when absent.
    pub note: String,
}

/// Decode a line of an export-format file for import.
///
/// The id, favourite and timestamp columns are ignored; imported contacts
/// get fresh values.
///
/// # Errors
///
/// Returns [`LineError::TooFewFields`] if the line has fewer than three fields.
pub fn decode_import(line: &str) -> Result<ImportRecord, LineError> {
    let fields = split(line);
    if fields.len() < 3 {
        return Err(LineError::TooFewFields {
            expected: 3,
            found: fields.len(),
        });
    }
    let field = |i: usize| fields.get(i).copied().unwrap_or_default().to_string();
    Ok(ImportRecord {
        full_name: field(1),
        phone_number: field(2),
        email: field(3),
        address: field(4),
        note: field(5),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NewContact;

    #[test]
    fn test_encode_contact_layout() {
        let mut contact = Contact::new(
            4,
            NewContact::new("Alex Smith", "0901")
                .with_email("alex@example.com")
                .with_address("12 Main St")
                .with_note("met at work"),
        );
        contact.is_favorite = true;
        contact.created_at =
            NaiveDateTime::parse_from_str("2024-03-01 09:30:00", TIMESTAMP_FORMAT).unwrap();

        assert_eq!(
            encode_contact(&contact),
            "4|Alex Smith|0901|alex@example.com|12 Main St|met at work|True|2024-03-01 09:30:00"
        );
    }

    #[test]
    fn test_decode_contact_full_line() {
        let contact =
            decode_contact("7|Bob|0902|bob@x.io|Hanoi|friend|False|2023-12-31 23:59:59\n")
                .unwrap();
        assert_eq!(contact.id, 7);
        assert_eq!(contact.full_name, "Bob");
        assert_eq!(contact.phone_number, "0902");
        assert_eq!(contact.email, "bob@x.io");
        assert_eq!(contact.address, "Hanoi");
        assert_eq!(contact.note, "friend");
        assert!(!contact.is_favorite);
        assert_eq!(contact.created_at_display(), "2023-12-31 23:59:59");
    }

    #[test]
    fn test_decode_contact_short_line_uses_defaults() {
        let contact = decode_contact("2|Cara|0903").unwrap();
        assert_eq!(contact.email, "");
        assert_eq!(contact.note, "");
        assert!(!contact.is_favorite);
    }

    #[test]
    fn test_decode_contact_favorite_case_insensitive() {
        let contact = decode_contact("2|Cara|0903||||true|2024-01-01 00:00:00").unwrap();
        assert!(contact.is_favorite);
    }

    #[test]
    fn test_decode_contact_errors() {
        assert_eq!(
            decode_contact("1|OnlyName"),
            Err(LineError::TooFewFields {
                expected: 3,
                found: 2
            })
        );
        assert_eq!(
            decode_contact("x|Name|0901"),
            Err(LineError::InvalidId("x".to_string()))
        );
    }

    #[test]
    fn test_decode_contact_bad_timestamp_falls_back() {
        let contact = decode_contact("1|A|0901||||False|yesterday").unwrap();
        assert_eq!(contact.created_at_display().len(), 19);
    }

    #[test]
    fn test_group_lines() {
        let group = Group::new(3, "Family", "close relatives");
        assert_eq!(encode_group(&group), "3|Family|close relatives");
        assert_eq!(decode_group("3|Family|close relatives").unwrap(), group);
        assert_eq!(decode_group("5|Work").unwrap().description, "");
        assert!(decode_group("5").is_err());
    }

    #[test]
    fn test_membership_lines() {
        let m = Membership::new(4, 9);
        assert_eq!(encode_membership(m), "4|9");
        assert_eq!(decode_membership("4|9\n").unwrap(), m);
        assert!(matches!(
            decode_membership("4|9|1"),
            Err(LineError::WrongFieldCount { .. })
        ));
        assert!(matches!(
            decode_membership("4|a"),
            Err(LineError::InvalidId(_))
        ));
    }

    #[test]
    fn test_decode_import_reads_optional_columns() {
        let record = decode_import("1|Dana|0904|dana@x.io|Hue|note|True|2024-01-01 00:00:00")
            .unwrap();
        assert_eq!(record.full_name, "Dana");
        assert_eq!(record.phone_number, "0904");
        assert_eq!(record.email, "dana@x.io");
        assert_eq!(record.address, "Hue");
        assert_eq!(record.note, "note");

        let short = decode_import("|Eve|0905").unwrap();
        assert_eq!(short.email, "");
        assert!(decode_import("only|two").is_err());
    }

    #[test]
    fn test_export_header_has_marker() {
        assert!(EXPORT_HEADER.starts_with(HEADER_MARKER));
        assert_eq!(EXPORT_HEADER.split(SEPARATOR).count(), 8);
    }
}

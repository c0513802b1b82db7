//! Input validation shared by the service and the import path.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{Error, Result};
use crate::model::{ContactUpdate, NewContact};

/// Loose shape check: `local@domain.tld`.
const EMAIL_PATTERN: &str = r"^[\w.-]+@[\w.-]+\.\w+$";

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern is valid"))
}

/// An empty email is allowed; anything else must look like an address.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    email.is_empty() || email_regex().is_match(email)
}

/// Reject values the pipe-delimited store can't round-trip.
///
/// # Errors
///
/// Returns [`Error::ReservedCharacter`] naming `field`.
pub fn storable(field: &'static str, value: &str) -> Result<()> {
    if value.contains(['|', '\n', '\r']) {
        return Err(Error::ReservedCharacter { field });
    }
    Ok(())
}

/// Validate the fields of a contact about to be created.
///
/// Uniqueness is checked by the caller, which owns the contact list.
///
/// # Errors
///
/// Returns an error if the phone is missing, the email is malformed or a
/// field contains a reserved character.
pub fn new_contact(input: &NewContact) -> Result<()> {
    if input.phone_number.is_empty() {
        return Err(Error::PhoneRequired);
    }
    if !is_valid_email(&input.email) {
        return Err(Error::invalid_email(&input.email));
    }
    storable("full_name", &input.full_name)?;
    storable("phone_number", &input.phone_number)?;
    storable("email", &input.email)?;
    storable("address", &input.address)?;
    storable("note", &input.note)
}

/// Validate a contact update. Empty fields mean "unchanged" and always pass.
///
/// # Errors
///
/// Returns an error if a non-empty email is malformed or a field contains a
/// reserved character.
pub fn contact_update(update: &ContactUpdate) -> Result<()> {
    if !is_valid_email(&update.email) {
        return Err(Error::invalid_email(&update.email));
    }
    storable("full_name", &update.full_name)?;
    storable("phone_number", &update.phone_number)?;
    storable("email", &update.email)?;
    storable("address", &update.address)?;
    storable("note", &update.note)
}

/// Validate group fields. `name` may be blank only when `required` is false.
///
/// # Errors
///
/// Returns an error if a required name is missing or a field contains a
/// reserved character.
pub fn group(name: &str, description: &str, required: bool) -> Result<()> {
    if required && name.trim().is_empty() {
        return Err(Error::GroupNameRequired);
    }
    storable("name", name)?;
    storable("description", description)
}

//! `phonebook` - a terminal address book
//!
//! This library provides contacts, groups and group membership kept in memory
//! and persisted to pipe-delimited text files, along with the interactive menu
//! and command-line front ends built on top of them.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod menu;
pub mod model;
pub mod service;
pub mod storage;
pub mod validate;

pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use model::{Contact, ContactUpdate, Group, Membership, NewContact, SortOrder};
pub use service::{ImportReport, PhoneBook};
pub use storage::{Storage, StorageStats};

//! Error types for orapass lookups

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
/// Errors that end a credential lookup
pub enum Error {
    /// A candidate or the resolved file could not be stat'ed or opened
    #[error("Could not access {}: {source}", path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The resolved file is readable by someone other than its owner
    #[error(
        "Permissions on {} are incorrect. Should be {expected:o}, got {actual:o}",
        path.display()
    )]
    PermissionPolicy {
        path: PathBuf,
        expected: u32,
        actual: u32,
    },
    /// No orapass file was found, or none of its entries matched
    #[error("{}", no_entry_message(path.as_deref()))]
    NoEntryFound { path: Option<PathBuf> },
    /// Reading lines from the resolved file failed part way through
    #[error("Error reading {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn no_entry_message(path: Option<&Path>) -> String {
    match path {
        Some(path) => format!(
            "Could not find a suitable password entry in {}",
            path.display()
        ),
        None => "Could not find a suitable password entry: no orapass file found".to_string(),
    }
}

pub type Result<T> = std::result::Result<T, Error>;

//! ICCID config loading
//!
//! Reads `{"iccid": ["...", ...]}` from disk exactly once and turns it into an
//! [`IccidCollection`]. Every failure is reported as a [`LoadError`]; deciding
//! whether it ends the process is left to the caller.

use log::{debug, info, warn};
use serde_json::Value;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use crate::constants::ICCID_FIELD;
use crate::fixture::IccidCollection;
use crate::identifiers::looks_like_iccid;

/// Errors raised while loading the ICCID config
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("cannot open ICCID config {}: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("ICCID config {} is empty", path.display())]
    Empty { path: PathBuf },

    #[error("short read on {}: expected {expected} bytes, got {read}", path.display())]
    ShortRead {
        path: PathBuf,
        expected: u64,
        read: usize,
    },

    #[error("ICCID config {} is not valid JSON: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("ICCID config {} has no `{field}` array", path.display())]
    MissingField { path: PathBuf, field: &'static str },

    #[error("cannot allocate storage for {count} ICCIDs")]
    Allocation { count: usize },
}

/// Load the ICCID collection from `path`
pub fn load_iccids(path: &Path) -> Result<IccidCollection, LoadError> {
    info!("Checking iccid config {}", path.display());

    let content = read_config(path)?;
    let document: Value =
        serde_json::from_slice(&content).map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    drop(content);

    let entries = iccids_from_document(path, &document)?;
    info!("Number of iccid : {}", entries.len());
    Ok(IccidCollection::from_entries(entries))
}

/// Read the whole file, checking it is non-empty and fully read
fn read_config(path: &Path) -> Result<Vec<u8>, LoadError> {
    let unreadable = |source| LoadError::Unreadable {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::open(path).map_err(unreadable)?;
    let expected = file.metadata().map_err(unreadable)?.len();
    if expected == 0 {
        return Err(LoadError::Empty {
            path: path.to_path_buf(),
        });
    }

    let mut content = Vec::new();
    content
        .try_reserve_exact(expected as usize)
        .map_err(|_| LoadError::Allocation {
            count: expected as usize,
        })?;
    let read = file.read_to_end(&mut content).map_err(unreadable)?;
    if read as u64 != expected {
        return Err(LoadError::ShortRead {
            path: path.to_path_buf(),
            expected,
            read,
        });
    }

    if content.iter().all(|b| b.is_ascii_whitespace()) {
        return Err(LoadError::Empty {
            path: path.to_path_buf(),
        });
    }

    debug!("Read {} bytes from {}", read, path.display());
    Ok(content)
}

/// Extract the ICCID strings from a parsed document.
///
/// Non-string and empty entries are skipped; the returned vector never holds
/// more than the array's declared length.
pub fn iccids_from_document(path: &Path, document: &Value) -> Result<Vec<String>, LoadError> {
    let array = document
        .get(ICCID_FIELD)
        .and_then(Value::as_array)
        .ok_or_else(|| LoadError::MissingField {
            path: path.to_path_buf(),
            field: ICCID_FIELD,
        })?;

    let declared = array.len();
    let mut entries: Vec<String> = Vec::new();
    entries
        .try_reserve_exact(declared)
        .map_err(|_| LoadError::Allocation { count: declared })?;

    for (index, item) in array.iter().take(declared).enumerate() {
        match item.as_str() {
            Some("") => warn!("Skipping empty iccid at index {}", index),
            Some(iccid) => {
                if !looks_like_iccid(iccid) {
                    warn!("iccid at index {} does not look like an ICCID: {:?}", index, iccid);
                }
                entries.push(iccid.to_string());
            }
            None => warn!("Skipping non-string iccid at index {}: {}", index, item),
        }
    }

    Ok(entries)
}

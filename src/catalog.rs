//! Catalog
//!
//! Ordered, read-only collections of chord qualities or scales. Built-in
//! catalogs come from the known kinds; user catalogs are loaded from JSON.

use serde::{de::DeserializeOwned, Serialize};
use std::{collections::HashSet, io::Read};
use thiserror::Error;

use crate::named_interval::{NamedInterval, MAX_INTERVAL};

/// Errors when building or loading a catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The JSON document could not be parsed.
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    /// The catalog source could not be read.
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    /// An entry is malformed.
    #[error("invalid catalog entry `{name}`: {msg}")]
    Invalid {
        /// Name of the offending entry.
        name: String,
        /// What is wrong with it.
        msg: String,
    },
}

/// Case folding shared by duplicate detection and lookup.
fn fold_case(name: &str) -> String {
    name.to_lowercase()
}

/// An ordered collection of named interval shapes.
///
/// Entry order is significant: finders report matches with the same root
/// in catalog order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog<T> {
    entries: Vec<T>,
}

impl<T: NamedInterval> Catalog<T> {
    /// Build a catalog, rejecting empty shapes, offsets above
    /// [`MAX_INTERVAL`] and duplicate names.
    pub fn new(entries: Vec<T>) -> Result<Self, CatalogError> {
        let mut names = HashSet::with_capacity(entries.len());
        for entry in &entries {
            let name = entry.name();
            if name.trim().is_empty() {
                return Err(CatalogError::Invalid {
                    name: name.to_string(),
                    msg: "name cannot be empty".into(),
                });
            }
            if entry.intervals().is_empty() {
                return Err(CatalogError::Invalid {
                    name: name.to_string(),
                    msg: "interval list cannot be empty".into(),
                });
            }
            if let Some(&off) = entry.intervals().iter().find(|&&off| off > MAX_INTERVAL) {
                return Err(CatalogError::Invalid {
                    name: name.to_string(),
                    msg: format!("interval {off} exceeds {MAX_INTERVAL}"),
                });
            }
            if !names.insert(fold_case(name)) {
                return Err(CatalogError::Invalid {
                    name: name.to_string(),
                    msg: "duplicate name".into(),
                });
            }
        }
        Ok(Catalog { entries })
    }

    /// Wrap entries already known to be valid.
    pub(crate) fn from_trusted(entries: Vec<T>) -> Self {
        Catalog { entries }
    }

    /// Entries in catalog order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.entries.iter()
    }

    /// Entries in catalog order.
    pub fn as_slice(&self) -> &[T] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Case-insensitive lookup by name or short name.
    ///
    /// Names are tried first. Short names are then matched exactly before
    /// falling back to case-insensitive, so `"M7"` can still reach `"m7"`
    /// when no entry is spelled `"M7"`.
    pub fn get(&self, name: &str) -> Option<&T> {
        self.position(name)
            .or_else(|| {
                self.entries
                    .iter()
                    .position(|e| e.short_name() == Some(name))
            })
            .or_else(|| {
                let key = fold_case(name);
                self.entries
                    .iter()
                    .position(|e| e.short_name().map(fold_case).as_deref() == Some(key.as_str()))
            })
            .and_then(|idx| self.entries.get(idx))
    }

    /// Position of the entry called `name`, case-insensitive.
    pub fn position(&self, name: &str) -> Option<usize> {
        let key = fold_case(name);
        self.entries.iter().position(|e| fold_case(e.name()) == key)
    }
}

impl<T: NamedInterval + DeserializeOwned> Catalog<T> {
    /// Parse a JSON array of entries.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let entries: Vec<T> = serde_json::from_str(json)?;
        let catalog = Self::new(entries)?;
        log::debug!("loaded catalog with {} entries", catalog.len());
        Ok(catalog)
    }

    /// Read a JSON array of entries from `reader`.
    pub fn from_json_reader<R: Read>(mut reader: R) -> Result<Self, CatalogError> {
        let mut json = String::new();
        reader.read_to_string(&mut json)?;
        Self::from_json_str(&json)
    }
}

impl<T: Serialize> Catalog<T> {
    /// Serialize the catalog as a JSON array.
    pub fn to_json_string(&self) -> Result<String, CatalogError> {
        Ok(serde_json::to_string_pretty(&self.entries)?)
    }
}

impl<'a, T> IntoIterator for &'a Catalog<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

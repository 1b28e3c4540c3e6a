use crate::emit::UNKNOWN_ERROR;
use crate::entry::ErrnoEntry;
use crate::ErrtabError;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Errno number to message, folded from an entry stream.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ErrnoTable {
    messages: BTreeMap<u32, String>,
    duplicates: Vec<u32>,
}

impl ErrnoTable {
    /// Fold `entries` into a table. A later entry for the same number replaces
    /// the earlier one; vendor files list deprecated aliases before the
    /// canonical name.
    ///
    /// Entries without a number cannot be placed and are skipped. If nothing
    /// is left the input did not match the expected format, which is reported
    /// as [`ErrtabError::EmptyInput`] rather than producing an empty table.
    pub fn from_entries<I>(entries: I) -> Result<ErrnoTable, ErrtabError>
    where
        I: IntoIterator<Item = ErrnoEntry>,
    {
        let mut table = ErrnoTable::default();

        for entry in entries {
            let Some(number) = entry.number else {
                debug!("skipping {}: no errno number in source", entry.label());
                continue;
            };

            if let Some(previous) = table.messages.insert(number, entry.message) {
                warn!(
                    "errno {number} listed more than once; replacing {previous:?} with {}",
                    entry.name.as_deref().unwrap_or("later entry")
                );
                table.duplicates.push(number);
            }
        }

        if table.messages.is_empty() {
            return Err(ErrtabError::EmptyInput);
        }

        Ok(table)
    }

    pub fn get(&self, number: u32) -> Option<&str> {
        self.messages.get(&number).map(String::as_str)
    }

    /// The highest errno in the table.
    pub fn elast(&self) -> Option<u32> {
        self.messages.keys().next_back().copied()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.messages.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Numbers that appeared more than once, in the order the repeats were seen.
    pub fn duplicates(&self) -> &[u32] {
        &self.duplicates
    }

    /// Numbers in `0..=elast` with no message.
    pub fn gaps(&self) -> Vec<u32> {
        match self.elast() {
            Some(elast) => (0..=elast)
                .filter(|n| !self.messages.contains_key(n))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Message for `eno` with the semantics of the generated dense table.
    pub fn lookup(&self, eno: i32) -> &str {
        u32::try_from(eno)
            .ok()
            .and_then(|n| self.get(n))
            .unwrap_or(UNKNOWN_ERROR)
    }
}

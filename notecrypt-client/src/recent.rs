//! Most-recently-used list of selected items.
//!
//! Holds at most `RECENT_CAPACITY` entries keyed by `id`, newest first.
//! Not part of the key protocol; persisted as a JSON file.

use crate::error::{ClientError, ClientResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

pub const RECENT_CAPACITY: usize = 10;

/// A remembered item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecentItem {
    pub id: i64,
    #[serde(alias = "stud_nr")]
    pub identifier: String,
    #[serde(default, alias = "graduated")]
    pub flag: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecentItems {
    items: Vec<RecentItem>,
}

impl RecentItems {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a list from `path`.
    ///
    /// A missing, unreadable or malformed file yields an empty list.
    pub fn load(path: &Path) -> Self {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::new(),
            Err(e) => {
                warn!("could not read recent items from {}: {e}", path.display());
                return Self::new();
            }
        };

        match serde_json::from_str::<Vec<RecentItem>>(&raw) {
            Ok(mut items) => {
                items.truncate(RECENT_CAPACITY);
                Self { items }
            }
            Err(e) => {
                warn!("ignoring malformed recent items file {}: {e}", path.display());
                Self::new()
            }
        }
    }

    pub fn save(&self, path: &Path) -> ClientResult<()> {
        let json = serde_json::to_string(&self.items)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| ClientError::Storage(format!("{}: {e}", parent.display())))?;
        }
        std::fs::write(path, json)
            .map_err(|e| ClientError::Storage(format!("{}: {e}", path.display())))
    }

    /// Moves `item` to the front, replacing any entry with the same id.
    ///
    /// Items with a non-positive id are ignored.
    pub fn touch(&mut self, item: RecentItem) {
        if item.id <= 0 {
            return;
        }
        self.items.retain(|existing| existing.id != item.id);
        self.items.insert(0, item);
        self.items.truncate(RECENT_CAPACITY);
    }

    pub fn items(&self) -> &[RecentItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

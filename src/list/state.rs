//! View-model types of a list screen.

use serde::Serialize;

use crate::remote::RemoteError;

/// How the list is embedded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListMode {
    /// Full-page list mirrored into the URL
    #[default]
    Routed,
    /// List inside a dialog; never touches the URL
    Modal,
}

/// Load state of a list screen
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ListPhase {
    #[default]
    Idle,
    Loading,
    Ready,
    Error(RemoteError),
}

/// A fetch failure that was downgraded instead of shown as an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoftError {
    BadIdentifier,
}

/// A fetched record plus the identifier used for selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row<R> {
    pub uuid: String,
    pub label: String,
    pub record: R,
}

/// What a renderer needs for one row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowView {
    pub uuid: String,
    pub cells: Vec<String>,
    pub selected: bool,
    /// The row's action control is rendered disabled
    pub control_disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selected {
    pub uuid: String,
    pub label: String,
}

/// Checked rows, in the order they were checked.
///
/// Survives fetches; only cleared explicitly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    entries: Vec<Selected>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, uuid: &str) -> bool {
        self.entries.iter().any(|e| e.uuid == uuid)
    }

    /// Add a row. Returns false if it was already selected.
    pub fn select(&mut self, uuid: impl Into<String>, label: impl Into<String>) -> bool {
        let uuid = uuid.into();
        if self.contains(&uuid) {
            return false;
        }
        self.entries.push(Selected {
            uuid,
            label: label.into(),
        });
        true
    }

    pub fn deselect(&mut self, uuid: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.uuid != uuid);
        self.entries.len() != before
    }

    /// Flip a row's membership. Returns true if the row is now selected.
    pub fn toggle(&mut self, uuid: &str, label: &str) -> bool {
        if self.deselect(uuid) {
            false
        } else {
            self.select(uuid, label)
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Selected> {
        self.entries.iter()
    }

    pub fn uuids(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.uuid.clone()).collect()
    }
}

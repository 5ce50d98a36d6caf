//! Sort state of a list screen.
//!
//! Sorting references a fixed column list by index. Only columns marked
//! sortable may be selected; the backend receives the column key as
//! `order_by`, prefixed with `-` for descending order.

use crate::error::{RbacError, Result};

/// A column of a list table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    /// Field name understood by the backend's `order_by`
    pub key: &'static str,
    pub title: &'static str,
    pub sortable: bool,
}

impl Column {
    pub const fn sortable(key: &'static str, title: &'static str) -> Self {
        Self {
            key,
            title,
            sortable: true,
        }
    }

    pub const fn fixed(key: &'static str, title: &'static str) -> Self {
        Self {
            key,
            title,
            sortable: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

enum_str!(SortDirection, "sort direction", {
    Ascending => "asc",
    Descending => "desc",
});

impl SortDirection {
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub column_index: usize,
    pub direction: SortDirection,
}

impl SortState {
    /// Sort by `columns[column_index]`, which must exist and be sortable.
    pub fn new(
        columns: &[Column],
        entity: &'static str,
        column_index: usize,
        direction: SortDirection,
    ) -> Result<Self> {
        match columns.get(column_index) {
            Some(column) if column.sortable => Ok(Self {
                column_index,
                direction,
            }),
            _ => Err(RbacError::InvalidColumn(column_index, entity)),
        }
    }

    /// Sort by the column whose key is `key`
    pub fn by_key(
        columns: &[Column],
        entity: &'static str,
        key: &str,
        direction: SortDirection,
    ) -> Result<Self> {
        let index = columns
            .iter()
            .position(|c| c.key.eq_ignore_ascii_case(key))
            .ok_or_else(|| {
                RbacError::InvalidValue(
                    "sort column",
                    key.to_string(),
                    columns
                        .iter()
                        .filter(|c| c.sortable)
                        .map(|c| c.key)
                        .collect::<Vec<_>>()
                        .join(", "),
                )
            })?;
        Self::new(columns, entity, index, direction)
    }

    /// The `order_by` parameter for this state
    pub fn order_by(&self, columns: &[Column]) -> Option<String> {
        let column = columns.get(self.column_index)?;
        Some(match self.direction {
            SortDirection::Ascending => column.key.to_string(),
            SortDirection::Descending => format!("-{}", column.key),
        })
    }

    /// State after a click on a column header: the same column flips its
    /// direction, another column starts ascending.
    pub fn clicked(
        &self,
        columns: &[Column],
        entity: &'static str,
        column_index: usize,
    ) -> Result<Self> {
        let direction = if column_index == self.column_index {
            self.direction.reversed()
        } else {
            SortDirection::Ascending
        };
        Self::new(columns, entity, column_index, direction)
    }
}

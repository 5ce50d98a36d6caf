//! List screens: state, controller and the async driver around it.

pub mod add_group;
pub mod controller;
pub mod entity;
pub mod group_detail;
pub mod screen;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

pub use add_group::{AddGroupOutcome, CancelOutcome, cancel_new_group, confirm_cancel, submit_new_group};
pub use controller::{Completion, ListController, ListOptions, PendingFetch};
pub use entity::{GROUP_FILTERS, Groups, ListEntity, USER_FILTERS, Users};
pub use group_detail::{GroupDetail, load_group_detail};
pub use screen::{ListScreen, Refusal};
pub use state::{ListMode, ListPhase, Row, RowView, Selected, SelectionSet, SoftError};

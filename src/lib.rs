#[macro_use]
mod macros;

pub mod cli;
pub mod commands;
pub mod config;
pub mod display;
pub mod error;
pub mod list;
pub mod notify;
pub mod query;
pub mod remote;
pub mod types;

pub use config::Config;
pub use error::{RbacError, Result};
pub use list::{Groups, ListController, ListOptions, ListScreen, Users};
pub use notify::{MutationOutcome, Notification, Notifier, Variant};
pub use query::{FilterSet, FilterValue, Location, PaginationState, UrlState};
pub use remote::{HttpRbacApi, RbacApi, RemoteError};
pub use types::{Identity, PrivilegeTier, UserStatus};

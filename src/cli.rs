use clap::{Args, Parser, Subcommand};

use crate::commands::{
    ListView, UserFilters, cmd_config_get, cmd_config_path, cmd_config_set, cmd_config_show,
    cmd_group_add, cmd_group_edit, cmd_group_members_add, cmd_group_members_rm, cmd_group_rm,
    cmd_group_roles_add, cmd_group_roles_rm, cmd_group_show, cmd_groups_ls, cmd_users_ls,
    cmd_users_set_active, cmd_users_set_org_admin,
};
use crate::remote::NewGroup;
use crate::types::{UserStatus, VALID_USER_STATUSES};

#[derive(Parser)]
#[command(name = "rbac-console")]
#[command(about = "List, filter, and administer RBAC users and groups")]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format flags shared by every command
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct OutputOptions {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Pagination and sorting flags of list commands
#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Start from a list URL, e.g. '/users?status=Inactive&limit=50&offset=0'
    #[arg(long)]
    pub url: Option<String>,

    /// Page number (1-based)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    pub page: Option<u32>,

    /// Rows per page
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    pub limit: Option<u32>,

    /// Column to sort by
    #[arg(long)]
    pub sort: Option<String>,

    /// Sort descending
    #[arg(long)]
    pub desc: bool,
}

impl ListArgs {
    fn into_view(self) -> ListView {
        ListView {
            href: self.url,
            filters: Vec::new(),
            page: self.page,
            limit: self.limit,
            sort: self.sort,
            descending: self.desc,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// List and administer users
    #[command(visible_alias = "u")]
    Users {
        #[command(subcommand)]
        action: UsersAction,
    },

    /// List and administer groups
    #[command(visible_alias = "g")]
    Groups {
        #[command(subcommand)]
        action: GroupsAction,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum UsersAction {
    /// List users
    Ls {
        /// Filter by username (substring)
        #[arg(long)]
        username: Option<String>,

        /// Filter by email (substring)
        #[arg(long)]
        email: Option<String>,

        /// Filter by status; repeat for several (default: Active)
        #[arg(long, value_parser = parse_user_status)]
        status: Vec<UserStatus>,

        /// Show users of every status
        #[arg(long, conflicts_with = "status")]
        all_statuses: bool,

        #[command(flatten)]
        list: ListArgs,

        #[command(flatten)]
        output: OutputOptions,
    },

    /// Activate users
    Activate {
        #[arg(required = true)]
        usernames: Vec<String>,

        #[command(flatten)]
        output: OutputOptions,
    },

    /// Deactivate users
    Deactivate {
        #[arg(required = true)]
        usernames: Vec<String>,

        #[command(flatten)]
        output: OutputOptions,
    },

    /// Grant organization administrator status
    Promote {
        #[arg(required = true)]
        usernames: Vec<String>,

        #[command(flatten)]
        output: OutputOptions,
    },

    /// Revoke organization administrator status
    Demote {
        #[arg(required = true)]
        usernames: Vec<String>,

        #[command(flatten)]
        output: OutputOptions,
    },
}

#[derive(Subcommand)]
pub enum GroupsAction {
    /// List groups
    Ls {
        /// Filter by name (substring)
        #[arg(long)]
        name: Option<String>,

        #[command(flatten)]
        list: ListArgs,

        #[command(flatten)]
        output: OutputOptions,
    },

    /// Show a group with its members and roles
    Show {
        uuid: String,

        #[command(flatten)]
        output: OutputOptions,
    },

    /// Create a group
    Add {
        name: String,

        #[arg(short, long)]
        description: Option<String>,

        /// Username to add; repeat for several
        #[arg(long = "member")]
        members: Vec<String>,

        /// Role uuid to attach; repeat for several
        #[arg(long = "role")]
        roles: Vec<String>,

        #[command(flatten)]
        output: OutputOptions,
    },

    /// Rename a group or change its description
    Edit {
        uuid: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        #[command(flatten)]
        output: OutputOptions,
    },

    /// Delete groups
    Rm {
        #[arg(required = true)]
        uuids: Vec<String>,

        #[command(flatten)]
        output: OutputOptions,
    },

    /// Add or remove group members
    Members {
        #[command(subcommand)]
        action: MembershipAction,
    },

    /// Add or remove group roles
    Roles {
        #[command(subcommand)]
        action: MembershipAction,
    },
}

#[derive(Subcommand)]
pub enum MembershipAction {
    /// Add to the group
    Add {
        /// Group uuid
        uuid: String,

        #[arg(required = true)]
        ids: Vec<String>,

        #[command(flatten)]
        output: OutputOptions,
    },

    /// Remove from the group
    Rm {
        /// Group uuid
        uuid: String,

        #[arg(required = true)]
        ids: Vec<String>,

        #[command(flatten)]
        output: OutputOptions,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show {
        #[command(flatten)]
        output: OutputOptions,
    },
    /// Set a configuration value
    Set {
        /// Configuration key (base_url, auth.token, identity.username, ...)
        key: String,
        /// Value to set
        value: String,
        #[command(flatten)]
        output: OutputOptions,
    },
    /// Get a configuration value
    Get {
        /// Configuration key (base_url, auth.token, identity.username, ...)
        key: String,
        #[command(flatten)]
        output: OutputOptions,
    },
    /// Print the config file location
    Path {
        #[command(flatten)]
        output: OutputOptions,
    },
}

impl Commands {
    /// Execute the command
    pub async fn run(self) -> crate::error::Result<()> {
        match self {
            Commands::Users { action } => match action {
                UsersAction::Ls {
                    username,
                    email,
                    status,
                    all_statuses,
                    list,
                    output,
                } => {
                    let filters = UserFilters {
                        username,
                        email,
                        status,
                        all_statuses,
                    };
                    cmd_users_ls(list.into_view(), filters, output).await
                }
                UsersAction::Activate { usernames, output } => {
                    cmd_users_set_active(&usernames, true, output).await
                }
                UsersAction::Deactivate { usernames, output } => {
                    cmd_users_set_active(&usernames, false, output).await
                }
                UsersAction::Promote { usernames, output } => {
                    cmd_users_set_org_admin(&usernames, true, output).await
                }
                UsersAction::Demote { usernames, output } => {
                    cmd_users_set_org_admin(&usernames, false, output).await
                }
            },

            Commands::Groups { action } => match action {
                GroupsAction::Ls { name, list, output } => {
                    cmd_groups_ls(list.into_view(), name, output).await
                }
                GroupsAction::Show { uuid, output } => cmd_group_show(&uuid, output).await,
                GroupsAction::Add {
                    name,
                    description,
                    members,
                    roles,
                    output,
                } => {
                    let group = NewGroup {
                        name,
                        description,
                        user_list: members,
                        roles_list: roles,
                    };
                    cmd_group_add(group, output).await
                }
                GroupsAction::Edit {
                    uuid,
                    name,
                    description,
                    output,
                } => cmd_group_edit(&uuid, name, description, output).await,
                GroupsAction::Rm { uuids, output } => cmd_group_rm(&uuids, output).await,
                GroupsAction::Members { action } => match action {
                    MembershipAction::Add { uuid, ids, output } => {
                        cmd_group_members_add(&uuid, &ids, output).await
                    }
                    MembershipAction::Rm { uuid, ids, output } => {
                        cmd_group_members_rm(&uuid, &ids, output).await
                    }
                },
                GroupsAction::Roles { action } => match action {
                    MembershipAction::Add { uuid, ids, output } => {
                        cmd_group_roles_add(&uuid, &ids, output).await
                    }
                    MembershipAction::Rm { uuid, ids, output } => {
                        cmd_group_roles_rm(&uuid, &ids, output).await
                    }
                },
            },

            Commands::Config { action } => match action {
                ConfigAction::Show { output } => cmd_config_show(output),
                ConfigAction::Set { key, value, output } => cmd_config_set(&key, &value, output),
                ConfigAction::Get { key, output } => cmd_config_get(&key, output),
                ConfigAction::Path { output } => cmd_config_path(output),
            },
        }
    }
}

fn parse_user_status(s: &str) -> Result<UserStatus, String> {
    s.parse().map_err(|_| {
        format!(
            "Invalid status. Must be one of: {}",
            VALID_USER_STATUSES.join(", ")
        )
    })
}

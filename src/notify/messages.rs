//! Notification message catalog.

use super::{Message, MessageSet, PluralMessages};

pub const DEACTIVATE_USERS: PluralMessages = PluralMessages {
    single: MessageSet {
        success: Message::described("User deactivated", "The user was deactivated successfully."),
        failure: Message::described(
            "Failed deactivating user",
            "The user could not be deactivated. Please try again.",
        ),
    },
    plural: MessageSet {
        success: Message::described(
            "Users deactivated",
            "The selected users were deactivated successfully.",
        ),
        failure: Message::described(
            "Failed deactivating users",
            "The selected users could not be deactivated. Please try again.",
        ),
    },
};

pub const ACTIVATE_USERS: PluralMessages = PluralMessages {
    single: MessageSet {
        success: Message::described("User activated", "The user was activated successfully."),
        failure: Message::described(
            "Failed activating user",
            "The user could not be activated. Please try again.",
        ),
    },
    plural: MessageSet {
        success: Message::described(
            "Users activated",
            "The selected users were activated successfully.",
        ),
        failure: Message::described(
            "Failed activating users",
            "The selected users could not be activated. Please try again.",
        ),
    },
};

pub const PROMOTE_ORG_ADMIN: PluralMessages = PluralMessages {
    single: MessageSet {
        success: Message::new("User is now an organization administrator"),
        failure: Message::new("Failed granting organization administrator status"),
    },
    plural: MessageSet {
        success: Message::new("Users are now organization administrators"),
        failure: Message::new("Failed granting organization administrator status to users"),
    },
};

pub const DEMOTE_ORG_ADMIN: PluralMessages = PluralMessages {
    single: MessageSet {
        success: Message::new("Organization administrator status removed"),
        failure: Message::new("Failed removing organization administrator status"),
    },
    plural: MessageSet {
        success: Message::new("Organization administrator status removed from users"),
        failure: Message::new("Failed removing organization administrator status from users"),
    },
};

pub const REMOVE_GROUPS: PluralMessages = PluralMessages {
    single: MessageSet {
        success: Message::new("Group deleted successfully"),
        failure: Message::new("Failed deleting group"),
    },
    plural: MessageSet {
        success: Message::new("Groups deleted successfully"),
        failure: Message::new("Failed deleting groups"),
    },
};

pub const ADD_GROUP_MEMBERS: PluralMessages = PluralMessages {
    single: MessageSet {
        success: Message::described("Member added", "The member was added to the group."),
        failure: Message::described(
            "Failed adding member",
            "The member could not be added to the group.",
        ),
    },
    plural: MessageSet {
        success: Message::described("Members added", "The members were added to the group."),
        failure: Message::described(
            "Failed adding members",
            "The members could not be added to the group.",
        ),
    },
};

pub const REMOVE_GROUP_MEMBERS: PluralMessages = PluralMessages {
    single: MessageSet {
        success: Message::described("Member removed", "The member was removed from the group."),
        failure: Message::described(
            "Failed removing member",
            "The member could not be removed from the group.",
        ),
    },
    plural: MessageSet {
        success: Message::described(
            "Members removed",
            "The members were removed from the group.",
        ),
        failure: Message::described(
            "Failed removing members",
            "The members could not be removed from the group.",
        ),
    },
};

pub const ADD_GROUP_ROLES: PluralMessages = PluralMessages {
    single: MessageSet {
        success: Message::described("Role added", "The role was added to the group."),
        failure: Message::described(
            "Failed adding role",
            "The role could not be added to the group.",
        ),
    },
    plural: MessageSet {
        success: Message::described("Roles added", "The roles were added to the group."),
        failure: Message::described(
            "Failed adding roles",
            "The roles could not be added to the group.",
        ),
    },
};

pub const REMOVE_GROUP_ROLES: PluralMessages = PluralMessages {
    single: MessageSet {
        success: Message::described("Role removed", "The role was removed from the group."),
        failure: Message::described(
            "Failed removing role",
            "The role could not be removed from the group.",
        ),
    },
    plural: MessageSet {
        success: Message::described("Roles removed", "The roles were removed from the group."),
        failure: Message::described(
            "Failed removing roles",
            "The roles could not be removed from the group.",
        ),
    },
};

pub const EDIT_GROUP: MessageSet = MessageSet {
    success: Message::described("Group updated", "The group was updated successfully."),
    failure: Message::described(
        "Failed updating group",
        "The group could not be updated. Please try again.",
    ),
};

pub const ADD_GROUP: MessageSet = MessageSet {
    success: Message::described("Group created", "The group was created successfully."),
    failure: Message::described("Failed creating group", "The group could not be created."),
};

pub const ADD_GROUP_NAME_TAKEN: Message = Message::described(
    "Group name already taken",
    "Please choose a different name for the group.",
);

pub const ADD_GROUP_CANCELED: Message = Message::described(
    "Adding group was canceled by the user",
    "The group was not created.",
);

pub const SELF_ACTION_REFUSED: Message = Message::described(
    "Action not allowed",
    "You cannot change the status of your own account.",
);

pub const NOT_PERMITTED: Message = Message::described(
    "Action not allowed",
    "Only organization or user access administrators can manage users.",
);

pub const PROTECTED_GROUP: Message = Message::described(
    "Action not allowed",
    "Default groups are managed by the platform and cannot be removed.",
);

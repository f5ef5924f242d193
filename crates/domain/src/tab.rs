use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tilgang_core::AppError;

/// Top-level navigable section of the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    /// Edit the feature permissions of an access role.
    #[default]
    DefineRole,
    /// Build and submit new role assignments.
    AssignRoles,
    /// Browse users and their current roles.
    UsersAndRoles,
    /// Change or delete existing assignments.
    AdministerRights,
}

impl Tab {
    /// Returns the stable route segment for this tab.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DefineRole => "define-role",
            Self::AssignRoles => "assign-roles",
            Self::UsersAndRoles => "users-and-roles",
            Self::AdministerRights => "administer-rights",
        }
    }
}

impl FromStr for Tab {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "define-role" => Ok(Self::DefineRole),
            "assign-roles" => Ok(Self::AssignRoles),
            "users-and-roles" => Ok(Self::UsersAndRoles),
            "administer-rights" => Ok(Self::AdministerRights),
            _ => Err(AppError::Validation(format!("unknown tab '{value}'"))),
        }
    }
}

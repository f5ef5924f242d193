use serde::{Deserialize, Serialize};

/// Organizational unit tree node.
///
/// The console never materializes the whole tree; it only holds flat lists or
/// the ancestry/children of one unit fetched on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgUnit {
    /// Numeric backend identifier.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// External organizational unit identifier.
    pub organisation_unit_id: String,
    /// External identifier of the parent unit.
    pub parent_ref: String,
    /// Display name of the parent unit, when the backend resolved it.
    pub parent_name: Option<String>,
    /// External identifiers of the child units.
    pub children_ref: Vec<String>,
}

impl OrgUnit {
    /// Returns whether the unit is its own parent, which marks the tree root.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent_ref.is_empty() || self.parent_ref == self.organisation_unit_id
    }
}

/// Per-user assignment overview shown in the "existing assignments" dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAssignmentDetails {
    /// Total number of assigned roles.
    pub total_items: u32,
    /// Total number of pages.
    pub total_pages: u32,
    /// 1-indexed page number.
    pub current_page: u32,
    /// Assigned roles with their organizational units.
    pub access_roles: Vec<AssignedRole>,
}

/// One role of a user assignment overview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignedRole {
    /// Access role identifier.
    pub access_role_id: String,
    /// Access role display name.
    pub access_role_name: String,
    /// Organizational units the role applies to.
    pub org_units: Vec<AssignedOrgUnit>,
}

/// Organizational unit covered by an assigned role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignedOrgUnit {
    /// Scope the unit belongs to.
    pub scope_id: i64,
    /// Object type of the scope.
    pub object_type: String,
    /// External organizational unit identifier.
    pub org_unit_id: String,
    /// Display name.
    pub name: String,
}

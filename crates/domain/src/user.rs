//! User domain types.
//!
//! Users are reference data owned by the backend: the console only reads them
//! page by page and never creates or deletes them.

use serde::{Deserialize, Serialize};

/// A user together with the roles currently assigned to them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Numeric backend identifier.
    pub id: i64,
    /// Stable resource identifier used by assignment endpoints.
    pub resource_id: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// User classifier such as `EMPLOYEESTAFF` or `STUDENT`.
    pub user_type: String,
    /// Login name.
    pub user_name: String,
    /// Role assignments attached to the user.
    pub roles: Vec<UserRole>,
}

impl User {
    /// Returns the display name used in tables and headings.
    #[must_use]
    pub fn full_name(&self) -> String {
        match (self.first_name.trim(), self.last_name.trim()) {
            ("", last) => last.to_owned(),
            (first, "") => first.to_owned(),
            (first, last) => format!("{first} {last}"),
        }
    }

    /// Returns whether the user has at least one role assignment.
    #[must_use]
    pub fn has_assignments(&self) -> bool {
        !self.roles.is_empty()
    }

    /// Finds the assignment for a role, if the user has one.
    #[must_use]
    pub fn role(&self, role_id: &str) -> Option<&UserRole> {
        self.roles.iter().find(|role| role.role_id == role_id)
    }
}

/// A role bound to a user together with the scopes it applies to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRole {
    /// Access role identifier.
    pub role_id: String,
    /// Access role display name.
    pub role_name: String,
    /// Object-type qualified scopes of the assignment.
    pub scopes: Vec<Scope>,
}

impl UserRole {
    /// Returns the distinct object types of this assignment in first-seen order.
    #[must_use]
    pub fn object_types(&self) -> Vec<String> {
        let mut object_types: Vec<String> = Vec::new();
        for scope in &self.scopes {
            if !object_types.contains(&scope.object_type) {
                object_types.push(scope.object_type.clone());
            }
        }
        object_types
    }

    /// Removes an organizational unit from every scope of the assignment.
    ///
    /// Returns whether anything was removed. Scopes left without units are
    /// dropped.
    pub fn remove_org_unit(&mut self, org_unit_id: &str) -> bool {
        let mut removed = false;
        for scope in &mut self.scopes {
            let before = scope.org_units.len();
            scope
                .org_units
                .retain(|org_unit| org_unit.org_unit_id != org_unit_id);
            removed |= scope.org_units.len() != before;
        }
        self.scopes.retain(|scope| !scope.org_units.is_empty());
        removed
    }
}

/// Binds an object type to a set of organizational units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scope {
    /// Backend scope identifier.
    pub scope_id: String,
    /// Object type the scope applies to, for example `student`.
    pub object_type: String,
    /// Organizational units covered by the scope.
    pub org_units: Vec<ScopeOrgUnit>,
}

/// Organizational unit reference inside a scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeOrgUnit {
    /// Display name.
    pub name: String,
    /// External organizational unit identifier.
    pub org_unit_id: String,
    /// Abbreviated name.
    pub short_name: String,
}

//! Role assignment drafts and deletion targets.

use serde::{Deserialize, Serialize};
use tilgang_core::{AppError, AppResult};

use crate::{OrgUnit, User};

/// Object type wildcard meaning "every object type of the role binding".
pub const ALL_OBJECT_TYPES: &str = "*";

/// In-progress assignment built interactively before submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentDraft {
    /// User receiving the role.
    pub user: Option<User>,
    /// Access role to assign.
    pub access_role_id: String,
    /// Scope the assignment is created in.
    pub scope_id: Option<i64>,
    /// Organizational units the role applies to.
    pub org_units: Vec<OrgUnit>,
    /// Applies the role to every organizational unit instead of `org_units`.
    pub apply_to_all_org_units: bool,
}

impl AssignmentDraft {
    /// Returns whether nothing has been entered yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Adds an organizational unit unless it is already part of the draft.
    pub fn add_org_unit(&mut self, org_unit: OrgUnit) -> bool {
        if self.org_units.iter().any(|known| known.id == org_unit.id) {
            return false;
        }
        self.org_units.push(org_unit);
        true
    }

    /// Removes an organizational unit by backend id.
    pub fn remove_org_unit(&mut self, org_unit_id: i64) -> bool {
        let before = self.org_units.len();
        self.org_units.retain(|org_unit| org_unit.id != org_unit_id);
        self.org_units.len() != before
    }

    /// Validates the draft into a request that can be sent to the backend.
    pub fn validate(&self) -> AppResult<NewAssignment> {
        let user = self
            .user
            .as_ref()
            .filter(|user| !user.resource_id.trim().is_empty())
            .ok_or_else(|| AppError::Validation("a user must be selected".to_owned()))?;

        let access_role_id = self.access_role_id.trim();
        if access_role_id.is_empty() {
            return Err(AppError::Validation(
                "an access role must be selected".to_owned(),
            ));
        }

        if self.org_units.is_empty() && !self.apply_to_all_org_units {
            return Err(AppError::Validation(
                "at least one organizational unit must be selected".to_owned(),
            ));
        }

        let org_unit_ids = if self.apply_to_all_org_units {
            Vec::new()
        } else {
            self.org_units
                .iter()
                .map(|org_unit| org_unit.id.to_string())
                .collect()
        };

        Ok(NewAssignment {
            user_resource_id: user.resource_id.clone(),
            access_role_id: access_role_id.to_owned(),
            scope_id: self.scope_id,
            org_unit_ids,
            apply_to_all_org_units: self.apply_to_all_org_units,
        })
    }
}

/// Validated assignment ready for submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAssignment {
    /// Resource id of the user receiving the role.
    pub user_resource_id: String,
    /// Access role to assign.
    pub access_role_id: String,
    /// Scope the assignment is created in.
    pub scope_id: Option<i64>,
    /// Organizational unit ids; empty when applying to all units.
    pub org_unit_ids: Vec<String>,
    /// Applies the role to every organizational unit.
    pub apply_to_all_org_units: bool,
}

/// Which object types of a role binding a deletion removes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectTypeSelector {
    /// Only the binding for this object type.
    Specific(String),
    /// The whole role binding regardless of object type.
    All,
}

impl ObjectTypeSelector {
    /// Returns the value sent to the backend.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Specific(object_type) => object_type.as_str(),
            Self::All => ALL_OBJECT_TYPES,
        }
    }
}

/// State of the delete dialog: the "remove everything" toggle and the chosen object type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteSelection {
    /// Removes the whole role binding regardless of object type.
    pub remove_all_object_types: bool,
    /// Object type picked in the dialog.
    pub object_type: Option<String>,
}

impl DeleteSelection {
    /// Starts a selection preselecting the first known object type.
    #[must_use]
    pub fn for_object_types(object_types: &[String]) -> Self {
        Self {
            remove_all_object_types: false,
            object_type: object_types.first().cloned(),
        }
    }

    /// Flips the "remove everything" toggle. Turning it on forgets the chosen object type.
    pub fn toggle_remove_all(&mut self) {
        self.remove_all_object_types = !self.remove_all_object_types;
        if self.remove_all_object_types {
            self.object_type = None;
        }
    }

    /// Resolves the dialog state into exactly one deletion mode.
    pub fn resolve(&self) -> AppResult<ObjectTypeSelector> {
        if self.remove_all_object_types {
            return Ok(ObjectTypeSelector::All);
        }

        match self.object_type.as_deref().map(str::trim) {
            Some(ALL_OBJECT_TYPES) => Err(AppError::Validation(
                "use the remove-all toggle to delete every object type".to_owned(),
            )),
            Some(object_type) if !object_type.is_empty() => {
                Ok(ObjectTypeSelector::Specific(object_type.to_owned()))
            }
            _ => Err(AppError::Validation(
                "an object type must be selected".to_owned(),
            )),
        }
    }
}

#[cfg(test)]
mod tests;

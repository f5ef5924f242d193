use serde::{Deserialize, Serialize};

/// Access role reference data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Stable access role identifier.
    pub access_role_id: String,
    /// Display name.
    pub name: String,
}

/// Feature reachable through an access role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    /// Feature identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Application path the feature guards.
    pub path: String,
}

/// Operations allowed on one feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureOperation {
    /// Feature identifier.
    pub feature_id: i64,
    /// Feature display name.
    pub feature_name: String,
    /// Allowed operation names, for example `GET` or `POST`.
    pub operations: Vec<String>,
}

impl FeatureOperation {
    /// Returns whether the operation is allowed.
    #[must_use]
    pub fn allows(&self, operation: &str) -> bool {
        self.operations.iter().any(|allowed| allowed == operation)
    }

    /// Adds the operation when missing and removes it when present.
    ///
    /// Returns whether the operation is allowed afterwards.
    pub fn toggle(&mut self, operation: &str) -> bool {
        if self.allows(operation) {
            self.operations.retain(|allowed| allowed != operation);
            false
        } else {
            self.operations.push(operation.to_owned());
            true
        }
    }
}

/// A role and its mapping to features and operation sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionData {
    /// Access role the permissions belong to.
    pub access_role_id: String,
    /// Feature operations granted by the role.
    pub features: Vec<FeatureOperation>,
}

impl PermissionData {
    /// Returns whether this is the placeholder value held before any role is selected.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.access_role_id.is_empty()
    }

    /// Finds the feature with the given id.
    #[must_use]
    pub fn feature_mut(&mut self, feature_id: i64) -> Option<&mut FeatureOperation> {
        self.features
            .iter_mut()
            .find(|feature| feature.feature_id == feature_id)
    }
}

impl Default for PermissionData {
    /// Empty role id with a single unnamed feature and no operations.
    fn default() -> Self {
        Self {
            access_role_id: String::new(),
            features: vec![FeatureOperation {
                feature_id: 1,
                feature_name: String::new(),
                operations: Vec::new(),
            }],
        }
    }
}

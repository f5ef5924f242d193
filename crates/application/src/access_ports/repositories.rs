use async_trait::async_trait;

use tilgang_core::{AppResult, BasePath};
use tilgang_domain::{
    Feature, NewAssignment, ObjectTypeSelector, OrgUnit, Page, PermissionData, Role, User,
    UserAssignmentDetails, UserPageQuery, UserRole,
};

/// Repository port for user lookups.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Lists one page of users matching the query.
    ///
    /// The returned page carries the backend totals; callers clamp it.
    async fn list_users(
        &self,
        base_path: &BasePath,
        query: &UserPageQuery,
    ) -> AppResult<Page<User>>;

    /// Finds a user by resource id. Unknown ids yield `AppError::NotFound`.
    async fn find_user(&self, base_path: &BasePath, resource_id: &str) -> AppResult<User>;

    /// Returns the assignment overview of a user without pagination.
    async fn user_assignment_details(
        &self,
        base_path: &BasePath,
        resource_id: &str,
    ) -> AppResult<UserAssignmentDetails>;
}

/// Repository port for access roles and their permissions.
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Lists every access role.
    async fn list_roles(&self, base_path: &BasePath) -> AppResult<Vec<Role>>;

    /// Lists the features reachable through a role.
    async fn list_features(&self, base_path: &BasePath, role_id: &str) -> AppResult<Vec<Feature>>;

    /// Returns the feature operations granted by a role.
    async fn permission_data(
        &self,
        base_path: &BasePath,
        role_id: &str,
    ) -> AppResult<PermissionData>;

    /// Replaces the feature operations of a role and returns the stored value.
    async fn save_permission_data(
        &self,
        base_path: &BasePath,
        data: &PermissionData,
    ) -> AppResult<PermissionData>;
}

/// Repository port for role assignment writes.
#[async_trait]
pub trait AssignmentRepository: Send + Sync {
    /// Creates a new assignment.
    async fn create_assignment(
        &self,
        base_path: &BasePath,
        assignment: &NewAssignment,
    ) -> AppResult<()>;

    /// Replaces the scopes of an existing role binding.
    async fn update_assignment(
        &self,
        base_path: &BasePath,
        user_resource_id: &str,
        updated: &UserRole,
    ) -> AppResult<UserRole>;

    /// Deletes a role binding for one object type or for all of them.
    async fn delete_assignment(
        &self,
        base_path: &BasePath,
        user_resource_id: &str,
        role_id: &str,
        object_types: &ObjectTypeSelector,
    ) -> AppResult<()>;
}

/// Repository port for organizational units.
#[async_trait]
pub trait OrgUnitRepository: Send + Sync {
    /// Returns the ancestry and children of one organizational unit.
    async fn related_org_units(
        &self,
        base_path: &BasePath,
        org_unit_id: &str,
    ) -> AppResult<Vec<OrgUnit>>;
}

//! JSON schemas of the access management API.
//!
//! Responses are parsed into these structs first and only then converted into
//! domain types, so a body that parses but carries inconsistent values is
//! still reported as a malformed response.

use serde::{Deserialize, Serialize};

use tilgang_core::{AppError, AppResult};
use tilgang_domain::{
    AssignedOrgUnit, AssignedRole, Feature, FeatureOperation, NewAssignment, OrgUnit, Page,
    PermissionData, Role, Scope, ScopeOrgUnit, User, UserAssignmentDetails, UserRole,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserPageDto {
    total_items: u32,
    total_pages: u32,
    current_page: u32,
    users: Vec<UserDto>,
}

impl UserPageDto {
    /// Converts the 0-indexed backend page into a 1-indexed domain page.
    pub(crate) fn into_page(self) -> AppResult<Page<User>> {
        check_page_totals(self.total_items, self.total_pages, self.users.len())?;
        Ok(Page {
            total_items: self.total_items,
            total_pages: self.total_pages,
            current_page: self.current_page.saturating_add(1),
            items: self.users.into_iter().map(User::from).collect(),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserDto {
    id: i64,
    resource_id: String,
    first_name: String,
    last_name: String,
    user_type: String,
    user_name: String,
    #[serde(default)]
    roles: Option<Vec<UserRoleDto>>,
}

impl From<UserDto> for User {
    fn from(value: UserDto) -> Self {
        Self {
            id: value.id,
            resource_id: value.resource_id,
            first_name: value.first_name,
            last_name: value.last_name,
            user_type: value.user_type,
            user_name: value.user_name,
            roles: value
                .roles
                .unwrap_or_default()
                .into_iter()
                .map(UserRole::from)
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserRoleDto {
    role_id: String,
    role_name: String,
    #[serde(default)]
    scopes: Vec<ScopeDto>,
}

impl From<UserRoleDto> for UserRole {
    fn from(value: UserRoleDto) -> Self {
        Self {
            role_id: value.role_id,
            role_name: value.role_name,
            scopes: value.scopes.into_iter().map(Scope::from).collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ScopeDto {
    scope_id: String,
    object_type: String,
    #[serde(default)]
    org_units: Vec<ScopeOrgUnitDto>,
}

impl From<ScopeDto> for Scope {
    fn from(value: ScopeDto) -> Self {
        Self {
            scope_id: value.scope_id,
            object_type: value.object_type,
            org_units: value
                .org_units
                .into_iter()
                .map(|org_unit| ScopeOrgUnit {
                    name: org_unit.name,
                    org_unit_id: org_unit.org_unit_id,
                    short_name: org_unit.short_name,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ScopeOrgUnitDto {
    name: String,
    org_unit_id: String,
    #[serde(default)]
    short_name: String,
}

/// Body of `PUT /accessassignment`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpdateAssignmentBody {
    user_id: String,
    #[serde(flatten)]
    role: UserRoleDto,
}

impl UpdateAssignmentBody {
    pub(crate) fn new(user_resource_id: &str, role: &UserRole) -> Self {
        Self {
            user_id: user_resource_id.to_owned(),
            role: UserRoleDto {
                role_id: role.role_id.clone(),
                role_name: role.role_name.clone(),
                scopes: role
                    .scopes
                    .iter()
                    .map(|scope| ScopeDto {
                        scope_id: scope.scope_id.clone(),
                        object_type: scope.object_type.clone(),
                        org_units: scope
                            .org_units
                            .iter()
                            .map(|org_unit| ScopeOrgUnitDto {
                                name: org_unit.name.clone(),
                                org_unit_id: org_unit.org_unit_id.clone(),
                                short_name: org_unit.short_name.clone(),
                            })
                            .collect(),
                    })
                    .collect(),
            },
        }
    }
}

/// Body of `POST /accessassignment`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NewAssignmentBody<'a> {
    user_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    scope_id: Option<i64>,
    access_role_id: &'a str,
    org_unit_ids: &'a [String],
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    all_org_units: bool,
}

impl<'a> From<&'a NewAssignment> for NewAssignmentBody<'a> {
    fn from(value: &'a NewAssignment) -> Self {
        Self {
            user_id: value.user_resource_id.as_str(),
            scope_id: value.scope_id,
            access_role_id: value.access_role_id.as_str(),
            org_unit_ids: value.org_unit_ids.as_slice(),
            all_org_units: value.apply_to_all_org_units,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RoleDto {
    access_role_id: String,
    name: String,
}

impl From<RoleDto> for Role {
    fn from(value: RoleDto) -> Self {
        Self {
            access_role_id: value.access_role_id,
            name: value.name,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct FeatureDto {
    id: String,
    name: String,
    path: String,
}

impl From<FeatureDto> for Feature {
    fn from(value: FeatureDto) -> Self {
        Self {
            id: value.id,
            name: value.name,
            path: value.path,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PermissionDataDto {
    access_role_id: String,
    features: Vec<FeatureOperationDto>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FeatureOperationDto {
    feature_id: i64,
    feature_name: String,
    operations: Vec<String>,
}

impl PermissionDataDto {
    pub(crate) fn into_domain(self) -> AppResult<PermissionData> {
        if self.access_role_id.trim().is_empty() {
            return Err(AppError::MalformedResponse(
                "permission data without access role id".to_owned(),
            ));
        }

        Ok(PermissionData {
            access_role_id: self.access_role_id,
            features: self
                .features
                .into_iter()
                .map(|feature| FeatureOperation {
                    feature_id: feature.feature_id,
                    feature_name: feature.feature_name,
                    operations: feature.operations,
                })
                .collect(),
        })
    }
}

impl From<&PermissionData> for PermissionDataDto {
    fn from(value: &PermissionData) -> Self {
        Self {
            access_role_id: value.access_role_id.clone(),
            features: value
                .features
                .iter()
                .map(|feature| FeatureOperationDto {
                    feature_id: feature.feature_id,
                    feature_name: feature.feature_name.clone(),
                    operations: feature.operations.clone(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrgUnitDto {
    id: i64,
    name: String,
    organisation_unit_id: String,
    #[serde(default)]
    parent_ref: String,
    #[serde(default)]
    parent_name: Option<String>,
    #[serde(default)]
    children_ref: Vec<String>,
}

impl From<OrgUnitDto> for OrgUnit {
    fn from(value: OrgUnitDto) -> Self {
        Self {
            id: value.id,
            name: value.name,
            organisation_unit_id: value.organisation_unit_id,
            parent_ref: value.parent_ref,
            parent_name: value.parent_name,
            children_ref: value.children_ref,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrgUnitPageDto {
    total_items: u32,
    total_pages: u32,
    org_units: Vec<OrgUnitDto>,
}

impl OrgUnitPageDto {
    pub(crate) fn into_org_units(self) -> AppResult<Vec<OrgUnit>> {
        check_page_totals(self.total_items, self.total_pages, self.org_units.len())?;
        Ok(self.org_units.into_iter().map(OrgUnit::from).collect())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserDetailsPageDto {
    total_items: u32,
    total_pages: u32,
    current_page: u32,
    access_roles: Vec<UserDetailDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserDetailDto {
    access_role_id: String,
    access_role_name: String,
    #[serde(default)]
    org_units: Vec<OrgUnitDetailDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrgUnitDetailDto {
    scope_id: i64,
    object_type: String,
    org_unit_id: String,
    name: String,
}

impl UserDetailsPageDto {
    pub(crate) fn into_details(self) -> AppResult<UserAssignmentDetails> {
        check_page_totals(self.total_items, self.total_pages, self.access_roles.len())?;
        Ok(UserAssignmentDetails {
            total_items: self.total_items,
            total_pages: self.total_pages,
            current_page: self.current_page.saturating_add(1),
            access_roles: self
                .access_roles
                .into_iter()
                .map(|role| AssignedRole {
                    access_role_id: role.access_role_id,
                    access_role_name: role.access_role_name,
                    org_units: role
                        .org_units
                        .into_iter()
                        .map(|org_unit| AssignedOrgUnit {
                            scope_id: org_unit.scope_id,
                            object_type: org_unit.object_type,
                            org_unit_id: org_unit.org_unit_id,
                            name: org_unit.name,
                        })
                        .collect(),
                })
                .collect(),
        })
    }
}

fn check_page_totals(total_items: u32, total_pages: u32, item_count: usize) -> AppResult<()> {
    if total_pages == 0 && item_count > 0 {
        return Err(AppError::MalformedResponse(format!(
            "page reports no pages but carries {item_count} items"
        )));
    }
    if usize::try_from(total_items).is_ok_and(|total| total < item_count) {
        return Err(AppError::MalformedResponse(format!(
            "page reports {total_items} items in total but carries {item_count}"
        )));
    }
    Ok(())
}

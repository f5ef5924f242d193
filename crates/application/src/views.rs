//! View models derived from store state.
//!
//! Everything here is a pure function of snapshots, so presentation code can
//! recompute rows whenever a subscribed store changes.

use tilgang_domain::{
    AssignmentDraft, Page, PageSize, PermissionData, Role, Scope, User, UserAssignmentDetails,
    page_count,
};

/// One row of the user table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserTableRow {
    /// Backend identifier.
    pub user_id: i64,
    /// Resource id used in links to the user.
    pub resource_id: String,
    /// "First Last".
    pub full_name: String,
    /// User type label.
    pub user_type: String,
    /// The user holds at least one role.
    pub has_assignments: bool,
    /// The user is picked in the assignment draft.
    pub selected: bool,
}

/// Builds the user table rows, flagging the user picked in `draft`.
#[must_use]
pub fn user_table_rows(page: &Page<User>, draft: &AssignmentDraft) -> Vec<UserTableRow> {
    let selected_id = draft.user.as_ref().map(|user| user.id);
    page.items
        .iter()
        .map(|user| UserTableRow {
            user_id: user.id,
            resource_id: user.resource_id.clone(),
            full_name: user.full_name(),
            user_type: user.user_type.clone(),
            has_assignments: user.has_assignments(),
            selected: selected_id == Some(user.id),
        })
        .collect()
}

/// Pager state below a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    /// 1-indexed page shown.
    pub current_page: u32,
    /// Number of pages, at least 1.
    pub page_count: u32,
    /// Rows per page.
    pub page_size: PageSize,
    /// Sizes offered in the rows-per-page select.
    pub page_sizes: &'static [PageSize],
}

impl Pagination {
    /// Returns whether a previous page exists.
    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    /// Returns whether a next page exists.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.current_page < self.page_count
    }
}

/// Computes the pager from the item total rather than the server page count.
#[must_use]
pub fn pagination<T>(page: &Page<T>, page_size: PageSize) -> Pagination {
    Pagination {
        current_page: page.current_page.max(1),
        page_count: page_count(page.total_items, page_size),
        page_size,
        page_sizes: PageSize::all(),
    }
}

/// Resolves a role id to its display name, or an empty string.
#[must_use]
pub fn role_name<'a>(roles: &'a [Role], role_id: &str) -> &'a str {
    roles
        .iter()
        .find(|role| role.access_role_id == role_id)
        .map_or("", |role| role.name.as_str())
}

/// Distinct object types a user holds through one role, offered by the delete dialog.
#[must_use]
pub fn object_types_for_role(user: &User, role_id: &str) -> Vec<String> {
    user.role(role_id)
        .map(|role| role.object_types())
        .unwrap_or_default()
}

/// Scopes of one role of a user.
#[must_use]
pub fn scopes_for_role<'a>(user: &'a User, role_id: &str) -> &'a [Scope] {
    user.role(role_id).map_or(&[], |role| role.scopes.as_slice())
}

/// One row of the permissions table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionRow {
    /// Feature identifier, used when toggling.
    pub feature_id: i64,
    /// Feature display name.
    pub feature_name: String,
    /// Allowed operations.
    pub operations: Vec<String>,
}

/// Rows for the permissions table; the placeholder shown before a role is picked has none.
#[must_use]
pub fn permission_rows(data: &PermissionData) -> Vec<PermissionRow> {
    if data.is_placeholder() {
        return Vec::new();
    }

    data.features
        .iter()
        .map(|feature| PermissionRow {
            feature_id: feature.feature_id,
            feature_name: feature.feature_name.clone(),
            operations: feature.operations.clone(),
        })
        .collect()
}

/// One flattened row of a user's assignment overview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignedRoleRow {
    /// Access role identifier.
    pub access_role_id: String,
    /// Access role display name.
    pub role_name: String,
    /// Object type of the scope.
    pub object_type: String,
    /// Organizational unit identifier.
    pub org_unit_id: String,
    /// Organizational unit display name.
    pub org_unit_name: String,
}

/// Flattens roles and their organizational units into table rows.
#[must_use]
pub fn assigned_role_rows(details: &UserAssignmentDetails) -> Vec<AssignedRoleRow> {
    details
        .access_roles
        .iter()
        .flat_map(|role| {
            role.org_units.iter().map(move |org_unit| AssignedRoleRow {
                access_role_id: role.access_role_id.clone(),
                role_name: role.access_role_name.clone(),
                object_type: org_unit.object_type.clone(),
                org_unit_id: org_unit.org_unit_id.clone(),
                org_unit_name: org_unit.name.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use tilgang_domain::{
        AssignedOrgUnit, AssignedRole, AssignmentDraft, Page, PageSize, PermissionData, Role,
        UserAssignmentDetails,
    };

    use crate::test_support::{andersen_users, permission_data, user, user_role};

    use super::{
        assigned_role_rows, object_types_for_role, pagination, permission_rows, role_name,
        scopes_for_role, user_table_rows,
    };

    #[test]
    fn user_rows_flag_draft_user_and_assignments() {
        let mut users = andersen_users();
        users[2].roles = vec![user_role("ata", &["student"])];
        let page = Page::clamped(3, 1, 1, PageSize::Five, users.clone());
        let draft = AssignmentDraft {
            user: Some(users[0].clone()),
            ..AssignmentDraft::default()
        };

        let rows = user_table_rows(&page, &draft);

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].full_name, "Berit Andersen");
        assert!(rows[0].selected);
        assert!(!rows[1].selected);
        assert!(rows[2].has_assignments);
        assert!(!rows[0].has_assignments);
    }

    #[test]
    fn pagination_counts_pages_from_total_items() {
        let page = Page::clamped(
            11,
            1,
            1,
            PageSize::Five,
            vec![user(1, "Elev", "Andersen")],
        );

        let pager = pagination(&page, PageSize::Five);

        assert_eq!(pager.page_count, 3);
        assert!(pager.has_next());
        assert!(!pager.has_previous());
        assert_eq!(pager.page_sizes.len(), 4);
    }

    #[test]
    fn empty_result_still_has_one_page() {
        let page = Page::<()>::clamped(0, 0, 1, PageSize::Ten, Vec::new());

        let pager = pagination(&page, PageSize::Ten);

        assert_eq!(pager.current_page, 1);
        assert_eq!(pager.page_count, 1);
        assert!(!pager.has_next());
    }

    #[test]
    fn role_ids_resolve_to_names() {
        let roles = vec![Role {
            access_role_id: "ata".to_owned(),
            name: "Tildeler".to_owned(),
        }];

        assert_eq!(role_name(&roles, "ata"), "Tildeler");
        assert_eq!(role_name(&roles, "sa"), "");
    }

    #[test]
    fn object_types_come_from_selected_role() {
        let mut person = user(599, "Elisabeth", "Andersen");
        person.roles = vec![
            user_role("ata", &["student", "employee", "student"]),
            user_role("sa", &["all"]),
        ];

        assert_eq!(
            object_types_for_role(&person, "ata"),
            vec!["student".to_owned(), "employee".to_owned()]
        );
        assert!(object_types_for_role(&person, "missing").is_empty());
        assert_eq!(scopes_for_role(&person, "sa").len(), 1);
        assert!(scopes_for_role(&person, "missing").is_empty());
    }

    #[test]
    fn placeholder_permissions_render_no_rows() {
        assert!(permission_rows(&PermissionData::default()).is_empty());

        let rows = permission_rows(&permission_data("accessRole1", "featureName1"));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].feature_name, "featureName1");
        assert_eq!(rows[0].operations, vec!["GET".to_owned()]);
    }

    #[test]
    fn assigned_roles_flatten_per_org_unit() {
        let details = UserAssignmentDetails {
            total_items: 1,
            total_pages: 1,
            current_page: 1,
            access_roles: vec![AssignedRole {
                access_role_id: "ata".to_owned(),
                access_role_name: "Tildeler".to_owned(),
                org_units: vec![
                    AssignedOrgUnit {
                        scope_id: 1,
                        object_type: "student".to_owned(),
                        org_unit_id: "198".to_owned(),
                        name: "VGSTOR".to_owned(),
                    },
                    AssignedOrgUnit {
                        scope_id: 2,
                        object_type: "employee".to_owned(),
                        org_unit_id: "41".to_owned(),
                        name: "VGMIDT".to_owned(),
                    },
                ],
            }],
        };

        let rows = assigned_role_rows(&details);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].role_name, "Tildeler");
        assert_eq!(rows[1].object_type, "employee");
        assert_eq!(rows[1].org_unit_name, "VGMIDT");
    }
}

//! Fakes shared by store tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};

use tilgang_core::{AppError, AppResult, BasePath};
use tilgang_domain::{
    AssignedOrgUnit, AssignedRole, Feature, FeatureOperation, NewAssignment, ObjectTypeSelector,
    OrgUnit, Page, PermissionData, Role, Scope, ScopeOrgUnit, User, UserAssignmentDetails,
    UserPageQuery, UserRole,
};

use crate::{
    AssignmentRepository, Notification, Notifier, OrgUnitRepository, RoleRepository,
    UserRepository,
};

pub fn user(id: i64, first_name: &str, last_name: &str) -> User {
    User {
        id,
        resource_id: id.to_string(),
        first_name: first_name.to_owned(),
        last_name: last_name.to_owned(),
        user_type: "STUDENT".to_owned(),
        user_name: first_name.to_lowercase(),
        roles: Vec::new(),
    }
}

pub fn andersen_users() -> Vec<User> {
    vec![
        user(1487, "Berit", "Andersen"),
        user(599, "Elisabeth", "Andersen"),
        user(707, "Marianne", "Andersen"),
    ]
}

pub fn user_role(role_id: &str, object_types: &[&str]) -> UserRole {
    UserRole {
        role_id: role_id.to_owned(),
        role_name: format!("Role {role_id}"),
        scopes: object_types
            .iter()
            .enumerate()
            .map(|(index, object_type)| Scope {
                scope_id: index.to_string(),
                object_type: (*object_type).to_owned(),
                org_units: vec![ScopeOrgUnit {
                    name: "VGSTOR Storskog videregående skole".to_owned(),
                    org_unit_id: "198".to_owned(),
                    short_name: "VGSTOR".to_owned(),
                }],
            })
            .collect(),
    }
}

pub fn org_unit(id: i64) -> OrgUnit {
    OrgUnit {
        id,
        name: format!("Unit {id}"),
        organisation_unit_id: id.to_string(),
        parent_ref: "1".to_owned(),
        parent_name: Some("Fylkeskommunen".to_owned()),
        children_ref: Vec::new(),
    }
}

pub fn permission_data(role_id: &str, feature_name: &str) -> PermissionData {
    PermissionData {
        access_role_id: role_id.to_owned(),
        features: vec![FeatureOperation {
            feature_id: 1,
            feature_name: feature_name.to_owned(),
            operations: vec!["GET".to_owned()],
        }],
    }
}

/// Holds the request for one key (a search text or an id) until released.
pub struct Gate {
    key: String,
    entered: AtomicBool,
    release: Notify,
}

impl Gate {
    pub fn new(key: &str) -> Arc<Self> {
        Arc::new(Self {
            key: key.to_owned(),
            entered: AtomicBool::new(false),
            release: Notify::new(),
        })
    }

    pub fn release(&self) {
        self.release.notify_one();
    }

    /// Yields until the held request has reached the gate.
    pub async fn wait_entered(&self) {
        while !self.entered.load(Ordering::SeqCst) {
            tokio::task::yield_now().await;
        }
    }

    async fn hold(&self, key: &str) {
        if key == self.key {
            self.entered.store(true, Ordering::SeqCst);
            self.release.notified().await;
        }
    }
}

async fn pass(gate: Option<&Arc<Gate>>, key: &str) {
    if let Some(gate) = gate {
        gate.hold(key).await;
    }
}

#[derive(Default)]
pub struct FakeUserRepository {
    pub users: Vec<User>,
    /// Overrides the page total and disables server-side slicing.
    pub reported_total_pages: Option<u32>,
    pub gate: Option<Arc<Gate>>,
    pub fail: AtomicBool,
    pub queries: Mutex<Vec<UserPageQuery>>,
    pub detail_calls: Mutex<Vec<String>>,
}

impl FakeUserRepository {
    pub fn with_users(users: Vec<User>) -> Self {
        Self {
            users,
            ..Self::default()
        }
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub async fn query_count(&self) -> usize {
        self.queries.lock().await.len()
    }

    /// Yields until `count` list requests have been issued.
    pub async fn wait_for_queries(&self, count: usize) {
        while self.query_count().await < count {
            tokio::task::yield_now().await;
        }
    }
}

#[async_trait]
impl UserRepository for FakeUserRepository {
    async fn list_users(
        &self,
        _base_path: &BasePath,
        query: &UserPageQuery,
    ) -> AppResult<Page<User>> {
        self.queries.lock().await.push(query.clone());

        if let Some(search) = query.filter.search() {
            pass(self.gate.as_ref(), search).await;
        }

        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::Transport("connection reset".to_owned()));
        }

        let matching: Vec<User> = self
            .users
            .iter()
            .filter(|user| match query.filter.search() {
                Some(search) => user
                    .full_name()
                    .to_lowercase()
                    .contains(&search.to_lowercase()),
                None => true,
            })
            .cloned()
            .collect();

        let page_size = query.page_size.get() as usize;
        let total_items = matching.len() as u32;
        let total_pages = self
            .reported_total_pages
            .unwrap_or_else(|| matching.len().div_ceil(page_size) as u32);
        let skip = (query.page.saturating_sub(1) as usize) * page_size;

        Ok(Page {
            total_items,
            total_pages,
            current_page: query.page,
            items: if self.reported_total_pages.is_some() {
                matching
            } else {
                matching.into_iter().skip(skip).take(page_size).collect()
            },
        })
    }

    async fn find_user(&self, _base_path: &BasePath, resource_id: &str) -> AppResult<User> {
        self.detail_calls.lock().await.push(resource_id.to_owned());
        pass(self.gate.as_ref(), resource_id).await;

        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::Transport("connection reset".to_owned()));
        }

        self.users
            .iter()
            .find(|user| user.resource_id == resource_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("user '{resource_id}'")))
    }

    async fn user_assignment_details(
        &self,
        base_path: &BasePath,
        resource_id: &str,
    ) -> AppResult<UserAssignmentDetails> {
        let user = self.find_user(base_path, resource_id).await?;
        let access_roles: Vec<AssignedRole> = user
            .roles
            .iter()
            .map(|role| AssignedRole {
                access_role_id: role.role_id.clone(),
                access_role_name: role.role_name.clone(),
                org_units: role
                    .scopes
                    .iter()
                    .flat_map(|scope| {
                        scope.org_units.iter().map(|org_unit| AssignedOrgUnit {
                            scope_id: scope.scope_id.parse().unwrap_or_default(),
                            object_type: scope.object_type.clone(),
                            org_unit_id: org_unit.org_unit_id.clone(),
                            name: org_unit.name.clone(),
                        })
                    })
                    .collect(),
            })
            .collect();

        Ok(UserAssignmentDetails {
            total_items: access_roles.len() as u32,
            total_pages: 1,
            current_page: 1,
            access_roles,
        })
    }
}

#[derive(Default)]
pub struct FakeRoleRepository {
    pub roles: Vec<Role>,
    pub features: HashMap<String, Vec<Feature>>,
    pub permissions: Mutex<HashMap<String, PermissionData>>,
    pub gate: Option<Arc<Gate>>,
    pub fail_save: AtomicBool,
    pub role_list_calls: Mutex<usize>,
    pub permission_calls: Mutex<Vec<String>>,
    pub saved: Mutex<Vec<PermissionData>>,
}

impl FakeRoleRepository {
    pub fn with_roles(roles: &[(&str, &str)]) -> Self {
        Self {
            roles: roles
                .iter()
                .map(|(access_role_id, name)| Role {
                    access_role_id: (*access_role_id).to_owned(),
                    name: (*name).to_owned(),
                })
                .collect(),
            ..Self::default()
        }
    }

    pub async fn insert_permissions(&self, data: PermissionData) {
        self.permissions
            .lock()
            .await
            .insert(data.access_role_id.clone(), data);
    }
}

#[async_trait]
impl RoleRepository for FakeRoleRepository {
    async fn list_roles(&self, _base_path: &BasePath) -> AppResult<Vec<Role>> {
        *self.role_list_calls.lock().await += 1;
        Ok(self.roles.clone())
    }

    async fn list_features(&self, _base_path: &BasePath, role_id: &str) -> AppResult<Vec<Feature>> {
        self.features
            .get(role_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("role '{role_id}'")))
    }

    async fn permission_data(
        &self,
        _base_path: &BasePath,
        role_id: &str,
    ) -> AppResult<PermissionData> {
        self.permission_calls.lock().await.push(role_id.to_owned());
        pass(self.gate.as_ref(), role_id).await;
        self.permissions
            .lock()
            .await
            .get(role_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("role '{role_id}'")))
    }

    async fn save_permission_data(
        &self,
        _base_path: &BasePath,
        data: &PermissionData,
    ) -> AppResult<PermissionData> {
        if self.fail_save.load(Ordering::SeqCst) {
            return Err(AppError::Forbidden("role is read-only".to_owned()));
        }

        self.saved.lock().await.push(data.clone());
        self.insert_permissions(data.clone()).await;
        Ok(data.clone())
    }
}

#[derive(Default)]
pub struct FakeAssignmentRepository {
    pub fail: AtomicBool,
    pub created: Mutex<Vec<NewAssignment>>,
    pub updated: Mutex<Vec<(String, UserRole)>>,
    pub deleted: Mutex<Vec<(String, String, ObjectTypeSelector)>>,
}

impl FakeAssignmentRepository {
    pub async fn call_count(&self) -> usize {
        self.created.lock().await.len()
            + self.updated.lock().await.len()
            + self.deleted.lock().await.len()
    }

    fn check(&self) -> AppResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::Conflict("assignment already exists".to_owned()));
        }
        Ok(())
    }
}

#[async_trait]
impl AssignmentRepository for FakeAssignmentRepository {
    async fn create_assignment(
        &self,
        _base_path: &BasePath,
        assignment: &NewAssignment,
    ) -> AppResult<()> {
        self.check()?;
        self.created.lock().await.push(assignment.clone());
        Ok(())
    }

    async fn update_assignment(
        &self,
        _base_path: &BasePath,
        user_resource_id: &str,
        updated: &UserRole,
    ) -> AppResult<UserRole> {
        self.check()?;
        self.updated
            .lock()
            .await
            .push((user_resource_id.to_owned(), updated.clone()));
        Ok(updated.clone())
    }

    async fn delete_assignment(
        &self,
        _base_path: &BasePath,
        user_resource_id: &str,
        role_id: &str,
        object_types: &ObjectTypeSelector,
    ) -> AppResult<()> {
        self.check()?;
        self.deleted.lock().await.push((
            user_resource_id.to_owned(),
            role_id.to_owned(),
            object_types.clone(),
        ));
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeOrgUnitRepository {
    pub related: HashMap<String, Vec<OrgUnit>>,
    pub gate: Option<Arc<Gate>>,
    pub calls: Mutex<Vec<String>>,
}

#[async_trait]
impl OrgUnitRepository for FakeOrgUnitRepository {
    async fn related_org_units(
        &self,
        _base_path: &BasePath,
        org_unit_id: &str,
    ) -> AppResult<Vec<OrgUnit>> {
        self.calls.lock().await.push(org_unit_id.to_owned());
        pass(self.gate.as_ref(), org_unit_id).await;
        self.related
            .get(org_unit_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("org unit '{org_unit_id}'")))
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    notifications: std::sync::Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn recorded(&self) -> Vec<Notification> {
        self.notifications
            .lock()
            .map(|notifications| notifications.clone())
            .unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        if let Ok(mut notifications) = self.notifications.lock() {
            notifications.push(notification);
        }
    }
}

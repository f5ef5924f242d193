//! Composition root wiring every store of the console around one navigation guard.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use tilgang_core::{AppResult, BasePath};
use tilgang_domain::{PageSize, Tab};

use crate::assignment_store::{AssignmentRefresh, AssignmentStore};
use crate::navigation_guard::{NavigationGuard, SaveAction, TabChange};
use crate::org_unit_store::OrgUnitStore;
use crate::role_store::RoleStore;
use crate::user_detail_store::UserDetailStore;
use crate::user_list_store::UserListStore;
use crate::{AssignmentRepository, Notifier, OrgUnitRepository, RoleRepository, UserRepository};

/// Adapters the console is built from.
#[derive(Clone)]
pub struct ConsolePorts {
    /// User lookups.
    pub users: Arc<dyn UserRepository>,
    /// Roles and permissions.
    pub roles: Arc<dyn RoleRepository>,
    /// Assignment mutations.
    pub assignments: Arc<dyn AssignmentRepository>,
    /// Organizational unit lookups.
    pub org_units: Arc<dyn OrgUnitRepository>,
    /// User-visible notifications.
    pub notifier: Arc<dyn Notifier>,
}

/// Every store of the console, created once at start-up.
pub struct AdminConsole {
    base_path: BasePath,
    guard: Arc<NavigationGuard>,
    users: Arc<UserListStore>,
    user_detail: Arc<UserDetailStore>,
    roles: Arc<RoleStore>,
    assignments: Arc<AssignmentStore>,
    org_units: Arc<OrgUnitStore>,
}

impl AdminConsole {
    /// Builds the stores for one deployment path.
    #[must_use]
    pub fn new(base_path: BasePath, ports: ConsolePorts, page_size: PageSize) -> Self {
        let guard = Arc::new(NavigationGuard::new(Tab::default()));
        let users = Arc::new(UserListStore::new(
            base_path.clone(),
            ports.users.clone(),
            page_size,
        ));
        let user_detail = Arc::new(UserDetailStore::new(base_path.clone(), ports.users.clone()));
        let roles = Arc::new(RoleStore::new(
            base_path.clone(),
            ports.roles,
            guard.clone(),
            ports.notifier.clone(),
        ));
        let assignments = Arc::new(AssignmentStore::new(
            base_path.clone(),
            ports.assignments,
            ports.users,
            guard.clone(),
            ports.notifier,
            AssignmentRefresh {
                users: users.clone(),
                user_detail: user_detail.clone(),
            },
        ));
        let org_units = Arc::new(OrgUnitStore::new(base_path.clone(), ports.org_units));

        Self {
            base_path,
            guard,
            users,
            user_detail,
            roles,
            assignments,
            org_units,
        }
    }

    /// Deployment path every request is made under.
    #[must_use]
    pub fn base_path(&self) -> &BasePath {
        &self.base_path
    }

    /// Unsaved-changes guard shared by the editing tabs.
    #[must_use]
    pub fn guard(&self) -> &NavigationGuard {
        &self.guard
    }

    /// Paginated user list.
    #[must_use]
    pub fn users(&self) -> &UserListStore {
        &self.users
    }

    /// Selected user detail.
    #[must_use]
    pub fn user_detail(&self) -> &UserDetailStore {
        &self.user_detail
    }

    /// Roles and the permission editor.
    #[must_use]
    pub fn roles(&self) -> &RoleStore {
        &self.roles
    }

    /// Assignment draft and mutations.
    #[must_use]
    pub fn assignments(&self) -> &AssignmentStore {
        &self.assignments
    }

    /// Organizational unit picker.
    #[must_use]
    pub fn org_units(&self) -> &OrgUnitStore {
        &self.org_units
    }

    /// Asks to switch tabs. Unsaved edits open the confirmation instead.
    pub fn switch_tab(&self, destination: Tab) -> TabChange {
        let change = self.guard.request_tab_change(destination);
        if let TabChange::Navigated(tab) = change {
            self.activate(tab);
        }
        change
    }

    /// Drops the edits of the tab being left and navigates.
    pub fn confirm_discard(&self) -> AppResult<Tab> {
        let leaving = self.guard.snapshot().current_tab;
        let tab = self.guard.confirm_discard()?;
        if leaving == Tab::AssignRoles {
            self.assignments.clear_draft();
        }
        self.activate(tab);
        Ok(tab)
    }

    /// Saves the edits of the tab being left and navigates once the save succeeds.
    pub async fn confirm_save(&self) -> AppResult<Tab> {
        let leaving = self.guard.snapshot().current_tab;
        let tab = match leaving {
            Tab::DefineRole => self.guard.confirm_save(self.roles.as_ref()).await?,
            Tab::AssignRoles => self.guard.confirm_save(self.assignments.as_ref()).await?,
            Tab::UsersAndRoles | Tab::AdministerRights => {
                self.guard.confirm_save(&NothingToSave).await?
            }
        };
        self.activate(tab);
        Ok(tab)
    }

    /// Closes the confirmation and stays on the current tab.
    pub fn cancel(&self) -> AppResult<()> {
        self.guard.cancel()
    }

    fn activate(&self, tab: Tab) {
        info!(base_path = %self.base_path, tab = tab.as_str(), "tab activated");
        self.roles.reset_permission_data();
    }
}

/// Save action of tabs without editable state.
struct NothingToSave;

#[async_trait]
impl SaveAction for NothingToSave {
    async fn save(&self) -> AppResult<()> {
        Ok(())
    }
}

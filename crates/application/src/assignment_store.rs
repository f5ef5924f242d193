//! Role assignment drafts and assignment mutations.
//!
//! Mutations never run against an invalid draft: `submit` validates first and
//! reports problems without touching the backend. A failed request leaves the
//! draft as the user entered it.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use tilgang_core::{AppResult, BasePath};
use tilgang_domain::{
    AssignmentDraft, DeleteSelection, OrgUnit, User, UserAssignmentDetails, UserRole,
};

use crate::navigation_guard::{NavigationGuard, SaveAction};
use crate::request_sequence::{FetchOutcome, RequestSequence, RequestTicket};
use crate::user_detail_store::UserDetailStore;
use crate::user_list_store::UserListStore;
use crate::{AssignmentRepository, Notification, Notifier, UserRepository};

/// Observable assignment state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentState {
    /// Draft being edited on the assign-roles tab.
    pub draft: AssignmentDraft,
    /// Message of the last rejected submission, cleared by any edit.
    pub validation_error: Option<String>,
    /// A mutation is in flight.
    pub submitting: bool,
    /// Resource id of the assignment overview shown.
    pub details_resource_id: Option<String>,
    /// Assignment overview of one user.
    pub details: Option<UserAssignmentDetails>,
    /// The assignment overview is being fetched.
    pub details_loading: bool,
}

/// Collaborators refreshed after a mutation succeeds.
pub struct AssignmentRefresh {
    /// Paginated user list, refetched after an assignment is created.
    pub users: Arc<UserListStore>,
    /// Selected user detail, refetched after any mutation of that user.
    pub user_detail: Arc<UserDetailStore>,
}

/// Store owning the assignment draft and the assignment mutations.
pub struct AssignmentStore {
    base_path: BasePath,
    repository: Arc<dyn AssignmentRepository>,
    user_repository: Arc<dyn UserRepository>,
    guard: Arc<NavigationGuard>,
    notifier: Arc<dyn Notifier>,
    refresh: AssignmentRefresh,
    state: watch::Sender<AssignmentState>,
    details_sequence: RequestSequence,
}

impl AssignmentStore {
    /// Creates a store with an empty draft.
    #[must_use]
    pub fn new(
        base_path: BasePath,
        repository: Arc<dyn AssignmentRepository>,
        user_repository: Arc<dyn UserRepository>,
        guard: Arc<NavigationGuard>,
        notifier: Arc<dyn Notifier>,
        refresh: AssignmentRefresh,
    ) -> Self {
        let (state, _) = watch::channel(AssignmentState::default());
        Self {
            base_path,
            repository,
            user_repository,
            guard,
            notifier,
            refresh,
            state,
            details_sequence: RequestSequence::default(),
        }
    }

    /// Returns the current state.
    #[must_use]
    pub fn snapshot(&self) -> AssignmentState {
        self.state.borrow().clone()
    }

    /// Subscribes to state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AssignmentState> {
        self.state.subscribe()
    }

    /// Picks the user receiving the role.
    pub fn select_user(&self, user: Option<User>) {
        self.edit_draft(|draft| {
            if draft.user == user {
                return false;
            }
            draft.user = user;
            true
        });
    }

    /// Picks the access role to assign.
    pub fn select_role(&self, access_role_id: &str) {
        let access_role_id = access_role_id.trim();
        self.edit_draft(|draft| {
            if draft.access_role_id == access_role_id {
                return false;
            }
            draft.access_role_id = access_role_id.to_owned();
            true
        });
    }

    /// Picks the scope the assignment is created in.
    pub fn set_scope(&self, scope_id: Option<i64>) {
        self.edit_draft(|draft| {
            if draft.scope_id == scope_id {
                return false;
            }
            draft.scope_id = scope_id;
            true
        });
    }

    /// Adds an organizational unit to the draft.
    pub fn add_org_unit(&self, org_unit: OrgUnit) {
        self.edit_draft(|draft| draft.add_org_unit(org_unit));
    }

    /// Removes an organizational unit from the draft.
    pub fn remove_org_unit(&self, org_unit_id: i64) {
        self.edit_draft(|draft| draft.remove_org_unit(org_unit_id));
    }

    /// Applies the role to every organizational unit instead of the picked ones.
    pub fn set_apply_to_all_org_units(&self, apply_to_all: bool) {
        self.edit_draft(|draft| {
            if draft.apply_to_all_org_units == apply_to_all {
                return false;
            }
            draft.apply_to_all_org_units = apply_to_all;
            true
        });
    }

    /// Drops the draft and any validation message.
    pub fn clear_draft(&self) {
        self.state.send_if_modified(|state| {
            if state.draft.is_empty() && state.validation_error.is_none() {
                return false;
            }
            state.draft = AssignmentDraft::default();
            state.validation_error = None;
            true
        });
    }

    /// Validates and submits the draft as a new assignment.
    pub async fn submit(&self) -> AppResult<()> {
        let validated = self.state.borrow().draft.validate();
        let assignment = match validated {
            Ok(assignment) => assignment,
            Err(error) => {
                self.state.send_modify(|state| {
                    state.validation_error = Some(error.to_string());
                });
                self.notifier.notify(Notification::error(error.to_string()));
                return Err(error);
            }
        };

        self.state.send_modify(|state| state.submitting = true);
        let result = self
            .repository
            .create_assignment(&self.base_path, &assignment)
            .await;
        self.state.send_modify(|state| state.submitting = false);

        match result {
            Ok(()) => {
                info!(
                    user_resource_id = %assignment.user_resource_id,
                    role_id = %assignment.access_role_id,
                    "role assigned"
                );
                self.notifier.notify(Notification::success("Role assigned."));
                self.clear_draft();
                self.guard.mark_saved();
                self.refresh.users.refresh().await;
                self.refresh_views_of(&assignment.user_resource_id).await;
                Ok(())
            }
            Err(error) => {
                warn!(
                    user_resource_id = %assignment.user_resource_id,
                    role_id = %assignment.access_role_id,
                    error = %error,
                    "failed to assign role"
                );
                self.notifier
                    .notify(Notification::error("Role assignment failed."));
                Err(error)
            }
        }
    }

    /// Replaces the scopes of an existing role binding, then refetches the user.
    pub async fn update_assignment(
        &self,
        user_resource_id: &str,
        updated: &UserRole,
    ) -> AppResult<UserRole> {
        self.state.send_modify(|state| state.submitting = true);
        let result = self
            .repository
            .update_assignment(&self.base_path, user_resource_id, updated)
            .await;
        self.state.send_modify(|state| state.submitting = false);

        match result {
            Ok(role) => {
                info!(user_resource_id, role_id = %role.role_id, "assignment updated");
                self.notifier
                    .notify(Notification::success("Assignment updated."));
                self.refetch_user(user_resource_id).await;
                Ok(role)
            }
            Err(error) => {
                warn!(
                    user_resource_id,
                    role_id = %updated.role_id,
                    error = %error,
                    "failed to update assignment"
                );
                self.notifier
                    .notify(Notification::error("Assignment update failed."));
                Err(error)
            }
        }
    }

    /// Removes one organizational unit from a role binding and saves the result.
    pub async fn remove_org_unit_from_role(
        &self,
        user_resource_id: &str,
        role: &UserRole,
        org_unit_id: &str,
    ) -> AppResult<UserRole> {
        let mut updated = role.clone();
        if !updated.remove_org_unit(org_unit_id) {
            return Ok(updated);
        }
        self.update_assignment(user_resource_id, &updated).await
    }

    /// Deletes a role binding for one object type or, with the toggle on, all of them.
    pub async fn delete_assignment(
        &self,
        user_resource_id: &str,
        role_id: &str,
        selection: &DeleteSelection,
    ) -> AppResult<()> {
        let selector = match selection.resolve() {
            Ok(selector) => selector,
            Err(error) => {
                self.notifier.notify(Notification::error(error.to_string()));
                return Err(error);
            }
        };

        self.state.send_modify(|state| state.submitting = true);
        let result = self
            .repository
            .delete_assignment(&self.base_path, user_resource_id, role_id, &selector)
            .await;
        self.state.send_modify(|state| state.submitting = false);

        match result {
            Ok(()) => {
                info!(
                    user_resource_id,
                    role_id,
                    object_type = selector.as_str(),
                    "assignment deleted"
                );
                self.notifier
                    .notify(Notification::success("Assignment deleted."));
                self.refetch_user(user_resource_id).await;
                Ok(())
            }
            Err(error) => {
                warn!(
                    user_resource_id,
                    role_id,
                    object_type = selector.as_str(),
                    error = %error,
                    "failed to delete assignment"
                );
                self.notifier
                    .notify(Notification::error("Assignment deletion failed."));
                Err(error)
            }
        }
    }

    /// Fetches the assignment overview of one user.
    pub async fn fetch_assignment_details(&self, resource_id: &str) -> FetchOutcome {
        let resource_id = resource_id.trim();
        if resource_id.is_empty() {
            return FetchOutcome::Skipped;
        }

        let ticket = self.begin_details();
        let result = self
            .user_repository
            .user_assignment_details(&self.base_path, resource_id)
            .await;
        self.apply_details(ticket, resource_id, result)
    }

    fn edit_draft(&self, edit: impl FnOnce(&mut AssignmentDraft) -> bool) {
        let changed = self.state.send_if_modified(|state| {
            if !edit(&mut state.draft) {
                return false;
            }
            state.validation_error = None;
            true
        });

        if changed {
            self.guard.mark_modified();
        }
    }

    /// Refetches the user detail and, when it shows the same user, the
    /// assignment overview.
    async fn refetch_user(&self, user_resource_id: &str) {
        self.refresh
            .user_detail
            .fetch_detail_for(user_resource_id)
            .await;
        self.refresh_overview_of(user_resource_id).await;
    }

    /// Refetches only the views already showing `user_resource_id`.
    async fn refresh_views_of(&self, user_resource_id: &str) {
        let detail_shows_user = self
            .refresh
            .user_detail
            .snapshot()
            .user
            .is_some_and(|user| user.resource_id == user_resource_id);
        if detail_shows_user {
            self.refresh.user_detail.refresh().await;
        }
        self.refresh_overview_of(user_resource_id).await;
    }

    async fn refresh_overview_of(&self, user_resource_id: &str) {
        let shows_user =
            self.state.borrow().details_resource_id.as_deref() == Some(user_resource_id);
        if shows_user {
            self.fetch_assignment_details(user_resource_id).await;
        }
    }

    fn begin_details(&self) -> RequestTicket {
        let ticket = self.details_sequence.issue();
        self.state.send_modify(|state| state.details_loading = true);
        ticket
    }

    fn apply_details(
        &self,
        ticket: RequestTicket,
        resource_id: &str,
        result: AppResult<UserAssignmentDetails>,
    ) -> FetchOutcome {
        let mut outcome = FetchOutcome::Superseded;
        self.state.send_if_modified(|state| {
            if !self.details_sequence.is_latest(ticket) {
                debug!(resource_id, "dropping superseded assignment overview");
                return false;
            }

            match result {
                Ok(details) => {
                    state.details_resource_id = Some(resource_id.to_owned());
                    state.details = Some(details);
                    outcome = FetchOutcome::Applied;
                }
                Err(error) => {
                    warn!(
                        base_path = %self.base_path,
                        resource_id,
                        error = %error,
                        "failed to fetch assignment overview"
                    );
                    outcome = FetchOutcome::Failed;
                }
            }
            state.details_loading = false;
            true
        });

        outcome
    }
}

#[async_trait]
impl SaveAction for AssignmentStore {
    async fn save(&self) -> AppResult<()> {
        self.submit().await
    }
}

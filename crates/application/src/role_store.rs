//! Access role reference data and the permission editor state.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use tilgang_core::{AppError, AppResult, BasePath};
use tilgang_domain::{Feature, PermissionData, Role};

use crate::navigation_guard::{NavigationGuard, SaveAction};
use crate::request_sequence::{FetchOutcome, RequestSequence, RequestTicket};
use crate::{Notification, Notifier, RoleRepository, views};

/// Observable role state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleState {
    /// Every access role, loaded once.
    pub roles: Vec<Role>,
    /// Whether `roles` holds a successful response.
    pub roles_loaded: bool,
    /// Features of the last requested role.
    pub features: Vec<Feature>,
    /// Permission data of the selected role, or the placeholder.
    pub permission_data: PermissionData,
    /// The role list is being fetched.
    pub roles_loading: bool,
    /// Features are being fetched.
    pub features_loading: bool,
    /// Permission data is being fetched.
    pub permission_data_loading: bool,
    /// Permission data is being saved.
    pub saving: bool,
}

impl RoleState {
    /// Returns whether any request of the store is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.roles_loading || self.features_loading || self.permission_data_loading || self.saving
    }
}

/// Store owning roles, role features and the permission data being edited.
pub struct RoleStore {
    base_path: BasePath,
    repository: Arc<dyn RoleRepository>,
    guard: Arc<NavigationGuard>,
    notifier: Arc<dyn Notifier>,
    state: watch::Sender<RoleState>,
    roles_sequence: RequestSequence,
    features_sequence: RequestSequence,
    permission_sequence: RequestSequence,
}

impl RoleStore {
    /// Creates a store holding the placeholder permission data.
    #[must_use]
    pub fn new(
        base_path: BasePath,
        repository: Arc<dyn RoleRepository>,
        guard: Arc<NavigationGuard>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let (state, _) = watch::channel(RoleState::default());
        Self {
            base_path,
            repository,
            guard,
            notifier,
            state,
            roles_sequence: RequestSequence::default(),
            features_sequence: RequestSequence::default(),
            permission_sequence: RequestSequence::default(),
        }
    }

    /// Returns the current state.
    #[must_use]
    pub fn snapshot(&self) -> RoleState {
        self.state.borrow().clone()
    }

    /// Subscribes to state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<RoleState> {
        self.state.subscribe()
    }

    /// Loads the role list unless it was already loaded for this base path.
    pub async fn load_roles(&self) -> FetchOutcome {
        if self.state.borrow().roles_loaded {
            return FetchOutcome::Skipped;
        }
        self.reload_roles().await
    }

    /// Fetches the role list regardless of what is held.
    pub async fn reload_roles(&self) -> FetchOutcome {
        let ticket = self.begin(&self.roles_sequence, |state| state.roles_loading = true);
        let result = self.repository.list_roles(&self.base_path).await;

        self.finish(&self.roles_sequence, ticket, "roles", |state| {
            state.roles_loading = false;
            state.roles = result?;
            state.roles_loaded = true;
            Ok(())
        })
    }

    /// Returns the display name of a role, or an empty string for unknown ids.
    #[must_use]
    pub fn role_name(&self, role_id: &str) -> String {
        views::role_name(&self.state.borrow().roles, role_id).to_owned()
    }

    /// Fetches the features reachable through a role.
    pub async fn fetch_features(&self, role_id: &str) -> FetchOutcome {
        let role_id = role_id.trim();
        if role_id.is_empty() {
            return FetchOutcome::Skipped;
        }

        let ticket = self.begin(&self.features_sequence, |state| {
            state.features_loading = true;
        });
        let result = self.repository.list_features(&self.base_path, role_id).await;

        self.finish(&self.features_sequence, ticket, "features", |state| {
            state.features_loading = false;
            state.features = result?;
            Ok(())
        })
    }

    /// Fetches the permission data of a role, replacing the held value.
    pub async fn fetch_permission_data(&self, role_id: &str) -> FetchOutcome {
        let role_id = role_id.trim();
        if role_id.is_empty() {
            return FetchOutcome::Skipped;
        }

        let ticket = self.begin(&self.permission_sequence, |state| {
            state.permission_data_loading = true;
        });
        let result = self
            .repository
            .permission_data(&self.base_path, role_id)
            .await;

        self.finish(
            &self.permission_sequence,
            ticket,
            "permission data",
            |state| {
                state.permission_data_loading = false;
                state.permission_data = result?;
                Ok(())
            },
        )
    }

    /// Allows or revokes one operation on a feature of the held permission data.
    ///
    /// Returns whether the operation is allowed afterwards. Marks the active
    /// tab modified.
    pub fn toggle_operation(&self, feature_id: i64, operation: &str) -> AppResult<bool> {
        let mut outcome = Err(AppError::Validation(
            "select an access role before editing permissions".to_owned(),
        ));
        self.state.send_if_modified(|state| {
            if state.permission_data.is_placeholder() {
                return false;
            }
            match state.permission_data.feature_mut(feature_id) {
                Some(feature) => {
                    outcome = Ok(feature.toggle(operation));
                    true
                }
                None => {
                    outcome = Err(AppError::NotFound(format!(
                        "feature {feature_id} is not part of role '{}'",
                        state.permission_data.access_role_id
                    )));
                    false
                }
            }
        });

        if outcome.is_ok() {
            self.guard.mark_modified();
        }
        outcome
    }

    /// Saves the held permission data and refetches it from the backend.
    pub async fn save_permission_data(&self) -> AppResult<()> {
        let data = self.state.borrow().permission_data.clone();
        if data.is_placeholder() {
            let error = AppError::Validation("no access role is selected".to_owned());
            self.notifier.notify(Notification::error("Select an access role first."));
            return Err(error);
        }

        self.state.send_modify(|state| state.saving = true);
        let result = self
            .repository
            .save_permission_data(&self.base_path, &data)
            .await;
        self.state.send_modify(|state| state.saving = false);

        match result {
            Ok(_) => {
                info!(role_id = %data.access_role_id, "role permissions updated");
                self.notifier.notify(Notification::success("Role updated."));
                self.guard.mark_saved();
                self.fetch_permission_data(&data.access_role_id).await;
                Ok(())
            }
            Err(error) => {
                warn!(
                    role_id = %data.access_role_id,
                    error = %error,
                    "failed to update role permissions"
                );
                self.notifier.notify(Notification::error("Role update failed."));
                Err(error)
            }
        }
    }

    /// Restores the placeholder permission data and drops in-flight fetches of it.
    pub fn reset_permission_data(&self) {
        self.permission_sequence.invalidate();
        self.state.send_if_modified(|state| {
            let placeholder = PermissionData::default();
            if state.permission_data == placeholder && !state.permission_data_loading {
                return false;
            }
            state.permission_data = placeholder;
            state.permission_data_loading = false;
            true
        });
    }

    fn begin(
        &self,
        sequence: &RequestSequence,
        mark: impl FnOnce(&mut RoleState),
    ) -> RequestTicket {
        let ticket = sequence.issue();
        self.state.send_modify(mark);
        ticket
    }

    /// Applies a response when its ticket is still the latest. Loading flags
    /// are only cleared by the latest request.
    fn finish(
        &self,
        sequence: &RequestSequence,
        ticket: RequestTicket,
        resource: &'static str,
        apply: impl FnOnce(&mut RoleState) -> AppResult<()>,
    ) -> FetchOutcome {
        let mut outcome = FetchOutcome::Superseded;
        self.state.send_if_modified(|state| {
            if !sequence.is_latest(ticket) {
                debug!(resource, "dropping superseded role response");
                return false;
            }

            outcome = match apply(state) {
                Ok(()) => FetchOutcome::Applied,
                Err(error) => {
                    warn!(
                        base_path = %self.base_path,
                        resource,
                        error = %error,
                        "failed to fetch role data"
                    );
                    FetchOutcome::Failed
                }
            };
            true
        });

        outcome
    }
}

#[async_trait]
impl SaveAction for RoleStore {
    async fn save(&self) -> AppResult<()> {
        self.save_permission_data().await
    }
}

//! Selected user detail state.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};

use tilgang_core::{AppResult, BasePath};
use tilgang_domain::User;

use crate::UserRepository;
use crate::request_sequence::{FetchOutcome, RequestSequence, RequestTicket};

/// Observable user detail state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserDetailState {
    /// Resource id of the user shown; only set once a fetch succeeds.
    pub resource_id: Option<String>,
    /// Last successfully fetched user.
    pub user: Option<User>,
    /// A fetch is in flight.
    pub loading: bool,
}

/// Store holding the single user shown on the assignment page.
///
/// Each fetch replaces the previous result; nothing is cached per id.
pub struct UserDetailStore {
    base_path: BasePath,
    repository: Arc<dyn UserRepository>,
    state: watch::Sender<UserDetailState>,
    sequence: RequestSequence,
}

impl UserDetailStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new(base_path: BasePath, repository: Arc<dyn UserRepository>) -> Self {
        let (state, _) = watch::channel(UserDetailState::default());
        Self {
            base_path,
            repository,
            state,
            sequence: RequestSequence::default(),
        }
    }

    /// Returns the current state.
    #[must_use]
    pub fn snapshot(&self) -> UserDetailState {
        self.state.borrow().clone()
    }

    /// Subscribes to state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<UserDetailState> {
        self.state.subscribe()
    }

    /// Fetches one user. A blank id, for example an unresolved route
    /// parameter, issues no request.
    pub async fn fetch_detail_for(&self, resource_id: &str) -> FetchOutcome {
        let resource_id = resource_id.trim();
        if resource_id.is_empty() {
            return FetchOutcome::Skipped;
        }

        let ticket = self.begin_fetch();
        let result = self.repository.find_user(&self.base_path, resource_id).await;
        self.apply(ticket, resource_id, result)
    }

    /// Refetches the currently shown user, if any. A failed fetch of another
    /// id does not change which user this refetches.
    pub async fn refresh(&self) -> FetchOutcome {
        match self.snapshot().resource_id {
            Some(resource_id) => self.fetch_detail_for(&resource_id).await,
            None => FetchOutcome::Skipped,
        }
    }

    /// Clears the detail and drops any in-flight response.
    pub fn reset(&self) {
        self.sequence.invalidate();
        self.state.send_if_modified(|state| {
            let cleared = UserDetailState::default();
            if *state == cleared {
                return false;
            }
            *state = cleared;
            true
        });
    }

    fn begin_fetch(&self) -> RequestTicket {
        let ticket = self.sequence.issue();
        self.state.send_modify(|state| state.loading = true);
        ticket
    }

    fn apply(
        &self,
        ticket: RequestTicket,
        resource_id: &str,
        result: AppResult<User>,
    ) -> FetchOutcome {
        let mut outcome = FetchOutcome::Superseded;
        self.state.send_if_modified(|state| {
            if !self.sequence.is_latest(ticket) {
                debug!(resource_id, "dropping superseded user detail response");
                return false;
            }

            match result {
                Ok(user) => {
                    state.resource_id = Some(resource_id.to_owned());
                    state.user = Some(user);
                    outcome = FetchOutcome::Applied;
                }
                Err(error) => {
                    warn!(
                        base_path = %self.base_path,
                        resource_id,
                        error = %error,
                        "failed to fetch user"
                    );
                    outcome = FetchOutcome::Failed;
                }
            }
            state.loading = false;
            true
        });

        outcome
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tilgang_core::BasePath;

    use crate::request_sequence::FetchOutcome;
    use crate::test_support::{FakeUserRepository, Gate, andersen_users};

    use super::{UserDetailState, UserDetailStore};

    fn store() -> (UserDetailStore, Arc<FakeUserRepository>) {
        let repository = Arc::new(FakeUserRepository::with_users(andersen_users()));
        (
            UserDetailStore::new(BasePath::root(), repository.clone()),
            repository,
        )
    }

    fn gated_store(gate: &Arc<Gate>) -> UserDetailStore {
        let repository = Arc::new(FakeUserRepository {
            users: andersen_users(),
            gate: Some(gate.clone()),
            ..FakeUserRepository::default()
        });
        UserDetailStore::new(BasePath::root(), repository)
    }

    #[tokio::test]
    async fn blank_id_issues_no_request() {
        let (store, repository) = store();

        assert_eq!(store.fetch_detail_for("").await, FetchOutcome::Skipped);
        assert_eq!(store.fetch_detail_for("   ").await, FetchOutcome::Skipped);

        assert!(repository.detail_calls.lock().await.is_empty());
        assert_eq!(store.snapshot(), UserDetailState::default());
    }

    #[tokio::test]
    async fn each_fetch_replaces_the_previous_user() {
        let (store, _) = store();

        store.fetch_detail_for("1487").await;
        store.fetch_detail_for("707").await;

        let state = store.snapshot();
        assert!(!state.loading);
        assert_eq!(state.user.map(|user| user.first_name), Some("Marianne".to_owned()));
    }

    #[tokio::test]
    async fn unknown_user_keeps_previous_detail() {
        let (store, _) = store();
        store.fetch_detail_for("599").await;

        let outcome = store.fetch_detail_for("404").await;

        assert_eq!(outcome, FetchOutcome::Failed);
        let state = store.snapshot();
        assert!(!state.loading);
        assert_eq!(state.user.map(|user| user.id), Some(599));
    }

    #[tokio::test]
    async fn reset_restores_default_and_refresh_becomes_noop() {
        let (store, repository) = store();
        store.fetch_detail_for("599").await;

        store.reset();
        store.reset();

        assert_eq!(store.snapshot(), UserDetailState::default());
        assert_eq!(store.refresh().await, FetchOutcome::Skipped);
        assert_eq!(repository.detail_calls.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn failed_fetch_keeps_shown_user_for_refresh() {
        let (store, repository) = store();
        store.fetch_detail_for("599").await;
        store.fetch_detail_for("404").await;

        assert_eq!(store.snapshot().resource_id.as_deref(), Some("599"));
        assert_eq!(store.refresh().await, FetchOutcome::Applied);
        assert_eq!(
            repository.detail_calls.lock().await.clone(),
            vec!["599".to_owned(), "404".to_owned(), "599".to_owned()]
        );
    }

    #[tokio::test]
    async fn slow_response_for_earlier_user_is_discarded() {
        let gate = Gate::new("1487");
        let store = gated_store(&gate);

        let (slow, fast) = tokio::join!(store.fetch_detail_for("1487"), async {
            gate.wait_entered().await;
            assert!(store.snapshot().loading);
            let fast = store.fetch_detail_for("707").await;
            gate.release();
            fast
        });

        assert_eq!(fast, FetchOutcome::Applied);
        assert_eq!(slow, FetchOutcome::Superseded);
        let state = store.snapshot();
        assert!(!state.loading);
        assert_eq!(state.resource_id.as_deref(), Some("707"));
        assert_eq!(state.user.map(|user| user.id), Some(707));
    }

    #[tokio::test]
    async fn response_arriving_after_reset_is_dropped() {
        let gate = Gate::new("599");
        let store = gated_store(&gate);

        let (outcome, ()) = tokio::join!(store.fetch_detail_for("599"), async {
            gate.wait_entered().await;
            store.reset();
            gate.release();
        });

        assert_eq!(outcome, FetchOutcome::Superseded);
        assert_eq!(store.snapshot(), UserDetailState::default());
    }
}

//! Organizational units offered in the assignment picker.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};

use tilgang_core::BasePath;
use tilgang_domain::OrgUnit;

use crate::OrgUnitRepository;
use crate::request_sequence::{FetchOutcome, RequestSequence};

/// Observable organizational unit state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrgUnitState {
    /// Unit whose related units are shown.
    pub org_unit_id: Option<String>,
    /// The unit and the units below it.
    pub related: Vec<OrgUnit>,
    /// A fetch is in flight.
    pub loading: bool,
}

/// Store holding the related units of one organizational unit.
pub struct OrgUnitStore {
    base_path: BasePath,
    repository: Arc<dyn OrgUnitRepository>,
    state: watch::Sender<OrgUnitState>,
    sequence: RequestSequence,
}

impl OrgUnitStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new(base_path: BasePath, repository: Arc<dyn OrgUnitRepository>) -> Self {
        let (state, _) = watch::channel(OrgUnitState::default());
        Self {
            base_path,
            repository,
            state,
            sequence: RequestSequence::default(),
        }
    }

    /// Returns the current state.
    #[must_use]
    pub fn snapshot(&self) -> OrgUnitState {
        self.state.borrow().clone()
    }

    /// Subscribes to state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<OrgUnitState> {
        self.state.subscribe()
    }

    /// Fetches a unit together with its descendants.
    pub async fn fetch_related(&self, org_unit_id: &str) -> FetchOutcome {
        let org_unit_id = org_unit_id.trim();
        if org_unit_id.is_empty() {
            return FetchOutcome::Skipped;
        }

        let ticket = self.sequence.issue();
        self.state.send_modify(|state| state.loading = true);

        let result = self
            .repository
            .related_org_units(&self.base_path, org_unit_id)
            .await;

        let mut outcome = FetchOutcome::Superseded;
        self.state.send_if_modified(|state| {
            if !self.sequence.is_latest(ticket) {
                debug!(org_unit_id, "dropping superseded org unit response");
                return false;
            }

            match result {
                Ok(related) => {
                    state.org_unit_id = Some(org_unit_id.to_owned());
                    state.related = related;
                    outcome = FetchOutcome::Applied;
                }
                Err(error) => {
                    warn!(
                        base_path = %self.base_path,
                        org_unit_id,
                        error = %error,
                        "failed to fetch related org units"
                    );
                    outcome = FetchOutcome::Failed;
                }
            }
            state.loading = false;
            true
        });

        outcome
    }

    /// Clears the picker and drops any in-flight response.
    pub fn reset(&self) {
        self.sequence.invalidate();
        self.state.send_if_modified(|state| {
            let cleared = OrgUnitState::default();
            if *state == cleared {
                return false;
            }
            *state = cleared;
            true
        });
    }
}

//! Unsaved-changes guard for tab navigation.
//!
//! A tab switch requested while the active tab holds unsaved edits is parked
//! in `PendingConfirmation` until the user discards, saves or cancels. The
//! recorded destination is never activated while the confirmation is open.

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::{debug, info};

use tilgang_core::{AppError, AppResult};
use tilgang_domain::Tab;

/// Edit state of the active tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    /// No unsaved edits.
    Clean,
    /// The active tab holds unsaved edits.
    Dirty,
    /// A tab switch waits for the user to discard, save or cancel.
    PendingConfirmation {
        /// Tab the user asked to switch to.
        destination: Tab,
    },
}

/// Observable guard state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardSnapshot {
    /// Currently active tab.
    pub current_tab: Tab,
    /// Edit state of the active tab.
    pub state: GuardState,
}

impl GuardSnapshot {
    /// Returns whether the confirmation dialog should be visible.
    #[must_use]
    pub fn is_confirmation_open(&self) -> bool {
        matches!(self.state, GuardState::PendingConfirmation { .. })
    }
}

/// Result of a tab switch request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabChange {
    /// The requested tab is already active.
    Unchanged,
    /// The tab was activated immediately.
    Navigated(Tab),
    /// Unsaved edits block the switch until the user confirms.
    ConfirmationRequired(Tab),
}

/// Save action run when the user chooses "save" in the confirmation dialog.
#[async_trait]
pub trait SaveAction: Send + Sync {
    /// Persists the unsaved edits of the active tab.
    async fn save(&self) -> AppResult<()>;
}

/// Tab navigation guard shared by every store that edits data.
#[derive(Debug)]
pub struct NavigationGuard {
    state: watch::Sender<GuardSnapshot>,
}

impl NavigationGuard {
    /// Creates a clean guard with the given tab active.
    #[must_use]
    pub fn new(initial_tab: Tab) -> Self {
        let (state, _) = watch::channel(GuardSnapshot {
            current_tab: initial_tab,
            state: GuardState::Clean,
        });
        Self { state }
    }

    /// Returns the current guard state.
    #[must_use]
    pub fn snapshot(&self) -> GuardSnapshot {
        *self.state.borrow()
    }

    /// Subscribes to guard state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<GuardSnapshot> {
        self.state.subscribe()
    }

    /// Records that the active tab holds unsaved edits.
    pub fn mark_modified(&self) {
        self.state.send_if_modified(|snapshot| {
            if snapshot.state == GuardState::Clean {
                snapshot.state = GuardState::Dirty;
                true
            } else {
                false
            }
        });
    }

    /// Records that the edits of the active tab were persisted.
    ///
    /// A pending confirmation stays open; it is resolved by the dialog.
    pub fn mark_saved(&self) {
        self.state.send_if_modified(|snapshot| {
            if snapshot.state == GuardState::Dirty {
                snapshot.state = GuardState::Clean;
                true
            } else {
                false
            }
        });
    }

    /// Requests a switch to another tab.
    ///
    /// A second request while a confirmation is open replaces the recorded
    /// destination. Asking for the active tab instead closes the confirmation
    /// and keeps the edits, like [`NavigationGuard::cancel`].
    pub fn request_tab_change(&self, destination: Tab) -> TabChange {
        let mut change = TabChange::Unchanged;
        self.state.send_if_modified(|snapshot| match snapshot.state {
            GuardState::Clean | GuardState::Dirty if snapshot.current_tab == destination => false,
            GuardState::PendingConfirmation { .. } if snapshot.current_tab == destination => {
                snapshot.state = GuardState::Dirty;
                true
            }
            GuardState::Clean => {
                snapshot.current_tab = destination;
                change = TabChange::Navigated(destination);
                true
            }
            GuardState::Dirty | GuardState::PendingConfirmation { .. } => {
                snapshot.state = GuardState::PendingConfirmation { destination };
                change = TabChange::ConfirmationRequired(destination);
                true
            }
        });

        debug!(tab = destination.as_str(), ?change, "tab change requested");
        change
    }

    /// Discards the unsaved edits and activates the recorded destination.
    pub fn confirm_discard(&self) -> AppResult<Tab> {
        let destination = self.navigate_to_pending()?;
        info!(tab = destination.as_str(), "unsaved changes discarded");
        Ok(destination)
    }

    /// Runs the save action, then activates the recorded destination.
    ///
    /// When saving fails the confirmation stays open and the error is
    /// returned, so the user can retry, discard or cancel.
    pub async fn confirm_save(&self, action: &dyn SaveAction) -> AppResult<Tab> {
        self.pending_destination()?;
        action.save().await?;

        let destination = self.navigate_to_pending()?;
        info!(tab = destination.as_str(), "unsaved changes saved before tab change");
        Ok(destination)
    }

    /// Closes the confirmation without navigating. The edits stay unsaved.
    pub fn cancel(&self) -> AppResult<()> {
        self.pending_destination()?;
        self.state.send_if_modified(|snapshot| {
            if snapshot.is_confirmation_open() {
                snapshot.state = GuardState::Dirty;
                true
            } else {
                false
            }
        });
        Ok(())
    }

    fn pending_destination(&self) -> AppResult<Tab> {
        match self.snapshot().state {
            GuardState::PendingConfirmation { destination } => Ok(destination),
            GuardState::Clean | GuardState::Dirty => Err(no_pending_confirmation()),
        }
    }

    fn navigate_to_pending(&self) -> AppResult<Tab> {
        let mut navigated = None;
        self.state.send_if_modified(|snapshot| match snapshot.state {
            GuardState::PendingConfirmation { destination } => {
                snapshot.current_tab = destination;
                snapshot.state = GuardState::Clean;
                navigated = Some(destination);
                true
            }
            GuardState::Clean | GuardState::Dirty => false,
        });

        navigated.ok_or_else(no_pending_confirmation)
    }
}

impl Default for NavigationGuard {
    fn default() -> Self {
        Self::new(Tab::default())
    }
}

fn no_pending_confirmation() -> AppError {
    AppError::Conflict("no tab change is waiting for confirmation".to_owned())
}

//! Paginated user list state.
//!
//! The list depends on exactly `(base_path, current_page, page_size, filter)`.
//! Every setter that changes one of them calls [`UserListStore::refresh`], so
//! presentation code never has to remember to refetch.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};

use tilgang_core::{AppError, AppResult, BasePath};
use tilgang_domain::{Page, PageSize, User, UserFilter, UserPageQuery, clamp_page};

use crate::UserRepository;
use crate::request_sequence::{FetchOutcome, RequestSequence, RequestTicket};

/// Observable user list state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserListState {
    /// 1-indexed page shown.
    pub current_page: u32,
    /// Rows per page.
    pub page_size: PageSize,
    /// Active filters.
    pub filter: UserFilter,
    /// A fetch is in flight.
    pub loading: bool,
    /// Last successfully fetched page.
    pub page: Option<Page<User>>,
    /// User picked in the table.
    pub selected_user: Option<User>,
}

impl UserListState {
    fn query(&self) -> UserPageQuery {
        UserPageQuery {
            page: self.current_page,
            page_size: self.page_size,
            filter: self.filter.clone(),
        }
    }
}

/// Store owning the paginated user list.
pub struct UserListStore {
    base_path: BasePath,
    repository: Arc<dyn UserRepository>,
    state: watch::Sender<UserListState>,
    sequence: RequestSequence,
}

enum Applied {
    Done(FetchOutcome),
    PageClamped,
}

impl UserListStore {
    /// Creates a store on page 1 with no filters.
    #[must_use]
    pub fn new(
        base_path: BasePath,
        repository: Arc<dyn UserRepository>,
        page_size: PageSize,
    ) -> Self {
        let (state, _) = watch::channel(UserListState {
            current_page: 1,
            page_size,
            filter: UserFilter::default(),
            loading: false,
            page: None,
            selected_user: None,
        });

        Self {
            base_path,
            repository,
            state,
            sequence: RequestSequence::default(),
        }
    }

    /// Returns the current state.
    #[must_use]
    pub fn snapshot(&self) -> UserListState {
        self.state.borrow().clone()
    }

    /// Subscribes to state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<UserListState> {
        self.state.subscribe()
    }

    /// Fetches the page for the current parameters and replaces the held page.
    ///
    /// When the backend reports fewer pages than the requested page the store
    /// clamps `current_page` and fetches once more.
    pub async fn refresh(&self) -> FetchOutcome {
        loop {
            let (ticket, query) = self.begin_fetch();
            let result = self.repository.list_users(&self.base_path, &query).await;

            match self.apply(ticket, &query, result) {
                Applied::Done(outcome) => return outcome,
                Applied::PageClamped => continue,
            }
        }
    }

    /// Moves to another page.
    pub async fn set_current_page(&self, page: u32) -> AppResult<FetchOutcome> {
        if page == 0 {
            return Err(AppError::Validation("page numbers start at 1".to_owned()));
        }

        let changed = self.state.send_if_modified(|state| {
            if state.current_page == page {
                return false;
            }
            state.current_page = page;
            true
        });

        Ok(self.refresh_if(changed).await)
    }

    /// Changes the number of rows per page and returns to the first page.
    pub async fn set_page_size(&self, page_size: PageSize) -> FetchOutcome {
        let changed = self.state.send_if_modified(|state| {
            if state.page_size == page_size {
                return false;
            }
            state.page_size = page_size;
            state.current_page = 1;
            true
        });

        self.refresh_if(changed).await
    }

    /// Changes the name search and returns to the first page.
    pub async fn set_search(&self, search: Option<&str>) -> FetchOutcome {
        self.update_filter(|filter| filter.with_search(search)).await
    }

    /// Restricts the list to organizational units and returns to the first page.
    pub async fn set_org_unit_ids(&self, org_unit_ids: &[String]) -> FetchOutcome {
        self.update_filter(|filter| filter.with_org_unit_ids(org_unit_ids)).await
    }

    /// Restricts the list to one access role and returns to the first page.
    pub async fn set_role_filter(&self, role_id: Option<&str>) -> FetchOutcome {
        self.update_filter(|filter| filter.with_role_filter(role_id)).await
    }

    /// Records the user picked in the table.
    pub fn select_user(&self, user: Option<User>) {
        self.state.send_if_modified(|state| {
            if state.selected_user == user {
                return false;
            }
            state.selected_user = user;
            true
        });
    }

    async fn update_filter<F>(&self, update: F) -> FetchOutcome
    where
        F: FnOnce(UserFilter) -> UserFilter,
    {
        let changed = self.state.send_if_modified(|state| {
            let filter = update(state.filter.clone());
            if filter == state.filter {
                return false;
            }
            state.filter = filter;
            state.current_page = 1;
            true
        });

        self.refresh_if(changed).await
    }

    async fn refresh_if(&self, changed: bool) -> FetchOutcome {
        if changed {
            self.refresh().await
        } else {
            FetchOutcome::Skipped
        }
    }

    fn begin_fetch(&self) -> (RequestTicket, UserPageQuery) {
        let ticket = self.sequence.issue();
        self.state.send_modify(|state| state.loading = true);
        let query = self.state.borrow().query();
        (ticket, query)
    }

    fn apply(
        &self,
        ticket: RequestTicket,
        query: &UserPageQuery,
        result: AppResult<Page<User>>,
    ) -> Applied {
        let mut applied = Applied::Done(FetchOutcome::Superseded);
        self.state.send_if_modified(|state| {
            if !self.sequence.is_latest(ticket) {
                debug!(
                    base_path = %self.base_path,
                    page = query.page,
                    "dropping superseded user page response"
                );
                return false;
            }

            match result {
                Ok(page) if page.total_pages > 0 && query.page > page.total_pages => {
                    state.current_page = clamp_page(query.page, page.total_pages);
                    applied = Applied::PageClamped;
                }
                Ok(page) => {
                    state.page = Some(Page::clamped(
                        page.total_items,
                        page.total_pages,
                        query.page,
                        query.page_size,
                        page.items,
                    ));
                    state.loading = false;
                    applied = Applied::Done(FetchOutcome::Applied);
                }
                Err(error) => {
                    warn!(
                        base_path = %self.base_path,
                        page = query.page,
                        error = %error,
                        "failed to fetch user page"
                    );
                    state.loading = false;
                    applied = Applied::Done(FetchOutcome::Failed);
                }
            }
            true
        });

        applied
    }
}

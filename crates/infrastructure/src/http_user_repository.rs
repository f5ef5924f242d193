use async_trait::async_trait;
use tilgang_application::UserRepository;
use tilgang_core::{AppResult, BasePath};
use tilgang_domain::{Page, User, UserAssignmentDetails, UserPageQuery};
use tracing::debug;

use crate::http_api_client::HttpApiClient;
use crate::wire::{UserDetailsPageDto, UserDto, UserPageDto};

/// REST-backed user repository.
#[derive(Clone)]
pub struct HttpUserRepository {
    client: HttpApiClient,
}

impl HttpUserRepository {
    /// Creates a repository on top of a shared API client.
    #[must_use]
    pub fn new(client: HttpApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl UserRepository for HttpUserRepository {
    async fn list_users(
        &self,
        base_path: &BasePath,
        query: &UserPageQuery,
    ) -> AppResult<Page<User>> {
        let mut url = self.client.endpoint(base_path, &["user"])?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("page", &query.page.saturating_sub(1).to_string())
                .append_pair("size", &query.page_size.get().to_string());
            if !query.filter.org_unit_ids().is_empty() {
                pairs.append_pair("orgUnitIds", &query.filter.org_unit_ids().join(","));
            }
            if let Some(search) = query.filter.search() {
                pairs.append_pair("name", search);
            }
            if let Some(role_id) = query.filter.role_filter() {
                pairs.append_pair("accessRoleId", role_id);
            }
        }

        debug!(base_path = %base_path, page = query.page, "listing users");
        let page: UserPageDto = self.client.get_json(url).await?;
        page.into_page()
    }

    async fn find_user(&self, base_path: &BasePath, resource_id: &str) -> AppResult<User> {
        let url = self.client.endpoint(base_path, &["user", resource_id])?;
        let user: UserDto = self.client.get_json(url).await?;
        Ok(user.into())
    }

    async fn user_assignment_details(
        &self,
        base_path: &BasePath,
        resource_id: &str,
    ) -> AppResult<UserAssignmentDetails> {
        let url = self
            .client
            .endpoint(base_path, &["user", resource_id, "orgunits"])?;
        let details: UserDetailsPageDto = self.client.get_json(url).await?;
        details.into_details()
    }
}

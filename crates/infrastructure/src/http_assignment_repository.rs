use async_trait::async_trait;
use tilgang_application::AssignmentRepository;
use tilgang_core::{AppResult, BasePath};
use tilgang_domain::{NewAssignment, ObjectTypeSelector, UserRole};

use crate::http_api_client::HttpApiClient;
use crate::wire::{NewAssignmentBody, UpdateAssignmentBody, UserRoleDto};

/// REST-backed assignment repository.
#[derive(Clone)]
pub struct HttpAssignmentRepository {
    client: HttpApiClient,
}

impl HttpAssignmentRepository {
    /// Creates a repository on top of a shared API client.
    #[must_use]
    pub fn new(client: HttpApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AssignmentRepository for HttpAssignmentRepository {
    async fn create_assignment(
        &self,
        base_path: &BasePath,
        assignment: &NewAssignment,
    ) -> AppResult<()> {
        let url = self.client.endpoint(base_path, &["accessassignment"])?;
        self.client
            .post_json(url, &NewAssignmentBody::from(assignment))
            .await
    }

    async fn update_assignment(
        &self,
        base_path: &BasePath,
        user_resource_id: &str,
        updated: &UserRole,
    ) -> AppResult<UserRole> {
        let url = self.client.endpoint(base_path, &["accessassignment"])?;
        let role: UserRoleDto = self
            .client
            .put_json(url, &UpdateAssignmentBody::new(user_resource_id, updated))
            .await?;
        Ok(role.into())
    }

    async fn delete_assignment(
        &self,
        base_path: &BasePath,
        user_resource_id: &str,
        role_id: &str,
        object_types: &ObjectTypeSelector,
    ) -> AppResult<()> {
        let mut url = self.client.endpoint(
            base_path,
            &["accessassignment", "user", user_resource_id, "role", role_id],
        )?;
        url.query_pairs_mut()
            .append_pair("objectType", object_types.as_str());
        self.client.delete(url).await
    }
}

#[cfg(test)]
mod tests;

use async_trait::async_trait;
use tilgang_application::RoleRepository;
use tilgang_core::{AppResult, BasePath};
use tilgang_domain::{Feature, PermissionData, Role};

use crate::http_api_client::HttpApiClient;
use crate::wire::{FeatureDto, PermissionDataDto, RoleDto};

/// REST-backed role and permission repository.
#[derive(Clone)]
pub struct HttpRoleRepository {
    client: HttpApiClient,
}

impl HttpRoleRepository {
    /// Creates a repository on top of a shared API client.
    #[must_use]
    pub fn new(client: HttpApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RoleRepository for HttpRoleRepository {
    async fn list_roles(&self, base_path: &BasePath) -> AppResult<Vec<Role>> {
        let url = self.client.endpoint(base_path, &["accessrole"])?;
        let roles: Vec<RoleDto> = self.client.get_json(url).await?;
        Ok(roles.into_iter().map(Role::from).collect())
    }

    async fn list_features(&self, base_path: &BasePath, role_id: &str) -> AppResult<Vec<Feature>> {
        let url = self
            .client
            .endpoint(base_path, &["accessrole", role_id, "feature"])?;
        let features: Vec<FeatureDto> = self.client.get_json(url).await?;
        Ok(features.into_iter().map(Feature::from).collect())
    }

    async fn permission_data(
        &self,
        base_path: &BasePath,
        role_id: &str,
    ) -> AppResult<PermissionData> {
        let url = self
            .client
            .endpoint(base_path, &["accesspermission", "accessrole", role_id])?;
        let data: PermissionDataDto = self.client.get_json(url).await?;
        data.into_domain()
    }

    async fn save_permission_data(
        &self,
        base_path: &BasePath,
        data: &PermissionData,
    ) -> AppResult<PermissionData> {
        let url = self.client.endpoint(base_path, &["accesspermission"])?;
        let saved: PermissionDataDto = self
            .client
            .put_json(url, &PermissionDataDto::from(data))
            .await?;
        saved.into_domain()
    }
}

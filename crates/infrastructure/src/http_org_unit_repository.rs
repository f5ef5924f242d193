use async_trait::async_trait;
use tilgang_application::OrgUnitRepository;
use tilgang_core::{AppResult, BasePath};
use tilgang_domain::OrgUnit;

use crate::http_api_client::HttpApiClient;
use crate::wire::OrgUnitPageDto;

/// REST-backed organizational unit repository.
#[derive(Clone)]
pub struct HttpOrgUnitRepository {
    client: HttpApiClient,
}

impl HttpOrgUnitRepository {
    /// Creates a repository on top of a shared API client.
    #[must_use]
    pub fn new(client: HttpApiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl OrgUnitRepository for HttpOrgUnitRepository {
    async fn related_org_units(
        &self,
        base_path: &BasePath,
        org_unit_id: &str,
    ) -> AppResult<Vec<OrgUnit>> {
        let url = self
            .client
            .endpoint(base_path, &["orgunit", org_unit_id, "related"])?;
        let page: OrgUnitPageDto = self.client.get_json(url).await?;
        page.into_org_units()
    }
}

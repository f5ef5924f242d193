//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod http_api_client;
mod http_assignment_repository;
mod http_org_unit_repository;
mod http_role_repository;
mod http_user_repository;
mod tracing_notifier;
mod wire;

pub use http_api_client::HttpApiClient;
pub use http_assignment_repository::HttpAssignmentRepository;
pub use http_org_unit_repository::HttpOrgUnitRepository;
pub use http_role_repository::HttpRoleRepository;
pub use http_user_repository::HttpUserRepository;
pub use tracing_notifier::TracingNotifier;

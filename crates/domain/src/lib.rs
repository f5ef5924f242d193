//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod assignment;
mod org_unit;
mod page;
mod query;
mod role;
mod tab;
mod user;

pub use assignment::{
    ALL_OBJECT_TYPES, AssignmentDraft, DeleteSelection, NewAssignment, ObjectTypeSelector,
};
pub use org_unit::{AssignedOrgUnit, AssignedRole, OrgUnit, UserAssignmentDetails};
pub use page::{Page, PageSize, clamp_page, page_count};
pub use query::{UserFilter, UserPageQuery};
pub use role::{Feature, FeatureOperation, PermissionData, Role};
pub use tab::Tab;
pub use user::{Scope, ScopeOrgUnit, User, UserRole};

//! Application ports, state stores and view composition.

#![forbid(unsafe_code)]

mod access_ports;
mod admin_console;
mod assignment_store;
mod navigation_guard;
mod org_unit_store;
mod request_sequence;
mod role_store;
mod user_detail_store;
mod user_list_store;
pub mod views;

#[cfg(test)]
mod test_support;

pub use access_ports::{
    AssignmentRepository, Notification, NotificationLevel, Notifier, OrgUnitRepository,
    RoleRepository, UserRepository,
};
pub use admin_console::{AdminConsole, ConsolePorts};
pub use assignment_store::{AssignmentRefresh, AssignmentState, AssignmentStore};
pub use navigation_guard::{GuardSnapshot, GuardState, NavigationGuard, SaveAction, TabChange};
pub use org_unit_store::{OrgUnitState, OrgUnitStore};
pub use request_sequence::{FetchOutcome, RequestSequence, RequestTicket};
pub use role_store::{RoleState, RoleStore};
pub use user_detail_store::{UserDetailState, UserDetailStore};
pub use user_list_store::{UserListState, UserListStore};

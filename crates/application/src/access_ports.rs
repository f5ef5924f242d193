mod notifications;
mod repositories;

pub use notifications::{Notification, NotificationLevel, Notifier};
pub use repositories::{AssignmentRepository, OrgUnitRepository, RoleRepository, UserRepository};

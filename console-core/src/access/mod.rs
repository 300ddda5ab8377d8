pub mod menu;
pub mod policy;
pub mod roles;

pub use menu::{entry_for, validate_menu, visible_entries, MenuEntry, MenuError, MENU};
pub use policy::is_authorized;
pub use roles::{permissions_for, permissions_for_name, Role, RoleEntry, UnknownRole};

//! Navigation menu and role-based filtering.

use super::policy::is_authorized;
use super::roles::Role;
use std::collections::HashSet;

/// A navigation target shown in the sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuEntry {
    pub label: &'static str,
    pub path: &'static str,
    pub icon: &'static str,
    pub allowed_roles: &'static [Role],
}

const EVERYONE: &[Role] = &Role::ALL;

/// Console menu, in display order. Page routes take their allow-lists from here.
pub static MENU: &[MenuEntry] = &[
    MenuEntry {
        label: "Dashboard",
        path: "/dashboard",
        icon: "layout-dashboard",
        allowed_roles: EVERYONE,
    },
    MenuEntry {
        label: "Point of Sale",
        path: "/pos",
        icon: "shopping-cart",
        allowed_roles: &[Role::Admin, Role::Manager, Role::Supervisor, Role::Cashier],
    },
    MenuEntry {
        label: "Inventory",
        path: "/inventory",
        icon: "package",
        allowed_roles: &[Role::Admin, Role::Manager, Role::Supervisor, Role::StockClerk],
    },
    MenuEntry {
        label: "Customers",
        path: "/customers",
        icon: "users",
        allowed_roles: &[Role::Admin, Role::Manager, Role::Supervisor, Role::Cashier],
    },
    MenuEntry {
        label: "Suppliers",
        path: "/suppliers",
        icon: "truck",
        allowed_roles: &[Role::Admin, Role::Manager, Role::StockClerk],
    },
    MenuEntry {
        label: "Employees",
        path: "/employees",
        icon: "id-card",
        allowed_roles: &[Role::Admin, Role::Manager],
    },
    MenuEntry {
        label: "Reports",
        path: "/reports",
        icon: "bar-chart",
        allowed_roles: &[Role::Admin, Role::Manager, Role::Supervisor],
    },
    MenuEntry {
        label: "Advanced Queries",
        path: "/queries",
        icon: "search-code",
        allowed_roles: &[Role::Admin, Role::Manager],
    },
    MenuEntry {
        label: "Database Features",
        path: "/database",
        icon: "database",
        allowed_roles: &[Role::Admin],
    },
    MenuEntry {
        label: "Users",
        path: "/users",
        icon: "shield",
        allowed_roles: &[Role::Admin],
    },
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MenuError {
    #[error("menu entry {0} has no allowed roles")]
    EmptyAllowList(&'static str),

    #[error("menu path {0} is declared more than once")]
    DuplicatePath(&'static str),
}

/// Entries the role may see, in input order.
pub fn visible_entries(entries: &[MenuEntry], user_role: Option<Role>) -> Vec<&MenuEntry> {
    entries
        .iter()
        .filter(|entry| is_authorized(user_role, entry.allowed_roles))
        .collect()
}

/// Check every entry has a non-empty allow-list and a unique path.
pub fn validate_menu(entries: &[MenuEntry]) -> Result<(), MenuError> {
    let mut seen = HashSet::new();
    for entry in entries {
        if entry.allowed_roles.is_empty() {
            return Err(MenuError::EmptyAllowList(entry.label));
        }
        if !seen.insert(entry.path) {
            return Err(MenuError::DuplicatePath(entry.path));
        }
    }
    Ok(())
}

pub fn entry_for<'a>(entries: &'a [MenuEntry], path: &str) -> Option<&'a MenuEntry> {
    entries.iter().find(|entry| entry.path == path)
}

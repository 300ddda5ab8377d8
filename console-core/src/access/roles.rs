//! Role catalog - the closed set of operator roles and their display data.
//!
//! This table is the only place role labels and permission labels are
//! defined. Menus, guards and the profile page all read from here.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Operator role. Roles are flat tags: there is no hierarchy between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Manager,
    Supervisor,
    Cashier,
    StockClerk,
}

/// Catalog row for a single role.
#[derive(Debug, Clone, Copy)]
pub struct RoleEntry {
    pub role: Role,
    pub label: &'static str,
    pub permissions: &'static [&'static str],
}

/// Fallback for names outside the catalog.
pub const NO_PERMISSIONS: &[&str] = &[];

const ADMIN: RoleEntry = RoleEntry {
    role: Role::Admin,
    label: "Administrator",
    permissions: &[
        "Manage users and role assignments",
        "Configure system settings",
        "View audit logs",
        "Run advanced queries",
        "Manage database views and procedures",
        "Access all reports",
    ],
};

const MANAGER: RoleEntry = RoleEntry {
    role: Role::Manager,
    label: "Manager",
    permissions: &[
        "Approve cancellations",
        "Manage inventory and pricing",
        "Manage suppliers",
        "Manage employees",
        "Run advanced queries",
        "View sales reports",
    ],
};

const SUPERVISOR: RoleEntry = RoleEntry {
    role: Role::Supervisor,
    label: "Supervisor",
    permissions: &[
        "Approve cancellations",
        "Process returns",
        "Oversee cashier shifts",
        "View daily sales",
    ],
};

const CASHIER: RoleEntry = RoleEntry {
    role: Role::Cashier,
    label: "Cashier",
    permissions: &["Process sales", "Register customers", "Print receipts"],
};

const STOCK_CLERK: RoleEntry = RoleEntry {
    role: Role::StockClerk,
    label: "Stock Clerk",
    permissions: &[
        "Receive deliveries",
        "Update stock levels",
        "View product catalog",
    ],
};

impl Role {
    /// Every role, in catalog order.
    pub const ALL: [Role; 5] = [
        Role::Admin,
        Role::Manager,
        Role::Supervisor,
        Role::Cashier,
        Role::StockClerk,
    ];

    /// Catalog row for this role. Exhaustive, so a new variant must be given a row.
    pub fn entry(self) -> &'static RoleEntry {
        match self {
            Role::Admin => &ADMIN,
            Role::Manager => &MANAGER,
            Role::Supervisor => &SUPERVISOR,
            Role::Cashier => &CASHIER,
            Role::StockClerk => &STOCK_CLERK,
        }
    }

    pub fn label(self) -> &'static str {
        self.entry().label
    }

    pub fn permissions(self) -> &'static [&'static str] {
        self.entry().permissions
    }

    /// Wire identifier, e.g. `STOCK_CLERK`.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Manager => "MANAGER",
            Role::Supervisor => "SUPERVISOR",
            Role::Cashier => "CASHIER",
            Role::StockClerk => "STOCK_CLERK",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace(['-', ' '], "_");
        Role::ALL
            .into_iter()
            .find(|role| role.as_str() == normalized)
            .ok_or_else(|| UnknownRole(s.to_string()))
    }
}

/// Ordered permission labels for a role.
pub fn permissions_for(role: Role) -> &'static [&'static str] {
    role.permissions()
}

/// Permission labels for a raw role name; names outside the catalog get the
/// empty fallback. An empty result carries no authorization meaning.
pub fn permissions_for_name(name: &str) -> &'static [&'static str] {
    name.parse::<Role>()
        .map(Role::permissions)
        .unwrap_or(NO_PERMISSIONS)
}

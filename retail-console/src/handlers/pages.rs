use crate::error::AppError;
use crate::middleware::CurrentUser;
use askama::Template;
use axum::{http::Uri, response::IntoResponse};
use console_core::access::{entry_for, visible_entries, Role, MENU};
use console_core::models::User;
use serde::Serialize;

/// Sidebar link as rendered for the current operator.
#[derive(Debug, Clone, Serialize)]
pub struct NavItem {
    pub label: &'static str,
    pub path: &'static str,
    pub icon: &'static str,
    pub active: bool,
}

pub fn build_nav(role: Role, current_path: &str) -> Vec<NavItem> {
    visible_entries(MENU, Some(role))
        .into_iter()
        .map(|entry| NavItem {
            label: entry.label,
            path: entry.path,
            icon: entry.icon,
            active: entry.path == current_path,
        })
        .collect()
}

fn summary_for(path: &str) -> &'static str {
    match path {
        "/dashboard" => "Today's sales, stock alerts and shift overview.",
        "/pos" => "Ring up sales, apply promotions and take payments.",
        "/inventory" => "Products, stock levels and deliveries.",
        "/customers" => "Customer accounts and loyalty balances.",
        "/suppliers" => "Supplier contacts and purchase orders.",
        "/employees" => "Staff records and shift assignments.",
        "/reports" => "Sales, margin and stock movement reports.",
        "/queries" => "Saved cross-table queries run on the store server.",
        "/database" => "Views, stored procedures and audit logs.",
        "/users" => "Console accounts and role assignments.",
        _ => "",
    }
}

#[derive(Template)]
#[template(path = "page.html")]
pub struct PageTemplate {
    pub user: User,
    pub nav: Vec<NavItem>,
    pub title: &'static str,
    pub summary: &'static str,
}

#[derive(Template)]
#[template(path = "profile.html")]
pub struct ProfileTemplate {
    pub user: User,
    pub nav: Vec<NavItem>,
    pub role_label: &'static str,
    pub permissions: &'static [&'static str],
}

/// Shell for a menu module; the module's data is fetched by the page itself.
pub async fn module_page(
    CurrentUser(user): CurrentUser,
    uri: Uri,
) -> Result<impl IntoResponse, AppError> {
    let entry = entry_for(MENU, uri.path())
        .ok_or_else(|| AppError::NotFound(uri.path().to_string()))?;

    Ok(PageTemplate {
        nav: build_nav(user.role, entry.path),
        title: entry.label,
        summary: summary_for(entry.path),
        user,
    })
}

pub async fn profile_page(CurrentUser(user): CurrentUser) -> impl IntoResponse {
    ProfileTemplate {
        nav: build_nav(user.role, "/profile"),
        role_label: user.role.label(),
        permissions: user.role.permissions(),
        user,
    }
}

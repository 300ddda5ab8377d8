use super::roles::Role;

/// Decide whether `user_role` satisfies a page's allow-list.
///
/// No session never passes. An empty allow-list is an open page. Otherwise
/// the role must be listed explicitly; roles imply nothing about each other.
pub fn is_authorized(user_role: Option<Role>, required_roles: &[Role]) -> bool {
    match user_role {
        None => false,
        Some(_) if required_roles.is_empty() => true,
        Some(role) => required_roles.contains(&role),
    }
}

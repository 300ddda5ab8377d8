use crate::access::Role;
use secrecy::Secret;
use serde::{Deserialize, Serialize};

/// The authenticated operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub department: Option<String>,
}

impl User {
    /// Up to two initials for the avatar badge.
    pub fn initials(&self) -> String {
        let initials: String = self
            .name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .take(2)
            .collect::<String>()
            .to_uppercase();

        if initials.is_empty() {
            "U".to_string()
        } else {
            initials
        }
    }
}

/// Login form input.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: Secret<String>,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: Secret::new(password.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(name: &str) -> User {
        User {
            id: "u-1".to_string(),
            name: name.to_string(),
            email: "ops@example.com".to_string(),
            role: Role::Cashier,
            department: None,
        }
    }

    #[test]
    fn test_initials() {
        assert_eq!(user("Ana Souza").initials(), "AS");
        assert_eq!(user("ana maria souza").initials(), "AM");
        assert_eq!(user("Li").initials(), "L");
        assert_eq!(user("  ").initials(), "U");
    }

    #[test]
    fn test_department_is_optional_on_the_wire() {
        let json = r#"{"id":"7","name":"Bo","email":"bo@example.com","role":"STOCK_CLERK"}"#;
        let parsed: User = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.role, Role::StockClerk);
        assert!(parsed.department.is_none());
    }
}

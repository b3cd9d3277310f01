use serde::{Deserialize, Serialize};

/// Account role; drives which views the router opens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserRole {
    Employee,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Employee => "Employee",
            UserRole::Admin => "Admin",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Employee" => Some(UserRole::Employee),
            "Admin" => Some(UserRole::Admin),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub role: UserRole,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserDto {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
    pub role: UserRole,
}

/// Session entry kept in browser local storage under the `user` key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    #[serde(rename = "type")]
    pub role: UserRole,
    #[serde(default)]
    pub email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_user_json() {
        let user: SessionUser = serde_json::from_str(r#"{"type":"Employee"}"#).unwrap();
        assert_eq!(user.role, UserRole::Employee);
        assert_eq!(user.email, None);

        let user = SessionUser {
            role: UserRole::Admin,
            email: Some("admin@test.tld".into()),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert_eq!(json, r#"{"type":"Admin","email":"admin@test.tld"}"#);
    }

    #[test]
    fn test_role_names() {
        assert_eq!(UserRole::parse("Employee"), Some(UserRole::Employee));
        assert_eq!(UserRole::parse("employee"), None);
        assert_eq!(UserRole::Admin.as_str(), "Admin");
    }
}

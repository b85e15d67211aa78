use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Customer,
    Driver,
    Admin,
}

impl Default for Role {
    fn default() -> Self {
        Role::Customer
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl User {
    pub fn has_role(&self, role: Role) -> bool {
        self.role == role
    }

    pub fn is_staff(&self) -> bool {
        matches!(self.role, Role::Driver | Role::Admin)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

#[test]
fn user_role_defaults_to_customer() {
    let user: User = serde_json::from_str(
        r#"{"id": "u-1", "name": "Ada", "email": "ada@example.com", "createdAt": "2024-01-01"}"#,
    )
    .unwrap();

    assert!(user.has_role(Role::Customer));
    assert!(!user.is_staff());
    assert_eq!(user.created_at.as_deref(), Some("2024-01-01"));

    let driver: User = serde_json::from_str(
        r#"{"id": "u-2", "name": "Bo", "email": "bo@example.com", "role": "driver"}"#,
    )
    .unwrap();
    assert!(driver.is_staff());
}

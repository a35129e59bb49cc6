//! Authentication models

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// User roles on the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Teacher,
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Student => write!(f, "student"),
            Role::Teacher => write!(f, "teacher"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "student" => Ok(Role::Student),
            "teacher" => Ok(Role::Teacher),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

/// Accept any role string, keeping only the ones we recognise
fn lenient_role<'de, D>(deserializer: D) -> Result<Option<Role>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|value| match value.parse::<Role>() {
        Ok(role) => Some(role),
        Err(reason) => {
            tracing::warn!("Ignoring profile role: {}", reason);
            None
        }
    }))
}

/// Profile of the signed-in user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    /// The server calls this field `name`
    #[serde(alias = "name")]
    pub username: String,
    /// `None` when the server sent no role or one outside the closed set
    #[serde(default, deserialize_with = "lenient_role")]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl UserProfile {
    pub fn new(id: i64, username: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            username: username.into(),
            role: Some(role),
            email: None,
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.role == Some(role)
    }
}

/// Raw body of the token endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// Credential grant handed back by a successful login
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginGrant {
    pub token: String,
    pub token_type: String,
    /// Seconds until expiry, when the server reported one
    pub expires_in: Option<u64>,
}

impl From<TokenResponse> for LoginGrant {
    fn from(response: TokenResponse) -> Self {
        Self {
            token: response.access_token,
            token_type: response.token_type,
            expires_in: response.expires_in,
        }
    }
}

/// Login credentials
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip_names() {
        for role in [Role::Student, Role::Teacher, Role::Admin] {
            assert_eq!(role.to_string().parse::<Role>().unwrap(), role);
        }
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn test_profile_from_server_shape() {
        let json = r#"{"id": 7, "name": "alice", "email": "a@x.io", "role": "teacher", "status": null}"#;
        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.id, 7);
        assert_eq!(profile.username, "alice");
        assert!(profile.has_role(Role::Teacher));
        assert_eq!(profile.email.as_deref(), Some("a@x.io"));
    }

    #[test]
    fn test_unknown_role_is_ignored() {
        let json = r#"{"id": 1, "username": "mallory", "role": "root"}"#;
        let profile: UserProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.role, None);
        assert!(!profile.has_role(Role::Admin));
    }

    #[test]
    fn test_token_response_into_grant() {
        let json = r#"{"access_token": "abc", "token_type": "bearer", "expires_in": 1800}"#;
        let grant: LoginGrant = serde_json::from_str::<TokenResponse>(json).unwrap().into();
        assert_eq!(grant.token, "abc");
        assert_eq!(grant.token_type, "bearer");
        assert_eq!(grant.expires_in, Some(1800));
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};

/// A GoBarber account as returned by the API.
///
/// Extra fields sent by the server (timestamps and the like) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl User {
    /// First word of the name, used for greetings
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or(&self.name)
    }
}

/// Email/password pair for `POST /sessions`.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Successful response of `POST /sessions`.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionResponse {
    pub user: User,
    pub token: String,
}

/// Body of `PUT /profile`.
///
/// The password fields are only sent when the user is changing their password.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_confirmation: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: "user123".to_string(),
            name: "user".to_string(),
            email: "user@email.com".to_string(),
            avatar_url: Some("ddd.jpg".to_string()),
        }
    }

    #[test]
    fn test_user_survives_serialization() {
        let user = sample_user();
        let json = serde_json::to_string(&user).expect("serialize user");
        let back: User = serde_json::from_str(&json).expect("deserialize user");
        assert_eq!(back, user);

        let without_avatar = User {
            avatar_url: None,
            ..sample_user()
        };
        let json = serde_json::to_string(&without_avatar).expect("serialize user");
        assert!(!json.contains("avatar_url"));
        let back: User = serde_json::from_str(&json).expect("deserialize user");
        assert_eq!(back, without_avatar);
    }

    #[test]
    fn test_user_with_empty_avatar_and_non_ascii_names() {
        let user = User {
            id: "usuário-1".to_string(),
            name: "João Ñandú 東京".to_string(),
            email: "joão@exämple.com".to_string(),
            avatar_url: Some(String::new()),
        };
        let json = serde_json::to_string(&user).expect("serialize user");
        assert!(json.contains("\"avatar_url\":\"\""));
        let back: User = serde_json::from_str(&json).expect("deserialize user");
        assert_eq!(back, user);
        assert_eq!(back.first_name(), "João");
    }

    #[test]
    fn test_user_parses_api_payload() {
        let json = r#"{
            "id": "7c8a",
            "name": "Hugo Souza",
            "email": "hugo@example.com",
            "avatar_url": null,
            "created_at": "2020-06-01T12:00:00.000Z",
            "updated_at": "2020-06-01T12:00:00.000Z"
        }"#;
        let user: User = serde_json::from_str(json).expect("parse user payload");
        assert_eq!(user.name, "Hugo Souza");
        assert_eq!(user.avatar_url, None);
        assert_eq!(user.first_name(), "Hugo");
    }

    #[test]
    fn test_session_response_parses() {
        let json = r#"{"user":{"id":"user123","name":"user","email":"user@email.com"},"token":"token123"}"#;
        let response: SessionResponse = serde_json::from_str(json).expect("parse session response");
        assert_eq!(response.token, "token123");
        assert_eq!(response.user.email, "user@email.com");
    }

    #[test]
    fn test_profile_update_omits_empty_password_fields() {
        let update = ProfileUpdate {
            name: "user".to_string(),
            email: "user@email.com".to_string(),
            ..Default::default()
        };
        let value = serde_json::to_value(&update).expect("serialize update");
        assert_eq!(
            value,
            serde_json::json!({"name": "user", "email": "user@email.com"})
        );
    }

    #[test]
    fn test_credentials_debug_hides_password() {
        let creds = Credentials::new("user@email.com", "123456");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("user@email.com"));
        assert!(!debug.contains("123456"));
    }
}

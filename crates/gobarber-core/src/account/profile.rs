use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use crate::auth::SessionManager;
use crate::forms::ProfileForm;
use crate::models::User;

use super::AccountError;

/// Validate and submit the profile form, then store the returned user
pub async fn update_profile(manager: &SessionManager, form: &ProfileForm) -> Result<User> {
    form.validate().map_err(AccountError::from)?;

    let user = manager
        .api()
        .update_profile(&form.to_update())
        .await
        .context("Failed to update profile")?;

    manager.update_user(user.clone())?;
    info!(user_id = %user.id, "Profile updated");
    Ok(user)
}

/// Upload an image file as the new avatar, then store the returned user
pub async fn update_avatar(manager: &SessionManager, image: &Path) -> Result<User> {
    let file_name = image
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| anyhow::anyhow!("Invalid avatar path: {}", image.display()))?
        .to_string();
    let bytes = std::fs::read(image)
        .with_context(|| format!("Failed to read avatar file {}", image.display()))?;

    let user = manager
        .api()
        .update_avatar(&file_name, bytes)
        .await
        .context("Failed to upload avatar")?;

    manager.update_user(user.clone())?;
    info!(user_id = %user.id, "Avatar updated");
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::api::ApiClient;
    use crate::storage::{KeyValueStore, MemoryStore};

    async fn signed_in_manager(server: &MockServer) -> (SessionManager, Arc<MemoryStore>) {
        let user = serde_json::json!({"id": "user123", "name": "user", "email": "user@email.com"});
        let store = Arc::new(MemoryStore::with_entries([
            ("@GoBarber:token", "token123".to_string()),
            ("@GoBarber:user", user.to_string()),
        ]));
        let api = ApiClient::new(server.uri(), Duration::from_secs(5)).unwrap();
        let manager = SessionManager::new(store.clone(), api, "@GoBarber").unwrap();
        (manager, store)
    }

    #[tokio::test]
    async fn test_update_profile_without_password_change() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/profile"))
            .and(header("authorization", "Bearer token123"))
            .and(body_json(serde_json::json!({
                "name": "New Name",
                "email": "new@email.com"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "user123", "name": "New Name", "email": "new@email.com"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let (manager, store) = signed_in_manager(&server).await;
        let form = ProfileForm {
            name: "New Name".to_string(),
            email: "new@email.com".to_string(),
            ..Default::default()
        };
        let user = update_profile(&manager, &form).await.expect("update profile");

        assert_eq!(user.name, "New Name");
        assert_eq!(manager.user(), Some(user.clone()));
        assert_eq!(manager.session().token.as_deref(), Some("token123"));
        let stored: User =
            serde_json::from_str(&store.get("@GoBarber:user").unwrap().unwrap()).unwrap();
        assert_eq!(stored, user);
    }

    #[tokio::test]
    async fn test_invalid_profile_is_not_sent() {
        let server = MockServer::start().await;
        let (manager, _store) = signed_in_manager(&server).await;

        let form = ProfileForm {
            name: String::new(),
            email: "new@email.com".to_string(),
            ..Default::default()
        };
        let err = update_profile(&manager, &form).await.expect_err("invalid form");
        match err.downcast_ref::<AccountError>() {
            Some(AccountError::Validation(errors)) => assert!(errors.get("name").is_some()),
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(server.received_requests().await.unwrap().is_empty());
        assert_eq!(manager.user().map(|u| u.name), Some("user".to_string()));
    }

    #[tokio::test]
    async fn test_rejected_profile_keeps_user() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/profile"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "status": "error", "message": "Old password does not match."
            })))
            .mount(&server)
            .await;

        let (manager, _store) = signed_in_manager(&server).await;
        let form = ProfileForm {
            name: "user".to_string(),
            email: "user@email.com".to_string(),
            old_password: "wrong".to_string(),
            password: "new-pass".to_string(),
            password_confirmation: "new-pass".to_string(),
        };
        update_profile(&manager, &form).await.expect_err("server rejects");
        assert_eq!(manager.user().map(|u| u.name), Some("user".to_string()));
    }

    #[tokio::test]
    async fn test_update_avatar_stores_new_url() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/users/avatar"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "user123",
                "name": "user",
                "email": "user@email.com",
                "avatar_url": "http://localhost:3333/files/me.png"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let tmp = tempfile::tempdir().unwrap();
        let image = tmp.path().join("me.png");
        std::fs::write(&image, [0x89, 0x50, 0x4e, 0x47]).unwrap();

        let (manager, _store) = signed_in_manager(&server).await;
        let user = update_avatar(&manager, &image).await.expect("upload avatar");
        assert_eq!(
            manager.user().and_then(|u| u.avatar_url),
            Some("http://localhost:3333/files/me.png".to_string())
        );
        assert_eq!(user.id, "user123");
    }

    #[tokio::test]
    async fn test_missing_avatar_file() {
        let server = MockServer::start().await;
        let (manager, _store) = signed_in_manager(&server).await;
        let tmp = tempfile::tempdir().unwrap();
        update_avatar(&manager, &tmp.path().join("missing.png"))
            .await
            .expect_err("no such file");
        assert!(server.received_requests().await.unwrap().is_empty());
    }
}

use contracts::system::auth::{LoginRequest, LoginResponse, UserInfo};

use crate::shared::api_client::{ClientMode, ClientRouter};
use crate::shared::storage::KeyValueStore;
use crate::system::auth::storage;

/// Login with email and password (always public)
pub async fn login(
    router: &ClientRouter,
    email: String,
    password: String,
) -> Result<LoginResponse, String> {
    let request = LoginRequest { email, password };

    router
        .resolve_client(Some(ClientMode::Public))
        .post_json("/api/auth/login", &request)
        .await
        .map_err(|e| format!("Login failed: {}", e))
}

/// Get current user info; guests and anonymous visitors get an error
pub async fn get_current_user(router: &ClientRouter) -> Result<UserInfo, String> {
    let client = router.resolve_client(None);
    if client.mode() == ClientMode::Public {
        return Err("Not authenticated".to_string());
    }

    client
        .get_json("/api/auth/me")
        .await
        .map_err(|e| format!("Get current user failed: {}", e))
}

/// Persist the session returned by `login`
pub fn save_session(store: &dyn KeyValueStore, response: &LoginResponse) {
    storage::save_access_token(store, &response.token);
    storage::save_role(store, response.user.rol.as_deref().unwrap_or(""));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::storage::MemoryStore;

    #[test]
    fn save_session_stores_token_and_role() {
        let store = MemoryStore::new();
        let response = LoginResponse {
            token: "t-1".into(),
            user: UserInfo {
                id: 1,
                nombre: "Ana".into(),
                email: None,
                rol: Some("cliente".into()),
            },
        };
        save_session(&store, &response);
        assert_eq!(storage::get_access_token(&store).as_deref(), Some("t-1"));
        assert_eq!(storage::get_role(&store).as_deref(), Some("cliente"));
    }
}

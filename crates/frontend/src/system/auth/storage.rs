use crate::shared::storage::KeyValueStore;

const ACCESS_TOKEN_KEY: &str = "auth_access_token";
const ROLE_KEY: &str = "auth_user_role";

/// Save access token
pub fn save_access_token(store: &dyn KeyValueStore, token: &str) {
    store.set(ACCESS_TOKEN_KEY, token);
}

/// Get access token; blank values count as absent
pub fn get_access_token(store: &dyn KeyValueStore) -> Option<String> {
    store
        .get(ACCESS_TOKEN_KEY)
        .filter(|t| !t.trim().is_empty())
}

pub fn save_role(store: &dyn KeyValueStore, role: &str) {
    store.set(ROLE_KEY, role);
}

pub fn get_role(store: &dyn KeyValueStore) -> Option<String> {
    store.get(ROLE_KEY).filter(|r| !r.trim().is_empty())
}

/// Clear token and role
pub fn clear_session(store: &dyn KeyValueStore) {
    store.remove(ACCESS_TOKEN_KEY);
    store.remove(ROLE_KEY);
}

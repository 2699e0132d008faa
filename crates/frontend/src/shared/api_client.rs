//! Public vs. protected API clients and the policy choosing between them.
//!
//! Every API module goes through [`ClientRouter::resolve_client`]. Endpoints
//! known to be public (login) or protected (invoices) pass an explicit
//! [`ClientMode`]; everything else is resolved from the stored session:
//! a token is required for the protected client, and a guest-like role
//! downgrades to the public client even when a token is present.

use std::rc::Rc;

use gloo_net::http::{Request, RequestBuilder};
use gloo_timers::callback::Timeout;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use web_sys::AbortController;

use crate::shared::api_error::ErrorInfo;
use crate::shared::api_utils::{api_base, join_url};
use crate::shared::config::ClientConfig;
use crate::shared::storage::{durable_store, KeyValueStore};
use crate::system::auth::storage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientMode {
    /// No credential header
    Public,
    /// `Authorization: Bearer <token>` attached at dispatch time
    Protected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

#[derive(Clone)]
pub struct ClientRouter {
    store: Rc<dyn KeyValueStore>,
    base: String,
    timeout_ms: u32,
    public_roles: Vec<String>,
}

impl ClientRouter {
    pub fn new(
        store: Rc<dyn KeyValueStore>,
        base: impl Into<String>,
        timeout_ms: u32,
        public_roles: Vec<String>,
    ) -> Self {
        Self {
            store,
            base: base.into(),
            timeout_ms,
            public_roles: public_roles
                .into_iter()
                .map(|r| r.trim().to_lowercase())
                .collect(),
        }
    }

    /// Router over `localStorage` and the page's backend
    pub fn from_browser(config: &ClientConfig) -> Self {
        Self::new(
            durable_store(),
            api_base(config.api.port),
            config.api.request_timeout_ms,
            config.auth.public_roles.clone(),
        )
    }

    pub fn is_public_role(&self, role: &str) -> bool {
        let role = role.trim().to_lowercase();
        self.public_roles.iter().any(|r| *r == role)
    }

    /// Pick the mode for a call. Never fails: no token means public.
    pub fn resolve_mode(&self, force: Option<ClientMode>) -> ClientMode {
        if let Some(mode) = force {
            return mode;
        }
        if storage::get_access_token(self.store.as_ref()).is_none() {
            return ClientMode::Public;
        }
        match storage::get_role(self.store.as_ref()) {
            Some(role) if self.is_public_role(&role) => ClientMode::Public,
            _ => ClientMode::Protected,
        }
    }

    pub fn resolve_client(&self, force: Option<ClientMode>) -> ApiClient {
        ApiClient {
            mode: self.resolve_mode(force),
            store: Rc::clone(&self.store),
            base: self.base.clone(),
            timeout_ms: self.timeout_ms,
        }
    }
}

/// HTTP client bound to one mode
pub struct ApiClient {
    mode: ClientMode,
    store: Rc<dyn KeyValueStore>,
    base: String,
    timeout_ms: u32,
}

impl ApiClient {
    pub fn mode(&self) -> ClientMode {
        self.mode
    }

    pub fn url(&self, path: &str) -> String {
        join_url(&self.base, path)
    }

    /// Header value the protected client sends, read from storage now
    pub fn credential_header(&self) -> Option<String> {
        if self.mode != ClientMode::Protected {
            return None;
        }
        storage::get_access_token(self.store.as_ref()).map(|token| format!("Bearer {}", token))
    }

    /// Interceptor of the protected client; the public client never adds it
    pub fn attach_credential(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.credential_header() {
            Some(header) => builder.header("Authorization", &header),
            None => builder,
        }
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ErrorInfo> {
        let url = self.url(path);
        let bytes = self.exchange(HttpMethod::Get, &url, None).await?;
        serde_json::from_slice(&bytes).map_err(|e| ErrorInfo::decode("GET", &url, e))
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ErrorInfo>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        let payload =
            serde_json::to_value(body).map_err(|e| ErrorInfo::network("POST", &url, None, e))?;
        let bytes = self.exchange(HttpMethod::Post, &url, Some(payload)).await?;
        serde_json::from_slice(&bytes).map_err(|e| ErrorInfo::decode("POST", &url, e))
    }

    pub async fn get_bytes(&self, path: &str) -> Result<Vec<u8>, ErrorInfo> {
        let url = self.url(path);
        self.exchange(HttpMethod::Get, &url, None).await
    }

    async fn exchange(
        &self,
        method: HttpMethod,
        url: &str,
        payload: Option<Value>,
    ) -> Result<Vec<u8>, ErrorInfo> {
        let verb = method.as_str();

        // Aborts the fetch when the deadline fires; dropping the guard disarms it.
        let controller = AbortController::new().ok();
        let signal = controller.as_ref().map(|c| c.signal());
        let _deadline = controller.map(|c| Timeout::new(self.timeout_ms, move || c.abort()));

        let builder = match method {
            HttpMethod::Get => Request::get(url),
            HttpMethod::Post => Request::post(url),
        }
        .abort_signal(signal.as_ref());
        let builder = self.attach_credential(builder);

        let request = match &payload {
            Some(body) => builder.json(body),
            None => builder.build(),
        }
        .map_err(|e| ErrorInfo::network(verb, url, payload.clone(), e))?;

        log::debug!("{} {} ({:?} client)", verb, url, self.mode);

        let response = request
            .send()
            .await
            .map_err(|e| ErrorInfo::network(verb, url, payload.clone(), e))?;

        let status = response.status();
        let status_text = response.status_text();
        let ok = response.ok();
        let body = response
            .binary()
            .await
            .map_err(|e| ErrorInfo::network(verb, url, payload.clone(), e))?;

        if !ok {
            let text = String::from_utf8_lossy(&body);
            return Err(ErrorInfo::from_response(
                verb,
                url,
                status,
                &status_text,
                &text,
                payload,
            ));
        }

        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::storage::MemoryStore;

    fn router_with(token: Option<&str>, role: Option<&str>) -> ClientRouter {
        let store = Rc::new(MemoryStore::new());
        if let Some(t) = token {
            storage::save_access_token(store.as_ref(), t);
        }
        if let Some(r) = role {
            storage::save_role(store.as_ref(), r);
        }
        ClientRouter::new(
            store,
            "http://localhost:3000",
            15_000,
            vec!["guest".into(), "Invitado".into()],
        )
    }

    #[test]
    fn no_token_resolves_public() {
        let router = router_with(None, Some("admin"));
        assert_eq!(router.resolve_mode(None), ClientMode::Public);
        let client = router.resolve_client(None);
        assert_eq!(client.credential_header(), None);
    }

    #[test]
    fn blank_token_resolves_public() {
        let router = router_with(Some("   "), None);
        assert_eq!(router.resolve_mode(None), ClientMode::Public);
    }

    #[test]
    fn guest_role_overrides_token() {
        let router = router_with(Some("tok"), Some("invitado"));
        assert_eq!(router.resolve_mode(None), ClientMode::Public);
        assert!(router.is_public_role(" GUEST "));
    }

    #[test]
    fn regular_role_with_token_resolves_protected() {
        let router = router_with(Some("tok"), Some("cliente"));
        let client = router.resolve_client(None);
        assert_eq!(client.mode(), ClientMode::Protected);
        assert_eq!(client.credential_header().as_deref(), Some("Bearer tok"));

        let no_role = router_with(Some("tok"), None);
        assert_eq!(no_role.resolve_mode(None), ClientMode::Protected);
    }

    #[test]
    fn forced_mode_wins() {
        let router = router_with(Some("tok"), Some("cliente"));
        let public = router.resolve_client(Some(ClientMode::Public));
        assert_eq!(public.mode(), ClientMode::Public);
        assert_eq!(public.credential_header(), None);

        let guest = router_with(Some("tok"), Some("guest"));
        assert_eq!(
            guest.resolve_mode(Some(ClientMode::Protected)),
            ClientMode::Protected
        );
    }

    #[test]
    fn credential_is_read_at_dispatch_time() {
        let store = Rc::new(MemoryStore::new());
        let router = ClientRouter::new(store.clone(), "http://h", 1000, vec![]);
        let client = router.resolve_client(Some(ClientMode::Protected));
        assert_eq!(client.credential_header(), None);
        storage::save_access_token(store.as_ref(), "late");
        assert_eq!(client.credential_header().as_deref(), Some("Bearer late"));
        assert_eq!(client.url("/api/facturas/1"), "http://h/api/facturas/1");
    }
}

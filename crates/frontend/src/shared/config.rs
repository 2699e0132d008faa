//! Client configuration
//!
//! The defaults are embedded as a TOML document so that budgets and role
//! names live in one readable place instead of being scattered as literals.

use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ClientConfig {
    pub api: ApiConfig,
    pub auth: AuthConfig,
    pub reconciler: ReconcilerConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ApiConfig {
    /// Backend port on the page's host
    pub port: u16,
    pub request_timeout_ms: u32,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AuthConfig {
    /// Roles that are always served by the public client, even with a token
    pub public_roles: Vec<String>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ReconcilerConfig {
    pub max_tries: u32,
    pub retry_delay_ms: u32,
    pub reload_max: u32,
    pub reload_delay_ms: u32,
}

/// Default configuration embedded in the bundle
const DEFAULT_CONFIG: &str = r#"
[api]
port = 3000
request_timeout_ms = 15000

[auth]
public_roles = ["guest", "invitado", "anonymous"]

[reconciler]
max_tries = 4
retry_delay_ms = 1500
reload_max = 3
reload_delay_ms = 2000
"#;

/// Parse a configuration document
pub fn parse_config(source: &str) -> Result<ClientConfig, String> {
    toml::from_str(source).map_err(|e| format!("Invalid client config: {}", e))
}

/// Load the embedded configuration
pub fn load_config() -> ClientConfig {
    match parse_config(DEFAULT_CONFIG) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("{}; using built-in defaults", e);
            ClientConfig::default()
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                port: 3000,
                request_timeout_ms: 15_000,
            },
            auth: AuthConfig {
                public_roles: vec![
                    "guest".to_string(),
                    "invitado".to_string(),
                    "anonymous".to_string(),
                ],
            },
            reconciler: ReconcilerConfig {
                max_tries: 4,
                retry_delay_ms: 1500,
                reload_max: 3,
                reload_delay_ms: 2000,
            },
        }
    }
}

//! Server configuration.

use std::path::Path;

use serde::Deserialize;

/// Bootstrap admin account, created at startup when configured.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeedAdmin {
    pub name: String,
    pub email: String,
}

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Socket address the server binds to.
    pub bind_addr: String,

    /// Optional bootstrap admin.
    pub seed_admin: Option<SeedAdmin>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_owned(),
            seed_admin: None,
        }
    }
}

impl ServerConfig {
    /// Load from a JSON file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_binds_locally() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        assert!(config.seed_admin.is_none());
    }

    #[test]
    fn parses_seed_admin() {
        let config: ServerConfig = serde_json::from_str(
            r#"{"bind_addr": "0.0.0.0:9000", "seed_admin": {"name": "Root", "email": "root@example.com"}}"#,
        )
        .expect("valid config");
        assert_eq!(config.bind_addr, "0.0.0.0:9000");
        assert_eq!(config.seed_admin.unwrap().email, "root@example.com");
    }

    #[test]
    fn rejects_unknown_fields() {
        let result = serde_json::from_str::<ServerConfig>(r#"{"listen": ":80"}"#);
        assert!(result.is_err());
    }
}

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::IpAddr;
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub library: LibraryConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    "0.0.0.0".parse().unwrap()
}

fn default_port() -> u16 {
    8080
}

/// Upstream DVR backend configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    /// Services API base URL (e.g., "http://mythbackend:6544")
    pub base_url: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

fn default_timeout() -> u32 {
    30
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("mythward.db")
}

/// Video library configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LibraryConfig {
    /// Category label to directory segment (e.g., scifi = "SciFi")
    #[serde(default)]
    pub categories: HashMap<String, String>,
    /// Static storage-group directory overrides, consulted before the
    /// upstream resolver (e.g., Videos = ["/mnt/media/videos"])
    #[serde(default)]
    pub storage_groups: HashMap<String, Vec<PathBuf>>,
}

/// Sanitized config for API responses (host filesystem layout redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub upstream: SanitizedUpstreamConfig,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub library: SanitizedLibraryConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedUpstreamConfig {
    pub base_url: String,
    pub timeout_secs: u32,
}

/// Sanitized library config (configured names only, no paths)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedLibraryConfig {
    pub categories: Vec<String>,
    pub storage_group_overrides: Vec<String>,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        let mut categories: Vec<String> = config.library.categories.keys().cloned().collect();
        categories.sort();
        let mut storage_group_overrides: Vec<String> =
            config.library.storage_groups.keys().cloned().collect();
        storage_group_overrides.sort();
        Self {
            upstream: SanitizedUpstreamConfig {
                base_url: config.upstream.base_url.clone(),
                timeout_secs: config.upstream.timeout_secs,
            },
            server: config.server.clone(),
            database: config.database.clone(),
            library: SanitizedLibraryConfig {
                categories,
                storage_group_overrides,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_valid_config() {
        let toml = r#"
[upstream]
base_url = "http://mythbackend:6544"

[server]
host = "127.0.0.1"
port = 9000
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.upstream.base_url, "http://mythbackend:6544");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host.to_string(), "127.0.0.1");
    }

    #[test]
    fn test_deserialize_with_default_server() {
        let toml = r#"
[upstream]
base_url = "http://mythbackend:6544"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host.to_string(), "0.0.0.0");
        assert_eq!(config.upstream.timeout_secs, 30); // default
    }

    #[test]
    fn test_deserialize_missing_upstream_fails() {
        let toml = r#"
[server]
port = 8080
"#;
        let result: Result<Config, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_with_default_database() {
        let toml = r#"
[upstream]
base_url = "http://mythbackend:6544"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.database.path.to_str().unwrap(), "mythward.db");
    }

    #[test]
    fn test_deserialize_with_custom_database_path() {
        let toml = r#"
[upstream]
base_url = "http://mythbackend:6544"

[database]
path = "/data/my-db.sqlite"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.database.path.to_str().unwrap(), "/data/my-db.sqlite");
    }

    #[test]
    fn test_deserialize_library_section() {
        let toml = r#"
[upstream]
base_url = "http://mythbackend:6544"

[library.categories]
scifi = "SciFi"
comedy = "Comedy"

[library.storage_groups]
Videos = ["/mnt/media/videos", "/mnt/media/more-videos"]
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.library.categories["scifi"], "SciFi");
        assert_eq!(config.library.categories["comedy"], "Comedy");
        assert_eq!(
            config.library.storage_groups["Videos"],
            vec![
                PathBuf::from("/mnt/media/videos"),
                PathBuf::from("/mnt/media/more-videos")
            ]
        );
    }

    #[test]
    fn test_sanitized_config() {
        let toml = r#"
[upstream]
base_url = "http://mythbackend:6544"
timeout_secs = 60

[library.categories]
scifi = "SciFi"
comedy = "Comedy"

[library.storage_groups]
Videos = ["/mnt/media/videos"]
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let sanitized = SanitizedConfig::from(&config);
        assert_eq!(sanitized.upstream.base_url, "http://mythbackend:6544");
        assert_eq!(sanitized.upstream.timeout_secs, 60);
        assert_eq!(sanitized.server.port, 8080);
        assert_eq!(sanitized.database.path.to_str().unwrap(), "mythward.db");
        // Names only, directory paths stay out of API responses
        assert_eq!(sanitized.library.categories, vec!["comedy", "scifi"]);
        assert_eq!(sanitized.library.storage_group_overrides, vec!["Videos"]);
    }
}

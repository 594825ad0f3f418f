use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

/// Source of raw config values. The process environment in production,
/// a plain map in tests.
type Lookup<'a> = &'a dyn Fn(&str) -> Option<String>;

fn lookup_opt(get: Lookup<'_>, key: &str) -> Option<String> {
    get(key).filter(|s| !s.is_empty())
}

/// Read a profiled key: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_opt(get: Lookup<'_>, profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = lookup_opt(get, &prefixed) {
            return Some(v);
        }
    }
    lookup_opt(get, key)
}

fn profiled_or(get: Lookup<'_>, profile: &str, key: &str, default: &str) -> String {
    profiled_opt(get, profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_u16(get: Lookup<'_>, profile: &str, key: &str, default: u16) -> u16 {
    profiled_opt(get, profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn profiled_u64(get: Lookup<'_>, profile: &str, key: &str, default: u64) -> u64 {
    profiled_opt(get, profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn profiled_url(get: Lookup<'_>, profile: &str, key: &str, default: &str) -> String {
    profiled_or(get, profile, key, default)
        .trim_end_matches('/')
        .to_string()
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub server: ServerConfig,
    pub http: HttpConfig,
    pub upstream: UpstreamConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `PUBAPI_PROFILE`. When set (e.g. `PROD`), every
    /// key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let get = |key: &str| env::var(key).ok();
        let profile = lookup_opt(&get, "PUBAPI_PROFILE")
            .unwrap_or_default()
            .to_uppercase();
        Self::from_lookup(&profile, &get)
    }

    /// Build config for a profile from an arbitrary key lookup.
    pub fn from_lookup(
        profile: &str,
        get: &dyn Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Ok(Self {
            profile: p.to_string(),
            server: ServerConfig::from_lookup(get, p)?,
            http: HttpConfig::from_lookup(get, p),
            upstream: UpstreamConfig::from_lookup(get, p),
        })
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!("  server:          name={}, transport={}", self.server.name, self.server.transport);
        if self.server.transport == Transport::Http {
            tracing::info!("  listen:          {}", self.server.bind_addr());
        }
        tracing::info!("  http:            timeout={}s", self.http.timeout_secs);
        tracing::info!("  jsonplaceholder: {}", self.upstream.jsonplaceholder_url);
        tracing::info!("  catfacts:        {}", self.upstream.catfacts_url);
        tracing::info!("  jokes:           {}", self.upstream.jokes_url);
        tracing::info!("  qrcode:          {}", self.upstream.qrcode_url);
    }
}

impl Default for Config {
    fn default() -> Self {
        let none = |_: &str| -> Option<String> { None };
        Self {
            profile: String::new(),
            server: ServerConfig {
                name: DEFAULT_SERVER_NAME.to_string(),
                transport: Transport::Stdio,
                host: "localhost".to_string(),
                port: 8000,
            },
            http: HttpConfig::from_lookup(&none, ""),
            upstream: UpstreamConfig::from_lookup(&none, ""),
        }
    }
}

// ── Server ────────────────────────────────────────────────────

pub const DEFAULT_SERVER_NAME: &str = "MCP Server One";

/// How MCP messages reach the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transport {
    /// Newline-delimited JSON-RPC over stdin/stdout.
    Stdio,
    /// JSON-RPC over `POST /mcp`.
    Http,
}

impl FromStr for Transport {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stdio" => Ok(Transport::Stdio),
            "http" | "streamable-http" => Ok(Transport::Http),
            other => Err(ConfigError::UnknownTransport(other.to_string())),
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transport::Stdio => f.write_str("stdio"),
            Transport::Http => f.write_str("http"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub name: String,
    pub transport: Transport,
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    fn from_lookup(get: Lookup<'_>, p: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            name: profiled_or(get, p, "MCP_SERVER_NAME", DEFAULT_SERVER_NAME),
            transport: profiled_or(get, p, "MCP_TRANSPORT", "stdio").parse()?,
            host: profiled_or(get, p, "MCP_HOST", "localhost"),
            port: profiled_u16(get, p, "MCP_PORT", 8000),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// ── Outbound HTTP ─────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub timeout_secs: u64,
}

impl HttpConfig {
    fn from_lookup(get: Lookup<'_>, p: &str) -> Self {
        Self {
            timeout_secs: profiled_u64(get, p, "HTTP_TIMEOUT_SECS", 30),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

// ── Upstream APIs ─────────────────────────────────────────────

pub const DEFAULT_JSONPLACEHOLDER_URL: &str = "https://jsonplaceholder.typicode.com";
pub const DEFAULT_CATFACTS_URL: &str = "https://catfact.ninja";
pub const DEFAULT_JOKES_URL: &str = "https://official-joke-api.appspot.com";
pub const DEFAULT_QRCODE_URL: &str = "https://api.qrserver.com/v1";

/// Base URLs of the wrapped public APIs. No trailing slash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpstreamConfig {
    pub jsonplaceholder_url: String,
    pub catfacts_url: String,
    pub jokes_url: String,
    pub qrcode_url: String,
}

impl UpstreamConfig {
    fn from_lookup(get: Lookup<'_>, p: &str) -> Self {
        Self {
            jsonplaceholder_url: profiled_url(get, p, "JSONPLACEHOLDER_URL", DEFAULT_JSONPLACEHOLDER_URL),
            catfacts_url: profiled_url(get, p, "CATFACTS_URL", DEFAULT_CATFACTS_URL),
            jokes_url: profiled_url(get, p, "JOKES_URL", DEFAULT_JOKES_URL),
            qrcode_url: profiled_url(get, p, "QRCODE_URL", DEFAULT_QRCODE_URL),
        }
    }

    /// Point every upstream at the same base URL (mock servers in tests).
    pub fn all_at(base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/').to_string();
        Self {
            jsonplaceholder_url: base.clone(),
            catfacts_url: base.clone(),
            jokes_url: base.clone(),
            qrcode_url: base,
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        let none = |_: &str| -> Option<String> { None };
        Self::from_lookup(&none, "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = Config::from_lookup("", &lookup(&[])).unwrap();
        assert_eq!(config.profile_label(), "default");
        assert_eq!(config.server.transport, Transport::Stdio);
        assert_eq!(config.server.bind_addr(), "localhost:8000");
        assert_eq!(config.server.name, "MCP Server One");
        assert_eq!(config.http.timeout(), Duration::from_secs(30));
        assert_eq!(config.upstream, UpstreamConfig::default());
        assert_eq!(config.upstream.catfacts_url, "https://catfact.ninja");
    }

    #[test]
    fn test_profile_prefix_wins() {
        let get = lookup(&[
            ("MCP_PORT", "9000"),
            ("PROD_MCP_PORT", "9100"),
            ("MCP_TRANSPORT", "http"),
        ]);
        let config = Config::from_lookup("prod", &get).unwrap();
        assert_eq!(config.profile, "PROD");
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.transport, Transport::Http);
    }

    #[test]
    fn test_unparseable_number_falls_back() {
        let get = lookup(&[("HTTP_TIMEOUT_SECS", "soon"), ("MCP_PORT", "")]);
        let config = Config::from_lookup("", &get).unwrap();
        assert_eq!(config.http.timeout_secs, 30);
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn test_upstream_trailing_slash_trimmed() {
        let get = lookup(&[("JOKES_URL", "http://127.0.0.1:1234/")]);
        let config = Config::from_lookup("", &get).unwrap();
        assert_eq!(config.upstream.jokes_url, "http://127.0.0.1:1234");
    }

    #[test]
    fn test_unknown_transport_rejected() {
        let get = lookup(&[("MCP_TRANSPORT", "carrier-pigeon")]);
        let err = Config::from_lookup("", &get).unwrap_err();
        assert_eq!(err, ConfigError::UnknownTransport("carrier-pigeon".to_string()));
    }

    #[test]
    fn test_transport_aliases() {
        assert_eq!("STDIO".parse::<Transport>().unwrap(), Transport::Stdio);
        assert_eq!("streamable-http".parse::<Transport>().unwrap(), Transport::Http);
        assert_eq!(Transport::Http.to_string(), "http");
    }

    #[test]
    fn test_all_at_points_everything_to_one_base() {
        let upstream = UpstreamConfig::all_at("http://mock/");
        assert_eq!(upstream.jsonplaceholder_url, "http://mock");
        assert_eq!(upstream.qrcode_url, "http://mock");
    }
}

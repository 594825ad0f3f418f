use clap::Parser;
use pubapi_core::{Config, Transport};

/// MCP server exposing JSONPlaceholder, Cat Facts, the Official Joke API
/// and a QR code generator as tools, resources and prompts.
///
/// Flags override values read from the environment (and `.env`).
#[derive(Parser, Debug)]
#[command(name = "pubapi-mcp-server", version, about = "MCP server for a handful of public APIs")]
pub struct CliArgs {
    /// Transport to serve: stdio or http
    #[arg(long)]
    pub transport: Option<Transport>,

    /// Host to bind for the http transport
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind for the http transport
    #[arg(long)]
    pub port: Option<u16>,

    /// Per-request timeout for upstream APIs, in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Config profile; `PROD` reads `PROD_<KEY>` before `<KEY>`
    #[arg(long, env = "PUBAPI_PROFILE")]
    pub profile: Option<String>,

    /// Log at debug level (overridden by RUST_LOG)
    #[arg(short, long)]
    pub verbose: bool,
}

impl CliArgs {
    /// Apply flag overrides on top of the loaded config.
    pub fn apply(&self, config: &mut Config) {
        if let Some(transport) = self.transport {
            config.server.transport = transport;
        }
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(timeout) = self.timeout {
            config.http.timeout_secs = timeout;
        }
    }

    pub fn default_log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_leave_config_untouched() {
        let args = CliArgs::try_parse_from(["pubapi-mcp-server"]).unwrap();
        let mut config = Config::default();
        args.apply(&mut config);
        assert_eq!(config.server.transport, Transport::Stdio);
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.http.timeout_secs, 30);
        assert_eq!(args.default_log_level(), "info");
    }

    #[test]
    fn test_flags_override_config() {
        let args = CliArgs::try_parse_from([
            "pubapi-mcp-server",
            "--transport",
            "http",
            "--host",
            "0.0.0.0",
            "--port",
            "9000",
            "--timeout",
            "5",
            "-v",
        ])
        .unwrap();
        let mut config = Config::default();
        args.apply(&mut config);
        assert_eq!(config.server.transport, Transport::Http);
        assert_eq!(config.server.bind_addr(), "0.0.0.0:9000");
        assert_eq!(config.http.timeout_secs, 5);
        assert_eq!(args.default_log_level(), "debug");
    }

    #[test]
    fn test_unknown_transport_rejected() {
        assert!(CliArgs::try_parse_from(["pubapi-mcp-server", "--transport", "sse"]).is_err());
    }
}

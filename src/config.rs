//! Runtime configuration for the firewall process.
//!
//! Configuration is layered: a TOML file provides the base, environment
//! variables (`APIFW_*`) override individual fields, and a handful of
//! frequently-changed values are also exposed as `clap` flags. The resulting
//! [`Config`] is immutable for the lifetime of the process — reload requires
//! a restart.

use clap::Parser;
use serde::Deserialize;
use std::path::PathBuf;

/// Action taken when a decision point (request/response validation) fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Mode {
    /// Reject the request/response with `CustomBlockStatusCode`.
    Block,
    /// Log the violation but forward the request/response unchanged.
    LogOnly,
    /// Skip the check entirely.
    #[default]
    Disable,
}

/// `Server.Oauth.ValidationType` selects which bearer-auth backend is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum ValidationType {
    /// No bearer auth is enforced beyond what the OpenAPI doc requires.
    #[default]
    None,
    /// RFC 7662 token introspection.
    Introspection,
    /// Local JWT signature verification.
    Jwt,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct JwtConfig {
    /// `HS256`, `HS384`, `HS512`, `RS256`, `RS384`, `RS512`, `ES256`, `ES384`, `PS256`, `PS384`, `PS512`.
    pub signature_algorithm: String,
    /// Raw secret bytes for HMAC algorithms.
    pub secret_key: Option<String>,
    /// Path to a PEM public key/certificate for RSA/EC/PSS algorithms.
    pub pub_cert_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct IntrospectionConfig {
    pub endpoint: String,
    #[serde(default = "default_introspection_method")]
    pub endpoint_method: String,
    #[serde(default)]
    pub endpoint_params: std::collections::HashMap<String, String>,
    #[serde(default = "default_token_param_name")]
    pub token_param_name: String,
    pub content_type: Option<String>,
    pub client_auth_bearer_token: Option<String>,
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,
}

fn default_introspection_method() -> String {
    "POST".to_string()
}

fn default_token_param_name() -> String {
    "token".to_string()
}

fn default_refresh_interval() -> u64 {
    60
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct OauthConfig {
    #[serde(default)]
    pub validation_type: ValidationType,
    #[serde(default)]
    pub jwt: JwtConfig,
    #[serde(default)]
    pub introspection: IntrospectionConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Upstream base URL requests are forwarded to.
    pub url: String,
    #[serde(default = "default_pool_capacity")]
    pub client_pool_capacity: usize,
    #[serde(default = "default_max_conns_per_host")]
    pub max_conns_per_host: usize,
    #[serde(default)]
    pub insecure_connection: bool,
    pub root_ca: Option<PathBuf>,
    #[serde(default = "default_timeout_secs")]
    pub read_timeout_secs: u64,
    #[serde(default = "default_timeout_secs")]
    pub write_timeout_secs: u64,
    #[serde(default = "default_timeout_secs")]
    pub dial_timeout_secs: u64,
    #[serde(default)]
    pub oauth: OauthConfig,
}

fn default_pool_capacity() -> usize {
    64
}

fn default_max_conns_per_host() -> usize {
    64
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            client_pool_capacity: default_pool_capacity(),
            max_conns_per_host: default_max_conns_per_host(),
            insecure_connection: false,
            root_ca: None,
            read_timeout_secs: default_timeout_secs(),
            write_timeout_secs: default_timeout_secs(),
            dial_timeout_secs: default_timeout_secs(),
            oauth: OauthConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct DenylistTokensConfig {
    pub file: Option<PathBuf>,
    #[serde(default)]
    pub cookie_name: String,
    #[serde(default)]
    pub header_name: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct DenylistConfig {
    #[serde(default)]
    pub tokens: DenylistTokensConfig,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ShadowApiConfig {
    #[serde(default)]
    pub exclude_list: Vec<u16>,
    #[serde(default)]
    pub log_in_disable_mode: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListenConfig {
    #[serde(default = "default_listen_addr")]
    pub addr: String,
}

fn default_listen_addr() -> String {
    "0.0.0.0:8080".to_string()
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            addr: default_listen_addr(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

/// Flat firewall configuration, per the configuration surface in the design doc.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub request_validation: Mode,
    #[serde(default)]
    pub response_validation: Mode,
    #[serde(default = "default_block_status_code")]
    pub custom_block_status_code: u16,
    #[serde(default)]
    pub add_validation_status_header: bool,
    #[serde(default)]
    pub shadow_api: ShadowApiConfig,
    pub server: ServerConfig,
    #[serde(default)]
    pub denylist: DenylistConfig,
    #[serde(default)]
    pub listen: ListenConfig,
    #[serde(default)]
    pub log: LogConfig,
}

fn default_block_status_code() -> u16 {
    403
}

impl Config {
    /// Load from a TOML file, then apply environment variable overrides.
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("reading config {}: {e}", path.display()))?;
        let mut cfg: Config = toml::from_str(&text)
            .map_err(|e| anyhow::anyhow!("parsing config {}: {e}", path.display()))?;
        cfg.apply_env_overrides();
        Ok(cfg)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("APIFW_SERVER_URL") {
            self.server.url = v;
        }
        if let Ok(v) = std::env::var("APIFW_LISTEN_ADDR") {
            self.listen.addr = v;
        }
        if let Ok(v) = std::env::var("APIFW_LOG_LEVEL") {
            self.log.level = v;
        }
        if let Ok(v) = std::env::var("APIFW_DENYLIST_FILE") {
            self.denylist.tokens.file = Some(PathBuf::from(v));
        }
        if let Ok(v) = std::env::var("APIFW_OAUTH_SECRET_KEY") {
            self.server.oauth.jwt.secret_key = Some(v);
        }
        if let Ok(v) = std::env::var("APIFW_INTROSPECTION_BEARER_TOKEN") {
            self.server.oauth.introspection.client_auth_bearer_token = Some(v);
        }
    }
}

/// Command-line flags. Only the values an operator commonly needs to flip
/// at launch are exposed here; everything else lives in the config file.
#[derive(Debug, Parser)]
#[command(name = "apifw", about = "API firewall: OpenAPI contract enforcement reverse proxy")]
pub struct Cli {
    /// Path to the OpenAPI 3 specification document.
    #[arg(long, env = "APIFW_SPEC")]
    pub spec: PathBuf,

    /// Path to the firewall configuration TOML file.
    #[arg(long, env = "APIFW_CONFIG")]
    pub config: PathBuf,

    /// Override the listen address from the config file.
    #[arg(long, env = "APIFW_LISTEN_ADDR")]
    pub listen_addr: Option<String>,
}

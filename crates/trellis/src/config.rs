// File: src/config.rs
// Purpose: Configuration parsing from trellis.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::server::{CachePolicies, DEFAULT_HEALTH_BODY, DEFAULT_HEALTH_PATH, DEFAULT_STATIC_PREFIX};

pub const DEFAULT_CONFIG_FILE: &str = "trellis.toml";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub routing: RoutingConfig,

    #[serde(default)]
    pub cache: CachePolicies,

    #[serde(default)]
    pub static_files: StaticFilesConfig,

    #[serde(default)]
    pub health: HealthConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,
}

/// Route generation inputs and outputs, relative to the project root
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Route templates (default: "src/app")
    #[serde(default = "default_app_dir")]
    pub app_dir: String,

    /// Resolver contracts and implementations (default: "src/resolvers")
    #[serde(default = "default_resolver_dir")]
    pub resolver_dir: String,

    /// Generated module directory, wiped on every run (default: "src/routes")
    #[serde(default = "default_gen_dir")]
    pub gen_dir: String,

    /// Module every `PageView` must come from (default: "view_models")
    #[serde(default = "default_view_model_namespace")]
    pub view_model_namespace: String,

    /// Type handed to resolvers as shared application state
    #[serde(default = "default_app_context_type")]
    pub app_context_type: String,

    /// Template file extension (default: "rs")
    #[serde(default = "default_template_ext")]
    pub template_ext: String,

    /// 400 body for malformed live state
    #[serde(default = "default_live_bad_request_message")]
    pub live_bad_request_message: String,
}

/// Static file mount
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaticFilesConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_static_prefix")]
    pub url_prefix: String,

    #[serde(default = "default_static_dir")]
    pub dir: String,
}

/// Health check endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthConfig {
    #[serde(default = "default_health_path")]
    pub path: String,

    #[serde(default = "default_health_body")]
    pub body: String,
}

// Default values
fn default_port() -> u16 {
    3000
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_app_dir() -> String {
    "src/app".to_string()
}

fn default_resolver_dir() -> String {
    "src/resolvers".to_string()
}

fn default_gen_dir() -> String {
    "src/routes".to_string()
}

fn default_view_model_namespace() -> String {
    "view_models".to_string()
}

fn default_app_context_type() -> String {
    "crate::AppContext".to_string()
}

fn default_template_ext() -> String {
    "rs".to_string()
}

fn default_live_bad_request_message() -> String {
    "invalid datastar signal payload".to_string()
}

fn default_static_prefix() -> String {
    DEFAULT_STATIC_PREFIX.to_string()
}

fn default_static_dir() -> String {
    "static".to_string()
}

fn default_health_path() -> String {
    DEFAULT_HEALTH_PATH.to_string()
}

fn default_health_body() -> String {
    DEFAULT_HEALTH_BODY.to_string()
}

fn default_true() -> bool {
    true
}

// Default implementations
impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            app_dir: default_app_dir(),
            resolver_dir: default_resolver_dir(),
            gen_dir: default_gen_dir(),
            view_model_namespace: default_view_model_namespace(),
            app_context_type: default_app_context_type(),
            template_ext: default_template_ext(),
            live_bad_request_message: default_live_bad_request_message(),
        }
    }
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url_prefix: default_static_prefix(),
            dir: default_static_dir(),
        }
    }
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            path: default_health_path(),
            body: default_health_body(),
        }
    }
}

impl Config {
    /// Load configuration from a trellis.toml file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // Missing or empty file means defaults
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        Ok(config)
    }

    /// Load configuration from default path (./trellis.toml)
    pub fn load_default() -> Result<Self> {
        Self::load(DEFAULT_CONFIG_FILE)
    }

    /// `host:port` listen address
    pub fn address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

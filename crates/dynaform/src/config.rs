// File: src/config.rs
// Purpose: Host configuration parsing from dynaform.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Host configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub form: FormSettings,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,
}

/// Which form to serve and how to present it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormSettings {
    /// Form configuration file (TOML, or JSON by extension)
    #[serde(default = "default_form_path")]
    pub path: String,

    /// Page heading; the configuration's own title wins when present
    #[serde(default = "default_title")]
    pub title: String,

    #[serde(default = "default_submit_label")]
    pub submit_label: String,

    /// Where the rendered form posts to
    #[serde(default = "default_action")]
    pub action: String,
}

// Default values
fn default_port() -> u16 {
    3000
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_form_path() -> String {
    "forms/registration.toml".to_string()
}

fn default_title() -> String {
    "Dynamic Form".to_string()
}

fn default_submit_label() -> String {
    "Submit".to_string()
}

fn default_action() -> String {
    "/".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            path: default_form_path(),
            title: default_title(),
            submit_label: default_submit_label(),
            action: default_action(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // If file doesn't exist or is empty, return default config
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

    /// Load configuration from default path (./dynaform.toml)
    pub fn load_default() -> Result<Self> {
        Self::load("dynaform.toml")
    }

    /// Address the server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

use crate::core::ConfigProvider;
use crate::utils::error::{ProofError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8787;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Memory,
    Local,
    S3,
}

/// Proxy configuration file.
///
/// ```toml
/// [server]
/// port = 8787
/// allowed_origin = "https://shop.example.com"
///
/// [storage]
/// backend = "s3"
/// bucket = "font-proofs"
/// region = "${AWS_REGION}"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProxyConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// `None` or `"*"` allows any origin.
    pub allowed_origin: Option<String>,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            allowed_origin: None,
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_max_upload_bytes() -> usize {
    DEFAULT_MAX_UPLOAD_BYTES
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: Backend,
    /// Directory for the `local` backend.
    pub root: Option<String>,
    pub bucket: Option<String>,
    /// Key prefix inside the bucket, e.g. `"proofs/"`.
    pub prefix: Option<String>,
    pub region: Option<String>,
    /// S3-compatible endpoint (MinIO, R2, ...).
    pub endpoint_url: Option<String>,
}

impl ProxyConfig {
    /// Loads and parses a TOML file, substituting `${VAR}` references.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ProofError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = regex::Regex::new(r"\$\{([^}]+)\}").map_err(|e| ProofError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl ConfigProvider for ProxyConfig {
    fn host(&self) -> &str {
        &self.server.host
    }

    fn port(&self) -> u16 {
        self.server.port
    }

    fn allowed_origin(&self) -> Option<&str> {
        self.server
            .allowed_origin
            .as_deref()
            .filter(|origin| *origin != "*")
    }

    fn max_upload_bytes(&self) -> usize {
        self.server.max_upload_bytes
    }
}

impl Validate for ProxyConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("server.host", &self.server.host)?;
        validation::validate_positive_number(
            "server.max_upload_bytes",
            self.server.max_upload_bytes,
            1,
        )?;
        if let Some(origin) = self.allowed_origin() {
            validation::validate_url("server.allowed_origin", origin)?;
        }

        match self.storage.backend {
            Backend::Memory => {}
            Backend::Local => {
                let root = validation::validate_required_field("storage.root", &self.storage.root)?;
                validation::validate_path("storage.root", root)?;
            }
            Backend::S3 => {
                let bucket =
                    validation::validate_required_field("storage.bucket", &self.storage.bucket)?;
                validation::validate_bucket_name("storage.bucket", bucket)?;
                if let Some(endpoint) = &self.storage.endpoint_url {
                    validation::validate_url("storage.endpoint_url", endpoint)?;
                }
            }
        }

        tracing::debug!("Configuration validation passed");
        Ok(())
    }
}

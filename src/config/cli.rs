use crate::config::toml_config::{Backend, ProxyConfig};
use crate::utils::error::Result;
use clap::Parser;

/// Command line for the proxy server. Flags override values from `--config`.
#[derive(Debug, Clone, Parser)]
#[command(name = "proof-desk")]
#[command(about = "Storage proxy for font proof submissions")]
pub struct ServeArgs {
    /// Path to a TOML configuration file
    #[arg(short, long, env = "PROOF_DESK_CONFIG")]
    pub config: Option<String>,

    #[arg(long, env = "PROOF_DESK_HOST")]
    pub host: Option<String>,

    #[arg(short, long, env = "PROOF_DESK_PORT")]
    pub port: Option<u16>,

    #[arg(long, value_enum)]
    pub backend: Option<Backend>,

    /// Directory for the local backend
    #[arg(long)]
    pub root: Option<String>,

    #[arg(long, env = "PROOF_DESK_BUCKET")]
    pub bucket: Option<String>,

    #[arg(long)]
    pub prefix: Option<String>,

    #[arg(long)]
    pub region: Option<String>,

    #[arg(long)]
    pub endpoint_url: Option<String>,

    /// Origin allowed by CORS; `*` for any
    #[arg(long)]
    pub allowed_origin: Option<String>,

    #[arg(long)]
    pub max_upload_bytes: Option<usize>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,
}

impl ServeArgs {
    pub fn resolve(&self) -> Result<ProxyConfig> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::info!("Loading configuration from {}", path);
                ProxyConfig::from_file(path)?
            }
            None => ProxyConfig::default(),
        };

        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(origin) = &self.allowed_origin {
            config.server.allowed_origin = Some(origin.clone());
        }
        if let Some(limit) = self.max_upload_bytes {
            config.server.max_upload_bytes = limit;
        }

        let storage = &mut config.storage;
        if let Some(backend) = self.backend {
            storage.backend = backend;
        }
        override_opt(&mut storage.root, &self.root);
        override_opt(&mut storage.bucket, &self.bucket);
        override_opt(&mut storage.prefix, &self.prefix);
        override_opt(&mut storage.region, &self.region);
        override_opt(&mut storage.endpoint_url, &self.endpoint_url);

        Ok(config)
    }
}

fn override_opt(target: &mut Option<String>, value: &Option<String>) {
    if value.is_some() {
        *target = value.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ConfigProvider;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_flags_without_file() {
        let args = ServeArgs::try_parse_from([
            "proof-desk",
            "--backend",
            "local",
            "--root",
            "/tmp/proofs",
            "--port",
            "9100",
        ])
        .unwrap();
        let config = args.resolve().unwrap();

        assert_eq!(config.storage.backend, Backend::Local);
        assert_eq!(config.storage.root.as_deref(), Some("/tmp/proofs"));
        assert_eq!(config.port(), 9100);
    }

    #[test]
    fn test_flags_override_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[server]\nport = 8000\nhost = \"0.0.0.0\"\n[storage]\nbackend = \"memory\"\n")
            .unwrap();
        let path = file.path().to_str().unwrap();

        let args =
            ServeArgs::try_parse_from(["proof-desk", "--config", path, "--port", "8001"]).unwrap();
        let config = args.resolve().unwrap();

        assert_eq!(config.port(), 8001);
        assert_eq!(config.host(), "0.0.0.0");
        assert_eq!(config.storage.backend, Backend::Memory);
    }
}

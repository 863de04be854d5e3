use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use crate::export::{ExportConfig, OverflowPolicy, PageSize};
use crate::session::LogoutPolicy;

/// Where the key-value namespace lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamespaceBackend {
    Memory,
    File(PathBuf),
}

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub namespace: NamespaceBackend,
    pub export_dir: PathBuf,
    pub export_scale: u32,
    pub overflow: OverflowPolicy,
    pub logout_policy: LogoutPolicy,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str, default: &str| var(key).unwrap_or_else(|| default.to_string());

        let namespace = match get("DOCUGEN_NAMESPACE_PATH", "./data/namespace.json").as_str() {
            ":memory:" => NamespaceBackend::Memory,
            path => NamespaceBackend::File(PathBuf::from(path)),
        };

        let export_scale = get("DOCUGEN_EXPORT_SCALE", "2")
            .parse::<u32>()
            .context("DOCUGEN_EXPORT_SCALE must be a positive integer")?;
        if export_scale < 2 {
            bail!("DOCUGEN_EXPORT_SCALE must be at least 2, got {export_scale}");
        }

        Ok(Config {
            port: get("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: get("RUST_LOG", "info"),
            namespace,
            export_dir: PathBuf::from(get("DOCUGEN_EXPORT_DIR", "./exports")),
            export_scale,
            overflow: get("DOCUGEN_OVERFLOW", "crop")
                .parse()
                .map_err(anyhow::Error::msg)
                .context("DOCUGEN_OVERFLOW is invalid")?,
            logout_policy: get("DOCUGEN_LOGOUT_POLICY", "keep")
                .parse()
                .map_err(anyhow::Error::msg)
                .context("DOCUGEN_LOGOUT_POLICY is invalid")?,
        })
    }

    pub fn export_config(&self) -> ExportConfig {
        ExportConfig {
            scale: self.export_scale,
            page: PageSize::A4,
            overflow: self.overflow,
            output_dir: self.export_dir.clone(),
        }
    }
}

//! Configuration for a filebox session.
//!
//! Sources, lowest to highest precedence:
//! 1. built-in defaults ([`Config::default`]);
//! 2. `filebox.toml`, `filebox.yaml` and `filebox.json` in the platform
//!    config directory (e.g. `~/.config/filebox/` on Linux);
//! 3. an explicitly given file, typed by its extension;
//! 4. `FILEBOX_*` environment variables, with `__` separating nested keys
//!    (`FILEBOX_UPLOAD__MAX_BYTES=1048576`).

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use filebox_store::{DEFAULT_OWNER, DEFAULT_PERMISSIONS, DEFAULT_RECENT_LIMIT};
use serde::{Deserialize, Serialize};
use std::path::Path;

const APP_NAME: &str = "filebox";
const ENV_PREFIX: &str = "FILEBOX_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Owner recorded on new entries.
    pub owner: String,
    /// Permissions label recorded on new entries.
    pub permissions: String,
    /// How many entries the recent list keeps. At least 1.
    pub recent_limit: usize,
    pub upload: UploadConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            owner: DEFAULT_OWNER.to_string(),
            permissions: DEFAULT_PERMISSIONS.to_string(),
            recent_limit: DEFAULT_RECENT_LIMIT,
            upload: UploadConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Largest blob accepted for upload, in bytes. Unlimited when unset.
    pub max_bytes: Option<u64>,
}

impl Config {
    /// Load from every source, optionally including an explicit file.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let dirs = ProjectDirs::from("", "", APP_NAME);
        Self::load_from(dirs.as_ref().map(ProjectDirs::config_dir), explicit)
    }

    fn load_from(config_dir: Option<&Path>, explicit: Option<&Path>) -> Result<Self> {
        let figment = file_layers(config_dir, explicit)?.merge(Env::prefixed(ENV_PREFIX).split("__"));
        Self::extract(&figment)
    }

    /// Extract and validate a configuration from an already-built figment.
    pub fn extract(figment: &Figment) -> Result<Self> {
        let config: Self = figment.extract().or_raise(|| ErrorKind::Load)?;
        config.validate()?;
        tracing::debug!(owner = %config.owner, recent_limit = config.recent_limit, "Configuration loaded");
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.recent_limit == 0 {
            exn::bail!(ErrorKind::Invalid("recent_limit must be at least 1".to_string()));
        }
        if self.upload.max_bytes == Some(0) {
            exn::bail!(ErrorKind::Invalid("upload.max_bytes must be greater than 0".to_string()));
        }
        Ok(())
    }
}

/// Defaults, then the config directory, then the explicit file.
fn file_layers(config_dir: Option<&Path>, explicit: Option<&Path>) -> Result<Figment> {
    let mut figment = Figment::from(Serialized::defaults(Config::default()));
    if let Some(dir) = config_dir {
        tracing::trace!(dir = %dir.display(), "Looking for configuration files");
        figment = figment
            .merge(Toml::file(dir.join(format!("{APP_NAME}.toml"))))
            .merge(Yaml::file(dir.join(format!("{APP_NAME}.yaml"))))
            .merge(Json::file(dir.join(format!("{APP_NAME}.json"))));
    }
    if let Some(path) = explicit {
        if !path.is_file() {
            exn::bail!(ErrorKind::NotFound(path.to_path_buf()));
        }
        tracing::debug!(path = %path.display(), "Using configuration file");
        figment = match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml" | "yml") => figment.merge(Yaml::file(path)),
            Some("json") => figment.merge(Json::file(path)),
            _ => figment.merge(Toml::file(path)),
        };
    }
    Ok(figment)
}

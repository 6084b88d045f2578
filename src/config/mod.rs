//! Configuration resolution for resonance-guard
//!
//! Precedence, lowest to highest: built-in defaults, `.resonance.toml` in
//! the working directory, `RESONANCE_*` environment variables, command-line
//! flags. Each source yields a `ConfigPatch`; patches are applied in that
//! order and the result is validated once.

pub mod env;
pub mod schema;

pub use schema::{ConfigPatch, ConfigSource, ResolvedConfig};

use crate::error::{ResonanceError, ResonanceResult};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Name of the project-local config file
pub const CONFIG_FILE_NAME: &str = ".resonance.toml";

/// Ordered stack of override layers
#[derive(Debug, Default)]
pub struct ConfigResolver {
    layers: Vec<(ConfigSource, ConfigPatch)>,
}

impl ConfigResolver {
    /// Create a resolver with no override layers (defaults only)
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a layer; later layers override earlier ones
    pub fn layer(mut self, source: ConfigSource, patch: ConfigPatch) -> Self {
        self.layers.push((source, patch));
        self
    }

    /// Merge all layers over the defaults
    pub fn resolve(self) -> ResonanceResult<ResolvedConfig> {
        let mut config = ResolvedConfig::default();
        for (source, patch) in self.layers {
            debug!("Applying {} config layer", source);
            config.apply(patch, source)?;
        }
        config.validate()?;
        Ok(config)
    }

    /// Path of the config file for a working directory
    pub fn local_config_path(cwd: &Path) -> PathBuf {
        cwd.join(CONFIG_FILE_NAME)
    }

    /// Load a config file patch. A missing file yields `None`.
    pub async fn load_file(path: &Path) -> ResonanceResult<Option<ConfigPatch>> {
        let content = match fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Config file {} not found, skipping", path.display());
                return Ok(None);
            }
            Err(e) => {
                return Err(ResonanceError::io(
                    format!("reading config from {}", path.display()),
                    e,
                ))
            }
        };

        toml::from_str(&content)
            .map(Some)
            .map_err(|e| ResonanceError::ConfigInvalid {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
    }
}

/// Resolve the full configuration for a run.
///
/// `cli` is the command-line patch; the environment is read from the
/// current process.
pub async fn resolve(cli: ConfigPatch, cwd: &Path) -> ResonanceResult<ResolvedConfig> {
    resolve_with_env(cli, cwd, env::patch_from_process_env()).await
}

/// Resolve with an explicit environment patch
pub async fn resolve_with_env(
    cli: ConfigPatch,
    cwd: &Path,
    env_patch: ConfigPatch,
) -> ResonanceResult<ResolvedConfig> {
    let mut resolver = ConfigResolver::new();

    let file_path = ConfigResolver::local_config_path(cwd);
    if let Some(file_patch) = ConfigResolver::load_file(&file_path).await? {
        debug!("Found local config: {}", file_path.display());
        resolver = resolver.layer(ConfigSource::File, file_patch);
    }

    resolver
        .layer(ConfigSource::Environment, env_patch)
        .layer(ConfigSource::CommandLine, cli)
        .resolve()
}

//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/seltree/seltree.toml`
//! 3. Explicit config file given with `--config`
//! 4. Environment variables: `SELTREE_*` prefix, `__` between nested keys
//!    (e.g. `SELTREE_LABELS__COMPANY_PREFIX`)

use std::path::{Path, PathBuf};
use std::sync::Arc;

use config::{Config, ConfigError, Environment, File, FileFormat};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::{IdGenerator, Labels, SequentialIds, UuidIds};

/// How fresh entity ids are generated.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IdStrategy {
    /// Process-wide counter: "1", "2", ...; names share the counter.
    #[default]
    Sequential,
    /// Random v4 UUIDs; names still use a counter.
    Uuid,
}

impl IdStrategy {
    pub fn generator(self) -> Arc<dyn IdGenerator> {
        match self {
            IdStrategy::Sequential => Arc::new(SequentialIds::new()),
            IdStrategy::Uuid => Arc::new(UuidIds::new()),
        }
    }
}

/// Tree rendering options.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RenderSettings {
    /// Append `(id)` to every node.
    pub show_ids: bool,
    /// Include the "Future ..." placeholder nodes.
    pub show_future: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            show_ids: false,
            show_future: true,
        }
    }
}

/// Effective settings after all layers are merged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub id_strategy: IdStrategy,
    pub labels: Labels,
    pub render: RenderSettings,
}

/// Get the XDG config directory for seltree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "seltree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("seltree.toml"))
}

/// Expand `~` and `$VAR` in a user supplied path.
fn expand_path(path: &Path) -> Result<PathBuf, ApplicationError> {
    let raw = path.to_string_lossy();
    shellexpand::full(raw.as_ref())
        .map(|expanded| PathBuf::from(expanded.as_ref()))
        .map_err(|e| ApplicationError::Config {
            message: format!("expand {}: {e}", raw),
        })
}

impl Settings {
    /// Load settings from all layers.
    ///
    /// A missing global file is fine; a missing explicit file is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut builder =
            Config::builder().add_source(Config::try_from(&Settings::default()).map_err(config_err)?);

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                builder = builder.add_source(
                    File::from(global_path)
                        .format(FileFormat::Toml)
                        .required(false),
                );
            }
        }

        if let Some(path) = explicit {
            let path = expand_path(path)?;
            if !path.exists() {
                return Err(ApplicationError::Config {
                    message: format!("config file not found: {}", path.display()),
                });
            }
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("SELTREE")
                .prefix_separator("_")
                .separator("__"),
        );

        let config = builder.build().map_err(config_err)?;
        config.try_deserialize().map_err(config_err)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# seltree configuration
#
# Locations (by precedence, lowest to highest):
#   Global:   ~/.config/seltree/seltree.toml
#   Explicit: seltree --config <file>
#   Env:      SELTREE_* environment variables, e.g. SELTREE_RENDER__SHOW_IDS=true

# Id generation for new entities: "sequential" or "uuid"
# id_strategy = "sequential"

[labels]
# Names of the placeholder entities
# future_customer = "Future Customers"
# future_subscription = "Future Subscriptions"
# future_company = "Future Companies"
# future_environment = "Future Environments"

# Prefixes for generated names ("Company 7")
# customer_prefix = "Customer "
# subscription_prefix = "Subscription "
# company_prefix = "Company "
# environment_prefix = "Environment "

[render]
# show_ids = false
# show_future = true
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

//! Reconciler configuration.

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

/// Tunables for the reconciler facade
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcilerConfig {
    /// Emit the rendered diff text with the "resource changes" event
    pub log_diffs: bool,

    /// Additional field paths excluded from convergence diffs, on top
    /// of the built-in server-managed table
    pub extra_ignored_paths: Vec<String>,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            log_diffs: true,
            extra_ignored_paths: Vec::new(),
        }
    }
}

impl ReconcilerConfig {
    /// Layer defaults, an optional config file and `RECONCILE_*`
    /// environment overrides.
    ///
    /// Without an explicit path, `reconcile.toml` in the working
    /// directory is picked up when present.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        if let Some(path) = path {
            builder = builder.add_source(File::with_name(path));
        } else {
            builder = builder.add_source(File::with_name("reconcile").required(false));
        }

        let settings = builder
            .add_source(
                Environment::with_prefix("RECONCILE")
                    .prefix_separator("_")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("extra_ignored_paths"),
            )
            .build()
            .context("failed to load reconciler configuration")?;

        settings
            .try_deserialize()
            .context("invalid reconciler configuration")
    }
}

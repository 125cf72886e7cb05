//! User settings: `config.toml` in the config directory, overridden by
//! `TALLYTUI__*` environment variables.
use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::ledger::LayerOrder;
use crate::pipeline::PipelineSettings;
use crate::store::DEFAULT_KEY;

pub(crate) const ENV_PREFIX: &str = "TALLYTUI";
pub(crate) const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub(crate) struct Settings {
    pub storage_key: String,
    pub currency_multiplier: f64,
    pub expense_only_categories: Vec<String>,
    pub strict_category: bool,
    pub layer_order: LayerOrder,
    pub audit_tail: usize,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_KEY.to_string(),
            currency_multiplier: 1.0,
            expense_only_categories: vec!["rent".to_string()],
            strict_category: false,
            layer_order: LayerOrder::default(),
            audit_tail: 10,
            log_filter: "info".to_string(),
        }
    }
}

impl Settings {
    pub(crate) fn load(config_dir: &Path) -> Result<Self, ConfigError> {
        Self::load_with_prefix(config_dir, ENV_PREFIX)
    }

    fn load_with_prefix(config_dir: &Path, prefix: &str) -> Result<Self, ConfigError> {
        let path = config_dir.join(CONFIG_FILE);
        let built = Config::builder()
            .add_source(File::from(path.clone()).required(false))
            .add_source(environment(prefix))
            .build();

        // A broken file should not keep the app from starting.
        let config = match built {
            Ok(config) => config,
            Err(err) => {
                if path.exists() {
                    tracing::warn!(
                        "failed to load {}, falling back to env: {err}",
                        path.display()
                    );
                }
                Config::builder()
                    .add_source(environment(prefix))
                    .build()
                    .map_err(|env_err| {
                        ConfigError::Message(format!(
                            "could not load settings from file ({err}) or env ({env_err})"
                        ))
                    })?
            }
        };

        let settings: Settings = config.try_deserialize()?;
        settings.check()?;
        Ok(settings)
    }

    fn check(&self) -> Result<(), ConfigError> {
        match Decimal::try_from(self.currency_multiplier) {
            Ok(m) if m > Decimal::ZERO => {}
            _ => {
                return Err(ConfigError::Message(format!(
                    "currency_multiplier must be a positive number, got {}",
                    self.currency_multiplier
                )))
            }
        }
        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::Message("storage_key must not be empty".into()));
        }
        Ok(())
    }

    pub(crate) fn pipeline_settings(&self) -> PipelineSettings {
        PipelineSettings {
            currency_multiplier: Decimal::try_from(self.currency_multiplier)
                .unwrap_or(Decimal::ONE),
            expense_only_categories: self.expense_only_categories.clone(),
            strict_category: self.strict_category,
        }
    }
}

fn environment(prefix: &str) -> Environment {
    Environment::with_prefix(prefix)
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("expense_only_categories")
}

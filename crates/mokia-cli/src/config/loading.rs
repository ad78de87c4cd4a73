use crate::config::{Overrides, ServerSettings, ENV_KEYS, ENV_PREFIX};
use crate::error::{ConfigError, Result};
use figment::{
    providers::{Env, Serialized},
    Figment,
};
use mokia_graph::ModuleSettings;
use tracing::debug;

impl ServerSettings {
    /// Merge settings from all sources.
    /// Priority: CLI overrides > environment variables > module settings > defaults
    pub fn load(module: &ModuleSettings, overrides: &Overrides) -> Result<Self> {
        let figment = Self::figment(module, overrides);

        let settings: Self = figment.extract().map_err(ConfigError::from)?;
        debug!(
            host = %settings.host,
            port = settings.port,
            prefix = %settings.prefix,
            silent = settings.silent,
            "merged server settings"
        );
        Ok(settings)
    }

    fn figment(module: &ModuleSettings, overrides: &Overrides) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Serialized::defaults(module))
            .merge(Env::prefixed(ENV_PREFIX).only(ENV_KEYS))
            .merge(Serialized::defaults(overrides))
    }
}

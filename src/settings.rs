use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub db_path: String,
    pub listen_addr: String,
    /// Fixed seed for quiz question selection, random when absent.
    pub rng_seed: Option<u64>,
}

impl Settings {
    /// Defaults, then an optional `trivia.toml`, then environment variables
    /// (`DB_PATH`, `LISTEN_ADDR`, `RNG_SEED`).
    pub fn load() -> Result<Self, ConfigError> {
        Self::defaults()?
            .add_source(File::with_name("trivia").required(false))
            .add_source(Environment::default().try_parsing(true))
            .build()?
            .try_deserialize()
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("db_path", "trivia.db")?
            .set_default("listen_addr", "0.0.0.0:8080")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    #[test]
    fn defaults_apply_without_sources() {
        let settings: Settings = Settings::defaults()
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(settings.db_path, "trivia.db");
        assert_eq!(settings.listen_addr, "0.0.0.0:8080");
        assert_eq!(settings.rng_seed, None);
    }

    #[test]
    fn file_overrides_defaults() {
        let settings: Settings = Settings::defaults()
            .unwrap()
            .add_source(File::from_str(
                "db_path = \"/var/lib/trivia/trivia.db\"\nrng_seed = 42",
                FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(settings.db_path, "/var/lib/trivia/trivia.db");
        assert_eq!(settings.listen_addr, "0.0.0.0:8080");
        assert_eq!(settings.rng_seed, Some(42));
    }
}
